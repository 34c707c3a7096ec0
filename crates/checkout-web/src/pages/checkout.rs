//! Checkout Page

use std::rc::Rc;

use leptos::{ev::SubmitEvent, prelude::*};
use serde_json::Value;

use checkout_core::{BillingFormValues, CheckoutEvent, CheckoutState, flow};

use crate::api;
use crate::components::{CreditCardForm, MessageView, SampleCards};
use crate::store::dispatch;
use crate::vgs;

#[component]
pub fn CheckoutPage() -> impl IntoView {
    let state = RwSignal::new(CheckoutState::new(BillingFormValues::demo()));
    let secure_fields = StoredValue::new_local(Rc::new(vgs::secure_fields(api::vault_config())));
    let backend = StoredValue::new_local(Rc::new(api::backend()));

    // Mount points exist once the view is in the DOM
    Effect::new(move |_| {
        let fields = secure_fields.get_value();
        leptos::task::spawn_local(async move {
            match fields.initialize().await {
                Ok(()) => {}
                Err(e) if e.is_fatal() => {
                    leptos::logging::error!("Secure fields unavailable: {}", e);
                    dispatch(state, CheckoutEvent::TokenizerFailed(e.to_string()));
                }
                Err(e) => leptos::logging::warn!("Secure fields not initialized: {}", e),
            }
        });
    });

    let submit_card = move |ev: SubmitEvent| {
        ev.prevent_default();
        if !state.with_untracked(CheckoutState::can_submit_card) {
            return;
        }

        dispatch(state, CheckoutEvent::CardSubmitStarted);
        let form = state.with_untracked(|s| s.form.clone());
        let fields = secure_fields.get_value();
        let backend = backend.get_value();

        leptos::task::spawn_local(async move {
            let outcome = flow::submit_card(fields.as_ref(), backend.as_ref(), &form).await;
            dispatch(state, outcome);
        });
    };

    let submit_batch = move |_| {
        let Some(payment_method_id) = state
            .with_untracked(|s| s.payment_method_id.clone().filter(|_| s.can_submit_batch()))
        else {
            return;
        };

        dispatch(state, CheckoutEvent::BatchSubmitStarted);
        let backend = backend.get_value();

        leptos::task::spawn_local(async move {
            let outcome = flow::submit_order_batch(backend.as_ref(), &payment_method_id).await;
            dispatch(state, outcome);
        });
    };

    let card_message = Signal::derive(move || state.with(|s| s.card_message.clone()));
    let batch_message = Signal::derive(move || state.with(|s| s.batch_message.clone()));

    view! {
        <div class="checkout">
            <SampleCards />

            <form class="panel card-form" on:submit=submit_card>
                <CreditCardForm state />
                <button
                    type="submit"
                    class="btn btn-primary"
                    disabled=move || !state.with(CheckoutState::can_submit_card)
                >
                    {move || {
                        if state.with(|s| s.card_submitting) { "Processing..." } else { "Save Payment Information" }
                    }}
                </button>
            </form>

            <MessageView message=card_message fallback="Credit card form not submitted yet">
                <Show when=move || state.with(CheckoutState::shows_order_batch_action)>
                    <button
                        class="btn btn-primary"
                        on:click=submit_batch
                        disabled=move || !state.with(CheckoutState::can_submit_batch)
                    >
                        {move || {
                            if state.with(|s| s.batch_submitting) { "Processing..." } else { "Create Order Batch" }
                        }}
                    </button>
                </Show>
            </MessageView>

            <MessageView message=batch_message fallback="Order batch not submitted yet">
                <Show when=move || state.with(|s| s.batch_data.is_some())>
                    <pre class="batch-data">
                        {move || state.with(|s| s.batch_data.as_ref().map(pretty_json).unwrap_or_default())}
                    </pre>
                </Show>
            </MessageView>
        </div>
    }
}

fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}
