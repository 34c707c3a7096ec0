//! UI Components

use std::time::Duration;

use leptos::prelude::*;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::js_sys::{Function, Promise, Reflect};

use checkout_core::{
    CheckoutEvent, CheckoutState, Country, FormField, SecureField, form::US_STATES,
};

use crate::store::dispatch;

/// Test cards accepted by the sandbox: (key, label, number)
const SAMPLE_CARDS: [(&str, &str, &str); 4] = [
    ("success", "Success", "5555 5555 5555 4444"),
    ("immediate-decline", "Immediate decline", "4000 0000 0000 0002"),
    ("cvc-decline", "CVC decline", "4000 0000 0000 0127"),
    ("decline-at-charge", "Decline at charge", "4000 0000 0000 0341"),
];

/// Sample card numbers, copied to the clipboard on click
#[component]
pub fn SampleCards() -> impl IntoView {
    let (copied, set_copied) = signal(None::<&'static str>);

    let copy = move |key: &'static str, number: &'static str| {
        leptos::task::spawn_local(async move {
            match copy_to_clipboard(number).await {
                Ok(()) => {
                    set_copied.set(Some(key));
                    set_timeout(move || set_copied.set(None), Duration::from_secs(2));
                }
                Err(e) => leptos::logging::error!("Failed to copy text: {}", e),
            }
        });
    };

    view! {
        <div class="sample-cards">
            <div class="hint">"Sample cards. Use any future expiration (e.g. 12/34), any CVC."</div>
            {SAMPLE_CARDS
                .into_iter()
                .map(|(key, label, number)| {
                    view! {
                        <div class="sample-card">
                            <span class="label">{label}</span>
                            <span class="number" on:click=move |_| copy(key, number)>{number}</span>
                            <span class="copied">
                                {move || (copied.get() == Some(key)).then_some("(Copied!)")}
                            </span>
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}

async fn copy_to_clipboard(text: &str) -> Result<(), String> {
    let describe = |e: JsValue| e.as_string().unwrap_or_else(|| format!("{e:?}"));

    let window = web_sys::window().ok_or("no window")?;
    let clipboard = Reflect::get(&window, &"navigator".into())
        .and_then(|nav| Reflect::get(&nav, &"clipboard".into()))
        .map_err(describe)?;
    let write_text: Function = Reflect::get(&clipboard, &"writeText".into())
        .map_err(describe)?
        .dyn_into()
        .map_err(|_| "clipboard unavailable".to_string())?;
    let promise: Promise = write_text
        .call1(&clipboard, &JsValue::from_str(text))
        .map_err(describe)?
        .dyn_into()
        .map_err(|_| "clipboard unavailable".to_string())?;

    JsFuture::from(promise).await.map(|_| ()).map_err(describe)
}

/// Result panel: latest message or a placeholder, plus optional extras
#[component]
pub fn MessageView(
    message: Signal<Option<String>>,
    fallback: &'static str,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="panel message-view">
            <Show
                when=move || message.with(Option::is_some)
                fallback=move || view! { <div class="placeholder">{fallback}</div> }
            >
                <div class="message">{move || message.get().unwrap_or_default()}</div>
            </Show>
            {children()}
        </div>
    }
}

#[component]
fn TextField(state: RwSignal<CheckoutState>, field: FormField) -> impl IntoView {
    view! {
        <input
            type="text"
            class="input"
            name=field.name()
            placeholder=field.label()
            prop:value=move || state.with(|s| s.form.value(field).to_string())
            on:input=move |ev| {
                dispatch(state, CheckoutEvent::FieldChanged { field, value: event_target_value(&ev) });
            }
        />
    }
}

/// Secure-field mount points and billing inputs
///
/// The three secure slots are empty divs the vault replaces with iframes.
#[component]
pub fn CreditCardForm(state: RwSignal<CheckoutState>) -> impl IntoView {
    let select_changed = move |field: FormField| {
        move |ev| dispatch(state, CheckoutEvent::FieldChanged { field, value: event_target_value(&ev) })
    };

    view! {
        <div class="secure-fields">
            {SecureField::ALL
                .into_iter()
                .map(|f| view! { <div id=f.mount_id() class="secure-field"></div> })
                .collect_view()}
        </div>

        <Show when=move || state.with(|s| s.card_error.is_some())>
            <div class="card-error" style="white-space: pre-line">
                {move || state.with(|s| s.card_error.clone().unwrap_or_default())}
            </div>
        </Show>

        <div class="billing">
            <TextField state field=FormField::CardholderName />
            <TextField state field=FormField::AddressLine1 />
            <TextField state field=FormField::AddressLine2 />

            <div class="row">
                <TextField state field=FormField::City />

                <Show
                    when=move || state.with(|s| s.form.country == Country::US)
                    fallback=move || view! { <TextField state field=FormField::State /> }
                >
                    <select class="input" name="state" on:change=select_changed(FormField::State)>
                        <option value="" disabled=true selected=move || state.with(|s| s.form.state.is_empty())>
                            "State"
                        </option>
                        {US_STATES
                            .iter()
                            .map(|&(code, name)| {
                                view! {
                                    <option value=code selected=move || state.with(|s| s.form.state == code)>
                                        {name}
                                    </option>
                                }
                            })
                            .collect_view()}
                    </select>
                </Show>

                <TextField state field=FormField::PostalCode />

                <select class="input" name="country" on:change=select_changed(FormField::Country)>
                    {Country::ALL
                        .into_iter()
                        .map(|country| {
                            view! {
                                <option
                                    value=country.code()
                                    selected=move || state.with(|s| s.form.country == country)
                                >
                                    {country.label()}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            </div>
        </div>
    }
}
