//! Checkout store

use leptos::prelude::*;

use checkout_core::{CheckoutEvent, CheckoutState};

/// Replace the page state with its successor for `event`
pub fn dispatch(state: RwSignal<CheckoutState>, event: CheckoutEvent) {
    state.update(|s| *s = std::mem::take(s).apply(event));
}
