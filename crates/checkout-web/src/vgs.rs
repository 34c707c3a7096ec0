//! VGS Collect
//!
//! wasm-bindgen bindings to the VGS Collect.js SDK and the [`SecureVault`]
//! implementation over them. The SDK script is injected on first load.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use serde::Serialize;
use serde_json::{Value, json};
use wasm_bindgen::{JsCast, JsValue, closure::Closure, prelude::wasm_bindgen};
use web_sys::js_sys::{Object, Reflect};

use checkout_core::{
    CheckoutError, Result, SecureField, SecureFields, SecureVault, VaultConfig, VaultOutcome,
};

#[wasm_bindgen]
extern "C" {
    /// Form handle returned by `VGSCollect.create`
    #[derive(Debug, Clone)]
    pub type JsVgsForm;

    /// `VGSCollect.create(vaultId, environment, stateCallback)`
    #[wasm_bindgen(catch, js_namespace = VGSCollect, js_name = create)]
    fn create_form(
        vault_id: &str,
        environment: &str,
        on_state: &JsValue,
    ) -> std::result::Result<JsVgsForm, JsValue>;

    #[wasm_bindgen(method, js_name = useCname)]
    fn use_cname(this: &JsVgsForm, cname: &str);

    #[wasm_bindgen(method, js_name = connectSatellite)]
    fn connect_satellite(this: &JsVgsForm, port: u16);

    /// `form.field(selector, options)` renders a secure iframe
    #[wasm_bindgen(method, catch)]
    fn field(this: &JsVgsForm, selector: &str, options: JsValue) -> std::result::Result<JsValue, JsValue>;

    /// `form.submit(path, options, onResponse(status, data), onError(errors))`
    #[wasm_bindgen(method, catch)]
    fn submit(
        this: &JsVgsForm,
        path: &str,
        options: &JsValue,
        on_response: &JsValue,
        on_error: &JsValue,
    ) -> std::result::Result<(), JsValue>;
}

/// Options passed to `form.field`
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct FieldOptions {
    #[serde(rename = "type")]
    field_type: &'static str,
    name: &'static str,
    placeholder: &'static str,
    validations: &'static [&'static str],
    auto_complete: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    year_length: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    show_card_icon: Option<Value>,
    css: Value,
    classes: Value,
}

fn field_css(padding_left: Option<&str>) -> Value {
    let mut css = json!({
        "fontFamily": "-apple-system, BlinkMacSystemFont, \"Helvetica Neue\", Helvetica",
        "boxSizing": "border-box",
        "lineHeight": "1.5em",
        "fontSize": "16px",
        "border": "none",
        "color": "#31325F",
        "width": "100%",
        "height": "48px",
        "&::placeholder": { "color": "#94a3b8" },
        "&.invalid.touched": { "color": "rgb(201, 31, 36)" }
    });
    if let Some(padding) = padding_left {
        css["paddingLeft"] = json!(padding);
    }
    css
}

fn field_options(field: SecureField) -> FieldOptions {
    let classes = json!({
        "focused": "SecureField--focused",
        "valid": "SecureField--valid",
    });

    match field {
        SecureField::CardNumber => FieldOptions {
            field_type: "card-number",
            name: field.vault_name(),
            placeholder: "Card Number",
            validations: &["required", "validCardNumber"],
            auto_complete: "cc-card",
            year_length: None,
            show_card_icon: Some(json!({ "left": "10px" })),
            css: field_css(Some("50px")),
            classes,
        },
        SecureField::CardExpiration => FieldOptions {
            field_type: "card-expiration-date",
            name: field.vault_name(),
            placeholder: "MM/YY",
            validations: &["validCardExpirationDate"],
            auto_complete: "cc-exp",
            year_length: Some("2"),
            show_card_icon: None,
            css: field_css(None),
            classes,
        },
        SecureField::CardCvc => FieldOptions {
            field_type: "card-security-code",
            name: field.vault_name(),
            placeholder: "CVC",
            validations: &["required", "validCardSecurityCode"],
            auto_complete: "cc-csc",
            year_length: None,
            show_card_icon: None,
            css: field_css(None),
            classes,
        },
    }
}

/// Vault backed by VGS Collect.js
pub struct VgsVault {
    config: VaultConfig,
    form: RefCell<Option<JsVgsForm>>,
}

impl VgsVault {
    pub const fn new(config: VaultConfig) -> Self {
        Self {
            config,
            form: RefCell::new(None),
        }
    }

    fn form(&self) -> Result<JsVgsForm> {
        self.form.borrow().clone().ok_or(CheckoutError::NotReady)
    }
}

/// Secure fields wired to VGS Collect
pub fn secure_fields(config: VaultConfig) -> SecureFields<VgsVault> {
    SecureFields::new(VgsVault::new(config))
}

#[async_trait(?Send)]
impl SecureVault for VgsVault {
    async fn load(&self) -> Result<()> {
        load_script(&self.config.script_url()).await?;

        let on_state = Closure::<dyn FnMut(JsValue)>::new(|_state: JsValue| {}).into_js_value();
        let form = create_form(
            &self.config.vault_id,
            self.config.environment.as_str(),
            &on_state,
        )
        .map_err(|e| CheckoutError::VaultUnavailable(js_message(&e)))?;

        if let Some(cname) = &self.config.cname {
            form.use_cname(cname);
        }
        if let Some(port) = self.config.satellite_port {
            leptos::logging::log!("Connecting VGS satellite on port {}", port);
            form.connect_satellite(port);
        }

        self.form.replace(Some(form));
        Ok(())
    }

    fn mount_point_present(&self, field: SecureField) -> bool {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.query_selector(field.selector()).ok().flatten())
            .is_some()
    }

    fn bind(&self, field: SecureField) -> Result<()> {
        let options = field_options(field)
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| CheckoutError::VaultUnavailable(e.to_string()))?;

        self.form()?
            .field(field.selector(), options)
            .map(|_| ())
            .map_err(|e| CheckoutError::VaultUnavailable(js_message(&e)))
    }

    async fn submit(&self, path: &str) -> Result<VaultOutcome> {
        let form = self.form()?;

        let (tx, rx) = oneshot::channel::<std::result::Result<JsValue, JsValue>>();
        let tx = Rc::new(RefCell::new(Some(tx)));

        let on_response = {
            let tx = tx.clone();
            Closure::once_into_js(move |_status: JsValue, data: JsValue| settle(&tx, Ok(data)))
        };
        let on_error = Closure::once_into_js(move |errors: JsValue| settle(&tx, Err(errors)));

        form.submit(path, &Object::new().into(), &on_response, &on_error)
            .map_err(|e| CheckoutError::TokenizationTransport(js_message(&e)))?;

        match rx.await {
            Ok(Ok(data)) => Ok(VaultOutcome::Accepted(to_json(data))),
            Ok(Err(errors)) => Ok(VaultOutcome::Rejected(to_json(errors))),
            Err(_) => Err(CheckoutError::TokenizationTransport("An error occurred.".into())),
        }
    }
}

type Pending<T> = Rc<RefCell<Option<oneshot::Sender<T>>>>;

fn settle<T>(tx: &Pending<T>, value: T) {
    if let Some(tx) = tx.borrow_mut().take() {
        let _ = tx.send(value);
    }
}

fn to_json(value: JsValue) -> Value {
    serde_wasm_bindgen::from_value(value).unwrap_or(Value::Null)
}

fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Inject the SDK script unless `window.VGSCollect` already exists
async fn load_script(src: &str) -> Result<()> {
    let unavailable = |msg: String| CheckoutError::VaultUnavailable(msg);

    let window = web_sys::window().ok_or_else(|| unavailable("no window".into()))?;
    if Reflect::has(&window, &JsValue::from_str("VGSCollect")).unwrap_or(false) {
        return Ok(());
    }

    let document = window.document().ok_or_else(|| unavailable("no document".into()))?;
    let script: web_sys::HtmlScriptElement = document
        .create_element("script")
        .map_err(|e| unavailable(js_message(&e)))?
        .dyn_into()
        .map_err(|_| unavailable("script element".into()))?;
    script.set_src(src);
    script.set_async(true);

    let (tx, rx) = oneshot::channel::<bool>();
    let tx: Pending<bool> = Rc::new(RefCell::new(Some(tx)));
    let on_load = {
        let tx = tx.clone();
        Closure::once_into_js(move || settle(&tx, true))
    };
    let on_error = Closure::once_into_js(move || settle(&tx, false));
    script.set_onload(Some(on_load.unchecked_ref()));
    script.set_onerror(Some(on_error.unchecked_ref()));

    document
        .head()
        .ok_or_else(|| unavailable("no document head".into()))?
        .append_child(&script)
        .map_err(|e| unavailable(js_message(&e)))?;

    match rx.await {
        Ok(true) => Ok(()),
        _ => Err(unavailable(format!("could not load {src}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_options_follow_vault_names() {
        for field in SecureField::ALL {
            let options = serde_json::to_value(field_options(field)).unwrap();
            assert_eq!(options["name"], field.vault_name());
        }
    }

    #[test]
    fn test_expiry_uses_two_digit_year() {
        let options = serde_json::to_value(field_options(SecureField::CardExpiration)).unwrap();
        assert_eq!(options["type"], "card-expiration-date");
        assert_eq!(options["yearLength"], "2");
        assert!(options.get("showCardIcon").is_none());
    }

    #[test]
    fn test_card_number_icon_padding() {
        let options = serde_json::to_value(field_options(SecureField::CardNumber)).unwrap();
        assert_eq!(options["css"]["paddingLeft"], "50px");
        assert_eq!(options["autoComplete"], "cc-card");
        assert_eq!(options["validations"], json!(["required", "validCardNumber"]));
    }
}
