//! DOM wiring for the page widgets. Each element is bound once, even when
//! htmx re-runs the load hook over the same nodes.

use super::dom::INITIALIZED;
use crate::widgets::{
    countdown::ResendIcon, forces_error_swap, is_style_attribute, parse_inline_style,
    resend_delay_ms, toggle_activates, PasswordVisibility, PhotoState,
};
use gloo_events::{EventListener, EventListenerOptions};
use gloo_timers::callback::Timeout;
use js_sys::{Array, Function, Object, Promise, Proxy, Reflect};
use tracing::{debug, warn};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    Document, Element, EventTarget, HtmlDocument, HtmlElement, HtmlInputElement,
    HtmlMediaElement, KeyboardEvent, Url,
};

const PASSWORD_TOGGLE: &str = ".toggle-password-visibility";
const COPY_BUTTON: &str = ".copy-button";
const COPY_TEXT: &str = ".copy-text";
const CAPTCHA_AUDIO: &str = ".captcha-audio-button";
const RESEND_BUTTON: &str = "resend-button";
const RESEND_ICON: &str = "resend-icon";
const PHOTO_DELETE_ICON: &str = ".photo-delete-icon";
const PHOTO_FIELD: &str = ".photo-field";
const PHOTO_CONTENT: &str = ".photo-content";
const PHOTO_PLACEHOLDER: &str = ".photo-placeholder";
const PHOTO_PREVIEW: &str = ".photo-content img";
const PHOTO_DELETE_CHECKBOX: &str = ".photo-delete-button";

pub fn bind_all(document: &Document) {
    for toggle in unbound(document, PASSWORD_TOGGLE) {
        bind_password_toggle(&toggle);
    }
    for button in unbound(document, COPY_BUTTON) {
        EventListener::new(&button, "click", |event| copy_from(event.target())).forget();
    }
    for text in unbound(document, COPY_TEXT) {
        EventListener::new(&text, "focus", |event| copy_from(event.target())).forget();
    }
    for button in unbound(document, CAPTCHA_AUDIO) {
        bind_captcha_audio(&button);
    }
    for icon in unbound(document, PHOTO_DELETE_ICON) {
        let document = document.clone();
        EventListener::new_with_options(
            &icon,
            "click",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                event.prevent_default();
                show_photo_state(&document, PhotoState::Removed);
            },
        )
        .forget();
    }
    for field in unbound(document, PHOTO_FIELD) {
        let document = document.clone();
        EventListener::new(&field, "change", move |event| {
            preview_photo(&document, event.target());
        })
        .forget();
    }
    bind_resend_countdown(document);
}

/// Lets htmx swap in the error pages the server renders for 4xx/5xx.
/// Bound once per document; the event bubbles up from every request.
pub fn bind_error_swaps(document: &Document) {
    EventListener::new(document, "htmx:beforeOnLoad", |event| {
        let Ok(detail) = Reflect::get(event, &JsValue::from_str("detail")) else {
            return;
        };
        let status = Reflect::get(&detail, &JsValue::from_str("xhr"))
            .and_then(|xhr| Reflect::get(&xhr, &JsValue::from_str("status")))
            .ok()
            .and_then(|status| status.as_f64());
        if !status.is_some_and(forces_error_swap) {
            return;
        }

        let result = Reflect::set(&detail, &JsValue::from_str("shouldSwap"), &JsValue::TRUE)
            .and_then(|_| Reflect::set(&detail, &JsValue::from_str("isError"), &JsValue::FALSE));
        if let Err(err) = result {
            warn!("Failed to swap error response: {err:?}");
        }
    })
    .forget();
}

fn elements(document: &Document, selector: &str) -> Vec<HtmlElement> {
    let Ok(nodes) = document.query_selector_all(selector) else {
        warn!(%selector, "Invalid widget selector");
        return Vec::new();
    };

    (0..nodes.length())
        .filter_map(|index| nodes.get(index))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

/// Elements matching `selector` that were not bound yet; they are marked now.
fn unbound(document: &Document, selector: &str) -> Vec<HtmlElement> {
    elements(document, selector)
        .into_iter()
        .filter(claim)
        .collect()
}

fn claim(element: &HtmlElement) -> bool {
    let dataset = element.dataset();
    if dataset.get("initialized").as_deref() == Some(INITIALIZED) {
        return false;
    }
    dataset.set("initialized", INITIALIZED).is_ok()
}

fn bind_password_toggle(icon: &HtmlElement) {
    let clicked = icon.clone();
    EventListener::new(icon, "click", move |_| toggle_password(&clicked)).forget();

    let pressed = icon.clone();
    EventListener::new_with_options(
        icon,
        "keydown",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if toggle_activates(&event.key()) {
                event.prevent_default();
                toggle_password(&pressed);
            }
        },
    )
    .forget();
}

fn toggle_password(icon: &HtmlElement) {
    let Some(input) = icon
        .parent_element()
        .and_then(|parent| {
            parent
                .query_selector(r#"input[type="password"], input[type="text"]"#)
                .ok()
                .flatten()
        })
    else {
        debug!("Password toggle without a sibling input");
        return;
    };

    let current = input.get_attribute("type").unwrap_or_default();
    let next = PasswordVisibility::from_input_type(&current).toggled();
    let (add, remove) = next.icon_classes();
    let classes = icon.class_list();

    let result = input
        .set_attribute("type", next.input_type())
        .and_then(|()| remove.iter().try_for_each(|class| classes.remove_1(class)))
        .and_then(|()| add.iter().try_for_each(|class| classes.add_1(class)));
    if let Err(err) = result {
        warn!("Failed to toggle password visibility: {err:?}");
    }
}

/// Selects the input named by `data-copy` and copies its value.
fn copy_from(target: Option<EventTarget>) {
    let Some(source) = target.and_then(|target| target.dyn_into::<HtmlElement>().ok()) else {
        return;
    };
    let Some(input_id) = source.dataset().get("copy") else {
        debug!("Copy widget without data-copy");
        return;
    };
    let Some(document) = source.owner_document() else {
        return;
    };
    let Some(input) = document
        .get_element_by_id(&input_id)
        .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
    else {
        warn!(%input_id, "Copy target not found");
        return;
    };

    input.select();
    let text = input.value();
    spawn_local(async move {
        if let Err(err) = write_clipboard(&text).await {
            debug!("Clipboard API unavailable, falling back to execCommand: {err:?}");
            exec_copy(&document);
        }
    });
}

async fn write_clipboard(text: &str) -> Result<JsValue, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Window not found"))?;
    let clipboard = Reflect::get(&window.navigator(), &JsValue::from_str("clipboard"))?;
    if clipboard.is_undefined() || clipboard.is_null() {
        return Err(JsValue::from_str("navigator.clipboard is undefined"));
    }
    let write_text: Function = Reflect::get(&clipboard, &JsValue::from_str("writeText"))?.dyn_into()?;
    let promise: Promise = write_text
        .call1(&clipboard, &JsValue::from_str(text))?
        .dyn_into()?;
    JsFuture::from(promise).await
}

fn exec_copy(document: &Document) {
    let copied = document
        .dyn_ref::<HtmlDocument>()
        .map(|document| document.exec_command("copy"));
    if !matches!(copied, Some(Ok(true))) {
        warn!("Copy to clipboard failed");
    }
}

fn bind_captcha_audio(button: &HtmlElement) {
    let clicked = button.clone();
    EventListener::new(button, "click", move |_| {
        let Some(audio_id) = clicked.dataset().get("audioId") else {
            return;
        };
        let audio = clicked
            .owner_document()
            .and_then(|document| document.get_element_by_id(&audio_id))
            .and_then(|element| element.dyn_into::<HtmlMediaElement>().ok());
        if let Some(audio) = audio {
            if let Err(err) = audio.play() {
                warn!(%audio_id, "Captcha audio failed: {err:?}");
            }
        }
    })
    .forget();
}

/// Re-enables the resend button once its `data-delay` has passed.
fn bind_resend_countdown(document: &Document) {
    let Some(button) = document
        .get_element_by_id(RESEND_BUTTON)
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };
    if !claim(&button) {
        return;
    }
    let Some(delay) = resend_delay_ms(button.dataset().get("delay").as_deref()) else {
        return;
    };
    let icon = document.get_element_by_id(RESEND_ICON);

    debug!(delay, "Resend button armed");
    Timeout::new(delay, move || enable_resend(&button, icon.as_ref())).forget();
}

fn enable_resend(button: &HtmlElement, icon: Option<&Element>) {
    let mut result = button.class_list().remove_1("disabled");
    if let Some(icon) = icon {
        let classes = icon.class_list();
        result = result
            .and_then(|()| {
                ResendIcon::remove()
                    .iter()
                    .try_for_each(|class| classes.remove_1(class))
            })
            .and_then(|()| classes.add_1(ResendIcon::add()));
    }
    if let Err(err) = result {
        warn!("Failed to enable resend button: {err:?}");
    }
}

fn preview_photo(document: &Document, target: Option<EventTarget>) {
    let file = target
        .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
        .and_then(|input| input.files())
        .and_then(|files| files.get(0));
    let Some(state) = PhotoState::after_change(file.is_some()) else {
        debug!("Photo field cleared");
        return;
    };

    if let Some(file) = file {
        match Url::create_object_url_with_blob(&file) {
            Ok(upload) => {
                for image in elements(document, PHOTO_PREVIEW) {
                    if let Err(err) = image.set_attribute("src", &upload) {
                        warn!("Failed to set photo preview: {err:?}");
                    }
                }
            }
            Err(err) => warn!("Failed to read picked photo: {err:?}"),
        }
    }
    show_photo_state(document, state);
}

fn show_photo_state(document: &Document, state: PhotoState) {
    for content in elements(document, PHOTO_CONTENT) {
        set_displayed(&content, state.content_visible());
    }
    for placeholder in elements(document, PHOTO_PLACEHOLDER) {
        set_displayed(&placeholder, state.placeholder_visible());
    }
    let inputs = |selector| {
        elements(document, selector)
            .into_iter()
            .filter_map(|element| element.dyn_into::<HtmlInputElement>().ok())
    };
    if state.clears_field() {
        for field in inputs(PHOTO_FIELD) {
            field.set_value("");
        }
    }
    for checkbox in inputs(PHOTO_DELETE_CHECKBOX) {
        checkbox.set_checked(state.delete_checked());
    }
}

fn set_displayed(element: &HtmlElement, displayed: bool) {
    let style = element.style();
    let result = if displayed {
        style.remove_property("display").map(drop)
    } else {
        style.set_property("display", "none")
    };
    if let Err(err) = result {
        warn!("Failed to toggle photo element: {err:?}");
    }
}

/// Applies `style` declaration by declaration through the CSSOM, which a
/// strict Content-Security-Policy allows where a `style` attribute is not.
pub fn apply_inline_style(element: &HtmlElement, style: &str) {
    assign_declarations(&element.style(), style);
}

fn assign_declarations(declarations: &JsValue, style: &str) {
    for (property, value) in parse_inline_style(style) {
        if let Err(err) = Reflect::set(
            declarations,
            &JsValue::from_str(&property),
            &JsValue::from_str(&value),
        ) {
            warn!(%property, "Failed to apply style: {err:?}");
        }
    }
}

/// Wraps `Element.prototype.setAttribute` so `style` writes from other
/// scripts are applied through the CSSOM. Other attributes reach the
/// original method unchanged.
///
/// # Errors
///
/// Returns the JS exception if the prototype cannot be read or patched.
pub fn install_style_shim() -> Result<(), JsValue> {
    let element = Reflect::get(&js_sys::global(), &JsValue::from_str("Element"))?;
    let prototype = Reflect::get(&element, &JsValue::from_str("prototype"))?;
    let original: Function =
        Reflect::get(&prototype, &JsValue::from_str("setAttribute"))?.dyn_into()?;

    let apply = Closure::<dyn Fn(Function, JsValue, Array) -> Result<JsValue, JsValue>>::new(
        |target: Function, this: JsValue, args: Array| {
            let name = args.get(0).as_string().unwrap_or_default();
            if is_style_attribute(&name) {
                let declarations = Reflect::get(&this, &JsValue::from_str("style"))?;
                if let (true, Some(style)) = (declarations.is_object(), args.get(1).as_string()) {
                    assign_declarations(&declarations, &style);
                    return Ok(JsValue::UNDEFINED);
                }
            }
            Reflect::apply(&target, &this, &args)
        },
    );

    let handler = Object::new();
    Reflect::set(&handler, &JsValue::from_str("apply"), apply.as_ref())?;
    apply.forget();

    let proxy = Proxy::new(&original, &handler);
    Reflect::set(&prototype, &JsValue::from_str("setAttribute"), &proxy)?;
    debug!("setAttribute style shim installed");
    Ok(())
}
