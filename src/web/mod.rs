//! Browser entry point.
//!
//! Runs the load hook once the document is parsed and again for every
//! `htmx:load`, since htmx swaps fragments in without a full page load. The
//! hook sets up the ceremony (if the page offers one) and binds the widgets.

mod dom;
mod http;
mod logging;
mod navigator;
mod widgets;

pub use dom::DomPage;
pub use http::FetchTransport;
pub use navigator::BrowserAuthenticator;

use crate::{
    ceremony::{Ceremony, Setup},
    config::BridgeConfig,
    errors::BridgeError,
};
use gloo_events::{EventListener, EventListenerOptions};
use std::{cell::RefCell, rc::Rc};
use tracing::{debug, error, info, warn};
use wasm_bindgen::{prelude::wasm_bindgen, JsCast};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, HtmlElement, KeyboardEvent};

type BrowserCeremony = Ceremony<DomPage, BrowserAuthenticator, FetchTransport>;

/// Listeners of the current ceremony. Replacing the session drops the
/// previous listeners, so a swapped-out ceremony stops reacting.
struct Session {
    _keydown: EventListener,
    _click: EventListener,
}

thread_local! {
    static SESSION: RefCell<Option<Session>> = const { RefCell::new(None) };
}

#[cfg(test)]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let config = Rc::new(BridgeConfig::load());
    logging::init(&config);
    info!(
        version = env!("CARGO_PKG_VERSION"),
        commit = crate::GIT_COMMIT_HASH,
        "webauthn-bridge loaded"
    );

    if let Err(err) = widgets::install_style_shim() {
        warn!("Inline style shim not installed: {err:?}");
    }

    if let Err(err) = boot(config) {
        error!("Failed to start: {err}");
    }
}

/// Re-runs the load hook; for pages that replace content without htmx.
#[wasm_bindgen]
pub fn refresh() {
    on_load(&Rc::new(BridgeConfig::load()));
}

/// Applies a `style` string through the CSSOM (strict CSP compatible).
#[wasm_bindgen(js_name = applyInlineStyle)]
pub fn apply_inline_style(element: &HtmlElement, style: &str) {
    widgets::apply_inline_style(element, style);
}

fn boot(config: Rc<BridgeConfig>) -> Result<(), BridgeError> {
    let document = document()?;

    let on_swap = Rc::clone(&config);
    EventListener::new(&document, "htmx:load", move |_| on_load(&on_swap)).forget();
    widgets::bind_error_swaps(&document);

    if document.ready_state() == "loading" {
        EventListener::once(&document, "DOMContentLoaded", move |_| on_load(&config)).forget();
    } else {
        on_load(&config);
    }

    Ok(())
}

fn on_load(config: &Rc<BridgeConfig>) {
    if let Err(err) = init_ceremony(config) {
        error!("WebAuthn setup failed: {err}");
    }
    match document() {
        Ok(document) => widgets::bind_all(&document),
        Err(err) => error!("Widget setup failed: {err}"),
    }
}

fn init_ceremony(config: &Rc<BridgeConfig>) -> Result<(), BridgeError> {
    let page = DomPage::new(Rc::clone(config))?;
    let transport = FetchTransport::new(config.request_timeout_ms);

    let ceremony: Rc<BrowserCeremony> =
        match Ceremony::setup(page, BrowserAuthenticator, transport) {
            Setup::Ready(ceremony) => Rc::new(ceremony),
            Setup::Skipped => return Ok(()),
            Setup::Absent => {
                end_session();
                return Ok(());
            }
            Setup::Failed(err) => {
                debug!(key = %err.key(), "Ceremony not offered");
                end_session();
                return Ok(());
            }
        };

    let button = ceremony
        .page()
        .trigger_button()
        .ok_or_else(|| BridgeError::Dom("Trigger button disappeared".into()))?;
    let document = document()?;

    let watcher = Rc::clone(&ceremony);
    let keydown = EventListener::new(&document, "keydown", move |event| {
        if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
            watcher.on_keydown(&event.key(), js_sys::Date::now());
        }
    });

    let runner = Rc::clone(&ceremony);
    let click = EventListener::new_with_options(
        &button,
        "click",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            event.prevent_default();
            let ceremony = Rc::clone(&runner);
            spawn_local(async move {
                ceremony.run().await;
            });
        },
    );

    SESSION.with(|session| {
        *session.borrow_mut() = Some(Session {
            _keydown: keydown,
            _click: click,
        });
    });

    Ok(())
}

/// Drops the listeners of a ceremony whose trigger was swapped out.
fn end_session() {
    SESSION.with(|session| {
        if session.borrow_mut().take().is_some() {
            debug!("Previous ceremony listeners removed");
        }
    });
}

fn document() -> Result<Document, BridgeError> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| BridgeError::Dom("Document not found".into()))
}
