//! [`Page`] over the live document.

use crate::{config::BridgeConfig, errors::BridgeError, options::CeremonyMode, page::Page};
use std::rc::Rc;
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, Window};

/// `data-initialized` marker value.
pub const INITIALIZED: &str = "true";

pub struct DomPage {
    window: Window,
    document: Document,
    config: Rc<BridgeConfig>,
}

impl DomPage {
    /// # Errors
    ///
    /// Returns [`BridgeError::Dom`] outside a browser window.
    pub fn new(config: Rc<BridgeConfig>) -> Result<Self, BridgeError> {
        let window = web_sys::window().ok_or_else(|| BridgeError::Dom("Window not found".into()))?;
        let document = window
            .document()
            .ok_or_else(|| BridgeError::Dom("Document not found".into()))?;

        Ok(Self {
            window,
            document,
            config,
        })
    }

    /// Trigger button of the current mode, registration first.
    #[must_use]
    pub fn trigger_button(&self) -> Option<HtmlElement> {
        self.trigger_element().map(|(_, button)| button)
    }

    fn trigger_element(&self) -> Option<(CeremonyMode, HtmlElement)> {
        let candidates = [
            (CeremonyMode::Registration, &self.config.register_button_id),
            (CeremonyMode::Authentication, &self.config.authenticate_button_id),
        ];

        candidates.into_iter().find_map(|(mode, id)| {
            self.document
                .get_element_by_id(id)
                .and_then(|element| element.dyn_into::<HtmlElement>().ok())
                .map(|button| (mode, button))
        })
    }

    fn element(&self, id: &str) -> Option<Element> {
        let element = self.document.get_element_by_id(id);
        if element.is_none() {
            debug!(%id, "Element not found");
        }
        element
    }

    fn set_hidden(&self, element: &Element, hidden: bool) {
        let classes = element.class_list();
        let result = if hidden {
            classes.add_1(&self.config.hidden_class)
        } else {
            classes.remove_1(&self.config.hidden_class)
        };
        if let Err(err) = result {
            warn!("Failed to toggle visibility: {err:?}");
        }
    }

    fn hide_all_errors(&self) {
        let selector = format!(".{}", self.config.error_class);
        let Ok(nodes) = self.document.query_selector_all(&selector) else {
            warn!(%selector, "Invalid error selector");
            return;
        };

        for index in 0..nodes.length() {
            if let Some(element) = nodes
                .get(index)
                .and_then(|node| node.dyn_into::<Element>().ok())
            {
                self.set_hidden(&element, true);
            }
        }
    }
}

impl Page for DomPage {
    fn trigger(&self) -> Option<CeremonyMode> {
        self.trigger_element().map(|(mode, _)| mode)
    }

    fn claim_trigger(&self) -> bool {
        let Some(button) = self.trigger_button() else {
            return false;
        };
        let dataset = button.dataset();
        if dataset.get("initialized").as_deref() == Some(INITIALIZED) {
            return false;
        }
        dataset.set("initialized", INITIALIZED).is_ok()
    }

    fn options_json(&self) -> Option<String> {
        let element = self.element(&self.config.options_input_id)?;
        match element.dyn_into::<HtmlInputElement>() {
            Ok(input) => Some(input.value()),
            Err(element) => element.text_content(),
        }
    }

    fn clear_errors(&self) {
        self.hide_all_errors();
        if let Some(message) = self.element(&self.config.message_id) {
            self.set_hidden(&message, false);
        }
    }

    fn hide_messages(&self) {
        self.hide_all_errors();
        if let Some(message) = self.element(&self.config.message_id) {
            self.set_hidden(&message, true);
        }
    }

    fn reveal_error(&self, key: &str) -> bool {
        if key.is_empty() {
            return false;
        }
        match self.document.get_element_by_id(key) {
            Some(element) => {
                self.set_hidden(&element, false);
                true
            }
            None => false,
        }
    }

    fn show_generic_error(&self, message: &str) {
        if let Some(text) = self.element(&self.config.error_message_id) {
            text.set_text_content(Some(message));
        }
        match self.element(&self.config.error_id) {
            Some(area) => self.set_hidden(&area, false),
            None => warn!(%message, "No error area to show the message in"),
        }
    }

    fn set_busy(&self, busy: bool) {
        let Some(button) = self.trigger_button() else {
            return;
        };

        let disabled = if busy {
            button.set_attribute("disabled", "")
        } else {
            button.remove_attribute("disabled")
        };
        let classes = button.class_list();
        let loading = if busy {
            classes.add_1(&self.config.busy_class)
        } else {
            classes.remove_1(&self.config.busy_class)
        };
        if let Err(err) = disabled.and(loading) {
            warn!("Failed to update trigger state: {err:?}");
        }
    }

    fn location(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }

    fn navigate(&self, target: &str) {
        if let Err(err) = self.window.location().set_href(target) {
            warn!(%target, "Navigation failed: {err:?}");
        }
    }
}
