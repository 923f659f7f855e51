//! The DOM contract of a ceremony page.
//!
//! Element ids and classes are resolved by the implementation from
//! [`BridgeConfig`](crate::config::BridgeConfig); the ceremony only speaks in
//! terms of what it needs done.

use crate::options::CeremonyMode;

pub trait Page {
    /// Mode offered by the page, from whichever trigger button is present.
    fn trigger(&self) -> Option<CeremonyMode>;

    /// Marks the trigger as initialized.
    ///
    /// Returns `false` if it already carried the marker.
    fn claim_trigger(&self) -> bool;

    /// Raw text of the options input.
    fn options_json(&self) -> Option<String>;

    /// Hides every error element and shows the instruction message.
    fn clear_errors(&self);

    /// Hides every error element and the instruction message.
    fn hide_messages(&self);

    /// Reveals the predeclared error element with this id.
    ///
    /// Returns `false` if no such element exists.
    fn reveal_error(&self, key: &str) -> bool;

    /// Shows the generic error area with literal text.
    fn show_generic_error(&self, message: &str);

    /// Disables the trigger and marks it busy, or the reverse.
    fn set_busy(&self, busy: bool);

    /// URL the credential is posted to.
    fn location(&self) -> String;

    fn navigate(&self, target: &str);
}

/// Shows an error by key: a predeclared element wins, the generic area
/// with the key as text is the fallback.
pub fn display_error<P: Page + ?Sized>(page: &P, key: &str) {
    page.hide_messages();
    if !page.reveal_error(key) {
        page.show_generic_error(key);
    }
}
