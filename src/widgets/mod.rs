//! Small page behaviors shipped alongside the ceremony bridge.
//!
//! Only the decisions live here; the `web` module binds them to DOM events.

pub mod countdown;
pub mod password;
pub mod photo;
pub mod style;
pub mod swap;

pub use countdown::{resend_delay_ms, ResendIcon};
pub use password::{toggle_activates, PasswordVisibility};
pub use photo::PhotoState;
pub use style::{camelize, is_style_attribute, parse_inline_style};
pub use swap::forces_error_swap;
