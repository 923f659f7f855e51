//! Browser-side WebAuthn ceremony bridge.
//!
//! ## Ceremony
//!
//! A server-rendered page carries the ceremony options in a hidden input and
//! a trigger button whose id says whether the user is registering a security
//! key or authenticating with one.
//!
//! 1. **Setup:** on load (and after every htmx fragment swap) the trigger is
//!    claimed once and the options are decoded from base64url into raw bytes.
//! 2. **Run:** activating the trigger calls `navigator.credentials.create` or
//!    `.get`, re-encodes the credential to base64url and `POST`s it to the
//!    page URL.
//! 3. **Finish:** the server answers `{success, redirect}` or `{error}`; the
//!    page follows the redirect or shows the error and re-enables the button.
//!
//! While waiting for the user, fast keystroke bursts are reported as a
//! security key typing an OTP into the page.
//!
//! The ceremony logic is platform independent and talks to the browser through
//! [`Page`], [`Authenticator`] and [`Transport`]. The `web` module, compiled
//! only for `wasm32`, implements them with `web_sys` and wires the page
//! widgets.

pub mod authenticator;
#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}
pub mod ceremony;
pub mod codec;
pub mod config;
pub mod credential;
pub mod errors;
pub mod options;
pub mod otp;
pub mod page;
pub mod reply;
pub mod transport;
#[cfg(target_arch = "wasm32")]
pub mod web;
pub mod widgets;

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub use authenticator::{Authenticator, PlatformError};
pub use ceremony::{Ceremony, Outcome, Setup};
pub use config::BridgeConfig;
pub use credential::CeremonyPayload;
pub use errors::BridgeError;
pub use options::{CeremonyMode, CeremonyOptions};
pub use page::Page;
pub use reply::ServerReply;
pub use transport::Transport;
