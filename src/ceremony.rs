//! One WebAuthn ceremony per page view.
//!
//! ### Flow Overview
//! 1. **Setup**: find the trigger button, claim it, and decode the options
//!    input. A bad options blob is reported as `parse` and no ceremony exists.
//! 2. **Watch**: keydowns feed the [`KeystrokeMonitor`] until the user starts
//!    the ceremony or an OTP burst is spotted.
//! 3. **Run**: call the platform, post the re-encoded credential to the page
//!    URL, and either follow the server's redirect or show its error and hand
//!    the button back.

use crate::{
    authenticator::Authenticator,
    credential::CeremonyPayload,
    errors::BridgeError,
    options::{CeremonyMode, CeremonyOptions},
    otp::KeystrokeMonitor,
    page::{display_error, Page},
    transport::Transport,
};
use std::cell::{Cell, RefCell};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Result of [`Ceremony::setup`].
pub enum Setup<P, A, T> {
    /// The page offers no ceremony.
    Absent,
    /// The trigger was already wired by an earlier load.
    Skipped,
    /// The options could not be decoded; the ceremony is not offered.
    Failed(BridgeError),
    Ready(Ceremony<P, A, T>),
}

/// Result of [`Ceremony::run`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The server accepted the credential; the page is navigating away.
    Redirected(String),
    /// The attempt failed and the trigger is usable again.
    Failed(BridgeError),
    /// A ceremony was already in flight.
    Ignored,
}

pub struct Ceremony<P, A, T> {
    options: CeremonyOptions,
    page: P,
    authenticator: A,
    transport: T,
    monitor: RefCell<KeystrokeMonitor>,
    in_flight: Cell<bool>,
}

impl<P, A, T> Ceremony<P, A, T>
where
    P: Page,
    A: Authenticator,
    T: Transport,
{
    pub fn setup(page: P, authenticator: A, transport: T) -> Setup<P, A, T> {
        let Some(mode) = page.trigger() else {
            debug!("No WebAuthn trigger on this page");
            return Setup::Absent;
        };

        if !page.claim_trigger() {
            debug!(%mode, "WebAuthn trigger already initialized");
            return Setup::Skipped;
        }

        let options = page
            .options_json()
            .ok_or_else(|| BridgeError::Parse("options input not found".to_string()))
            .and_then(|json| CeremonyOptions::parse(mode, &json));

        let options = match options {
            Ok(options) => options,
            Err(err) => {
                error!(%mode, "Failed to decode WebAuthn options: {err}");
                display_error(&page, &err.key());
                return Setup::Failed(err);
            }
        };

        info!(%mode, "WebAuthn ceremony ready");

        Setup::Ready(Self {
            options,
            page,
            authenticator,
            transport,
            monitor: RefCell::new(KeystrokeMonitor::new()),
            in_flight: Cell::new(false),
        })
    }

    #[must_use]
    pub fn mode(&self) -> CeremonyMode {
        self.options.mode()
    }

    #[must_use]
    pub fn page(&self) -> &P {
        &self.page
    }

    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.get()
    }

    /// Feeds a keydown to the OTP heuristic; returns `true` if it warned.
    pub fn on_keydown(&self, key: &str, now_ms: f64) -> bool {
        let fired = self.monitor.borrow_mut().record(key, now_ms);
        if fired {
            warn!("Keystroke burst detected, security key is probably in OTP mode");
            display_error(&self.page, &BridgeError::OtpTyping.key());
        }
        fired
    }

    /// Runs the ceremony. Activations while one is in flight are ignored.
    #[instrument(skip(self), fields(mode = %self.mode()))]
    pub async fn run(&self) -> Outcome {
        if self.in_flight.replace(true) {
            debug!("Ceremony already in flight");
            return Outcome::Ignored;
        }

        self.page.clear_errors();
        self.monitor.borrow_mut().disable();
        self.page.set_busy(true);

        match self.perform().await {
            Ok(target) => {
                info!(%target, "Ceremony accepted, redirecting");
                self.page.navigate(&target);
                Outcome::Redirected(target)
            }
            Err(err) => {
                warn!(key = %err.key(), "Ceremony failed: {err}");
                display_error(&self.page, &err.key());
                self.page.set_busy(false);
                self.in_flight.set(false);
                Outcome::Failed(err)
            }
        }
    }

    async fn perform(&self) -> Result<String, BridgeError> {
        let payload = match &self.options {
            CeremonyOptions::Registration(options) => {
                CeremonyPayload::from(self.authenticator.create(options).await?)
            }
            CeremonyOptions::Authentication(options) => {
                CeremonyPayload::from(self.authenticator.get(options).await?)
            }
        };

        let location = self.page.location();
        debug!(%location, "Submitting credential");
        let reply = self.transport.submit(&location, &payload).await?;

        match reply.redirect_target() {
            Some(target) => Ok(resolve_redirect(&location, target)),
            None => Err(BridgeError::Server(reply.error.unwrap_or_default())),
        }
    }
}

/// Resolves `target` against the page URL; opaque bases keep the target as-is.
fn resolve_redirect(location: &str, target: &str) -> String {
    Url::parse(location)
        .and_then(|base| base.join(target))
        .map_or_else(|_| target.to_string(), String::from)
}

#[cfg(test)]
mod tests {
    use super::resolve_redirect;

    #[test]
    fn redirect_resolves_against_page_url() {
        assert_eq!(
            resolve_redirect("https://auth.example.org/webauthn/login?next=1", "/done"),
            "https://auth.example.org/done"
        );
        assert_eq!(
            resolve_redirect("https://auth.example.org/webauthn/login", "https://other.org/x"),
            "https://other.org/x"
        );
    }

    #[test]
    fn unparseable_location_keeps_target() {
        assert_eq!(resolve_redirect("/webauthn/login", "/done"), "/done");
    }
}
