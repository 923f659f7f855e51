//! The platform credential API.

use crate::{
    credential::{AuthenticationCredential, RegistrationCredential},
    errors::BridgeError,
    options::{CreationOptions, RequestOptions},
};
use std::fmt;

/// A rejected platform call (`DOMException` in the browser).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlatformError {
    pub name: Option<String>,
    pub message: String,
}

impl PlatformError {
    #[must_use]
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn unnamed(message: impl Into<String>) -> Self {
        Self {
            name: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for PlatformError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(formatter, "{name}: {}", self.message),
            None => write!(formatter, "{}", self.message),
        }
    }
}

impl From<PlatformError> for BridgeError {
    fn from(err: PlatformError) -> Self {
        Self::Platform {
            name: err.name,
            message: err.message,
        }
    }
}

/// `navigator.credentials`, or anything standing in for it.
///
/// Both calls suspend until the user finishes the out-of-band interaction
/// or the platform gives up; cancellation surfaces as an error.
#[allow(async_fn_in_trait)]
pub trait Authenticator {
    async fn create(&self, options: &CreationOptions)
        -> Result<RegistrationCredential, PlatformError>;

    async fn get(&self, options: &RequestOptions)
        -> Result<AuthenticationCredential, PlatformError>;
}
