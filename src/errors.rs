use thiserror::Error;

/// Key shown when a failure carries no usable name.
pub const UNKNOWN_KEY: &str = "unknown";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BridgeError {
    #[error("invalid ceremony options: {0}")]
    Parse(String),
    #[error("security key appears to be typing a one-time password")]
    OtpTyping,
    #[error("platform rejected the ceremony: {message}")]
    Platform {
        name: Option<String>,
        message: String,
    },
    #[error("server rejected the credential: {0}")]
    Server(String),
    #[error("request failed: {message}")]
    Transport {
        name: Option<String>,
        message: String,
    },
    #[error("page error: {0}")]
    Dom(String),
}

impl BridgeError {
    /// Short key used to pick the error element shown to the user.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::Parse(_) => "parse".to_string(),
            Self::OtpTyping => "otp".to_string(),
            Self::Platform { name, .. } | Self::Transport { name, .. } => name_key(name.as_deref()),
            Self::Server(key) => {
                if key.trim().is_empty() {
                    UNKNOWN_KEY.to_string()
                } else {
                    key.clone()
                }
            }
            Self::Dom(_) => UNKNOWN_KEY.to_string(),
        }
    }

    /// Whether the control should be handed back to the user for a retry.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Parse(_))
    }
}

fn name_key(name: Option<&str>) -> String {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_lowercase(),
        _ => UNKNOWN_KEY.to_string(),
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_key_is_lowercased_name() {
        let err = BridgeError::Platform {
            name: Some("NotAllowedError".to_string()),
            message: "The operation either timed out or was not allowed.".to_string(),
        };
        assert_eq!(err.key(), "notallowederror");
    }

    #[test]
    fn nameless_failures_map_to_unknown() {
        let platform = BridgeError::Platform {
            name: None,
            message: "boom".to_string(),
        };
        let transport = BridgeError::Transport {
            name: Some("  ".to_string()),
            message: "boom".to_string(),
        };
        assert_eq!(platform.key(), UNKNOWN_KEY);
        assert_eq!(transport.key(), UNKNOWN_KEY);
        assert_eq!(BridgeError::Dom("no window".into()).key(), UNKNOWN_KEY);
        assert_eq!(BridgeError::Server(String::new()).key(), UNKNOWN_KEY);
    }

    #[test]
    fn server_key_is_verbatim() {
        assert_eq!(
            BridgeError::Server("invalid-signature".to_string()).key(),
            "invalid-signature"
        );
    }

    #[test]
    fn only_parse_errors_are_fatal() {
        assert!(!BridgeError::Parse("bad".into()).is_recoverable());
        assert!(BridgeError::OtpTyping.is_recoverable());
        assert!(BridgeError::Server("x".into()).is_recoverable());
    }
}
