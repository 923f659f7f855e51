//! Server-issued ceremony options.
//!
//! The options input carries the JSON form of `PublicKeyCredentialCreationOptions`
//! (registration) or `PublicKeyCredentialRequestOptions` (authentication). Only
//! the binary members are interpreted here; everything else is kept in `extra`
//! and handed to the platform untouched.

use crate::{codec::Base64UrlBytes, errors::BridgeError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Which ceremony the page offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CeremonyMode {
    Registration,
    Authentication,
}

impl fmt::Display for CeremonyMode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registration => write!(formatter, "registration"),
            Self::Authentication => write!(formatter, "authentication"),
        }
    }
}

/// `PublicKeyCredentialDescriptor` with a decoded id.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CredentialDescriptor {
    #[serde(rename = "type", default = "public_key")]
    pub kind: String,
    pub id: Base64UrlBytes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transports: Vec<String>,
}

fn public_key() -> String {
    "public-key".to_string()
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct UserEntity {
    pub id: Base64UrlBytes,
    /// `name`, `displayName` and anything else the server sends.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationOptions {
    pub challenge: Base64UrlBytes,
    pub user: UserEntity,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub exclude_credentials: Vec<CredentialDescriptor>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOptions {
    pub challenge: Base64UrlBytes,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub allow_credentials: Vec<CredentialDescriptor>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// Servers send `null` for an empty credential list.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decoded options for one ceremony.
#[derive(Clone, Debug, PartialEq)]
pub enum CeremonyOptions {
    Registration(CreationOptions),
    Authentication(RequestOptions),
}

impl CeremonyOptions {
    /// Parses the options input for the given mode.
    ///
    /// A `{"publicKey": {...}}` wrapper is accepted and unwrapped.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Parse`] for invalid JSON, missing required
    /// members, or binary members that are not base64.
    pub fn parse(mode: CeremonyMode, json: &str) -> Result<Self, BridgeError> {
        let mut value: Value = serde_json::from_str(json)?;
        if let Some(inner) = value.get_mut("publicKey").map(Value::take) {
            value = inner;
        }

        let options = match mode {
            CeremonyMode::Registration => Self::Registration(serde_json::from_value(value)?),
            CeremonyMode::Authentication => Self::Authentication(serde_json::from_value(value)?),
        };

        Ok(options)
    }

    #[must_use]
    pub fn mode(&self) -> CeremonyMode {
        match self {
            Self::Registration(_) => CeremonyMode::Registration,
            Self::Authentication(_) => CeremonyMode::Authentication,
        }
    }

    #[must_use]
    pub fn challenge(&self) -> &[u8] {
        match self {
            Self::Registration(options) => &options.challenge,
            Self::Authentication(options) => &options.challenge,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGISTRATION: &str = r#"{
        "challenge": "dGVzdC1jaGFsbGVuZ2U",
        "rp": {"name": "Example", "id": "auth.example.org"},
        "user": {"id": "dXNlci0x", "name": "alice", "displayName": "Alice"},
        "pubKeyCredParams": [{"type": "public-key", "alg": -7}],
        "timeout": 60000,
        "excludeCredentials": [{"type": "public-key", "id": "AQID", "transports": ["usb"]}]
    }"#;

    #[test]
    fn registration_decodes_binary_members() {
        let options = CeremonyOptions::parse(CeremonyMode::Registration, REGISTRATION).unwrap();
        let CeremonyOptions::Registration(options) = options else {
            panic!("expected registration options");
        };

        assert_eq!(options.challenge.as_bytes(), b"test-challenge");
        assert_eq!(options.user.id.as_bytes(), b"user-1");
        assert_eq!(options.user.extra["displayName"], "Alice");
        assert_eq!(options.exclude_credentials.len(), 1);
        assert_eq!(options.exclude_credentials[0].id.as_bytes(), &[1, 2, 3]);
        assert_eq!(options.exclude_credentials[0].transports, vec!["usb"]);
        assert_eq!(options.extra["timeout"], 60000);
        assert!(options.extra.contains_key("rp"));
        assert!(options.extra.contains_key("pubKeyCredParams"));
    }

    #[test]
    fn authentication_decodes_allow_list() {
        let json = r#"{"challenge": "AAEC", "rpId": "example.org",
            "allowCredentials": [{"id": "BAUG"}, {"type": "public-key", "id": "Bwg"}]}"#;
        let options = CeremonyOptions::parse(CeremonyMode::Authentication, json).unwrap();
        assert_eq!(options.mode(), CeremonyMode::Authentication);
        assert_eq!(options.challenge(), &[0, 1, 2]);

        let CeremonyOptions::Authentication(options) = options else {
            panic!("expected authentication options");
        };
        assert_eq!(options.allow_credentials[0].kind, "public-key");
        assert_eq!(options.allow_credentials[0].id.as_bytes(), &[4, 5, 6]);
        assert_eq!(options.allow_credentials[1].id.as_bytes(), &[7, 8]);
        assert_eq!(options.extra["rpId"], "example.org");
    }

    #[test]
    fn allow_list_is_optional() {
        let options =
            CeremonyOptions::parse(CeremonyMode::Authentication, r#"{"challenge": "AAEC"}"#)
                .unwrap();
        let CeremonyOptions::Authentication(options) = options else {
            panic!("expected authentication options");
        };
        assert!(options.allow_credentials.is_empty());
    }

    #[test]
    fn null_credential_lists_are_empty() {
        let json = r#"{"challenge": "AAEC", "allowCredentials": null}"#;
        let CeremonyOptions::Authentication(options) =
            CeremonyOptions::parse(CeremonyMode::Authentication, json).unwrap()
        else {
            panic!("expected authentication options");
        };
        assert!(options.allow_credentials.is_empty());

        let json = r#"{"challenge": "AAEC", "user": {"id": "AQID"}, "excludeCredentials": null}"#;
        let CeremonyOptions::Registration(options) =
            CeremonyOptions::parse(CeremonyMode::Registration, json).unwrap()
        else {
            panic!("expected registration options");
        };
        assert!(options.exclude_credentials.is_empty());
    }

    #[test]
    fn public_key_wrapper_is_unwrapped() {
        let json = r#"{"publicKey": {"challenge": "AAEC"}}"#;
        let options = CeremonyOptions::parse(CeremonyMode::Authentication, json).unwrap();
        assert_eq!(options.challenge(), &[0, 1, 2]);
    }

    #[test]
    fn malformed_input_is_a_parse_error() {
        for json in [
            "{not json",
            r#"{"rpId": "example.org"}"#,
            r#"{"challenge": "%%%"}"#,
        ] {
            let err = CeremonyOptions::parse(CeremonyMode::Authentication, json).unwrap_err();
            assert_eq!(err.key(), "parse", "input: {json}");
        }

        // registration requires a user handle
        let err = CeremonyOptions::parse(CeremonyMode::Registration, r#"{"challenge": "AAEC"}"#)
            .unwrap_err();
        assert_eq!(err.key(), "parse");
    }

    #[test]
    fn reserializing_restores_wire_form() {
        let options = CeremonyOptions::parse(CeremonyMode::Registration, REGISTRATION).unwrap();
        let CeremonyOptions::Registration(options) = options else {
            panic!("expected registration options");
        };
        let value = serde_json::to_value(&options).unwrap();
        assert_eq!(value["challenge"], "dGVzdC1jaGFsbGVuZ2U");
        assert_eq!(value["user"]["id"], "dXNlci0x");
        assert_eq!(value["user"]["name"], "alice");
        assert_eq!(value["excludeCredentials"][0]["id"], "AQID");
    }
}
