//! base64url helpers for the binary fields of WebAuthn messages.
//!
//! The server ships challenges, user handles and credential ids as base64url
//! text; the platform credential API wants raw bytes. [`Base64UrlBytes`] keeps
//! the raw bytes in memory and only speaks base64url through serde, so a
//! field can never cross the network boundary in the wrong form.

use crate::errors::BridgeError;
use base64ct::{Base64, Base64Unpadded, Base64Url, Base64UrlUnpadded, Encoding};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, ops::Deref};

/// Encodes bytes as URL-safe base64 without padding.
#[must_use]
pub fn encode(bytes: &[u8]) -> String {
    Base64UrlUnpadded::encode_string(bytes)
}

/// Decodes base64url text, tolerating padding and the standard alphabet.
///
/// # Errors
///
/// Returns [`BridgeError::Parse`] if the input is not base64 in any of the
/// accepted variants.
pub fn decode(text: &str) -> Result<Vec<u8>, BridgeError> {
    let text = text.trim();
    Base64UrlUnpadded::decode_vec(text)
        .or_else(|_| Base64Url::decode_vec(text))
        .or_else(|_| Base64::decode_vec(text))
        .or_else(|_| Base64Unpadded::decode_vec(text))
        .map_err(|err| BridgeError::Parse(format!("Invalid base64: {err}")))
}

/// Raw bytes that serialize as base64url text.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Base64UrlBytes(Vec<u8>);

impl Base64UrlBytes {
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Deref for Base64UrlBytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<u8>> for Base64UrlBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Base64UrlBytes {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

// Debug prints the wire form; raw byte dumps are unreadable in the console.
impl fmt::Debug for Base64UrlBytes {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "Base64UrlBytes({})", encode(&self.0))
    }
}

impl Serialize for Base64UrlBytes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for Base64UrlBytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        decode(&text).map(Self).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_then_encode_round_trips_unpadded_input() {
        for text in ["", "AA", "AAE", "AAEC", "3q2-7w", "_-8", "dGVzdC1jaGFsbGVuZ2U"] {
            let bytes = decode(text).expect("valid base64url");
            assert_eq!(encode(&bytes), text);
        }
    }

    #[test]
    fn decode_accepts_padding_and_standard_alphabet() {
        assert_eq!(decode("3q2-7w==").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(decode("3q2+7w==").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(decode("3q2+7w").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = decode("not base64!").unwrap_err();
        assert_eq!(err.key(), "parse");
    }

    #[test]
    fn bytes_serialize_as_base64url_text() {
        let value = Base64UrlBytes::new(vec![0xfb, 0xff]);
        assert_eq!(serde_json::to_string(&value).unwrap(), "\"-_8\"");

        let parsed: Base64UrlBytes = serde_json::from_str("\"-_8\"").unwrap();
        assert_eq!(parsed.as_bytes(), &[0xfb, 0xff]);
    }

    #[test]
    fn debug_shows_wire_form() {
        let value = Base64UrlBytes::from(&b"hi"[..]);
        assert_eq!(format!("{value:?}"), "Base64UrlBytes(aGk)");
    }
}
