//! Credentials returned by the platform and the payload posted back.

use crate::codec::Base64UrlBytes;
use serde::Serialize;

/// Attestation returned by `navigator.credentials.create`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttestationResponse {
    pub attestation_object: Vec<u8>,
    pub client_data_json: Vec<u8>,
    /// Empty when the platform cannot report transports.
    pub transports: Vec<String>,
}

/// Assertion returned by `navigator.credentials.get`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssertionResponse {
    pub authenticator_data: Vec<u8>,
    pub client_data_json: Vec<u8>,
    pub signature: Vec<u8>,
    pub user_handle: Option<Vec<u8>>,
}

/// A `PublicKeyCredential` with its response payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlatformCredential<R> {
    pub id: String,
    pub raw_id: Vec<u8>,
    pub kind: String,
    pub response: R,
}

pub type RegistrationCredential = PlatformCredential<AttestationResponse>;
pub type AuthenticationCredential = PlatformCredential<AssertionResponse>;

/// Envelope shared by both payload shapes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CredentialJson<R> {
    pub id: String,
    #[serde(rename = "rawId")]
    pub raw_id: Base64UrlBytes,
    #[serde(rename = "type")]
    pub kind: String,
    pub response: R,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationJson {
    pub attestation_object: Base64UrlBytes,
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: Base64UrlBytes,
    pub transports: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssertionJson {
    pub authenticator_data: Base64UrlBytes,
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: Base64UrlBytes,
    pub signature: Base64UrlBytes,
    pub user_handle: Option<Base64UrlBytes>,
}

/// Body of the `POST` that completes a ceremony.
///
/// Registration nests the credential under `credential`; authentication
/// sends it bare. The server reads both shapes as-is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CeremonyPayload {
    Registration {
        credential: CredentialJson<AttestationJson>,
    },
    Authentication(CredentialJson<AssertionJson>),
}

impl From<RegistrationCredential> for CeremonyPayload {
    fn from(credential: RegistrationCredential) -> Self {
        let response = credential.response;
        Self::Registration {
            credential: CredentialJson {
                id: credential.id,
                raw_id: credential.raw_id.into(),
                kind: credential.kind,
                response: AttestationJson {
                    attestation_object: response.attestation_object.into(),
                    client_data_json: response.client_data_json.into(),
                    transports: response.transports,
                },
            },
        }
    }
}

impl From<AuthenticationCredential> for CeremonyPayload {
    fn from(credential: AuthenticationCredential) -> Self {
        let response = credential.response;
        Self::Authentication(CredentialJson {
            id: credential.id,
            raw_id: credential.raw_id.into(),
            kind: credential.kind,
            response: AssertionJson {
                authenticator_data: response.authenticator_data.into(),
                client_data_json: response.client_data_json.into(),
                signature: response.signature.into(),
                user_handle: response.user_handle.map(Into::into),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn registration_payload_nests_credential() {
        let payload = CeremonyPayload::from(RegistrationCredential {
            id: "AQID".to_string(),
            raw_id: vec![1, 2, 3],
            kind: "public-key".to_string(),
            response: AttestationResponse {
                attestation_object: vec![0xa1],
                client_data_json: b"{}".to_vec(),
                transports: Vec::new(),
            },
        });

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "credential": {
                    "id": "AQID",
                    "rawId": "AQID",
                    "type": "public-key",
                    "response": {
                        "attestationObject": "oQ",
                        "clientDataJSON": "e30",
                        "transports": []
                    }
                }
            })
        );
    }

    #[test]
    fn authentication_payload_is_bare_with_null_user_handle() {
        let payload = CeremonyPayload::from(AuthenticationCredential {
            id: "BAUG".to_string(),
            raw_id: vec![4, 5, 6],
            kind: "public-key".to_string(),
            response: AssertionResponse {
                authenticator_data: vec![0xff],
                client_data_json: b"{}".to_vec(),
                signature: vec![0x30, 0x45],
                user_handle: None,
            },
        });

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "id": "BAUG",
                "rawId": "BAUG",
                "type": "public-key",
                "response": {
                    "authenticatorData": "_w",
                    "clientDataJSON": "e30",
                    "signature": "MEU",
                    "userHandle": null
                }
            })
        );
    }

    #[test]
    fn user_handle_is_encoded_when_present() {
        let payload = CeremonyPayload::from(AuthenticationCredential {
            id: "x".to_string(),
            raw_id: vec![],
            kind: "public-key".to_string(),
            response: AssertionResponse {
                authenticator_data: vec![],
                client_data_json: vec![],
                signature: vec![],
                user_handle: Some(b"user-1".to_vec()),
            },
        });
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["response"]["userHandle"], "dXNlci0x");
    }
}
