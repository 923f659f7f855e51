//! [`Authenticator`] over `navigator.credentials`.
//!
//! Options are rebuilt as plain JS objects: the pass-through members go
//! through `serde_wasm_bindgen`, then every binary member is set as a
//! `Uint8Array`. The returned credential is read back into owned bytes.

use crate::{
    authenticator::{Authenticator, PlatformError},
    credential::{
        AssertionResponse, AttestationResponse, AuthenticationCredential, PlatformCredential,
        RegistrationCredential,
    },
    options::{CreationOptions, CredentialDescriptor, RequestOptions},
};
use js_sys::{Array, ArrayBuffer, Function, Object, Reflect, Uint8Array};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AuthenticatorAssertionResponse, AuthenticatorAttestationResponse, CredentialCreationOptions,
    CredentialRequestOptions, CredentialsContainer, DomException, PublicKeyCredential,
};

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserAuthenticator;

impl Authenticator for BrowserAuthenticator {
    async fn create(
        &self,
        options: &CreationOptions,
    ) -> Result<RegistrationCredential, PlatformError> {
        let public_key = to_js_object(&options.extra)?;
        js_set(&public_key, "challenge", &bytes(&options.challenge))?;

        let user = to_js_object(&options.user.extra)?;
        js_set(&user, "id", &bytes(&options.user.id))?;
        js_set(&public_key, "user", &user)?;

        if !options.exclude_credentials.is_empty() {
            let excludes = descriptors(&options.exclude_credentials)?;
            js_set(&public_key, "excludeCredentials", &excludes)?;
        }

        let create_options = Object::new();
        js_set(&create_options, "publicKey", &public_key)?;
        let create_options = create_options.unchecked_into::<CredentialCreationOptions>();

        debug!("Calling navigator.credentials.create");
        let promise = credentials()?
            .create_with_options(&create_options)
            .map_err(platform_error)?;
        let credential = public_key_credential(JsFuture::from(promise).await)?;

        let response = credential
            .response()
            .dyn_into::<AuthenticatorAttestationResponse>()
            .map_err(|_| PlatformError::unnamed("Invalid response type"))?;

        Ok(PlatformCredential {
            id: credential.id(),
            raw_id: buffer_to_vec(&credential.raw_id()),
            kind: credential.type_(),
            response: AttestationResponse {
                attestation_object: buffer_to_vec(&response.attestation_object()),
                client_data_json: buffer_to_vec(&response.client_data_json()),
                transports: transports(&response),
            },
        })
    }

    async fn get(
        &self,
        options: &RequestOptions,
    ) -> Result<AuthenticationCredential, PlatformError> {
        let public_key = to_js_object(&options.extra)?;
        js_set(&public_key, "challenge", &bytes(&options.challenge))?;

        if !options.allow_credentials.is_empty() {
            let allow = descriptors(&options.allow_credentials)?;
            js_set(&public_key, "allowCredentials", &allow)?;
        }

        let get_options = Object::new();
        js_set(&get_options, "publicKey", &public_key)?;
        let get_options = get_options.unchecked_into::<CredentialRequestOptions>();

        debug!("Calling navigator.credentials.get");
        let promise = credentials()?
            .get_with_options(&get_options)
            .map_err(platform_error)?;
        let credential = public_key_credential(JsFuture::from(promise).await)?;

        let response = credential
            .response()
            .dyn_into::<AuthenticatorAssertionResponse>()
            .map_err(|_| PlatformError::unnamed("Invalid response type"))?;

        Ok(PlatformCredential {
            id: credential.id(),
            raw_id: buffer_to_vec(&credential.raw_id()),
            kind: credential.type_(),
            response: AssertionResponse {
                authenticator_data: buffer_to_vec(&response.authenticator_data()),
                client_data_json: buffer_to_vec(&response.client_data_json()),
                signature: buffer_to_vec(&response.signature()),
                user_handle: response.user_handle().map(|handle| buffer_to_vec(&handle)),
            },
        })
    }
}

fn credentials() -> Result<CredentialsContainer, PlatformError> {
    let window = web_sys::window()
        .ok_or_else(|| PlatformError::new("NotSupportedError", "Window not found"))?;
    Ok(window.navigator().credentials())
}

fn public_key_credential(
    result: Result<JsValue, JsValue>,
) -> Result<PublicKeyCredential, PlatformError> {
    let value = result.map_err(platform_error)?;
    if value.is_null() || value.is_undefined() {
        return Err(PlatformError::unnamed("No credential returned"));
    }
    value
        .dyn_into::<PublicKeyCredential>()
        .map_err(|_| PlatformError::unnamed("Invalid credential type"))
}

/// Maps a promise rejection to its `name`/`message`.
fn platform_error(value: JsValue) -> PlatformError {
    if let Some(exception) = value.dyn_ref::<DomException>() {
        return PlatformError::new(exception.name(), exception.message());
    }

    let name = Reflect::get(&value, &JsValue::from_str("name"))
        .ok()
        .and_then(|name| name.as_string());
    let message = Reflect::get(&value, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string())
        .unwrap_or_else(|| format!("{value:?}"));

    PlatformError { name, message }
}

// `getTransports()` is missing on older platforms.
fn transports(response: &AuthenticatorAttestationResponse) -> Vec<String> {
    let Ok(function) = Reflect::get(response, &JsValue::from_str("getTransports")) else {
        return Vec::new();
    };
    let Ok(function) = function.dyn_into::<Function>() else {
        return Vec::new();
    };
    function
        .call0(response)
        .ok()
        .and_then(|value| value.dyn_into::<Array>().ok())
        .map(|array| array.iter().filter_map(|item| item.as_string()).collect())
        .unwrap_or_default()
}

fn descriptors(list: &[CredentialDescriptor]) -> Result<Array, PlatformError> {
    let array = Array::new();
    for descriptor in list {
        let object = Object::new();
        js_set(&object, "type", &JsValue::from_str(&descriptor.kind))?;
        js_set(&object, "id", &bytes(&descriptor.id))?;
        if !descriptor.transports.is_empty() {
            let transports: Array = descriptor
                .transports
                .iter()
                .map(|transport| JsValue::from_str(transport))
                .collect();
            js_set(&object, "transports", &transports)?;
        }
        array.push(&object);
    }
    Ok(array)
}

fn to_js_object(map: &Map<String, Value>) -> Result<Object, PlatformError> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    map.serialize(&serializer)
        .map_err(|err| PlatformError::unnamed(format!("Failed to convert options: {err}")))?
        .dyn_into::<Object>()
        .map_err(|_| PlatformError::unnamed("Options are not an object"))
}

fn js_set(object: &Object, key: &str, value: &JsValue) -> Result<(), PlatformError> {
    Reflect::set(object, &JsValue::from_str(key), value)
        .map_err(|err| PlatformError::unnamed(format!("Failed to set '{key}': {err:?}")))?;
    Ok(())
}

fn bytes(data: &[u8]) -> Uint8Array {
    Uint8Array::from(data)
}

fn buffer_to_vec(buffer: &ArrayBuffer) -> Vec<u8> {
    Uint8Array::new(buffer).to_vec()
}
