//! [`Transport`] over `fetch`, with an abort timeout so a hung request never
//! leaves the trigger disabled forever.

use crate::{
    credential::CeremonyPayload, errors::BridgeError, reply::ServerReply, transport::Transport,
};
use gloo_net::http::{Request, Response};
use gloo_timers::callback::Timeout;
use tracing::debug;
use web_sys::{AbortController, AbortSignal, RequestCredentials};

/// Maximum number of body characters kept in error messages.
const MAX_ERROR_CHARS: usize = 200;

#[derive(Clone, Copy, Debug)]
pub struct FetchTransport {
    timeout_ms: u32,
}

impl FetchTransport {
    #[must_use]
    pub fn new(timeout_ms: u32) -> Self {
        Self { timeout_ms }
    }
}

impl Transport for FetchTransport {
    async fn submit(
        &self,
        url: &str,
        payload: &CeremonyPayload,
    ) -> Result<ServerReply, BridgeError> {
        let body = serde_json::to_string(payload).map_err(|err| BridgeError::Transport {
            name: None,
            message: format!("Failed to encode request: {err}"),
        })?;

        let response = send_with_timeout(self.timeout_ms, move |signal| {
            Request::post(url)
                .header("Content-Type", "application/json")
                .credentials(RequestCredentials::SameOrigin)
                .abort_signal(Some(signal))
                .body(body)
                .map_err(map_request_error)
        })
        .await?;

        handle_reply(response).await
    }
}

/// Sends a request with an abort timeout to avoid hanging UI state.
async fn send_with_timeout(
    timeout_ms: u32,
    build_request: impl FnOnce(&AbortSignal) -> Result<Request, BridgeError>,
) -> Result<Response, BridgeError> {
    let controller = AbortController::new().map_err(|_| BridgeError::Transport {
        name: None,
        message: "Failed to initialize request timeout.".to_string(),
    })?;
    let signal = controller.signal();
    let timeout_controller = controller.clone();
    let _timeout = Timeout::new(timeout_ms, move || timeout_controller.abort());

    let request = build_request(&signal)?;
    request.send().await.map_err(map_request_error)
}

/// Parses the reply body; ceremony failures come back as JSON even on 4xx.
async fn handle_reply(response: Response) -> Result<ServerReply, BridgeError> {
    let status = response.status();
    let body = response.text().await.map_err(map_request_error)?;
    debug!(status, "Credential submission answered");

    serde_json::from_str::<ServerReply>(&body).map_err(|err| BridgeError::Transport {
        name: None,
        message: format!(
            "Failed to decode response ({status}): {err}: {}",
            sanitize_body(&body)
        ),
    })
}

/// Maps `fetch` failures, keeping the JS error name for the error key.
fn map_request_error(err: gloo_net::Error) -> BridgeError {
    match err {
        gloo_net::Error::JsError(js) => {
            let message = if js.name == "AbortError" {
                "Request timed out. Please try again.".to_string()
            } else {
                format!("Unable to reach the server: {}", js.message)
            };
            BridgeError::Transport {
                name: Some(js.name),
                message,
            }
        }
        other => BridgeError::Transport {
            name: None,
            message: other.to_string(),
        },
    }
}

fn sanitize_body(body: &str) -> String {
    body.trim().chars().take(MAX_ERROR_CHARS).collect()
}
