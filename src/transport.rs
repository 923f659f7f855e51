//! Submission of the finished credential.

use crate::{credential::CeremonyPayload, errors::BridgeError, reply::ServerReply};

#[allow(async_fn_in_trait)]
pub trait Transport {
    /// `POST`s the payload as JSON to `url` and parses the JSON reply.
    async fn submit(&self, url: &str, payload: &CeremonyPayload)
        -> Result<ServerReply, BridgeError>;
}
