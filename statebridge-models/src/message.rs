use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inbound command envelope as received from the transport layer.
///
/// All fields are optional at this stage; the dispatcher rejects envelopes
/// missing `routing_key` or `source` before doing anything else.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionMessage {
    #[serde(default)]
    pub routing_key: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Fixed optimistic acknowledgement returned to the caller.
///
/// The dispatcher never waits for downstream confirmation, so the
/// acknowledgement carries no per-message detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Acknowledgement {
    pub response: &'static str,
}

impl Acknowledgement {
    pub fn accepted() -> Self {
        Self {
            response: "accepted",
        }
    }
}
