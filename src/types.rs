use serde::{Deserialize, Serialize};

/// Application-level success code carried inside response bodies.
///
/// Distinct from transport-level HTTP 200: the API reports command failures
/// in the body of an otherwise successful HTTP exchange.
pub const JSON_CODE_OK: i64 = 200;

/// JSON object used for command payloads and response data.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// HTTP verb a command is sent with. Writes use POST, reads use GET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Write,
    Read,
}

/// Decoded response body from the command endpoint.
///
/// Every well-formed response carries a `jsonCode`; [`JSON_CODE_OK`] is the
/// sole success discriminator. `message` explains failures when the server
/// bothers to send one. All remaining fields land in `data` verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(rename = "jsonCode")]
    pub json_code: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(flatten)]
    pub data: Payload,
}

impl ApiResponse {
    pub fn is_ok(&self) -> bool {
        self.json_code == JSON_CODE_OK
    }

    /// Looks up an application field of the response, e.g. `reportID`.
    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.data.get(field)
    }
}
