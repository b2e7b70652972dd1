use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum CourierError {
    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("Request did not reach the API; client is offline")]
    Offline,

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),
}

pub type Result<T> = std::result::Result<T, CourierError>;

impl From<std::io::Error> for CourierError {
    fn from(e: std::io::Error) -> Self {
        CourierError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CourierError {
    fn from(e: serde_json::Error) -> Self {
        CourierError::Json(e.to_string())
    }
}

impl CourierError {
    /// True when the failure was transport-level, i.e. the server never
    /// produced a decodable answer. These are the only errors that make
    /// the write queue hold a command for retry.
    pub fn is_transport(&self) -> bool {
        matches!(self, CourierError::Offline)
    }
}
