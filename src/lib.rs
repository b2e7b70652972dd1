//! # Courier
//!
//! An offline-first API client: a thin command transport plus a durable
//! delayed-write queue. Commands go out as single HTTP calls against
//! `{api_root}?command={name}`; queued writes survive connectivity loss and
//! retry until the server answers, in the order they were made.
//!
//! The client keeps a local belief about connectivity. A transport-level
//! failure flips it offline; while offline, the periodic flush loop probes
//! the API with a cheap read command instead of attempting writes, and a
//! successful probe flips the client back online so the next pass can drain
//! the queue.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use courier::{ClientConfig, Courier, SessionStore};
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let session = Arc::new(SessionStore::in_memory());
//! session.set("session", "authToken", json!("secret-token"));
//!
//! let client = Courier::new(ClientConfig::from_env(), session);
//! let flush_loop = client.spawn_flush_loop();
//!
//! // Buffered writes ride out offline periods; the completion resolves
//! // once the server has answered, however long that takes.
//! let mut payload = courier::Payload::new();
//! payload.insert("name".to_string(), json!("Trip to Portland"));
//! let receipt = client.delayed_write("CreateReport", Some(payload));
//!
//! match receipt.await {
//!     Ok(Ok(response)) => println!("created report {:?}", response.get("reportID")),
//!     Ok(Err(e)) => eprintln!("server refused: {}", e),
//!     Err(_) => eprintln!("client shut down first"),
//! }
//!
//! client.shutdown();
//! let _ = flush_loop.await;
//! # }
//! ```
//!
//! ## Direct requests
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use courier::{ApiClient, ClientConfig, CourierError, SessionStore, Verb};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let api = ApiClient::new(
//!     ClientConfig::for_endpoint("https://api.courier.dev/api"),
//!     Arc::new(SessionStore::in_memory()),
//! );
//!
//! match api.send("Get", None, Verb::Read).await {
//!     Ok(response) => println!("reachable, jsonCode={}", response.json_code),
//!     Err(CourierError::Api { code, message }) => eprintln!("refused: {} {}", code, message),
//!     Err(_) => eprintln!("offline"),
//! }
//! # }
//! ```

pub mod client;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod queue;
pub mod session;
pub mod transport;
pub mod types;

use once_cell::sync::OnceCell;
use std::sync::Arc;

pub use client::Courier;
pub use config::ClientConfig;
pub use connectivity::Connectivity;
pub use error::{CourierError, Result};
pub use queue::{Completion, WriteQueue};
pub use session::{SessionStore, AUTH_TOKEN_KEY, SESSION_NAMESPACE};
pub use transport::{ApiClient, PROBE_COMMAND};
pub use types::*;

static GLOBAL_CLIENT: OnceCell<Arc<Courier>> = OnceCell::new();

/// Set the process-wide client (called once during app startup)
pub fn set_global_client(client: Arc<Courier>) {
    let _ = GLOBAL_CLIENT.set(client);
}

/// Get the process-wide client if one was installed
pub fn get_global_client() -> Option<Arc<Courier>> {
    GLOBAL_CLIENT.get().map(Arc::clone)
}
