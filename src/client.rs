use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::queue::{Completion, WriteQueue};
use crate::session::SessionStore;
use crate::transport::ApiClient;
use crate::types::{ApiResponse, Payload};

/// The assembled client: session store, transport, and write queue wired
/// together.
///
/// Reads go out directly via [`Courier::request`]. Writes that must survive
/// connectivity loss go through [`Courier::delayed_write`] and are delivered
/// by the flush loop, which doubles as the connectivity prober while the
/// client is offline.
pub struct Courier {
    api: Arc<ApiClient>,
    queue: Arc<WriteQueue>,
}

impl Courier {
    pub fn new(config: ClientConfig, session: Arc<SessionStore>) -> Self {
        let api = Arc::new(ApiClient::new(config, session));
        let queue = WriteQueue::new(Arc::clone(&api));
        Self { api, queue }
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    pub fn queue(&self) -> &Arc<WriteQueue> {
        &self.queue
    }

    pub fn is_online(&self) -> bool {
        self.api.connectivity().is_online()
    }

    /// Send a write command right now, bypassing the queue.
    ///
    /// Fails immediately when the API is unreachable; nothing is retried.
    /// Use [`Courier::delayed_write`] for writes that must not be lost.
    /// Read commands go through [`ApiClient::send`] with the read verb.
    pub async fn request(&self, command: &str, payload: Option<&Payload>) -> Result<ApiResponse> {
        self.api.write(command, payload).await
    }

    /// Buffer a write for guaranteed delivery. See [`WriteQueue::enqueue`].
    pub fn delayed_write(
        &self,
        command: impl Into<String>,
        payload: Option<Payload>,
    ) -> Completion {
        self.queue.enqueue(command, payload)
    }

    /// Run one flush pass by hand. The flush loop normally does this.
    pub async fn process_write_queue(&self) {
        self.queue.flush().await;
    }

    /// Spawn the periodic flush loop. Call once; the caller owns the handle,
    /// which finishes after [`Courier::shutdown`].
    pub fn spawn_flush_loop(&self) -> JoinHandle<()> {
        tokio::spawn(Arc::clone(&self.queue).run_flush_loop())
    }

    /// Stop the flush loop after one final pass.
    pub fn shutdown(&self) {
        self.queue.shutdown();
    }
}
