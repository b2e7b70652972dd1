use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::{oneshot, Notify};
use uuid::Uuid;

use crate::error::Result;
use crate::transport::ApiClient;
use crate::types::{ApiResponse, Payload};

/// Receiver half of a queued write's completion channel. Stays pending until
/// a flush pass settles the write; it resolves at most once.
pub type Completion = oneshot::Receiver<Result<ApiResponse>>;

/// One buffered write command, waiting for delivery.
struct PendingWrite {
    id: Uuid,
    command: String,
    payload: Option<Payload>,
    completion: oneshot::Sender<Result<ApiResponse>>,
    queued_at_ms: i64,
    attempts: u32,
}

/// Durable queue for write commands.
///
/// Writes are buffered unconditionally and flushed in FIFO order by a
/// periodic pass. A write leaves the queue only once the server has answered
/// it: transport failures put it back at the tail for the next pass, however
/// many passes that takes. While the client is believed offline, a pass
/// probes for connectivity instead of burning attempts on doomed sends.
///
/// Uses `std::mem::take` to snapshot the buffer, so writes enqueued during a
/// pass wait for the next one.
pub struct WriteQueue {
    client: Arc<ApiClient>,
    queue: Mutex<VecDeque<PendingWrite>>,
    /// Serializes flush passes. A caller that loses the race waits its turn.
    flush_gate: tokio::sync::Mutex<()>,
    shutdown: Notify,
}

impl WriteQueue {
    pub fn new(client: Arc<ApiClient>) -> Arc<Self> {
        Arc::new(Self {
            client,
            queue: Mutex::new(VecDeque::new()),
            flush_gate: tokio::sync::Mutex::new(()),
            shutdown: Notify::new(),
        })
    }

    /// Buffer a write command for later delivery.
    ///
    /// Returns immediately, online or offline; connectivity is never
    /// consulted here. The returned [`Completion`] resolves when some flush
    /// pass gets an answer from the server: `Ok` for an accepted command,
    /// `Err` for a refused one. The queue never drops an unanswered write.
    pub fn enqueue(&self, command: impl Into<String>, payload: Option<Payload>) -> Completion {
        let (sender, receiver) = oneshot::channel();
        let write = PendingWrite {
            id: Uuid::new_v4(),
            command: command.into(),
            payload,
            completion: sender,
            queued_at_ms: chrono::Utc::now().timestamp_millis(),
            attempts: 0,
        };

        tracing::debug!("[queue] buffered {} ({})", write.command, write.id);
        self.queue.lock().unwrap().push_back(write);
        receiver
    }

    pub fn len(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One flush pass.
    ///
    /// While believed offline, probes the API and leaves the queue alone; a
    /// successful probe lets the next pass drain. Otherwise snapshots the
    /// queue and attempts each write oldest-first. Answered writes are
    /// settled, unreachable ones re-queued at the live tail.
    pub async fn flush(&self) {
        let _pass = self.flush_gate.lock().await;

        if !self.client.connectivity().is_online() {
            self.client.probe().await;
            return;
        }

        let batch = {
            let mut queue = self.queue.lock().unwrap();
            std::mem::take(&mut *queue)
        };
        if batch.is_empty() {
            return;
        }

        tracing::debug!("[queue] flushing {} buffered write(s)", batch.len());
        for mut write in batch {
            write.attempts += 1;
            match self
                .client
                .write(&write.command, write.payload.as_ref())
                .await
            {
                Ok(response) => {
                    let waited_ms = chrono::Utc::now().timestamp_millis() - write.queued_at_ms;
                    tracing::debug!(
                        "[queue] {} ({}) delivered on attempt {} after {}ms",
                        write.command,
                        write.id,
                        write.attempts,
                        waited_ms
                    );
                    let _ = write.completion.send(Ok(response));
                }
                Err(e) if e.is_transport() => {
                    // Never reached the API: keep the write, at the live
                    // tail, behind anything buffered mid-pass.
                    tracing::debug!(
                        "[queue] {} ({}) undelivered on attempt {}, re-queued",
                        write.command,
                        write.id,
                        write.attempts
                    );
                    self.queue.lock().unwrap().push_back(write);
                }
                Err(e) => {
                    // The server answered and refused. Settled, not retried.
                    tracing::error!("[queue] {} ({}) rejected: {}", write.command, write.id, e);
                    let _ = write.completion.send(Err(e));
                }
            }
        }
    }

    /// Start the periodic flush loop. Should be spawned as a tokio task.
    pub async fn run_flush_loop(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(self.client.config().flush_interval());
        ticker.tick().await; // skip the first immediate tick

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.flush().await;
                }
                _ = self.shutdown.notified() => {
                    self.flush().await;
                    tracing::info!("[queue] flush loop shutting down");
                    break;
                }
            }
        }
    }

    /// Signal the flush loop to stop after one final pass.
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }
}
