use std::sync::Arc;

use crate::config::ClientConfig;
use crate::connectivity::Connectivity;
use crate::error::{CourierError, Result};
use crate::session::{SessionStore, AUTH_TOKEN_KEY, SESSION_NAMESPACE};
use crate::types::{ApiResponse, Payload, Verb};

/// Read command used as the connectivity probe. Carries no payload.
pub const PROBE_COMMAND: &str = "Get";

/// HTTP client for a single command endpoint.
///
/// Every command goes out as one call to `{api_root}?command={name}` with a
/// JSON body of `authToken` plus the caller's payload. The server reports
/// command failures inside an HTTP 200 body (`jsonCode != 200`); only a
/// transport-level failure, an HTTP error status, or an undecodable body
/// counts as not having reached the API, and those are what flip the
/// connectivity belief to offline.
pub struct ApiClient {
    config: ClientConfig,
    http_client: reqwest::Client,
    session: Arc<SessionStore>,
    connectivity: Connectivity,
}

impl ApiClient {
    pub fn new(config: ClientConfig, session: Arc<SessionStore>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            config,
            http_client,
            session,
            connectivity: Connectivity::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Send `command` with the write verb (POST).
    pub async fn write(&self, command: &str, payload: Option<&Payload>) -> Result<ApiResponse> {
        self.send(command, payload, Verb::Write).await
    }

    /// Send one command and classify the outcome.
    ///
    /// `Ok` means the server accepted the command (`jsonCode == 200`).
    /// [`CourierError::Api`] means the server answered and refused; the
    /// connectivity belief is untouched. [`CourierError::Offline`] means the
    /// request never produced a usable answer and the client is now
    /// considered offline.
    pub async fn send(
        &self,
        command: &str,
        payload: Option<&Payload>,
        verb: Verb,
    ) -> Result<ApiResponse> {
        if command.is_empty() {
            return Err(CourierError::InvalidCommand(
                "command must not be empty".to_string(),
            ));
        }

        let url = format!("{}?command={}", self.config.api_root, command);
        let body = self.command_body(payload);

        let request = match verb {
            Verb::Write => self.http_client.post(&url),
            Verb::Read => self.http_client.get(&url),
        };

        let response = match request.json(&body).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("[api] {} failed to send: {}", command, e);
                self.connectivity.mark_offline();
                return Err(CourierError::Offline);
            }
        };

        if !response.status().is_success() {
            tracing::warn!("[api] {} returned HTTP {}", command, response.status());
            self.connectivity.mark_offline();
            return Err(CourierError::Offline);
        }

        let response: ApiResponse = match response.json().await {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::warn!("[api] {} returned an undecodable body: {}", command, e);
                self.connectivity.mark_offline();
                return Err(CourierError::Offline);
            }
        };

        if response.is_ok() {
            Ok(response)
        } else {
            let message = response.message.clone().unwrap_or_default();
            tracing::error!(
                "[api] {} rejected: jsonCode={} message={:?}",
                command,
                response.json_code,
                message
            );
            Err(CourierError::Api {
                code: response.json_code,
                message,
            })
        }
    }

    /// Ask the API whether it is reachable. On success, this is the only
    /// path that clears the offline belief.
    pub async fn probe(&self) -> bool {
        match self.send(PROBE_COMMAND, None, Verb::Read).await {
            Ok(_) => {
                self.connectivity.mark_online();
                true
            }
            Err(e) => {
                tracing::debug!("[api] probe failed: {}", e);
                false
            }
        }
    }

    /// Request body: stored auth token first, then the payload. A payload
    /// that carries its own `authToken` overrides the stored one.
    fn command_body(&self, payload: Option<&Payload>) -> Payload {
        let mut body = Payload::new();
        if let Some(token) = self.session.get(SESSION_NAMESPACE, AUTH_TOKEN_KEY) {
            body.insert(AUTH_TOKEN_KEY.to_string(), token);
        }
        if let Some(payload) = payload {
            for (key, value) in payload {
                body.insert(key.clone(), value.clone());
            }
        }
        body
    }
}
