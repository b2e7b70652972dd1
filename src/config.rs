use std::time::Duration;

/// Configuration for one API client, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the command endpoint. Commands are addressed as
    /// `{api_root}?command={name}`.
    pub api_root: String,
    /// Per-request transport timeout (seconds).
    pub request_timeout_secs: u64,
    /// How often the flush loop walks the write queue (milliseconds).
    pub flush_interval_ms: u64,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl ClientConfig {
    /// Load config from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        Self {
            api_root: std::env::var("COURIER_API_ROOT")
                .unwrap_or_else(|_| "https://api.courier.dev/api".to_string()),
            request_timeout_secs: std::env::var("COURIER_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            flush_interval_ms: std::env::var("COURIER_FLUSH_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            user_agent: std::env::var("COURIER_USER_AGENT")
                .unwrap_or_else(|_| default_user_agent()),
        }
    }

    /// Config pointed at a specific endpoint, defaults everywhere else
    /// (embedded use and tests).
    pub fn for_endpoint(api_root: impl Into<String>) -> Self {
        Self {
            api_root: api_root.into(),
            request_timeout_secs: 5,
            flush_interval_ms: 1000,
            user_agent: default_user_agent(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }
}

fn default_user_agent() -> String {
    let host = hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string());
    format!("courier/{} ({})", env!("CARGO_PKG_VERSION"), host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ENV_VARS: [&str; 4] = [
        "COURIER_API_ROOT",
        "COURIER_REQUEST_TIMEOUT_SECS",
        "COURIER_FLUSH_INTERVAL_MS",
        "COURIER_USER_AGENT",
    ];

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }

        let config = ClientConfig::from_env();

        assert_eq!(config.api_root, "https://api.courier.dev/api");
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.flush_interval_ms, 1000);
        assert!(config.user_agent.starts_with("courier/"));
        assert_eq!(config.flush_interval(), Duration::from_millis(1000));
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        std::env::set_var("COURIER_API_ROOT", "http://127.0.0.1:9999/api");
        std::env::set_var("COURIER_REQUEST_TIMEOUT_SECS", "2");
        std::env::set_var("COURIER_FLUSH_INTERVAL_MS", "250");
        std::env::set_var("COURIER_USER_AGENT", "courier-test/0.0");

        let config = ClientConfig::from_env();

        assert_eq!(config.api_root, "http://127.0.0.1:9999/api");
        assert_eq!(config.request_timeout(), Duration::from_secs(2));
        assert_eq!(config.flush_interval(), Duration::from_millis(250));
        assert_eq!(config.user_agent, "courier-test/0.0");

        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_ignores_unparseable_numbers() {
        std::env::set_var("COURIER_REQUEST_TIMEOUT_SECS", "not-a-number");

        let config = ClientConfig::from_env();
        assert_eq!(config.request_timeout_secs, 5);

        std::env::remove_var("COURIER_REQUEST_TIMEOUT_SECS");
    }

    #[test]
    fn test_for_endpoint() {
        let config = ClientConfig::for_endpoint("http://localhost:7700/api");
        assert_eq!(config.api_root, "http://localhost:7700/api");
        assert_eq!(config.flush_interval_ms, 1000);
    }
}
