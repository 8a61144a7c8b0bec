use std::net::SocketAddr;

/// Server configuration loaded from environment variables.
///
/// All fields except the analyzer endpoint have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0:8017`).
    pub bind_addr: SocketAddr,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Base URL of the defect analysis service, e.g. `http://analyzer:9090`.
    pub analyzer_base_url: String,
    /// Per-frame analysis round-trip budget in seconds (default: `15`).
    pub analyzer_timeout_secs: u64,
    /// Camera snapshot round-trip budget in seconds (default: `5`).
    pub camera_timeout_secs: u64,
    /// Capture cadence used when a start request does not supply one
    /// (default: `1000`).
    pub default_capture_interval_ms: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                    |
    /// |-------------------------------|----------------------------|
    /// | `BIND_ADDR`                   | `0.0.0.0:8017`             |
    /// | `CORS_ORIGINS`                | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                       |
    /// | `ANALYZER_BASE_URL`           | (required)                 |
    /// | `ANALYZER_TIMEOUT_SECS`       | `15`                       |
    /// | `CAMERA_TIMEOUT_SECS`         | `5`                        |
    /// | `DEFAULT_CAPTURE_INTERVAL_MS` | `1000`                     |
    ///
    /// Panics on a missing `ANALYZER_BASE_URL` or an unparseable value, so
    /// a misconfigured deployment fails at startup instead of at the first
    /// session.
    pub fn from_env() -> Self {
        let bind_addr: SocketAddr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8017".into())
            .parse()
            .expect("BIND_ADDR must be a valid socket address");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let analyzer_base_url = std::env::var("ANALYZER_BASE_URL")
            .expect("ANALYZER_BASE_URL must be set")
            .trim_end_matches('/')
            .to_string();

        let analyzer_timeout_secs: u64 = std::env::var("ANALYZER_TIMEOUT_SECS")
            .unwrap_or_else(|_| "15".into())
            .parse()
            .expect("ANALYZER_TIMEOUT_SECS must be a valid u64");

        let camera_timeout_secs: u64 = std::env::var("CAMERA_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("CAMERA_TIMEOUT_SECS must be a valid u64");

        let default_capture_interval_ms: i64 = std::env::var("DEFAULT_CAPTURE_INTERVAL_MS")
            .unwrap_or_else(|_| argus_core::capture::DEFAULT_CAPTURE_INTERVAL_MS.to_string())
            .parse()
            .expect("DEFAULT_CAPTURE_INTERVAL_MS must be a valid i64");

        Self {
            bind_addr,
            cors_origins,
            request_timeout_secs,
            analyzer_base_url,
            analyzer_timeout_secs,
            camera_timeout_secs,
            default_capture_interval_ms,
        }
    }
}
