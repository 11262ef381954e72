// Configuration module entry point
// Loads layered configuration and owns the resolved runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::Config;

impl Config {
    /// Load configuration from the default `config.toml` next to the binary
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional; defaults reproduce the original hardcoded
    /// launcher behavior (port 8000, all interfaces, `dashboard` directory).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("DASHBOARD"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("dashboard.root", "dashboard")?
            .set_default("dashboard.directory_listing", true)?
            .set_default("dashboard.open_browser", true)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid listen address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_launcher() {
        let cfg = Config::load_from("missing-test-config").unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.dashboard.root, "dashboard");
        assert!(cfg.dashboard.directory_listing);
        assert!(cfg.dashboard.open_browser);
        assert_eq!(
            cfg.dashboard.index_files,
            vec!["index.html".to_string(), "index.htm".to_string()]
        );
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert!(cfg.performance.max_connections.is_none());
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::load_from("missing-test-config").unwrap();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.port(), 8000);
        assert!(addr.ip().is_unspecified());
    }
}
