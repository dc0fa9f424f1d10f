//! Server configuration from command-line flags and environment.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Fan club administration server
#[derive(Parser, Debug, Clone)]
#[command(name = "fanclub", version)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "FANCLUB_BIND", default_value = "127.0.0.1:3040")]
    pub bind: SocketAddr,

    /// Database file path (default: <data dir>/fanclub/app.db)
    #[arg(long, env = "FANCLUB_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, env = "FANCLUB_LOG", default_value = "info")]
    pub log_level: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3040)),
            db_path: None,
            log_level: "info".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    pub fn db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| app_data_dir().join("app.db"))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn app_data_dir() -> PathBuf {
    let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("fanclub")
}
