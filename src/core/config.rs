//! Client command line

use std::time::Duration;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "trichess", about = "Headless three-player chess client")]
pub struct ClientConfig {
    /// Server host
    #[arg(long, env = "TRICHESS_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Server port
    #[arg(long, env = "TRICHESS_SERVER_PORT", default_value_t = 6969)]
    pub port: u16,

    /// Play random legal moves and always accept rematches
    #[arg(long)]
    pub bot: bool,

    /// Seconds to wait for the server to accept the connection
    #[arg(long, default_value_t = 5)]
    pub join_timeout_secs: u64,
}

impl ClientConfig {
    /// Loads `.env` and parses flags
    pub fn load() -> Self {
        dotenv::dotenv().ok();
        Self::parse()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn join_timeout(&self) -> Duration {
        Duration::from_secs(self.join_timeout_secs)
    }
}
