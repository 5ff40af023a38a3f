//! Three-player chess game server
//!
//! [`game::GameServer`] is the state machine, [`transport`] the socket seam
//! it runs on, and [`server::run`] the tick loop that drives it over TCP.

pub mod config;
pub mod error;
pub mod game;
pub mod server;
pub mod transport;

pub use config::{GameSettings, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use game::{GameServer, ServerState};
