//! Error types for the headless client
//!
//! Everything that can end a client session before the user asks it to.

use shared::ProtocolError;
use thiserror::Error;
use tri_engine::EngineError;

/// Errors that end a client session
#[derive(Error, Debug)]
pub enum ClientError {
    /// Socket I/O error
    #[error("Connection I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame could not be encoded or decoded
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The server sent a start position this client cannot read
    #[error("Unreadable start position: {0}")]
    Position(#[from] EngineError),

    /// No connection within the join window
    #[error("Could not join {addr} within {secs} s")]
    JoinTimeout { addr: String, secs: u64 },

    /// The server already has a game running
    #[error("Server has a game in progress")]
    GameInProgress,

    /// The server closed the connection
    #[error("Server closed the connection")]
    ServerClosed,
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
