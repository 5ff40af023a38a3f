use shared::ProtocolError;
use thiserror::Error;
use tri_engine::EngineError;

/// Errors that can stop the server or a single connection
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid start position: {0}")]
    Position(#[from] EngineError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Connection closed by peer")]
    ConnectionClosed,
}

pub type ServerResult<T> = Result<T, ServerError>;
