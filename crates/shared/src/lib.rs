//! Wire protocol shared by the server and the client
//!
//! Every message travels as one fixed-size frame: a little-endian `u16` tag
//! followed by the bincode-encoded payload, zero padded to
//! [`protocol::MESSAGE_SIZE`] bytes.

pub mod error;
pub mod protocol;

pub use error::{ProtocolError, ProtocolResult};
pub use protocol::{
    EndOfGame, EndReason, Eliminated, FrameBuffer, GameStart, Message, MovePlayed, Ping, PlayMove,
    Rematch, MESSAGE_SIZE,
};
