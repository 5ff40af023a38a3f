//! Connection seam between the game server and the network
//!
//! The server only ever asks a [`Listener`] for new connections and a
//! [`Connection`] for the next message, once per tick, and neither call may
//! block. [`tcp`] is the real transport; [`memory`] runs the same server over
//! in-process channels.

pub mod memory;
pub mod tcp;

use shared::{Message, ProtocolError};

use crate::error::ServerResult;

/// Result of polling a connection for input
#[derive(Debug)]
pub enum Incoming {
    /// No complete message is available yet
    Nothing,
    Message(Message),
    /// A frame arrived but could not be decoded
    Malformed(ProtocolError),
    /// The peer went away or the read failed
    Closed,
}

/// One player's connection. Dropping it closes the connection.
pub trait Connection {
    /// Queues `message` and writes as much as the socket accepts.
    ///
    /// # Errors
    ///
    /// The peer is gone or the message cannot be encoded.
    fn send(&mut self, message: &Message) -> ServerResult<()>;

    /// Writes anything left over from earlier sends
    fn flush(&mut self) -> ServerResult<()>;

    /// Whether queued bytes are still waiting for the socket
    fn has_pending_output(&self) -> bool;

    /// Takes the next complete message without blocking
    fn poll(&mut self) -> Incoming;

    /// Peer description for logs
    fn peer(&self) -> String;
}

/// Source of new connections
pub trait Listener {
    type Conn: Connection;

    /// Next pending connection, if any, without blocking
    fn accept(&mut self) -> ServerResult<Option<Self::Conn>>;
}
