//! In-process transport over crossbeam channels
//!
//! Frames still go through the wire codec, so the server sees exactly what
//! it would see over TCP. Dropping either end reads as a disconnect on the
//! other.

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use shared::{FrameBuffer, Message, MESSAGE_SIZE};

use super::{Connection, Incoming, Listener};
use crate::error::{ServerError, ServerResult};

type Frame = [u8; MESSAGE_SIZE];

/// Server side of the in-memory transport
pub struct MemoryListener {
    incoming: Receiver<MemoryConnection>,
}

/// Hands out client ends that appear on the paired [`MemoryListener`]
pub struct MemoryConnector {
    outgoing: Sender<MemoryConnection>,
    next_id: u32,
}

pub fn memory_transport() -> (MemoryListener, MemoryConnector) {
    let (outgoing, incoming) = unbounded();
    (
        MemoryListener { incoming },
        MemoryConnector {
            outgoing,
            next_id: 0,
        },
    )
}

impl MemoryConnector {
    /// Opens a connection; the server picks it up on its next tick.
    pub fn connect(&mut self) -> ServerResult<MemoryClient> {
        let (to_server, from_client) = unbounded();
        let (to_client, from_server) = unbounded();
        self.next_id += 1;

        let server_end = MemoryConnection {
            name: format!("memory-{}", self.next_id),
            tx: to_client,
            rx: from_client,
        };
        self.outgoing
            .send(server_end)
            .map_err(|_| ServerError::ConnectionClosed)?;
        Ok(MemoryClient {
            tx: to_server,
            rx: from_server,
            inbox: FrameBuffer::new(),
        })
    }
}

impl Listener for MemoryListener {
    type Conn = MemoryConnection;

    fn accept(&mut self) -> ServerResult<Option<MemoryConnection>> {
        match self.incoming.try_recv() {
            Ok(conn) => Ok(Some(conn)),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => Ok(None),
        }
    }
}

pub struct MemoryConnection {
    name: String,
    tx: Sender<Frame>,
    rx: Receiver<Frame>,
}

impl Connection for MemoryConnection {
    fn send(&mut self, message: &Message) -> ServerResult<()> {
        let frame = message.encode()?;
        self.tx
            .send(frame)
            .map_err(|_| ServerError::ConnectionClosed)
    }

    fn flush(&mut self) -> ServerResult<()> {
        Ok(())
    }

    fn has_pending_output(&self) -> bool {
        false
    }

    fn poll(&mut self) -> Incoming {
        match self.rx.try_recv() {
            Ok(frame) => match Message::decode(&frame) {
                Ok(message) => Incoming::Message(message),
                Err(e) => Incoming::Malformed(e),
            },
            Err(TryRecvError::Empty) => Incoming::Nothing,
            Err(TryRecvError::Disconnected) => Incoming::Closed,
        }
    }

    fn peer(&self) -> String {
        self.name.clone()
    }
}

/// Client end of an in-memory connection
pub struct MemoryClient {
    tx: Sender<Frame>,
    rx: Receiver<Frame>,
    inbox: FrameBuffer,
}

impl MemoryClient {
    pub fn send(&self, message: &Message) -> ServerResult<()> {
        let frame = message.encode()?;
        self.tx
            .send(frame)
            .map_err(|_| ServerError::ConnectionClosed)
    }

    /// Sends raw bytes as a frame, for feeding the server garbage
    pub fn send_raw(&self, frame: Frame) -> ServerResult<()> {
        self.tx
            .send(frame)
            .map_err(|_| ServerError::ConnectionClosed)
    }

    /// Every message the server has sent so far
    pub fn drain(&mut self) -> Vec<Message> {
        while let Ok(frame) = self.rx.try_recv() {
            self.inbox.extend(&frame);
        }
        let mut messages = Vec::new();
        while let Some(Ok(message)) = self.inbox.next_message() {
            messages.push(message);
        }
        messages
    }

    /// Whether the server has dropped its end
    pub fn is_closed(&mut self) -> bool {
        loop {
            match self.rx.try_recv() {
                Ok(frame) => self.inbox.extend(&frame),
                Err(TryRecvError::Empty) => return false,
                Err(TryRecvError::Disconnected) => return true,
            }
        }
    }
}
