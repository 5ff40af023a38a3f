//! Non-blocking TCP transport on tokio
//!
//! The tick loop is synchronous, so sockets are driven with tokio's `try_*`
//! calls and a no-op waker instead of `.await`. Readiness is refreshed by the
//! runtime while the loop sleeps between ticks.

use std::io;
use std::net::SocketAddr;
use std::task::{Context, Poll};

use futures::task::noop_waker_ref;
use shared::{FrameBuffer, Message, MESSAGE_SIZE};
use tokio::net::{TcpListener, TcpStream};
use tracing::debug;

use super::{Connection, Incoming, Listener};
use crate::error::{ServerError, ServerResult};

pub struct TcpTransport {
    listener: TcpListener,
}

impl TcpTransport {
    pub async fn bind(addr: &str) -> ServerResult<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> ServerResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }
}

impl Listener for TcpTransport {
    type Conn = TcpConnection;

    fn accept(&mut self) -> ServerResult<Option<TcpConnection>> {
        let mut cx = Context::from_waker(noop_waker_ref());
        match self.listener.poll_accept(&mut cx) {
            Poll::Ready(Ok((stream, addr))) => {
                stream.set_nodelay(true)?;
                debug!("Accepted TCP connection from {}", addr);
                Ok(Some(TcpConnection::new(stream, addr)))
            }
            Poll::Ready(Err(e)) => Err(e.into()),
            Poll::Pending => Ok(None),
        }
    }
}

pub struct TcpConnection {
    stream: TcpStream,
    addr: SocketAddr,
    inbox: FrameBuffer,
    outbox: Vec<u8>,
}

impl TcpConnection {
    fn new(stream: TcpStream, addr: SocketAddr) -> Self {
        Self {
            stream,
            addr,
            inbox: FrameBuffer::new(),
            outbox: Vec::new(),
        }
    }

    fn buffered_message(&mut self) -> Option<Incoming> {
        self.inbox.next_message().map(|decoded| match decoded {
            Ok(message) => Incoming::Message(message),
            Err(e) => Incoming::Malformed(e),
        })
    }
}

impl Connection for TcpConnection {
    fn send(&mut self, message: &Message) -> ServerResult<()> {
        let frame = message.encode()?;
        self.outbox.extend_from_slice(&frame);
        self.flush()
    }

    fn flush(&mut self) -> ServerResult<()> {
        while !self.outbox.is_empty() {
            match self.stream.try_write(&self.outbox) {
                Ok(0) => return Err(ServerError::ConnectionClosed),
                Ok(n) => {
                    self.outbox.drain(..n);
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    fn has_pending_output(&self) -> bool {
        !self.outbox.is_empty()
    }

    fn poll(&mut self) -> Incoming {
        if let Some(incoming) = self.buffered_message() {
            return incoming;
        }

        let mut buf = [0u8; MESSAGE_SIZE];
        loop {
            match self.stream.try_read(&mut buf) {
                Ok(0) => return Incoming::Closed,
                Ok(n) => {
                    self.inbox.extend(&buf[..n]);
                    if let Some(incoming) = self.buffered_message() {
                        return incoming;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Incoming::Nothing,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    debug!("Read from {} failed: {}", self.addr, e);
                    return Incoming::Closed;
                }
            }
        }
    }

    fn peer(&self) -> String {
        self.addr.to_string()
    }
}
