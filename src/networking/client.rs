//! TCP connection to the game server
//!
//! Joins with a bounded wait, then feeds every complete frame to the
//! [`Session`] and writes back whatever it answers. Ctrl-C sends `Goodbye`
//! before closing.

use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::{FrameBuffer, Message, MESSAGE_SIZE};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::core::{ClientConfig, ClientError, ClientResult};
use crate::game::Session;

pub struct ServerConnection {
    stream: TcpStream,
    inbox: FrameBuffer,
}

impl ServerConnection {
    /// Connects to `addr`, giving up after `config.join_timeout()`.
    pub async fn join(config: &ClientConfig) -> ClientResult<Self> {
        let addr = config.server_addr();
        info!("[NETWORK] Connecting to server at {}", addr);

        let stream = match timeout(config.join_timeout(), TcpStream::connect(&addr)).await {
            Ok(stream) => stream?,
            Err(_) => {
                return Err(ClientError::JoinTimeout {
                    addr,
                    secs: config.join_timeout_secs,
                })
            }
        };
        stream.set_nodelay(true)?;
        info!("[NETWORK] Connected to {}", addr);

        Ok(Self {
            stream,
            inbox: FrameBuffer::new(),
        })
    }

    pub async fn send(&mut self, message: &Message) -> ClientResult<()> {
        let frame = message.encode()?;
        self.stream.write_all(&frame).await?;
        Ok(())
    }

    /// Waits for the next well-formed message. Malformed frames are skipped.
    ///
    /// Cancel safe: partial frames stay buffered.
    pub async fn recv(&mut self) -> ClientResult<Message> {
        let mut buf = [0u8; MESSAGE_SIZE];
        loop {
            while let Some(decoded) = self.inbox.next_message() {
                match decoded {
                    Ok(message) => return Ok(message),
                    Err(e) => warn!("[NETWORK] Skipping malformed frame: {}", e),
                }
            }
            let n = self.stream.read(&mut buf).await?;
            if n == 0 {
                return Err(ClientError::ServerClosed);
            }
            self.inbox.extend(&buf[..n]);
        }
    }
}

/// Runs one client until the server closes the connection or Ctrl-C.
pub async fn run(config: ClientConfig) -> ClientResult<()> {
    let mut conn = ServerConnection::join(&config).await?;
    let mut session = Session::new(config.bot);
    let mut rng = StdRng::from_os_rng();

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        let message = tokio::select! {
            message = conn.recv() => message?,
            _ = &mut shutdown => {
                info!("[NETWORK] Leaving");
                if let Err(e) = conn.send(&Message::Goodbye).await {
                    debug!("[NETWORK] Goodbye not delivered: {}", e);
                }
                return Ok(());
            }
        };

        for reply in session.handle(message, &mut rng)? {
            conn.send(&reply).await?;
        }
    }
}
