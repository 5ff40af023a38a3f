//! Fixed-rate tick loop around [`GameServer`]

use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::info;

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::game::GameServer;
use crate::transport::tcp::TcpTransport;

/// Binds the listening socket and runs ticks until Ctrl-C.
///
/// # Errors
///
/// Bad configuration, a malformed start position, or a failed bind. Nothing
/// after startup stops the loop.
pub async fn run(config: ServerConfig) -> ServerResult<()> {
    let settings = config.game_settings()?;
    let tick = config.tick_interval()?;
    let transport = TcpTransport::bind(&config.bind_addr()).await?;
    info!("Listening on {} at {} ticks/s", transport.local_addr()?, config.tick_rate);

    let mut server = GameServer::new(transport, settings);
    let mut ticker = interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut last = Instant::now();
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Instant::now();
                server.tick(now.duration_since(last).as_secs_f32());
                last = now;
            }
            _ = &mut shutdown => {
                info!("Shutting down");
                break;
            }
        }
    }
    Ok(())
}
