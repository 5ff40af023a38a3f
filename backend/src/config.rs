//! Server configuration
//!
//! Values come from command-line flags, falling back to environment
//! variables (a `.env` file is loaded first when present), then defaults.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use shared::{GameStart, Message};
use tri_engine::{Board, Colour, TimeControl, DEFAULT_POSITION};

use crate::error::{ServerError, ServerResult};

#[derive(Parser, Debug, Clone)]
#[command(name = "backend", about = "Three-player chess game server")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "TRICHESS_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// TCP port to listen on
    #[arg(long, env = "TRICHESS_PORT", default_value_t = 6969)]
    pub port: u16,

    /// Base time per colour, in minutes
    #[arg(long, env = "TRICHESS_MINUTES", default_value_t = 10)]
    pub minutes: u32,

    /// Seconds added after each move
    #[arg(long, env = "TRICHESS_INCREMENT", default_value_t = 10)]
    pub increment: u32,

    /// Start position file; the standard start is used when absent
    #[arg(long, env = "TRICHESS_POSITION_FILE")]
    pub position_file: Option<PathBuf>,

    /// Server ticks per second
    #[arg(long, env = "TRICHESS_TICK_RATE", default_value_t = 60)]
    pub tick_rate: u32,
}

/// What every game on this server starts from
#[derive(Debug, Clone)]
pub struct GameSettings {
    pub position: String,
    pub start: Board,
    pub time_control: TimeControl,
}

impl GameSettings {
    /// Validates `position` and checks it fits in a `GameStart` frame.
    pub fn new(position: String, time_control: TimeControl) -> ServerResult<Self> {
        let start = Board::from_position(&position)?;
        Message::GameStart(GameStart {
            colour: Colour::White,
            time_control,
            position: position.clone(),
        })
        .encode()?;
        Ok(Self {
            position,
            start,
            time_control,
        })
    }
}

impl ServerConfig {
    /// Loads `.env` and parses flags
    pub fn load() -> Self {
        dotenv::dotenv().ok();
        Self::parse()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn time_control(&self) -> TimeControl {
        TimeControl {
            minutes: self.minutes,
            increment: self.increment,
        }
    }

    pub fn tick_interval(&self) -> ServerResult<Duration> {
        if self.tick_rate == 0 {
            return Err(ServerError::Config("tick rate must be at least 1".into()));
        }
        Ok(Duration::from_secs_f64(1.0 / f64::from(self.tick_rate)))
    }

    /// Reads and validates the start position.
    ///
    /// # Errors
    ///
    /// An unreadable file or malformed position text; either aborts startup.
    pub fn game_settings(&self) -> ServerResult<GameSettings> {
        let position = match &self.position_file {
            Some(path) => std::fs::read_to_string(path)?,
            None => DEFAULT_POSITION.to_string(),
        };
        if self.minutes == 0 && self.increment == 0 {
            return Err(ServerError::Config(
                "time control needs a base time or an increment".into(),
            ));
        }
        GameSettings::new(position, self.time_control())
    }
}
