//! Game state as seen from one seat
//!
//! - `session` - mirrors the server's board and clocks and, in bot mode,
//!   picks random legal moves and accepts rematches

pub mod session;

pub use session::{MirrorGame, Session};
