//! Message payloads and the fixed-size frame codec
//!
//! ## Frame layout
//!
//! ```text
//! [tag: u16 LE][bincode payload][zero padding ...] = MESSAGE_SIZE bytes
//! ```
//!
//! Frames never vary in size, so a reader only has to collect
//! `MESSAGE_SIZE` bytes before decoding. [`FrameBuffer`] does that for
//! non-blocking sockets that may deliver a frame in pieces.

use std::fmt;

use serde::{Deserialize, Serialize};
use tri_engine::{Colour, Move, TimeControl};

use crate::error::{ProtocolError, ProtocolResult};

/// Size of every frame on the wire
pub const MESSAGE_SIZE: usize = 1024;

const TAG_SIZE: usize = 2;

mod tags {
    pub const GAME_START: u16 = 0;
    pub const PLAY_MOVE: u16 = 1;
    pub const MOVE_PLAYED: u16 = 2;
    pub const ELIMINATED: u16 = 3;
    pub const END_OF_GAME: u16 = 4;
    pub const PING: u16 = 5;
    pub const GAME_IN_PROGRESS: u16 = 6;
    pub const GOODBYE: u16 = 7;
    pub const REMATCH: u16 = 8;
}

/// Sent to each player when a game begins
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GameStart {
    /// Colour assigned to the receiving player
    pub colour: Colour,
    pub time_control: TimeControl,
    /// Start position in the engine's text format
    pub position: String,
}

/// Client → server: the move the player wants to make
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct PlayMove {
    pub mv: Move,
}

/// Server → all: a move was accepted
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct MovePlayed {
    pub mv: Move,
    /// Mover's remaining time after the increment
    pub seconds: f32,
}

/// Server → all: a colour is out of the game
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Eliminated {
    pub colour: Colour,
    /// Eliminated colour's remaining time
    pub seconds: f32,
}

/// Server → all: the game is over
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct EndOfGame {
    /// Sole surviving colour, or `None` for a draw
    pub winner: Option<Colour>,
    pub reason: EndReason,
}

/// Liveness probe; the client echoes the nonce back
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ping {
    pub nonce: u32,
}

/// Client → server: vote on playing again
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rematch {
    pub agree: bool,
}

/// Why a game ended
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EndReason {
    Timeout,
    Checkmate,
    Abandonment,
    Resignation,
    Stalemate,
    FiftyMoveRule,
    InsufficientMaterial,
    Agreement,
    Repetition,
}

impl EndReason {
    /// Whether this reason ends the game without a winner
    pub const fn is_draw(self) -> bool {
        matches!(
            self,
            EndReason::Stalemate
                | EndReason::FiftyMoveRule
                | EndReason::InsufficientMaterial
                | EndReason::Agreement
                | EndReason::Repetition
        )
    }
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            EndReason::Timeout => "timeout",
            EndReason::Checkmate => "checkmate",
            EndReason::Abandonment => "abandonment",
            EndReason::Resignation => "resignation",
            EndReason::Stalemate => "stalemate",
            EndReason::FiftyMoveRule => "fifty-move rule",
            EndReason::InsufficientMaterial => "insufficient material",
            EndReason::Agreement => "agreement",
            EndReason::Repetition => "repetition",
        };
        f.write_str(text)
    }
}

/// Every message that can travel between server and client
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    GameStart(GameStart),
    PlayMove(PlayMove),
    MovePlayed(MovePlayed),
    Eliminated(Eliminated),
    EndOfGame(EndOfGame),
    Ping(Ping),
    /// Sent to a late joiner right before the server closes the connection
    GameInProgress,
    Goodbye,
    Rematch(Rematch),
}

impl Message {
    /// Wire tag selecting the payload type
    pub const fn tag(&self) -> u16 {
        match self {
            Message::GameStart(_) => tags::GAME_START,
            Message::PlayMove(_) => tags::PLAY_MOVE,
            Message::MovePlayed(_) => tags::MOVE_PLAYED,
            Message::Eliminated(_) => tags::ELIMINATED,
            Message::EndOfGame(_) => tags::END_OF_GAME,
            Message::Ping(_) => tags::PING,
            Message::GameInProgress => tags::GAME_IN_PROGRESS,
            Message::Goodbye => tags::GOODBYE,
            Message::Rematch(_) => tags::REMATCH,
        }
    }

    fn payload(&self) -> ProtocolResult<Vec<u8>> {
        let bytes = match self {
            Message::GameStart(p) => bincode::serialize(p)?,
            Message::PlayMove(p) => bincode::serialize(p)?,
            Message::MovePlayed(p) => bincode::serialize(p)?,
            Message::Eliminated(p) => bincode::serialize(p)?,
            Message::EndOfGame(p) => bincode::serialize(p)?,
            Message::Ping(p) => bincode::serialize(p)?,
            Message::Rematch(p) => bincode::serialize(p)?,
            Message::GameInProgress | Message::Goodbye => Vec::new(),
        };
        Ok(bytes)
    }

    /// Encodes the message into one zero-padded frame.
    ///
    /// # Errors
    ///
    /// `PayloadTooLarge` when the payload (typically a long start position)
    /// does not fit after the tag.
    pub fn encode(&self) -> ProtocolResult<[u8; MESSAGE_SIZE]> {
        let payload = self.payload()?;
        let max = MESSAGE_SIZE - TAG_SIZE;
        if payload.len() > max {
            return Err(ProtocolError::PayloadTooLarge {
                size: payload.len(),
                max,
            });
        }

        let mut frame = [0u8; MESSAGE_SIZE];
        frame[..TAG_SIZE].copy_from_slice(&self.tag().to_le_bytes());
        frame[TAG_SIZE..TAG_SIZE + payload.len()].copy_from_slice(&payload);
        Ok(frame)
    }

    /// Decodes one complete frame.
    ///
    /// # Errors
    ///
    /// Wrong frame length, unknown tag, or a payload that does not decode.
    pub fn decode(frame: &[u8]) -> ProtocolResult<Message> {
        if frame.len() != MESSAGE_SIZE {
            return Err(ProtocolError::FrameLength {
                len: frame.len(),
                expected: MESSAGE_SIZE,
            });
        }
        let tag = u16::from_le_bytes([frame[0], frame[1]]);
        let payload = &frame[TAG_SIZE..];

        let message = match tag {
            tags::GAME_START => Message::GameStart(bincode::deserialize(payload)?),
            tags::PLAY_MOVE => Message::PlayMove(bincode::deserialize(payload)?),
            tags::MOVE_PLAYED => Message::MovePlayed(bincode::deserialize(payload)?),
            tags::ELIMINATED => Message::Eliminated(bincode::deserialize(payload)?),
            tags::END_OF_GAME => Message::EndOfGame(bincode::deserialize(payload)?),
            tags::PING => Message::Ping(bincode::deserialize(payload)?),
            tags::GAME_IN_PROGRESS => Message::GameInProgress,
            tags::GOODBYE => Message::Goodbye,
            tags::REMATCH => Message::Rematch(bincode::deserialize(payload)?),
            tag => return Err(ProtocolError::UnknownTag { tag }),
        };
        Ok(message)
    }
}

/// Reassembles frames from a byte stream that may arrive in pieces
#[derive(Debug, Default, Clone)]
pub struct FrameBuffer {
    bytes: Vec<u8>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, data: &[u8]) {
        self.bytes.extend_from_slice(data);
    }

    /// Bytes held that do not yet form a complete frame
    pub fn pending(&self) -> usize {
        self.bytes.len() % MESSAGE_SIZE
    }

    /// Removes and decodes the oldest complete frame, if any
    pub fn next_message(&mut self) -> Option<ProtocolResult<Message>> {
        if self.bytes.len() < MESSAGE_SIZE {
            return None;
        }
        let frame: Vec<u8> = self.bytes.drain(..MESSAGE_SIZE).collect();
        Some(Message::decode(&frame))
    }
}
