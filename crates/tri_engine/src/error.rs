//! Error types for the three-player engine
//!
//! Covers position parsing and board setup failures. Move legality is not an
//! error here: the generator simply never produces illegal moves, and the
//! executor trusts its caller.

use thiserror::Error;

use crate::types::{Colour, Square};

/// Errors that can occur while building a board
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Position text ended before all fields were read
    #[error("Position text is truncated: expected {expected}")]
    TruncatedPosition { expected: &'static str },

    /// Section header is not one of B/G/W, or repeats
    #[error("Invalid section header '{header}' in position text")]
    InvalidSection { header: String },

    /// A section does not list exactly six ranks
    #[error("Section {section} lists {ranks} ranks (must be 6)")]
    BadRankCount { section: char, ranks: usize },

    /// A rank does not describe exactly eight files
    #[error("Rank {rank} of section {section} describes {files} files (must be 8)")]
    BadRankWidth { section: char, rank: u8, files: usize },

    /// Unrecognised piece token in a rank
    #[error("Invalid piece '{token}' in position text")]
    InvalidPiece { token: String },

    /// Side to move is not w, g or b
    #[error("Invalid side to move '{token}' (must be w, g or b)")]
    InvalidSideToMove { token: String },

    /// Castling field is not '-' or a run of colour/side pairs
    #[error("Invalid castling field '{token}'")]
    InvalidCastling { token: String },

    /// En-passant field is not '-' or a square in the colour's own section
    #[error("Invalid en-passant field '{token}'")]
    InvalidEnPassant { token: String },

    /// Text left over after the last field
    #[error("Unexpected token '{token}' in position text")]
    UnexpectedToken { token: String },

    /// A colour does not have exactly one king
    #[error("{colour} has {count} kings (must be 1)")]
    KingCount { colour: Colour, count: usize },

    /// Two pieces placed on the same square
    #[error("Square {square} is already occupied")]
    SquareOccupied { square: Square },

    /// Square name is not a section letter, file a-h and rank 1-6
    #[error("Invalid square name '{name}'")]
    InvalidSquare { name: String },

    /// A piece list is full
    #[error("Piece list for {colour} is full, cannot place a piece on {square}")]
    PieceListFull { colour: Colour, square: Square },
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
