//! # Board Constants - Dimensions, Sections & the Built-in Start Position
//!
//! ## Overview
//!
//! The board is a ring of 144 squares: 6 ranks × 24 files. Rank 0 is the outer
//! rim (where every colour starts its back rank) and rank 5 is the ring that
//! touches the centre. The 24 files of each rank are split into three
//! **sections** of 8 files, one per colour:
//!
//! ```text
//! section 0 (White): files  0..8
//! section 1 (Gray):  files  8..16
//! section 2 (Black): files 16..24
//! ```
//!
//! A square index is `rank * 24 + file`, so `section * 8 + file_in_section`
//! gives the file on any rank.
//!
//! ## Boundaries
//!
//! - **Moats** sit on rank 0 between neighbouring sections. Moat `0` separates
//!   White/Black, moat `1` White/Gray and moat `2` Gray/Black.
//! - **The creek** runs between sections on ranks 0..=3 and only matters for
//!   pawns that have not crossed the centre yet.

/// Number of ranks from the rim (0) to the centre ring (5)
pub const RANKS: u8 = 6;

/// Files around one full ring
pub const FILES: u8 = 24;

/// Files owned by one colour on every rank
pub const SECTION_FILES: u8 = 8;

/// Total number of squares on the board
pub const SQUARE_COUNT: usize = RANKS as usize * FILES as usize;

/// Rank nearest the centre; pawns cross the centre from here
pub const CENTER_RANK: u8 = 5;

/// Rank a pawn starts on and may advance two squares from
pub const PAWN_START_RANK: u8 = 1;

/// Highest rank on which the creek blocks pawn captures between sections
pub const CREEK_LAST_RANK: u8 = 3;

/// File offset applied when an orthogonal ray passes over the centre
pub const CENTER_CROSS_OFFSET: u8 = 12;

/// Home files within a section
pub const KING_HOME_FILE: u8 = 3;
pub const KINGSIDE_ROOK_FILE: u8 = 0;
pub const QUEENSIDE_ROOK_FILE: u8 = 7;

/// Files the king lands on when castling
pub const KINGSIDE_CASTLE_FILE: u8 = 1;
pub const QUEENSIDE_CASTLE_FILE: u8 = 5;

/// Plies without a pawn move or capture before the game is drawn
/// (fifty rounds of three moves)
pub const FIFTY_MOVE_PLIES: u32 = 150;

/// Maximum pieces of one kind per colour a piece list can hold
pub const PIECE_LIST_CAPACITY: usize = 16;

/// Standard starting position in the sectioned text format.
///
/// Sections are listed Black, Gray, White; ranks run from the centre (rank 5)
/// down to the rim (rank 0).
pub const DEFAULT_POSITION: &str = "B 8/8/8/8/BpBpBpBpBpBpBpBp/BrBnBbBkBqBbBnBr\n\
G 8/8/8/8/GpGpGpGpGpGpGpGp/GrGnGbGkGqGbGnGr\n\
W 8/8/8/8/WpWpWpWpWpWpWpWp/WrWnWbWkWqWbWnWr\n\
w WkWqGkGqBkBq - - -";
