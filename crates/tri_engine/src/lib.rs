//! Three-player chess engine
//!
//! Rules engine for three-player chess on a 144-square ring: three 8×6
//! sections meeting at a shared centre, separated by moats at the rim and a
//! creek further in.
//!
//! # Module Structure
//!
//! - `types` / `constants`: squares, pieces, moves and fixed board facts
//! - `board`: square map, piece lists, move execution and elimination
//! - `move_gen`: geometry tables, attack maps and the legal move generator
//! - `position`: start-position text reader
//! - `clock`: per-colour countdown with increment
//! - `material`: insufficient-material draw detection
//! - `notation`: move descriptions for logs
//!
//! # Example
//!
//! ```
//! use tri_engine::{generate, Board};
//!
//! let mut board = Board::start_position().unwrap();
//! let moves = generate(&board, board.side_to_move);
//! board.apply(moves.as_slice()[0]);
//! assert_eq!(board.side_to_move, tri_engine::Colour::Gray);
//! ```

pub mod bitset;
pub mod board;
pub mod clock;
pub mod constants;
pub mod error;
pub mod material;
pub mod move_gen;
pub mod notation;
pub mod position;
pub mod types;

pub use board::{Board, PieceList};
pub use clock::{Clock, TimeControl};
pub use constants::DEFAULT_POSITION;
pub use error::{EngineError, EngineResult};
pub use material::is_insufficient_material;
pub use move_gen::{generate, in_check, MoveList};
pub use notation::describe;
pub use position::parse_square;
pub use types::{CastleRights, Colour, Move, MoveFlag, Piece, PieceKind, Square};
