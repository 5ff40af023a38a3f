//! Legal move generation
//!
//! `generate` returns every move for a colour that leaves its king out of
//! check, honouring the moat and creek rules of the ring board.
//!
//! ## Pipeline
//!
//! 1. Find the king; a colour without one has no moves.
//! 2. Build the [`AttackInfo`] for that colour: attacked squares, checks,
//!    pins.
//! 3. King moves (including castling).
//! 4. With two or more distinct checkers only the king may move.
//! 5. Pawn, knight and slider moves, each filtered through the pin and
//!    single-check restrictions.
//!
//! The geometry tables behind all of this live in [`tables`] and are built
//! once per process.

pub mod attack;
pub mod boundaries;
mod king;
mod knight;
mod pawn;
mod sliding;
pub mod tables;

pub use attack::{gives_check, AttackInfo};
pub use tables::{geometry, Direction, DirectionSet, Geometry};

use crate::board::Board;
use crate::types::*;

/// Ordered list of generated moves. The order is stable between calls but
/// carries no meaning.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveList {
    moves: Vec<Move>,
}

impl MoveList {
    pub fn new() -> Self {
        Self {
            moves: Vec::with_capacity(64),
        }
    }

    #[inline]
    pub fn push(&mut self, mv: Move) {
        self.moves.push(mv);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.moves.iter()
    }

    pub fn as_slice(&self) -> &[Move] {
        &self.moves
    }

    /// Whether a move with the same start, target and flag was generated
    pub fn contains(&self, mv: &Move) -> bool {
        self.moves
            .iter()
            .any(|m| m.start == mv.start && m.target == mv.target && m.flag == mv.flag)
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

/// Shared state for one generator run
pub(crate) struct Generator<'a> {
    pub board: &'a Board,
    pub colour: Colour,
    pub king: Square,
    pub info: AttackInfo,
}

impl Generator<'_> {
    /// Whether `square` holds a piece of the moving colour
    #[inline]
    pub fn is_own(&self, square: Square) -> bool {
        self.board
            .piece_at(square)
            .is_some_and(|p| p.colour == self.colour)
    }
}

/// Every legal move for `colour` on `board`.
///
/// # Arguments
///
/// * `board` - Position to generate for
/// * `colour` - Side whose moves are wanted, normally `board.side_to_move`
///
/// # Returns
///
/// The legal moves, empty when the colour has no king or no legal move.
pub fn generate(board: &Board, colour: Colour) -> MoveList {
    let mut moves = MoveList::new();
    let Some(king) = board.king_square(colour) else {
        return moves;
    };

    let generator = Generator {
        board,
        colour,
        king,
        info: AttackInfo::compute(board, colour, king),
    };

    king::generate_king_moves(&generator, &mut moves);
    if generator.info.checker_count() > 1 {
        return moves;
    }

    pawn::generate_pawn_moves(&generator, &mut moves);
    knight::generate_knight_moves(&generator, &mut moves);
    sliding::generate_sliding_moves(&generator, &mut moves);
    moves
}

/// Whether `colour`'s king is attacked by a surviving enemy
pub fn in_check(board: &Board, colour: Colour) -> bool {
    board
        .king_square(colour)
        .is_some_and(|king| AttackInfo::compute(board, colour, king).in_check())
}
