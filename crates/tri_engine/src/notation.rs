//! Human-readable move notation
//!
//! Describes a move against the board it is about to be played on, e.g.
//! `Nf3`-style but with a section letter: `NxGc3`, `We4`, `O-O`, `Wa1=Q`.

use crate::board::Board;
use crate::types::{Move, MoveFlag};

/// Notation for `mv`, which must not have been applied to `board` yet.
pub fn describe(board: &Board, mv: Move) -> String {
    if mv.is_null() {
        return "xxx".to_string();
    }
    if mv.flag == MoveFlag::Castle {
        return if mv.target.section_file() < mv.start.section_file() {
            "O-O".to_string()
        } else {
            "O-O-O".to_string()
        };
    }

    let mut text = String::with_capacity(8);
    if let Some(piece) = board.piece_at(mv.start) {
        if !piece.kind.is_pawn() {
            text.push(piece.kind.letter().to_ascii_uppercase());
        }
    }
    if board.piece_at(mv.target).is_some() || mv.flag == MoveFlag::EnPassant {
        text.push('x');
    }
    text.push_str(&mv.target.to_string());
    if let Some(kind) = mv.flag.promotion_kind() {
        text.push('=');
        text.push(kind.letter().to_ascii_uppercase());
    }
    text
}
