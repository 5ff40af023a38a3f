//! Sliding piece move generation
//!
//! Rooks, bishops and queens walk their rays until the first occupied square,
//! capturing it when it belongs to another colour.
//!
//! ## Moats
//!
//! A ray that reaches an unbridged moat stops there. Once a ray has crossed a
//! bridged moat every further square must be empty, and a landing square
//! that would give check is skipped (the ray itself carries on). A king can
//! therefore never be attacked the instant a moat opens up.

use crate::types::*;

use super::attack::{gives_check, slider_directions};
use super::boundaries::moat_crossing;
use super::tables::geometry;
use super::{Generator, MoveList};

pub(crate) fn generate_sliding_moves(gen: &Generator<'_>, moves: &mut MoveList) {
    for kind in [PieceKind::Rook, PieceKind::Bishop, PieceKind::Queen] {
        for &from in gen.board.pieces(gen.colour, kind) {
            generate_slider(gen, kind, from, moves);
        }
    }
}

fn generate_slider(gen: &Generator<'_>, kind: PieceKind, from: Square, moves: &mut MoveList) {
    let board = gen.board;

    for &dir in slider_directions(kind) {
        let mut over_bridge = false;
        for (distance, &to) in geometry().ray(from, dir).iter().enumerate() {
            let occupant = board.piece_at(to);
            if occupant.is_some_and(|p| p.colour == gen.colour) {
                break;
            }
            if let Some((near, far)) = moat_crossing(from, dir, distance) {
                if !board.is_moat_bridged(near, far) {
                    break;
                }
                over_bridge = true;
            }
            if over_bridge {
                if occupant.is_some() {
                    break;
                }
                if gives_check(board, gen.colour, kind, from, to) {
                    continue;
                }
            }

            if gen.info.allows(from, to) {
                moves.push(Move::quiet(from, to));
            }
            if occupant.is_some() {
                break;
            }
        }
    }
}
