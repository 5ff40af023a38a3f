//! Knight move generation
//!
//! Knights jump to up to eight targets (fewer near the rim), ignoring
//! anything in between. A jump that starts or lands on the rim in another
//! section crosses a moat: it needs the moat bridged, an empty landing square,
//! and must not give check on arrival.

use crate::types::*;

use super::attack::gives_check;
use super::boundaries::knight_crosses_moat;
use super::tables::geometry;
use super::{Generator, MoveList};

pub(crate) fn generate_knight_moves(gen: &Generator<'_>, moves: &mut MoveList) {
    let board = gen.board;

    for &from in board.pieces(gen.colour, PieceKind::Knight) {
        for &to in geometry().knight_targets(from).iter().flatten() {
            if gen.is_own(to) {
                continue;
            }
            if knight_crosses_moat(from, to)
                && (!board.is_moat_bridged(from, to)
                    || board.piece_at(to).is_some()
                    || gives_check(board, gen.colour, PieceKind::Knight, from, to))
            {
                continue;
            }
            if gen.info.allows(from, to) {
                moves.push(Move::quiet(from, to));
            }
        }
    }
}
