//! Pawn move generation
//!
//! Pawns start on rank 2 of their section and advance toward the centre.
//! A pawn that steps over the centre becomes a *crossed* pawn and from then
//! on advances toward the rim of the section it landed in, where it promotes.
//!
//! ## Rules
//!
//! - One step forward onto an empty square; two from the start rank when
//!   both squares are empty and the pawn has not crossed
//! - Diagonal captures onto an enemy piece, or onto another colour's
//!   en-passant square
//! - Uncrossed pawns cannot capture across the creek (ranks 1-4 between
//!   sections)
//! - A move that starts and ends on the centre rank crosses the centre
//! - A move onto the rim offers all four promotions

use crate::constants::*;
use crate::types::*;

use super::attack::pawn_capture_directions;
use super::boundaries::{crosses_creek, moat_crossing};
use super::tables::{geometry, Direction};
use super::{in_check, Generator, MoveList};

pub(crate) fn generate_pawn_moves(gen: &Generator<'_>, moves: &mut MoveList) {
    let board = gen.board;

    for &from in board.pieces(gen.colour, PieceKind::Pawn) {
        let Some(pawn) = board.piece_at(from) else {
            continue;
        };
        let crossed = pawn.kind == PieceKind::PawnCrossed;
        let forward = if crossed { Direction::South } else { Direction::North };
        let ray = geometry().ray(from, forward);

        if let Some(&one) = ray.first() {
            if board.piece_at(one).is_none() {
                if gen.info.allows(from, one) {
                    push_pawn_move(moves, from, one);
                }
                if !crossed && from.rank() == PAWN_START_RANK {
                    if let Some(&two) = ray.get(1) {
                        if board.piece_at(two).is_none() && gen.info.allows(from, two) {
                            moves.push(Move::new(from, two, MoveFlag::PawnTwoForward));
                        }
                    }
                }
            }
        }

        for dir in pawn_capture_directions(pawn.kind) {
            let Some(&to) = geometry().ray(from, dir).first() else {
                continue;
            };
            if !crossed && crosses_creek(from, to) {
                continue;
            }
            if let Some((near, far)) = moat_crossing(from, dir, 0) {
                if !board.is_moat_bridged(near, far) || board.piece_at(to).is_some() {
                    continue;
                }
            }

            match board.piece_at(to) {
                Some(victim) if victim.colour != gen.colour => {
                    if gen.info.allows(from, to) {
                        push_pawn_move(moves, from, to);
                    }
                }
                Some(_) => {}
                None => {
                    let mv = Move::new(from, to, MoveFlag::EnPassant);
                    if en_passant_target(gen, to) && en_passant_is_safe(gen, mv) {
                        moves.push(mv);
                    }
                }
            }
        }
    }
}

/// Adds a plain, centre-crossing or promoting move from `from` to `to`
fn push_pawn_move(moves: &mut MoveList, from: Square, to: Square) {
    if to.rank() == 0 {
        for flag in MoveFlag::PROMOTIONS {
            moves.push(Move::new(from, to, flag));
        }
    } else if from.rank() == CENTER_RANK && to.rank() == CENTER_RANK {
        moves.push(Move::new(from, to, MoveFlag::PawnCrossCenter));
    } else {
        moves.push(Move::quiet(from, to));
    }
}

/// Whether `to` is another colour's en-passant square with its pawn still
/// standing one rank further in
fn en_passant_target(gen: &Generator<'_>, to: Square) -> bool {
    let board = gen.board;
    Colour::ALL
        .into_iter()
        .filter(|&c| c != gen.colour && board.en_passant[c] == Some(to))
        .any(|c| {
            Square::from_rank_file(to.rank() + 1, to.file())
                .and_then(|sq| board.piece_at(sq))
                .is_some_and(|p| p.colour == c && p.kind == PieceKind::Pawn)
        })
}

/// En passant removes a pawn off the capture square, which the pin and block
/// sets do not describe, so the capture is played out on a copy instead.
fn en_passant_is_safe(gen: &Generator<'_>, mv: Move) -> bool {
    let mut after = gen.board.clone();
    after.apply(mv);
    !in_check(&after, gen.colour)
}
