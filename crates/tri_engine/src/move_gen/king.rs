//! King move generation
//!
//! The king steps one square in any of the eight directions onto a square
//! that is neither friendly-occupied nor attacked. Stepping across a moat is
//! only possible once it is bridged, and only onto an empty square.
//!
//! ## Castling
//!
//! From its home square (file d of the rim) the king castles:
//!
//! - **king side**: two squares east onto file b, rook a → c
//! - **queen side**: two squares west onto file f, rook h → e
//!
//! The right must still be held, the king must not be in check, the squares
//! between king and rook must be empty and the squares the king passes over
//! and lands on must not be attacked.

use crate::constants::*;
use crate::types::*;

use super::boundaries::moat_crossing;
use super::tables::{geometry, Direction};
use super::{Generator, MoveList};

pub(crate) fn generate_king_moves(gen: &Generator<'_>, moves: &mut MoveList) {
    let board = gen.board;
    let from = gen.king;

    for dir in Direction::ALL {
        let Some(&to) = geometry().ray(from, dir).first() else {
            continue;
        };
        if gen.is_own(to) || gen.info.attacked.contains(to) {
            continue;
        }
        if let Some((near, far)) = moat_crossing(from, dir, 0) {
            if !board.is_moat_bridged(near, far) || board.piece_at(to).is_some() {
                continue;
            }
        }
        moves.push(Move::quiet(from, to));
    }

    generate_castling(gen, moves);
}

fn generate_castling(gen: &Generator<'_>, moves: &mut MoveList) {
    let board = gen.board;
    let rights = board.castle_rights[gen.colour];
    if !(rights.king_side || rights.queen_side) || gen.info.in_check() {
        return;
    }

    let section = gen.colour.index() as u8;
    let home = |file: u8| Square::from_section(0, section, file);
    if home(KING_HOME_FILE) != Some(gen.king) {
        return;
    }

    let own_rook = Some(Piece::new(PieceKind::Rook, gen.colour));
    let empty = |file: u8| home(file).is_some_and(|sq| board.piece_at(sq).is_none());
    let safe = |file: u8| home(file).is_some_and(|sq| !gen.info.attacked.contains(sq));

    if rights.king_side
        && home(KINGSIDE_ROOK_FILE).and_then(|sq| board.piece_at(sq)) == own_rook
        && (KINGSIDE_CASTLE_FILE..KING_HOME_FILE).all(|f| empty(f) && safe(f))
    {
        if let Some(to) = home(KINGSIDE_CASTLE_FILE) {
            moves.push(Move::new(gen.king, to, MoveFlag::Castle));
        }
    }

    if rights.queen_side
        && home(QUEENSIDE_ROOK_FILE).and_then(|sq| board.piece_at(sq)) == own_rook
        && (KING_HOME_FILE + 1..QUEENSIDE_ROOK_FILE).all(empty)
        && (KING_HOME_FILE + 1..=QUEENSIDE_CASTLE_FILE).all(safe)
    {
        if let Some(to) = home(QUEENSIDE_CASTLE_FILE) {
            moves.push(Move::new(gen.king, to, MoveFlag::Castle));
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::board::Board;
    use crate::move_gen::generate;
    use crate::position::parse_square;
    use crate::types::*;

    fn sq(name: &str) -> Square {
        parse_square(name).unwrap()
    }

    fn castles(board: &Board, colour: Colour) -> Vec<Square> {
        generate(board, colour)
            .iter()
            .filter(|m| m.flag == MoveFlag::Castle)
            .map(|m| m.target)
            .collect()
    }

    #[test]
    fn test_castling_both_sides() {
        let board = Board::from_position(
            "B 8/8/8/8/8/3Bk4\n\
             G 8/8/8/8/8/3Gk4\n\
             W 8/8/8/8/8/Wr2Wk3Wr\n\
             w WkWq - - -",
        )
        .unwrap();
        let targets = castles(&board, Colour::White);
        assert!(targets.contains(&sq("Wb1")));
        assert!(targets.contains(&sq("Wf1")));
    }

    #[test]
    fn test_no_castling_through_attacked_square() {
        // gray rook covers We1 from above
        let board = Board::from_position(
            "B 8/8/8/8/8/3Bk4\n\
             G 8/8/8/8/8/3Gk4\n\
             W 8/4Gr3/8/8/8/Wr2Wk3Wr\n\
             w WkWq - - -",
        )
        .unwrap();
        let targets = castles(&board, Colour::White);
        assert_eq!(targets, vec![sq("Wb1")]);
    }

    #[test]
    fn test_no_castling_out_of_check_or_without_right() {
        let board = Board::from_position(
            "B 8/8/8/8/8/3Bk4\n\
             G 8/8/8/8/8/3Gk4\n\
             W 8/3Gr4/8/8/8/Wr2Wk3Wr\n\
             w WkWq - - -",
        )
        .unwrap();
        assert!(castles(&board, Colour::White).is_empty());

        let board = Board::from_position(
            "B 8/8/8/8/8/3Bk4\n\
             G 8/8/8/8/8/3Gk4\n\
             W 8/8/8/8/8/Wr2Wk3Wr\n\
             w Wq - - -",
        )
        .unwrap();
        assert_eq!(castles(&board, Colour::White), vec![sq("Wf1")]);
    }

    #[test]
    fn test_king_cannot_cross_unbridged_moat() {
        let board = Board::from_position(
            "B 8/8/8/8/8/3Bk4\n\
             G 8/8/8/8/8/3Gk4\n\
             W 8/8/8/8/8/7Wk\n\
             w - - - -",
        )
        .unwrap();
        let targets: Vec<Square> = generate(&board, Colour::White).iter().map(|m| m.target).collect();
        assert!(!targets.contains(&sq("Ga1")));
        assert!(targets.contains(&sq("Wg1")));

        let mut bridged = board.clone();
        bridged.eliminate(Colour::Gray);
        let targets: Vec<Square> = generate(&bridged, Colour::White).iter().map(|m| m.target).collect();
        assert!(targets.contains(&sq("Ga1")));
    }
}
