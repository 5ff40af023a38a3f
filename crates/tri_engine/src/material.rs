//! Insufficient-material detection
//!
//! A position is a dead draw when no surviving colour could ever mate. Any
//! pawn, rook or queen is always enough. For minor pieces the answer depends
//! on the moats: a bridged moat stops acting as a wall, so mating nets need
//! more pieces once one is open.

use crate::board::Board;
use crate::types::{Colour, PieceKind};

/// Minor-piece tally for one colour
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Minors {
    knights: usize,
    light_bishops: usize,
    dark_bishops: usize,
}

impl Minors {
    fn count(board: &Board, colour: Colour) -> Self {
        let (light_bishops, dark_bishops) = board
            .pieces(colour, PieceKind::Bishop)
            .iter()
            .fold((0, 0), |(light, dark), sq| {
                if sq.is_light() {
                    (light + 1, dark)
                } else {
                    (light, dark + 1)
                }
            });
        Self {
            knights: board.pieces(colour, PieceKind::Knight).len(),
            light_bishops,
            dark_bishops,
        }
    }

    fn bishops(&self) -> usize {
        self.light_bishops + self.dark_bishops
    }

    fn both_bishop_colours(&self) -> bool {
        self.light_bishops >= 1 && self.dark_bishops >= 1
    }

    fn can_mate(&self, any_moat_bridged: bool) -> bool {
        if !any_moat_bridged {
            self.knights >= 2
                || (self.knights >= 1 && self.bishops() >= 1)
                || self.both_bishop_colours()
        } else {
            self.knights >= 3
                || (self.bishops() >= 3 && self.both_bishop_colours())
                || (self.bishops() == 1 && self.knights >= 2)
                || (self.knights == 1 && self.both_bishop_colours())
        }
    }
}

/// Whether every surviving colour lacks mating material
pub fn is_insufficient_material(board: &Board) -> bool {
    let any_moat_bridged = board.bridged_moats.iter().any(|&bridged| bridged);

    board.surviving().all(|colour| {
        let heavy = [PieceKind::Pawn, PieceKind::Rook, PieceKind::Queen]
            .into_iter()
            .any(|kind| !board.pieces(colour, kind).is_empty());
        !heavy && !Minors::count(board, colour).can_mate(any_moat_bridged)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(white_rank: &str) -> Board {
        Board::from_position(&format!(
            "B 8/8/8/8/8/3Bk4\n\
             G 8/8/8/8/8/3Gk4\n\
             W 8/8/8/8/8/{white_rank}\n\
             w - - - -"
        ))
        .unwrap()
    }

    #[test]
    fn test_lone_kings_are_insufficient() {
        let mut board = board("3Wk4");
        assert!(is_insufficient_material(&board));
        board.eliminate(Colour::Gray);
        assert!(is_insufficient_material(&board));
    }

    #[test]
    fn test_pawn_rook_queen_always_sufficient() {
        assert!(!is_insufficient_material(&board("Wp2Wk4")));
        assert!(!is_insufficient_material(&board("Wr2Wk4")));
        assert!(!is_insufficient_material(&board("Wq2Wk4")));
    }

    #[test]
    fn test_minor_pieces_with_closed_moats() {
        assert!(is_insufficient_material(&board("Wn2Wk4")));
        assert!(!is_insufficient_material(&board("WnWn1Wk4")));
        assert!(!is_insufficient_material(&board("WnWb1Wk4")));
        // Wa1 is dark, Wb1 is light
        assert!(!is_insufficient_material(&board("WbWb1Wk4")));
        // Wa1 and Wc1 are both dark
        assert!(is_insufficient_material(&board("Wb1Wb1Wk3")));
    }

    #[test]
    fn test_minor_pieces_with_bridged_moat() {
        let bridged = |rank: &str| {
            let mut board = board(rank);
            board.eliminate(Colour::Black);
            board
        };
        assert!(is_insufficient_material(&bridged("WnWn1Wk4")));
        assert!(is_insufficient_material(&bridged("WnWb1Wk4")));
        assert!(!is_insufficient_material(&bridged("WnWnWnWk4")));
        assert!(!is_insufficient_material(&bridged("WbWnWnWk4")));
        assert!(!is_insufficient_material(&bridged("WnWbWbWk4")));
        assert!(!is_insufficient_material(&bridged("WbWbWbWk4")));
    }

    #[test]
    fn test_one_sufficient_colour_is_enough() {
        let board = Board::from_position(
            "B 8/8/8/8/8/3Bk4\n\
             G 8/8/8/8/8/3GkGq3\n\
             W 8/8/8/8/8/3Wk4\n\
             w - - - -",
        )
        .unwrap();
        assert!(!is_insufficient_material(&board));
    }
}
