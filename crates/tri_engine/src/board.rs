//! Board model, move executor and elimination
//!
//! The [`Board`] is pure data: a square → piece map, one [`PieceList`] per
//! colour and piece kind, castle rights, en-passant squares, moat state and
//! the turn/elimination bookkeeping. It changes only through [`Board::apply`]
//! and [`Board::eliminate`] once a game is running.
//!
//! ## Piece lists
//!
//! Each list is a fixed-capacity arena of squares plus a square → slot
//! back-map, so add, remove and relocate are all O(1). The invariant
//! `squares[slot[s]] == s` holds for every square `s` in the list; removal
//! swaps the last entry into the freed slot.
//!
//! Crossed pawns stay in their colour's pawn list; only the square map
//! records which way a pawn is facing.

use crate::constants::*;
use crate::error::{EngineError, EngineResult};
use crate::move_gen::boundaries::moat_index;
use crate::types::*;

/// Dense set of the squares holding one kind of piece of one colour.
#[derive(Clone, Copy, Debug)]
pub struct PieceList {
    squares: [Square; PIECE_LIST_CAPACITY],
    slots: [u8; SQUARE_COUNT],
    count: usize,
}

impl Default for PieceList {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceList {
    pub fn new() -> Self {
        Self {
            squares: [Square::default(); PIECE_LIST_CAPACITY],
            slots: [0; SQUARE_COUNT],
            count: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Square] {
        &self.squares[..self.count]
    }

    pub fn contains(&self, square: Square) -> bool {
        let slot = self.slots[square.index()] as usize;
        slot < self.count && self.squares[slot] == square
    }

    /// Adds `square`, returning `false` when the list is already full.
    pub fn add(&mut self, square: Square) -> bool {
        if self.count == PIECE_LIST_CAPACITY {
            return false;
        }
        self.squares[self.count] = square;
        self.slots[square.index()] = self.count as u8;
        self.count += 1;
        true
    }

    /// Removes `square` by moving the last entry into its slot.
    pub fn remove(&mut self, square: Square) -> bool {
        if !self.contains(square) {
            return false;
        }
        let slot = self.slots[square.index()] as usize;
        let last = self.squares[self.count - 1];
        self.squares[slot] = last;
        self.slots[last.index()] = slot as u8;
        self.count -= 1;
        true
    }

    /// Moves the entry for `from` to `to`, keeping its slot.
    pub fn relocate(&mut self, from: Square, to: Square) -> bool {
        if !self.contains(from) {
            return false;
        }
        let slot = self.slots[from.index()];
        self.squares[slot as usize] = to;
        self.slots[to.index()] = slot;
        true
    }
}

/// Full game position.
#[derive(Clone, Debug)]
pub struct Board {
    squares: [Option<Piece>; SQUARE_COUNT],
    lists: [[PieceList; PieceKind::LIST_COUNT]; 3],
    pub castle_rights: [CastleRights; 3],
    /// Square behind each colour's last two-step pawn move, if any
    pub en_passant: [Option<Square>; 3],
    /// Moat `i` becomes passable once a neighbouring colour is eliminated
    pub bridged_moats: [bool; 3],
    pub side_to_move: Colour,
    eliminated: [bool; 3],
    /// Colour eliminated most recently
    pub last_eliminated: Option<Colour>,
    /// Plies since the last pawn move or capture
    pub halfmove_clock: u32,
    pub ply: u32,
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    /// A board with no pieces, White to move
    pub fn empty() -> Self {
        Self {
            squares: [None; SQUARE_COUNT],
            lists: [[PieceList::new(); PieceKind::LIST_COUNT]; 3],
            castle_rights: [CastleRights::default(); 3],
            en_passant: [None; 3],
            bridged_moats: [false; 3],
            side_to_move: Colour::White,
            eliminated: [false; 3],
            last_eliminated: None,
            halfmove_clock: 0,
            ply: 0,
        }
    }

    /// The standard three-player starting position
    pub fn start_position() -> EngineResult<Self> {
        Self::from_position(DEFAULT_POSITION)
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    /// Squares holding `colour`'s pieces of `kind`.
    ///
    /// Pawns and crossed pawns share one list, so either kind returns both.
    #[inline]
    pub fn pieces(&self, colour: Colour, kind: PieceKind) -> &[Square] {
        self.lists[colour][kind.list_index()].as_slice()
    }

    #[inline]
    pub fn king_square(&self, colour: Colour) -> Option<Square> {
        self.pieces(colour, PieceKind::King).first().copied()
    }

    #[inline]
    pub fn is_eliminated(&self, colour: Colour) -> bool {
        self.eliminated[colour]
    }

    /// Colours still in the game, in turn order
    pub fn surviving(&self) -> impl Iterator<Item = Colour> + '_ {
        Colour::ALL.into_iter().filter(|&c| !self.is_eliminated(c))
    }

    /// Whether the moat between the sections of `a` and `b` is bridged
    pub fn is_moat_bridged(&self, a: Square, b: Square) -> bool {
        self.bridged_moats[moat_index(a.section(), b.section())]
    }

    /// Places `piece` on an empty square.
    pub fn put_piece(&mut self, square: Square, piece: Piece) -> EngineResult<()> {
        if self.piece_at(square).is_some() {
            return Err(EngineError::SquareOccupied { square });
        }
        if !self.place(square, piece) {
            return Err(EngineError::PieceListFull {
                colour: piece.colour,
                square,
            });
        }
        Ok(())
    }

    /// Puts a piece on the square map and its list
    fn place(&mut self, square: Square, piece: Piece) -> bool {
        if !self.lists[piece.colour][piece.kind.list_index()].add(square) {
            return false;
        }
        self.squares[square.index()] = Some(piece);
        true
    }

    /// Removes whatever stands on `square` from the map and its list
    fn take(&mut self, square: Square) -> Option<Piece> {
        let piece = self.squares[square.index()].take()?;
        self.lists[piece.colour][piece.kind.list_index()].remove(square);
        Some(piece)
    }

    /// Moves the piece on `from` to an empty `to`
    fn relocate(&mut self, from: Square, to: Square) -> Option<Piece> {
        let piece = self.squares[from.index()].take()?;
        self.lists[piece.colour][piece.kind.list_index()].relocate(from, to);
        self.squares[to.index()] = Some(piece);
        Some(piece)
    }

    /// Plays `mv`, which must have been produced by the move generator for
    /// the colour standing on `mv.start`.
    pub fn apply(&mut self, mv: Move) {
        let Some(piece) = self.piece_at(mv.start) else {
            return;
        };
        let colour = piece.colour;
        self.en_passant[colour] = None;

        let mut capture = self.take(mv.target).is_some();
        self.relocate(mv.start, mv.target);

        match mv.flag {
            MoveFlag::Castle => self.castle_rook(colour, mv.target),
            MoveFlag::PawnCrossCenter => {
                self.squares[mv.target.index()] = Some(Piece::new(PieceKind::PawnCrossed, colour));
            }
            MoveFlag::PromoteToQueen
            | MoveFlag::PromoteToRook
            | MoveFlag::PromoteToBishop
            | MoveFlag::PromoteToKnight => {
                if let Some(kind) = mv.flag.promotion_kind() {
                    self.take(mv.target);
                    self.place(mv.target, Piece::new(kind, colour));
                }
            }
            MoveFlag::PawnTwoForward => {
                self.en_passant[colour] = mv
                    .target
                    .rank()
                    .checked_sub(1)
                    .and_then(|rank| Square::from_rank_file(rank, mv.target.file()));
            }
            MoveFlag::EnPassant => {
                if let Some(passed) = Square::from_rank_file(mv.target.rank() + 1, mv.target.file()) {
                    capture |= self.take(passed).is_some();
                }
            }
            MoveFlag::None => {}
        }

        self.update_castle_rights(piece, mv);

        if piece.kind.is_pawn() || capture {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        self.ply += 1;
        self.advance_turn();
    }

    fn castle_rook(&mut self, colour: Colour, king_target: Square) {
        let section = colour.index() as u8;
        let (rook_from, rook_to) = if king_target.section_file() == KINGSIDE_CASTLE_FILE {
            (KINGSIDE_ROOK_FILE, KINGSIDE_CASTLE_FILE + 1)
        } else {
            (QUEENSIDE_ROOK_FILE, QUEENSIDE_CASTLE_FILE - 1)
        };
        if let (Some(from), Some(to)) = (
            Square::from_section(0, section, rook_from),
            Square::from_section(0, section, rook_to),
        ) {
            self.relocate(from, to);
        }
    }

    /// A right is lost when the king moves or when the king's or the rook's
    /// home square is vacated or captured on.
    fn update_castle_rights(&mut self, piece: Piece, mv: Move) {
        if piece.kind == PieceKind::King {
            self.castle_rights[piece.colour] = CastleRights::default();
        }
        for colour in Colour::ALL {
            let section = colour.index() as u8;
            let touched = |file: u8| {
                Square::from_section(0, section, file)
                    .is_some_and(|sq| sq == mv.start || sq == mv.target)
            };
            let rights = &mut self.castle_rights[colour];
            if touched(KING_HOME_FILE) {
                *rights = CastleRights::default();
            }
            if touched(KINGSIDE_ROOK_FILE) {
                rights.king_side = false;
            }
            if touched(QUEENSIDE_ROOK_FILE) {
                rights.queen_side = false;
            }
        }
    }

    /// Passes the move to the next colour in rotation that is still playing.
    pub fn advance_turn(&mut self) {
        let mut next = self.side_to_move;
        for _ in 0..3 {
            next = next.next();
            if !self.is_eliminated(next) {
                self.side_to_move = next;
                return;
            }
        }
    }

    /// Removes `colour` from play and bridges both moats around its section.
    pub fn eliminate(&mut self, colour: Colour) {
        self.eliminated[colour] = true;
        self.last_eliminated = Some(colour);
        self.bridged_moats[colour.index()] = true;
        self.bridged_moats[(colour.index() + 1) % 3] = true;
        if self.side_to_move == colour {
            self.advance_turn();
        }
    }

    /// Whether every piece list agrees with the square map
    pub fn is_consistent(&self) -> bool {
        let listed = Colour::ALL.iter().all(|&colour| {
            self.lists[colour].iter().enumerate().all(|(list, pieces)| {
                pieces.as_slice().iter().all(|&sq| {
                    pieces.contains(sq)
                        && self
                            .piece_at(sq)
                            .is_some_and(|p| p.colour == colour && p.kind.list_index() == list)
                })
            })
        });
        let total: usize = self.lists.iter().flatten().map(PieceList::len).sum();
        listed && total == self.squares.iter().flatten().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::parse_square;

    fn sq(name: &str) -> Square {
        parse_square(name).unwrap()
    }

    #[test]
    fn test_piece_list_swap_remove() {
        let mut list = PieceList::new();
        for name in ["Wa1", "Wb1", "Wc1"] {
            assert!(list.add(sq(name)));
        }
        assert!(list.remove(sq("Wa1")));
        assert_eq!(list.as_slice(), &[sq("Wc1"), sq("Wb1")]);
        assert!(!list.remove(sq("Wa1")));
        assert!(list.relocate(sq("Wb1"), sq("Wb4")));
        assert!(list.contains(sq("Wb4")));
        assert!(!list.contains(sq("Wb1")));
    }

    #[test]
    fn test_piece_list_capacity() {
        let mut list = PieceList::new();
        for i in 0..PIECE_LIST_CAPACITY as u8 {
            assert!(list.add(Square::new(i).unwrap()));
        }
        assert!(!list.add(Square::new(100).unwrap()));
    }

    #[test]
    fn test_start_position_is_consistent() {
        let board = Board::start_position().unwrap();
        assert!(board.is_consistent());
        assert_eq!(board.pieces(Colour::Gray, PieceKind::Pawn).len(), 8);
        assert_eq!(board.king_square(Colour::Black), Some(sq("Bd1")));
    }

    #[test]
    fn test_two_forward_sets_en_passant_and_turn() {
        let mut board = Board::start_position().unwrap();
        board.apply(Move::new(sq("We2"), sq("We4"), MoveFlag::PawnTwoForward));
        assert_eq!(board.en_passant[Colour::White], Some(sq("We3")));
        assert_eq!(board.side_to_move, Colour::Gray);
        assert_eq!(board.halfmove_clock, 0);
        assert_eq!(board.ply, 1);

        board.apply(Move::quiet(sq("Gb1"), sq("Gc3")));
        assert_eq!(board.en_passant[Colour::White], Some(sq("We3")));
        assert_eq!(board.halfmove_clock, 1);

        board.apply(Move::quiet(sq("Bb1"), sq("Bc3")));
        board.apply(Move::quiet(sq("Wb1"), sq("Wc3")));
        assert_eq!(board.en_passant[Colour::White], None);
        assert!(board.is_consistent());
    }

    #[test]
    fn test_castle_moves_rook_and_clears_rights() {
        let mut board = Board::from_position(
            "B 8/8/8/8/8/3Bk4\n\
             G 8/8/8/8/8/3Gk4\n\
             W 8/8/8/8/8/Wr2Wk3Wr\n\
             w WkWq - - -",
        )
        .unwrap();
        board.apply(Move::new(sq("Wd1"), sq("Wf1"), MoveFlag::Castle));
        assert_eq!(board.piece_at(sq("We1")), Some(Piece::new(PieceKind::Rook, Colour::White)));
        assert_eq!(board.piece_at(sq("Wh1")), None);
        assert_eq!(board.castle_rights[Colour::White], CastleRights::default());
        assert!(board.is_consistent());

        let mut board = Board::from_position(
            "B 8/8/8/8/8/3Bk4\n\
             G 8/8/8/8/8/3Gk4\n\
             W 8/8/8/8/8/Wr2Wk3Wr\n\
             w WkWq - - -",
        )
        .unwrap();
        board.apply(Move::new(sq("Wd1"), sq("Wb1"), MoveFlag::Castle));
        assert_eq!(board.piece_at(sq("Wc1")), Some(Piece::new(PieceKind::Rook, Colour::White)));
        assert_eq!(board.piece_at(sq("Wa1")), None);
    }

    #[test]
    fn test_rook_move_clears_one_right() {
        let mut board = Board::from_position(
            "B 8/8/8/8/8/3Bk4\n\
             G 8/8/8/8/8/3Gk4\n\
             W 8/8/8/8/8/Wr2Wk3Wr\n\
             w WkWq - - -",
        )
        .unwrap();
        board.apply(Move::quiet(sq("Wh1"), sq("Wh4")));
        let rights = board.castle_rights[Colour::White];
        assert!(rights.king_side);
        assert!(!rights.queen_side);
    }

    #[test]
    fn test_cross_centre_and_promotion() {
        let mut board = Board::from_position(
            "B 8/8/8/8/8/3Bk4\n\
             G 8/8/8/8/8/3Gk4\n\
             W 2Wp5/8/8/8/8/3Wk4\n\
             w - - - -",
        )
        .unwrap();
        board.apply(Move::new(sq("Wc6"), sq("Gg6"), MoveFlag::PawnCrossCenter));
        assert_eq!(
            board.piece_at(sq("Gg6")),
            Some(Piece::new(PieceKind::PawnCrossed, Colour::White))
        );
        assert_eq!(board.pieces(Colour::White, PieceKind::Pawn), &[sq("Gg6")]);

        let mut board = Board::from_position(
            "B 8/8/8/8/8/3Bk4\n\
             G 8/8/8/8/Wc7/3Gk4\n\
             W 8/8/8/8/8/3Wk4\n\
             w - - - -",
        )
        .unwrap();
        board.apply(Move::new(sq("Ga2"), sq("Ga1"), MoveFlag::PromoteToKnight));
        assert!(board.pieces(Colour::White, PieceKind::Pawn).is_empty());
        assert_eq!(board.pieces(Colour::White, PieceKind::Knight), &[sq("Ga1")]);
        assert!(board.is_consistent());
    }

    #[test]
    fn test_en_passant_removes_passed_pawn() {
        let mut board = Board::from_position(
            "B 8/8/8/8/8/3Bk4\n\
             G 8/8/8/8/8/3Gk4\n\
             W 8/8/4GcWp2/8/8/3Wk4\n\
             g - WHf3 - -",
        )
        .unwrap();
        board.halfmove_clock = 7;
        board.apply(Move::new(sq("We4"), sq("Wf3"), MoveFlag::EnPassant));
        assert_eq!(board.piece_at(sq("Wf4")), None);
        assert!(board.pieces(Colour::White, PieceKind::Pawn).is_empty());
        assert_eq!(board.halfmove_clock, 0);
        assert!(board.is_consistent());
    }

    #[test]
    fn test_elimination_bridges_moats_and_skips_turns() {
        let mut board = Board::start_position().unwrap();
        board.eliminate(Colour::White);
        assert!(board.bridged_moats[0] && board.bridged_moats[1]);
        assert!(!board.bridged_moats[2]);
        assert_eq!(board.side_to_move, Colour::Gray);
        assert_eq!(board.last_eliminated, Some(Colour::White));

        board.apply(Move::quiet(sq("Gb1"), sq("Gc3")));
        board.apply(Move::quiet(sq("Bb1"), sq("Bc3")));
        assert_eq!(board.side_to_move, Colour::Gray);
        assert_eq!(board.surviving().collect::<Vec<_>>(), vec![Colour::Gray, Colour::Black]);
    }
}
