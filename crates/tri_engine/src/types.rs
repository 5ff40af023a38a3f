//! # Engine Core Types
//!
//! ## Overview
//!
//! Compact value types shared by every part of the engine:
//!
//! 1. [`Colour`] - the three sides, in turn order White → Gray → Black
//! 2. [`Square`] - an index into the 144-square ring board
//! 3. [`PieceKind`] / [`Piece`] - what stands on a square
//! 4. [`Move`] / [`MoveFlag`] - a move as it travels between generator,
//!    executor and the wire
//!
//! ### Why a newtype for squares?
//!
//! Square arithmetic on this board is not linear (files wrap, rays fold over
//! the centre), so raw integers invite mistakes. `Square` keeps the index
//! private and exposes rank/file/section accessors instead.
//!
//! ### Crossed pawns
//!
//! A pawn that passes over the centre keeps moving in the same absolute
//! direction, which on this board means it now heads *down* toward the rim of
//! the section opposite. It becomes [`PieceKind::PawnCrossed`] so both the
//! generator and the executor know which way it faces; it still lives in the
//! colour's pawn list.

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// One of the three players. The discriminant is also the section index.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Colour {
    White = 0,
    Gray = 1,
    Black = 2,
}

impl Colour {
    pub const ALL: [Colour; 3] = [Colour::White, Colour::Gray, Colour::Black];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Option<Colour> {
        match index {
            0 => Some(Colour::White),
            1 => Some(Colour::Gray),
            2 => Some(Colour::Black),
            _ => None,
        }
    }

    /// Next colour in the fixed rotation, ignoring eliminations
    pub const fn next(self) -> Colour {
        match self {
            Colour::White => Colour::Gray,
            Colour::Gray => Colour::Black,
            Colour::Black => Colour::White,
        }
    }

    /// Single upper-case letter used by the position format and notation
    pub const fn letter(self) -> char {
        match self {
            Colour::White => 'W',
            Colour::Gray => 'G',
            Colour::Black => 'B',
        }
    }

    pub const fn from_letter(ch: char) -> Option<Colour> {
        match ch {
            'W' => Some(Colour::White),
            'G' => Some(Colour::Gray),
            'B' => Some(Colour::Black),
            _ => None,
        }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Colour::White => "white",
            Colour::Gray => "gray",
            Colour::Black => "black",
        };
        f.write_str(name)
    }
}

/// Allows `array[colour]` without an explicit cast.
impl<T> Index<Colour> for [T; 3] {
    type Output = T;
    fn index(&self, index: Colour) -> &Self::Output {
        &self[index as usize]
    }
}

impl<T> IndexMut<Colour> for [T; 3] {
    fn index_mut(&mut self, index: Colour) -> &mut Self::Output {
        &mut self[index as usize]
    }
}

/// A square on the ring board, `rank * 24 + file`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Square(u8);

impl Square {
    /// Builds a square from a raw index, rejecting anything off the board.
    pub const fn new(index: u8) -> Option<Square> {
        if (index as usize) < SQUARE_COUNT {
            Some(Square(index))
        } else {
            None
        }
    }

    /// Builds a square from rank and absolute file (0..24).
    pub const fn from_rank_file(rank: u8, file: u8) -> Option<Square> {
        if rank < RANKS && file < FILES {
            Some(Square(rank * FILES + file))
        } else {
            None
        }
    }

    /// Builds a square from rank, owning section and file within that section.
    pub const fn from_section(rank: u8, section: u8, file: u8) -> Option<Square> {
        if section < 3 && file < SECTION_FILES {
            Square::from_rank_file(rank, section * SECTION_FILES + file)
        } else {
            None
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 / FILES
    }

    /// Absolute file around the ring (0..24)
    #[inline]
    pub const fn file(self) -> u8 {
        self.0 % FILES
    }

    /// Section (and therefore home colour) the square belongs to
    #[inline]
    pub const fn section(self) -> u8 {
        self.file() / SECTION_FILES
    }

    /// File relative to the square's own section (0..8)
    #[inline]
    pub const fn section_file(self) -> u8 {
        self.file() % SECTION_FILES
    }

    /// Square colour for bishop bookkeeping: `true` on light squares
    #[inline]
    pub const fn is_light(self) -> bool {
        (self.rank() + self.file()) % 2 == 1
    }

    pub fn iter() -> impl Iterator<Item = Square> {
        (0..SQUARE_COUNT as u8).map(Square)
    }
}

impl fmt::Display for Square {
    /// Section letter, file letter within the section, rank digit: `Wd1`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let section = Colour::from_index(self.section() as usize).map_or('?', Colour::letter);
        let file = (b'a' + self.section_file()) as char;
        write!(f, "{}{}{}", section, file, self.rank() + 1)
    }
}

/// What kind of piece stands on a square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    King,
    Pawn,
    /// A pawn that has passed over the centre and now advances toward the rim
    PawnCrossed,
    Knight,
    Bishop,
    Rook,
    Queen,
}

impl PieceKind {
    /// Number of piece lists kept per colour (crossed pawns share the pawn list)
    pub const LIST_COUNT: usize = 6;

    /// Index of the piece list this kind is stored in
    #[inline]
    pub const fn list_index(self) -> usize {
        match self {
            PieceKind::King => 0,
            PieceKind::Pawn | PieceKind::PawnCrossed => 1,
            PieceKind::Knight => 2,
            PieceKind::Bishop => 3,
            PieceKind::Rook => 4,
            PieceKind::Queen => 5,
        }
    }

    #[inline]
    pub const fn is_pawn(self) -> bool {
        matches!(self, PieceKind::Pawn | PieceKind::PawnCrossed)
    }

    /// Moves along ranks and files
    #[inline]
    pub const fn slides_orthogonally(self) -> bool {
        matches!(self, PieceKind::Rook | PieceKind::Queen)
    }

    /// Moves along diagonals
    #[inline]
    pub const fn slides_diagonally(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Queen)
    }

    pub const fn letter(self) -> char {
        match self {
            PieceKind::King => 'k',
            PieceKind::Pawn | PieceKind::PawnCrossed => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
        }
    }

    pub const fn from_letter(ch: char) -> Option<PieceKind> {
        match ch {
            'k' => Some(PieceKind::King),
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub colour: Colour,
}

impl Piece {
    pub const fn new(kind: PieceKind, colour: Colour) -> Self {
        Self { kind, colour }
    }
}

/// Special effect attached to a move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveFlag {
    #[default]
    None,
    Castle,
    PawnCrossCenter,
    PromoteToQueen,
    PromoteToRook,
    PromoteToBishop,
    PromoteToKnight,
    PawnTwoForward,
    EnPassant,
}

impl MoveFlag {
    pub const PROMOTIONS: [MoveFlag; 4] = [
        MoveFlag::PromoteToQueen,
        MoveFlag::PromoteToRook,
        MoveFlag::PromoteToBishop,
        MoveFlag::PromoteToKnight,
    ];

    /// Piece a promotion flag turns the pawn into
    pub const fn promotion_kind(self) -> Option<PieceKind> {
        match self {
            MoveFlag::PromoteToQueen => Some(PieceKind::Queen),
            MoveFlag::PromoteToRook => Some(PieceKind::Rook),
            MoveFlag::PromoteToBishop => Some(PieceKind::Bishop),
            MoveFlag::PromoteToKnight => Some(PieceKind::Knight),
            _ => None,
        }
    }
}

/// A move from `start` to `target`. `start == target == 0` is the null move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub start: Square,
    pub target: Square,
    pub flag: MoveFlag,
}

impl Move {
    pub const NULL: Move = Move {
        start: Square(0),
        target: Square(0),
        flag: MoveFlag::None,
    };

    pub const fn new(start: Square, target: Square, flag: MoveFlag) -> Self {
        Self { start, target, flag }
    }

    pub const fn quiet(start: Square, target: Square) -> Self {
        Self::new(start, target, MoveFlag::None)
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.start.0 == 0 && self.target.0 == 0
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.target)?;
        if self.flag != MoveFlag::None {
            write!(f, " ({:?})", self.flag)?;
        }
        Ok(())
    }
}

/// Castling rights for one colour
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CastleRights {
    pub king_side: bool,
    pub queen_side: bool,
}
