//! # SquareSet - A 144-bit Bitboard
//!
//! ## Overview
//!
//! The ring board has 144 squares, more than a single `u64` can hold, so a
//! set of squares is stored as three 64-bit words. Bit `i` of the set is bit
//! `i % 64` of word `i / 64`.
//!
//! The generator leans on these sets for everything it asks repeatedly:
//!
//! - **attacked squares** - where the friendly king may not step
//! - **block squares** - where a non-king move must land to answer a check
//! - **pin rays** - where a pinned piece is still allowed to go
//!
//! Union, intersection and membership are all word-wise and allocation free.

use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign};

use crate::types::Square;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SquareSet([u64; 3]);

impl SquareSet {
    pub const EMPTY: SquareSet = SquareSet([0; 3]);

    /// Every square on the board
    pub const FULL: SquareSet = SquareSet([u64::MAX, u64::MAX, (1 << 16) - 1]);

    pub fn new() -> Self {
        Self::EMPTY
    }

    #[inline]
    pub fn insert(&mut self, square: Square) {
        let i = square.index();
        self.0[i / 64] |= 1 << (i % 64);
    }

    #[inline]
    pub fn remove(&mut self, square: Square) {
        let i = square.index();
        self.0[i / 64] &= !(1 << (i % 64));
    }

    #[inline]
    pub fn contains(&self, square: Square) -> bool {
        let i = square.index();
        self.0[i / 64] & (1 << (i % 64)) != 0
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.0.iter().map(|w| w.count_ones()).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&w| w == 0)
    }

    pub fn clear(&mut self) {
        self.0 = [0; 3];
    }

    /// Squares in ascending index order
    pub fn iter(&self) -> impl Iterator<Item = Square> + '_ {
        Square::iter().filter(move |&sq| self.contains(sq))
    }
}

impl FromIterator<Square> for SquareSet {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        let mut set = SquareSet::EMPTY;
        for sq in iter {
            set.insert(sq);
        }
        set
    }
}

impl BitOr for SquareSet {
    type Output = SquareSet;
    fn bitor(mut self, rhs: SquareSet) -> SquareSet {
        self |= rhs;
        self
    }
}

impl BitOrAssign for SquareSet {
    fn bitor_assign(&mut self, rhs: SquareSet) {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a |= b;
        }
    }
}

impl BitAnd for SquareSet {
    type Output = SquareSet;
    fn bitand(mut self, rhs: SquareSet) -> SquareSet {
        self &= rhs;
        self
    }
}

impl BitAndAssign for SquareSet {
    fn bitand_assign(&mut self, rhs: SquareSet) {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a &= b;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(i: u8) -> Square {
        Square::new(i).unwrap()
    }

    #[test]
    fn test_insert_remove_across_words() {
        let mut set = SquareSet::new();
        for i in [0, 63, 64, 127, 128, 143] {
            set.insert(sq(i));
        }
        assert_eq!(set.count(), 6);
        assert!(set.contains(sq(64)));
        set.remove(sq(64));
        assert!(!set.contains(sq(64)));
        assert_eq!(set.iter().map(Square::raw).collect::<Vec<_>>(), vec![0, 63, 127, 128, 143]);
    }

    #[test]
    fn test_full_covers_board_only() {
        assert_eq!(SquareSet::FULL.count(), 144);
        let evens: SquareSet = (0..144).step_by(2).map(sq).collect();
        assert_eq!((evens & SquareSet::FULL), evens);
        assert_eq!((evens | SquareSet::EMPTY), evens);
        assert!((evens & SquareSet::EMPTY).is_empty());
    }
}
