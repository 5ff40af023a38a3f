//! Moat and creek rules
//!
//! Two kinds of boundary separate the three sections:
//!
//! - **Moats** run along the rim (rank 0). A step along a horizontal or
//!   diagonal ray that lands on rank 0 in a different section from the square
//!   it came from crosses a moat. Moats stay impassable until the colour on
//!   one side is eliminated; after that the moat is bridged for good.
//! - **The creek** separates sections on ranks 0..=3. It only stops pawns that
//!   have not yet crossed the centre from capturing into a neighbouring
//!   section.
//!
//! Attacks never cross a moat, bridged or not.

use crate::constants::CREEK_LAST_RANK;
use crate::types::Square;

use super::tables::{geometry, Direction};

/// Index of the moat between two sections.
///
/// Moat 0 separates sections 0 and 2, moat 1 sections 0 and 1, moat 2
/// sections 1 and 2. Eliminating colour `c` bridges moats `c` and `c + 1`.
pub fn moat_index(a: u8, b: u8) -> usize {
    if a.abs_diff(b) == 1 {
        a.max(b) as usize
    } else {
        0
    }
}

/// The square a ray step at `distance` (0-based) comes from
fn previous_on_ray(origin: Square, dir: Direction, distance: usize) -> Square {
    if distance == 0 {
        origin
    } else {
        geometry().ray(origin, dir)[distance - 1]
    }
}

/// Whether the `distance`-th step of the ray from `origin` crosses a moat.
///
/// Returns the pair of squares on either side of the moat when it does.
pub fn moat_crossing(origin: Square, dir: Direction, distance: usize) -> Option<(Square, Square)> {
    if dir.is_vertical() {
        return None;
    }
    let target = *geometry().ray(origin, dir).get(distance)?;
    let previous = previous_on_ray(origin, dir, distance);
    (target.rank() == 0 && previous.section() != target.section()).then_some((previous, target))
}

#[inline]
pub fn crosses_moat(origin: Square, dir: Direction, distance: usize) -> bool {
    moat_crossing(origin, dir, distance).is_some()
}

/// A knight jump crosses a moat when either end is on the rim and the jump
/// changes section.
#[inline]
pub fn knight_crosses_moat(start: Square, target: Square) -> bool {
    (start.rank() == 0 || target.rank() == 0) && start.section() != target.section()
}

/// A capture between sections low enough to be blocked by the creek
#[inline]
pub fn crosses_creek(start: Square, target: Square) -> bool {
    start.rank() <= CREEK_LAST_RANK && start.section() != target.section()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(rank: u8, file: u8) -> Square {
        Square::from_rank_file(rank, file).unwrap()
    }

    #[test]
    fn test_moat_indices() {
        assert_eq!(moat_index(0, 2), 0);
        assert_eq!(moat_index(2, 0), 0);
        assert_eq!(moat_index(0, 1), 1);
        assert_eq!(moat_index(1, 2), 2);
    }

    #[test]
    fn test_rim_step_between_sections_crosses_moat() {
        // file 8 -> file 7 along the rim
        let origin = sq(0, 9);
        assert!(!crosses_moat(origin, Direction::East, 0));
        assert!(crosses_moat(origin, Direction::East, 1));
        assert_eq!(
            moat_crossing(origin, Direction::East, 1),
            Some((sq(0, 8), sq(0, 7)))
        );
        // one rank up there is no moat
        assert!(!crosses_moat(sq(1, 9), Direction::East, 1));
    }

    #[test]
    fn test_diagonal_onto_rim_crosses_moat() {
        // south-east from rank 1 file 8 lands on rank 0 file 7
        assert!(crosses_moat(sq(1, 8), Direction::SouthEast, 0));
        assert!(!crosses_moat(sq(1, 9), Direction::SouthEast, 0));
    }

    #[test]
    fn test_vertical_never_crosses_moat() {
        for dist in 0..11 {
            assert!(!crosses_moat(sq(0, 7), Direction::North, dist));
        }
    }

    #[test]
    fn test_knight_and_creek() {
        assert!(knight_crosses_moat(sq(0, 7), sq(1, 9)));
        assert!(!knight_crosses_moat(sq(1, 6), sq(2, 8)));
        assert!(crosses_creek(sq(3, 7), sq(4, 8)));
        assert!(!crosses_creek(sq(4, 7), sq(5, 8)));
        assert!(!crosses_creek(sq(2, 5), sq(3, 6)));
    }
}
