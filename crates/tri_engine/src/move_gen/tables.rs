//! Geometry tables
//!
//! Precomputes, for every square, the ordered squares along each of the eight
//! ray directions and the eight knight targets. These tables are computed once
//! per process and shared read-only by every generator call.
//!
//! ## Ring arithmetic
//!
//! - Files wrap: stepping sideways past file 23 lands on file 0.
//! - Ranks fold at the centre: a step past rank 5 lands on rank 5 of the
//!   opposite side of the board and keeps descending from there. Orthogonal
//!   rays shift by 12 files when they fold; the two forward diagonals shift by
//!   13 (north-west) and 11 (north-east) so they continue along the same
//!   diagonal seen from the far side.
//! - Stepping below rank 0 leaves the board.
//!
//! Horizontal rays travel 23 squares (the full ring minus the origin); every
//! ray stops early if it would come back to its own origin.
//!
//! ## Lookup cost
//!
//! - **Rays**: 144 × 8 short vectors (at most 23 squares each)
//! - **Knights**: 144 × 8 optional targets
//! - **Directions between**: a 144 × 144 byte table of direction bitmasks

use std::sync::OnceLock;

use crate::constants::*;
use crate::types::Square;

/// One of the eight ray directions.
///
/// "North" points toward the centre, "South" toward the rim. "East" walks
/// toward lower file indices and "West" toward higher ones.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
    NorthWest = 4,
    NorthEast = 5,
    SouthEast = 6,
    SouthWest = 7,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::NorthWest,
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub const DIAGONAL: [Direction; 4] = [
        Direction::NorthWest,
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn is_diagonal(self) -> bool {
        self as u8 >= 4
    }

    /// Horizontal and diagonal rays can cross a moat; vertical rays never do
    #[inline]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Direction::North | Direction::South)
    }
}

/// Bitmask of directions, bit `d` set for `Direction` with index `d`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirectionSet(u8);

impl DirectionSet {
    pub const EMPTY: DirectionSet = DirectionSet(0);

    #[inline]
    pub fn insert(&mut self, dir: Direction) {
        self.0 |= 1 << dir.index();
    }

    #[inline]
    pub fn contains(self, dir: Direction) -> bool {
        self.0 & (1 << dir.index()) != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |&d| self.contains(d))
    }
}

/// Precomputed rays, knight targets and direction lookups.
pub struct Geometry {
    rays: Vec<[Vec<Square>; 8]>,
    knights: Vec<[Option<Square>; 8]>,
    between: Vec<DirectionSet>,
}

static GEOMETRY: OnceLock<Geometry> = OnceLock::new();

/// Shared geometry tables, built on first use
pub fn geometry() -> &'static Geometry {
    GEOMETRY.get_or_init(Geometry::build)
}

impl Geometry {
    fn build() -> Self {
        let mut rays = Vec::with_capacity(SQUARE_COUNT);
        let mut knights = Vec::with_capacity(SQUARE_COUNT);
        let mut between = vec![DirectionSet::EMPTY; SQUARE_COUNT * SQUARE_COUNT];

        for from in Square::iter() {
            let square_rays: [Vec<Square>; 8] = Direction::ALL.map(|dir| ray_from(from, dir));
            for dir in Direction::ALL {
                for target in &square_rays[dir.index()] {
                    between[from.index() * SQUARE_COUNT + target.index()].insert(dir);
                }
            }
            rays.push(square_rays);
            knights.push(knight_targets(from));
        }

        Self {
            rays,
            knights,
            between,
        }
    }

    /// Squares reachable from `from` in `dir`, nearest first
    #[inline]
    pub fn ray(&self, from: Square, dir: Direction) -> &[Square] {
        &self.rays[from.index()][dir.index()]
    }

    /// Knight targets from `from`; missing slots are off the board
    #[inline]
    pub fn knight_targets(&self, from: Square) -> &[Option<Square>; 8] {
        &self.knights[from.index()]
    }

    /// Every direction in which a ray from `from` reaches `to`.
    ///
    /// A set rather than a single direction: on a ring both horizontal rays
    /// from a square reach every other square of its rank.
    #[inline]
    pub fn directions_between(&self, from: Square, to: Square) -> DirectionSet {
        self.between[from.index() * SQUARE_COUNT + to.index()]
    }
}

fn ray_from(from: Square, dir: Direction) -> Vec<Square> {
    let mut squares = Vec::new();
    for distance in 1..=FILES as i32 {
        match step(from, dir, distance) {
            Some(target) if target != from => squares.push(target),
            _ => break,
        }
    }
    squares
}

fn knight_targets(from: Square) -> [Option<Square>; 8] {
    [
        up(from, 2).map(|s| sideways(s, -1)),
        up(from, 2).map(|s| sideways(s, 1)),
        up(from, 1).map(|s| sideways(s, -2)),
        up(from, 1).map(|s| sideways(s, 2)),
        up(from, -1).map(|s| sideways(s, -2)),
        up(from, -1).map(|s| sideways(s, 2)),
        up(from, -2).map(|s| sideways(s, -1)),
        up(from, -2).map(|s| sideways(s, 1)),
    ]
}

/// Square `distance` steps away in `dir`, `None` once past the rim.
pub(crate) fn step(from: Square, dir: Direction, distance: i32) -> Option<Square> {
    match dir {
        Direction::North => up(from, distance),
        Direction::South => up(from, -distance),
        Direction::West => Some(sideways(from, distance)),
        Direction::East => Some(sideways(from, -distance)),
        Direction::NorthWest => diagonal(from, distance, 1),
        Direction::NorthEast => diagonal(from, distance, -1),
        Direction::SouthEast => diagonal(from, -distance, 1),
        Direction::SouthWest => diagonal(from, -distance, -1),
    }
}

fn up(from: Square, distance: i32) -> Option<Square> {
    fold(
        from.rank() as i32 + distance,
        from.file() as i32,
        CENTER_CROSS_OFFSET as i32,
    )
}

/// Positive distance walks toward higher files
fn sideways(from: Square, distance: i32) -> Square {
    let file = (from.file() as i32 + distance).rem_euclid(FILES as i32);
    // rank and file both stay in range
    Square::from_rank_file(from.rank(), file as u8).unwrap_or(from)
}

/// `lean` is +1 for the north-west/south-east diagonal and -1 for the other.
fn diagonal(from: Square, distance: i32, lean: i32) -> Option<Square> {
    let fold_offset = CENTER_CROSS_OFFSET as i32 + lean;
    fold(
        from.rank() as i32 + distance,
        from.file() as i32 + distance * lean,
        fold_offset,
    )
}

/// Reflects a rank past the centre onto the far side, shifting the file.
fn fold(mut rank: i32, mut file: i32, fold_offset: i32) -> Option<Square> {
    let ranks = RANKS as i32;
    if rank >= ranks {
        file += fold_offset;
        rank = (ranks - 1) - (rank - ranks);
    }
    if rank < 0 {
        return None;
    }
    let file = file.rem_euclid(FILES as i32);
    Square::from_rank_file(rank as u8, file as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(rank: u8, file: u8) -> Square {
        Square::from_rank_file(rank, file).unwrap()
    }

    #[test]
    fn test_horizontal_rays_cover_the_ring() {
        let geo = geometry();
        let from = sq(2, 5);
        let west = geo.ray(from, Direction::West);
        let east = geo.ray(from, Direction::East);
        assert_eq!(west.len(), 23);
        assert_eq!(east.len(), 23);
        assert_eq!(west[0], sq(2, 6));
        assert_eq!(east[0], sq(2, 4));
        assert_eq!(*west.last().unwrap(), sq(2, 4));
    }

    #[test]
    fn test_north_ray_folds_over_centre() {
        let geo = geometry();
        let ray = geo.ray(sq(3, 2), Direction::North);
        // ranks 4, 5 then rank 5..0 on the far side
        assert_eq!(ray.len(), 8);
        assert_eq!(ray[0], sq(4, 2));
        assert_eq!(ray[1], sq(5, 2));
        assert_eq!(ray[2], sq(5, 14));
        assert_eq!(ray[7], sq(0, 14));
    }

    #[test]
    fn test_south_ray_stops_at_rim() {
        let geo = geometry();
        assert_eq!(geo.ray(sq(2, 9), Direction::South), &[sq(1, 9), sq(0, 9)]);
        assert!(geo.ray(sq(0, 9), Direction::South).is_empty());
    }

    #[test]
    fn test_diagonals_fold_with_offsets() {
        let geo = geometry();
        let nw = geo.ray(sq(5, 0), Direction::NorthWest);
        let ne = geo.ray(sq(5, 0), Direction::NorthEast);
        assert_eq!(nw[0], sq(5, 14));
        assert_eq!(ne[0], sq(5, 10));
        assert_eq!(geo.ray(sq(2, 3), Direction::SouthEast)[0], sq(1, 2));
        assert_eq!(geo.ray(sq(2, 3), Direction::SouthWest)[0], sq(1, 4));
    }

    #[test]
    fn test_rays_never_contain_origin() {
        let geo = geometry();
        for from in Square::iter() {
            for dir in Direction::ALL {
                assert!(!geo.ray(from, dir).contains(&from), "{from} {dir:?}");
            }
        }
    }

    #[test]
    fn test_knight_targets_near_rim() {
        let geo = geometry();
        let rim = geo.knight_targets(sq(0, 3));
        assert_eq!(rim.iter().flatten().count(), 4);
        let second = geo.knight_targets(sq(1, 3));
        assert_eq!(second.iter().flatten().count(), 6);
        let inner = geo.knight_targets(sq(3, 3));
        assert_eq!(inner.iter().flatten().count(), 8);
        assert!(inner.contains(&Some(sq(5, 4))));
        assert!(inner.contains(&Some(sq(1, 2))));
    }

    #[test]
    fn test_directions_between() {
        let geo = geometry();
        let dirs = geo.directions_between(sq(1, 1), sq(1, 20));
        assert!(dirs.contains(Direction::East));
        assert!(dirs.contains(Direction::West));
        assert!(!dirs.contains(Direction::North));
        assert!(geo.directions_between(sq(1, 1), sq(3, 2)).is_empty());
        assert!(geo.directions_between(sq(0, 0), sq(3, 0)).contains(Direction::North));
    }
}
