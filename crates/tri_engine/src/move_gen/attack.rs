//! Attack maps, checks and pins
//!
//! Before generating moves for a colour we walk outward from every piece of
//! every surviving enemy colour and record:
//!
//! - **attacked squares**: squares the friendly king may not step onto
//! - **check lines**: for each enemy piece attacking the friendly king, the
//!   attacker's square plus every empty square between it and the king
//! - **pins**: a friendly piece that is the only thing standing between an
//!   enemy slider and the friendly king, with the line it must stay on
//!
//! ## Rules baked in
//!
//! - A slider's attack stops at the first occupied square, except that it
//!   carries on past the friendly king so the king cannot retreat along the
//!   checking line.
//! - No attack crosses a moat, bridged or not.
//! - Uncrossed pawns attack toward the centre and are stopped by the creek;
//!   crossed pawns attack toward the rim and ignore it.
//! - Eliminated colours no longer attack anything; their pieces are just
//!   obstacles.

use crate::bitset::SquareSet;
use crate::board::Board;
use crate::types::*;

use super::boundaries::{crosses_creek, crosses_moat, knight_crosses_moat};
use super::tables::{geometry, Direction};

/// Directions a slider of `kind` moves along, empty for other pieces
pub fn slider_directions(kind: PieceKind) -> &'static [Direction] {
    match kind {
        PieceKind::Rook => &Direction::ORTHOGONAL,
        PieceKind::Bishop => &Direction::DIAGONAL,
        PieceKind::Queen => &Direction::ALL,
        _ => &[],
    }
}

/// Directions a pawn of `kind` captures along
pub fn pawn_capture_directions(kind: PieceKind) -> [Direction; 2] {
    if kind == PieceKind::PawnCrossed {
        [Direction::SouthEast, Direction::SouthWest]
    } else {
        [Direction::NorthWest, Direction::NorthEast]
    }
}

/// Everything the generator needs to know about enemy pressure on one colour.
#[derive(Clone, Debug, Default)]
pub struct AttackInfo {
    /// Squares attacked by at least one surviving enemy piece
    pub attacked: SquareSet,
    /// Squares of pieces currently giving check
    pub checkers: SquareSet,
    /// Where a non-king move must land to answer a single check
    pub block: SquareSet,
    check_lines: Vec<(Square, SquareSet)>,
    pins: Vec<(Square, SquareSet)>,
}

impl AttackInfo {
    /// Computes attacks against `colour`, whose king stands on `king`.
    pub fn compute(board: &Board, colour: Colour, king: Square) -> Self {
        let mut info = AttackInfo::default();

        for enemy in Colour::ALL {
            if enemy == colour || board.is_eliminated(enemy) {
                continue;
            }
            for kind in [PieceKind::Rook, PieceKind::Bishop, PieceKind::Queen] {
                for &from in board.pieces(enemy, kind) {
                    for &dir in slider_directions(kind) {
                        info.walk_slider(board, colour, king, from, dir);
                    }
                }
            }
            for &from in board.pieces(enemy, PieceKind::Knight) {
                info.mark_knight(king, from);
            }
            for &from in board.pieces(enemy, PieceKind::Pawn) {
                info.mark_pawn(board, king, from);
            }
            for &from in board.pieces(enemy, PieceKind::King) {
                info.mark_king(from);
            }
        }

        info.block = match info.checkers.count() {
            0 => SquareSet::FULL,
            1 => info
                .check_lines
                .iter()
                .fold(SquareSet::FULL, |acc, (_, line)| acc & *line),
            _ => SquareSet::EMPTY,
        };
        info
    }

    #[inline]
    pub fn in_check(&self) -> bool {
        !self.checkers.is_empty()
    }

    /// Number of distinct pieces giving check
    #[inline]
    pub fn checker_count(&self) -> u32 {
        self.checkers.count()
    }

    /// Squares a pinned piece may still move to, `None` when not pinned
    pub fn pin_ray(&self, square: Square) -> Option<SquareSet> {
        self.pins
            .iter()
            .filter(|(pinned, _)| *pinned == square)
            .map(|(_, ray)| *ray)
            .reduce(|a, b| a & b)
    }

    /// Pin and single-check restrictions for a non-king move
    pub fn allows(&self, from: Square, to: Square) -> bool {
        self.block.contains(to) && self.pin_ray(from).map_or(true, |ray| ray.contains(to))
    }

    fn add_check(&mut self, from: Square, line: SquareSet) {
        self.checkers.insert(from);
        self.check_lines.push((from, line));
    }

    fn walk_slider(&mut self, board: &Board, friend: Colour, king: Square, from: Square, dir: Direction) {
        let ray = geometry().ray(from, dir);
        let mut line = SquareSet::EMPTY;
        line.insert(from);
        let mut past_king = false;

        for (distance, &sq) in ray.iter().enumerate() {
            if crosses_moat(from, dir, distance) {
                break;
            }
            self.attacked.insert(sq);
            if sq == king {
                self.add_check(from, line);
                past_king = true;
                continue;
            }
            match board.piece_at(sq) {
                None => {
                    if !past_king {
                        line.insert(sq);
                    }
                }
                Some(piece) => {
                    if !past_king && piece.colour == friend {
                        self.find_pin(board, king, from, dir, distance, line);
                    }
                    break;
                }
            }
        }
    }

    /// The friendly piece at `distance` blocks the slider; it is pinned when
    /// the next occupied square along the ray is the friendly king.
    fn find_pin(
        &mut self,
        board: &Board,
        king: Square,
        from: Square,
        dir: Direction,
        distance: usize,
        mut line: SquareSet,
    ) {
        let ray = geometry().ray(from, dir);
        let pinned = ray[distance];
        line.insert(pinned);
        for (next, &sq) in ray.iter().enumerate().skip(distance + 1) {
            if crosses_moat(from, dir, next) {
                return;
            }
            if sq == king {
                self.pins.push((pinned, line));
                return;
            }
            if board.piece_at(sq).is_some() {
                return;
            }
            line.insert(sq);
        }
    }

    fn mark_knight(&mut self, king: Square, from: Square) {
        for &target in geometry().knight_targets(from).iter().flatten() {
            if knight_crosses_moat(from, target) {
                continue;
            }
            self.attacked.insert(target);
            if target == king {
                self.add_check(from, [from].into_iter().collect());
            }
        }
    }

    fn mark_pawn(&mut self, board: &Board, king: Square, from: Square) {
        let Some(pawn) = board.piece_at(from) else {
            return;
        };
        let crossed = pawn.kind == PieceKind::PawnCrossed;
        for dir in pawn_capture_directions(pawn.kind) {
            let Some(&target) = geometry().ray(from, dir).first() else {
                continue;
            };
            if (!crossed && crosses_creek(from, target)) || crosses_moat(from, dir, 0) {
                continue;
            }
            self.attacked.insert(target);
            if target == king {
                self.add_check(from, [from].into_iter().collect());
            }
        }
    }

    fn mark_king(&mut self, from: Square) {
        for dir in Direction::ALL {
            if let Some(&target) = geometry().ray(from, dir).first() {
                if !crosses_moat(from, dir, 0) {
                    self.attacked.insert(target);
                }
            }
        }
    }
}

/// Whether `colour`'s piece of `kind`, moved from `from` to `to`, would
/// attack the king of a surviving enemy colour.
pub fn gives_check(board: &Board, colour: Colour, kind: PieceKind, from: Square, to: Square) -> bool {
    let geo = geometry();
    Colour::ALL
        .into_iter()
        .filter(|&enemy| enemy != colour && !board.is_eliminated(enemy))
        .filter_map(|enemy| board.king_square(enemy))
        .any(|king| match kind {
            PieceKind::Knight => geo
                .knight_targets(to)
                .iter()
                .flatten()
                .any(|&t| t == king && !knight_crosses_moat(to, t)),
            _ => geo
                .directions_between(to, king)
                .iter()
                .filter(|dir| slider_directions(kind).contains(dir))
                .any(|dir| slider_reaches(board, to, dir, king, from)),
        })
}

/// Walks from `origin` toward `king`, treating `vacated` as empty.
fn slider_reaches(board: &Board, origin: Square, dir: Direction, king: Square, vacated: Square) -> bool {
    for (distance, &sq) in geometry().ray(origin, dir).iter().enumerate() {
        if crosses_moat(origin, dir, distance) {
            return false;
        }
        if sq == king {
            return true;
        }
        if sq != vacated && board.piece_at(sq).is_some() {
            return false;
        }
    }
    false
}
