//! Start-position text reader
//!
//! ## Format
//!
//! ```text
//! B 8/8/8/8/BpBpBpBpBpBpBpBp/BrBnBbBkBqBbBnBr
//! G 8/8/8/8/GpGpGpGpGpGpGpGp/GrGnGbGkGqGbGnGr
//! W 8/8/8/8/WpWpWpWpWpWpWpWp/WrWnWbWkWqWbWnWr
//! w WkWqGkGqBkBq - - -
//! ```
//!
//! - One line per section, headed by the section letter. Ranks run from the
//!   centre (rank 6) down to the rim (rank 1), separated by `/`. Within a
//!   rank, files go a → h.
//! - Pieces are two letters: colour (`W`, `G`, `B`) then kind (`k p n b r q`,
//!   or `c` for a pawn that has already crossed the centre). Digits skip
//!   empty files.
//! - The last line holds the side to move (`w`, `g`, `b`), the castling
//!   rights (`-` or pairs like `Wk`, `Gq`) and one en-passant field per
//!   colour in White, Gray, Black order: `-` or `WH`/`GR`/`BL` followed by a
//!   square within that colour's own section (`WHe3`). Missing en-passant
//!   fields count as `-`.

use std::str::FromStr;

use crate::board::Board;
use crate::constants::*;
use crate::error::{EngineError, EngineResult};
use crate::types::*;

/// Parses a square name such as `Wd1`: section letter, file a-h, rank 1-6.
pub fn parse_square(name: &str) -> Option<Square> {
    let mut chars = name.chars();
    let section = Colour::from_letter(chars.next()?)?;
    let square = parse_section_square(section, chars.as_str())?;
    Some(square)
}

impl FromStr for Square {
    type Err = EngineError;

    fn from_str(name: &str) -> EngineResult<Square> {
        parse_square(name).ok_or_else(|| EngineError::InvalidSquare {
            name: name.to_string(),
        })
    }
}

/// Parses `e3` style coordinates within one section
fn parse_section_square(section: Colour, coords: &str) -> Option<Square> {
    let mut chars = coords.chars();
    let file = chars.next()?;
    let rank = chars.next()?.to_digit(10)?;
    if chars.next().is_some() || !('a'..='h').contains(&file) || !(1..=6).contains(&rank) {
        return None;
    }
    Square::from_section(rank as u8 - 1, section.index() as u8, file as u8 - b'a')
}

/// Two-letter prefix naming a colour in en-passant fields
const fn en_passant_prefix(colour: Colour) -> &'static str {
    match colour {
        Colour::White => "WH",
        Colour::Gray => "GR",
        Colour::Black => "BL",
    }
}

impl Board {
    /// Builds a board from position text.
    ///
    /// # Errors
    ///
    /// Any deviation from the format above, a colour without exactly one
    /// king, or more pieces of one kind than a piece list holds.
    pub fn from_position(text: &str) -> EngineResult<Board> {
        let mut board = Board::empty();
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

        let mut seen = [false; 3];
        for _ in 0..3 {
            let line = lines.next().ok_or(EngineError::TruncatedPosition {
                expected: "section block",
            })?;
            let (header, ranks) = line.split_once(' ').ok_or_else(|| EngineError::InvalidSection {
                header: line.to_string(),
            })?;
            let section = single_char(header)
                .and_then(Colour::from_letter)
                .filter(|&c| !seen[c])
                .ok_or_else(|| EngineError::InvalidSection {
                    header: header.to_string(),
                })?;
            seen[section] = true;
            parse_section(&mut board, section, ranks.trim())?;
        }

        let fields: Vec<&str> = lines.flat_map(str::split_whitespace).collect();
        let side = fields.first().ok_or(EngineError::TruncatedPosition {
            expected: "side to move",
        })?;
        board.side_to_move = match *side {
            "w" => Colour::White,
            "g" => Colour::Gray,
            "b" => Colour::Black,
            other => {
                return Err(EngineError::InvalidSideToMove {
                    token: other.to_string(),
                })
            }
        };

        let castling = fields.get(1).ok_or(EngineError::TruncatedPosition {
            expected: "castling rights",
        })?;
        parse_castling(&mut board, castling)?;

        for colour in Colour::ALL {
            let token = fields.get(2 + colour.index()).copied().unwrap_or("-");
            board.en_passant[colour] = parse_en_passant(colour, token)?;
        }
        if let Some(extra) = fields.get(5) {
            return Err(EngineError::UnexpectedToken {
                token: extra.to_string(),
            });
        }

        for colour in Colour::ALL {
            let count = board.pieces(colour, PieceKind::King).len();
            if count != 1 {
                return Err(EngineError::KingCount { colour, count });
            }
        }
        Ok(board)
    }
}

fn single_char(text: &str) -> Option<char> {
    let mut chars = text.chars();
    let ch = chars.next()?;
    chars.next().is_none().then_some(ch)
}

fn parse_section(board: &mut Board, section: Colour, text: &str) -> EngineResult<()> {
    let ranks: Vec<&str> = text.split('/').collect();
    if ranks.len() != RANKS as usize {
        return Err(EngineError::BadRankCount {
            section: section.letter(),
            ranks: ranks.len(),
        });
    }

    for (i, rank_text) in ranks.iter().enumerate() {
        let rank = CENTER_RANK - i as u8;
        let bad_width = |files: usize| EngineError::BadRankWidth {
            section: section.letter(),
            rank: rank + 1,
            files,
        };

        let mut file = 0usize;
        let mut chars = rank_text.chars();
        while let Some(ch) = chars.next() {
            if let Some(empty) = ch.to_digit(10).filter(|d| (1..=8).contains(d)) {
                file += empty as usize;
                continue;
            }
            let kind_letter = chars.next();
            let piece = Colour::from_letter(ch)
                .zip(kind_letter.and_then(|k| match k {
                    'c' => Some(PieceKind::PawnCrossed),
                    other => PieceKind::from_letter(other),
                }))
                .map(|(colour, kind)| Piece::new(kind, colour))
                .ok_or_else(|| EngineError::InvalidPiece {
                    token: kind_letter.map_or(ch.to_string(), |k| format!("{ch}{k}")),
                })?;
            if file >= SECTION_FILES as usize {
                return Err(bad_width(file + 1));
            }
            if let Some(square) = Square::from_section(rank, section.index() as u8, file as u8) {
                board.put_piece(square, piece)?;
            }
            file += 1;
        }
        if file != SECTION_FILES as usize {
            return Err(bad_width(file));
        }
    }
    Ok(())
}

fn parse_castling(board: &mut Board, token: &str) -> EngineResult<()> {
    if token == "-" {
        return Ok(());
    }
    let invalid = || EngineError::InvalidCastling {
        token: token.to_string(),
    };
    let chars: Vec<char> = token.chars().collect();
    if chars.len() % 2 != 0 {
        return Err(invalid());
    }
    for pair in chars.chunks(2) {
        let colour = Colour::from_letter(pair[0]).ok_or_else(invalid)?;
        match pair[1] {
            'k' => board.castle_rights[colour].king_side = true,
            'q' => board.castle_rights[colour].queen_side = true,
            _ => return Err(invalid()),
        }
    }
    Ok(())
}

fn parse_en_passant(colour: Colour, token: &str) -> EngineResult<Option<Square>> {
    if token == "-" {
        return Ok(None);
    }
    token
        .strip_prefix(en_passant_prefix(colour))
        .and_then(|coords| parse_section_square(colour, coords))
        .map(Some)
        .ok_or_else(|| EngineError::InvalidEnPassant {
            token: token.to_string(),
        })
}
