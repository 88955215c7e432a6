//! FEN (Forsyth-Edwards Notation) parsing and serialization.

use crate::{Color, PieceKind, Position};
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 6 parts, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),
}

/// Parsed FEN data.
///
/// Every field has been validated syntactically. The engine is responsible
/// for turning this into a board and checking position-level invariants
/// such as king count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenParser {
    /// Piece placement string (e.g., "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR")
    pub piece_placement: String,
    /// Side to move
    pub active_color: Color,
    /// Castling availability (e.g., "KQkq", "-")
    pub castling: String,
    /// En passant target square
    pub en_passant: Option<Position>,
    /// Halfmove clock (for 50-move rule)
    pub halfmove_clock: u32,
    /// Fullmove number, starting at 1
    pub fullmove_number: u32,
}

impl FenParser {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Largest halfmove clock or fullmove number accepted.
    pub const MAX_COUNTER: u32 = 1_000_000;

    /// Parses a FEN string.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() != 6 {
            return Err(FenError::InvalidPartCount(parts.len()));
        }

        let piece_placement = parts[0];
        Self::validate_piece_placement(piece_placement)?;

        let active_color = match parts[1].chars().collect::<Vec<_>>().as_slice() {
            [c] => Color::from_fen_char(*c),
            _ => None,
        }
        .ok_or_else(|| FenError::InvalidActiveColor(parts[1].to_string()))?;

        let castling = parts[2];
        Self::validate_castling(castling)?;

        let en_passant = Self::parse_en_passant(parts[3], active_color)?;

        let halfmove_clock = Self::parse_counter(parts[4])
            .ok_or_else(|| FenError::InvalidHalfmoveClock(parts[4].to_string()))?;

        let fullmove_number = Self::parse_counter(parts[5])
            .filter(|&n| n >= 1)
            .ok_or_else(|| FenError::InvalidFullmoveNumber(parts[5].to_string()))?;

        Ok(FenParser {
            piece_placement: piece_placement.to_string(),
            active_color,
            castling: castling.to_string(),
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    fn validate_piece_placement(placement: &str) -> Result<(), FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        for (i, rank) in ranks.iter().enumerate() {
            let mut squares = 0;
            let mut after_run = false;
            for c in rank.chars() {
                if let Some(run) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    if after_run {
                        return Err(FenError::InvalidPiecePlacement(format!(
                            "adjacent empty-square counts in rank {}",
                            8 - i
                        )));
                    }
                    after_run = true;
                    squares += run;
                } else if PieceKind::from_fen_char(c).is_some() {
                    after_run = false;
                    squares += 1;
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c,
                        8 - i
                    )));
                }
            }
            if squares != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 8",
                    8 - i,
                    squares
                )));
            }
        }

        Ok(())
    }

    fn validate_castling(castling: &str) -> Result<(), FenError> {
        if castling == "-" {
            return Ok(());
        }

        // Letters must be a non-empty subsequence of "KQkq".
        let mut order = "KQkq".chars();
        for c in castling.chars() {
            if !"KQkq".contains(c) {
                return Err(FenError::InvalidCastlingRights(format!(
                    "invalid character '{}'",
                    c
                )));
            }
            if !order.any(|expected| expected == c) {
                return Err(FenError::InvalidCastlingRights(format!(
                    "'{}' is duplicated or out of KQkq order",
                    c
                )));
            }
        }

        Ok(())
    }

    /// Plain decimal digits, no sign or leading zero, at most `MAX_COUNTER`.
    fn parse_counter(field: &str) -> Option<u32> {
        let canonical = field.bytes().all(|b| b.is_ascii_digit())
            && !field.is_empty()
            && (field == "0" || !field.starts_with('0'));
        if !canonical {
            return None;
        }
        field.parse::<u32>().ok().filter(|&n| n <= Self::MAX_COUNTER)
    }

    fn parse_en_passant(ep: &str, active_color: Color) -> Result<Option<Position>, FenError> {
        if ep == "-" {
            return Ok(None);
        }

        // The target lies behind a pawn of the side that just moved.
        let expected_row = match active_color {
            Color::White => 6,
            Color::Black => 3,
        };
        match Position::from_algebraic(ep) {
            Some(sq) if sq.row() == expected_row => Ok(Some(sq)),
            _ => Err(FenError::InvalidEnPassantSquare(ep.to_string())),
        }
    }

    /// Decodes the piece placement field into occupied squares.
    pub fn placements(&self) -> Vec<(Position, PieceKind, Color)> {
        let mut out = Vec::with_capacity(32);
        for (rank_idx, rank_str) in self.piece_placement.split('/').enumerate() {
            let row = 8 - rank_idx as u8;
            let mut col = 1u8;
            for c in rank_str.chars() {
                if let Some(run) = c.to_digit(10) {
                    col += run as u8;
                } else if let Some((kind, color)) = PieceKind::from_fen_char(c) {
                    if let Some(pos) = Position::new(row, col) {
                        out.push((pos, kind, color));
                    }
                    col += 1;
                }
            }
        }
        out
    }

    /// Converts the parsed FEN back to a FEN string.
    pub fn to_fen(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.piece_placement,
            self.active_color.to_fen_char(),
            self.castling,
            self.en_passant
                .map(|sq| sq.to_algebraic())
                .unwrap_or_else(|| "-".to_string()),
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

impl Default for FenParser {
    fn default() -> Self {
        FenParser {
            piece_placement: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR".to_string(),
            active_color: Color::White,
            castling: "KQkq".to_string(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }
}
