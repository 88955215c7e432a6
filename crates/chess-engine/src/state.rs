//! Rule state carried between moves: castling rights, en passant, clocks, turn.

use crate::{Move, PieceId};
use chess_core::{Color, FenError, PieceKind, Position};
use serde::{Deserialize, Serialize};

/// The two directions a king can castle in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CastlingSide {
    Kingside,
    Queenside,
}

impl CastlingSide {
    pub const ALL: [CastlingSide; 2] = [CastlingSide::Kingside, CastlingSide::Queenside];

    /// Column of this side's rook before castling.
    #[inline]
    pub const fn rook_col(self) -> u8 {
        match self {
            CastlingSide::Kingside => 8,
            CastlingSide::Queenside => 1,
        }
    }

    /// Column the king lands on.
    #[inline]
    pub const fn king_target_col(self) -> u8 {
        match self {
            CastlingSide::Kingside => 7,
            CastlingSide::Queenside => 3,
        }
    }

    /// The castling side whose rook starts on `pos`, with the rook's color.
    pub fn from_rook_corner(pos: Position) -> Option<(Color, CastlingSide)> {
        let color = match pos.row() {
            1 => Color::White,
            8 => Color::Black,
            _ => return None,
        };
        match pos.col() {
            8 => Some((color, CastlingSide::Kingside)),
            1 => Some((color, CastlingSide::Queenside)),
            _ => None,
        }
    }
}

/// Castling rights flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// Creates new castling rights from flags.
    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    const fn flag(color: Color, side: CastlingSide) -> u8 {
        match (color, side) {
            (Color::White, CastlingSide::Kingside) => Self::WHITE_KINGSIDE,
            (Color::White, CastlingSide::Queenside) => Self::WHITE_QUEENSIDE,
            (Color::Black, CastlingSide::Kingside) => Self::BLACK_KINGSIDE,
            (Color::Black, CastlingSide::Queenside) => Self::BLACK_QUEENSIDE,
        }
    }

    /// Returns true if `color` may still castle on `side`.
    #[inline]
    pub const fn has(self, color: Color, side: CastlingSide) -> bool {
        (self.0 & Self::flag(color, side)) != 0
    }

    /// Removes one castling right.
    #[inline]
    pub fn revoke(&mut self, color: Color, side: CastlingSide) {
        self.0 &= !Self::flag(color, side);
    }

    /// Removes both castling rights of a color.
    #[inline]
    pub fn revoke_color(&mut self, color: Color) {
        self.revoke(color, CastlingSide::Kingside);
        self.revoke(color, CastlingSide::Queenside);
    }

    /// Returns the raw flags.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Parses the FEN castling field ("KQkq", "Kq", "-", ...).
    pub fn from_fen_field(field: &str) -> Result<Self, FenError> {
        if field == "-" {
            return Ok(Self::NONE);
        }
        let mut flags = 0u8;
        for c in field.chars() {
            flags |= match c {
                'K' => Self::WHITE_KINGSIDE,
                'Q' => Self::WHITE_QUEENSIDE,
                'k' => Self::BLACK_KINGSIDE,
                'q' => Self::BLACK_QUEENSIDE,
                other => {
                    return Err(FenError::InvalidCastlingRights(format!(
                        "invalid character '{}'",
                        other
                    )))
                }
            };
        }
        Ok(Self::new(flags))
    }

    /// Formats the rights as the FEN castling field, in "KQkq" order.
    pub fn to_fen_field(self) -> String {
        if self.0 == 0 {
            return "-".to_string();
        }
        let mut field = String::with_capacity(4);
        for color in Color::ALL {
            for side in CastlingSide::ALL {
                if self.has(color, side) {
                    let c = match side {
                        CastlingSide::Kingside => 'k',
                        CastlingSide::Queenside => 'q',
                    };
                    field.push(match color {
                        Color::White => c.to_ascii_uppercase(),
                        Color::Black => c,
                    });
                }
            }
        }
        field
    }
}

/// An open en-passant opportunity: the skipped square and the pawn that skipped it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnPassant {
    pub square: Position,
    pub pawn: PieceId,
}

/// Mutable rule state of a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub castling: CastlingRights,
    /// Lives for exactly one move after a double pawn push.
    pub en_passant: Option<EnPassant>,
    /// Moves since the last capture or pawn move.
    pub halfmove_clock: u32,
    /// Starts at 1, increments after Black's move.
    pub fullmove_number: u32,
    pub side_to_move: Color,
}

impl GameState {
    /// State at the start of a standard game.
    pub fn new() -> Self {
        GameState {
            castling: CastlingRights::ALL,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            side_to_move: Color::White,
        }
    }

    pub(crate) fn update_fullmove_number(&mut self, m: &Move) {
        if m.color() == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
    }

    pub(crate) fn update_halfmove_clock(&mut self, m: &Move) {
        if m.is_capture() || m.kind() == PieceKind::Pawn {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
    }

    /// Revokes the rights a move forfeits.
    ///
    /// Rights are tracked per move, not re-verified against occupancy: a rook
    /// that leaves its corner loses the right even if it later returns.
    pub(crate) fn update_castling(&mut self, m: &Move) {
        match m.kind() {
            PieceKind::King => self.castling.revoke_color(m.color()),
            PieceKind::Rook => {
                if let Some((color, side)) = CastlingSide::from_rook_corner(m.from()) {
                    if color == m.color() {
                        self.castling.revoke(color, side);
                    }
                }
            }
            _ => {}
        }

        if let Some(capture) = m.captured() {
            if capture.kind == PieceKind::Rook {
                if let Some((color, side)) = CastlingSide::from_rook_corner(capture.square) {
                    if color == m.color().opposite() {
                        self.castling.revoke(color, side);
                    }
                }
            }
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
