//! Move representation.

use crate::{Piece, PieceId};
use chess_core::{Color, PieceKind, Position};
use std::fmt;

/// The piece removed by a capturing move, and where it stood.
///
/// For an en-passant capture `square` is beside the mover's destination,
/// not the destination itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capture {
    pub piece: PieceId,
    pub kind: PieceKind,
    pub square: Position,
}

/// A chess move.
///
/// Moves are ephemeral descriptors produced by move generation. They refer to
/// pieces by handle, so a move is only meaningful against the game it was
/// generated from (or a structural clone of it).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Position,
    to: Position,
    piece: PieceId,
    kind: PieceKind,
    color: Color,
    captured: Option<Capture>,
    promotion: Option<PieceKind>,
    is_double_pawn_move: bool,
    is_castling: bool,
    is_en_passant: bool,
}

impl Move {
    /// Creates a move of `piece` to `to`, deriving the special-move flags.
    pub fn new(
        piece: &Piece,
        to: Position,
        captured: Option<&Piece>,
        promotion: Option<PieceKind>,
    ) -> Self {
        let from = piece.position();
        let kind = piece.kind();
        let captured = captured.map(|c| Capture {
            piece: c.id(),
            kind: c.kind(),
            square: c.position(),
        });

        Move {
            from,
            to,
            piece: piece.id(),
            kind,
            color: piece.color(),
            captured,
            promotion,
            is_double_pawn_move: kind == PieceKind::Pawn && from.row().abs_diff(to.row()) == 2,
            is_castling: kind == PieceKind::King && from.col().abs_diff(to.col()) == 2,
            is_en_passant: kind == PieceKind::Pawn && captured.is_some_and(|c| c.square != to),
        }
    }

    #[inline]
    pub fn from(&self) -> Position {
        self.from
    }

    #[inline]
    pub fn to(&self) -> Position {
        self.to
    }

    /// Returns the handle of the moving piece.
    #[inline]
    pub fn piece(&self) -> PieceId {
        self.piece
    }

    /// Returns the kind of the moving piece before any promotion.
    #[inline]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Returns the color of the moving piece.
    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn captured(&self) -> Option<Capture> {
        self.captured
    }

    #[inline]
    pub fn promotion(&self) -> Option<PieceKind> {
        self.promotion
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// Returns true for a pawn advancing two rows from its start row.
    #[inline]
    pub fn is_double_pawn_move(&self) -> bool {
        self.is_double_pawn_move
    }

    /// Returns true for a king moving two columns.
    #[inline]
    pub fn is_castling(&self) -> bool {
        self.is_castling
    }

    #[inline]
    pub fn is_en_passant(&self) -> bool {
        self.is_en_passant
    }

    /// Returns the square skipped by a double pawn push.
    pub fn skipped_square(&self) -> Option<Position> {
        if !self.is_double_pawn_move {
            return None;
        }
        Position::new((self.from.row() + self.to.row()) / 2, self.to.col())
    }

    /// Returns the UCI notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_uci(&self) -> String {
        match self.promotion {
            Some(kind) => format!("{}{}{}", self.from, self.to, kind.to_char()),
            None => format!("{}{}", self.from, self.to),
        }
    }
}

/// Splits UCI notation into source, destination, and promotion kind.
///
/// Only the syntax is checked; whether such a move exists is up to the game.
pub fn parse_uci(s: &str) -> Option<(Position, Position, Option<PieceKind>)> {
    if !s.is_ascii() || s.len() < 4 || s.len() > 5 {
        return None;
    }
    let from = Position::from_algebraic(&s[0..2])?;
    let to = Position::from_algebraic(&s[2..4])?;
    let promotion = match s[4..].chars().next() {
        Some(c) => Some(PieceKind::from_char(c.to_ascii_lowercase()).filter(|k| k.is_promotable())?),
        None => None,
    };
    Some((from, to, promotion))
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self.to_uci())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Board;
    use chess_core::FenParser;

    fn sq(s: &str) -> Position {
        Position::from_algebraic(s).unwrap()
    }

    fn board(fen: &str) -> Board {
        Board::from_placements(FenParser::parse(fen).unwrap().placements())
    }

    #[test]
    fn double_pawn_move_flag() {
        let b = board(FenParser::STARTPOS);
        let pawn = b.piece_at(sq("e2")).unwrap();
        let single = Move::new(pawn, sq("e3"), None, None);
        let double = Move::new(pawn, sq("e4"), None, None);
        assert!(!single.is_double_pawn_move());
        assert!(double.is_double_pawn_move());
        assert_eq!(double.skipped_square(), Some(sq("e3")));
        assert_eq!(single.skipped_square(), None);
    }

    #[test]
    fn castling_flag() {
        let b = board("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let king = b.piece_at(sq("e1")).unwrap();
        assert!(Move::new(king, sq("g1"), None, None).is_castling());
        assert!(Move::new(king, sq("c1"), None, None).is_castling());
        assert!(!Move::new(king, sq("f1"), None, None).is_castling());
    }

    #[test]
    fn en_passant_flag() {
        let b = board("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
        let pawn = b.piece_at(sq("e5")).unwrap();
        let victim = b.piece_at(sq("d5")).unwrap();
        let m = Move::new(pawn, sq("d6"), Some(victim), None);
        assert!(m.is_en_passant());
        assert!(m.is_capture());
        assert_eq!(m.captured().unwrap().square, sq("d5"));
        assert_eq!(m.captured().unwrap().kind, PieceKind::Pawn);
    }

    #[test]
    fn ordinary_capture_is_not_en_passant() {
        let b = board("4k3/8/3p4/4P3/8/8/8/4K3 w - - 0 1");
        let pawn = b.piece_at(sq("e5")).unwrap();
        let victim = b.piece_at(sq("d6")).unwrap();
        let m = Move::new(pawn, sq("d6"), Some(victim), None);
        assert!(m.is_capture());
        assert!(!m.is_en_passant());
    }

    #[test]
    fn move_uci() {
        let b = board("4k3/P7/8/8/8/8/4P3/4K3 w - - 0 1");
        let e2 = b.piece_at(sq("e2")).unwrap();
        assert_eq!(Move::new(e2, sq("e4"), None, None).to_uci(), "e2e4");

        let a7 = b.piece_at(sq("a7")).unwrap();
        let promo = Move::new(a7, sq("a8"), None, Some(PieceKind::Knight));
        assert_eq!(promo.to_uci(), "a7a8n");
        assert_eq!(format!("{:?}", promo), "Move(a7a8n)");
        assert_eq!(format!("{}", promo), "a7a8n");
    }

    #[test]
    fn parse_uci_notation() {
        assert_eq!(parse_uci("e2e4"), Some((sq("e2"), sq("e4"), None)));
        assert_eq!(
            parse_uci("e7e8Q"),
            Some((sq("e7"), sq("e8"), Some(PieceKind::Queen)))
        );
        assert_eq!(parse_uci("e7e8k"), None);
        assert_eq!(parse_uci("e7e8x"), None);
        assert_eq!(parse_uci("e2"), None);
        assert_eq!(parse_uci("e2e9"), None);
        assert_eq!(parse_uci("e2e4qq"), None);
    }
}
