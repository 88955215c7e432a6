//! The 8×8 board and the mechanical effect of moves on it.

use crate::{GameError, Move, Piece, PieceId};
use chess_core::{Color, PieceKind, Position};
use std::fmt;

/// Board contents.
///
/// The board owns every piece in an arena indexed by [`PieceId`]; each square
/// holds the handle of the piece standing on it. Captured pieces leave an
/// empty slot behind so that handles are never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pieces: Vec<Option<Piece>>,
    squares: [Option<PieceId>; 64],
}

impl Board {
    /// Creates an empty board.
    pub fn empty() -> Self {
        Board {
            pieces: Vec::with_capacity(32),
            squares: [None; 64],
        }
    }

    /// Creates a board holding the given pieces, in order.
    ///
    /// Later placements on an already occupied square replace the earlier piece
    /// and take over its handle, so the arena never holds more than 64 slots.
    pub fn from_placements<I>(placements: I) -> Self
    where
        I: IntoIterator<Item = (Position, PieceKind, Color)>,
    {
        let mut board = Board::empty();
        for (pos, kind, color) in placements {
            board.place(kind, color, pos);
        }
        board
    }

    /// Puts a new piece on `pos` and returns its handle.
    pub(crate) fn place(&mut self, kind: PieceKind, color: Color, pos: Position) -> PieceId {
        let id = match self.squares[pos.index()] {
            Some(old) => {
                self.pieces[old.index()] = Some(Piece::new(old, kind, color, pos));
                old
            }
            None => {
                let id = PieceId::new(self.pieces.len());
                self.pieces.push(Some(Piece::new(id, kind, color, pos)));
                id
            }
        };
        self.squares[pos.index()] = Some(id);
        id
    }

    /// Returns the piece with the given handle, if it is still on the board.
    #[inline]
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.index()).and_then(Option::as_ref)
    }

    #[inline]
    pub(crate) fn piece_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Returns the piece standing on `pos`, if any.
    #[inline]
    pub fn piece_at(&self, pos: Position) -> Option<&Piece> {
        self.squares[pos.index()].and_then(|id| self.piece(id))
    }

    #[inline]
    pub fn is_empty(&self, pos: Position) -> bool {
        self.squares[pos.index()].is_none()
    }

    /// Iterates over all pieces on the board.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().flatten()
    }

    /// Iterates over the pieces of one color.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> {
        self.pieces().filter(move |p| p.color() == color)
    }

    /// Returns the king of the given color.
    pub fn king(&self, color: Color) -> Option<&Piece> {
        self.pieces_of(color).find(|p| p.kind() == PieceKind::King)
    }

    pub(crate) fn set_en_passant_target(&mut self, id: PieceId, flag: bool) {
        if let Some(piece) = self.piece_mut(id) {
            piece.set_en_passant_target(flag);
        }
    }

    /// Applies the mechanical effect of a move.
    ///
    /// Legality is not checked. Every handle the move refers to is verified
    /// before anything is changed, so on error the board is left untouched.
    pub(crate) fn apply_move(&mut self, m: &Move) -> Result<(), GameError> {
        self.expect_piece(m.piece(), m.from())?;
        if let Some(capture) = m.captured() {
            self.expect_piece(capture.piece, capture.square)?;
        }
        let rook_move = if m.is_castling() {
            let (rook_from, rook_to) = castling_rook_squares(m)?;
            let rook = self.piece_at(rook_from).map(Piece::id).ok_or_else(|| {
                GameError::InvariantViolation(format!("no rook on {} to castle with", rook_from))
            })?;
            Some((rook, rook_from, rook_to))
        } else {
            None
        };

        if let Some(capture) = m.captured() {
            self.squares[capture.square.index()] = None;
            self.pieces[capture.piece.index()] = None;
        }

        self.relocate(m.piece(), m.from(), m.to());

        if let Some(kind) = m.promotion() {
            if let Some(piece) = self.piece_mut(m.piece()) {
                piece.set_kind(kind);
            }
        }

        if let Some((rook, rook_from, rook_to)) = rook_move {
            self.relocate(rook, rook_from, rook_to);
        }

        Ok(())
    }

    fn expect_piece(&self, id: PieceId, pos: Position) -> Result<(), GameError> {
        match self.piece_at(pos) {
            Some(piece) if piece.id() == id => Ok(()),
            _ => Err(GameError::InvariantViolation(format!(
                "expected piece #{} on {}",
                id.index(),
                pos
            ))),
        }
    }

    fn relocate(&mut self, id: PieceId, from: Position, to: Position) {
        self.squares[from.index()] = None;
        self.squares[to.index()] = Some(id);
        if let Some(piece) = self.piece_mut(id) {
            piece.set_position(to);
        }
    }

    /// Returns the piece placement field of FEN for this board.
    pub fn placement_string(&self) -> String {
        let mut out = String::with_capacity(72);
        for row in (1..=8u8).rev() {
            let mut empty_count = 0;
            for col in 1..=8u8 {
                match Position::new(row, col).and_then(|pos| self.piece_at(pos)) {
                    Some(piece) => {
                        if empty_count > 0 {
                            out.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        out.push(piece.fen_char());
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                out.push_str(&empty_count.to_string());
            }
            if row > 1 {
                out.push('/');
            }
        }
        out
    }
}

/// Where the rook starts and lands for a castling move.
fn castling_rook_squares(m: &Move) -> Result<(Position, Position), GameError> {
    let row = m.from().row();
    let kingside = m.to().col() > m.from().col();
    let rook_from_col = if kingside { 8 } else { 1 };
    // The rook lands on the square the king passed over.
    let rook_to_col = (m.from().col() + m.to().col()) / 2;
    match (Position::new(row, rook_from_col), Position::new(row, rook_to_col)) {
        (Some(from), Some(to)) => Ok((from, to)),
        _ => Err(GameError::InvariantViolation(format!(
            "castling move {} has no rook squares",
            m
        ))),
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (1..=8u8).rev() {
            write!(f, "{} ", row)?;
            for col in 1..=8u8 {
                let c = Position::new(row, col)
                    .and_then(|pos| self.piece_at(pos))
                    .map(Piece::fen_char)
                    .unwrap_or('.');
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}
