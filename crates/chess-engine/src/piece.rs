//! Pieces on the board and their pseudo-legal move generation.
//!
//! Generation here only knows piece geometry and blocking. It does not know
//! whether a move leaves the mover's king attacked, and it does not produce
//! castling moves; both are decided by [`Game`](crate::Game).

use crate::{Board, Move};
use chess_core::{Color, PieceKind, Position};

/// Stable handle to a piece owned by a [`Board`].
///
/// Handles stay valid while the piece is on the board, including across
/// promotion. A captured piece's handle is never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(u8);

impl PieceId {
    /// Arena indices fit in a byte: a board holds one slot per occupied square.
    #[inline]
    pub(crate) const fn new(index: usize) -> Self {
        debug_assert!(index <= u8::MAX as usize);
        PieceId(index as u8)
    }

    /// Returns the arena index of this handle.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A piece standing on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    id: PieceId,
    kind: PieceKind,
    color: Color,
    position: Position,
    en_passant_target: bool,
}

impl Piece {
    pub(crate) fn new(id: PieceId, kind: PieceKind, color: Color, position: Position) -> Self {
        Piece {
            id,
            kind,
            color,
            position,
            en_passant_target: false,
        }
    }

    #[inline]
    pub fn id(&self) -> PieceId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Returns the square this piece stands on.
    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Returns true if this is a pawn that just made a double push and may be
    /// captured en passant on the next move.
    #[inline]
    pub fn is_en_passant_target(&self) -> bool {
        self.en_passant_target
    }

    /// Returns the FEN letter of this piece.
    #[inline]
    pub fn fen_char(&self) -> char {
        self.kind.to_fen_char(self.color)
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub(crate) fn set_kind(&mut self, kind: PieceKind) {
        self.kind = kind;
    }

    pub(crate) fn set_en_passant_target(&mut self, flag: bool) {
        self.en_passant_target = flag;
    }

    /// Generates the pseudo-legal moves of this piece.
    ///
    /// `en_passant` is the square currently open to an en-passant capture, if any.
    pub fn pseudo_legal_moves(&self, board: &Board, en_passant: Option<Position>) -> Vec<Move> {
        let mut moves = Vec::new();
        match self.kind {
            PieceKind::Pawn => self.pawn_moves(board, en_passant, &mut moves),
            PieceKind::Knight | PieceKind::King => self.step_moves(board, &mut moves),
            PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
                self.slide_moves(board, &mut moves)
            }
        }
        moves
    }

    /// Returns the two forward diagonals a pawn attacks, whether or not they are occupied.
    ///
    /// Empty for every other kind.
    pub fn pawn_attacks(&self) -> Vec<Position> {
        if self.kind != PieceKind::Pawn {
            return Vec::new();
        }
        let dir = self.color.pawn_direction();
        [-1, 1]
            .into_iter()
            .filter_map(|dc| self.position.offset(dir, dc))
            .collect()
    }

    fn slide_moves(&self, board: &Board, moves: &mut Vec<Move>) {
        for &(dr, dc) in self.kind.steps() {
            let mut cursor = self.position.offset(dr, dc);
            while let Some(to) = cursor {
                match board.piece_at(to) {
                    None => moves.push(Move::new(self, to, None, None)),
                    Some(other) => {
                        if other.color != self.color {
                            moves.push(Move::new(self, to, Some(other), None));
                        }
                        break;
                    }
                }
                cursor = to.offset(dr, dc);
            }
        }
    }

    fn step_moves(&self, board: &Board, moves: &mut Vec<Move>) {
        for &(dr, dc) in self.kind.steps() {
            let Some(to) = self.position.offset(dr, dc) else {
                continue;
            };
            match board.piece_at(to) {
                None => moves.push(Move::new(self, to, None, None)),
                Some(other) if other.color != self.color => {
                    moves.push(Move::new(self, to, Some(other), None))
                }
                Some(_) => {}
            }
        }
    }

    fn pawn_moves(&self, board: &Board, en_passant: Option<Position>, moves: &mut Vec<Move>) {
        let dir = self.color.pawn_direction();

        if let Some(one) = self.position.offset(dir, 0) {
            if board.is_empty(one) {
                self.push_pawn_move(one, None, moves);

                if self.position.row() == self.color.pawn_row() {
                    if let Some(two) = self.position.offset(2 * dir, 0) {
                        if board.is_empty(two) {
                            moves.push(Move::new(self, two, None, None));
                        }
                    }
                }
            }
        }

        for to in self.pawn_attacks() {
            match board.piece_at(to) {
                Some(other) if other.color != self.color => {
                    self.push_pawn_move(to, Some(other), moves)
                }
                Some(_) => {}
                None if en_passant == Some(to) => {
                    // The victim stands beside us, on the file we capture towards.
                    let victim = Position::new(self.position.row(), to.col())
                        .and_then(|sq| board.piece_at(sq))
                        .filter(|p| p.kind == PieceKind::Pawn && p.color != self.color);
                    if let Some(victim) = victim {
                        moves.push(Move::new(self, to, Some(victim), None));
                    }
                }
                None => {}
            }
        }
    }

    fn push_pawn_move(&self, to: Position, captured: Option<&Piece>, moves: &mut Vec<Move>) {
        if to.row() == self.color.promotion_row() {
            for kind in PieceKind::PROMOTIONS {
                moves.push(Move::new(self, to, captured, Some(kind)));
            }
        } else {
            moves.push(Move::new(self, to, captured, None));
        }
    }
}
