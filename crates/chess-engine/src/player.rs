//! Players and their piece rosters.

use crate::{Board, PieceId};
use chess_core::Color;

/// One side of the game.
///
/// The roster is an index into the board, not an ownership relation. The
/// game keeps it in sync on capture and reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    name: String,
    color: Color,
    pieces: Vec<PieceId>,
}

impl Player {
    /// Creates a player with an empty roster.
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Player {
            name: name.into(),
            color,
            pieces: Vec::new(),
        }
    }

    /// Creates a player whose roster lists every piece of its color on `board`.
    pub fn from_board(name: impl Into<String>, color: Color, board: &Board) -> Self {
        let mut player = Player::new(name, color);
        player.pieces = board.pieces_of(color).map(|p| p.id()).collect();
        player
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Handles of this player's pieces still on the board.
    pub fn pieces(&self) -> &[PieceId] {
        &self.pieces
    }

    /// Returns true if the piece belongs to this player.
    pub fn owns(&self, id: PieceId) -> bool {
        self.pieces.contains(&id)
    }

    /// Drops a piece from the roster. Returns false if it was not listed.
    pub(crate) fn remove_piece(&mut self, id: PieceId) -> bool {
        match self.pieces.iter().position(|&p| p == id) {
            Some(idx) => {
                self.pieces.swap_remove(idx);
                true
            }
            None => false,
        }
    }
}
