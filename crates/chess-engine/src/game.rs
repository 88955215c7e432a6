//! Game management: legality, check detection, and move application.
//!
//! The [`Game`] struct composes the board, both players, and the rule state,
//! and is the only way to change any of them. Legal moves are found by
//! generating pseudo-legal moves, then playing each candidate on an
//! independent clone of the game and rejecting those that leave the mover's
//! king attacked.

use crate::state::CastlingSide;
use crate::{mov, Board, EnPassant, GameError, GameState, Move, Piece, Player};
use chess_core::{Color, FenParser, PieceKind, Position};
use serde::{Deserialize, Serialize};

/// Default name of the White player.
pub const DEFAULT_WHITE_NAME: &str = "Player 1";
/// Default name of the Black player.
pub const DEFAULT_BLACK_NAME: &str = "Player 2";

/// Where the side to move stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// Not in check, at least one legal move.
    Ongoing,
    /// In check, at least one legal move.
    Check,
    /// In check, no legal moves.
    Checkmate,
    /// Not in check, no legal moves.
    Stalemate,
}

impl GameStatus {
    /// Returns true if the game cannot continue.
    pub fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Checkmate | GameStatus::Stalemate)
    }
}

/// A chess game.
///
/// `Clone` produces a fully independent copy: pieces live in the board's
/// arena and everything else refers to them by plain handles, so nothing is
/// shared between a game and its clone.
#[derive(Debug, Clone)]
pub struct Game {
    pub(crate) board: Board,
    pub(crate) players: [Player; 2],
    pub(crate) state: GameState,
    pub(crate) history: Vec<Move>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a new game with the standard starting position.
    pub fn new() -> Self {
        Self::with_players(DEFAULT_WHITE_NAME, DEFAULT_BLACK_NAME)
    }

    /// Creates a new game with the standard starting position and named players.
    pub fn with_players(white: impl Into<String>, black: impl Into<String>) -> Self {
        let board = Board::from_placements(FenParser::default().placements());
        Game {
            players: [
                Player::from_board(white, Color::White, &board),
                Player::from_board(black, Color::Black, &board),
            ],
            board,
            state: GameState::new(),
            history: Vec::new(),
        }
    }

    /// Renames both players.
    pub fn set_player_names(&mut self, white: impl Into<String>, black: impl Into<String>) {
        self.players[Color::White.index()].set_name(white);
        self.players[Color::Black.index()].set_name(black);
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Returns the piece standing on `pos`, if any.
    pub fn piece_at(&self, pos: Position) -> Option<&Piece> {
        self.board.piece_at(pos)
    }

    pub fn player(&self, color: Color) -> &Player {
        &self.players[color.index()]
    }

    /// Returns the player whose turn it is.
    pub fn current_player(&self) -> &Player {
        self.player(self.state.side_to_move)
    }

    pub fn side_to_move(&self) -> Color {
        self.state.side_to_move
    }

    /// Returns the moves played so far, oldest first.
    pub fn move_history(&self) -> &[Move] {
        &self.history
    }

    /// Returns the number of half-moves (plies) played.
    pub fn ply_count(&self) -> usize {
        self.history.len()
    }

    /// Pseudo-legal moves of the piece on `pos`, including castling candidates for a king.
    ///
    /// Castling candidates only require the right to be held, the own rook to
    /// stand on its corner, and the squares between king and rook to be empty.
    /// Check and attacked transit squares are handled by [`legal_moves_from`](Self::legal_moves_from).
    pub fn moves_from(&self, pos: Position) -> Vec<Move> {
        let Some(piece) = self.board.piece_at(pos) else {
            return Vec::new();
        };
        let mut moves = self.piece_moves(piece);
        if piece.kind() == PieceKind::King {
            moves.extend(self.castling_candidates(piece));
        }
        moves
    }

    fn piece_moves(&self, piece: &Piece) -> Vec<Move> {
        piece.pseudo_legal_moves(&self.board, self.state.en_passant.map(|ep| ep.square))
    }

    fn castling_candidates(&self, king: &Piece) -> Vec<Move> {
        let color = king.color();
        let row = color.back_row();
        if Position::new(row, 5) != Some(king.position()) {
            return Vec::new();
        }

        CastlingSide::ALL
            .into_iter()
            .filter(|&side| self.state.castling.has(color, side))
            .filter_map(|side| {
                let rook_sq = Position::new(row, side.rook_col())?;
                let rook = self
                    .board
                    .piece_at(rook_sq)
                    .filter(|p| p.kind() == PieceKind::Rook && p.color() == color)?;
                let (lo, hi) = ordered(king.position().col(), rook.position().col());
                let path_clear = (lo + 1..hi)
                    .filter_map(|col| Position::new(row, col))
                    .all(|sq| self.board.is_empty(sq));
                if !path_clear {
                    return None;
                }
                let target = Position::new(row, side.king_target_col())?;
                Some(Move::new(king, target, None, None))
            })
            .collect()
    }

    /// Pseudo-legal moves of every piece in a player's roster, castling excluded.
    pub fn pseudo_legal_moves_for_player(&self, color: Color) -> Vec<Move> {
        self.player(color)
            .pieces()
            .iter()
            .filter_map(|&id| self.board.piece(id))
            .flat_map(|piece| self.piece_moves(piece))
            .collect()
    }

    /// Legal moves of the piece on `pos`.
    ///
    /// Empty if the square is empty or holds a piece of the side not to move.
    pub fn legal_moves_from(&self, pos: Position) -> Result<Vec<Move>, GameError> {
        let Some(piece) = self.board.piece_at(pos) else {
            return Ok(Vec::new());
        };
        if piece.color() != self.state.side_to_move {
            return Ok(Vec::new());
        }

        let color = piece.color();
        let mut legal = Vec::new();
        for m in self.moves_from(pos) {
            if m.is_castling() && self.is_castling_obscured(&m) {
                tracing::trace!(%m, "castling blocked by check or attacked transit square");
                continue;
            }
            if self.after_move(&m)?.is_check(color) {
                tracing::trace!(%m, "rejected: leaves own king attacked");
                continue;
            }
            legal.push(m);
        }
        Ok(legal)
    }

    /// Legal moves of every piece of a player.
    pub fn legal_moves_for_player(&self, color: Color) -> Result<Vec<Move>, GameError> {
        let mut moves = Vec::new();
        for pos in self.roster_positions(color) {
            moves.extend(self.legal_moves_from(pos)?);
        }
        Ok(moves)
    }

    /// Legal moves of the side to move.
    pub fn legal_moves(&self) -> Result<Vec<Move>, GameError> {
        self.legal_moves_for_player(self.state.side_to_move)
    }

    fn has_legal_move(&self) -> Result<bool, GameError> {
        for pos in self.roster_positions(self.state.side_to_move) {
            if !self.legal_moves_from(pos)?.is_empty() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn roster_positions(&self, color: Color) -> Vec<Position> {
        self.player(color)
            .pieces()
            .iter()
            .filter_map(|&id| self.board.piece(id))
            .map(Piece::position)
            .collect()
    }

    /// Returns true if the king of `color` is attacked.
    ///
    /// Only pseudo-legal opponent moves are considered, so this never recurses
    /// into legality checking.
    pub fn is_check(&self, color: Color) -> bool {
        let Some(king) = self.board.king(color) else {
            return false;
        };
        let king_sq = king.position();
        self.pseudo_legal_moves_for_player(color.opposite())
            .iter()
            .any(|m| m.to() == king_sq)
    }

    /// Returns true if `color` attacks `pos`.
    ///
    /// Pawns attack their forward diagonals whether or not anything stands
    /// there, so they are checked separately from their moves.
    pub fn is_field_controlled_by_player(&self, pos: Position, color: Color) -> bool {
        let by_pieces = self
            .pseudo_legal_moves_for_player(color)
            .iter()
            .any(|m| m.to() == pos && m.kind() != PieceKind::Pawn);
        if by_pieces {
            return true;
        }

        self.player(color)
            .pieces()
            .iter()
            .filter_map(|&id| self.board.piece(id))
            .filter(|p| p.kind() == PieceKind::Pawn)
            .any(|pawn| pawn.pawn_attacks().contains(&pos))
    }

    /// Returns true if castling is ruled out by check or an attacked transit square.
    fn is_castling_obscured(&self, m: &Move) -> bool {
        let color = m.color();
        if self.is_check(color) {
            return true;
        }
        let row = m.from().row();
        let (lo, hi) = ordered(m.from().col(), m.to().col());
        (lo..=hi)
            .filter_map(|col| Position::new(row, col))
            .any(|sq| self.is_field_controlled_by_player(sq, color.opposite()))
    }

    /// Returns true if the side to move is checkmated.
    pub fn is_mate(&self) -> Result<bool, GameError> {
        Ok(self.is_check(self.state.side_to_move) && !self.has_legal_move()?)
    }

    /// Returns true if the side to move is stalemated.
    pub fn is_stalemate(&self) -> Result<bool, GameError> {
        Ok(!self.is_check(self.state.side_to_move) && !self.has_legal_move()?)
    }

    /// Classifies the position for the side to move.
    pub fn status(&self) -> Result<GameStatus, GameError> {
        let in_check = self.is_check(self.state.side_to_move);
        let can_move = self.has_legal_move()?;
        Ok(match (in_check, can_move) {
            (true, true) => GameStatus::Check,
            (true, false) => GameStatus::Checkmate,
            (false, true) => GameStatus::Ongoing,
            (false, false) => GameStatus::Stalemate,
        })
    }

    /// Applies a move produced by this game's move generation.
    ///
    /// Only ownership is verified: the moving piece must belong to the side to
    /// move. Use [`try_apply_move`](Self::try_apply_move) for moves that have not
    /// been taken from [`legal_moves_from`](Self::legal_moves_from).
    pub fn apply_move(&mut self, m: Move) -> Result<(), GameError> {
        let mover = self.state.side_to_move;
        match self.board.piece(m.piece()) {
            Some(piece) if piece.color() == mover => {}
            Some(_) => {
                tracing::warn!(%m, side = %mover, "rejected move of opponent's piece");
                return Err(GameError::IllegalMove(format!(
                    "{}: {} can only move their own pieces",
                    m, mover
                )));
            }
            None => {
                return Err(GameError::IllegalMove(format!(
                    "{}: the moving piece is no longer on the board",
                    m
                )))
            }
        }

        let previous_ep = self.state.en_passant;
        if let Some(ep) = previous_ep {
            if self.board.piece(ep.pawn).is_none() {
                return Err(GameError::InvariantViolation(format!(
                    "en passant pawn for {} is missing",
                    ep.square
                )));
            }
        }

        self.board.apply_move(&m)?;

        self.state.update_fullmove_number(&m);
        self.state.update_halfmove_clock(&m);
        if let Some(ep) = self.state.en_passant.take() {
            self.board.set_en_passant_target(ep.pawn, false);
        }
        self.state.update_castling(&m);

        // Promotion keeps the pawn's handle, so the mover's roster entry stays valid.
        if let Some(capture) = m.captured() {
            self.players[mover.opposite().index()].remove_piece(capture.piece);
        }

        if let Some(square) = m.skipped_square() {
            self.state.en_passant = Some(EnPassant {
                square,
                pawn: m.piece(),
            });
            self.board.set_en_passant_target(m.piece(), true);
        }

        self.history.push(m);
        self.state.side_to_move = mover.opposite();

        tracing::debug!(
            %m,
            side = %mover,
            halfmove = self.state.halfmove_clock,
            fullmove = self.state.fullmove_number,
            "applied move"
        );
        Ok(())
    }

    /// Applies a move after confirming it is currently legal.
    pub fn try_apply_move(&mut self, m: Move) -> Result<(), GameError> {
        if !self.legal_moves_from(m.from())?.contains(&m) {
            tracing::warn!(%m, "rejected move not in legal move list");
            return Err(GameError::IllegalMove(m.to_uci()));
        }
        self.apply_move(m)
    }

    /// Returns an independent copy of this game with `m` applied.
    ///
    /// The moving and captured pieces are looked up again by square in the
    /// copy, so the copy can be mutated freely without touching `self`.
    pub fn after_move(&self, m: &Move) -> Result<Game, GameError> {
        let mut copy = self.clone();

        let piece = copy.board.piece_at(m.from()).ok_or_else(|| {
            GameError::InvariantViolation(format!("no piece on {} in simulated game", m.from()))
        })?;
        let captured = match m.captured() {
            Some(capture) => Some(copy.board.piece_at(capture.square).ok_or_else(|| {
                GameError::InvariantViolation(format!(
                    "no captured piece on {} in simulated game",
                    capture.square
                ))
            })?),
            None => None,
        };
        let equivalent = Move::new(piece, m.to(), captured, m.promotion());

        copy.apply_move(equivalent)?;
        Ok(copy)
    }

    /// Finds the legal move matching source, destination, and promotion kind.
    pub fn find_legal_move(
        &self,
        from: Position,
        to: Position,
        promotion: Option<PieceKind>,
    ) -> Result<Option<Move>, GameError> {
        Ok(self
            .legal_moves_from(from)?
            .into_iter()
            .find(|m| m.to() == to && m.promotion() == promotion))
    }

    /// Plays a move given in UCI notation (e.g., "e2e4", "e7e8q").
    pub fn apply_uci(&mut self, uci: &str) -> Result<Move, GameError> {
        let (from, to, promotion) = mov::parse_uci(uci)
            .ok_or_else(|| GameError::IllegalMove(format!("invalid UCI: {}", uci)))?;
        let m = self
            .find_legal_move(from, to, promotion)?
            .ok_or_else(|| GameError::IllegalMove(uci.to_string()))?;
        self.apply_move(m)?;
        Ok(m)
    }
}

fn ordered(a: u8, b: u8) -> (u8, u8) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Position {
        Position::from_algebraic(s).unwrap()
    }

    fn play(game: &mut Game, moves: &[&str]) {
        for uci in moves {
            game.apply_uci(uci).unwrap();
        }
    }

    #[test]
    fn new_game() {
        let game = Game::new();
        assert_eq!(game.ply_count(), 0);
        assert_eq!(game.side_to_move(), Color::White);
        assert_eq!(game.current_player().pieces().len(), 16);
        assert_eq!(game.current_player().name(), DEFAULT_WHITE_NAME);
        assert!(!game.is_check(Color::White));
        assert!(!game.is_check(Color::Black));
        assert_eq!(game.status().unwrap(), GameStatus::Ongoing);
    }

    #[test]
    fn twenty_moves_each_side() {
        let game = Game::new();
        assert_eq!(game.legal_moves_for_player(Color::White).unwrap().len(), 20);
        assert!(!game.is_mate().unwrap());
        assert!(!game.is_stalemate().unwrap());

        let mut game = Game::new();
        play(&mut game, &["g1f3"]);
        assert_eq!(game.legal_moves_for_player(Color::Black).unwrap().len(), 20);
    }

    #[test]
    fn legal_moves_only_for_side_to_move() {
        let game = Game::new();
        assert!(game.legal_moves_from(sq("e7")).unwrap().is_empty());
        assert!(game.legal_moves_from(sq("e4")).unwrap().is_empty());
        assert_eq!(game.legal_moves_from(sq("e2")).unwrap().len(), 2);
        // Pseudo-legal generation does not care whose turn it is.
        assert_eq!(game.moves_from(sq("e7")).len(), 2);
    }

    #[test]
    fn apply_move_rejects_opponent_piece() {
        let mut game = Game::new();
        let black_pawn = game.moves_from(sq("e7"))[0];
        let err = game.apply_move(black_pawn).unwrap_err();
        assert!(matches!(err, GameError::IllegalMove(_)));
        assert_eq!(game.ply_count(), 0);
        assert_eq!(game.to_fen(), FenParser::STARTPOS);
    }

    #[test]
    fn try_apply_move_rejects_pseudo_legal_self_check() {
        // The e2 rook is pinned against the king by the e8 rook.
        let mut game = Game::from_fen("4r2k/8/8/8/8/8/4R3/4K3 w - - 0 1").unwrap();
        let sideways = game
            .moves_from(sq("e2"))
            .into_iter()
            .find(|m| m.to() == sq("a2"))
            .unwrap();
        assert!(matches!(
            game.try_apply_move(sideways),
            Err(GameError::IllegalMove(_))
        ));
        let legal: Vec<_> = game
            .legal_moves_from(sq("e2"))
            .unwrap()
            .iter()
            .map(|m| m.to_uci())
            .collect();
        assert!(legal.iter().all(|u| u[2..3] == *"e"));
        assert!(legal.contains(&"e2e8".to_string()));
    }

    #[test]
    fn apply_uci_rejects_unknown_and_illegal() {
        let mut game = Game::new();
        assert!(matches!(
            game.apply_uci("e2e5"),
            Err(GameError::IllegalMove(_))
        ));
        assert!(matches!(
            game.apply_uci("nonsense"),
            Err(GameError::IllegalMove(_))
        ));
        let m = game.apply_uci("e2e4").unwrap();
        assert!(m.is_double_pawn_move());
    }

    #[test]
    fn fullmove_and_side_to_move() {
        let mut game = Game::new();
        play(&mut game, &["e2e4"]);
        assert_eq!(game.side_to_move(), Color::Black);
        assert_eq!(game.state().fullmove_number, 1);
        play(&mut game, &["e7e5"]);
        assert_eq!(game.side_to_move(), Color::White);
        assert_eq!(game.state().fullmove_number, 2);
    }

    #[test]
    fn en_passant_target_lives_one_move() {
        let mut game = Game::new();
        play(&mut game, &["e2e4"]);
        let ep = game.state().en_passant.unwrap();
        assert_eq!(ep.square, sq("e3"));
        assert!(game.piece_at(sq("e4")).unwrap().is_en_passant_target());

        play(&mut game, &["g8f6"]);
        assert_eq!(game.state().en_passant, None);
        assert!(!game.piece_at(sq("e4")).unwrap().is_en_passant_target());
    }

    #[test]
    fn en_passant_capture() {
        let mut game = Game::new();
        play(&mut game, &["e2e4", "a7a6", "e4e5", "d7d5"]);

        let ep = game
            .legal_moves_from(sq("e5"))
            .unwrap()
            .into_iter()
            .find(|m| m.to() == sq("d6"))
            .unwrap();
        assert!(ep.is_en_passant());
        game.apply_move(ep).unwrap();

        assert!(game.piece_at(sq("d5")).is_none());
        assert!(game.piece_at(sq("e5")).is_none());
        assert!(game.piece_at(sq("d7")).is_none());
        assert_eq!(game.piece_at(sq("d6")).unwrap().kind(), PieceKind::Pawn);
        assert_eq!(game.player(Color::Black).pieces().len(), 15);
        assert_eq!(game.state().halfmove_clock, 0);
    }

    #[test]
    fn en_passant_expires() {
        let mut game = Game::new();
        play(&mut game, &["e2e4", "a7a6", "e4e5", "d7d5", "h2h3", "h7h6"]);
        assert!(game.find_legal_move(sq("e5"), sq("d6"), None).unwrap().is_none());
    }

    #[test]
    fn king_move_revokes_castling_permanently() {
        let mut game = Game::new();
        play(&mut game, &["e2e4", "e7e5", "e1e2", "e8e7", "e2e1", "e7e8"]);
        assert_eq!(game.state().castling.to_fen_field(), "-");
        assert_eq!(game.piece_at(sq("e1")).unwrap().kind(), PieceKind::King);
    }

    #[test]
    fn castling_kingside_moves_rook() {
        let mut game = Game::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        let castles: Vec<String> = game
            .legal_moves_from(sq("e1"))
            .unwrap()
            .iter()
            .filter(|m| m.is_castling())
            .map(|m| m.to_uci())
            .collect();
        assert_eq!(castles.len(), 2);

        play(&mut game, &["e1g1"]);
        assert_eq!(game.piece_at(sq("g1")).unwrap().kind(), PieceKind::King);
        assert_eq!(game.piece_at(sq("f1")).unwrap().kind(), PieceKind::Rook);
        assert!(game.piece_at(sq("h1")).is_none());
        assert_eq!(game.state().castling.to_fen_field(), "kq");
        assert_eq!(game.state().halfmove_clock, 1);
    }

    #[test]
    fn no_castling_through_attacked_square() {
        // The black rook on f8 covers f1.
        let game = Game::from_fen("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        let castles: Vec<String> = game
            .legal_moves_from(sq("e1"))
            .unwrap()
            .iter()
            .filter(|m| m.is_castling())
            .map(|m| m.to_uci())
            .collect();
        assert_eq!(castles, vec!["e1c1"]);
    }

    #[test]
    fn no_castling_out_of_check() {
        let game = Game::from_fen("4k3/8/8/8/8/8/8/R3K2r w Q - 0 1").unwrap();
        assert!(game.is_check(Color::White));
        assert!(game
            .legal_moves_from(sq("e1"))
            .unwrap()
            .iter()
            .all(|m| !m.is_castling()));
    }

    #[test]
    fn queenside_castling_ignores_attacked_b_file() {
        // b1 is attacked but the king never crosses it.
        let mut game = Game::from_fen("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
        let m = game.find_legal_move(sq("e1"), sq("c1"), None).unwrap().unwrap();
        game.apply_move(m).unwrap();
        assert_eq!(game.piece_at(sq("d1")).unwrap().kind(), PieceKind::Rook);
    }

    #[test]
    fn no_castling_when_blocked_or_rook_missing() {
        let game = Game::from_fen("4k3/8/8/8/8/8/8/RN2K1NR w KQ - 0 1").unwrap();
        assert!(game.moves_from(sq("e1")).iter().all(|m| !m.is_castling()));

        // Right still recorded, but the rook is gone from h1.
        let game = Game::from_fen("4k3/8/8/8/8/8/8/4K3 w K - 0 1").unwrap();
        assert!(game.moves_from(sq("e1")).iter().all(|m| !m.is_castling()));
    }

    #[test]
    fn rook_capture_in_corner_revokes_right() {
        let mut game = Game::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        play(&mut game, &["h1h8"]);
        assert_eq!(game.state().castling.to_fen_field(), "Qq");
        assert_eq!(game.player(Color::Black).pieces().len(), 2);
    }

    #[test]
    fn fools_mate() {
        let mut game = Game::new();
        play(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert!(game.is_check(Color::White));
        assert!(game.is_mate().unwrap());
        assert!(!game.is_stalemate().unwrap());
        assert!(game.legal_moves().unwrap().is_empty());
        assert_eq!(game.status().unwrap(), GameStatus::Checkmate);
        assert!(game.status().unwrap().is_terminal());
    }

    #[test]
    fn stalemate() {
        let game = Game::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(!game.is_check(Color::Black));
        assert!(game.is_stalemate().unwrap());
        assert!(!game.is_mate().unwrap());
        assert_eq!(game.status().unwrap(), GameStatus::Stalemate);
    }

    #[test]
    fn check_with_escape() {
        let mut game = Game::new();
        play(&mut game, &["e2e4", "f7f6", "d1h5"]);
        assert_eq!(game.status().unwrap(), GameStatus::Check);
        let escapes: Vec<String> = game
            .legal_moves()
            .unwrap()
            .iter()
            .map(|m| m.to_uci())
            .collect();
        assert_eq!(escapes, vec!["g7g6"]);
    }

    #[test]
    fn halfmove_clock() {
        let mut game = Game::new();
        play(&mut game, &["g1f3", "g8f6", "b1c3"]);
        assert_eq!(game.state().halfmove_clock, 3);
        play(&mut game, &["e7e5"]);
        assert_eq!(game.state().halfmove_clock, 0);
        play(&mut game, &["f3e5"]);
        assert_eq!(game.state().halfmove_clock, 0);
        play(&mut game, &["b8c6"]);
        assert_eq!(game.state().halfmove_clock, 1);
    }

    #[test]
    fn promotion_keeps_roster_and_changes_kind() {
        let mut game = Game::from_fen("7k/P7/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let promotions = game.legal_moves_from(sq("a7")).unwrap();
        assert_eq!(promotions.len(), 4);
        let m = game.apply_uci("a7a8n").unwrap();
        let knight = game.piece_at(sq("a8")).unwrap();
        assert_eq!(knight.kind(), PieceKind::Knight);
        assert!(game.player(Color::White).owns(m.piece()));
        assert_eq!(game.player(Color::White).pieces().len(), 2);
    }

    #[test]
    fn capture_updates_roster() {
        let mut game = Game::new();
        play(&mut game, &["e2e4", "d7d5", "e4d5"]);
        assert_eq!(game.player(Color::Black).pieces().len(), 15);
        assert_eq!(game.player(Color::White).pieces().len(), 16);
        let last = game.move_history().last().unwrap();
        assert!(last.is_capture());
    }

    #[test]
    fn after_move_leaves_original_untouched() {
        let game = Game::new();
        let m = game.legal_moves_from(sq("e2")).unwrap()[0];
        let copy = game.after_move(&m).unwrap();
        assert_eq!(game.to_fen(), FenParser::STARTPOS);
        assert_ne!(copy.to_fen(), FenParser::STARTPOS);
        assert_eq!(copy.ply_count(), 1);
        assert_eq!(game.ply_count(), 0);
    }

    #[test]
    fn field_control_uses_pawn_diagonals() {
        let game = Game::new();
        // Pawns attack d3 and f3 even though they cannot move there.
        assert!(game.is_field_controlled_by_player(sq("d3"), Color::White));
        // Nothing reaches e4 at the start; pawn pushes do not count.
        assert!(!game.is_field_controlled_by_player(sq("e4"), Color::White));
        assert!(game.is_field_controlled_by_player(sq("f6"), Color::Black));
    }

    #[test]
    fn move_history_records_in_order() {
        let mut game = Game::new();
        play(&mut game, &["e2e4", "e7e5", "g1f3"]);
        let history: Vec<String> = game.move_history().iter().map(|m| m.to_uci()).collect();
        assert_eq!(history, vec!["e2e4", "e7e5", "g1f3"]);
    }

    #[test]
    fn set_player_names() {
        let mut game = Game::with_players("Alice", "Bob");
        assert_eq!(game.player(Color::Black).name(), "Bob");
        game.set_player_names("Carol", "Dan");
        assert_eq!(game.player(Color::White).name(), "Carol");
    }
}
