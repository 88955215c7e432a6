//! Front-end interaction state around a [`Game`].
//!
//! A [`GameSession`] is what a board UI holds: the game, the moves cached for
//! the currently selected square, and which seat (if any) is played by a bot.

use crate::{Game, GameError, Move};
use chess_core::{Color, Position};

/// Source of moves for a non-human seat.
///
/// Implementations must return a move that is legal in `game`.
pub trait MoveProvider {
    fn next_move(&mut self, game: &Game) -> Result<Move, GameError>;
}

/// A game plus the caller-side state needed to drive it.
#[derive(Debug, Clone, Default)]
pub struct GameSession {
    game: Game,
    valid_moves: Vec<Move>,
    bot_color: Option<Color>,
}

impl GameSession {
    /// Creates a session on the standard starting position, without a bot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing game.
    pub fn with_game(game: Game, bot_color: Option<Color>) -> Self {
        GameSession {
            game,
            valid_moves: Vec::new(),
            bot_color,
        }
    }

    /// Replaces the game with one loaded from `fen`.
    ///
    /// On error the current game, bot seat, and cached moves are kept.
    pub fn new_game(&mut self, fen: &str, bot_color: Option<Color>) -> Result<(), GameError> {
        let game = Game::from_fen(fen)?;
        let names = (
            self.game.player(Color::White).name().to_string(),
            self.game.player(Color::Black).name().to_string(),
        );
        self.game = game;
        self.game.set_player_names(names.0, names.1);
        self.bot_color = bot_color;
        self.valid_moves.clear();
        tracing::info!(fen, bot = ?bot_color, "new game");
        Ok(())
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Mutable access for renaming players and similar setup.
    pub fn game_mut(&mut self) -> &mut Game {
        self.valid_moves.clear();
        &mut self.game
    }

    pub fn bot_color(&self) -> Option<Color> {
        self.bot_color
    }

    /// Moves cached by the last [`load_moves_from`](Self::load_moves_from).
    pub fn valid_moves(&self) -> &[Move] {
        &self.valid_moves
    }

    pub fn clear_moves(&mut self) {
        self.valid_moves.clear();
    }

    /// Caches and returns the legal moves from `pos`.
    pub fn load_moves_from(&mut self, pos: Position) -> Result<&[Move], GameError> {
        self.valid_moves = self.game.legal_moves_from(pos)?;
        Ok(&self.valid_moves)
    }

    /// Finds a cached move landing on `pos`.
    ///
    /// Promotions are generated queen first, so a plain click on the last
    /// rank promotes to a queen.
    pub fn find_move_to(&self, pos: Position) -> Option<Move> {
        self.valid_moves.iter().find(|m| m.to() == pos).copied()
    }

    /// Plays a move and drops the cached moves.
    pub fn make_move(&mut self, m: Move) -> Result<(), GameError> {
        self.game.apply_move(m)?;
        self.valid_moves.clear();
        Ok(())
    }

    /// Returns true if `pos` holds a piece of the side to move.
    pub fn field_belongs_to_current(&self, pos: Position) -> bool {
        self.game
            .piece_at(pos)
            .is_some_and(|piece| self.game.current_player().owns(piece.id()))
    }

    /// Returns true if the side to move is played by the bot.
    pub fn is_bot_turn(&self) -> bool {
        self.bot_color == Some(self.game.side_to_move())
    }

    /// Lets the bot move if it is its turn. Returns the move played, if any.
    pub fn handle_bot_move(
        &mut self,
        provider: &mut dyn MoveProvider,
    ) -> Result<Option<Move>, GameError> {
        if !self.is_bot_turn() {
            return Ok(None);
        }
        let m = provider.next_move(&self.game)?;
        tracing::debug!(%m, "bot move");
        self.make_move(m)?;
        Ok(Some(m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{FenParser, PieceKind};

    fn sq(s: &str) -> Position {
        Position::from_algebraic(s).unwrap()
    }

    /// Always plays the first legal move.
    struct FirstMove;

    impl MoveProvider for FirstMove {
        fn next_move(&mut self, game: &Game) -> Result<Move, GameError> {
            game.legal_moves()?
                .into_iter()
                .next()
                .ok_or_else(|| GameError::IllegalMove("no legal moves".to_string()))
        }
    }

    #[test]
    fn select_and_move() {
        let mut session = GameSession::new();
        assert!(session.field_belongs_to_current(sq("e2")));
        assert!(!session.field_belongs_to_current(sq("e7")));
        assert!(!session.field_belongs_to_current(sq("e4")));

        assert_eq!(session.load_moves_from(sq("e2")).unwrap().len(), 2);
        let m = session.find_move_to(sq("e4")).unwrap();
        assert!(session.find_move_to(sq("e5")).is_none());
        session.make_move(m).unwrap();

        assert!(session.valid_moves().is_empty());
        assert_eq!(session.game().side_to_move(), Color::Black);
        assert!(session.field_belongs_to_current(sq("e7")));
    }

    #[test]
    fn clear_moves() {
        let mut session = GameSession::new();
        session.load_moves_from(sq("g1")).unwrap();
        assert_eq!(session.valid_moves().len(), 2);
        session.clear_moves();
        assert!(session.valid_moves().is_empty());
    }

    #[test]
    fn find_move_to_prefers_queen_promotion() {
        let mut session =
            GameSession::with_game(Game::from_fen("7k/P7/8/8/8/8/8/K7 w - - 0 1").unwrap(), None);
        session.load_moves_from(sq("a7")).unwrap();
        let m = session.find_move_to(sq("a8")).unwrap();
        assert_eq!(m.promotion(), Some(PieceKind::Queen));
    }

    #[test]
    fn new_game_keeps_state_on_bad_fen() {
        let mut session = GameSession::new();
        session.game_mut().set_player_names("Alice", "Bob");
        let e4 = session.game().find_legal_move(sq("e2"), sq("e4"), None).unwrap();
        session.make_move(e4.unwrap()).unwrap();
        let before = session.game().to_fen();

        assert!(session.new_game("garbage", Some(Color::Black)).is_err());
        assert_eq!(session.game().to_fen(), before);
        assert_eq!(session.bot_color(), None);

        session
            .new_game(FenParser::STARTPOS, Some(Color::Black))
            .unwrap();
        assert_eq!(session.game().to_fen(), FenParser::STARTPOS);
        assert_eq!(session.bot_color(), Some(Color::Black));
        assert_eq!(session.game().player(Color::White).name(), "Alice");
    }

    #[test]
    fn bot_moves_only_on_its_turn() {
        let mut session = GameSession::with_game(Game::new(), Some(Color::Black));
        let mut bot = FirstMove;
        assert!(!session.is_bot_turn());
        assert_eq!(session.handle_bot_move(&mut bot).unwrap(), None);

        let d4 = session.game().find_legal_move(sq("d2"), sq("d4"), None).unwrap();
        session.make_move(d4.unwrap()).unwrap();
        assert!(session.is_bot_turn());
        let played = session.handle_bot_move(&mut bot).unwrap().unwrap();
        assert_eq!(played.color(), Color::Black);
        assert_eq!(session.game().ply_count(), 2);
        assert!(!session.is_bot_turn());
    }

    #[test]
    fn bot_error_leaves_game_untouched() {
        struct Broken;
        impl MoveProvider for Broken {
            fn next_move(&mut self, _game: &Game) -> Result<Move, GameError> {
                Err(GameError::IllegalMove("engine crashed".to_string()))
            }
        }

        let mut session = GameSession::with_game(Game::new(), Some(Color::White));
        assert!(session.handle_bot_move(&mut Broken).is_err());
        assert_eq!(session.game().ply_count(), 0);
    }
}
