//! Chess rules and legality engine.
//!
//! This crate provides:
//! - [`Board`] - 8×8 board owning every piece in an arena
//! - [`Piece`] - pseudo-legal move generation per piece kind
//! - [`Game`] - legality filtering, check/mate/stalemate detection, move application
//! - [`GameSession`] - selection and bot-seat state for a front end
//! - FEN loading and saving via [`Game::from_fen`] and [`Game::to_fen`]
//!
//! # Architecture
//!
//! Pieces live in the board's arena and are referred to everywhere else by
//! [`PieceId`] handles. Because nothing is shared, `Game::clone` is a fully
//! independent copy, which is how legality is decided: each candidate move is
//! played on a clone and rejected if it leaves the mover's king attacked.
//!
//! # Example
//!
//! ```
//! use chess_engine::{Color, Game, Position};
//!
//! let mut game = Game::new();
//! let e2 = Position::from_algebraic("e2").unwrap();
//! assert_eq!(game.legal_moves_from(e2).unwrap().len(), 2);
//!
//! for uci in ["f2f3", "e7e5", "g2g4", "d8h4"] {
//!     game.apply_uci(uci).unwrap();
//! }
//! assert!(game.is_check(Color::White));
//! assert!(game.is_mate().unwrap());
//! ```

mod board;
mod error;
mod fen;
mod game;
mod mov;
pub mod perft;
mod piece;
mod player;
mod session;
mod state;

pub use board::Board;
pub use error::GameError;
pub use game::{Game, GameStatus, DEFAULT_BLACK_NAME, DEFAULT_WHITE_NAME};
pub use mov::{parse_uci, Capture, Move};
pub use piece::{Piece, PieceId};
pub use player::Player;
pub use session::{GameSession, MoveProvider};
pub use state::{CastlingRights, CastlingSide, EnPassant, GameState};

pub use chess_core::{Color, FenError, FenParser, PieceKind, Position};
