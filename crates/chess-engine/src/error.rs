//! Error type for engine operations.

use chess_core::FenError;
use thiserror::Error;

/// Errors reported by the rules engine.
///
/// None of these are recovered from internally; the caller decides whether to
/// reject a UI action, show a message, or abort.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The move is not playable: the mover does not own the piece, or the move
    /// is not among the current legal moves.
    #[error("illegal move: {0}")]
    IllegalMove(String),

    /// The FEN string could not be tokenized.
    #[error("malformed position: {0}")]
    MalformedPosition(#[from] FenError),

    /// The FEN string parsed but describes an impossible position.
    #[error("invalid position: {0}")]
    InvalidPosition(String),

    /// A piece expected on a square was missing. Indicates an earlier bug.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}
