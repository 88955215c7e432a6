//! Loading and saving games as FEN.

use crate::game::{DEFAULT_BLACK_NAME, DEFAULT_WHITE_NAME};
use crate::state::{CastlingRights, EnPassant, GameState};
use crate::{Board, Game, GameError, PieceId, Player};
use chess_core::{Color, FenParser, PieceKind, Position};

impl Game {
    /// Creates a game from a FEN string.
    ///
    /// Syntax errors are reported as [`GameError::MalformedPosition`]; a
    /// well-formed string describing a position that cannot occur in play is
    /// reported as [`GameError::InvalidPosition`].
    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        let parsed = FenParser::parse(fen)?;
        let board = Board::from_placements(parsed.placements());
        validate_board(&board)?;

        let en_passant = match parsed.en_passant {
            Some(square) => Some(EnPassant {
                square,
                pawn: en_passant_pawn(&board, square, parsed.active_color)?,
            }),
            None => None,
        };

        let mut game = Game {
            players: [
                Player::from_board(DEFAULT_WHITE_NAME, Color::White, &board),
                Player::from_board(DEFAULT_BLACK_NAME, Color::Black, &board),
            ],
            board,
            state: GameState {
                castling: CastlingRights::from_fen_field(&parsed.castling)?,
                en_passant,
                halfmove_clock: parsed.halfmove_clock,
                fullmove_number: parsed.fullmove_number,
                side_to_move: parsed.active_color,
            },
            history: Vec::new(),
        };
        if let Some(ep) = en_passant {
            game.board.set_en_passant_target(ep.pawn, true);
        }

        if game.is_check(parsed.active_color.opposite()) {
            return Err(GameError::InvalidPosition(format!(
                "{} is in check but it is {}'s turn",
                parsed.active_color.opposite(),
                parsed.active_color
            )));
        }

        tracing::debug!(fen, "loaded position");
        Ok(game)
    }

    /// Returns the FEN representation of the current position.
    pub fn to_fen(&self) -> String {
        FenParser {
            piece_placement: self.board.placement_string(),
            active_color: self.state.side_to_move,
            castling: self.state.castling.to_fen_field(),
            en_passant: self.state.en_passant.map(|ep| ep.square),
            halfmove_clock: self.state.halfmove_clock,
            fullmove_number: self.state.fullmove_number,
        }
        .to_fen()
    }
}

fn validate_board(board: &Board) -> Result<(), GameError> {
    for color in Color::ALL {
        let kings = board
            .pieces_of(color)
            .filter(|p| p.kind() == PieceKind::King)
            .count();
        if kings != 1 {
            return Err(GameError::InvalidPosition(format!(
                "{} has {} kings",
                color, kings
            )));
        }
    }

    if let Some(pawn) = board
        .pieces()
        .find(|p| p.kind() == PieceKind::Pawn && matches!(p.position().row(), 1 | 8))
    {
        return Err(GameError::InvalidPosition(format!(
            "pawn on back rank at {}",
            pawn.position()
        )));
    }

    Ok(())
}

/// Finds the pawn that just skipped `square`.
fn en_passant_pawn(
    board: &Board,
    square: Position,
    side_to_move: Color,
) -> Result<PieceId, GameError> {
    if !board.is_empty(square) {
        return Err(GameError::InvalidPosition(format!(
            "en passant square {} is occupied",
            square
        )));
    }
    let pushed = side_to_move.opposite();
    square
        .offset(pushed.pawn_direction(), 0)
        .and_then(|pos| board.piece_at(pos))
        .filter(|p| p.kind() == PieceKind::Pawn && p.color() == pushed)
        .map(|p| p.id())
        .ok_or_else(|| {
            GameError::InvalidPosition(format!("no pawn to capture en passant on {}", square))
        })
}
