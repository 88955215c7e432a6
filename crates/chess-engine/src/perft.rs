//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate legality checking.

use crate::{Game, GameError};

/// Counts the number of leaf nodes at the given depth.
pub fn perft(game: &Game, depth: u32) -> Result<u64, GameError> {
    if depth == 0 {
        return Ok(1);
    }

    let moves = game.legal_moves()?;

    if depth == 1 {
        return Ok(moves.len() as u64);
    }

    let mut nodes = 0u64;
    for m in &moves {
        let mut next = game.clone();
        next.apply_move(*m)?;
        nodes += perft(&next, depth - 1)?;
    }
    Ok(nodes)
}

/// Perft with divide - node count below each root move, sorted by UCI.
/// Useful for pinning down which move has an incorrect count.
pub fn perft_divide(game: &Game, depth: u32) -> Result<Vec<(String, u64)>, GameError> {
    let moves = game.legal_moves()?;
    let mut results = Vec::with_capacity(moves.len());

    for m in &moves {
        let nodes = if depth > 1 {
            let mut next = game.clone();
            next.apply_move(*m)?;
            perft(&next, depth - 1)?
        } else {
            1
        };
        results.push((m.to_uci(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(results)
}
