//! Core types for chess.
//!
//! This crate provides the leaf value types used across the rules engine:
//! - [`Color`] for the two sides
//! - [`Position`] for 1-indexed board coordinates
//! - [`PieceKind`] for the six piece variants and their movement vectors
//! - FEN tokenizing, validation, and serialization via [`FenParser`]

mod color;
mod fen;
mod piece;
mod position;

pub use color::Color;
pub use fen::{FenError, FenParser};
pub use piece::PieceKind;
pub use position::Position;
