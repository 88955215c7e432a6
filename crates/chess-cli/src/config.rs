//! Configuration file loading for the terminal front end.
//!
//! Settings come from `chess.toml` in the current directory unless another
//! path is given. Every field has a default, so a missing file or an empty
//! one both yield a playable human-vs-human setup.

use chess_core::{Color, FenParser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Display names of the two players.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct PlayerNames {
    #[serde(default = "default_white_name")]
    pub white: String,
    #[serde(default = "default_black_name")]
    pub black: String,
}

fn default_white_name() -> String {
    chess_engine::DEFAULT_WHITE_NAME.to_string()
}

fn default_black_name() -> String {
    chess_engine::DEFAULT_BLACK_NAME.to_string()
}

impl Default for PlayerNames {
    fn default() -> Self {
        PlayerNames {
            white: default_white_name(),
            black: default_black_name(),
        }
    }
}

/// The UCI engine playing one seat.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct BotConfig {
    /// Seat taken by the bot. No bot is started when unset.
    #[serde(default)]
    pub color: Option<Color>,
    /// Path to the engine executable.
    /// Defaults to "stockfish" (assumes it's in PATH).
    #[serde(default = "default_engine_path")]
    pub path: PathBuf,
    /// Search depth passed as `go depth N`.
    #[serde(default = "default_depth")]
    pub depth: u32,
}

fn default_engine_path() -> PathBuf {
    PathBuf::from("stockfish")
}

fn default_depth() -> u32 {
    10
}

impl Default for BotConfig {
    fn default() -> Self {
        BotConfig {
            color: None,
            path: default_engine_path(),
            depth: default_depth(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ChessConfig {
    #[serde(default)]
    pub players: PlayerNames,
    #[serde(default)]
    pub bot: BotConfig,
    /// Position the first game starts from.
    #[serde(default = "default_start_fen")]
    pub start_fen: String,
}

fn default_start_fen() -> String {
    FenParser::STARTPOS.to_string()
}

impl Default for ChessConfig {
    fn default() -> Self {
        ChessConfig {
            players: PlayerNames::default(),
            bot: BotConfig::default(),
            start_fen: default_start_fen(),
        }
    }
}

impl ChessConfig {
    /// Loads the configuration from `path`.
    ///
    /// If the file does not exist, returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            tracing::debug!(?path, "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Returns the default path to the configuration file.
    pub fn config_path() -> PathBuf {
        PathBuf::from("chess.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_toml_config() {
        let toml_content = r#"
start_fen = "4k3/8/8/8/8/8/8/4K3 w - - 0 1"

[players]
white = "Alice"
black = "Bob"

[bot]
color = "black"
path = "/usr/bin/stockfish"
depth = 6
"#;
        let config: ChessConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.players.white, "Alice");
        assert_eq!(config.players.black, "Bob");
        assert_eq!(config.bot.color, Some(Color::Black));
        assert_eq!(config.bot.path, PathBuf::from("/usr/bin/stockfish"));
        assert_eq!(config.bot.depth, 6);
        assert_eq!(config.start_fen, "4k3/8/8/8/8/8/8/4K3 w - - 0 1");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: ChessConfig = toml::from_str("").unwrap();
        assert_eq!(config, ChessConfig::default());
        assert_eq!(config.players.white, "Player 1");
        assert_eq!(config.bot.color, None);
        assert_eq!(config.bot.depth, 10);
        assert_eq!(config.start_fen, FenParser::STARTPOS);
    }

    #[test]
    fn test_partial_bot_section_fills_defaults() {
        let config: ChessConfig = toml::from_str("[bot]\ncolor = \"white\"\n").unwrap();
        assert_eq!(config.bot.color, Some(Color::White));
        assert_eq!(config.bot.path, PathBuf::from("stockfish"));
        assert_eq!(config.bot.depth, 10);
    }

    #[test]
    fn test_invalid_toml_returns_parse_error() {
        let result: Result<ChessConfig, _> = toml::from_str("[bot\ncolor = ");
        assert!(result.is_err());

        let result: Result<ChessConfig, _> = toml::from_str("[bot]\ncolor = \"green\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let config = ChessConfig::load(Path::new("/nonexistent/chess.toml")).unwrap();
        assert_eq!(config, ChessConfig::default());
    }

    #[test]
    fn test_load_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chess.toml");
        std::fs::write(&path, "players = 3").unwrap();
        let result = ChessConfig::load(&path);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chess.toml");
        std::fs::write(&path, "[players]\nwhite = \"Alice\"\n").unwrap();
        let config = ChessConfig::load(&path).unwrap();
        assert_eq!(config.players.white, "Alice");
        assert_eq!(config.players.black, "Player 2");
    }
}
