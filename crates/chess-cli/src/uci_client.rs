//! UCI (Universal Chess Interface) client for an external bot opponent.
//!
//! The engine runs as a subprocess and is driven synchronously over its
//! stdin/stdout pipes. [`UciBot`] wraps a client as a [`MoveProvider`], so the
//! bot's answers go through the same legality checks as a human's input.

use chess_engine::{parse_uci, Game, GameError, Move, MoveProvider};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use thiserror::Error;

/// Errors that can occur when communicating with a UCI engine.
#[derive(Error, Debug)]
pub enum UciError {
    /// Failed to spawn the engine process or perform I/O operations.
    #[error("Failed to spawn process: {0}")]
    SpawnError(#[from] std::io::Error),
    /// The engine process is not ready to receive commands.
    #[error("Process not ready")]
    NotReady,
    /// The engine returned an invalid or unexpected response.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// A client for communicating with a UCI-compatible chess engine.
///
/// # Lifecycle
///
/// 1. Spawn the engine with [`UciClient::spawn`]
/// 2. Initialize the UCI protocol with [`UciClient::init`]
/// 3. Set positions and request moves with [`UciClient::set_position`] and [`UciClient::go`]
/// 4. Clean up with [`UciClient::quit`] (or rely on [`Drop`] implementation)
pub struct UciClient {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    /// The engine's name as reported during UCI initialization.
    pub name: String,
}

impl UciClient {
    /// Spawns a new UCI engine process.
    ///
    /// The process is not yet initialized for UCI communication; call
    /// [`init`](Self::init) after spawning.
    ///
    /// # Errors
    ///
    /// Returns [`UciError::SpawnError`] if the process cannot be spawned,
    /// typically because the executable doesn't exist or lacks permissions.
    pub fn spawn<P: AsRef<Path>>(path: P) -> Result<Self, UciError> {
        let mut process = Command::new(path.as_ref())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        let (Some(stdin), Some(stdout)) = (process.stdin.take(), process.stdout.take()) else {
            let _ = process.kill();
            return Err(UciError::NotReady);
        };

        Ok(Self {
            process,
            stdin,
            stdout: BufReader::new(stdout),
            name: String::new(),
        })
    }

    /// Sends a command (without trailing newline) to the engine.
    pub fn send(&mut self, cmd: &str) -> Result<(), UciError> {
        tracing::trace!(cmd, "uci >");
        writeln!(self.stdin, "{}", cmd)?;
        self.stdin.flush()?;
        Ok(())
    }

    /// Reads a single trimmed line from the engine's stdout.
    ///
    /// Blocks until a complete line is available.
    ///
    /// # Errors
    ///
    /// Returns [`UciError::InvalidResponse`] if the engine closed its output.
    pub fn read_line(&mut self) -> Result<String, UciError> {
        let mut line = String::new();
        if self.stdout.read_line(&mut line)? == 0 {
            return Err(UciError::InvalidResponse(
                "engine closed its output".to_string(),
            ));
        }
        let line = line.trim().to_string();
        tracing::trace!(line = %line, "uci <");
        Ok(line)
    }

    /// Runs the `uci` / `isready` handshake, capturing the engine's name.
    pub fn init(&mut self) -> Result<(), UciError> {
        self.send("uci")?;

        loop {
            let line = self.read_line()?;
            if let Some(name) = line.strip_prefix("id name ") {
                self.name = name.to_string();
            }
            if line == "uciok" {
                break;
            }
        }

        self.send("isready")?;
        while self.read_line()? != "readyok" {}

        tracing::info!(engine = %self.name, "UCI engine ready");
        Ok(())
    }

    /// Sets the position to search from.
    pub fn set_position(&mut self, fen: &str) -> Result<(), UciError> {
        self.send(&format!("position fen {}", fen))
    }

    /// Starts a search and waits for `bestmove`, returning the move in UCI notation.
    ///
    /// `params` is appended to `go` verbatim (e.g., `"depth 10"`, `"movetime 500"`).
    pub fn go(&mut self, params: &str) -> Result<String, UciError> {
        self.send(&format!("go {}", params))?;

        loop {
            let line = self.read_line()?;
            if line.starts_with("bestmove ") {
                return line
                    .split_whitespace()
                    .nth(1)
                    .map(str::to_string)
                    .ok_or_else(|| UciError::InvalidResponse(line.clone()));
            }
        }
    }

    /// Sends `quit` and waits for the process to exit.
    pub fn quit(&mut self) -> Result<(), UciError> {
        self.send("quit")?;
        let _ = self.process.wait();
        Ok(())
    }
}

impl Drop for UciClient {
    fn drop(&mut self) {
        let _ = self.send("quit");
        let _ = self.process.kill();
    }
}

/// A UCI engine playing one seat at a fixed search depth.
pub struct UciBot {
    client: UciClient,
    depth: u32,
}

impl UciBot {
    /// Spawns and initializes the engine at `path`.
    pub fn start<P: AsRef<Path>>(path: P, depth: u32) -> Result<Self, UciError> {
        let mut client = UciClient::spawn(path)?;
        client.init()?;
        Ok(UciBot { client, depth })
    }

    pub fn name(&self) -> &str {
        &self.client.name
    }

    fn best_move(&mut self, fen: &str) -> Result<String, UciError> {
        self.client.set_position(fen)?;
        self.client.go(&format!("depth {}", self.depth))
    }
}

impl MoveProvider for UciBot {
    fn next_move(&mut self, game: &Game) -> Result<Move, GameError> {
        let uci = self
            .best_move(&game.to_fen())
            .map_err(|e| GameError::IllegalMove(format!("bot failed to answer: {}", e)))?;
        resolve_move(game, &uci)
    }
}

/// Maps the engine's answer onto a legal move of `game`.
fn resolve_move(game: &Game, uci: &str) -> Result<Move, GameError> {
    let (from, to, promotion) = parse_uci(uci)
        .ok_or_else(|| GameError::IllegalMove(format!("bot sent unparsable move {:?}", uci)))?;
    game.find_legal_move(from, to, promotion)?
        .ok_or_else(|| GameError::IllegalMove(format!("bot sent illegal move {}", uci)))
}
