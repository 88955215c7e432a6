//! Chess CLI - play on the terminal, alone or against a UCI engine.
//!
//! Reads commands from stdin: a square lists the legal moves from it, a move
//! in UCI notation plays it, and a handful of keywords inspect or reset the
//! game. When a bot seat is configured, the engine answers automatically.

mod config;
mod uci_client;

use anyhow::Context;
use chess_core::{Color, Position};
use chess_engine::{parse_uci, GameError, GameSession, GameStatus, Move, MoveProvider};
use clap::Parser;
use config::ChessConfig;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use uci_client::UciBot;

/// Chess CLI - play chess on the terminal.
#[derive(Parser)]
#[command(name = "chess-cli")]
#[command(about = "Play chess on the terminal, optionally against a UCI engine")]
struct Args {
    /// Path to the TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Starting position in FEN
    #[arg(long)]
    fen: Option<String>,

    /// Seat played by the engine (white or black)
    #[arg(long)]
    bot_color: Option<Color>,

    /// Path to the UCI engine executable
    #[arg(long)]
    engine: Option<PathBuf>,

    /// Search depth for the engine
    #[arg(long)]
    depth: Option<u32>,
}

impl Args {
    /// Overrides file settings with the flags given on the command line.
    fn apply_to(&self, config: &mut ChessConfig) {
        if let Some(fen) = &self.fen {
            config.start_fen = fen.clone();
        }
        if let Some(color) = self.bot_color {
            config.bot.color = Some(color);
        }
        if let Some(engine) = &self.engine {
            config.bot.path = engine.clone();
        }
        if let Some(depth) = self.depth {
            config.bot.depth = depth;
        }
    }
}

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Select(Position),
    Play(String),
    Fen,
    Moves,
    History,
    Board,
    New(Option<String>),
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    match word {
        "fen" => Command::Fen,
        "moves" => Command::Moves,
        "history" => Command::History,
        "board" => Command::Board,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "new" if rest.is_empty() => Command::New(None),
        "new" => Command::New(Some(rest.to_string())),
        _ if rest.is_empty() => {
            if let Some(pos) = Position::from_algebraic(word) {
                Command::Select(pos)
            } else if parse_uci(word).is_some() {
                Command::Play(word.to_string())
            } else {
                Command::Unknown(line.to_string())
            }
        }
        _ => Command::Unknown(line.to_string()),
    }
}

const HELP: &str = "\
commands:
  e2          list legal moves from a square
  e2e4        play a move (e7e8q to promote)
  moves       list all legal moves
  fen         print the position as FEN
  history     print the moves played
  board       print the board
  new [FEN]   start a new game
  quit        leave";

/// Plays until `quit` or end of input.
///
/// Errors from individual commands are reported to `out` and the loop goes on;
/// only I/O failures end it early.
fn run<R: BufRead, W: Write>(
    session: &mut GameSession,
    mut bot: Option<&mut dyn MoveProvider>,
    input: R,
    out: &mut W,
) -> anyhow::Result<()> {
    let mut lines = input.lines();
    writeln!(out, "{}", session.game().board())?;
    print_status(session, out)?;

    loop {
        let game_over = session.game().status()?.is_terminal();
        if !game_over && session.is_bot_turn() {
            if let Some(bot) = bot.as_deref_mut() {
                match session.handle_bot_move(bot) {
                    Ok(Some(m)) => {
                        writeln!(out, "bot plays {}", m)?;
                        writeln!(out, "{}", session.game().board())?;
                        print_status(session, out)?;
                        continue;
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::error!("bot move failed: {}", e);
                        writeln!(out, "error: {}", e)?;
                    }
                }
            }
        }

        write!(out, "{}> ", session.game().side_to_move())?;
        out.flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        match parse_command(&line) {
            Command::Quit => break,
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Board => writeln!(out, "{}", session.game().board())?,
            Command::Fen => writeln!(out, "{}", session.game().to_fen())?,
            Command::History => {
                let history: Vec<String> = session
                    .game()
                    .move_history()
                    .iter()
                    .map(|m| m.to_uci())
                    .collect();
                writeln!(out, "{}", history.join(" "))?;
            }
            Command::Moves => match session.game().legal_moves() {
                Ok(moves) => {
                    let moves: Vec<String> = moves.iter().map(|m| m.to_uci()).collect();
                    writeln!(out, "{}", moves.join(" "))?;
                }
                Err(e) => writeln!(out, "error: {}", e)?,
            },
            Command::Select(pos) => {
                if !session.field_belongs_to_current(pos) {
                    writeln!(out, "no piece of {} on {}", session.game().side_to_move(), pos)?;
                    session.clear_moves();
                    continue;
                }
                match session.load_moves_from(pos) {
                    Ok(moves) => {
                        let moves: Vec<String> = moves.iter().map(|m| m.to_uci()).collect();
                        writeln!(out, "{}", moves.join(" "))?;
                    }
                    Err(e) => writeln!(out, "error: {}", e)?,
                }
            }
            Command::Play(uci) => match play_uci(session, &uci) {
                Ok(_) => {
                    writeln!(out, "{}", session.game().board())?;
                    print_status(session, out)?;
                }
                Err(e) => {
                    tracing::warn!("rejected {}: {}", uci, e);
                    writeln!(out, "error: {}", e)?;
                }
            },
            Command::New(fen) => {
                let fen = fen.unwrap_or_else(|| chess_core::FenParser::STARTPOS.to_string());
                let bot_color = session.bot_color();
                match session.new_game(&fen, bot_color) {
                    Ok(()) => {
                        writeln!(out, "{}", session.game().board())?;
                        print_status(session, out)?;
                    }
                    Err(e) => writeln!(out, "error: {}", e)?,
                }
            }
            Command::Unknown(text) => {
                writeln!(out, "unknown command {:?}, type help for a list", text)?
            }
        }
    }

    Ok(())
}

fn play_uci(session: &mut GameSession, uci: &str) -> Result<Move, GameError> {
    let (from, to, promotion) = parse_uci(uci)
        .ok_or_else(|| GameError::IllegalMove(format!("invalid UCI: {}", uci)))?;
    let m = session
        .game()
        .find_legal_move(from, to, promotion)?
        .ok_or_else(|| GameError::IllegalMove(uci.to_string()))?;
    session.make_move(m)?;
    Ok(m)
}

fn print_status<W: Write>(session: &GameSession, out: &mut W) -> anyhow::Result<()> {
    let game = session.game();
    let side = game.side_to_move();
    match game.status()? {
        GameStatus::Ongoing => writeln!(out, "{} to move", game.current_player().name())?,
        GameStatus::Check => writeln!(out, "{} to move, in check", game.current_player().name())?,
        GameStatus::Checkmate => writeln!(
            out,
            "checkmate, {} wins",
            game.player(side.opposite()).name()
        )?,
        GameStatus::Stalemate => writeln!(out, "stalemate")?,
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(ChessConfig::config_path);
    let mut config = ChessConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    args.apply_to(&mut config);
    tracing::debug!(?config, "effective configuration");

    let mut session = GameSession::new();
    session
        .new_game(&config.start_fen, config.bot.color)
        .context("invalid starting position")?;
    session
        .game_mut()
        .set_player_names(config.players.white.clone(), config.players.black.clone());

    let mut bot = match config.bot.color {
        Some(color) => {
            let bot = UciBot::start(&config.bot.path, config.bot.depth).with_context(|| {
                format!("starting engine {}", config.bot.path.display())
            })?;
            tracing::info!(engine = bot.name(), %color, depth = config.bot.depth, "bot seated");
            Some(bot)
        }
        None => None,
    };

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    run(
        &mut session,
        bot.as_mut().map(|b| b as &mut dyn MoveProvider),
        stdin.lock(),
        &mut stdout,
    )
}
