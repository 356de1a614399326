//! Go Text Protocol (GTP) front-end.
//!
//! GTP is a text-based protocol for communicating with Go-playing programs.
//! This module implements the GTP version 2 core over a [`GoEngine`], so the
//! engine can be driven from graphical clients like Sabaki or GoGui.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`, `list_commands`, `known_command`
//! - `quit` - Exit the program
//! - `boardsize <9|13|19>` - Set board size (starts a new game)
//! - `clear_board` - Reset the board to empty
//! - `play <color> <vertex|pass>` - Play a move for the side to move
//! - `genmove <color>` - Generate and play a move for the side to move
//! - `undo` - Take back the last move
//! - `showboard` - Print the board
//! - `weiqi-state` - Print the game state as JSON
//! - `weiqi-strength <color> <1..10>` - Set the AI strength for a color

use std::io::{self, BufRead, Write};

use anyhow::Context;

use crate::board::{BoardSize, Color, parse_vertex, vertex_string};
use crate::engine::{AiOutcome, GoEngine};
use crate::search::Strength;

/// The list of known GTP commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "genmove",
    "known_command",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "undo",
    "version",
    "weiqi-state",
    "weiqi-strength",
];

/// GTP session state.
pub struct GtpEngine {
    engine: GoEngine,
}

impl GtpEngine {
    pub fn new(engine: GoEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &GoEngine {
        &self.engine
    }

    /// Run the GTP command loop, reading from stdin and writing to stdout.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.serve(stdin.lock(), stdout.lock())
    }

    /// Run the command loop over arbitrary streams.
    pub fn serve(&mut self, input: impl BufRead, mut output: impl Write) -> anyhow::Result<()> {
        for line in input.lines() {
            let line = line.context("reading GTP input")?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // Parse optional command ID
            let (id, command_line) = Self::parse_id(line);

            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let args = &parts[1..];

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            write!(output, "{prefix}{id_str} {message}\n\n").context("writing GTP response")?;
            output.flush().context("flushing GTP response")?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    /// Check that `arg` names the side to move.
    fn check_turn(&self, arg: &str) -> Result<Color, String> {
        let color: Color = arg.parse()?;
        if color != self.engine.to_move() {
            return Err(format!("out of turn: {} to move", self.engine.to_move()));
        }
        Ok(color)
    }

    /// Execute a GTP command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, "weiqi-rust".to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "2".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(cmd) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "boardsize" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let size = match arg.parse::<usize>() {
                    Ok(n) => n,
                    Err(_) => return (false, "invalid size".to_string()),
                };
                match BoardSize::try_from(size) {
                    Ok(size) => {
                        self.engine.new_game(size);
                        (true, String::new())
                    }
                    Err(e) => (false, format!("unacceptable size: {e}")),
                }
            }

            "clear_board" => {
                let size = self.engine.board().board_size();
                self.engine.new_game(size);
                (true, String::new())
            }

            "play" => {
                if args.len() < 2 {
                    return (false, "missing arguments".to_string());
                }
                if let Err(e) = self.check_turn(args[0]) {
                    return (false, e);
                }

                let vertex = args[1].to_lowercase();
                if vertex == "pass" {
                    self.engine.pass();
                    return (true, String::new());
                }
                let Some(p) = parse_vertex(&vertex, self.engine.board().size()) else {
                    return (false, "invalid vertex".to_string());
                };
                match self.engine.place_stone(p) {
                    Ok(_) => (true, String::new()),
                    Err(e) => (false, e.to_string()),
                }
            }

            "genmove" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                if let Err(e) = self.check_turn(arg) {
                    return (false, e);
                }
                match self.engine.play_ai_move() {
                    Ok(AiOutcome::Played(r)) => {
                        (true, vertex_string(r.point, self.engine.board().size()))
                    }
                    Ok(_) => (true, "pass".to_string()),
                    Err(e) => (false, e.to_string()),
                }
            }

            "undo" => match self.engine.undo() {
                Ok(()) => (true, String::new()),
                Err(_) => (false, "cannot undo".to_string()),
            },

            "showboard" => {
                let pos = self.engine.position();
                let text = format!(
                    "\n{}{} to move, captured black {} white {}",
                    pos.board, pos.to_move, pos.black_captured, pos.white_captured
                );
                (true, text)
            }

            "weiqi-state" => match serde_json::to_string(&self.engine.state()) {
                Ok(json) => (true, json),
                Err(e) => (false, e.to_string()),
            },

            "weiqi-strength" => {
                if args.len() < 2 {
                    return (false, "missing arguments".to_string());
                }
                let color: Color = match args[0].parse() {
                    Ok(c) => c,
                    Err(e) => return (false, e),
                };
                let strength = args[1]
                    .parse::<u8>()
                    .map_err(|_| "invalid strength".to_string())
                    .and_then(|v| Strength::new(v).map_err(|e| e.to_string()));
                match strength {
                    Ok(s) => {
                        self.engine.set_ai_strength(color, s);
                        (true, String::new())
                    }
                    Err(e) => (false, e),
                }
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;

    fn gtp() -> GtpEngine {
        GtpEngine::new(GoEngine::new(EngineConfig {
            size: BoardSize::Nine,
            seed: Some(5),
            ..EngineConfig::default()
        }))
    }

    #[test]
    fn test_parse_id_with_id() {
        let (id, cmd) = GtpEngine::parse_id("123 name");
        assert_eq!(id, Some(123));
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_parse_id_without_id() {
        let (id, cmd) = GtpEngine::parse_id("name");
        assert_eq!(id, None);
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_known_command() {
        let mut engine = gtp();

        let (success, response) = engine.execute("known_command", &["genmove"]);
        assert!(success);
        assert_eq!(response, "true");

        let (success, response) = engine.execute("known_command", &["komi"]);
        assert!(success);
        assert_eq!(response, "false");
    }

    #[test]
    fn test_boardsize() {
        let mut engine = gtp();
        let (success, _) = engine.execute("boardsize", &["13"]);
        assert!(success);
        assert_eq!(engine.engine().board().size(), 13);

        let (success, _) = engine.execute("boardsize", &["15"]);
        assert!(!success);
        assert_eq!(engine.engine().board().size(), 13);
    }

    #[test]
    fn test_play_turn_order_and_clear() {
        let mut engine = gtp();
        let (success, _) = engine.execute("play", &["white", "D4"]);
        assert!(!success);

        let (success, _) = engine.execute("play", &["black", "D4"]);
        assert!(success);
        let (success, msg) = engine.execute("play", &["white", "D4"]);
        assert!(!success);
        assert!(msg.contains("not empty"));

        let (success, _) = engine.execute("clear_board", &[]);
        assert!(success);
        assert_eq!(engine.engine().history_len(), 0);
    }

    #[test]
    fn test_genmove_and_undo() {
        let mut engine = gtp();
        let (success, vertex) = engine.execute("genmove", &["b"]);
        assert!(success);
        assert!(parse_vertex(&vertex, 9).is_some(), "got {vertex}");
        assert_eq!(engine.engine().to_move(), Color::White);

        let (success, _) = engine.execute("undo", &[]);
        assert!(success);
        let (success, _) = engine.execute("undo", &[]);
        assert!(!success);
    }

    #[test]
    fn test_strength_command() {
        let mut engine = gtp();
        let (success, _) = engine.execute("weiqi-strength", &["white", "9"]);
        assert!(success);
        assert_eq!(engine.engine().ai_config(Color::White).strength.get(), 9);
        let (success, _) = engine.execute("weiqi-strength", &["white", "11"]);
        assert!(!success);
    }

    #[test]
    fn test_serve_session() {
        let mut engine = gtp();
        let input = "1 name\nplay b C3\n# comment\n2 weiqi-state\nquit\nname\n";
        let mut out = Vec::new();
        engine.serve(input.as_bytes(), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("=1 weiqi-rust\n\n"));
        assert!(out.contains("\"currentPlayer\":\"white\""));
        // Nothing after quit is answered.
        assert_eq!(out.matches("weiqi-rust").count(), 1);
    }
}
