//! The game engine: one authoritative position plus history and AI settings.
//!
//! A UI (or the GTP front-end) drives a [`GoEngine`] with board coordinates and
//! renders [`GoEngine::state`]. AI turns are deferred: after each state change
//! the caller asks [`GoEngine::schedule_ai`] for an [`AiTicket`] and later hands
//! it to [`GoEngine::fire`]. A ticket issued before an undo, new game or any
//! other move, or before the AI settings change, is stale and does nothing.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, trace};

use crate::board::{Board, BoardSize, Color, Point};
use crate::constants::AI_MOVE_DELAY;
use crate::error::GoError;
use crate::position::{MoveResult, Position};
use crate::search::{Searcher, Strength};

/// AI settings for one color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AiConfig {
    pub enabled: bool,
    pub strength: Strength,
}

/// Engine construction parameters.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub size: BoardSize,
    pub black: AiConfig,
    pub white: AiConfig,
    /// Delay between the side switch and a scheduled AI move
    pub ai_delay: Duration,
    /// Seed for the AI's random choices; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            size: BoardSize::Nineteen,
            black: AiConfig::default(),
            white: AiConfig::default(),
            ai_delay: AI_MOVE_DELAY,
            seed: None,
        }
    }
}

/// Read-only snapshot for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub size: usize,
    /// Rows top to bottom; `board[y][x]`
    pub board: Vec<Vec<Option<Color>>>,
    pub current_player: Color,
    pub black_captured: u32,
    pub white_captured: u32,
    pub ko_point: Option<Point>,
}

/// A deferred AI move, valid only for the state it was issued in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiTicket {
    side: Color,
    epoch: u64,
    due: Instant,
}

impl AiTicket {
    pub fn side(&self) -> Color {
        self.side
    }

    pub fn due(&self) -> Instant {
        self.due
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.due
    }
}

/// What happened when an AI turn ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiOutcome {
    Played(MoveResult),
    /// No legal move was available, so the AI passed
    Passed,
    /// The ticket no longer matched the game; nothing was done
    Stale,
}

pub struct GoEngine {
    pos: Position,
    history: Vec<Position>,
    black_ai: AiConfig,
    white_ai: AiConfig,
    ai_delay: Duration,
    searcher: Searcher,
    /// Bumped on every state change; invalidates outstanding tickets
    epoch: u64,
}

impl Default for GoEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl GoEngine {
    pub fn new(config: EngineConfig) -> Self {
        let searcher = match config.seed {
            Some(seed) => Searcher::with_seed(seed),
            None => Searcher::new(),
        };
        Self {
            pos: Position::new(config.size),
            history: Vec::new(),
            black_ai: config.black,
            white_ai: config.white,
            ai_delay: config.ai_delay,
            searcher,
            epoch: 0,
        }
    }

    // -- Accessors --

    pub fn position(&self) -> &Position {
        &self.pos
    }

    pub fn board(&self) -> &Board {
        &self.pos.board
    }

    pub fn to_move(&self) -> Color {
        self.pos.to_move
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn ai_config(&self, color: Color) -> AiConfig {
        match color {
            Color::Black => self.black_ai,
            Color::White => self.white_ai,
        }
    }

    fn ai_config_mut(&mut self, color: Color) -> &mut AiConfig {
        match color {
            Color::Black => &mut self.black_ai,
            Color::White => &mut self.white_ai,
        }
    }

    pub fn state(&self) -> GameState {
        GameState {
            size: self.pos.board.size(),
            board: self.pos.board.rows(),
            current_player: self.pos.to_move,
            black_captured: self.pos.black_captured,
            white_captured: self.pos.white_captured,
            ko_point: self.pos.ko,
        }
    }

    // -- Game actions --

    /// Start over on an empty board of `size`, black to move.
    pub fn new_game(&mut self, size: BoardSize) {
        self.pos = Position::new(size);
        self.history.clear();
        self.epoch += 1;
        info!(size = size.lines(), "new game");
    }

    /// Play a stone for the side to move.
    ///
    /// An illegal move leaves the engine untouched and returns
    /// [`GoError::IllegalMove`].
    pub fn place_stone(&mut self, p: Point) -> Result<MoveResult, GoError> {
        let mut next = self.pos.clone();
        let result = next.play_move(p)?;
        self.history.push(std::mem::replace(&mut self.pos, next));
        self.epoch += 1;
        debug!(
            color = %result.color,
            point = ?p,
            captured = result.captured.len(),
            ko = ?result.ko,
            "stone placed"
        );
        Ok(result)
    }

    /// Hand the turn to the other side without placing a stone.
    pub fn pass(&mut self) {
        self.history.push(self.pos.clone());
        self.pos.pass_move();
        self.epoch += 1;
        debug!(color = %self.pos.to_move.opponent(), "pass");
    }

    /// Restore the state before the last move or pass.
    pub fn undo(&mut self) -> Result<(), GoError> {
        let prev = self.history.pop().ok_or(GoError::EmptyHistory)?;
        self.pos = prev;
        self.epoch += 1;
        debug!(remaining = self.history.len(), "undo");
        Ok(())
    }

    // -- AI --

    pub fn set_ai_side(&mut self, color: Color, enabled: bool) {
        self.ai_config_mut(color).enabled = enabled;
        self.epoch += 1;
    }

    pub fn set_ai_strength(&mut self, color: Color, strength: Strength) {
        self.ai_config_mut(color).strength = strength;
        self.epoch += 1;
    }

    /// The AI's choice for the side to move, without playing it.
    pub fn choose_move(&mut self) -> Result<Point, GoError> {
        let strength = self.ai_config(self.pos.to_move).strength;
        self.searcher.choose_move(&self.pos, strength)
    }

    /// Let the AI play for the side to move, passing if it has no legal move.
    pub fn play_ai_move(&mut self) -> Result<AiOutcome, GoError> {
        match self.choose_move() {
            Ok(p) => self.place_stone(p).map(AiOutcome::Played),
            Err(GoError::NoLegalMoves) => {
                self.pass();
                Ok(AiOutcome::Passed)
            }
            Err(e) => Err(e),
        }
    }

    /// Issue a ticket for the side to move if it is AI-controlled.
    pub fn schedule_ai(&self, now: Instant) -> Option<AiTicket> {
        let side = self.pos.to_move;
        self.ai_config(side).enabled.then(|| AiTicket {
            side,
            epoch: self.epoch,
            due: now + self.ai_delay,
        })
    }

    /// Run a scheduled AI move if the ticket still matches the game.
    pub fn fire(&mut self, ticket: &AiTicket) -> Result<AiOutcome, GoError> {
        if ticket.epoch != self.epoch
            || ticket.side != self.pos.to_move
            || !self.ai_config(ticket.side).enabled
        {
            trace!(side = %ticket.side, "stale ai ticket dropped");
            return Ok(AiOutcome::Stale);
        }
        self.play_ai_move()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine9() -> GoEngine {
        GoEngine::new(EngineConfig {
            size: BoardSize::Nine,
            seed: Some(42),
            ai_delay: Duration::ZERO,
            ..EngineConfig::default()
        })
    }

    #[test]
    fn test_new_game_resets_everything() {
        let mut engine = engine9();
        engine.place_stone((4, 4)).unwrap();
        engine.pass();
        engine.new_game(BoardSize::Thirteen);
        let state = engine.state();
        assert_eq!(state.size, 13);
        assert_eq!(state.current_player, Color::Black);
        assert_eq!(state.ko_point, None);
        assert_eq!(engine.history_len(), 0);
        assert!(state.board.iter().flatten().all(Option::is_none));
    }

    #[test]
    fn test_illegal_move_changes_nothing() {
        let mut engine = engine9();
        engine.place_stone((4, 4)).unwrap();
        let before = engine.state();
        assert!(engine.place_stone((4, 4)).is_err());
        assert_eq!(engine.state(), before);
        assert_eq!(engine.history_len(), 1);
    }

    #[test]
    fn test_pass_and_undo() {
        let mut engine = engine9();
        engine.pass();
        assert_eq!(engine.to_move(), Color::White);
        assert_eq!(engine.history_len(), 1);
        engine.undo().unwrap();
        assert_eq!(engine.to_move(), Color::Black);
        assert_eq!(engine.undo(), Err(GoError::EmptyHistory));
    }

    #[test]
    fn test_schedule_only_for_ai_side() {
        let mut engine = engine9();
        let now = Instant::now();
        assert!(engine.schedule_ai(now).is_none());
        engine.set_ai_side(Color::Black, true);
        let ticket = engine.schedule_ai(now).unwrap();
        assert_eq!(ticket.side(), Color::Black);
        assert!(ticket.is_due(now));
    }

    #[test]
    fn test_fire_applies_ai_move() {
        let mut engine = engine9();
        engine.set_ai_side(Color::Black, true);
        let ticket = engine.schedule_ai(Instant::now()).unwrap();
        match engine.fire(&ticket).unwrap() {
            AiOutcome::Played(r) => assert_eq!(r.color, Color::Black),
            other => panic!("expected a move, got {other:?}"),
        }
        assert_eq!(engine.to_move(), Color::White);
        assert_eq!(engine.board().count(Color::Black), 1);
    }

    #[test]
    fn test_ticket_goes_stale_after_undo() {
        let mut engine = engine9();
        engine.place_stone((4, 4)).unwrap();
        engine.set_ai_side(Color::White, true);
        let ticket = engine.schedule_ai(Instant::now()).unwrap();

        // Undo, then replay the same move: same side to move, but a new state.
        engine.undo().unwrap();
        engine.place_stone((4, 4)).unwrap();
        assert_eq!(engine.fire(&ticket).unwrap(), AiOutcome::Stale);
        assert_eq!(engine.board().count(Color::White), 0);
    }

    #[test]
    fn test_ticket_goes_stale_when_ai_disabled() {
        let mut engine = engine9();
        engine.set_ai_side(Color::Black, true);
        let ticket = engine.schedule_ai(Instant::now()).unwrap();
        engine.set_ai_side(Color::Black, false);
        assert_eq!(engine.fire(&ticket).unwrap(), AiOutcome::Stale);
    }

    #[test]
    fn test_ticket_goes_stale_after_reconfiguration() {
        let mut engine = engine9();
        engine.set_ai_side(Color::Black, true);
        let ticket = engine.schedule_ai(Instant::now()).unwrap();

        // Same side, AI enabled again, but the settings changed meanwhile.
        engine.set_ai_side(Color::Black, false);
        engine.set_ai_side(Color::Black, true);
        engine.set_ai_strength(Color::Black, Strength::new(2).unwrap());
        assert_eq!(engine.fire(&ticket).unwrap(), AiOutcome::Stale);
        assert_eq!(engine.history_len(), 0);

        let ticket = engine.schedule_ai(Instant::now()).unwrap();
        engine.set_ai_strength(Color::Black, Strength::new(9).unwrap());
        assert_eq!(engine.fire(&ticket).unwrap(), AiOutcome::Stale);
        assert_eq!(engine.board().count(Color::Black), 0);
    }

    #[test]
    fn test_state_serializes_for_clients() {
        let mut engine = engine9();
        engine.place_stone((0, 0)).unwrap();
        let json = serde_json::to_value(engine.state()).unwrap();
        assert_eq!(json["currentPlayer"], "white");
        assert_eq!(json["board"][0][0], "black");
        assert_eq!(json["koPoint"], serde_json::Value::Null);
        assert_eq!(json["blackCaptured"], 0);
    }
}
