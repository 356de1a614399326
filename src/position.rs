//! Go position representation and move execution.
//!
//! This module provides the core game rules:
//! - Legality checking (occupied points, ko, suicide)
//! - Stone placement and capture resolution
//! - Single-step ko tracking
//!
//! A [`Position`] is a plain value. Hypothetical moves are tried on clones, so
//! a simulation never touches the position it started from.

use crate::board::{Board, BoardSize, Color, Point};
use crate::error::{GoError, IllegalReason};

/// Outcome of a stone placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    /// Where the stone was placed
    pub point: Point,
    /// Who placed it
    pub color: Color,
    /// Opponent stones removed by the move
    pub captured: Vec<Point>,
    /// Own stones removed because the move left them without liberties
    pub self_captured: Vec<Point>,
    /// Ko point in force after the move
    pub ko: Option<Point>,
}

/// Check whether `color` may play at `p` on `board` given the current ko point.
///
/// A move is legal when the point is on the board, empty, not the ko point, and
/// after placement it either captures an adjacent enemy group or leaves its own
/// group with at least one liberty.
pub fn check_move(
    board: &Board,
    ko: Option<Point>,
    p: Point,
    color: Color,
) -> Result<(), IllegalReason> {
    if !board.on_board(p) {
        return Err(IllegalReason::OffBoard);
    }
    if board.get(p).is_some() {
        return Err(IllegalReason::Occupied);
    }
    if ko == Some(p) {
        return Err(IllegalReason::Ko);
    }

    let mut sim = board.clone();
    sim.set(p, Some(color));
    if !sim.dead_groups_around(p, color.opponent()).is_empty() {
        return Ok(());
    }
    if sim.liberties_at(p) == 0 {
        return Err(IllegalReason::Suicide);
    }
    Ok(())
}

/// Boolean form of [`check_move`].
pub fn is_legal(board: &Board, ko: Option<Point>, p: Point, color: Color) -> bool {
    check_move(board, ko, p, color).is_ok()
}

/// A Go position: board, side to move, capture counters and ko point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub board: Board,
    /// Side to move
    pub to_move: Color,
    /// Black stones removed from the board so far
    pub black_captured: u32,
    /// White stones removed from the board so far
    pub white_captured: u32,
    /// Point the side to move may not play at (single-step ko)
    pub ko: Option<Point>,
}

impl Position {
    pub fn new(size: BoardSize) -> Self {
        Position {
            board: Board::new(size),
            to_move: Color::Black,
            black_captured: 0,
            white_captured: 0,
            ko: None,
        }
    }

    /// Stones of `color` captured so far.
    pub fn captured(&self, color: Color) -> u32 {
        match color {
            Color::Black => self.black_captured,
            Color::White => self.white_captured,
        }
    }

    fn add_captured(&mut self, color: Color, count: usize) {
        let count = count as u32;
        match color {
            Color::Black => self.black_captured += count,
            Color::White => self.white_captured += count,
        }
    }

    pub fn is_legal(&self, p: Point) -> bool {
        is_legal(&self.board, self.ko, p, self.to_move)
    }

    /// All legal moves for the side to move, row by row.
    pub fn legal_moves(&self) -> Vec<Point> {
        self.board.points().filter(|&p| self.is_legal(p)).collect()
    }

    /// Play a stone for the side to move after checking legality.
    pub fn play_move(&mut self, p: Point) -> Result<MoveResult, GoError> {
        check_move(&self.board, self.ko, p, self.to_move).map_err(GoError::IllegalMove)?;
        Ok(self.play_unchecked(p))
    }

    /// Place a stone for the side to move without the legality check.
    ///
    /// Enemy groups left without liberties are removed. If nothing was
    /// captured and the placed stone's own group has no liberties, that group is
    /// removed instead and counted against its own color. The point must be on
    /// the board and empty.
    pub fn play_unchecked(&mut self, p: Point) -> MoveResult {
        debug_assert!(
            self.board.on_board(p) && self.board.get(p).is_none(),
            "play_unchecked on occupied or off-board point {p:?}"
        );
        let color = self.to_move;
        let opp = color.opponent();
        self.board.set(p, Some(color));

        let captured = self.board.dead_groups_around(p, opp);
        for &r in &captured {
            self.board.set(r, None);
        }
        self.add_captured(opp, captured.len());

        let mut self_captured = Vec::new();
        if captured.is_empty() {
            let own = self.board.connected_group(p);
            if self.board.group_liberties(&own) == 0 {
                for &r in &own {
                    self.board.set(r, None);
                }
                self.add_captured(color, own.len());
                self_captured = own;
            }
        }

        // Single-stone capture that leaves the capturer in atari: immediate
        // recapture at the captured point would repeat the position.
        self.ko = if captured.len() == 1 && self.board.liberties_at(p) == 1 {
            Some(captured[0])
        } else {
            None
        };

        self.to_move = opp;
        MoveResult {
            point: p,
            color,
            captured,
            self_captured,
            ko: self.ko,
        }
    }

    /// Pass: hand the turn over without placing a stone. Clears the ko.
    pub fn pass_move(&mut self) {
        self.to_move = self.to_move.opponent();
        self.ko = None;
    }
}
