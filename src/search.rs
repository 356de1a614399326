//! AI move selection.
//!
//! A numeric [`Strength`] (1..=10) resolves once into a [`Strategy`]:
//! - `Random`: uniform choice among legal moves
//! - `Greedy`: best one-ply heuristic score plus a random jitter
//! - `Search`: depth-limited minimax with alpha-beta pruning
//!
//! Search orders candidates best-first by [`Evaluator::score_move`] and keeps
//! only the top few at every node so 19x19 stays tractable. Every simulated
//! move is played on a cloned [`Position`] with the full capture and ko rules.

use tracing::debug;

use crate::board::{Color, Point};
use crate::constants::{
    DEFAULT_STRENGTH, GREEDY_TIER_MAX, HIGH_TIER_MIN, JITTER_SCALE, MAX_STRENGTH, MIN_STRENGTH,
    NODE_WIDTH, RANDOM_TIER_MAX, ROOT_WIDTH_HIGH, ROOT_WIDTH_MAX, SEARCH_DEPTH_HIGH,
    SEARCH_DEPTH_MAX,
};
use crate::error::GoError;
use crate::eval::Evaluator;
use crate::position::Position;

/// AI strength on a 1..=10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Strength(u8);

impl Strength {
    pub fn new(value: u8) -> Result<Self, GoError> {
        if (MIN_STRENGTH..=MAX_STRENGTH).contains(&value) {
            Ok(Strength(value))
        } else {
            Err(GoError::InvalidStrength(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Whether the high-tier evaluator weights apply.
    pub fn is_high(self) -> bool {
        self.0 >= HIGH_TIER_MIN
    }

    pub fn evaluator(self) -> Evaluator {
        Evaluator::for_tier(self.is_high())
    }

    pub fn strategy(self) -> Strategy {
        Strategy::from(self)
    }
}

impl Default for Strength {
    fn default() -> Self {
        Strength(DEFAULT_STRENGTH)
    }
}

impl TryFrom<u8> for Strength {
    type Error = GoError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Strength::new(value)
    }
}

/// How the AI picks a move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    Random,
    /// One-ply evaluation; `jitter` is the full width of the random term.
    Greedy { jitter: f64 },
    /// Alpha-beta to `depth` plies keeping `width` root candidates.
    Search { depth: u32, width: usize },
}

impl From<Strength> for Strategy {
    fn from(s: Strength) -> Self {
        match s.get() {
            s if s <= RANDOM_TIER_MAX => Strategy::Random,
            s if s <= GREEDY_TIER_MAX => {
                let within = (s - RANDOM_TIER_MAX - 1) as f64;
                let factor = 1.0 - within / 3.0 * 0.7;
                Strategy::Greedy {
                    jitter: JITTER_SCALE * factor,
                }
            }
            s if s >= MAX_STRENGTH => Strategy::Search {
                depth: SEARCH_DEPTH_MAX,
                width: ROOT_WIDTH_MAX,
            },
            _ => Strategy::Search {
                depth: SEARCH_DEPTH_HIGH,
                width: ROOT_WIDTH_HIGH,
            },
        }
    }
}

/// Candidates kept at an interior node with `depth` plies left.
fn node_width(depth: u32) -> usize {
    let i = (depth.clamp(1, 3) - 1) as usize;
    NODE_WIDTH[i]
}

/// Sort `moves` best-first for `color` and keep at most `width` of them.
pub fn order_moves(
    pos: &Position,
    moves: &[Point],
    color: Color,
    eval: &Evaluator,
    width: usize,
) -> Vec<Point> {
    let mut scored: Vec<(f64, Point)> = moves
        .iter()
        .map(|&p| (eval.score_move(&pos.board, p, color), p))
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.truncate(width);
    scored.into_iter().map(|(_, p)| p).collect()
}

/// Move selector with its own random source.
pub struct Searcher {
    rng: fastrand::Rng,
    nodes: u64,
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Searcher {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
            nodes: 0,
        }
    }

    /// A searcher whose random choices are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            nodes: 0,
        }
    }

    /// Nodes visited by the last alpha-beta search.
    pub fn nodes_searched(&self) -> u64 {
        self.nodes
    }

    /// Pick a move for the side to move at the given strength.
    pub fn choose_move(&mut self, pos: &Position, strength: Strength) -> Result<Point, GoError> {
        self.run(pos, strength.strategy(), &strength.evaluator())
    }

    /// Pick a move with an explicit strategy and evaluator.
    ///
    /// Returns [`GoError::NoLegalMoves`] if the side to move has nowhere to play.
    pub fn run(
        &mut self,
        pos: &Position,
        strategy: Strategy,
        eval: &Evaluator,
    ) -> Result<Point, GoError> {
        let moves = pos.legal_moves();
        if moves.is_empty() {
            return Err(GoError::NoLegalMoves);
        }
        self.nodes = 0;

        let mv = match strategy {
            Strategy::Random => self.random_move(&moves),
            Strategy::Greedy { jitter } => self.greedy_move(pos, &moves, eval, jitter),
            Strategy::Search { depth, width } => self.search_move(pos, &moves, eval, depth, width),
        };
        debug!(
            color = %pos.to_move,
            ?strategy,
            ?mv,
            nodes = self.nodes,
            candidates = moves.len(),
            "ai move chosen"
        );
        Ok(mv)
    }

    fn random_move(&mut self, moves: &[Point]) -> Point {
        moves[self.rng.usize(..moves.len())]
    }

    fn greedy_move(&mut self, pos: &Position, moves: &[Point], eval: &Evaluator, jitter: f64) -> Point {
        let mut best = moves[0];
        let mut best_score = f64::NEG_INFINITY;
        for &mv in moves {
            let score = eval.score_move(&pos.board, mv, pos.to_move)
                + (self.rng.f64() - 0.5) * jitter;
            if score > best_score {
                best_score = score;
                best = mv;
            }
        }
        best
    }

    fn search_move(
        &mut self,
        pos: &Position,
        moves: &[Point],
        eval: &Evaluator,
        depth: u32,
        width: usize,
    ) -> Point {
        let root = pos.to_move;
        let candidates = order_moves(pos, moves, root, eval, width);
        let mut best = None;
        let mut best_score = f64::NEG_INFINITY;
        let mut alpha = f64::NEG_INFINITY;

        for mv in candidates {
            let mut child = pos.clone();
            child.play_unchecked(mv);
            let score = if depth > 1 {
                self.alpha_beta(&child, depth - 1, alpha, f64::INFINITY, false, root, eval)
            } else {
                self.nodes += 1;
                eval.evaluate(&child.board, root)
            };
            if score > best_score {
                best_score = score;
                best = Some(mv);
            }
            alpha = alpha.max(score);
        }

        match best {
            Some(mv) => mv,
            None => self.random_move(moves),
        }
    }

    /// Minimax with alpha-beta pruning. Scores are always from `root`'s view.
    #[allow(clippy::too_many_arguments)]
    fn alpha_beta(
        &mut self,
        pos: &Position,
        depth: u32,
        mut alpha: f64,
        mut beta: f64,
        maximizing: bool,
        root: Color,
        eval: &Evaluator,
    ) -> f64 {
        self.nodes += 1;
        if depth == 0 {
            return eval.evaluate(&pos.board, root);
        }
        let moves = pos.legal_moves();
        if moves.is_empty() {
            return eval.evaluate(&pos.board, root);
        }
        let candidates = order_moves(pos, &moves, pos.to_move, eval, node_width(depth));

        if maximizing {
            let mut best = f64::NEG_INFINITY;
            for mv in candidates {
                let mut child = pos.clone();
                child.play_unchecked(mv);
                let score = self.alpha_beta(&child, depth - 1, alpha, beta, false, root, eval);
                best = best.max(score);
                alpha = alpha.max(score);
                if beta <= alpha {
                    break;
                }
            }
            best
        } else {
            let mut best = f64::INFINITY;
            for mv in candidates {
                let mut child = pos.clone();
                child.play_unchecked(mv);
                let score = self.alpha_beta(&child, depth - 1, alpha, beta, true, root, eval);
                best = best.min(score);
                beta = beta.min(score);
                if beta <= alpha {
                    break;
                }
            }
            best
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardSize;

    fn strength(v: u8) -> Strength {
        Strength::new(v).unwrap()
    }

    #[test]
    fn test_strength_range() {
        assert!(Strength::new(0).is_err());
        assert!(Strength::new(11).is_err());
        assert_eq!(Strength::default().get(), DEFAULT_STRENGTH);
        assert!(strength(8).is_high());
        assert!(!strength(7).is_high());
    }

    #[test]
    fn test_strategy_tiers() {
        assert_eq!(strength(1).strategy(), Strategy::Random);
        assert_eq!(strength(3).strategy(), Strategy::Random);
        assert_eq!(
            strength(8).strategy(),
            Strategy::Search {
                depth: SEARCH_DEPTH_HIGH,
                width: ROOT_WIDTH_HIGH
            }
        );
        assert_eq!(
            strength(10).strategy(),
            Strategy::Search {
                depth: SEARCH_DEPTH_MAX,
                width: ROOT_WIDTH_MAX
            }
        );

        let jitter = |s: u8| match strength(s).strategy() {
            Strategy::Greedy { jitter } => jitter,
            other => panic!("expected greedy, got {other:?}"),
        };
        assert!((jitter(4) - JITTER_SCALE).abs() < 1e-9);
        assert!((jitter(7) - JITTER_SCALE * 0.3).abs() < 1e-9);
        assert!(jitter(5) > jitter(6));
    }

    #[test]
    fn test_node_width() {
        assert_eq!(node_width(1), 15);
        assert_eq!(node_width(2), 20);
        assert_eq!(node_width(3), 25);
        assert_eq!(node_width(4), 25);
    }

    #[test]
    fn test_order_moves_best_first_and_truncated() {
        let pos = Position::new(BoardSize::Nine);
        let eval = Evaluator::default();
        let moves = pos.legal_moves();
        let ordered = order_moves(&pos, &moves, Color::Black, &eval, 5);
        assert_eq!(ordered.len(), 5);
        let scores: Vec<f64> = ordered
            .iter()
            .map(|&p| eval.score_move(&pos.board, p, Color::Black))
            .collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(ordered[0], (4, 4));
    }

    #[test]
    fn test_random_move_is_legal() {
        let pos = Position::new(BoardSize::Nine);
        let mut searcher = Searcher::with_seed(7);
        let legal = pos.legal_moves();
        for _ in 0..20 {
            let mv = searcher.choose_move(&pos, strength(2)).unwrap();
            assert!(legal.contains(&mv));
        }
    }

    #[test]
    fn test_search_depth_one_on_empty_board() {
        let pos = Position::new(BoardSize::Nine);
        let mut searcher = Searcher::with_seed(1);
        let strategy = Strategy::Search { depth: 1, width: 15 };
        let mv = searcher.run(&pos, strategy, &Evaluator::default()).unwrap();
        assert!(pos.legal_moves().contains(&mv));
    }

    #[test]
    fn test_search_takes_free_capture() {
        let mut pos = Position::new(BoardSize::Nine);
        for p in [(3, 4), (5, 4), (4, 3)] {
            pos.board.set(p, Some(Color::Black));
        }
        pos.board.set((4, 4), Some(Color::White));
        pos.board.set((7, 7), Some(Color::White));
        let mut searcher = Searcher::with_seed(3);
        let strategy = Strategy::Search { depth: 2, width: 15 };
        let mv = searcher.run(&pos, strategy, &Evaluator::default()).unwrap();
        assert_eq!(mv, (4, 5));
        assert!(searcher.nodes_searched() > 0);
    }

    #[test]
    fn test_no_legal_moves() {
        let mut pos = Position::new(BoardSize::Nine);
        let all: Vec<Point> = pos.board.points().collect();
        for p in all {
            if p != (0, 0) {
                pos.board.set(p, Some(Color::White));
            }
        }
        let mut searcher = Searcher::with_seed(1);
        // The last empty point captures the whole white chain.
        assert_eq!(searcher.choose_move(&pos, strength(1)), Ok((0, 0)));

        pos.ko = Some((0, 0));
        assert_eq!(
            searcher.choose_move(&pos, strength(5)),
            Err(GoError::NoLegalMoves)
        );
    }
}
