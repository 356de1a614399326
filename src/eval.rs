//! Heuristic position evaluation.
//!
//! Two entry points:
//! - [`Evaluator::score_move`] rates placing a stone at one point. Used for
//!   greedy play and for ordering moves in search.
//! - [`Evaluator::evaluate`] rates a whole board for one color. Used at search
//!   leaves.
//!
//! Scores are only meaningful relative to each other. The evaluator holds no
//! random state: the same board and weights always give the same score.

use std::collections::VecDeque;

use crate::board::{Board, Color, Point};
use crate::constants::{
    MATERIAL_WEIGHT, OPENNESS_RADIUS, OPENNESS_WEIGHT, OPPONENT_POINT_FACTOR,
    TERRITORY_BALANCE_WEIGHT, WEIGHTS_HIGH, WEIGHTS_NORMAL, Weights,
};

/// Who owns an empty region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Color(Color),
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluator {
    weights: Weights,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(WEIGHTS_NORMAL)
    }
}

impl Evaluator {
    pub fn new(weights: Weights) -> Self {
        Self { weights }
    }

    /// Evaluator using the high-tier weights when `high` is set.
    pub fn for_tier(high: bool) -> Self {
        Self::new(if high { WEIGHTS_HIGH } else { WEIGHTS_NORMAL })
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Score a stone of `color` at `p`. Higher is better for `color`.
    ///
    /// `p` may be empty (a candidate move) or already hold a `color` stone
    /// (when scoring an existing position).
    pub fn score_move(&self, board: &Board, p: Point, color: Color) -> f64 {
        let mut score = self.base_score(board, p, color);
        if self.weights.strategic {
            let theirs = self.base_score(board, p, color.opponent());
            score += (theirs * OPPONENT_POINT_FACTOR).max(0.0);
            score += openness(board, p) * OPENNESS_WEIGHT;
        }
        score
    }

    fn base_score(&self, board: &Board, p: Point, color: Color) -> f64 {
        let w = &self.weights;
        let opp = color.opponent();
        let n = board.size() as f64;
        let mut score = 0.0;

        let center = (n - 1.0) / 2.0;
        let dist = (p.0 as f64 - center).abs() + (p.1 as f64 - center).abs();
        score += (n - dist) * w.center;

        if board.is_corner(p) {
            score += w.corner;
        } else if board.is_edge(p) {
            score += w.edge;
        }
        if board.is_star_point(p) {
            score += w.star;
        }

        let (mut friendly, mut enemy) = (0, 0);
        for q in board.neighbors(p) {
            match board.get(q) {
                Some(c) if c == color => friendly += 1,
                Some(_) => enemy += 1,
                None => {}
            }
        }
        score += friendly as f64 * w.friendly;
        score -= enemy as f64 * w.enemy;

        let mut after = board.clone();
        after.set(p, Some(color));
        let captured = after.dead_groups_around(p, opp);
        for &r in &captured {
            after.set(r, None);
        }
        score += captured.len() as f64 * w.capture;

        let own = after.connected_group(p);
        if after.group_liberties(&own) == 0 {
            score -= own.len() as f64 * w.survival;
        }

        score += territory_potential(board, p, color) * w.territory;
        score += shape(board, &after, p, color) * w.shape;
        score
    }

    /// Score the whole board from `color`'s point of view.
    pub fn evaluate(&self, board: &Board, color: Color) -> f64 {
        let opp = color.opponent();
        let mut score = 0.0;
        for p in board.points() {
            match board.get(p) {
                Some(c) if c == color => score += self.score_move(board, p, color),
                Some(_) => score -= self.score_move(board, p, opp),
                None => {}
            }
        }
        let material = board.count(color) as f64 - board.count(opp) as f64;
        score += material * MATERIAL_WEIGHT;
        score += territory_balance(board, color) as f64 * TERRITORY_BALANCE_WEIGHT;
        score
    }
}

/// Flood-fill the empty region containing `start` and decide who owns it.
///
/// A region belongs to a color only if every stone bordering it is that color.
/// Regions with mixed or no borders are neutral. Returns the region and owner.
pub fn empty_region(board: &Board, start: Point) -> (Vec<Point>, Owner) {
    let mut region = Vec::new();
    let mut border: Option<Color> = None;
    let mut mixed = false;
    let mut seen = vec![false; board.size() * board.size()];
    let idx = |(x, y): Point| y * board.size() + x;
    if board.get(start).is_some() {
        return (region, Owner::Neutral);
    }

    let mut queue = VecDeque::from([start]);
    seen[idx(start)] = true;
    while let Some(p) = queue.pop_front() {
        region.push(p);
        for q in board.neighbors(p) {
            match board.get(q) {
                None => {
                    if !seen[idx(q)] {
                        seen[idx(q)] = true;
                        queue.push_back(q);
                    }
                }
                Some(c) => match border {
                    None => border = Some(c),
                    Some(b) if b != c => mixed = true,
                    Some(_) => {}
                },
            }
        }
    }

    let owner = match border {
        Some(c) if !mixed => Owner::Color(c),
        _ => Owner::Neutral,
    };
    (region, owner)
}

/// Territory owned by `color` minus territory owned by its opponent.
pub fn territory_balance(board: &Board, color: Color) -> i64 {
    let mut seen = vec![false; board.size() * board.size()];
    let mut balance = 0i64;
    for p in board.points() {
        let i = p.1 * board.size() + p.0;
        if seen[i] || board.get(p).is_some() {
            continue;
        }
        let (region, owner) = empty_region(board, p);
        for &(x, y) in &region {
            seen[y * board.size() + x] = true;
        }
        match owner {
            Owner::Color(c) if c == color => balance += region.len() as i64,
            Owner::Color(_) => balance -= region.len() as i64,
            Owner::Neutral => {}
        }
    }
    balance
}

/// Walk outward in each direction until hitting a stone or the edge.
///
/// Reaching an own stone adds the distance walked, an enemy stone subtracts
/// half of it, and running off the edge adds one and a half times it.
fn territory_potential(board: &Board, p: Point, color: Color) -> f64 {
    const DIRS: [(isize, isize); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
    let n = board.size() as isize;
    let mut potential = 0.0;

    for (dx, dy) in DIRS {
        let mut distance = 0.0;
        let (mut x, mut y) = (p.0 as isize + dx, p.1 as isize + dy);
        let mut off_board = true;
        while x >= 0 && x < n && y >= 0 && y < n {
            match board.get((x as usize, y as usize)) {
                Some(c) if c == color => {
                    potential += distance;
                    off_board = false;
                    break;
                }
                Some(_) => {
                    potential -= distance * 0.5;
                    off_board = false;
                    break;
                }
                None => {}
            }
            distance += 1.0;
            x += dx;
            y += dy;
        }
        if off_board {
            potential += distance * 1.5;
        }
    }
    potential
}

/// Tiger's-mouth shape on the board before the move, plus eye potential after.
fn shape(before: &Board, after: &Board, p: Point, color: Color) -> f64 {
    let mut score = 0.0;
    let (mut empty, mut enemy) = (0, 0);
    for q in before.neighbors(p) {
        match before.get(q) {
            None => empty += 1,
            Some(c) if c != color => enemy += 1,
            Some(_) => {}
        }
    }
    if empty == 1 && enemy == 3 {
        score += 2.0;
    }
    score + eye_potential(after, p, color)
}

/// Count of `p`'s orthogonal neighbors that are `color` or off the board.
fn solid_neighbors(board: &Board, p: Point, color: Color) -> usize {
    let on_board = board.neighbors(p).count();
    let own = board
        .neighbors(p)
        .filter(|&q| board.get(q) == Some(color))
        .count();
    own + (4 - on_board)
}

/// Approximate how much `p` contributes to making eyes for `color`.
///
/// A fully enclosed point scores 5. A point enclosed on three sides with the
/// fourth empty scores 3 with at least two own diagonals, 1 otherwise. An eyeish
/// point gains 2 more for every second eye candidate two steps away across an
/// own stone. The board edge counts as an own stone, so edge and corner points
/// enclose eyes more easily than interior ones.
pub fn eye_potential(board: &Board, p: Point, color: Color) -> f64 {
    let solid = solid_neighbors(board, p, color);
    let empty = board
        .neighbors(p)
        .filter(|&q| board.get(q).is_none())
        .count();

    let mut score = if solid == 4 {
        5.0
    } else if solid == 3 && empty == 1 {
        let support = board
            .diagonal_neighbors(p)
            .filter(|&d| board.get(d) == Some(color))
            .count();
        if support >= 2 { 3.0 } else { 1.0 }
    } else {
        0.0
    };

    if score > 0.0 {
        let n = board.size() as isize;
        for (dx, dy) in [(0isize, 2isize), (2, 0), (0, -2), (-2, 0)] {
            let (tx, ty) = (p.0 as isize + dx, p.1 as isize + dy);
            if tx < 0 || tx >= n || ty < 0 || ty >= n {
                continue;
            }
            let mid = ((p.0 as isize + dx / 2) as usize, (p.1 as isize + dy / 2) as usize);
            let target = (tx as usize, ty as usize);
            if board.get(mid) == Some(color)
                && board.get(target).is_none()
                && solid_neighbors(board, target, color) >= 3
            {
                score += 2.0;
            }
        }
    }
    score
}

/// Emptiness of the area within [`OPENNESS_RADIUS`] of `p`, nearer points
/// weighing more. Never negative.
fn openness(board: &Board, p: Point) -> f64 {
    let n = board.size() as i32;
    let r = OPENNESS_RADIUS;
    let mut open = 0.0;
    for dx in -r..=r {
        for dy in -r..=r {
            if dx == 0 && dy == 0 {
                continue;
            }
            let (x, y) = (p.0 as i32 + dx, p.1 as i32 + dy);
            if x < 0 || x >= n || y < 0 || y >= n {
                continue;
            }
            let distance = (dx.abs() + dy.abs()) as f64;
            let weight = (r as f64 + 1.0 - distance) / (r as f64 + 1.0);
            if board.get((x as usize, y as usize)).is_none() {
                open += weight;
            } else {
                open -= weight * 0.5;
            }
        }
    }
    open.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardSize;

    fn nine() -> Board {
        Board::new(BoardSize::Nine)
    }

    #[test]
    fn test_center_beats_first_line_on_empty_board() {
        let b = nine();
        let e = Evaluator::default();
        let center = e.score_move(&b, (4, 4), Color::Black);
        let edge = e.score_move(&b, (4, 0), Color::Black);
        let corner = e.score_move(&b, (0, 0), Color::Black);
        assert!(center > edge);
        assert!(center > corner);
    }

    #[test]
    fn test_capture_is_rewarded() {
        let mut b = nine();
        b.set((4, 4), Some(Color::White));
        b.set((3, 4), Some(Color::Black));
        b.set((5, 4), Some(Color::Black));
        b.set((4, 3), Some(Color::Black));
        let e = Evaluator::default();
        let capture = e.score_move(&b, (4, 5), Color::Black);
        let quiet = e.score_move(&b, (6, 6), Color::Black);
        assert!(capture > quiet);
    }

    #[test]
    fn test_self_atari_without_liberties_is_penalized() {
        let mut b = nine();
        b.set((1, 0), Some(Color::White));
        b.set((0, 1), Some(Color::White));
        b.set((2, 0), Some(Color::Black));
        let e = Evaluator::default();
        // (0,0) would be suicide for black; (2,1) is an ordinary contact move.
        assert!(e.score_move(&b, (0, 0), Color::Black) < e.score_move(&b, (2, 1), Color::Black));
    }

    #[test]
    fn test_high_tier_weighs_center_and_connection_more() {
        let mut b = nine();
        b.set((4, 3), Some(Color::Black));
        b.set((4, 5), Some(Color::Black));
        let normal = Evaluator::for_tier(false);
        let high = Evaluator::for_tier(true);

        // Connecting the two stones at the center point.
        let connect_high = high.score_move(&b, (4, 4), Color::Black);
        let connect_normal = normal.score_move(&b, (4, 4), Color::Black);
        assert!(connect_high > connect_normal);

        // Center on an empty board.
        let empty = nine();
        let center_high = high.score_move(&empty, (4, 4), Color::Black);
        let center_normal = normal.score_move(&empty, (4, 4), Color::Black);
        assert!(center_high > center_normal);
    }

    #[test]
    fn test_territory_requires_single_color_border() {
        let mut b = nine();
        assert_eq!(territory_balance(&b, Color::Black), 0);

        // A black wall on column 2 borders both sides of the board.
        for y in 0..9 {
            b.set((2, y), Some(Color::Black));
        }
        assert_eq!(territory_balance(&b, Color::Black), 18 + 54);

        // A white stone on the far side makes that region mixed.
        b.set((6, 6), Some(Color::White));
        assert_eq!(territory_balance(&b, Color::Black), 18);
        assert_eq!(territory_balance(&b, Color::White), -18);
    }

    #[test]
    fn test_empty_region_owner() {
        let mut b = nine();
        b.set((1, 0), Some(Color::White));
        b.set((0, 1), Some(Color::White));
        let (region, owner) = empty_region(&b, (0, 0));
        assert_eq!(region, vec![(0, 0)]);
        assert_eq!(owner, Owner::Color(Color::White));
        let (region, owner) = empty_region(&b, (5, 5));
        assert_eq!(region.len(), 78);
        assert_eq!(owner, Owner::Color(Color::White));

        // No bordering stones at all: nobody's territory.
        let (_, owner) = empty_region(&nine(), (5, 5));
        assert_eq!(owner, Owner::Neutral);
    }

    #[test]
    fn test_eye_potential() {
        let mut b = nine();
        for p in [(1, 0), (0, 1), (1, 1)] {
            b.set(p, Some(Color::Black));
        }
        // Corner point enclosed by black and the edges.
        assert_eq!(eye_potential(&b, (0, 0), Color::Black), 5.0);
        assert_eq!(eye_potential(&b, (0, 0), Color::White), 0.0);
        assert_eq!(eye_potential(&b, (5, 5), Color::Black), 0.0);
    }

    #[test]
    fn test_evaluate_is_deterministic_and_favors_material() {
        let mut b = nine();
        b.set((4, 4), Some(Color::Black));
        b.set((2, 2), Some(Color::Black));
        b.set((6, 6), Some(Color::White));
        for high in [false, true] {
            let e = Evaluator::for_tier(high);
            let first = e.evaluate(&b, Color::Black);
            assert_eq!(first, e.evaluate(&b, Color::Black));
            assert!(first > e.evaluate(&b, Color::White));
        }
    }

    #[test]
    fn test_openness_is_never_negative() {
        let mut b = nine();
        let all: Vec<Point> = b.points().collect();
        for p in all {
            b.set(p, Some(Color::White));
        }
        assert_eq!(openness(&b, (4, 4)), 0.0);
        assert!(openness(&nine(), (4, 4)) > 0.0);
    }
}
