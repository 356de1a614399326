//! Constants for board geometry, evaluator weights and search limits.
//!
//! Board size is chosen at runtime (see [`crate::board::BoardSize`]); everything
//! here is fixed at compile time.

use std::time::Duration;

// =============================================================================
// Board Geometry
// =============================================================================

/// Board sizes the engine accepts.
pub const SUPPORTED_SIZES: [usize; 3] = [9, 13, 19];

/// Star points (hoshi) on each axis of a 19x19 board.
pub const STAR_POINTS_19: [usize; 3] = [3, 9, 15];

/// Star points on each axis of a 13x13 board.
pub const STAR_POINTS_13: [usize; 3] = [3, 6, 9];

/// Star points on each axis of a 9x9 board.
pub const STAR_POINTS_9: [usize; 3] = [2, 4, 6];

// =============================================================================
// AI Strength
// =============================================================================

/// Lowest configurable strength.
pub const MIN_STRENGTH: u8 = 1;

/// Highest configurable strength.
pub const MAX_STRENGTH: u8 = 10;

/// Strength used when none is configured.
pub const DEFAULT_STRENGTH: u8 = 5;

/// Strengths up to this value pick uniformly random moves.
pub const RANDOM_TIER_MAX: u8 = 3;

/// Strengths up to this value use the greedy one-ply policy.
pub const GREEDY_TIER_MAX: u8 = 7;

/// Strengths from this value on use the high-tier evaluator weights.
pub const HIGH_TIER_MIN: u8 = 8;

/// Magnitude of the greedy jitter term before strength scaling.
pub const JITTER_SCALE: f64 = 20.0;

/// Delay before a scheduled AI move fires.
pub const AI_MOVE_DELAY: Duration = Duration::from_millis(800);

// =============================================================================
// Search Limits
// =============================================================================

/// Search depth for strengths 8 and 9.
pub const SEARCH_DEPTH_HIGH: u32 = 3;

/// Search depth for the maximum strength.
pub const SEARCH_DEPTH_MAX: u32 = 4;

/// Root candidates examined for strengths 8 and 9.
pub const ROOT_WIDTH_HIGH: usize = 25;

/// Root candidates examined at maximum strength.
pub const ROOT_WIDTH_MAX: usize = 30;

/// Candidates kept at an interior node, indexed by remaining depth (1, 2, 3+).
pub const NODE_WIDTH: [usize; 3] = [15, 20, 25];

// =============================================================================
// Evaluator Weights
// =============================================================================

/// Heuristic weights for one strength tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub center: f64,
    pub corner: f64,
    pub edge: f64,
    pub star: f64,
    pub friendly: f64,
    pub enemy: f64,
    pub capture: f64,
    pub survival: f64,
    pub territory: f64,
    pub shape: f64,
    /// Whether the extra strategic terms (opponent's key point, openness) apply.
    pub strategic: bool,
}

/// Weights used below [`HIGH_TIER_MIN`].
pub const WEIGHTS_NORMAL: Weights = Weights {
    center: 4.0,
    corner: 40.0,
    edge: 25.0,
    star: 30.0,
    friendly: 25.0,
    enemy: 15.0,
    capture: 80.0,
    survival: 70.0,
    territory: 2.0,
    shape: 30.0,
    strategic: false,
};

/// Weights used from [`HIGH_TIER_MIN`] on.
pub const WEIGHTS_HIGH: Weights = Weights {
    center: 6.0,
    corner: 50.0,
    edge: 35.0,
    star: 40.0,
    friendly: 35.0,
    enemy: 25.0,
    capture: 100.0,
    survival: 90.0,
    territory: 3.0,
    shape: 45.0,
    strategic: true,
};

/// Share of the opponent's score for a point credited to taking it first.
pub const OPPONENT_POINT_FACTOR: f64 = 0.3;

/// Weight of the openness term in the strategic tier.
pub const OPENNESS_WEIGHT: f64 = 20.0;

/// Radius scanned when measuring openness.
pub const OPENNESS_RADIUS: i32 = 3;

/// Whole-board bonus per stone of material difference.
pub const MATERIAL_WEIGHT: f64 = 50.0;

/// Whole-board bonus per point of territory balance.
pub const TERRITORY_BALANCE_WEIGHT: f64 = 3.0;
