use thiserror::Error;

/// Why a move was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalReason {
    OffBoard,
    Occupied,
    Ko,
    Suicide,
}

impl std::fmt::Display for IllegalReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IllegalReason::OffBoard => write!(f, "point not on board"),
            IllegalReason::Occupied => write!(f, "point not empty"),
            IllegalReason::Ko => write!(f, "retakes ko"),
            IllegalReason::Suicide => write!(f, "suicide"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GoError {
    #[error("illegal move: {0}")]
    IllegalMove(IllegalReason),
    #[error("no moves to undo")]
    EmptyHistory,
    #[error("no legal moves available")]
    NoLegalMoves,
    #[error("unsupported board size {0} (expected 9, 13 or 19)")]
    UnsupportedBoardSize(usize),
    #[error("strength {0} out of range (expected 1..=10)")]
    InvalidStrength(u8),
}
