//! Error types for maze generation and solving.

use thiserror::Error;

/// Result type alias for maze operations.
pub type Result<T> = std::result::Result<T, MazeError>;

/// Structural failures of the maze engine.
///
/// Failing to find a route is not one of these; see
/// [crate::SolveOutcome::NoPathFound].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    /// Grid dimension is zero, or too large to index
    #[error("Invalid maze dimension: {0} (must be at least 1)")]
    InvalidDimension(usize),

    /// Element index outside of the disjoint set
    #[error("Element {index} out of range for disjoint set of {len} elements")]
    OutOfRange { index: usize, len: usize },

    /// Start or goal is not an open square
    #[error("Endpoint at y={y}, x={x} is not a passage")]
    InvalidEndpoint { y: usize, x: usize },

    /// Edge between cells that are not orthogonal neighbors
    #[error("Edge {u} - {v} does not join two adjacent cells")]
    InvalidEdge { u: usize, v: usize },

    /// Malformed serialized grid
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// Solver gave up after exploring the allowed number of squares
    #[error("Step budget of {0} squares exhausted before reaching the goal")]
    StepBudgetExceeded(usize),

    #[error("Unknown generation algorithm `{0}`; expected kruskal, kruskal_optimized, kruskal_weighted or backtracker")]
    UnknownAlgorithm(String),

    #[error("Unknown solver `{0}`; expected dfs or astar")]
    UnknownSolver(String),
}
