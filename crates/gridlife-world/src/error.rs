//! Error types for the `gridlife-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`].

use gridlife_types::Location;

/// Errors that can occur while building or editing the grid.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// Every grid dimension must be at least one cell.
    #[error("grid dimensions must be non-zero, got {width}x{height}x{depth}")]
    EmptyGrid {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
        /// Requested depth.
        depth: u32,
    },

    /// The grid has more cells than can be addressed in memory.
    #[error("grid of {width}x{height}x{depth} cells is too large")]
    GridTooLarge {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
        /// Requested depth.
        depth: u32,
    },

    /// The location lies outside the grid.
    #[error("location {0} is outside the grid")]
    OutOfBounds(Location),

    /// The cell already holds an agent.
    #[error("cell {0} is occupied")]
    CellOccupied(Location),

    /// The cell is impassable terrain.
    #[error("cell {0} is an obstacle")]
    CellObstructed(Location),
}
