//! Grid cells and facings.

use serde::{Deserialize, Serialize};

/// A cell in the three-dimensional grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
    /// Layer.
    pub z: u32,
}

impl Location {
    /// Create a location from its coordinates.
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Pair this cell with a facing.
    pub const fn facing(self, direction: Direction) -> LocationDirection {
        LocationDirection {
            location: self,
            direction,
        }
    }
}

impl core::fmt::Display for Location {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// One of the six axis-aligned facings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// +x
    East,
    /// -x
    West,
    /// +y
    North,
    /// -y
    South,
    /// +z
    Up,
    /// -z
    Down,
}

impl Direction {
    /// All facings, horizontal ones first.
    pub const ALL: [Self; 6] = [
        Self::East,
        Self::West,
        Self::North,
        Self::South,
        Self::Up,
        Self::Down,
    ];

    /// The four facings within a layer.
    pub const HORIZONTAL: [Self; 4] = [Self::East, Self::West, Self::North, Self::South];

    /// Unit offset along each axis.
    pub const fn offset(self) -> (i8, i8, i8) {
        match self {
            Self::East => (1, 0, 0),
            Self::West => (-1, 0, 0),
            Self::North => (0, 1, 0),
            Self::South => (0, -1, 0),
            Self::Up => (0, 0, 1),
            Self::Down => (0, 0, -1),
        }
    }

    /// Whether this facing stays within a layer.
    pub const fn is_horizontal(self) -> bool {
        !matches!(self, Self::Up | Self::Down)
    }
}

/// A cell together with the direction its occupant faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationDirection {
    /// The occupied cell.
    pub location: Location,
    /// Current facing.
    pub direction: Direction,
}

/// Where a new agent should appear.
///
/// A `None` facing is resolved to a random direction exactly once, when the
/// agent is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpawnPoint {
    /// Target cell.
    pub location: Location,
    /// Requested facing, if any.
    pub direction: Option<Direction>,
}

impl SpawnPoint {
    /// Spawn at `location` facing a random direction.
    pub const fn anywhere_facing(location: Location) -> Self {
        Self {
            location,
            direction: None,
        }
    }

    /// Spawn at `location` with a fixed facing.
    pub const fn facing(location: Location, direction: Direction) -> Self {
        Self {
            location,
            direction: Some(direction),
        }
    }
}

impl From<LocationDirection> for SpawnPoint {
    fn from(position: LocationDirection) -> Self {
        Self::facing(position.location, position.direction)
    }
}
