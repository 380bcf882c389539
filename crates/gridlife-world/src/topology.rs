//! Rectangular 3-D grid geometry.
//!
//! Cells are addressed by `(x, y, z)` with `0 <= x < width`,
//! `0 <= y < height`, `0 <= z < depth`. East/West move along x,
//! North/South along y, Up/Down along z. A wrapping grid joins opposite
//! faces; a bounded one refuses to move past them.

use std::cmp::Ordering;

use rand::RngCore;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use gridlife_agents::Topology;
use gridlife_types::{Direction, Location, LocationDirection};

use crate::error::WorldError;

/// Dimensions and edge behavior of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridTopology {
    width: u32,
    height: u32,
    depth: u32,
    wrap: bool,
}

impl GridTopology {
    /// Create a grid of the given size.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EmptyGrid`] if any dimension is zero.
    pub const fn new(width: u32, height: u32, depth: u32, wrap: bool) -> Result<Self, WorldError> {
        if width == 0 || height == 0 || depth == 0 {
            return Err(WorldError::EmptyGrid {
                width,
                height,
                depth,
            });
        }
        Ok(Self {
            width,
            height,
            depth,
            wrap,
        })
    }

    /// Cells along x.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Cells along y.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Layers along z.
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Whether opposite faces are joined.
    pub const fn wraps(&self) -> bool {
        self.wrap
    }

    /// Whether `location` lies on the grid.
    pub const fn contains(&self, location: Location) -> bool {
        location.x < self.width && location.y < self.height && location.z < self.depth
    }

    /// Total number of cells, or `None` if it does not fit in `usize`.
    pub fn cell_count(&self) -> Option<usize> {
        let count = u64::from(self.width)
            .checked_mul(u64::from(self.height))?
            .checked_mul(u64::from(self.depth))?;
        usize::try_from(count).ok()
    }

    /// Dense index of `location`, x fastest.
    pub fn index(&self, location: Location) -> Option<usize> {
        if !self.contains(location) {
            return None;
        }
        let row = u64::from(location.z)
            .checked_mul(u64::from(self.height))?
            .checked_add(u64::from(location.y))?;
        let flat = row
            .checked_mul(u64::from(self.width))?
            .checked_add(u64::from(location.x))?;
        usize::try_from(flat).ok()
    }

    /// Inverse of [`index`](Self::index).
    pub fn location_at(&self, index: usize) -> Option<Location> {
        let index = u64::try_from(index).ok()?;
        let width = u64::from(self.width);
        let height = u64::from(self.height);
        let x = index.checked_rem(width)?;
        let row = index.checked_div(width)?;
        let y = row.checked_rem(height)?;
        let z = row.checked_div(height)?;
        let location = Location::new(
            u32::try_from(x).ok()?,
            u32::try_from(y).ok()?,
            u32::try_from(z).ok()?,
        );
        self.contains(location).then_some(location)
    }

    /// Every cell, in index order.
    pub fn locations(&self) -> impl Iterator<Item = Location> + '_ {
        (0..self.cell_count().unwrap_or(0)).filter_map(|index| self.location_at(index))
    }

    /// Facings an agent may take on this grid. Single-layer grids exclude
    /// Up and Down.
    pub const fn facings(&self) -> &'static [Direction] {
        if self.depth == 1 {
            &Direction::HORIZONTAL
        } else {
            &Direction::ALL
        }
    }

    fn neighbor(&self, location: Location, direction: Direction) -> Option<Location> {
        let (dx, dy, dz) = direction.offset();
        Some(Location::new(
            self.shift(location.x, dx, self.width)?,
            self.shift(location.y, dy, self.height)?,
            self.shift(location.z, dz, self.depth)?,
        ))
    }

    fn shift(&self, value: u32, delta: i8, size: u32) -> Option<u32> {
        match delta.cmp(&0) {
            Ordering::Equal => Some(value),
            Ordering::Greater => match value.checked_add(1) {
                Some(next) if next < size => Some(next),
                _ if self.wrap => Some(0),
                _ => None,
            },
            Ordering::Less => match value.checked_sub(1) {
                Some(previous) => Some(previous),
                None if self.wrap => size.checked_sub(1),
                None => None,
            },
        }
    }
}

impl Topology for GridTopology {
    fn adjacent(&self, position: LocationDirection) -> LocationDirection {
        if !self.contains(position.location) {
            return position;
        }
        self.neighbor(position.location, position.direction)
            .map_or(position, |location| location.facing(position.direction))
    }

    fn turn_left(&self, position: LocationDirection) -> LocationDirection {
        let direction = match position.direction {
            Direction::East => Direction::North,
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::Up | Direction::Down => Direction::North,
        };
        position.location.facing(direction)
    }

    fn turn_right(&self, position: LocationDirection) -> LocationDirection {
        let direction = match position.direction {
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
            Direction::North => Direction::East,
            Direction::Up | Direction::Down => Direction::South,
        };
        position.location.facing(direction)
    }

    fn turn_up(&self, position: LocationDirection) -> LocationDirection {
        position.location.facing(Direction::Up)
    }

    fn turn_down(&self, position: LocationDirection) -> LocationDirection {
        position.location.facing(Direction::Down)
    }

    fn random_direction(&self, rng: &mut dyn RngCore) -> Direction {
        self.facings().choose(rng).copied().unwrap_or(Direction::East)
    }
}
