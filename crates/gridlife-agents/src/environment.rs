//! The world as an agent sees it.
//!
//! [`Topology`] answers geometric questions (what cell lies ahead, what a
//! turn does to a facing). [`Environment`] owns the occupancy map, the food
//! map and the per-type parameter table. Agents mutate occupancy only
//! through [`Environment::set_agent`], and only from their own move
//! operation.

use std::sync::Arc;

use rand::RngCore;

use gridlife_types::{AgentId, AgentType, Direction, Location, LocationDirection};

use crate::params::AgentParams;

/// Grid adjacency and facing rules.
pub trait Topology {
    /// The position one cell ahead of `position` in its facing.
    ///
    /// Returns `position` unchanged when the move would leave a
    /// non-wrapping grid.
    fn adjacent(&self, position: LocationDirection) -> LocationDirection;

    /// `position` after a left turn.
    fn turn_left(&self, position: LocationDirection) -> LocationDirection;

    /// `position` after a right turn.
    fn turn_right(&self, position: LocationDirection) -> LocationDirection;

    /// `position` after turning to face upward.
    fn turn_up(&self, position: LocationDirection) -> LocationDirection;

    /// `position` after turning to face downward.
    fn turn_down(&self, position: LocationDirection) -> LocationDirection;

    /// A uniformly chosen facing valid for this topology.
    fn random_direction(&self, rng: &mut dyn RngCore) -> Direction;
}

/// What an agent finds when it looks at a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    /// Nothing blocks the cell. It may still hold food.
    Free,
    /// Another agent stands there.
    Agent(AgentId),
    /// Terrain the agent cannot enter.
    Obstacle,
}

/// Occupancy, food and parameters of the world.
pub trait Environment {
    /// The geometry agents move through.
    fn topology(&self) -> &dyn Topology;

    /// Whether an agent occupies `location`.
    fn has_agent(&self, location: Location) -> bool;

    /// The agent at `location`, if any.
    fn agent_at(&self, location: Location) -> Option<AgentId>;

    /// Place `agent` at `location`, or clear the cell with `None`.
    fn set_agent(&mut self, location: Location, agent: Option<AgentId>);

    /// Whether `location` is impassable terrain.
    fn is_obstacle(&self, location: Location) -> bool;

    /// Food value lying at `location`, if any.
    fn food_at(&self, location: Location) -> Option<u32>;

    /// Remove whatever food lies at `location`.
    fn remove_food(&mut self, location: Location);

    /// Default parameters for agents of `agent_type`.
    fn agent_params(&self, agent_type: AgentType) -> Option<Arc<AgentParams>>;

    /// Classify `location` for a step.
    fn tile(&self, location: Location) -> Tile {
        if let Some(id) = self.agent_at(location) {
            Tile::Agent(id)
        } else if self.is_obstacle(location) {
            Tile::Obstacle
        } else {
            Tile::Free
        }
    }
}
