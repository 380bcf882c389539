//! Decision strategies.
//!
//! A [`Controller`] is invoked once per tick for each live agent and acts by
//! calling the agent's movement operations. Offspring receive a controller
//! derived from their parents' through [`Controller::create_child_asexual`]
//! or [`Controller::create_child_sexual`].

use std::any::Any;
use std::fmt::Debug;

use rand::Rng;

use crate::agent::AgentBody;
use crate::simulation::AgentContext;

/// Per-agent decision strategy.
pub trait Controller: Debug {
    /// Decide and perform this tick's action for `agent`.
    fn control_agent(&mut self, agent: &mut AgentBody, ctx: &mut AgentContext<'_>);

    /// Controller for a single-parent child.
    fn create_child_asexual(&self) -> Box<dyn Controller>;

    /// Controller for a child of this controller's agent and `other`'s.
    fn create_child_sexual(&self, other: &dyn Controller) -> Box<dyn Controller>;

    /// Concrete-type access for strategies that combine with their own kind.
    fn as_any(&self) -> &dyn Any;
}

/// Wanders: turns with probability `turn_pct`%, otherwise steps forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomWalkController {
    turn_pct: u8,
}

impl RandomWalkController {
    /// Create a walker turning `turn_pct` percent of the time (capped at 100).
    pub fn new(turn_pct: u8) -> Self {
        Self {
            turn_pct: turn_pct.min(100),
        }
    }

    /// Percentage of ticks spent turning.
    pub const fn turn_pct(&self) -> u8 {
        self.turn_pct
    }
}

impl Controller for RandomWalkController {
    fn control_agent(&mut self, agent: &mut AgentBody, ctx: &mut AgentContext<'_>) {
        let roll: u8 = ctx.simulation.rng().random_range(0..100);
        if roll < self.turn_pct {
            if ctx.simulation.rng().random_bool(0.5) {
                agent.turn_left(ctx);
            } else {
                agent.turn_right(ctx);
            }
            return;
        }

        let outcome = agent.step(ctx);
        tracing::trace!(agent_id = %agent.id(), ?outcome, "random walk step");
    }

    fn create_child_asexual(&self) -> Box<dyn Controller> {
        Box::new(*self)
    }

    fn create_child_sexual(&self, other: &dyn Controller) -> Box<dyn Controller> {
        let turn_pct = other
            .as_any()
            .downcast_ref::<Self>()
            .map_or(self.turn_pct, |other| self.turn_pct.midpoint(other.turn_pct));
        Box::new(Self::new(turn_pct))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
