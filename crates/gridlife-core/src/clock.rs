//! Simulation clock.
//!
//! The tick counter is the single source of truth for time. Agents read it
//! through [`SimulationInternals::time`](gridlife_agents::SimulationInternals::time);
//! only the scheduler advances it, once at the end of every tick.

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,
}

/// Monotonic tick counter starting at 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimClock {
    tick: u64,
}

impl SimClock {
    /// A clock at tick 0.
    pub const fn new() -> Self {
        Self { tick: 0 }
    }

    /// A clock resumed at `tick`.
    pub const fn at(tick: u64) -> Self {
        Self { tick }
    }

    /// The current tick.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Advance by one tick. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        Ok(self.tick)
    }
}
