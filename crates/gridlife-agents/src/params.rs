//! Per-type agent parameters.
//!
//! One [`AgentParams`] value exists per agent type. Agents hold it behind an
//! [`Arc`](std::sync::Arc) so every agent of a type, and every offspring
//! derived from it, shares the same object instead of a deep copy.

use serde::{Deserialize, Serialize};

/// Energy costs and aging rules shared by all agents of one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentParams {
    /// Energy granted when the agent is born (default: 100).
    pub init_energy: i64,

    /// Energy paid for stepping onto a free cell (default: 1).
    pub step_energy: i64,

    /// Energy paid for bumping into another agent (default: 2).
    pub step_agent_energy: i64,

    /// Whether agents die once they reach `aging_limit` (default: false).
    pub aging_mode: bool,

    /// Age in ticks at which an aging agent dies (default: 300).
    pub aging_limit: u64,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            init_energy: 100,
            step_energy: 1,
            step_agent_energy: 2,
            aging_mode: false,
            aging_limit: 300,
        }
    }
}

impl AgentParams {
    /// Whether an agent of age `age` has outlived these parameters.
    ///
    /// Always `false` when aging is disabled.
    pub const fn is_too_old(&self, age: u64) -> bool {
        self.aging_mode && age >= self.aging_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aging_limit_is_inclusive() {
        let params = AgentParams {
            aging_mode: true,
            aging_limit: 10,
            ..AgentParams::default()
        };
        assert!(!params.is_too_old(9));
        assert!(params.is_too_old(10));
        assert!(params.is_too_old(11));
    }

    #[test]
    fn aging_disabled_never_expires() {
        let params = AgentParams::default();
        assert!(!params.is_too_old(u64::MAX));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let parsed: Result<AgentParams, _> = serde_json::from_str(r#"{"step_energy": 4}"#);
        assert!(parsed.is_ok());
        if let Ok(params) = parsed {
            assert_eq!(params.step_energy, 4);
            assert_eq!(params.init_energy, AgentParams::default().init_energy);
        }
    }
}
