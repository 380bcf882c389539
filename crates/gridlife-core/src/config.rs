//! Configuration loading and typed config structures for Gridlife.
//!
//! The canonical configuration lives in `gridlife-config.yaml`. This module
//! defines structs that mirror the YAML layout, a loader, and a validation
//! pass. Every field has a default, so an empty document is a valid
//! configuration.

use std::path::Path;

use serde::Deserialize;

use gridlife_agents::AgentParams;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but describes an impossible world.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Grid size, edge behavior and seed.
    #[serde(default)]
    pub world: WorldConfig,

    /// One entry per agent type; the list index is the type number.
    #[serde(default = "default_agent_types")]
    pub agent_types: Vec<AgentTypeConfig>,

    /// Initial food.
    #[serde(default)]
    pub food: FoodConfig,

    /// Run length.
    #[serde(default)]
    pub simulation: RunConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            agent_types: default_agent_types(),
            food: FoodConfig::default(),
            simulation: RunConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Reject configurations that cannot produce a world.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for zero grid dimensions, an empty
    /// agent type list, more initial agents than cells, food without
    /// kinds, or a turn percentage above 100.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let world = &self.world;
        if world.width == 0 || world.height == 0 || world.depth == 0 {
            return Err(invalid(format!(
                "grid dimensions must be non-zero, got {}x{}x{}",
                world.width, world.height, world.depth
            )));
        }
        if self.agent_types.is_empty() {
            return Err(invalid("at least one agent type must be configured".to_owned()));
        }

        let cells = world.cell_count();
        let agents = self
            .agent_types
            .iter()
            .fold(0_u64, |acc, t| acc.saturating_add(u64::from(t.initial_count)));
        if agents > cells {
            return Err(invalid(format!(
                "{agents} initial agents do not fit in {cells} cells"
            )));
        }

        if self.food.initial_cells > 0 && self.food.kinds == 0 {
            return Err(invalid("food.kinds must be at least 1 when food is placed".to_owned()));
        }

        if let Some((index, t)) = self
            .agent_types
            .iter()
            .enumerate()
            .find(|(_, t)| t.turn_pct > 100)
        {
            return Err(invalid(format!(
                "agent_types[{index}].turn_pct is {}, must be at most 100",
                t.turn_pct
            )));
        }

        Ok(())
    }
}

fn invalid(reason: String) -> ConfigError {
    ConfigError::Invalid { reason }
}

/// Grid and seed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable run name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Cells along x.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Cells along y.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Layers along z.
    #[serde(default = "default_depth")]
    pub depth: u32,

    /// Whether opposite edges are joined.
    #[serde(default = "default_true")]
    pub wrap: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            width: default_width(),
            height: default_height(),
            depth: default_depth(),
            wrap: default_true(),
        }
    }
}

impl WorldConfig {
    /// Number of cells, saturating.
    pub fn cell_count(&self) -> u64 {
        u64::from(self.width)
            .saturating_mul(u64::from(self.height))
            .saturating_mul(u64::from(self.depth))
    }
}

/// Parameters and seeding for one agent type.
///
/// The [`AgentParams`] keys sit at the same level as the seeding keys in
/// the config file; anything left out takes the [`AgentParams`] default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AgentTypeConfig {
    /// Energy costs and aging rules shared by agents of this type.
    #[serde(flatten)]
    pub params: AgentParams,

    /// Agents of this type placed at startup.
    #[serde(default = "default_initial_count")]
    pub initial_count: u32,

    /// Percentage of ticks a random walker spends turning.
    #[serde(default = "default_turn_pct")]
    pub turn_pct: u8,
}

impl Default for AgentTypeConfig {
    fn default() -> Self {
        Self {
            params: AgentParams::default(),
            initial_count: default_initial_count(),
            turn_pct: default_turn_pct(),
        }
    }
}

impl AgentTypeConfig {
    /// The per-type parameters agents of this type share.
    pub fn params(&self) -> AgentParams {
        self.params.clone()
    }
}

/// Initial food placement.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FoodConfig {
    /// Number of cells seeded with food.
    #[serde(default = "default_food_cells")]
    pub initial_cells: u32,

    /// Food values are drawn from `1..=kinds`.
    #[serde(default = "default_food_kinds")]
    pub kinds: u32,
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            initial_cells: default_food_cells(),
            kinds: default_food_kinds(),
        }
    }
}

/// Run length.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunConfig {
    /// Stop after this many ticks.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "Gridlife".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_width() -> u32 {
    32
}

const fn default_height() -> u32 {
    32
}

const fn default_depth() -> u32 {
    1
}

const fn default_true() -> bool {
    true
}

fn default_agent_types() -> Vec<AgentTypeConfig> {
    vec![AgentTypeConfig::default()]
}

const fn default_initial_count() -> u32 {
    10
}

const fn default_turn_pct() -> u8 {
    20
}

const fn default_food_cells() -> u32 {
    64
}

const fn default_food_kinds() -> u32 {
    3
}

const fn default_max_ticks() -> u64 {
    1000
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert_eq!(config.world.seed, 42);
        assert_eq!(config.agent_types.len(), 1);
        assert_eq!(config.simulation.max_ticks, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
world:
  name: "Two Tribes"
  seed: 7
  width: 10
  height: 8
  depth: 2
  wrap: false

agent_types:
  - init_energy: 50
    step_energy: 2
    step_agent_energy: 5
    aging_mode: true
    aging_limit: 40
    initial_count: 4
    turn_pct: 30
  - initial_count: 2

food:
  initial_cells: 12
  kinds: 2

simulation:
  max_ticks: 250
"#;
        let config = SimulationConfig::parse(yaml).unwrap();
        assert_eq!(config.world.name, "Two Tribes");
        assert!(!config.world.wrap);
        assert_eq!(config.world.cell_count(), 160);
        assert_eq!(config.agent_types.len(), 2);

        let first = config.agent_types.first().unwrap();
        assert_eq!(first.params().aging_limit, 40);
        assert!(first.params().aging_mode);
        let second = config.agent_types.get(1).unwrap();
        assert_eq!(second.params, AgentParams::default());
        assert_eq!(second.turn_pct, 20);

        assert_eq!(config.food.kinds, 2);
        assert_eq!(config.simulation.max_ticks, 250);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn agent_keys_fill_shared_params() {
        let yaml = "agent_types:\n  - step_agent_energy: 7\n    initial_count: 3\n    turn_pct: 5\n  - {}\n";
        let config = SimulationConfig::parse(yaml).unwrap();

        let tuned = config.agent_types.first().unwrap();
        assert_eq!(
            tuned.params(),
            AgentParams {
                step_agent_energy: 7,
                ..AgentParams::default()
            }
        );
        assert_eq!(tuned.initial_count, 3);
        assert_eq!(tuned.turn_pct, 5);

        let untouched = config.agent_types.get(1).unwrap();
        assert_eq!(untouched, &AgentTypeConfig::default());
        assert_eq!(untouched.params, AgentParams::default());
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = SimulationConfig::parse("world:\n  seed: 9\n").unwrap();
        assert_eq!(config.world.seed, 9);
        assert_eq!(config.world.width, 32);
        assert_eq!(config.agent_types.len(), 1);
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(SimulationConfig::parse("").is_ok());
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let result = SimulationConfig::parse("world: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn validation_rejects_impossible_worlds() {
        let mut config = SimulationConfig::default();
        config.world.height = 0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.agent_types.clear();
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.world.width = 2;
        config.world.height = 2;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.food.kinds = 0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        if let Some(t) = config.agent_types.first_mut() {
            t.turn_pct = 101;
        }
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("gridlife-config.yaml");
        if path.exists() {
            let config = SimulationConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
            assert!(config.unwrap().validate().is_ok());
        }
    }
}
