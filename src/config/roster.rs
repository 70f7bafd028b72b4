//! Agent roster
//!
//! Named agent configurations, loaded from `assets/config/agents.ron` or taken
//! from the built-in defaults.
//!
//! ```ron
//! (
//!     agents: [
//!         (
//!             name: "Warrior",
//!             max_health: 150.0,
//!             attack: 25.0,
//!             defense: 15.0,
//!             speed: 10.0,
//!             available_actions: [Attack, BuffAlly, DebuffEnemy],
//!             prefer_healing_allies: false,
//!         ),
//!     ],
//! )
//! ```

use bevy::log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::battle::actions::ActionKind;
use crate::battle::agent::BaseStats;
use crate::error::{ConfigError, Result};

/// Default roster location, relative to the working directory
pub const DEFAULT_ROSTER_PATH: &str = "assets/config/agents.ron";

fn default_max_health() -> f32 {
    100.0
}

fn default_attack() -> f32 {
    20.0
}

fn default_defense() -> f32 {
    10.0
}

fn default_speed() -> f32 {
    10.0
}

fn default_prefer_healing_allies() -> bool {
    true
}

/// Base stats and actions for one kind of agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Display name, also the roster lookup key (e.g. "Warrior", "Goblin")
    pub name: String,
    #[serde(default = "default_max_health")]
    pub max_health: f32,
    #[serde(default = "default_attack")]
    pub attack: f32,
    #[serde(default = "default_defense")]
    pub defense: f32,
    /// Action timer growth per second
    #[serde(default = "default_speed")]
    pub speed: f32,
    /// Empty means the agent only attacks
    #[serde(default)]
    pub available_actions: Vec<ActionKind>,
    /// Carried through to the agent; action selection does not read it
    #[serde(default = "default_prefer_healing_allies")]
    pub prefer_healing_allies: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: "Agent".to_string(),
            max_health: default_max_health(),
            attack: default_attack(),
            defense: default_defense(),
            speed: default_speed(),
            available_actions: Vec::new(),
            prefer_healing_allies: default_prefer_healing_allies(),
        }
    }
}

impl AgentConfig {
    fn new(
        name: &str,
        stats: BaseStats,
        available_actions: &[ActionKind],
        prefer_healing_allies: bool,
    ) -> Self {
        Self {
            name: name.to_string(),
            max_health: stats.max_health,
            attack: stats.attack,
            defense: stats.defense,
            speed: stats.speed,
            available_actions: available_actions.to_vec(),
            prefer_healing_allies,
        }
    }

    pub fn base_stats(&self) -> BaseStats {
        BaseStats {
            max_health: self.max_health,
            attack: self.attack,
            defense: self.defense,
            speed: self.speed,
        }
    }

    /// Check that the stats describe an agent that can take part in a battle
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("agent name must not be empty".to_string()));
        }
        if !(self.max_health.is_finite() && self.max_health > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "{}: max_health must be positive",
                self.name
            )));
        }
        for (stat, value) in [
            ("attack", self.attack),
            ("defense", self.defense),
            ("speed", self.speed),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{}: {} must be a non-negative number",
                    self.name, stat
                )));
            }
        }
        Ok(())
    }
}

/// Collection of named agent configurations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRoster {
    pub agents: Vec<AgentConfig>,
}

impl Default for AgentRoster {
    /// Three player archetypes and their enemy mirrors with identical numbers.
    fn default() -> Self {
        let tank = BaseStats {
            max_health: 150.0,
            attack: 25.0,
            defense: 15.0,
            speed: 10.0,
        };
        let support = BaseStats {
            max_health: 100.0,
            attack: 15.0,
            defense: 10.0,
            speed: 12.0,
        };
        let caster = BaseStats {
            max_health: 80.0,
            attack: 30.0,
            defense: 5.0,
            speed: 8.0,
        };

        let tank_actions = [ActionKind::Attack, ActionKind::BuffAlly, ActionKind::DebuffEnemy];
        let support_actions = [
            ActionKind::Attack,
            ActionKind::Heal,
            ActionKind::HealOverTime,
            ActionKind::BuffAlly,
        ];
        let caster_actions = [
            ActionKind::Attack,
            ActionKind::DamageOverTime,
            ActionKind::DebuffEnemy,
        ];

        Self {
            agents: vec![
                AgentConfig::new("Warrior", tank, &tank_actions, false),
                AgentConfig::new("Healer", support, &support_actions, true),
                AgentConfig::new("Mage", caster, &caster_actions, false),
                AgentConfig::new("Orc", tank, &tank_actions, true),
                AgentConfig::new("Goblin", support, &support_actions, true),
                AgentConfig::new("Troll", caster, &caster_actions, true),
            ],
        }
    }
}

impl AgentRoster {
    /// Names of the default player party
    pub const DEFAULT_PLAYER_PARTY: [&'static str; 3] = ["Warrior", "Healer", "Mage"];
    /// Names of the default enemy party
    pub const DEFAULT_ENEMY_PARTY: [&'static str; 3] = ["Orc", "Goblin", "Troll"];

    /// Load and validate a roster from a RON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;

        let roster: AgentRoster = ron::from_str(&contents).map_err(|e| ConfigError::Ron {
            path: path.to_path_buf(),
            source: e,
        })?;
        roster.validate()?;

        info!(
            "Loaded {} agent configurations from {}",
            roster.agents.len(),
            path.display()
        );
        Ok(roster)
    }

    /// Load from `path` when given, otherwise use the built-in roster
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Every configuration is valid and names are unique
    pub fn validate(&self) -> Result<()> {
        if self.agents.is_empty() {
            return Err(ConfigError::Invalid("roster has no agents".to_string()));
        }
        for (i, config) in self.agents.iter().enumerate() {
            config.validate()?;
            if self.agents[..i].iter().any(|other| other.name == config.name) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate agent name '{}'",
                    config.name
                )));
            }
        }
        Ok(())
    }

    pub fn find(&self, name: &str) -> Option<&AgentConfig> {
        self.agents.iter().find(|config| config.name == name)
    }

    /// Look up every name, failing on the first unknown one
    pub fn resolve_names<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<AgentConfig>> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.find(name)
                    .cloned()
                    .ok_or_else(|| ConfigError::UnknownAgent {
                        name: name.to_string(),
                        available: self.names().join(", "),
                    })
            })
            .collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.agents.iter().map(|config| config.name.as_str()).collect()
    }
}
