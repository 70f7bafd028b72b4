//! JSON configuration parsing for headless mode
//!
//! Parses JSON battle configurations and converts them to a [`BattleSetup`]
//! against an agent roster.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::battle::constants::{
    DEFAULT_BATTLE_SPEED, MAX_BATTLE_SPEED, MAX_PARTY_SIZE, MIN_BATTLE_SPEED,
};
use crate::config::{AgentRoster, BattleSetup, PartySetup};
use crate::error::{ConfigError, Result};

/// Headless battle configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessBattleConfig {
    /// Player party composition (roster names)
    pub player_party: Vec<String>,
    /// Enemy party composition (roster names)
    pub enemy_party: Vec<String>,
    /// Player party size (default: number of names). Names repeat to fill it.
    #[serde(default)]
    pub player_party_size: Option<usize>,
    /// Enemy party size (default: number of names)
    #[serde(default)]
    pub enemy_party_size: Option<usize>,
    /// Battle speed multiplier (default: 1.0)
    #[serde(default = "default_battle_speed")]
    pub battle_speed: f32,
    /// Maximum battle duration in simulated seconds (default: 300)
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: f32,
    /// Real seconds per frame (default: 1/60)
    #[serde(default = "default_frame_delta")]
    pub frame_delta: f32,
    /// Random seed for deterministic battle reproduction
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Custom output path for the combat log (optional)
    #[serde(default)]
    pub output_path: Option<String>,
    /// RON roster to resolve names against (default: built-in roster)
    #[serde(default)]
    pub roster_path: Option<String>,
}

fn default_battle_speed() -> f32 {
    DEFAULT_BATTLE_SPEED
}

fn default_max_duration() -> f32 {
    300.0
}

fn default_frame_delta() -> f32 {
    1.0 / 60.0
}

/// Longest frame a headless run accepts
const MAX_FRAME_DELTA: f32 = 0.25;

impl Default for HeadlessBattleConfig {
    fn default() -> Self {
        Self {
            player_party: AgentRoster::DEFAULT_PLAYER_PARTY
                .iter()
                .map(|s| s.to_string())
                .collect(),
            enemy_party: AgentRoster::DEFAULT_ENEMY_PARTY
                .iter()
                .map(|s| s.to_string())
                .collect(),
            player_party_size: None,
            enemy_party_size: None,
            battle_speed: default_battle_speed(),
            max_duration_secs: default_max_duration(),
            frame_delta: default_frame_delta(),
            random_seed: None,
            output_path: None,
            roster_path: None,
        }
    }
}

impl HeadlessBattleConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::from_json_str(&contents)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: HeadlessBattleConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the ranges that don't depend on the roster
    pub fn validate(&self) -> Result<()> {
        Self::validate_party("player_party", &self.player_party, self.player_party_size)?;
        Self::validate_party("enemy_party", &self.enemy_party, self.enemy_party_size)?;

        if !(MIN_BATTLE_SPEED..=MAX_BATTLE_SPEED).contains(&self.battle_speed) {
            return Err(ConfigError::Invalid(format!(
                "battle_speed must be between {} and {}",
                MIN_BATTLE_SPEED, MAX_BATTLE_SPEED
            )));
        }

        if !(self.max_duration_secs.is_finite() && self.max_duration_secs > 0.0) {
            return Err(ConfigError::Invalid(
                "max_duration_secs must be positive".to_string(),
            ));
        }

        if !(self.frame_delta > 0.0 && self.frame_delta <= MAX_FRAME_DELTA) {
            return Err(ConfigError::Invalid(format!(
                "frame_delta must be in (0, {}]",
                MAX_FRAME_DELTA
            )));
        }

        Ok(())
    }

    fn validate_party(field: &str, names: &[String], size: Option<usize>) -> Result<()> {
        if names.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "{} must name at least one agent",
                field
            )));
        }
        let size = size.unwrap_or(names.len());
        if size == 0 || size > MAX_PARTY_SIZE {
            return Err(ConfigError::Invalid(format!(
                "{} must have 1-{} members (got {})",
                field, MAX_PARTY_SIZE, size
            )));
        }
        Ok(())
    }

    /// The roster named by `roster_path`, or the built-in one
    pub fn load_roster(&self) -> Result<AgentRoster> {
        let path = self.roster_path.as_ref().map(PathBuf::from);
        AgentRoster::load_or_default(path.as_deref())
    }

    /// Resolve names against `roster` and build the battle setup
    pub fn to_battle_setup(&self, roster: &AgentRoster) -> Result<BattleSetup> {
        self.validate()?;

        let player_configs = roster.resolve_names(&self.player_party)?;
        let enemy_configs = roster.resolve_names(&self.enemy_party)?;

        let player = PartySetup::new(
            self.player_party_size.unwrap_or(player_configs.len()),
            player_configs,
        );
        let enemy = PartySetup::new(
            self.enemy_party_size.unwrap_or(enemy_configs.len()),
            enemy_configs,
        );

        Ok(BattleSetup::new(player, enemy).with_battle_speed(self.battle_speed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_json_uses_defaults() {
        let config = HeadlessBattleConfig::from_json_str(
            r#"{ "player_party": ["Warrior"], "enemy_party": ["Orc"] }"#,
        )
        .unwrap();

        assert_eq!(config.battle_speed, 1.0);
        assert_eq!(config.max_duration_secs, 300.0);
        assert!((config.frame_delta - 1.0 / 60.0).abs() < 1e-6);
        assert!(config.random_seed.is_none());
        assert!(config.output_path.is_none());
    }

    #[test]
    fn test_party_size_fills_cyclically() {
        let config = HeadlessBattleConfig {
            player_party: vec!["Warrior".to_string(), "Healer".to_string()],
            player_party_size: Some(5),
            ..HeadlessBattleConfig::default()
        };
        let setup = config.to_battle_setup(&AgentRoster::default()).unwrap();
        let names: Vec<String> = setup.player.resolve().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Warrior", "Healer", "Warrior", "Healer", "Warrior"]);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let too_big = HeadlessBattleConfig {
            enemy_party_size: Some(6),
            ..HeadlessBattleConfig::default()
        };
        assert!(too_big.validate().is_err());

        let too_fast = HeadlessBattleConfig {
            battle_speed: 100.0,
            ..HeadlessBattleConfig::default()
        };
        assert!(too_fast.validate().is_err());

        let no_time = HeadlessBattleConfig {
            max_duration_secs: 0.0,
            ..HeadlessBattleConfig::default()
        };
        assert!(no_time.validate().is_err());

        let empty = HeadlessBattleConfig {
            player_party: Vec::new(),
            ..HeadlessBattleConfig::default()
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_unknown_agent_name_fails_setup() {
        let config = HeadlessBattleConfig {
            enemy_party: vec!["Dragon".to_string()],
            ..HeadlessBattleConfig::default()
        };
        let err = config.to_battle_setup(&AgentRoster::default()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownAgent { .. }));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let err = HeadlessBattleConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
