//! Battle setup
//!
//! Which agent configurations make up each party, and how many agents each
//! party has.

use serde::{Deserialize, Serialize};

use crate::battle::constants::DEFAULT_BATTLE_SPEED;
use crate::error::Result;

use super::roster::{AgentConfig, AgentRoster};

/// One party's size and the configurations to fill it with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartySetup {
    pub size: usize,
    pub configs: Vec<AgentConfig>,
}

impl PartySetup {
    pub fn new(size: usize, configs: Vec<AgentConfig>) -> Self {
        Self { size, configs }
    }

    /// One agent per configuration
    pub fn from_configs(configs: Vec<AgentConfig>) -> Self {
        Self {
            size: configs.len(),
            configs,
        }
    }

    /// The configuration of every slot, in party order.
    ///
    /// Fewer configurations than `size` are repeated cyclically; extra ones
    /// are dropped. No configurations means an empty party.
    pub fn resolve(&self) -> Vec<AgentConfig> {
        self.configs
            .iter()
            .cycle()
            .take(self.size)
            .cloned()
            .collect()
    }
}

/// Everything the battle manager needs to build both parties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSetup {
    pub player: PartySetup,
    pub enemy: PartySetup,
    pub battle_speed: f32,
}

impl BattleSetup {
    pub fn new(player: PartySetup, enemy: PartySetup) -> Self {
        Self {
            player,
            enemy,
            battle_speed: DEFAULT_BATTLE_SPEED,
        }
    }

    /// Build a setup from roster names, one agent per name
    pub fn from_roster<S: AsRef<str>>(
        roster: &AgentRoster,
        player_names: &[S],
        enemy_names: &[S],
    ) -> Result<Self> {
        let player = PartySetup::from_configs(roster.resolve_names(player_names)?);
        let enemy = PartySetup::from_configs(roster.resolve_names(enemy_names)?);
        Ok(Self::new(player, enemy))
    }

    pub fn with_battle_speed(mut self, battle_speed: f32) -> Self {
        self.battle_speed = battle_speed;
        self
    }
}

impl Default for BattleSetup {
    /// The default three-on-three from the built-in roster
    fn default() -> Self {
        let roster = AgentRoster::default();
        let pick = |names: &[&str]| -> Vec<AgentConfig> {
            names
                .iter()
                .filter_map(|name| roster.find(name).cloned())
                .collect()
        };
        Self::new(
            PartySetup::from_configs(pick(&AgentRoster::DEFAULT_PLAYER_PARTY)),
            PartySetup::from_configs(pick(&AgentRoster::DEFAULT_ENEMY_PARTY)),
        )
    }
}
