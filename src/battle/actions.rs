//! Action and stat kinds
//!
//! The closed set of actions an agent can take on its turn, and the stats
//! that buffs and debuffs modify. Both sets are fixed; every `match` over them
//! is exhaustive.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Everything an agent can do when its action timer fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Direct damage to a random living opponent
    Attack,
    /// Direct heal on the most injured ally
    Heal,
    /// Temporary stat increase on another ally
    BuffAlly,
    /// Temporary stat decrease on a random opponent
    DebuffEnemy,
    /// Periodic damage on a random opponent
    DamageOverTime,
    /// Periodic healing on the most injured ally
    HealOverTime,
}

impl ActionKind {
    /// Get all action kinds
    pub fn all() -> &'static [ActionKind] {
        &[
            ActionKind::Attack,
            ActionKind::Heal,
            ActionKind::BuffAlly,
            ActionKind::DebuffEnemy,
            ActionKind::DamageOverTime,
            ActionKind::HealOverTime,
        ]
    }

    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Attack => "Attack",
            ActionKind::Heal => "Heal",
            ActionKind::BuffAlly => "Buff Ally",
            ActionKind::DebuffEnemy => "Debuff Enemy",
            ActionKind::DamageOverTime => "Damage Over Time",
            ActionKind::HealOverTime => "Heal Over Time",
        }
    }

    /// Whether this action targets the acting agent's own party
    pub fn targets_allies(&self) -> bool {
        matches!(
            self,
            ActionKind::Heal | ActionKind::BuffAlly | ActionKind::HealOverTime
        )
    }

    /// Whether this action needs an injured ally to be useful
    pub fn needs_injured_ally(&self) -> bool {
        matches!(self, ActionKind::Heal | ActionKind::HealOverTime)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stats that buffs and debuffs can modify
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKind {
    Attack,
    Defense,
    Speed,
}

impl StatKind {
    /// Get all modifiable stats, in roll order
    pub fn all() -> &'static [StatKind] {
        &[StatKind::Attack, StatKind::Defense, StatKind::Speed]
    }

    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            StatKind::Attack => "Attack",
            StatKind::Defense => "Defense",
            StatKind::Speed => "Speed",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
