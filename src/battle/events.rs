//! Battle events
//!
//! Notifications raised while the battle runs. The [`BattleManager`] queues
//! them during `tick` and the consumer drains the queue afterwards, so an
//! observer never runs in the middle of a state change.
//!
//! [`BattleManager`]: super::manager::BattleManager

use serde::{Deserialize, Serialize};

use super::actions::{ActionKind, StatKind};
use super::agent::AgentId;
use super::faction::Faction;

/// A single notification from the battle simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEvent {
    /// Both parties were initialised and the battle is running
    BattleStarted,
    /// The battle reached its terminal state
    BattleEnded,
    /// The enemy party was wiped out first
    PlayerVictory,
    /// The player party was wiped out (also raised when both parties fall together)
    PlayerDefeat,
    /// The last living member of a party died
    PartyDefeated { faction: Faction },
    /// An agent took its turn
    ActionTaken {
        actor: AgentId,
        action: ActionKind,
        target: Option<AgentId>,
    },
    /// Damage after defense mitigation; `source` is `None` for periodic damage
    AgentDamaged {
        agent: AgentId,
        amount: f32,
        source: Option<AgentId>,
    },
    /// Health actually restored (zero when already at full health)
    AgentHealed { agent: AgentId, amount: f32 },
    AgentBuffed {
        agent: AgentId,
        stat: StatKind,
        amount: f32,
        duration: f32,
    },
    AgentDebuffed {
        agent: AgentId,
        stat: StatKind,
        amount: f32,
        duration: f32,
    },
    /// A buff or debuff ran out and its stat change was undone by `delta`
    StatModifierExpired {
        agent: AgentId,
        stat: StatKind,
        delta: f32,
    },
    AgentDied { agent: AgentId },
}

impl BattleEvent {
    /// The agent this event is about, if any
    pub fn agent(&self) -> Option<AgentId> {
        match self {
            BattleEvent::BattleStarted
            | BattleEvent::BattleEnded
            | BattleEvent::PlayerVictory
            | BattleEvent::PlayerDefeat
            | BattleEvent::PartyDefeated { .. } => None,
            BattleEvent::ActionTaken { actor, .. } => Some(*actor),
            BattleEvent::AgentDamaged { agent, .. }
            | BattleEvent::AgentHealed { agent, .. }
            | BattleEvent::AgentBuffed { agent, .. }
            | BattleEvent::AgentDebuffed { agent, .. }
            | BattleEvent::StatModifierExpired { agent, .. }
            | BattleEvent::AgentDied { agent } => Some(*agent),
        }
    }

    /// Whether this is a battle lifecycle notification
    pub fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            BattleEvent::BattleStarted
                | BattleEvent::BattleEnded
                | BattleEvent::PlayerVictory
                | BattleEvent::PlayerDefeat
                | BattleEvent::PartyDefeated { .. }
        )
    }
}
