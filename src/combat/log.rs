//! Combat logging
//!
//! Records every battle event for display and post-battle analysis, and saves
//! the log as JSON together with the battle outcome.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::battle::{ActionKind, AgentId, BattleEvent, BattleManager, BattleOutcome};
use crate::error::{ConfigError, Result};

/// Directory used when no output path is given
pub const DEFAULT_LOG_DIR: &str = "battle_logs";

/// A single entry in the combat log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatLogEntry {
    /// Timestamp in battle time (simulated seconds since start)
    pub timestamp: f32,
    /// The type of event
    pub event_type: CombatLogEventType,
    /// Human-readable description of the event
    pub message: String,
    /// The underlying event, absent for free-form entries
    pub event: Option<BattleEvent>,
}

/// Types of combat log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatLogEventType {
    /// Damage dealt
    Damage,
    /// Healing done
    Healing,
    /// Action taken on an agent's turn
    ActionUsed,
    /// Buff/debuff applied
    EffectApplied,
    /// Buff/debuff ran out
    EffectExpired,
    /// Agent died
    Death,
    /// Battle event (start, end, party defeated)
    MatchEvent,
}

impl CombatLogEventType {
    pub fn of(event: &BattleEvent) -> Self {
        match event {
            BattleEvent::BattleStarted
            | BattleEvent::BattleEnded
            | BattleEvent::PlayerVictory
            | BattleEvent::PlayerDefeat
            | BattleEvent::PartyDefeated { .. } => CombatLogEventType::MatchEvent,
            BattleEvent::ActionTaken { .. } => CombatLogEventType::ActionUsed,
            BattleEvent::AgentDamaged { .. } => CombatLogEventType::Damage,
            BattleEvent::AgentHealed { .. } => CombatLogEventType::Healing,
            BattleEvent::AgentBuffed { .. } | BattleEvent::AgentDebuffed { .. } => {
                CombatLogEventType::EffectApplied
            }
            BattleEvent::StatModifierExpired { .. } => CombatLogEventType::EffectExpired,
            BattleEvent::AgentDied { .. } => CombatLogEventType::Death,
        }
    }
}

/// Summary of one agent for the saved log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentMetadata {
    /// "Player_1"
    pub id: String,
    /// Configuration name, e.g. "Warrior"
    pub name: String,
    pub max_health: f32,
    pub final_health: f32,
    pub survived: bool,
    pub damage_dealt: f32,
    pub damage_taken: f32,
}

/// Battle-level information saved alongside the entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchMetadata {
    /// `None` when the battle timed out
    pub outcome: Option<BattleOutcome>,
    /// Simulated seconds
    pub duration: f32,
    pub battle_speed: f32,
    pub random_seed: Option<u64>,
    pub player_party: Vec<AgentMetadata>,
    pub enemy_party: Vec<AgentMetadata>,
}

#[derive(Serialize)]
struct SavedCombatLog<'a> {
    metadata: &'a MatchMetadata,
    entries: &'a [CombatLogEntry],
}

/// The combat log resource storing all events
#[derive(Resource, Default, Debug)]
pub struct CombatLog {
    /// All log entries in chronological order
    pub entries: Vec<CombatLogEntry>,
    /// Current battle time
    pub match_time: f32,
}

impl CombatLog {
    /// Clear the log for a new battle
    pub fn clear(&mut self) {
        self.entries.clear();
        self.match_time = 0.0;
    }

    /// Add a free-form entry to the log
    pub fn log(&mut self, event_type: CombatLogEventType, message: String) {
        self.entries.push(CombatLogEntry {
            timestamp: self.match_time,
            event_type,
            message,
            event: None,
        });
    }

    /// Add a battle event with its description
    pub fn record(&mut self, event: BattleEvent, message: String) {
        self.entries.push(CombatLogEntry {
            timestamp: self.match_time,
            event_type: CombatLogEventType::of(&event),
            message,
            event: Some(event),
        });
    }

    /// Record drained events, naming agents the way `manager` knows them
    pub fn record_all(&mut self, manager: &BattleManager, events: Vec<BattleEvent>) {
        for event in events {
            let message = describe_event(&event, |id| {
                manager
                    .agent(id)
                    .map(|agent| agent.display_name())
                    .unwrap_or_else(|| id.to_string())
            });
            self.record(event, message);
        }
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: CombatLogEventType) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Get only HP-changing events (damage and healing)
    pub fn hp_changes_only(&self) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| {
                matches!(
                    e.event_type,
                    CombatLogEventType::Damage | CombatLogEventType::Healing
                )
            })
            .collect()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&CombatLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    fn events(&self) -> impl Iterator<Item = &BattleEvent> {
        self.entries.iter().filter_map(|e| e.event.as_ref())
    }

    /// Total damage dealt by an agent's direct attacks
    pub fn damage_dealt_by(&self, agent: AgentId) -> f32 {
        self.events()
            .filter_map(|e| match e {
                BattleEvent::AgentDamaged {
                    amount,
                    source: Some(source),
                    ..
                } if *source == agent => Some(*amount),
                _ => None,
            })
            .sum()
    }

    /// Total damage taken by an agent, periodic damage included
    pub fn damage_taken_by(&self, agent: AgentId) -> f32 {
        self.events()
            .filter_map(|e| match e {
                BattleEvent::AgentDamaged {
                    agent: target,
                    amount,
                    ..
                } if *target == agent => Some(*amount),
                _ => None,
            })
            .sum()
    }

    /// Total health actually restored to an agent
    pub fn healing_received_by(&self, agent: AgentId) -> f32 {
        self.events()
            .filter_map(|e| match e {
                BattleEvent::AgentHealed {
                    agent: target,
                    amount,
                } if *target == agent => Some(*amount),
                _ => None,
            })
            .sum()
    }

    /// How many times an agent performed each action
    pub fn action_counts(&self, agent: AgentId) -> HashMap<ActionKind, usize> {
        let mut counts = HashMap::new();
        for event in self.events() {
            if let BattleEvent::ActionTaken { actor, action, .. } = event {
                if *actor == agent {
                    *counts.entry(*action).or_insert(0) += 1;
                }
            }
        }
        counts
    }

    pub fn death_count(&self) -> usize {
        self.filter_by_type(CombatLogEventType::Death).len()
    }

    /// Save the log as pretty JSON.
    ///
    /// Writes to `output_path` when given, otherwise to a timestamped file in
    /// [`DEFAULT_LOG_DIR`]. Returns the path written.
    pub fn save_to_file(
        &self,
        metadata: &MatchMetadata,
        output_path: Option<&Path>,
    ) -> Result<PathBuf> {
        let path = match output_path {
            Some(path) => path.to_path_buf(),
            None => {
                let stamp = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or_default();
                Path::new(DEFAULT_LOG_DIR).join(format!("battle_{}.json", stamp))
            }
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
        }

        let saved = SavedCombatLog {
            metadata,
            entries: &self.entries,
        };
        let json = serde_json::to_string_pretty(&saved)?;
        std::fs::write(&path, json).map_err(|e| ConfigError::io(&path, e))?;

        Ok(path)
    }
}

/// Human-readable line for an event. `name` maps an agent to its display name.
pub fn describe_event(event: &BattleEvent, name: impl Fn(AgentId) -> String) -> String {
    match event {
        BattleEvent::BattleStarted => "Battle started!".to_string(),
        BattleEvent::BattleEnded => "Battle ended".to_string(),
        BattleEvent::PlayerVictory => "Victory! The enemy party has been defeated".to_string(),
        BattleEvent::PlayerDefeat => "Defeat! The player party has fallen".to_string(),
        BattleEvent::PartyDefeated { faction } => {
            format!("{} has been defeated", faction.party_name())
        }
        BattleEvent::ActionTaken {
            actor,
            action,
            target: Some(target),
        } => format!("{} uses {} on {}", name(*actor), action, name(*target)),
        BattleEvent::ActionTaken {
            actor,
            action,
            target: None,
        } => format!("{} uses {} but finds no target", name(*actor), action),
        BattleEvent::AgentDamaged {
            agent,
            amount,
            source: Some(source),
        } => format!("{} hits {} for {:.1} damage", name(*source), name(*agent), amount),
        BattleEvent::AgentDamaged {
            agent,
            amount,
            source: None,
        } => format!("{} takes {:.1} damage over time", name(*agent), amount),
        BattleEvent::AgentHealed { agent, amount } => {
            format!("{} is healed for {:.1}", name(*agent), amount)
        }
        BattleEvent::AgentBuffed {
            agent,
            stat,
            amount,
            duration,
        } => format!("{} gains +{:.1} {} for {}s", name(*agent), amount, stat, duration),
        BattleEvent::AgentDebuffed {
            agent,
            stat,
            amount,
            duration,
        } => format!("{} suffers -{:.1} {} for {}s", name(*agent), amount, stat, duration),
        BattleEvent::StatModifierExpired { agent, stat, delta } => {
            format!("{}'s {} modifier expired ({:+.1})", name(*agent), stat, delta)
        }
        BattleEvent::AgentDied { agent } => format!("{} has been defeated", name(*agent)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::{Faction, StatKind};

    fn player(index: usize) -> AgentId {
        AgentId::new(Faction::Player, index)
    }

    #[test]
    fn test_event_types() {
        assert_eq!(
            CombatLogEventType::of(&BattleEvent::BattleStarted),
            CombatLogEventType::MatchEvent
        );
        assert_eq!(
            CombatLogEventType::of(&BattleEvent::AgentDied { agent: player(0) }),
            CombatLogEventType::Death
        );
        assert_eq!(
            CombatLogEventType::of(&BattleEvent::StatModifierExpired {
                agent: player(0),
                stat: StatKind::Speed,
                delta: 1.0
            }),
            CombatLogEventType::EffectExpired
        );
    }

    #[test]
    fn test_describe_uses_names() {
        let line = describe_event(
            &BattleEvent::AgentDamaged {
                agent: AgentId::new(Faction::Enemy, 0),
                amount: 21.739,
                source: Some(player(1)),
            },
            |id| id.to_string(),
        );
        assert_eq!(line, "Player_2 hits Enemy_1 for 21.7 damage");
    }

    #[test]
    fn test_describe_expiry_shows_signed_delta() {
        let line = describe_event(
            &BattleEvent::StatModifierExpired {
                agent: player(0),
                stat: StatKind::Attack,
                delta: -7.5,
            },
            |id| id.to_string(),
        );
        assert_eq!(line, "Player_1's Attack modifier expired (-7.5)");
    }

    #[test]
    fn test_clear_resets_time() {
        let mut log = CombatLog::default();
        log.match_time = 12.0;
        log.log(CombatLogEventType::MatchEvent, "test".to_string());
        log.clear();
        assert!(log.entries.is_empty());
        assert_eq!(log.match_time, 0.0);
    }
}
