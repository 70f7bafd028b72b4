//! Faction behaviour
//!
//! Player and enemy agents run the same decision logic; the faction only
//! decides which party counts as allies and which as opponents.
//!
//! A turn works in two phases:
//! 1. **Decision**: [`FactionBehavior::decide_action`] picks an action kind
//!    from the actor's available actions and the state of its own party.
//! 2. **Execution**: [`execute_action`] resolves a target and mutates it,
//!    falling back to another action when a heal has nobody to heal.

use bevy::log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::actions::{ActionKind, StatKind};
use super::agent::{Agent, AgentId};
use super::constants::*;
use super::events::BattleEvent;
use super::party::Party;
use super::rng::BattleRng;

/// Which side of the battle an agent fights on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Enemy,
}

impl Faction {
    pub fn opponent(&self) -> Faction {
        match self {
            Faction::Player => Faction::Enemy,
            Faction::Enemy => Faction::Player,
        }
    }

    /// Prefix for agent names ("Player_1")
    pub fn name(&self) -> &'static str {
        match self {
            Faction::Player => "Player",
            Faction::Enemy => "Enemy",
        }
    }

    pub fn party_name(&self) -> &'static str {
        match self {
            Faction::Player => "Player Party",
            Faction::Enemy => "Enemy Party",
        }
    }

    /// Decision tuning for this faction. Both factions currently play by the
    /// same numbers.
    pub fn behavior(&self) -> FactionBehavior {
        FactionBehavior::default()
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Thresholds and chances that drive action selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactionBehavior {
    /// Heal is considered when the most injured ally is below this fraction
    pub heal_priority_threshold: f32,
    pub heal_priority_chance: f32,
    /// Any ally below this fraction puts the party in danger
    pub danger_threshold: f32,
    pub danger_debuff_chance: f32,
}

impl Default for FactionBehavior {
    fn default() -> Self {
        Self {
            heal_priority_threshold: HEAL_PRIORITY_THRESHOLD,
            heal_priority_chance: HEAL_PRIORITY_CHANCE,
            danger_threshold: DANGER_THRESHOLD,
            danger_debuff_chance: DANGER_DEBUFF_CHANCE,
        }
    }
}

impl FactionBehavior {
    /// Pick the action kind for `actor`'s turn.
    ///
    /// Priority order: heal a badly injured ally, debuff an opponent while the
    /// party is in danger, otherwise a uniform pick among available actions.
    pub fn decide_action(&self, actor: &Agent, allies: &Party, rng: &mut BattleRng) -> ActionKind {
        let available = actor.available_actions();
        if available.is_empty() {
            return ActionKind::Attack;
        }

        if actor.can_use(ActionKind::Heal) {
            if let Some(candidate) = heal_candidate(actor.id(), allies) {
                if candidate.health_fraction() < self.heal_priority_threshold
                    && rng.random_f32() < self.heal_priority_chance
                {
                    return ActionKind::Heal;
                }
            }
        }

        if allies.any_below_fraction(self.danger_threshold)
            && actor.can_use(ActionKind::DebuffEnemy)
            && rng.random_f32() < self.danger_debuff_chance
        {
            return ActionKind::DebuffEnemy;
        }

        rng.choose(available).copied().unwrap_or(ActionKind::Attack)
    }
}

/// Lowest-health living ally, unless that is the actor itself.
fn heal_candidate(actor: AgentId, allies: &Party) -> Option<&Agent> {
    allies
        .lowest_health_agent()
        .filter(|id| *id != actor)
        .and_then(|id| allies.agent(id.index))
}

/// Ally to receive a heal: the heal candidate if injured, otherwise the most
/// injured living ally other than the actor.
fn heal_target(actor: AgentId, allies: &Party) -> Option<AgentId> {
    match heal_candidate(actor, allies) {
        Some(candidate) if candidate.is_injured() => Some(candidate.id()),
        _ => allies.most_injured_excluding(actor),
    }
}

/// Replacement for a heal that found nobody to heal.
fn fallback_action(actor: &Agent) -> ActionKind {
    [
        ActionKind::DebuffEnemy,
        ActionKind::BuffAlly,
        ActionKind::DamageOverTime,
    ]
    .into_iter()
    .find(|action| actor.can_use(*action))
    .unwrap_or(ActionKind::Attack)
}

/// Stat magnitude for buffs and debuffs cast by an agent with `attack`
pub fn stat_modifier_amount(attack: f32) -> f32 {
    STAT_MODIFIER_BASE + attack * STAT_MODIFIER_ATTACK_RATIO
}

fn random_stat(rng: &mut BattleRng) -> StatKind {
    rng.choose(StatKind::all())
        .copied()
        .unwrap_or(StatKind::Attack)
}

/// Carry out `action` for `actor`, a member of `allies`.
///
/// Returns the action that was actually performed, which differs from the
/// requested one when a heal falls back. Raises `ActionTaken` for it. An
/// action with no valid target does nothing beyond that notification.
pub fn execute_action(
    action: ActionKind,
    actor: AgentId,
    allies: &mut Party,
    opponents: &mut Party,
    rng: &mut BattleRng,
    events: &mut Vec<BattleEvent>,
) -> ActionKind {
    let Some(actor_agent) = allies.agent(actor.index) else {
        return action;
    };
    let attack = actor_agent.attack();
    let actor_name = actor_agent.display_name();

    let (action, recipient) = if action.needs_injured_ally() {
        match heal_target(actor, allies) {
            Some(target) => (action, Some(target)),
            None => {
                let fallback = fallback_action(actor_agent);
                debug!(
                    "{} would have used {} but all allies are at full health, using {} instead",
                    actor_name, action, fallback
                );
                (fallback, None)
            }
        }
    } else {
        (action, None)
    };

    let target = match action {
        ActionKind::Attack => {
            let target = opponents.random_alive_agent(rng);
            if let Some(target) = target {
                debug!("[ATTACK] {} attacks {} with {:.1} raw damage", actor_name, target, attack);
                opponents.damage_agent(target.index, attack, Some(actor), events);
            }
            target
        }
        ActionKind::Heal => {
            if let Some(target) = recipient {
                let amount = attack * HEAL_ATTACK_RATIO;
                debug!("{} heals {} for {:.1} health", actor_name, target, amount);
                allies.heal_agent(target.index, amount, events);
            }
            recipient
        }
        ActionKind::BuffAlly => {
            let target = allies.random_alive_agent_excluding(actor, rng);
            if let Some(target) = target {
                let stat = random_stat(rng);
                let amount = stat_modifier_amount(attack);
                debug!(
                    "{} buffs {}'s {} by {:.1} for {}s",
                    actor_name, target, stat, amount, BUFF_DURATION
                );
                allies.buff_agent(target.index, stat, amount, BUFF_DURATION, events);
            }
            target
        }
        ActionKind::DebuffEnemy => {
            let target = opponents.random_alive_agent(rng);
            if let Some(target) = target {
                let stat = random_stat(rng);
                let amount = stat_modifier_amount(attack);
                debug!(
                    "{} debuffs {}'s {} by {:.1} for {}s",
                    actor_name, target, stat, amount, DEBUFF_DURATION
                );
                opponents.debuff_agent(target.index, stat, amount, DEBUFF_DURATION, events);
            }
            target
        }
        ActionKind::DamageOverTime => {
            let target = opponents.random_alive_agent(rng);
            if let Some(target) = target {
                let per_tick = attack * DOT_ATTACK_RATIO;
                debug!(
                    "{} applies DoT to {} for {:.1} every {}s for {}s",
                    actor_name, target, per_tick, DOT_TICK_INTERVAL, DOT_DURATION
                );
                opponents.apply_damage_over_time(
                    target.index,
                    per_tick,
                    DOT_TICK_INTERVAL,
                    DOT_DURATION,
                );
            }
            target
        }
        ActionKind::HealOverTime => {
            if let Some(target) = recipient {
                let per_tick = attack * HOT_ATTACK_RATIO;
                debug!(
                    "{} applies HoT to {} for {:.1} every {}s for {}s",
                    actor_name, target, per_tick, HOT_TICK_INTERVAL, HOT_DURATION
                );
                allies.apply_heal_over_time(target.index, per_tick, HOT_TICK_INTERVAL, HOT_DURATION);
            }
            recipient
        }
    };

    events.push(BattleEvent::ActionTaken {
        actor,
        action,
        target,
    });

    action
}
