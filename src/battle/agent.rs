//! Agent State Machine
//!
//! Stats, health, the action timer and active effects of a single combatant.
//! Player and enemy agents share this type; their [`Faction`] decides which
//! party they heal and which one they attack.
//!
//! An agent moves `Uninitialized -> Alive -> Dead`. Death is terminal for the
//! rest of the battle: every mutating operation below is a no-op on a dead
//! agent.

use bevy::log::{debug, info};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::config::AgentConfig;

use super::actions::{ActionKind, StatKind};
use super::constants::{ACTION_THRESHOLD, DEFENSE_SCALE};
use super::effects::{Effect, EffectOutcome};
use super::events::BattleEvent;
use super::faction::Faction;

/// Stable handle for an agent: its faction and its slot in the party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId {
    pub faction: Faction,
    pub index: usize,
}

impl AgentId {
    pub fn new(faction: Faction, index: usize) -> Self {
        Self { faction, index }
    }
}

impl fmt::Display for AgentId {
    /// Format: "Player_1", "Enemy_3" (slots are shown 1-based)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.faction.name(), self.index + 1)
    }
}

/// Base stats, fixed for the whole battle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    pub max_health: f32,
    pub attack: f32,
    pub defense: f32,
    pub speed: f32,
}

/// Lifecycle of an agent within a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentState {
    Uninitialized,
    Alive,
    Dead,
}

/// Damage left after defense mitigation.
///
/// `amount * (1 - defense / (defense + 100))`. Defense asymptotically
/// approaches full mitigation without reaching it. Negative defense (from
/// stacked debuffs) counts as zero, and negative amounts deal nothing.
pub fn mitigate_damage(amount: f32, defense: f32) -> f32 {
    let defense = defense.max(0.0);
    let reduction = defense / (defense + DEFENSE_SCALE);
    amount.max(0.0) * (1.0 - reduction)
}

/// A combatant in one of the two parties.
#[derive(Debug, Clone)]
pub struct Agent {
    id: AgentId,
    /// Configuration name, e.g. "Warrior"
    name: String,
    base: BaseStats,
    current_health: f32,
    current_attack: f32,
    current_defense: f32,
    current_speed: f32,
    action_timer: f32,
    state: AgentState,
    /// In application order; stacking is additive, nothing is merged
    effects: Vec<Effect>,
    available_actions: SmallVec<[ActionKind; 6]>,
    /// Kept from the configuration; action selection does not read it
    prefer_healing_allies: bool,
}

impl Agent {
    /// Build an agent from its configuration. Current stats start at the base
    /// values; call [`Agent::initialize`] before the battle starts.
    pub fn from_config(id: AgentId, config: &AgentConfig) -> Self {
        let mut available_actions: SmallVec<[ActionKind; 6]> = SmallVec::new();
        for action in &config.available_actions {
            if !available_actions.contains(action) {
                available_actions.push(*action);
            }
        }

        let base = config.base_stats();
        Self {
            id,
            name: config.name.clone(),
            base,
            current_health: base.max_health,
            current_attack: base.attack,
            current_defense: base.defense,
            current_speed: base.speed,
            action_timer: 0.0,
            state: AgentState::Uninitialized,
            effects: Vec::new(),
            available_actions,
            prefer_healing_allies: config.prefer_healing_allies,
        }
    }

    /// Reset stats to base, clear effects and the action timer, and bring the
    /// agent to life.
    pub fn initialize(&mut self) {
        self.reset_stats();
        self.state = AgentState::Alive;
        self.action_timer = 0.0;
        self.effects.clear();
    }

    fn reset_stats(&mut self) {
        self.current_health = self.base.max_health;
        self.current_attack = self.base.attack;
        self.current_defense = self.base.defense;
        self.current_speed = self.base.speed;
    }

    // ------------------------------------------------------------------------
    // Read-only accessors
    // ------------------------------------------------------------------------

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// "Player_1 (Warrior)"
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.id, self.name)
    }

    pub fn faction(&self) -> Faction {
        self.id.faction
    }

    pub fn base_stats(&self) -> BaseStats {
        self.base
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn is_alive(&self) -> bool {
        self.state == AgentState::Alive
    }

    pub fn current_health(&self) -> f32 {
        self.current_health
    }

    pub fn max_health(&self) -> f32 {
        self.base.max_health
    }

    pub fn attack(&self) -> f32 {
        self.current_attack
    }

    pub fn defense(&self) -> f32 {
        self.current_defense
    }

    pub fn speed(&self) -> f32 {
        self.current_speed
    }

    /// Current value of a modifiable stat
    pub fn stat(&self, stat: StatKind) -> f32 {
        match stat {
            StatKind::Attack => self.current_attack,
            StatKind::Defense => self.current_defense,
            StatKind::Speed => self.current_speed,
        }
    }

    pub fn action_timer(&self) -> f32 {
        self.action_timer
    }

    /// Fill level of the action bar (0.0 to 1.0)
    pub fn action_readiness(&self) -> f32 {
        (self.action_timer / ACTION_THRESHOLD).clamp(0.0, 1.0)
    }

    /// Health as a fraction of max health (0.0 to 1.0)
    pub fn health_fraction(&self) -> f32 {
        if self.base.max_health > 0.0 {
            self.current_health / self.base.max_health
        } else {
            0.0
        }
    }

    /// Whether the agent is below full health (approximate comparison)
    pub fn is_injured(&self) -> bool {
        let tolerance = f32::EPSILON * self.base.max_health.abs().max(1.0) * 8.0;
        self.base.max_health - self.current_health > tolerance
    }

    pub fn active_effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn available_actions(&self) -> &[ActionKind] {
        &self.available_actions
    }

    pub fn can_use(&self, action: ActionKind) -> bool {
        self.available_actions.contains(&action)
    }

    pub fn prefer_healing_allies(&self) -> bool {
        self.prefer_healing_allies
    }

    // ------------------------------------------------------------------------
    // Per-frame update
    // ------------------------------------------------------------------------

    /// Advance effects and the action timer by `dt`.
    ///
    /// Returns `true` when the timer reached [`ACTION_THRESHOLD`]: the caller
    /// runs the agent's action and then calls [`Agent::reset_action_timer`].
    /// An agent killed by its own effects this frame does not act.
    pub fn update(&mut self, dt: f32, events: &mut Vec<BattleEvent>) -> bool {
        if !self.is_alive() {
            return false;
        }

        self.update_effects(dt, events);
        if !self.is_alive() {
            return false;
        }

        // Speed debuffs can push speed below zero; the bar never drains past empty
        self.action_timer = (self.action_timer + dt * self.current_speed).max(0.0);
        self.action_timer >= ACTION_THRESHOLD
    }

    /// Reset the timer to zero after an action. Overshoot past the threshold
    /// is dropped, not carried into the next turn.
    pub fn reset_action_timer(&mut self) {
        self.action_timer = 0.0;
    }

    /// Update every effect present at the start of the pass, then remove the
    /// inactive ones.
    pub fn update_effects(&mut self, dt: f32, events: &mut Vec<BattleEvent>) {
        if !self.is_alive() {
            return;
        }

        let mut effects = std::mem::take(&mut self.effects);
        for effect in effects.iter_mut() {
            let Some(outcome) = effect.update(dt) else {
                continue;
            };
            if !self.is_alive() {
                // Died earlier in this pass; later outcomes are dropped
                continue;
            }
            match outcome {
                EffectOutcome::Damage(amount) => {
                    self.take_damage(amount, None, events);
                }
                EffectOutcome::Heal(amount) => {
                    self.heal(amount, events);
                }
                EffectOutcome::Revert { stat, delta } => {
                    self.modify_stat(stat, delta);
                    events.push(BattleEvent::StatModifierExpired {
                        agent: self.id,
                        stat,
                        delta,
                    });
                }
            }
        }

        if self.is_alive() {
            effects.retain(Effect::is_active);
            effects.append(&mut self.effects);
            self.effects = effects;
        }
    }

    // ------------------------------------------------------------------------
    // Health
    // ------------------------------------------------------------------------

    /// Apply damage after defense mitigation. Returns the damage dealt.
    pub fn take_damage(
        &mut self,
        amount: f32,
        source: Option<AgentId>,
        events: &mut Vec<BattleEvent>,
    ) -> f32 {
        if !self.is_alive() {
            return 0.0;
        }

        let actual = mitigate_damage(amount, self.current_defense);
        self.current_health -= actual;

        let lethal = self.current_health <= 0.0;
        if lethal {
            self.current_health = 0.0;
        }

        debug!(
            "{} takes {:.1} damage ({:.1} mitigated by defense). Health: {:.1}/{:.1}",
            self.display_name(),
            actual,
            amount.max(0.0) - actual,
            self.current_health,
            self.base.max_health
        );

        events.push(BattleEvent::AgentDamaged {
            agent: self.id,
            amount: actual,
            source,
        });

        if lethal {
            self.die(events);
        }

        actual
    }

    /// Restore health up to max health. Returns the health restored.
    pub fn heal(&mut self, amount: f32, events: &mut Vec<BattleEvent>) -> f32 {
        if !self.is_alive() {
            return 0.0;
        }

        let before = self.current_health;
        self.current_health = (self.current_health + amount.max(0.0)).min(self.base.max_health);
        let restored = self.current_health - before;

        events.push(BattleEvent::AgentHealed {
            agent: self.id,
            amount: restored,
        });

        restored
    }

    fn die(&mut self, events: &mut Vec<BattleEvent>) {
        self.state = AgentState::Dead;
        // Stat modifiers are dropped, not reversed
        self.effects.clear();
        info!("{} has been defeated", self.display_name());
        events.push(BattleEvent::AgentDied { agent: self.id });
    }

    // ------------------------------------------------------------------------
    // Effects
    // ------------------------------------------------------------------------

    /// Add `amount` to `stat` now and undo it after `duration` seconds.
    pub fn apply_buff(
        &mut self,
        stat: StatKind,
        amount: f32,
        duration: f32,
        events: &mut Vec<BattleEvent>,
    ) {
        if !self.is_alive() {
            return;
        }

        self.effects.push(Effect::buff(stat, amount, duration));
        self.modify_stat(stat, amount);

        events.push(BattleEvent::AgentBuffed {
            agent: self.id,
            stat,
            amount,
            duration,
        });
    }

    /// Subtract `amount` from `stat` now and undo it after `duration` seconds.
    pub fn apply_debuff(
        &mut self,
        stat: StatKind,
        amount: f32,
        duration: f32,
        events: &mut Vec<BattleEvent>,
    ) {
        if !self.is_alive() {
            return;
        }

        self.effects.push(Effect::debuff(stat, amount, duration));
        self.modify_stat(stat, -amount);

        events.push(BattleEvent::AgentDebuffed {
            agent: self.id,
            stat,
            amount,
            duration,
        });
    }

    pub fn apply_damage_over_time(&mut self, per_tick: f32, tick_interval: f32, duration: f32) {
        if !self.is_alive() {
            return;
        }
        self.effects
            .push(Effect::damage_over_time(per_tick, tick_interval, duration));
    }

    pub fn apply_heal_over_time(&mut self, per_tick: f32, tick_interval: f32, duration: f32) {
        if !self.is_alive() {
            return;
        }
        self.effects
            .push(Effect::heal_over_time(per_tick, tick_interval, duration));
    }

    fn modify_stat(&mut self, stat: StatKind, delta: f32) {
        match stat {
            StatKind::Attack => self.current_attack += delta,
            StatKind::Defense => self.current_defense += delta,
            StatKind::Speed => self.current_speed += delta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_agent(max_health: f32, defense: f32, speed: f32) -> Agent {
        let config = AgentConfig {
            name: "Test".to_string(),
            max_health,
            attack: 20.0,
            defense,
            speed,
            available_actions: vec![ActionKind::Attack],
            prefer_healing_allies: false,
        };
        let mut agent = Agent::from_config(AgentId::new(Faction::Player, 0), &config);
        agent.initialize();
        agent
    }

    // =========================================================================
    // Mitigation
    // =========================================================================

    #[test]
    fn test_defense_100_halves_damage() {
        assert_eq!(mitigate_damage(50.0, 100.0), 25.0);
    }

    #[test]
    fn test_zero_defense_takes_full_damage() {
        assert_eq!(mitigate_damage(20.0, 0.0), 20.0);
    }

    #[test]
    fn test_mitigation_strictly_decreases_and_stays_positive() {
        let mut previous = f32::MAX;
        for defense in [0.0, 1.0, 10.0, 50.0, 100.0, 500.0, 5_000.0, 100_000.0] {
            let damage = mitigate_damage(30.0, defense);
            assert!(damage > 0.0, "defense {} should never grant immunity", defense);
            assert!(damage < previous, "damage should shrink as defense grows");
            previous = damage;
        }
    }

    #[test]
    fn test_negative_defense_counts_as_zero() {
        assert_eq!(mitigate_damage(40.0, -25.0), 40.0);
    }

    // =========================================================================
    // Health
    // =========================================================================

    #[test]
    fn test_damage_clamps_at_zero_and_kills() {
        let mut agent = create_test_agent(50.0, 0.0, 10.0);
        let mut events = Vec::new();

        let dealt = agent.take_damage(80.0, None, &mut events);

        assert_eq!(dealt, 80.0);
        assert_eq!(agent.current_health(), 0.0);
        assert!(!agent.is_alive());
        assert_eq!(agent.state(), AgentState::Dead);
        assert!(events.contains(&BattleEvent::AgentDied { agent: agent.id() }));
    }

    #[test]
    fn test_heal_clamps_at_max_health() {
        let mut agent = create_test_agent(100.0, 0.0, 10.0);
        let mut events = Vec::new();

        agent.take_damage(10.0, None, &mut events);
        let restored = agent.heal(50.0, &mut events);

        assert_eq!(restored, 10.0);
        assert_eq!(agent.current_health(), 100.0);
    }

    #[test]
    fn test_dead_agent_ignores_everything() {
        let mut agent = create_test_agent(10.0, 0.0, 10.0);
        let mut events = Vec::new();
        agent.apply_buff(StatKind::Attack, 5.0, 10.0, &mut events);
        agent.take_damage(100.0, None, &mut events);
        assert!(agent.active_effects().is_empty(), "death clears effects");

        let attack = agent.attack();
        events.clear();

        assert_eq!(agent.take_damage(10.0, None, &mut events), 0.0);
        assert_eq!(agent.heal(10.0, &mut events), 0.0);
        agent.apply_buff(StatKind::Attack, 5.0, 10.0, &mut events);
        agent.apply_debuff(StatKind::Defense, 5.0, 10.0, &mut events);
        agent.apply_damage_over_time(1.0, 1.0, 5.0);

        assert_eq!(agent.current_health(), 0.0);
        assert_eq!(agent.attack(), attack);
        assert!(agent.active_effects().is_empty());
        assert!(events.is_empty());
        assert!(!agent.update(100.0, &mut events));
    }

    #[test]
    fn test_death_drops_modifiers_without_reverting() {
        let mut agent = create_test_agent(10.0, 0.0, 10.0);
        let mut events = Vec::new();
        agent.apply_buff(StatKind::Attack, 5.0, 10.0, &mut events);
        agent.take_damage(100.0, None, &mut events);

        assert_eq!(agent.attack(), 25.0);
    }

    #[test]
    fn test_damage_event_raised_before_death_event() {
        let mut agent = create_test_agent(10.0, 0.0, 10.0);
        let mut events = Vec::new();
        agent.take_damage(10.0, None, &mut events);

        assert!(matches!(events[0], BattleEvent::AgentDamaged { .. }));
        assert!(matches!(events[1], BattleEvent::AgentDied { .. }));
    }

    // =========================================================================
    // Action timer
    // =========================================================================

    #[test]
    fn test_speed_20_ready_after_5_seconds() {
        let mut agent = create_test_agent(100.0, 0.0, 20.0);
        let mut events = Vec::new();

        for _ in 0..49 {
            assert!(!agent.update(0.1, &mut events));
        }
        // 50 * 0.1 * 20 = 100 (within float tolerance of the threshold)
        let mut ready = agent.update(0.1, &mut events);
        if !ready {
            ready = agent.update(0.001, &mut events);
        }
        assert!(ready);
    }

    #[test]
    fn test_readiness_is_a_fraction() {
        let mut agent = create_test_agent(100.0, 0.0, 10.0);
        let mut events = Vec::new();
        agent.update(2.5, &mut events);
        assert!((agent.action_readiness() - 0.25).abs() < 1e-6);

        agent.update(100.0, &mut events);
        assert_eq!(agent.action_readiness(), 1.0);
        agent.reset_action_timer();
        assert_eq!(agent.action_readiness(), 0.0);
    }

    #[test]
    fn test_negative_speed_never_drains_timer_below_zero() {
        let mut agent = create_test_agent(80.0, 5.0, 8.0);
        let mut events = Vec::new();
        agent.apply_debuff(StatKind::Speed, 8.0, 2.0, &mut events);
        agent.apply_debuff(StatKind::Speed, 8.0, 2.0, &mut events);
        assert_eq!(agent.speed(), -8.0);

        assert!(!agent.update(1.0, &mut events));
        assert_eq!(agent.action_timer(), 0.0);

        // Debuffs expire before the timer advances, so the bar refills at base speed
        agent.update(1.0, &mut events);
        assert_eq!(agent.speed(), 8.0);
        assert!((agent.action_timer() - 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_agent_killed_by_own_dot_does_not_act() {
        let mut agent = create_test_agent(5.0, 0.0, 100.0);
        let mut events = Vec::new();
        agent.apply_damage_over_time(10.0, 1.0, 5.0);

        // The bar would fill this frame, but the DoT lands first
        assert!(!agent.update(1.0, &mut events));
        assert!(!agent.is_alive());
        assert_eq!(agent.action_timer(), 0.0);
    }

    #[test]
    fn test_uninitialized_agent_does_not_update() {
        let config = AgentConfig::default();
        let mut agent = Agent::from_config(AgentId::new(Faction::Enemy, 2), &config);
        let mut events = Vec::new();

        assert_eq!(agent.state(), AgentState::Uninitialized);
        assert!(!agent.update(100.0, &mut events));
        assert_eq!(agent.action_timer(), 0.0);
    }

    // =========================================================================
    // Effects
    // =========================================================================

    #[test]
    fn test_buff_applies_immediately_and_reverts_exactly() {
        let mut agent = create_test_agent(100.0, 10.0, 10.0);
        let mut events = Vec::new();

        agent.apply_buff(StatKind::Defense, 7.0, 3.0, &mut events);
        assert_eq!(agent.defense(), 17.0);

        for _ in 0..40 {
            agent.update_effects(0.1, &mut events);
        }

        assert!((agent.defense() - 10.0).abs() < 1e-5);
        assert!(agent.active_effects().is_empty());
    }

    #[test]
    fn test_debuff_net_zero() {
        let mut agent = create_test_agent(100.0, 10.0, 10.0);
        let mut events = Vec::new();

        agent.apply_debuff(StatKind::Speed, 6.5, 8.0, &mut events);
        assert_eq!(agent.speed(), 3.5);

        agent.update_effects(8.0, &mut events);
        assert_eq!(agent.speed(), 10.0);
        assert!(events.contains(&BattleEvent::StatModifierExpired {
            agent: agent.id(),
            stat: StatKind::Speed,
            delta: 6.5,
        }));
    }

    #[test]
    fn test_expired_modifier_leaves_no_placeholder_effect() {
        let mut agent = create_test_agent(100.0, 10.0, 10.0);
        let mut events = Vec::new();

        agent.apply_buff(StatKind::Attack, 5.0, 1.0, &mut events);
        agent.apply_buff(StatKind::Attack, 5.0, 5.0, &mut events);
        agent.update_effects(2.0, &mut events);

        // Only the longer buff remains; the reversal is a direct stat change
        assert_eq!(agent.active_effects().len(), 1);
        assert_eq!(agent.attack(), 25.0);
    }

    #[test]
    fn test_stacked_buffs_are_additive() {
        let mut agent = create_test_agent(100.0, 0.0, 10.0);
        let mut events = Vec::new();
        agent.apply_buff(StatKind::Speed, 2.0, 5.0, &mut events);
        agent.apply_buff(StatKind::Speed, 3.0, 5.0, &mut events);

        assert_eq!(agent.active_effects().len(), 2);
        assert_eq!(agent.speed(), 15.0);
    }

    #[test]
    fn test_dot_kills_and_stops_pass() {
        let mut agent = create_test_agent(10.0, 0.0, 10.0);
        let mut events = Vec::new();
        agent.apply_damage_over_time(6.0, 1.0, 10.0);
        agent.apply_damage_over_time(6.0, 1.0, 10.0);
        agent.apply_heal_over_time(50.0, 1.0, 10.0);

        agent.update_effects(1.0, &mut events);

        assert!(!agent.is_alive());
        assert_eq!(agent.current_health(), 0.0);
        assert!(agent.active_effects().is_empty());
        let heals = events
            .iter()
            .filter(|e| matches!(e, BattleEvent::AgentHealed { .. }))
            .count();
        assert_eq!(heals, 0, "a dead agent is not healed later in the pass");
    }

    #[test]
    fn test_dot_damage_has_no_source() {
        let mut agent = create_test_agent(100.0, 0.0, 10.0);
        let mut events = Vec::new();
        agent.apply_damage_over_time(4.0, 2.0, 8.0);
        agent.update_effects(2.0, &mut events);

        assert_eq!(
            events,
            vec![BattleEvent::AgentDamaged {
                agent: agent.id(),
                amount: 4.0,
                source: None,
            }]
        );
    }

    #[test]
    fn test_duplicate_configured_actions_are_merged() {
        let config = AgentConfig {
            available_actions: vec![ActionKind::Attack, ActionKind::Heal, ActionKind::Attack],
            ..AgentConfig::default()
        };
        let agent = Agent::from_config(AgentId::new(Faction::Player, 0), &config);
        assert_eq!(
            agent.available_actions(),
            &[ActionKind::Attack, ActionKind::Heal]
        );
    }

    #[test]
    fn test_agent_id_display_is_one_based() {
        assert_eq!(AgentId::new(Faction::Player, 0).to_string(), "Player_1");
        assert_eq!(AgentId::new(Faction::Enemy, 2).to_string(), "Enemy_3");
    }
}
