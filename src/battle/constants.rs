//! Battle Constants
//!
//! Centralized location for the tuning numbers used by the battle simulation.
//! Player and enemy agents share every value here.

// ============================================================================
// Action Timer
// ============================================================================

/// Action timer value at which an agent takes its turn.
/// The timer grows by `dt * speed`, so an agent acts every `100 / speed` seconds.
pub const ACTION_THRESHOLD: f32 = 100.0;

// ============================================================================
// Damage Mitigation
// ============================================================================

/// Defense scale in the mitigation curve `defense / (defense + DEFENSE_SCALE)`.
/// A defense equal to this value halves incoming damage.
pub const DEFENSE_SCALE: f32 = 100.0;

// ============================================================================
// Action Selection
// ============================================================================

/// An ally below this health fraction makes healers consider healing first.
pub const HEAL_PRIORITY_THRESHOLD: f32 = 0.5;

/// Chance to heal once an ally is below [`HEAL_PRIORITY_THRESHOLD`].
pub const HEAL_PRIORITY_CHANCE: f32 = 0.8;

/// Any party member below this health fraction puts the party "in danger".
pub const DANGER_THRESHOLD: f32 = 0.3;

/// Chance to debuff an enemy while the party is in danger.
pub const DANGER_DEBUFF_CHANCE: f32 = 0.7;

// ============================================================================
// Action Magnitudes
// ============================================================================

/// Direct heal amount as a fraction of the healer's current attack.
pub const HEAL_ATTACK_RATIO: f32 = 0.8;

/// Flat part of a buff/debuff magnitude.
pub const STAT_MODIFIER_BASE: f32 = 5.0;

/// Attack-scaled part of a buff/debuff magnitude.
pub const STAT_MODIFIER_ATTACK_RATIO: f32 = 0.1;

/// Buff duration in seconds.
pub const BUFF_DURATION: f32 = 10.0;

/// Debuff duration in seconds.
pub const DEBUFF_DURATION: f32 = 8.0;

/// Damage-over-time tick amount as a fraction of attack.
pub const DOT_ATTACK_RATIO: f32 = 0.2;

/// Damage-over-time tick interval in seconds.
pub const DOT_TICK_INTERVAL: f32 = 2.0;

/// Damage-over-time duration in seconds.
pub const DOT_DURATION: f32 = 8.0;

/// Heal-over-time tick amount as a fraction of attack.
pub const HOT_ATTACK_RATIO: f32 = 0.15;

/// Heal-over-time tick interval in seconds.
pub const HOT_TICK_INTERVAL: f32 = 2.0;

/// Heal-over-time duration in seconds.
pub const HOT_DURATION: f32 = 10.0;

// ============================================================================
// Battle Setup
// ============================================================================

/// Default battle speed multiplier.
pub const DEFAULT_BATTLE_SPEED: f32 = 1.0;

/// Smallest battle speed the configuration accepts.
pub const MIN_BATTLE_SPEED: f32 = 0.1;

/// Largest battle speed the configuration accepts.
pub const MAX_BATTLE_SPEED: f32 = 60.0;

/// Largest party size the configuration accepts.
pub const MAX_PARTY_SIZE: usize = 5;
