//! Timed Effects
//!
//! Buffs, debuffs, damage-over-time and heal-over-time effects attached to an
//! agent. An effect never touches its agent directly: [`Effect::update`]
//! reports what should happen this frame as an [`EffectOutcome`] and the
//! owning [`Agent`](super::agent::Agent) applies it.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::actions::StatKind;

/// The kind-specific state of an effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Raises `stat` by `amount` until it expires
    Buff { stat: StatKind, amount: f32 },
    /// Lowers `stat` by `amount` until it expires
    Debuff { stat: StatKind, amount: f32 },
    /// Deals `per_tick` damage every `tick_interval` seconds
    DamageOverTime {
        per_tick: f32,
        tick_interval: f32,
        since_last_tick: f32,
    },
    /// Heals `per_tick` every `tick_interval` seconds
    HealOverTime {
        per_tick: f32,
        tick_interval: f32,
        since_last_tick: f32,
    },
}

/// What an effect asks its agent to do after an update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectOutcome {
    /// Periodic damage with no source agent
    Damage(f32),
    /// Periodic healing
    Heal(f32),
    /// A stat modifier ran out; add `delta` to `stat` to undo it
    Revert { stat: StatKind, delta: f32 },
}

/// A timed modification on an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    kind: EffectKind,
    duration: f32,
    remaining: f32,
    /// Set once the expiry handling has run, so a stat modifier is undone once
    ended: bool,
}

impl Effect {
    fn new(kind: EffectKind, duration: f32) -> Self {
        Self {
            kind,
            duration,
            remaining: duration,
            ended: false,
        }
    }

    pub fn buff(stat: StatKind, amount: f32, duration: f32) -> Self {
        Self::new(EffectKind::Buff { stat, amount }, duration)
    }

    pub fn debuff(stat: StatKind, amount: f32, duration: f32) -> Self {
        Self::new(EffectKind::Debuff { stat, amount }, duration)
    }

    pub fn damage_over_time(per_tick: f32, tick_interval: f32, duration: f32) -> Self {
        Self::new(
            EffectKind::DamageOverTime {
                per_tick,
                tick_interval,
                since_last_tick: 0.0,
            },
            duration,
        )
    }

    pub fn heal_over_time(per_tick: f32, tick_interval: f32, duration: f32) -> Self {
        Self::new(
            EffectKind::HealOverTime {
                per_tick,
                tick_interval,
                since_last_tick: 0.0,
            },
            duration,
        )
    }

    pub fn kind(&self) -> &EffectKind {
        &self.kind
    }

    /// Total duration in seconds
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Seconds left before the effect is removed
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Whether this effect is beneficial to its target
    pub fn is_beneficial(&self) -> bool {
        matches!(
            self.kind,
            EffectKind::Buff { .. } | EffectKind::HealOverTime { .. }
        )
    }

    /// Short label for UI and logs
    pub fn label(&self) -> &'static str {
        match self.kind {
            EffectKind::Buff { .. } => "Buff",
            EffectKind::Debuff { .. } => "Debuff",
            EffectKind::DamageOverTime { .. } => "DoT",
            EffectKind::HealOverTime { .. } => "HoT",
        }
    }

    /// Advance the effect by `dt` seconds.
    ///
    /// The countdown always runs first. Stat modifiers report a `Revert` the
    /// first time the countdown reaches zero. Periodic effects that are still
    /// active add `dt` to their tick accumulator and fire at most one tick per
    /// call, however large `dt` is.
    pub fn update(&mut self, dt: f32) -> Option<EffectOutcome> {
        self.remaining -= dt;
        let expired_now = !self.is_active() && !self.ended;
        if expired_now {
            self.ended = true;
        }

        match &mut self.kind {
            EffectKind::Buff { stat, amount } => expired_now.then(|| EffectOutcome::Revert {
                stat: *stat,
                delta: -*amount,
            }),
            EffectKind::Debuff { stat, amount } => expired_now.then(|| EffectOutcome::Revert {
                stat: *stat,
                delta: *amount,
            }),
            EffectKind::DamageOverTime {
                per_tick,
                tick_interval,
                since_last_tick,
            } => {
                if self.remaining <= 0.0 {
                    return None;
                }
                tick_periodic(since_last_tick, *tick_interval, dt)
                    .then(|| EffectOutcome::Damage(*per_tick))
            }
            EffectKind::HealOverTime {
                per_tick,
                tick_interval,
                since_last_tick,
            } => {
                if self.remaining <= 0.0 {
                    return None;
                }
                tick_periodic(since_last_tick, *tick_interval, dt)
                    .then(|| EffectOutcome::Heal(*per_tick))
            }
        }
    }
}

/// Accumulate `dt` and report whether a tick fires. The accumulator resets to
/// zero on a tick; leftover time past the interval is dropped.
fn tick_periodic(since_last_tick: &mut f32, tick_interval: f32, dt: f32) -> bool {
    *since_last_tick += dt;
    if *since_last_tick >= tick_interval {
        *since_last_tick = 0.0;
        true
    } else {
        false
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            EffectKind::Buff { stat, amount } => {
                write!(f, "+{} {} ({:.1}s)", amount, stat, self.remaining)
            }
            EffectKind::Debuff { stat, amount } => {
                write!(f, "-{} {} ({:.1}s)", amount, stat, self.remaining)
            }
            EffectKind::DamageOverTime { per_tick, .. } => {
                write!(f, "DoT: {}/tick ({:.1}s)", per_tick, self.remaining)
            }
            EffectKind::HealOverTime { per_tick, .. } => {
                write!(f, "HoT: {}/tick ({:.1}s)", per_tick, self.remaining)
            }
        }
    }
}
