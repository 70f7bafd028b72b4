//! Battle simulation
//!
//! The real-time party battle: agents, their timed effects, the two parties
//! and the manager that ticks them.
//!
//! ## Architecture
//!
//! The simulation itself is plain Rust with no ECS queries:
//! - [`BattleManager`] owns both [`Party`] values and advances them in `tick`
//! - every [`Agent`] is reached through its party by [`AgentId`]
//! - notifications are queued as [`BattleEvent`] values and drained afterwards
//!
//! [`BattlePlugin`] wires the manager into a Bevy app: when a `BattleManager`
//! resource exists, it is ticked once per frame with `Time::delta_secs()` and
//! its events are recorded in the [`CombatLog`].

use bevy::prelude::*;

pub mod actions;
pub mod agent;
pub mod constants;
pub mod effects;
pub mod events;
pub mod faction;
pub mod manager;
pub mod party;
pub mod rng;

pub use actions::{ActionKind, StatKind};
pub use agent::{mitigate_damage, Agent, AgentId, AgentState, BaseStats};
pub use effects::{Effect, EffectKind, EffectOutcome};
pub use events::BattleEvent;
pub use faction::{execute_action, Faction, FactionBehavior};
pub use manager::{BattleManager, BattleOutcome, BattlePhase};
pub use party::Party;
pub use rng::BattleRng;

use crate::combat::log::CombatLog;

/// Plugin that drives a [`BattleManager`] resource from the frame clock
pub struct BattlePlugin;

impl Plugin for BattlePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CombatLog>()
            .add_systems(Update, advance_battle);
    }
}

/// Tick the battle by the frame delta and move its events into the log
pub fn advance_battle(
    time: Res<Time>,
    manager: Option<ResMut<BattleManager>>,
    mut combat_log: ResMut<CombatLog>,
) {
    let Some(mut manager) = manager else {
        return;
    };
    if !manager.is_battle_active() && manager.events().is_empty() {
        return;
    }

    manager.tick(time.delta_secs());

    let events = manager.drain_events();
    combat_log.match_time = manager.elapsed_time();
    combat_log.record_all(&manager, events);
}
