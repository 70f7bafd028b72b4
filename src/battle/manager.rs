//! Battle Manager
//!
//! Owns both parties and drives the battle one frame at a time. Each `tick`
//! scales the frame delta by the battle speed, updates the player party and
//! then the enemy party in list order, and checks for a winner once every
//! agent has been updated.
//!
//! Phases move `Idle -> Active -> Over`. A battle that is over can be started
//! again, which rebuilds both parties from the setup.

use bevy::log::{info, warn};
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::config::BattleSetup;

use super::agent::{Agent, AgentId};
use super::constants::DEFAULT_BATTLE_SPEED;
use super::events::BattleEvent;
use super::faction::{execute_action, Faction};
use super::party::Party;
use super::rng::BattleRng;

/// Lifecycle of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattlePhase {
    Idle,
    Active,
    Over,
}

/// How a battle ended, from the player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleOutcome {
    Victory,
    Defeat,
    /// Both parties fell in the same tick. Reported to observers as a defeat.
    Draw,
}

impl BattleOutcome {
    pub fn is_player_victory(&self) -> bool {
        matches!(self, BattleOutcome::Victory)
    }
}

#[derive(Resource)]
pub struct BattleManager {
    setup: BattleSetup,
    player_party: Party,
    enemy_party: Party,
    phase: BattlePhase,
    outcome: Option<BattleOutcome>,
    battle_speed: f32,
    /// Simulated seconds since the battle started (speed-scaled)
    elapsed: f32,
    rng: BattleRng,
    /// Queued notifications, drained by the consumer after each tick
    events: Vec<BattleEvent>,
}

impl BattleManager {
    pub fn new(setup: BattleSetup, rng: BattleRng) -> Self {
        let battle_speed = if setup.battle_speed.is_finite() && setup.battle_speed > 0.0 {
            setup.battle_speed
        } else {
            warn!(
                "Invalid battle speed {} in setup, using {}",
                setup.battle_speed, DEFAULT_BATTLE_SPEED
            );
            DEFAULT_BATTLE_SPEED
        };

        Self {
            setup,
            player_party: Party::new(Faction::Player),
            enemy_party: Party::new(Faction::Enemy),
            phase: BattlePhase::Idle,
            outcome: None,
            battle_speed,
            elapsed: 0.0,
            rng,
            events: Vec::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Control
    // ------------------------------------------------------------------------

    /// Build both parties from the setup and start the battle.
    /// Ignored while a battle is already running.
    pub fn start_battle(&mut self) {
        if self.phase == BattlePhase::Active {
            warn!("start_battle called while a battle is already active");
            return;
        }

        self.player_party.initialize(&self.setup.player.resolve());
        self.enemy_party.initialize(&self.setup.enemy.resolve());
        self.phase = BattlePhase::Active;
        self.outcome = None;
        self.elapsed = 0.0;

        info!(
            "Battle started: {} ({} agents) vs {} ({} agents)",
            self.player_party.name(),
            self.player_party.len(),
            self.enemy_party.name(),
            self.enemy_party.len()
        );
        self.events.push(BattleEvent::BattleStarted);
    }

    /// Advance the battle by one frame of `raw_dt` real seconds.
    pub fn tick(&mut self, raw_dt: f32) {
        if self.phase != BattlePhase::Active {
            return;
        }

        let dt = raw_dt * self.battle_speed;
        self.elapsed += dt;

        self.run_party(Faction::Player, dt);
        self.run_party(Faction::Enemy, dt);

        self.check_battle_end();
    }

    /// Update every member of `faction`'s party and run the turns that are due.
    fn run_party(&mut self, faction: Faction, dt: f32) {
        let behavior = faction.behavior();
        let Self {
            player_party,
            enemy_party,
            rng,
            events,
            ..
        } = self;
        let (allies, opponents) = match faction {
            Faction::Player => (player_party, enemy_party),
            Faction::Enemy => (enemy_party, player_party),
        };

        for index in 0..allies.len() {
            if !allies.update_agent(index, dt, events) {
                continue;
            }
            let Some(actor) = allies.agent(index) else {
                continue;
            };
            let actor_id = actor.id();
            let action = behavior.decide_action(actor, allies, rng);
            execute_action(action, actor_id, allies, opponents, rng, events);
            allies.reset_action_timer(index);
        }
    }

    fn check_battle_end(&mut self) {
        let outcome = match (
            self.player_party.has_alive_agents(),
            self.enemy_party.has_alive_agents(),
        ) {
            (true, true) => return,
            (true, false) => BattleOutcome::Victory,
            (false, true) => BattleOutcome::Defeat,
            (false, false) => BattleOutcome::Draw,
        };
        self.finish(outcome);
    }

    /// End the battle from outside the simulation. Ignored once over.
    pub fn end_battle(&mut self, player_victory: bool) {
        if self.phase == BattlePhase::Over {
            return;
        }
        let outcome = if player_victory {
            BattleOutcome::Victory
        } else {
            BattleOutcome::Defeat
        };
        self.finish(outcome);
    }

    fn finish(&mut self, outcome: BattleOutcome) {
        self.phase = BattlePhase::Over;
        self.outcome = Some(outcome);

        self.events.push(BattleEvent::BattleEnded);
        if outcome.is_player_victory() {
            self.events.push(BattleEvent::PlayerVictory);
        } else {
            self.events.push(BattleEvent::PlayerDefeat);
        }

        info!(
            "Battle ended after {:.1}s: {:?}",
            self.elapsed, outcome
        );
        self.log_end_statistics();
    }

    fn log_end_statistics(&self) {
        for party in [&self.player_party, &self.enemy_party] {
            info!("{} final stats:", party.name());
            for agent in party.agents() {
                info!(
                    "  {} - Health: {:.1}/{:.1}, Attack: {:.1}, Defense: {:.1}, Speed: {:.1}, Alive: {}",
                    agent.display_name(),
                    agent.current_health(),
                    agent.max_health(),
                    agent.attack(),
                    agent.defense(),
                    agent.speed(),
                    agent.is_alive()
                );
            }
        }
    }

    /// Replace the speed multiplier for later ticks. Non-positive or
    /// non-finite values are ignored.
    pub fn set_battle_speed(&mut self, speed: f32) {
        if !speed.is_finite() || speed <= 0.0 {
            warn!("Ignoring invalid battle speed {}", speed);
            return;
        }
        self.battle_speed = speed;
        info!("Battle speed set to {:.1}x", speed);
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn battle_speed(&self) -> f32 {
        self.battle_speed
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn is_battle_active(&self) -> bool {
        self.phase == BattlePhase::Active
    }

    pub fn is_battle_over(&self) -> bool {
        self.phase == BattlePhase::Over
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    /// Simulated seconds since start, frozen once the battle is over
    pub fn elapsed_time(&self) -> f32 {
        self.elapsed
    }

    pub fn setup(&self) -> &BattleSetup {
        &self.setup
    }

    pub fn seed(&self) -> Option<u64> {
        self.rng.seed
    }

    pub fn party(&self, faction: Faction) -> &Party {
        match faction {
            Faction::Player => &self.player_party,
            Faction::Enemy => &self.enemy_party,
        }
    }

    pub fn player_party(&self) -> &Party {
        &self.player_party
    }

    pub fn enemy_party(&self) -> &Party {
        &self.enemy_party
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.party(id.faction).agent(id.index)
    }

    /// Notifications queued since the last drain
    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }
}
