//! Headless battle execution
//!
//! Runs battles without any graphical output, suitable for automated testing.
//! The battle is driven by a Bevy app with `MinimalPlugins` and a fixed manual
//! frame duration, so every run with the same seed takes the same frames.

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::battle::{
    advance_battle, Agent, BattleManager, BattleOutcome, BattlePlugin, BattleRng, Faction,
};
use crate::combat::log::{AgentMetadata, CombatLog, CombatLogEventType, MatchMetadata};
use crate::config::BattleSetup;
use crate::error::Result;

use super::config::HeadlessBattleConfig;

/// Result of a completed headless battle
///
/// This struct provides programmatic access to battle results for testing and analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleResult {
    /// How the battle ended, or `None` if it hit the time limit
    pub outcome: Option<BattleOutcome>,
    /// Simulated battle duration in seconds
    pub battle_time: f32,
    /// Frames the app ran
    pub frames: u64,
    pub player_agents: Vec<AgentResult>,
    pub enemy_agents: Vec<AgentResult>,
    /// Random seed used (if deterministic mode)
    pub random_seed: Option<u64>,
}

impl BattleResult {
    /// The winning faction. `None` for a timeout or a simultaneous wipe.
    pub fn winner(&self) -> Option<Faction> {
        match self.outcome? {
            BattleOutcome::Victory => Some(Faction::Player),
            BattleOutcome::Defeat => Some(Faction::Enemy),
            BattleOutcome::Draw => None,
        }
    }

    pub fn timed_out(&self) -> bool {
        self.outcome.is_none()
    }
}

/// Statistics for a single agent after the battle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResult {
    /// "Player_1", "Enemy_3"
    pub id: String,
    /// Configuration name (e.g., "Warrior", "Goblin")
    pub name: String,
    pub max_health: f32,
    /// Health remaining at battle end (0 if dead)
    pub final_health: f32,
    pub survived: bool,
    /// Direct damage dealt during the battle
    pub damage_dealt: f32,
    /// Total damage taken during the battle
    pub damage_taken: f32,
    pub healing_received: f32,
    pub actions_taken: usize,
}

impl AgentResult {
    fn from_agent(agent: &Agent, combat_log: &CombatLog) -> Self {
        let id = agent.id();
        Self {
            id: id.to_string(),
            name: agent.name().to_string(),
            max_health: agent.max_health(),
            final_health: agent.current_health(),
            survived: agent.is_alive(),
            damage_dealt: combat_log.damage_dealt_by(id),
            damage_taken: combat_log.damage_taken_by(id),
            healing_received: combat_log.healing_received_by(id),
            actions_taken: combat_log.action_counts(id).values().sum(),
        }
    }

    fn to_metadata(&self) -> AgentMetadata {
        AgentMetadata {
            id: self.id.clone(),
            name: self.name.clone(),
            max_health: self.max_health,
            final_health: self.final_health,
            survived: self.survived,
            damage_dealt: self.damage_dealt,
            damage_taken: self.damage_taken,
        }
    }
}

/// Resource to track headless battle state
#[derive(Resource)]
pub struct HeadlessBattleState {
    /// Simulated seconds before the battle is called off without a winner
    pub max_duration: f32,
    /// Custom output path for the combat log
    pub output_path: Option<PathBuf>,
    /// Frames run so far
    pub frames: u64,
    /// Whether the battle has completed
    pub battle_complete: bool,
    /// Battle result (populated when the battle completes)
    pub result: Option<BattleResult>,
}

/// Plugin for headless battle execution
pub struct HeadlessPlugin {
    pub setup: BattleSetup,
    pub random_seed: Option<u64>,
    pub max_duration: f32,
    /// Real seconds per frame
    pub frame_delta: f32,
    pub output_path: Option<PathBuf>,
}

impl Plugin for HeadlessPlugin {
    fn build(&self, app: &mut App) {
        match self.random_seed {
            Some(seed) => info!("Using deterministic RNG with seed: {}", seed),
            None => info!("Using non-deterministic RNG (no seed provided)"),
        }
        let rng = BattleRng::from_optional_seed(self.random_seed);

        app.add_plugins(BattlePlugin)
            .insert_resource(TimeUpdateStrategy::ManualDuration(
                Duration::from_secs_f32(self.frame_delta),
            ))
            .insert_resource(BattleManager::new(self.setup.clone(), rng))
            .insert_resource(HeadlessBattleState {
                max_duration: self.max_duration,
                output_path: self.output_path.clone(),
                frames: 0,
                battle_complete: false,
                result: None,
            })
            .add_systems(Startup, headless_start_battle)
            .add_systems(Update, headless_check_battle_end.after(advance_battle));
    }
}

/// Setup system for headless battle
fn headless_start_battle(mut manager: ResMut<BattleManager>, mut combat_log: ResMut<CombatLog>) {
    combat_log.clear();
    combat_log.log(
        CombatLogEventType::MatchEvent,
        "Battle starting (headless mode)".to_string(),
    );
    manager.start_battle();
}

/// Check if the battle has ended (a party wiped out, or timeout)
fn headless_check_battle_end(
    manager: Res<BattleManager>,
    combat_log: Res<CombatLog>,
    mut headless_state: ResMut<HeadlessBattleState>,
) {
    if headless_state.battle_complete {
        return;
    }
    headless_state.frames += 1;

    let outcome = if manager.is_battle_over() {
        manager.outcome()
    } else if manager.elapsed_time() >= headless_state.max_duration {
        info!(
            "Battle timed out after {:.1}s - no winner",
            manager.elapsed_time()
        );
        None
    } else {
        return;
    };

    let result = build_battle_result(&manager, &combat_log, outcome, headless_state.frames);
    if let Some(path) = headless_state.output_path.clone() {
        save_headless_battle_log(&manager, &combat_log, &result, path);
    }
    headless_state.result = Some(result);
    headless_state.battle_complete = true;
}

/// Build the BattleResult from the final manager state
fn build_battle_result(
    manager: &BattleManager,
    combat_log: &CombatLog,
    outcome: Option<BattleOutcome>,
    frames: u64,
) -> BattleResult {
    let collect = |faction: Faction| -> Vec<AgentResult> {
        manager
            .party(faction)
            .agents()
            .iter()
            .map(|agent| AgentResult::from_agent(agent, combat_log))
            .collect()
    };

    BattleResult {
        outcome,
        battle_time: manager.elapsed_time(),
        frames,
        player_agents: collect(Faction::Player),
        enemy_agents: collect(Faction::Enemy),
        random_seed: manager.seed(),
    }
}

/// Save the combat log to a file
fn save_headless_battle_log(
    manager: &BattleManager,
    combat_log: &CombatLog,
    result: &BattleResult,
    path: PathBuf,
) {
    let metadata = MatchMetadata {
        outcome: result.outcome,
        duration: result.battle_time,
        battle_speed: manager.battle_speed(),
        random_seed: result.random_seed,
        player_party: result.player_agents.iter().map(AgentResult::to_metadata).collect(),
        enemy_party: result.enemy_agents.iter().map(AgentResult::to_metadata).collect(),
    };

    match combat_log.save_to_file(&metadata, Some(&path)) {
        Ok(saved) => info!("Combat log saved to: {}", saved.display()),
        Err(e) => error!("Failed to save combat log: {}", e),
    }
}

/// Run a headless battle with the given configuration
pub fn run_headless_battle(config: &HeadlessBattleConfig) -> Result<BattleResult> {
    run(config, false)
}

/// Like [`run_headless_battle`], with Bevy's log output enabled
pub fn run_headless_battle_with_logging(config: &HeadlessBattleConfig) -> Result<BattleResult> {
    run(config, true)
}

fn run(config: &HeadlessBattleConfig, with_logging: bool) -> Result<BattleResult> {
    let roster = config.load_roster()?;
    let setup = config.to_battle_setup(&roster)?;

    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    if with_logging {
        app.add_plugins(LogPlugin::default());
    }
    app.add_plugins(HeadlessPlugin {
        setup,
        random_seed: config.random_seed,
        max_duration: config.max_duration_secs,
        frame_delta: config.frame_delta,
        output_path: config.output_path.as_ref().map(PathBuf::from),
    });
    app.finish();
    app.cleanup();

    // Enough frames to reach the time limit, plus slack for the startup frame
    let simulated_per_frame = config.frame_delta * config.battle_speed;
    let frame_budget = (config.max_duration_secs / simulated_per_frame).ceil() as u64 + 10;

    for _ in 0..frame_budget {
        app.update();
        if app.world().resource::<HeadlessBattleState>().battle_complete {
            break;
        }
    }

    let world = app.world_mut();
    if let Some(result) = world.resource_mut::<HeadlessBattleState>().result.take() {
        return Ok(result);
    }

    // Frame budget ran out first; report the battle as timed out
    let manager = world.resource::<BattleManager>();
    let combat_log = world.resource::<CombatLog>();
    Ok(build_battle_result(manager, combat_log, None, frame_budget))
}
