//! partysim - Real-time party auto-battle simulator
//!
//! Runs one battle between a player party and an enemy party and prints the
//! outcome with per-agent statistics.

use std::process::ExitCode;

use partysim::battle::BattleOutcome;
use partysim::cli;
use partysim::headless::{run_headless_battle_with_logging, AgentResult, BattleResult};

fn main() -> ExitCode {
    let args = cli::parse_args();

    let config = match args.battle_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Starting battle simulation...");
    println!("  Player party: {:?}", config.player_party);
    println!("  Enemy party: {:?}", config.enemy_party);
    println!("  Battle speed: {:.1}x", config.battle_speed);
    println!("  Max duration: {:.0}s", config.max_duration_secs);

    match run_headless_battle_with_logging(&config) {
        Ok(result) => {
            print_result(&result);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_result(result: &BattleResult) {
    let verdict = match result.outcome {
        Some(BattleOutcome::Victory) => "VICTORY - the enemy party was defeated",
        Some(BattleOutcome::Defeat) => "DEFEAT - the player party was defeated",
        Some(BattleOutcome::Draw) => "DEFEAT - both parties fell together",
        None => "TIMEOUT - no winner",
    };
    println!();
    println!("{} after {:.1}s", verdict, result.battle_time);

    for (label, agents) in [
        ("Player party", &result.player_agents),
        ("Enemy party", &result.enemy_agents),
    ] {
        println!("{}:", label);
        for agent in agents {
            print_agent(agent);
        }
    }
}

fn print_agent(agent: &AgentResult) {
    println!(
        "  {} ({}): {:.1}/{:.1} HP{} | dealt {:.1}, taken {:.1}, healed {:.1}, {} actions",
        agent.id,
        agent.name,
        agent.final_health,
        agent.max_health,
        if agent.survived { "" } else { " [dead]" },
        agent.damage_dealt,
        agent.damage_taken,
        agent.healing_received,
        agent.actions_taken
    );
}
