//! partysim - Real-time Party Auto-Battle Simulator
//!
//! Two parties of agents fight on their own: every agent fills an action bar
//! at its speed and, once full, picks and performs an action against a
//! heuristically chosen target.
//!
//! This library exposes the simulation, its configuration and the headless
//! runner for testing and reuse.

pub mod battle;
pub mod cli;
pub mod combat;
pub mod config;
pub mod error;
pub mod headless;

// Re-export commonly used types
pub use battle::{BattleEvent, BattleManager, BattleOutcome, BattlePlugin, Faction};
pub use combat::log::{CombatLog, CombatLogEventType};
pub use config::{AgentConfig, AgentRoster, BattleSetup, PartySetup};
pub use error::ConfigError;
pub use headless::{BattleResult, HeadlessBattleConfig};
