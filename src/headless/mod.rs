//! Headless mode for automated testing
//!
//! This module provides functionality to run party battles without any
//! graphical output, suitable for automated testing and balance runs.
//!
//! ## Usage
//!
//! ```bash
//! # Run a headless battle
//! cargo run --release -- --headless battle_config.json
//! ```
//!
//! ## JSON Configuration
//!
//! ```json
//! {
//!   "player_party": ["Warrior", "Healer", "Mage"],
//!   "enemy_party": ["Orc", "Goblin"],
//!   "enemy_party_size": 3,
//!   "battle_speed": 2.0,
//!   "max_duration_secs": 120,
//!   "random_seed": 42
//! }
//! ```

pub mod config;
pub mod runner;

pub use config::HeadlessBattleConfig;
pub use runner::{
    run_headless_battle, run_headless_battle_with_logging, AgentResult, BattleResult,
    HeadlessBattleState, HeadlessPlugin,
};
