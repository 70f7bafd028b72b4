//! Battle configuration
//!
//! Agent stats and party composition. The roster is data-driven (RON); the
//! setup says which roster entries fill each party.

pub mod roster;
pub mod setup;

pub use roster::{AgentConfig, AgentRoster, DEFAULT_ROSTER_PATH};
pub use setup::{BattleSetup, PartySetup};
