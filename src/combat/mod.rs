//! Combat logging
//!
//! Everything that observes a battle from the outside: the [`CombatLog`]
//! resource that records drained battle events, its queries, and JSON export.

pub mod log;

pub use log::{
    describe_event, AgentMetadata, CombatLog, CombatLogEntry, CombatLogEventType, MatchMetadata,
};
