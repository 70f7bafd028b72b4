//! Unit tests for combat log query and aggregation methods
//!
//! These tests verify that the CombatLog correctly:
//! - Classifies battle events for filtering
//! - Aggregates damage and healing per agent
//! - Counts actions and deaths
//! - Saves a JSON document with metadata

use partysim::battle::{
    ActionKind, AgentId, BattleEvent, BattleManager, BattleOutcome, BattleRng, Faction, StatKind,
};
use partysim::combat::log::{CombatLog, CombatLogEventType, MatchMetadata};
use partysim::config::{AgentConfig, BattleSetup, PartySetup};

fn create_test_log() -> CombatLog {
    CombatLog::default()
}

fn player(index: usize) -> AgentId {
    AgentId::new(Faction::Player, index)
}

fn enemy(index: usize) -> AgentId {
    AgentId::new(Faction::Enemy, index)
}

fn damage(target: AgentId, amount: f32, source: Option<AgentId>) -> BattleEvent {
    BattleEvent::AgentDamaged {
        agent: target,
        amount,
        source,
    }
}

// =============================================================================
// Damage Aggregation Tests
// =============================================================================

#[test]
fn test_damage_dealt_empty_log() {
    let log = create_test_log();
    assert_eq!(log.damage_dealt_by(player(0)), 0.0);
    assert_eq!(log.damage_taken_by(player(0)), 0.0);
}

#[test]
fn test_damage_dealt_counts_only_direct_hits_from_source() {
    let mut log = create_test_log();

    log.record(damage(enemy(0), 20.0, Some(player(0))), "Test".to_string());
    log.record(damage(enemy(1), 15.0, Some(player(0))), "Test".to_string());
    log.record(damage(enemy(0), 30.0, Some(player(1))), "Test".to_string());
    log.record(damage(enemy(0), 6.0, None), "Test".to_string());

    assert_eq!(log.damage_dealt_by(player(0)), 35.0);
    assert_eq!(log.damage_dealt_by(player(1)), 30.0);
}

#[test]
fn test_damage_taken_includes_periodic_damage() {
    let mut log = create_test_log();

    log.record(damage(enemy(0), 20.0, Some(player(0))), "Test".to_string());
    log.record(damage(enemy(0), 6.0, None), "Test".to_string());
    log.record(damage(enemy(1), 50.0, Some(player(0))), "Test".to_string());

    assert_eq!(log.damage_taken_by(enemy(0)), 26.0);
}

#[test]
fn test_healing_received() {
    let mut log = create_test_log();

    log.record(
        BattleEvent::AgentHealed {
            agent: player(2),
            amount: 12.0,
        },
        "Test".to_string(),
    );
    log.record(
        BattleEvent::AgentHealed {
            agent: player(2),
            amount: 2.25,
        },
        "Test".to_string(),
    );

    assert_eq!(log.healing_received_by(player(2)), 14.25);
    assert_eq!(log.healing_received_by(player(0)), 0.0);
}

// =============================================================================
// Filtering Tests
// =============================================================================

#[test]
fn test_filter_by_type_and_hp_changes() {
    let mut log = create_test_log();

    log.record(BattleEvent::BattleStarted, "Start".to_string());
    log.record(damage(enemy(0), 20.0, Some(player(0))), "Hit".to_string());
    log.record(
        BattleEvent::AgentHealed {
            agent: enemy(0),
            amount: 5.0,
        },
        "Heal".to_string(),
    );
    log.record(
        BattleEvent::AgentBuffed {
            agent: player(1),
            stat: StatKind::Defense,
            amount: 7.5,
            duration: 10.0,
        },
        "Buff".to_string(),
    );

    assert_eq!(log.filter_by_type(CombatLogEventType::MatchEvent).len(), 1);
    assert_eq!(log.filter_by_type(CombatLogEventType::EffectApplied).len(), 1);
    assert_eq!(log.hp_changes_only().len(), 2);
}

#[test]
fn test_recent_keeps_order() {
    let mut log = create_test_log();
    for i in 0..5 {
        log.log(CombatLogEventType::MatchEvent, format!("entry {}", i));
    }

    let recent: Vec<&str> = log.recent(2).iter().map(|e| e.message.as_str()).collect();
    assert_eq!(recent, vec!["entry 3", "entry 4"]);
}

#[test]
fn test_action_counts_and_deaths() {
    let mut log = create_test_log();
    for action in [ActionKind::Attack, ActionKind::Attack, ActionKind::DebuffEnemy] {
        log.record(
            BattleEvent::ActionTaken {
                actor: player(0),
                action,
                target: Some(enemy(0)),
            },
            "Test".to_string(),
        );
    }
    log.record(BattleEvent::AgentDied { agent: enemy(0) }, "Test".to_string());

    let counts = log.action_counts(player(0));
    assert_eq!(counts.get(&ActionKind::Attack), Some(&2));
    assert_eq!(counts.get(&ActionKind::DebuffEnemy), Some(&1));
    assert_eq!(log.death_count(), 1);
}

// =============================================================================
// Recording From a Battle
// =============================================================================

#[test]
fn test_recorded_battle_matches_final_state() {
    let duelist = AgentConfig {
        name: "Duelist".to_string(),
        max_health: 100.0,
        attack: 20.0,
        defense: 0.0,
        speed: 10.0,
        available_actions: vec![ActionKind::Attack],
        prefer_healing_allies: false,
    };
    let setup = BattleSetup::new(
        PartySetup::from_configs(vec![duelist.clone()]),
        PartySetup::from_configs(vec![duelist]),
    );
    let mut manager = BattleManager::new(setup, BattleRng::from_seed(0));
    let mut log = create_test_log();

    manager.start_battle();
    while !manager.is_battle_over() {
        manager.tick(0.5);
        let events = manager.drain_events();
        log.match_time = manager.elapsed_time();
        log.record_all(&manager, events);
    }

    assert_eq!(manager.outcome(), Some(BattleOutcome::Victory));
    assert_eq!(log.damage_taken_by(enemy(0)), 100.0);
    assert_eq!(log.damage_dealt_by(player(0)), 100.0);
    assert_eq!(log.death_count(), 1);

    let first_hit = log
        .filter_by_type(CombatLogEventType::Damage)
        .first()
        .map(|e| e.message.clone())
        .unwrap();
    assert_eq!(first_hit, "Player_1 (Duelist) hits Enemy_1 (Duelist) for 20.0 damage");

    let last = log.entries.last().unwrap();
    assert_eq!(last.event, Some(BattleEvent::PlayerVictory));
    assert!(last.timestamp > 0.0);
}

// =============================================================================
// Saving
// =============================================================================

#[test]
fn test_save_to_file_writes_metadata_and_entries() {
    let mut log = create_test_log();
    log.record(BattleEvent::BattleStarted, "Battle started!".to_string());
    log.record(damage(enemy(0), 20.0, Some(player(0))), "Hit".to_string());

    let metadata = MatchMetadata {
        outcome: Some(BattleOutcome::Defeat),
        duration: 42.0,
        battle_speed: 2.0,
        random_seed: Some(9),
        player_party: vec![],
        enemy_party: vec![],
    };

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("battle.json");
    let saved = log.save_to_file(&metadata, Some(&path)).unwrap();
    assert_eq!(saved, path);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["metadata"]["outcome"], "Defeat");
    assert_eq!(json["metadata"]["duration"], 42.0);
    assert_eq!(json["entries"].as_array().unwrap().len(), 2);
    assert_eq!(json["entries"][1]["event_type"], "Damage");
}
