//! Caller-provided definition tables feeding a live battle.

use quest_battle::battle::{Battle, BattleEvent, BattleInput, StateTag};
use quest_battle::catalog::{CatalogError, GameData, SpellKind};
use quest_battle::character::Player;
use quest_battle::combat::{AttackKind, CombatRecord, Stats};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

const SPELLS: &str = r#"{
    "triple_jab": {
        "name": "Triple Jab",
        "cost": 4,
        "type": "multi_hit",
        "hits": 3,
        "multiplier": 0.5
    },
    "flail": {
        "name": "Flail",
        "cost": 1,
        "type": "multi_hit",
        "hits": 0,
        "multiplier": 1.0
    },
    "nap": {
        "name": "Nap",
        "cost": 2,
        "type": "status",
        "effect": "asleep",
        "duration": 2
    }
}"#;

const ITEMS: &str = r#"{
    "snack": { "name": "Snack", "type": "healing", "power": 5 }
}"#;

const ENEMIES: &str = r#"{
    "scarecrow": { "name": "Scarecrow", "max_hp": 5000 },
    "lonely_bat": {
        "name": "Lonely Bat",
        "max_hp": 5000,
        "special_abilities": {
            "call_for_help": { "hp_threshold": 1.0, "chance": 1.0, "enemy_type": "nobody" }
        }
    }
}"#;

fn custom_data() -> Arc<GameData> {
    Arc::new(GameData::from_json(SPELLS, ITEMS, ENEMIES).unwrap())
}

fn apprentice(spells: &[&str]) -> Player {
    let mut player = Player::new(
        "Apprentice",
        CombatRecord::new(10_000, 20, Stats::new(6, 2, 3, 1)),
    );
    player.known_spells = spells.iter().map(|id| id.to_string()).collect();
    player
}

#[test]
fn test_optional_fields_take_defaults() {
    let data = custom_data();

    let jab = data.spells.get("triple_jab").unwrap();
    assert_eq!(jab.id, "triple_jab");
    assert_eq!(jab.kind, SpellKind::MultiHit);
    assert_eq!(jab.power, 0);
    assert_eq!(jab.element, "neutral");

    let nap = data.spells.get("nap").unwrap();
    assert_eq!(nap.chance, 1.0);

    let scarecrow = data.bestiary.create_enemy("scarecrow").unwrap();
    assert_eq!(scarecrow.attack_kind, AttackKind::Melee);
    assert_eq!(scarecrow.record().stats, Stats::new(1, 1, 1, 1));
    assert_eq!(scarecrow.record().xp_reward, 0);
    assert!(scarecrow.loot.is_empty());
    assert!(scarecrow.script.is_none());
}

#[test]
fn test_bad_table_reports_which_one() {
    let err = GameData::from_json(SPELLS, ITEMS, r#"{"scarecrow": {"max_hp": "lots"}}"#)
        .unwrap_err();
    assert!(matches!(err, CatalogError::Parse { table: "enemies", .. }));
}

#[test]
fn test_custom_multi_hit_spell_in_battle() {
    let data = custom_data();
    let enemy = data.bestiary.create_enemy("scarecrow").unwrap();
    let mut battle = Battle::with_rng(
        data,
        apprentice(&["triple_jab"]),
        vec![enemy],
        Vec::new(),
        ChaCha8Rng::seed_from_u64(12345),
    );

    battle.handle_input(BattleInput::Down);
    battle.handle_input(BattleInput::Confirm);
    battle.handle_input(BattleInput::Confirm);

    assert_eq!(battle.state_tag(), StateTag::MainMenu);
    assert_eq!(battle.player().record().mp(), 16);
    assert!(battle.enemies()[0].record().hp() <= 5000 - 3);
    let events = battle.drain_events();
    assert!(events.iter().any(|event| matches!(
        event,
        BattleEvent::CombatLog(line) if line.starts_with("Cast Triple Jab!\nHit 3 times for ")
    )));
}

#[test]
fn test_multi_hit_spell_with_no_hits_still_strikes_once() {
    let data = custom_data();
    let enemy = data.bestiary.create_enemy("scarecrow").unwrap();
    let mut battle = Battle::with_rng(
        data,
        apprentice(&["flail"]),
        vec![enemy],
        Vec::new(),
        ChaCha8Rng::seed_from_u64(12345),
    );

    battle.handle_input(BattleInput::Down);
    battle.handle_input(BattleInput::Confirm);
    battle.handle_input(BattleInput::Confirm);

    assert!(battle.enemies()[0].record().hp() < 5000);
    let events = battle.drain_events();
    assert!(events.iter().any(|event| matches!(
        event,
        BattleEvent::CombatLog(line) if line.starts_with("Cast Flail!\nHit 1 times for ")
    )));
}

#[test]
fn test_status_spell_lands_and_wears_off() {
    let data = custom_data();
    let enemy = data.bestiary.create_enemy("scarecrow").unwrap();
    let mut battle = Battle::with_rng(
        data,
        apprentice(&["nap"]),
        vec![enemy],
        Vec::new(),
        ChaCha8Rng::seed_from_u64(12345),
    );

    battle.handle_input(BattleInput::Down);
    battle.handle_input(BattleInput::Confirm);
    battle.handle_input(BattleInput::Confirm);

    // Applied for 2, ticked once at the end of the enemy turn
    let statuses = &battle.enemies()[0].record().status_effects;
    assert_eq!(statuses.remaining("asleep"), Some(1));
    // Status spells do no damage
    assert_eq!(battle.enemies()[0].record().hp(), 5000);

    battle.handle_input(BattleInput::Confirm); // Attack
    assert!(!battle.enemies()[0].record().has_status_effect("asleep"));
}

#[test]
fn test_missing_reinforcement_type_is_ignored() {
    let data = custom_data();
    let enemy = data.bestiary.create_enemy("lonely_bat").unwrap();
    let mut battle = Battle::with_rng(
        data,
        apprentice(&[]),
        vec![enemy],
        Vec::new(),
        ChaCha8Rng::seed_from_u64(12345),
    );

    battle.handle_input(BattleInput::Confirm);

    assert_eq!(battle.enemies().len(), 1);
    assert_eq!(battle.state_tag(), StateTag::MainMenu);
}

#[test]
fn test_items_menu_groups_custom_consumables() {
    let data = custom_data();
    let mut player = apprentice(&[]);
    player.record_mut().set_hp(100);
    for _ in 0..2 {
        player.inventory.add_item(data.items.create_item("snack").unwrap());
    }
    let enemy = data.bestiary.create_enemy("scarecrow").unwrap();
    let mut battle = Battle::with_rng(
        data,
        player,
        vec![enemy],
        Vec::new(),
        ChaCha8Rng::seed_from_u64(12345),
    );

    battle.handle_input(BattleInput::Down);
    battle.handle_input(BattleInput::Down);
    battle.handle_input(BattleInput::Confirm);
    battle.handle_input(BattleInput::Confirm); // Snack x2

    assert_eq!(battle.player().inventory.count("snack"), 1);
    assert_eq!(battle.state_tag(), StateTag::MainMenu);
    assert!(battle
        .drain_events()
        .contains(&BattleEvent::CombatLog("Used Snack! Recovered 5 HP!".to_string())));
}
