//! Enemy attack kinds and reactive abilities, observed through whole rounds.

use quest_battle::battle::{Battle, BattleEvent, BattleInput, Sound, StateTag};
use quest_battle::catalog::GameData;
use quest_battle::character::Player;
use quest_battle::combat::{AttackKind, CombatRecord, DazeOnAttack, Enemy, HealOnHit, Stats};
use rand::rngs::mock::StepRng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

fn create_test_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(12345)
}

fn game_data() -> Arc<GameData> {
    Arc::new(GameData::embedded().unwrap())
}

fn post(max_hp: u32, strength: u32) -> Enemy {
    Enemy::new(
        "post",
        "Post",
        CombatRecord::new(max_hp, 0, Stats::new(strength, 0, 1, 1)),
    )
}

fn sturdy_hero() -> Player {
    Player::new("Hero", CombatRecord::new(100_000, 20, Stats::new(5, 3, 4, 3)))
}

fn combat_log(events: &[BattleEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            BattleEvent::CombatLog(line) => Some(line.clone()),
            _ => None,
        })
        .collect()
}

/// Leading number after `marker` in the first log line containing it.
fn number_after(log: &[String], marker: &str) -> Option<u32> {
    let line = log.iter().find(|line| line.contains(marker))?;
    let rest = &line[line.find(marker)? + marker.len()..];
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

#[test]
fn test_lucky_cap_negates_hit_and_heals_one() {
    let data = game_data();
    let mut player = Player::hero(&data);
    player
        .inventory
        .add_item(data.items.create_item("daryls_lucky_cap").unwrap());
    assert!(player.inventory.equip("daryls_lucky_cap"));
    player.record_mut().set_hp(40);

    // A zero roll passes every chance check, including the 5% negation.
    let mut battle = Battle::with_rng(
        data,
        player,
        vec![post(100_000, 3)],
        Vec::new(),
        StepRng::new(0, 0),
    );
    battle.handle_input(BattleInput::Confirm);

    assert_eq!(battle.state_tag(), StateTag::MainMenu);
    assert_eq!(battle.player().record().hp(), 41);
    let log = combat_log(&battle.drain_events());
    assert!(log
        .iter()
        .any(|line| line == "Daryl's Lucky Cap absorbs the blow! Healed 1 HP!"));
}

#[test]
fn test_cap_without_luck_does_not_negate() {
    let data = game_data();
    let mut player = Player::hero(&data);
    player
        .inventory
        .add_item(data.items.create_item("daryls_lucky_cap").unwrap());
    assert!(player.inventory.equip("daryls_lucky_cap"));

    let mut negations = 0;
    let mut hits = 0;
    for seed in 0..300 {
        let mut battle = Battle::with_rng(
            Arc::clone(&data),
            player.clone(),
            vec![post(100_000, 3)],
            Vec::new(),
            ChaCha8Rng::seed_from_u64(seed),
        );
        battle.handle_input(BattleInput::Confirm);
        let log = combat_log(&battle.drain_events());
        if log.iter().any(|line| line.contains("absorbs the blow")) {
            negations += 1;
            assert_eq!(battle.player().record().hp(), 50);
        } else {
            hits += 1;
            let damage = number_after(&log, "Post attacks for ").unwrap();
            assert_eq!(battle.player().record().hp(), 50 - damage);
        }
    }
    assert!(negations > 0 && hits > negations * 5, "{negations} of 300 negated");
}

#[test]
fn test_heal_on_hit_recovers_after_player_hit() {
    let data = game_data();
    let mut enemy = post(1000, 1);
    enemy.record_mut().set_hp(500);
    enemy.abilities.heal_on_hit = Some(HealOnHit {
        chance: 1.0,
        amount: 5,
    });
    let mut battle = Battle::with_rng(
        data,
        sturdy_hero(),
        vec![enemy],
        Vec::new(),
        create_test_rng(),
    );

    battle.handle_input(BattleInput::Confirm);

    let log = combat_log(&battle.drain_events());
    let dealt = number_after(&log, "You attack Post for ").unwrap();
    assert!(log
        .iter()
        .any(|line| line == "Post radiates a faint glow and heals for 5 HP!"));
    assert_eq!(battle.enemies()[0].record().hp(), 500 - dealt + 5);
}

#[test]
fn test_daze_on_attack_sets_status_that_ticks() {
    let data = game_data();
    let mut enemy = post(100_000, 4);
    enemy.abilities.daze_on_attack = Some(DazeOnAttack {
        chance: 1.0,
        duration: 2,
    });
    let mut battle = Battle::with_rng(
        data,
        sturdy_hero(),
        vec![enemy],
        Vec::new(),
        create_test_rng(),
    );

    battle.handle_input(BattleInput::Confirm);

    let events = battle.drain_events();
    let log = combat_log(&events);
    let damage = number_after(&log, "Post attacks for ").unwrap();
    assert_eq!(battle.player().record().hp(), 100_000 - damage);
    assert!(log.iter().any(|line| line == "You are dazed by Post's attack!"));
    assert!(events.contains(&BattleEvent::SystemLog(
        "Player is dazed for 2 turns.".to_string()
    )));
    // Applied for 2, then the end-of-round tick
    let statuses = &battle.player().record().status_effects;
    assert_eq!(statuses.remaining("dazed"), Some(1));
}

#[test]
fn test_ranged_attacks_hit_and_miss() {
    let data = game_data();
    let mut hit_seen = false;
    let mut miss_seen = false;

    for seed in 0..200 {
        let mut archer = post(100_000, 5);
        archer.attack_kind = AttackKind::Ranged;
        let mut battle = Battle::with_rng(
            Arc::clone(&data),
            sturdy_hero(),
            vec![archer],
            Vec::new(),
            ChaCha8Rng::seed_from_u64(seed),
        );
        battle.handle_input(BattleInput::Confirm);

        let events = battle.drain_events();
        let log = combat_log(&events);
        let hp = battle.player().record().hp();
        if log.iter().any(|line| line == "Post fires an arrow but misses!") {
            miss_seen = true;
            assert_eq!(hp, 100_000);
        } else {
            hit_seen = true;
            let damage = number_after(&log, "Post fires an arrow! Deals ").unwrap();
            assert!(damage >= 1);
            assert_eq!(hp, 100_000 - damage);
            assert!(events.contains(&BattleEvent::Sound(Sound::Hit)));
        }
    }
    assert!(hit_seen && miss_seen);
}

#[test]
fn test_magic_attack_ignores_defense_and_names_spell() {
    let data = game_data();
    let mut wizard = Enemy::new(
        "post",
        "Post",
        CombatRecord::new(100_000, 0, Stats::new(1, 0, 1, 1)).with_intelligence(8),
    );
    wizard.attack_kind = AttackKind::Magic;
    let mut battle = Battle::with_rng(
        data,
        sturdy_hero(),
        vec![wizard],
        Vec::new(),
        create_test_rng(),
    );

    battle.handle_input(BattleInput::Confirm);

    let events = battle.drain_events();
    let log = combat_log(&events);
    // 8 * 2 * 1.5
    assert!(log.iter().any(|line| {
        line == "Post casts Fireball! Deals 24 magic damage!"
            || line == "Post casts Ice Bolt! Deals 24 magic damage!"
    }));
    assert_eq!(battle.player().record().hp(), 100_000 - 24);
    assert!(events.contains(&BattleEvent::Sound(Sound::Magic)));
}
