//! Entry actions of the resolving states.

use super::events::{BattleEvent, Sound};
use super::state::Transition;
use super::Battle;
use crate::catalog::{Item, ItemKind, SpellDefinition, SpellKind};
use crate::combat::{
    roll_ally_action, roll_chance, roll_enemy_magic, roll_enemy_melee, roll_enemy_ranged,
    roll_escape, roll_magic_damage, roll_melee, roll_multi_hit, spell_heal_amount, AllyAction,
    AttackKind, Attribute, Enemy, EnemyStrike, ALLY_IDLE_LINE_COUNT, DUO_DEFEAT,
};
use crate::constants::*;
use crate::ui::combat_effects::{EffectAnchor, VisualEffect};
use rand::Rng;
use std::sync::Arc;

const ALLY_IDLE_LINES: [&str; ALLY_IDLE_LINE_COUNT] = [
    "takes a sip of beer.",
    "stumbles and misses a turn.",
    "burps loudly.",
    "argues with a ghost.",
    "forgets where they are.",
];

/// Who landed the finishing blow. Only the player's kills roll loot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KillCause {
    Player,
    Ally,
}

impl<R: Rng> Battle<R> {
    /// Appends a line to the on-screen message and the combat log.
    pub(super) fn narrate(&mut self, line: impl Into<String>) {
        let line = line.into();
        if !self.message.is_empty() {
            self.message.push('\n');
        }
        self.message.push_str(&line);
        self.events.push(BattleEvent::CombatLog(line));
    }

    /// Replaces the on-screen message.
    pub(super) fn announce(&mut self, text: String) {
        self.message = text.clone();
        self.events.push(BattleEvent::CombatLog(text));
    }

    fn sound(&mut self, sound: Sound) {
        self.events.push(BattleEvent::Sound(sound));
    }

    /// Target indices are re-checked before every resolver: a stale index
    /// falls back to the last enemy, and no enemies means nothing to hit.
    fn resolve_target(&self, target: usize) -> Option<usize> {
        let last = self.enemies.len().checked_sub(1)?;
        Some(target.min(last))
    }

    fn after_player_action(&self) -> Transition {
        if self.enemies.is_empty() {
            Transition::Victory
        } else {
            Transition::AllyTurn
        }
    }

    pub(super) fn resolve_player_attack(&mut self, target: usize) -> Transition {
        self.message.clear();
        let Some(target) = self.resolve_target(target) else {
            return Transition::Victory;
        };

        let strength = self.player.attribute(Attribute::Strength);
        let luck = self.player.attribute(Attribute::Luck);
        let defense = self.enemies[target].record().get_attribute(Attribute::Defense);
        let result = roll_melee(strength, self.player.level, defense, luck, &mut self.rng);

        self.enemies[target].record_mut().take_damage(result.damage);
        self.effects
            .add(VisualEffect::flash(MELEE_FLASH_COLOR, MELEE_FLASH_SECONDS));
        self.effects.add(VisualEffect::damage_number(
            result.damage,
            EffectAnchor::Enemy(target),
            0,
            MELEE_NUMBER_COLOR,
        ));

        let name = self.enemies[target].name().to_string();
        tracing::debug!(target = %name, damage = result.damage, crit = result.is_crit, "player melee");
        let prefix = if result.is_crit { "Critical Hit! " } else { "" };
        self.narrate(format!("{prefix}You attack {name} for {} damage!", result.damage));
        self.sound(Sound::Attack);

        self.settle_hit(target, true)
    }

    pub(super) fn resolve_magic_attack(&mut self, target: usize, spell_id: &str) -> Transition {
        self.message.clear();
        let data = Arc::clone(&self.data);
        let Some(spell) = data.spells.get(spell_id) else {
            tracing::warn!(spell = %spell_id, "cast of unknown spell skipped");
            return self.after_player_action();
        };
        if spell.kind == SpellKind::Healing {
            if self.player.record_mut().spend_mp(spell.cost) {
                self.cast_healing(spell);
            }
            return self.after_player_action();
        }
        let Some(target) = self.resolve_target(target) else {
            return Transition::Victory;
        };
        if !self.player.record_mut().spend_mp(spell.cost) {
            tracing::warn!(spell = %spell_id, "spell reached resolution without enough MP");
            self.narrate("Not enough MP!");
            return Transition::AllyTurn;
        }

        let strength = self.player.attribute(Attribute::Strength);
        let enemy_name = self.enemies[target].name().to_string();
        let damaging = match spell.kind {
            SpellKind::Damage => {
                let damage = roll_magic_damage(spell.power, strength, &mut self.rng);
                self.enemies[target].record_mut().take_damage(damage);
                self.effects
                    .add(VisualEffect::flash(MAGIC_FLASH_COLOR, MAGIC_FLASH_SECONDS));
                self.effects.add(VisualEffect::damage_number(
                    damage,
                    EffectAnchor::Enemy(target),
                    0,
                    MAGIC_NUMBER_COLOR,
                ));
                self.narrate(format!(
                    "Cast {} on {enemy_name} for {damage} damage!",
                    spell.name
                ));
                true
            }
            SpellKind::Status => {
                match spell.effect.as_deref() {
                    Some(effect) if roll_chance(spell.chance, &mut self.rng) => {
                        self.enemies[target]
                            .record_mut()
                            .apply_status_effect(effect, spell.duration);
                        self.narrate(format!("Cast {}! {enemy_name} is {effect}!", spell.name));
                    }
                    _ => self.narrate(format!("Cast {}! But it failed!", spell.name)),
                }
                false
            }
            SpellKind::MultiHit => {
                self.cast_multi_hit(spell, target, strength);
                true
            }
            SpellKind::Healing => false,
        };
        self.sound(Sound::Magic);

        self.settle_hit(target, damaging)
    }

    fn cast_multi_hit(&mut self, spell: &SpellDefinition, target: usize, strength: u32) {
        let defense = self.enemies[target].record().get_attribute(Attribute::Defense);
        let hits = roll_multi_hit(strength, spell.multiplier, defense, spell.hits, &mut self.rng);
        let mut total = 0u32;
        for &damage in &hits {
            self.enemies[target].record_mut().take_damage(damage);
            total = total.saturating_add(damage);
            let scatter = self.rng.gen_range(-MULTI_HIT_SCATTER..=MULTI_HIT_SCATTER);
            self.effects
                .add(VisualEffect::flash(MULTI_HIT_COLOR, MULTI_HIT_FLASH_SECONDS));
            self.effects.add(VisualEffect::damage_number(
                damage,
                EffectAnchor::Enemy(target),
                scatter,
                MULTI_HIT_COLOR,
            ));
        }
        self.narrate(format!(
            "Cast {}!\nHit {} times for {total} total damage!",
            spell.name,
            hits.len()
        ));
    }

    pub(super) fn cast_healing(&mut self, spell: &SpellDefinition) {
        let amount = spell_heal_amount(spell.power, self.player.level);
        self.player.record_mut().heal(amount);
        self.effects.add(VisualEffect::damage_number(
            amount,
            EffectAnchor::Player,
            0,
            MAGIC_NUMBER_COLOR,
        ));
        self.narrate(format!("Cast {}! Recovered {amount} HP!", spell.name));
        self.sound(Sound::Magic);
    }

    pub(super) fn resolve_item_attack(&mut self, target: usize, item_name: &str) -> Transition {
        self.message.clear();
        let Some(target) = self.resolve_target(target) else {
            return Transition::Victory;
        };
        let Some(item) = self.player.inventory.take_usable_by_name(item_name) else {
            tracing::warn!(item = %item_name, "item used up before it could be thrown");
            return Transition::AllyTurn;
        };
        if item.kind != ItemKind::Damage {
            self.use_item_on_self(item);
            return self.after_player_action();
        }

        let damage = item.power.max(1);
        self.enemies[target].record_mut().take_damage(damage);
        self.effects.add(VisualEffect::damage_number(
            damage,
            EffectAnchor::Enemy(target),
            0,
            ITEM_NUMBER_COLOR,
        ));
        let enemy_name = self.enemies[target].name().to_string();
        self.narrate(format!("Used {} on {enemy_name} for {damage} damage!", item.name));

        self.settle_hit(target, true)
    }

    /// Applies a healing or MP item to the player.
    pub(super) fn use_item_on_self(&mut self, item: Item) {
        match item.kind {
            ItemKind::Healing => {
                self.player.record_mut().heal(item.power);
                self.narrate(format!("Used {}! Recovered {} HP!", item.name, item.power));
                self.sound(Sound::Drink);
            }
            ItemKind::RestoreMp => {
                self.player.record_mut().restore_mp(item.power);
                self.narrate(format!("Used {}! Recovered {} MP!", item.name, item.power));
                self.sound(Sound::Drink);
            }
            _ => {
                tracing::warn!(item = %item.id, "item has no use on the player");
                self.player.inventory.add_item(item);
            }
        }
    }

    pub(super) fn resolve_run(&mut self) -> Option<Transition> {
        self.message.clear();
        let agility = self.player.attribute(Attribute::Agility);
        if roll_escape(agility, &mut self.rng) {
            self.narrate("Escaped successfully!");
            self.active = false;
            tracing::debug!("player escaped");
            None
        } else {
            self.narrate("Can't escape!");
            Some(Transition::AllyTurn)
        }
    }

    /// Reactions and defeat handling shared by every player action.
    fn settle_hit(&mut self, target: usize, damaging: bool) -> Transition {
        if !self.enemies[target].is_alive() {
            self.defeat_enemy(target, KillCause::Player);
        } else if damaging {
            self.react_to_hit(target);
        }
        self.after_player_action()
    }

    fn react_to_hit(&mut self, target: usize) {
        let name = self.enemies[target].name().to_string();
        let abilities = self.enemies[target].abilities.clone();

        if let Some(heal) = abilities.heal_on_hit {
            if roll_chance(heal.chance, &mut self.rng) {
                self.enemies[target].record_mut().heal(heal.amount);
                self.narrate(format!(
                    "{name} radiates a faint glow and heals for {} HP!",
                    heal.amount
                ));
            }
        }

        if let Some(call) = abilities.call_for_help {
            let wounded = self.enemies[target].record().hp_ratio() < call.hp_threshold;
            if wounded
                && self.enemies.len() < MAX_ENEMIES
                && roll_chance(call.chance, &mut self.rng)
            {
                match self.data.bestiary.create_enemy(&call.enemy_type) {
                    Some(reinforcement) => {
                        self.enemies.push(reinforcement);
                        self.narrate(format!("{name} calls for help!"));
                    }
                    None => tracing::warn!(
                        enemy_type = %call.enemy_type,
                        "reinforcement type missing from bestiary"
                    ),
                }
            }
        }
    }

    fn defeat_enemy(&mut self, index: usize, cause: KillCause) {
        let enemy = self.enemies.remove(index);
        self.rewards
            .add(enemy.record().xp_reward, enemy.record().gold_reward);
        self.events.push(BattleEvent::EnemyKilled {
            type_tag: enemy.type_tag.clone(),
        });
        tracing::debug!(enemy = %enemy.type_tag, ?cause, "enemy defeated");

        match cause {
            KillCause::Player => {
                self.narrate(format!("{} defeated!", enemy.name()));
                self.roll_loot(&enemy);
            }
            KillCause::Ally => self.narrate(format!("{} was knocked out!", enemy.name())),
        }
    }

    fn roll_loot(&mut self, enemy: &Enemy) {
        let mut dropped = Vec::new();
        for entry in &enemy.loot {
            if !roll_chance(entry.chance, &mut self.rng) {
                continue;
            }
            match self.data.items.create_item(&entry.item) {
                Some(item) => {
                    dropped.push(item.name.clone());
                    self.rewards.items.push(item.id.clone());
                    self.player.inventory.add_item(item);
                }
                None => tracing::warn!(item = %entry.item, "loot item missing from catalog"),
            }
        }
        if !dropped.is_empty() {
            self.narrate(format!("Dropped {}!", dropped.join(", ")));
        }
    }

    /// Each living ally acts once. Waits for confirmation only if one acted.
    pub(super) fn resolve_ally_turn(&mut self) -> Option<Transition> {
        if self.allies.is_empty() {
            return Some(Transition::EnemyTurn);
        }

        let mut acted = false;
        for index in 0..self.allies.len() {
            if self.enemies.is_empty() {
                break;
            }
            if !self.allies[index].is_alive() {
                continue;
            }
            let name = self.allies[index].name.clone();
            match roll_ally_action(self.enemies.len(), &mut self.rng) {
                AllyAction::Idle { line } => {
                    let line = ALLY_IDLE_LINES.get(line).unwrap_or(&ALLY_IDLE_LINES[0]);
                    self.narrate(format!("{name} {line}"));
                }
                AllyAction::TossDrink => {
                    self.player.record_mut().heal(ALLY_HEAL_AMOUNT);
                    let hero = self.player.name().to_string();
                    self.narrate(format!(
                        "{name} tosses a cold one to the {hero}! Healed {ALLY_HEAL_AMOUNT} HP!"
                    ));
                    self.sound(Sound::Drink);
                }
                AllyAction::Whiff => self.narrate(format!("{name} swings wildly at thin air!")),
                AllyAction::Brawl { target, damage } => {
                    self.enemies[target].record_mut().take_damage(damage);
                    self.effects.add(VisualEffect::damage_number(
                        damage,
                        EffectAnchor::Enemy(target),
                        0,
                        MELEE_NUMBER_COLOR,
                    ));
                    let enemy_name = self.enemies[target].name().to_string();
                    self.narrate(format!(
                        "{name} drunkenly brawls with {enemy_name} for {damage} damage!"
                    ));
                    if !self.enemies[target].is_alive() {
                        self.defeat_enemy(target, KillCause::Ally);
                    }
                }
            }
            acted = true;
        }

        if self.enemies.is_empty() {
            return Some(Transition::Victory);
        }
        if !acted {
            return Some(Transition::EnemyTurn);
        }
        None
    }

    /// Every living enemy acts in order; the round ends with a status tick.
    pub(super) fn resolve_enemy_turn(&mut self) -> Transition {
        for actor in 0..self.enemies.len() {
            if !self.enemies[actor].is_alive() {
                continue;
            }
            let mut multiplier = 1.0;
            if let Some(script) = self.enemies[actor].script {
                let outcome = script.pre_attack(
                    actor,
                    &mut self.enemies,
                    self.player.record_mut(),
                    &mut self.rng,
                );
                for line in outcome.narration {
                    self.narrate(line);
                }
                if outcome.skip_attack {
                    continue;
                }
                multiplier = outcome.damage_multiplier;
            }

            self.enemy_attack(actor, multiplier);
            if !self.player.is_alive() {
                tracing::debug!("player defeated");
                return Transition::Defeat;
            }
        }

        self.tick_statuses();
        Transition::MainMenu
    }

    fn enemy_attack(&mut self, actor: usize, multiplier: f64) {
        let enemy = &self.enemies[actor];
        let name = enemy.name().to_string();
        let kind = enemy.attack_kind;
        let strength = enemy.record().get_attribute(Attribute::Strength);
        let intelligence = enemy.record().get_attribute(Attribute::Intelligence);
        let daze = enemy.abilities.daze_on_attack.clone();
        let player_defense = self.player.attribute(Attribute::Defense);

        let strike = match kind {
            AttackKind::Melee => roll_enemy_melee(strength, multiplier, player_defense, &mut self.rng),
            AttackKind::Ranged => {
                roll_enemy_ranged(strength, multiplier, player_defense, &mut self.rng)
            }
            AttackKind::Magic => roll_enemy_magic(intelligence, multiplier, &mut self.rng),
        };

        let mut damage = strike.damage();
        match strike {
            EnemyStrike::Melee { .. } => {
                self.narrate(format!("{name} attacks for {damage} damage!"));
            }
            EnemyStrike::Ranged { damage: Some(_) } => {
                self.narrate(format!("{name} fires an arrow! Deals {damage} damage!"));
                self.sound(Sound::Hit);
            }
            EnemyStrike::Ranged { damage: None } => {
                self.narrate(format!("{name} fires an arrow but misses!"));
            }
            EnemyStrike::Magic { spell, .. } => {
                let spell_name = self
                    .data
                    .spells
                    .get(spell)
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| spell.to_string());
                self.narrate(format!("{name} casts {spell_name}! Deals {damage} magic damage!"));
                self.sound(Sound::Magic);
            }
        }

        if damage > 0
            && self.player.inventory.has_equipped(LUCKY_CAP_ID)
            && roll_chance(LUCKY_CAP_NEGATE_CHANCE, &mut self.rng)
        {
            self.player.record_mut().heal(LUCKY_CAP_HEAL);
            self.narrate(format!(
                "Daryl's Lucky Cap absorbs the blow! Healed {LUCKY_CAP_HEAL} HP!"
            ));
            damage = 0;
        }

        if damage > 0 {
            self.player.record_mut().take_damage(damage);
            self.effects
                .add(VisualEffect::flash(ENEMY_HIT_COLOR, ENEMY_FLASH_SECONDS));
            self.effects.add(VisualEffect::damage_number(
                damage,
                EffectAnchor::Player,
                0,
                ENEMY_HIT_COLOR,
            ));
            tracing::debug!(enemy = %name, ?kind, damage, "enemy hit player");
        }

        if let Some(daze) = daze {
            if roll_chance(daze.chance, &mut self.rng) {
                self.player
                    .record_mut()
                    .apply_status_effect(DAZED_STATUS, daze.duration);
                self.narrate(format!("You are dazed by {name}'s attack!"));
                self.events.push(BattleEvent::SystemLog(format!(
                    "Player is dazed for {} turns.",
                    daze.duration
                )));
            }
        }
    }

    fn tick_statuses(&mut self) {
        self.player.record_mut().tick_statuses();
        for ally in &mut self.allies {
            ally.record.tick_statuses();
        }
        for enemy in &mut self.enemies {
            enemy.record_mut().tick_statuses();
        }
    }

    /// Pays out the accumulated rewards and levels the player up.
    pub(super) fn resolve_victory(&mut self) {
        let mut text = String::new();
        if self.duo_encounter {
            text.push_str(DUO_DEFEAT);
            text.push('\n');
        }
        text.push_str(&format!(
            "All enemies defeated!\nGained {} XP and {} Gold!\nPress Enter to continue.",
            self.rewards.xp, self.rewards.gold
        ));

        self.player.xp = self.player.xp.saturating_add(self.rewards.xp);
        self.player.gold = self.player.gold.saturating_add(self.rewards.gold);
        while self.player.can_level_up() {
            self.player.level_up();
            let level = self.player.level;
            text.push_str(&format!("\nLevel Up! Now Level {level}!"));
            self.events
                .push(BattleEvent::SystemLog(format!("Level Up! reached level {level}")));
        }
        tracing::debug!(
            xp = self.rewards.xp,
            gold = self.rewards.gold,
            level = self.player.level,
            "victory"
        );
        self.announce(text);
    }
}
