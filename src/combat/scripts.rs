//! Scripted pre-attack behaviour for named bosses.

use super::math::roll_chance;
use super::record::{Attribute, CombatRecord};
use super::types::{Enemy, ScriptedBehavior};
use crate::constants::*;
use rand::Rng;

/// Opening banter when the duo appears together.
pub const DUO_INTRO: &str = "Daryl: 'Well, I'll be. Lookie here, George. Looks like a pilgrim who's lost their way.'\nGeorge: 'Bawk! Squawk! Ya gotta be quicker than that, partner!'";

/// Closing banter once the duo has been beaten.
pub const DUO_DEFEAT: &str = "Daryl: 'Well, I'm tellin' ya, George, if you hadn't tripped over that third invisible iguana...'\nGeorge: 'Bawk! Don't blame the poultry, Daryl!'";

/// What a script decided for this enemy's turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptOutcome {
    /// Lines to append to the turn narration. May be empty.
    pub narration: Vec<String>,
    /// The script used the turn; no standard attack follows.
    pub skip_attack: bool,
    pub damage_multiplier: f64,
}

impl ScriptOutcome {
    fn attack(damage_multiplier: f64) -> Self {
        Self {
            narration: Vec::new(),
            skip_attack: false,
            damage_multiplier,
        }
    }

    fn skip(narration: Vec<String>) -> Self {
        Self {
            narration,
            skip_attack: true,
            damage_multiplier: 1.0,
        }
    }
}

impl ScriptedBehavior {
    /// Runs the script for the enemy at `actor` before its standard attack.
    pub fn pre_attack(
        self,
        actor: usize,
        enemies: &mut [Enemy],
        player: &mut CombatRecord,
        rng: &mut impl Rng,
    ) -> ScriptOutcome {
        match self {
            ScriptedBehavior::DarylLedeay => daryl_turn(actor, enemies, rng),
            ScriptedBehavior::ChickenGeorge => george_turn(actor, enemies, player, rng),
        }
    }
}

fn daryl_turn(actor: usize, enemies: &mut [Enemy], rng: &mut impl Rng) -> ScriptOutcome {
    let Some(daryl) = enemies.get_mut(actor) else {
        return ScriptOutcome::attack(1.0);
    };

    if roll_chance(TRIP_CHANCE, rng) {
        let record = daryl.record_mut();
        // A trip never finishes him off.
        let self_damage = ((record.max_hp() as f64 * TRIP_SELF_DAMAGE_RATIO) as u32)
            .min(record.hp().saturating_sub(1));
        record.take_damage(self_damage);
        return ScriptOutcome::skip(vec![
            format!(
                "{} trips over a garden gnome! Takes {} damage!",
                daryl.name(),
                self_damage
            ),
            "Daryl: 'Dang it! That wasn't supposed to happen!'".to_string(),
        ]);
    }

    if roll_chance(LUCKY_SWING_CHANCE, rng) {
        let mut outcome = ScriptOutcome::attack(LUCKY_SWING_MULTIPLIER);
        outcome.narration.push(format!(
            "{}: 'Woooo! See that, George? Musta been the new lucky socks!'",
            daryl.name()
        ));
        return outcome;
    }

    ScriptOutcome::attack(1.0)
}

fn george_turn(
    actor: usize,
    enemies: &mut [Enemy],
    player: &mut CombatRecord,
    rng: &mut impl Rng,
) -> ScriptOutcome {
    let name = match enemies.get(actor) {
        Some(george) => george.name().to_string(),
        None => return ScriptOutcome::attack(1.0),
    };

    if roll_chance(PITY_HEAL_CHANCE, rng) {
        let heal = (player.max_hp() as f64 * PITY_HEAL_RATIO) as u32;
        player.heal(heal);
        return ScriptOutcome::skip(vec![
            format!(
                "{} tosses a Mystery Energy Drink at you! Recovered {} HP!",
                name, heal
            ),
            "George: 'Aw, shucks. Looks like we gotta try harder.'".to_string(),
        ]);
    }

    if roll_chance(BUDDY_BUFF_CHANCE, rng) {
        let buddy = enemies
            .iter_mut()
            .enumerate()
            .find(|(i, e)| *i != actor && e.script == Some(ScriptedBehavior::DarylLedeay));
        if let Some((_, daryl)) = buddy {
            daryl
                .record_mut()
                .stats
                .add(Attribute::Defense, BUDDY_BUFF_DEFENSE);
            return ScriptOutcome::skip(vec![format!(
                "{} shares a cold one with Daryl! Daryl's Defense rose sharply!",
                name
            )]);
        }
    }

    ScriptOutcome::attack(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::record::Stats;
    use rand::rngs::mock::StepRng;

    fn duo() -> Vec<Enemy> {
        let mut daryl = Enemy::new("daryl_ledeay", "Daryl", CombatRecord::new(100, 0, Stats::new(8, 4, 3, 2)));
        daryl.script = Some(ScriptedBehavior::DarylLedeay);
        let mut george = Enemy::new("chicken_george", "George", CombatRecord::new(60, 0, Stats::new(5, 3, 6, 4)));
        george.script = Some(ScriptedBehavior::ChickenGeorge);
        vec![daryl, george]
    }

    fn player() -> CombatRecord {
        CombatRecord::new(100, 20, Stats::new(10, 5, 4, 3))
    }

    #[test]
    fn test_daryl_trip_skips_attack_and_spares_him() {
        // A zero roll passes every chance check.
        let mut rng = StepRng::new(0, 0);
        let mut enemies = duo();
        enemies[0].record_mut().set_hp(5);
        let mut hero = player();

        let outcome = ScriptedBehavior::DarylLedeay.pre_attack(0, &mut enemies, &mut hero, &mut rng);
        assert!(outcome.skip_attack);
        assert_eq!(enemies[0].record().hp(), 1);
        assert!(outcome.narration[0].contains("garden gnome"));
    }

    #[test]
    fn test_george_pity_heal() {
        let mut rng = StepRng::new(0, 0);
        let mut enemies = duo();
        let mut hero = player();
        hero.take_damage(50);

        let outcome = ScriptedBehavior::ChickenGeorge.pre_attack(1, &mut enemies, &mut hero, &mut rng);
        assert!(outcome.skip_attack);
        assert_eq!(hero.hp(), 65);
    }

    #[test]
    fn test_no_script_effect_on_high_rolls() {
        // Max rolls fail every check.
        let mut rng = StepRng::new(u64::MAX, 0);
        let mut enemies = duo();
        let mut hero = player();

        let daryl = ScriptedBehavior::DarylLedeay.pre_attack(0, &mut enemies, &mut hero, &mut rng);
        assert_eq!(daryl, ScriptOutcome::attack(1.0));
        let george = ScriptedBehavior::ChickenGeorge.pre_attack(1, &mut enemies, &mut hero, &mut rng);
        assert_eq!(george, ScriptOutcome::attack(1.0));
    }
}
