use super::inventory::Inventory;
use crate::catalog::GameData;
use crate::combat::{Attribute, CombatRecord, Combatant, Faction, Stats};
use crate::constants::*;
use serde::{Deserialize, Serialize};

/// The hero: a combatant plus progression, purse, spells and bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub combatant: Combatant,
    pub level: u32,
    pub xp: u64,
    pub xp_to_next: u64,
    pub gold: u64,
    pub known_spells: Vec<String>,
    pub inventory: Inventory,
}

impl Player {
    pub fn new(name: impl Into<String>, record: CombatRecord) -> Self {
        Self {
            combatant: Combatant::new(name, Faction::Player, record),
            level: 1,
            xp: 0,
            xp_to_next: STARTING_XP_TO_NEXT,
            gold: 0,
            known_spells: Vec::new(),
            inventory: Inventory::new(),
        }
    }

    /// A level 1 hero with the starting spells and kit.
    pub fn hero(data: &GameData) -> Self {
        let record = CombatRecord::new(HERO_MAX_HP, HERO_MAX_MP, Stats::from_array(HERO_STATS));
        let mut player = Self::new("Hero", record);
        player.known_spells = HERO_SPELLS.iter().map(|id| id.to_string()).collect();
        for id in HERO_ITEMS {
            match data.items.create_item(id) {
                Some(item) => player.inventory.add_item(item),
                None => tracing::warn!(item = id, "starting item missing from catalog"),
            }
        }
        player
    }

    pub fn name(&self) -> &str {
        &self.combatant.name
    }

    pub fn record(&self) -> &CombatRecord {
        &self.combatant.record
    }

    pub fn record_mut(&mut self) -> &mut CombatRecord {
        &mut self.combatant.record
    }

    pub fn attribute(&self, attr: Attribute) -> u32 {
        self.record().get_attribute(attr)
    }

    pub fn is_alive(&self) -> bool {
        self.combatant.is_alive()
    }

    pub fn can_level_up(&self) -> bool {
        self.xp >= self.xp_to_next
    }

    /// Advances one level. Surplus xp carries over.
    pub fn level_up(&mut self) {
        self.level += 1;
        self.xp = self.xp.saturating_sub(self.xp_to_next);
        self.xp_to_next = ((self.xp_to_next as f64 * XP_CURVE_MULTIPLIER) as u64).max(1);

        let record = self.record_mut();
        record.stats.grow(LEVEL_UP_STAT_GROWTH);
        record.grow_and_refill(LEVEL_UP_HP_GROWTH, LEVEL_UP_MP_GROWTH);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_player() -> Player {
        Player::new("Hero", CombatRecord::new(50, 20, Stats::new(5, 3, 4, 3)))
    }

    #[test]
    fn test_new_player_starts_at_level_one() {
        let player = create_test_player();
        assert_eq!(player.level, 1);
        assert_eq!(player.xp_to_next, 100);
        assert_eq!(player.combatant.faction, Faction::Player);
        assert!(!player.can_level_up());
    }

    #[test]
    fn test_level_up_grows_and_refills() {
        let mut player = create_test_player();
        player.record_mut().take_damage(30);
        player.record_mut().spend_mp(10);
        player.xp = 130;

        player.level_up();

        assert_eq!(player.level, 2);
        assert_eq!(player.xp, 30);
        assert_eq!(player.xp_to_next, 150);
        assert_eq!(player.record().stats.as_array(), [7, 5, 6, 4]);
        assert_eq!(player.record().max_hp(), 60);
        assert_eq!(player.record().hp(), 60);
        assert_eq!(player.record().max_mp(), 25);
        assert_eq!(player.record().mp(), 25);
    }

    #[test]
    fn test_hero_has_starting_kit() {
        let data = GameData::embedded().unwrap();
        let hero = Player::hero(&data);
        assert_eq!(hero.record().max_hp(), 50);
        assert_eq!(hero.known_spells, vec!["heal", "fireball"]);
        assert_eq!(hero.inventory.count("potion"), 3);
        assert_eq!(hero.inventory.count("ether"), 1);
    }
}
