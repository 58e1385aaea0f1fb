use super::spells::neutral;
use super::{parse_table, CatalogError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Healing,
    RestoreMp,
    Damage,
    Weapon,
    Armor,
    Accessory,
    #[default]
    Misc,
}

impl ItemKind {
    /// Consumables the item menu offers during battle.
    pub fn is_battle_usable(&self) -> bool {
        matches!(self, ItemKind::Healing | ItemKind::RestoreMp | ItemKind::Damage)
    }
}

/// Immutable item template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    #[serde(skip)]
    pub id: String,
    #[serde(default = "unknown_item")]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ItemKind,
    #[serde(default)]
    pub power: u32,
    #[serde(default = "neutral")]
    pub element: String,
    #[serde(default)]
    pub description: String,
}

fn unknown_item() -> String {
    "Unknown Item".to_string()
}

/// A possessed item. Consumables are removed from the inventory on use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    pub power: u32,
}

impl From<&ItemDefinition> for Item {
    fn from(def: &ItemDefinition) -> Self {
        Self {
            id: def.id.clone(),
            name: def.name.clone(),
            kind: def.kind,
            power: def.power,
        }
    }
}

/// Item definitions keyed by id. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: BTreeMap<String, ItemDefinition>,
}

impl ItemCatalog {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let mut items: BTreeMap<String, ItemDefinition> = parse_table("items", json)?;
        for (id, item) in items.iter_mut() {
            item.id = id.clone();
        }
        Ok(Self { items })
    }

    pub fn get(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    /// Creates a fresh inventory instance of `id`.
    pub fn create_item(&self, id: &str) -> Option<Item> {
        self.get(id).map(Item::from)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_item_copies_definition() {
        let catalog =
            ItemCatalog::from_json(r#"{"potion": {"name": "Potion", "type": "healing", "power": 30}}"#)
                .unwrap();
        let potion = catalog.create_item("potion").unwrap();
        assert_eq!(potion.id, "potion");
        assert_eq!(potion.power, 30);
        assert!(potion.kind.is_battle_usable());
        assert!(catalog.create_item("elixir").is_none());
    }

    #[test]
    fn test_equipment_is_not_battle_usable() {
        assert!(!ItemKind::Weapon.is_battle_usable());
        assert!(!ItemKind::Accessory.is_battle_usable());
        assert!(!ItemKind::Misc.is_battle_usable());
        assert!(ItemKind::RestoreMp.is_battle_usable());
    }
}
