use crate::catalog::{Item, ItemKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquipmentSlot {
    Weapon,
    Armor,
    Accessory,
}

impl EquipmentSlot {
    /// Slot an item of `kind` goes into, if it is wearable.
    pub fn for_kind(kind: ItemKind) -> Option<Self> {
        match kind {
            ItemKind::Weapon => Some(EquipmentSlot::Weapon),
            ItemKind::Armor => Some(EquipmentSlot::Armor),
            ItemKind::Accessory => Some(EquipmentSlot::Accessory),
            _ => None,
        }
    }
}

/// Worn items. Equipment grants no stat bonus in battle; only specific
/// accessories are consulted by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Option<Item>,
    pub armor: Option<Item>,
    pub accessory: Option<Item>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipmentSlot) -> &Option<Item> {
        match slot {
            EquipmentSlot::Weapon => &self.weapon,
            EquipmentSlot::Armor => &self.armor,
            EquipmentSlot::Accessory => &self.accessory,
        }
    }

    pub fn set(&mut self, slot: EquipmentSlot, item: Option<Item>) -> Option<Item> {
        let current = match slot {
            EquipmentSlot::Weapon => &mut self.weapon,
            EquipmentSlot::Armor => &mut self.armor,
            EquipmentSlot::Accessory => &mut self.accessory,
        };
        std::mem::replace(current, item)
    }

    pub fn iter_equipped(&self) -> impl Iterator<Item = &Item> {
        [&self.weapon, &self.armor, &self.accessory]
            .into_iter()
            .filter_map(|item| item.as_ref())
    }
}

/// One line of the battle item menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemGroup {
    pub name: String,
    pub count: usize,
}

/// Carried items plus equipment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<Item>,
    pub equipment: Equipment,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Removes the most recently added item with `id`.
    pub fn remove_item(&mut self, id: &str) -> Option<Item> {
        let index = self.items.iter().rposition(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn count(&self, id: &str) -> usize {
        self.items.iter().filter(|item| item.id == id).count()
    }

    /// Moves a carried item into its slot, returning whatever it replaced
    /// to the bag. Returns false if the item is missing or not wearable.
    pub fn equip(&mut self, id: &str) -> bool {
        let Some(slot) = self
            .items
            .iter()
            .find(|item| item.id == id)
            .and_then(|item| EquipmentSlot::for_kind(item.kind))
        else {
            return false;
        };
        let Some(item) = self.remove_item(id) else {
            return false;
        };
        if let Some(previous) = self.equipment.set(slot, Some(item)) {
            self.items.push(previous);
        }
        true
    }

    pub fn has_equipped(&self, id: &str) -> bool {
        self.equipment.iter_equipped().any(|item| item.id == id)
    }

    /// Battle-usable consumables grouped by display name, first-seen order.
    pub fn usable_groups(&self) -> Vec<ItemGroup> {
        let mut groups: Vec<ItemGroup> = Vec::new();
        for item in self.items.iter().filter(|item| item.kind.is_battle_usable()) {
            match groups.iter_mut().find(|group| group.name == item.name) {
                Some(group) => group.count += 1,
                None => groups.push(ItemGroup {
                    name: item.name.clone(),
                    count: 1,
                }),
            }
        }
        groups
    }

    /// The battle-usable item `take_usable_by_name` would remove next.
    pub fn peek_usable_by_name(&self, name: &str) -> Option<&Item> {
        self.items
            .iter()
            .rev()
            .find(|item| item.name == name && item.kind.is_battle_usable())
    }

    /// Removes the most recently added battle-usable item shown as `name`.
    pub fn take_usable_by_name(&mut self, name: &str) -> Option<Item> {
        let index = self
            .items
            .iter()
            .rposition(|item| item.name == name && item.kind.is_battle_usable())?;
        Some(self.items.remove(index))
    }
}
