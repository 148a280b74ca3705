use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::attributes::Attribute;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum EquipmentSlot {
    Weapon,
    Armor,
    Accessory,
    Mount,
}

string_enum!(EquipmentSlot, "equipment slot", {
    Weapon => "weapon",
    Armor => "armor",
    Accessory => "accessory",
    Mount => "mount",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Rarity {
    Common,
    Rare,
    Legendary,
}

string_enum!(Rarity, "rarity", {
    Common => "common",
    Rare => "rare",
    Legendary => "legendary",
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentRequirements {
    #[serde(default)]
    pub min_city_count: Option<u32>,
    /// Only granted by a specific scripted event, never by random drops.
    #[serde(default)]
    pub event_only: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: String,
    pub name: String,
    pub slot: EquipmentSlot,
    pub rarity: Rarity,
    #[serde(default)]
    pub attribute_bonus: BTreeMap<Attribute, i32>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: EquipmentRequirements,
}

impl Equipment {
    /// Whether a random drop may hand this item to someone holding `cities` cities.
    pub fn obtainable_with(&self, cities: u32) -> bool {
        if self.requirements.event_only {
            return false;
        }
        self.requirements
            .min_city_count
            .is_none_or(|min| cities >= min)
    }
}

/// Items worn in each slot. Equipping into an occupied slot replaces the item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Loadout(BTreeMap<EquipmentSlot, Equipment>);

impl Loadout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `item` into its slot, returning whatever it displaced.
    pub fn equip(&mut self, item: Equipment) -> Option<Equipment> {
        self.0.insert(item.slot, item)
    }

    pub fn get(&self, slot: EquipmentSlot) -> Option<&Equipment> {
        self.0.get(&slot)
    }

    pub fn items(&self) -> impl Iterator<Item = &Equipment> {
        self.0.values()
    }

    /// Total bonus for one attribute across all worn items.
    pub fn bonus(&self, attr: Attribute) -> i32 {
        self.items()
            .filter_map(|item| item.attribute_bonus.get(&attr))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, slot: EquipmentSlot, bonus: &[(Attribute, i32)]) -> Equipment {
        Equipment {
            id: id.to_string(),
            name: id.to_string(),
            slot,
            rarity: Rarity::Common,
            attribute_bonus: bonus.iter().copied().collect(),
            description: String::new(),
            requirements: EquipmentRequirements::default(),
        }
    }

    #[test]
    fn equip_replaces_same_slot() {
        let mut loadout = Loadout::new();
        assert!(loadout.equip(item("spear", EquipmentSlot::Weapon, &[])).is_none());
        let old = loadout.equip(item("halberd", EquipmentSlot::Weapon, &[]));
        assert_eq!(old.map(|e| e.id), Some("spear".to_string()));
        assert_eq!(loadout.items().count(), 1);
    }

    #[test]
    fn bonus_sums_across_slots() {
        let mut loadout = Loadout::new();
        loadout.equip(item("blade", EquipmentSlot::Weapon, &[(Attribute::Strength, 8)]));
        loadout.equip(item(
            "horse",
            EquipmentSlot::Mount,
            &[(Attribute::Strength, 2), (Attribute::Leadership, 4)],
        ));
        assert_eq!(loadout.bonus(Attribute::Strength), 10);
        assert_eq!(loadout.bonus(Attribute::Leadership), 4);
        assert_eq!(loadout.bonus(Attribute::Charisma), 0);
    }

    #[test]
    fn requirements_gate_random_drops() {
        let mut seal = item("seal", EquipmentSlot::Accessory, &[]);
        seal.requirements.min_city_count = Some(5);
        assert!(!seal.obtainable_with(4));
        assert!(seal.obtainable_with(5));
        seal.requirements.event_only = true;
        assert!(!seal.obtainable_with(10));
    }
}
