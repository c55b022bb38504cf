//! The player record: a single instance owned by the run.
//!
//! The player lives outside the ECS world; it has a fixed-size inventory,
//! three typed equipment slots, a spell list and the set of unlocked skill nodes.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::components::{EquipSlot, Item, ItemId, ItemType, Position, Stats};
use crate::constants::*;
use crate::profile::Upgrades;
use crate::systems::skills::ROOT_SKILL;
use crate::systems::spells::SpellId;
use crate::systems::stats::{recompute_effective_stats, EffectiveStats};

/// Player class, chosen at run start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerClass {
    Warrior,
    Rogue,
    Mage,
}

/// Starting values of a class
pub struct ClassKit {
    pub stats: Stats,
    pub hp: i32,
    pub mana: i32,
    /// Generated at depth 1 with the given type
    pub start_items: &'static [ItemType],
    pub start_spells: &'static [SpellId],
}

impl PlayerClass {
    pub const ALL: [PlayerClass; 3] = [PlayerClass::Warrior, PlayerClass::Rogue, PlayerClass::Mage];

    pub fn kit(&self) -> ClassKit {
        match self {
            PlayerClass::Warrior => ClassKit {
                stats: Stats::new(6, 3, 6, 1),
                hp: 25,
                mana: 10,
                start_items: &[ItemType::Weapon, ItemType::Armor],
                start_spells: &[],
            },
            PlayerClass::Rogue => ClassKit {
                stats: Stats::new(4, 7, 4, 2),
                hp: 18,
                mana: 15,
                start_items: &[ItemType::Weapon, ItemType::Armor],
                start_spells: &[SpellId::Blink],
            },
            PlayerClass::Mage => ClassKit {
                stats: Stats::new(2, 3, 3, 7),
                hp: 15,
                mana: 30,
                start_items: &[ItemType::Weapon, ItemType::Armor],
                start_spells: &[SpellId::Fireball],
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PlayerClass::Warrior => "Warrior",
            PlayerClass::Rogue => "Rogue",
            PlayerClass::Mage => "Mage",
        }
    }
}

/// Weapon, armor and accessory slots
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Option<Item>,
    pub armor: Option<Item>,
    pub accessory: Option<Item>,
}

impl Equipment {
    pub fn get(&self, slot: EquipSlot) -> Option<&Item> {
        match slot {
            EquipSlot::Weapon => self.weapon.as_ref(),
            EquipSlot::Armor => self.armor.as_ref(),
            EquipSlot::Accessory => self.accessory.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, slot: EquipSlot) -> &mut Option<Item> {
        match slot {
            EquipSlot::Weapon => &mut self.weapon,
            EquipSlot::Armor => &mut self.armor,
            EquipSlot::Accessory => &mut self.accessory,
        }
    }

    /// Equipped items in slot order
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        [&self.weapon, &self.armor, &self.accessory]
            .into_iter()
            .filter_map(|slot| slot.as_ref())
    }

    pub fn find(&self, id: ItemId) -> Option<EquipSlot> {
        EquipSlot::ALL
            .into_iter()
            .find(|slot| self.get(*slot).is_some_and(|item| item.id == id))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub position: Position,
    pub hp: i32,
    /// Base max hp, before equipment
    pub max_hp: i32,
    pub mana: i32,
    /// Base max mana, before equipment
    pub max_mana: i32,
    pub xp: u32,
    pub level: u32,
    pub skill_points: u32,
    pub xp_multiplier: f32,
    pub class: PlayerClass,
    /// Base attributes
    pub stats: Stats,
    /// Crit chance granted by skills
    pub bonus_crit: i32,
    pub inventory: Vec<Option<Item>>,
    pub equipment: Equipment,
    /// Known spells, in learn order
    pub spells: Vec<SpellId>,
    pub unlocked_skills: BTreeSet<String>,
    pub cosmetic: String,
    /// Cached result of the last `refresh_stats`
    pub effective: EffectiveStats,
}

impl Player {
    /// Fresh level-1 player of the given class with permanent upgrades applied.
    /// Starting items are generated by the engine.
    pub fn new(class: PlayerClass, upgrades: &Upgrades, cosmetic: &str) -> Self {
        let kit = class.kit();
        let mut stats = kit.stats;
        stats.str += upgrades.start_str as i32;
        stats.dex += upgrades.start_dex as i32;
        stats.int += upgrades.start_int as i32;
        let max_hp = kit.hp + upgrades.start_hp as i32;

        let mut player = Self {
            position: Position::new(1, 1),
            hp: max_hp,
            max_hp,
            mana: kit.mana,
            max_mana: kit.mana,
            xp: 0,
            level: 1,
            skill_points: 0,
            xp_multiplier: 1.0,
            class,
            stats,
            bonus_crit: 0,
            inventory: vec![None; MAX_INVENTORY],
            equipment: Equipment::default(),
            spells: kit.start_spells.to_vec(),
            unlocked_skills: BTreeSet::from([ROOT_SKILL.to_string()]),
            cosmetic: cosmetic.to_string(),
            effective: EffectiveStats::default(),
        };
        player.refresh_stats();
        player
    }

    /// Recompute effective stats and clamp hp/mana to the new caps.
    pub fn refresh_stats(&mut self) {
        self.effective = recompute_effective_stats(self);
        self.hp = self.hp.clamp(0, self.effective.max_hp);
        self.mana = self.mana.clamp(0, self.effective.max_mana);
    }

    /// Heal up to effective max hp. Returns the amount actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp + amount.max(0)).min(self.effective.max_hp);
        self.hp - before
    }

    pub fn restore_mana(&mut self, amount: i32) -> i32 {
        let before = self.mana;
        self.mana = (self.mana + amount.max(0)).min(self.effective.max_mana);
        self.mana - before
    }

    /// Apply damage, never below zero.
    pub fn take_damage(&mut self, amount: i32) {
        self.hp = (self.hp - amount).max(0);
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    pub fn knows_spell(&self, spell: SpellId) -> bool {
        self.spells.contains(&spell)
    }

    pub fn has_skill(&self, node: &str) -> bool {
        self.unlocked_skills.contains(node)
    }

    pub fn first_empty_slot(&self) -> Option<usize> {
        self.inventory.iter().position(|slot| slot.is_none())
    }

    pub fn inventory_index(&self, id: ItemId) -> Option<usize> {
        self.inventory
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|item| item.id == id))
    }

    pub fn inventory_count(&self) -> usize {
        self.inventory.iter().filter(|slot| slot.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_starts() {
        let mage = Player::new(PlayerClass::Mage, &Upgrades::default(), "default");
        assert_eq!(mage.hp, 15);
        assert_eq!(mage.mana, 30);
        assert_eq!(mage.spells, vec![SpellId::Fireball]);
        assert!(mage.has_skill(ROOT_SKILL));
        assert_eq!(mage.inventory.len(), MAX_INVENTORY);

        let warrior = Player::new(PlayerClass::Warrior, &Upgrades::default(), "default");
        assert!(warrior.spells.is_empty());
    }

    #[test]
    fn test_upgrades_apply() {
        let upgrades = Upgrades {
            start_hp: 2,
            start_str: 1,
            start_int: 0,
            start_dex: 3,
        };
        let player = Player::new(PlayerClass::Warrior, &upgrades, "golden_king");
        assert_eq!(player.max_hp, 27);
        assert_eq!(player.hp, 27);
        assert_eq!(player.stats.str, 7);
        assert_eq!(player.stats.dex, 6);
        assert_eq!(player.cosmetic, "golden_king");
    }

    #[test]
    fn test_refresh_clamps() {
        let mut player = Player::new(PlayerClass::Warrior, &Upgrades::default(), "default");
        player.max_hp = 10;
        player.max_mana = 3;
        player.refresh_stats();
        assert_eq!(player.hp, 10);
        assert_eq!(player.mana, 3);
    }

    #[test]
    fn test_heal_clamps_to_max() {
        let mut player = Player::new(PlayerClass::Warrior, &Upgrades::default(), "default");
        player.take_damage(4);
        assert_eq!(player.heal(100), 4);
        assert_eq!(player.hp, 25);
        player.take_damage(100);
        assert_eq!(player.hp, 0);
        assert!(player.is_dead());
    }
}
