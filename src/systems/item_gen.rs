//! Random item generation, parameterized by depth and a rarity roll.

use std::collections::BTreeMap;

use rand::Rng;

use crate::components::{Item, ItemId, ItemStat, ItemType, Rarity};
use crate::constants::*;

/// A name fragment that adds a stat bonus
pub struct Affix {
    pub name: &'static str,
    pub stat: ItemStat,
    pub value: i32,
}

pub const PREFIXES: [Affix; 5] = [
    Affix { name: "Sharp", stat: ItemStat::Str, value: 2 },
    Affix { name: "Heavy", stat: ItemStat::Con, value: 2 },
    Affix { name: "Arcane", stat: ItemStat::Int, value: 2 },
    Affix { name: "Swift", stat: ItemStat::Dex, value: 2 },
    Affix { name: "Jagged", stat: ItemStat::Crit, value: 5 },
];

pub const SUFFIXES: [Affix; 5] = [
    Affix { name: "of the Bear", stat: ItemStat::Str, value: 3 },
    Affix { name: "of the Owl", stat: ItemStat::Int, value: 3 },
    Affix { name: "of the Tiger", stat: ItemStat::Dex, value: 3 },
    Affix { name: "of the Whale", stat: ItemStat::Hp, value: 20 },
    Affix { name: "of the Void", stat: ItemStat::Mana, value: 20 },
];

/// Map a uniform roll in [0, 1) to a rarity tier.
pub fn rarity_for_roll(roll: f64) -> Rarity {
    if roll > LEGENDARY_ROLL {
        Rarity::Legendary
    } else if roll > EPIC_ROLL {
        Rarity::Epic
    } else if roll > RARE_ROLL {
        Rarity::Rare
    } else if roll > UNCOMMON_ROLL {
        Rarity::Uncommon
    } else {
        Rarity::Common
    }
}

pub fn roll_rarity(rng: &mut impl Rng) -> Rarity {
    rarity_for_roll(rng.gen::<f64>())
}

pub fn roll_item_type(rng: &mut impl Rng) -> ItemType {
    if rng.gen::<f64>() < CONSUMABLE_CHANCE {
        return ItemType::Consumable;
    }
    match rng.gen_range(0..3) {
        0 => ItemType::Weapon,
        1 => ItemType::Armor,
        _ => ItemType::Accessory,
    }
}

/// `floor((depth * 2 + 2) * multiplier)`, non-decreasing in rarity.
pub fn item_power(depth: u32, rarity: Rarity) -> i32 {
    let base = ITEM_BASE_POWER + ITEM_POWER_PER_DEPTH * depth as i32;
    (base as f64 * rarity.multiplier()).floor() as i32
}

pub fn potion_heal(depth: u32, rarity: Rarity) -> i32 {
    (POTION_BASE_HEAL + depth as f64 * POTION_HEAL_PER_DEPTH * rarity.multiplier()).floor() as i32
}

/// Affix bonuses scale with `ceil(depth / 2)`.
fn affix_scale(depth: u32) -> i32 {
    depth.div_ceil(2) as i32
}

fn base_name(item_type: ItemType) -> &'static str {
    match item_type {
        ItemType::Weapon => "Sword",
        ItemType::Armor => "Tunic",
        ItemType::Accessory => "Ring",
        ItemType::Consumable => "Health Potion",
    }
}

/// Generate a random item. `forced` pins the type (class start kits).
pub fn generate_item(depth: u32, forced: Option<ItemType>, id: ItemId, rng: &mut impl Rng) -> Item {
    let item_type = forced.unwrap_or_else(|| roll_item_type(rng));
    let rarity = roll_rarity(rng);
    build_item(depth, item_type, rarity, id, rng)
}

/// Build an item of a known type and rarity; only the affixes are random.
pub fn build_item(depth: u32, item_type: ItemType, rarity: Rarity, id: ItemId, rng: &mut impl Rng) -> Item {
    let power = item_power(depth, rarity);

    if item_type == ItemType::Consumable {
        let heal = potion_heal(depth, rarity);
        return Item {
            id,
            name: base_name(item_type).to_string(),
            item_type,
            rarity,
            item_power: heal,
            stats: BTreeMap::from([(ItemStat::Hp, heal)]),
            description: format!("Restores {} Health.", heal),
        };
    }

    let mut stats = BTreeMap::new();
    match item_type {
        ItemType::Weapon => {
            stats.insert(ItemStat::Dmg, power);
        }
        ItemType::Armor => {
            stats.insert(ItemStat::Def, power);
            stats.insert(ItemStat::Hp, power * 2);
        }
        _ => {
            stats.insert(ItemStat::Int, power / 2);
            stats.insert(ItemStat::Mana, power * 3);
            stats.insert(ItemStat::Crit, power / 3);
        }
    }

    let base = base_name(item_type);
    let name = if rarity == Rarity::Common {
        format!("Old {}", base)
    } else {
        let scale = affix_scale(depth);
        let prefix = &PREFIXES[rng.gen_range(0..PREFIXES.len())];
        *stats.entry(prefix.stat).or_insert(0) += prefix.value * scale;
        let mut name = format!("{} {}", prefix.name, base);

        if rarity.has_suffix() {
            let suffix = &SUFFIXES[rng.gen_range(0..SUFFIXES.len())];
            *stats.entry(suffix.stat).or_insert(0) += suffix.value * scale;
            name = format!("{} {}", name, suffix.name);
        }
        name
    };

    Item {
        id,
        name,
        item_type,
        rarity,
        item_power: power,
        stats,
        description: format!("Lvl {} Item. Power: {}", depth, power),
    }
}
