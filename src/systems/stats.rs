//! Effective stat derivation: base stats plus everything equipped.

use serde::{Deserialize, Serialize};

use crate::components::{ItemStat, Stats};
use crate::constants::*;
use crate::player::Player;

/// Derived combat stats, recomputed after every equipment or base-stat change
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveStats {
    /// Base attributes with item attribute bonuses folded in
    pub stats: Stats,
    pub max_hp: i32,
    pub max_mana: i32,
    pub crit: i32,
    pub def: i32,
    pub weapon_dmg: i32,
    pub mana_regen: i32,
}

/// Pure derivation from the player's base record and equipped items.
pub fn recompute_effective_stats(player: &Player) -> EffectiveStats {
    let mut stats = player.stats;
    let mut bonus_hp = 0;
    let mut bonus_mana = 0;
    let mut bonus_crit = 0;
    let mut def = 0;
    let mut weapon_dmg = 0;

    for item in player.equipment.iter() {
        for (&stat, &value) in &item.stats {
            if let Some(kind) = stat.base_stat() {
                stats.add(kind, value);
                continue;
            }
            match stat {
                ItemStat::Hp => bonus_hp += value,
                ItemStat::Mana => bonus_mana += value,
                ItemStat::Crit => bonus_crit += value,
                ItemStat::Def => def += value,
                ItemStat::Dmg => weapon_dmg += value,
                _ => {}
            }
        }
    }

    EffectiveStats {
        stats,
        max_hp: player.max_hp + bonus_hp,
        max_mana: player.max_mana + bonus_mana,
        crit: BASE_CRIT_CHANCE + stats.dex.div_euclid(2) + bonus_crit + player.bonus_crit,
        def,
        weapon_dmg,
        mana_regen: BASE_MANA_REGEN + stats.int.div_euclid(MANA_REGEN_INT_DIVISOR),
    }
}
