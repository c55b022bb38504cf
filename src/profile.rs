//! Meta progression kept between runs: void essence, permanent upgrades,
//! cosmetics and high scores.
//!
//! The profile is plain serde data. Storing it is the caller's business.

use std::collections::BTreeSet;

use log::info;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::engine::RunStats;
use crate::error::Refusal;

/// Permanent start bonuses, one point per level bought
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upgrades {
    pub start_hp: u32,
    pub start_str: u32,
    pub start_int: u32,
    pub start_dex: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeKind {
    StartHp,
    StartStr,
    StartInt,
    StartDex,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 4] = [
        UpgradeKind::StartHp,
        UpgradeKind::StartStr,
        UpgradeKind::StartInt,
        UpgradeKind::StartDex,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            UpgradeKind::StartHp => "Void Heart",
            UpgradeKind::StartStr => "Void Strength",
            UpgradeKind::StartInt => "Void Mind",
            UpgradeKind::StartDex => "Void Agility",
        }
    }

    fn base_cost(&self) -> u32 {
        match self {
            UpgradeKind::StartHp => UPGRADE_HP_BASE_COST,
            _ => UPGRADE_STAT_BASE_COST,
        }
    }
}

impl Upgrades {
    pub fn level(&self, kind: UpgradeKind) -> u32 {
        match kind {
            UpgradeKind::StartHp => self.start_hp,
            UpgradeKind::StartStr => self.start_str,
            UpgradeKind::StartInt => self.start_int,
            UpgradeKind::StartDex => self.start_dex,
        }
    }

    fn level_mut(&mut self, kind: UpgradeKind) -> &mut u32 {
        match kind {
            UpgradeKind::StartHp => &mut self.start_hp,
            UpgradeKind::StartStr => &mut self.start_str,
            UpgradeKind::StartInt => &mut self.start_int,
            UpgradeKind::StartDex => &mut self.start_dex,
        }
    }

    /// Essence price of the next level.
    pub fn cost(&self, kind: UpgradeKind) -> u32 {
        kind.base_cost() + self.level(kind) * UPGRADE_COST_PER_LEVEL
    }
}

/// A purchasable player look
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cosmetic {
    pub id: &'static str,
    pub name: &'static str,
    pub cost: u32,
}

pub const DEFAULT_COSMETIC: &str = "default";

pub const COSMETICS: [Cosmetic; 5] = [
    Cosmetic { id: DEFAULT_COSMETIC, name: "Wanderer", cost: 0 },
    Cosmetic { id: "red_phantom", name: "Crimson Ghost", cost: 150 },
    Cosmetic { id: "golden_king", name: "Golden King", cost: 500 },
    Cosmetic { id: "neon_runner", name: "Neon Runner", cost: 300 },
    Cosmetic { id: "void_walker", name: "Void Walker", cost: 1000 },
];

pub fn find_cosmetic(id: &str) -> Option<&'static Cosmetic> {
    COSMETICS.iter().find(|c| c.id == id)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScores {
    pub kills: u32,
    pub max_floor: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub void_essence: u32,
    pub high_scores: HighScores,
    pub upgrades: Upgrades,
    pub unlocked_cosmetics: BTreeSet<String>,
    pub selected_cosmetic: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            void_essence: 0,
            high_scores: HighScores::default(),
            upgrades: Upgrades::default(),
            unlocked_cosmetics: BTreeSet::from([DEFAULT_COSMETIC.to_string()]),
            selected_cosmetic: DEFAULT_COSMETIC.to_string(),
        }
    }
}

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    fn spend(&mut self, cost: u32) -> Result<(), Refusal> {
        if self.void_essence < cost {
            return Err(Refusal::NotEnoughEssence);
        }
        self.void_essence -= cost;
        Ok(())
    }

    /// Buy one level of an upgrade. Returns the new level.
    pub fn buy_upgrade(&mut self, kind: UpgradeKind) -> Result<u32, Refusal> {
        self.spend(self.upgrades.cost(kind))?;
        let level = self.upgrades.level_mut(kind);
        *level += 1;
        Ok(*level)
    }

    /// Buy a cosmetic. Owning it already costs nothing.
    pub fn unlock_cosmetic(&mut self, id: &str) -> Result<(), Refusal> {
        let cosmetic = find_cosmetic(id).ok_or(Refusal::UnknownCosmetic)?;
        if self.unlocked_cosmetics.contains(id) {
            return Ok(());
        }
        self.spend(cosmetic.cost)?;
        self.unlocked_cosmetics.insert(id.to_string());
        Ok(())
    }

    pub fn select_cosmetic(&mut self, id: &str) -> Result<(), Refusal> {
        if find_cosmetic(id).is_none() {
            return Err(Refusal::UnknownCosmetic);
        }
        if !self.unlocked_cosmetics.contains(id) {
            return Err(Refusal::CosmeticLocked);
        }
        self.selected_cosmetic = id.to_string();
        Ok(())
    }

    /// Fold a finished (or abandoned) run into the profile.
    pub fn bank_run(&mut self, stats: &RunStats) {
        self.void_essence += stats.essence;
        self.high_scores.kills = self.high_scores.kills.max(stats.kills);
        self.high_scores.max_floor = self.high_scores.max_floor.max(stats.max_floor);
        info!(
            "banked {} essence ({} total), {} kills, floor {}",
            stats.essence, self.void_essence, stats.kills, stats.max_floor
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upgrade_cost_grows_per_level() {
        let mut profile = Profile::new();
        profile.void_essence = 300;
        assert_eq!(profile.upgrades.cost(UpgradeKind::StartHp), 50);
        assert_eq!(profile.buy_upgrade(UpgradeKind::StartHp), Ok(1));
        assert_eq!(profile.upgrades.cost(UpgradeKind::StartHp), 100);
        assert_eq!(profile.buy_upgrade(UpgradeKind::StartStr), Ok(1));
        assert_eq!(profile.void_essence, 150);
        assert_eq!(profile.upgrades.cost(UpgradeKind::StartStr), 150);
    }

    #[test]
    fn test_upgrade_refused_without_essence() {
        let mut profile = Profile::new();
        profile.void_essence = 99;
        assert_eq!(profile.buy_upgrade(UpgradeKind::StartDex), Err(Refusal::NotEnoughEssence));
        assert_eq!(profile.void_essence, 99);
        assert_eq!(profile.upgrades, Upgrades::default());
    }

    #[test]
    fn test_cosmetics() {
        let mut profile = Profile::new();
        assert_eq!(profile.select_cosmetic("golden_king"), Err(Refusal::CosmeticLocked));
        assert_eq!(profile.unlock_cosmetic("nope"), Err(Refusal::UnknownCosmetic));
        assert_eq!(profile.unlock_cosmetic("red_phantom"), Err(Refusal::NotEnoughEssence));

        profile.void_essence = 200;
        profile.unlock_cosmetic("red_phantom").unwrap();
        profile.unlock_cosmetic("red_phantom").unwrap();
        assert_eq!(profile.void_essence, 50);
        profile.select_cosmetic("red_phantom").unwrap();
        assert_eq!(profile.selected_cosmetic, "red_phantom");
    }

    #[test]
    fn test_bank_run_keeps_best_scores() {
        let mut profile = Profile::new();
        profile.bank_run(&RunStats {
            kills: 12,
            damage_dealt: 300,
            max_floor: 5,
            essence: 10,
        });
        profile.bank_run(&RunStats {
            kills: 4,
            damage_dealt: 50,
            max_floor: 7,
            essence: 0,
        });
        assert_eq!(profile.void_essence, 10);
        assert_eq!(profile.high_scores, HighScores { kills: 12, max_floor: 7 });
    }
}
