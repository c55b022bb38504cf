//! Skill tree: data-only nodes gated by parent and point cost.
//!
//! Every node except the root has exactly one parent. Node effects are plain
//! descriptors applied generically, so the tree itself carries no logic.

use serde::{Deserialize, Serialize};

use crate::components::StatKind;
use crate::error::Refusal;
use crate::player::Player;
use crate::systems::spells::SpellId;

pub const ROOT_SKILL: &str = "root";
/// Feat: heal on every kill
pub const LIFE_ON_KILL_SKILL: &str = "passive_vamp";
/// Feat: restore mana on every kill
pub const MANA_ON_KILL_SKILL: &str = "passive_mana";

/// One thing a skill node grants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillEffect {
    AddStat(StatKind, i32),
    /// Raises base max hp and current hp alike
    AddMaxHp(i32),
    /// Raises base max mana and current mana alike
    AddMaxMana(i32),
    AddCrit(i32),
    GrantSpell(SpellId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkillNode {
    pub id: &'static str,
    pub name: &'static str,
    pub cost: u32,
    pub parent: Option<&'static str>,
    pub effects: &'static [SkillEffect],
}

pub const SKILL_TREE: &[SkillNode] = &[
    SkillNode { id: ROOT_SKILL, name: "Awakening", cost: 0, parent: None, effects: &[] },
    // Might
    SkillNode {
        id: "str_1",
        name: "Might",
        cost: 1,
        parent: Some(ROOT_SKILL),
        effects: &[SkillEffect::AddStat(StatKind::Str, 2)],
    },
    SkillNode {
        id: "con_1",
        name: "Iron Skin",
        cost: 1,
        parent: Some("str_1"),
        effects: &[SkillEffect::AddStat(StatKind::Con, 2), SkillEffect::AddMaxHp(10)],
    },
    SkillNode {
        id: "spell_shield",
        name: "Barrier",
        cost: 3,
        parent: Some("con_1"),
        effects: &[SkillEffect::GrantSpell(SpellId::Shield)],
    },
    SkillNode {
        id: LIFE_ON_KILL_SKILL,
        name: "Vampirism",
        cost: 4,
        parent: Some("spell_shield"),
        effects: &[],
    },
    // Agility
    SkillNode {
        id: "dex_1",
        name: "Agility",
        cost: 1,
        parent: Some(ROOT_SKILL),
        effects: &[SkillEffect::AddStat(StatKind::Dex, 2)],
    },
    SkillNode {
        id: "crit_1",
        name: "Precision",
        cost: 2,
        parent: Some("dex_1"),
        effects: &[SkillEffect::AddStat(StatKind::Dex, 1), SkillEffect::AddCrit(5)],
    },
    SkillNode {
        id: "spell_blink",
        name: "Void Step",
        cost: 3,
        parent: Some("crit_1"),
        effects: &[SkillEffect::GrantSpell(SpellId::Blink)],
    },
    SkillNode {
        id: "spell_meteor",
        name: "Apocalypse",
        cost: 8,
        parent: Some("spell_blink"),
        effects: &[SkillEffect::GrantSpell(SpellId::Meteor), SkillEffect::AddMaxMana(50)],
    },
    // Intellect
    SkillNode {
        id: "int_1",
        name: "Intellect",
        cost: 1,
        parent: Some(ROOT_SKILL),
        effects: &[SkillEffect::AddStat(StatKind::Int, 2), SkillEffect::AddMaxMana(10)],
    },
    SkillNode {
        id: "spell_heal",
        name: "Divine Light",
        cost: 2,
        parent: Some("int_1"),
        effects: &[SkillEffect::GrantSpell(SpellId::Heal)],
    },
    SkillNode {
        id: "spell_chain",
        name: "Stormcaller",
        cost: 3,
        parent: Some("spell_heal"),
        effects: &[SkillEffect::GrantSpell(SpellId::Chain)],
    },
    SkillNode {
        id: MANA_ON_KILL_SKILL,
        name: "Soul Siphon",
        cost: 4,
        parent: Some("spell_chain"),
        effects: &[],
    },
];

pub fn find_node(id: &str) -> Option<&'static SkillNode> {
    SKILL_TREE.iter().find(|node| node.id == id)
}

/// Whether `unlock_skill` would succeed right now.
pub fn can_unlock(player: &Player, id: &str) -> Result<&'static SkillNode, Refusal> {
    let node = find_node(id).ok_or(Refusal::UnknownSkill)?;
    if player.has_skill(node.id) {
        return Err(Refusal::AlreadyUnlocked);
    }
    if let Some(parent) = node.parent {
        if !player.has_skill(parent) {
            return Err(Refusal::PrerequisiteLocked);
        }
    }
    if player.skill_points < node.cost {
        return Err(Refusal::NotEnoughSkillPoints);
    }
    Ok(node)
}

/// Apply one effect to the player. Stats are refreshed by the caller.
pub fn apply_effect(player: &mut Player, effect: &SkillEffect) {
    match *effect {
        SkillEffect::AddStat(kind, amount) => player.stats.add(kind, amount),
        SkillEffect::AddMaxHp(amount) => {
            player.max_hp += amount;
            player.hp += amount;
        }
        SkillEffect::AddMaxMana(amount) => {
            player.max_mana += amount;
            player.mana += amount;
        }
        SkillEffect::AddCrit(amount) => player.bonus_crit += amount,
        SkillEffect::GrantSpell(spell) => {
            if !player.knows_spell(spell) {
                player.spells.push(spell);
            }
        }
    }
}

/// Unlock a node: check prerequisites, apply effects, pay the cost.
pub fn unlock_skill(player: &mut Player, id: &str) -> Result<&'static SkillNode, Refusal> {
    let node = can_unlock(player, id)?;
    for effect in node.effects {
        apply_effect(player, effect);
    }
    player.skill_points -= node.cost;
    player.unlocked_skills.insert(node.id.to_string());
    player.refresh_stats();
    Ok(node)
}
