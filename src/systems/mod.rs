//! Game systems organized by domain.
//!
//! This module contains all game logic systems, split into focused submodules:
//! - `ai`: enemy decision-making
//! - `combat`: damage, kills and their rewards
//! - `effects`: status effect application and ticking
//! - `experience`: XP and leveling
//! - `inventory`: pickup, equipment and consumables
//! - `item_gen`: random item generation
//! - `skills`: skill tree data and unlocking
//! - `spells`: spell catalog and resolution
//! - `stats`: effective stat derivation

pub mod ai;
pub mod combat;
pub mod effects;
pub mod experience;
pub mod inventory;
pub mod item_gen;
pub mod skills;
pub mod spells;
pub mod stats;

// Re-export commonly used items
pub use combat::{deal_damage, weapon_damage};
pub use effects::{apply_status_effect, tick_effects};
pub use experience::{xp_for_level, xp_progress};
pub use item_gen::generate_item;
pub use skills::{unlock_skill, SkillEffect, SkillNode, SKILL_TREE};
pub use spells::{Spell, SpellId, SpellShape};
pub use stats::{recompute_effective_stats, EffectiveStats};
