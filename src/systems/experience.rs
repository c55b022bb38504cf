//! Experience and leveling system.

use log::info;

use crate::constants::*;
use crate::engine::GameState;
use crate::events::GameEvent;
use crate::player::Player;

/// XP needed to reach the next level
pub fn xp_for_level(level: u32) -> u32 {
    level * XP_PER_LEVEL_MULTIPLIER
}

/// Calculate XP progress toward next level (0.0 to 1.0)
pub fn xp_progress(player: &Player) -> f32 {
    player.xp as f32 / xp_for_level(player.level) as f32
}

/// Add XP, handling any number of level ups. Returns each level reached.
///
/// Every level grants a skill point and base max hp, then refills hp.
pub fn grant_xp(player: &mut Player, amount: u32) -> Vec<u32> {
    player.xp += amount;
    let mut reached = Vec::new();
    while player.xp >= xp_for_level(player.level) {
        player.xp -= xp_for_level(player.level);
        player.level += 1;
        player.skill_points += 1;
        player.max_hp += LEVEL_UP_MAX_HP;
        player.refresh_stats();
        player.hp = player.effective.max_hp;
        reached.push(player.level);
    }
    reached
}

/// Award a kill reward scaled by the player's XP multiplier.
pub fn award_xp(state: &mut GameState, base: u32) {
    let amount = (base as f32 * state.player.xp_multiplier).floor() as u32;
    if amount == 0 {
        return;
    }
    state.emit(GameEvent::XpGained { amount });
    for new_level in grant_xp(&mut state.player, amount) {
        info!("player reached level {}", new_level);
        state.emit(GameEvent::LevelUp { new_level });
    }
}
