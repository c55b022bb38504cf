//! Combat system functions: damage application, kills, and their rewards.

use hecs::Entity;
use log::info;
use rand::Rng;

use crate::components::{Creature, EntityKind, GroundItem, Health, Position, Rank};
use crate::constants::*;
use crate::engine::{GameState, TerminalState};
use crate::events::{DamageKind, GameEvent};
use crate::systems::experience::award_xp;
use crate::systems::item_gen::generate_item;
use crate::systems::skills::{LIFE_ON_KILL_SKILL, MANA_ON_KILL_SKILL};
use crate::systems::stats::EffectiveStats;

/// Roll a weapon hit from effective stats. Returns (damage, crit).
pub fn weapon_damage(stats: &EffectiveStats, rng: &mut impl Rng) -> (i32, bool) {
    let base = (stats.stats.str + stats.weapon_dmg + rng.gen_range(WEAPON_ROLL_MIN..=WEAPON_ROLL_MAX)).max(1);
    let crit = rng.gen_range(0.0..100.0) < stats.crit as f32;
    if crit {
        ((base as f32 * CRIT_MULTIPLIER).floor() as i32, true)
    } else {
        (base, false)
    }
}

/// Damage an Enemy or Dummy. Weapon attacks roll their own damage and ignore `amount`.
///
/// Returns the damage dealt, or `None` when the target cannot take damage.
pub fn deal_damage(
    state: &mut GameState,
    target: Entity,
    amount: i32,
    weapon_attack: bool,
    kind: DamageKind,
    rng: &mut impl Rng,
) -> Option<i32> {
    let target_kind = state.kind_of(target).filter(|k| k.is_targetable())?;
    let id = state.id_of(target)?;

    let (damage, crit) = if weapon_attack {
        weapon_damage(&state.player.effective, rng)
    } else {
        (amount, false)
    };

    let dead = {
        let mut health = state.world.get::<&mut Health>(target).ok()?;
        match target_kind {
            // Training target: clamp at zero, no rewards
            EntityKind::Dummy => health.current = (health.current - damage).max(0),
            _ => health.current -= damage,
        }
        health.is_dead()
    };

    if target_kind == EntityKind::Enemy {
        state.run_stats.damage_dealt += damage.max(0) as u32;
    }
    let name = state.name_of(target);
    state.emit(GameEvent::EntityDamaged {
        entity: id,
        name,
        amount: damage,
        crit,
        kind,
    });

    if dead {
        handle_death(state, target, rng);
    }
    Some(damage)
}

/// Resolve a creature whose hp reached zero: dummies just vanish, enemies pay out.
pub fn handle_death(state: &mut GameState, entity: Entity, rng: &mut impl Rng) {
    match state.kind_of(entity) {
        Some(EntityKind::Enemy) => resolve_kill(state, entity, rng),
        Some(EntityKind::Dummy) => {
            announce_death(state, entity);
            state.despawn(entity);
        }
        _ => {}
    }
}

fn announce_death(state: &mut GameState, entity: Entity) {
    let (Some(id), Some(position)) = (state.id_of(entity), state.position_of(entity)) else {
        return;
    };
    let name = state.name_of(entity);
    state.emit(GameEvent::EntityDied { entity: id, name, position });
}

/// Full kill path: counters, essence, kill feats, loot, XP, despawn, victory.
pub fn resolve_kill(state: &mut GameState, entity: Entity, rng: &mut impl Rng) {
    let Ok(creature) = state.world.get::<&Creature>(entity).map(|c| (*c).clone()) else {
        return;
    };
    let position = state.position_of(entity).unwrap_or(Position::new(0, 0));
    info!("{} slain on depth {}", creature.name, state.depth);

    state.run_stats.kills += 1;
    announce_death(state, entity);

    let essence = match creature.rank {
        Rank::Warden => WARDEN_ESSENCE,
        Rank::Overlord => OVERLORD_ESSENCE,
        Rank::Normal => 0,
    };
    if essence > 0 {
        state.run_stats.essence += essence;
        state.emit(GameEvent::EssenceGained { amount: essence });
    }

    if state.player.has_skill(LIFE_ON_KILL_SKILL) {
        let amount = state.player.heal(LIFE_ON_KILL);
        state.emit(GameEvent::PlayerHealed { amount });
    }
    if state.player.has_skill(MANA_ON_KILL_SKILL) {
        let amount = state.player.restore_mana(MANA_ON_KILL);
        state.emit(GameEvent::ManaRestored { amount });
    }

    if rng.gen::<f64>() < LOOT_DROP_CHANCE {
        let id = state.ids.item();
        let item = generate_item(state.depth, None, id, rng);
        state.emit(GameEvent::ItemDropped {
            item: item.id,
            name: item.name.clone(),
            position,
        });
        state.ground_items.push(GroundItem { position, item });
    }

    state.despawn(entity);
    award_xp(state, creature.xp_reward);

    if creature.rank == Rank::Overlord {
        state.set_terminal(TerminalState::Victory);
    }
}
