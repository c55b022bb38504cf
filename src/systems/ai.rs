//! AI decision-making for non-player entities.
//!
//! Decisions read the current state only; the turn scheduler applies them one
//! entity at a time, so an earlier mover can block a later one.

use hecs::Entity;
use rand::Rng;

use crate::components::{Behavior, Creature, EntityKind, Health, Position, Stats};
use crate::constants::*;
use crate::engine::GameState;
use crate::fov::has_line_of_sight;

/// What an entity does with its turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiAction {
    Idle,
    /// A hurt ally is near; the healer holds position
    HealerCue,
    RangedAttack { damage: i32 },
    MeleeAttack { damage: i32 },
    MoveTo(Position),
}

/// Decide the action of one live entity.
pub fn decide_action(state: &GameState, entity: Entity, rng: &mut impl Rng) -> AiAction {
    let Ok(creature) = state.world.get::<&Creature>(entity) else {
        return AiAction::Idle;
    };
    if !creature.acts() {
        return AiAction::Idle;
    }
    let behavior = creature.behavior;
    drop(creature);

    let (Some(pos), Ok(stats)) = (state.position_of(entity), state.world.get::<&Stats>(entity).map(|s| *s)) else {
        return AiAction::Idle;
    };
    let player_pos = state.player.position;
    let player_def = state.player.effective.def;
    let dist = pos.distance(&player_pos);

    if behavior == Behavior::Healer && hurt_ally_nearby(state, entity, pos) {
        return AiAction::HealerCue;
    }

    if behavior == Behavior::Ranged
        && dist < RANGED_ATTACK_RANGE
        && dist > 1.0
        && has_line_of_sight(&state.grid, pos, player_pos)
        && rng.gen::<f64>() > RANGED_SHOT_CHANCE
    {
        return AiAction::RangedAttack {
            damage: (stats.str - player_def).max(1),
        };
    }

    if dist <= MELEE_RANGE {
        let jitter = rng.gen_range(-1..=1);
        return AiAction::MeleeAttack {
            damage: (stats.str - player_def + jitter).max(1),
        };
    }

    if dist < AGGRO_RANGE {
        if let Some(step) = chase_step(state, pos, player_pos) {
            return AiAction::MoveTo(step);
        }
    }
    AiAction::Idle
}

/// Another live Enemy below max hp closer than the support range.
fn hurt_ally_nearby(state: &GameState, healer: Entity, pos: Position) -> bool {
    state.live_entities().any(|other| {
        if other == healer || state.kind_of(other) != Some(EntityKind::Enemy) {
            return false;
        }
        let hurt = state
            .world
            .get::<&Health>(other)
            .map(|h| h.is_damaged())
            .unwrap_or(false);
        hurt && state
            .position_of(other)
            .is_some_and(|p| pos.distance(&p) < HEALER_SUPPORT_RANGE)
    })
}

/// Greedy step toward the target: diagonal first, then x only, then y only.
fn chase_step(state: &GameState, pos: Position, target: Position) -> Option<Position> {
    let dx = (target.x - pos.x).signum();
    let dy = (target.y - pos.y).signum();
    [(dx, dy), (dx, 0), (0, dy)]
        .into_iter()
        .filter(|&(x, y)| (x, y) != (0, 0))
        .map(|(x, y)| pos.offset(x, y))
        .find(|next| can_enter(state, *next))
}

fn can_enter(state: &GameState, pos: Position) -> bool {
    state.grid.is_walkable(pos.x, pos.y) && pos != state.player.position && state.entity_at(pos).is_none()
}
