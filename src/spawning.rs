//! Data-driven entity spawning system.
//!
//! Defines enemy archetypes and their scaling, plus the fixed entities
//! (stairs, training dummy) every floor is built from.

use hecs::{Entity, World};
use rand::Rng;

use crate::components::{
    Behavior, Creature, EntityId, EntityKind, Health, Position, Rank, Stats, StatusEffects,
};
use crate::config::GameMode;
use crate::constants::*;

/// Definition of a regular enemy archetype
#[derive(Clone)]
pub struct EnemyDef {
    pub name: &'static str,
    pub behavior: Behavior,
    /// Added to the depth-scaled base health
    pub health_offset: i32,
}

/// Predefined enemy types
pub mod enemies {
    use super::*;

    pub const GOBLIN: EnemyDef = EnemyDef {
        name: "Goblin",
        behavior: Behavior::Aggressive,
        health_offset: 0,
    };

    pub const VOID_ARCHER: EnemyDef = EnemyDef {
        name: "Void Archer",
        behavior: Behavior::Ranged,
        health_offset: ARCHER_HEALTH_OFFSET,
    };

    pub const VOID_PRIEST: EnemyDef = EnemyDef {
        name: "Void Priest",
        behavior: Behavior::Healer,
        health_offset: PRIEST_HEALTH_OFFSET,
    };
}

/// Everything needed to put one creature into the world
#[derive(Debug, Clone)]
pub struct CreatureSpawn {
    pub creature: Creature,
    pub health: Health,
    pub stats: Stats,
}

impl CreatureSpawn {
    /// Spawn at the given position. The caller records the entity in turn order.
    pub fn spawn(self, world: &mut World, id: EntityId, pos: Position) -> Entity {
        world.spawn((
            id,
            pos,
            self.health,
            self.stats,
            self.creature,
            StatusEffects::new(),
        ))
    }
}

/// Archetype for a uniform roll in [0, 1): 10% healer, 10% ranged, else melee.
pub fn archetype_for_roll(roll: f64) -> EnemyDef {
    if roll > HEALER_ROLL {
        enemies::VOID_PRIEST
    } else if roll > RANGED_ROLL {
        enemies::VOID_ARCHER
    } else {
        enemies::GOBLIN
    }
}

/// A regular enemy scaled to the floor.
pub fn regular_enemy(def: &EnemyDef, depth: u32, mode: GameMode) -> CreatureSpawn {
    let effective = mode.effective_depth(depth);
    let hp = (ENEMY_BASE_HEALTH + effective * ENEMY_HEALTH_PER_DEPTH).floor() as i32 + def.health_offset;
    CreatureSpawn {
        creature: Creature {
            kind: EntityKind::Enemy,
            name: def.name.to_string(),
            level: depth,
            xp_reward: ENEMY_BASE_XP + effective.floor() as u32,
            behavior: def.behavior,
            rank: Rank::Normal,
        },
        health: Health::new(hp),
        stats: Stats::new(ENEMY_STRENGTH, ENEMY_DEXTERITY, ENEMY_CONSTITUTION, 0),
    }
}

pub fn roll_enemy(depth: u32, mode: GameMode, rng: &mut impl Rng) -> CreatureSpawn {
    let def = archetype_for_roll(rng.gen::<f64>());
    regular_enemy(&def, depth, mode)
}

/// Warden hp grows quadratically with depth.
pub fn warden_health(depth: u32) -> i32 {
    let d = depth as i32;
    WARDEN_BASE_HEALTH + WARDEN_HEALTH_PER_DEPTH * d + d * d / WARDEN_HEALTH_QUADRATIC_DIVISOR
}

/// A boss of the given rank. `Rank::Normal` is not a boss and falls back to a Warden.
pub fn boss(rank: Rank, depth: u32, mode: GameMode) -> CreatureSpawn {
    let (name, base_hp) = match rank {
        Rank::Overlord => ("Void Overlord", OVERLORD_HEALTH),
        _ => ("Void Warden", warden_health(depth)),
    };
    let hp = match mode {
        GameMode::Normal => base_hp,
        GameMode::Gauntlet => (base_hp as f32 * GAUNTLET_BOSS_HEALTH_SCALE).floor() as i32,
    };
    CreatureSpawn {
        creature: Creature {
            kind: EntityKind::Enemy,
            name: name.to_string(),
            level: depth,
            xp_reward: BOSS_XP,
            behavior: Behavior::Aggressive,
            rank: if rank == Rank::Overlord { Rank::Overlord } else { Rank::Warden },
        },
        health: Health::new(hp),
        stats: Stats::new(
            ENEMY_STRENGTH + BOSS_STRENGTH_BONUS,
            ENEMY_DEXTERITY,
            ENEMY_CONSTITUTION,
            0,
        ),
    }
}

fn inert(kind: EntityKind, name: &str, hp: i32) -> CreatureSpawn {
    CreatureSpawn {
        creature: Creature {
            kind,
            name: name.to_string(),
            level: 1,
            xp_reward: 0,
            behavior: Behavior::Passive,
            rank: Rank::Normal,
        },
        health: Health::new(hp),
        stats: Stats::default(),
    }
}

pub fn spawn_stairs(world: &mut World, id: EntityId, pos: Position, name: &str) -> Entity {
    inert(EntityKind::Stairs, name, 1).spawn(world, id, pos)
}

pub fn spawn_dummy(world: &mut World, id: EntityId, pos: Position) -> Entity {
    inert(EntityKind::Dummy, "Training Dummy", TUTORIAL_DUMMY_HEALTH).spawn(world, id, pos)
}

/// The tutorial's harmless spell target.
pub fn spawn_wisp(world: &mut World, id: EntityId, pos: Position) -> Entity {
    let mut wisp = inert(EntityKind::Enemy, "Void Wisp", TUTORIAL_WISP_HEALTH);
    wisp.creature.xp_reward = 0;
    wisp.spawn(world, id, pos)
}
