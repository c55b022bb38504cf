//! Floor generation and floor transitions.
//!
//! A new floor replaces everything on the old one: entities, ground items, the
//! grid and the visibility state. Nothing is carried back up; floors are one-way.

use std::collections::BTreeMap;

use log::info;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::{GroundItem, Item, ItemStat, ItemType, Position, Rank, Rarity};
use crate::constants::*;
use crate::dungeon_gen::{tutorial_grid, DungeonGenerator};
use crate::events::GameEvent;
use crate::grid::Rect;
use crate::spawning;
use crate::systems::item_gen::generate_item;

use super::GameState;

/// Interior tiles of a room (one tile in from every wall), minus `exclude`.
fn interior_tiles(room: &Rect, exclude: Option<Position>) -> Vec<Position> {
    let mut tiles = Vec::new();
    for y in room.y + 1..=room.y + room.height - 2 {
        for x in room.x + 1..=room.x + room.width - 2 {
            let pos = Position::new(x, y);
            if Some(pos) != exclude {
                tiles.push(pos);
            }
        }
    }
    tiles
}

/// The boss a room gets on this floor, if any.
pub fn boss_for_room(depth: u32, final_floor: bool, is_last_room: bool) -> Option<Rank> {
    if !is_last_room {
        None
    } else if final_floor {
        Some(Rank::Overlord)
    } else if depth % BOSS_FLOOR_INTERVAL == 0 {
        Some(Rank::Warden)
    } else {
        None
    }
}

/// Replace the current floor with a freshly generated one at `depth`.
pub fn generate_floor(state: &mut GameState, depth: u32, rng: &mut impl Rng) {
    state.clear_entities();
    state.ground_items.clear();
    state.aiming = None;
    state.depth = depth;
    state.run_stats.max_floor = state.run_stats.max_floor.max(depth);

    let layout = DungeonGenerator::generate(rng);
    let final_floor = depth == state.mode.final_depth();
    let (sx, sy) = layout.spawn_room().center();
    state.player.position = Position::new(sx, sy);
    state.grid = layout.grid;

    let last = layout.rooms.len() - 1;
    let mut stairs_pos = None;
    if !final_floor {
        let (x, y) = layout.rooms[last].center();
        let pos = Position::new(x, y);
        let id = state.ids.entity();
        let stairs = spawning::spawn_stairs(&mut state.world, id, pos, "Stairs Down");
        state.register(stairs);
        stairs_pos = Some(pos);
    }

    let mut enemies = 0;
    let mut items = 0;
    for (i, room) in layout.rooms.iter().enumerate().skip(1) {
        let spawn = match boss_for_room(depth, final_floor, i == last) {
            Some(rank) => Some(spawning::boss(rank, depth, state.mode)),
            None if rng.gen::<f64>() < state.mode.enemy_room_chance() => {
                Some(spawning::roll_enemy(depth, state.mode, rng))
            }
            None => None,
        };
        if let Some(spawn) = spawn {
            let exclude = if i == last { stairs_pos } else { None };
            if let Some(pos) = interior_tiles(room, exclude).choose(rng).copied() {
                let id = state.ids.entity();
                let entity = spawn.spawn(&mut state.world, id, pos);
                state.register(entity);
                enemies += 1;
            }
        }

        if !final_floor && rng.gen::<f64>() < ITEM_ROOM_CHANCE {
            if let Some(position) = interior_tiles(room, None).choose(rng).copied() {
                let item = generate_item(depth, None, state.ids.item(), rng);
                state.ground_items.push(GroundItem { position, item });
                items += 1;
            }
        }
    }

    state.visibility.reset();
    state.update_visibility();
    info!(
        "depth {}: {} rooms, {} enemies, {} items{}",
        depth,
        layout.rooms.len(),
        enemies,
        items,
        if final_floor { ", final floor" } else { "" }
    );
    state.emit(GameEvent::FloorEntered { depth, final_floor });
}

/// Take the stairs down one floor.
pub fn descend(state: &mut GameState, rng: &mut impl Rng) {
    let next = state.depth + 1;
    generate_floor(state, next, rng);
}

/// The weapon lying in the tutorial corridor.
fn broken_blade(state: &mut GameState) -> Item {
    Item {
        id: state.ids.item(),
        name: "Broken Blade".to_string(),
        item_type: ItemType::Weapon,
        rarity: Rarity::Common,
        item_power: TUTORIAL_WEAPON_DAMAGE,
        stats: BTreeMap::from([(ItemStat::Dmg, TUTORIAL_WEAPON_DAMAGE)]),
        description: "Better than bare fists.".to_string(),
    }
}

/// Build the scripted tutorial floor at depth 0, fully revealed.
pub fn build_tutorial_floor(state: &mut GameState) {
    state.clear_entities();
    state.ground_items.clear();
    state.aiming = None;
    state.depth = 0;
    state.grid = tutorial_grid();

    let at = |(x, y): (i32, i32)| Position::new(x, y);
    state.player.position = at(TUTORIAL_PLAYER_START);

    let item = broken_blade(state);
    state.ground_items.push(GroundItem {
        position: at(TUTORIAL_WEAPON_POS),
        item,
    });

    let id = state.ids.entity();
    let dummy = spawning::spawn_dummy(&mut state.world, id, at(TUTORIAL_DUMMY_POS));
    state.register(dummy);
    let id = state.ids.entity();
    let wisp = spawning::spawn_wisp(&mut state.world, id, at(TUTORIAL_WISP_POS));
    state.register(wisp);
    let id = state.ids.entity();
    let exit = spawning::spawn_stairs(&mut state.world, id, at(TUTORIAL_EXIT_POS), "Exit");
    state.register(exit);

    state.visibility.reset();
    state.visibility.reveal_all();
    info!("tutorial floor built");
    state.emit(GameEvent::FloorEntered {
        depth: 0,
        final_floor: false,
    });
}
