//! Snapshot of a run: everything a renderer or a save file needs.
//!
//! A snapshot is a flat serde record. Loading validates it completely before a
//! `GameState` is rebuilt; any inconsistency fails the whole load.

use std::collections::HashSet;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::components::{
    Creature, EntityId, EquipSlot, GroundItem, Health, IdAllocator, ItemId, Position, Stats, StatusEffects,
};
use crate::config::GameMode;
use crate::constants::*;
use crate::error::SnapshotError;
use crate::events::EventQueue;
use crate::fov::Visibility;
use crate::grid::Grid;
use crate::player::Player;
use crate::systems::skills::ROOT_SKILL;
use crate::systems::spells::SpellId;
use crate::systems::stats::recompute_effective_stats;

use super::tutorial::TutorialProgress;
use super::{GameState, RunStats, TerminalState};

/// Format version written into every snapshot
pub const SNAPSHOT_VERSION: u32 = 1;

/// One live non-player entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub position: Position,
    pub health: Health,
    pub stats: Stats,
    pub creature: Creature,
    pub effects: StatusEffects,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub depth: u32,
    pub mode: GameMode,
    pub turn: u64,
    pub terminal: TerminalState,
    pub grid: Grid,
    pub visibility: Visibility,
    /// Live entities in turn order
    pub entities: Vec<EntitySnapshot>,
    pub ground_items: Vec<GroundItem>,
    pub player: Player,
    pub run_stats: RunStats,
    /// Events of the last resolved intent
    pub events: EventQueue,
    pub messages: Vec<String>,
    pub aiming: Option<SpellId>,
    pub ids: IdAllocator,
    pub tutorial: Option<TutorialProgress>,
}

fn corrupt(msg: impl Into<String>) -> SnapshotError {
    SnapshotError::Corrupt(msg.into())
}

impl Snapshot {
    /// Capture the full state of a run.
    pub fn capture(state: &GameState) -> Self {
        let entities = state
            .live_entities()
            .filter_map(|e| {
                let world = &state.world;
                Some(EntitySnapshot {
                    id: *world.get::<&EntityId>(e).ok()?,
                    position: *world.get::<&Position>(e).ok()?,
                    health: *world.get::<&Health>(e).ok()?,
                    stats: *world.get::<&Stats>(e).ok()?,
                    creature: (*world.get::<&Creature>(e).ok()?).clone(),
                    effects: (*world.get::<&StatusEffects>(e).ok()?).clone(),
                })
            })
            .collect();

        Self {
            version: SNAPSHOT_VERSION,
            depth: state.depth,
            mode: state.mode,
            turn: state.turn,
            terminal: state.terminal,
            grid: state.grid.clone(),
            visibility: state.visibility.clone(),
            entities,
            ground_items: state.ground_items.clone(),
            player: state.player.clone(),
            run_stats: state.run_stats,
            events: state.events.clone(),
            messages: state.messages.clone(),
            aiming: state.aiming,
            ids: state.ids.clone(),
            tutorial: state.tutorial,
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and validate.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Snapshot = serde_json::from_str(json).map_err(|e| {
            warn!("snapshot parse failed: {}", e);
            SnapshotError::from(e)
        })?;
        if let Err(e) = snapshot.validate() {
            warn!("snapshot rejected: {}", e);
            return Err(e);
        }
        Ok(snapshot)
    }

    /// Check every structural invariant of a run.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(self.version));
        }

        let grid = &self.grid;
        if grid.width != MAP_WIDTH || grid.height != MAP_HEIGHT || grid.tiles.len() != grid.width * grid.height {
            return Err(corrupt("tile grid has the wrong dimensions"));
        }
        let vis = &self.visibility;
        if vis.width != grid.width
            || vis.height != grid.height
            || vis.visible.len() != grid.tiles.len()
            || vis.explored.len() != grid.tiles.len()
        {
            return Err(corrupt("visibility grids do not match the tile grid"));
        }
        if self.depth > self.mode.final_depth() {
            return Err(corrupt(format!("depth {} is past the final floor", self.depth)));
        }

        let walkable = |p: &Position| grid.is_walkable(p.x, p.y);

        let mut entity_ids = HashSet::new();
        for entity in &self.entities {
            if !entity_ids.insert(entity.id) {
                return Err(corrupt(format!("duplicate entity id {}", entity.id.0)));
            }
            if !walkable(&entity.position) {
                return Err(corrupt(format!("entity {} is not on a floor tile", entity.id.0)));
            }
            if entity.health.max <= 0 || entity.health.current <= 0 || entity.health.current > entity.health.max {
                return Err(corrupt(format!("entity {} has invalid hp", entity.id.0)));
            }
        }

        let player = &self.player;
        if !walkable(&player.position) {
            return Err(corrupt("player is not on a floor tile"));
        }
        if player.inventory.len() != MAX_INVENTORY {
            return Err(corrupt(format!("inventory has {} slots", player.inventory.len())));
        }
        for slot in EquipSlot::ALL {
            if let Some(item) = player.equipment.get(slot) {
                if !slot.accepts(item.item_type) {
                    return Err(corrupt(format!("{:?} slot holds a {:?}", slot, item.item_type)));
                }
            }
        }
        let effective = recompute_effective_stats(player);
        if player.hp < 0 || player.hp > effective.max_hp {
            return Err(corrupt("player hp out of range"));
        }
        if player.mana < 0 || player.mana > effective.max_mana {
            return Err(corrupt("player mana out of range"));
        }
        if !player.has_skill(ROOT_SKILL) {
            return Err(corrupt("root skill missing"));
        }

        let mut item_ids: HashSet<ItemId> = HashSet::new();
        let owned = self
            .ground_items
            .iter()
            .map(|g| &g.item)
            .chain(player.inventory.iter().flatten())
            .chain(player.equipment.iter());
        for item in owned {
            if !item_ids.insert(item.id) {
                return Err(corrupt(format!("item {} is held twice", item.id.0)));
            }
        }
        if let Some(ground) = self.ground_items.iter().find(|g| !walkable(&g.position)) {
            return Err(corrupt(format!("item {} lies inside a wall", ground.item.id.0)));
        }

        if !self
            .ids
            .covers(entity_ids.iter().max().copied(), item_ids.iter().max().copied())
        {
            return Err(corrupt("id allocator is behind the ids in use"));
        }
        Ok(())
    }

    /// Rebuild a run. Validates first; nothing is rebuilt from a corrupt record.
    pub fn restore(self) -> Result<GameState, SnapshotError> {
        self.validate()?;

        let mut player = self.player;
        player.effective = recompute_effective_stats(&player);

        let mut state = GameState::new(player, self.mode);
        for entity in self.entities {
            let e = state.world.spawn((
                entity.id,
                entity.position,
                entity.health,
                entity.stats,
                entity.creature,
                entity.effects,
            ));
            state.register(e);
        }
        state.grid = self.grid;
        state.visibility = self.visibility;
        state.ground_items = self.ground_items;
        state.depth = self.depth;
        state.run_stats = self.run_stats;
        state.terminal = self.terminal;
        state.turn = self.turn;
        state.aiming = self.aiming;
        state.ids = self.ids;
        state.tutorial = self.tutorial;
        state.events = self.events;
        state.messages = self.messages;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;
    use crate::engine::initialization::start_run;
    use crate::player::PlayerClass;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn snapshot() -> Snapshot {
        let mut rng = StdRng::seed_from_u64(5);
        let state = start_run(&RunConfig::new(PlayerClass::Rogue, GameMode::Normal), &mut rng);
        Snapshot::capture(&state)
    }

    #[test]
    fn test_json_round_trip_is_lossless() {
        let snap = snapshot();
        let json = snap.to_json().unwrap();
        let back = Snapshot::from_json(&json).unwrap();
        assert_eq!(back, snap);

        let state = back.clone().restore().unwrap();
        assert_eq!(Snapshot::capture(&state), back);
    }

    #[test]
    fn test_version_mismatch() {
        let mut snap = snapshot();
        snap.version = 99;
        assert!(matches!(snap.validate(), Err(SnapshotError::UnsupportedVersion(99))));
    }

    #[test]
    fn test_truncated_grid_is_corrupt() {
        let mut snap = snapshot();
        snap.grid.tiles.pop();
        assert!(matches!(snap.validate(), Err(SnapshotError::Corrupt(_))));
    }

    #[test]
    fn test_duplicate_item_is_corrupt() {
        let mut snap = snapshot();
        let item = snap.player.inventory[0].clone();
        snap.player.inventory[5] = item;
        assert!(matches!(snap.validate(), Err(SnapshotError::Corrupt(_))));
    }

    #[test]
    fn test_wrong_slot_is_corrupt() {
        let mut snap = snapshot();
        // Slot 1 holds the armor
        snap.player.equipment.weapon = snap.player.inventory[1].take();
        assert!(matches!(snap.validate(), Err(SnapshotError::Corrupt(_))));
    }

    #[test]
    fn test_player_in_wall_is_corrupt() {
        let mut snap = snapshot();
        snap.player.position = Position::new(0, 0);
        assert!(matches!(snap.validate(), Err(SnapshotError::Corrupt(_))));
    }

    #[test]
    fn test_hp_over_max_is_corrupt() {
        let mut snap = snapshot();
        snap.player.hp = 1000;
        assert!(snap.clone().restore().is_err());
    }

    #[test]
    fn test_garbage_json() {
        assert!(matches!(Snapshot::from_json("{\"version\":1}"), Err(SnapshotError::Json(_))));
    }
}
