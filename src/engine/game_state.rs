//! Core game state - owns the simulation data of one run.

use hecs::{Entity, World};
use log::info;
use serde::{Deserialize, Serialize};

use crate::components::{Creature, EntityId, EntityKind, GroundItem, IdAllocator, Position};
use crate::config::GameMode;
use crate::constants::*;
use crate::events::{EventQueue, GameEvent};
use crate::fov::{visibility_radius, Visibility};
use crate::grid::Grid;
use crate::player::Player;
use crate::systems::spells::SpellId;

use super::tutorial::TutorialProgress;

/// Terminal-state flag of the run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminalState {
    #[default]
    Ongoing,
    Defeat,
    Victory,
    /// The tutorial floor was exited
    TutorialComplete,
}

impl TerminalState {
    pub fn is_over(&self) -> bool {
        *self != TerminalState::Ongoing
    }
}

/// Counters reported at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub kills: u32,
    pub damage_dealt: u32,
    pub max_floor: u32,
    /// Void essence earned this run, banked into the profile afterwards
    pub essence: u32,
}

/// Core game state - owns all simulation data.
pub struct GameState {
    /// Non-player entities
    pub world: World,
    /// Insertion order of live entities; drives the entity phase
    pub turn_order: Vec<Entity>,
    pub grid: Grid,
    pub visibility: Visibility,
    pub ground_items: Vec<GroundItem>,
    pub player: Player,
    pub depth: u32,
    pub mode: GameMode,
    pub run_stats: RunStats,
    pub terminal: TerminalState,
    /// Resolved turns since the run started
    pub turn: u64,
    /// Directional spell waiting for a direction
    pub aiming: Option<SpellId>,
    pub ids: IdAllocator,
    pub tutorial: Option<TutorialProgress>,
    /// Events of the intent being (or last) resolved
    pub events: EventQueue,
    /// Rolling narration, newest last
    pub messages: Vec<String>,
}

impl GameState {
    /// Empty state around a player; floors are generated by the caller.
    pub fn new(player: Player, mode: GameMode) -> Self {
        Self {
            world: World::new(),
            turn_order: Vec::new(),
            grid: Grid::standard(),
            visibility: Visibility::standard(),
            ground_items: Vec::new(),
            player,
            depth: 0,
            mode,
            run_stats: RunStats::default(),
            terminal: TerminalState::Ongoing,
            turn: 0,
            aiming: None,
            ids: IdAllocator::new(),
            tutorial: None,
            events: EventQueue::new(),
            messages: Vec::new(),
        }
    }

    /// Record an event and its narration.
    pub fn emit(&mut self, event: GameEvent) {
        if self.messages.len() >= MESSAGE_LOG_CAPACITY {
            self.messages.remove(0);
        }
        self.messages.push(event.narrate());
        self.events.push(event);
    }

    /// Spawn-side bookkeeping: every new entity joins the end of the turn order.
    pub fn register(&mut self, entity: Entity) {
        self.turn_order.push(entity);
    }

    /// Remove an entity from the world and the turn order.
    pub fn despawn(&mut self, entity: Entity) {
        let _ = self.world.despawn(entity);
        self.turn_order.retain(|e| *e != entity);
    }

    /// Drop every entity (floor change). Despawning one by one keeps old handles stale.
    pub fn clear_entities(&mut self) {
        let all: Vec<Entity> = self.world.iter().map(|e| e.entity()).collect();
        for entity in all {
            let _ = self.world.despawn(entity);
        }
        self.turn_order.clear();
    }

    /// Live entities in turn order.
    pub fn live_entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.turn_order.iter().copied().filter(|e| self.world.contains(*e))
    }

    /// First live entity standing on `pos`.
    pub fn entity_at(&self, pos: Position) -> Option<Entity> {
        self.live_entities().find(|e| {
            self.world
                .get::<&Position>(*e)
                .map(|p| *p == pos)
                .unwrap_or(false)
        })
    }

    pub fn kind_of(&self, entity: Entity) -> Option<EntityKind> {
        self.world.get::<&Creature>(entity).ok().map(|c| c.kind)
    }

    pub fn position_of(&self, entity: Entity) -> Option<Position> {
        self.world.get::<&Position>(entity).ok().map(|p| *p)
    }

    pub fn id_of(&self, entity: Entity) -> Option<EntityId> {
        self.world.get::<&EntityId>(entity).ok().map(|id| *id)
    }

    pub fn name_of(&self, entity: Entity) -> String {
        self.world
            .get::<&Creature>(entity)
            .map(|c| c.name.clone())
            .unwrap_or_default()
    }

    /// Live Enemy/Dummy entities in turn order.
    pub fn targets(&self) -> Vec<Entity> {
        self.live_entities()
            .filter(|e| self.kind_of(*e).is_some_and(|k| k.is_targetable()))
            .collect()
    }

    pub fn stairs(&self) -> Option<Entity> {
        self.live_entities()
            .find(|e| self.kind_of(*e) == Some(EntityKind::Stairs))
    }

    /// Recompute the visible set from the player's position.
    /// The tutorial floor stays fully revealed.
    pub fn update_visibility(&mut self) {
        if self.tutorial.is_some() {
            self.visibility.reveal_all();
            return;
        }
        let radius = visibility_radius(self.player.effective.stats.int);
        self.visibility.update(self.player.position, radius);
    }

    pub fn is_final_floor(&self) -> bool {
        self.tutorial.is_none() && self.depth == self.mode.final_depth()
    }

    /// First terminal state reached sticks.
    pub fn set_terminal(&mut self, state: TerminalState) {
        if self.terminal.is_over() {
            return;
        }
        self.terminal = state;
        info!("run ended: {:?} on depth {} after {} turns", state, self.depth, self.turn);
        match state {
            TerminalState::Defeat => self.emit(GameEvent::Defeat),
            TerminalState::Victory => self.emit(GameEvent::Victory),
            TerminalState::TutorialComplete => self.emit(GameEvent::TutorialCompleted),
            TerminalState::Ongoing => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerClass;
    use crate::profile::Upgrades;
    use crate::spawning;

    fn state() -> GameState {
        let player = Player::new(PlayerClass::Warrior, &Upgrades::default(), "default");
        GameState::new(player, GameMode::Normal)
    }

    #[test]
    fn test_register_and_despawn_keep_order() {
        let mut state = state();
        let a = spawning::spawn_dummy(&mut state.world, EntityId(0), Position::new(1, 1));
        let b = spawning::spawn_stairs(&mut state.world, EntityId(1), Position::new(2, 2), "Exit");
        state.register(a);
        state.register(b);
        assert_eq!(state.live_entities().collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(state.entity_at(Position::new(2, 2)), Some(b));
        assert_eq!(state.targets(), vec![a]);
        assert_eq!(state.stairs(), Some(b));

        state.despawn(a);
        assert_eq!(state.live_entities().collect::<Vec<_>>(), vec![b]);
        assert!(state.entity_at(Position::new(1, 1)).is_none());
    }

    #[test]
    fn test_cleared_handles_never_alias_new_entities() {
        let mut state = state();
        let old = spawning::spawn_dummy(&mut state.world, EntityId(0), Position::new(1, 1));
        state.register(old);
        state.clear_entities();
        assert!(state.turn_order.is_empty());
        assert_eq!(state.world.len(), 0);

        let new = spawning::spawn_dummy(&mut state.world, EntityId(1), Position::new(1, 1));
        state.register(new);
        assert_ne!(old, new);
        assert!(!state.world.contains(old));
        assert_eq!(state.live_entities().collect::<Vec<_>>(), vec![new]);
    }

    #[test]
    fn test_first_terminal_state_sticks() {
        let mut state = state();
        state.set_terminal(TerminalState::Defeat);
        state.set_terminal(TerminalState::Victory);
        assert_eq!(state.terminal, TerminalState::Defeat);
        assert_eq!(state.events.len(), 1);
    }

    #[test]
    fn test_message_log_is_capped() {
        let mut state = state();
        for _ in 0..MESSAGE_LOG_CAPACITY + 10 {
            state.emit(GameEvent::SkillPointGranted);
        }
        assert_eq!(state.messages.len(), MESSAGE_LOG_CAPACITY);
    }
}
