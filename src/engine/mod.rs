//! Game engine - owns the state of one run and exposes the intent API.
//!
//! The engine handles:
//! - Routing discrete player intents to the systems
//! - Advancing the simulation one turn per resolved action
//! - Handing the events of every resolved intent to registered sinks
//!
//! Collaborators (UI, audio, persistence) only ever:
//! - Call intents and inspect the returned `Outcome` or `Refusal`
//! - Read the state or take a `Snapshot`

mod floor_transition;
mod game_state;
mod initialization;
mod simulation;
pub mod snapshot;
pub mod tutorial;

pub use floor_transition::boss_for_room;
pub use game_state::{GameState, RunStats, TerminalState};
pub use snapshot::{Snapshot, SNAPSHOT_VERSION};
pub use tutorial::{TutorialCheck, TutorialProgress};

use std::mem;

use hecs::Entity;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::components::{EntityKind, EquipSlot, ItemId, Position};
use crate::config::RunConfig;
use crate::error::{Refusal, SnapshotError};
use crate::events::{DamageKind, EventQueue, EventSink, GameEvent};
use crate::systems::combat::deal_damage;
use crate::systems::inventory;
use crate::systems::skills;
use crate::systems::spells::{self, CastResult, SpellId};

use floor_transition::descend;
use initialization::start_run;
use simulation::process_turn;
use tutorial::advance_tutorial;

/// What a successful intent did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A full turn resolved
    TurnTaken,
    /// State changed without a turn passing
    Applied,
    /// A directional spell waits for `cast_directional` or a move
    Aiming(SpellId),
}

/// The game engine - owns all game state and simulation logic.
pub struct GameEngine {
    state: GameState,
    rng: StdRng,
    sinks: Vec<Box<dyn EventSink>>,
}

impl GameEngine {
    /// Start a new run.
    pub fn new(config: RunConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let state = start_run(&config, &mut rng);
        Self {
            state,
            rng,
            sinks: Vec::new(),
        }
    }

    /// Resume a validated snapshot. The RNG is not persisted.
    pub fn from_snapshot(snapshot: Snapshot, seed: Option<u64>) -> Result<Self, SnapshotError> {
        let state = snapshot.restore()?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            state,
            rng,
            sinks: Vec::new(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Self::from_snapshot(Snapshot::from_json(json)?, None)
    }

    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Events of the last resolved intent.
    pub fn events(&self) -> &EventQueue {
        &self.state.events
    }

    pub fn terminal(&self) -> TerminalState {
        self.state.terminal
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state)
    }

    /// Resolve one intent. A refusal restores the previous turn's events and
    /// notifies nobody; success hands the new events to every sink.
    fn run<T>(
        &mut self,
        intent: &str,
        f: impl FnOnce(&mut GameState, &mut StdRng) -> Result<T, Refusal>,
    ) -> Result<T, Refusal> {
        if self.state.terminal.is_over() {
            debug!("{} refused: run is over", intent);
            return Err(Refusal::RunOver);
        }

        let previous = mem::take(&mut self.state.events);
        match f(&mut self.state, &mut self.rng) {
            Ok(value) => {
                for event in self.state.events.iter() {
                    for sink in self.sinks.iter_mut() {
                        sink.on_event(event);
                    }
                }
                Ok(value)
            }
            Err(refusal) => {
                debug!("{} refused: {}", intent, refusal);
                self.state.events = previous;
                Err(refusal)
            }
        }
    }

    /// Step, attack, take the stairs, or aim the pending spell.
    pub fn move_by(&mut self, dx: i32, dy: i32) -> Result<Outcome, Refusal> {
        self.run("move", |state, rng| {
            if let Some(spell) = state.aiming {
                return resolve_directional(state, spell, dx, dy, rng);
            }
            if !is_step(dx, dy) {
                return Err(Refusal::InvalidDirection);
            }

            let to = state.player.position.offset(dx, dy);
            if !state.grid.is_walkable(to.x, to.y) {
                return Err(Refusal::Blocked);
            }

            if let Some(target) = state.entity_at(to) {
                match state.kind_of(target) {
                    Some(kind) if kind.is_targetable() => {
                        deal_damage(state, target, 0, true, DamageKind::Physical, rng);
                        advance_tutorial(state, TutorialCheck::Attack);
                        return Ok(end_turn(state, rng));
                    }
                    Some(EntityKind::Stairs) => return take_stairs(state, rng),
                    _ => {}
                }
            }

            state.player.position = to;
            state.update_visibility();
            state.emit(GameEvent::PlayerMoved { to });
            advance_tutorial(state, TutorialCheck::Move);
            let seen = state
                .ground_items
                .iter()
                .find(|g| g.position == to)
                .map(|g| (g.item.id, g.item.name.clone()));
            if let Some((item, name)) = seen {
                state.emit(GameEvent::ItemSeen { item, name });
            }
            Ok(end_turn(state, rng))
        })
    }

    /// Rest one turn.
    pub fn wait(&mut self) -> Result<Outcome, Refusal> {
        self.run("wait", |state, rng| Ok(end_turn(state, rng)))
    }

    pub fn pickup(&mut self) -> Result<Outcome, Refusal> {
        self.run("pickup", |state, _| {
            inventory::pickup(state)?;
            advance_tutorial(state, TutorialCheck::Pickup);
            Ok(Outcome::Applied)
        })
    }

    pub fn equip(&mut self, item: ItemId, slot: EquipSlot) -> Result<Outcome, Refusal> {
        self.run("equip", |state, _| {
            inventory::equip(state, item, slot)?;
            advance_tutorial(state, TutorialCheck::Equip);
            Ok(Outcome::Applied)
        })
    }

    pub fn unequip(&mut self, slot: EquipSlot) -> Result<Outcome, Refusal> {
        self.run("unequip", |state, _| {
            inventory::unequip(state, slot)?;
            Ok(Outcome::Applied)
        })
    }

    pub fn discard(&mut self, item: ItemId) -> Result<Outcome, Refusal> {
        self.run("discard", |state, _| {
            inventory::discard(state, item)?;
            Ok(Outcome::Applied)
        })
    }

    pub fn consume(&mut self, item: ItemId) -> Result<Outcome, Refusal> {
        self.run("consume", |state, _| {
            inventory::consume(state, item)?;
            Ok(Outcome::Applied)
        })
    }

    /// Consume a potion or equip anything else into its own slot.
    pub fn use_item(&mut self, item: ItemId) -> Result<Outcome, Refusal> {
        self.run("use item", |state, _| {
            let equips = state
                .player
                .inventory_index(item)
                .and_then(|idx| state.player.inventory[idx].as_ref())
                .is_some_and(|i| i.item_type.equip_slot().is_some());
            inventory::use_item(state, item)?;
            if equips {
                advance_tutorial(state, TutorialCheck::Equip);
            }
            Ok(Outcome::Applied)
        })
    }

    pub fn swap_slots(&mut self, a: usize, b: usize) -> Result<Outcome, Refusal> {
        self.run("swap slots", |state, _| {
            inventory::swap_slots(state, a, b)?;
            Ok(Outcome::Applied)
        })
    }

    /// Cast a self, AoE or chain spell; directional spells enter aim mode.
    pub fn cast(&mut self, spell: SpellId) -> Result<Outcome, Refusal> {
        self.run("cast", |state, rng| match spells::cast(state, spell, rng)? {
            CastResult::Aiming(spell) => Ok(Outcome::Aiming(spell)),
            CastResult::Resolved => {
                advance_tutorial(state, TutorialCheck::CastSpell);
                Ok(end_turn(state, rng))
            }
        })
    }

    pub fn cast_directional(&mut self, spell: SpellId, dx: i32, dy: i32) -> Result<Outcome, Refusal> {
        self.run("cast directional", |state, rng| {
            resolve_directional(state, spell, dx, dy, rng)
        })
    }

    pub fn cancel_aim(&mut self) -> Result<Outcome, Refusal> {
        self.run("cancel aim", |state, _| {
            if state.aiming.take().is_none() {
                return Err(Refusal::NotAiming);
            }
            state.emit(GameEvent::AimCancelled);
            Ok(Outcome::Applied)
        })
    }

    /// Take stairs standing next to (or under) the player.
    pub fn use_stairs(&mut self) -> Result<Outcome, Refusal> {
        self.run("use stairs", |state, rng| {
            let player = state.player.position;
            let near = |p: Position| (p.x - player.x).abs() <= 1 && (p.y - player.y).abs() <= 1;
            let stairs: Option<Entity> = state.stairs().filter(|e| state.position_of(*e).is_some_and(near));
            if stairs.is_none() {
                return Err(Refusal::NoStairs);
            }
            take_stairs(state, rng)
        })
    }

    pub fn unlock_skill(&mut self, node: &str) -> Result<Outcome, Refusal> {
        self.run("unlock skill", |state, _| {
            let unlocked = skills::unlock_skill(&mut state.player, node)?;
            state.emit(GameEvent::SkillUnlocked {
                node: unlocked.id.to_string(),
            });
            advance_tutorial(state, TutorialCheck::LearnSkill);
            Ok(Outcome::Applied)
        })
    }

    /// Report a UI-only tutorial action (opening the inventory or skill tree).
    /// Returns whether the tutorial advanced.
    pub fn notify_tutorial(&mut self, check: TutorialCheck) -> bool {
        self.run("tutorial", |state, _| Ok(advance_tutorial(state, check)))
            .unwrap_or(false)
    }
}

fn is_step(dx: i32, dy: i32) -> bool {
    (-1..=1).contains(&dx) && (-1..=1).contains(&dy) && (dx, dy) != (0, 0)
}

fn end_turn(state: &mut GameState, rng: &mut impl Rng) -> Outcome {
    process_turn(state, rng);
    Outcome::TurnTaken
}

fn resolve_directional(
    state: &mut GameState,
    spell: SpellId,
    dx: i32,
    dy: i32,
    rng: &mut impl Rng,
) -> Result<Outcome, Refusal> {
    spells::cast_directional(state, spell, dx, dy, rng)?;
    advance_tutorial(state, TutorialCheck::CastSpell);
    Ok(end_turn(state, rng))
}

/// Descend, or leave the tutorial once it reached its last step.
fn take_stairs(state: &mut GameState, rng: &mut impl Rng) -> Result<Outcome, Refusal> {
    if let Some(progress) = state.tutorial {
        if !progress.is_waiting_for(TutorialCheck::Exit) {
            return Err(Refusal::TutorialIncomplete);
        }
        advance_tutorial(state, TutorialCheck::Exit);
        state.set_terminal(TerminalState::TutorialComplete);
        return Ok(Outcome::Applied);
    }
    descend(state, rng);
    Ok(end_turn(state, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ItemType;
    use crate::config::GameMode;
    use crate::player::PlayerClass;

    fn engine(class: PlayerClass) -> GameEngine {
        GameEngine::new(RunConfig::new(class, GameMode::Normal).with_seed(42))
    }

    fn tutorial() -> GameEngine {
        GameEngine::new(RunConfig::tutorial(PlayerClass::Warrior).with_seed(7))
    }

    #[test]
    fn test_wall_move_is_refused_without_a_turn() {
        let mut engine = tutorial();
        assert_eq!(engine.move_by(-3, 0), Err(Refusal::InvalidDirection));

        let mut pos = engine.state().player.position;
        while engine.state().grid.is_walkable(pos.x, pos.y - 1) {
            pos.y -= 1;
        }
        engine.state.player.position = pos;
        assert_eq!(engine.move_by(0, -1), Err(Refusal::Blocked));
        assert_eq!(engine.state().player.position, pos);
        assert_eq!(engine.state().turn, 0);
    }

    #[test]
    fn test_move_takes_a_turn_and_advances_tutorial() {
        let mut engine = tutorial();
        assert_eq!(engine.move_by(1, 0), Ok(Outcome::TurnTaken));
        assert_eq!(engine.state().turn, 1);
        assert_eq!(engine.state().player.position, Position::new(5, 12));
        assert_eq!(
            engine.state().tutorial.and_then(|t| t.current()),
            Some(TutorialCheck::Pickup)
        );
    }

    #[test]
    fn test_refusal_keeps_previous_events() {
        let mut engine = tutorial();
        engine.move_by(1, 0).unwrap();
        let before = engine.events().clone();
        assert!(engine.cancel_aim().is_err());
        assert_eq!(engine.events(), &before);
    }

    #[test]
    fn test_stairs_refused_until_exit_step() {
        let mut engine = tutorial();
        assert_eq!(engine.use_stairs(), Err(Refusal::NoStairs));

        let stairs = engine.state().stairs().unwrap();
        let pos = engine.state().position_of(stairs).unwrap();
        engine.state.player.position = pos.offset(-1, 0);
        assert_eq!(engine.use_stairs(), Err(Refusal::TutorialIncomplete));
        assert_eq!(engine.move_by(1, 0), Err(Refusal::TutorialIncomplete));

        engine.state.tutorial = Some(TutorialProgress {
            step: TutorialCheck::STEPS.len() - 1,
        });
        assert_eq!(engine.use_stairs(), Ok(Outcome::Applied));
        assert_eq!(engine.terminal(), TerminalState::TutorialComplete);
        assert_eq!(engine.wait(), Err(Refusal::RunOver));
    }

    #[test]
    fn test_aim_then_move_casts() {
        let mut engine = engine(PlayerClass::Mage);
        assert_eq!(engine.cast(SpellId::Fireball), Ok(Outcome::Aiming(SpellId::Fireball)));
        assert_eq!(engine.state().turn, 0);
        let start = engine.state().player.position;
        let mana = engine.state().player.mana;

        assert_eq!(engine.move_by(1, 0), Ok(Outcome::TurnTaken));
        assert_eq!(engine.state().player.position, start);
        assert!(engine.state().aiming.is_none());
        let cost = SpellId::Fireball.spell().mana_cost;
        let regen = engine.state().player.effective.mana_regen;
        assert_eq!(engine.state().player.mana, (mana - cost + regen).min(engine.state().player.effective.max_mana));
    }

    #[test]
    fn test_cancel_aim() {
        let mut engine = engine(PlayerClass::Rogue);
        engine.cast(SpellId::Blink).unwrap();
        assert_eq!(engine.cancel_aim(), Ok(Outcome::Applied));
        assert!(engine.events().contains(|e| *e == GameEvent::AimCancelled));
        assert_eq!(engine.cancel_aim(), Err(Refusal::NotAiming));
    }

    #[test]
    fn test_use_item_equips_kit() {
        let mut engine = engine(PlayerClass::Warrior);
        let weapon = engine.state().player.inventory[0].as_ref().unwrap().id;
        assert_eq!(engine.use_item(weapon), Ok(Outcome::Applied));
        let equipped = engine.state().player.equipment.weapon.as_ref().unwrap();
        assert_eq!(equipped.item_type, ItemType::Weapon);
        assert_eq!(engine.state().turn, 0);
    }

    #[test]
    fn test_unlock_skill_emits_event() {
        let mut engine = engine(PlayerClass::Warrior);
        engine.state.player.skill_points = 1;
        assert_eq!(engine.unlock_skill("str_1"), Ok(Outcome::Applied));
        assert!(engine
            .events()
            .contains(|e| matches!(e, GameEvent::SkillUnlocked { node } if node == "str_1")));
        assert_eq!(engine.unlock_skill("str_1"), Err(Refusal::AlreadyUnlocked));
    }

    #[test]
    fn test_notify_tutorial_only_matches_current_step() {
        let mut engine = tutorial();
        assert!(!engine.notify_tutorial(TutorialCheck::OpenInventory));
        engine.state.tutorial = Some(TutorialProgress { step: 2 });
        assert!(engine.notify_tutorial(TutorialCheck::OpenInventory));
    }

    #[test]
    fn test_json_resume() {
        let mut engine = engine(PlayerClass::Rogue);
        engine.wait().unwrap();
        let json = engine.snapshot().to_json().unwrap();
        let resumed = GameEngine::from_json(&json).unwrap();
        assert_eq!(resumed.snapshot(), engine.snapshot());
    }
}
