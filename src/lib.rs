//! Turn-based dungeon-crawl simulation core.
//!
//! A run is driven through `GameEngine` intents. Every resolved intent advances
//! the simulation by at most one turn and reports what happened as `GameEvent`s;
//! the whole run can be captured as a `Snapshot` at any turn boundary.

pub mod components;
pub mod config;
pub mod constants;
pub mod dungeon_gen;
pub mod engine;
pub mod error;
pub mod events;
pub mod fov;
pub mod grid;
pub mod player;
pub mod profile;
pub mod spawning;
pub mod systems;
pub mod tile;

pub use components::{EntityId, EquipSlot, Item, ItemId, ItemType, Position, Rarity};
pub use config::{GameMode, RunConfig};
pub use engine::{GameEngine, GameState, Outcome, Snapshot, TerminalState, TutorialCheck};
pub use error::{Refusal, SnapshotError};
pub use events::{EventSink, GameEvent};
pub use player::{Player, PlayerClass};
pub use profile::{Profile, UpgradeKind, Upgrades};
pub use systems::SpellId;
