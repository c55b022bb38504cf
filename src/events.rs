//! Game event system for decoupled communication between the core and its collaborators.
//!
//! Systems push events while a turn resolves; the engine hands every event of the
//! resolved intent to registered sinks (UI, audio, persistence) and keeps them in the
//! snapshot as the narrated log of the current turn.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::components::{EffectKind, EntityId, EquipSlot, ItemId, Position};
use crate::systems::skills::find_node;
use crate::systems::spells::SpellId;

/// What kind of damage was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageKind {
    Physical,
    Magical,
    /// Status-effect damage, ignores everything
    True,
}

/// Game events that systems emit and collaborators subscribe to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PlayerMoved {
        to: Position,
    },
    /// Player (or a player-owned effect) damaged an entity
    EntityDamaged {
        entity: EntityId,
        name: String,
        amount: i32,
        crit: bool,
        kind: DamageKind,
    },
    EntityDied {
        entity: EntityId,
        name: String,
        position: Position,
    },
    /// An enemy hit the player
    PlayerDamaged {
        attacker: EntityId,
        amount: i32,
        ranged: bool,
    },
    PlayerHealed {
        amount: i32,
    },
    ManaRestored {
        amount: i32,
    },
    EntityMoved {
        entity: EntityId,
        to: Position,
    },
    StatusApplied {
        entity: EntityId,
        name: String,
        kind: EffectKind,
    },
    /// A healer found a wounded ally; purely a cue
    HealerCue {
        entity: EntityId,
    },
    SpellCast {
        spell: SpellId,
    },
    SpellMissed {
        spell: SpellId,
    },
    AimStarted {
        spell: SpellId,
    },
    AimCancelled,
    Teleported {
        to: Position,
    },
    ItemSeen {
        item: ItemId,
        name: String,
    },
    ItemPickedUp {
        item: ItemId,
        name: String,
    },
    /// Loot fell from a corpse
    ItemDropped {
        item: ItemId,
        name: String,
        position: Position,
    },
    ItemEquipped {
        item: ItemId,
        slot: EquipSlot,
    },
    ItemUnequipped {
        item: ItemId,
        slot: EquipSlot,
    },
    ItemConsumed {
        item: ItemId,
        healed: i32,
    },
    ItemDiscarded {
        item: ItemId,
        name: String,
    },
    XpGained {
        amount: u32,
    },
    LevelUp {
        new_level: u32,
    },
    SkillUnlocked {
        node: String,
    },
    SkillPointGranted,
    EssenceGained {
        amount: u32,
    },
    FloorEntered {
        depth: u32,
        final_floor: bool,
    },
    TutorialAdvanced {
        step: usize,
    },
    TutorialCompleted,
    Defeat,
    Victory,
}

impl GameEvent {
    /// One-line narration for message logs.
    pub fn narrate(&self) -> String {
        match self {
            GameEvent::PlayerMoved { .. } => "You move.".to_string(),
            GameEvent::EntityDamaged { name, amount, crit, .. } => {
                if *crit {
                    format!("Critical! {} takes {} damage.", name, amount)
                } else {
                    format!("{} takes {} damage.", name, amount)
                }
            }
            GameEvent::EntityDied { name, .. } => format!("{} dies.", name),
            GameEvent::PlayerDamaged { amount, ranged: true, .. } => {
                format!("You are shot for {} damage.", amount)
            }
            GameEvent::PlayerDamaged { amount, .. } => format!("You take {} damage.", amount),
            GameEvent::PlayerHealed { amount } => format!("Healed for {}.", amount),
            GameEvent::ManaRestored { amount } => format!("+{} MP", amount),
            GameEvent::EntityMoved { .. } => "Something moves.".to_string(),
            GameEvent::StatusApplied { name, kind, .. } => format!("{} is {}!", name, kind.verb()),
            GameEvent::HealerCue { .. } => "A priest tends to its ally.".to_string(),
            GameEvent::SpellCast { spell } => format!("You cast {}.", spell.name()),
            GameEvent::SpellMissed { .. } => "Spell missed.".to_string(),
            GameEvent::AimStarted { spell } => format!("Aim {}.", spell.name()),
            GameEvent::AimCancelled => "Cancelled.".to_string(),
            GameEvent::Teleported { .. } => "You step through the void.".to_string(),
            GameEvent::ItemSeen { name, .. } => format!("You see {}.", name),
            GameEvent::ItemPickedUp { name, .. } => format!("Picked up {}.", name),
            GameEvent::ItemDropped { name, .. } => format!("{} drops to the floor.", name),
            GameEvent::ItemEquipped { .. } => "Equipped.".to_string(),
            GameEvent::ItemUnequipped { .. } => "Unequipped.".to_string(),
            GameEvent::ItemConsumed { healed, .. } => format!("You drink. +{} HP", healed),
            GameEvent::ItemDiscarded { name, .. } => format!("Destroyed {}.", name),
            GameEvent::XpGained { amount } => format!("+{} XP", amount),
            GameEvent::LevelUp { new_level } => format!("Level Up! You are now level {}.", new_level),
            GameEvent::SkillUnlocked { node } => {
                let name = find_node(node).map_or(node.as_str(), |n| n.name);
                format!("Learned {}.", name)
            }
            GameEvent::SkillPointGranted => "System: You gained a Skill Point.".to_string(),
            GameEvent::EssenceGained { amount } => format!("+{} Void Essence", amount),
            GameEvent::FloorEntered { final_floor: true, .. } => {
                "FINAL FLOOR: DEFEAT THE OVERLORD".to_string()
            }
            GameEvent::FloorEntered { depth, .. } => format!("Entered Floor {}.", depth),
            GameEvent::TutorialAdvanced { .. } => "Well done.".to_string(),
            GameEvent::TutorialCompleted => "The true descent begins.".to_string(),
            GameEvent::Defeat => "You have fallen.".to_string(),
            GameEvent::Victory => "The Overlord is vanquished!".to_string(),
        }
    }
}

/// Receives every event of a resolved intent, in emission order.
pub trait EventSink {
    fn on_event(&mut self, event: &GameEvent);
}

/// Collecting sink, handy for tests and replays.
impl EventSink for Vec<GameEvent> {
    fn on_event(&mut self, event: &GameEvent) {
        self.push(event.clone());
    }
}

/// Shared sink: the engine holds one handle, the caller keeps the other.
impl<T: EventSink> EventSink for Rc<RefCell<T>> {
    fn on_event(&mut self, event: &GameEvent) {
        self.borrow_mut().on_event(event);
    }
}

/// Events of the turn currently being resolved
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn contains(&self, predicate: impl Fn(&GameEvent) -> bool) -> bool {
        self.events.iter().any(predicate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_preserves_order() {
        let mut queue = EventQueue::new();
        queue.push(GameEvent::SkillPointGranted);
        queue.push(GameEvent::LevelUp { new_level: 2 });
        let events: Vec<_> = queue.iter().cloned().collect();
        assert_eq!(events[0], GameEvent::SkillPointGranted);
        assert_eq!(events[1], GameEvent::LevelUp { new_level: 2 });
        assert!(queue.contains(|e| matches!(e, GameEvent::LevelUp { .. })));
    }

    #[test]
    fn test_vec_sink_collects() {
        let mut sink: Vec<GameEvent> = Vec::new();
        sink.on_event(&GameEvent::Victory);
        assert_eq!(sink, vec![GameEvent::Victory]);
    }

    #[test]
    fn test_shared_sink_forwards() {
        let shared = Rc::new(RefCell::new(Vec::new()));
        let mut handle = Rc::clone(&shared);
        handle.on_event(&GameEvent::Defeat);
        assert_eq!(*shared.borrow(), vec![GameEvent::Defeat]);
    }

    #[test]
    fn test_narration() {
        let event = GameEvent::EntityDamaged {
            entity: EntityId(1),
            name: "Goblin".to_string(),
            amount: 7,
            crit: true,
            kind: DamageKind::Physical,
        };
        assert_eq!(event.narrate(), "Critical! Goblin takes 7 damage.");
    }
}
