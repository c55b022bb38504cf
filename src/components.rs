use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Stable identity of a non-player entity, survives save/load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Stable identity of an item, wherever it is held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u32);

/// Position component - grid coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance, the metric every range check in the game uses.
    pub fn distance(&self, other: &Position) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Position {
        Position::new(self.x + dx, self.y + dy)
    }
}

/// Health component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }

    pub fn is_damaged(&self) -> bool {
        self.current < self.max
    }
}

/// Which base attribute a bonus applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKind {
    Str,
    Dex,
    Con,
    Int,
}

/// Stats component - base attributes shared by the player and creatures
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub str: i32,
    pub dex: i32,
    pub con: i32,
    pub int: i32,
}

impl Stats {
    pub fn new(str: i32, dex: i32, con: i32, int: i32) -> Self {
        Self { str, dex, con, int }
    }

    pub fn get(&self, kind: StatKind) -> i32 {
        match kind {
            StatKind::Str => self.str,
            StatKind::Dex => self.dex,
            StatKind::Con => self.con,
            StatKind::Int => self.int,
        }
    }

    pub fn add(&mut self, kind: StatKind, amount: i32) {
        match kind {
            StatKind::Str => self.str += amount,
            StatKind::Dex => self.dex += amount,
            StatKind::Con => self.con += amount,
            StatKind::Int => self.int += amount,
        }
    }
}

/// What a non-player entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Enemy,
    /// Tutorial training target: takes damage, never rewards
    Dummy,
    Stairs,
}

impl EntityKind {
    /// Spells and melee only ever land on these kinds.
    pub fn is_targetable(&self) -> bool {
        matches!(self, EntityKind::Enemy | EntityKind::Dummy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    Aggressive,
    Ranged,
    Healer,
    Passive,
}

/// Boss marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rank {
    Normal,
    Warden,
    /// Final boss; killing it wins the run
    Overlord,
}

/// Identity and behavior of a non-player entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub kind: EntityKind,
    pub name: String,
    pub level: u32,
    pub xp_reward: u32,
    pub behavior: Behavior,
    pub rank: Rank,
}

impl Creature {
    /// Whether this creature runs behavior on its turn at all.
    pub fn acts(&self) -> bool {
        self.kind == EntityKind::Enemy && self.behavior != Behavior::Passive
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    Burn,
    Freeze,
    Stun,
}

impl EffectKind {
    /// Freeze and stun cost the afflicted entity its turn.
    pub fn skips_turn(&self) -> bool {
        matches!(self, EffectKind::Freeze | EffectKind::Stun)
    }

    pub fn verb(&self) -> &'static str {
        match self {
            EffectKind::Burn => "burned",
            EffectKind::Freeze => "frozen",
            EffectKind::Stun => "stunned",
        }
    }
}

/// One instance of a status effect. Instances never merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: EffectKind,
    /// Remaining turns
    pub duration: i32,
    pub magnitude: Option<i32>,
}

impl StatusEffect {
    pub fn new(kind: EffectKind, duration: i32, magnitude: Option<i32>) -> Self {
        Self { kind, duration, magnitude }
    }
}

/// Active effects on an entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffects {
    pub effects: Vec<StatusEffect>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, kind: EffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

/// Item category; doubles as the equipment slot it fits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    Weapon,
    Armor,
    Accessory,
    Consumable,
}

impl ItemType {
    pub fn equip_slot(&self) -> Option<EquipSlot> {
        match self {
            ItemType::Weapon => Some(EquipSlot::Weapon),
            ItemType::Armor => Some(EquipSlot::Armor),
            ItemType::Accessory => Some(EquipSlot::Accessory),
            ItemType::Consumable => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipSlot {
    Weapon,
    Armor,
    Accessory,
}

impl EquipSlot {
    pub const ALL: [EquipSlot; 3] = [EquipSlot::Weapon, EquipSlot::Armor, EquipSlot::Accessory];

    pub fn accepts(&self, item_type: ItemType) -> bool {
        item_type.equip_slot() == Some(*self)
    }
}

/// Item quality tier, ordered common < ... < legendary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];

    pub fn multiplier(&self) -> f64 {
        match self {
            Rarity::Common => 1.0,
            Rarity::Uncommon => 1.3,
            Rarity::Rare => 1.6,
            Rarity::Epic => 2.0,
            Rarity::Legendary => 2.5,
        }
    }

    /// Rare and better roll a suffix on top of the prefix.
    pub fn has_suffix(&self) -> bool {
        *self >= Rarity::Rare
    }
}

/// Keys of an item's sparse bonus map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemStat {
    Dmg,
    Def,
    Hp,
    Crit,
    Mana,
    Int,
    Str,
    Dex,
    Con,
}

impl ItemStat {
    /// The base attribute this bonus folds into, if any.
    pub fn base_stat(&self) -> Option<StatKind> {
        match self {
            ItemStat::Str => Some(StatKind::Str),
            ItemStat::Dex => Some(StatKind::Dex),
            ItemStat::Con => Some(StatKind::Con),
            ItemStat::Int => Some(StatKind::Int),
            _ => None,
        }
    }
}

/// A generated item. Never mutated after generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub item_type: ItemType,
    pub rarity: Rarity,
    pub item_power: i32,
    pub stats: BTreeMap<ItemStat, i32>,
    pub description: String,
}

impl Item {
    pub fn stat(&self, stat: ItemStat) -> i32 {
        self.stats.get(&stat).copied().unwrap_or(0)
    }
}

/// An item lying on the floor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundItem {
    pub position: Position,
    pub item: Item,
}

/// Hands out stable entity and item ids for the whole run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    next_entity: u32,
    next_item: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entity(&mut self) -> EntityId {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        id
    }

    pub fn item(&mut self) -> ItemId {
        let id = ItemId(self.next_item);
        self.next_item += 1;
        id
    }

    /// Whether every id below the counters could have come from this allocator.
    pub fn covers(&self, entity: Option<EntityId>, item: Option<ItemId>) -> bool {
        entity.map_or(true, |e| e.0 < self.next_entity) && item.map_or(true, |i| i.0 < self.next_item)
    }
}
