//! Spell catalog and spell resolution.
//!
//! Each spell is a cost plus a `SpellShape` carrying only the fields its shape
//! needs. Self, AoE and chain spells resolve immediately; projectile and
//! teleport spells need a direction and resolve through `cast_directional`.

use hecs::Entity;
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::{EffectKind, Position, StatusEffect};
use crate::constants::*;
use crate::engine::GameState;
use crate::error::Refusal;
use crate::events::{DamageKind, GameEvent};
use crate::systems::combat::deal_damage;
use crate::systems::effects::apply_status_effect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpellId {
    Fireball,
    Heal,
    Nova,
    Blink,
    Chain,
    Drain,
    Meteor,
    Shield,
    Berserk,
}

/// How a spell picks its targets, with the numbers that shape needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpellShape {
    /// Heals the caster (zero for a pure passive trigger)
    SelfCast { heal: i32 },
    /// First target along a direction; `drain` heals the caster on hit
    Projectile {
        dmg: i32,
        range: i32,
        effect: Option<StatusEffect>,
        drain: i32,
    },
    /// Moves the caster along a direction up to the first wall
    Teleport { range: i32 },
    /// Every target within `radius` of the caster
    Aoe {
        dmg: i32,
        radius: f32,
        effect: Option<StatusEffect>,
    },
    /// Greedy nearest-target hops, each closer than `hop` to the previous hit
    Chain {
        dmg: i32,
        hop: f32,
        effect: Option<StatusEffect>,
    },
}

impl SpellShape {
    pub fn is_directional(&self) -> bool {
        matches!(self, SpellShape::Projectile { .. } | SpellShape::Teleport { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spell {
    pub id: SpellId,
    pub name: &'static str,
    pub mana_cost: i32,
    pub shape: SpellShape,
}

impl SpellId {
    pub const ALL: [SpellId; 9] = [
        SpellId::Fireball,
        SpellId::Heal,
        SpellId::Nova,
        SpellId::Blink,
        SpellId::Chain,
        SpellId::Drain,
        SpellId::Meteor,
        SpellId::Shield,
        SpellId::Berserk,
    ];

    pub fn name(&self) -> &'static str {
        self.spell().name
    }

    /// Catalog entry for this spell.
    pub fn spell(&self) -> Spell {
        let (name, mana_cost, shape) = match self {
            SpellId::Fireball => (
                "Fireball",
                8,
                SpellShape::Projectile {
                    dmg: 10,
                    range: 6,
                    effect: Some(StatusEffect::new(EffectKind::Burn, 3, Some(3))),
                    drain: 0,
                },
            ),
            SpellId::Heal => ("Minor Heal", 10, SpellShape::SelfCast { heal: 15 }),
            SpellId::Nova => (
                "Frost Nova",
                15,
                SpellShape::Aoe {
                    dmg: 5,
                    radius: 2.0,
                    effect: Some(StatusEffect::new(EffectKind::Freeze, 2, None)),
                },
            ),
            SpellId::Blink => ("Void Step", 5, SpellShape::Teleport { range: 4 }),
            SpellId::Chain => (
                "Chain Lightning",
                12,
                SpellShape::Chain {
                    dmg: 12,
                    hop: 5.0,
                    effect: Some(StatusEffect::new(EffectKind::Stun, 1, None)),
                },
            ),
            SpellId::Drain => (
                "Life Drain",
                15,
                SpellShape::Projectile {
                    dmg: 10,
                    range: 4,
                    effect: None,
                    drain: 10,
                },
            ),
            SpellId::Meteor => (
                "Meteor Swarm",
                40,
                SpellShape::Aoe {
                    dmg: 40,
                    radius: 5.0,
                    effect: Some(StatusEffect::new(EffectKind::Burn, 5, Some(5))),
                },
            ),
            SpellId::Shield => ("Arcane Barrier", 20, SpellShape::SelfCast { heal: 30 }),
            SpellId::Berserk => ("Blood Rage", 0, SpellShape::SelfCast { heal: 0 }),
        };
        Spell {
            id: *self,
            name,
            mana_cost,
            shape,
        }
    }
}

/// Result of a non-directional cast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastResult {
    /// The spell resolved; a turn must follow
    Resolved,
    /// The spell needs a direction; no turn passes
    Aiming(SpellId),
}

/// Known spell with enough mana, or the refusal.
fn castable(state: &GameState, spell: SpellId) -> Result<Spell, Refusal> {
    if !state.player.knows_spell(spell) {
        return Err(Refusal::UnknownSpell);
    }
    let spell = spell.spell();
    if state.player.mana < spell.mana_cost {
        return Err(Refusal::InsufficientMana);
    }
    Ok(spell)
}

fn spend_mana(state: &mut GameState, spell: &Spell) {
    state.player.mana -= spell.mana_cost;
    state.emit(GameEvent::SpellCast { spell: spell.id });
}

/// Spell damage already carries the caster's effective intelligence.
fn spell_damage(state: &GameState, base: i32) -> i32 {
    base + state.player.effective.stats.int
}

fn strike(state: &mut GameState, target: Entity, damage: i32, effect: Option<StatusEffect>, rng: &mut impl Rng) {
    deal_damage(state, target, damage, false, DamageKind::Magical, rng);
    if let Some(effect) = effect {
        // Killed targets are already gone
        if state.world.contains(target) {
            apply_status_effect(state, target, effect);
        }
    }
}

/// Greedy chain: nearest unhit target closer than `hop` to the previous hit.
pub fn chain_targets(state: &GameState, hop: f32) -> Vec<Entity> {
    let candidates: Vec<(Entity, Position)> = state
        .targets()
        .into_iter()
        .filter_map(|e| state.position_of(e).map(|p| (e, p)))
        .collect();

    let mut hits: Vec<Entity> = Vec::new();
    let mut current = state.player.position;
    for _ in 0..CHAIN_MAX_HOPS {
        let next = candidates
            .iter()
            .filter(|(e, _)| !hits.contains(e))
            .map(|(e, p)| (*e, *p, current.distance(p)))
            .filter(|(_, _, d)| *d < hop)
            .min_by(|a, b| a.2.total_cmp(&b.2));
        match next {
            Some((entity, pos, _)) => {
                hits.push(entity);
                current = pos;
            }
            None => break,
        }
    }
    hits
}

/// Targets within `radius` of the player, in turn order.
pub fn aoe_targets(state: &GameState, radius: f32) -> Vec<Entity> {
    let origin = state.player.position;
    state
        .targets()
        .into_iter()
        .filter(|e| {
            state
                .position_of(*e)
                .is_some_and(|p| origin.distance(&p) <= radius)
        })
        .collect()
}

/// Cast a self, AoE or chain spell, or enter aim mode for a directional one.
///
/// Refusals happen before any mana is spent.
pub fn cast(state: &mut GameState, spell: SpellId, rng: &mut impl Rng) -> Result<CastResult, Refusal> {
    let spell = castable(state, spell)?;

    match spell.shape {
        SpellShape::Projectile { .. } | SpellShape::Teleport { .. } => {
            state.aiming = Some(spell.id);
            state.emit(GameEvent::AimStarted { spell: spell.id });
            return Ok(CastResult::Aiming(spell.id));
        }
        SpellShape::SelfCast { heal } => {
            spend_mana(state, &spell);
            let amount = state.player.heal(heal);
            state.emit(GameEvent::PlayerHealed { amount });
        }
        SpellShape::Aoe { dmg, radius, effect } => {
            let targets = aoe_targets(state, radius);
            spend_mana(state, &spell);
            let damage = spell_damage(state, dmg);
            for target in targets {
                strike(state, target, damage, effect, rng);
            }
        }
        SpellShape::Chain { dmg, hop, effect } => {
            let targets = chain_targets(state, hop);
            if targets.is_empty() {
                debug!("{} has no target", spell.name);
                return Err(Refusal::NoTarget);
            }
            spend_mana(state, &spell);
            let damage = spell_damage(state, dmg);
            for target in targets {
                strike(state, target, damage, effect, rng);
            }
        }
    }
    state.aiming = None;
    Ok(CastResult::Resolved)
}

fn valid_direction(dx: i32, dy: i32) -> bool {
    (-1..=1).contains(&dx) && (-1..=1).contains(&dy) && (dx, dy) != (0, 0)
}

/// Resolve a projectile or teleport spell along (dx, dy). Always spends the turn.
pub fn cast_directional(
    state: &mut GameState,
    spell: SpellId,
    dx: i32,
    dy: i32,
    rng: &mut impl Rng,
) -> Result<(), Refusal> {
    if !valid_direction(dx, dy) {
        return Err(Refusal::InvalidDirection);
    }
    let spell = castable(state, spell)?;
    if !spell.shape.is_directional() {
        return Err(Refusal::InvalidDirection);
    }

    state.aiming = None;
    spend_mana(state, &spell);
    let origin = state.player.position;

    match spell.shape {
        SpellShape::Teleport { range } => {
            let mut dest = origin;
            for step in 1..=range {
                let next = origin.offset(dx * step, dy * step);
                if !state.grid.is_walkable(next.x, next.y) || state.entity_at(next).is_some() {
                    break;
                }
                dest = next;
            }
            state.player.position = dest;
            state.update_visibility();
            state.emit(GameEvent::Teleported { to: dest });
        }
        SpellShape::Projectile {
            dmg,
            range,
            effect,
            drain,
        } => {
            let mut hit = None;
            for step in 1..=range {
                let next = origin.offset(dx * step, dy * step);
                if let Some(target) = state.entity_at(next) {
                    if state.kind_of(target).is_some_and(|k| k.is_targetable()) {
                        hit = Some(target);
                        break;
                    }
                }
                if !state.grid.is_walkable(next.x, next.y) {
                    break;
                }
            }
            match hit {
                Some(target) => {
                    let damage = spell_damage(state, dmg);
                    strike(state, target, damage, effect, rng);
                    if drain > 0 {
                        let amount = state.player.heal(drain);
                        state.emit(GameEvent::PlayerHealed { amount });
                    }
                }
                None => state.emit(GameEvent::SpellMissed { spell: spell.id }),
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Health, StatusEffects};
    use crate::config::GameMode;
    use crate::grid::{Grid, Rect};
    use crate::player::{Player, PlayerClass};
    use crate::profile::Upgrades;
    use crate::spawning;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn open_state(class: PlayerClass) -> GameState {
        let player = Player::new(class, &Upgrades::default(), "default");
        let mut state = GameState::new(player, GameMode::Normal);
        state.depth = 1;
        state.grid = Grid::standard();
        state.grid.carve_rect(&Rect::new(1, 1, 30, 20));
        state.player.position = Position::new(5, 5);
        state
    }

    fn goblin(state: &mut GameState, x: i32, y: i32, hp: i32) -> Entity {
        let mut spawn = spawning::regular_enemy(&spawning::enemies::GOBLIN, 1, GameMode::Normal);
        spawn.health = Health::new(hp);
        let id = state.ids.entity();
        let e = spawn.spawn(&mut state.world, id, Position::new(x, y));
        state.register(e);
        e
    }

    fn hp(state: &GameState, e: Entity) -> i32 {
        state.world.get::<&Health>(e).unwrap().current
    }

    #[test]
    fn test_catalog_shapes() {
        assert!(SpellId::Fireball.spell().shape.is_directional());
        assert!(SpellId::Blink.spell().shape.is_directional());
        assert!(!SpellId::Nova.spell().shape.is_directional());
        assert_eq!(SpellId::Meteor.spell().mana_cost, 40);
        assert_eq!(SpellId::Chain.name(), "Chain Lightning");
    }

    #[test]
    fn test_insufficient_mana_spends_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = open_state(PlayerClass::Mage);
        state.player.spells.push(SpellId::Chain);
        state.player.mana = 10;
        goblin(&mut state, 6, 5, 50);
        assert_eq!(cast(&mut state, SpellId::Chain, &mut rng), Err(Refusal::InsufficientMana));
        assert_eq!(state.player.mana, 10);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_unknown_spell_refused() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut state = open_state(PlayerClass::Warrior);
        assert_eq!(cast(&mut state, SpellId::Nova, &mut rng), Err(Refusal::UnknownSpell));
    }

    #[test]
    fn test_projectile_enters_aim_mode() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = open_state(PlayerClass::Mage);
        let mana = state.player.mana;
        assert_eq!(
            cast(&mut state, SpellId::Fireball, &mut rng),
            Ok(CastResult::Aiming(SpellId::Fireball))
        );
        assert_eq!(state.aiming, Some(SpellId::Fireball));
        assert_eq!(state.player.mana, mana);
    }

    #[test]
    fn test_fireball_hits_first_target_and_burns() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut state = open_state(PlayerClass::Mage);
        let near = goblin(&mut state, 8, 5, 100);
        let far = goblin(&mut state, 10, 5, 100);
        cast_directional(&mut state, SpellId::Fireball, 1, 0, &mut rng).unwrap();

        // 10 base + 7 int
        assert_eq!(hp(&state, near), 83);
        assert_eq!(hp(&state, far), 100);
        assert!(state.world.get::<&StatusEffects>(near).unwrap().has(EffectKind::Burn));
        assert_eq!(state.player.mana, 30 - 8);
    }

    #[test]
    fn test_projectile_miss_still_costs_mana() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut state = open_state(PlayerClass::Mage);
        cast_directional(&mut state, SpellId::Fireball, 0, 1, &mut rng).unwrap();
        assert_eq!(state.player.mana, 22);
        assert!(state.events.contains(|e| matches!(e, GameEvent::SpellMissed { .. })));
    }

    #[test]
    fn test_projectile_stops_at_wall() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut state = open_state(PlayerClass::Mage);
        state.grid.set(7, 5, crate::tile::TileType::Wall);
        let behind = goblin(&mut state, 8, 5, 100);
        cast_directional(&mut state, SpellId::Fireball, 1, 0, &mut rng).unwrap();
        assert_eq!(hp(&state, behind), 100);
    }

    #[test]
    fn test_blink_stops_before_wall() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut state = open_state(PlayerClass::Rogue);
        state.player.position = Position::new(3, 5);
        cast_directional(&mut state, SpellId::Blink, -1, 0, &mut rng).unwrap();
        // x = 0 is the outer wall
        assert_eq!(state.player.position, Position::new(1, 5));

        state.player.position = Position::new(5, 5);
        cast_directional(&mut state, SpellId::Blink, 1, 1, &mut rng).unwrap();
        assert_eq!(state.player.position, Position::new(9, 9));
    }

    #[test]
    fn test_blink_stops_before_occupied_tile() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut state = open_state(PlayerClass::Rogue);
        let blocker = goblin(&mut state, 8, 5, 100);
        cast_directional(&mut state, SpellId::Blink, 1, 0, &mut rng).unwrap();
        assert_eq!(state.player.position, Position::new(7, 5));
        assert_eq!(state.position_of(blocker), Some(Position::new(8, 5)));

        // Adjacent blocker: no step is taken, the cast still resolves
        cast_directional(&mut state, SpellId::Blink, 1, 0, &mut rng).unwrap();
        assert_eq!(state.player.position, Position::new(7, 5));
        assert!(state.events.contains(|e| *e == GameEvent::Teleported { to: Position::new(7, 5) }));
    }

    #[test]
    fn test_invalid_direction() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut state = open_state(PlayerClass::Rogue);
        assert_eq!(
            cast_directional(&mut state, SpellId::Blink, 0, 0, &mut rng),
            Err(Refusal::InvalidDirection)
        );
        assert_eq!(
            cast_directional(&mut state, SpellId::Blink, 2, 0, &mut rng),
            Err(Refusal::InvalidDirection)
        );
    }

    #[test]
    fn test_chain_hops_greedily() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut state = open_state(PlayerClass::Mage);
        state.player.spells.push(SpellId::Chain);
        let a = goblin(&mut state, 8, 5, 100);
        let b = goblin(&mut state, 12, 5, 100);
        let c = goblin(&mut state, 16, 5, 100);
        let d = goblin(&mut state, 20, 5, 100);
        let out_of_reach = goblin(&mut state, 5, 15, 100);

        assert_eq!(chain_targets(&state, 5.0), vec![a, b, c]);
        cast(&mut state, SpellId::Chain, &mut rng).unwrap();
        assert_eq!(hp(&state, a), 100 - 19);
        assert_eq!(hp(&state, c), 100 - 19);
        assert_eq!(hp(&state, d), 100);
        assert_eq!(hp(&state, out_of_reach), 100);
        assert!(state.world.get::<&StatusEffects>(b).unwrap().has(EffectKind::Stun));
    }

    #[test]
    fn test_chain_without_target_is_refused() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut state = open_state(PlayerClass::Mage);
        state.player.spells.push(SpellId::Chain);
        goblin(&mut state, 15, 5, 100);
        assert_eq!(cast(&mut state, SpellId::Chain, &mut rng), Err(Refusal::NoTarget));
        assert_eq!(state.player.mana, 30);
    }

    #[test]
    fn test_aoe_radius_is_inclusive() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut state = open_state(PlayerClass::Mage);
        state.player.spells.push(SpellId::Nova);
        let edge = goblin(&mut state, 7, 5, 100);
        let outside = goblin(&mut state, 7, 7, 100);
        cast(&mut state, SpellId::Nova, &mut rng).unwrap();
        assert_eq!(hp(&state, edge), 100 - 12);
        assert_eq!(hp(&state, outside), 100);
        assert!(state.world.get::<&StatusEffects>(edge).unwrap().has(EffectKind::Freeze));
    }

    #[test]
    fn test_aoe_with_no_targets_still_casts() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut state = open_state(PlayerClass::Mage);
        state.player.spells.push(SpellId::Nova);
        assert_eq!(cast(&mut state, SpellId::Nova, &mut rng), Ok(CastResult::Resolved));
        assert_eq!(state.player.mana, 15);
    }

    #[test]
    fn test_heal_clamps() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut state = open_state(PlayerClass::Mage);
        state.player.spells.push(SpellId::Heal);
        state.player.take_damage(5);
        cast(&mut state, SpellId::Heal, &mut rng).unwrap();
        assert_eq!(state.player.hp, state.player.effective.max_hp);
        assert!(state.events.contains(|e| *e == GameEvent::PlayerHealed { amount: 5 }));
    }

    #[test]
    fn test_drain_heals_on_hit() {
        let mut rng = StdRng::seed_from_u64(14);
        let mut state = open_state(PlayerClass::Mage);
        state.player.spells.push(SpellId::Drain);
        state.player.take_damage(12);
        let target = goblin(&mut state, 5, 7, 100);
        cast_directional(&mut state, SpellId::Drain, 0, 1, &mut rng).unwrap();
        assert_eq!(hp(&state, target), 100 - 17);
        assert_eq!(state.player.hp, 15 - 12 + 10);
    }

    #[test]
    fn test_killing_spell_skips_status() {
        let mut rng = StdRng::seed_from_u64(15);
        let mut state = open_state(PlayerClass::Mage);
        let weak = goblin(&mut state, 6, 5, 3);
        cast_directional(&mut state, SpellId::Fireball, 1, 0, &mut rng).unwrap();
        assert!(!state.world.contains(weak));
        assert!(!state.events.contains(|e| matches!(e, GameEvent::StatusApplied { .. })));
    }
}
