//! Turn execution: everything that happens after the player's action resolved.

use hecs::Entity;
use log::debug;
use rand::Rng;

use crate::components::{Health, Position, StatusEffects};
use crate::events::{DamageKind, GameEvent};
use crate::systems::ai::{decide_action, AiAction};
use crate::systems::combat::deal_damage;
use crate::systems::effects::tick_effects;

use super::{GameState, TerminalState};

/// Advance one turn: mana regen, the entity phase, pruning.
///
/// Entities act one at a time in insertion order, against the positions left by
/// earlier entities of the same turn.
pub fn process_turn(state: &mut GameState, rng: &mut impl Rng) {
    let regen = state.player.effective.mana_regen;
    state.player.restore_mana(regen);

    let order: Vec<Entity> = state.turn_order.clone();
    for entity in order {
        if state.terminal.is_over() {
            break;
        }
        if !state.world.contains(entity) {
            continue;
        }
        run_entity(state, entity, rng);
    }

    prune_dead(state);
    state.turn += 1;
}

fn run_entity(state: &mut GameState, entity: Entity, rng: &mut impl Rng) {
    let tick = match state.world.get::<&mut StatusEffects>(entity) {
        Ok(mut effects) => tick_effects(&mut effects),
        Err(_) => return,
    };

    if tick.burn_damage > 0 {
        deal_damage(state, entity, tick.burn_damage, false, DamageKind::True, rng);
        if !state.world.contains(entity) {
            return;
        }
    }
    if tick.skip_turn {
        return;
    }

    match decide_action(state, entity, rng) {
        AiAction::Idle => {}
        AiAction::HealerCue => {
            if let Some(id) = state.id_of(entity) {
                state.emit(GameEvent::HealerCue { entity: id });
            }
        }
        AiAction::RangedAttack { damage } => hit_player(state, entity, damage, true),
        AiAction::MeleeAttack { damage } => hit_player(state, entity, damage, false),
        AiAction::MoveTo(to) => {
            if let Ok(mut pos) = state.world.get::<&mut Position>(entity) {
                *pos = to;
            }
            if let Some(id) = state.id_of(entity) {
                state.emit(GameEvent::EntityMoved { entity: id, to });
            }
        }
    }
}

fn hit_player(state: &mut GameState, attacker: Entity, damage: i32, ranged: bool) {
    let Some(id) = state.id_of(attacker) else {
        return;
    };
    state.player.take_damage(damage);
    state.emit(GameEvent::PlayerDamaged {
        attacker: id,
        amount: damage,
        ranged,
    });
    if state.player.is_dead() {
        state.set_terminal(TerminalState::Defeat);
    }
}

/// Remove anything that reached zero hp without going through a death path.
fn prune_dead(state: &mut GameState) {
    let dead: Vec<Entity> = state
        .live_entities()
        .filter(|e| {
            state
                .world
                .get::<&Health>(*e)
                .map(|h| h.is_dead())
                .unwrap_or(false)
        })
        .collect();
    for entity in dead {
        debug!("pruning dead entity {:?}", entity);
        state.despawn(entity);
    }
    let world = &state.world;
    state.turn_order.retain(|e| world.contains(*e));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{EffectKind, StatusEffect};
    use crate::config::GameMode;
    use crate::grid::{Grid, Rect};
    use crate::player::{Player, PlayerClass};
    use crate::profile::Upgrades;
    use crate::spawning;
    use crate::systems::effects::apply_status_effect;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn state() -> GameState {
        let player = Player::new(PlayerClass::Warrior, &Upgrades::default(), "default");
        let mut state = GameState::new(player, GameMode::Normal);
        state.depth = 1;
        state.grid = Grid::standard();
        state.grid.carve_rect(&Rect::new(1, 1, 30, 20));
        state.player.position = Position::new(10, 10);
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

    fn pos(state: &GameState, e: Entity) -> Position {
        state.position_of(e).unwrap()
    }

    #[test]
    fn test_turn_counter_and_mana_regen() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = state();
        state.player.mana = 0;
        process_turn(&mut state, &mut rng);
        assert_eq!(state.turn, 1);
        // int 1: regen 1
        assert_eq!(state.player.mana, 1);
    }

    #[test]
    fn test_burn_deals_nine_over_three_turns() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut state = state();
        // Far away so it never reaches the player
        let target = goblin(&mut state, 28, 2, 50);
        apply_status_effect(&mut state, target, StatusEffect::new(EffectKind::Burn, 3, Some(3)));

        for _ in 0..3 {
            process_turn(&mut state, &mut rng);
        }
        assert_eq!(state.world.get::<&Health>(target).unwrap().current, 41);
        assert!(state.world.get::<&StatusEffects>(target).unwrap().is_empty());

        process_turn(&mut state, &mut rng);
        assert_eq!(state.world.get::<&Health>(target).unwrap().current, 41);
    }

    #[test]
    fn test_burn_kill_pays_out() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = state();
        let target = goblin(&mut state, 28, 2, 2);
        apply_status_effect(&mut state, target, StatusEffect::new(EffectKind::Burn, 3, Some(3)));
        process_turn(&mut state, &mut rng);
        assert!(!state.world.contains(target));
        assert!(state.turn_order.is_empty());
        assert_eq!(state.run_stats.kills, 1);
        assert!(state.player.xp > 0);
    }

    #[test]
    fn test_frozen_entity_skips_turn() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut state = state();
        let g = goblin(&mut state, 6, 6, 50);
        apply_status_effect(&mut state, g, StatusEffect::new(EffectKind::Freeze, 1, None));
        process_turn(&mut state, &mut rng);
        assert_eq!(pos(&state, g), Position::new(6, 6));
        process_turn(&mut state, &mut rng);
        assert_eq!(pos(&state, g), Position::new(7, 7));
    }

    #[test]
    fn test_insertion_order_blocks_later_movers() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut state = state();
        state.player.position = Position::new(10, 5);
        let first = goblin(&mut state, 7, 5, 50);
        let second = goblin(&mut state, 6, 5, 50);
        process_turn(&mut state, &mut rng);
        assert_eq!(pos(&state, first), Position::new(8, 5));
        // The tile `first` vacated was free when `second` moved
        assert_eq!(pos(&state, second), Position::new(7, 5));
    }

    #[test]
    fn test_earlier_mover_takes_contested_tile() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut state = state();
        state.player.position = Position::new(10, 5);
        // Both step diagonally onto (9, 5)
        let first = goblin(&mut state, 8, 4, 50);
        let second = goblin(&mut state, 8, 6, 50);
        process_turn(&mut state, &mut rng);
        assert_eq!(pos(&state, first), Position::new(9, 5));
        assert_eq!(pos(&state, second), Position::new(9, 6));
    }

    #[test]
    fn test_melee_damage_and_defeat() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut state = state();
        goblin(&mut state, 11, 10, 50);
        state.player.hp = 1;
        process_turn(&mut state, &mut rng);
        assert_eq!(state.player.hp, 0);
        assert_eq!(state.terminal, TerminalState::Defeat);
        assert!(state.events.contains(|e| matches!(e, GameEvent::PlayerDamaged { ranged: false, .. })));
        assert!(state.events.contains(|e| *e == GameEvent::Defeat));
    }

    #[test]
    fn test_zero_hp_leftovers_are_pruned() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut state = state();
        let g = goblin(&mut state, 28, 18, 50);
        state.world.get::<&mut Health>(g).unwrap().current = 0;
        process_turn(&mut state, &mut rng);
        assert!(!state.world.contains(g));
        assert!(state.turn_order.is_empty());
    }
}
