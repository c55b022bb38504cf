//! Status effect systems.
//!
//! Effects are independent instances: applying a second burn adds a second burn,
//! it never refreshes the first. Pure functions here operate on the
//! StatusEffects component directly; the entity-level helper goes through the state.

use hecs::Entity;

use crate::components::{StatusEffect, StatusEffects};
use crate::constants::*;
use crate::engine::GameState;
use crate::events::GameEvent;

/// What one tick did to the afflicted entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectTick {
    pub burn_damage: i32,
    /// Freeze or stun was active this tick
    pub skip_turn: bool,
}

/// Append an effect instance.
pub fn add_effect(effects: &mut StatusEffects, effect: StatusEffect) {
    effects.effects.push(effect);
}

/// Every effect acts once, then durations drop and expired effects are removed.
pub fn tick_effects(effects: &mut StatusEffects) -> EffectTick {
    let mut tick = EffectTick::default();
    for effect in effects.effects.iter_mut() {
        if effect.kind.skips_turn() {
            tick.skip_turn = true;
        } else {
            tick.burn_damage += effect.magnitude.unwrap_or(BURN_DEFAULT_DAMAGE);
        }
        effect.duration -= 1;
    }
    effects.effects.retain(|e| e.duration > 0);
    tick
}

/// Apply an effect to a live entity and announce it.
pub fn apply_status_effect(state: &mut GameState, entity: Entity, effect: StatusEffect) {
    let applied = match state.world.get::<&mut StatusEffects>(entity) {
        Ok(mut effects) => {
            add_effect(&mut effects, effect);
            true
        }
        Err(_) => false,
    };
    if !applied {
        return;
    }
    if let Some(id) = state.id_of(entity) {
        let name = state.name_of(entity);
        state.emit(GameEvent::StatusApplied {
            entity: id,
            name,
            kind: effect.kind,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::EffectKind;

    #[test]
    fn test_same_kind_effects_stack_independently() {
        let mut effects = StatusEffects::new();
        add_effect(&mut effects, StatusEffect::new(EffectKind::Burn, 3, Some(3)));
        add_effect(&mut effects, StatusEffect::new(EffectKind::Burn, 1, Some(2)));
        assert_eq!(effects.effects.len(), 2);

        let tick = tick_effects(&mut effects);
        assert_eq!(tick.burn_damage, 5);
        assert!(!tick.skip_turn);
        assert_eq!(effects.effects.len(), 1);
        assert_eq!(effects.effects[0].duration, 2);
    }

    #[test]
    fn test_burn_totals_over_duration() {
        let mut effects = StatusEffects::new();
        add_effect(&mut effects, StatusEffect::new(EffectKind::Burn, 3, Some(3)));
        let total: i32 = (0..3).map(|_| tick_effects(&mut effects).burn_damage).sum();
        assert_eq!(total, 9);
        assert!(effects.is_empty());
        assert_eq!(tick_effects(&mut effects), EffectTick::default());
    }

    #[test]
    fn test_burn_without_magnitude_deals_default() {
        let mut effects = StatusEffects::new();
        add_effect(&mut effects, StatusEffect::new(EffectKind::Burn, 2, None));
        assert_eq!(tick_effects(&mut effects).burn_damage, BURN_DEFAULT_DAMAGE);
    }

    #[test]
    fn test_freeze_and_stun_skip_turn() {
        let mut effects = StatusEffects::new();
        add_effect(&mut effects, StatusEffect::new(EffectKind::Stun, 1, None));
        assert!(tick_effects(&mut effects).skip_turn);
        assert!(!effects.has(EffectKind::Stun));

        add_effect(&mut effects, StatusEffect::new(EffectKind::Freeze, 2, None));
        assert!(tick_effects(&mut effects).skip_turn);
        assert!(tick_effects(&mut effects).skip_turn);
        assert!(!tick_effects(&mut effects).skip_turn);
    }
}
