//! Run initialization - builds the player and the first floor from a `RunConfig`.

use log::info;
use rand::Rng;

use crate::config::RunConfig;
use crate::player::Player;
use crate::systems::item_gen::generate_item;

use super::floor_transition::{build_tutorial_floor, generate_floor};
use super::tutorial::TutorialProgress;
use super::GameState;

/// Depth the class start kit is generated at
const START_KIT_DEPTH: u32 = 1;

/// Create the state of a new run: player, start kit and first floor.
pub fn start_run(config: &RunConfig, rng: &mut impl Rng) -> GameState {
    let player = Player::new(config.class, &config.upgrades, &config.cosmetic);
    let mut state = GameState::new(player, config.mode);

    if config.tutorial {
        state.player.spells.clear();
        state.tutorial = Some(TutorialProgress::new());
        build_tutorial_floor(&mut state);
    } else {
        give_start_kit(&mut state, rng);
        generate_floor(&mut state, 1, rng);
    }

    info!(
        "{} run started ({:?}{})",
        config.class.name(),
        config.mode,
        if config.tutorial { ", tutorial" } else { "" }
    );
    state
}

/// Generated class items go into the first inventory slots, unequipped.
fn give_start_kit(state: &mut GameState, rng: &mut impl Rng) {
    let kit = state.player.class.kit();
    for (slot, item_type) in kit.start_items.iter().enumerate() {
        let id = state.ids.item();
        let item = generate_item(START_KIT_DEPTH, Some(*item_type), id, rng);
        state.player.inventory[slot] = Some(item);
    }
}
