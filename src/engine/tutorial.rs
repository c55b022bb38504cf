//! Scripted tutorial progress.
//!
//! The tutorial is a fixed list of checks. The core advances when the player
//! performs the action the current step waits for; UI-only actions (opening the
//! inventory or the skill tree) arrive through `GameEngine::notify_tutorial`.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::events::GameEvent;
use crate::systems::spells::SpellId;

use super::GameState;

/// Action a tutorial step waits for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TutorialCheck {
    Move,
    Pickup,
    OpenInventory,
    Equip,
    Attack,
    OpenSkills,
    LearnSkill,
    CastSpell,
    Exit,
}

impl TutorialCheck {
    pub const STEPS: [TutorialCheck; 9] = [
        TutorialCheck::Move,
        TutorialCheck::Pickup,
        TutorialCheck::OpenInventory,
        TutorialCheck::Equip,
        TutorialCheck::Attack,
        TutorialCheck::OpenSkills,
        TutorialCheck::LearnSkill,
        TutorialCheck::CastSpell,
        TutorialCheck::Exit,
    ];

    pub fn instruction(&self) -> &'static str {
        match self {
            TutorialCheck::Move => "Move in any direction.",
            TutorialCheck::Pickup => "Walk over the item and pick it up.",
            TutorialCheck::OpenInventory => "Open your inventory.",
            TutorialCheck::Equip => "Equip the blade.",
            TutorialCheck::Attack => "Walk into the dummy to attack it.",
            TutorialCheck::OpenSkills => "You gained a skill point. Open the skill tree.",
            TutorialCheck::LearnSkill => "Learn a skill.",
            TutorialCheck::CastSpell => "Cast a spell.",
            TutorialCheck::Exit => "Take the exit to begin the descent.",
        }
    }
}

/// Index of the current step in `TutorialCheck::STEPS`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorialProgress {
    pub step: usize,
}

impl TutorialProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<TutorialCheck> {
        TutorialCheck::STEPS.get(self.step).copied()
    }

    pub fn is_waiting_for(&self, check: TutorialCheck) -> bool {
        self.current() == Some(check)
    }
}

/// Advance the tutorial if it waits for `check`, applying the new step's grant.
pub fn advance_tutorial(state: &mut GameState, check: TutorialCheck) -> bool {
    let Some(progress) = state.tutorial.as_mut() else {
        return false;
    };
    if !progress.is_waiting_for(check) {
        return false;
    }
    progress.step += 1;
    let step = progress.step;
    let entered = progress.current();
    debug!("tutorial step {} ({:?})", step, entered);
    state.emit(GameEvent::TutorialAdvanced { step });

    match entered {
        Some(TutorialCheck::OpenSkills) => {
            state.player.skill_points += 1;
            state.emit(GameEvent::SkillPointGranted);
        }
        // No one-point node teaches a spell; hand one out so the step is passable
        Some(TutorialCheck::CastSpell) if state.player.spells.is_empty() => {
            state.player.spells.push(SpellId::Fireball);
        }
        _ => {}
    }
    true
}
