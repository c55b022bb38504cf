//! Error types: rejected intents and snapshot load failures.

use thiserror::Error;

/// Reason code of a rejected intent. A refusal never changes state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Refusal {
    #[error("not enough mana")]
    InsufficientMana,
    #[error("inventory full")]
    InventoryFull,
    #[error("wrong slot")]
    WrongSlot,
    #[error("the way is blocked")]
    Blocked,
    #[error("no targets nearby")]
    NoTarget,
    #[error("spell not known")]
    UnknownSpell,
    #[error("no such item")]
    UnknownItem,
    #[error("no such skill")]
    UnknownSkill,
    #[error("already unlocked")]
    AlreadyUnlocked,
    #[error("prerequisite not unlocked")]
    PrerequisiteLocked,
    #[error("not enough skill points")]
    NotEnoughSkillPoints,
    #[error("nothing to pick up")]
    NothingToPickUp,
    #[error("nothing equipped in that slot")]
    NothingEquipped,
    #[error("item is not consumable")]
    NotConsumable,
    #[error("invalid direction")]
    InvalidDirection,
    #[error("invalid inventory slot")]
    InvalidSlot,
    #[error("no stairs here")]
    NoStairs,
    #[error("tutorial not complete")]
    TutorialIncomplete,
    #[error("not aiming a spell")]
    NotAiming,
    #[error("the run is over")]
    RunOver,
    #[error("not enough void essence")]
    NotEnoughEssence,
    #[error("no such cosmetic")]
    UnknownCosmetic,
    #[error("cosmetic not unlocked")]
    CosmeticLocked,
}

/// Failure to load a persisted snapshot. No partial recovery is attempted.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u32),
    #[error("corrupt snapshot: {0}")]
    Corrupt(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refusal_messages() {
        assert_eq!(Refusal::InventoryFull.to_string(), "inventory full");
        assert_eq!(Refusal::InsufficientMana.to_string(), "not enough mana");
    }

    #[test]
    fn test_json_error_converts() {
        let err: SnapshotError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, SnapshotError::Json(_)));
    }
}
