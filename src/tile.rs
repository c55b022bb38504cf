use serde::{Deserialize, Serialize};

/// Terrain of a single map cell. The grid is immutable once a floor is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    Wall,
    Floor,
}

impl TileType {
    pub fn is_walkable(&self) -> bool {
        matches!(self, TileType::Floor)
    }

    pub fn blocks_vision(&self) -> bool {
        matches!(self, TileType::Wall)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_is_walkable() {
        assert!(TileType::Floor.is_walkable());
        assert!(!TileType::Floor.blocks_vision());
    }

    #[test]
    fn test_wall_blocks() {
        assert!(!TileType::Wall.is_walkable());
        assert!(TileType::Wall.blocks_vision());
    }
}
