use bitflags::bitflags;

use crate::geometry::TilePos;

/// Static layout of the area the creatures currently live in.
pub trait AreaMap {
    fn info(&self) -> &AreaInfo;

    fn dimensions(&self) -> AreaDimensions;

    /// Flags of the tile at `tile`. Tiles outside the bounds report empty flags.
    fn tile_flags(&self, tile: TilePos) -> TileFlags;

    fn contains(&self, tile: TilePos) -> bool {
        self.dimensions().contains(tile)
    }

    fn is_occupied(&self, tile: TilePos) -> bool {
        self.tile_flags(tile).contains(TileFlags::OCCUPIED)
    }

    fn is_placeable(&self, tile: TilePos) -> bool {
        self.tile_flags(tile).contains(TileFlags::PLACEABLE)
    }

    fn is_on_map(&self, tile: TilePos) -> bool {
        self.contains(tile) && self.tile_flags(tile).contains(TileFlags::ON_MAP)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaDimensions {
    pub width: u32,
    pub height: u32,
}

impl AreaDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, tile: TilePos) -> bool {
        tile.x >= 0 && tile.y >= 0 && tile.x < self.width as i32 && tile.y < self.height as i32
    }
}

bitflags! {
    /// Per-tile placement facts consulted by the spawn injector.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TileFlags: u8 {
        /// Part of the navigable map.
        const ON_MAP = 1 << 0;
        /// Clear terrain an entity may stand on.
        const PLACEABLE = 1 << 1;
        /// Held by an object, feature, or creature.
        const OCCUPIED = 1 << 2;

        const OPEN = Self::ON_MAP.bits() | Self::PLACEABLE.bits();
    }
}

/// Name and population class of an area.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaInfo {
    pub name: String,
    pub kind: AreaKind,
}

impl AreaInfo {
    pub fn new(name: impl Into<String>, kind: AreaKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn tiered(name: impl Into<String>, tier: i32) -> Self {
        Self::new(name, AreaKind::Tiered { tier })
    }

    /// Difficulty tier for areas that support procedural population.
    pub fn tier(&self) -> Option<i32> {
        match self.kind {
            AreaKind::Tiered { tier } => Some(tier),
            AreaKind::Fixed => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AreaKind {
    /// Procedurally populated area at a difficulty tier (mine floor, cave level).
    Tiered { tier: i32 },
    /// Hand-authored area that is never populated by the injector.
    Fixed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_tiles_are_on_map_and_placeable() {
        assert!(TileFlags::OPEN.contains(TileFlags::ON_MAP | TileFlags::PLACEABLE));
        assert!(!TileFlags::OPEN.contains(TileFlags::OCCUPIED));
    }

    #[test]
    fn only_tiered_areas_report_a_tier() {
        assert_eq!(AreaInfo::tiered("Mine", 7).tier(), Some(7));
        assert_eq!(AreaInfo::new("Farm", AreaKind::Fixed).tier(), None);
    }

    #[test]
    fn dimensions_reject_negative_tiles() {
        let dims = AreaDimensions::new(4, 3);
        assert!(dims.contains(TilePos::new(3, 2)));
        assert!(!dims.contains(TilePos::new(-1, 0)));
        assert!(!dims.contains(TilePos::new(4, 0)));
    }
}
