use bevy::prelude::*;

/// Grid cell a visual belongs to.
#[derive(Component, Debug, Clone, Copy)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn to_ivec2(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }
}

/// Background tile sprite.
#[derive(Component)]
pub struct BackgroundTile;

/// Sprite mirroring one painted map cell.
#[derive(Component)]
pub struct PlacedVisual;

/// Live brush preview at the hovered cell.
#[derive(Component)]
pub struct PlacementPreview;
