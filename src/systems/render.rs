use std::f32::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4};

use bevy::prelude::*;
use bevy::sprite::Anchor;

use crate::components::{BackgroundTile, GridPosition, PlacedVisual, PlacementPreview};
use crate::systems::catalog::EntityCatalog;
use crate::systems::grid::{cell_origin, GridSettings, MapGrid, PlacedEntity};
use crate::systems::selection::Selection;
use crate::AppState;

const BACKGROUND_Z: f32 = 0.0;
const PLACED_Z: f32 = 1.0;
const PREVIEW_Z: f32 = 2.0;

pub struct MapRenderPlugin;

impl Plugin for MapRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::Editing), spawn_background)
            .add_systems(
                Update,
                (sync_placed_sprites, update_placement_preview)
                    .chain()
                    .run_if(in_state(AppState::Editing)),
            );
    }
}

/// One background tile per cell, spawned once the assets are in.
fn spawn_background(
    mut commands: Commands,
    catalog: Res<EntityCatalog>,
    settings: Res<GridSettings>,
) {
    for y in 0..settings.height {
        for x in 0..settings.width {
            let origin = cell_origin(IVec2::new(x, y), &settings);
            commands.spawn((
                Sprite {
                    image: catalog.tile.clone(),
                    custom_size: Some(Vec2::splat(settings.tile_size)),
                    anchor: Anchor::TopLeft,
                    ..default()
                },
                Transform::from_xyz(origin.x, origin.y, BACKGROUND_Z),
                BackgroundTile,
            ));
        }
    }
}

/// Rebuilds the placed-entity sprites whenever the map changes.
fn sync_placed_sprites(
    mut commands: Commands,
    map: Res<MapGrid>,
    catalog: Res<EntityCatalog>,
    settings: Res<GridSettings>,
    placed_query: Query<Entity, With<PlacedVisual>>,
) {
    if !map.is_changed() {
        return;
    }

    for entity in &placed_query {
        commands.entity(entity).despawn();
    }

    for (cell, placed) in map.iter_placed() {
        let Some(sprite) = sprite_for(&catalog, &settings, placed) else {
            continue;
        };
        commands.spawn((
            sprite,
            placement_transform(cell, placed.rotation, &settings, PLACED_Z),
            GridPosition::new(cell.x, cell.y),
            PlacedVisual,
        ));
    }
}

/// The hovered cell always shows the armed brush. The preview sprite is
/// rebuilt every frame, and whatever is stored underneath stays hidden until
/// the pointer moves on; the map itself is never touched here.
fn update_placement_preview(
    mut commands: Commands,
    selection: Res<Selection>,
    catalog: Res<EntityCatalog>,
    settings: Res<GridSettings>,
    preview_query: Query<Entity, With<PlacementPreview>>,
    mut placed_query: Query<(&GridPosition, &mut Visibility), With<PlacedVisual>>,
) {
    for entity in &preview_query {
        commands.entity(entity).despawn();
    }

    for (pos, mut visibility) in &mut placed_query {
        let wanted = if selection.hover == Some(pos.to_ivec2()) {
            Visibility::Hidden
        } else {
            Visibility::Inherited
        };
        if *visibility != wanted {
            *visibility = wanted;
        }
    }

    let Some(cell) = selection.hover else {
        return;
    };
    let Some(sprite) = sprite_for(&catalog, &settings, selection.brush()) else {
        return;
    };
    commands.spawn((
        sprite,
        placement_transform(cell, selection.rotation, &settings, PREVIEW_Z),
        PlacementPreview,
    ));
}

fn sprite_for(
    catalog: &EntityCatalog,
    settings: &GridSettings,
    placed: PlacedEntity,
) -> Option<Sprite> {
    let entity = catalog.entities.get(placed.entity)?;
    let variant = entity.variants.get(placed.variant)?;
    Some(Sprite {
        image: entity.image(variant),
        custom_size: Some(Vec2::splat(settings.tile_size)),
        anchor: Anchor::TopLeft,
        ..default()
    })
}

/// Grid-pixel position (origin top left, y down) where a sprite's top-left
/// corner must be anchored so that rotating it by `rotation` quarter turns
/// keeps its center pinned to the cell center. The anchor visits the cell's
/// corners clockwise as the rotation steps.
pub fn sprite_anchor_px(cell: IVec2, rotation: u8, tile_size: f32) -> Vec2 {
    let theta = f32::from(rotation) * FRAC_PI_2;
    let diagonal = theta + FRAC_PI_4;
    Vec2::new(
        (cell.x as f32 - diagonal.cos() * FRAC_1_SQRT_2 + 0.5) * tile_size,
        (cell.y as f32 - diagonal.sin() * FRAC_1_SQRT_2 + 0.5) * tile_size,
    )
}

/// Transform for the sprite occupying `cell` at the given quarter-turn
/// rotation. Grid pixels are y-down; world space is y-up with the grid
/// centered on the origin, so the y axis and the rotation sense flip.
pub fn placement_transform(
    cell: IVec2,
    rotation: u8,
    settings: &GridSettings,
    z: f32,
) -> Transform {
    let anchor = sprite_anchor_px(cell, rotation, settings.tile_size);
    let half = settings.pixel_size() / 2.0;
    let theta = f32::from(rotation) * FRAC_PI_2;
    Transform::from_xyz(anchor.x - half.x, half.y - anchor.y, z)
        .with_rotation(Quat::from_rotation_z(-theta))
}
