use bevy::prelude::*;

mod components;
mod systems;
mod ui;

use systems::grid::{GRID_HEIGHT, GRID_WIDTH, TILE_SIZE};
use systems::{CatalogPlugin, GridPlugin, MapRenderPlugin, SelectionPlugin};
use ui::PalettePlugin;

/// The editor stays inert until the entity manifest and every sprite have
/// loaded; a failed load never leaves `Loading`.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppState {
    #[default]
    Loading,
    Editing,
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Tile Painter".to_string(),
                resolution: (
                    GRID_WIDTH as f32 * TILE_SIZE,
                    GRID_HEIGHT as f32 * TILE_SIZE,
                )
                    .into(),
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        .init_state::<AppState>()
        .add_plugins((
            GridPlugin,
            CatalogPlugin,
            SelectionPlugin,
            MapRenderPlugin,
            PalettePlugin,
        ))
        .add_systems(Startup, setup)
        .run();
}

fn setup(mut commands: Commands) {
    commands.spawn(Camera2d);
}
