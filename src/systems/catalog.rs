use std::collections::HashMap;
use std::fs;

use bevy::asset::LoadState;
use bevy::prelude::*;
use serde::Deserialize;

use crate::AppState;

const MANIFEST_PATH: &str = "assets/entities.json";
const SPRITE_DIR: &str = "sprites";
const TILE_SPRITE_PATH: &str = "sprites/tile.png";

/// One entry of `assets/entities.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityEntry {
    pub name: String,
    pub variants: Vec<String>,
}

/// A paintable entity: its ordered variant names plus one sprite per
/// variant, keyed by variant name. Immutable once loading finishes.
pub struct EntityDefinition {
    pub name: String,
    pub variants: Vec<String>,
    pub images: HashMap<String, Handle<Image>>,
}

impl EntityDefinition {
    pub fn image(&self, variant: &str) -> Handle<Image> {
        self.images.get(variant).cloned().unwrap_or_default()
    }

    /// The sprite shown for this entity in the palette.
    pub fn first_variant_image(&self) -> Handle<Image> {
        self.variants
            .first()
            .map(|variant| self.image(variant))
            .unwrap_or_default()
    }
}

/// Every loaded entity in manifest order, plus the background tile.
#[derive(Resource, Default)]
pub struct EntityCatalog {
    pub entities: Vec<EntityDefinition>,
    pub tile: Handle<Image>,
}

impl EntityCatalog {
    fn handles(&self) -> impl Iterator<Item = &Handle<Image>> {
        std::iter::once(&self.tile)
            .chain(self.entities.iter().flat_map(|entity| entity.images.values()))
    }
}

pub struct CatalogPlugin;

impl Plugin for CatalogPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EntityCatalog>()
            .add_systems(Startup, load_catalog)
            .add_systems(
                Update,
                finish_loading.run_if(in_state(AppState::Loading)),
            );
    }
}

/// Reads the entity manifest and queues every sprite load. A missing or
/// malformed manifest leaves the catalog empty, which keeps the app in the
/// loading state for good.
fn load_catalog(mut catalog: ResMut<EntityCatalog>, asset_server: Res<AssetServer>) {
    let entries = match fs::read_to_string(MANIFEST_PATH) {
        Ok(contents) => match serde_json::from_str::<Vec<EntityEntry>>(&contents) {
            Ok(entries) => entries,
            Err(err) => {
                error!("Failed to parse {}: {}", MANIFEST_PATH, err);
                return;
            }
        },
        Err(err) => {
            error!("Failed to read {}: {}", MANIFEST_PATH, err);
            return;
        }
    };

    if entries.is_empty() {
        error!("{} lists no entities", MANIFEST_PATH);
        return;
    }

    catalog.tile = asset_server.load(TILE_SPRITE_PATH);

    // Sprites follow the `{name}-{variant}.png` naming convention.
    for entry in entries {
        let mut images = HashMap::new();
        for variant in &entry.variants {
            let path = format!("{}/{}-{}.png", SPRITE_DIR, entry.name, variant);
            images.insert(variant.clone(), asset_server.load(path));
        }
        catalog.entities.push(EntityDefinition {
            name: entry.name,
            variants: entry.variants,
            images,
        });
    }
}

/// Promotes to the editing state once every queued sprite has finished
/// loading. A failed load is reported once and the editor stays inert.
fn finish_loading(
    catalog: Res<EntityCatalog>,
    asset_server: Res<AssetServer>,
    mut next_state: ResMut<NextState<AppState>>,
    mut failed: Local<bool>,
) {
    if *failed || catalog.entities.is_empty() {
        return;
    }

    let mut all_loaded = true;
    for handle in catalog.handles() {
        match asset_server.get_load_state(handle.id()) {
            Some(LoadState::Loaded) => {}
            Some(LoadState::Failed(err)) => {
                error!("Failed to load {:?}: {}", handle.path(), err);
                *failed = true;
                return;
            }
            _ => all_loaded = false,
        }
    }

    if all_loaded {
        info!(
            "Loaded {} entities, entering the editor",
            catalog.entities.len()
        );
        next_state.set(AppState::Editing);
    }
}
