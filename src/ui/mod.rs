use bevy::prelude::Resource;

pub mod palette;

pub use palette::*;

/// Set while the pointer is over the palette so painting underneath is
/// suppressed.
#[derive(Resource, Default)]
pub struct UiInputBlocker {
    pub block_world_input: bool,
}
