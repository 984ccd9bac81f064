use bevy::prelude::*;

pub const TILE_SIZE: f32 = 32.0;
pub const GRID_WIDTH: i32 = 48;
pub const GRID_HEIGHT: i32 = 27;

#[derive(Resource)]
pub struct GridSettings {
    pub tile_size: f32,
    pub width: i32,
    pub height: i32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
        }
    }
}

impl GridSettings {
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * self.tile_size,
            self.height as f32 * self.tile_size,
        )
    }
}

/// One painted cell: indices into the entity catalog plus a quarter-turn
/// count. The catalog never changes after loading, so the indices stay valid
/// for the life of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedEntity {
    pub entity: usize,
    pub variant: usize,
    pub rotation: u8,
}

/// The map itself: a fixed-size grid of optional placed entities. Rows count
/// down from the top of the window, matching cursor coordinates.
#[derive(Resource)]
pub struct MapGrid {
    width: i32,
    height: i32,
    cells: Vec<Option<PlacedEntity>>,
}

impl MapGrid {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            cells: vec![None; (width * height) as usize],
        }
    }

    pub fn get(&self, cell: IVec2) -> Option<PlacedEntity> {
        self.index(cell).and_then(|i| self.cells[i])
    }

    /// Unconditional overwrite. Fast pointer moves near the window edge can
    /// land a cell outside the grid; those writes are dropped.
    pub fn set(&mut self, cell: IVec2, placed: Option<PlacedEntity>) {
        if let Some(i) = self.index(cell) {
            self.cells[i] = placed;
        }
    }

    pub fn iter_placed(&self) -> impl Iterator<Item = (IVec2, PlacedEntity)> + '_ {
        self.cells.iter().enumerate().filter_map(|(i, cell)| {
            cell.map(|placed| {
                (
                    IVec2::new(i as i32 % self.width, i as i32 / self.width),
                    placed,
                )
            })
        })
    }

    fn index(&self, cell: IVec2) -> Option<usize> {
        let in_bounds =
            cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height;
        in_bounds.then(|| (cell.y * self.width + cell.x) as usize)
    }
}

pub struct GridPlugin;

impl Plugin for GridPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GridSettings>()
            .insert_resource(MapGrid::new(GRID_WIDTH, GRID_HEIGHT));
    }
}

// Helper functions for grid coordinate conversion

/// Maps a cursor position (logical pixels, origin at the window's top left)
/// to the cell under it.
pub fn cursor_to_cell(cursor: Vec2, settings: &GridSettings) -> Option<IVec2> {
    let cell = (cursor / settings.tile_size).floor().as_ivec2();
    let in_bounds = cell.x >= 0
        && cell.x < settings.width
        && cell.y >= 0
        && cell.y < settings.height;
    in_bounds.then_some(cell)
}

/// World position of a cell's top-left corner. The grid is centered on the
/// origin with row 0 along the top edge of the window.
pub fn cell_origin(cell: IVec2, settings: &GridSettings) -> Vec2 {
    let half = settings.pixel_size() / 2.0;
    Vec2::new(
        cell.x as f32 * settings.tile_size - half.x,
        half.y - cell.y as f32 * settings.tile_size,
    )
}
