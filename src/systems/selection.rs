use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::systems::catalog::EntityCatalog;
use crate::systems::grid::{cursor_to_cell, GridSettings, MapGrid, PlacedEntity};
use crate::ui::UiInputBlocker;
use crate::AppState;

/// The armed brush: which entity, variant and rotation the next paint will
/// stamp, plus the cell currently under the pointer.
#[derive(Resource, Debug, Default)]
pub struct Selection {
    pub entity: usize,
    pub variant: usize,
    pub rotation: u8,
    pub hover: Option<IVec2>,
}

impl Selection {
    /// Advance to the next entity. Saturates at the end of the catalog; any
    /// entity change re-arms the first variant.
    pub fn next_entity(&mut self, entity_count: usize) {
        if self.entity + 1 < entity_count {
            self.entity += 1;
            self.variant = 0;
        }
    }

    /// Step back to the previous entity. Saturates at zero.
    pub fn prev_entity(&mut self) {
        if self.entity > 0 {
            self.entity -= 1;
            self.variant = 0;
        }
    }

    /// Jump straight to an entity (palette click).
    pub fn select_entity(&mut self, index: usize) {
        if index != self.entity {
            self.entity = index;
            self.variant = 0;
        }
    }

    /// Quarter turn clockwise, wrapping after a full turn.
    pub fn rotate(&mut self) {
        self.rotation = (self.rotation + 1) % 4;
    }

    /// Cycle through the current entity's variants, wrapping.
    pub fn cycle_variant(&mut self, variant_count: usize) {
        if variant_count > 0 {
            self.variant = (self.variant + 1) % variant_count;
        }
    }

    /// The record a paint at the hovered cell would store.
    pub fn brush(&self) -> PlacedEntity {
        PlacedEntity {
            entity: self.entity,
            variant: self.variant,
            rotation: self.rotation,
        }
    }
}

pub struct SelectionPlugin;

impl Plugin for SelectionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Selection>().add_systems(
            Update,
            (
                cycle_entity_on_wheel,
                apply_hotkeys,
                (track_cursor, apply_brush).chain(),
            )
                .run_if(in_state(AppState::Editing)),
        );
    }
}

fn cycle_entity_on_wheel(
    mut wheel_events: EventReader<MouseWheel>,
    catalog: Res<EntityCatalog>,
    mut selection: ResMut<Selection>,
) {
    for event in wheel_events.read() {
        // Scrolling toward the user steps forward through the catalog.
        if event.y < 0.0 {
            selection.next_entity(catalog.entities.len());
        } else if event.y > 0.0 {
            selection.prev_entity();
        }
    }
}

fn apply_hotkeys(
    keys: Res<ButtonInput<KeyCode>>,
    catalog: Res<EntityCatalog>,
    mut selection: ResMut<Selection>,
) {
    if keys.just_pressed(KeyCode::KeyR) {
        selection.rotate();
    }
    if keys.just_pressed(KeyCode::KeyF) {
        if let Some(entity) = catalog.entities.get(selection.entity) {
            selection.cycle_variant(entity.variants.len());
        }
    }
}

fn track_cursor(
    window_query: Query<&Window, With<PrimaryWindow>>,
    settings: Res<GridSettings>,
    blocker: Res<UiInputBlocker>,
    mut selection: ResMut<Selection>,
) {
    let Ok(window) = window_query.get_single() else {
        return;
    };

    // Leaving the window or moving over the palette clears the hover cell.
    let hover = if blocker.block_world_input {
        None
    } else {
        window
            .cursor_position()
            .and_then(|cursor| cursor_to_cell(cursor, &settings))
    };

    if selection.hover != hover {
        selection.hover = hover;
    }
}

fn apply_brush(
    mouse: Res<ButtonInput<MouseButton>>,
    selection: Res<Selection>,
    mut map: ResMut<MapGrid>,
) {
    let Some(cell) = selection.hover else {
        return;
    };

    // `pressed` rather than `just_pressed`: holding the button while moving
    // paints every cell the pointer crosses.
    if mouse.pressed(MouseButton::Left) {
        let brush = selection.brush();
        if map.get(cell) != Some(brush) {
            map.set(cell, Some(brush));
        }
    } else if mouse.pressed(MouseButton::Right) {
        if map.get(cell).is_some() {
            map.set(cell, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use bevy::input::mouse::{MouseScrollUnit, MouseWheel};

    use super::*;
    use crate::systems::catalog::EntityDefinition;

    fn test_catalog(variant_counts: &[usize]) -> EntityCatalog {
        let entities = variant_counts
            .iter()
            .enumerate()
            .map(|(i, &count)| {
                let variants: Vec<String> = (0..count).map(|v| format!("v{v}")).collect();
                let images: HashMap<_, _> = variants
                    .iter()
                    .map(|name| (name.clone(), Handle::default()))
                    .collect();
                EntityDefinition {
                    name: format!("entity{i}"),
                    variants,
                    images,
                }
            })
            .collect();
        EntityCatalog {
            entities,
            tile: Handle::default(),
        }
    }

    /// Headless app running the real input systems, driven by injected
    /// button state and wheel events.
    fn editor_app(variant_counts: &[usize]) -> App {
        let mut app = App::new();
        app.add_event::<MouseWheel>()
            .insert_resource(ButtonInput::<KeyCode>::default())
            .insert_resource(ButtonInput::<MouseButton>::default())
            .insert_resource(test_catalog(variant_counts))
            .insert_resource(MapGrid::new(48, 27))
            .init_resource::<Selection>()
            .add_systems(Update, (cycle_entity_on_wheel, apply_hotkeys, apply_brush));
        app
    }

    fn scroll(app: &mut App, y: f32) {
        app.world_mut().send_event(MouseWheel {
            unit: MouseScrollUnit::Line,
            x: 0.0,
            y,
            window: Entity::PLACEHOLDER,
        });
        app.update();
    }

    fn press_key(app: &mut App, key: KeyCode) {
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(key);
        app.update();
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .reset_all();
    }

    fn hold_button(app: &mut App, button: MouseButton, cell: IVec2) {
        app.world_mut().resource_mut::<Selection>().hover = Some(cell);
        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(button);
        app.update();
        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .reset_all();
    }

    fn selection(app: &App) -> &Selection {
        app.world().resource::<Selection>()
    }

    #[test]
    fn wheel_saturates_at_both_ends_of_the_catalog() {
        let mut app = editor_app(&[1, 1, 1]);

        for _ in 0..5 {
            scroll(&mut app, -1.0);
        }
        assert_eq!(selection(&app).entity, 2);

        for _ in 0..7 {
            scroll(&mut app, 1.0);
        }
        assert_eq!(selection(&app).entity, 0);
    }

    #[test]
    fn entity_change_rearms_the_first_variant() {
        let mut app = editor_app(&[1, 4]);

        scroll(&mut app, -1.0);
        press_key(&mut app, KeyCode::KeyF);
        assert_eq!(selection(&app).variant, 1);

        scroll(&mut app, 1.0);
        assert_eq!(selection(&app).entity, 0);
        assert_eq!(selection(&app).variant, 0);
    }

    #[test]
    fn rotation_wraps_after_four_presses() {
        let mut app = editor_app(&[1]);

        for _ in 0..5 {
            press_key(&mut app, KeyCode::KeyR);
        }
        assert_eq!(selection(&app).rotation, 1);
    }

    #[test]
    fn variant_wraps_over_the_current_entity_count() {
        let mut app = editor_app(&[3]);

        for _ in 0..4 {
            press_key(&mut app, KeyCode::KeyF);
        }
        assert_eq!(selection(&app).variant, 1);
    }

    #[test]
    fn saturated_scroll_still_resets_nothing() {
        let mut app = editor_app(&[2]);

        press_key(&mut app, KeyCode::KeyF);
        scroll(&mut app, -1.0);
        // Single-entity catalog: the wheel has nowhere to go, the variant
        // survives.
        assert_eq!(selection(&app).entity, 0);
        assert_eq!(selection(&app).variant, 1);
    }

    #[test]
    fn paint_then_erase_leaves_the_cell_empty() {
        let mut app = editor_app(&[1]);
        let cell = IVec2::new(12, 4);

        hold_button(&mut app, MouseButton::Left, cell);
        assert!(app.world().resource::<MapGrid>().get(cell).is_some());

        hold_button(&mut app, MouseButton::Right, cell);
        assert_eq!(app.world().resource::<MapGrid>().get(cell), None);
    }

    #[test]
    fn paint_scroll_cycle_paint_scenario() {
        let mut app = editor_app(&[2, 3]);

        hold_button(&mut app, MouseButton::Left, IVec2::new(5, 10));
        scroll(&mut app, -1.0);
        press_key(&mut app, KeyCode::KeyF);
        press_key(&mut app, KeyCode::KeyF);
        hold_button(&mut app, MouseButton::Left, IVec2::new(6, 10));

        let map = app.world().resource::<MapGrid>();
        assert_eq!(
            map.get(IVec2::new(5, 10)),
            Some(PlacedEntity {
                entity: 0,
                variant: 0,
                rotation: 0,
            })
        );
        assert_eq!(
            map.get(IVec2::new(6, 10)),
            Some(PlacedEntity {
                entity: 1,
                variant: 2,
                rotation: 0,
            })
        );
    }

    #[test]
    fn hovering_without_buttons_never_mutates_the_map() {
        let mut app = editor_app(&[2, 3]);
        let cell = IVec2::new(10, 10);
        let stored = PlacedEntity {
            entity: 1,
            variant: 1,
            rotation: 2,
        };

        app.world_mut()
            .resource_mut::<MapGrid>()
            .set(cell, Some(stored));
        app.world_mut().resource_mut::<Selection>().hover = Some(cell);
        press_key(&mut app, KeyCode::KeyR);
        app.update();

        // The brush previewed over the cell differs from what is stored, and
        // storage is untouched.
        assert_ne!(selection(&app).brush(), stored);
        assert_eq!(app.world().resource::<MapGrid>().get(cell), Some(stored));
    }

    #[test]
    fn out_of_range_hover_paints_nothing() {
        let mut app = editor_app(&[1]);

        hold_button(&mut app, MouseButton::Left, IVec2::new(-3, 99));
        assert_eq!(app.world().resource::<MapGrid>().iter_placed().count(), 0);
    }
}
