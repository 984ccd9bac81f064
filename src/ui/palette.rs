use bevy::prelude::*;

use crate::systems::catalog::EntityCatalog;
use crate::systems::selection::Selection;
use crate::ui::UiInputBlocker;
use crate::AppState;

const PALETTE_WIDTH: f32 = 56.0;
const ENTRY_SIZE: f32 = 40.0;
const COLOR_PANEL: Color = Color::srgba(0.12, 0.12, 0.12, 0.9);
const COLOR_ENTRY_BORDER: Color = Color::srgb(0.3, 0.3, 0.3);
const COLOR_SELECTED_BORDER: Color = Color::srgb(1.0, 0.85, 0.2);

#[derive(Component)]
pub struct Palette;

#[derive(Component)]
pub struct PaletteEntry {
    pub index: usize,
}

pub struct PalettePlugin;

impl Plugin for PalettePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<UiInputBlocker>()
            .add_systems(OnEnter(AppState::Editing), spawn_palette)
            .add_systems(
                Update,
                (
                    handle_entry_clicks,
                    update_entry_highlights,
                    update_input_blocker,
                )
                    .run_if(in_state(AppState::Editing)),
            );
    }
}

fn spawn_palette(
    mut commands: Commands,
    catalog: Res<EntityCatalog>,
    selection: Res<Selection>,
) {
    commands
        .spawn((
            Node {
                width: Val::Px(PALETTE_WIDTH),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                top: Val::Px(0.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                padding: UiRect::all(Val::Px(8.0)),
                row_gap: Val::Px(8.0),
                ..default()
            },
            BackgroundColor(COLOR_PANEL),
            Interaction::default(),
            Palette,
        ))
        .with_children(|parent| {
            // One entry per entity in manifest order, showing its first
            // variant.
            for (index, entity) in catalog.entities.iter().enumerate() {
                spawn_palette_entry(
                    parent,
                    index,
                    entity.first_variant_image(),
                    index == selection.entity,
                );
            }
        });
}

fn spawn_palette_entry(
    parent: &mut ChildBuilder,
    index: usize,
    image: Handle<Image>,
    selected: bool,
) {
    let border = if selected {
        COLOR_SELECTED_BORDER
    } else {
        COLOR_ENTRY_BORDER
    };

    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(ENTRY_SIZE),
                height: Val::Px(ENTRY_SIZE),
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BorderColor(border),
            PaletteEntry { index },
        ))
        .with_children(|parent| {
            parent.spawn((
                ImageNode::new(image),
                Node {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    ..default()
                },
            ));
        });
}

fn handle_entry_clicks(
    interaction_query: Query<(&Interaction, &PaletteEntry), Changed<Interaction>>,
    mut selection: ResMut<Selection>,
) {
    for (interaction, entry) in &interaction_query {
        if *interaction == Interaction::Pressed {
            selection.select_entity(entry.index);
        }
    }
}

fn update_entry_highlights(
    selection: Res<Selection>,
    mut entry_query: Query<(&PaletteEntry, &mut BorderColor)>,
) {
    if !selection.is_changed() {
        return;
    }

    for (entry, mut border) in &mut entry_query {
        let color = if entry.index == selection.entity {
            COLOR_SELECTED_BORDER
        } else {
            COLOR_ENTRY_BORDER
        };
        if border.0 != color {
            border.0 = color;
        }
    }
}

fn update_input_blocker(
    interaction_query: Query<&Interaction, Or<(With<Palette>, With<PaletteEntry>)>>,
    mut blocker: ResMut<UiInputBlocker>,
) {
    let over_ui = interaction_query
        .iter()
        .any(|interaction| *interaction != Interaction::None);
    if blocker.block_world_input != over_ui {
        blocker.block_world_input = over_ui;
    }
}
