//! HUD text and touch pad overlay.

use bevy::prelude::*;

pub mod touch_pads;

use crate::game_state::{ControlMode, TownDriveSet};
use crate::vehicles::{Vehicle, VehicleRoster};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(touch_pads::TouchPadsPlugin)
            .add_systems(Startup, setup_hud)
            .add_systems(Update, update_hud.in_set(TownDriveSet::Hud));
    }
}

#[derive(Component)]
struct HudText;

const PANEL_BG: Color = Color::srgba(0.03, 0.05, 0.04, 0.7);
const TEXT_COLOR: Color = Color::srgb(0.9, 0.95, 0.9);
const MUTED_TEXT: Color = Color::srgb(0.6, 0.7, 0.65);

fn setup_hud(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(10.0),
                left: Val::Px(10.0),
                padding: UiRect::axes(Val::Px(12.0), Val::Px(8.0)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(4.0),
                ..default()
            },
            BackgroundColor(PANEL_BG),
        ))
        .with_children(|panel| {
            panel.spawn((
                Text::new("Walking"),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(TEXT_COLOR),
                HudText,
            ));
            panel.spawn((
                Text::new("WASD / arrows: move   E: enter/exit car   C: camera"),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(MUTED_TEXT),
            ));
        });
}

/// Status line for the current mode.
pub fn status_line(mode: ControlMode, vehicle: Option<&Vehicle>, fleet: usize) -> String {
    match (mode, vehicle) {
        (ControlMode::Driving { .. }, Some(vehicle)) => {
            format!("Driving - speed {:+.3}", vehicle.speed)
        }
        (ControlMode::Driving { .. }, None) => "Driving".to_string(),
        (ControlMode::Walking, _) => format!("Walking - {} cars in town", fleet),
    }
}

fn update_hud(
    mode: Res<ControlMode>,
    roster: Res<VehicleRoster>,
    vehicles: Query<&Vehicle>,
    mut text: Single<&mut Text, With<HudText>>,
) {
    let vehicle = mode.vehicle().and_then(|entity| vehicles.get(entity).ok());
    let line = status_line(*mode, vehicle, roster.len());
    if text.0 != line {
        text.0 = line;
    }
}
