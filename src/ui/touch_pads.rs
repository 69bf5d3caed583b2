//! Translucent squares marking where the touch pads are.

use bevy::prelude::*;

use crate::controls::touch::{HorizontalAnchor, TouchControl, TouchLayout};
use crate::controls::MovementFlags;
use crate::game_state::TownDriveSet;

pub struct TouchPadsPlugin;

impl Plugin for TouchPadsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_touch_pads)
            .add_systems(Update, highlight_held_pads.in_set(TownDriveSet::Hud));
    }
}

#[derive(Component)]
struct TouchPad(TouchControl);

const PAD_IDLE: Color = Color::srgba(1.0, 1.0, 1.0, 0.12);
const PAD_HELD: Color = Color::srgba(1.0, 1.0, 1.0, 0.35);
const PAD_LABEL: Color = Color::srgba(1.0, 1.0, 1.0, 0.6);

fn spawn_touch_pads(mut commands: Commands, layout: Res<TouchLayout>) {
    for control in TouchControl::ALL {
        let anchor = layout.anchor(control);
        let (left, right) = match anchor.horizontal {
            HorizontalAnchor::Left(px) => (Val::Px(px), Val::Auto),
            HorizontalAnchor::Right(px) => (Val::Auto, Val::Px(px)),
        };

        commands
            .spawn((
                Node {
                    position_type: PositionType::Absolute,
                    left,
                    right,
                    bottom: Val::Px(anchor.bottom),
                    width: Val::Px(anchor.size),
                    height: Val::Px(anchor.size),
                    justify_content: JustifyContent::Center,
                    align_items: AlignItems::Center,
                    ..default()
                },
                BackgroundColor(PAD_IDLE),
                BorderRadius::all(Val::Px(8.0)),
                TouchPad(control),
            ))
            .with_children(|pad| {
                pad.spawn((
                    Text::new(control.label()),
                    TextFont {
                        font_size: 20.0,
                        ..default()
                    },
                    TextColor(PAD_LABEL),
                ));
            });
    }
}

fn highlight_held_pads(
    flags: Res<MovementFlags>,
    mut pads: Query<(&TouchPad, &mut BackgroundColor)>,
) {
    if !flags.is_changed() {
        return;
    }

    for (pad, mut background) in &mut pads {
        let held = match pad.0 {
            TouchControl::Forward => flags.forward,
            TouchControl::Backward => flags.backward,
            TouchControl::Left => flags.left,
            TouchControl::Right => flags.right,
            TouchControl::Enter => false,
        };
        background.0 = if held { PAD_HELD } else { PAD_IDLE };
    }
}
