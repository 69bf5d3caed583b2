//! TownDrive - walk around a small procedural town and drive parked cars.
//!
//! Each concern is a Bevy plugin; [`TownDrivePlugin`] bundles them in the
//! order the app needs them.

use bevy::prelude::*;

pub mod camera;
pub mod controls;
pub mod game_state;
pub mod movement;
pub mod player;
pub mod procgen;
pub mod render;
pub mod ui;
pub mod vehicles;
pub mod world;

pub struct TownDrivePlugin;

impl Plugin for TownDrivePlugin {
    fn build(&self, app: &mut App) {
        app
            // Control mode and schedule ordering
            .add_plugins(game_state::GameStatePlugin)
            // Town layout
            .add_plugins(world::WorldPlugin)
            .add_plugins(procgen::ProcgenPlugin)
            .add_plugins(render::RenderPlugin)
            // Entities
            .add_plugins(player::PlayerPlugin)
            .add_plugins(vehicles::VehiclesPlugin)
            // Per-frame behaviour
            .add_plugins(controls::ControlsPlugin)
            .add_plugins(movement::MovementPlugin)
            .add_plugins(camera::CameraPlugin)
            // HUD and touch pads
            .add_plugins(ui::UiPlugin);
    }
}
