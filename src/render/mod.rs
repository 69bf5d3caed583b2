//! Static scenery rendering and lighting.

use bevy::prelude::*;

pub mod road_markings;
pub mod scenery;

pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::srgb(0.53, 0.75, 0.92)))
            .insert_resource(AmbientLight {
                color: Color::WHITE,
                brightness: 400.0,
            })
            .add_systems(Startup, setup_sun)
            .add_plugins(scenery::SceneryPlugin)
            .add_plugins(road_markings::RoadMarkingsPlugin);
    }
}

fn setup_sun(mut commands: Commands) {
    commands.spawn((
        DirectionalLight {
            illuminance: 10_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(5.0, 10.0, 7.5).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}
