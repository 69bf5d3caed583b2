//! The walking avatar.

use bevy::prelude::*;

use crate::procgen::town_plan::TownPlan;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PostStartup, spawn_player);
    }
}

/// Marker for the player box.
#[derive(Component)]
pub struct Player;

/// Edge length of the player box.
pub const PLAYER_SIZE: f32 = 1.0;

fn spawn_player(
    mut commands: Commands,
    plan: Res<TownPlan>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let spawn = plan.player_spawn;
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::from_length(PLAYER_SIZE))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.1, 0.85, 0.2),
            perceptual_roughness: 0.8,
            ..default()
        })),
        Transform::from_xyz(spawn.x, PLAYER_SIZE / 2.0, spawn.y),
        Visibility::default(),
        Player,
        Name::new("Player"),
    ));
    info!("Player spawned at ({:.1}, {:.1})", spawn.x, spawn.y);
}
