//! Ground, road surfaces, parks and buildings from the town plan.

use bevy::prelude::*;

use crate::procgen::town_plan::{TownPlan, BUILDING_TINTS};

pub struct SceneryPlugin;

impl Plugin for SceneryPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PostStartup, spawn_scenery);
    }
}

/// Marker for static scenery entities.
#[derive(Component)]
pub struct Scenery;

// Height offsets keep coplanar layers from z-fighting.
const GRASS_Y: f32 = 0.005;
const ROAD_Y: f32 = 0.01;

// Building color palette
const BUILDING_COLORS: [(f32, f32, f32); BUILDING_TINTS] = [
    (0.72, 0.68, 0.62), // Sandstone
    (0.55, 0.57, 0.6),  // Concrete
    (0.62, 0.36, 0.3),  // Brick
    (0.85, 0.83, 0.78), // Plaster
    (0.4, 0.45, 0.52),  // Slate
    (0.7, 0.6, 0.45),   // Ochre
];

fn spawn_scenery(
    mut commands: Commands,
    plan: Res<TownPlan>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    info!("Spawning scenery...");

    let ground_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.35, 0.42, 0.3),
        perceptual_roughness: 1.0,
        ..default()
    });
    let road_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.2, 0.2, 0.22),
        perceptual_roughness: 0.9,
        ..default()
    });
    let grass_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.25, 0.6, 0.2),
        perceptual_roughness: 1.0,
        ..default()
    });
    let building_materials: Vec<Handle<StandardMaterial>> = BUILDING_COLORS
        .iter()
        .map(|&(r, g, b)| {
            materials.add(StandardMaterial {
                base_color: Color::srgb(r, g, b),
                perceptual_roughness: 0.8,
                ..default()
            })
        })
        .collect();

    // Ground extends past the road grid so the edge is lost in the fog.
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(plan.extent.x * 3.0, plan.extent.y * 3.0))),
        MeshMaterial3d(ground_material),
        Transform::IDENTITY,
        Scenery,
    ));

    for road in &plan.roads {
        let size = road.size();
        commands.spawn((
            Mesh3d(meshes.add(Plane3d::default().mesh().size(size.x, size.y))),
            MeshMaterial3d(road_material.clone()),
            Transform::from_xyz(road.center.x, ROAD_Y, road.center.y),
            Scenery,
        ));
    }

    for park in &plan.parks {
        commands.spawn((
            Mesh3d(meshes.add(Plane3d::default().mesh().size(park.size.x, park.size.y))),
            MeshMaterial3d(grass_material.clone()),
            Transform::from_xyz(park.center.x, GRASS_Y, park.center.y),
            Scenery,
        ));
    }

    for building in &plan.buildings {
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::new(
                building.footprint.x,
                building.height,
                building.footprint.y,
            ))),
            MeshMaterial3d(building_materials[building.tint % BUILDING_TINTS].clone()),
            Transform::from_xyz(building.center.x, building.height / 2.0, building.center.y),
            Scenery,
        ));
    }

    info!(
        "Spawned {} roads, {} parks, {} buildings",
        plan.roads.len(),
        plan.parks.len(),
        plan.buildings.len()
    );
}
