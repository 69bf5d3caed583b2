//! Drivable vehicles: spawning, the ordered roster and entering/exiting.

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;

use crate::controls::ToggleVehicle;
use crate::game_state::{ControlMode, TownDriveSet};
use crate::player::Player;
use crate::procgen::town_plan::TownPlan;

pub struct VehiclesPlugin;

impl Plugin for VehiclesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<VehicleRoster>()
            .init_resource::<BoardingConfig>()
            .init_resource::<VehicleStyle>()
            .add_systems(PostStartup, spawn_vehicles)
            .add_systems(
                Update,
                handle_vehicle_toggle.in_set(TownDriveSet::Boarding),
            );
    }
}

/// Drivable vehicle state.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Vehicle {
    /// Rotation about +Y in radians; 0 faces -Z.
    pub heading: f32,
    /// Signed speed in world units per tick.
    pub speed: f32,
}

impl Vehicle {
    pub fn parked(heading: f32) -> Self {
        Self {
            heading,
            speed: 0.0,
        }
    }

    /// Unit vector the vehicle drives along at positive speed.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(-self.heading.sin(), 0.0, -self.heading.cos())
    }
}

/// Vehicles in spawn order. Entry picks the first match in this order.
#[derive(Resource, Default, Debug)]
pub struct VehicleRoster(pub Vec<Entity>);

impl VehicleRoster {
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Resource, Clone, Debug)]
pub struct BoardingConfig {
    /// A vehicle closer than this (strictly) can be entered.
    pub enter_radius: f32,
    /// Where the player reappears relative to the vehicle on exit.
    pub exit_offset: Vec3,
}

impl Default for BoardingConfig {
    fn default() -> Self {
        Self {
            enter_radius: 3.0,
            exit_offset: Vec3::new(2.0, 0.0, 0.0),
        }
    }
}

/// Box dimensions for the vehicle body.
#[derive(Resource, Clone, Debug)]
pub struct VehicleStyle {
    pub width: f32,
    pub height: f32,
    pub length: f32,
    pub wheel_radius: f32,
}

impl Default for VehicleStyle {
    fn default() -> Self {
        Self {
            width: 2.0,
            height: 1.0,
            length: 4.0,
            wheel_radius: 0.35,
        }
    }
}

// Car color palette
const CAR_COLORS: &[(f32, f32, f32)] = &[
    (0.8, 0.1, 0.1),   // Red
    (0.1, 0.3, 0.8),   // Blue
    (0.95, 0.75, 0.1), // Yellow
    (0.9, 0.9, 0.92),  // White
    (0.1, 0.1, 0.12),  // Black
    (0.6, 0.6, 0.65),  // Silver
    (0.2, 0.5, 0.25),  // Green
    (0.4, 0.35, 0.25), // Brown/tan
];

/// Outcome of an enter/exit request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Boarding {
    Enter(Entity),
    Exit { vehicle: Entity, drop_off: Vec3 },
    /// Walking and nothing within reach.
    NoneInRange,
}

/// First vehicle, in roster order, strictly within `radius` of `player`.
pub fn first_in_range(player: Vec3, vehicles: &[(Entity, Vec3)], radius: f32) -> Option<Entity> {
    vehicles
        .iter()
        .find(|(_, position)| position.distance(player) < radius)
        .map(|&(entity, _)| entity)
}

/// Decide what an enter/exit request does. `vehicles` is in roster order.
pub fn resolve_toggle(
    mode: ControlMode,
    player: Vec3,
    vehicles: &[(Entity, Vec3)],
    config: &BoardingConfig,
) -> Boarding {
    match mode {
        ControlMode::Walking => first_in_range(player, vehicles, config.enter_radius)
            .map_or(Boarding::NoneInRange, Boarding::Enter),
        ControlMode::Driving { vehicle } => {
            let drop_off = vehicles
                .iter()
                .find(|&&(entity, _)| entity == vehicle)
                .map(|&(_, position)| position + config.exit_offset)
                .unwrap_or(player);
            Boarding::Exit { vehicle, drop_off }
        }
    }
}

fn spawn_vehicles(
    mut commands: Commands,
    plan: Res<TownPlan>,
    style: Res<VehicleStyle>,
    mut roster: ResMut<VehicleRoster>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    info!("Spawning vehicles...");

    let body_mesh = meshes.add(Cuboid::new(style.width, style.height, style.length));
    let cabin_mesh = meshes.add(Cuboid::new(
        style.width * 0.9,
        style.height * 0.6,
        style.length * 0.5,
    ));
    let wheel_mesh = meshes.add(Cylinder::new(style.wheel_radius, 0.2));

    // Window material (tinted glass)
    let window_material = materials.add(StandardMaterial {
        base_color: Color::srgba(0.1, 0.15, 0.2, 0.8),
        perceptual_roughness: 0.1,
        metallic: 0.3,
        ..default()
    });
    let wheel_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.15, 0.15, 0.15),
        perceptual_roughness: 0.9,
        ..default()
    });

    let half_height = style.height / 2.0;
    let wheel_offsets = [
        Vec3::new(style.width * 0.5, -half_height, style.length * 0.35),
        Vec3::new(-style.width * 0.5, -half_height, style.length * 0.35),
        Vec3::new(style.width * 0.5, -half_height, -style.length * 0.35),
        Vec3::new(-style.width * 0.5, -half_height, -style.length * 0.35),
    ];

    for (i, spot) in plan.parking.iter().enumerate() {
        let (r, g, b) = CAR_COLORS[i % CAR_COLORS.len()];
        let body_material = materials.add(StandardMaterial {
            base_color: Color::srgb(r, g, b),
            perceptual_roughness: 0.4,
            metallic: 0.6,
            ..default()
        });

        let vehicle = Vehicle::parked(spot.heading);
        let id = commands
            .spawn((
                Mesh3d(body_mesh.clone()),
                MeshMaterial3d(body_material),
                Transform::from_xyz(spot.position.x, half_height, spot.position.y)
                    .with_rotation(Quat::from_rotation_y(vehicle.heading)),
                vehicle,
                Name::new(format!("Vehicle {i}")),
            ))
            .with_children(|car| {
                car.spawn((
                    Mesh3d(cabin_mesh.clone()),
                    MeshMaterial3d(window_material.clone()),
                    Transform::from_xyz(0.0, style.height * 0.8, style.length * 0.1),
                ));
                for offset in wheel_offsets {
                    car.spawn((
                        Mesh3d(wheel_mesh.clone()),
                        MeshMaterial3d(wheel_material.clone()),
                        Transform::from_translation(offset)
                            .with_rotation(Quat::from_rotation_z(FRAC_PI_2)),
                    ));
                }
            })
            .id();

        roster.0.push(id);
    }

    info!("Spawned {} vehicles", roster.len());
}

fn handle_vehicle_toggle(
    mut requests: EventReader<ToggleVehicle>,
    mut mode: ResMut<ControlMode>,
    roster: Res<VehicleRoster>,
    config: Res<BoardingConfig>,
    mut player: Single<(&mut Transform, &mut Visibility), With<Player>>,
    mut vehicles: Query<(&Transform, &mut Vehicle), Without<Player>>,
) {
    for _ in requests.read() {
        let positions: Vec<(Entity, Vec3)> = roster
            .iter()
            .filter_map(|entity| {
                vehicles
                    .get(entity)
                    .ok()
                    .map(|(transform, _)| (entity, transform.translation))
            })
            .collect();

        let (player_transform, visibility) = &mut *player;

        match resolve_toggle(*mode, player_transform.translation, &positions, &config) {
            Boarding::Enter(vehicle) => {
                *mode = ControlMode::Driving { vehicle };
                **visibility = Visibility::Hidden;
                info!("Entered vehicle {:?}", vehicle);
            }
            Boarding::Exit { vehicle, drop_off } => {
                if let Ok((_, mut state)) = vehicles.get_mut(vehicle) {
                    state.speed = 0.0;
                }
                player_transform.translation = drop_off;
                **visibility = Visibility::Inherited;
                *mode = ControlMode::Walking;
                info!("Exited vehicle {:?}", vehicle);
            }
            Boarding::NoneInRange => {
                debug!("No vehicle within {} units", config.enter_radius);
            }
        }
    }
}
