//! Follow camera with chase and top-down views.
//!
//! The camera is re-placed every frame at a fixed offset from whatever the
//! player controls. There is no smoothing and no collision with scenery.

use bevy::{
    core_pipeline::tonemapping::Tonemapping,
    pbr::{DistanceFog, FogFalloff},
    prelude::*,
};

use crate::controls::CycleCameraView;
use crate::game_state::{ControlMode, TownDriveSet};
use crate::player::Player;
use crate::vehicles::Vehicle;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraConfig>()
            .init_resource::<CameraView>()
            .add_systems(Startup, setup_camera)
            .add_systems(
                Update,
                (cycle_camera_view, follow_target)
                    .chain()
                    .in_set(TownDriveSet::Camera),
            );
    }
}

/// How the camera frames its target.
#[derive(Resource, Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum CameraView {
    /// Behind and above the target.
    #[default]
    Follow,
    /// Straight down from above.
    TopDown,
}

impl CameraView {
    pub fn next(self) -> Self {
        match self {
            CameraView::Follow => CameraView::TopDown,
            CameraView::TopDown => CameraView::Follow,
        }
    }
}

#[derive(Resource, Clone, Debug)]
pub struct CameraConfig {
    /// Offset from the player while walking.
    pub walk_offset: Vec3,
    /// Distance behind a driven vehicle.
    pub chase_distance: f32,
    /// Height above a driven vehicle.
    pub chase_height: f32,
    /// Height of the top-down view.
    pub top_down_height: f32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            walk_offset: Vec3::new(0.0, 5.0, 10.0),
            chase_distance: 10.0,
            chase_height: 5.0,
            top_down_height: 40.0,
            fov_degrees: 75.0,
        }
    }
}

/// Marker for the main camera.
#[derive(Component)]
pub struct FollowCamera;

/// Camera transform for a target at `target`.
///
/// `heading` is the driven vehicle's heading, or `None` while walking.
pub fn camera_pose(
    view: CameraView,
    target: Vec3,
    heading: Option<f32>,
    config: &CameraConfig,
) -> Transform {
    match view {
        CameraView::TopDown => {
            Transform::from_translation(target + Vec3::Y * config.top_down_height)
                .looking_at(target, Vec3::NEG_Z)
        }
        CameraView::Follow => {
            let offset = match heading {
                Some(heading) => Vec3::new(
                    heading.sin() * config.chase_distance,
                    config.chase_height,
                    heading.cos() * config.chase_distance,
                ),
                None => config.walk_offset,
            };
            Transform::from_translation(target + offset).looking_at(target, Vec3::Y)
        }
    }
}

fn setup_camera(mut commands: Commands, config: Res<CameraConfig>) {
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: config.fov_degrees.to_radians(),
            near: 0.1,
            far: 1000.0,
            ..default()
        }),
        Transform::from_translation(config.walk_offset).looking_at(Vec3::ZERO, Vec3::Y),
        DistanceFog {
            color: Color::srgba(0.6, 0.7, 0.8, 0.85),
            falloff: FogFalloff::Linear {
                start: 120.0,
                end: 400.0,
            },
            ..default()
        },
        Tonemapping::TonyMcMapface,
        FollowCamera,
    ));
}

fn cycle_camera_view(mut cycles: EventReader<CycleCameraView>, mut view: ResMut<CameraView>) {
    for _ in cycles.read() {
        *view = view.next();
        info!("Camera view: {:?}", *view);
    }
}

fn follow_target(
    mode: Res<ControlMode>,
    view: Res<CameraView>,
    config: Res<CameraConfig>,
    player: Single<&Transform, (With<Player>, Without<FollowCamera>)>,
    vehicles: Query<(&Transform, &Vehicle), Without<FollowCamera>>,
    mut camera: Single<&mut Transform, With<FollowCamera>>,
) {
    let driven = mode.vehicle().and_then(|entity| vehicles.get(entity).ok());
    let (target, heading) = match driven {
        Some((transform, vehicle)) => (transform.translation, Some(vehicle.heading)),
        None => (player.translation, None),
    };

    **camera = camera_pose(*view, target, heading, &config);
}
