//! Per-tick walking and driving.
//!
//! Walking nudges the player along the world axes. Driving turns the
//! heading, ramps the speed toward its caps and moves the vehicle along
//! its heading. Step sizes are per tick, not per second.

use bevy::prelude::*;

use crate::controls::MovementFlags;
use crate::game_state::{driving, walking, ControlMode};
use crate::player::Player;
use crate::vehicles::Vehicle;

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementConfig>().add_systems(
            FixedUpdate,
            (
                walk_player.run_if(walking),
                drive_vehicle.run_if(driving),
            ),
        );
    }
}

/// Tuning for the arcade movement model.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct MovementConfig {
    /// Distance walked per tick along each held axis.
    pub walk_step: f32,
    /// Heading change per tick while a turn flag is held (radians).
    pub turn_rate: f32,
    /// Speed gained or lost per tick under throttle or brake.
    pub acceleration: f32,
    pub max_forward_speed: f32,
    /// Most negative speed allowed.
    pub max_reverse_speed: f32,
    /// Speed multiplier per tick without throttle input.
    pub coast_decay: f32,
    /// Coasting speeds below this magnitude snap to zero.
    pub stop_threshold: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            walk_step: 0.1,
            turn_rate: 0.03,
            acceleration: 0.01,
            max_forward_speed: 0.2,
            max_reverse_speed: -0.1,
            coast_decay: 0.95,
            stop_threshold: 0.001,
        }
    }
}

/// Player displacement for one tick.
///
/// Axes are not normalized, so a diagonal step is `sqrt(2)` times longer
/// than a straight one.
pub fn walk_step(flags: &MovementFlags, step: f32) -> Vec3 {
    let mut delta = Vec3::ZERO;
    if flags.forward {
        delta.z -= step;
    }
    if flags.backward {
        delta.z += step;
    }
    if flags.left {
        delta.x -= step;
    }
    if flags.right {
        delta.x += step;
    }
    delta
}

/// Update heading and speed for one tick and return the displacement.
pub fn drive_step(vehicle: &mut Vehicle, flags: &MovementFlags, config: &MovementConfig) -> Vec3 {
    if flags.left {
        vehicle.heading += config.turn_rate;
    }
    if flags.right {
        vehicle.heading -= config.turn_rate;
    }

    if flags.forward {
        vehicle.speed = (vehicle.speed + config.acceleration).min(config.max_forward_speed);
    } else if flags.backward {
        vehicle.speed = (vehicle.speed - config.acceleration).max(config.max_reverse_speed);
    } else {
        vehicle.speed *= config.coast_decay;
        if vehicle.speed.abs() < config.stop_threshold {
            vehicle.speed = 0.0;
        }
    }

    vehicle.forward() * vehicle.speed
}

fn walk_player(
    flags: Res<MovementFlags>,
    config: Res<MovementConfig>,
    mut player: Single<&mut Transform, With<Player>>,
) {
    if flags.any() {
        player.translation += walk_step(&flags, config.walk_step);
    }
}

fn drive_vehicle(
    mode: Res<ControlMode>,
    flags: Res<MovementFlags>,
    config: Res<MovementConfig>,
    mut vehicles: Query<(&mut Transform, &mut Vehicle)>,
) {
    let Some(entity) = mode.vehicle() else {
        return;
    };
    let Ok((mut transform, mut vehicle)) = vehicles.get_mut(entity) else {
        return;
    };

    let delta = drive_step(&mut vehicle, &flags, &config);
    transform.translation += delta;
    transform.rotation = Quat::from_rotation_y(vehicle.heading);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, SQRT_2};

    fn flags(forward: bool, backward: bool, left: bool, right: bool) -> MovementFlags {
        MovementFlags {
            forward,
            backward,
            left,
            right,
        }
    }

    #[test]
    fn straight_walk_moves_one_step() {
        let delta = walk_step(&flags(true, false, false, false), 0.1);
        assert_eq!(delta, Vec3::new(0.0, 0.0, -0.1));
        let delta = walk_step(&flags(false, false, false, true), 0.1);
        assert_eq!(delta, Vec3::new(0.1, 0.0, 0.0));
    }

    #[test]
    fn diagonal_walk_is_not_normalized() {
        let delta = walk_step(&flags(true, false, false, true), 0.1);
        assert!((delta.length() - 0.1 * SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn opposite_keys_cancel() {
        let delta = walk_step(&flags(true, true, true, true), 0.1);
        assert_eq!(delta, Vec3::ZERO);
    }

    #[test]
    fn forward_speed_caps_at_max() {
        let config = MovementConfig::default();
        let mut vehicle = Vehicle::default();
        let throttle = flags(true, false, false, false);
        for _ in 0..1000 {
            drive_step(&mut vehicle, &throttle, &config);
            assert!(vehicle.speed <= config.max_forward_speed);
        }
        assert_eq!(vehicle.speed, config.max_forward_speed);
    }

    #[test]
    fn reverse_speed_caps_at_min() {
        let config = MovementConfig::default();
        let mut vehicle = Vehicle::default();
        let brake = flags(false, true, false, false);
        for _ in 0..1000 {
            drive_step(&mut vehicle, &brake, &config);
            assert!(vehicle.speed >= config.max_reverse_speed);
        }
        assert_eq!(vehicle.speed, config.max_reverse_speed);
    }

    #[test]
    fn throttle_wins_over_brake() {
        let config = MovementConfig::default();
        let mut vehicle = Vehicle::default();
        drive_step(&mut vehicle, &flags(true, true, false, false), &config);
        assert!(vehicle.speed > 0.0);
    }

    #[test]
    fn coasting_reaches_exactly_zero() {
        let config = MovementConfig::default();
        let mut vehicle = Vehicle {
            heading: 0.0,
            speed: config.max_forward_speed,
        };
        let idle = MovementFlags::default();
        let mut ticks = 0;
        while vehicle.speed != 0.0 {
            let before = vehicle.speed;
            drive_step(&mut vehicle, &idle, &config);
            assert!(vehicle.speed < before);
            ticks += 1;
            assert!(ticks < 500, "speed never snapped to zero");
        }
        // 0.2 * 0.95^n drops below 0.001 after ~104 ticks.
        assert!(ticks > 100);
    }

    #[test]
    fn reverse_coast_also_snaps_to_zero() {
        let config = MovementConfig::default();
        let mut vehicle = Vehicle {
            heading: 0.0,
            speed: -0.00104,
        };
        drive_step(&mut vehicle, &MovementFlags::default(), &config);
        assert_eq!(vehicle.speed, 0.0);
    }

    #[test]
    fn steering_turns_by_fixed_rate() {
        let config = MovementConfig::default();
        let mut vehicle = Vehicle::default();
        drive_step(&mut vehicle, &flags(false, false, true, false), &config);
        assert!((vehicle.heading - 0.03).abs() < 1e-6);
        drive_step(&mut vehicle, &flags(false, false, false, true), &config);
        drive_step(&mut vehicle, &flags(false, false, false, true), &config);
        assert!((vehicle.heading + 0.03).abs() < 1e-6);
    }

    #[test]
    fn vehicle_moves_along_heading() {
        let config = MovementConfig::default();
        let mut vehicle = Vehicle::parked(FRAC_PI_2);
        let delta = drive_step(&mut vehicle, &flags(true, false, false, false), &config);
        // Heading pi/2 faces -X.
        assert!((delta.x + 0.01).abs() < 1e-6);
        assert!(delta.z.abs() < 1e-6);
        assert_eq!(delta.y, 0.0);
    }

    #[test]
    fn parked_vehicle_does_not_move() {
        let config = MovementConfig::default();
        let mut vehicle = Vehicle::parked(1.0);
        let delta = drive_step(&mut vehicle, &MovementFlags::default(), &config);
        assert_eq!(delta, Vec3::ZERO);
    }

    #[test]
    fn driving_system_moves_and_rotates_the_bound_vehicle() {
        let mut app = App::new();
        app.insert_resource(flags(true, false, true, false))
            .init_resource::<MovementConfig>()
            .add_systems(Update, drive_vehicle);
        let car = app.world_mut().spawn((Transform::default(), Vehicle::default())).id();
        let idle = app
            .world_mut()
            .spawn((Transform::from_xyz(5.0, 0.5, 5.0), Vehicle::default()))
            .id();
        app.insert_resource(ControlMode::Driving { vehicle: car });

        app.update();

        let vehicle = *app.world().get::<Vehicle>(car).unwrap();
        assert!((vehicle.heading - 0.03).abs() < 1e-6);
        assert!((vehicle.speed - 0.01).abs() < 1e-6);

        let transform = *app.world().get::<Transform>(car).unwrap();
        let expected = Quat::from_rotation_y(vehicle.heading);
        assert!(transform.rotation.dot(expected).abs() > 1.0 - 1e-6);
        assert!(transform.translation.distance(vehicle.forward() * 0.01) < 1e-6);
        assert!(transform.translation.z < 0.0);

        // Only the bound vehicle responds.
        assert_eq!(*app.world().get::<Vehicle>(idle).unwrap(), Vehicle::default());
        assert_eq!(
            app.world().get::<Transform>(idle).unwrap().translation,
            Vec3::new(5.0, 0.5, 5.0)
        );
    }

    #[test]
    fn walking_system_moves_the_player() {
        let mut app = App::new();
        app.insert_resource(flags(true, false, false, true))
            .init_resource::<MovementConfig>()
            .add_systems(Update, walk_player);
        let player = app
            .world_mut()
            .spawn((Transform::from_xyz(0.0, 0.5, 0.0), Player))
            .id();

        app.update();

        let translation = app.world().get::<Transform>(player).unwrap().translation;
        assert!(translation.distance(Vec3::new(0.1, 0.5, -0.1)) < 1e-6);
    }
}
