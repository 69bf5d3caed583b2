//! Input handling: held-direction flags plus discrete actions.
//!
//! Keyboard and touch both feed the same four [`MovementFlags`]. The flags
//! are rebuilt every frame so they always mirror what is currently held.

use bevy::input::InputSystem;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use smallvec::SmallVec;

pub mod touch;

use touch::{TouchControl, TouchLayout};

use crate::game_state::TownDriveSet;

pub struct ControlsPlugin;

impl Plugin for ControlsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementFlags>()
            .init_resource::<KeyBindings>()
            .init_resource::<TouchLayout>()
            .add_event::<ToggleVehicle>()
            .add_event::<CycleCameraView>()
            .add_systems(PreUpdate, collect_movement_flags.after(InputSystem))
            .add_systems(Update, emit_actions.in_set(TownDriveSet::Input));
    }
}

/// Held direction input.
#[derive(Resource, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct MovementFlags {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MovementFlags {
    /// Combine held keys with the pads currently under a finger.
    pub fn from_input(
        keys: &ButtonInput<KeyCode>,
        bindings: &KeyBindings,
        touched: &[TouchControl],
    ) -> Self {
        let held = |codes: &[KeyCode], control: TouchControl| {
            keys.any_pressed(codes.iter().copied()) || touched.contains(&control)
        };
        Self {
            forward: held(bindings.forward.as_slice(), TouchControl::Forward),
            backward: held(bindings.backward.as_slice(), TouchControl::Backward),
            left: held(bindings.left.as_slice(), TouchControl::Left),
            right: held(bindings.right.as_slice(), TouchControl::Right),
        }
    }

    pub fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}

/// Request to enter the nearest vehicle or leave the current one.
#[derive(Event, Clone, Copy, Debug, Default)]
pub struct ToggleVehicle;

/// Request to switch between follow and top-down camera.
#[derive(Event, Clone, Copy, Debug, Default)]
pub struct CycleCameraView;

#[derive(Resource, Clone, Debug)]
pub struct KeyBindings {
    pub forward: Vec<KeyCode>,
    pub backward: Vec<KeyCode>,
    pub left: Vec<KeyCode>,
    pub right: Vec<KeyCode>,
    pub toggle_vehicle: Vec<KeyCode>,
    pub cycle_camera: Vec<KeyCode>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: vec![KeyCode::KeyW, KeyCode::ArrowUp],
            backward: vec![KeyCode::KeyS, KeyCode::ArrowDown],
            left: vec![KeyCode::KeyA, KeyCode::ArrowLeft],
            right: vec![KeyCode::KeyD, KeyCode::ArrowRight],
            toggle_vehicle: vec![KeyCode::KeyE, KeyCode::Enter],
            cycle_camera: vec![KeyCode::KeyC],
        }
    }
}

fn window_size(windows: &Query<&Window, With<PrimaryWindow>>) -> Option<Vec2> {
    windows.get_single().ok().map(|window| window.size())
}

fn collect_movement_flags(
    keys: Res<ButtonInput<KeyCode>>,
    touches: Res<Touches>,
    bindings: Res<KeyBindings>,
    layout: Res<TouchLayout>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut flags: ResMut<MovementFlags>,
) {
    let touched: SmallVec<[TouchControl; 4]> = match window_size(&windows) {
        Some(size) => touches
            .iter()
            .filter_map(|touch| layout.control_at(touch.position(), size))
            .collect(),
        None => SmallVec::new(),
    };

    let next = MovementFlags::from_input(&keys, &bindings, &touched);
    if *flags != next {
        *flags = next;
    }
}

fn emit_actions(
    keys: Res<ButtonInput<KeyCode>>,
    touches: Res<Touches>,
    bindings: Res<KeyBindings>,
    layout: Res<TouchLayout>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut toggles: EventWriter<ToggleVehicle>,
    mut camera_cycles: EventWriter<CycleCameraView>,
) {
    let tapped_enter = window_size(&windows).is_some_and(|size| {
        touches
            .iter_just_pressed()
            .any(|touch| layout.control_at(touch.position(), size) == Some(TouchControl::Enter))
    });

    if tapped_enter || keys.any_just_pressed(bindings.toggle_vehicle.iter().copied()) {
        toggles.send(ToggleVehicle);
    }

    if keys.any_just_pressed(bindings.cycle_camera.iter().copied()) {
        camera_cycles.send(CycleCameraView);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_input_means_no_flags() {
        let keys = ButtonInput::<KeyCode>::default();
        let flags = MovementFlags::from_input(&keys, &KeyBindings::default(), &[]);
        assert_eq!(flags, MovementFlags::default());
        assert!(!flags.any());
    }

    #[test]
    fn either_binding_sets_a_flag() {
        let bindings = KeyBindings::default();
        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::ArrowUp);
        keys.press(KeyCode::KeyD);
        let flags = MovementFlags::from_input(&keys, &bindings, &[]);
        assert!(flags.forward && flags.right);
        assert!(!flags.backward && !flags.left);
    }

    #[test]
    fn released_key_clears_flag() {
        let bindings = KeyBindings::default();
        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::KeyW);
        assert!(MovementFlags::from_input(&keys, &bindings, &[]).forward);
        keys.release(KeyCode::KeyW);
        assert!(!MovementFlags::from_input(&keys, &bindings, &[]).forward);
    }

    #[test]
    fn touch_and_keys_combine() {
        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::KeyA);
        let flags = MovementFlags::from_input(
            &keys,
            &KeyBindings::default(),
            &[TouchControl::Backward, TouchControl::Enter],
        );
        assert!(flags.left && flags.backward);
        assert!(!flags.forward && !flags.right);
    }
}
