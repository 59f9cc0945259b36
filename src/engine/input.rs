// Input state tracking for keyboard and stick
// Turns winit events into the target acceleration the navigation tick reads

use bevy_ecs::prelude::*;
use glam::DVec2;
use std::collections::HashSet;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Default acceleration applied while a direction is held.
pub const DEFAULT_STRENGTH: f64 = 0.2;
/// Stick deflection below this is treated as centred.
pub const STICK_DEAD_ZONE: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StickAxis {
    X,
    Y,
}

#[derive(Resource, Debug, Clone)]
pub struct InputState {
    keys_held: HashSet<KeyCode>,
    stick: DVec2,
    /// Acceleration at full deflection.
    pub strength: f64,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(DEFAULT_STRENGTH)
    }
}

impl InputState {
    pub fn new(strength: f64) -> Self {
        Self {
            keys_held: HashSet::new(),
            stick: DVec2::ZERO,
            strength,
        }
    }

    /// Feed a winit WindowEvent into the input state.
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => self.press(key),
                        ElementState::Released => self.release(key),
                    }
                }
            }
            // Key-up events are lost while unfocused.
            WindowEvent::Focused(false) => self.keys_held.clear(),
            _ => {}
        }
    }

    pub fn press(&mut self, key: KeyCode) {
        self.keys_held.insert(key);
    }

    pub fn release(&mut self, key: KeyCode) {
        self.keys_held.remove(&key);
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Joystick axis position, -1..1.
    pub fn set_axis(&mut self, axis: StickAxis, value: f64) {
        let value = if value.abs() < STICK_DEAD_ZONE {
            0.0
        } else {
            value.clamp(-1.0, 1.0)
        };
        match axis {
            StickAxis::X => self.stick.x = value,
            StickAxis::Y => self.stick.y = value,
        }
    }

    /// Per-axis direction from held keys: -1, 0 or 1. Opposite keys cancel.
    fn key_direction(&self) -> DVec2 {
        let held = |a: KeyCode, b: KeyCode| self.is_key_held(a) || self.is_key_held(b);
        let mut dir = DVec2::ZERO;
        if held(KeyCode::ArrowLeft, KeyCode::KeyA) {
            dir.x -= 1.0;
        }
        if held(KeyCode::ArrowRight, KeyCode::KeyD) {
            dir.x += 1.0;
        }
        // Maze y grows downward.
        if held(KeyCode::ArrowUp, KeyCode::KeyW) {
            dir.y -= 1.0;
        }
        if held(KeyCode::ArrowDown, KeyCode::KeyS) {
            dir.y += 1.0;
        }
        dir
    }

    /// Acceleration the target should have right now.
    pub fn target_acceleration(&self) -> DVec2 {
        (self.key_direction() + self.stick).clamp(DVec2::splat(-1.0), DVec2::ONE) * self.strength
    }
}
