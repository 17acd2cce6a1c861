use std::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::input::{ButtonState, InputEvent, MouseButton, PointerButtonEvent};
use crate::math::{Mat4, Vec3};

/// Smallest pole clearance the camera accepts. Looking straight along the
/// up axis leaves `look_at` without a valid basis.
pub const MIN_POLE_EPSILON: f32 = 1e-4;

/// Tuning for [`OrbitCamera`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitCameraConfig {
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Radians of rotation per logical pixel of drag.
    pub sensitivity: f32,
    /// Distance change per wheel line.
    pub wheel_step: f32,
    /// Closest the polar angle may get to either pole, in radians. Raised to
    /// [`MIN_POLE_EPSILON`] when smaller.
    pub pole_epsilon: f32,
    pub target: Vec3,
    pub up: Vec3,
}

impl Default for OrbitCameraConfig {
    fn default() -> Self {
        Self {
            distance: 3.0,
            min_distance: 1.0,
            max_distance: 10.0,
            sensitivity: 0.01,
            wheel_step: 0.25,
            pole_epsilon: 0.01,
            target: Vec3::ZERO,
            up: Vec3::Y,
        }
    }
}

/// Drag-to-orbit, wheel-to-zoom camera around a fixed target.
///
/// The eye sits on a sphere around the target. `polar` is measured from the
/// up axis (+Y) and never reaches either pole, so the view cannot flip.
/// With azimuth 0 and polar pi/2 the eye is on +Z looking down -Z.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    config: OrbitCameraConfig,
    azimuth: f32,
    polar: f32,
    distance: f32,
    /// Last pointer position while a drag is active.
    drag: Option<(f32, f32)>,
    eye: Vec3,
}

impl OrbitCamera {
    pub fn new(config: OrbitCameraConfig) -> Self {
        let mut config = config;
        if config.min_distance > config.max_distance {
            std::mem::swap(&mut config.min_distance, &mut config.max_distance);
        }
        // `max` also replaces NaN.
        config.pole_epsilon = config.pole_epsilon.max(MIN_POLE_EPSILON).min(FRAC_PI_2);

        let distance = config.distance.clamp(config.min_distance, config.max_distance);
        let mut camera = Self {
            config,
            azimuth: 0.0,
            polar: FRAC_PI_2,
            distance,
            drag: None,
            eye: Vec3::ZERO,
        };
        camera.eye = camera.compute_eye();
        camera
    }

    pub fn config(&self) -> &OrbitCameraConfig {
        &self.config
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn polar(&self) -> f32 {
        self.polar
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Eye position computed by the last [`OrbitCamera::update`].
    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.drag = Some((x, y));
    }

    /// Rotates by the displacement since the previous pointer position.
    /// Ignored unless a drag is active.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        let Some((last_x, last_y)) = self.drag else {
            return;
        };
        let (dx, dy) = (x - last_x, y - last_y);
        self.drag = Some((x, y));

        let s = self.config.sensitivity;
        self.azimuth = (self.azimuth - dx * s).rem_euclid(TAU);

        let eps = self.config.pole_epsilon;
        self.polar = (self.polar - dy * s).clamp(eps, PI - eps);
    }

    pub fn pointer_up(&mut self) {
        self.drag = None;
    }

    /// Zooms by `delta_lines` wheel lines; positive moves toward the target.
    pub fn wheel(&mut self, delta_lines: f32) {
        let d = self.distance - delta_lines * self.config.wheel_step;
        self.distance = d.clamp(self.config.min_distance, self.config.max_distance);
    }

    /// Routes pointer input to the camera. Returns whether the event was used.
    ///
    /// The left button drives the drag; losing focus ends it.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::PointerButton(PointerButtonEvent {
                button: MouseButton::Left,
                state,
                x,
                y,
            }) => {
                match state {
                    ButtonState::Pressed => self.pointer_down(x, y),
                    ButtonState::Released => self.pointer_up(),
                }
                true
            }
            InputEvent::PointerMoved { x, y } if self.is_dragging() => {
                self.pointer_move(x, y);
                true
            }
            InputEvent::Wheel(delta) => {
                self.wheel(delta.lines_y());
                true
            }
            InputEvent::Focused(false) => {
                self.pointer_up();
                false
            }
            _ => false,
        }
    }

    /// Recomputes the eye from the current angles and returns the view matrix.
    pub fn update(&mut self) -> Mat4 {
        self.eye = self.compute_eye();
        Mat4::look_at(self.eye, self.config.target, self.config.up)
    }

    fn compute_eye(&self) -> Vec3 {
        let (ps, pc) = self.polar.sin_cos();
        let (az_s, az_c) = self.azimuth.sin_cos();
        let offset = Vec3::new(ps * az_s, pc, ps * az_c) * self.distance;
        self.config.target + offset
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(OrbitCameraConfig::default())
    }
}
