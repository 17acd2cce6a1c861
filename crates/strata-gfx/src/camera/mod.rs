//! Camera controllers.

mod orbit;

pub use orbit::{OrbitCamera, OrbitCameraConfig, MIN_POLE_EPSILON};
