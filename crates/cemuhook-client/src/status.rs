//! Device status shared between the engine thread and input consumers.

use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Acceleration and angular velocity in the consumer's axis convention.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MotionStatus {
    pub accel: Vec3,
    pub gyro: Vec3,
}

/// Touch position normalized to `[0, 1]` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TouchStatus {
    pub x: f32,
    pub y: f32,
    pub active: bool,
}

/// Raw touchpad bounds mapped onto `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouchCalibration {
    pub min_x: u16,
    pub min_y: u16,
    pub max_x: u16,
    pub max_y: u16,
}

impl TouchCalibration {
    pub const fn new(min_x: u16, min_y: u16, max_x: u16, max_y: u16) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Clamps a raw point into the bounds and rescales it.
    ///
    /// An axis whose `max` does not exceed its `min` maps to `0.0`.
    pub fn normalize(&self, x: u16, y: u16) -> (f32, f32) {
        (
            normalize_axis(x, self.min_x, self.max_x),
            normalize_axis(y, self.min_y, self.max_y),
        )
    }
}

fn normalize_axis(raw: u16, min: u16, max: u16) -> f32 {
    if max <= min {
        return 0.0;
    }
    let clamped = raw.clamp(min, max);
    f32::from(clamped - min) / f32::from(max - min)
}

/// The values written together for every accepted sample.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DeviceState {
    pub motion_status: MotionStatus,
    pub touch_status: TouchStatus,
}

/// Latest motion/touch sample, owned by the application and shared with the
/// client through an `Arc`.
///
/// Readers take the same lock the client writes under, so a reader never
/// sees motion from one sample paired with touch from another.
#[derive(Debug, Default)]
pub struct DeviceStatus {
    state: Mutex<DeviceState>,
    touch_calibration: Option<TouchCalibration>,
}

impl DeviceStatus {
    pub fn new(touch_calibration: Option<TouchCalibration>) -> Self {
        Self {
            state: Mutex::new(DeviceState::default()),
            touch_calibration,
        }
    }

    pub fn touch_calibration(&self) -> Option<TouchCalibration> {
        self.touch_calibration
    }

    /// Holds the update lock until the guard is dropped.
    pub fn lock(&self) -> MutexGuard<'_, DeviceState> {
        self.state.lock()
    }

    pub fn snapshot(&self) -> DeviceState {
        *self.state.lock()
    }

    pub(crate) fn publish(&self, motion_status: MotionStatus, touch_status: TouchStatus) {
        let mut state = self.state.lock();
        state.motion_status = motion_status;
        state.touch_status = touch_status;
    }
}
