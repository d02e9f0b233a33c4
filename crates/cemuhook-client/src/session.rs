//! Business logic applied to every decoded server response.

use std::sync::Arc;

use cemuhook_udp_protocol::{Accelerometer, Gyroscope, PadData, PortInfo, Response, TouchPoint, Version};
use tracing::{trace, warn};

use crate::counters::SessionCounters;
use crate::status::{DeviceStatus, MotionStatus, TouchCalibration, TouchStatus, Vec3};

/// What happened to a pad data sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    Published,
    Stale { last: u64, received: u32 },
}

/// Per-client state: the staleness filter and the status it publishes into.
///
/// Runs on the engine thread only; the shared [`DeviceStatus`] is the sole
/// point of contact with other threads.
#[derive(Debug)]
pub struct Session {
    status: Arc<DeviceStatus>,
    counters: Arc<SessionCounters>,
    packet_sequence: u64,
}

impl Session {
    pub fn new(status: Arc<DeviceStatus>, counters: Arc<SessionCounters>) -> Self {
        Self {
            status,
            counters,
            packet_sequence: 0,
        }
    }

    /// Counter of the last accepted sample, zero before the first one.
    pub fn packet_sequence(&self) -> u64 {
        self.packet_sequence
    }

    pub fn handle(&mut self, response: Response) {
        match response {
            Response::Version(data) => self.on_version(&data),
            Response::PortInfo(data) => self.on_port_info(&data),
            Response::PadData(data) => {
                self.on_pad_data(&data);
            }
        }
    }

    pub fn on_version(&self, data: &Version) {
        self.counters.inc_version();
        trace!("Version packet received: {}", data.version);
    }

    pub fn on_port_info(&self, data: &PortInfo) {
        self.counters.inc_port_info();
        trace!(
            "PortInfo packet received: pad {} state {:?} model {:?}",
            data.pad_id,
            data.slot_state(),
            data.device_model()
        );
    }

    pub fn on_pad_data(&mut self, data: &PadData) -> SampleOutcome {
        if u64::from(data.packet_counter) <= self.packet_sequence {
            self.counters.inc_stale();
            warn!(
                "PadData packet dropped as stale: counter {} <= last {}",
                data.packet_counter, self.packet_sequence
            );
            return SampleOutcome::Stale {
                last: self.packet_sequence,
                received: data.packet_counter,
            };
        }
        self.packet_sequence = u64::from(data.packet_counter);
        trace!("PadData packet received: counter {}", data.packet_counter);

        let motion = remap_motion(&data.accel, &data.gyro);
        let touch = normalize_touch(&data.touch_1, self.status.touch_calibration());
        self.status.publish(motion, touch);
        self.counters.inc_published();
        SampleOutcome::Published
    }
}

/// Converts server axes into the consumer's convention.
pub fn remap_motion(accel: &Accelerometer, gyro: &Gyroscope) -> MotionStatus {
    MotionStatus {
        accel: Vec3::new(-accel.x, accel.y, -accel.z),
        gyro: Vec3::new(-gyro.pitch, -gyro.yaw, gyro.roll),
    }
}

pub fn normalize_touch(point: &TouchPoint, calibration: Option<TouchCalibration>) -> TouchStatus {
    match calibration {
        Some(calibration) if point.active() => {
            let (x, y) = calibration.normalize(point.x, point.y);
            TouchStatus { x, y, active: true }
        }
        _ => TouchStatus {
            x: 0.0,
            y: 0.0,
            active: point.active(),
        },
    }
}
