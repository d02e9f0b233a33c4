//! Property tests for sample filtering and touch normalization.

use std::sync::Arc;

use cemuhook_udp_client::protocol::{PadData, TouchPoint};
use cemuhook_udp_client::session::normalize_touch;
use cemuhook_udp_client::{DeviceStatus, SampleOutcome, Session, SessionCounters, TouchCalibration};
use proptest::prelude::*;

fn calibration() -> impl Strategy<Value = TouchCalibration> {
    (any::<u16>(), any::<u16>(), any::<u16>(), any::<u16>())
        .prop_map(|(min_x, min_y, max_x, max_y)| TouchCalibration::new(min_x, min_y, max_x, max_y))
}

proptest! {
    #[test]
    fn prop_normalized_touch_stays_in_unit_square(
        calibration in calibration(),
        x in any::<u16>(),
        y in any::<u16>(),
        active in any::<bool>(),
    ) {
        let point = TouchPoint { is_active: u8::from(active), id: 0, x, y };
        let touch = normalize_touch(&point, Some(calibration));
        prop_assert!((0.0..=1.0).contains(&touch.x));
        prop_assert!((0.0..=1.0).contains(&touch.y));
        prop_assert_eq!(touch.active, active);
        if !active {
            prop_assert!(touch.x.abs() < f32::EPSILON && touch.y.abs() < f32::EPSILON);
        }
    }

    #[test]
    fn prop_accepted_counters_strictly_increase(counters in prop::collection::vec(any::<u32>(), 1..64)) {
        let status = Arc::new(DeviceStatus::new(None));
        let mut session = Session::new(status, Arc::new(SessionCounters::new()));

        let mut last_accepted = 0u64;
        for counter in counters {
            let pad = PadData { packet_counter: counter, ..PadData::default() };
            match session.on_pad_data(&pad) {
                SampleOutcome::Published => {
                    prop_assert!(u64::from(counter) > last_accepted);
                    last_accepted = u64::from(counter);
                }
                SampleOutcome::Stale { last, received } => {
                    prop_assert_eq!(last, last_accepted);
                    prop_assert!(u64::from(received) <= last);
                }
            }
            prop_assert_eq!(session.packet_sequence(), last_accepted);
        }
    }
}
