//! Property tests for the CemuhookUDP codec.

use cemuhook_udp_protocol::{
    Accelerometer, Gyroscope, HEADER_SIZE, MessageType, PadData, PadDataRequest, Payload,
    PortInfo, PortInfoRequest, Response, SERVER_MAGIC, SubscribeFlags, TouchPoint, Version,
    check, decode, encode_request, encode_response, validate,
};
use proptest::prelude::*;

fn port_info_strategy() -> impl Strategy<Value = PortInfo> {
    (any::<[u8; 4]>(), any::<[u8; 6]>(), any::<[u8; 2]>()).prop_map(|(head, mac, tail)| {
        PortInfo {
            pad_id: head[0],
            state: head[1],
            model: head[2],
            connection_type: head[3],
            mac,
            battery: tail[0],
            is_active: tail[1],
        }
    })
}

fn touch_strategy() -> impl Strategy<Value = TouchPoint> {
    (any::<u8>(), any::<u8>(), any::<u16>(), any::<u16>()).prop_map(|(is_active, id, x, y)| {
        TouchPoint {
            is_active,
            id,
            x,
            y,
        }
    })
}

fn motion_strategy() -> impl Strategy<Value = (Accelerometer, Gyroscope)> {
    prop::array::uniform6(-2000.0f32..2000.0f32).prop_map(|v| {
        (
            Accelerometer {
                x: v[0],
                y: v[1],
                z: v[2],
            },
            Gyroscope {
                pitch: v[3],
                yaw: v[4],
                roll: v[5],
            },
        )
    })
}

fn pad_data_strategy() -> impl Strategy<Value = PadData> {
    (
        port_info_strategy(),
        any::<u32>(),
        any::<u16>(),
        any::<[u8; 6]>(),
        any::<[u8; 12]>(),
        touch_strategy(),
        touch_strategy(),
        any::<u64>(),
        motion_strategy(),
    )
        .prop_map(
            |(info, packet_counter, buttons, misc, analog_buttons, touch_1, touch_2, ts, motion)| {
                PadData {
                    info,
                    packet_counter,
                    buttons,
                    home: misc[0],
                    touch_click: misc[1],
                    left_stick_x: misc[2],
                    left_stick_y: misc[3],
                    right_stick_x: misc[4],
                    right_stick_y: misc[5],
                    analog_buttons,
                    touch_1,
                    touch_2,
                    motion_timestamp: ts,
                    accel: motion.0,
                    gyro: motion.1,
                }
            },
        )
}

fn flags_strategy() -> impl Strategy<Value = SubscribeFlags> {
    prop_oneof![
        Just(SubscribeFlags::AllPads),
        Just(SubscribeFlags::Id),
        Just(SubscribeFlags::Mac),
    ]
}

proptest! {
    #[test]
    fn prop_version_round_trip(version in any::<u16>(), id in any::<u32>()) {
        let payload = Version { version };
        let bytes = encode_request(&payload, id);
        prop_assert_eq!(decode::<Version>(&bytes), Ok(payload));
    }

    #[test]
    fn prop_port_info_round_trip(info in port_info_strategy(), id in any::<u32>()) {
        let bytes = encode_request(&info, id);
        prop_assert_eq!(bytes.len(), HEADER_SIZE + PortInfo::SIZE);
        prop_assert_eq!(decode::<PortInfo>(&bytes), Ok(info));
    }

    #[test]
    fn prop_pad_data_round_trip(pad in pad_data_strategy(), id in any::<u32>()) {
        let bytes = encode_request(&pad, id);
        prop_assert_eq!(decode::<PadData>(&bytes), Ok(pad));

        let response = encode_response(&pad, id);
        prop_assert_eq!(Response::parse(&response), Ok(Response::PadData(pad)));
    }

    #[test]
    fn prop_requests_round_trip(
        pad_count in any::<u32>(),
        pad_ids in any::<[u8; 4]>(),
        flags in flags_strategy(),
        pad_id in any::<u8>(),
        mac in any::<[u8; 6]>(),
        id in any::<u32>(),
    ) {
        let port = PortInfoRequest { pad_count, pad_ids };
        prop_assert_eq!(decode::<PortInfoRequest>(&encode_request(&port, id)), Ok(port));

        let pad = PadDataRequest { flags, pad_id, mac };
        prop_assert_eq!(decode::<PadDataRequest>(&encode_request(&pad, id)), Ok(pad));
    }

    #[test]
    fn prop_validate_never_panics(data in proptest::collection::vec(any::<u8>(), 0..256)) {
        let _ = validate(&data);
        let _ = Response::parse(&data);
    }

    #[test]
    fn prop_rejects_short_buffers(pad in pad_data_strategy(), len in 0usize..HEADER_SIZE) {
        let bytes = encode_response(&pad, 0);
        prop_assert_eq!(validate(&bytes[..len]), None);
    }

    #[test]
    fn prop_rejects_corrupted_magic(
        pad in pad_data_strategy(),
        byte in 0usize..4,
        mask in 1u8..=255,
    ) {
        let mut bytes = encode_response(&pad, 0);
        bytes[byte] ^= mask;
        prop_assert_eq!(validate(&bytes), None);
    }

    #[test]
    fn prop_rejects_any_single_bit_flip_after_magic(
        kind in 0usize..3,
        bit in 32usize..(8 * HEADER_SIZE + 8 * PortInfo::SIZE),
    ) {
        let mut bytes = match kind {
            0 => encode_response(&Version { version: 1001 }, 3),
            1 => encode_response(&PortInfo::default(), 3),
            _ => encode_response(&PadData::default(), 3),
        };
        let bit = bit % (8 * bytes.len());
        prop_assume!(bit >= 32);
        bytes[bit / 8] ^= 1 << (bit % 8);
        prop_assert!(matches!(check(&bytes, SERVER_MAGIC), Err(_)));
    }

    #[test]
    fn prop_validate_reports_encoded_type(info in port_info_strategy(), pad in pad_data_strategy()) {
        prop_assert_eq!(validate(&encode_response(&info, 0)), Some(MessageType::PortInfo));
        prop_assert_eq!(validate(&encode_response(&pad, 0)), Some(MessageType::PadData));
        prop_assert_eq!(
            validate(&encode_response(&Version { version: 1001 }, 0)),
            Some(MessageType::Version)
        );
    }
}
