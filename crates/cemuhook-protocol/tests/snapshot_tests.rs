//! Byte-exact snapshots of the requests a client sends every cycle.

use cemuhook_udp_protocol::{PadDataRequest, PortInfoRequest, VersionRequest, encode_request};

const CLIENT_ID: u32 = 24872;

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[test]
fn snapshot_port_info_request() {
    let bytes = encode_request(&PortInfoRequest::single(0), CLIENT_ID);
    insta::assert_snapshot!(hex(&bytes), @"44535543e9030c00c75b8e3328610000010010000100000000000000");
}

#[test]
fn snapshot_pad_data_request() {
    let bytes = encode_request(&PadDataRequest::by_id(0), CLIENT_ID);
    insta::assert_snapshot!(hex(&bytes), @"44535543e9030c003789104428610000020010000100000000000000");
}

#[test]
fn snapshot_version_request() {
    let bytes = encode_request(&VersionRequest, CLIENT_ID);
    insta::assert_snapshot!(hex(&bytes), @"44535543e90304008a55520a2861000000001000");
}
