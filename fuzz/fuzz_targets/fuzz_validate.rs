//! Fuzzes header validation for both directions.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_validate
#![no_main]
use cemuhook_udp_protocol::{CLIENT_MAGIC, SERVER_MAGIC, check, validate, validate_request};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let server = validate(data);
    let client = validate_request(data);
    // A datagram carries exactly one magic.
    assert!(server.is_none() || client.is_none());
    assert_eq!(server.is_some(), check(data, SERVER_MAGIC).is_ok());
    assert_eq!(client.is_some(), check(data, CLIENT_MAGIC).is_ok());
});
