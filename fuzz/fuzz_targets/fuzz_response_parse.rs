//! Fuzzes full response decoding and re-encoding.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_response_parse
#![no_main]
use cemuhook_udp_protocol::{Response, encode_response};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(response) = Response::parse(data) else {
        return;
    };
    // Anything that parses must survive a re-encode.
    let encoded = match response {
        Response::Version(v) => encode_response(&v, 0),
        Response::PortInfo(p) => encode_response(&p, 0),
        Response::PadData(p) => encode_response(&p, 0),
    };
    let reparsed = Response::parse(&encoded).ok().map(|r| r.message_type());
    assert_eq!(reparsed, Some(response.message_type()));
});
