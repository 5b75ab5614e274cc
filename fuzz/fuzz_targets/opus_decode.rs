#![no_main]

use libfuzzer_sys::fuzz_target;
use opus::{decode_with, DecodeOptions, SentinelPolicy};

fuzz_target!(|data: &[u8]| {
    let _ = opus::decode(data.to_vec());
    let lenient = DecodeOptions {
        sentinel: SentinelPolicy::Lenient,
        ..DecodeOptions::default()
    };
    let _ = decode_with(data.to_vec(), &lenient);
});
