#![no_main]

use libfuzzer_sys::fuzz_target;
use runlength::{ByteRunCodec, DigitRunCodec};

fuzz_target!(|data: &[u8]| {
    let _ = ByteRunCodec::decode(data); // likely invalid data

    if let Ok(text) = std::str::from_utf8(data) {
        let _ = DigitRunCodec::decode(text);
    }
});
