#![no_main]

use libfuzzer_sys::fuzz_target;

use runlength::{ByteRunCodec, DigitRunCodec};

fuzz_target!(|data: &str| {
    if let Ok(encoded) = ByteRunCodec::encode(data) {
        assert_eq!(ByteRunCodec::decode(encoded).as_deref(), Ok(data));
    }

    let encoded = DigitRunCodec::encode(data);
    assert_eq!(DigitRunCodec::decode(&encoded).as_deref(), Ok(data));
});
