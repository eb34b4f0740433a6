#![no_main]

use libfuzzer_sys::fuzz_target;
use mzpeak_numpress::numpress::{decode_linear, decode_pic, decode_slof, IntStream};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must decode or fail with an error, never panic
    let _ = decode_linear(data);
    let _ = decode_pic(data);
    let _ = decode_slof(data);

    // The integer stream must terminate on any input
    for value in IntStream::new(data) {
        if value.is_err() {
            break;
        }
    }
});
