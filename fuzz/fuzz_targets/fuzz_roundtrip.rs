#![no_main]

use libfuzzer_sys::fuzz_target;
use mzpeak_numpress::numpress::{
    decode_linear, decode_pic, decode_slof, encode_linear, encode_pic, encode_slof,
    optimal_linear_fixed_point, optimal_slof_fixed_point,
};

fuzz_target!(|data: &[u8]| {
    let values: Vec<f64> = data
        .chunks_exact(8)
        .map(|chunk| {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(chunk);
            f64::from_le_bytes(raw)
        })
        .collect();

    // Encoders may reject values, but whatever they accept must decode to the same length
    if let Ok(encoded) = encode_linear(&values, optimal_linear_fixed_point(&values)) {
        let decoded = decode_linear(&encoded).expect("linear output must decode");
        assert_eq!(decoded.len(), values.len());
    }
    if let Ok(encoded) = encode_pic(&values) {
        let decoded = decode_pic(&encoded).expect("pic output must decode");
        assert_eq!(decoded.len(), values.len());
    }
    if let Ok(encoded) = encode_slof(&values, optimal_slof_fixed_point(&values)) {
        let decoded = decode_slof(&encoded).expect("slof output must decode");
        assert_eq!(decoded.len(), values.len());
    }
});
