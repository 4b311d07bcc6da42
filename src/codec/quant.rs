//! Fixed-point quantisation shared by every bit-packed field (position,
//! velocity, torque/current, and the MIT gains).
//!
//! `encode`/`decode` implement spec.md §4.1's linear mapping generalised to
//! an arbitrary `[lo, hi]` range: the symmetric `[-X, +X]` ranges used for
//! `q`/`dq`/`tau` are `encode(x, -X, X, bits)`, and the MIT gains' `[0, 500]`
//! / `[0, 5]` ranges fall out of the same formula.

/// Encodes `x` into an unsigned integer of `bits` width, clamped to the
/// representable range.
#[must_use]
pub fn encode(x: f32, lo: f32, hi: f32, bits: u32) -> u16 {
    let span = (1u32 << bits) - 1;
    let u = ((x - lo) * span as f32 / (hi - lo)).round();
    u.clamp(0.0, span as f32) as u16
}

/// Inverse of [`encode`].
#[must_use]
pub fn decode(u: u16, lo: f32, hi: f32, bits: u32) -> f32 {
    let span = (1u32 << bits) - 1;
    (u as f32) * (hi - lo) / span as f32 + lo
}

/// `encode` over a symmetric `[-range, +range]` span.
#[must_use]
pub fn encode_symmetric(x: f32, range: f32, bits: u32) -> u16 {
    encode(x, -range, range, bits)
}

/// `decode` over a symmetric `[-range, +range]` span.
#[must_use]
pub fn decode_symmetric(u: u16, range: f32, bits: u32) -> f32 {
    decode(u, -range, range, bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_zero_is_mid_scale() {
        // 12 bits: span = 4095, mid-scale = 2048 (round(4095/2) = 2048).
        assert_eq!(encode_symmetric(0.0, 10.0, 12), 2048);
        assert_eq!(encode_symmetric(0.0, 10.0, 16), (1u32 << 15) as u16);
    }

    #[test]
    fn round_trip_within_one_lsb() {
        for bits in [12u32, 16] {
            let range = 12.5f32;
            let lsb = 2.0 * range / ((1u32 << bits) - 1) as f32;
            for i in 0..=20 {
                let x = -range + range * (i as f32 / 10.0);
                let u = encode_symmetric(x, range, bits);
                let back = decode_symmetric(u, range, bits);
                assert!((back - x).abs() <= lsb + f32::EPSILON);
            }
        }
    }

    #[test]
    fn clamps_out_of_range_inputs() {
        assert_eq!(encode_symmetric(-999.0, 10.0, 12), 0);
        assert_eq!(encode_symmetric(999.0, 10.0, 12), 4095);
    }

    #[test]
    fn asymmetric_range_matches_kp_kd_domain() {
        // kp in [0, 500], 12 bits.
        assert_eq!(encode(0.0, 0.0, 500.0, 12), 0);
        assert_eq!(encode(500.0, 0.0, 500.0, 12), 4095);
        // kd in [0, 5], 12 bits.
        assert_eq!(encode(0.0, 0.0, 5.0, 12), 0);
    }
}
