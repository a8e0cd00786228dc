//! Fixed-point encoding of the sub-second clock reading.
//!
//! The nanosecond-of-second count is read as a decimal fraction (its decimal
//! digits become the fraction digits, so 123_456_789 ns is 0.123456789 and
//! 250_000_000 ns is 0.25), scaled to the configured number of binary
//! places, truncated, and serialized big-endian. The round trip is lossy by
//! construction.

/// Upper bound on the sub-second field width, matching nanosecond clock
/// resolution.
pub(crate) const MAX_BITS: u8 = 48;

/// Encodes `nanos` as a fixed-point fraction of one second with `bits`
/// binary places, placed in the low-order bits of a big-endian buffer.
pub(crate) fn encode_decimal(nanos: u32, bits: u8) -> [u8; 8] {
    debug_assert!(bits <= MAX_BITS);
    if nanos == 0 {
        return [0u8; 8];
    }
    let digits = nanos.ilog10() + 1;
    let fraction = f64::from(nanos) / 10f64.powi(digits as i32);
    ((fraction * (1u64 << bits) as f64) as u64).to_be_bytes()
}

/// Decodes a buffer produced by [`encode_decimal`] back into a fraction of
/// one second.
pub(crate) fn decode_decimal(buffer: &[u8; 8], bits: u8) -> f64 {
    debug_assert!(bits <= MAX_BITS);
    u64::from_be_bytes(*buffer) as f64 / (1u64 << bits) as f64
}

#[cfg(test)]
mod tests {
    use super::{decode_decimal, encode_decimal};

    /// Encodes prepared fractions exactly
    #[test]
    fn encodes_prepared_fractions_exactly() {
        // 500_000_000 ns reads as the fraction 0.5, 250_000_000 ns as 0.25.
        assert_eq!(encode_decimal(500_000_000, 8), 128u64.to_be_bytes());
        assert_eq!(encode_decimal(250_000_000, 8), 64u64.to_be_bytes());
        assert_eq!(encode_decimal(250_000_000, 16), 16_384u64.to_be_bytes());
        assert_eq!(encode_decimal(750_000_000, 2), 3u64.to_be_bytes());
        assert_eq!(encode_decimal(0, 48), [0u8; 8]);
        assert_eq!(encode_decimal(0, 0), [0u8; 8]);
    }

    /// Counts decimal digits without a float detour
    #[test]
    fn counts_decimal_digits_without_a_float_detour() {
        // Powers of ten are where a log10-based digit count slips.
        assert_eq!(encode_decimal(1, 8), 25u64.to_be_bytes()); // 0.1 * 256
        assert_eq!(encode_decimal(10, 8), 25u64.to_be_bytes()); // 0.10 * 256
        assert_eq!(encode_decimal(100_000_000, 8), 25u64.to_be_bytes());
        assert_eq!(encode_decimal(1_000, 16), 6_553u64.to_be_bytes()); // 0.1000
    }

    /// Truncates toward zero rather than rounding
    #[test]
    fn truncates_toward_zero_rather_than_rounding() {
        // 0.999999999 * 256 = 255.99...; truncation keeps 255.
        assert_eq!(encode_decimal(999_999_999, 8), 255u64.to_be_bytes());
        assert_eq!(encode_decimal(999, 4), 15u64.to_be_bytes());
    }

    /// Round trips within one fixed-point step
    #[test]
    fn round_trips_within_one_fixed_point_step() {
        let samples: &[u32] = &[
            1,
            7,
            999,
            123_456_789,
            250_000_000,
            500_000_001,
            999_999_999,
        ];
        for &nanos in samples {
            let digits = nanos.ilog10() + 1;
            let fraction = f64::from(nanos) / 10f64.powi(digits as i32);
            for bits in [1u8, 8, 16, 32, 48] {
                let decoded = decode_decimal(&encode_decimal(nanos, bits), bits);
                let step = 1.0 / (1u64 << bits) as f64;
                assert!(
                    (fraction - decoded).abs() <= step,
                    "{} ns at {} bits: expected about {}, decoded {}",
                    nanos,
                    bits,
                    fraction,
                    decoded,
                );
            }
        }
    }
}
