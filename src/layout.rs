//! Bit-level layout of the identifier.
//!
//! All routines here use global MSB-first bit numbering: bit 0 is the most
//! significant bit of byte 0 and bit 127 the least significant bit of byte
//! 15. The fixed fields sit at bits 48..=51 (version) and 64..=65 (variant);
//! every bit after the 36-bit timestamp that is not a fixed field belongs to
//! the payload.

/// Width of the leading whole-second timestamp field.
pub(crate) const TIMESTAMP_BITS: usize = 36;

/// Number of payload bits: 128 minus timestamp, version, and variant.
pub(crate) const PAYLOAD_BITS: usize = 86;

/// Returns the bit at `index`, counting MSB-first from the start of
/// `buffer`.
///
/// # Panics
///
/// Panics if `index` is out of `buffer`'s bit range.
pub(crate) fn get_bit(buffer: &[u8], index: usize) -> bool {
    (buffer[index / 8] & (1 << (7 - index % 8))) != 0
}

/// Sets the bit at `index` to `value`, counting MSB-first and leaving every
/// other bit untouched.
///
/// # Panics
///
/// Panics if `index` is out of `buffer`'s bit range.
pub(crate) fn set_bit(buffer: &mut [u8], index: usize, value: bool) {
    let mask = 1 << (7 - index % 8);
    if value {
        buffer[index / 8] |= mask;
    } else {
        buffer[index / 8] &= !mask;
    }
}

/// Maps a logical payload offset (zero-based, counted from the first bit
/// after the timestamp) to an absolute bit index, routing around the fixed
/// version and variant fields.
///
/// Offsets 0..=11 land right after the timestamp, 12..=23 between the
/// version and variant fields, and 24..=85 below the variant field. The
/// thresholds are part of the wire format and must not change.
pub(crate) fn payload_index(logical: usize) -> usize {
    debug_assert!(logical < PAYLOAD_BITS);
    let mut index = TIMESTAMP_BITS + logical;
    if logical > 11 {
        index += 4; // skip the version field at bits 48..=51
    }
    if logical > 23 {
        index += 2; // skip the variant field at bits 64..=65
    }
    index
}

/// Writes the low-order `width` bits of `source` into the logical payload
/// range `[at, at + width)` of `bytes` and returns the next free logical
/// position.
///
/// The source's least significant bit goes to slot `at`, the most
/// significant end of the field, and each higher-significance source bit
/// goes one slot further. A stored field is therefore the bit reversal of
/// its source's binary order. Identifiers already in the wild were issued
/// this way, so the placement must be reproduced exactly on both ends.
pub(crate) fn stack(bytes: &mut [u8; 16], at: usize, source: &[u8], width: usize) -> usize {
    let source_bits = source.len() * 8;
    for significance in 0..width {
        let bit = get_bit(source, source_bits - 1 - significance);
        set_bit(bytes, payload_index(at + significance), bit);
    }
    at + width
}

#[cfg(test)]
mod tests {
    use super::{get_bit, payload_index, set_bit, stack, PAYLOAD_BITS};

    /// Addresses bits MSB-first within each byte
    #[test]
    fn addresses_bits_msb_first_within_each_byte() {
        let mut buffer = [0u8; 2];
        set_bit(&mut buffer, 0, true);
        assert_eq!(buffer, [0x80, 0x00]);
        set_bit(&mut buffer, 7, true);
        assert_eq!(buffer, [0x81, 0x00]);
        set_bit(&mut buffer, 8, true);
        assert_eq!(buffer, [0x81, 0x80]);
        set_bit(&mut buffer, 0, false);
        assert_eq!(buffer, [0x01, 0x80]);

        assert!(get_bit(&buffer, 7));
        assert!(get_bit(&buffer, 8));
        assert!(!get_bit(&buffer, 6));
        assert!(!get_bit(&buffer, 15));
    }

    /// Fails fast on out-of-range bit access
    #[test]
    #[should_panic]
    fn fails_fast_on_out_of_range_bit_access() {
        let mut buffer = [0u8; 16];
        set_bit(&mut buffer, 128, true);
    }

    /// Maps logical payload offsets around the fixed fields
    #[test]
    fn maps_logical_payload_offsets_around_the_fixed_fields() {
        let cases = [
            (0, 36),
            (1, 37),
            (11, 47),
            (12, 52),
            (23, 63),
            (24, 66),
            (25, 67),
            (85, 127),
        ];
        for (logical, absolute) in cases {
            assert_eq!(payload_index(logical), absolute);
        }
    }

    /// Never maps a logical offset onto a fixed field
    #[test]
    fn never_maps_a_logical_offset_onto_a_fixed_field() {
        let mut seen = [false; 128];
        for logical in 0..PAYLOAD_BITS {
            let absolute = payload_index(logical);
            assert!((36..128).contains(&absolute));
            assert!(
                !(48..52).contains(&absolute),
                "offset {} hit the version field",
                logical
            );
            assert!(
                !(64..66).contains(&absolute),
                "offset {} hit the variant field",
                logical
            );
            assert!(!seen[absolute], "offset {} reused bit {}", logical, absolute);
            seen[absolute] = true;
        }
    }

    /// Stacks source bits least significant first
    #[test]
    fn stacks_source_bits_least_significant_first() {
        let mut bytes = [0u8; 16];
        // 0b0101: source bits of increasing significance read 1, 0, 1, 0.
        let next = stack(&mut bytes, 0, &[0b0101], 4);
        assert_eq!(next, 4);
        assert!(get_bit(&bytes, 36));
        assert!(!get_bit(&bytes, 37));
        assert!(get_bit(&bytes, 38));
        assert!(!get_bit(&bytes, 39));
        assert_eq!(&bytes[5..], [0u8; 11]);
    }

    /// Chains stacked fields across the fixed-field gaps
    #[test]
    fn chains_stacked_fields_across_the_fixed_field_gaps() {
        let mut bytes = [0u8; 16];
        let next = stack(&mut bytes, 8, &0xffffu16.to_be_bytes(), 16);
        assert_eq!(next, 24);
        for logical in 8..24 {
            assert!(get_bit(&bytes, payload_index(logical)));
        }
        assert_eq!(bytes[6] & 0xf0, 0, "version nibble must stay clear");

        let next = stack(&mut bytes, next, &[0xff], 8);
        assert_eq!(next, 32);
        assert_eq!(bytes[8] & 0b1100_0000, 0, "variant bits must stay clear");
        assert_eq!(bytes[8] & 0b0011_1111, 0b0011_1111);
    }

    /// Zero-width stacking leaves the cursor and buffer unchanged
    #[test]
    fn zero_width_stacking_leaves_the_cursor_and_buffer_unchanged() {
        let mut bytes = [0u8; 16];
        assert_eq!(stack(&mut bytes, 5, &[], 0), 5);
        assert_eq!(bytes, [0u8; 16]);
    }
}
