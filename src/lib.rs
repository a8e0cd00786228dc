//! A UUIDv7 implementation whose payload fields are stacked to caller-chosen widths
//!
//! ```rust
//! use flexuuid::{V7Generator, V7Settings};
//!
//! let settings = V7Settings::builder()
//!     .subsecond_precision_bits(12)
//!     .counter_precision_bits(8)
//!     .build();
//! let mut g = V7Generator::new(settings)?;
//!
//! let uuid = g.generate();
//! println!("{}", uuid); // e.g. "06552f8e62-a37b-9f8d-30c5-d8b7e282f4"
//! println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
//! # Ok::<(), flexuuid::Error>(())
//! ```
//!
//! # Field and bit layout
//!
//! This implementation produces identifiers with the following bit layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                            unixts                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |unixts |        payload        |  ver  |        payload        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|                          payload                          |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                            payload                            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 36-bit `unixts` field is dedicated to the Unix timestamp in whole seconds;
//!   second counts beyond 36 bits are silently truncated.
//! - The 4-bit `ver` field is set at `0111`.
//! - The 2-bit `var` field is set at `10`.
//! - The 86 `payload` bits, addressed as the logical offsets 0 through 85 that skip
//!   over `ver` and `var`, hold the configured sub-second, counter, and node fields
//!   stacked in that order, followed by cryptographically strong random bits in
//!   whatever room the fields leave.
//!
//! Each stacked field is written low bit first: the least significant bit of the
//! source value lands in the field's first logical slot. The counter field appears
//! only in identifiers whose sub-second encoding collides with the immediately
//! preceding one, counting up from one within such a run; a counter that outgrows
//! its width silently keeps only its low bits. The dashed text form groups the
//! sixteen bytes as 10-4-4-4-10 hex digits so that the nine leading digits spell
//! the whole `unixts` field.
//!
//! # Crate features
//!
//! Optional features:
//!
//! - `serde` enables the serialization and deserialization of [`Uuid`] objects.
//! - `uuid` enables the conversion between [`Uuid`] objects and the
//!   [uuid](https://crates.io/crates/uuid) crate's counterparts.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod id;
mod layout;
mod subsec;

pub use error::Error;
pub use id::{Uuid, Variant};

pub mod v7;
#[doc(inline)]
pub use v7::{V7Generator, V7Settings};

/// An alias of [`Uuid`] for identifiers ingested as UUID version 6.
///
/// The container carries no version-specific behavior; the alias marks the intent at call sites
/// that shuttle externally produced bytes.
pub type UuidV6 = Uuid;

/// An alias of [`Uuid`] for identifiers ingested as UUID version 8.
pub type UuidV8 = Uuid;

#[cfg(test)]
mod tests {
    use super::{Uuid, UuidV8, V7Generator, V7Settings};

    /// Holds sibling versions in the shared container
    #[test]
    fn holds_sibling_versions_in_the_shared_container() {
        let bytes = [
            0x01, 0x80, 0xae, 0x59, 0x07, 0x8c, 0x8b, 0x80, 0xb1, 0x13, 0x2f, 0xe1, 0x4a, 0x61,
            0x5f, 0xb3,
        ];
        let e = UuidV8::from_slice(&bytes).unwrap();
        assert_eq!(e.version(), Some(8));
        assert_eq!(e.as_bytes(), &bytes);
        assert_eq!(e, Uuid::from(bytes));
    }

    /// Round-trips generated identifiers through the public surface
    #[test]
    fn round_trips_generated_identifiers_through_the_public_surface() {
        let settings = V7Settings::builder()
            .subsecond_precision_bits(12)
            .counter_precision_bits(8)
            .build();
        let mut g = V7Generator::new(settings).unwrap();
        for _ in 0..1_000 {
            let e = g.generate();
            assert_eq!(e.encode().parse(), Ok(e));
            assert_eq!(Uuid::from_slice(e.as_bytes()), Ok(e));
            assert_eq!(Uuid::from(u128::from(e)), e);
        }
    }
}
