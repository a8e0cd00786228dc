use thiserror::Error;

/// Error reported on identifier ingestion, parsing, and generator
/// configuration.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum Error {
    /// Byte ingestion accepts exactly 16 bytes.
    #[error("invalid UUID (got {0} bytes)")]
    InvalidLength(usize),

    /// The string form is 32 hexadecimal digits grouped 10-4-4-4-10 by
    /// dashes.
    #[error("invalid string representation")]
    InvalidString,

    /// The fixed-point sub-second encoder resolves at most 48 bits.
    #[error("sub-second precision of {0} bits exceeds the 48-bit ceiling")]
    SubsecondTooWide(u8),

    /// The tie-break counter is a 64-bit integer, so its field cannot be
    /// wider than that.
    #[error("counter precision of {0} bits exceeds the 64-bit counter")]
    CounterTooWide(u8),

    /// The node tag is a 64-bit integer, so its field cannot be wider than
    /// that.
    #[error("node precision of {0} bits exceeds the 64-bit node value")]
    NodeTooWide(u8),

    /// The configured fields together must fit the 86 payload bits.
    #[error("combined field widths of {0} bits exceed the 86-bit payload")]
    PayloadOverflow(u16),
}
