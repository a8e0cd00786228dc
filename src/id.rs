use std::time::{Duration, SystemTime, UNIX_EPOCH};
use std::{fmt, str};

use fstr::FStr;

use crate::layout;
use crate::Error;

/// Represents a Universally Unique IDentifier.
///
/// # Examples
///
/// ```rust
/// use flexuuid::Uuid;
///
/// let x = "0180ae5907-8c7b-80b1-132f-e14a615fb3".parse::<Uuid>()?;
/// assert_eq!(x.version(), Some(7));
/// assert_eq!(x.as_bytes()[0], 0x01);
/// # Ok::<(), flexuuid::Error>(())
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Uuid([u8; 16]);

impl Uuid {
    /// Nil UUID (0000000000-0000-0000-0000-0000000000)
    pub const NIL: Self = Self([0x00; 16]);

    /// Max UUID (ffffffffff-ffff-ffff-ffff-ffffffffff)
    pub const MAX: Self = Self([0xff; 16]);

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Creates an object from a slice of exactly 16 bytes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexuuid::Uuid;
    ///
    /// let bytes = [
    ///     1, 128, 174, 89, 7, 140, 123, 128, 177, 19, 47, 225, 74, 97, 95, 179,
    /// ];
    /// let x = Uuid::from_slice(&bytes)?;
    /// assert_eq!(x.to_string(), "0180ae5907-8c7b-80b1-132f-e14a615fb3");
    /// assert!(Uuid::from_slice(&bytes[..15]).is_err());
    /// # Ok::<(), flexuuid::Error>(())
    /// ```
    pub fn from_slice(src: &[u8]) -> Result<Self, Error> {
        match <[u8; 16]>::try_from(src) {
            Ok(bytes) => Ok(Self(bytes)),
            Err(_) => Err(Error::InvalidLength(src.len())),
        }
    }

    /// Returns the 10-4-4-4-10 hexadecimal string representation stored in a stack-allocated
    /// string-like type that can be handled like [`str`] through `Deref<Target = str>` and other
    /// common traits.
    ///
    /// Unlike the conventional 8-4-4-4-12 form, the dashes here group the bytes 5-2-2-2-5 so that
    /// the second group ends with the version nibble.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexuuid::Uuid;
    ///
    /// let x = "0180ae5907-8c7b-80b1-132f-e14a615fb3".parse::<Uuid>()?;
    /// let y = x.encode();
    /// assert_eq!(&y as &str, "0180ae5907-8c7b-80b1-132f-e14a615fb3");
    /// assert_eq!(format!("{}", y), "0180ae5907-8c7b-80b1-132f-e14a615fb3");
    /// # Ok::<(), flexuuid::Error>(())
    /// ```
    pub fn encode(&self) -> FStr<36> {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";

        let mut buffer = [0u8; 36];
        let mut buf_iter = buffer.iter_mut();
        for i in 0..16 {
            let e = self.0[i] as usize;
            *buf_iter.next().unwrap() = DIGITS[e >> 4];
            *buf_iter.next().unwrap() = DIGITS[e & 15];
            if i == 4 || i == 6 || i == 8 || i == 10 {
                *buf_iter.next().unwrap() = b'-';
            }
        }
        debug_assert!(buffer.is_ascii());
        // SAFETY: ok because buffer consists of ASCII bytes
        unsafe { FStr::from_inner_unchecked(buffer) }
    }

    /// Returns the uppercase registry-style string representation, i.e. the 10-4-4-4-10 form
    /// wrapped in curly braces.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexuuid::Uuid;
    ///
    /// let x = "0180ae5907-8c7b-80b1-132f-e14a615fb3".parse::<Uuid>()?;
    /// assert_eq!(
    ///     &x.encode_braced() as &str,
    ///     "{0180AE5907-8C7B-80B1-132F-E14A615FB3}"
    /// );
    /// # Ok::<(), flexuuid::Error>(())
    /// ```
    pub fn encode_braced(&self) -> FStr<38> {
        const DIGITS: &[u8; 16] = b"0123456789ABCDEF";

        let mut buffer = [0u8; 38];
        buffer[0] = b'{';
        buffer[37] = b'}';
        let mut buf_iter = buffer[1..37].iter_mut();
        for i in 0..16 {
            let e = self.0[i] as usize;
            *buf_iter.next().unwrap() = DIGITS[e >> 4];
            *buf_iter.next().unwrap() = DIGITS[e & 15];
            if i == 4 || i == 6 || i == 8 || i == 10 {
                *buf_iter.next().unwrap() = b'-';
            }
        }
        debug_assert!(buffer.is_ascii());
        // SAFETY: ok because buffer consists of ASCII bytes
        unsafe { FStr::from_inner_unchecked(buffer) }
    }

    /// Returns the bit-transparent rendering for debugging: each byte as eight binary digits
    /// followed by one space, including a trailing space after the last byte.
    pub fn encode_binary(&self) -> FStr<144> {
        let mut buffer = [0u8; 144];
        let mut buf_iter = buffer.iter_mut();
        for e in self.0 {
            for shift in (0..8).rev() {
                *buf_iter.next().unwrap() = b'0' + ((e >> shift) & 1);
            }
            *buf_iter.next().unwrap() = b' ';
        }
        debug_assert!(buffer.is_ascii());
        // SAFETY: ok because buffer consists of ASCII bytes
        unsafe { FStr::from_inner_unchecked(buffer) }
    }

    /// Returns the Unix timestamp in whole seconds stored in the leading 36 bits.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexuuid::Uuid;
    ///
    /// let x = "123456789a-bc7d-ef92-3456-789abcdef0".parse::<Uuid>()?;
    /// assert_eq!(x.timestamp(), 0x1_2345_6789);
    /// # Ok::<(), flexuuid::Error>(())
    /// ```
    pub fn timestamp(&self) -> u64 {
        let mut word = [0u8; 8];
        word[3..].copy_from_slice(&self.0[..5]);
        u64::from_be_bytes(word) >> 4
    }

    /// Returns the timestamp as a [`SystemTime`], at whole-second resolution.
    pub fn time(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(self.timestamp())
    }

    /// Returns the 12 payload bits between the timestamp and the version field (bits 36..=47).
    pub fn subsec_a(&self) -> u16 {
        u16::from_be_bytes([self.0[4], self.0[5]]) & 0x0fff
    }

    /// Returns the 12 payload bits between the version and variant fields (bits 52..=63).
    pub fn subsec_b(&self) -> u16 {
        u16::from_be_bytes([self.0[6], self.0[7]]) & 0x0fff
    }

    /// Returns the 62 payload bits below the variant field (bits 66..=127).
    pub fn subsec_seq_node(&self) -> u64 {
        let mut word = [0u8; 8];
        word.copy_from_slice(&self.0[8..]);
        u64::from_be_bytes(word) & ((1 << 62) - 1)
    }

    /// Returns the 4-bit version field, or `None` unless the variant is [`Variant::Var10`].
    pub fn version(&self) -> Option<u8> {
        match self.variant() {
            Variant::Var10 => Some(self.0[6] >> 4),
            _ => None,
        }
    }

    /// Returns the variant field.
    pub fn variant(&self) -> Variant {
        match self.0[8] >> 5 {
            0b000..=0b011 => Variant::Var0,
            0b100 | 0b101 => Variant::Var10,
            0b110 => Variant::Var110,
            _ => Variant::VarReserved,
        }
    }

    /// Returns the bit at `index`, numbering the 128 bits MSB-first from zero.
    ///
    /// # Panics
    ///
    /// Panics if `index` is 128 or larger.
    pub fn get_bit(&self, index: usize) -> bool {
        layout::get_bit(&self.0, index)
    }

    /// Returns the payload bit at the logical offset `at`, counting from the first bit after the
    /// timestamp and skipping over the version and variant fields.
    ///
    /// A field stacked over the logical range `[at, at + width)` is read back by collecting the
    /// slots in order, the slot at `at` being the least significant bit of the original value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flexuuid::{V7Generator, V7Settings};
    ///
    /// let settings = V7Settings::builder()
    ///     .node_precision_bits(10)
    ///     .node(0b11_0010_1001)
    ///     .build();
    /// let x = V7Generator::new(settings)?.generate();
    ///
    /// let mut node = 0u64;
    /// for slot in 0..10 {
    ///     node |= u64::from(x.payload_bit(slot)) << slot;
    /// }
    /// assert_eq!(node, 0b11_0010_1001);
    /// # Ok::<(), flexuuid::Error>(())
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `at` is 86 or larger.
    pub fn payload_bit(&self, at: usize) -> bool {
        assert!(
            at < layout::PAYLOAD_BITS,
            "logical payload offset out of range"
        );
        layout::get_bit(&self.0, layout::payload_index(at))
    }
}

impl fmt::Display for Uuid {
    /// Returns the 10-4-4-4-10 hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for Uuid {
    type Err = Error;

    /// Creates an object from the 10-4-4-4-10 hexadecimal string representation.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        const ERR: Error = Error::InvalidString;
        let mut dst = [0u8; 16];
        let mut iter = src.chars();
        for (i, e) in dst.iter_mut().enumerate() {
            let hi = iter.next().ok_or(ERR)?.to_digit(16).ok_or(ERR)? as u8;
            let lo = iter.next().ok_or(ERR)?.to_digit(16).ok_or(ERR)? as u8;
            *e = (hi << 4) | lo;
            if (i == 4 || i == 6 || i == 8 || i == 10) && iter.next().ok_or(ERR)? != '-' {
                return Err(ERR);
            }
        }
        if iter.next().is_none() {
            Ok(Self(dst))
        } else {
            Err(ERR)
        }
    }
}

impl From<Uuid> for [u8; 16] {
    fn from(src: Uuid) -> Self {
        src.0
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(src: [u8; 16]) -> Self {
        Self(src)
    }
}

impl AsRef<[u8]> for Uuid {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Uuid> for u128 {
    fn from(src: Uuid) -> Self {
        Self::from_be_bytes(src.0)
    }
}

impl From<u128> for Uuid {
    fn from(src: u128) -> Self {
        Self(src.to_be_bytes())
    }
}

impl From<Uuid> for String {
    fn from(src: Uuid) -> Self {
        src.to_string()
    }
}

impl TryFrom<String> for Uuid {
    type Error = Error;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        src.parse()
    }
}

/// The reserved UUID variant values distinguished by the bits at positions 64 and up.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Variant {
    /// The variant `0xx` reserved for NCS backward compatibility.
    Var0,

    /// The variant `10x` used by this identifier format.
    Var10,

    /// The variant `110` reserved for Microsoft backward compatibility.
    Var110,

    /// The variant `111` reserved for future definition.
    VarReserved,
}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::Uuid;

    impl From<Uuid> for uuid::Uuid {
        fn from(src: Uuid) -> Self {
            uuid::Uuid::from_bytes(src.0)
        }
    }

    impl From<uuid::Uuid> for Uuid {
        fn from(src: uuid::Uuid) -> Self {
            Self(src.into_bytes())
        }
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Uuid};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Uuid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Uuid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Uuid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a UUID representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            Self::Value::from_slice(value).map_err(de::Error::custom)
        }
    }

}
