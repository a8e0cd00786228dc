//! UUIDv7 generator and related types.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::rngs::OsRng;
use rand::RngCore;
use typed_builder::TypedBuilder;

use crate::{layout, subsec, Error, Uuid};

/// The field widths and node value that shape the payload of generated identifiers.
///
/// Each width may be zero to leave the corresponding field out. Together the three fields must
/// fit the 86-bit payload; whatever room they leave is filled with random bits at generation
/// time.
///
/// # Examples
///
/// ```rust
/// use flexuuid::V7Settings;
///
/// let settings = V7Settings::builder()
///     .subsecond_precision_bits(24)
///     .counter_precision_bits(8)
///     .node_precision_bits(10)
///     .node(0x2a5)
///     .build();
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, TypedBuilder)]
pub struct V7Settings {
    /// The width of the sub-second fraction stacked right after the timestamp, up to 48 bits.
    #[builder(default)]
    pub subsecond_precision_bits: u8,

    /// The width of the tie-break counter, up to 64 bits.
    ///
    /// The counter field appears only in identifiers whose sub-second encoding collides with the
    /// immediately preceding one.
    #[builder(default)]
    pub counter_precision_bits: u8,

    /// The width of the node tag stacked after the sub-second and counter fields, up to 64 bits.
    #[builder(default)]
    pub node_precision_bits: u8,

    /// The node tag value; only its low `node_precision_bits` bits are written.
    #[builder(default)]
    pub node: u64,
}

impl V7Settings {
    /// Checks the field widths against the payload capacity.
    fn validate(&self) -> Result<(), Error> {
        if self.subsecond_precision_bits > subsec::MAX_BITS {
            return Err(Error::SubsecondTooWide(self.subsecond_precision_bits));
        }
        if self.counter_precision_bits > 64 {
            return Err(Error::CounterTooWide(self.counter_precision_bits));
        }
        if self.node_precision_bits > 64 {
            return Err(Error::NodeTooWide(self.node_precision_bits));
        }
        let total = u16::from(self.subsecond_precision_bits)
            + u16::from(self.counter_precision_bits)
            + u16::from(self.node_precision_bits);
        if total > layout::PAYLOAD_BITS as u16 {
            return Err(Error::PayloadOverflow(total));
        }
        Ok(())
    }
}

/// Represents a generator that stacks the configured fields behind the 36-bit whole-second
/// timestamp and tells apart identifiers minted on the same sub-second tick with a counter.
///
/// The generator owns its tie-break state, so every instance hands out an independent counter
/// sequence and no process-wide instance is kept behind the scenes. One instance must not be
/// invoked from multiple threads without synchronization; either serialize the calls through a
/// mutex as below, or run one generator per writer and tell their output apart through the node
/// field.
///
/// # Examples
///
/// ```rust
/// use flexuuid::{V7Generator, V7Settings};
///
/// let settings = V7Settings::builder().subsecond_precision_bits(12).build();
/// let mut g = V7Generator::new(settings)?;
/// println!("{}", g.generate());
/// # Ok::<(), flexuuid::Error>(())
/// ```
///
/// ```rust
/// use std::{sync, thread};
/// use flexuuid::{V7Generator, V7Settings};
///
/// let settings = V7Settings::builder()
///     .subsecond_precision_bits(12)
///     .counter_precision_bits(8)
///     .build();
/// let g = sync::Arc::new(sync::Mutex::new(V7Generator::new(settings)?));
/// let handle = {
///     let g = sync::Arc::clone(&g);
///     thread::spawn(move || {
///         for _ in 0..8 {
///             println!("{} by child", g.lock().unwrap().generate());
///             thread::yield_now();
///         }
///     })
/// };
///
/// for _ in 0..8 {
///     println!("{} by parent", g.lock().unwrap().generate());
///     thread::yield_now();
/// }
///
/// handle.join().unwrap();
/// # Ok::<(), flexuuid::Error>(())
/// ```
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct V7Generator<R> {
    settings: V7Settings,
    prev_subsec: Option<[u8; 8]>,
    counter: u64,

    /// The random number generator used by the generator.
    rng: R,
}

impl V7Generator<OsRng> {
    /// Creates a generator backed by the operating system's entropy source.
    pub fn new(settings: V7Settings) -> Result<Self, Error> {
        Self::with_rng(settings, OsRng)
    }
}

impl<R: RngCore> V7Generator<R> {
    /// Creates a generator that draws the random payload bits from `rng`.
    pub fn with_rng(settings: V7Settings, rng: R) -> Result<Self, Error> {
        settings.validate()?;
        Ok(Self {
            settings,
            prev_subsec: None,
            counter: 0,
            rng,
        })
    }

    /// Generates a new identifier from the current system clock.
    ///
    /// # Panics
    ///
    /// Panics if the system clock reads before the Unix epoch or if the random number generator
    /// fails.
    pub fn generate(&mut self) -> Uuid {
        self.generate_core(
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock may have gone backwards"),
        )
    }

    /// Generates a new identifier from the given duration since the Unix epoch.
    ///
    /// This is the low-level entry point for callers that control the clock. Whole seconds above
    /// the 36-bit timestamp capacity are silently truncated.
    pub fn generate_core(&mut self, ts: Duration) -> Uuid {
        let mut bytes = [0u8; 16];

        // The whole seconds sit ahead of every fixed field, so their low 36 bits are copied
        // straight into bits 0..=35 without going through the payload mapping.
        let seconds = ts.as_secs().to_be_bytes();
        for i in 0..layout::TIMESTAMP_BITS {
            layout::set_bit(&mut bytes, 35 - i, layout::get_bit(&seconds, 63 - i));
        }

        let mut cursor = 0;

        let mut use_counter = false;
        let subsec_bits = self.settings.subsecond_precision_bits;
        if subsec_bits > 0 {
            let encoded = subsec::encode_decimal(ts.subsec_nanos(), subsec_bits);
            cursor = layout::stack(&mut bytes, cursor, &encoded, usize::from(subsec_bits));

            // Two consecutive identifiers sharing one sub-second encoding are told apart by the
            // counter; any other encoding resets it.
            if self.prev_subsec == Some(encoded) {
                self.counter += 1;
                use_counter = true;
            } else {
                self.counter = 0;
            }
            self.prev_subsec = Some(encoded);
        }

        if use_counter {
            cursor = layout::stack(
                &mut bytes,
                cursor,
                &self.counter.to_be_bytes(),
                usize::from(self.settings.counter_precision_bits),
            );
        }

        if self.settings.node_precision_bits > 0 {
            cursor = layout::stack(
                &mut bytes,
                cursor,
                &self.settings.node.to_be_bytes(),
                usize::from(self.settings.node_precision_bits),
            );
        }

        // Every payload bit left over gets cryptographically strong randomness; an identifier
        // never leaves with placeholder bits.
        let mut random = [0u8; 16];
        self.rng.fill_bytes(&mut random);
        for at in cursor..layout::PAYLOAD_BITS {
            let bit = layout::get_bit(&random, at - cursor);
            layout::set_bit(&mut bytes, layout::payload_index(at), bit);
        }

        // The version 0111 and variant 10 are forced last, whatever was mapped around them.
        layout::set_bit(&mut bytes, 48, false);
        layout::set_bit(&mut bytes, 49, true);
        layout::set_bit(&mut bytes, 50, true);
        layout::set_bit(&mut bytes, 51, true);
        layout::set_bit(&mut bytes, 64, true);
        layout::set_bit(&mut bytes, 65, false);

        Uuid::from(bytes)
    }
}

/// Supports operations as an infinite iterator that produces a new identifier for each call of
/// `next()`.
///
/// # Examples
///
/// ```rust
/// use flexuuid::{V7Generator, V7Settings};
///
/// V7Generator::new(V7Settings::default())?
///     .enumerate()
///     .skip(4)
///     .take(4)
///     .for_each(|(i, e)| println!("[{}] {}", i, e));
/// # Ok::<(), flexuuid::Error>(())
/// ```
impl<R: RngCore> Iterator for V7Generator<R> {
    type Item = Uuid;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<R: RngCore> std::iter::FusedIterator for V7Generator<R> {}
