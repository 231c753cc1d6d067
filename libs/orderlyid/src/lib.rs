//! # orderlyid
//!
//! Typed, time-sortable, compact identifiers.
//!
//! ## ID Format
//!
//! An ID is `{prefix}_{payload}[-{checksum}]`:
//!
//! - `prefix`: entity type, `[a-z][a-z0-9]{1,30}`
//! - `payload`: 32 Crockford-style Base32 characters encoding a 20-byte body
//! - `checksum`: optional 4 characters guarding against transcription errors
//!
//! Examples:
//! - `order_00myngy59c0003000dfk59mg3e36j3rr`
//! - `order_00myngy59c0003000dfk59mg3e36j3rr-9xgg`
//!
//! The body packs, big-endian and without padding:
//!
//! | field  | bits | meaning                                          |
//! |--------|------|--------------------------------------------------|
//! | time   | 48   | milliseconds since 2020-01-01T00:00:00Z          |
//! | flags  | 8    | version (bits 7..6), privacy bucketing (bit 5)   |
//! | tenant | 16   | caller-assigned                                  |
//! | seq    | 12   | per-generator counter for same-millisecond IDs   |
//! | shard  | 16   | caller-assigned or hashed from a key             |
//! | random | 60   | CSPRNG output                                    |
//!
//! Byte order of the body is field order, so IDs with the same prefix sort
//! by creation time, then sequence, then randomness.
//!
//! ## Usage
//!
//! ```ignore
//! let id = orderlyid::generate("order", &Options::new().with_checksum(true))?;
//! let parsed = orderlyid::parse(&id)?;
//! ```

mod error;
mod id;
mod macros;
mod options;

pub mod base32;
pub mod checksum;
pub mod conformance;
pub mod generator;
pub mod pack;
pub mod sequence;

pub use error::IdError;
pub use generator::{Clock, EntropySource, Generator, OsEntropy, SystemClock};
pub use id::{validate_prefix, Components, Flags, OrderlyId};
pub use options::{shard_from_bytes, Options};
pub use sequence::SequenceGenerator;

/// 2020-01-01T00:00:00Z in Unix milliseconds.
pub const EPOCH_MS: u64 = 1_577_836_800_000;

/// Length of the packed body in bytes.
pub const BODY_LEN: usize = 20;

/// Length of the Base32 payload in characters.
pub const PAYLOAD_LEN: usize = 32;

/// Length of the checksum suffix in characters.
pub const CHECKSUM_LEN: usize = 4;

/// Mask for the 48-bit time field.
pub const TIME_MASK: u64 = (1 << 48) - 1;

/// Mask for the 12-bit sequence field.
pub const SEQ_MASK: u16 = 0x0FFF;

/// Mask for the 60-bit random field.
pub const RANDOM_MASK: u64 = (1 << 60) - 1;

/// Generates an ID with the process-wide [`Generator`].
pub fn generate(prefix: &str, options: &Options) -> Result<String, IdError> {
    Generator::global().generate(prefix, options)
}

/// Parses an ID string. See [`OrderlyId::parse`].
pub fn parse(s: &str) -> Result<OrderlyId, IdError> {
    OrderlyId::parse(s)
}

#[doc(hidden)]
pub mod __private {
    pub use serde;
}
