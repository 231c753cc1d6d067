//! The decoded ID record, its flags, and the canonical string form.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::error::IdError;
use crate::pack::{self, Body, Fields};
use crate::{base32, checksum};
use crate::{CHECKSUM_LEN, EPOCH_MS, PAYLOAD_LEN, RANDOM_MASK, SEQ_MASK, TIME_MASK};

/// Returns `Ok` if `prefix` matches `[a-z][a-z0-9]{1,30}`.
pub fn validate_prefix(prefix: &str) -> Result<(), IdError> {
    let bytes = prefix.as_bytes();
    let valid = (2..=31).contains(&bytes.len())
        && bytes[0].is_ascii_lowercase()
        && bytes[1..]
            .iter()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit());

    if valid {
        Ok(())
    } else {
        Err(IdError::InvalidPrefix {
            prefix: prefix.to_string(),
        })
    }
}

// =============================================================================
// Flags
// =============================================================================

/// The 8-bit flags field.
///
/// Bits 7..6 hold the wire version (`00` = v1), bit 5 marks a privacy-bucketed
/// timestamp. The remaining bits are reserved and carried through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Flags(u8);

impl Flags {
    /// Version 1 with no flags set.
    pub const V1: Self = Self(0);

    /// Bit marking a bucketed timestamp.
    pub const PRIVACY_BUCKETED: u8 = 1 << 5;

    const VERSION_SHIFT: u32 = 6;

    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Wire version stored in the top two bits (0 = v1).
    #[must_use]
    pub const fn version(&self) -> u8 {
        self.0 >> Self::VERSION_SHIFT
    }

    #[must_use]
    pub const fn is_privacy_bucketed(&self) -> bool {
        self.0 & Self::PRIVACY_BUCKETED != 0
    }

    #[must_use]
    pub const fn with_privacy_bucketed(self) -> Self {
        Self(self.0 | Self::PRIVACY_BUCKETED)
    }
}

impl From<u8> for Flags {
    fn from(bits: u8) -> Self {
        Self(bits)
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

// =============================================================================
// Components
// =============================================================================

/// Explicit field values for deterministic construction.
///
/// `time_ms` is Unix milliseconds; values before 2020-01-01 clamp to the
/// epoch. `seq` and `random` are masked to 12 and 60 bits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Components {
    pub prefix: String,
    pub time_ms: u64,
    pub flags: u8,
    pub tenant: u16,
    pub seq: u16,
    pub shard: u16,
    pub random: u64,
}

impl Components {
    /// Components with the given prefix and every other field zero.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    /// Sets `random` from big-endian hex of any width.
    ///
    /// Only the trailing 60 bits survive.
    pub fn with_random_hex(mut self, random_hex: &str) -> Result<Self, IdError> {
        let bytes = hex::decode(random_hex).map_err(|e| IdError::InvalidFormat {
            message: format!("random_hex: {e}"),
        })?;
        let random = bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
        self.random = random & RANDOM_MASK;
        Ok(self)
    }
}

// =============================================================================
// OrderlyId
// =============================================================================

/// A decoded ID.
///
/// Field order matches body order, so the derived `Ord` agrees with the
/// canonical string order for IDs sharing a prefix.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct OrderlyId {
    prefix: String,
    time_ms: u64,
    flags: Flags,
    tenant: u16,
    seq: u16,
    shard: u16,
    random: u64,
}

impl OrderlyId {
    /// Builds an ID from explicit components.
    pub fn from_components(components: Components) -> Result<Self, IdError> {
        validate_prefix(&components.prefix)?;
        let fields = Fields {
            time: components.time_ms.saturating_sub(EPOCH_MS) & TIME_MASK,
            flags: components.flags,
            tenant: components.tenant,
            seq: components.seq & SEQ_MASK,
            shard: components.shard,
            random: components.random & RANDOM_MASK,
        };
        Ok(Self::from_fields(components.prefix, fields))
    }

    /// Assembles an ID from a validated prefix and epoch-relative fields.
    pub(crate) fn from_fields(prefix: String, fields: Fields) -> Self {
        Self {
            prefix,
            time_ms: EPOCH_MS + fields.time,
            flags: Flags(fields.flags),
            tenant: fields.tenant,
            seq: fields.seq,
            shard: fields.shard,
            random: fields.random,
        }
    }

    /// Parses a canonical string, verifying the checksum if one is present.
    ///
    /// Surrounding whitespace is ignored. Payload decoding is lenient about
    /// case and ambiguous glyphs; the prefix must be lowercase.
    pub fn parse(input: &str) -> Result<Self, IdError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(IdError::Empty);
        }

        let base = match s.rsplit_once('-') {
            Some((base, given)) => {
                if given.len() != CHECKSUM_LEN {
                    return Err(IdError::BadChecksumLength { len: given.len() });
                }
                let expected = checksum::compute(base)?;
                if !expected.eq_ignore_ascii_case(given) {
                    debug!(expected = %expected, given = %given, "checksum rejected");
                    return Err(IdError::ChecksumMismatch {
                        expected,
                        actual: given.to_string(),
                    });
                }
                base
            }
            None => s,
        };

        let Some((prefix, payload)) = base.split_once('_').filter(|(p, _)| !p.is_empty()) else {
            return Err(IdError::MissingSeparator);
        };
        validate_prefix(prefix)?;

        if payload.len() != PAYLOAD_LEN {
            return Err(IdError::BadPayloadLength { len: payload.len() });
        }
        let body = base32::decode(payload)?;

        Ok(Self::from_fields(prefix.to_string(), pack::unpack(&body)))
    }

    /// Canonical string, with the `-checksum` suffix if requested.
    #[must_use]
    pub fn encode(&self, with_checksum: bool) -> String {
        let base = format!("{}_{}", self.prefix, self.payload());
        if with_checksum {
            format!("{base}-{}", self.checksum())
        } else {
            base
        }
    }

    /// The 4-character checksum of this ID's canonical base string.
    #[must_use]
    pub fn checksum(&self) -> String {
        let hrp = format!("{}_", self.prefix);
        checksum::from_parts(hrp.as_bytes(), &base32::to_symbols(&self.body()))
    }

    /// The 32-character Base32 payload.
    #[must_use]
    pub fn payload(&self) -> String {
        base32::encode(&self.body())
    }

    /// The packed 20-byte body.
    #[must_use]
    pub fn body(&self) -> Body {
        pack::pack(&self.fields())
    }

    /// The raw epoch-relative field values.
    #[must_use]
    pub fn fields(&self) -> Fields {
        Fields {
            time: self.time_ms - EPOCH_MS,
            flags: self.flags.bits(),
            tenant: self.tenant,
            seq: self.seq,
            shard: self.shard,
            random: self.random,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Unix milliseconds.
    pub fn time_ms(&self) -> u64 {
        self.time_ms
    }

    /// Creation time as a UTC timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        // 48-bit offsets from 2020 stay far inside chrono's range
        i64::try_from(self.time_ms)
            .ok()
            .and_then(DateTime::from_timestamp_millis)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn tenant(&self) -> u16 {
        self.tenant
    }

    pub fn seq(&self) -> u16 {
        self.seq
    }

    pub fn shard(&self) -> u16 {
        self.shard
    }

    /// The 60-bit random field.
    pub fn random(&self) -> u64 {
        self.random
    }
}

impl fmt::Display for OrderlyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.prefix, self.payload())
    }
}

impl FromStr for OrderlyId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// =============================================================================
// Tests
// =============================================================================
