//! Bit-packing of the six ID fields into the 20-byte body.
//!
//! Layout (big-endian):
//!
//! ```text
//! | 48b time | 8b flags | 16b tenant | 12b seq | 16b shard | 60b random |
//! ```
//!
//! Byte 10 carries the low nibble of `seq` and the high nibble of `shard`;
//! byte 12 carries the low nibble of `shard` and the high nibble of `random`.
//! Comparing two bodies byte by byte orders them by
//! `(time, flags, tenant, seq, shard, random)`.

use crate::{BODY_LEN, RANDOM_MASK, SEQ_MASK, TIME_MASK};

/// The packed binary form of an ID.
pub type Body = [u8; BODY_LEN];

/// The raw field values carried by a body.
///
/// `time` is milliseconds since [`crate::EPOCH_MS`], not since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fields {
    pub time: u64,
    pub flags: u8,
    pub tenant: u16,
    pub seq: u16,
    pub shard: u16,
    pub random: u64,
}

/// Packs the fields into a body.
///
/// Fields wider than their slot are truncated, so callers mask `seq` to 12
/// bits and `random` to 60 bits beforehand.
pub fn pack(fields: &Fields) -> Body {
    let time = fields.time & TIME_MASK;
    let seq = fields.seq & SEQ_MASK;
    let shard = fields.shard;
    let random = fields.random & RANDOM_MASK;

    let mut out = [0u8; BODY_LEN];
    out[0..6].copy_from_slice(&time.to_be_bytes()[2..8]);
    out[6] = fields.flags;
    out[7..9].copy_from_slice(&fields.tenant.to_be_bytes());
    out[9] = (seq >> 4) as u8;
    out[10] = (((seq & 0x0F) << 4) as u8) | ((shard >> 12) & 0x0F) as u8;
    out[11] = (shard >> 4) as u8;
    out[12] = (((shard & 0x0F) << 4) as u8) | ((random >> 56) & 0x0F) as u8;
    out[13..20].copy_from_slice(&random.to_be_bytes()[1..8]);
    out
}

/// Unpacks a body into its fields.
pub fn unpack(body: &Body) -> Fields {
    let mut time = [0u8; 8];
    time[2..8].copy_from_slice(&body[0..6]);

    let mut random = [0u8; 8];
    random[1..8].copy_from_slice(&body[13..20]);
    random[0] = body[12] & 0x0F;

    Fields {
        time: u64::from_be_bytes(time),
        flags: body[6],
        tenant: u16::from_be_bytes([body[7], body[8]]),
        seq: (u16::from(body[9]) << 4) | u16::from(body[10] >> 4),
        shard: (u16::from(body[10] & 0x0F) << 12)
            | (u16::from(body[11]) << 4)
            | u16::from(body[12] >> 4),
        random: u64::from_be_bytes(random),
    }
}
