//! Generation options.

use serde::{Deserialize, Serialize};

/// Caller-supplied settings for [`crate::Generator::generate`].
///
/// Deserializes with every field optional, so hosts can load defaults from
/// their own configuration source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Tenant written into the ID (default 0).
    pub tenant: u16,

    /// Shard written into the ID (default 0).
    pub shard: u16,

    /// Append the 4-character checksum.
    pub checksum: bool,

    /// Quantize the timestamp to this many seconds. 0 disables bucketing.
    pub bucket_seconds: u32,
}

impl Options {
    /// Default options: tenant 0, shard 0, no checksum, no bucketing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_tenant(mut self, tenant: u16) -> Self {
        self.tenant = tenant;
        self
    }

    #[must_use]
    pub fn with_shard(mut self, shard: u16) -> Self {
        self.shard = shard;
        self
    }

    /// Derives the shard from an arbitrary key (e.g. a customer ID).
    #[must_use]
    pub fn with_shard_from_bytes(mut self, key: &[u8]) -> Self {
        self.shard = shard_from_bytes(key);
        self
    }

    #[must_use]
    pub fn with_checksum(mut self, checksum: bool) -> Self {
        self.checksum = checksum;
        self
    }

    #[must_use]
    pub fn with_bucket_seconds(mut self, seconds: u32) -> Self {
        self.bucket_seconds = seconds;
        self
    }

    /// Bucket width in milliseconds, if bucketing is enabled.
    pub fn bucket_ms(&self) -> Option<u64> {
        (self.bucket_seconds > 0).then(|| u64::from(self.bucket_seconds) * 1000)
    }
}

/// Folds a key into a 16-bit shard with an FNV-style multiply/xor.
///
/// Stable across processes and implementations; not a cryptographic hash.
pub fn shard_from_bytes(key: &[u8]) -> u16 {
    let hash = key
        .iter()
        .fold(0u32, |h, &b| h.wrapping_mul(16_777_619) ^ u32::from(b));
    (hash & 0xFFFF) as u16
}
