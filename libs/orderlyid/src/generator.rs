//! ID generation: clock, entropy, and sequence composed into one façade.

use std::sync::{Arc, OnceLock};

use rand::rngs::OsRng;
use rand::TryRngCore;
use tracing::trace;

use crate::error::IdError;
use crate::id::{validate_prefix, Flags, OrderlyId};
use crate::options::Options;
use crate::pack::Fields;
use crate::sequence::SequenceGenerator;
use crate::{EPOCH_MS, RANDOM_MASK, TIME_MASK};

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    /// Unix milliseconds.
    fn now_ms(&self) -> u64;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        // A clock before 1970 clamps to 0 and then to the 2020 epoch
        u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Source of cryptographically secure random bytes.
pub trait EntropySource: Send + Sync {
    /// Fills `buf` completely or fails with [`IdError::EntropySourceFailure`].
    fn fill(&self, buf: &mut [u8]) -> Result<(), IdError>;
}

/// The operating system's CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<(), IdError> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| IdError::EntropySourceFailure(e.to_string()))
    }
}

impl<E: EntropySource + ?Sized> EntropySource for Arc<E> {
    fn fill(&self, buf: &mut [u8]) -> Result<(), IdError> {
        (**self).fill(buf)
    }
}

/// Generates IDs from a clock, an entropy source, and its own sequence.
///
/// Each generator owns its sequence state; IDs from one generator that share
/// a millisecond get increasing `seq` values.
#[derive(Debug)]
pub struct Generator<C = SystemClock, E = OsEntropy> {
    clock: C,
    entropy: E,
    sequence: SequenceGenerator,
}

impl Generator {
    /// A generator on the system clock and OS randomness.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sources(SystemClock, OsEntropy)
    }

    /// The process-wide generator used by [`crate::generate`].
    pub fn global() -> &'static Generator {
        static GLOBAL: OnceLock<Generator> = OnceLock::new();
        GLOBAL.get_or_init(Generator::new)
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock, E: EntropySource> Generator<C, E> {
    /// A generator with explicit clock and entropy sources.
    pub fn with_sources(clock: C, entropy: E) -> Self {
        Self {
            clock,
            entropy,
            sequence: SequenceGenerator::new(),
        }
    }

    /// The sequence state backing this generator.
    pub fn sequence(&self) -> &SequenceGenerator {
        &self.sequence
    }

    /// Generates a canonical ID string.
    ///
    /// An invalid prefix yields [`IdError::InvalidPrefix`], which
    /// [`IdError::is_precondition_violation`] identifies as a caller bug.
    pub fn generate(&self, prefix: &str, options: &Options) -> Result<String, IdError> {
        self.generate_id(prefix, options)
            .map(|id| id.encode(options.checksum))
    }

    /// Generates an ID and returns it in decoded form.
    pub fn generate_id(&self, prefix: &str, options: &Options) -> Result<OrderlyId, IdError> {
        validate_prefix(prefix)?;

        let mut now = self.clock.now_ms();
        let mut flags = Flags::V1;
        if let Some(bucket_ms) = options.bucket_ms() {
            now = now / bucket_ms * bucket_ms;
            flags = flags.with_privacy_bucketed();
        }

        let time = now.saturating_sub(EPOCH_MS) & TIME_MASK;
        let seq = self.sequence.next(time);
        let random = self.random60()?;

        trace!(prefix, time, seq, bucketed = flags.is_privacy_bucketed(), "generated id");

        Ok(OrderlyId::from_fields(
            prefix.to_string(),
            Fields {
                time,
                flags: flags.bits(),
                tenant: options.tenant,
                seq,
                shard: options.shard,
                random,
            },
        ))
    }

    fn random60(&self) -> Result<u64, IdError> {
        let mut buf = [0u8; 8];
        self.entropy.fill(&mut buf)?;
        Ok(u64::from_be_bytes(buf) & RANDOM_MASK)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;

    struct FixedClock(AtomicU64);

    impl FixedClock {
        fn at(ms: u64) -> Arc<Self> {
            Arc::new(Self(AtomicU64::new(ms)))
        }

        fn set(&self, ms: u64) {
            self.0.store(ms, Ordering::SeqCst);
        }
    }

    impl Clock for FixedClock {
        fn now_ms(&self) -> u64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    struct ConstEntropy(u8);

    impl EntropySource for ConstEntropy {
        fn fill(&self, buf: &mut [u8]) -> Result<(), IdError> {
            buf.fill(self.0);
            Ok(())
        }
    }

    struct FailingEntropy;

    impl EntropySource for FailingEntropy {
        fn fill(&self, _buf: &mut [u8]) -> Result<(), IdError> {
            Err(IdError::EntropySourceFailure("no entropy".to_string()))
        }
    }

    const T: u64 = 1_757_869_157_707;

    #[test]
    fn test_generate_with_fixed_sources() {
        let generator = Generator::with_sources(FixedClock::at(T), ConstEntropy(0xFF));
        let id = generator
            .generate_id("order", &Options::new().with_tenant(12).with_shard(34))
            .unwrap();
        assert_eq!(id.time_ms(), T);
        assert_eq!(id.tenant(), 12);
        assert_eq!(id.shard(), 34);
        assert_eq!(id.seq(), 0);
        assert_eq!(id.random(), RANDOM_MASK);
        assert_eq!(id.flags(), Flags::V1);
    }

    #[test]
    fn test_sequence_advances_within_millisecond() {
        let clock = FixedClock::at(T);
        let generator = Generator::with_sources(Arc::clone(&clock), ConstEntropy(0));
        let opts = Options::new();

        let seqs: Vec<u16> = (0..3)
            .map(|_| generator.generate_id("user", &opts).unwrap().seq())
            .collect();
        assert_eq!(seqs, vec![0, 1, 2]);

        clock.set(T + 1);
        assert_eq!(generator.generate_id("user", &opts).unwrap().seq(), 0);
    }

    #[test]
    fn test_bucketing_quantizes_and_flags() {
        let clock = FixedClock::at(T);
        let generator = Generator::with_sources(Arc::clone(&clock), ConstEntropy(0));
        let opts = Options::new().with_bucket_seconds(60);

        let first = generator.generate_id("session", &opts).unwrap();
        assert_eq!(first.time_ms() % 60_000, 0);
        assert!(first.time_ms() <= T && T - first.time_ms() < 60_000);
        assert!(first.flags().is_privacy_bucketed());

        // Same bucket, later millisecond: still the same sequence window
        clock.set(T + 1_000);
        let second = generator.generate_id("session", &opts).unwrap();
        assert_eq!(second.time_ms(), first.time_ms());
        assert_eq!(second.seq(), 1);
    }

    #[test]
    fn test_pre_epoch_clock_clamps() {
        let generator = Generator::with_sources(FixedClock::at(5), ConstEntropy(0));
        let id = generator.generate_id("user", &Options::new()).unwrap();
        assert_eq!(id.time_ms(), EPOCH_MS);
    }

    #[test]
    fn test_invalid_prefix_is_precondition_violation() {
        let generator = Generator::with_sources(FixedClock::at(T), ConstEntropy(0));
        let err = generator.generate("Bad!", &Options::new()).unwrap_err();
        assert!(err.is_precondition_violation());
        // Prefix is checked before any state changes
        assert_eq!(generator.sequence().snapshot(), (None, 0));
    }

    #[test]
    fn test_entropy_failure_propagates() {
        let generator = Generator::with_sources(FixedClock::at(T), FailingEntropy);
        let err = generator.generate("order", &Options::new()).unwrap_err();
        assert!(matches!(err, IdError::EntropySourceFailure(_)));
    }

    #[test]
    fn test_checksum_option() {
        let generator = Generator::with_sources(FixedClock::at(T), ConstEntropy(7));
        let s = generator
            .generate("order", &Options::new().with_checksum(true))
            .unwrap();
        assert_eq!(s.len(), "order_".len() + 32 + 1 + 4);
        assert!(OrderlyId::parse(&s).is_ok());
    }

    #[test]
    fn test_os_entropy_fills() {
        let mut buf = [0u8; 32];
        OsEntropy.fill(&mut buf).unwrap();
        // 256 zero bits from a CSPRNG is not a realistic outcome
        assert_ne!(buf, [0u8; 32]);
    }

    #[test]
    fn test_global_is_shared() {
        assert!(std::ptr::eq(Generator::global(), Generator::global()));
    }
}
