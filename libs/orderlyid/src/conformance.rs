//! Conformance vectors shared between implementations.
//!
//! A vector lists explicit field values and the canonical string they must
//! encode to. Vectors marked `expect_error` carry a malformed string that
//! must fail to parse. The JSON file layout is:
//!
//! ```json
//! { "vectors": [ { "desc": "...", "prefix": "order", "time_ms": 0, "flags": 0,
//!                  "tenant": 0, "seq": 0, "shard": 0, "random_hex": "00",
//!                  "id": "order_...", "expect_error": false } ] }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::IdError;
use crate::id::{Components, OrderlyId};
use crate::{RANDOM_MASK, SEQ_MASK};

/// A set of vectors as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorFile {
    pub vectors: Vec<Vector>,
}

/// One conformance case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vector {
    pub desc: String,
    pub prefix: String,
    pub time_ms: u64,
    pub flags: u8,
    pub tenant: u16,
    pub seq: u16,
    pub shard: u16,
    /// Big-endian hex; only the low 60 bits are significant.
    pub random_hex: String,
    /// Canonical string; has a checksum suffix iff it contains `-`.
    pub id: String,
    pub expect_error: bool,
}

impl Vector {
    /// Whether the expected string carries a checksum.
    pub fn with_checksum(&self) -> bool {
        self.id.contains('-')
    }

    /// The construction inputs described by this vector.
    pub fn components(&self) -> Result<Components, IdError> {
        Components {
            prefix: self.prefix.clone(),
            time_ms: self.time_ms,
            flags: self.flags,
            tenant: self.tenant,
            seq: self.seq,
            shard: self.shard,
            random: 0,
        }
        .with_random_hex(&self.random_hex)
    }

    /// Encodes the vector's fields into a canonical string.
    pub fn encode(&self) -> Result<String, IdError> {
        let id = OrderlyId::from_components(self.components()?)?;
        Ok(id.encode(self.with_checksum()))
    }
}

/// Result of one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The check passed.
    Pass,
    /// Parsing failed, as the vector required.
    ExpectedFailure(IdError),
    /// The check failed; the message says why.
    Fail(String),
}

impl Outcome {
    pub fn is_ok(&self) -> bool {
        !matches!(self, Outcome::Fail(_))
    }
}

/// Encode and parse results for one vector.
///
/// `encode` is `None` for `expect_error` vectors, which are only parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorReport {
    pub encode: Option<Outcome>,
    pub parse: Outcome,
}

impl VectorReport {
    pub fn is_ok(&self) -> bool {
        self.parse.is_ok() && self.encode.as_ref().map_or(true, Outcome::is_ok)
    }
}

/// Checks a vector in both directions.
pub fn check(vector: &Vector) -> VectorReport {
    if vector.expect_error {
        let parse = match OrderlyId::parse(&vector.id) {
            Ok(_) => Outcome::Fail(format!("expected parse error, got none; id={}", vector.id)),
            Err(e) => Outcome::ExpectedFailure(e),
        };
        return VectorReport {
            encode: None,
            parse,
        };
    }

    VectorReport {
        encode: Some(check_encode(vector)),
        parse: check_parse(vector),
    }
}

fn check_encode(vector: &Vector) -> Outcome {
    match vector.encode() {
        Ok(got) if got == vector.id => Outcome::Pass,
        Ok(got) => Outcome::Fail(format!(
            "encode mismatch:\n  got:  {got}\n  want: {}",
            vector.id
        )),
        Err(e) => Outcome::Fail(format!("encode error: {e}")),
    }
}

fn check_parse(vector: &Vector) -> Outcome {
    let parsed = match OrderlyId::parse(&vector.id) {
        Ok(parsed) => parsed,
        Err(e) => return Outcome::Fail(format!("parse error: {e}")),
    };
    let want_random = match vector.components() {
        Ok(c) => c.random,
        Err(e) => return Outcome::Fail(format!("random_hex invalid: {e}")),
    };

    let mismatch = if parsed.prefix() != vector.prefix {
        Some(format!("prefix mismatch: got={} want={}", parsed.prefix(), vector.prefix))
    } else if parsed.time_ms() != vector.time_ms {
        Some(format!("time_ms mismatch: got={} want={}", parsed.time_ms(), vector.time_ms))
    } else if parsed.flags().bits() != vector.flags {
        Some(format!("flags mismatch: got={} want={:#04x}", parsed.flags(), vector.flags))
    } else if parsed.tenant() != vector.tenant {
        Some(format!("tenant mismatch: got={} want={}", parsed.tenant(), vector.tenant))
    } else if parsed.seq() != vector.seq & SEQ_MASK {
        Some(format!("seq mismatch: got={} want={}", parsed.seq(), vector.seq & SEQ_MASK))
    } else if parsed.shard() != vector.shard {
        Some(format!("shard mismatch: got={} want={}", parsed.shard(), vector.shard))
    } else if parsed.random() != want_random & RANDOM_MASK {
        Some(format!("random60 mismatch: got={:#x} want={:#x}", parsed.random(), want_random))
    } else {
        None
    };

    mismatch.map_or(Outcome::Pass, Outcome::Fail)
}

/// Running totals across a vector run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub encode_ok: usize,
    pub encode_fail: usize,
    pub parse_ok: usize,
    pub parse_fail: usize,
}

impl Summary {
    pub fn record(&mut self, report: &VectorReport) {
        match &report.encode {
            Some(outcome) if outcome.is_ok() => self.encode_ok += 1,
            Some(_) => self.encode_fail += 1,
            None => {}
        }
        if report.parse.is_ok() {
            self.parse_ok += 1;
        } else {
            self.parse_fail += 1;
        }
    }

    pub fn is_success(&self) -> bool {
        self.encode_fail + self.parse_fail == 0
    }
}

/// A golden string rewritten by [`regenerate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub desc: String,
    pub old: String,
    pub new: String,
}

/// Re-encodes every non-error vector and rewrites `id` where it changed.
///
/// The checksum convention (`-` present or not) is kept per vector.
pub fn regenerate(file: &mut VectorFile) -> Result<Vec<Update>, IdError> {
    let mut updates = Vec::new();
    for vector in file.vectors.iter_mut().filter(|v| !v.expect_error) {
        let encoded = vector.encode()?;
        if encoded != vector.id {
            updates.push(Update {
                desc: vector.desc.clone(),
                old: std::mem::replace(&mut vector.id, encoded.clone()),
                new: encoded,
            });
        }
    }
    Ok(updates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_vector() -> Vector {
        Vector {
            desc: "order with checksum".to_string(),
            prefix: "order".to_string(),
            time_ms: 1_757_869_157_707,
            flags: 0,
            tenant: 12,
            seq: 0,
            shard: 13811,
            random_hex: "02a6901b86690f18".to_string(),
            id: "order_00myngy59c0003000dfk59mg3e36j3rr-9xgg".to_string(),
            expect_error: false,
        }
    }

    #[test]
    fn test_valid_vector_passes() {
        let report = check(&valid_vector());
        assert_eq!(report.encode, Some(Outcome::Pass));
        assert_eq!(report.parse, Outcome::Pass);
        assert!(report.is_ok());
    }

    #[test]
    fn test_field_mismatch_reported() {
        let mut vector = valid_vector();
        vector.tenant = 13;
        let report = check(&vector);
        assert!(matches!(report.encode, Some(Outcome::Fail(_))));
        assert_eq!(
            report.parse,
            Outcome::Fail("tenant mismatch: got=12 want=13".to_string())
        );
    }

    #[test]
    fn test_expect_error_vector() {
        let mut vector = valid_vector();
        vector.id = "order_00myngy59c0003000dfk59mg3e36j3rr-9xg0".to_string();
        vector.expect_error = true;
        let report = check(&vector);
        assert_eq!(report.encode, None);
        assert!(matches!(
            report.parse,
            Outcome::ExpectedFailure(IdError::ChecksumMismatch { .. })
        ));

        vector.id = "order_00myngy59c0003000dfk59mg3e36j3rr-9xgg".to_string();
        assert!(!check(&vector).is_ok());
    }

    #[test]
    fn test_summary() {
        let mut summary = Summary::default();
        summary.record(&check(&valid_vector()));
        assert!(summary.is_success());

        let mut broken = valid_vector();
        broken.shard = 1;
        summary.record(&check(&broken));
        assert_eq!(
            summary,
            Summary {
                encode_ok: 1,
                encode_fail: 1,
                parse_ok: 1,
                parse_fail: 1,
            }
        );
        assert!(!summary.is_success());
    }

    #[test]
    fn test_regenerate_rewrites_stale_ids() {
        let mut stale = valid_vector();
        stale.id = "order_00000000000000000000000000000000-0000".to_string();
        let mut error = valid_vector();
        error.expect_error = true;
        error.id = "garbage".to_string();

        let mut file = VectorFile {
            vectors: vec![valid_vector(), stale, error],
        };
        let updates = regenerate(&mut file).unwrap();

        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].new, valid_vector().id);
        assert_eq!(file.vectors[1].id, valid_vector().id);
        assert_eq!(file.vectors[2].id, "garbage");
    }
}
