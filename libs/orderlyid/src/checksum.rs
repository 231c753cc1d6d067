//! Four-character integrity checksum (Bech32-style polymod, 20 bits).
//!
//! The checksum binds `prefix_payload`: the prefix and separator are mixed
//! in through HRP expansion, the payload through its 5-bit symbol values.
//! It guards against transcription errors and is not a MAC.
//!
//! Only the low 20 bits of the final accumulator are kept. The last two
//! payload symbols are still inside the discarded high bits at that point,
//! so they are not covered.

use crate::base32;
use crate::error::IdError;
use crate::CHECKSUM_LEN;

const GENERATORS: [u32; 5] = [
    0x3b6a_57b2,
    0x2650_8e6d,
    0x1ea1_19fa,
    0x3d42_33dd,
    0x2a14_62b3,
];

/// Computes the checksum of `prefix_payload`.
///
/// The input is case-folded and payload symbols are resolved leniently, so
/// `ORDER_0O...` and `order_00...` share a checksum.
pub fn compute(base: &str) -> Result<String, IdError> {
    let Some(split) = base.find('_').filter(|&i| i > 0) else {
        return Err(IdError::MissingSeparator);
    };

    let hrp = base[..=split].to_ascii_lowercase();
    let symbols = base32::decode_symbols(&base[split + 1..])?;
    Ok(from_parts(hrp.as_bytes(), &symbols))
}

/// Computes the checksum from a lowercase `prefix_` and payload symbol values.
pub(crate) fn from_parts(hrp: &[u8], symbols: &[u8]) -> String {
    let mut values = hrp_expand(hrp);
    values.extend_from_slice(symbols);
    values.extend_from_slice(&[0; CHECKSUM_LEN]);

    let pm = polymod(&values) ^ 1;
    (0..CHECKSUM_LEN)
        .map(|i| base32::symbol_char((pm >> (5 * (CHECKSUM_LEN - 1 - i))) as u8))
        .collect()
}

/// Returns true if `checksum` matches `base`, ignoring case.
///
/// A base that cannot be checksummed (no separator, bad payload symbol)
/// never verifies.
pub fn verify(base: &str, checksum: &str) -> bool {
    compute(base)
        .map(|expected| expected.eq_ignore_ascii_case(checksum))
        .unwrap_or(false)
}

/// High 3 bits of each byte, a zero group, then the low 5 bits of each byte.
fn hrp_expand(hrp: &[u8]) -> Vec<u8> {
    let mut values = Vec::with_capacity(hrp.len() * 2 + 1);
    values.extend(hrp.iter().map(|b| b >> 5));
    values.push(0);
    values.extend(hrp.iter().map(|b| b & 0x1F));
    values
}

fn polymod(values: &[u8]) -> u32 {
    values.iter().fold(1u32, |chk, &v| {
        let top = chk >> 25;
        let mut chk = ((chk & 0x01ff_ffff) << 5) ^ u32::from(v);
        for (i, generator) in GENERATORS.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= generator;
            }
        }
        chk
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "order_00myngy59c0003000dfk59mg3e36j3rr";

    #[test]
    fn test_known_checksum() {
        assert_eq!(compute(BASE).unwrap(), "9xgg");
        assert!(verify(BASE, "9xgg"));
        assert!(verify(BASE, "9XGG"));
        assert!(!verify(BASE, "9xg0"));
    }

    #[test]
    fn test_case_and_glyph_folding() {
        assert_eq!(compute(&BASE.to_uppercase()).unwrap(), "9xgg");
        let folded = BASE.replacen("00", "oO", 1);
        assert_eq!(compute(&folded).unwrap(), "9xgg");
    }

    #[test]
    fn test_missing_separator() {
        assert_eq!(
            compute("order00myngy59c0003000dfk59mg3e36j3rr").unwrap_err(),
            IdError::MissingSeparator
        );
        assert_eq!(compute("_abc").unwrap_err(), IdError::MissingSeparator);
        assert!(!verify("nounderscore", "0000"));
    }

    #[test]
    fn test_invalid_payload_symbol() {
        let err = compute("order_00myngy59c0003000dfk59mg3e36j3u!").unwrap_err();
        assert!(matches!(err, IdError::InvalidSymbol { position: 30, .. }));
    }

    #[test]
    fn test_hrp_expand() {
        assert_eq!(hrp_expand(b"a_"), vec![3, 2, 0, 1, 31]);
    }

    #[test]
    fn test_prefix_substitutions_detected() {
        let expected = compute(BASE).unwrap();
        for position in 0..5 {
            for c in ('a'..='z').chain('0'..='9') {
                if BASE.as_bytes()[position] == c as u8 {
                    continue;
                }
                let mut tampered = BASE.to_string();
                tampered.replace_range(position..=position, &c.to_string());
                assert_ne!(compute(&tampered).unwrap(), expected, "{tampered}");
            }
        }
    }

    #[test]
    fn test_payload_substitutions_detected_except_trailing_symbols() {
        let expected = compute(BASE).unwrap();
        let payload_start = BASE.find('_').unwrap() + 1;
        let mut accepted_tail = 0;

        for position in payload_start..BASE.len() {
            for &c in base32::ALPHABET {
                if BASE.as_bytes()[position] == c {
                    continue;
                }
                let mut tampered = BASE.to_string();
                tampered.replace_range(position..=position, &(c as char).to_string());
                let same = compute(&tampered).unwrap() == expected;
                if position >= BASE.len() - 2 {
                    accepted_tail += usize::from(same);
                } else {
                    assert!(!same, "undetected substitution: {tampered}");
                }
            }
        }

        assert_eq!(accepted_tail, 62);
    }
}
