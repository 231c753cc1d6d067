//! Crockford-style Base32 transform for the 20-byte body.
//!
//! Encoding is strict: always 32 lowercase characters from [`ALPHABET`].
//! Decoding is lenient: uppercase is accepted, `i`/`l` read as `1` and `o`
//! reads as `0`. `u` is not part of the accepted set.

use crate::error::IdError;
use crate::pack::Body;
use crate::{BODY_LEN, PAYLOAD_LEN};

/// Canonical lowercase alphabet (excludes `i`, `l`, `o`, `u`).
pub const ALPHABET: &[u8; 32] = b"0123456789abcdefghjkmnpqrstvwxyz";

const INVALID: u8 = 0xFF;

/// Byte → 5-bit value, `INVALID` for anything outside the accepted set.
static DECODE: [u8; 256] = build_decode_table();

const fn build_decode_table() -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        let c = ALPHABET[i];
        table[c as usize] = i as u8;
        table[c.to_ascii_uppercase() as usize] = i as u8;
        i += 1;
    }

    // Ambiguous glyphs
    table[b'i' as usize] = 1;
    table[b'I' as usize] = 1;
    table[b'l' as usize] = 1;
    table[b'L' as usize] = 1;
    table[b'o' as usize] = 0;
    table[b'O' as usize] = 0;
    table
}

/// Returns the 5-bit value of a payload byte, if it is accepted.
#[inline]
pub fn symbol_value(byte: u8) -> Option<u8> {
    match DECODE[byte as usize] {
        INVALID => None,
        v => Some(v),
    }
}

/// Maps a 5-bit value to its canonical character.
#[inline]
pub(crate) fn symbol_char(value: u8) -> char {
    ALPHABET[(value & 0x1F) as usize] as char
}

/// Splits a body into its 32 five-bit symbol values, MSB first.
pub(crate) fn to_symbols(body: &Body) -> [u8; PAYLOAD_LEN] {
    let mut out = [0u8; PAYLOAD_LEN];
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut written = 0;

    for &byte in body {
        acc = (acc << 8) | u32::from(byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out[written] = ((acc >> bits) & 0x1F) as u8;
            written += 1;
        }
    }

    // 160 bits split evenly into 5-bit groups
    debug_assert_eq!(bits, 0);
    out
}

/// Encodes a body as exactly 32 lowercase characters.
pub fn encode(body: &Body) -> String {
    to_symbols(body).iter().map(|&v| symbol_char(v)).collect()
}

/// Decodes a 32-character payload into its 20-byte body.
pub fn decode(payload: &str) -> Result<Body, IdError> {
    let bytes = payload.as_bytes();
    if bytes.len() != PAYLOAD_LEN {
        return Err(IdError::BadPayloadLength { len: bytes.len() });
    }

    let mut out = [0u8; BODY_LEN];
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut written = 0;

    for (position, &byte) in bytes.iter().enumerate() {
        let value = symbol_value(byte).ok_or_else(|| invalid_symbol(payload, position))?;
        acc = (acc << 5) | u32::from(value);
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out[written] = (acc >> bits) as u8;
            written += 1;
        }
    }

    if written != BODY_LEN || bits != 0 {
        return Err(IdError::BadPayloadLength { len: bytes.len() });
    }
    Ok(out)
}

/// Resolves every payload byte to its 5-bit value.
pub(crate) fn decode_symbols(payload: &str) -> Result<Vec<u8>, IdError> {
    payload
        .bytes()
        .enumerate()
        .map(|(position, byte)| symbol_value(byte).ok_or_else(|| invalid_symbol(payload, position)))
        .collect()
}

fn invalid_symbol(payload: &str, position: usize) -> IdError {
    let symbol = payload
        .get(position..)
        .and_then(|rest| rest.chars().next())
        .unwrap_or(char::REPLACEMENT_CHARACTER);
    IdError::InvalidSymbol { position, symbol }
}
