//! Bit strings and the sequential cursor every translator reads from
//!
//! A bit string is text made only of `'0'` and `'1'`, most significant bit
//! first. Translators build them on encode and consume them through a
//! [`BitCursor`] on decode.

use crate::error::{CodecError, Result};

/// Returns true if `s` contains only `'0'` and `'1'`
pub fn is_bit_string(s: &str) -> bool {
    s.bytes().all(|b| b == b'0' || b == b'1')
}

/// Sequential read cursor over a bit string
///
/// The cursor is consumed left to right and never rewound. It is owned by a
/// single encode or decode operation and handed to translators as `&mut`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitCursor {
    bits: String,
    pos: usize,
}

impl BitCursor {
    /// Create a cursor, rejecting anything that is not a bit string
    pub fn new(bits: impl Into<String>) -> Result<Self> {
        let bits = bits.into();
        if !is_bit_string(&bits) {
            return Err(CodecError::invalid_bits(format!(
                "expected only '0' and '1', got {:?}",
                bits
            )));
        }
        Ok(BitCursor { bits, pos: 0 })
    }

    /// Create a cursor over raw bytes, MSB of the first byte first
    pub fn from_bytes(bytes: &[u8]) -> Self {
        BitCursor {
            bits: from_bytes(bytes),
            pos: 0,
        }
    }

    /// Consume and return the next `n` bits
    pub fn read(&mut self, n: usize) -> Result<&str> {
        let available = self.available();
        if n > available {
            return Err(CodecError::InsufficientBits {
                requested: n,
                available,
            });
        }
        let start = self.pos;
        self.pos += n;
        Ok(&self.bits[start..self.pos])
    }

    /// Number of unread bits
    pub fn available(&self) -> usize {
        self.bits.len() - self.pos
    }

    /// Number of bits consumed so far
    pub fn position(&self) -> usize {
        self.pos
    }

    /// True once every bit has been read
    pub fn is_exhausted(&self) -> bool {
        self.available() == 0
    }

    /// The unread tail, without consuming it
    pub fn remaining(&self) -> &str {
        &self.bits[self.pos..]
    }
}

/// Expand bytes into a bit string
pub fn from_bytes(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:08b}", b)).collect()
}

/// Pack a bit string into bytes, zero filling the last partial byte
pub fn to_bytes(bits: &str) -> Result<Vec<u8>> {
    if !is_bit_string(bits) {
        return Err(CodecError::invalid_bits(format!(
            "expected only '0' and '1', got {:?}",
            bits
        )));
    }
    Ok(bits
        .as_bytes()
        .chunks(8)
        .map(|chunk| {
            let byte = chunk
                .iter()
                .fold(0u8, |acc, &b| (acc << 1) | u8::from(b == b'1'));
            byte << (8 - chunk.len())
        })
        .collect())
}

/// Fit a bit string to `width`: left-pad with `pad` when short, keep the
/// low-order `width` bits when long.
pub fn fit_to_width(bits: &str, width: usize, pad: char) -> String {
    let len = bits.len();
    if len == width {
        bits.to_string()
    } else if len < width {
        let mut out: String = std::iter::repeat(pad).take(width - len).collect();
        out.push_str(bits);
        out
    } else {
        bits[len - width..].to_string()
    }
}

/// Extend a bit string to 64 bits with its sign bit (signed) or zeros
/// (unsigned). Fields wider than 64 bits keep their low-order 64 bits.
pub fn extend_to_64(bits: &str, signed: bool) -> String {
    let pad = if signed && bits.starts_with('1') { '1' } else { '0' };
    fit_to_width(bits, 64, pad)
}

/// Numeric value of a bit string of at most 64 bits
pub fn pattern_value(bits: &str) -> u64 {
    bits.bytes()
        .fold(0u64, |acc, b| (acc << 1) | u64::from(b == b'1'))
}

/// Two's-complement binary digits of a 64-bit value: minimal digits for
/// non-negative values, all 64 digits for negative ones.
pub fn binary_digits(value: i128) -> String {
    if value < 0 {
        format!("{:064b}", value as i64 as u64)
    } else {
        format!("{:b}", value as u64)
    }
}

/// Parse a numeric literal: decimal with optional sign, `0x` hex or `0b`
/// binary. Returns `None` for malformed text or values outside the
/// `i64::MIN..=u64::MAX` range.
pub fn parse_numeric_literal(text: &str) -> Option<i128> {
    let text = text.trim();
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let magnitude = if let Some(hex) = strip_prefix_ci(body, "0x") {
        u64::from_str_radix(hex, 16).ok()?
    } else if let Some(bin) = strip_prefix_ci(body, "0b") {
        u64::from_str_radix(bin, 2).ok()?
    } else if !body.is_empty() && body.bytes().all(|b| b.is_ascii_digit()) {
        body.parse::<u64>().ok()?
    } else {
        return None;
    };

    let value = if negative {
        -(magnitude as i128)
    } else {
        magnitude as i128
    };
    if value < i64::MIN as i128 {
        return None;
    }
    Some(value)
}

/// Case-insensitive prefix strip, used for `0x`/`0b` literals
pub(crate) fn strip_prefix_ci<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    if text.get(..prefix.len()).is_some_and(|head| head.eq_ignore_ascii_case(prefix)) {
        Some(&text[prefix.len()..])
    } else {
        None
    }
}

/// Expand hex digits into a bit string, four bits per digit
pub fn hex_to_bits(hex: &str) -> Option<String> {
    hex.chars()
        .map(|c| c.to_digit(16).map(|d| format!("{:04b}", d)))
        .collect()
}
