//! Repeat translator: a count field followed by repeated argument groups
//!
//! The textual form is the count followed by every sub-value, all joined by
//! [`REPEAT_SEPARATOR`]. With a group of M sub-arguments and count C,
//! value `i` (for `i` in `0..C*M`) belongs to sub-argument `i % M`. A nested
//! repeat takes its own count and values from the same token stream.
//!
//! A sub-value may be quoted to carry the separator or edge whitespace:
//! `1,"a, b "` holds the single string `a, b `. Inside quotes a backslash
//! escapes a quote or another backslash.

use super::numeric::render_integer;
use super::{read_field, require_value, ArgumentTranslator};
use crate::bits::{extend_to_64, parse_numeric_literal, pattern_value, BitCursor};
use crate::codec::ArgumentCodec;
use crate::consts::{REPEAT_ESCAPE, REPEAT_QUOTE, REPEAT_SEPARATOR};
use crate::definition::{ArgumentDefinition, ArgumentType};
use crate::error::{CodecError, Result};

/// Split repeat text into tokens
///
/// Quoted tokens come back unescaped but still wrapped in quotes, which the
/// string translators strip. Unquoted tokens are trimmed.
fn split_values(def: &ArgumentDefinition, text: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let token = if chars.next_if_eq(&REPEAT_QUOTE).is_some() {
            let mut quoted = String::from(REPEAT_QUOTE);
            loop {
                match chars.next() {
                    Some(REPEAT_ESCAPE) => match chars.next() {
                        Some(c @ (REPEAT_QUOTE | REPEAT_ESCAPE)) => quoted.push(c),
                        Some(c) => {
                            quoted.push(REPEAT_ESCAPE);
                            quoted.push(c);
                        }
                        None => return Err(CodecError::encode(def.label(), "unterminated quoted value")),
                    },
                    Some(REPEAT_QUOTE) => break,
                    Some(c) => quoted.push(c),
                    None => return Err(CodecError::encode(def.label(), "unterminated quoted value")),
                }
            }
            quoted.push(REPEAT_QUOTE);

            while chars.next_if(|c| c.is_whitespace()).is_some() {}
            if chars.peek().is_some_and(|c| *c != REPEAT_SEPARATOR) {
                return Err(CodecError::encode(
                    def.label(),
                    format!("unexpected text after quoted value {}", quoted),
                ));
            }
            quoted
        } else {
            let mut raw = String::new();
            while let Some(c) = chars.next_if(|c| *c != REPEAT_SEPARATOR) {
                raw.push(c);
            }
            raw.trim_end().to_string()
        };
        tokens.push(token);

        if chars.next().is_none() {
            return Ok(tokens);
        }
    }
}

/// Render a decoded string sub-value so `split_values` gives it back intact
fn quote_value(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value.contains(REPEAT_SEPARATOR)
        || value.contains(REPEAT_QUOTE)
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace);
    if !needs_quotes {
        return value.to_string();
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push(REPEAT_QUOTE);
    for c in value.chars() {
        if c == REPEAT_QUOTE || c == REPEAT_ESCAPE {
            quoted.push(REPEAT_ESCAPE);
        }
        quoted.push(c);
    }
    quoted.push(REPEAT_QUOTE);
    quoted
}

/// Repeat translator; re-enters the dispatcher for every sub-argument
#[derive(Clone, Copy)]
pub struct RepeatTranslator<'a> {
    codec: &'a ArgumentCodec,
}

impl<'a> RepeatTranslator<'a> {
    pub fn new(codec: &'a ArgumentCodec) -> Self {
        RepeatTranslator { codec }
    }

    fn group_size(def: &ArgumentDefinition) -> Result<usize> {
        if def.sub_arguments.is_empty() {
            return Err(CodecError::configuration(format!(
                "repeat argument {} has no sub-arguments",
                def.label()
            )));
        }
        Ok(def.sub_arguments.len())
    }

    fn parse_count(def: &ArgumentDefinition, token: &str) -> Result<u64> {
        let count = parse_numeric_literal(token)
            .filter(|n| *n >= 0)
            .ok_or_else(|| CodecError::encode(def.label(), format!("{:?} is not a repeat count", token)))?
            as u64;
        if def.bit_length < 64 && count >= 1u64 << def.bit_length {
            return Err(CodecError::encode(
                def.label(),
                format!("repeat count {} does not fit {} bits", count, def.bit_length),
            ));
        }
        Ok(count)
    }

    /// Encode one repeat argument, taking its tokens from `tokens`
    fn encode_group<'t, I>(&self, def: &ArgumentDefinition, tokens: &mut I) -> Result<String>
    where
        I: Iterator<Item = &'t str>,
    {
        let m = Self::group_size(def)?;
        let token = tokens
            .next()
            .ok_or_else(|| CodecError::encode(def.label(), "missing repeat count"))?;
        let count = Self::parse_count(def, token)?;
        let total = (count as usize)
            .checked_mul(m)
            .ok_or_else(|| CodecError::encode(def.label(), format!("repeat count {} too large", count)))?;

        let mut bits = render_integer(count as i128, def.bit_length, false);
        for i in 0..total {
            let sub = &def.sub_arguments[i % m];
            let encoded = if sub.arg_type == ArgumentType::Repeat {
                self.encode_group(sub, tokens)
            } else {
                let value = tokens.next().ok_or_else(|| {
                    CodecError::encode(
                        def.label(),
                        format!("count {} needs {} values, only {} given", count, total, i),
                    )
                })?;
                self.codec.encode_unchecked(sub, value)
            };
            bits.push_str(&encoded.map_err(|e| CodecError::repeat(def.label(), e))?);
        }
        Ok(bits)
    }
}

impl ArgumentTranslator for RepeatTranslator<'_> {
    fn to_bit_string(&self, def: &ArgumentDefinition, value: &str) -> Result<String> {
        let value = require_value(def, value)?;
        let split = split_values(def, value)?;
        let mut tokens = split.iter().map(String::as_str);
        let bits = self.encode_group(def, &mut tokens)?;

        let extra = tokens.count();
        if extra > 0 {
            return Err(CodecError::encode(
                def.label(),
                format!("{} values beyond the repeat count", extra),
            ));
        }
        Ok(bits)
    }

    fn parse_from_bit_string(&self, def: &ArgumentDefinition, cursor: &mut BitCursor) -> Result<String> {
        let m = Self::group_size(def)?;
        let count = pattern_value(&extend_to_64(&read_field(cursor, def, def.bit_length)?, false));
        let total = usize::try_from(count)
            .ok()
            .and_then(|c| c.checked_mul(m))
            .ok_or_else(|| CodecError::decode(def.label(), format!("repeat count {} too large", count)))?;

        let mut text = count.to_string();
        for i in 0..total {
            let sub = &def.sub_arguments[i % m];
            let value = self
                .codec
                .decode_unchecked(sub, cursor)
                .map_err(|e| CodecError::repeat(def.label(), e))?;
            text.push(REPEAT_SEPARATOR);
            match sub.arg_type {
                ArgumentType::FixedString | ArgumentType::VarString => text.push_str(&quote_value(&value)),
                _ => text.push_str(&value),
            }
        }
        Ok(text)
    }
}
