//! Fixed-length and length-prefixed ASCII string translators

use super::{read_field, ArgumentTranslator};
use crate::bits::{fit_to_width, from_bytes, pattern_value, to_bytes, BitCursor};
use crate::consts;
use crate::definition::ArgumentDefinition;
use crate::error::{CodecError, Result};

/// Strip one pair of surrounding double quotes
fn unquote(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn ascii_bits(def: &ArgumentDefinition, text: &str) -> Result<String> {
    if !text.is_ascii() {
        return Err(CodecError::encode(
            def.label(),
            format!("{:?} contains non-ASCII characters", text),
        ));
    }
    Ok(from_bytes(text.as_bytes()))
}

/// Decode whole bytes of `bits` as ASCII, ignoring a trailing partial byte
fn ascii_text(def: &ArgumentDefinition, bits: &str, trim_nul: bool) -> Result<String> {
    let whole = bits.len() - bits.len() % 8;
    let bytes = to_bytes(&bits[..whole])?;
    let bytes: &[u8] = if trim_nul {
        let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
        let end = bytes.iter().rposition(|&b| b != 0).map_or(start, |i| i + 1);
        &bytes[start..end]
    } else {
        &bytes
    };
    if !bytes.is_ascii() {
        return Err(CodecError::decode(def.label(), "string contains non-ASCII bytes"));
    }
    Ok(bytes.iter().map(|&b| b as char).collect())
}

/// ASCII string left padded with zero bits to a fixed width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedStringTranslator;

impl ArgumentTranslator for FixedStringTranslator {
    fn to_bit_string(&self, def: &ArgumentDefinition, value: &str) -> Result<String> {
        if value.is_empty() {
            return Err(CodecError::encode(def.label(), "value is empty"));
        }
        let bits = ascii_bits(def, unquote(value))?;
        if bits.len() > def.bit_length {
            return Err(CodecError::encode(
                def.label(),
                format!(
                    "string needs {} bits but the field holds {}",
                    bits.len(),
                    def.bit_length
                ),
            ));
        }
        Ok(fit_to_width(&bits, def.bit_length, '0'))
    }

    fn parse_from_bit_string(&self, def: &ArgumentDefinition, cursor: &mut BitCursor) -> Result<String> {
        let bits = read_field(cursor, def, def.bit_length)?;
        ascii_text(def, &bits, true)
    }
}

/// ASCII string preceded by its byte length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VarStringTranslator;

impl VarStringTranslator {
    fn prefix_length(def: &ArgumentDefinition) -> Option<usize> {
        def.prefix_bit_length
            .filter(|p| consts::VAR_STRING_PREFIX_LENGTHS.contains(p))
    }
}

impl ArgumentTranslator for VarStringTranslator {
    fn to_bit_string(&self, def: &ArgumentDefinition, value: &str) -> Result<String> {
        if value.is_empty() {
            return Err(CodecError::encode(def.label(), "value is empty"));
        }
        let prefix = Self::prefix_length(def).ok_or_else(|| {
            CodecError::encode(
                def.label(),
                format!("unsupported prefix bit length {:?}", def.prefix_bit_length),
            )
        })?;

        let text = unquote(value);
        let body = ascii_bits(def, text)?;
        let length = text.len() as u64;
        if length >= 1u64 << prefix {
            return Err(CodecError::encode(
                def.label(),
                format!("{} bytes do not fit a {}-bit length prefix", length, prefix),
            ));
        }
        if def.bit_length > 0 && body.len() > def.bit_length {
            return Err(CodecError::encode(
                def.label(),
                format!(
                    "string needs {} bits but at most {} are allowed",
                    body.len(),
                    def.bit_length
                ),
            ));
        }

        let mut bits = fit_to_width(&format!("{:b}", length), prefix, '0');
        bits.push_str(&body);
        Ok(bits)
    }

    fn parse_from_bit_string(&self, def: &ArgumentDefinition, cursor: &mut BitCursor) -> Result<String> {
        let prefix = Self::prefix_length(def).ok_or_else(|| {
            CodecError::decode(
                def.label(),
                format!("unsupported prefix bit length {:?}", def.prefix_bit_length),
            )
        })?;
        let length = pattern_value(&read_field(cursor, def, prefix)?) as usize;
        let body = read_field(cursor, def, length * 8)?;
        ascii_text(def, &body, false)
    }
}
