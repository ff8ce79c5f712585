//! Integer, unsigned and IEEE-754 float translators

use super::{read_field, require_value, ArgumentTranslator};
use crate::bits::{binary_digits, extend_to_64, fit_to_width, parse_numeric_literal, pattern_value, BitCursor};
use crate::consts;
use crate::definition::ArgumentDefinition;
use crate::error::{CodecError, Result};

/// Render a 64-bit value into `width` bits
///
/// Short forms are left padded with `'1'` for negative signed values and
/// `'0'` otherwise; long forms keep their low-order `width` bits.
pub(crate) fn render_integer(value: i128, width: usize, signed: bool) -> String {
    let pad = if signed && value < 0 { '1' } else { '0' };
    fit_to_width(&binary_digits(value), width, pad)
}

/// Raw IEEE-754 pattern of `value` in a 32 or 64 bit field
pub(crate) fn render_float(value: f64, width: usize) -> Option<String> {
    let digits = match width {
        32 => format!("{:b}", (value as f32).to_bits()),
        64 => format!("{:b}", value.to_bits()),
        _ => return None,
    };
    let pad = if value.is_sign_negative() { '1' } else { '0' };
    Some(fit_to_width(&digits, width, pad))
}

/// Signed or unsigned integer translator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerTranslator {
    signed: bool,
}

impl IntegerTranslator {
    pub fn signed() -> Self {
        IntegerTranslator { signed: true }
    }

    pub fn unsigned() -> Self {
        IntegerTranslator { signed: false }
    }

    pub fn is_signed(&self) -> bool {
        self.signed
    }

    fn parse_value(&self, def: &ArgumentDefinition, value: &str) -> Result<i128> {
        let n = parse_numeric_literal(value).ok_or_else(|| {
            CodecError::encode(def.label(), format!("{:?} is not a valid integer", value))
        })?;
        if self.signed && n > i64::MAX as i128 {
            return Err(CodecError::encode(
                def.label(),
                format!("{} exceeds the signed 64-bit range", n),
            ));
        }
        if !self.signed && n < 0 {
            return Err(CodecError::encode(
                def.label(),
                format!("{} is negative but the argument is unsigned", n),
            ));
        }
        Ok(n)
    }
}

impl ArgumentTranslator for IntegerTranslator {
    fn to_bit_string(&self, def: &ArgumentDefinition, value: &str) -> Result<String> {
        let value = require_value(def, value)?;
        let n = self.parse_value(def, value)?;
        Ok(render_integer(n, def.bit_length, self.signed))
    }

    fn parse_from_bit_string(&self, def: &ArgumentDefinition, cursor: &mut BitCursor) -> Result<String> {
        let bits = read_field(cursor, def, def.bit_length)?;
        let raw = pattern_value(&extend_to_64(&bits, self.signed));
        Ok(if self.signed {
            (raw as i64).to_string()
        } else {
            raw.to_string()
        })
    }
}

/// IEEE-754 single or double translator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FloatTranslator;

impl FloatTranslator {
    fn is_supported(bit_length: usize) -> bool {
        consts::FLOAT_BIT_LENGTHS.contains(&bit_length)
    }
}

impl ArgumentTranslator for FloatTranslator {
    fn to_bit_string(&self, def: &ArgumentDefinition, value: &str) -> Result<String> {
        let value = require_value(def, value)?;
        if !Self::is_supported(def.bit_length) {
            return Err(CodecError::encode(
                def.label(),
                format!("unsupported float bit length {}", def.bit_length),
            ));
        }
        let v: f64 = value.trim().parse().map_err(|_| {
            CodecError::encode(def.label(), format!("{:?} is not a valid float", value))
        })?;
        render_float(v, def.bit_length).ok_or_else(|| {
            CodecError::encode(def.label(), format!("unsupported float bit length {}", def.bit_length))
        })
    }

    fn parse_from_bit_string(&self, def: &ArgumentDefinition, cursor: &mut BitCursor) -> Result<String> {
        if !Self::is_supported(def.bit_length) {
            return Err(CodecError::decode(
                def.label(),
                format!("unsupported float bit length {}", def.bit_length),
            ));
        }
        let bits = read_field(cursor, def, def.bit_length)?;
        let raw = pattern_value(&bits);
        Ok(if def.bit_length == 32 {
            f32::from_bits(raw as u32).to_string()
        } else {
            f64::from_bits(raw).to_string()
        })
    }
}
