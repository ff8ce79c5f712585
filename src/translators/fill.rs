//! Filler translator for don't-care bit regions

use super::{read_field, require_value, ArgumentTranslator};
use crate::bits::{hex_to_bits, is_bit_string, strip_prefix_ci, BitCursor};
use crate::definition::ArgumentDefinition;
use crate::error::{CodecError, Result};

/// Normalize a fill pattern given as binary or hex text into bits
fn pattern_bits(text: &str) -> Option<String> {
    let text = text.trim();
    if let Some(bin) = strip_prefix_ci(text, "0b") {
        return (!bin.is_empty() && is_bit_string(bin)).then(|| bin.to_string());
    }
    if let Some(hex) = strip_prefix_ci(text, "0x") {
        return if hex.is_empty() { None } else { hex_to_bits(hex) };
    }
    if is_bit_string(text) {
        Some(text.to_string())
    } else {
        hex_to_bits(text)
    }
}

/// Repeats a fill pattern across the field; decodes to the raw bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FillTranslator;

impl ArgumentTranslator for FillTranslator {
    fn to_bit_string(&self, def: &ArgumentDefinition, value: &str) -> Result<String> {
        let value = require_value(def, value)?;
        let pattern = pattern_bits(value).ok_or_else(|| {
            CodecError::encode(def.label(), format!("{:?} is not a binary or hex fill pattern", value))
        })?;

        let width = def.bit_length;
        if pattern.is_empty() || pattern.len() > width || width % pattern.len() != 0 {
            return Err(CodecError::encode(
                def.label(),
                format!(
                    "fill pattern of {} bits does not evenly fill {} bits",
                    pattern.len(),
                    width
                ),
            ));
        }
        Ok(pattern.repeat(width / pattern.len()))
    }

    fn parse_from_bit_string(&self, def: &ArgumentDefinition, cursor: &mut BitCursor) -> Result<String> {
        read_field(cursor, def, def.bit_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::ArgumentType;

    fn fill_def(bits: usize) -> ArgumentDefinition {
        ArgumentDefinition::new("SPARE", ArgumentType::Fill, bits)
    }

    #[test]
    fn test_fill_repeats_pattern() {
        assert_eq!(FillTranslator.to_bit_string(&fill_def(8), "01").unwrap(), "01010101");
        assert_eq!(FillTranslator.to_bit_string(&fill_def(8), "0").unwrap(), "00000000");
        assert_eq!(FillTranslator.to_bit_string(&fill_def(16), "0xA5").unwrap(), "1010010110100101");
        assert_eq!(FillTranslator.to_bit_string(&fill_def(8), "0b1100").unwrap(), "11001100");
        assert_eq!(FillTranslator.to_bit_string(&fill_def(8), "F").unwrap(), "11111111");
    }

    #[test]
    fn test_fill_rejects_uneven_patterns() {
        assert!(FillTranslator.to_bit_string(&fill_def(8), "111").is_err());
        assert!(FillTranslator.to_bit_string(&fill_def(8), "0x1FF").is_err());
        assert!(FillTranslator.to_bit_string(&fill_def(8), "").is_err());
        assert!(FillTranslator.to_bit_string(&fill_def(8), "0x").is_err());
        assert!(FillTranslator.to_bit_string(&fill_def(8), "xyz").is_err());
    }

    #[test]
    fn test_fill_rejects_multibyte_text() {
        for text in ["aé", "0é", "0xé", "é"] {
            let err = FillTranslator.to_bit_string(&fill_def(8), text).unwrap_err();
            assert!(matches!(err, CodecError::Encode { .. }), "{}", text);
        }
    }

    #[test]
    fn test_fill_decode_is_verbatim() {
        let mut cursor = BitCursor::new("10011").unwrap();
        assert_eq!(
            FillTranslator.parse_from_bit_string(&fill_def(4), &mut cursor).unwrap(),
            "1001"
        );
        assert_eq!(cursor.available(), 1);
    }
}
