//! Enumerated, boolean and bitmask translators

use super::numeric::render_integer;
use super::{read_field, require_value, ArgumentTranslator};
use crate::bits::{extend_to_64, fit_to_width, parse_numeric_literal, pattern_value, BitCursor};
use crate::consts;
use crate::definition::{ArgumentDefinition, ArgumentType, BitValueFormat, EnumValue, Enumeration};
use crate::error::{CodecError, Result};
use std::borrow::Cow;

fn enumeration_of(def: &ArgumentDefinition) -> Option<Cow<'_, Enumeration>> {
    match &def.enumeration {
        Some(table) => Some(Cow::Borrowed(table)),
        None if def.arg_type == ArgumentType::Boolean => Some(Cow::Owned(Enumeration::implicit_boolean())),
        None => None,
    }
}

fn bit_value_of(def: &ArgumentDefinition, entry: &EnumValue) -> Result<i128> {
    entry.numeric_value().ok_or_else(|| {
        CodecError::encode(
            def.label(),
            format!(
                "bit value {:?} of {} is not numeric",
                entry.bit_value, entry.dictionary_value
            ),
        )
    })
}

/// Translator shared by signed enums, unsigned enums and booleans
///
/// The bit-value format decides how the table's bit values are read when
/// matching decoded bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnumeratedTranslator {
    format: BitValueFormat,
}

impl EnumeratedTranslator {
    pub fn new(format: BitValueFormat) -> Self {
        EnumeratedTranslator { format }
    }

    pub fn format(&self) -> BitValueFormat {
        self.format
    }

    fn find<'t>(
        table: &'t Enumeration,
        format: BitValueFormat,
        raw: u64,
        decimal: i128,
    ) -> Option<&'t EnumValue> {
        match format {
            BitValueFormat::Decimal => table.values.iter().find(|v| v.decimal_value() == Some(decimal)),
            BitValueFormat::Binary => table.values.iter().find(|v| v.binary_value() == Some(raw)),
            BitValueFormat::Hex => table.values.iter().find(|v| v.hex_value() == Some(raw)),
            BitValueFormat::Unspecified => [BitValueFormat::Decimal, BitValueFormat::Binary, BitValueFormat::Hex]
                .into_iter()
                .find_map(|f| Self::find(table, f, raw, decimal)),
        }
    }
}

impl ArgumentTranslator for EnumeratedTranslator {
    fn to_bit_string(&self, def: &ArgumentDefinition, value: &str) -> Result<String> {
        let text = require_value(def, value)?.trim();
        let table = enumeration_of(def)
            .ok_or_else(|| CodecError::encode(def.label(), "no enumeration table"))?;

        let numeric = match table.lookup(text) {
            Some(entry) => bit_value_of(def, entry)?,
            None => parse_numeric_literal(text).ok_or_else(|| {
                CodecError::encode(
                    def.label(),
                    format!("{:?} is neither an enumeration value nor a numeric literal", text),
                )
            })?,
        };

        let signed = def.arg_type == ArgumentType::SignedEnum;
        Ok(render_integer(numeric, def.bit_length, signed))
    }

    fn parse_from_bit_string(&self, def: &ArgumentDefinition, cursor: &mut BitCursor) -> Result<String> {
        let bits = read_field(cursor, def, def.bit_length)?;
        let raw = pattern_value(&extend_to_64(&bits, false));
        let decimal = if def.arg_type == ArgumentType::SignedEnum {
            raw as i64 as i128
        } else {
            raw as i128
        };

        let matched = enumeration_of(def)
            .and_then(|table| Self::find(&table, self.format, raw, decimal).map(|v| v.dictionary_value.clone()));

        match matched {
            Some(name) => Ok(name),
            None => {
                tracing::warn!(
                    "No enumeration value of {} matches bits {}, using literal",
                    def.label(),
                    bits
                );
                Ok(format!("0x{:X}", raw))
            }
        }
    }
}

/// Translator for `|`-separated flag names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BitmaskTranslator;

impl ArgumentTranslator for BitmaskTranslator {
    fn to_bit_string(&self, def: &ArgumentDefinition, value: &str) -> Result<String> {
        let value = require_value(def, value)?;
        let table = def
            .enumeration
            .as_ref()
            .ok_or_else(|| CodecError::encode(def.label(), "no enumeration table"))?;

        let mut mask = 0u64;
        for token in value.split(consts::BITMASK_SEPARATOR).map(str::trim) {
            if token.is_empty() {
                continue;
            }
            match table.by_dictionary_value(token).or_else(|| table.by_fsw_value(token)) {
                Some(entry) => mask |= bit_value_of(def, entry)? as i64 as u64,
                None => tracing::trace!("Bitmask {} ignores unknown flag {}", def.label(), token),
            }
        }

        Ok(fit_to_width(&format!("{:b}", mask), def.bit_length, '0'))
    }

    fn parse_from_bit_string(&self, def: &ArgumentDefinition, cursor: &mut BitCursor) -> Result<String> {
        let bits = read_field(cursor, def, def.bit_length)?;
        let raw = pattern_value(&extend_to_64(&bits, true));
        Ok((raw as i64).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode_def(arg_type: ArgumentType) -> ArgumentDefinition {
        ArgumentDefinition::new("MODE", arg_type, 8).with_enumeration(Enumeration::new(vec![
            EnumValue::new("SAFE", "0").with_fsw_value("MODE_SAFE"),
            EnumValue::new("NOMINAL", "1").with_fsw_value("MODE_NOM"),
            EnumValue::new("SCIENCE", "0x10").with_fsw_value("MODE_SCI"),
        ]))
    }

    fn decode(t: &impl ArgumentTranslator, def: &ArgumentDefinition, bits: &str) -> String {
        let mut cursor = BitCursor::new(bits).unwrap();
        t.parse_from_bit_string(def, &mut cursor).unwrap()
    }

    #[test]
    fn test_enum_encode_lookup_order() {
        let t = EnumeratedTranslator::default();
        let def = mode_def(ArgumentType::UnsignedEnum);
        assert_eq!(t.to_bit_string(&def, "NOMINAL").unwrap(), "00000001");
        assert_eq!(t.to_bit_string(&def, "science").unwrap(), "00010000");
        assert_eq!(t.to_bit_string(&def, "0x10").unwrap(), "00010000");
        assert_eq!(t.to_bit_string(&def, "MODE_SAFE").unwrap(), "00000000");
        // Not in the table: taken as a literal bit value
        assert_eq!(t.to_bit_string(&def, "7").unwrap(), "00000111");
        assert!(t.to_bit_string(&def, "WARP").is_err());
    }

    #[test]
    fn test_signed_enum_pads_negative_literals() {
        let t = EnumeratedTranslator::default();
        let def = mode_def(ArgumentType::SignedEnum);
        assert_eq!(t.to_bit_string(&def, "-1").unwrap(), "11111111");
    }

    fn offset_def(bits: usize) -> ArgumentDefinition {
        ArgumentDefinition::new("OFFSET", ArgumentType::SignedEnum, bits).with_enumeration(Enumeration::new(vec![
            EnumValue::new("BACK", "-1"),
            EnumValue::new("HOLD", "0"),
            EnumValue::new("AHEAD", "1"),
        ]))
    }

    #[test]
    fn test_signed_enum_decode_full_width() {
        let def = offset_def(64);
        for format in [BitValueFormat::Unspecified, BitValueFormat::Decimal] {
            let t = EnumeratedTranslator::new(format);
            assert_eq!(decode(&t, &def, &"1".repeat(64)), "BACK");
            assert_eq!(decode(&t, &def, &format!("{:064b}", 1)), "AHEAD");
        }

        let t = EnumeratedTranslator::default();
        assert_eq!(t.to_bit_string(&def, "BACK").unwrap(), "1".repeat(64));
    }

    #[test]
    fn test_signed_enum_hex_fallback() {
        let t = EnumeratedTranslator::default();
        let def = offset_def(8);
        // Narrow fields are matched zero-extended, so "-1" only matches at 64 bits
        assert_eq!(decode(&t, &def, "11111111"), "0xFF");

        let bits = t.to_bit_string(&def, "-3").unwrap();
        assert_eq!(bits, "11111101");
        assert_eq!(decode(&t, &def, &bits), "0xFD");
        assert_eq!(t.to_bit_string(&def, "0xFD").unwrap(), bits);

        let wide = offset_def(64);
        let bits = t.to_bit_string(&wide, "-2").unwrap();
        assert_eq!(decode(&t, &wide, &bits), "0xFFFFFFFFFFFFFFFE");
        assert_eq!(t.to_bit_string(&wide, "0xFFFFFFFFFFFFFFFE").unwrap(), bits);
    }

    #[test]
    fn test_enum_decode_by_format() {
        let def = mode_def(ArgumentType::UnsignedEnum);
        let unspecified = EnumeratedTranslator::new(BitValueFormat::Unspecified);
        assert_eq!(decode(&unspecified, &def, "00000001"), "NOMINAL");
        assert_eq!(decode(&unspecified, &def, "00010000"), "SCIENCE");

        // "0x10" is not decimal text, so a decimal-only search misses it
        let decimal = EnumeratedTranslator::new(BitValueFormat::Decimal);
        assert_eq!(decode(&decimal, &def, "00010000"), "0x10");

        let hex = EnumeratedTranslator::new(BitValueFormat::Hex);
        assert_eq!(decode(&hex, &def, "00010000"), "SCIENCE");
    }

    #[test]
    fn test_enum_decode_unknown_is_not_fatal() {
        let t = EnumeratedTranslator::default();
        let def = mode_def(ArgumentType::UnsignedEnum);
        assert_eq!(decode(&t, &def, "11111110"), "0xFE");
        // The synthesized literal encodes back to the same bits
        assert_eq!(t.to_bit_string(&def, "0xFE").unwrap(), "11111110");
    }

    #[test]
    fn test_boolean_without_table() {
        let t = EnumeratedTranslator::default();
        let def = ArgumentDefinition::new("ENABLE", ArgumentType::Boolean, 1);
        assert_eq!(t.to_bit_string(&def, "TRUE").unwrap(), "1");
        assert_eq!(t.to_bit_string(&def, "false").unwrap(), "0");
        assert_eq!(decode(&t, &def, "1"), "TRUE");
        assert_eq!(decode(&t, &def, "0"), "FALSE");
    }

    fn flags_def() -> ArgumentDefinition {
        ArgumentDefinition::new("FLAGS", ArgumentType::Bitmask, 8).with_enumeration(Enumeration::new(vec![
            EnumValue::new("A", "0b01"),
            EnumValue::new("B", "0b10"),
            EnumValue::new("C", "0x80"),
        ]))
    }

    #[test]
    fn test_bitmask_or() {
        let t = BitmaskTranslator;
        assert_eq!(t.to_bit_string(&flags_def(), "A|B").unwrap(), "00000011");
        assert_eq!(t.to_bit_string(&flags_def(), "B | A").unwrap(), "00000011");
        assert_eq!(t.to_bit_string(&flags_def(), "A|UNKNOWN").unwrap(), "00000001");
        assert_eq!(t.to_bit_string(&flags_def(), "NOTHING").unwrap(), "00000000");
    }

    #[test]
    fn test_bitmask_decode_sign_extends() {
        let t = BitmaskTranslator;
        assert_eq!(decode(&t, &flags_def(), "00000011"), "3");
        assert_eq!(decode(&t, &flags_def(), "10000001"), "-127");
    }

    #[test]
    fn test_bitmask_keeps_low_bits() {
        let t = BitmaskTranslator;
        let narrow = ArgumentDefinition::new("FLAGS", ArgumentType::Bitmask, 4)
            .with_enumeration(flags_def().enumeration.unwrap());
        assert_eq!(t.to_bit_string(&narrow, "A|C").unwrap(), "0001");
    }
}
