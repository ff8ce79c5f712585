//! Per-type argument translators
//!
//! Every argument kind has a translator turning its textual value into a bit
//! string and back. The dispatcher picks one through [`Translator`], a tagged
//! union with one variant per kind.

pub mod enumerated;
pub mod fill;
pub mod numeric;
pub mod repeat;
pub mod string;
pub mod time;

pub use enumerated::{BitmaskTranslator, EnumeratedTranslator};
pub use fill::FillTranslator;
pub use numeric::{FloatTranslator, IntegerTranslator};
pub use repeat::RepeatTranslator;
pub use string::{FixedStringTranslator, VarStringTranslator};
pub use time::{FloatTimeTranslator, TimeTranslator};

use crate::bits::BitCursor;
use crate::definition::ArgumentDefinition;
use crate::error::{CodecError, Result};

/// Converts one argument kind between text and bits
pub trait ArgumentTranslator {
    /// Encode a textual value into the argument's bit string
    fn to_bit_string(&self, def: &ArgumentDefinition, value: &str) -> Result<String>;

    /// Consume the argument's bits from `cursor` and render them as text
    fn parse_from_bit_string(&self, def: &ArgumentDefinition, cursor: &mut BitCursor) -> Result<String>;
}

/// Translator selected for a definition
pub enum Translator<'a> {
    Integer(IntegerTranslator),
    Float(FloatTranslator),
    Enumerated(EnumeratedTranslator),
    Bitmask(BitmaskTranslator),
    FixedString(FixedStringTranslator),
    VarString(VarStringTranslator),
    Time(TimeTranslator<'a>),
    FloatTime(FloatTimeTranslator<'a>),
    Fill(FillTranslator),
    Repeat(RepeatTranslator<'a>),
}

impl ArgumentTranslator for Translator<'_> {
    fn to_bit_string(&self, def: &ArgumentDefinition, value: &str) -> Result<String> {
        match self {
            Translator::Integer(t) => t.to_bit_string(def, value),
            Translator::Float(t) => t.to_bit_string(def, value),
            Translator::Enumerated(t) => t.to_bit_string(def, value),
            Translator::Bitmask(t) => t.to_bit_string(def, value),
            Translator::FixedString(t) => t.to_bit_string(def, value),
            Translator::VarString(t) => t.to_bit_string(def, value),
            Translator::Time(t) => t.to_bit_string(def, value),
            Translator::FloatTime(t) => t.to_bit_string(def, value),
            Translator::Fill(t) => t.to_bit_string(def, value),
            Translator::Repeat(t) => t.to_bit_string(def, value),
        }
    }

    fn parse_from_bit_string(&self, def: &ArgumentDefinition, cursor: &mut BitCursor) -> Result<String> {
        match self {
            Translator::Integer(t) => t.parse_from_bit_string(def, cursor),
            Translator::Float(t) => t.parse_from_bit_string(def, cursor),
            Translator::Enumerated(t) => t.parse_from_bit_string(def, cursor),
            Translator::Bitmask(t) => t.parse_from_bit_string(def, cursor),
            Translator::FixedString(t) => t.parse_from_bit_string(def, cursor),
            Translator::VarString(t) => t.parse_from_bit_string(def, cursor),
            Translator::Time(t) => t.parse_from_bit_string(def, cursor),
            Translator::FloatTime(t) => t.parse_from_bit_string(def, cursor),
            Translator::Fill(t) => t.parse_from_bit_string(def, cursor),
            Translator::Repeat(t) => t.parse_from_bit_string(def, cursor),
        }
    }
}

/// Read `n` bits, attributing a short cursor to the argument
pub(crate) fn read_field(cursor: &mut BitCursor, def: &ArgumentDefinition, n: usize) -> Result<String> {
    cursor
        .read(n)
        .map(str::to_string)
        .map_err(|e| CodecError::decode(def.label(), e.to_string()))
}

/// Reject an empty textual value
pub(crate) fn require_value<'v>(def: &ArgumentDefinition, value: &'v str) -> Result<&'v str> {
    if value.trim().is_empty() {
        return Err(CodecError::encode(def.label(), "value is empty"));
    }
    Ok(value)
}
