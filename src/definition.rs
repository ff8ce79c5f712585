//! Dictionary argument definitions consumed by the codec

use crate::bits::{parse_numeric_literal, strip_prefix_ci};
use crate::error::{CodecError, Result};
use std::str::FromStr;

/// Argument kind as declared in the command dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArgumentType {
    /// Signed two's-complement integer
    Integer,
    /// Unsigned integer
    Unsigned,
    /// IEEE-754 single or double
    Float,
    /// Spacecraft clock carried as an IEEE-754 double
    FloatTime,
    /// Spacecraft clock carried as coarse/fine bytes
    Time,
    /// Enumeration with signed bit values
    SignedEnum,
    /// Enumeration with unsigned bit values
    UnsignedEnum,
    /// Single-bit enumeration, FALSE/TRUE unless a table is given
    Boolean,
    /// ASCII string padded to a fixed width
    FixedString,
    /// ASCII string preceded by a byte-length prefix
    VarString,
    /// Don't-care bits filled with a repeating pattern
    Fill,
    /// Count field followed by repeated sub-argument groups
    Repeat,
    /// OR of named flag bits
    Bitmask,
    /// Type the dictionary could not resolve
    Undefined,
}

impl ArgumentType {
    /// Types translated by the shared enumeration translator
    pub fn is_enumerated(&self) -> bool {
        matches!(
            self,
            ArgumentType::SignedEnum | ArgumentType::UnsignedEnum | ArgumentType::Boolean
        )
    }

    /// Types whose encoded length is carried in-band
    pub fn is_variable_length(&self) -> bool {
        matches!(self, ArgumentType::VarString | ArgumentType::Repeat)
    }
}

impl std::fmt::Display for ArgumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ArgumentType::Integer => "INTEGER",
            ArgumentType::Unsigned => "UNSIGNED",
            ArgumentType::Float => "FLOAT",
            ArgumentType::FloatTime => "FLOAT_TIME",
            ArgumentType::Time => "TIME",
            ArgumentType::SignedEnum => "SIGNED_ENUMERATION",
            ArgumentType::UnsignedEnum => "UNSIGNED_ENUMERATION",
            ArgumentType::Boolean => "BOOLEAN",
            ArgumentType::FixedString => "FIXED_STRING",
            ArgumentType::VarString => "VAR_STRING",
            ArgumentType::Fill => "FILL",
            ArgumentType::Repeat => "REPEAT",
            ArgumentType::Bitmask => "BITMASK",
            ArgumentType::Undefined => "UNDEFINED",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ArgumentType {
    type Err = CodecError;

    /// Parse a dictionary type name; unknown names are configuration errors
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "INTEGER" | "SIGNED_INTEGER" => Ok(ArgumentType::Integer),
            "UNSIGNED" | "UNSIGNED_INTEGER" => Ok(ArgumentType::Unsigned),
            "FLOAT" | "FLOATING_POINT" => Ok(ArgumentType::Float),
            "FLOAT_TIME" => Ok(ArgumentType::FloatTime),
            "TIME" => Ok(ArgumentType::Time),
            "SIGNED_ENUMERATION" | "SIGNED_ENUM" => Ok(ArgumentType::SignedEnum),
            "UNSIGNED_ENUMERATION" | "UNSIGNED_ENUM" | "ENUMERATION" => {
                Ok(ArgumentType::UnsignedEnum)
            }
            "BOOLEAN" | "BOOL" => Ok(ArgumentType::Boolean),
            "FIXED_STRING" => Ok(ArgumentType::FixedString),
            "VAR_STRING" | "VARIABLE_STRING" => Ok(ArgumentType::VarString),
            "FILL" | "FILLER" => Ok(ArgumentType::Fill),
            "REPEAT" => Ok(ArgumentType::Repeat),
            "BITMASK" => Ok(ArgumentType::Bitmask),
            "UNDEFINED" => Ok(ArgumentType::Undefined),
            _ => Err(CodecError::configuration(format!(
                "Unrecognized argument type: {}",
                s
            ))),
        }
    }
}

/// How enumeration bit values are written in the dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BitValueFormat {
    Decimal,
    Binary,
    Hex,
    /// Try decimal, then binary, then hex
    #[default]
    Unspecified,
}

/// One row of an enumeration table
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumValue {
    /// Value shown to operators
    pub dictionary_value: String,
    /// Value known to flight software
    pub fsw_value: String,
    /// Bit pattern as binary (`0b`), decimal or hex (`0x`) text
    pub bit_value: String,
}

impl EnumValue {
    /// Create an enum value whose FSW name equals its dictionary name
    pub fn new(dictionary_value: impl Into<String>, bit_value: impl Into<String>) -> Self {
        let dictionary_value = dictionary_value.into();
        EnumValue {
            fsw_value: dictionary_value.clone(),
            dictionary_value,
            bit_value: bit_value.into(),
        }
    }

    /// Set a distinct flight software value
    pub fn with_fsw_value(mut self, fsw_value: impl Into<String>) -> Self {
        self.fsw_value = fsw_value.into();
        self
    }

    /// Numeric value of the bit pattern, whatever notation it is written in
    pub fn numeric_value(&self) -> Option<i128> {
        parse_numeric_literal(&self.bit_value)
    }

    /// Read the bit value strictly as decimal text
    pub fn decimal_value(&self) -> Option<i128> {
        let text = self.bit_value.trim();
        let digits = text.strip_prefix('-').unwrap_or(text);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        text.parse::<i128>().ok()
    }

    /// Read the bit value as binary digits, with or without `0b`
    pub fn binary_value(&self) -> Option<u64> {
        let text = self.bit_value.trim();
        let digits = strip_prefix_ci(text, "0b").unwrap_or(text);
        if digits.is_empty() || !digits.bytes().all(|b| b == b'0' || b == b'1') {
            return None;
        }
        u64::from_str_radix(digits, 2).ok()
    }

    /// Read the bit value as hex digits, with or without `0x`
    pub fn hex_value(&self) -> Option<u64> {
        let text = self.bit_value.trim();
        let digits = strip_prefix_ci(text, "0x").unwrap_or(text);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        u64::from_str_radix(digits, 16).ok()
    }
}

/// Ordered enumeration table
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Enumeration {
    pub values: Vec<EnumValue>,
}

impl Enumeration {
    pub fn new(values: Vec<EnumValue>) -> Self {
        Enumeration { values }
    }

    /// Table used for booleans the dictionary leaves without one
    pub fn implicit_boolean() -> Self {
        Enumeration::new(vec![EnumValue::new("FALSE", "0"), EnumValue::new("TRUE", "1")])
    }

    pub fn by_dictionary_value(&self, text: &str) -> Option<&EnumValue> {
        self.values
            .iter()
            .find(|v| v.dictionary_value.eq_ignore_ascii_case(text))
    }

    pub fn by_fsw_value(&self, text: &str) -> Option<&EnumValue> {
        self.values
            .iter()
            .find(|v| v.fsw_value.eq_ignore_ascii_case(text))
    }

    pub fn by_bit_value(&self, text: &str) -> Option<&EnumValue> {
        self.values
            .iter()
            .find(|v| v.bit_value.eq_ignore_ascii_case(text))
    }

    /// Lookup order used when encoding: dictionary, bit, then FSW value
    pub fn lookup(&self, text: &str) -> Option<&EnumValue> {
        self.by_dictionary_value(text)
            .or_else(|| self.by_bit_value(text))
            .or_else(|| self.by_fsw_value(text))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A single command argument as described by the command dictionary
///
/// Definitions are built once by the dictionary loader and only read by the
/// codec. Repeat arguments hold their sub-argument group in `sub_arguments`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArgumentDefinition {
    pub dictionary_name: String,
    pub fsw_name: Option<String>,
    pub arg_type: ArgumentType,
    /// Field width; count width for repeats
    ///
    /// For variable strings this is an upper bound on the body, not an exact
    /// width: a non-zero value caps the encoded body bits, 0 means unbounded.
    /// The length prefix is not counted.
    pub bit_length: usize,
    /// Length prefix width for variable strings
    pub prefix_bit_length: Option<usize>,
    pub enumeration: Option<Enumeration>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sub_arguments: Vec<ArgumentDefinition>,
    /// Overrides the codec's spacecraft id for time arguments
    pub spacecraft_id: Option<u32>,
}

impl ArgumentDefinition {
    /// Create a definition with no optional attributes
    pub fn new(dictionary_name: impl Into<String>, arg_type: ArgumentType, bit_length: usize) -> Self {
        ArgumentDefinition {
            dictionary_name: dictionary_name.into(),
            fsw_name: None,
            arg_type,
            bit_length,
            prefix_bit_length: None,
            enumeration: None,
            sub_arguments: Vec::new(),
            spacecraft_id: None,
        }
    }

    pub fn with_fsw_name(mut self, fsw_name: impl Into<String>) -> Self {
        self.fsw_name = Some(fsw_name.into());
        self
    }

    pub fn with_prefix_bit_length(mut self, prefix_bit_length: usize) -> Self {
        self.prefix_bit_length = Some(prefix_bit_length);
        self
    }

    pub fn with_enumeration(mut self, enumeration: Enumeration) -> Self {
        self.enumeration = Some(enumeration);
        self
    }

    pub fn with_sub_arguments(mut self, sub_arguments: Vec<ArgumentDefinition>) -> Self {
        self.sub_arguments = sub_arguments;
        self
    }

    pub fn with_spacecraft_id(mut self, scid: u32) -> Self {
        self.spacecraft_id = Some(scid);
        self
    }

    /// Name used to attribute errors: dictionary name plus FSW name if known
    pub fn label(&self) -> String {
        match &self.fsw_name {
            Some(fsw) if fsw != &self.dictionary_name => {
                format!("{} (FSW {})", self.dictionary_name, fsw)
            }
            _ => self.dictionary_name.clone(),
        }
    }
}
