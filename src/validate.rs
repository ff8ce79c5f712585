//! Definition checks run before any translation
//!
//! Every failure here is a configuration error: the dictionary produced an
//! argument the codec cannot translate, and the command build must stop.

use crate::consts;
use crate::definition::{ArgumentDefinition, ArgumentType};
use crate::error::{CodecError, Result};
use crate::sclk::SclkFormat;

/// Validator for argument definitions
pub struct DefinitionValidator;

impl DefinitionValidator {
    /// Validate a definition and, for repeats, all of its sub-arguments
    pub fn validate(def: &ArgumentDefinition, sclk: &SclkFormat) -> Result<()> {
        Self::validate_bit_length(def, sclk)?;

        match def.arg_type {
            ArgumentType::Undefined => Err(Self::invalid(def, "argument type is undefined")),
            ArgumentType::VarString => Self::validate_prefix(def),
            ArgumentType::SignedEnum | ArgumentType::UnsignedEnum | ArgumentType::Bitmask => {
                Self::validate_enumeration(def)
            }
            ArgumentType::Repeat => {
                if def.sub_arguments.is_empty() {
                    return Err(Self::invalid(def, "repeat argument has no sub-arguments"));
                }
                def.sub_arguments
                    .iter()
                    .try_for_each(|sub| Self::validate(sub, sclk))
            }
            _ => Ok(()),
        }
    }

    /// Check the field width against what the argument type supports
    pub fn validate_bit_length(def: &ArgumentDefinition, sclk: &SclkFormat) -> Result<()> {
        let bits = def.bit_length;
        if bits == 0 && def.arg_type != ArgumentType::VarString && def.arg_type != ArgumentType::Undefined {
            return Err(Self::invalid(def, "bit length is zero"));
        }
        match def.arg_type {
            ArgumentType::Float if !consts::FLOAT_BIT_LENGTHS.contains(&bits) => {
                Err(Self::invalid(def, format!("float bit length {} is not 32 or 64", bits)))
            }
            ArgumentType::FloatTime if bits != consts::FLOAT_TIME_BIT_LENGTH => {
                Err(Self::invalid(def, format!("float time bit length {} is not 64", bits)))
            }
            ArgumentType::Time if !sclk.supports(bits) => Err(Self::invalid(
                def,
                format!(
                    "time bit length {} is neither {} nor {}",
                    bits,
                    sclk.coarse_bits,
                    sclk.total_bits()
                ),
            )),
            ArgumentType::FixedString if bits % 8 != 0 => Err(Self::invalid(
                def,
                format!("fixed string bit length {} is not a whole number of bytes", bits),
            )),
            _ => Ok(()),
        }
    }

    /// Variable strings need an 8, 16 or 32 bit length prefix
    pub fn validate_prefix(def: &ArgumentDefinition) -> Result<()> {
        match def.prefix_bit_length {
            Some(p) if consts::VAR_STRING_PREFIX_LENGTHS.contains(&p) => Ok(()),
            other => Err(Self::invalid(
                def,
                format!("prefix bit length {:?} is not 8, 16 or 32", other),
            )),
        }
    }

    /// Enumerations and bitmasks need a non-empty table
    pub fn validate_enumeration(def: &ArgumentDefinition) -> Result<()> {
        match &def.enumeration {
            Some(table) if !table.is_empty() => Ok(()),
            _ => Err(Self::invalid(def, "enumeration table is missing or empty")),
        }
    }

    fn invalid(def: &ArgumentDefinition, msg: impl std::fmt::Display) -> CodecError {
        CodecError::configuration(format!("{} ({}): {}", def.label(), def.arg_type, msg))
    }
}
