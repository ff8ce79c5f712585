//! Whole-command encoding: opcode followed by arguments in dictionary order

use crate::bits::{pattern_value, BitCursor};
use crate::codec::ArgumentCodec;
use crate::definition::ArgumentDefinition;
use crate::error::{CodecError, Result};
use crate::translators::numeric::render_integer;

/// A command as described by the dictionary
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandDefinition {
    /// Command mnemonic
    pub stem: String,
    pub opcode: u64,
    /// Width of the opcode field (1-64 bits)
    pub opcode_bit_length: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub arguments: Vec<ArgumentDefinition>,
}

impl CommandDefinition {
    /// Create a command definition, checking the opcode fits its field
    pub fn new(stem: impl Into<String>, opcode: u64, opcode_bit_length: usize) -> Result<Self> {
        let stem = stem.into();
        if opcode_bit_length == 0 || opcode_bit_length > 64 {
            return Err(CodecError::configuration(format!(
                "command {} opcode width {} out of range [1, 64]",
                stem, opcode_bit_length
            )));
        }
        if opcode_bit_length < 64 && opcode >= 1u64 << opcode_bit_length {
            return Err(CodecError::configuration(format!(
                "command {} opcode {:#x} exceeds {} bits",
                stem, opcode, opcode_bit_length
            )));
        }
        Ok(CommandDefinition {
            stem,
            opcode,
            opcode_bit_length,
            arguments: Vec::new(),
        })
    }

    pub fn with_argument(mut self, argument: ArgumentDefinition) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn argument_count(&self) -> usize {
        self.arguments.len()
    }
}

/// A command recovered from its bits
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodedCommand {
    pub stem: String,
    pub opcode: u64,
    /// Argument values in dictionary order
    pub values: Vec<String>,
}

impl ArgumentCodec {
    /// Encode a command's opcode and argument values into one bit string
    pub fn encode_command<S: AsRef<str>>(&self, def: &CommandDefinition, values: &[S]) -> Result<String> {
        if values.len() != def.arguments.len() {
            return Err(CodecError::encode(
                def.stem.as_str(),
                format!(
                    "expected {} argument values, got {}",
                    def.arguments.len(),
                    values.len()
                ),
            ));
        }
        tracing::debug!("Encoding command {} with {} arguments", def.stem, values.len());

        let mut bits = render_integer(def.opcode as i128, def.opcode_bit_length, false);
        for (arg, value) in def.arguments.iter().zip(values) {
            bits.push_str(&self.encode(arg, value.as_ref())?);
        }
        Ok(bits)
    }

    /// Decode a command's opcode and arguments from `cursor`
    pub fn decode_command(&self, def: &CommandDefinition, cursor: &mut BitCursor) -> Result<DecodedCommand> {
        tracing::debug!("Decoding command {} at bit {}", def.stem, cursor.position());
        let opcode_bits = cursor
            .read(def.opcode_bit_length)
            .map_err(|e| CodecError::decode(def.stem.as_str(), e.to_string()))?;
        let opcode = pattern_value(opcode_bits);
        if opcode != def.opcode {
            return Err(CodecError::decode(
                def.stem.as_str(),
                format!("opcode {:#x} does not match expected {:#x}", opcode, def.opcode),
            ));
        }

        let values = def
            .arguments
            .iter()
            .map(|arg| self.decode(arg, cursor))
            .collect::<Result<Vec<_>>>()?;

        Ok(DecodedCommand {
            stem: def.stem.clone(),
            opcode,
            values,
        })
    }
}
