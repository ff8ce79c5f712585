//! Dispatcher selecting a translator per argument type

use crate::bits::BitCursor;
use crate::definition::{ArgumentDefinition, ArgumentType, BitValueFormat};
use crate::error::{CodecError, Result};
use crate::sclk::{SclkFormat, TimeCorrelation};
use crate::translators::{
    ArgumentTranslator, BitmaskTranslator, EnumeratedTranslator, FillTranslator, FixedStringTranslator,
    FloatTimeTranslator, FloatTranslator, IntegerTranslator, RepeatTranslator, TimeTranslator, Translator,
    VarStringTranslator,
};
use crate::validate::DefinitionValidator;
use std::sync::Arc;

/// Encodes and decodes command arguments
///
/// The codec only holds configuration: the enumeration bit-value format, the
/// spacecraft id and clock layout used by time arguments, and an optional
/// time correlation for calendar-time input.
pub struct ArgumentCodec {
    bit_value_format: BitValueFormat,
    spacecraft_id: u32,
    sclk_format: SclkFormat,
    correlation: Option<Arc<dyn TimeCorrelation>>,
}

impl ArgumentCodec {
    /// Create a codec with default configuration
    pub fn new() -> Self {
        ArgumentCodec {
            bit_value_format: BitValueFormat::default(),
            spacecraft_id: 0,
            sclk_format: SclkFormat::default(),
            correlation: None,
        }
    }

    pub fn builder() -> CodecBuilder {
        CodecBuilder::new()
    }

    pub fn bit_value_format(&self) -> BitValueFormat {
        self.bit_value_format
    }

    pub fn spacecraft_id(&self) -> u32 {
        self.spacecraft_id
    }

    pub fn sclk_format(&self) -> &SclkFormat {
        &self.sclk_format
    }

    /// Encode a textual value into the argument's bit string
    pub fn encode(&self, def: &ArgumentDefinition, value: &str) -> Result<String> {
        DefinitionValidator::validate(def, &self.sclk_format)?;
        tracing::debug!("Encoding {} ({}) from {:?}", def.label(), def.arg_type, value);
        let bits = self.encode_unchecked(def, value)?;
        tracing::trace!("Encoded {} as {}", def.label(), bits);
        Ok(bits)
    }

    /// Decode the argument's bits from `cursor` into text
    pub fn decode(&self, def: &ArgumentDefinition, cursor: &mut BitCursor) -> Result<String> {
        DefinitionValidator::validate(def, &self.sclk_format)?;
        tracing::debug!(
            "Decoding {} ({}) at bit {}",
            def.label(),
            def.arg_type,
            cursor.position()
        );
        self.decode_unchecked(def, cursor)
    }

    /// Decode a complete bit string, which must hold exactly one argument
    pub fn decode_bits(&self, def: &ArgumentDefinition, bits: &str) -> Result<String> {
        let mut cursor = BitCursor::new(bits)?;
        let value = self.decode(def, &mut cursor)?;
        if !cursor.is_exhausted() {
            return Err(CodecError::decode(
                def.label(),
                format!("{} unconsumed bits", cursor.available()),
            ));
        }
        Ok(value)
    }

    pub(crate) fn encode_unchecked(&self, def: &ArgumentDefinition, value: &str) -> Result<String> {
        let bits = self.translator_for(def)?.to_bit_string(def, value)?;
        debug_assert!(
            def.arg_type.is_variable_length() || bits.len() == def.bit_length,
            "{} encoded to {} bits, expected {}",
            def.label(),
            bits.len(),
            def.bit_length
        );
        Ok(bits)
    }

    pub(crate) fn decode_unchecked(&self, def: &ArgumentDefinition, cursor: &mut BitCursor) -> Result<String> {
        self.translator_for(def)?.parse_from_bit_string(def, cursor)
    }

    /// Select the translator for a definition's type
    pub fn translator_for(&self, def: &ArgumentDefinition) -> Result<Translator<'_>> {
        let translator = match def.arg_type {
            ArgumentType::Integer => Translator::Integer(IntegerTranslator::signed()),
            ArgumentType::Unsigned => Translator::Integer(IntegerTranslator::unsigned()),
            ArgumentType::Float => Translator::Float(FloatTranslator),
            ArgumentType::SignedEnum | ArgumentType::UnsignedEnum | ArgumentType::Boolean => {
                Translator::Enumerated(EnumeratedTranslator::new(self.bit_value_format))
            }
            ArgumentType::Bitmask => Translator::Bitmask(BitmaskTranslator),
            ArgumentType::FixedString => Translator::FixedString(FixedStringTranslator),
            ArgumentType::VarString => Translator::VarString(VarStringTranslator),
            ArgumentType::Time => Translator::Time(self.time_translator(def)),
            ArgumentType::FloatTime => Translator::FloatTime(FloatTimeTranslator::new(self.time_translator(def))),
            ArgumentType::Fill => Translator::Fill(FillTranslator),
            ArgumentType::Repeat => Translator::Repeat(RepeatTranslator::new(self)),
            ArgumentType::Undefined => {
                return Err(CodecError::configuration(format!(
                    "argument {} has an undefined type",
                    def.label()
                )))
            }
        };
        Ok(translator)
    }

    fn time_translator(&self, def: &ArgumentDefinition) -> TimeTranslator<'_> {
        TimeTranslator::new(
            def.spacecraft_id.unwrap_or(self.spacecraft_id),
            self.sclk_format,
            self.correlation.as_deref(),
        )
    }
}

impl Default for ArgumentCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for an [`ArgumentCodec`]
pub struct CodecBuilder {
    bit_value_format: BitValueFormat,
    spacecraft_id: u32,
    sclk_format: SclkFormat,
    correlation: Option<Arc<dyn TimeCorrelation>>,
}

impl CodecBuilder {
    pub fn new() -> Self {
        CodecBuilder {
            bit_value_format: BitValueFormat::default(),
            spacecraft_id: 0,
            sclk_format: SclkFormat::default(),
            correlation: None,
        }
    }

    /// Set how enumeration bit values are matched on decode
    pub fn with_bit_value_format(mut self, format: BitValueFormat) -> Self {
        self.bit_value_format = format;
        self
    }

    /// Set the default spacecraft id for time arguments
    pub fn with_spacecraft_id(mut self, scid: u32) -> Self {
        self.spacecraft_id = scid;
        self
    }

    /// Set the mission's spacecraft clock layout
    pub fn with_sclk_format(mut self, format: SclkFormat) -> Self {
        self.sclk_format = format;
        self
    }

    /// Set the correlation used for calendar-time input
    pub fn with_time_correlation(mut self, correlation: Arc<dyn TimeCorrelation>) -> Self {
        self.correlation = Some(correlation);
        self
    }

    /// Build the codec, rejecting an unusable clock layout
    pub fn build(self) -> Result<ArgumentCodec> {
        if !self.sclk_format.is_valid() {
            return Err(CodecError::configuration(format!(
                "invalid SCLK layout {:?}",
                self.sclk_format
            )));
        }
        Ok(ArgumentCodec {
            bit_value_format: self.bit_value_format,
            spacecraft_id: self.spacecraft_id,
            sclk_format: self.sclk_format,
            correlation: self.correlation,
        })
    }
}

impl Default for CodecBuilder {
    fn default() -> Self {
        Self::new()
    }
}
