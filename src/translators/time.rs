//! Spacecraft clock translators
//!
//! [`TimeTranslator`] carries the clock as big-endian coarse (and optionally
//! fine) bytes; [`FloatTimeTranslator`] carries it as an IEEE-754 double of
//! seconds. Both accept native SCLK text or a calendar time, the latter
//! converted through the configured [`TimeCorrelation`].

use super::numeric::render_float;
use super::{read_field, require_value, ArgumentTranslator};
use crate::bits::{from_bytes, pattern_value, to_bytes, BitCursor};
use crate::consts;
use crate::definition::ArgumentDefinition;
use crate::error::{CodecError, Result};
use crate::sclk::{parse_scet, Sclk, SclkFormat, TimeCorrelation};

/// Coarse/fine spacecraft clock translator
#[derive(Clone, Copy)]
pub struct TimeTranslator<'a> {
    scid: u32,
    format: SclkFormat,
    correlation: Option<&'a dyn TimeCorrelation>,
}

impl<'a> TimeTranslator<'a> {
    pub fn new(scid: u32, format: SclkFormat, correlation: Option<&'a dyn TimeCorrelation>) -> Self {
        TimeTranslator {
            scid,
            format,
            correlation,
        }
    }

    pub fn spacecraft_id(&self) -> u32 {
        self.scid
    }

    /// Interpret text as SCLK, falling back to a correlated calendar time
    pub fn text_to_sclk(&self, def: &ArgumentDefinition, value: &str) -> Result<Sclk> {
        let sclk_err = match Sclk::parse(value, &self.format) {
            Ok(sclk) => return Ok(sclk),
            Err(e) => e,
        };

        let scet = parse_scet(value).ok_or_else(|| {
            CodecError::encode(
                def.label(),
                format!("{:?} is neither SCLK nor a calendar time ({})", value, sclk_err),
            )
        })?;
        let correlation = self.correlation.ok_or_else(|| {
            CodecError::encode(
                def.label(),
                "calendar time given but no time correlation is configured",
            )
        })?;
        let sclk = correlation
            .scet_to_sclk(&scet, self.scid, &self.format)
            .map_err(|e| CodecError::encode(def.label(), e.to_string()))?;
        tracing::trace!("{} correlated {} to {:?} for spacecraft {}", def.label(), scet, sclk, self.scid);
        Ok(sclk)
    }
}

impl ArgumentTranslator for TimeTranslator<'_> {
    fn to_bit_string(&self, def: &ArgumentDefinition, value: &str) -> Result<String> {
        let value = require_value(def, value)?;
        if !self.format.supports(def.bit_length) {
            return Err(CodecError::encode(
                def.label(),
                format!("unsupported time bit length {}", def.bit_length),
            ));
        }
        let sclk = self.text_to_sclk(def, value)?;
        let include_fine = def.bit_length == self.format.total_bits();
        Ok(from_bytes(&sclk.to_bytes(&self.format, include_fine)))
    }

    fn parse_from_bit_string(&self, def: &ArgumentDefinition, cursor: &mut BitCursor) -> Result<String> {
        if !self.format.supports(def.bit_length) {
            return Err(CodecError::decode(
                def.label(),
                format!("unsupported time bit length {}", def.bit_length),
            ));
        }
        let bits = read_field(cursor, def, def.bit_length)?;
        let whole = bits.len() - bits.len() % 8;
        let bytes = to_bytes(&bits[..whole])?;
        let sclk = Sclk::from_bytes(&bytes, &self.format)
            .map_err(|e| CodecError::decode(def.label(), e.to_string()))?;
        Ok(sclk.to_text(&self.format))
    }
}

/// Spacecraft clock carried as an IEEE-754 double of seconds
#[derive(Clone, Copy)]
pub struct FloatTimeTranslator<'a> {
    base: TimeTranslator<'a>,
}

impl<'a> FloatTimeTranslator<'a> {
    pub fn new(base: TimeTranslator<'a>) -> Self {
        FloatTimeTranslator { base }
    }
}

impl ArgumentTranslator for FloatTimeTranslator<'_> {
    fn to_bit_string(&self, def: &ArgumentDefinition, value: &str) -> Result<String> {
        let value = require_value(def, value)?;
        if def.bit_length != consts::FLOAT_TIME_BIT_LENGTH {
            return Err(CodecError::encode(
                def.label(),
                format!("unsupported float time bit length {}", def.bit_length),
            ));
        }
        let sclk = self.base.text_to_sclk(def, value)?;
        let seconds = sclk.to_seconds(&self.base.format);
        render_float(seconds, def.bit_length).ok_or_else(|| {
            CodecError::encode(def.label(), format!("unsupported float time bit length {}", def.bit_length))
        })
    }

    fn parse_from_bit_string(&self, def: &ArgumentDefinition, cursor: &mut BitCursor) -> Result<String> {
        if def.bit_length != consts::FLOAT_TIME_BIT_LENGTH {
            return Err(CodecError::decode(
                def.label(),
                format!("unsupported float time bit length {}", def.bit_length),
            ));
        }
        let bits = read_field(cursor, def, def.bit_length)?;
        let seconds = f64::from_bits(pattern_value(&bits));
        let sclk = Sclk::from_seconds(seconds, &self.base.format)
            .map_err(|e| CodecError::decode(def.label(), e.to_string()))?;
        Ok(sclk.to_text(&self.base.format))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::ArgumentType;
    use crate::sclk::FixedEpochCorrelation;
    use chrono::{TimeZone, Utc};

    fn decode(t: &impl ArgumentTranslator, def: &ArgumentDefinition, bits: &str) -> Result<String> {
        let mut cursor = BitCursor::new(bits).unwrap();
        t.parse_from_bit_string(def, &mut cursor)
    }

    #[test]
    fn test_time_full_width() {
        let t = TimeTranslator::new(0, SclkFormat::default(), None);
        let def = ArgumentDefinition::new("START", ArgumentType::Time, 48);
        let bits = t.to_bit_string(&def, "1.00002").unwrap();
        assert_eq!(bits, format!("{:032b}{:016b}", 1, 2));
        assert_eq!(decode(&t, &def, &bits).unwrap(), "1.00002");
    }

    #[test]
    fn test_time_coarse_only() {
        let t = TimeTranslator::new(0, SclkFormat::default(), None);
        let def = ArgumentDefinition::new("START", ArgumentType::Time, 32);
        let bits = t.to_bit_string(&def, "700.00100").unwrap();
        assert_eq!(bits, format!("{:032b}", 700));
        assert_eq!(decode(&t, &def, &bits).unwrap(), "700.00000");
    }

    #[test]
    fn test_time_unsupported_width() {
        let t = TimeTranslator::new(0, SclkFormat::default(), None);
        let def = ArgumentDefinition::new("START", ArgumentType::Time, 40);
        assert!(t.to_bit_string(&def, "1").is_err());
        assert!(decode(&t, &def, &"0".repeat(40)).is_err());
    }

    #[test]
    fn test_time_calendar_fallback() {
        let epoch = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let corr = FixedEpochCorrelation::new(epoch);
        let t = TimeTranslator::new(42, SclkFormat::default(), Some(&corr));
        let def = ArgumentDefinition::new("START", ArgumentType::Time, 48);

        let bits = t.to_bit_string(&def, "2000-01-01T00:01:40.5").unwrap();
        assert_eq!(decode(&t, &def, &bits).unwrap(), "100.32768");

        let uncorrelated = TimeTranslator::new(42, SclkFormat::default(), None);
        assert!(uncorrelated.to_bit_string(&def, "2000-01-01T00:01:40").is_err());
        assert!(t.to_bit_string(&def, "noon").is_err());
    }

    #[test]
    fn test_float_time() {
        let t = FloatTimeTranslator::new(TimeTranslator::new(0, SclkFormat::default(), None));
        let def = ArgumentDefinition::new("WHEN", ArgumentType::FloatTime, 64);
        let bits = t.to_bit_string(&def, "100.32768").unwrap();
        assert_eq!(bits, format!("{:064b}", 100.5f64.to_bits()));
        assert_eq!(decode(&t, &def, &bits).unwrap(), "100.32768");

        let narrow = ArgumentDefinition::new("WHEN", ArgumentType::FloatTime, 32);
        assert!(t.to_bit_string(&narrow, "1").is_err());
        assert!(decode(&t, &narrow, &"0".repeat(32)).is_err());
    }
}
