//! Spacecraft clock values and the time-correlation seam
//!
//! A [`Sclk`] is a coarse tick count plus a fine sub-tick count. Its binary
//! layout is fixed by a mission-wide [`SclkFormat`]. Conversion to and from
//! calendar time (SCET) is delegated to a [`TimeCorrelation`].

use crate::consts;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use std::str::FromStr;

/// Bit layout of the mission's canonical spacecraft clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SclkFormat {
    /// Width of the coarse (seconds) field; a multiple of 8
    pub coarse_bits: usize,
    /// Width of the fine (sub-seconds) field; a multiple of 8
    pub fine_bits: usize,
    /// Number of fine ticks per coarse tick
    pub fine_modulus: u64,
}

impl SclkFormat {
    pub fn new(coarse_bits: usize, fine_bits: usize, fine_modulus: u64) -> Self {
        SclkFormat {
            coarse_bits,
            fine_bits,
            fine_modulus,
        }
    }

    pub fn total_bits(&self) -> usize {
        self.coarse_bits + self.fine_bits
    }

    /// Whether a field of `bit_length` bits can carry this clock
    pub fn supports(&self, bit_length: usize) -> bool {
        bit_length == self.coarse_bits || bit_length == self.total_bits()
    }

    /// Layout sanity: byte aligned, at most 64 bits per field, modulus fits
    pub fn is_valid(&self) -> bool {
        self.coarse_bits > 0
            && self.coarse_bits % 8 == 0
            && self.fine_bits % 8 == 0
            && self.coarse_bits <= 64
            && self.fine_bits <= 64
            && self.fine_modulus > 0
            && (self.fine_bits == 64 || self.fine_modulus <= 1u64 << self.fine_bits)
    }

    /// Decimal digits needed to print the largest fine value
    fn fine_digits(&self) -> usize {
        (self.fine_modulus.saturating_sub(1)).to_string().len()
    }
}

impl Default for SclkFormat {
    fn default() -> Self {
        SclkFormat::new(
            consts::DEFAULT_SCLK_COARSE_BITS,
            consts::DEFAULT_SCLK_FINE_BITS,
            consts::DEFAULT_SCLK_FINE_MODULUS,
        )
    }
}

/// Error raised while interpreting clock text or bytes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SclkError {
    #[error("Malformed SCLK text: {0}")]
    Malformed(String),

    #[error("SCLK field out of range: {0}")]
    OutOfRange(String),

    #[error("SCLK byte length {got} does not match layout ({expected} bytes)")]
    ByteLength { expected: usize, got: usize },

    #[error("Time correlation failed: {0}")]
    Correlation(String),
}

/// A spacecraft clock value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sclk {
    pub coarse: u64,
    pub fine: u64,
}

impl Sclk {
    pub fn new(coarse: u64, fine: u64) -> Self {
        Sclk { coarse, fine }
    }

    /// Parse `coarse`, `coarse.fine` or `coarse-fine`, fine given in ticks
    pub fn parse(text: &str, format: &SclkFormat) -> Result<Self, SclkError> {
        let text = text.trim();
        let (coarse_text, fine_text) = match text.find(['.', '-']) {
            Some(idx) => (&text[..idx], Some(&text[idx + 1..])),
            None => (text, None),
        };

        let coarse = parse_digits(coarse_text).ok_or_else(|| SclkError::Malformed(text.to_string()))?;
        let fine = match fine_text {
            Some(f) => parse_digits(f).ok_or_else(|| SclkError::Malformed(text.to_string()))?,
            None => 0,
        };

        let sclk = Sclk::new(coarse, fine);
        sclk.check_range(format)?;
        Ok(sclk)
    }

    fn check_range(&self, format: &SclkFormat) -> Result<(), SclkError> {
        if format.coarse_bits < 64 && self.coarse >= 1u64 << format.coarse_bits {
            return Err(SclkError::OutOfRange(format!(
                "coarse {} exceeds {} bits",
                self.coarse, format.coarse_bits
            )));
        }
        if self.fine >= format.fine_modulus {
            return Err(SclkError::OutOfRange(format!(
                "fine {} not below modulus {}",
                self.fine, format.fine_modulus
            )));
        }
        Ok(())
    }

    /// Render as `coarse.fine` with the fine field zero padded
    pub fn to_text(&self, format: &SclkFormat) -> String {
        format!(
            "{}{}{:0width$}",
            self.coarse,
            consts::SCLK_SEPARATOR,
            self.fine,
            width = format.fine_digits()
        )
    }

    /// Big-endian coarse bytes, followed by fine bytes if requested
    pub fn to_bytes(&self, format: &SclkFormat, include_fine: bool) -> Vec<u8> {
        let mut bytes = be_bytes(self.coarse, format.coarse_bits / 8);
        if include_fine {
            bytes.extend(be_bytes(self.fine, format.fine_bits / 8));
        }
        bytes
    }

    /// Rebuild from coarse-only or coarse+fine big-endian bytes
    pub fn from_bytes(bytes: &[u8], format: &SclkFormat) -> Result<Self, SclkError> {
        let coarse_len = format.coarse_bits / 8;
        let full_len = format.total_bits() / 8;
        if bytes.len() != coarse_len && bytes.len() != full_len {
            return Err(SclkError::ByteLength {
                expected: full_len,
                got: bytes.len(),
            });
        }
        let coarse = from_be(&bytes[..coarse_len]);
        let fine = if bytes.len() == full_len {
            from_be(&bytes[coarse_len..])
        } else {
            0
        };
        Ok(Sclk::new(coarse, fine))
    }

    /// Clock as fractional seconds
    pub fn to_seconds(&self, format: &SclkFormat) -> f64 {
        self.coarse as f64 + self.fine as f64 / format.fine_modulus as f64
    }

    /// Nearest clock value to a fractional seconds count
    pub fn from_seconds(seconds: f64, format: &SclkFormat) -> Result<Self, SclkError> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(SclkError::OutOfRange(format!("{} seconds", seconds)));
        }
        let mut coarse = seconds.trunc();
        let mut fine = ((seconds - coarse) * format.fine_modulus as f64).round();
        if fine >= format.fine_modulus as f64 {
            coarse += 1.0;
            fine = 0.0;
        }
        if coarse >= u64::MAX as f64 {
            return Err(SclkError::OutOfRange(format!("{} seconds", seconds)));
        }
        let sclk = Sclk::new(coarse as u64, fine as u64);
        sclk.check_range(format)?;
        Ok(sclk)
    }
}

fn parse_digits(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    u64::from_str(text).ok()
}

fn be_bytes(value: u64, len: usize) -> Vec<u8> {
    let full = value.to_be_bytes();
    full[full.len() - len..].to_vec()
}

fn from_be(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

/// Parse a calendar timestamp in ISO (`2024-03-01T12:00:00.5`) or
/// day-of-year (`2024-061T12:00:00.5`) form, optionally ending in `Z`
pub fn parse_scet(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    let text = text.strip_suffix('Z').unwrap_or(text);
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%jT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Converts between calendar time and spacecraft clock for a spacecraft
pub trait TimeCorrelation: Send + Sync {
    fn scet_to_sclk(&self, scet: &DateTime<Utc>, scid: u32, format: &SclkFormat) -> Result<Sclk, SclkError>;

    fn sclk_to_scet(&self, sclk: &Sclk, scid: u32, format: &SclkFormat) -> Result<DateTime<Utc>, SclkError>;
}

/// Correlation with a constant epoch and one coarse tick per second
///
/// Applies to every spacecraft id. Real missions plug in their correlation
/// tables through [`TimeCorrelation`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedEpochCorrelation {
    pub epoch: DateTime<Utc>,
}

impl FixedEpochCorrelation {
    pub fn new(epoch: DateTime<Utc>) -> Self {
        FixedEpochCorrelation { epoch }
    }
}

impl TimeCorrelation for FixedEpochCorrelation {
    fn scet_to_sclk(&self, scet: &DateTime<Utc>, _scid: u32, format: &SclkFormat) -> Result<Sclk, SclkError> {
        let elapsed = scet.signed_duration_since(self.epoch);
        if elapsed < Duration::zero() {
            return Err(SclkError::Correlation(format!(
                "{} precedes clock epoch {}",
                scet, self.epoch
            )));
        }
        let nanos = elapsed
            .num_nanoseconds()
            .ok_or_else(|| SclkError::Correlation(format!("{} too far from epoch", scet)))?;
        let coarse = (nanos / 1_000_000_000) as u64;
        let sub_nanos = (nanos % 1_000_000_000) as u128;
        let fine = (sub_nanos * format.fine_modulus as u128 / 1_000_000_000) as u64;
        let sclk = Sclk::new(coarse, fine);
        sclk.check_range(format)?;
        Ok(sclk)
    }

    fn sclk_to_scet(&self, sclk: &Sclk, _scid: u32, format: &SclkFormat) -> Result<DateTime<Utc>, SclkError> {
        let sub_nanos = sclk.fine as u128 * 1_000_000_000 / format.fine_modulus as u128;
        let coarse = i64::try_from(sclk.coarse)
            .map_err(|_| SclkError::Correlation(format!("coarse {} too large", sclk.coarse)))?;
        let offset = Duration::try_seconds(coarse)
            .ok_or_else(|| SclkError::Correlation(format!("coarse {} too large", sclk.coarse)))?
            + Duration::nanoseconds(sub_nanos as i64);
        self.epoch
            .checked_add_signed(offset)
            .ok_or_else(|| SclkError::Correlation(format!("{:?} overflows calendar", sclk)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_forms() {
        let format = SclkFormat::default();
        assert_eq!(Sclk::parse("1000", &format).unwrap(), Sclk::new(1000, 0));
        assert_eq!(Sclk::parse("1000.00042", &format).unwrap(), Sclk::new(1000, 42));
        assert_eq!(Sclk::parse("1000-42", &format).unwrap(), Sclk::new(1000, 42));
        assert!(Sclk::parse("10a0", &format).is_err());
        assert!(Sclk::parse("1000.", &format).is_err());
        assert!(Sclk::parse("1000.65536", &format).is_err());
        assert!(Sclk::parse("4294967296", &format).is_err());
    }

    #[test]
    fn test_text_is_zero_padded() {
        let format = SclkFormat::default();
        assert_eq!(Sclk::new(7, 42).to_text(&format), "7.00042");
        let text = Sclk::new(123456, 65535).to_text(&format);
        assert_eq!(Sclk::parse(&text, &format).unwrap(), Sclk::new(123456, 65535));
    }

    #[test]
    fn test_bytes_layout() {
        let format = SclkFormat::default();
        let sclk = Sclk::new(0x01020304, 0x0506);
        assert_eq!(sclk.to_bytes(&format, true), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(sclk.to_bytes(&format, false), vec![1, 2, 3, 4]);
        assert_eq!(Sclk::from_bytes(&[1, 2, 3, 4, 5, 6], &format).unwrap(), sclk);
        assert_eq!(
            Sclk::from_bytes(&[1, 2, 3, 4], &format).unwrap(),
            Sclk::new(0x01020304, 0)
        );
        assert!(Sclk::from_bytes(&[1, 2, 3], &format).is_err());
    }

    #[test]
    fn test_seconds_conversion() {
        let format = SclkFormat::default();
        let sclk = Sclk::new(100, 32768);
        assert_eq!(sclk.to_seconds(&format), 100.5);
        assert_eq!(Sclk::from_seconds(100.5, &format).unwrap(), sclk);
        assert!(Sclk::from_seconds(-1.0, &format).is_err());
        assert!(Sclk::from_seconds(f64::NAN, &format).is_err());
    }

    #[test]
    fn test_format_validity() {
        assert!(SclkFormat::default().is_valid());
        assert!(!SclkFormat::new(30, 16, 65536).is_valid());
        assert!(!SclkFormat::new(32, 8, 1000).is_valid());
        assert!(SclkFormat::new(32, 0, 1).is_valid());
    }

    #[test]
    fn test_parse_scet() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(parse_scet("2024-03-01T12:00:00").unwrap(), expected);
        assert_eq!(parse_scet("2024-061T12:00:00").unwrap(), expected);
        assert_eq!(parse_scet("2024-03-01T12:00:00Z").unwrap(), expected);
        assert!(parse_scet("yesterday").is_none());
    }

    #[test]
    fn test_fixed_epoch_correlation() {
        let format = SclkFormat::default();
        let epoch = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let corr = FixedEpochCorrelation::new(epoch);

        let scet = epoch + Duration::seconds(86_400) + Duration::milliseconds(500);
        let sclk = corr.scet_to_sclk(&scet, 0, &format).unwrap();
        assert_eq!(sclk, Sclk::new(86_400, 32768));
        assert_eq!(corr.sclk_to_scet(&sclk, 0, &format).unwrap(), scet);

        let before = epoch - Duration::seconds(1);
        assert!(corr.scet_to_sclk(&before, 0, &format).is_err());
    }
}
