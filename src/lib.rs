//! # Command Argument Codec
//!
//! Bit-exact translation of spacecraft command arguments between their
//! textual form and the bits radiated to the vehicle.
//!
//! Every argument kind a command dictionary can declare has a translator:
//!
//! - Signed and unsigned integers, IEEE-754 floats
//! - Enumerations, booleans and bitmasks
//! - Fixed-length and length-prefixed strings
//! - Spacecraft clock times, as coarse/fine bytes or as a double
//! - Fill regions
//! - Repeat groups (a count followed by repeated sub-arguments)
//!
//! ## Features
//!
//! - `serde`: Enable serialization/deserialization of definitions
//!
//! ## Example
//!
//! ```
//! use cmdarg_codec::{ArgumentCodec, ArgumentDefinition, ArgumentType};
//!
//! let codec = ArgumentCodec::new();
//! let def = ArgumentDefinition::new("TEMP_OFFSET", ArgumentType::Integer, 8);
//!
//! let bits = codec.encode(&def, "-1")?;
//! assert_eq!(bits, "11111111");
//! assert_eq!(codec.decode_bits(&def, &bits)?, "-1");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod bits;
pub mod codec;
pub mod command;
pub mod definition;
pub mod error;
pub mod sclk;
pub mod translators;
pub mod validate;

pub use bits::BitCursor;
pub use codec::{ArgumentCodec, CodecBuilder};
pub use command::{CommandDefinition, DecodedCommand};
pub use definition::{ArgumentDefinition, ArgumentType, BitValueFormat, EnumValue, Enumeration};
pub use error::{CodecError, ErrorKind, Result};
pub use sclk::{FixedEpochCorrelation, Sclk, SclkFormat, TimeCorrelation};
pub use translators::{ArgumentTranslator, Translator};

/// Codec-wide constants
pub mod consts {
    /// Joins a repeat argument's count and sub-values
    pub const REPEAT_SEPARATOR: char = ',';

    /// Quotes a repeat sub-value holding the separator or edge whitespace
    pub const REPEAT_QUOTE: char = '"';

    /// Escapes a quote or itself inside a quoted repeat sub-value
    pub const REPEAT_ESCAPE: char = '\\';

    /// Separates flag names in a bitmask value
    pub const BITMASK_SEPARATOR: char = '|';

    /// Separates coarse and fine fields in SCLK text
    pub const SCLK_SEPARATOR: char = '.';

    /// Default coarse clock width in bits
    pub const DEFAULT_SCLK_COARSE_BITS: usize = 32;

    /// Default fine clock width in bits
    pub const DEFAULT_SCLK_FINE_BITS: usize = 16;

    /// Default fine ticks per coarse tick
    pub const DEFAULT_SCLK_FINE_MODULUS: u64 = 65_536;

    /// Legal length-prefix widths for variable strings
    pub const VAR_STRING_PREFIX_LENGTHS: [usize; 3] = [8, 16, 32];

    /// Legal float widths (IEEE-754 single and double)
    pub const FLOAT_BIT_LENGTHS: [usize; 2] = [32, 64];

    /// Width of a float time argument
    pub const FLOAT_TIME_BIT_LENGTH: usize = 64;
}
