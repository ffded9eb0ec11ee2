//! Framing module - data-link framing codecs.
//!
//! Three independent, stateless transforms that delimit messages inside a
//! byte or bit stream; none consults prior or following frames:
//!
//! - [`LengthPrefix`] - decimal byte-count prefix per unit
//! - [`ByteStuff`] - flag-delimited with escape-character stuffing
//! - [`BitStuff`] - flag-delimited with a `0` stuffed after five `1`s
//!
//! # Design
//!
//! Codecs are marker structs with static methods rather than trait objects;
//! the transforms are pure string functions and the call sites pick one at
//! compile time. [`FramingMethod`] exists for the one place that selects a
//! scheme at runtime (the sender binary, driven by `FRAMEWIRE_FRAMING`).

mod bit_stuff;
mod byte_stuff;
mod length_prefix;

use std::str::FromStr;

pub use bit_stuff::BitStuff;
pub use byte_stuff::{ByteStuff, DEFAULT_ESCAPE, DEFAULT_FLAG};
pub use length_prefix::LengthPrefix;

use crate::error::{FramewireError, Result};

/// Runtime selection of one framing scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FramingMethod {
    /// Length-prefix framing over whitespace-split units.
    LengthPrefix,
    /// Byte-stuffed flag framing with the given delimiter characters.
    ByteStuffed { flag: char, escape: char },
    /// Bit-stuffed flag framing over a `{0,1}` string.
    BitStuffed,
}

impl FramingMethod {
    /// Frame a raw message with the selected scheme.
    pub fn encode(&self, input: &str) -> Result<String> {
        match self {
            Self::LengthPrefix => Ok(LengthPrefix::encode(input.split_whitespace())),
            Self::ByteStuffed { flag, escape } => ByteStuff::encode(input, *flag, *escape),
            Self::BitStuffed => BitStuff::encode(input),
        }
    }
}

impl FromStr for FramingMethod {
    type Err = FramewireError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "length-prefix" => Ok(Self::LengthPrefix),
            "byte-stuff" => Ok(Self::ByteStuffed {
                flag: DEFAULT_FLAG,
                escape: DEFAULT_ESCAPE,
            }),
            "bit-stuff" => Ok(Self::BitStuffed),
            other => Err(FramewireError::Config(format!(
                "unknown framing method {other:?}, expected length-prefix, byte-stuff or bit-stuff"
            ))),
        }
    }
}
