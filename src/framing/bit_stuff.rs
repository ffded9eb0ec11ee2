//! Flag-delimited framing with bit stuffing.
//!
//! Works on bit strings over `{'0','1'}`. After every run of five
//! consecutive `1`s a `0` is inserted, so the six-ones flag pattern
//! `01111110` can never occur inside the stuffed body. The framed form is
//! `"01111110 <stuffed> 01111110"`.
//!
//! Input containing anything other than `0` or `1` is rejected before any
//! stuffing happens; callers are expected to validate at this boundary
//! rather than let stray characters pass through.
//!
//! # Example
//!
//! ```
//! use framewire::framing::BitStuff;
//!
//! let framed = BitStuff::encode("1111100111").unwrap();
//! assert_eq!(framed, "01111110 11111000111 01111110");
//! ```

use crate::error::{FramewireError, Result};

/// Bit-stuffed flag framing codec.
pub struct BitStuff;

impl BitStuff {
    /// The fixed flag pattern delimiting bit-stuffed frames.
    pub const FLAG: &'static str = "01111110";

    /// Frame a bit string, stuffing a `0` after each run of five `1`s.
    pub fn encode(bits: &str) -> Result<String> {
        validate_bits(bits)?;

        let mut stuffed = String::with_capacity(bits.len() + bits.len() / 5 + 1);
        let mut run = 0u32;
        for bit in bits.chars() {
            if bit == '1' {
                run += 1;
                stuffed.push('1');
                if run == 5 {
                    stuffed.push('0');
                    run = 0;
                }
            } else {
                stuffed.push('0');
                run = 0;
            }
        }
        Ok(format!("{flag} {stuffed} {flag}", flag = Self::FLAG))
    }

    /// Recover the original bit string from a framed message.
    pub fn decode(framed: &str) -> Result<String> {
        let body = framed
            .strip_prefix("01111110 ")
            .and_then(|rest| rest.strip_suffix(" 01111110"))
            .ok_or_else(|| {
                FramewireError::MalformedFrame(
                    "framed message is not wrapped in the 01111110 flag".to_string(),
                )
            })?;
        validate_bits(body)?;

        let mut bits = String::with_capacity(body.len());
        let mut run = 0u32;
        let mut chars = body.chars();
        while let Some(bit) = chars.next() {
            if bit == '1' {
                run += 1;
                bits.push('1');
                if run == 5 {
                    match chars.next() {
                        Some('0') => {}
                        Some('1') => {
                            return Err(FramewireError::MalformedFrame(
                                "flag pattern inside stuffed body".to_string(),
                            ))
                        }
                        _ => {
                            return Err(FramewireError::MalformedFrame(
                                "truncated stuffed body".to_string(),
                            ))
                        }
                    }
                    run = 0;
                }
            } else {
                bits.push('0');
                run = 0;
            }
        }
        Ok(bits)
    }
}

fn validate_bits(bits: &str) -> Result<()> {
    match bits.chars().find(|ch| *ch != '0' && *ch != '1') {
        Some(bad) => Err(FramewireError::Validation(format!(
            "bit data may only contain '0' and '1', found {bad:?}"
        ))),
        None => Ok(()),
    }
}
