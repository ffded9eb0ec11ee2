//! Flag-delimited framing with byte stuffing.
//!
//! Every literal occurrence of the flag or escape character in the payload
//! is preceded by the escape character, so a decoder scanning for unescaped
//! flags can find frame boundaries unambiguously. The framed form is
//! `"<flag> <stuffed> <flag>"`.
//!
//! # Example
//!
//! ```
//! use framewire::framing::ByteStuff;
//!
//! let framed = ByteStuff::encode("Hello F World", 'F', 'E').unwrap();
//! assert_eq!(framed, "F Hello EF World F");
//! assert_eq!(ByteStuff::decode(&framed, 'F', 'E').unwrap(), "Hello F World");
//! ```

use crate::error::{FramewireError, Result};

/// Default flag character used by the sender binary.
pub const DEFAULT_FLAG: char = 'F';

/// Default escape character used by the sender binary.
pub const DEFAULT_ESCAPE: char = 'E';

/// Byte-stuffed flag framing codec.
pub struct ByteStuff;

impl ByteStuff {
    /// Frame a payload between two flag characters, escaping every literal
    /// flag or escape inside it.
    ///
    /// The flag and escape must differ, otherwise stuffing cannot be
    /// reversed.
    pub fn encode(input: &str, flag: char, escape: char) -> Result<String> {
        check_distinct(flag, escape)?;

        let mut stuffed = String::with_capacity(input.len() + 8);
        for ch in input.chars() {
            if ch == flag || ch == escape {
                stuffed.push(escape);
            }
            stuffed.push(ch);
        }
        Ok(format!("{flag} {stuffed} {flag}"))
    }

    /// Recover the payload from a framed message.
    pub fn decode(framed: &str, flag: char, escape: char) -> Result<String> {
        check_distinct(flag, escape)?;

        let body = framed
            .strip_prefix(&format!("{flag} "))
            .and_then(|rest| rest.strip_suffix(&format!(" {flag}")))
            .ok_or_else(|| {
                FramewireError::MalformedFrame(format!(
                    "framed message is not wrapped in {flag:?} flags"
                ))
            })?;

        let mut payload = String::with_capacity(body.len());
        let mut chars = body.chars();
        while let Some(ch) = chars.next() {
            if ch == escape {
                match chars.next() {
                    Some(escaped) => payload.push(escaped),
                    None => {
                        return Err(FramewireError::MalformedFrame(
                            "dangling escape at end of body".to_string(),
                        ))
                    }
                }
            } else if ch == flag {
                return Err(FramewireError::MalformedFrame(
                    "unescaped flag inside body".to_string(),
                ));
            } else {
                payload.push(ch);
            }
        }
        Ok(payload)
    }
}

fn check_distinct(flag: char, escape: char) -> Result<()> {
    if flag == escape {
        return Err(FramewireError::Validation(format!(
            "flag and escape must differ, both are {flag:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_message() {
        let framed = ByteStuff::encode("Hello F World E How F are you", 'F', 'E').unwrap();
        assert_eq!(framed, "F Hello EF World EE How EF are you F");
        assert!(framed.starts_with("F "));
        assert!(framed.ends_with(" F"));
    }

    #[test]
    fn test_no_unescaped_flag_in_body() {
        let framed = ByteStuff::encode("FFFEEE plain", 'F', 'E').unwrap();
        let body = &framed[2..framed.len() - 2];

        let mut chars = body.chars();
        while let Some(ch) = chars.next() {
            if ch == 'E' {
                chars.next();
                continue;
            }
            assert_ne!(ch, 'F', "unescaped flag in body of {framed:?}");
        }
    }

    #[test]
    fn test_plain_text_passes_through() {
        let framed = ByteStuff::encode("no specials here", '#', '$').unwrap();
        assert_eq!(framed, "# no specials here #");
    }

    #[test]
    fn test_empty_payload() {
        let framed = ByteStuff::encode("", 'F', 'E').unwrap();
        assert_eq!(framed, "F  F");
        assert_eq!(ByteStuff::decode(&framed, 'F', 'E').unwrap(), "");
    }

    #[test]
    fn test_flag_equal_to_escape_rejected() {
        assert!(matches!(
            ByteStuff::encode("data", 'X', 'X'),
            Err(FramewireError::Validation(_))
        ));
    }

    #[test]
    fn test_decode_reverses_encode() {
        let input = "E F EF FE EEFF";
        let framed = ByteStuff::encode(input, 'F', 'E').unwrap();
        assert_eq!(ByteStuff::decode(&framed, 'F', 'E').unwrap(), input);
    }

    #[test]
    fn test_decode_rejects_missing_flags() {
        assert!(ByteStuff::decode("Hello", 'F', 'E').is_err());
        assert!(ByteStuff::decode("F Hello", 'F', 'E').is_err());
    }

    #[test]
    fn test_decode_rejects_dangling_escape() {
        assert!(matches!(
            ByteStuff::decode("F bad E F", 'F', 'E'),
            Err(FramewireError::MalformedFrame(_))
        ));
    }
}
