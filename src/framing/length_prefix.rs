//! Length-prefix framing (byte-count framing).
//!
//! Each unit is emitted as its own length plus one, written as a decimal
//! prefix with no separator, directly followed by the unit. Units are
//! joined with single spaces.
//!
//! The `+1` accounts for the length digit itself. That convention is only
//! unambiguous while `len(unit) + 1` stays single-digit; for longer units
//! the prefix needs several digits and a decoder would have no boundary
//! rule. The scheme is display-only, so the encoder stays total and the
//! fragility is documented rather than fixed.
//!
//! # Example
//!
//! ```
//! use framewire::framing::LengthPrefix;
//!
//! let framed = LengthPrefix::encode("25642 15632 6541".split_whitespace());
//! assert_eq!(framed, "625642 615632 65641");
//! ```

/// Length-prefix framing codec.
pub struct LengthPrefix;

impl LengthPrefix {
    /// Frame a sequence of units.
    ///
    /// Lengths are counted in characters, matching how the units read.
    pub fn encode<'a, I>(units: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut framed = String::new();
        for unit in units {
            if !framed.is_empty() {
                framed.push(' ');
            }
            let length = unit.chars().count() + 1;
            framed.push_str(&length.to_string());
            framed.push_str(unit);
        }
        framed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_frames() {
        let framed = LengthPrefix::encode(["25642", "15632", "6541"]);
        assert_eq!(framed, "625642 615632 65641");
    }

    #[test]
    fn test_token_count_and_prefix_property() {
        let words = ["a", "bb", "ccc", "dddd"];
        let framed = LengthPrefix::encode(words);

        let tokens: Vec<&str> = framed.split(' ').collect();
        assert_eq!(tokens.len(), words.len());
        for (token, word) in tokens.iter().zip(words) {
            let prefix = &token[..token.len() - word.len()];
            assert_eq!(prefix.parse::<usize>().unwrap(), word.len() + 1);
            assert!(token.ends_with(word));
        }
    }

    #[test]
    fn test_no_trailing_whitespace() {
        let framed = LengthPrefix::encode(["one", "two"]);
        assert_eq!(framed, framed.trim_end());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(LengthPrefix::encode([]), "");
    }

    #[test]
    fn test_single_unit() {
        assert_eq!(LengthPrefix::encode(["hi"]), "3hi");
    }

    #[test]
    fn test_multibyte_units_count_characters() {
        // five characters, so the prefix is 6 even though the byte length differs
        assert_eq!(LengthPrefix::encode(["héllö"]), "6héllö");
    }
}
