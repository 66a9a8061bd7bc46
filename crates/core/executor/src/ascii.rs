//! Helpers for programs that talk in ASCII.
//!
//! Such programs read and write one character per value. A value outside the ASCII range usually
//! carries the actual answer, so decoding keeps it apart from the text.

use itertools::Itertools;

/// The largest value treated as a character.
pub const MAX_ASCII: i64 = 127;

/// The values a program reads for `text`, one per byte.
pub fn encode(text: &str) -> impl Iterator<Item = i64> + '_ {
    text.bytes().map(i64::from)
}

/// The decoded output of an ASCII program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AsciiOutput {
    /// The characters written, in order.
    pub text: String,
    /// The last value written that is not a character.
    pub value: Option<i64>,
}

impl AsciiOutput {
    /// Split `values` into text and the trailing non-ASCII value.
    pub fn decode(values: impl IntoIterator<Item = i64>) -> Self {
        let mut output = Self::default();
        for value in values {
            output.push(value);
        }
        output
    }

    /// Like [`AsciiOutput::decode`], but stop at the first zero.
    ///
    /// Programs that stream several frames use a zero value to mark the end of one.
    pub fn decode_until_sentinel(values: impl IntoIterator<Item = i64>) -> Self {
        Self::decode(values.into_iter().take_while(|value| *value != 0))
    }

    fn push(&mut self, value: i64) {
        match u8::try_from(value) {
            Ok(byte) if i64::from(byte) <= MAX_ASCII => self.text.push(char::from(byte)),
            _ => self.value = Some(value),
        }
    }

    /// The decoded text split into lines, without trailing empty lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.trim_end_matches('\n').lines()
    }
}

/// Render output values separated by commas.
pub fn format_outputs(values: &[i64]) -> String {
    values.iter().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        assert_eq!(encode("A,1\n").collect::<Vec<_>>(), vec![65, 44, 49, 10]);
        assert_eq!(encode("").count(), 0);
    }

    #[test]
    fn test_decode_separates_value() {
        let output = AsciiOutput::decode([72, 105, 10, 19_349_032]);
        assert_eq!(output.text, "Hi\n");
        assert_eq!(output.value, Some(19_349_032));
    }

    #[test]
    fn test_decode_negative_value() {
        let output = AsciiOutput::decode([35, -1]);
        assert_eq!(output.text, "#");
        assert_eq!(output.value, Some(-1));
    }

    #[test]
    fn test_decode_text_only() {
        let output = AsciiOutput::decode(encode("#.#\n..#\n\n"));
        assert_eq!(output.value, None);
        assert_eq!(output.lines().collect::<Vec<_>>(), vec!["#.#", "..#"]);
    }

    #[test]
    fn test_decode_until_sentinel() {
        let output = AsciiOutput::decode_until_sentinel([35, 10, 0, 46, 10]);
        assert_eq!(output.text, "#\n");
    }

    #[test]
    fn test_format_outputs() {
        assert_eq!(format_outputs(&[1, -2, 3]), "1,-2,3");
        assert_eq!(format_outputs(&[]), "");
    }
}
