//! Permissive text decoding for dictionary files
//!
//! Word files are expected to be UTF-8. Invalid byte sequences are dropped
//! instead of failing the member or being replaced with U+FFFD.

use bstr::ByteSlice;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Decode `bytes` as UTF-8, silently dropping invalid sequences
pub fn decode_ignoring_errors(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut text = String::with_capacity(bytes.len());
    let mut dropped = 0usize;
    for chunk in ByteSlice::utf8_chunks(bytes) {
        text.push_str(chunk.valid());
        dropped += chunk.invalid().len();
    }

    if dropped > 0 {
        log::trace!("dropped {} undecodable bytes", dropped);
    }
    text
}

/// Characters that end a line. `\r\n` counts as a single break.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\x0b'
            | '\x0c'
            | '\x1c'
            | '\x1d'
            | '\x1e'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Iterator over the lines of a decoded text, without their terminators
pub struct Lines<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }

        match self.rest.char_indices().find(|&(_, c)| is_line_break(c)) {
            Some((pos, c)) => {
                let line = &self.rest[..pos];
                let mut end = pos + c.len_utf8();
                if c == '\r' && self.rest[end..].starts_with('\n') {
                    end += 1;
                }
                self.rest = &self.rest[end..];
                Some(line)
            }
            None => {
                let line = self.rest;
                self.rest = "";
                Some(line)
            }
        }
    }
}

/// Split `text` into lines. A final terminator does not start an empty line.
pub fn split_lines(text: &str) -> Lines<'_> {
    Lines { rest: text }
}

/// Decode a whole member, then split it into lines
pub fn decode_lines(bytes: &[u8]) -> impl Iterator<Item = String> {
    let text = decode_ignoring_errors(bytes);
    split_lines(&text)
        .map(str::to_owned)
        .collect::<Vec<_>>()
        .into_iter()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_utf8_untouched() {
        assert_eq!(decode_ignoring_errors("fjord\ncafé\n".as_bytes()), "fjord\ncafé\n");
    }

    #[test]
    fn test_invalid_bytes_dropped() {
        // Latin-1 "é" is not valid UTF-8 on its own
        assert_eq!(decode_ignoring_errors(b"caf\xe9s\nbrick"), "cafs\nbrick");
        assert_eq!(decode_ignoring_errors(b"\xff\xfeapple"), "apple");
    }

    #[test]
    fn test_bom_skipped() {
        assert_eq!(decode_ignoring_errors(b"\xEF\xBB\xBFapple\n"), "apple\n");
    }

    #[test]
    fn test_line_iterator() {
        let lines: Vec<_> = decode_lines(b"line1\r\nline2\nline3\n").collect();
        assert_eq!(lines, vec!["line1", "line2", "line3"]);
    }

    #[test]
    fn test_bare_carriage_returns() {
        let lines: Vec<_> = decode_lines(b"apple\rbrick\r").collect();
        assert_eq!(lines, vec!["apple", "brick"]);
    }

    #[test]
    fn test_other_line_boundaries() {
        let text = "a\x0bb\x0cc\x1cd\x1de\x1ef\u{85}g\u{2028}h\u{2029}i";
        let lines: Vec<_> = split_lines(text).collect();
        assert_eq!(lines, vec!["a", "b", "c", "d", "e", "f", "g", "h", "i"]);
    }

    #[test]
    fn test_blank_lines_kept() {
        let lines: Vec<_> = split_lines("apple\n\n\r\rbrick").collect();
        assert_eq!(lines, vec!["apple", "", "", "", "brick"]);
        let lines: Vec<_> = split_lines("\n").collect();
        assert_eq!(lines, vec![""]);
    }

    #[test]
    fn test_break_split_by_invalid_byte() {
        // the invalid byte is dropped first, so "\r\xff\n" is one break
        let lines: Vec<_> = decode_lines(b"apple\r\xff\nbrick").collect();
        assert_eq!(lines, vec!["apple", "brick"]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(decode_lines(b"").count(), 0);
    }
}
