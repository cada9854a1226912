//! Output management module
//!
//! Writes the finished word set as plain text and as a JSON array. Each file
//! is created, written and flushed in one go; the two writes do not depend on
//! each other.

use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{BuildError, Result};
use crate::filter::WordSet;

pub const TEXT_FILE_NAME: &str = "five_letter_words.txt";
pub const JSON_FILE_NAME: &str = "five_letter_words.json";

/// Locations of both output files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub text: PathBuf,
    pub json: PathBuf,
}

impl OutputPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            text: dir.join(TEXT_FILE_NAME),
            json: dir.join(JSON_FILE_NAME),
        }
    }
}

/// Sizes of the files that were written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputReport {
    pub text_bytes: u64,
    pub json_bytes: u64,
}

/// Pretty JSON with two-space indentation that escapes every non-ASCII
/// character as `\uXXXX`.
struct AsciiPrettyFormatter<'a> {
    inner: PrettyFormatter<'a>,
}

impl AsciiPrettyFormatter<'_> {
    fn new() -> Self {
        Self {
            inner: PrettyFormatter::with_indent(b"  "),
        }
    }
}

impl Formatter for AsciiPrettyFormatter<'_> {
    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        if fragment.is_ascii() {
            return writer.write_all(fragment.as_bytes());
        }

        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

/// Write words one per line, each followed by a newline
pub fn write_text<W: Write>(writer: &mut W, words: &[String]) -> io::Result<()> {
    for word in words {
        writeln!(writer, "{}", word)?;
    }
    writer.flush()
}

/// Write words as an indented, ASCII-only JSON array plus a trailing newline
pub fn write_json<W: Write>(writer: &mut W, words: &[String]) -> io::Result<()> {
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut *writer, AsciiPrettyFormatter::new());
    words.serialize(&mut serializer).map_err(io::Error::from)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

fn write_file<F>(path: &Path, words: &[String], render: F) -> Result<u64>
where
    F: FnOnce(&mut BufWriter<File>, &[String]) -> io::Result<()>,
{
    let to_output_error = |source: io::Error| BuildError::Output {
        path: path.to_path_buf(),
        source,
    };

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(to_output_error)?;

    let mut writer = BufWriter::new(file);
    render(&mut writer, words).map_err(to_output_error)?;

    let file = writer.into_inner().map_err(|e| to_output_error(e.into_error()))?;
    let size = file.metadata().map_err(to_output_error)?.len();
    Ok(size)
}

/// Write both output files.
///
/// The JSON file is attempted even when the text file fails. When both fail
/// the JSON error is logged and the text error returned.
pub fn write_outputs(words: &WordSet, paths: &OutputPaths) -> Result<OutputReport> {
    let text = write_file(&paths.text, words.as_slice(), write_text);
    let json = write_file(&paths.json, words.as_slice(), write_json);

    match (text, json) {
        (Ok(text_bytes), Ok(json_bytes)) => Ok(OutputReport {
            text_bytes,
            json_bytes,
        }),
        (Err(e), Ok(_)) | (Ok(_), Err(e)) => Err(e),
        (Err(text_err), Err(json_err)) => {
            if let BuildError::Output { path, source } = &json_err {
                log::error!("failed to write {:?}: {}", path, source);
            }
            Err(text_err)
        }
    }
}

/// Ensure output directory exists
pub fn ensure_output_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|source| BuildError::Output {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::filter_words;
    use tempfile::TempDir;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_write_text() {
        let mut out = Vec::new();
        write_text(&mut out, &words(&["apple", "brick"])).unwrap();
        assert_eq!(out, b"apple\nbrick\n");
    }

    #[test]
    fn test_write_json_layout() {
        let mut out = Vec::new();
        write_json(&mut out, &words(&["apple", "brick"])).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[\n  \"apple\",\n  \"brick\"\n]\n");
    }

    #[test]
    fn test_write_json_escapes_non_ascii() {
        let mut out = Vec::new();
        write_json(&mut out, &words(&["café", "a\"b", "𝄞"])).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.is_ascii());
        assert!(text.contains(r#""caf\u00e9""#));
        assert!(text.contains(r#""a\"b""#));
        assert!(text.contains(r#""\ud834\udd1e""#));

        let parsed: Vec<String> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, words(&["café", "a\"b", "𝄞"]));
    }

    #[test]
    fn test_write_outputs_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let paths = OutputPaths::in_dir(temp_dir.path());
        let set = filter_words(["fjord", "Apple", "brick", "apple"]).unwrap();

        let report = write_outputs(&set, &paths).unwrap();

        let text = std::fs::read_to_string(&paths.text).unwrap();
        let json = std::fs::read_to_string(&paths.json).unwrap();
        assert_eq!(report.text_bytes, text.len() as u64);
        assert_eq!(report.json_bytes, json.len() as u64);
        assert!(text.ends_with('\n'));
        assert!(json.ends_with("]\n"));

        let from_text: Vec<&str> = text.lines().collect();
        let from_json: Vec<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(from_text, vec!["apple", "brick", "fjord"]);
        assert_eq!(from_json, from_text);
    }

    #[test]
    fn test_write_outputs_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let paths = OutputPaths::in_dir(temp_dir.path());
        std::fs::write(&paths.text, "stale\nstale\nstale\n").unwrap();

        let set = filter_words(["apple"]).unwrap();
        write_outputs(&set, &paths).unwrap();

        assert_eq!(std::fs::read_to_string(&paths.text).unwrap(), "apple\n");
    }

    #[test]
    fn test_one_failure_does_not_block_other() {
        let temp_dir = TempDir::new().unwrap();
        let paths = OutputPaths {
            text: temp_dir.path().join("missing-dir").join(TEXT_FILE_NAME),
            json: temp_dir.path().join(JSON_FILE_NAME),
        };
        let set = filter_words(["apple"]).unwrap();

        let err = write_outputs(&set, &paths).unwrap_err();
        assert!(matches!(err, BuildError::Output { ref path, .. } if *path == paths.text));
        assert!(paths.json.exists());
    }

    #[test]
    fn test_ensure_output_dir() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        ensure_output_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
