//! Archive scanning module
//!
//! Walks a SCOWL `.tar.gz` archive, picks the word files whose size level is
//! within bounds and collects their lines untouched. Word validation happens
//! later in [`crate::filter`].
//!
//! SCOWL word files are named like `english-words.10`, `american-words.35`
//! or `british-words.50`. The numeric suffix is the size level: 10 holds the
//! most common words, 95 the most obscure.

use flate2::read::GzDecoder;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::encoding::decode_lines;
use crate::error::{BuildError, Result};

/// Largest buffer reserved up front for one member; bigger members grow it
const MAX_PREALLOC: u64 = 1 << 20;

/// Named dictionary families, or any `*-words` / `*-word` family, then a
/// literal dot and the level. Matched against the base name only.
static WORD_FILE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:(english|american|british|canadian|australian|variant)|(.*)-words?)\.([0-9]+)$",
    )
    .expect("Invalid WORD_FILE_RE regex")
});

/// Dictionary family a word file belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DictionaryVariant {
    English,
    American,
    British,
    Canadian,
    Australian,
    Variant,
    /// Any other `*-words` family, lowercased
    Other(String),
}

impl DictionaryVariant {
    fn from_stem(stem: &str) -> Self {
        match stem.to_ascii_lowercase().as_str() {
            "english" => Self::English,
            "american" => Self::American,
            "british" => Self::British,
            "canadian" => Self::Canadian,
            "australian" => Self::Australian,
            "variant" => Self::Variant,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for DictionaryVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::English => f.write_str("english"),
            Self::American => f.write_str("american"),
            Self::British => f.write_str("british"),
            Self::Canadian => f.write_str("canadian"),
            Self::Australian => f.write_str("australian"),
            Self::Variant => f.write_str("variant"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

/// Recognize a SCOWL word file by name.
///
/// Accepts a full archive path; only the part after the last `/` is
/// inspected. Returns the dictionary family and size level.
pub fn classify(name: &str) -> Option<(DictionaryVariant, u32)> {
    let base = name.rsplit('/').next().unwrap_or(name);
    let caps = WORD_FILE_RE.captures(base)?;

    let level: u32 = caps.get(3)?.as_str().parse().ok()?;
    let stem = caps.get(1).or_else(|| caps.get(2))?.as_str();

    Some((DictionaryVariant::from_stem(stem), level))
}

/// 10-70 is common English; 80-95 adds rare and technical words
pub const DEFAULT_MIN_LEVEL: u32 = 10;
pub const DEFAULT_MAX_LEVEL: u32 = 70;

/// Inclusive range of accepted size levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelBounds {
    min: u32,
    max: u32,
}

impl LevelBounds {
    pub fn new(min: u32, max: u32) -> Result<Self> {
        if min > max {
            return Err(BuildError::Config(format!(
                "minimum level {} is above maximum level {}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    #[inline]
    pub fn contains(&self, level: u32) -> bool {
        self.min <= level && level <= self.max
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }
}

impl Default for LevelBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_LEVEL,
            max: DEFAULT_MAX_LEVEL,
        }
    }
}

/// A named archive entry with its content
#[derive(Debug, Clone)]
pub struct ArchiveMember {
    pub name: String,
    pub content: Vec<u8>,
}

impl ArchiveMember {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// A word file that was read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSummary {
    pub name: String,
    pub variant: DictionaryVariant,
    pub level: u32,
    pub lines: usize,
}

/// Everything collected from one archive
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Raw lines in archive order
    pub lines: Vec<String>,
    /// Word files that were read
    pub members: Vec<MemberSummary>,
    /// Word files skipped because their level is out of bounds
    pub out_of_range: usize,
    /// Word files skipped because they could not be read
    pub unreadable: usize,
}

impl ScanReport {
    pub fn files_read(&self) -> usize {
        self.members.len()
    }

    /// Read one admitted member of `declared` bytes. A failed or short read
    /// counts the member as unreadable and leaves the lines untouched.
    fn read_member<R: Read>(
        &mut self,
        name: &str,
        variant: DictionaryVariant,
        level: u32,
        reader: R,
        declared: u64,
    ) {
        match read_declared(reader, declared) {
            Ok(content) => self.push_member(name, variant, level, &content),
            Err(e) => {
                log::warn!("skipping unreadable member {}: {}", name, e);
                self.unreadable += 1;
            }
        }
    }

    fn push_member(&mut self, name: &str, variant: DictionaryVariant, level: u32, content: &[u8]) {
        let before = self.lines.len();
        self.lines.extend(decode_lines(content));
        let lines = self.lines.len() - before;

        log::debug!("read {} ({} level {}): {} lines", name, variant, level, lines);
        self.members.push(MemberSummary {
            name: name.to_string(),
            variant,
            level,
            lines,
        });
    }
}

/// Selects and reads word files from an archive
#[derive(Debug, Clone, Copy)]
pub struct ArchiveScanner {
    bounds: LevelBounds,
}

impl ArchiveScanner {
    pub fn new(bounds: LevelBounds) -> Self {
        Self { bounds }
    }

    /// Classify `name` and check its level against the bounds
    fn admit(&self, name: &str, report: &mut ScanReport) -> Option<(DictionaryVariant, u32)> {
        let (variant, level) = classify(name)?;
        if !self.bounds.contains(level) {
            log::trace!("skipping {} (level {} out of bounds)", name, level);
            report.out_of_range += 1;
            return None;
        }
        Some((variant, level))
    }

    /// Scan members that are already in memory
    pub fn scan_members<I>(&self, members: I) -> ScanReport
    where
        I: IntoIterator<Item = ArchiveMember>,
    {
        let mut report = ScanReport::default();
        for member in members {
            if let Some((variant, level)) = self.admit(&member.name, &mut report) {
                report.push_member(&member.name, variant, level, &member.content);
            }
        }
        report
    }

    /// Scan a gzip-compressed tarball on disk
    pub fn scan_path(&self, path: &Path) -> Result<ScanReport> {
        let file = File::open(path).map_err(BuildError::Archive)?;
        self.scan_reader(BufReader::new(file))
    }

    /// Scan a gzip-compressed tar stream.
    ///
    /// A broken gzip stream or tar header aborts the scan. A member whose
    /// path or content cannot be read is skipped and counted.
    pub fn scan_reader<R: Read>(&self, reader: R) -> Result<ScanReport> {
        let mut archive = tar::Archive::new(GzDecoder::new(reader));
        let mut report = ScanReport::default();

        for entry in archive.entries().map_err(BuildError::Archive)? {
            let mut entry = entry.map_err(BuildError::Archive)?;
            if !entry.header().entry_type().is_file() {
                continue;
            }

            let name = match entry.path() {
                Ok(path) => path.to_string_lossy().into_owned(),
                Err(e) => {
                    log::warn!("skipping member with unreadable path: {}", e);
                    report.unreadable += 1;
                    continue;
                }
            };

            let Some((variant, level)) = self.admit(&name, &mut report) else {
                continue;
            };

            let declared = entry.size();
            report.read_member(&name, variant, level, &mut entry, declared);
        }

        Ok(report)
    }
}

/// Read exactly `declared` bytes; a stream that ends early is an error.
/// The up-front reservation is capped at [`MAX_PREALLOC`].
fn read_declared<R: Read>(reader: R, declared: u64) -> io::Result<Vec<u8>> {
    let mut content = Vec::with_capacity(declared.min(MAX_PREALLOC) as usize);
    reader.take(declared).read_to_end(&mut content)?;

    if (content.len() as u64) < declared {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("truncated: {} of {} bytes", content.len(), declared),
        ));
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn tarball(files: &[(&str, &[u8])]) -> Vec<u8> {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (name, content) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, *content).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap()
    }

    /// A single member whose header declares `declared` bytes but is followed
    /// only by `data`
    fn truncated_tarball(name: &str, declared: u64, data: &[u8]) -> Vec<u8> {
        let mut header = tar::Header::new_gnu();
        header.set_path(name).unwrap();
        header.set_size(declared);
        header.set_mode(0o644);
        header.set_cksum();

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(header.as_bytes()).unwrap();
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("read failed"))
        }
    }

    fn bounds() -> LevelBounds {
        LevelBounds::default()
    }

    #[test]
    fn test_classify_known_variants() {
        assert_eq!(classify("english-words.10"), Some((DictionaryVariant::English, 10)));
        assert_eq!(classify("american-words.35"), Some((DictionaryVariant::American, 35)));
        assert_eq!(classify("British-Words.50"), Some((DictionaryVariant::British, 50)));
        assert_eq!(classify("canadian.20"), Some((DictionaryVariant::Canadian, 20)));
        assert_eq!(
            classify("variant_1-words.80"),
            Some((DictionaryVariant::Other("variant_1".into()), 80))
        );
    }

    #[test]
    fn test_classify_wildcard_family() {
        assert_eq!(
            classify("special-hacker-word.50"),
            Some((DictionaryVariant::Other("special-hacker".into()), 50))
        );
    }

    #[test]
    fn test_classify_uses_base_name() {
        assert_eq!(
            classify("scowl-2020.12.07/final/english-words.60"),
            Some((DictionaryVariant::English, 60))
        );
        assert_eq!(classify("english-words.10/readme"), None);
    }

    #[test]
    fn test_classify_rejects_other_names() {
        assert_eq!(classify("english-upper.10"), None);
        assert_eq!(classify("english-abbreviations.10"), None);
        assert_eq!(classify("english-words.10.bak"), None);
        assert_eq!(classify("english-words.txt"), None);
        assert_eq!(classify("english-words."), None);
        assert_eq!(classify("README"), None);
        // Level overflows u32
        assert_eq!(classify("english-words.99999999999"), None);
    }

    #[test]
    fn test_level_bounds() {
        let bounds = bounds();
        assert!(bounds.contains(10));
        assert!(bounds.contains(60));
        assert!(bounds.contains(70));
        assert!(!bounds.contains(85));
        assert!(!bounds.contains(5));
        assert!(LevelBounds::new(70, 10).is_err());
        assert!(LevelBounds::new(50, 50).is_ok());
    }

    #[test]
    fn test_scan_members_level_filter() {
        let scanner = ArchiveScanner::new(bounds());
        let report = scanner.scan_members([
            ArchiveMember::new("final/english-words.60", "apple\nbrick\n"),
            ArchiveMember::new("final/english-words.85", "zymic\n"),
            ArchiveMember::new("final/english-upper.10", "Paris\n"),
        ]);

        assert_eq!(report.files_read(), 1);
        assert_eq!(report.out_of_range, 1);
        assert_eq!(report.lines, vec!["apple", "brick"]);
        assert_eq!(report.members[0].level, 60);
        assert_eq!(report.members[0].lines, 2);
    }

    #[test]
    fn test_scan_reader_reads_qualifying_files() {
        let data = tarball(&[
            ("scowl/final/english-words.10", b"apple\nbrick\n"),
            ("scowl/final/american-words.20", b"color\n# note\n"),
            ("scowl/final/english-words.95", b"zymic\n"),
            ("scowl/README", b"hello world\n"),
        ]);

        let report = ArchiveScanner::new(bounds()).scan_reader(&data[..]).unwrap();
        assert_eq!(report.files_read(), 2);
        assert_eq!(report.out_of_range, 1);
        assert_eq!(report.unreadable, 0);

        let mut lines = report.lines.clone();
        lines.sort();
        assert_eq!(lines, vec!["# note", "apple", "brick", "color"]);
    }

    #[test]
    fn test_scan_reader_invalid_utf8_dropped() {
        let data = tarball(&[("english-words.10", b"caf\xe9\nfjord\n")]);
        let report = ArchiveScanner::new(bounds()).scan_reader(&data[..]).unwrap();
        assert_eq!(report.lines, vec!["caf", "fjord"]);
    }

    #[test]
    fn test_scan_reader_oversized_member_header() {
        let data = truncated_tarball("english-words.10", 1 << 40, b"abcd");
        let result = ArchiveScanner::new(bounds()).scan_reader(&data[..]);
        assert!(matches!(result, Err(BuildError::Archive(_))));
    }

    #[test]
    fn test_unreadable_member_skipped() {
        let english = DictionaryVariant::English;
        let mut report = ScanReport::default();
        report.read_member("english-words.10", english.clone(), 10, FailingReader, 6);
        report.read_member("english-words.20", english.clone(), 20, &b"abcd"[..], 1 << 40);
        report.read_member("english-words.35", english, 35, &b"apple\n"[..], 6);

        assert_eq!(report.unreadable, 2);
        assert_eq!(report.files_read(), 1);
        assert_eq!(report.members[0].level, 35);
        assert_eq!(report.lines, vec!["apple"]);
    }

    #[test]
    fn test_read_declared_exact() {
        assert_eq!(read_declared(&b"apple\nbrick"[..], 6).unwrap(), b"apple\n");
        let err = read_declared(&b"app"[..], 6).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_scan_reader_corrupt_archive() {
        let result = ArchiveScanner::new(bounds()).scan_reader(&b"definitely not gzip"[..]);
        assert!(matches!(result, Err(BuildError::Archive(_))));
    }

    #[test]
    fn test_scan_path_missing_file() {
        let result =
            ArchiveScanner::new(bounds()).scan_path(Path::new("/nonexistent/scowl.tar.gz"));
        assert!(matches!(result, Err(BuildError::Archive(_))));
    }
}
