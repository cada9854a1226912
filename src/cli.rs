//! Command-line interface definition for five-letter-words
//!
//! Every option has a default, so a bare invocation reproduces the standard
//! build: SCOWL levels 10 through 70, outputs in the current directory.

use clap::Parser;
use std::path::PathBuf;

use crate::processor::{
    DEFAULT_FALLBACK_URL, DEFAULT_MAX_LEVEL, DEFAULT_METADATA_URL, DEFAULT_MIN_LEVEL,
};

/// Build a list of five-letter English words from SCOWL
#[derive(Parser, Debug, Clone)]
#[command(
    name = "five-letter-words",
    author = "m0h1nd4",
    version,
    about = "Build a curated list of five-letter English words from SCOWL",
    long_about = r#"
Downloads the latest SCOWL (Spell Checker Oriented Word Lists) release,
reads every word file whose size level falls within the configured bounds,
and writes the unique five-letter words as both plain text and JSON.

SIZE LEVELS:
    10-70   common English (default)
    80-95   rare and technical words

EXAMPLES:
    # Standard build into the current directory
    five-letter-words

    # Larger but noisier list
    five-letter-words --max-level 95

    # Use an already downloaded tarball
    five-letter-words --archive scowl-master.tar.gz -o out/
"#
)]
pub struct Args {
    /// Output directory (default: current directory)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Lowest SCOWL size level to include
    #[arg(long, value_name = "LEVEL", default_value_t = DEFAULT_MIN_LEVEL)]
    pub min_level: u32,

    /// Highest SCOWL size level to include
    #[arg(long, value_name = "LEVEL", default_value_t = DEFAULT_MAX_LEVEL)]
    pub max_level: u32,

    /// Scan a local .tar.gz archive instead of downloading one
    #[arg(short, long, value_name = "PATH")]
    pub archive: Option<PathBuf>,

    /// Release metadata endpoint used to find the latest tarball
    #[arg(long, value_name = "URL", default_value = DEFAULT_METADATA_URL)]
    pub metadata_url: String,

    /// Tarball URL used when the metadata endpoint is unavailable
    #[arg(long, value_name = "URL", default_value = DEFAULT_FALLBACK_URL)]
    pub fallback_url: String,

    /// Directory for the scratch download (default: system temp directory)
    #[arg(long, value_name = "DIR")]
    pub temp_dir: Option<PathBuf>,

    /// Quiet mode - minimal output
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// Verbose output
    #[arg(short, long, default_value_t = false, conflicts_with = "quiet")]
    pub verbose: bool,
}

impl Args {
    /// Get output directory, defaulting to current directory
    pub fn get_output_dir(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["five-letter-words"]).unwrap();
        assert_eq!(args.min_level, 10);
        assert_eq!(args.max_level, 70);
        assert!(args.archive.is_none());
        assert!(args.temp_dir.is_none());
        assert_eq!(args.get_output_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_level_overrides() {
        let args = Args::try_parse_from([
            "five-letter-words",
            "--min-level",
            "20",
            "--max-level",
            "95",
            "-o",
            "out",
            "--temp-dir",
            "scratch",
        ])
        .unwrap();
        assert_eq!(args.min_level, 20);
        assert_eq!(args.max_level, 95);
        assert_eq!(args.get_output_dir(), PathBuf::from("out"));
        assert_eq!(args.temp_dir, Some(PathBuf::from("scratch")));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["five-letter-words", "-q", "-v"]).is_err());
    }
}
