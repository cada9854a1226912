//! Build pipeline
//!
//! Resolve the archive URL, download it into a scratch directory, scan the
//! word files, filter the words and write both outputs. Nothing is written
//! until the word set is final.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bytesize::ByteSize;
use tempfile::TempDir;

use crate::archive::{ArchiveScanner, LevelBounds, ScanReport};
use crate::cli::Args;
use crate::download::{Downloader, NoProgress, ProgressObserver, DOWNLOAD_TIMEOUT};
use crate::error::{BuildError, Result};
use crate::filter::{WordFilter, WordSet};
use crate::output::{ensure_output_dir, write_outputs, OutputPaths};
use crate::progress::{
    format_number, print_header, print_info, print_success, print_warning, DownloadProgress,
    ProcessingStats,
};
use crate::resolver::{ResolvedSource, SourceOrigin, SourceResolver, METADATA_TIMEOUT};

/// GitHub API endpoint for the latest SCOWL release
pub const DEFAULT_METADATA_URL: &str =
    "https://api.github.com/repos/en-us/scowl/releases/latest";

/// Tarball used when the release API is unreachable
pub const DEFAULT_FALLBACK_URL: &str =
    "https://github.com/en-us/scowl/archive/refs/heads/master.tar.gz";

pub use crate::archive::{DEFAULT_MAX_LEVEL, DEFAULT_MIN_LEVEL};

const ARCHIVE_FILE_NAME: &str = "scowl.tar.gz";

/// Name prefix of the scratch directory holding the download
pub const SCRATCH_PREFIX: &str = "scowl_";

/// Processor configuration
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    pub metadata_url: String,
    pub fallback_url: String,
    pub bounds: LevelBounds,
    pub output_dir: PathBuf,
    /// Local tarball to scan instead of downloading
    pub archive: Option<PathBuf>,
    /// Parent of the scratch directory; the system temp directory if unset
    pub temp_dir: Option<PathBuf>,
    pub metadata_timeout: Duration,
    pub download_timeout: Duration,
    pub quiet: bool,
    pub verbose: bool,
}

impl ProcessorConfig {
    pub fn from_args(args: &Args) -> Result<Self> {
        Ok(Self {
            metadata_url: args.metadata_url.clone(),
            fallback_url: args.fallback_url.clone(),
            bounds: LevelBounds::new(args.min_level, args.max_level)?,
            output_dir: args.get_output_dir(),
            archive: args.archive.clone(),
            temp_dir: args.temp_dir.clone(),
            metadata_timeout: METADATA_TIMEOUT,
            download_timeout: DOWNLOAD_TIMEOUT,
            quiet: args.quiet,
            verbose: args.verbose,
        })
    }

    pub fn output_paths(&self) -> OutputPaths {
        OutputPaths::in_dir(&self.output_dir)
    }
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            metadata_url: DEFAULT_METADATA_URL.to_string(),
            fallback_url: DEFAULT_FALLBACK_URL.to_string(),
            bounds: LevelBounds::default(),
            output_dir: PathBuf::from("."),
            archive: None,
            temp_dir: None,
            metadata_timeout: METADATA_TIMEOUT,
            download_timeout: DOWNLOAD_TIMEOUT,
            quiet: false,
            verbose: false,
        }
    }
}

/// Result of a successful run
#[derive(Debug)]
pub struct BuildSummary {
    /// `None` when a local archive was scanned
    pub source: Option<ResolvedSource>,
    pub words: WordSet,
    pub stats: ProcessingStats,
}

/// Main processor
pub struct Processor {
    config: ProcessorConfig,
}

impl Processor {
    pub fn new(config: ProcessorConfig) -> Self {
        Self { config }
    }

    /// Run the whole build
    pub fn process(&self) -> Result<BuildSummary> {
        let mut stats = ProcessingStats::new();

        let (source, report) = match self.config.archive {
            Some(ref path) => (None, self.scan_local(path)?),
            None => {
                let source = self.resolve();
                let report = self.fetch_and_scan(&source, &mut stats)?;
                (Some(source), report)
            }
        };

        stats.files_read = report.files_read();
        stats.files_out_of_range = report.out_of_range;
        stats.files_unreadable = report.unreadable;
        stats.raw_lines = report.lines.len();

        let words = self.filter(report)?;
        stats.filter = words.stats();

        self.write(&words, &self.config.output_paths())?;

        Ok(BuildSummary {
            source,
            words,
            stats,
        })
    }

    fn resolve(&self) -> ResolvedSource {
        if !self.config.quiet {
            print_header("Resolving latest SCOWL release...");
        }

        let resolver = SourceResolver::new(&self.config.metadata_url, &self.config.fallback_url)
            .with_timeout(self.config.metadata_timeout);
        let source = resolver.resolve();

        if !self.config.quiet {
            match source.origin {
                SourceOrigin::Release => {
                    print_info(&format!(
                        "Latest release tag : {}",
                        source.tag.as_deref().unwrap_or("unknown")
                    ));
                    print_info(&format!("Tarball URL        : {}", source.url));
                }
                SourceOrigin::Fallback => {
                    print_info(&format!("Fallback URL: {}", source.url));
                }
            }
        }

        source
    }

    /// Download into a scratch directory and scan it there. The directory is
    /// removed when this returns, whether or not the scan succeeded.
    fn fetch_and_scan(
        &self,
        source: &ResolvedSource,
        stats: &mut ProcessingStats,
    ) -> Result<ScanReport> {
        let scratch = self
            .scratch_dir()
            .map_err(|e| BuildError::download(&source.url, e))?;
        let tarball = scratch.path().join(ARCHIVE_FILE_NAME);

        if !self.config.quiet {
            print_header("Downloading SCOWL...");
        }

        let mut silent = NoProgress;
        let mut bar = DownloadProgress::new();
        let observer: &mut dyn ProgressObserver = if self.config.quiet {
            &mut silent
        } else {
            &mut bar
        };

        let downloader = Downloader::new().with_timeout(self.config.download_timeout);
        let bytes = downloader.download_to(&source.url, &tarball, observer)?;
        stats.downloaded_bytes = Some(bytes);
        log::debug!("saved {} bytes to {:?}", bytes, tarball);

        self.scan(&tarball)
    }

    fn scratch_dir(&self) -> io::Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX);
        match self.config.temp_dir {
            Some(ref parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        }
    }

    fn scan_local(&self, path: &Path) -> Result<ScanReport> {
        if !self.config.quiet {
            print_header("Using local archive...");
            print_info(&format!("Archive: {:?}", path));
        }
        self.scan(path)
    }

    fn scan(&self, tarball: &Path) -> Result<ScanReport> {
        let bounds = self.config.bounds;
        if !self.config.quiet {
            print_header(&format!(
                "Extracting word files (levels {}-{})...",
                bounds.min(),
                bounds.max()
            ));
        }

        let report = ArchiveScanner::new(bounds).scan_path(tarball)?;

        if !self.config.quiet {
            print_info(&format!(
                "{} word files read → {} raw lines",
                report.files_read(),
                format_number(report.lines.len() as u64)
            ));
            if self.config.verbose {
                for member in &report.members {
                    print_info(&format!("  {} ({} lines)", member.name, member.lines));
                }
            }
            if report.unreadable > 0 {
                print_warning(&format!("{} word files could not be read", report.unreadable));
            }
        }

        Ok(report)
    }

    fn filter(&self, report: ScanReport) -> Result<WordSet> {
        if !self.config.quiet {
            print_header("Filtering, deduplicating, and sorting...");
        }

        let mut filter = WordFilter::new();
        filter.extend(report.lines);
        let words = filter.finish()?;

        if !self.config.quiet {
            print_info(&format!(
                "{} unique 5-letter words retained",
                format_number(words.len() as u64)
            ));
        }

        Ok(words)
    }

    fn write(&self, words: &WordSet, paths: &OutputPaths) -> Result<()> {
        if !self.config.quiet {
            print_header("Saving output files...");
        }

        ensure_output_dir(&self.config.output_dir)?;
        let report = write_outputs(words, paths)?;

        if !self.config.quiet {
            print_success(&format!(
                "{:?} ({} words, {})",
                paths.text,
                words.len(),
                ByteSize(report.text_bytes)
            ));
            print_success(&format!("{:?} ({})", paths.json, ByteSize(report.json_bytes)));
        }

        Ok(())
    }
}
