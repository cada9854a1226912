//! # Five Letter Words
//!
//! Builds a curated list of five-letter English words from the SCOWL
//! (Spell Checker Oriented Word Lists) archive.
//!
//! ## Pipeline
//!
//! - **Resolve**: ask the GitHub releases API for the latest tarball, or fall back to a fixed URL
//! - **Download**: stream the tarball into a scratch directory that is always removed
//! - **Scan**: read every `*-words.N` file whose size level N is within bounds
//! - **Filter**: keep ASCII-only alphabetic tokens of exactly five letters, lowercased, once
//! - **Write**: `five_letter_words.txt` and `five_letter_words.json`
//!
//! ## Usage
//!
//! ```bash
//! # Standard build (levels 10-70) into the current directory
//! five-letter-words
//!
//! # Scan a tarball that is already on disk
//! five-letter-words --archive scowl.tar.gz --max-level 95
//! ```
//!
//! ## Example
//!
//! ```rust
//! use five_letter_words::filter::filter_words;
//!
//! let words = filter_words(["Apple", "APPLE", "ab'cd", "fjord", "#note"]).unwrap();
//! assert_eq!(words.as_slice(), ["apple", "fjord"]);
//! ```

pub mod archive;
pub mod cli;
pub mod dedup;
pub mod download;
pub mod encoding;
pub mod error;
pub mod filter;
pub mod output;
pub mod processor;
pub mod progress;
pub mod resolver;

pub use archive::{classify, ArchiveScanner, DictionaryVariant, LevelBounds};
pub use cli::Args;
pub use error::BuildError;
pub use filter::{filter_words, WordSet};
pub use processor::{Processor, ProcessorConfig};
