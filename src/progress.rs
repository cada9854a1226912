//! Progress display module
//!
//! Styled console messages, the download progress bar and the final run
//! summary.

use bytesize::ByteSize;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};

use crate::download::ProgressObserver;
use crate::filter::{FilterStats, WordSet};

/// Print the application banner
pub fn print_banner() {
    let banner = r#"
╔══════════════════════════════════════════════════════════╗
║              SCOWL → 5-Letter Word List Builder          ║
╚══════════════════════════════════════════════════════════╝"#;

    println!("{}", banner.green());
}

/// Print a section header
pub fn print_header(text: &str) {
    println!("\n{} {}", "▶".green(), text.green().bold());
}

/// Print an info message
pub fn print_info(text: &str) {
    println!("  {} {}", "ℹ".cyan(), text);
}

/// Print a success message
pub fn print_success(text: &str) {
    println!("  {} {}", "✔".green(), text.green());
}

/// Print a warning message
pub fn print_warning(text: &str) {
    println!("  {} {}", "⚠".yellow(), text.yellow());
}

/// Print an error message
pub fn print_error(text: &str) {
    eprintln!("  {} {}", "✖".red(), text.red());
}

/// Create a styled spinner for indeterminate progress
pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();

    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {bytes} {msg}")
            .unwrap()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
    );

    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    pb
}

/// Create a bytes-based progress bar
pub fn create_bytes_progress_bar(total_bytes: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(total_bytes);

    pb.set_style(
        ProgressStyle::default_bar()
            .template(concat!(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.green/dim}] ",
                "{bytes}/{total_bytes} ({bytes_per_sec}) {msg}"
            ))
            .unwrap()
            .progress_chars("█▓░"),
    );

    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    pb
}

/// Download progress shown as a bar, or a spinner when the size is unknown
#[derive(Default)]
pub struct DownloadProgress {
    bar: Option<ProgressBar>,
}

impl DownloadProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressObserver for DownloadProgress {
    fn on_progress(&mut self, downloaded: u64, total: Option<u64>) {
        let bar = self.bar.get_or_insert_with(|| match total {
            Some(total) => create_bytes_progress_bar(total, "Downloading..."),
            None => create_spinner("Downloading..."),
        });
        bar.set_position(downloaded);
    }

    fn on_finish(&mut self, downloaded: u64) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
        print_info(&format!("Downloaded {}", ByteSize(downloaded)));
    }
}

/// Counters for one build run
#[derive(Debug)]
pub struct ProcessingStats {
    pub downloaded_bytes: Option<u64>,
    pub files_read: usize,
    pub files_out_of_range: usize,
    pub files_unreadable: usize,
    pub raw_lines: usize,
    pub filter: FilterStats,
    pub start_time: Instant,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self {
            downloaded_bytes: None,
            files_read: 0,
            files_out_of_range: 0,
            files_unreadable: 0,
            raw_lines: 0,
            filter: FilterStats::default(),
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Print final statistics
    pub fn print_summary(&self, words: &WordSet) {
        let filter = &self.filter;

        println!();
        println!("{}", "═".repeat(60).green());
        println!("{}", "                      BUILD COMPLETE".green().bold());
        println!("{}", "═".repeat(60).green());
        println!();

        if let Some(bytes) = self.downloaded_bytes {
            println!("  {} {}", "Downloaded:     ".green(), ByteSize(bytes));
        }
        println!("  {} {}", "Word files read:".green(), self.files_read);
        println!(
            "  {} {}",
            "Out of range:   ".green(),
            self.files_out_of_range
        );
        if self.files_unreadable > 0 {
            println!(
                "  {} {}",
                "Unreadable:     ".red(),
                self.files_unreadable.to_string().red()
            );
        }
        println!();

        println!(
            "  {} {}",
            "Raw lines:      ".green(),
            format_number(self.raw_lines as u64)
        );
        println!(
            "  {} {}",
            "Wrong length:   ".yellow(),
            format_number(filter.wrong_length)
        );
        println!(
            "  {} {}",
            "Not a-z:        ".yellow(),
            format_number(filter.non_alphabetic + filter.non_ascii)
        );
        println!(
            "  {} {}",
            "Duplicates:     ".yellow(),
            format_number(filter.duplicate)
        );
        println!(
            "  {} {}",
            "Unique words:   ".green().bold(),
            format_number(words.len() as u64).green().bold()
        );

        let (head, tail) = words.sample(5);
        println!();
        println!(
            "  {} {} … {}",
            "Sample:         ".green(),
            head.join(", "),
            tail.join(", ")
        );
        println!("  {} {}", "Duration:       ".green(), format_duration(self.elapsed()));
        println!();
        println!("{}", "═".repeat(60).green());
    }
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a number with thousand separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}

/// Format duration as human-readable string
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{:.1}s", duration.as_secs_f64())
    } else if secs < 3600 {
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{}m {}s", mins, secs)
    } else {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        format!("{}h {}m", hours, mins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(123), "123");
        assert_eq!(format_number(1234), "1,234");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(30)), "30.0s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_secs(3661)), "1h 1m");
    }

    #[test]
    fn test_stats_start_empty() {
        let stats = ProcessingStats::new();
        assert_eq!(stats.files_read, 0);
        assert_eq!(stats.raw_lines, 0);
        assert_eq!(stats.filter.total(), 0);
        assert!(stats.downloaded_bytes.is_none());
    }
}
