//! Archive download
//!
//! Streams the tarball to disk in fixed-size chunks so memory use does not
//! grow with the archive. Progress goes to a [`ProgressObserver`], which may
//! do nothing.

use reqwest::blocking::Client;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;
use std::time::Duration;

use crate::error::{BuildError, Result};
use crate::resolver::USER_AGENT;

/// Bounded wait for the archive transfer
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Transfer chunk size (64KB)
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Receives transfer progress
pub trait ProgressObserver {
    /// Called after every chunk. `total` comes from `Content-Length` when the
    /// server sent one.
    fn on_progress(&mut self, downloaded: u64, total: Option<u64>);

    /// Called once the transfer has completed
    fn on_finish(&mut self, _downloaded: u64) {}
}

/// Observer that ignores progress
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _downloaded: u64, _total: Option<u64>) {}
}

/// Copy `reader` to `writer` chunk by chunk, reporting progress
pub fn copy_with_progress<R, W>(
    reader: &mut R,
    writer: &mut W,
    total: Option<u64>,
    observer: &mut dyn ProgressObserver,
) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut downloaded = 0u64;

    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buffer[..read])?;
        downloaded += read as u64;
        observer.on_progress(downloaded, total);
    }

    writer.flush()?;
    observer.on_finish(downloaded);
    Ok(downloaded)
}

/// Blocking single-attempt downloader
#[derive(Debug, Clone)]
pub struct Downloader {
    timeout: Duration,
}

impl Downloader {
    pub fn new() -> Self {
        Self {
            timeout: DOWNLOAD_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Download `url` into `dest`. Returns the number of bytes written.
    pub fn download_to(
        &self,
        url: &str,
        dest: &Path,
        observer: &mut dyn ProgressObserver,
    ) -> Result<u64> {
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| BuildError::download(url, e))?;

        let mut response = client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| BuildError::download(url, e))?;

        let total = response.content_length().filter(|&len| len > 0);
        log::debug!("downloading {} ({:?} bytes)", url, total);

        let file = File::create(dest).map_err(|e| BuildError::download(url, e))?;
        let mut writer = BufWriter::new(file);

        copy_with_progress(&mut response, &mut writer, total, observer)
            .map_err(|e| BuildError::download(url, e))
    }
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new()
    }
}
