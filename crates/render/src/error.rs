//! Render Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use exn::Exn;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A render error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for render operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
/// Variants carrying a `String` hold the browser's own message verbatim.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input file path does not exist. Checked before any browser launch.
    #[display("input file not found: {}", _0.display())]
    InputNotFound(#[error(not(source))] PathBuf),
    /// Neither an input file nor inline HTML content was supplied.
    #[display("no input file or HTML content provided")]
    NoInputProvided,
    /// Input was supplied but cannot be loaded (e.g. a path that has no `file://` form).
    #[display("invalid input: {_0}")]
    InvalidInput(#[error(not(source))] String),
    #[display("chrome/chromium not detected on your system")]
    ChromeNotFound,
    /// The browser process could not be started or connected to.
    #[display("failed to launch browser: {_0}")]
    Launch(#[error(not(source))] String),
    /// Opening a page or loading content into it failed.
    #[display("failed to load page: {_0}")]
    Navigation(#[error(not(source))] String),
    /// The page did not reach network-idle before the readiness timeout.
    #[display("page did not settle within {}s", _0.as_secs_f32())]
    Timeout(#[error(not(source))] Duration),
    /// Chrome refused or failed to produce the PDF.
    #[display("failed to print PDF: {_0}")]
    Print(#[error(not(source))] String),
    /// The browser process did not shut down cleanly.
    #[display("failed to close browser: {_0}")]
    Close(#[error(not(source))] String),
    /// Writing the PDF failed. `reason` is the operating system's message.
    #[display("failed to write {}: {reason}", path.display())]
    Io { path: PathBuf, reason: String },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Timeout(_))
    }

    /// Map an I/O failure on `path` into [`ErrorKind::Io`], keeping its message.
    pub fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
        move |err| Exn::new(Self::Io { path: path.to_path_buf(), reason: err.to_string() })
    }
}
