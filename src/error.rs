//! CLI Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Errors from the render and config
//! crates are re-raised here with their kind preserved, so the message the
//! user sees is the one the failing component produced.

use derive_more::{Display, Error};
use exn::Exn;
use html2pdf_config::error::{Error as ConfigError, ErrorKind as ConfigErrorKind};
use html2pdf_render::error::{Error as RenderError, ErrorKind as RenderErrorKind};
use std::path::{Path, PathBuf};

/// A CLI error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// No file argument, no `--base64`, and nothing usable on standard input.
    #[display("no input provided: pass an HTML file, --base64, or pipe HTML on stdin")]
    NoInputProvided,
    /// `--base64` was not valid base64, or did not decode to UTF-8 text.
    #[display("invalid base64 input")]
    InvalidBase64,
    /// Standard input could not be read, or was not UTF-8 text.
    #[display("failed to read standard input")]
    Stdin,
    #[display("{_0}")]
    Config(ConfigErrorKind),
    #[display("{_0}")]
    Render(RenderErrorKind),
    /// The clock could not be formatted into an output file name.
    #[display("failed to generate output file name")]
    Timestamp,
    /// Creating or writing a file failed. `reason` is the operating system's message.
    #[display("failed to write {}: {reason}", path.display())]
    Io { path: PathBuf, reason: String },
    /// Writing to standard output failed (e.g. a closed pipe).
    #[display("failed to write to standard output")]
    Stdout,
}
impl ErrorKind {
    /// Re-raise a render error, keeping its `Exn` frame as a child.
    #[track_caller]
    pub fn render(err: RenderError) -> Error {
        let inner = (*err).clone();
        err.raise(ErrorKind::Render(inner))
    }

    /// Re-raise a configuration error, keeping its `Exn` frame as a child.
    #[track_caller]
    pub fn config(err: ConfigError) -> Error {
        let inner = (*err).clone();
        err.raise(ErrorKind::Config(inner))
    }

    /// Map an I/O failure on `path` into [`ErrorKind::Io`], keeping its message.
    pub fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
        move |err| Exn::new(Self::Io { path: path.to_path_buf(), reason: err.to_string() })
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Render(kind) => kind.is_retryable(),
            Self::Io { .. } | Self::Stdout => true,
            _ => false,
        }
    }
}
