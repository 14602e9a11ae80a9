use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use std::path::{Path, PathBuf};
use url::Url;

/// What to convert: an optional file path and/or inline HTML.
///
/// Inline HTML wins when both are given.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Request {
    pub file: Option<PathBuf>,
    pub html: Option<String>,
}
impl Request {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self { file: Some(path.into()), html: None }
    }

    pub fn html(html: impl Into<String>) -> Self {
        Self { file: None, html: Some(html.into()) }
    }

    /// Pick the source to load. File paths are made absolute against the
    /// current directory and must exist.
    pub fn resolve(&self) -> Result<Source> {
        if let Some(html) = self.html.as_deref().filter(|h| !h.is_empty()) {
            return Ok(Source::Html(html.to_string()));
        }
        let Some(file) = &self.file else {
            exn::bail!(ErrorKind::NoInputProvided);
        };
        let absolute = std::path::absolute(file).or_raise(|| ErrorKind::InvalidInput(file.display().to_string()))?;
        if !absolute.exists() {
            exn::bail!(ErrorKind::InputNotFound(absolute));
        }
        Ok(Source::File(absolute))
    }
}

/// A resolved, loadable input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    /// Absolute path to an existing HTML file.
    File(PathBuf),
    Html(String),
}
impl Source {
    /// The `file://` URL a browser should navigate to, for file sources.
    pub fn url(&self) -> Result<Option<Url>> {
        match self {
            Self::File(path) => file_url(path).map(Some),
            Self::Html(_) => Ok(None),
        }
    }

    /// Short description for log lines.
    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Html(html) => format!("inline HTML ({} bytes)", html.len()),
        }
    }
}

pub(crate) fn file_url(path: &Path) -> Result<Url> {
    Url::from_file_path(path).ok().ok_or_raise(|| ErrorKind::InvalidInput(path.display().to_string()))
}

/// Swap a trailing `.htm`/`.html` extension (any case) for `.pdf`.
///
/// Returns `None` when the path has no HTML extension, so that the output can
/// never overwrite its own input.
pub fn derive_output_path(input: impl AsRef<Path>) -> Option<PathBuf> {
    let input = input.as_ref();
    let ext = input.extension()?.to_str()?;
    if ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm") {
        Some(input.with_extension("pdf"))
    } else {
        None
    }
}
