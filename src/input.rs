//! Input resolution: file argument, `--base64`, or piped standard input.

use crate::error::{ErrorKind, Result};
use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use exn::ResultExt;
use html2pdf_render::Request;
use std::io::IsTerminal;
use std::path::PathBuf;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Standard alphabet, padding optional.
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Where the HTML came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    File(PathBuf),
    /// Decoded `--base64` content.
    Base64(String),
    Stdin(String),
}
impl Input {
    pub fn request(&self) -> Request {
        match self {
            Self::File(path) => Request::file(path),
            Self::Base64(html) | Self::Stdin(html) => Request::html(html.as_str()),
        }
    }

    /// Short description for progress lines.
    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Base64(_) => "base64 input".to_string(),
            Self::Stdin(_) => "standard input".to_string(),
        }
    }
}

/// Pick the input by priority: file argument, then `--base64`, then `stdin`.
///
/// `stdin` should be `None` when standard input is an interactive terminal
/// (see [`piped_stdin`]); it is only read when nothing else was given. Empty
/// values count as absent.
pub async fn resolve<R>(file: Option<PathBuf>, base64: Option<&str>, stdin: Option<R>) -> Result<Input>
where
    R: AsyncRead + Unpin,
{
    if let Some(file) = file {
        return Ok(Input::File(file));
    }
    // `base64` wraps its output at 76 columns.
    let encoded: Vec<u8> = base64.unwrap_or_default().bytes().filter(|c| !c.is_ascii_whitespace()).collect();
    if !encoded.is_empty() {
        let decoded = BASE64.decode(encoded).or_raise(|| ErrorKind::InvalidBase64)?;
        let html = String::from_utf8(decoded).or_raise(|| ErrorKind::InvalidBase64)?;
        return Ok(Input::Base64(html));
    }
    if let Some(stdin) = stdin {
        let html = read_to_completion(stdin).await?;
        if !html.is_empty() {
            return Ok(Input::Stdin(html));
        }
        tracing::debug!("Standard input was empty");
    }
    exn::bail!(ErrorKind::NoInputProvided);
}

/// Buffer everything `reader` yields until end-of-stream.
pub async fn read_to_completion<R>(mut reader: R) -> Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut html = String::new();
    reader.read_to_string(&mut html).await.or_raise(|| ErrorKind::Stdin)?;
    tracing::debug!(bytes = html.len(), "Read HTML from standard input");
    Ok(html)
}

/// Standard input, unless it is attached to a terminal.
pub fn piped_stdin() -> Option<tokio::io::Stdin> {
    if std::io::stdin().is_terminal() { None } else { Some(tokio::io::stdin()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HI: &str = "<html><body>Hi</body></html>";
    const HI_BASE64: &str = "PGh0bWw+PGJvZHk+SGk8L2JvZHk+PC9odG1sPg==";

    fn no_stdin() -> Option<Cursor<Vec<u8>>> {
        None
    }

    fn stdin(data: &str) -> Option<Cursor<Vec<u8>>> {
        Some(Cursor::new(data.as_bytes().to_vec()))
    }

    #[tokio::test]
    async fn file_beats_everything() {
        let input = resolve(Some("page.html".into()), Some(HI_BASE64), stdin(HI)).await.unwrap();
        assert_eq!(input, Input::File("page.html".into()));
    }

    #[tokio::test]
    async fn base64_beats_stdin() {
        let input = resolve(None, Some(HI_BASE64), stdin("<p>piped</p>")).await.unwrap();
        assert_eq!(input, Input::Base64(HI.to_string()));
    }

    #[tokio::test]
    async fn piped_stdin_is_read() {
        let input = resolve(None, None, stdin(HI)).await.unwrap();
        assert_eq!(input, Input::Stdin(HI.to_string()));
        assert_eq!(input.request(), Request::html(HI));
    }

    #[tokio::test]
    async fn interactive_stdin_is_no_input() {
        let err = resolve(None, None, no_stdin()).await.unwrap_err();
        assert!(matches!(*err, ErrorKind::NoInputProvided));
    }

    #[tokio::test]
    async fn empty_sources_are_no_input() {
        let err = resolve(None, Some("  "), stdin("")).await.unwrap_err();
        assert!(matches!(*err, ErrorKind::NoInputProvided));
    }

    #[tokio::test]
    async fn wrapped_base64() {
        let html = format!("<html><body>{}</body></html>", "Hello, world! ".repeat(8));
        let encoded = BASE64.encode(&html);
        let wrapped = encoded.as_bytes().chunks(76).map(|c| std::str::from_utf8(c).unwrap()).collect::<Vec<_>>().join("\n");
        assert!(wrapped.contains('\n'));
        let input = resolve(None, Some(&format!("{wrapped}\n")), no_stdin()).await.unwrap();
        assert_eq!(input, Input::Base64(html));
    }

    #[tokio::test]
    async fn unpadded_base64() {
        let unpadded = HI_BASE64.trim_end_matches('=');
        let input = resolve(None, Some(unpadded), no_stdin()).await.unwrap();
        assert_eq!(input, Input::Base64(HI.to_string()));
    }

    #[tokio::test]
    async fn bad_base64() {
        let err = resolve(None, Some("not base64!"), no_stdin()).await.unwrap_err();
        assert!(matches!(*err, ErrorKind::InvalidBase64));
        // Valid base64, but not UTF-8.
        let err = resolve(None, Some("/w=="), no_stdin()).await.unwrap_err();
        assert!(matches!(*err, ErrorKind::InvalidBase64));
    }

    #[tokio::test]
    async fn non_utf8_stdin() {
        let err = read_to_completion(Cursor::new(vec![0xff, 0xfe])).await.unwrap_err();
        assert!(matches!(*err, ErrorKind::Stdin));
    }

    #[test]
    fn file_request() {
        let input = Input::File("docs/index.html".into());
        assert_eq!(input.request(), Request::file("docs/index.html"));
        assert_eq!(input.describe(), "docs/index.html");
    }
}
