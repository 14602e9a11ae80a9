//! Conversion and output routing.

use crate::error::{ErrorKind, Result};
use crate::input::Input;
use crate::output::Destination;
use exn::ResultExt;
use html2pdf_render::{Converter, Driver};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// What [`deliver`] ended up doing with the PDF.
#[derive(Debug, PartialEq, Eq)]
pub enum Delivered {
    Streamed { bytes: usize, copy: Option<PathBuf> },
    Written(PathBuf),
}

/// Convert `input` and route the PDF to `destination`.
///
/// `out` is standard output in the binary. It receives either the raw PDF,
/// the bare output path, or human-readable progress lines, never a mix.
pub async fn deliver<D, W>(
    converter: &Converter<D>,
    input: &Input,
    destination: &Destination,
    out: &mut W,
) -> Result<Delivered>
where
    D: Driver,
    W: AsyncWrite + Unpin,
{
    // Input problems surface before a browser is launched.
    let source = input.request().resolve().map_err(ErrorKind::render)?;

    match destination {
        Destination::Stdout { save_copy } => {
            let pdf = converter.render(&source).await.map_err(ErrorKind::render)?;
            if let Some(copy) = save_copy {
                write_file(copy, &pdf).await?;
                tracing::info!(path = %copy.display(), "Saved copy of streamed PDF");
            }
            out.write_all(&pdf).await.or_raise(|| ErrorKind::Stdout)?;
            out.flush().await.or_raise(|| ErrorKind::Stdout)?;
            Ok(Delivered::Streamed { bytes: pdf.len(), copy: save_copy.clone() })
        },
        Destination::File { path, print_path } => {
            if !print_path {
                say(out, &format!("Converting {}...", input.describe())).await?;
            }
            create_parent(path).await?;
            let written = converter.render_to(&source, path).await.map_err(ErrorKind::render)?;
            if *print_path {
                say(out, &written.display().to_string()).await?;
            } else {
                say(out, &format!("Conversion complete: {}", written.display())).await?;
            }
            Ok(Delivered::Written(written))
        },
    }
}

async fn say<W: AsyncWrite + Unpin>(out: &mut W, line: &str) -> Result<()> {
    out.write_all(line.as_bytes()).await.or_raise(|| ErrorKind::Stdout)?;
    out.write_all(b"\n").await.or_raise(|| ErrorKind::Stdout)?;
    out.flush().await.or_raise(|| ErrorKind::Stdout)
}

async fn create_parent(path: &Path) -> Result<()> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    tokio::fs::create_dir_all(parent).await.map_err(ErrorKind::io(parent))
}

async fn write_file(path: &Path, pdf: &[u8]) -> Result<()> {
    create_parent(path).await?;
    tokio::fs::write(path, pdf).await.map_err(ErrorKind::io(path))
}
