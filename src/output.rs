//! Where a finished PDF goes.

use crate::cli::Cli;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::path::{Path, PathBuf};
use time::UtcDateTime;
use time::macros::format_description;

/// Output routing, decided once after argument parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Destination {
    /// Raw PDF bytes on standard output, optionally also saved to a file.
    Stdout { save_copy: Option<PathBuf> },
    /// A file on disk. With `print_path`, standard output carries only the path.
    File { path: PathBuf, print_path: bool },
}

impl Destination {
    /// `--stdout` wins over `--output`; without either, a timestamped file
    /// name is generated inside `output_dir`.
    pub fn select(cli: &Cli, output_dir: &Path, now: UtcDateTime) -> Result<Self> {
        if cli.stdout {
            return Ok(Self::Stdout { save_copy: cli.save_copy.clone() });
        }
        if let Some(copy) = &cli.save_copy {
            tracing::debug!(path = %copy.display(), "--save-copy only applies with --stdout; ignoring");
        }
        let path = match &cli.output {
            Some(path) => path.clone(),
            None => generated_path(output_dir, now)?,
        };
        Ok(Self::File { path, print_path: cli.print_path })
    }

    /// Whether standard output must stay free of progress lines.
    pub fn is_quiet(&self) -> bool {
        match self {
            Self::Stdout { .. } => true,
            Self::File { print_path, .. } => *print_path,
        }
    }
}

/// `output_<timestamp>.pdf` inside `output_dir`.
pub fn generated_path(output_dir: &Path, now: UtcDateTime) -> Result<PathBuf> {
    Ok(output_dir.join(format!("output_{}.pdf", timestamp(now)?)))
}

/// UTC time as `YYYY-MM-DD_HH-MM-SS-mmm`, safe for file names on every platform.
pub fn timestamp(now: UtcDateTime) -> Result<String> {
    let format = format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]-[subsecond digits:3]");
    now.format(&format).or_raise(|| ErrorKind::Timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use rstest::rstest;
    use time::Duration;

    // 2024-03-05T14:07:09Z
    fn now() -> UtcDateTime {
        UtcDateTime::from_unix_timestamp(1_709_647_629).unwrap()
    }

    fn select(args: &[&str]) -> Destination {
        let cli = Cli::try_parse_from(std::iter::once("html2pdf").chain(args.iter().copied())).unwrap();
        Destination::select(&cli, Path::new("output"), now()).unwrap()
    }

    #[test]
    fn timestamp_format() {
        assert_eq!(timestamp(now()).unwrap(), "2024-03-05_14-07-09-000");
        let later = now() + Duration::milliseconds(42);
        assert_eq!(timestamp(later).unwrap(), "2024-03-05_14-07-09-042");
    }

    #[test]
    fn generated_name() {
        let path = generated_path(Path::new("pdfs"), now()).unwrap();
        assert_eq!(path, Path::new("pdfs/output_2024-03-05_14-07-09-000.pdf"));
    }

    #[rstest]
    #[case(&["--stdout"], Destination::Stdout { save_copy: None })]
    #[case(&["--stdout", "--save-copy", "copy.pdf"], Destination::Stdout { save_copy: Some("copy.pdf".into()) })]
    #[case(&["--stdout", "-o", "out.pdf", "--print-path"], Destination::Stdout { save_copy: None })]
    #[case(&["-o", "out.pdf"], Destination::File { path: "out.pdf".into(), print_path: false })]
    #[case(&["-o", "out.pdf", "--print-path"], Destination::File { path: "out.pdf".into(), print_path: true })]
    #[case(&["--save-copy", "copy.pdf", "-o", "out.pdf"], Destination::File { path: "out.pdf".into(), print_path: false })]
    #[case(&[], Destination::File { path: "output/output_2024-03-05_14-07-09-000.pdf".into(), print_path: false })]
    fn routing(#[case] args: &[&str], #[case] expected: Destination) {
        assert_eq!(select(args), expected);
    }

    #[test]
    fn quiet_destinations() {
        assert!(select(&["--stdout"]).is_quiet());
        assert!(select(&["--print-path"]).is_quiet());
        assert!(!select(&[]).is_quiet());
    }
}
