//! Browser launch, page readiness and PDF layout options.

use std::path::PathBuf;
use std::time::Duration;

const MM_PER_INCH: f64 = 25.4;

/// How the browser process is started.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Explicit browser binary. When `None`, Chrome/Chromium is discovered on `PATH`.
    pub executable: Option<PathBuf>,
    /// When `false`, Chrome is started with `--no-sandbox --disable-setuid-sandbox`.
    /// Needed on containerized hosts without the privileges the sandbox requires.
    pub sandbox: bool,
    pub readiness: Readiness,
}
impl Default for LaunchOptions {
    fn default() -> Self {
        Self { executable: None, sandbox: true, readiness: Readiness::default() }
    }
}
impl LaunchOptions {
    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = Some(executable.into());
        self
    }

    pub fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    pub fn with_readiness(mut self, readiness: Readiness) -> Self {
        self.readiness = readiness;
        self
    }

    /// Extra command-line flags passed to the browser.
    pub fn args(&self) -> Vec<&'static str> {
        if self.sandbox { Vec::new() } else { vec!["--no-sandbox", "--disable-setuid-sandbox"] }
    }
}

/// When a loaded page counts as settled.
///
/// A page is ready once no network requests have been in flight for
/// `quiet_period`. Waiting longer than `timeout` is an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Readiness {
    pub quiet_period: Duration,
    pub timeout: Duration,
}
impl Default for Readiness {
    fn default() -> Self {
        Self { quiet_period: Duration::from_millis(500), timeout: Duration::from_secs(30) }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PaperFormat {
    #[default]
    A4,
}
impl PaperFormat {
    /// Paper `(width, height)` in inches, as Chrome's print API expects.
    pub fn inches(&self) -> (f64, f64) {
        match self {
            Self::A4 => (8.27, 11.7),
        }
    }
}

/// Page margins in millimetres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}
impl Margins {
    pub fn uniform(mm: f64) -> Self {
        Self { top: mm, right: mm, bottom: mm, left: mm }
    }

    /// Margins converted to inches, in `(top, right, bottom, left)` order.
    pub fn inches(&self) -> (f64, f64, f64, f64) {
        (self.top / MM_PER_INCH, self.right / MM_PER_INCH, self.bottom / MM_PER_INCH, self.left / MM_PER_INCH)
    }
}

/// PDF layout parameters. The defaults are the only layout the CLI produces:
/// A4, backgrounds printed, 10mm margins on every side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PdfOptions {
    pub format: PaperFormat,
    pub print_background: bool,
    pub margins: Margins,
}
impl Default for PdfOptions {
    fn default() -> Self {
        Self { format: PaperFormat::A4, print_background: true, margins: Margins::uniform(10.0) }
    }
}
