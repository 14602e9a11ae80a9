//! Command-line arguments.

use clap::{ArgAction, Parser};
use html2pdf_config::Config;
use html2pdf_render::{LaunchOptions, Readiness};
use std::path::PathBuf;

#[derive(Clone, Debug, Parser)]
#[command(name = "html2pdf", version, about = "Convert HTML to PDF using headless Chrome/Chromium")]
pub struct Cli {
    /// Path to the input HTML file
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,
    /// Path to the output PDF file
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
    /// Base64-encoded HTML content, used when no input file is given
    #[arg(long, value_name = "STRING")]
    pub base64: Option<String>,
    /// Write the PDF to standard output instead of a file
    #[arg(long)]
    pub stdout: bool,
    /// With --stdout, also save the PDF to this path
    #[arg(long, value_name = "PATH")]
    pub save_copy: Option<PathBuf>,
    /// Print only the path of the written PDF
    #[arg(long)]
    pub print_path: bool,
    /// Path to the Chrome/Chromium executable (useful for low powered devices like Raspberry Pi)
    #[arg(long, value_name = "PATH")]
    pub executable_path: Option<PathBuf>,
    /// Disable the browser sandbox (needed in many containers)
    #[arg(long)]
    pub no_sandbox: bool,
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, value_name = "PATH", env = "HTML2PDF_CONFIG")]
    pub config: Option<PathBuf>,
    /// Increase diagnostic output on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Browser options from configuration, with command-line flags taking precedence.
    pub fn launch_options(&self, config: &Config) -> LaunchOptions {
        let readiness = Readiness {
            quiet_period: config.readiness.quiet_period(),
            timeout: config.readiness.timeout(),
        };
        let mut options = LaunchOptions::default()
            .with_sandbox(config.browser.sandbox && !self.no_sandbox)
            .with_readiness(readiness);
        if let Some(executable) = self.executable_path.as_ref().or(config.browser.executable_path.as_ref()) {
            options = options.with_executable(executable);
        }
        options
    }

    /// Default diagnostic level for the `-v` count, used when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
