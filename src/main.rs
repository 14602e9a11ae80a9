use clap::Parser;
use html2pdf::app::{self, Delivered};
use html2pdf::cli::Cli;
use html2pdf::error::{ErrorKind, Result};
use html2pdf::input;
use html2pdf::output::Destination;
use html2pdf_config::Config;
use html2pdf_render::Converter;
use std::process::ExitCode;
use time::UtcDateTime;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(retryable = err.is_retryable(), "{err:?}");
            eprintln!("Error converting file: {}", *err);
            ExitCode::FAILURE
        },
    }
}

fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

async fn run(cli: Cli) -> Result<Delivered> {
    let config = Config::load(cli.config.as_deref()).map_err(ErrorKind::config)?;
    let input = input::resolve(cli.input.clone(), cli.base64.as_deref(), input::piped_stdin()).await?;
    let destination = Destination::select(&cli, &config.output_dir, UtcDateTime::now())?;
    tracing::debug!(input = %input.describe(), ?destination, quiet = destination.is_quiet(), "Resolved conversion");

    let converter = Converter::from(cli.launch_options(&config));
    let mut stdout = tokio::io::stdout();
    app::deliver(&converter, &input, &destination, &mut stdout).await
}
