//! qrmint entrypoint

use clap::Parser;
use qrmint::output::render_summary;
use qrmint::{QrmintConfig, Session, logging};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "qrmint", version, about = "Interactive QR code image generator")]
struct Cli {
    /// Optional configuration file (toml/yaml). Defaults to qrmint.{toml,yaml} in cwd/XDG config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Decode the written image and fail unless it reproduces the payload
    #[arg(long)]
    verify: bool,

    /// Print a JSON summary of the generated code after the confirmation
    #[arg(long)]
    json: bool,

    /// Print a human-readable summary of the generated code
    #[arg(long, conflicts_with = "json")]
    details: bool,

    /// Override the log filter (e.g. `debug`, `qrmint=trace`)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = QrmintConfig::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    logging::init(&config.logging)?;

    info!(defaults = ?config.defaults, "Starting qrmint");

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    let mut session = Session::new(stdin, stdout, config.defaults).with_verify(cli.verify);
    let generation = session.run()?;

    if cli.json || cli.details {
        let rendered = render_summary(
            &generation.request,
            &generation.emitted,
            &generation.customization,
        );
        let out = session.output();
        if cli.json {
            writeln!(out, "{}", serde_json::to_string_pretty(&rendered.json)?)?;
        } else {
            for line in &rendered.human {
                writeln!(out, "{line}")?;
            }
        }
    }

    Ok(())
}
