use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use calc_cli::app;
use calc_cli::cli::{self, Cli};
use calc_cli::config::AppConfig;
use calc_cli::logging;

// ─── entry point ─────────────────────────────────────────────────────────────

async fn try_main(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    logging::init_logging(&config.log_level, config.log_file.as_deref())?;
    debug!(backend = %config.store.backend, "configuration loaded");

    let output = cli::run(&cli, &config).await?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    if !output.ends_with('\n') {
        writeln!(stdout)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match try_main(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            match app::validation_error(&error) {
                Some(invalid) => eprintln!("error: {invalid}"),
                None => eprintln!("error: {error:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
