//! Main entry point for transtag.

use clap::Parser;
use std::io::{self, Write};
use tracing::info;
use transtag_cli::{init, init_logging, languages, render, Cli, CliResult, Command};
use transtag_config::ConfigLoader;

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let loader = ConfigLoader::new(&cli.config);

    if let Command::Init { force } = cli.command {
        let path = init(&loader, force)?;
        writeln!(io::stdout().lock(), "Wrote {}", path.display())?;
        return Ok(());
    }

    let config = loader.load()?;
    let _guard = init_logging(&config.logging)?;
    info!(config = %loader.path().display(), "Starting transtag");

    let mut stdout = io::stdout().lock();
    match cli.command {
        Command::Render(args) => {
            let output = render(&config, &args)?;
            stdout.write_all(output.as_bytes())?;
        }
        Command::Languages => {
            for language in languages(&config)? {
                writeln!(stdout, "{language}")?;
            }
        }
        Command::Init { .. } => {}
    }
    stdout.flush()?;
    Ok(())
}
