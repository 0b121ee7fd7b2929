/*!
# Ruminate - Journal Analysis and Dataset Building

Command-line entry point. Coordinates the components: initializes logging,
parses arguments, loads and validates configuration (the gate for fatal
configuration failures), and dispatches to the requested operation.

## Usage

```text
ruminate analyze <JOURNAL_PATH> [-o OUTPUT.md]
ruminate dataset --events <EVENTS.json> [--out train.jsonl] [--samples N] [--workers K]
```

## Configuration

The application is configured with environment variables:
- `RUMINATE_PROVIDER`: "ollama" (default) or "openai"
- `RUMINATE_MODEL`: model name (provider-dependent default)
- `RUMINATE_BASE_URL`: provider API base URL
- `RUMINATE_API_KEY`: API key, required for the openai provider
- `RUMINATE_TEMPERATURE`, `RUMINATE_TIMEOUT_SECS`: request parameters
*/

use clap::Parser;
use ruminate::cli::{CliArgs, Command};
use ruminate::config::Config;
use ruminate::errors::AppResult;
use ruminate::ops;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() -> AppResult<()> {
    let args = CliArgs::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting ruminate");
    debug!("CLI arguments: {:?}", args);

    // Fatal configuration failures abort here, before any work is scheduled.
    let config = Config::load()?;
    config.validate()?;
    debug!("Configuration: {:?}", config);

    match args.command {
        Command::Analyze { journal_path, output } => {
            ops::analyze_journal(&config, &journal_path, &output)?;
        }
        Command::Dataset { events, out, samples, workers } => {
            ops::build_dataset(&config, &events, &out, samples, workers)?;
        }
    }

    Ok(())
}
