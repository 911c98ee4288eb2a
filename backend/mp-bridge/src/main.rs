//! mp-bridge - puppet identity registry for Meta bridges
//!
//! ```bash
//! # Where does remote account 42 live locally?
//! mp-bridge format-id 42
//!
//! # Push a profile update for it
//! mp-bridge sync 42 --username alice --display-name Alice --avatar-url ""
//! ```

use mp_bridge::{Bridge, BridgeError, Cli, Commands, Result as BridgeErrorResult, commands, logger};

use mp_config::Config;
use mp_core::ProfileSnapshot;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> BridgeErrorResult<String> {
    let config = Config::load()?;
    config.validate()?;

    // Initialize logger (before any other logging)
    logger::initialize(
        config.logging.level,
        log_file_path(&config)?,
        config.logging.colored,
    )?;

    info!("Starting mp-bridge v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    match command {
        Commands::FormatId { remote_id } => commands::format_id(&config, remote_id),
        Commands::ParseId { identity } => commands::parse_id(&config, &identity),
        Commands::Check => commands::check(&Bridge::start(&config).await?).await,
        Commands::Show { remote_id } => {
            commands::show(&Bridge::start(&config).await?, remote_id).await
        }
        Commands::Sync {
            remote_id,
            username,
            display_name,
            avatar_url,
        } => {
            let snapshot = ProfileSnapshot {
                username,
                display_name,
                avatar_url,
            };
            commands::sync(&Bridge::start(&config).await?, remote_id, snapshot).await
        }
        Commands::Bind {
            remote_id,
            identity,
            access_token,
        } => {
            let bridge = Bridge::start(&config).await?;
            commands::bind(&bridge, remote_id, &identity, access_token).await
        }
        Commands::Unbind { remote_id } => {
            commands::unbind(&Bridge::start(&config).await?, remote_id).await
        }
    }
}

fn log_file_path(config: &Config) -> BridgeErrorResult<Option<PathBuf>> {
    let path = config.log_file_path()?;

    if let Some(log_dir) = path.as_deref().and_then(|p| p.parent()) {
        std::fs::create_dir_all(log_dir).map_err(|e| BridgeError::LogDir {
            path: log_dir.display().to_string(),
            source: e,
        })?;
    }

    Ok(path)
}
