use crate::{
    commands::Commands, error::CliError, output::CursorReport, shutdown::ShutdownCoordinator,
};
use clap::Parser;
use engine_config::{
    env::EnvManager,
    options::{DEFAULT_OPTIONS_FILE, Options, loader},
};
use engine_core::metrics::Metrics;
use engine_runtime::{actor::coordinator::PollCoordinator, factory};
use std::{path::PathBuf, sync::Arc};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod conn;
mod error;
mod output;
mod shutdown;

#[derive(Parser, Debug)]
#[command(
    name = "sql-forwarder",
    version,
    about = "Forwards new database rows to an HTTP event collector"
)]
struct Cli {
    #[arg(short, long, global = true, default_value = DEFAULT_OPTIONS_FILE, help = "Options file path")]
    options: PathBuf,

    #[arg(long, global = true, help = "Load environment variables from this file first")]
    env_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command.as_ref().unwrap_or(&Commands::Run) {
        Commands::Run => run(&cli).await?,
        Commands::ClearCache => {
            let options = loader::load(&cli.options)?;
            let store = factory::create_cursor_store(&options, &cli.options)?;
            if store.clear().await? {
                info!(location = %store.location(), "Cursor cleared");
            } else {
                info!(location = %store.location(), "No cursor to clear");
            }
        }
        Commands::CreateDefaultOptions {
            overwrite,
            filename,
        } => {
            let path = filename.as_ref().unwrap_or(&cli.options);
            loader::write_default(path, *overwrite)?;
        }
        Commands::ShowCursor { json } => {
            let options = loader::load(&cli.options)?;
            let store = factory::create_cursor_store(&options, &cli.options)?;
            let report = CursorReport::new(
                store.location(),
                store.load().await?,
                &options.cursor_format()?,
            );
            println!("{}", report.render(*json)?);
        }
        Commands::TestConn => {
            let options = resolved_options(&cli)?;
            conn::test_connection(&options).await?;
        }
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Loads the options file and expands `${NAME}` references.
fn resolved_options(cli: &Cli) -> Result<Options, CliError> {
    let mut env = EnvManager::new();
    if let Some(path) = &cli.env_file {
        env.load_from_file(path)?;
    }

    let mut options = loader::load(&cli.options)?;
    options.resolve_env(&env)?;
    Ok(options)
}

async fn run(cli: &Cli) -> Result<(), CliError> {
    let options = resolved_options(cli)?;
    let poller = factory::create_poll_loop(&options, &cli.options, Metrics::new()).await?;

    let shutdown = ShutdownCoordinator::new(CancellationToken::new());
    shutdown.register_handlers();

    info!(
        interval_ms = options.poll_interval_ms,
        max_interval_ms = options.max_poll_interval_ms,
        "Forwarder running, press Ctrl+C to stop"
    );

    let coordinator = PollCoordinator::start(Arc::new(poller), shutdown.cancel_token());
    coordinator.run_until_cancelled().await?;

    if shutdown.is_shutdown_requested() {
        info!("Shutdown complete");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_run_with_default_options() {
        let cli = Cli::try_parse_from(["sql-forwarder"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(cli.options, PathBuf::from("options.json"));
        assert!(!cli.log_json);
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::try_parse_from([
            "sql-forwarder",
            "show-cursor",
            "--json",
            "-o",
            "/etc/fwd/options.json",
            "--env-file",
            ".env",
        ])
        .unwrap();
        assert_eq!(cli.command, Some(Commands::ShowCursor { json: true }));
        assert_eq!(cli.options, PathBuf::from("/etc/fwd/options.json"));
        assert_eq!(cli.env_file, Some(PathBuf::from(".env")));
    }

    #[test]
    fn create_default_options_flags() {
        let cli = Cli::try_parse_from([
            "sql-forwarder",
            "create-default-options",
            "--overwrite",
            "-f",
            "custom.json",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::CreateDefaultOptions {
                overwrite: true,
                filename: Some(PathBuf::from("custom.json")),
            })
        );
    }

    #[test]
    fn command_factory_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
