use crate::error::CliError;
use connectors::sql::base::source::SqlSource;
use engine_config::options::Options;
use tracing::{error, info};

/// Connects with the configured connection string and runs `SELECT 1`.
pub async fn test_connection(options: &Options) -> Result<(), CliError> {
    info!(database = %options.database, "Testing database connection");

    let source = SqlSource::connect(options.database, options.connection_string.clone())
        .await
        .map_err(|err| {
            error!(database = %options.database, %err, "Connection failed");
            err
        })?;

    source.ping().await.map_err(|err| {
        error!(database = %options.database, %err, "Ping query failed");
        err
    })?;

    info!(database = %options.database, "Connection OK");
    Ok(())
}
