use crate::sql::base::error::ConnectorError;
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use std::future::Future;
use tokio_postgres::{
    Client, Config, NoTls,
    config::{Host, SslMode},
};
use tracing::{debug, error, warn};

const DEFAULT_PORT: u16 = 5432;

/// How the connection string's `sslmode` is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TlsPlan {
    Plain,
    Required,
    /// TLS first, plaintext when the handshake fails.
    Opportunistic,
}

impl From<SslMode> for TlsPlan {
    fn from(mode: SslMode) -> Self {
        match mode {
            SslMode::Disable => TlsPlan::Plain,
            SslMode::Prefer => TlsPlan::Opportunistic,
            _ => TlsPlan::Required,
        }
    }
}

pub(crate) async fn connect_client(url: &str) -> Result<Client, ConnectorError> {
    let config: Config = url
        .parse()
        .map_err(|err: tokio_postgres::Error| ConnectorError::InvalidUrl(err.to_string()))?;
    let plan = TlsPlan::from(config.get_ssl_mode());
    let endpoint = endpoint(&config);
    debug!(%endpoint, ?plan, "Opening Postgres connection");

    match plan {
        TlsPlan::Plain => open_plain(&config, &endpoint).await,
        TlsPlan::Required => open_tls(&config, &endpoint).await,
        TlsPlan::Opportunistic => match open_tls(&config, &endpoint).await {
            Ok(client) => Ok(client),
            Err(err) => {
                warn!(%endpoint, sslmode = "prefer", %err, "TLS handshake failed, falling back to plaintext");
                open_plain(&config, &endpoint).await
            }
        },
    }
}

async fn open_tls(config: &Config, endpoint: &str) -> Result<Client, ConnectorError> {
    let tls = MakeTlsConnector::new(TlsConnector::builder().build()?);
    let (client, connection) = config.connect(tls).await?;
    drive(connection, endpoint.to_string());
    Ok(client)
}

async fn open_plain(config: &Config, endpoint: &str) -> Result<Client, ConnectorError> {
    let (client, connection) = config.connect(NoTls).await?;
    drive(connection, endpoint.to_string());
    Ok(client)
}

/// The connection half does the socket I/O and must be polled for the client to work.
fn drive<C>(connection: C, endpoint: String)
where
    C: Future<Output = Result<(), tokio_postgres::Error>> + Send + 'static,
{
    tokio::spawn(async move {
        match connection.await {
            Ok(()) => debug!(%endpoint, "Postgres connection closed"),
            Err(err) => error!(%endpoint, %err, "Postgres connection failed"),
        }
    });
}

/// `host:port` of the first configured host, for log fields.
fn endpoint(config: &Config) -> String {
    let host = match config.get_hosts().first() {
        Some(Host::Tcp(name)) => name.clone(),
        #[cfg(unix)]
        Some(Host::Unix(path)) => path.display().to_string(),
        None => "localhost".to_string(),
    };
    let port = config.get_ports().first().copied().unwrap_or(DEFAULT_PORT);
    format!("{host}:{port}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sslmode_selects_tls_plan() {
        let plan = |url: &str| TlsPlan::from(url.parse::<Config>().unwrap().get_ssl_mode());

        assert_eq!(plan("host=db sslmode=disable"), TlsPlan::Plain);
        assert_eq!(plan("host=db sslmode=prefer"), TlsPlan::Opportunistic);
        assert_eq!(plan("host=db sslmode=require"), TlsPlan::Required);
        // libpq default
        assert_eq!(plan("host=db"), TlsPlan::Opportunistic);
    }

    #[test]
    fn endpoint_names_first_host_and_port() {
        let config: Config = "postgres://app@db01:6432/audit".parse().unwrap();
        assert_eq!(endpoint(&config), "db01:6432");

        let config: Config = "dbname=audit".parse().unwrap();
        assert_eq!(endpoint(&config), "localhost:5432");
    }

    #[tokio::test]
    async fn unparsable_connection_string_is_rejected_before_connecting() {
        let err = connect_client("host=db sslmode=sometimes").await.unwrap_err();
        assert!(matches!(err, ConnectorError::InvalidUrl(_)));
    }
}
