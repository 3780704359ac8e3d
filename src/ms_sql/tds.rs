// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

use super::ProbeError;
use crate::config::defines::defaults;
use crate::config::ms_sql::{AuthType, Endpoint};
use crate::constants::VERSION_QUERY;
use crate::types::ServerVersion;

use tiberius::{AuthMethod, Config, EncryptionLevel, SqlBrowser};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

type TiberiusClient = tiberius::Client<Compat<TcpStream>>;

pub const SQL_LOGIN_ERROR_TAG: &str = "[SQL LOGIN ERROR]";
pub const SQL_TCP_ERROR_TAG: &str = "[SQL TCP ERROR]";
pub const SQL_BROWSER_ERROR_TAG: &str = "[SQL BROWSER ERROR]";
pub const SQL_TLS_ERROR_TAG: &str = "[SQL TLS ERROR]";

/// How the TCP stream to the server is established
#[derive(Debug, PartialEq, Clone, Copy)]
enum Route {
    /// host and port are known
    Direct,
    /// port of the named instance is resolved by SQL Browser
    Browser,
}

/// Runs the probe over native TDS, no ODBC driver is required.
/// The client is closed on every path after a successful login.
pub async fn obtain_version(endpoint: &Endpoint) -> Result<ServerVersion, ProbeError> {
    let timeout = endpoint.conn().timeout();
    let map_elapsed = |e: tokio::time::error::Elapsed| {
        ProbeError::Driver(format!(
            "Timeout: {e} when connecting endpoint, timeout = {:?}",
            timeout
        ))
    };
    let mut client = tokio::time::timeout(timeout, connect(endpoint))
        .await
        .map_err(map_elapsed)??;
    let version = tokio::time::timeout(timeout, query_version(&mut client))
        .await
        .map_err(map_elapsed)
        .and_then(|v| v);
    if let Err(e) = client.close().await {
        log::warn!("Failed to close connection: {e}");
    }
    version
}

async fn connect(endpoint: &Endpoint) -> Result<TiberiusClient, ProbeError> {
    let (config, route) = make_config(endpoint)?;
    match endpoint.conn().encrypt() {
        Some(true) => Ok(connect_with(config, route, EncryptionLevel::Required).await?),
        Some(false) => Ok(connect_with(config, route, EncryptionLevel::NotSupported).await?),
        None => match connect_with(config.clone(), route, EncryptionLevel::Required).await {
            Ok(client) => Ok(client),
            Err(ConnectError::Tls(err)) => {
                log::warn!(
                    "Encryption is not supported by the host, err is {}. Trying without encryption...",
                    err
                );
                Ok(connect_with(config, route, EncryptionLevel::NotSupported).await?)
            }
            Err(ConnectError::Other(err)) => Err(err),
        },
    }
}

/// Only a failed TLS handshake allows a second, unencrypted session
#[derive(Debug)]
enum ConnectError {
    Tls(ProbeError),
    Other(ProbeError),
}

impl From<ConnectError> for ProbeError {
    fn from(e: ConnectError) -> Self {
        match e {
            ConnectError::Tls(e) | ConnectError::Other(e) => e,
        }
    }
}

impl From<ProbeError> for ConnectError {
    fn from(e: ProbeError) -> Self {
        ConnectError::Other(e)
    }
}

impl From<tiberius::error::Error> for ConnectError {
    fn from(e: tiberius::error::Error) -> Self {
        match e {
            tiberius::error::Error::Tls(_) => {
                ConnectError::Tls(ProbeError::Driver(format!("{SQL_TLS_ERROR_TAG} {e}")))
            }
            _ => ConnectError::Other(ProbeError::Driver(format!("{SQL_LOGIN_ERROR_TAG} {e}"))),
        }
    }
}

fn make_config(endpoint: &Endpoint) -> Result<(Config, Route), ProbeError> {
    let (auth, conn) = endpoint.split();
    let mut config = Config::new();

    config.host(conn.hostname().to_string());
    config.database(conn.database().to_string());
    let route = match (conn.port(), conn.instance()) {
        (Some(port), _) => {
            config.port(port.value());
            Route::Direct
        }
        (None, Some(instance)) => {
            config.port(defaults::SQL_BROWSER_PORT);
            config.instance_name(instance.to_string());
            Route::Browser
        }
        (None, None) => {
            config.port(defaults::STANDARD_PORT);
            Route::Direct
        }
    };
    config.authentication(match auth.auth_type() {
        AuthType::SqlServer => {
            log::trace!(
                "Remote connection to {} with user {}",
                config.get_addr(),
                auth.username()
            );
            AuthMethod::sql_server(
                auth.username(),
                auth.password().map(|s| s.as_str()).unwrap_or(""),
            )
        }
        #[cfg(windows)]
        AuthType::Integrated => AuthMethod::Integrated,
        #[cfg(unix)]
        AuthType::Integrated => {
            return Err(anyhow::anyhow!(
                "Integrated authentication is not supported by backend 'tds' on this platform"
            )
            .into())
        }
    });
    if conn.trust_server_certificate() {
        config.trust_cert();
    }
    Ok((config, route))
}

async fn connect_with(
    mut config: Config,
    route: Route,
    encryption: EncryptionLevel,
) -> Result<TiberiusClient, ConnectError> {
    let addr = config.get_addr();
    log::info!("Connecting to addr '{addr}' {route:?} with encryption {encryption:?}...");
    config.encryption(encryption);
    let tcp = match route {
        Route::Direct => TcpStream::connect(addr.as_str()).await.map_err(|e| {
            ProbeError::Driver(format!("{SQL_TCP_ERROR_TAG} address:{addr} error:`{e}`"))
        })?,
        Route::Browser => TcpStream::connect_named(&config)
            .await
            .map_err(|e| ProbeError::Driver(format!("{SQL_BROWSER_ERROR_TAG} {e}")))?,
    };
    tcp.set_nodelay(true)
        .map_err(|e| ProbeError::from(anyhow::Error::from(e)))?;

    // To be able to use Tokio's tcp, we're using the `compat_write` from
    // the `TokioAsyncWriteCompatExt` to get a stream compatible with the
    // traits from the `futures` crate.
    let client = TiberiusClient::connect(config, tcp.compat_write()).await?;
    log::info!("Connection success");
    Ok(client)
}

async fn query_version(client: &mut TiberiusClient) -> Result<ServerVersion, ProbeError> {
    let row = client.simple_query(VERSION_QUERY).await?.into_row().await?;
    let Some(row) = row else {
        return Err(anyhow::anyhow!("'{VERSION_QUERY}' returned no rows").into());
    };
    match row.try_get::<&str, usize>(0)? {
        Some(version) => Ok(ServerVersion::from(version.to_string())),
        None => Err(anyhow::anyhow!("'{VERSION_QUERY}' returned NULL").into()),
    }
}
