// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

use super::ProbeError;
use crate::config::ms_sql::Endpoint;
use crate::types::ServerVersion;
use std::time::Duration;

#[cfg(feature = "odbc")]
use {
    super::conn_string::ConnectionString,
    crate::constants::VERSION_QUERY,
    odbc_api::{ConnectionOptions, Cursor, Environment},
};

/// Runs the probe through the ODBC driver manager on a blocking thread.
/// Environment, connection and cursor live only inside that thread and are
/// released when it finishes, whatever the outcome.
#[cfg(feature = "odbc")]
pub async fn obtain_version(endpoint: &Endpoint) -> Result<ServerVersion, ProbeError> {
    let conn_string = ConnectionString::from_endpoint(endpoint);
    let timeout = endpoint.conn().timeout();
    // login and query are bounded by the driver separately
    run_bounded(timeout * 2, move || query_version(&conn_string, timeout)).await
}

/// Waits for a blocking job at most `timeout`, an abandoned job finishes on its own
#[cfg_attr(not(feature = "odbc"), allow(dead_code))]
async fn run_bounded<T, F>(timeout: Duration, job: F) -> Result<T, ProbeError>
where
    F: FnOnce() -> Result<T, ProbeError> + Send + 'static,
    T: Send + 'static,
{
    tokio::time::timeout(timeout, tokio::task::spawn_blocking(job))
        .await
        .map_err(|e| {
            ProbeError::Driver(format!(
                "Timeout: {e} when querying endpoint, timeout = {:?}",
                timeout
            ))
        })?
        .map_err(|e| ProbeError::Unexpected(anyhow::anyhow!("ODBC worker failed: {e}")))?
}

#[cfg(not(feature = "odbc"))]
pub async fn obtain_version(_endpoint: &Endpoint) -> Result<ServerVersion, ProbeError> {
    Err(ProbeError::Unexpected(anyhow::anyhow!(
        "ODBC support is not compiled in, use backend 'tds'"
    )))
}

#[cfg(feature = "odbc")]
fn query_version(
    conn_string: &ConnectionString,
    timeout: Duration,
) -> Result<ServerVersion, ProbeError> {
    let env = Environment::new()?;

    log::info!("Connecting with string {}", conn_string.masked());
    let conn = env.connect_with_connection_string(
        &conn_string.expose(),
        ConnectionOptions {
            login_timeout_sec: Some(u32::try_from(timeout.as_secs()).unwrap_or(u32::MAX)),
            ..Default::default()
        },
    )?;
    log::info!("Connection success");

    let mut statement = conn.preallocate()?;
    statement.set_query_timeout_sec(usize::try_from(timeout.as_secs()).unwrap_or(usize::MAX))?;
    let Some(mut cursor) = statement.execute(VERSION_QUERY, ())? else {
        return Err(anyhow::anyhow!("'{VERSION_QUERY}' produced no result set").into());
    };
    let Some(mut row) = cursor.next_row()? else {
        return Err(anyhow::anyhow!("'{VERSION_QUERY}' returned no rows").into());
    };
    let mut buffer = Vec::new();
    if !row.get_text(1, &mut buffer)? {
        return Err(anyhow::anyhow!("'{VERSION_QUERY}' returned NULL").into());
    }
    Ok(ServerVersion::from(
        String::from_utf8_lossy(&buffer).into_owned(),
    ))
}
