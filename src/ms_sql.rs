// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

pub mod conn_string;
pub mod odbc;
pub mod tds;

use crate::config::ms_sql::{Backend, Endpoint};
use crate::types::ServerVersion;

/// The only distinction the probe makes: the driver refused or something else broke
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// connection, login or query failure reported by the driver or the network
    #[error("{0}")]
    Driver(String),
    #[error("{0:#}")]
    Unexpected(#[from] anyhow::Error),
}

impl ProbeError {
    pub fn is_driver(&self) -> bool {
        matches!(self, ProbeError::Driver(_))
    }
}

impl From<tiberius::error::Error> for ProbeError {
    fn from(e: tiberius::error::Error) -> Self {
        ProbeError::Driver(e.to_string())
    }
}

#[cfg(feature = "odbc")]
impl From<odbc_api::Error> for ProbeError {
    fn from(e: odbc_api::Error) -> Self {
        ProbeError::Driver(e.to_string())
    }
}

/// Connects to the endpoint, runs the version query and disconnects
pub async fn obtain_version(endpoint: &Endpoint) -> Result<ServerVersion, ProbeError> {
    log::info!(
        "Probing '{}' using {}",
        endpoint.conn().server_address(),
        endpoint.conn().backend()
    );
    match endpoint.conn().backend() {
        Backend::Odbc => odbc::obtain_version(endpoint).await,
        Backend::Tds => tds::obtain_version(endpoint).await,
    }
}
