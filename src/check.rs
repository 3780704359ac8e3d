// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

use crate::config::ms_sql::Endpoint;
use crate::config::ProbeConfig;
use crate::constants;
use crate::emit;
use crate::ms_sql;
use std::io::Write;

impl ProbeConfig {
    /// Probes configured endpoints reporting to stdout, true if any answered
    pub async fn exec(&self) -> bool {
        let mut out = std::io::stdout();
        test_all(&self.ms_sql().endpoints(), &mut out)
            .await
            .is_some()
    }
}

/// Connects, asks for the server version, prints the outcome and disconnects.
/// Errors never leave this function: they are printed and turned into `false`.
pub async fn test_connection<W: Write>(endpoint: &Endpoint, out: &mut W) -> bool {
    if endpoint.uses_builtin_credentials() {
        log::warn!(
            "Built-in credentials are used, provide own ones in {}",
            constants::environment::CONFIG_NAME
        );
    }
    emit_line(out, &emit::trying());
    match ms_sql::obtain_version(endpoint).await {
        Ok(version) => {
            log::info!("Server version: {version}");
            emit_line(out, &emit::connected(&version));
            true
        }
        Err(e) => {
            log::error!("Probe of '{}' failed: {e}", endpoint.conn().server_address());
            emit_line(out, &emit::failure(&e));
            false
        }
    }
}

/// Tries endpoints in order and stops at the first one that answers.
/// Returns index of that endpoint.
pub async fn test_all<W: Write>(endpoints: &[&Endpoint], out: &mut W) -> Option<usize> {
    if let [endpoint] = endpoints {
        return test_connection(endpoint, out).await.then_some(0);
    }
    for (index, endpoint) in endpoints.iter().enumerate() {
        emit_line(out, &emit::option_header(index + 1));
        if test_connection(endpoint, out).await {
            emit_line(out, &emit::winner(endpoint));
            return Some(index);
        }
    }
    emit_line(out, &emit::nothing_worked());
    None
}

fn emit_line<W: Write>(out: &mut W, text: &str) {
    writeln!(out, "{text}").unwrap_or_else(|e| log::error!("Failed to write output: {e}"));
}
