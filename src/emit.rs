// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

use crate::config::ms_sql::Endpoint;
use crate::ms_sql::ProbeError;
use crate::types::ServerVersion;

pub fn trying() -> String {
    "Trying to connect to SQL Server...".to_string()
}

pub fn connected(version: &ServerVersion) -> String {
    format!("Connection successful!\nSQL Server version: {version}")
}

pub fn failure(error: &ProbeError) -> String {
    match error {
        ProbeError::Driver(_) => format!("Connection error: {error}"),
        ProbeError::Unexpected(_) => format!("Unexpected error: {error}"),
    }
}

/// `number` starts from 1
pub fn option_header(number: usize) -> String {
    format!("\n--- Option {number} ---")
}

pub fn winner(endpoint: &Endpoint) -> String {
    format!("\nWinning configuration:\n{endpoint}")
}

pub fn nothing_worked() -> String {
    "\nNone of the configurations worked.".to_string()
}
