// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

pub const VERSION: &str = "0.1.0";

use lazy_static::lazy_static;
use std::path::{Path, PathBuf};
pub mod log {
    use flexi_logger::Naming;
    pub const FILE_MAX_SIZE: u64 = 500_000;
    pub const FILE_NAMING: Naming = Naming::Numbers;
    pub const FILE_MAX_COUNT: usize = 5;
}

pub mod environment {
    pub const CONFIG_NAME: &str = "sql-probe.yml";
    pub const CONFIG_DIR_ENV_VAR: &str = "SQL_PROBE_CONFDIR";
    pub const LOG_DIR_ENV_VAR: &str = "SQL_PROBE_LOGDIR";
}

/// Query used to prove that the server answers
pub const VERSION_QUERY: &str = "SELECT @@VERSION";

lazy_static! {
    pub static ref DEFAULT_CONFIG_FILE: PathBuf =
        Path::new(&get_env_value(environment::CONFIG_DIR_ENV_VAR, "."))
            .join(environment::CONFIG_NAME);
    pub static ref ENV_LOG_DIR: Option<PathBuf> = std::env::var(environment::LOG_DIR_ENV_VAR)
        .ok()
        .map(PathBuf::from);
}

pub fn get_env_value(var: &str, on_lack: &str) -> String {
    std::env::var(var).unwrap_or(on_lack.to_string())
}
