// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

use crate::constants;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Default, Debug)]
#[command(
    about = "Checks that a SQL Server instance accepts connections and answers queries.",
    version = constants::VERSION
)]
pub struct Args {
    /// Enable verbose output. Use once (-v) for logging level DEBUG and twice (-vv) for logging
    /// level TRACE.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Sends log to stderr.
    #[arg(short = 'l', long)]
    pub display_log: bool,

    /// Prints config, parameters, important variables
    #[arg(long)]
    pub print_info: bool,

    /// Use custom log dir
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Use custom config file
    #[arg(short, long)]
    pub config_file: Option<PathBuf>,

    /// Host name or address of the server
    #[arg(long)]
    pub server: Option<String>,

    /// Named instance, e.g. SQLEXPRESS
    #[arg(long)]
    pub instance: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    #[arg(long)]
    pub database: Option<String>,

    /// Login for SQL Server authentication
    #[arg(short, long)]
    pub username: Option<String>,

    #[arg(short, long)]
    pub password: Option<String>,

    /// ODBC driver name, e.g. "ODBC Driver 18 for SQL Server"
    #[arg(long)]
    pub driver: Option<String>,

    /// Client used to reach the server
    #[arg(long, value_parser = ["odbc", "tds"])]
    pub backend: Option<String>,

    /// Connection timeout in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}

impl Args {
    pub fn logging_level(&self) -> Option<log::Level> {
        match self.verbose {
            2.. => Some(log::Level::Trace),
            1 => Some(log::Level::Debug),
            _ => None,
        }
    }

    pub fn has_overrides(&self) -> bool {
        self.server.is_some()
            || self.instance.is_some()
            || self.port.is_some()
            || self.database.is_some()
            || self.username.is_some()
            || self.password.is_some()
            || self.driver.is_some()
            || self.backend.is_some()
            || self.timeout.is_some()
    }
}
