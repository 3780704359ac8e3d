// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

use crate::args::Args;
use crate::config::system::Logging;
use crate::config::ProbeConfig;
use crate::constants;
use anyhow::Result;
use clap::Parser;
use flexi_logger::{self, Cleanup, Criterion, DeferredNow, FileSpec, LogSpecification, Record};
use std::env::ArgsOs;
use std::path::{Path, PathBuf};

#[derive(Debug, PartialEq)]
pub enum SendTo {
    Null,
    Stderr,
}

/// The returned handle keeps file logging alive, hold it until exit
pub fn init(args: ArgsOs) -> Result<(ProbeConfig, flexi_logger::LoggerHandle)> {
    let args = Args::parse_from(args);
    let config_file = get_config_file(&args);

    // a config error is returned only after the logger has started
    let config = get_probe_config(&args, &config_file);
    let logging = config
        .as_ref()
        .map(|c| c.system().logging().to_owned())
        .unwrap_or_default();
    let log_dir = get_log_dir(&args);
    let level = args.logging_level().unwrap_or_else(|| logging.level());
    let logger = init_logging(&args, log_dir.as_deref(), level, logging)?;
    log::info!("{}", describe_config_source(&args, &config_file));

    let mut config = config?;
    if args.has_overrides() {
        log::info!("Applying command line overrides");
        config.ms_sql_mut().apply_overrides(&args)?;
    }
    if args.print_info {
        println!(
            "{}",
            create_info_text(&level, log_dir.as_deref(), &config_file, &config)
        );
    }
    Ok((config, logger))
}

fn get_config_file(args: &Args) -> PathBuf {
    args.config_file
        .clone()
        .unwrap_or_else(|| constants::DEFAULT_CONFIG_FILE.to_path_buf())
}

fn uses_config_file(args: &Args, file: &Path) -> bool {
    args.config_file.is_some() || file.exists()
}

/// explicitly given config file must exist, the default one may be absent
fn get_probe_config(args: &Args, file: &Path) -> Result<ProbeConfig> {
    if uses_config_file(args, file) {
        if !file.exists() {
            anyhow::bail!("The config file {:?} doesn't exist", file);
        }
        ProbeConfig::load_file(file)
    } else {
        Ok(ProbeConfig::default())
    }
}

fn describe_config_source(args: &Args, file: &Path) -> String {
    if uses_config_file(args, file) {
        format!("Using config file: {}", file.display())
    } else {
        format!("No config file {}, using defaults", file.display())
    }
}

/// guaranteed to return dir or None
fn get_log_dir(args: &Args) -> Option<PathBuf> {
    if args.log_dir.is_some() {
        args.log_dir.as_deref()
    } else {
        constants::ENV_LOG_DIR.as_deref()
    }
    .map(PathBuf::from)
    .filter(|p| Path::is_dir(p))
}

fn init_logging(
    args: &Args,
    log_dir: Option<&Path>,
    level: log::Level,
    logging: Logging,
) -> Result<flexi_logger::LoggerHandle> {
    apply_logging_parameters(level, log_dir, get_send_to(args), logging)
}

/// stdout belongs to the status lines, logs go to stderr at most
fn get_send_to(args: &Args) -> SendTo {
    if args.display_log {
        SendTo::Stderr
    } else {
        SendTo::Null
    }
}

fn create_info_text(
    level: &log::Level,
    log_dir: Option<&Path>,
    config_file: &Path,
    config: &ProbeConfig,
) -> String {
    let endpoints = config
        .ms_sql()
        .endpoints()
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<String>>()
        .join("\n  ---\n");
    format!(
        "\n  - Log level: {}\n  - Log dir: {}\n  - Config file: {}\n  - {}: {}\n  - Endpoints:\n{}",
        level,
        log_dir.unwrap_or_else(|| Path::new("")).display(),
        config_file.display(),
        constants::environment::CONFIG_DIR_ENV_VAR,
        constants::get_env_value(constants::environment::CONFIG_DIR_ENV_VAR, "undefined"),
        endpoints
    )
}

fn custom_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} [{}] [{}]: {}",
        now.format("%Y-%m-%d %H:%M:%S%.3f %:z"),
        record.level(),
        record.module_path().unwrap_or("<unnamed>"),
        &record.args()
    )
}

fn dec_level(level: log::Level) -> log::Level {
    match level {
        log::Level::Error => log::Level::Error,
        log::Level::Warn => log::Level::Error,
        log::Level::Info => log::Level::Warn,
        log::Level::Debug => log::Level::Info,
        log::Level::Trace => log::Level::Debug,
    }
}

fn make_log_spec_text(level: log::Level) -> String {
    format!(
        "{}, tiberius={}, odbc_api={}",
        level.as_str().to_lowercase(),
        dec_level(level).as_str().to_lowercase(),
        dec_level(level).as_str().to_lowercase(),
    )
}

fn apply_logging_parameters(
    level: log::Level,
    log_dir: Option<&Path>,
    send_to: SendTo,
    logging: Logging,
) -> Result<flexi_logger::LoggerHandle> {
    let spec = LogSpecification::parse(make_log_spec_text(level))?;
    let mut logger = flexi_logger::Logger::with(spec);

    logger = if let Some(dir) = log_dir {
        logger
            .log_to_file(make_log_file_spec(dir))
            .rotate(
                Criterion::Size(logging.max_size()),
                constants::log::FILE_NAMING,
                Cleanup::KeepLogFiles(logging.max_count()),
            )
            .append()
    } else {
        logger.do_not_log()
    };

    logger = match send_to {
        SendTo::Null => logger
            .duplicate_to_stderr(flexi_logger::Duplicate::None)
            .duplicate_to_stdout(flexi_logger::Duplicate::None),
        SendTo::Stderr => logger.log_to_stderr(),
    };

    let handle = logger.format(custom_format).start()?;
    log::info!("Log level: {}", level.as_str());
    Ok(handle)
}

fn make_log_file_spec(log_dir: &Path) -> FileSpec {
    FileSpec::default()
        .directory(log_dir.to_owned())
        .suppress_timestamp()
        .basename("sql-probe")
}
