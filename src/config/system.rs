// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

use crate::config::yaml::{Get, Yaml};
use crate::constants;
use anyhow::Result;

mod keys {
    pub const SYSTEM: &str = "system";
    pub const LOGGING: &str = "logging";

    pub const LEVEL: &str = "level";
    pub const MAX_SIZE: &str = "max_size";
    pub const MAX_COUNT: &str = "max_count";
}

mod defaults {
    pub const LOG_LEVEL: log::Level = log::Level::Warn;
}

#[derive(PartialEq, Debug, Default)]
pub struct SystemConfig {
    logging: Logging,
}

impl SystemConfig {
    pub fn from_yaml(yaml: &Yaml) -> Result<Self> {
        let system = yaml.get(keys::SYSTEM);
        if system.is_badvalue() {
            return Ok(Self::default());
        }
        Ok(Self {
            logging: Logging::from_yaml(system)?,
        })
    }

    pub fn logging(&self) -> &Logging {
        &self.logging
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct Logging {
    level: log::Level,
    max_size: u64,
    max_count: usize,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL,
            max_size: constants::log::FILE_MAX_SIZE,
            max_count: constants::log::FILE_MAX_COUNT,
        }
    }
}

impl Logging {
    pub fn from_yaml(yaml: &Yaml) -> Result<Self> {
        use std::str::FromStr;
        let logging = yaml.get(keys::LOGGING);
        Ok(Self {
            level: logging
                .get_string(keys::LEVEL)
                .map(|s| log::Level::from_str(&s))
                .unwrap_or(Ok(defaults::LOG_LEVEL))
                .unwrap_or(defaults::LOG_LEVEL),
            max_size: logging.get_int(keys::MAX_SIZE, constants::log::FILE_MAX_SIZE),
            max_count: logging.get_int(keys::MAX_COUNT, constants::log::FILE_MAX_COUNT),
        })
    }

    pub fn level(&self) -> log::Level {
        self.level
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    pub fn max_count(&self) -> usize {
        self.max_count
    }
}
