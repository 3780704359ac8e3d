// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

pub mod defines;
pub mod ms_sql;
pub mod system;
pub mod yaml;
use anyhow::Result;
use ms_sql::Config as MsSqlConfig;
use std::path::Path;
use system::SystemConfig;

/// Contains config to probe database(MS SQL)
#[derive(PartialEq, Debug, Default)]
pub struct ProbeConfig {
    ms_sql: MsSqlConfig,
    system: SystemConfig,
}

impl ProbeConfig {
    pub fn load_file(file: &Path) -> Result<Self> {
        let yaml = yaml::load_from_file(file)?;
        Self::from_yaml_documents(&yaml)
    }

    pub fn load_str(source: &str) -> Result<Self> {
        let yaml = yaml::load_from_str(source)?;
        Self::from_yaml_documents(&yaml)
    }

    fn from_yaml_documents(documents: &[yaml::Yaml]) -> Result<Self> {
        match documents.first() {
            Some(doc) => Ok(Self {
                ms_sql: MsSqlConfig::from_yaml(doc)?.unwrap_or_default(),
                system: SystemConfig::from_yaml(doc)?,
            }),
            None => {
                log::warn!("Config is empty, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn ms_sql(&self) -> &MsSqlConfig {
        &self.ms_sql
    }

    pub fn ms_sql_mut(&mut self) -> &mut MsSqlConfig {
        &mut self.ms_sql
    }

    pub fn system(&self) -> &SystemConfig {
        &self.system
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_load_empty() {
        assert_eq!(ProbeConfig::load_str("").unwrap(), ProbeConfig::default());
    }

    #[test]
    fn test_load_file() {
        let c = ProbeConfig::load_file(&PathBuf::from("tests").join("files").join("test-config.yml"))
            .unwrap();
        assert_eq!(c.ms_sql().endpoints().len(), 2);
        assert_eq!(c.system().logging().level(), log::Level::Info);
    }

    #[test]
    fn test_load_bad() {
        assert!(ProbeConfig::load_file(Path::new("absent.yml")).is_err());
        assert!(ProbeConfig::load_str("mssql:\n  main:\n    authentication:\n      type: x\n").is_err());
    }
}
