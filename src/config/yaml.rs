// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

use anyhow::{anyhow, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use yaml_rust::YamlLoader;
pub type Yaml = yaml_rust::yaml::Yaml;

pub trait Get {
    fn get(&self, key: &str) -> &Self
    where
        Self: Sized;
    fn get_string(&self, key: &str) -> Option<String>
    where
        Self: Sized;
    fn get_int<T>(&self, key: &str, default: T) -> T
    where
        Self: Sized,
        T: std::convert::TryFrom<i64>;
    fn get_optional_int<T>(&self, key: &str) -> Result<Option<T>>
    where
        Self: Sized,
        T: std::convert::TryFrom<i64>;

    fn get_yaml_vector(&self, key: &str) -> Vec<Yaml>;

    /// load a bool-like value using key with default.
    /// If obtained value is not bool-like -> error
    fn get_bool(&self, key: &str, default: bool) -> Result<bool>;
    fn get_optional_bool(&self, key: &str) -> Result<Option<bool>>;
}

impl Get for Yaml {
    fn get(&self, key: &str) -> &Self {
        &self[key]
    }

    fn get_string(&self, key: &str) -> Option<String> {
        match &self[key] {
            Yaml::String(s) => Some(s.to_owned()),
            // host names and passwords may look like numbers
            Yaml::Integer(i) => Some(i.to_string()),
            Yaml::Real(r) => Some(r.to_owned()),
            _ => None,
        }
    }

    /// always with default
    fn get_int<T>(&self, key: &str, default: T) -> T
    where
        T: std::convert::TryFrom<i64>,
    {
        if let Some(value) = self[key].as_i64() {
            TryInto::try_into(value).unwrap_or(default)
        } else {
            default
        }
    }

    fn get_optional_int<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: std::convert::TryFrom<i64>,
    {
        match &self[key] {
            Yaml::BadValue | Yaml::Null => Ok(None),
            Yaml::Integer(value) => TryInto::try_into(*value)
                .map(Some)
                .map_err(|_| anyhow!("Value of '{key}' is out of range: {value}")),
            other => Err(anyhow!("Value of '{key}' is not an integer: {other:?}")),
        }
    }

    fn get_yaml_vector(&self, key: &str) -> Vec<Yaml> {
        self[key].as_vec().unwrap_or(&vec![]).to_vec()
    }

    fn get_bool(&self, key: &str, default: bool) -> Result<bool> {
        Ok(self.get_optional_bool(key)?.unwrap_or(default))
    }

    fn get_optional_bool(&self, key: &str) -> Result<Option<bool>> {
        match &self[key] {
            Yaml::Boolean(b) => Ok(Some(*b)),
            Yaml::String(s) => to_bool(s).map(Some),
            Yaml::BadValue | Yaml::Null => Ok(None),
            other => Err(anyhow!("Invalid boolean value: {other:?}")),
        }
    }
}

pub fn load_from_file(file_name: &Path) -> Result<Vec<Yaml>> {
    match read_file(file_name) {
        Ok(content) => load_from_str(&content),
        Err(e) => anyhow::bail!(
            "Can't read file: {}, {e} ",
            // Use relatively complicated  method to print name of the file
            // as it is not possible to use "{file_name:?}": produces to many backslashes
            // in Windows. Probability to NOT decode filename as UTF-8 is nil.
            file_name.as_os_str().to_str().unwrap_or("")
        ),
    }
}

fn read_file(file_name: &Path) -> Result<String> {
    let mut file = File::open(file_name)?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    Ok(content)
}

pub fn load_from_str(content: &str) -> Result<Vec<Yaml>> {
    Ok(YamlLoader::load_from_str(content)?)
}

fn to_bool(value: &str) -> Result<bool> {
    match value.to_lowercase().as_ref() {
        "yes" | "true" => Ok(true),
        "no" | "false" => Ok(false),
        _ => Err(anyhow!("Invalid boolean value: {}", value)),
    }
}
