// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

use derive_more::{Display, From, Into};

#[derive(PartialEq, PartialOrd, Debug, Clone, From, Into)]
pub struct Port(pub u16);

impl Port {
    pub fn value(&self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[derive(PartialEq, From, Debug, Display, Clone, Default, Into, Hash, Eq)]
pub struct HostName(String);

impl From<&str> for HostName {
    fn from(s: &str) -> Self {
        HostName(s.to_string())
    }
}

#[derive(PartialEq, From, Debug, Display, Clone, Default, Into, Hash, Eq)]
pub struct InstanceName(String);

impl From<&str> for InstanceName {
    fn from(s: &str) -> Self {
        InstanceName(s.to_string())
    }
}

#[derive(PartialEq, From, Debug, Display, Clone, Default, Into)]
pub struct DatabaseName(String);

impl From<&str> for DatabaseName {
    fn from(s: &str) -> Self {
        DatabaseName(s.to_string())
    }
}

/// Name of the ODBC driver as registered in the driver manager
#[derive(PartialEq, From, Debug, Display, Clone, Default, Into)]
pub struct DriverName(String);

impl From<&str> for DriverName {
    fn from(s: &str) -> Self {
        DriverName(s.to_string())
    }
}

/// Text returned by `SELECT @@VERSION`
#[derive(PartialEq, From, Debug, Display, Clone, Default, Into)]
pub struct ServerVersion(String);

impl ServerVersion {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
