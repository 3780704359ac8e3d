// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

pub mod keys {
    pub const MSSQL: &str = "mssql";
    pub const MAIN: &str = "main";
    pub const CONFIGS: &str = "configs";

    pub const AUTHENTICATION: &str = "authentication";
    pub const USERNAME: &str = "username";
    pub const PASSWORD: &str = "password";
    pub const TYPE: &str = "type";

    pub const CONNECTION: &str = "connection";
    pub const HOSTNAME: &str = "hostname";
    pub const INSTANCE: &str = "instance";
    pub const PORT: &str = "port";
    pub const DATABASE: &str = "database";
    pub const DRIVER: &str = "driver";
    pub const BACKEND: &str = "backend";
    pub const TIMEOUT: &str = "timeout";
    pub const ENCRYPT: &str = "encrypt";
    pub const TRUST_SERVER_CERTIFICATE: &str = "trust_server_certificate";
}

pub mod values {
    /// AuthType::SqlServer
    pub const SQL_SERVER: &str = "sql_server";
    /// AuthType::Integrated
    pub const INTEGRATED: &str = "integrated";
    /// Backend::Odbc
    pub const ODBC: &str = "odbc";
    /// Backend::Tds
    pub const TDS: &str = "tds";
}

/// Values used when nothing is configured: the legacy diagnostic endpoint
pub mod defaults {
    use super::values;
    pub const AUTH_TYPE: &str = values::SQL_SERVER;
    pub const USERNAME: &str = "sa";
    pub const PASSWORD: &str = "mezasql";

    pub const CONNECTION_HOST_NAME: &str = "MEZADESKTOP";
    pub const CONNECTION_INSTANCE: &str = "SQLEXPRESS";
    pub const CONNECTION_DATABASE: &str = "ClientesDB";
    pub const ODBC_DRIVER: &str = "ODBC Driver 17 for SQL Server";
    pub const BACKEND: &str = values::ODBC;
    pub const CONNECTION_TIMEOUT: u64 = 5;
    pub const TRUST_SERVER_CERTIFICATE: bool = false;

    /// used by the native client when neither port nor instance is given
    pub const STANDARD_PORT: u16 = 1433;
    pub const SQL_BROWSER_PORT: u16 = 1434;
}
