// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

use assert_cmd::Command;
use std::io::Write;
use tempfile::{Builder, NamedTempFile, TempDir};

pub fn run_bin() -> Command {
    let mut cmd = Command::cargo_bin("sql-probe").unwrap();
    // never pick up a config or log dir of the developer machine
    cmd.env_remove("SQL_PROBE_CONFDIR")
        .env_remove("SQL_PROBE_LOGDIR");
    cmd
}

/// returns stdout content +  resulting code
pub fn get_good_results(output: &std::process::Output) -> (String, i32) {
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        output.status.code().unwrap(),
    )
}

pub const SQL_DB_ENDPOINT: &str = "CI_TEST_SQL_DB_ENDPOINT";
pub const SQL_DB_ODBC_DRIVER: &str = "CI_TEST_SQL_DB_ODBC_DRIVER";
const SQL_DB_ENDPOINT_SPLITTER: char = ':';
pub struct SqlDbEndpoint {
    pub host: String,
    pub user: String,
    pub pwd: String,
}

pub fn get_remote_sql_from_env_var() -> Option<SqlDbEndpoint> {
    if let Ok(content) = std::env::var(SQL_DB_ENDPOINT) {
        let x: Vec<&str> = content.split(SQL_DB_ENDPOINT_SPLITTER).collect();
        if x.len() == 3 {
            return Some(SqlDbEndpoint {
                host: x[0].to_owned(),
                user: x[1].to_owned(),
                pwd: x[2].to_owned(),
            });
        } else {
            println!(
                "Error: environment variable {} is invalid, must have format 'host:user:password' expected",
                SQL_DB_ENDPOINT
            );
        }
    } else {
        println!("Error: environment variable {} is absent", SQL_DB_ENDPOINT);
    }
    None
}

pub fn get_odbc_driver_from_env_var() -> String {
    std::env::var(SQL_DB_ODBC_DRIVER).unwrap_or("ODBC Driver 18 for SQL Server".to_string())
}

pub fn create_remote_config(end_point: &SqlDbEndpoint, backend: &str) -> String {
    format!(
        r#"
---
mssql:
  main:
    authentication:
       username: "{}"
       password: "{}"
       type: "sql_server"
    connection:
       hostname: "{}"
       database: "master"
       driver: "{}"
       backend: "{}"
       trust_server_certificate: yes
"#,
        end_point.user,
        end_point.pwd,
        end_point.host,
        get_odbc_driver_from_env_var(),
        backend
    )
}

/// main points to a closed port, the only `configs` entry is the remote server
pub fn create_fallback_config(end_point: &SqlDbEndpoint, backend: &str) -> String {
    format!(
        r#"
---
mssql:
  main:
    authentication:
       username: "bad_user"
       password: "bad_password"
       type: "sql_server"
    connection:
       hostname: "localhost"
       port: 65345
       backend: tds
       timeout: 1
  configs:
    - authentication:
        username: "{}"
        password: "{}"
        type: "sql_server"
      connection:
        hostname: "{}"
        database: "master"
        driver: "{}"
        backend: "{}"
        trust_server_certificate: yes
"#,
        end_point.user,
        end_point.pwd,
        end_point.host,
        get_odbc_driver_from_env_var(),
        backend
    )
}

/// every endpoint points to a closed port on the local host
pub fn create_unreachable_config(hosts: &[&str]) -> NamedTempFile {
    let configs = hosts
        .iter()
        .map(|h| format!("    - connection:\n        hostname: \"{h}\"\n        port: 65345\n        backend: tds\n        timeout: 1\n"))
        .collect::<String>();
    let config = format!(
        r#"
---
mssql:
  main:
    authentication:
       username: "bad_user"
       password: "bad_password"
       type: "sql_server"
    connection:
       hostname: "localhost" # we use real host to avoid long timeout
       port: 65345 # we use weird port to avoid connection
       backend: tds
       timeout: 1
  configs:
{configs}"#
    );
    let mut l = NamedTempFile::new().unwrap();
    l.write_all(config.as_bytes()).unwrap();
    l
}

pub fn create_temp_process_dir() -> TempDir {
    Builder::new()
        .prefix(&format!("sql-probe-{}", std::process::id()))
        .rand_bytes(5)
        .tempdir()
        .unwrap()
}
