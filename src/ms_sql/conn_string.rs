// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

use crate::config::ms_sql::{AuthType, Endpoint};

const MASK: &str = "***";

mod attr {
    pub const DRIVER: &str = "DRIVER";
    pub const SERVER: &str = "SERVER";
    pub const DATABASE: &str = "DATABASE";
    pub const UID: &str = "UID";
    pub const PWD: &str = "PWD";
    pub const TRUSTED_CONNECTION: &str = "Trusted_Connection";
    pub const ENCRYPT: &str = "Encrypt";
    pub const TRUST_SERVER_CERTIFICATE: &str = "TrustServerCertificate";
}

/// ODBC connection string, `KEY=value` pairs separated by `;`
///
/// `Debug` and [`ConnectionString::masked`] hide the password, only
/// [`ConnectionString::expose`] gives the text to hand over to the driver.
#[derive(Clone, PartialEq)]
pub struct ConnectionString {
    attributes: Vec<(&'static str, String)>,
}

impl ConnectionString {
    pub fn from_endpoint(endpoint: &Endpoint) -> Self {
        let (auth, conn) = endpoint.split();
        let mut attributes = vec![
            (attr::DRIVER, braced(&conn.driver().to_string())),
            (attr::SERVER, quote(&conn.server_address())),
            (attr::DATABASE, quote(&conn.database().to_string())),
        ];
        match auth.auth_type() {
            AuthType::SqlServer => {
                attributes.push((attr::UID, quote(auth.username())));
                attributes.push((
                    attr::PWD,
                    quote(auth.password().map(|s| s.as_str()).unwrap_or("")),
                ));
            }
            AuthType::Integrated => attributes.push((attr::TRUSTED_CONNECTION, "yes".to_string())),
        }
        if let Some(encrypt) = conn.encrypt() {
            attributes.push((attr::ENCRYPT, yes_no(encrypt).to_string()));
        }
        if conn.trust_server_certificate() {
            attributes.push((attr::TRUST_SERVER_CERTIFICATE, yes_no(true).to_string()));
        }
        Self { attributes }
    }

    /// text for the driver, contains the password
    pub fn expose(&self) -> String {
        self.render(false)
    }

    /// text for logs and console
    pub fn masked(&self) -> String {
        self.render(true)
    }

    fn render(&self, mask: bool) -> String {
        self.attributes
            .iter()
            .map(|(key, value)| {
                if mask && *key == attr::PWD {
                    format!("{key}={MASK}")
                } else {
                    format!("{key}={value}")
                }
            })
            .collect::<Vec<String>>()
            .join(";")
    }
}

impl std::fmt::Debug for ConnectionString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ConnectionString")
            .field(&self.masked())
            .finish()
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn braced(value: &str) -> String {
    format!("{{{}}}", value.replace('}', "}}"))
}

/// plain values go as is, special ones must be enclosed in braces
fn quote(value: &str) -> String {
    let needs_braces = value.contains(';')
        || value.starts_with('{')
        || value.trim() != value;
    if needs_braces {
        braced(value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ms_sql::Config;

    fn make_endpoint(source: &str) -> Endpoint {
        Config::from_string(source).unwrap().unwrap().main().clone()
    }

    #[test]
    fn test_default_connection_string() {
        let s = ConnectionString::from_endpoint(&Endpoint::default());
        assert_eq!(
            s.expose(),
            r"DRIVER={ODBC Driver 17 for SQL Server};SERVER=MEZADESKTOP\SQLEXPRESS;DATABASE=ClientesDB;UID=sa;PWD=mezasql"
        );
        assert_eq!(
            s.masked(),
            r"DRIVER={ODBC Driver 17 for SQL Server};SERVER=MEZADESKTOP\SQLEXPRESS;DATABASE=ClientesDB;UID=sa;PWD=***"
        );
        assert!(!format!("{s:?}").contains("mezasql"));
    }

    #[test]
    fn test_optional_attributes() {
        let e = make_endpoint(
            r#"
mssql:
  main:
    authentication:
      username: "user"
      password: "pass"
    connection:
      hostname: "localhost"
      port: 1433
      database: "master"
      encrypt: yes
      trust_server_certificate: yes
"#,
        );
        assert_eq!(
            ConnectionString::from_endpoint(&e).expose(),
            "DRIVER={ODBC Driver 17 for SQL Server};SERVER=localhost,1433;DATABASE=master;UID=user;PWD=pass;Encrypt=yes;TrustServerCertificate=yes"
        );
    }

    #[test]
    fn test_integrated() {
        let e = make_endpoint(
            r#"
mssql:
  main:
    authentication:
      type: "integrated"
    connection:
      hostname: "(local)"
      database: "master"
      driver: "SQL Server"
"#,
        );
        assert_eq!(
            ConnectionString::from_endpoint(&e).masked(),
            "DRIVER={SQL Server};SERVER=(local);DATABASE=master;Trusted_Connection=yes"
        );
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote("plain"), "plain");
        assert_eq!(quote("a;b"), "{a;b}");
        assert_eq!(quote("{x}"), "{{x}}}");
        assert_eq!(quote(" pad"), "{ pad}");
        assert_eq!(quote(""), "");
        assert_eq!(braced("d}river"), "{d}}river}");
    }

    #[test]
    fn test_password_with_separator() {
        let e = make_endpoint(
            r#"
mssql:
  main:
    authentication:
      username: "sa"
      password: "p;w}d"
"#,
        );
        let s = ConnectionString::from_endpoint(&e);
        assert!(s.expose().ends_with(";PWD={p;w}}d}"), "{}", s.expose());
        assert!(s.masked().ends_with(";PWD=***"));
    }
}
