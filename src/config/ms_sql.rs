// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

use crate::args::Args;
use crate::config::defines::{defaults, keys, values};
use crate::config::yaml::{Get, Yaml};
use crate::types::{DatabaseName, DriverName, HostName, InstanceName, Port};
use anyhow::{bail, Context, Result};
use std::time::Duration;

/// All endpoints to probe, in the order they are tried
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Config {
    main: Endpoint,
    configs: Vec<Endpoint>,
}

impl Config {
    pub fn from_string(source: &str) -> Result<Option<Self>> {
        crate::config::yaml::load_from_str(source)?
            .first()
            .and_then(|e| Config::from_yaml(e).transpose())
            .transpose()
    }

    pub fn from_yaml(yaml: &Yaml) -> Result<Option<Self>> {
        let mssql = yaml.get(keys::MSSQL);
        if mssql.is_badvalue() {
            return Ok(None);
        }
        let main = mssql.get(keys::MAIN);
        if main.is_badvalue() {
            bail!("main key is absent");
        }
        let auth = Authentication::from_yaml(main)?;
        let conn = Connection::from_yaml(main)?;
        let configs = mssql
            .get_yaml_vector(keys::CONFIGS)
            .iter()
            .enumerate()
            .map(|(n, c)| {
                Endpoint::from_yaml_inherited(c, &auth, &conn)
                    .with_context(|| format!("bad entry {} in '{}'", n + 1, keys::CONFIGS))
            })
            .collect::<Result<Vec<Endpoint>>>()?;
        Ok(Some(Self {
            main: Endpoint::new(&auth, &conn),
            configs,
        }))
    }

    pub fn main(&self) -> &Endpoint {
        &self.main
    }

    pub fn configs(&self) -> &[Endpoint] {
        &self.configs
    }

    /// main endpoint first, then extra configs
    pub fn endpoints(&self) -> Vec<&Endpoint> {
        std::iter::once(&self.main)
            .chain(self.configs.iter())
            .collect()
    }

    pub fn apply_overrides(&mut self, args: &Args) -> Result<()> {
        self.main.apply_overrides(args)?;
        for endpoint in self.configs.iter_mut() {
            endpoint.apply_overrides(args)?;
        }
        Ok(())
    }
}

#[derive(PartialEq, Debug, Clone, Default)]
pub struct Endpoint {
    auth: Authentication,
    conn: Connection,
}

impl Endpoint {
    pub fn new(auth: &Authentication, conn: &Connection) -> Self {
        Self {
            auth: auth.clone(),
            conn: conn.clone(),
        }
    }

    /// missing `authentication` or `connection` blocks are taken from parent
    fn from_yaml_inherited(
        yaml: &Yaml,
        auth: &Authentication,
        conn: &Connection,
    ) -> Result<Self> {
        let auth = if yaml.get(keys::AUTHENTICATION).is_badvalue() {
            auth.clone()
        } else {
            Authentication::from_yaml(yaml)?
        };
        let conn = if yaml.get(keys::CONNECTION).is_badvalue() {
            conn.clone()
        } else {
            Connection::from_yaml(yaml)?
        };
        Ok(Self { auth, conn })
    }

    pub fn auth(&self) -> &Authentication {
        &self.auth
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn split(&self) -> (&Authentication, &Connection) {
        (self.auth(), self.conn())
    }

    pub fn uses_builtin_credentials(&self) -> bool {
        self.auth.auth_type == AuthType::SqlServer
            && self.auth.username == defaults::USERNAME
            && self.auth.password.as_deref() == Some(defaults::PASSWORD)
    }

    fn apply_overrides(&mut self, args: &Args) -> Result<()> {
        if let Some(username) = &args.username {
            self.auth.username = username.to_owned();
        }
        if let Some(password) = &args.password {
            self.auth.password = Some(password.to_owned());
        }
        let conn = &mut self.conn;
        if let Some(server) = &args.server {
            conn.hostname = server.as_str().into();
        }
        if let Some(instance) = &args.instance {
            conn.instance = Some(instance.as_str().into());
        }
        if let Some(port) = args.port {
            conn.port = Some(port.into());
        }
        if let Some(database) = &args.database {
            conn.database = database.as_str().into();
        }
        if let Some(driver) = &args.driver {
            conn.driver = driver.as_str().into();
        }
        if let Some(backend) = &args.backend {
            conn.backend = Backend::try_from(backend.as_str())?;
        }
        if let Some(timeout) = args.timeout {
            conn.timeout = check_timeout(timeout)?;
        }
        Ok(())
    }
}

/// zero would mean "no timeout" for ODBC and "fail at once" for TDS
fn check_timeout(timeout: u64) -> Result<u64> {
    if timeout == 0 {
        bail!("timeout must be at least 1 second");
    }
    Ok(timeout)
}

/// Endpoint as shown to the user: never contains the password
impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (auth, conn) = self.split();
        writeln!(f, "  backend: {}", conn.backend())?;
        writeln!(f, "  server: {}", conn.server_address())?;
        writeln!(f, "  database: {}", conn.database())?;
        if conn.backend() == &Backend::Odbc {
            writeln!(f, "  driver: {}", conn.driver())?;
        }
        match auth.auth_type() {
            AuthType::SqlServer => writeln!(f, "  user: {}", auth.username())?,
            AuthType::Integrated => writeln!(f, "  authentication: integrated")?,
        }
        write!(
            f,
            "  trust_server_certificate: {}",
            conn.trust_server_certificate()
        )
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct Authentication {
    username: String,
    password: Option<String>,
    auth_type: AuthType,
}

impl Default for Authentication {
    fn default() -> Self {
        Self {
            username: defaults::USERNAME.to_owned(),
            password: Some(defaults::PASSWORD.to_owned()),
            auth_type: AuthType::SqlServer,
        }
    }
}

impl Authentication {
    pub fn from_yaml(yaml: &Yaml) -> Result<Self> {
        let auth = yaml.get(keys::AUTHENTICATION);
        if auth.is_badvalue() {
            return Ok(Self::default());
        }
        let auth_type = AuthType::try_from(
            auth.get_string(keys::TYPE)
                .as_deref()
                .unwrap_or(defaults::AUTH_TYPE),
        )?;
        let username = auth.get_string(keys::USERNAME).unwrap_or_default();
        if auth_type == AuthType::SqlServer && username.is_empty() {
            bail!("bad/absent username");
        }
        Ok(Self {
            username,
            password: auth.get_string(keys::PASSWORD),
            auth_type,
        })
    }
    pub fn username(&self) -> &str {
        &self.username
    }
    pub fn password(&self) -> Option<&String> {
        self.password.as_ref()
    }
    pub fn auth_type(&self) -> &AuthType {
        &self.auth_type
    }
}

#[derive(PartialEq, Debug, Clone)]
pub enum AuthType {
    SqlServer,
    Integrated,
}

impl TryFrom<&str> for AuthType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            values::SQL_SERVER => Ok(Self::SqlServer),
            values::INTEGRATED => Ok(Self::Integrated),
            _ => bail!("unknown auth type '{}'", value),
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub enum Backend {
    Odbc,
    Tds,
}

impl TryFrom<&str> for Backend {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            values::ODBC => Ok(Self::Odbc),
            values::TDS => Ok(Self::Tds),
            _ => bail!("unknown backend '{}'", value),
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Odbc => write!(f, "{}", values::ODBC),
            Backend::Tds => write!(f, "{}", values::TDS),
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct Connection {
    hostname: HostName,
    instance: Option<InstanceName>,
    port: Option<Port>,
    database: DatabaseName,
    driver: DriverName,
    backend: Backend,
    timeout: u64,
    encrypt: Option<bool>,
    trust_server_certificate: bool,
}

impl Default for Connection {
    fn default() -> Self {
        Self {
            hostname: defaults::CONNECTION_HOST_NAME.into(),
            instance: Some(defaults::CONNECTION_INSTANCE.into()),
            port: None,
            database: defaults::CONNECTION_DATABASE.into(),
            driver: defaults::ODBC_DRIVER.into(),
            backend: Backend::Odbc,
            timeout: defaults::CONNECTION_TIMEOUT,
            encrypt: None,
            trust_server_certificate: defaults::TRUST_SERVER_CERTIFICATE,
        }
    }
}

impl Connection {
    pub fn from_yaml(yaml: &Yaml) -> Result<Self> {
        let conn = yaml.get(keys::CONNECTION);
        if conn.is_badvalue() {
            return Ok(Self::default());
        }
        let default = Self::default();
        // an explicitly given host without instance means the default instance
        let hostname = conn.get_string(keys::HOSTNAME);
        let instance = match (conn.get_string(keys::INSTANCE), &hostname) {
            (Some(instance), _) => Some(instance.as_str().into()),
            (None, Some(_)) => None,
            (None, None) => default.instance,
        };
        Ok(Self {
            hostname: hostname.map(HostName::from).unwrap_or(default.hostname),
            instance,
            port: conn.get_optional_int::<u16>(keys::PORT)?.map(Port::from),
            database: conn
                .get_string(keys::DATABASE)
                .map(DatabaseName::from)
                .unwrap_or(default.database),
            driver: conn
                .get_string(keys::DRIVER)
                .map(DriverName::from)
                .unwrap_or(default.driver),
            backend: Backend::try_from(
                conn.get_string(keys::BACKEND)
                    .as_deref()
                    .unwrap_or(defaults::BACKEND),
            )?,
            timeout: check_timeout(
                conn.get_optional_int(keys::TIMEOUT)?
                    .unwrap_or(defaults::CONNECTION_TIMEOUT),
            )?,
            encrypt: conn.get_optional_bool(keys::ENCRYPT)?,
            trust_server_certificate: conn.get_bool(
                keys::TRUST_SERVER_CERTIFICATE,
                defaults::TRUST_SERVER_CERTIFICATE,
            )?,
        })
    }
    pub fn hostname(&self) -> &HostName {
        &self.hostname
    }
    pub fn instance(&self) -> Option<&InstanceName> {
        self.instance.as_ref()
    }
    pub fn port(&self) -> Option<&Port> {
        self.port.as_ref()
    }
    pub fn database(&self) -> &DatabaseName {
        &self.database
    }
    pub fn driver(&self) -> &DriverName {
        &self.driver
    }
    pub fn backend(&self) -> &Backend {
        &self.backend
    }
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
    pub fn encrypt(&self) -> Option<bool> {
        self.encrypt
    }
    pub fn trust_server_certificate(&self) -> bool {
        self.trust_server_certificate
    }

    /// `host`, `host\instance`, `host,port` or `host\instance,port`
    pub fn server_address(&self) -> String {
        let mut address = self.hostname.to_string();
        if let Some(instance) = &self.instance {
            address.push('\\');
            address.push_str(&instance.to_string());
        }
        if let Some(port) = &self.port {
            address.push(',');
            address.push_str(&port.to_string());
        }
        address
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    const FULL: &str = r#"
---
mssql:
  main:
    authentication:
      username: "u"
      password: "p"
      type: "sql_server"
    connection:
      hostname: "db.example.com"
      instance: "INST"
      port: 1444
      database: "master"
      driver: "ODBC Driver 18 for SQL Server"
      backend: "tds"
      timeout: 12
      encrypt: no
      trust_server_certificate: yes
  configs:
    - connection:
        hostname: "127.0.0.1"
        instance: "SQLEXPRESS"
    - authentication:
        username: "nobody"
        type: "integrated"
"#;

    #[test]
    fn test_config_default() {
        let c = Config::default();
        assert_eq!(c.endpoints().len(), 1);
        let (auth, conn) = c.main().split();
        assert_eq!(auth.username(), "sa");
        assert_eq!(auth.password(), Some(&"mezasql".to_string()));
        assert_eq!(auth.auth_type(), &AuthType::SqlServer);
        assert_eq!(conn.server_address(), r"MEZADESKTOP\SQLEXPRESS");
        assert_eq!(conn.database(), &DatabaseName::from("ClientesDB"));
        assert_eq!(
            conn.driver(),
            &DriverName::from("ODBC Driver 17 for SQL Server")
        );
        assert_eq!(conn.backend(), &Backend::Odbc);
        assert_eq!(conn.timeout(), Duration::from_secs(5));
        assert_eq!(conn.encrypt(), None);
        assert!(!conn.trust_server_certificate());
        assert!(c.main().uses_builtin_credentials());
    }

    #[test]
    fn test_config_absent_mssql() {
        assert!(Config::from_string("system:\n  logging: {}\n")
            .unwrap()
            .is_none());
        assert!(Config::from_string("mssql:\n  other: {}\n").is_err());
    }

    #[test]
    fn test_config_full() {
        let c = Config::from_string(FULL).unwrap().unwrap();
        let (auth, conn) = c.main().split();
        assert_eq!(auth.username(), "u");
        assert_eq!(auth.password(), Some(&"p".to_string()));
        assert_eq!(conn.hostname(), &HostName::from("db.example.com"));
        assert_eq!(conn.instance(), Some(&InstanceName::from("INST")));
        assert_eq!(conn.port(), Some(&Port(1444)));
        assert_eq!(conn.server_address(), r"db.example.com\INST,1444");
        assert_eq!(conn.database(), &DatabaseName::from("master"));
        assert_eq!(conn.backend(), &Backend::Tds);
        assert_eq!(conn.timeout(), Duration::from_secs(12));
        assert_eq!(conn.encrypt(), Some(false));
        assert!(conn.trust_server_certificate());
        assert!(!c.main().uses_builtin_credentials());
    }

    #[test]
    fn test_config_configs_inherit() {
        let c = Config::from_string(FULL).unwrap().unwrap();
        assert_eq!(c.endpoints().len(), 3);

        let first = &c.configs()[0];
        assert_eq!(first.auth(), c.main().auth());
        assert_eq!(first.conn().server_address(), r"127.0.0.1\SQLEXPRESS");
        assert_eq!(first.conn().backend(), &Backend::Odbc);
        assert_eq!(first.conn().port(), None);

        let second = &c.configs()[1];
        assert_eq!(second.conn(), c.main().conn());
        assert_eq!(second.auth().auth_type(), &AuthType::Integrated);
        assert_eq!(second.auth().password(), None);
    }

    #[test]
    fn test_connection_host_without_instance() {
        let c = Config::from_string(
            r#"
mssql:
  main:
    connection:
      hostname: "localhost"
"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(c.main().conn().server_address(), "localhost");
        assert_eq!(c.main().auth(), &Authentication::default());
    }

    #[test]
    fn test_config_errors() {
        let bad = |s: &str| Config::from_string(&FULL.replace(s, "weird")).is_err();
        assert!(bad("\"sql_server\""));
        assert!(bad("\"tds\""));
        assert!(bad("1444"));
        assert!(Config::from_string(&FULL.replace("encrypt: no", "encrypt: maybe")).is_err());
        assert!(Config::from_string(&FULL.replace("username: \"u\"", "")).is_err());
        assert!(Config::from_string(&FULL.replace("\"integrated\"", "\"kerberos\"")).is_err());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let e = Config::from_string(&FULL.replace("timeout: 12", "timeout: 0")).unwrap_err();
        assert!(format!("{e:#}").contains("timeout must be"), "{e:#}");
        assert!(Config::from_string(&FULL.replace("timeout: 12", "timeout: -3")).is_err());

        let mut c = Config::from_string(FULL).unwrap().unwrap();
        let args = Args {
            timeout: Some(0),
            ..Default::default()
        };
        assert!(c.apply_overrides(&args).is_err());
        assert!(Args::try_parse_from(["x", "--timeout", "0"]).is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let mut c = Config::from_string(FULL).unwrap().unwrap();
        let args = Args::parse_from([
            "x",
            "--server",
            "other",
            "--database",
            "db2",
            "--backend",
            "odbc",
            "--password",
            "secret",
            "--timeout",
            "1",
        ]);
        c.apply_overrides(&args).unwrap();
        for e in c.endpoints() {
            assert_eq!(e.conn().hostname(), &HostName::from("other"));
            assert_eq!(e.conn().database(), &DatabaseName::from("db2"));
            assert_eq!(e.conn().backend(), &Backend::Odbc);
            assert_eq!(e.conn().timeout(), Duration::from_secs(1));
            assert_eq!(e.auth().password(), Some(&"secret".to_string()));
        }
    }

    #[test]
    fn test_endpoint_display_hides_password() {
        let text = Endpoint::default().to_string();
        assert!(text.contains("server: MEZADESKTOP\\SQLEXPRESS"), "{text}");
        assert!(text.contains("user: sa"), "{text}");
        assert!(text.contains("driver: ODBC Driver 17 for SQL Server"), "{text}");
        assert!(!text.contains("mezasql"), "{text}");
    }
}
