use thiserror::Error;
use tokio_postgres::Config;

#[derive(Error, Debug, PartialEq)]
pub enum DatabaseOptionsError {
    #[error("Missing database option: {0}")]
    Missing(&'static str),
    #[error("Invalid port in database host {0:?}")]
    InvalidPort(String),
}

/// Connection parameters for the postgres backend, all four are required
#[derive(Debug, Clone, Default)]
pub struct DatabaseOptions {
    pub host: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database_name: Option<String>,
}

// Implements: https://rust-unofficial.github.io/patterns/patterns/creational/builder.html
impl DatabaseOptions {
    /// Either `host` or `host:port`, the postgres default port is used when omitted
    pub fn set_host(mut self, host: Option<String>) -> Self {
        self.host = host;
        self
    }

    pub fn set_user(mut self, user: Option<String>) -> Self {
        self.user = user;
        self
    }

    pub fn set_password(mut self, password: Option<String>) -> Self {
        self.password = password;
        self
    }

    pub fn set_database_name(mut self, database_name: Option<String>) -> Self {
        self.database_name = database_name;
        self
    }

    /// Builds the driver configuration, failing on the first missing option
    pub fn to_pg_config(&self) -> Result<Config, DatabaseOptionsError> {
        let host = required(&self.host, "DB_HOST")?;
        let user = required(&self.user, "DB_USER")?;
        let password = required(&self.password, "DB_PASSWORD")?;
        let database_name = required(&self.database_name, "DB_NAME")?;

        let mut config = Config::new();

        match host.rsplit_once(':') {
            Some((hostname, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| DatabaseOptionsError::InvalidPort(host.to_string()))?;

                config.host(hostname).port(port);
            }
            None => {
                config.host(host);
            }
        }

        config
            .user(user)
            .password(password)
            .dbname(database_name)
            .application_name(crate::consts::consts::SERVICE_NAME);

        Ok(config)
    }
}

/// Empty values count as missing, the same as an unset environment variable
fn required<'a>(
    value: &'a Option<String>,
    name: &'static str,
) -> Result<&'a str, DatabaseOptionsError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(DatabaseOptionsError::Missing(name)),
    }
}

#[cfg(test)]
impl DatabaseOptions {
    pub fn new_test() -> Self {
        DatabaseOptions::default()
            .set_host(Some("localhost".to_string()))
            .set_user(Some("meibo".to_string()))
            .set_password(Some("mysecretpassword".to_string()))
            .set_database_name(Some("meibo".to_string()))
    }
}
