// Runtime configuration read from environment variables (and `.env`)

use std::{
    fmt,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    num::NonZeroU32,
    str::FromStr,
};

use axum::http::HeaderValue;
use thiserror::Error;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HASH_ITERATIONS: u32 = 100_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

// Which route groups the binary mounts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Services {
    #[default]
    All,
    Tasks,
    Users,
}

impl Services {
    pub fn tasks(self) -> bool {
        matches!(self, Services::All | Services::Tasks)
    }

    pub fn users(self) -> bool {
        matches!(self, Services::All | Services::Users)
    }
}

impl FromStr for Services {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Services::All),
            "tasks" => Ok(Services::Tasks),
            "users" => Ok(Services::Users),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Services::All => "all",
            Services::Tasks => "tasks",
            Services::Users => "users",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub services: Services,
    pub cors_origin: Option<HeaderValue>,
    pub password_hash_iterations: NonZeroU32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            services: Services::All,
            cors_origin: None,
            password_hash_iterations: NonZeroU32::new(DEFAULT_HASH_ITERATIONS)
                .unwrap_or(NonZeroU32::MIN),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    // Unset and blank variables keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config = Config::default();

        let host = match var("HOST") {
            Some(value) => parse("HOST", &value)?,
            None => config.addr.ip(),
        };
        let port = match var("PORT") {
            Some(value) => parse("PORT", &value)?,
            None => config.addr.port(),
        };
        config.addr = SocketAddr::new(host, port);

        if let Some(value) = var("SERVICES") {
            config.services = parse("SERVICES", &value)?;
        }

        if let Some(value) = var("CORS_ORIGIN") {
            config.cors_origin = Some(parse("CORS_ORIGIN", &value)?);
        }

        if let Some(value) = var("PASSWORD_HASH_ITERATIONS") {
            config.password_hash_iterations = parse("PASSWORD_HASH_ITERATIONS", &value)?;
        }

        Ok(config)
    }
}

fn parse<T: FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_listen_on_8080_with_both_services() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.services, Services::All);
        assert!(config.cors_origin.is_none());
        assert_eq!(config.password_hash_iterations.get(), 100_000);
    }

    #[test]
    fn overrides_are_applied() {
        let config = config_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "3000"),
            ("SERVICES", "Users"),
            ("CORS_ORIGIN", "http://localhost:3000"),
            ("PASSWORD_HASH_ITERATIONS", "1000"),
        ])
        .unwrap();
        assert_eq!(config.addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.services, Services::Users);
        assert_eq!(config.cors_origin.unwrap(), "http://localhost:3000");
        assert_eq!(config.password_hash_iterations.get(), 1000);
    }

    #[test]
    fn blank_values_keep_defaults() {
        let config = config_from(&[("PORT", "  "), ("SERVICES", "")]).unwrap();
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.services, Services::All);
    }

    #[test]
    fn invalid_values_are_rejected() {
        for (name, value) in [
            ("PORT", "eighty"),
            ("PORT", "70000"),
            ("HOST", "localhost:80"),
            ("SERVICES", "orders"),
            ("PASSWORD_HASH_ITERATIONS", "0"),
        ] {
            let err = config_from(&[(name, value)]).unwrap_err();
            assert!(err.to_string().contains(name), "{name}={value} gave {err}");
        }
    }

    #[test]
    fn services_select_route_groups() {
        assert!(Services::All.tasks() && Services::All.users());
        assert!(Services::Tasks.tasks() && !Services::Tasks.users());
        assert!(!Services::Users.tasks() && Services::Users.users());
    }
}
