//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use classroom_messagebus::AsyncBusConfig;

use crate::error::AppError;

/// How committed events reach the projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusMode {
    /// Projections run before the command returns.
    Sync,
    /// Projections run in background tasks.
    Async,
}

impl BusMode {
    /// Returns the configuration spelling of the mode.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sync => "sync",
            Self::Async => "async",
        }
    }
}

impl FromStr for BusMode {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sync" => Ok(Self::Sync),
            "async" => Ok(Self::Async),
            other => Err(AppError::Config(format!(
                "BUS_MODE must be `sync` or `async`, got `{other}`"
            ))),
        }
    }
}

/// Server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Event delivery mode.
    pub bus_mode: BusMode,
    /// Tuning of the asynchronous bus; ignored in `sync` mode.
    pub async_bus: AsyncBusConfig,
}

impl Config {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned());
        let port = parse(&lookup, "PORT")?.unwrap_or(3000);
        let bus_mode = lookup("BUS_MODE")
            .map(|value| value.parse())
            .transpose()?
            .unwrap_or(BusMode::Async);
        let capacity = parse(&lookup, "BUS_CAPACITY")?.unwrap_or(AsyncBusConfig::default().capacity);
        let simulated_latency = parse(&lookup, "BUS_SIMULATED_LATENCY_MS")?.map(Duration::from_millis);

        Ok(Self {
            host,
            port,
            bus_mode,
            async_bus: AsyncBusConfig {
                capacity,
                simulated_latency,
            },
        })
    }

    /// Returns the address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|e| AppError::Config(format!("{key} is invalid: {e}")))
        })
        .transpose()
}
