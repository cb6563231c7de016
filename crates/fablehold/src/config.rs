//! Process-level configuration.

use crate::FableholdError;

/// Where the server listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub const DEFAULT_PORT: u16 = 3000;

    /// Reads `PORT` from the environment.
    pub fn from_env() -> Result<Self, FableholdError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through
    /// `lookup`.
    ///
    /// A missing or empty `PORT` falls back to 3000. Anything that is not a
    /// valid port number is rejected.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, FableholdError> {
        let mut config = Self::default();
        if let Some(raw) = lookup("PORT").filter(|v| !v.trim().is_empty()) {
            config.port = raw.trim().parse().map_err(|_| {
                FableholdError::Config(format!("PORT must be a port number, got {raw:?}"))
            })?;
        }
        Ok(config)
    }

    /// The `host:port` string handed to the listener.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: Self::DEFAULT_PORT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(port: Option<&'static str>) -> impl Fn(&str) -> Option<String> {
        move |key| match key {
            "PORT" => port.map(str::to_string),
            _ => None,
        }
    }

    #[test]
    fn test_missing_port_defaults_to_3000() {
        let config = ServerConfig::from_lookup(lookup(None)).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_port_is_read() {
        let config = ServerConfig::from_lookup(lookup(Some("8080"))).unwrap();
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_blank_port_defaults() {
        let config = ServerConfig::from_lookup(lookup(Some("  "))).unwrap();
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_non_numeric_port_is_rejected() {
        let err = ServerConfig::from_lookup(lookup(Some("http"))).unwrap_err();
        assert!(matches!(err, FableholdError::Config(_)));
        assert!(err.to_string().contains("http"));
    }

    #[test]
    fn test_out_of_range_port_is_rejected() {
        assert!(ServerConfig::from_lookup(lookup(Some("70000"))).is_err());
    }
}
