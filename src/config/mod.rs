//! Configuration module - environment variable parsing

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::game::combat::WeaponStats;
use crate::game::WorldConfig;

/// Log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Server binding address
    pub server_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
    /// Allowed client origins for CORS; `None` allows any
    pub client_origin: Option<String>,

    /// Simulation ticks per second
    pub tick_rate: u32,
    pub map_width: f32,
    pub map_height: f32,
    /// Projectile lifetime in ticks, `None` for unlimited
    pub projectile_lifetime: Option<u32>,
    /// Decorative obstacles sent with the map
    pub obstacle_count: usize,
    /// Simulation RNG seed, random when unset
    pub world_seed: Option<u64>,
    /// Max inbound messages per second per connection
    pub input_rate_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            client_origin: None,
            tick_rate: 60,
            map_width: 3000.0,
            map_height: 3000.0,
            projectile_lifetime: Some(100),
            obstacle_count: 50,
            world_seed: None,
            input_rate_limit: 120,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        // PORT wins over SERVER_ADDR so hosted platforms can inject it
        let server_addr = match (lookup("PORT"), lookup("SERVER_ADDR")) {
            (Some(port), _) => format!("0.0.0.0:{}", port)
                .parse()
                .map_err(|_| ConfigError::InvalidAddress)?,
            (None, Some(addr)) => addr.parse().map_err(|_| ConfigError::InvalidAddress)?,
            (None, None) => defaults.server_addr,
        };

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(_) => return Err(ConfigError::Invalid("LOG_FORMAT")),
        };

        let tick_rate = parse_or(&lookup, "TICK_RATE", defaults.tick_rate)?;
        if tick_rate == 0 {
            return Err(ConfigError::Invalid("TICK_RATE"));
        }

        let map_width = parse_or(&lookup, "MAP_WIDTH", defaults.map_width)?;
        let map_height = parse_or(&lookup, "MAP_HEIGHT", defaults.map_height)?;
        if !(map_width.is_finite() && map_width > 0.0) {
            return Err(ConfigError::Invalid("MAP_WIDTH"));
        }
        if !(map_height.is_finite() && map_height > 0.0) {
            return Err(ConfigError::Invalid("MAP_HEIGHT"));
        }

        let projectile_lifetime = match lookup("PROJECTILE_LIFETIME_TICKS") {
            None => defaults.projectile_lifetime,
            Some(raw) => match raw
                .parse::<u32>()
                .map_err(|_| ConfigError::Invalid("PROJECTILE_LIFETIME_TICKS"))?
            {
                0 => None,
                ticks => Some(ticks),
            },
        };

        let world_seed = lookup("WORLD_SEED")
            .map(|raw| raw.parse().map_err(|_| ConfigError::Invalid("WORLD_SEED")))
            .transpose()?;

        Ok(Self {
            server_addr,
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_format,
            client_origin: lookup("CLIENT_ORIGIN").filter(|s| !s.trim().is_empty()),
            tick_rate,
            map_width,
            map_height,
            projectile_lifetime,
            obstacle_count: parse_or(&lookup, "OBSTACLE_COUNT", defaults.obstacle_count)?,
            world_seed,
            input_rate_limit: parse_or(&lookup, "INPUT_RATE_LIMIT", defaults.input_rate_limit)?,
        })
    }

    /// Simulation tuning derived from this configuration
    pub fn world(&self) -> WorldConfig {
        WorldConfig {
            width: self.map_width,
            height: self.map_height,
            tick_rate: self.tick_rate,
            weapon: WeaponStats {
                projectile_lifetime: self.projectile_lifetime,
                ..WeaponStats::default()
            },
            ..WorldConfig::default()
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Invalid server address format")]
    InvalidAddress,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.server_addr.port(), 3000);
        assert_eq!(config.tick_rate, 60);
        assert_eq!(config.projectile_lifetime, Some(100));
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.client_origin.is_none());
    }

    #[test]
    fn port_overrides_server_addr() {
        let config = load(&[("PORT", "9000"), ("SERVER_ADDR", "127.0.0.1:1234")]).unwrap();
        assert_eq!(config.server_addr.port(), 9000);
    }

    #[test]
    fn zero_lifetime_disables_budget() {
        let config = load(&[("PROJECTILE_LIFETIME_TICKS", "0")]).unwrap();
        assert_eq!(config.world().weapon.projectile_lifetime, None);
    }

    #[test]
    fn world_uses_map_size() {
        let config = load(&[("MAP_WIDTH", "800"), ("MAP_HEIGHT", "600")]).unwrap();
        let world = config.world();
        assert_eq!((world.width, world.height), (800.0, 600.0));
        assert_eq!(world.player_speed, 5.0);
    }

    #[test]
    fn rejects_bad_numbers() {
        assert!(matches!(load(&[("TICK_RATE", "fast")]), Err(ConfigError::Invalid("TICK_RATE"))));
        assert!(matches!(load(&[("TICK_RATE", "0")]), Err(ConfigError::Invalid("TICK_RATE"))));
        assert!(matches!(load(&[("MAP_WIDTH", "-5")]), Err(ConfigError::Invalid("MAP_WIDTH"))));
        assert!(matches!(load(&[("LOG_FORMAT", "xml")]), Err(ConfigError::Invalid("LOG_FORMAT"))));
        assert!(matches!(load(&[("SERVER_ADDR", "nope")]), Err(ConfigError::InvalidAddress)));
    }
}
