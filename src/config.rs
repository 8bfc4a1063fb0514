//! Startup configuration read from the process environment.
//!
//! Binaries call `dotenv::dotenv()` first so a local `.env` file can supply
//! any of these variables.

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{config_error, Error};
use crate::planner::METERS_PER_MILE;

pub const DEFAULT_API_BASE: &str = "https://maps.googleapis.com";
pub const DEFAULT_PLACE_TYPE: &str = "bar";
pub const DEFAULT_SEARCH_RADIUS_METERS: f64 = 1500.0;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_STOPS: i64 = 3;
pub const DEFAULT_MAP_BASE_URL: &str = "https://www.google.com/maps/dir";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_ALLOWED_ORIGINS: &str =
    "https://conchoe.github.io,http://localhost:8000,http://127.0.0.1:3000";

#[derive(Clone, Debug)]
pub struct Config {
    pub google_maps: GoogleMapsConfig,
    pub planner: PlannerConfig,
    pub server: ServerConfig,
}

#[derive(Clone)]
pub struct GoogleMapsConfig {
    pub api_base: String,
    pub api_key: String,
    pub place_type: String,
    pub timeout: Duration,
}

impl fmt::Debug for GoogleMapsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleMapsConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &"<redacted>")
            .field("place_type", &self.place_type)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct PlannerConfig {
    pub search_radius_miles: f64,
    pub default_stops: i64,
    pub map_base_url: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            search_radius_miles: DEFAULT_SEARCH_RADIUS_METERS / METERS_PER_MILE,
            default_stops: DEFAULT_STOPS,
            map_base_url: DEFAULT_MAP_BASE_URL.into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub allowed_origins: Vec<String>,
}

impl Config {
    #[tracing::instrument(name = "Config::from_env")]
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// The API key is the only required value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GOOGLE_MAPS_API_KEY")
            .or_else(|| lookup("GOOGLE_API_KEY"))
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| config_error("GOOGLE_MAPS_API_KEY"))?;

        let google_maps = GoogleMapsConfig {
            api_base: lookup("GOOGLE_MAPS_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.into()),
            api_key,
            place_type: lookup("BARHOP_PLACE_TYPE").unwrap_or_else(|| DEFAULT_PLACE_TYPE.into()),
            timeout: Duration::from_secs(parse_or(
                &lookup,
                "BARHOP_HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )?),
        };

        let radius_meters: f64 = parse_or(
            &lookup,
            "BARHOP_SEARCH_RADIUS_METERS",
            DEFAULT_SEARCH_RADIUS_METERS,
        )?;
        if !radius_meters.is_finite() || radius_meters <= 0.0 {
            return Err(config_error("BARHOP_SEARCH_RADIUS_METERS"));
        }

        let planner = PlannerConfig {
            search_radius_miles: radius_meters / METERS_PER_MILE,
            default_stops: parse_or(&lookup, "BARHOP_DEFAULT_STOPS", DEFAULT_STOPS)?,
            map_base_url: lookup("BARHOP_MAP_BASE_URL")
                .unwrap_or_else(|| DEFAULT_MAP_BASE_URL.into()),
        };

        let bind_addr = lookup("BARHOP_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let server = ServerConfig {
            bind_addr: bind_addr
                .parse()
                .map_err(|_| config_error("BARHOP_BIND_ADDR"))?,
            allowed_origins: lookup("BARHOP_ALLOWED_ORIGINS")
                .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.into())
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect(),
        };

        Ok(Self {
            google_maps,
            planner,
            server,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T, Error>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(value) => value.trim().parse().map_err(|_| config_error(name)),
        None => Ok(default),
    }
}

#[cfg(test)]
fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: std::collections::HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    move |name| vars.get(name).cloned()
}

#[test]
fn missing_api_key_fails_at_startup() {
    use crate::error::ErrorKind;

    let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);

    let err = Config::from_lookup(lookup_from(&[("GOOGLE_MAPS_API_KEY", "  ")])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn defaults_apply() {
    let config = Config::from_lookup(lookup_from(&[("GOOGLE_API_KEY", "secret")])).unwrap();

    assert_eq!(config.google_maps.api_key, "secret");
    assert_eq!(config.google_maps.api_base, DEFAULT_API_BASE);
    assert_eq!(config.google_maps.place_type, "bar");
    assert_eq!(config.google_maps.timeout, Duration::from_secs(10));
    assert_eq!(config.planner.default_stops, 3);
    assert!((config.planner.search_radius_miles * METERS_PER_MILE - 1500.0).abs() < 1e-9);
    assert_eq!(config.server.bind_addr, "0.0.0.0:8000".parse().unwrap());
    assert_eq!(config.server.allowed_origins.len(), 3);
}

#[test]
fn overrides_are_parsed() {
    let config = Config::from_lookup(lookup_from(&[
        ("GOOGLE_MAPS_API_KEY", "primary"),
        ("GOOGLE_API_KEY", "fallback"),
        ("BARHOP_SEARCH_RADIUS_METERS", "804.672"),
        ("BARHOP_DEFAULT_STOPS", "5"),
        ("BARHOP_BIND_ADDR", "127.0.0.1:9000"),
        ("BARHOP_ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
    ]))
    .unwrap();

    assert_eq!(config.google_maps.api_key, "primary");
    assert!((config.planner.search_radius_miles - 0.5).abs() < 1e-9);
    assert_eq!(config.planner.default_stops, 5);
    assert_eq!(config.server.bind_addr.port(), 9000);
    assert_eq!(
        config.server.allowed_origins,
        vec!["https://a.example".to_string(), "https://b.example".to_string()]
    );
}

#[test]
fn unparsable_values_are_config_errors() {
    use crate::error::ErrorKind;

    for (name, value) in [
        ("BARHOP_DEFAULT_STOPS", "three"),
        ("BARHOP_SEARCH_RADIUS_METERS", "-1"),
        ("BARHOP_BIND_ADDR", "nowhere"),
        ("BARHOP_HTTP_TIMEOUT_SECS", "soon"),
    ] {
        let err = Config::from_lookup(lookup_from(&[("GOOGLE_MAPS_API_KEY", "k"), (name, value)]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.message.contains(name));
    }
}

#[test]
fn api_key_is_redacted_from_debug() {
    let config = Config::from_lookup(lookup_from(&[("GOOGLE_MAPS_API_KEY", "hunter2")])).unwrap();
    assert!(!format!("{:?}", config).contains("hunter2"));
}
