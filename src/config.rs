use std::env;
use std::str::FromStr;

use dotenv::dotenv;
use tracing::{debug, warn};

use crate::error::{Result, RouteError};

pub mod constant {
    /// Hard cap on properties with usable coordinates per solve.
    pub(crate) const MAX_PROPERTIES: usize = 500;
    /// Cap on depot + stops when the depot is pinned to a property.
    pub(crate) const MAX_DEPOT_CONSTRAINED: usize = 25;
    /// Up to this many stops every stop is tried as a construction seed.
    pub(crate) const EXHAUSTIVE_SEED_LIMIT: usize = 50;
    pub(crate) const SAMPLED_SEED_TARGET: usize = 20;
    /// Minimum gain (km) for a move to count as an improvement.
    pub(crate) const IMPROVEMENT_TOLERANCE: f64 = 1e-4;
    pub(crate) const MAX_BALANCE_ITERATIONS: usize = 50;
    pub(crate) const MAX_SEGMENT_LEN: usize = 3;
    pub(crate) const EARTH_RADIUS_KM: f64 = 6371.0;
    pub(crate) const FIXTURE_SEED: u64 = 12345;
    pub(crate) const DEFAULT_FIXTURE_COUNT: usize = 40;
    pub(crate) const DEFAULT_OUTPUT_CSV: &str = "route_waypoints.csv";
    pub(crate) const DEFAULT_DATABASE_URL: &str = "sqlite:route_assignments.sqlite";
}

/// Runtime settings for the `route-solver` binary, read from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub request_path: Option<String>,
    pub output_csv: String,
    pub database_url: String,
    pub agent: Option<String>,
    pub fixture_count: usize,
    pub fixture_vehicles: i64,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let settings = Settings {
            request_path: non_empty_var("ROUTE_REQUEST_PATH"),
            output_csv: non_empty_var("ROUTE_OUTPUT_CSV")
                .unwrap_or_else(|| constant::DEFAULT_OUTPUT_CSV.to_string()),
            database_url: non_empty_var("DATABASE_URL").unwrap_or_else(|| {
                warn!("DATABASE_URL not set, using default SQLite file");
                constant::DEFAULT_DATABASE_URL.to_string()
            }),
            agent: non_empty_var("ROUTE_AGENT"),
            fixture_count: parse_var("ROUTE_FIXTURE_COUNT")?
                .unwrap_or(constant::DEFAULT_FIXTURE_COUNT),
            fixture_vehicles: parse_var("ROUTE_NUM_VEHICLES")?.unwrap_or(1),
        };

        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T: FromStr>(key: &str) -> Result<Option<T>> {
    match non_empty_var(key) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| RouteError::Config(format!("{key} has an invalid value: {raw}"))),
        None => Ok(None),
    }
}
