//! Route optimization for field visits: given geocoded properties and one or
//! two agents, order the stops to keep total great-circle travel short.

pub mod api;
pub mod app;
pub mod config;
pub mod database;
pub mod distance;
pub mod domain;
pub mod error;
pub mod evaluation;
pub mod export;
pub mod fixtures;
pub mod setup;
pub mod solver;

pub use api::{optimize, OptimizeRequest, OptimizeResponse};
pub use error::{Result, RouteError, ValidationError};
