pub mod matrix;

pub use matrix::{haversine_km, DistanceMatrix};
