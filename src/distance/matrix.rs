use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::constant::EARTH_RADIUS_KM;
use crate::domain::types::Location;
use crate::error::{Result, RouteError};

/// Great-circle distance in kilometres between two points given in degrees.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lon / 2.0).sin().powi(2);
    // h can drift just above 1.0 for antipodal points
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Dense, symmetric all-pairs distance table in kilometres.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Build the matrix for `(lat, lon)` points.
    ///
    /// Only the upper triangle is evaluated; the lower one is mirrored from it,
    /// so `get(i, j) == get(j, i)` holds bit for bit and the diagonal is exactly zero.
    pub fn from_points(points: &[(f64, f64)]) -> Result<Self> {
        let n = points.len();
        if n == 0 {
            return Err(RouteError::internal(
                "distance matrix requires at least one location",
            ));
        }

        let upper: Vec<Vec<f64>> = (0..n)
            .into_par_iter()
            .map(|i| {
                let (lat1, lon1) = points[i];
                ((i + 1)..n)
                    .map(|j| {
                        let (lat2, lon2) = points[j];
                        haversine_km(lat1, lon1, lat2, lon2)
                    })
                    .collect()
            })
            .collect();

        let mut data = vec![0.0; n * n];
        for (i, row) in upper.iter().enumerate() {
            for (offset, &d) in row.iter().enumerate() {
                let j = i + 1 + offset;
                if !d.is_finite() || d < 0.0 {
                    return Err(RouteError::internal(format!(
                        "invalid distance {d} between locations {i} and {j}"
                    )));
                }
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }

        info!("Built {}x{} distance matrix", n, n);
        Ok(DistanceMatrix { n, data })
    }

    pub fn from_locations(locations: &[Location]) -> Result<Self> {
        let points: Vec<(f64, f64)> = locations.iter().map(|l| (l.lat, l.lon)).collect();
        Self::from_points(&points)
    }

    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.n + to]
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn row(&self, from: usize) -> &[f64] {
        &self.data[from * self.n..(from + 1) * self.n]
    }

    pub fn log_rows(&self) {
        debug!("Distance matrix:");
        for i in 0..self.n {
            debug!("{:?}", self.row(i));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn one_degree_of_longitude_at_equator() {
        let d = haversine_km(0.0, 0.0, 0.0, 1.0);
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn single_location_is_zero_matrix() {
        let dm = DistanceMatrix::from_points(&[(29.76, -95.37)]).unwrap();
        assert_eq!(dm.len(), 1);
        assert_eq!(dm.get(0, 0), 0.0);
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = DistanceMatrix::from_points(&[]).unwrap_err();
        assert!(!err.is_validation());
    }

    #[test]
    fn antipodal_points_do_not_produce_nan() {
        let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (0.0, 180.0)]).unwrap();
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((dm.get(0, 1) - half_circumference).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_matrix_symmetric_with_zero_diagonal(
            points in prop::collection::vec((-80.0f64..80.0, -179.0f64..179.0), 1..25)
        ) {
            let dm = DistanceMatrix::from_points(&points).unwrap();
            for i in 0..dm.len() {
                prop_assert_eq!(dm.get(i, i), 0.0);
                for j in 0..dm.len() {
                    prop_assert_eq!(dm.get(i, j), dm.get(j, i));
                    prop_assert!(dm.get(i, j) >= 0.0);
                }
            }
        }
    }
}
