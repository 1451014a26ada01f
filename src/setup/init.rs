use tracing::{debug, info, warn};

use crate::api::types::{OptimizeRequest, PropertyInput};
use crate::config::constant::{MAX_DEPOT_CONSTRAINED, MAX_PROPERTIES};
use crate::distance::matrix::{haversine_km, DistanceMatrix};
use crate::domain::types::{Location, ProblemInstance};
use crate::error::{Result, ValidationError};
use crate::setup::init_types::PreparedProblem;

/// Validate a request and build the problem instance for the solver.
pub fn setup(request: &OptimizeRequest) -> Result<PreparedProblem<'_>> {
    if request.properties.is_empty() {
        return Err(ValidationError::MissingProperties.into());
    }

    let num_vehicles = match request.num_vehicles {
        1 => 1,
        2 => 2,
        other => return Err(ValidationError::InvalidVehicleCount(other).into()),
    };

    let properties = valid_properties(&request.properties);
    if properties.is_empty() {
        return Err(ValidationError::NoValidCoordinates.into());
    }
    if properties.len() > MAX_PROPERTIES {
        return Err(ValidationError::TooManyProperties {
            count: properties.len(),
            max: MAX_PROPERTIES,
        }
        .into());
    }
    if request.depot_property_id.is_some() && properties.len() > MAX_DEPOT_CONSTRAINED {
        return Err(ValidationError::TooManyForDepot {
            count: properties.len(),
            max: MAX_DEPOT_CONSTRAINED,
        }
        .into());
    }

    let depot = select_depot(&properties, request)?;
    let second_depot = match (&request.second_depot_property_id, num_vehicles) {
        (Some(key), 2) => {
            let idx = find_by_key(&properties, key)?;
            (idx != depot).then_some(idx)
        }
        (Some(key), _) => {
            warn!("Ignoring second depot {} for a single-vehicle request", key);
            None
        }
        (None, _) => None,
    };

    let locations: Vec<Location> = properties
        .iter()
        .enumerate()
        .map(|(index, p)| {
            let (lat, lon) = p.coordinates().unwrap_or_default();
            Location {
                index,
                id: p.id.clone(),
                lat,
                lon,
                is_depot: index == depot || Some(index) == second_depot,
            }
        })
        .collect();

    let stops: Vec<usize> = locations
        .iter()
        .filter(|l| !l.is_depot)
        .map(|l| l.index)
        .collect();
    if stops.is_empty() {
        return Err(ValidationError::NoStops.into());
    }

    let distance_matrix = DistanceMatrix::from_locations(&locations)?;
    distance_matrix.log_rows();

    info!(
        "Prepared problem: {} stops, {} vehicle(s), depot {}",
        stops.len(),
        num_vehicles,
        locations[depot].id
    );

    Ok(PreparedProblem {
        problem: ProblemInstance {
            locations,
            distance_matrix,
            depot,
            second_depot,
            stops,
            num_vehicles,
        },
        properties,
    })
}

/// Keep properties whose coordinates parsed, preserving supplied order.
fn valid_properties(all: &[PropertyInput]) -> Vec<&PropertyInput> {
    let valid: Vec<&PropertyInput> = all.iter().filter(|p| p.coordinates().is_some()).collect();

    let skipped = all.len() - valid.len();
    if skipped > 0 {
        warn!("Excluded {} properties without valid coordinates", skipped);
        for p in all.iter().filter(|p| p.coordinates().is_none()) {
            debug!("Excluded property {}", p.id);
        }
    }
    valid
}

/// Resolve the depot: explicit identifier, then nearest to explicit
/// coordinates, then the first property.
pub fn select_depot(properties: &[&PropertyInput], request: &OptimizeRequest) -> Result<usize> {
    if let Some(key) = &request.depot_property_id {
        return find_by_key(properties, key);
    }

    if let (Some(lat), Some(lon)) = (request.depot_lat, request.depot_lon) {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (i, p) in properties.iter().enumerate() {
            if let Some((plat, plon)) = p.coordinates() {
                let d = haversine_km(lat, lon, plat, plon);
                if d < best_dist {
                    best = i;
                    best_dist = d;
                }
            }
        }
        debug!(
            "Depot nearest to ({}, {}) is {} at {:.3} km",
            lat, lon, properties[best].id, best_dist
        );
        return Ok(best);
    }

    Ok(0)
}

fn find_by_key(properties: &[&PropertyInput], key: &str) -> Result<usize> {
    properties
        .iter()
        .position(|p| p.matches_key(key))
        .ok_or_else(|| ValidationError::DepotNotFound(key.to_string()).into())
}
