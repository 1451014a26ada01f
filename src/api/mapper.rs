use serde_json::{Map, Value};

use crate::api::types::{DepotOutput, OptimizeResponse, PropertyInput, RouteOutput, Waypoint};
use crate::domain::types::{ProblemInstance, Route};
use crate::evaluation::fitness::find_distance;
use crate::solver::multi_start::SearchOutcome;

/// Turn the winning solution into the response body.
///
/// Each route lists its depot once, as the first waypoint; the closing
/// return to the depot is dropped. `distance` is measured over exactly the
/// listed waypoints, so it does not include that return leg, while `cost`
/// is the full closed tour.
pub fn map_solution(
    problem: &ProblemInstance,
    properties: &[&PropertyInput],
    outcome: &SearchOutcome,
) -> OptimizeResponse {
    let routes: Vec<RouteOutput> = outcome
        .solution
        .routes
        .iter()
        .map(|route| map_route(problem, properties, route))
        .collect();

    let total_distance = routes.iter().map(|r| r.distance).sum();
    let depot = &problem.locations[problem.depot];

    OptimizeResponse {
        success: true,
        num_vehicles: problem.num_vehicles,
        total_cost: outcome.solution.total_cost,
        total_distance,
        iterations: outcome.seeds_tried,
        routes,
        depot: DepotOutput {
            lat: depot.lat,
            lon: depot.lon,
            address: properties[problem.depot].address.clone(),
        },
    }
}

/// Waypoint keys computed by the optimizer; caller fields with these names are dropped.
const RESERVED_WAYPOINT_KEYS: [&str; 6] = ["lat", "lon", "id", "address", "isDepot", "waypointIndex"];

fn passthrough_fields(extra: &Map<String, Value>) -> Map<String, Value> {
    extra
        .iter()
        .filter(|(key, _)| !RESERVED_WAYPOINT_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn map_route(problem: &ProblemInstance, properties: &[&PropertyInput], route: &Route) -> RouteOutput {
    let shown = &route.route[..route.route.len().saturating_sub(1)];
    let dm = &problem.distance_matrix;

    let waypoints = shown
        .iter()
        .enumerate()
        .map(|(waypoint_index, &idx)| {
            let location = &problem.locations[idx];
            let property = properties[idx];
            Waypoint {
                lat: location.lat,
                lon: location.lon,
                id: location.id.clone(),
                address: property.address.clone(),
                is_depot: location.is_depot,
                waypoint_index,
                extra: passthrough_fields(&property.extra),
            }
        })
        .collect();

    RouteOutput {
        waypoints,
        cost: route.cost,
        distance: find_distance(shown, dm),
    }
}
