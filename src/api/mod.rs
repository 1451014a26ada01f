pub mod mapper;
pub mod types;

use tracing::{info, span, Level};

use crate::error::Result;
use crate::setup::init::setup;
use crate::solver::multi_start::solve;

pub use types::{OptimizeRequest, OptimizeResponse, PropertyInput, RouteOutput, Waypoint};

/// Validate the request, search for the best routes and map them to waypoints.
pub fn optimize(request: &OptimizeRequest) -> Result<OptimizeResponse> {
    let span = span!(Level::INFO, "optimize", properties = request.properties.len());
    let _guard = span.enter();

    let prepared = setup(request)?;
    let outcome = solve(&prepared.problem)?;
    let response = mapper::map_solution(&prepared.problem, &prepared.properties, &outcome);

    info!(
        "Optimized {} stops: total cost {:.2} km, reported distance {:.2} km, {} seeds",
        prepared.problem.stops.len(),
        response.total_cost,
        response.total_distance,
        response.iterations
    );
    Ok(response)
}
