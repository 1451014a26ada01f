use tracing::trace;

use crate::distance::matrix::DistanceMatrix;
use crate::domain::types::Route;
use crate::evaluation::fitness::refresh_cost;
use crate::error::{Result, RouteError};

/// Greedy tour from `start` through every node in `nodes`, closed back at `start`.
///
/// At each step the closest unvisited node wins; on equal distance the one
/// earlier in `nodes` is kept.
pub fn nearest_neighbor(start: usize, nodes: &[usize], dm: &DistanceMatrix) -> Route {
    let mut tour = Vec::with_capacity(nodes.len() + 2);
    tour.push(start);

    let mut visited = vec![false; nodes.len()];
    let mut current = start;

    for _ in 0..nodes.len() {
        let mut best: Option<(usize, f64)> = None;
        for (pos, &node) in nodes.iter().enumerate() {
            if visited[pos] {
                continue;
            }
            let d = dm.get(current, node);
            if best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((pos, d));
            }
        }

        let Some((pos, d)) = best else { break };
        trace!("nn: {} -> {} ({:.3} km)", current, nodes[pos], d);
        visited[pos] = true;
        current = nodes[pos];
        tour.push(current);
    }

    tour.push(start);

    let mut route = Route {
        route: tour,
        cost: 0.0,
    };
    refresh_cost(&mut route, dm);
    route
}

/// Rotate a closed tour so it starts and ends at `anchor`. Cost is unchanged.
pub fn rotate_to_anchor(mut route: Route, anchor: usize) -> Result<Route> {
    // drop the closing duplicate, rotate the cycle, close it again
    route.route.pop();
    let pos = route
        .route
        .iter()
        .position(|&n| n == anchor)
        .ok_or_else(|| RouteError::internal(format!("anchor {anchor} is not on the tour")))?;
    route.route.rotate_left(pos);
    route.route.push(anchor);
    Ok(route)
}
