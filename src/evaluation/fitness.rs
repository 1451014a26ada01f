use itertools::Itertools;

use crate::distance::matrix::DistanceMatrix;
use crate::domain::types::Route;

/// Sum of consecutive edge lengths along `nodes`; no closing edge is added.
pub fn find_distance(nodes: &[usize], dm: &DistanceMatrix) -> f64 {
    nodes
        .iter()
        .tuple_windows()
        .map(|(&a, &b)| dist_between(a, b, dm))
        .sum()
}

/// Cost of a closed route. The route already repeats its depot at the end,
/// so this is the full tour including the return leg.
pub fn route_cost(route: &Route, dm: &DistanceMatrix) -> f64 {
    find_distance(&route.route, dm)
}

/// Recompute and store a route's cost.
pub fn refresh_cost(route: &mut Route, dm: &DistanceMatrix) {
    route.cost = route_cost(route, dm);
}

#[inline]
pub fn dist_between(from_loc: usize, to_loc: usize, dm: &DistanceMatrix) -> f64 {
    dm.get(from_loc, to_loc)
}
