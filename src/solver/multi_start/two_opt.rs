use tracing::trace;

use crate::config::constant::IMPROVEMENT_TOLERANCE;
use crate::distance::matrix::DistanceMatrix;
use crate::domain::types::Route;
use crate::evaluation::fitness::refresh_cost;

/// Edge-exchange pass: reverse `route[i..=j]` whenever that shortens the tour,
/// restarting the scan after every accepted move until none is left.
pub fn two_opt(mut route: Route, dm: &DistanceMatrix) -> Route {
    let moves = two_opt_in_place(&mut route.route, dm);
    refresh_cost(&mut route, dm);
    if moves > 0 {
        trace!("2-opt: {} moves, cost {:.3}", moves, route.cost);
    }
    route
}

/// Returns the number of accepted moves.
pub(crate) fn two_opt_in_place(tour: &mut [usize], dm: &DistanceMatrix) -> usize {
    let n = tour.len();
    // endpoints stay fixed, so at least two inner positions are needed
    if n < 4 {
        return 0;
    }

    let mut moves = 0;
    loop {
        let mut improved = false;

        'scan: for i in 1..n - 2 {
            for j in (i + 1)..n - 1 {
                let delta = two_opt_delta(tour, dm, i, j);
                if delta < -IMPROVEMENT_TOLERANCE {
                    tour[i..=j].reverse();
                    moves += 1;
                    improved = true;
                    break 'scan;
                }
            }
        }

        if !improved {
            break;
        }
    }
    moves
}

/// Change in length from replacing edges (i-1, i) and (j, j+1)
/// with (i-1, j) and (i, j+1).
fn two_opt_delta(tour: &[usize], dm: &DistanceMatrix, i: usize, j: usize) -> f64 {
    let (a, b) = (tour[i - 1], tour[i]);
    let (c, d) = (tour[j], tour[j + 1]);
    dm.get(a, c) + dm.get(b, d) - dm.get(a, b) - dm.get(c, d)
}
