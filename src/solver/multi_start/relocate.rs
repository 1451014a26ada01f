use tracing::trace;

use crate::config::constant::{IMPROVEMENT_TOLERANCE, MAX_BALANCE_ITERATIONS};
use crate::distance::matrix::DistanceMatrix;
use crate::domain::types::Route;
use crate::evaluation::fitness::refresh_cost;
use crate::solver::multi_start::two_opt::two_opt;

/// Move a single stop between the two routes if that lowers their combined cost.
///
/// Tries `a -> b` first and only then `b -> a`; the first improving move found
/// is applied and the function returns `true`.
pub fn relocate(a: &mut Route, b: &mut Route, dm: &DistanceMatrix) -> bool {
    let moved = move_first_improving(&mut a.route, &mut b.route, dm)
        || move_first_improving(&mut b.route, &mut a.route, dm);
    if moved {
        refresh_cost(a, dm);
        refresh_cost(b, dm);
    }
    moved
}

fn move_first_improving(from: &mut Vec<usize>, to: &mut Vec<usize>, dm: &DistanceMatrix) -> bool {
    let n = from.len();
    for i in 1..n.saturating_sub(1) {
        let (prev, node, next) = (from[i - 1], from[i], from[i + 1]);
        let removal_saving = dm.get(prev, node) + dm.get(node, next) - dm.get(prev, next);

        for gap in 0..to.len().saturating_sub(1) {
            let (u, v) = (to[gap], to[gap + 1]);
            let insertion_cost = dm.get(u, node) + dm.get(node, v) - dm.get(u, v);

            if insertion_cost - removal_saving < -IMPROVEMENT_TOLERANCE {
                trace!(
                    "relocate: stop {} into gap {} (gain {:.4})",
                    node,
                    gap,
                    removal_saving - insertion_cost
                );
                from.remove(i);
                to.insert(gap + 1, node);
                return true;
            }
        }
    }
    false
}

/// Alternate relocate and 2-opt on both routes until no relocate improves,
/// capped at a fixed number of rounds. Returns the routes and rounds applied.
pub fn balance(mut a: Route, mut b: Route, dm: &DistanceMatrix) -> (Route, Route, usize) {
    let mut rounds = 0;
    while rounds < MAX_BALANCE_ITERATIONS {
        if !relocate(&mut a, &mut b, dm) {
            break;
        }
        a = two_opt(a, dm);
        b = two_opt(b, dm);
        rounds += 1;
    }
    (a, b, rounds)
}
