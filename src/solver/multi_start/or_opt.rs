use tracing::trace;

use crate::config::constant::{IMPROVEMENT_TOLERANCE, MAX_SEGMENT_LEN};
use crate::distance::matrix::DistanceMatrix;
use crate::domain::types::Route;
use crate::evaluation::fitness::refresh_cost;

/// A segment `tour[start..start + len]` moved into the gap after `tour[gap]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Relocation {
    start: usize,
    len: usize,
    gap: usize,
}

/// Segment-relocation pass for runs of 1 to 3 stops.
///
/// Takes the first improving relocation, applies it and rescans from the
/// shortest segment length, until a full scan finds nothing.
pub fn or_opt(mut route: Route, dm: &DistanceMatrix) -> Route {
    let mut moves = 0;
    while let Some(mv) = find_relocation(&route.route, dm) {
        apply_relocation(&mut route.route, mv);
        moves += 1;
    }

    refresh_cost(&mut route, dm);
    if moves > 0 {
        trace!("or-opt: {} moves, cost {:.3}", moves, route.cost);
    }
    route
}

fn find_relocation(tour: &[usize], dm: &DistanceMatrix) -> Option<Relocation> {
    let n = tour.len();

    for len in 1..=MAX_SEGMENT_LEN {
        // the segment plus both depot ends must leave at least one other stop
        if n < len + 3 {
            break;
        }

        for start in 1..=(n - 1 - len) {
            let end = start + len - 1;
            let (prev, first, last, next) = (tour[start - 1], tour[start], tour[end], tour[end + 1]);
            let removal_saving = dm.get(prev, first) + dm.get(last, next) - dm.get(prev, next);

            for gap in 0..n - 1 {
                // gaps touching the segment would put it back where it was
                if gap + 1 >= start && gap <= end {
                    continue;
                }
                let (a, b) = (tour[gap], tour[gap + 1]);
                let insertion_cost = dm.get(a, first) + dm.get(last, b) - dm.get(a, b);

                if insertion_cost - removal_saving < -IMPROVEMENT_TOLERANCE {
                    return Some(Relocation { start, len, gap });
                }
            }
        }
    }
    None
}

fn apply_relocation(tour: &mut Vec<usize>, mv: Relocation) {
    let segment: Vec<usize> = tour.drain(mv.start..mv.start + mv.len).collect();
    // gaps after the segment shifted left by its length when it was drained
    let insert_at = if mv.gap < mv.start {
        mv.gap + 1
    } else {
        mv.gap + 1 - mv.len
    };
    tour.splice(insert_at..insert_at, segment);
}
