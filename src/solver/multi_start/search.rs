use rayon::prelude::*;
use tracing::{debug, info, span, Level};

use crate::config::constant::{EXHAUSTIVE_SEED_LIMIT, IMPROVEMENT_TOLERANCE, SAMPLED_SEED_TARGET};
use crate::distance::matrix::DistanceMatrix;
use crate::domain::types::{ProblemInstance, Route, Solution};
use crate::error::{Result, RouteError};
use crate::solver::multi_start::construction::{nearest_neighbor, rotate_to_anchor};
use crate::solver::multi_start::or_opt::or_opt;
use crate::solver::multi_start::relocate::balance;
use crate::solver::multi_start::two_opt::two_opt;

/// Best solution over all construction seeds.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub solution: Solution,
    pub seeds_tried: usize,
    /// Seed whose trial produced `solution`.
    pub best_seed: usize,
}

/// Construction seeds: the depot first, then every stop for small
/// instances or an evenly strided sample of them for larger ones.
pub fn seed_candidates(problem: &ProblemInstance) -> Vec<usize> {
    let n = problem.stops.len();
    let mut seeds = Vec::with_capacity(n.min(EXHAUSTIVE_SEED_LIMIT) + 1);
    seeds.push(problem.depot);

    if n <= EXHAUSTIVE_SEED_LIMIT {
        seeds.extend(problem.stops.iter().copied());
    } else {
        let stride = (n / SAMPLED_SEED_TARGET).max(1);
        seeds.extend(problem.stops.iter().copied().step_by(stride));
    }
    seeds
}

/// 2-opt, then Or-opt, then 2-opt again for crossings Or-opt reintroduced.
pub fn improve_route(route: Route, dm: &DistanceMatrix) -> Route {
    two_opt(or_opt(two_opt(route, dm), dm), dm)
}

/// Run every seed trial and keep the cheapest solution.
///
/// Trials run in parallel but the winner is picked in seed order. Selection
/// uses a deliberate tie band: a later seed only takes over when it is cheaper
/// by more than the improvement tolerance, so tours whose costs differ only by
/// rounding keep the earlier seed and the result stays deterministic.
pub fn solve(problem: &ProblemInstance) -> Result<SearchOutcome> {
    let solve_span = span!(
        Level::INFO,
        "solve",
        stops = problem.stops.len(),
        vehicles = problem.num_vehicles
    );
    let _guard = solve_span.enter();

    let seeds = seed_candidates(problem);
    info!("Running {} seed trials", seeds.len());

    let trials: Vec<Result<Solution>> = seeds
        .par_iter()
        .map(|&seed| {
            let span = span!(Level::DEBUG, "seed_trial", seed);
            let _g = span.enter();
            run_seed(problem, seed)
        })
        .collect();

    let mut best: Option<(usize, Solution)> = None;
    for (seed, trial) in seeds.iter().zip(trials) {
        let solution = trial?;
        debug!("seed {} -> cost {:.3}", seed, solution.total_cost);
        let better = best
            .as_ref()
            .map_or(true, |(_, b)| solution.total_cost < b.total_cost - IMPROVEMENT_TOLERANCE);
        if better {
            best = Some((*seed, solution));
        }
    }

    let (best_seed, solution) =
        best.ok_or_else(|| RouteError::internal("no seed trial produced a solution"))?;
    solution.check_covers(&problem.stops)?;

    info!(
        "Best solution from seed {}: total cost {:.3} km over {} route(s)",
        best_seed,
        solution.total_cost,
        solution.routes.len()
    );

    Ok(SearchOutcome {
        solution,
        seeds_tried: seeds.len(),
        best_seed,
    })
}

/// Build and improve one candidate solution from `seed`.
pub fn run_seed(problem: &ProblemInstance, seed: usize) -> Result<Solution> {
    let dm = &problem.distance_matrix;

    match problem.num_vehicles {
        1 => {
            let route = single_vehicle_tour(problem, seed)?;
            Ok(Solution::from_routes(vec![improve_route(route, dm)]))
        }
        2 => {
            let depots = problem.vehicle_depots();
            let (first, second) = split_stops(&problem.stops, seed);

            let a = improve_route(nearest_neighbor(depots[0], &first, dm), dm);
            let b = improve_route(nearest_neighbor(depots[1], &second, dm), dm);
            let (a, b, rounds) = balance(a, b, dm);
            debug!("balance finished after {} rounds", rounds);

            Ok(Solution::from_routes(vec![a, b]))
        }
        other => Err(RouteError::internal(format!(
            "unsupported vehicle count {other}"
        ))),
    }
}

fn single_vehicle_tour(problem: &ProblemInstance, seed: usize) -> Result<Route> {
    let dm = &problem.distance_matrix;
    if seed == problem.depot {
        return Ok(nearest_neighbor(problem.depot, &problem.stops, dm));
    }

    // build the cycle from the seed, then turn it to start at the depot
    let nodes: Vec<usize> = std::iter::once(problem.depot)
        .chain(problem.stops.iter().copied())
        .filter(|&n| n != seed)
        .collect();
    rotate_to_anchor(nearest_neighbor(seed, &nodes, dm), problem.depot)
}

/// Split stops into two halves by supplied order, after cyclically rotating
/// the order to begin at `seed` when the seed is a stop. The first half gets
/// the extra stop when the count is odd.
fn split_stops(stops: &[usize], seed: usize) -> (Vec<usize>, Vec<usize>) {
    let mut order = stops.to_vec();
    if let Some(pos) = order.iter().position(|&s| s == seed) {
        order.rotate_left(pos);
    }
    let second = order.split_off(order.len().div_ceil(2));
    (order, second)
}
