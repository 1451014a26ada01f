use crate::distance::matrix::DistanceMatrix;

/// A geocoded property prepared for one solve call.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub index: usize,
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    pub is_depot: bool,
}

/// Closed tour over location indices: starts and ends at the route's depot.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub route: Vec<usize>,
    pub cost: f64,
}

impl Route {
    /// Empty tour `[depot, depot]`.
    pub fn anchored(depot: usize) -> Self {
        Route {
            route: vec![depot, depot],
            cost: 0.0,
        }
    }

    pub fn depot(&self) -> usize {
        self.route[0]
    }

    /// Visited stops, without the depot at either end.
    pub fn stops(&self) -> &[usize] {
        let n = self.route.len();
        if n <= 2 {
            &[]
        } else {
            &self.route[1..n - 1]
        }
    }
}

/// One route per vehicle plus their combined closed-tour cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub routes: Vec<Route>,
    pub total_cost: f64,
}

#[derive(Debug, Clone)]
pub struct ProblemInstance {
    pub locations: Vec<Location>,
    pub distance_matrix: DistanceMatrix,
    pub depot: usize,
    /// Anchor for the second vehicle when it differs from `depot`.
    pub second_depot: Option<usize>,
    /// Indices to visit, in the order the properties were supplied.
    pub stops: Vec<usize>,
    pub num_vehicles: usize,
}

impl ProblemInstance {
    pub fn vehicle_depots(&self) -> Vec<usize> {
        match self.num_vehicles {
            1 => vec![self.depot],
            _ => vec![self.depot, self.second_depot.unwrap_or(self.depot)],
        }
    }
}
