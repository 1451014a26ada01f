use itertools::Itertools;

use crate::domain::types::{Route, Solution};
use crate::error::{Result, RouteError};

impl Solution {
    /// Build a solution from routes whose `cost` fields are already current.
    pub fn from_routes(routes: Vec<Route>) -> Self {
        let total_cost = routes.iter().map(|r| r.cost).sum();
        Solution { routes, total_cost }
    }

    /// Check that every route is closed at its depot and that the routes
    /// together visit `stops` exactly once each.
    pub fn check_covers(&self, stops: &[usize]) -> Result<()> {
        for (i, r) in self.routes.iter().enumerate() {
            if r.route.len() < 2 || r.route.last() != Some(&r.depot()) {
                return Err(RouteError::internal(format!(
                    "route {i} is not a closed tour: {:?}",
                    r.route
                )));
            }
        }

        let visited: Vec<usize> = self
            .routes
            .iter()
            .flat_map(|r| r.stops().iter().copied())
            .sorted_unstable()
            .collect();
        let expected: Vec<usize> = stops.iter().copied().sorted_unstable().collect();

        if visited != expected {
            return Err(RouteError::internal(format!(
                "routes visit {} stops, expected {}",
                visited.len(),
                expected.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(nodes: &[usize], cost: f64) -> Route {
        Route {
            route: nodes.to_vec(),
            cost,
        }
    }

    #[test]
    fn total_cost_sums_routes() {
        let s = Solution::from_routes(vec![route(&[0, 1, 0], 2.5), route(&[0, 2, 3, 0], 4.0)]);
        assert!((s.total_cost - 6.5).abs() < 1e-12);
    }

    #[test]
    fn coverage_accepts_complete_routes() {
        let s = Solution::from_routes(vec![route(&[0, 2, 0], 1.0), route(&[0, 3, 1, 0], 1.0)]);
        assert!(s.check_covers(&[1, 2, 3]).is_ok());
    }

    #[test]
    fn coverage_rejects_missing_or_duplicate_stop() {
        let dup = Solution::from_routes(vec![route(&[0, 2, 2, 0], 1.0)]);
        assert!(dup.check_covers(&[1, 2]).is_err());

        let open = Solution::from_routes(vec![route(&[0, 1, 2], 1.0)]);
        assert!(open.check_covers(&[1, 2]).is_err());
    }
}
