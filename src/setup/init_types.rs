use crate::api::types::PropertyInput;
use crate::domain::types::ProblemInstance;

/// A validated problem together with the property records behind each
/// location index, kept for mapping the result back to waypoints.
#[derive(Debug)]
pub struct PreparedProblem<'a> {
    pub problem: ProblemInstance,
    pub properties: Vec<&'a PropertyInput>,
}
