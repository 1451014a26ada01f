use serde::Serialize;
use thiserror::Error;

/// Caller-correctable problems with an optimize request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("properties array is required and must not be empty")]
    MissingProperties,
    #[error("numVehicles must be 1 or 2, got {0}")]
    InvalidVehicleCount(i64),
    #[error("too many properties: {count} have valid coordinates, maximum is {max}")]
    TooManyProperties { count: usize, max: usize },
    #[error("too many properties for a pinned depot: {count} supplied, maximum is {max} including the depot")]
    TooManyForDepot { count: usize, max: usize },
    #[error("no properties have valid coordinates")]
    NoValidCoordinates,
    #[error("depot property not found: {0}")]
    DepotNotFound(String),
    #[error("no stops remain after excluding the depot")]
    NoStops,
    #[error("malformed request: {0}")]
    MalformedRequest(String),
}

#[derive(Debug, Error)]
pub enum RouteError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("internal error: {0}")]
    Internal(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RouteError>;

impl RouteError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// HTTP-equivalent status for surfacing the error to a caller.
    pub fn status_code(&self) -> u16 {
        if self.is_validation() {
            400
        } else {
            500
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Config(_) => "config",
            _ => "internal",
        }
    }
}

/// Failure body mirroring the success response's `success` flag.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub kind: &'static str,
}

impl From<&RouteError> for ErrorResponse {
    fn from(err: &RouteError) -> Self {
        ErrorResponse {
            success: false,
            error: err.to_string(),
            kind: err.kind(),
        }
    }
}
