use hospital_models::ValidationError;
use thiserror::Error;

use crate::api::ApiError;

/// Error surfaced by a screen operation. Both kinds are recovered on the
/// screen and shown in its banner.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Draft rejected before any request was sent
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Transport failure or non-2xx response
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl DashboardError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
