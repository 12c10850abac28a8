pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod router;
pub mod screens;
pub mod view;

pub use api::{ApiClient, ApiError};
pub use config::DashboardConfig;
pub use error::DashboardError;
pub use router::{Dashboard, ReferenceData, Screen};
pub use screens::*;
