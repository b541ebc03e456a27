pub mod build;
pub mod engine;
pub mod manifest;
pub mod routing;
pub mod stage;

pub use crate::domain::model::{BuildJob, DeploySummary, Manifest, RoutingTable};
pub use crate::domain::ports::BuildRunner;
pub use crate::utils::error::Result;
