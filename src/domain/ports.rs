use crate::domain::model::BuildJob;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Runs one build to completion. Implementations must not return until the
/// underlying process has exited.
#[async_trait]
pub trait BuildRunner: Send + Sync {
    async fn run(&self, job: &BuildJob) -> Result<()>;
}
