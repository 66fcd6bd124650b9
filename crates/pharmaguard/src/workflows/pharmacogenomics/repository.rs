use super::domain::AnalysisResult;

/// Sink for completed analyses so the service can be exercised without a database.
pub trait AnalysisRepository: Send + Sync {
    fn record(&self, result: &AnalysisResult) -> Result<(), RepositoryError>;
    fn recent(&self, limit: usize) -> Result<Vec<AnalysisResult>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
