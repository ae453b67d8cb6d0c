//! Factory for creating repository instances.

use std::str::FromStr;
use std::sync::Arc;

use crate::db::error::RepositoryError;
use crate::db::repository::ScheduleRepository;

/// Available repository backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = RepositoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            other => Err(RepositoryError::ConfigurationError(format!(
                "Unknown repository type '{}'. Supported: local.",
                other
            ))),
        }
    }
}

/// Factory for repository construction.
///
/// A database-backed implementation gets its own variant and creation arm
/// here; callers only ever see `Arc<dyn ScheduleRepository>`.
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository of the given type.
    pub fn create(repo_type: RepositoryType) -> Result<Arc<dyn ScheduleRepository>, RepositoryError> {
        match repo_type {
            #[cfg(feature = "local-repo")]
            RepositoryType::Local => Ok(Self::create_local()),
            #[cfg(not(feature = "local-repo"))]
            RepositoryType::Local => Err(RepositoryError::ConfigurationError(
                "local repository backend is not enabled".to_string(),
            )),
        }
    }

    /// Create an in-memory local repository.
    #[cfg(feature = "local-repo")]
    pub fn create_local() -> Arc<dyn ScheduleRepository> {
        Arc::new(crate::db::local::LocalRepository::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_type() {
        assert_eq!(RepositoryType::from_str("local").unwrap(), RepositoryType::Local);
        assert_eq!(RepositoryType::from_str("LOCAL").unwrap(), RepositoryType::Local);
    }

    #[test]
    fn unknown_type_is_a_configuration_error() {
        let err = RepositoryType::from_str("postgres").unwrap_err();
        assert!(matches!(err, RepositoryError::ConfigurationError(_)));
    }

    #[cfg(feature = "local-repo")]
    #[tokio::test]
    async fn created_local_repository_is_healthy() {
        let repo = RepositoryFactory::create(RepositoryType::Local).unwrap();
        assert!(repo.health_check().await.unwrap());
    }
}
