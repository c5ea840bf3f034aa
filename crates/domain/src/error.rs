//! Domain error types.

use launch_catalog::CatalogError;
use thiserror::Error;
use user_store::UserStoreError;

/// Errors surfaced by resolvers as request-level failures.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A mutation was attempted without an authenticated user.
    #[error("You must be logged in to perform this action")]
    AuthorizationRequired,

    /// Malformed arguments, such as a non-positive page size.
    #[error("Invalid argument: {0}")]
    Validation(String),

    /// The user store failed.
    #[error("User store error: {0}")]
    UserStore(#[from] UserStoreError),

    /// The launch catalog failed.
    #[error("Launch catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl DomainError {
    /// Returns true for failures of a backend collaborator.
    pub fn is_backend_unavailable(&self) -> bool {
        matches!(self, DomainError::UserStore(_) | DomainError::Catalog(_))
    }
}

/// Failure to build a request context.
///
/// Kept apart from the anonymous case: a missing or malformed credential is
/// not an error, an unreachable directory is.
#[derive(Debug, Error)]
pub enum ContextError {
    /// The user directory could not resolve the identity.
    #[error("Could not resolve the authenticated user: {0}")]
    DirectoryUnavailable(#[from] UserStoreError),

    /// The directory answered but returned no record for the identity.
    #[error("User directory returned no record for the authenticated identity")]
    UserMissing,
}

/// Convenience type alias for domain results.
pub type Result<T> = std::result::Result<T, DomainError>;
