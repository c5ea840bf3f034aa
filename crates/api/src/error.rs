//! API error types with GraphQL and HTTP response mapping.

use async_graphql::ErrorExtensions;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{ContextError, DomainError};
use launch_catalog::CatalogError;
use thiserror::Error;

/// Failures while wiring up the server at startup.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Could not connect to the user database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Could not migrate the user database: {0}")]
    Migration(#[from] user_store::UserStoreError),

    #[error("Could not build the launch catalog client: {0}")]
    Catalog(#[from] CatalogError),
}

/// Machine-readable code placed in a GraphQL error's `extensions.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Unauthenticated,
    BadUserInput,
    BackendUnavailable,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Unauthenticated => "UNAUTHENTICATED",
            ErrorCode::BadUserInput => "BAD_USER_INPUT",
            ErrorCode::BackendUnavailable => "BACKEND_UNAVAILABLE",
        }
    }

    pub fn for_domain(err: &DomainError) -> Self {
        match err {
            DomainError::AuthorizationRequired => ErrorCode::Unauthenticated,
            DomainError::Validation(_) => ErrorCode::BadUserInput,
            DomainError::UserStore(_) | DomainError::Catalog(_) => ErrorCode::BackendUnavailable,
        }
    }
}

/// Converts a domain failure into a field error of the GraphQL response.
pub fn graphql_error(err: DomainError) -> async_graphql::Error {
    let code = ErrorCode::for_domain(&err);
    if code == ErrorCode::BackendUnavailable {
        tracing::error!(error = %err, "backend call failed");
    }
    async_graphql::Error::new(err.to_string())
        .extend_with(|_, extensions| extensions.set("code", code.as_str()))
}

/// Failures that reject the whole HTTP request before the schema runs.
#[derive(Debug)]
pub enum ApiError {
    /// The request context could not be built.
    Context(ContextError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::Context(err) => {
                tracing::error!(error = %err, "request context unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorCode::BackendUnavailable,
                    err.to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "data": null,
            "errors": [{
                "message": message,
                "extensions": { "code": code.as_str() },
            }],
        });
        (status, axum::Json(body)).into_response()
    }
}

impl From<ContextError> for ApiError {
    fn from(err: ContextError) -> Self {
        ApiError::Context(err)
    }
}
