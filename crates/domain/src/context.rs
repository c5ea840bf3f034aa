//! Per-request authentication context.

use std::sync::Arc;

use user_store::{User, UserStore, UserStoreExt};

use crate::error::ContextError;
use crate::identity::{Identity, IdentityResolver};

/// The authenticated user of one request, if any.
///
/// Built once per request and never mutated afterwards. It is not `Clone`:
/// resolvers share it through an `Arc` owned by the request.
#[derive(Debug, Default)]
pub struct RequestContext {
    user: Option<User>,
}

impl RequestContext {
    /// Context of a request that carried no usable credential.
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    /// Context of a request made by `user`.
    pub fn authenticated(user: User) -> Self {
        Self { user: Some(user) }
    }

    /// Returns the user resolved when the request started.
    ///
    /// The record is a snapshot; trips booked later in the same request
    /// are not reflected here.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Builds a fresh [`RequestContext`] for every request.
///
/// Holds nothing but the shared directory handle; there is no cache, so
/// two requests for the same identity each perform their own lookup.
#[derive(Clone)]
pub struct RequestContextFactory {
    users: Arc<dyn UserStore>,
    resolver: IdentityResolver,
}

impl RequestContextFactory {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self {
            users,
            resolver: IdentityResolver,
        }
    }

    /// Resolves the raw credential and builds the context for it.
    pub async fn create(&self, credential: Option<&str>) -> Result<RequestContext, ContextError> {
        let identity = self.resolver.resolve(credential);
        self.for_identity(identity).await
    }

    /// Builds the context for an already resolved identity.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::DirectoryUnavailable`] when the directory
    /// fails and [`ContextError::UserMissing`] when it yields no record.
    /// Neither is downgraded to an anonymous context.
    #[tracing::instrument(skip_all, fields(authenticated = identity.is_some()))]
    pub async fn for_identity(
        &self,
        identity: Option<Identity>,
    ) -> Result<RequestContext, ContextError> {
        let Some(identity) = identity else {
            metrics::counter!("gateway_context_resolutions_total", "outcome" => "anonymous")
                .increment(1);
            return Ok(RequestContext::anonymous());
        };

        match self.users.find_or_create_one(identity.as_str()).await {
            Ok(Some(user)) => {
                metrics::counter!("gateway_context_resolutions_total", "outcome" => "authenticated")
                    .increment(1);
                tracing::debug!(user_id = %user.id, "resolved user");
                Ok(RequestContext::authenticated(user))
            }
            Ok(None) => {
                metrics::counter!("gateway_context_resolutions_total", "outcome" => "failed")
                    .increment(1);
                tracing::error!("directory returned no user for identity");
                Err(ContextError::UserMissing)
            }
            Err(err) => {
                metrics::counter!("gateway_context_resolutions_total", "outcome" => "failed")
                    .increment(1);
                tracing::error!(error = %err, "failed to resolve user");
                Err(ContextError::DirectoryUnavailable(err))
            }
        }
    }
}
