//! The per-request entry point.

use std::sync::Arc;

use crate::context::{RequestContext, RequestContextFactory};
use crate::datasources::{Backends, DataSourceFactory, DataSources};
use crate::error::ContextError;

/// Everything a request's resolvers may touch.
pub struct RequestScope {
    pub context: Arc<RequestContext>,
    pub data_sources: DataSources,
}

/// Shared entry point that turns each incoming request into a
/// [`RequestScope`].
///
/// Only the backend handles are shared; the scope itself is built from
/// scratch on every call.
#[derive(Clone)]
pub struct Gateway {
    contexts: RequestContextFactory,
    data_sources: DataSourceFactory,
}

impl Gateway {
    pub fn new(backends: Backends) -> Self {
        Self {
            contexts: RequestContextFactory::new(Arc::clone(&backends.users)),
            data_sources: DataSourceFactory::new(backends),
        }
    }

    /// Authenticates the request and builds its adapters.
    ///
    /// # Errors
    ///
    /// Fails when the credential names a user but the directory cannot be
    /// reached.
    pub async fn begin_request(
        &self,
        credential: Option<&str>,
    ) -> Result<RequestScope, ContextError> {
        let context = Arc::new(self.contexts.create(credential).await?);
        let data_sources = self.data_sources.create(Arc::clone(&context));
        tracing::debug!(
            request_id = %data_sources.request_id(),
            authenticated = context.is_authenticated(),
            "request scope ready"
        );
        Ok(RequestScope {
            context,
            data_sources,
        })
    }
}
