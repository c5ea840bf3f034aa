//! Per-request backend adapters.
//!
//! The backends themselves (catalog HTTP client, store connection pool) are
//! long-lived and shared by every request. The adapters resolvers talk to
//! wrap those backends together with state that belongs to a single
//! request: the request's context and a memoized trip set. They are built
//! by [`DataSourceFactory::create`] for every request and are neither
//! `Clone` nor cached, so one request can never observe another's state.

use std::collections::HashSet;
use std::sync::Arc;

use launch_catalog::{Launch, LaunchCatalog, LaunchCatalogExt};
use tokio::sync::Mutex;
use user_store::{LaunchId, User, UserId, UserStore, UserStoreExt};
use uuid::Uuid;

use crate::booking::BookingTransactionHandler;
use crate::context::RequestContext;
use crate::error::Result;
use crate::identity::Identity;
use crate::pagination::{LaunchConnection, PaginationInput, paginate};

/// Process-wide backend handles.
#[derive(Clone)]
pub struct Backends {
    pub catalog: Arc<dyn LaunchCatalog>,
    pub users: Arc<dyn UserStore>,
}

impl Backends {
    pub fn new(catalog: Arc<dyn LaunchCatalog>, users: Arc<dyn UserStore>) -> Self {
        Self { catalog, users }
    }
}

/// Builds the adapter set for each request.
#[derive(Clone)]
pub struct DataSourceFactory {
    backends: Backends,
}

impl DataSourceFactory {
    pub fn new(backends: Backends) -> Self {
        Self { backends }
    }

    /// Constructs brand-new adapters bound to the shared backends.
    pub fn create(&self, context: Arc<RequestContext>) -> DataSources {
        let request_id = Uuid::new_v4();
        metrics::counter!("gateway_datasource_sets_created_total").increment(1);
        tracing::trace!(%request_id, "created data sources");

        DataSources {
            request_id,
            launch_api: LaunchDataSource {
                catalog: Arc::clone(&self.backends.catalog),
            },
            user_api: UserDataSource {
                users: Arc::clone(&self.backends.users),
                context,
                trip_cache: Mutex::new(None),
            },
        }
    }
}

/// The adapters of one request.
pub struct DataSources {
    request_id: Uuid,
    pub launch_api: LaunchDataSource,
    pub user_api: UserDataSource,
}

impl DataSources {
    /// Identifier of the request these adapters were built for.
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Returns the booking handler operating on these adapters.
    pub fn booking(&self) -> BookingTransactionHandler<'_> {
        BookingTransactionHandler::new(&self.launch_api, &self.user_api)
    }
}

/// Catalog access for one request.
pub struct LaunchDataSource {
    catalog: Arc<dyn LaunchCatalog>,
}

impl LaunchDataSource {
    pub async fn get_all_launches(&self) -> Result<Vec<Launch>> {
        Ok(self.catalog.get_all_launches().await?)
    }

    pub async fn get_launch_by_id(&self, id: LaunchId) -> Result<Option<Launch>> {
        Ok(self.catalog.get_launch_by_id(id).await?)
    }

    pub async fn get_launches_by_ids(&self, ids: &[LaunchId]) -> Result<Vec<Launch>> {
        Ok(self.catalog.get_launches_by_ids(ids).await?)
    }

    /// Fetches the catalog and returns the page described by `input`.
    ///
    /// Arguments are validated before the catalog is contacted.
    #[tracing::instrument(skip(self))]
    pub async fn launches_page(&self, input: &PaginationInput) -> Result<LaunchConnection> {
        let page_size = input.page_size()?;
        let all = self.get_all_launches().await?;
        Ok(paginate(&all, input.after.as_deref(), page_size))
    }

    /// Returns true if both adapters wrap the same catalog instance.
    pub fn shares_catalog_with(&self, other: &LaunchDataSource) -> bool {
        Arc::ptr_eq(&self.catalog, &other.catalog)
    }
}

/// User directory access for one request, bound to that request's context.
pub struct UserDataSource {
    users: Arc<dyn UserStore>,
    context: Arc<RequestContext>,
    // Trip ids of the context user, loaded on first use.
    trip_cache: Mutex<Option<HashSet<LaunchId>>>,
}

impl UserDataSource {
    pub fn current_user(&self) -> Option<&User> {
        self.context.user()
    }

    /// Finds or creates the user for `email` and returns its credential
    /// token.
    ///
    /// Returns `None` without touching the directory when `email` is absent
    /// or not email-shaped. The token is the base64 encoded email, a
    /// placeholder rather than a secret.
    #[tracing::instrument(skip_all)]
    pub async fn login(&self, email: Option<&str>) -> Result<Option<String>> {
        let Some(identity) = email.and_then(Identity::parse) else {
            return Ok(None);
        };
        let user = self.users.find_or_create_one(identity.as_str()).await?;
        Ok(user.map(|_| identity.to_token()))
    }

    /// Lists the current user's booked launches, read fresh from the store.
    pub async fn launch_ids_for_current_user(&self) -> Result<Vec<LaunchId>> {
        match self.current_user() {
            Some(user) => Ok(self.users.trips_for_user(user.id).await?),
            None => Ok(Vec::new()),
        }
    }

    /// Whether the current user holds a trip for the launch.
    ///
    /// Always false for anonymous requests.
    pub async fn is_booked_on_launch(&self, launch_id: LaunchId) -> Result<bool> {
        let Some(user) = self.current_user() else {
            return Ok(false);
        };

        let mut cache = self.trip_cache.lock().await;
        if let Some(trips) = cache.as_ref() {
            return Ok(trips.contains(&launch_id));
        }
        let trips: HashSet<LaunchId> = self
            .users
            .trips_for_user(user.id)
            .await?
            .into_iter()
            .collect();
        let booked = trips.contains(&launch_id);
        *cache = Some(trips);
        Ok(booked)
    }

    /// Records a trip for `user_id`; false if it already existed.
    pub(crate) async fn book_trip(&self, user_id: UserId, launch_id: LaunchId) -> Result<bool> {
        let created = self.users.add_trip(user_id, launch_id).await?;
        self.invalidate_trips().await;
        Ok(created)
    }

    /// Removes a trip from `user_id`; false if there was none.
    pub(crate) async fn cancel_trip(&self, user_id: UserId, launch_id: LaunchId) -> Result<bool> {
        let removed = self.users.remove_trip(user_id, launch_id).await?;
        self.invalidate_trips().await;
        Ok(removed)
    }

    async fn invalidate_trips(&self) {
        *self.trip_cache.lock().await = None;
    }

    /// Returns true if both adapters wrap the same store instance.
    pub fn shares_store_with(&self, other: &UserDataSource) -> bool {
        Arc::ptr_eq(&self.users, &other.users)
    }
}
