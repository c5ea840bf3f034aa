use async_trait::async_trait;

use crate::{LaunchId, Result, User, UserId};

/// Core trait for user directory implementations.
///
/// Implementations are shared by every in-flight request, so they must not
/// keep per-caller state between calls. All implementations must be
/// thread-safe (Send + Sync).
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Finds the user registered under `email`, creating it if absent.
    ///
    /// Idempotent: repeated calls with the same email yield the same user
    /// id, including under concurrent first-time calls. Callers take the
    /// first element of the returned list.
    async fn find_or_create(&self, email: &str) -> Result<Vec<User>>;

    /// Records a trip for the user.
    ///
    /// Returns false if the user already held a trip for the launch.
    async fn add_trip(&self, user_id: UserId, launch_id: LaunchId) -> Result<bool>;

    /// Removes a trip from the user.
    ///
    /// Returns false if the user held no such trip.
    async fn remove_trip(&self, user_id: UserId, launch_id: LaunchId) -> Result<bool>;

    /// Lists the launches the user has booked, in booking order.
    async fn trips_for_user(&self, user_id: UserId) -> Result<Vec<LaunchId>>;
}

/// Extension trait providing convenience methods for user stores.
#[async_trait]
pub trait UserStoreExt: UserStore {
    /// Finds or creates the user and returns the first matching record.
    async fn find_or_create_one(&self, email: &str) -> Result<Option<User>> {
        Ok(self.find_or_create(email).await?.into_iter().next())
    }
}

impl<T: UserStore + ?Sized> UserStoreExt for T {}
