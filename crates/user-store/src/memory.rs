use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{LaunchId, Result, User, UserId, UserStore, UserStoreError};

#[derive(Debug, Clone)]
struct UserRow {
    id: UserId,
    email: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct InMemoryState {
    users: Vec<UserRow>,
    by_email: HashMap<String, UserId>,
    trips: Vec<(UserId, LaunchId)>,
    next_id: i64,
}

impl InMemoryState {
    fn trips_for(&self, user_id: UserId) -> Vec<LaunchId> {
        self.trips
            .iter()
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, launch_id)| *launch_id)
            .collect()
    }
}

/// In-memory user store for testing and local runs.
///
/// Mirrors the PostgreSQL store's semantics: emails are unique and a user
/// holds at most one trip per launch. An optional artificial latency makes
/// every call yield to the scheduler first, which lets tests interleave
/// concurrent requests deterministically.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    state: Arc<RwLock<InMemoryState>>,
    unavailable: Arc<AtomicBool>,
    lookups: Arc<AtomicUsize>,
    latency: Option<Duration>,
}

impl InMemoryUserStore {
    /// Creates a new empty in-memory user store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that sleeps for `latency` before serving each call.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    /// Makes every subsequent call fail as if the database were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Returns how many `find_or_create` calls have been served.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Returns the number of stored users.
    pub async fn user_count(&self) -> usize {
        self.state.read().await.users.len()
    }

    /// Returns the number of stored trips across all users.
    pub async fn trip_count(&self) -> usize {
        self.state.read().await.trips.len()
    }

    async fn enter(&self) -> Result<()> {
        match self.latency {
            Some(latency) => tokio::time::sleep(latency).await,
            None => tokio::task::yield_now().await,
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(UserStoreError::Unavailable(
                "in-memory store marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_or_create(&self, email: &str) -> Result<Vec<User>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.enter().await?;

        let mut state = self.state.write().await;
        let id = match state.by_email.get(email) {
            Some(id) => *id,
            None => {
                state.next_id += 1;
                let id = UserId::new(state.next_id);
                state.users.push(UserRow {
                    id,
                    email: email.to_string(),
                    created_at: Utc::now(),
                });
                state.by_email.insert(email.to_string(), id);
                tracing::debug!(user_id = %id, "created user");
                id
            }
        };

        let users = state
            .users
            .iter()
            .filter(|row| row.id == id)
            .map(|row| User {
                id: row.id,
                username: row.email.clone(),
                trips: state.trips_for(row.id),
                created_at: row.created_at,
            })
            .collect();
        Ok(users)
    }

    async fn add_trip(&self, user_id: UserId, launch_id: LaunchId) -> Result<bool> {
        self.enter().await?;

        let mut state = self.state.write().await;
        if state.trips.contains(&(user_id, launch_id)) {
            return Ok(false);
        }
        state.trips.push((user_id, launch_id));
        Ok(true)
    }

    async fn remove_trip(&self, user_id: UserId, launch_id: LaunchId) -> Result<bool> {
        self.enter().await?;

        let mut state = self.state.write().await;
        let before = state.trips.len();
        state.trips.retain(|trip| *trip != (user_id, launch_id));
        Ok(state.trips.len() != before)
    }

    async fn trips_for_user(&self, user_id: UserId) -> Result<Vec<LaunchId>> {
        self.enter().await?;
        Ok(self.state.read().await.trips_for(user_id))
    }
}
