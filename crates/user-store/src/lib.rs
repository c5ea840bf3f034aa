//! User directory for the launch booking gateway.
//!
//! Users are keyed by their identity (a validated email address) and own a
//! set of trips, each one a booking of a catalog launch. Two backends are
//! provided: an in-memory store for tests and local runs, and a
//! PostgreSQL store for deployments.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;
pub mod user;

pub use common::{LaunchId, UserId};
pub use error::{Result, UserStoreError};
pub use memory::InMemoryUserStore;
pub use postgres::PostgresUserStore;
pub use store::{UserStore, UserStoreExt};
pub use user::User;
