//! Request-scoped core of the launch booking gateway.
//!
//! This crate provides:
//! - IdentityResolver for decoding request credentials
//! - RequestContextFactory and DataSourceFactory, which build fresh,
//!   unshared per-request state over shared backends
//! - Cursor pagination of the launch list
//! - BookingTransactionHandler for booking and cancelling trips with
//!   per-launch failure reporting

pub mod booking;
pub mod context;
pub mod datasources;
pub mod error;
pub mod identity;
pub mod pagination;
pub mod scope;

pub use booking::{BookingOutcome, BookingTransactionHandler, TripUpdateResponse};
pub use context::{RequestContext, RequestContextFactory};
pub use datasources::{Backends, DataSourceFactory, DataSources, LaunchDataSource, UserDataSource};
pub use error::{ContextError, DomainError, Result};
pub use identity::{Identity, IdentityResolver};
pub use pagination::{
    Connection, Cursor, DEFAULT_PAGE_SIZE, LaunchConnection, PaginationInput, paginate,
};
pub use scope::{Gateway, RequestScope};
