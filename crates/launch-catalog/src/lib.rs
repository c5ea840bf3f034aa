//! Client side of the remote launch catalog.
//!
//! The catalog is read-only. [`HttpLaunchCatalog`] talks to a
//! SpaceX-v2-shaped REST API; [`InMemoryLaunchCatalog`] serves a fixed list
//! for tests and offline runs.

pub mod catalog;
pub mod dto;
pub mod error;
pub mod http;
pub mod launch;
pub mod memory;

pub use catalog::{LaunchCatalog, LaunchCatalogExt};
pub use common::LaunchId;
pub use error::{CatalogError, Result};
pub use http::HttpLaunchCatalog;
pub use launch::{Launch, Mission, PatchSize, Rocket};
pub use memory::InMemoryLaunchCatalog;
