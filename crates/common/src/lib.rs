//! Identifier types shared by the gateway crates.

pub mod types;

pub use types::{LaunchId, ParseLaunchIdError, UserId};
