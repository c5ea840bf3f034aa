use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a launch in the remote catalog.
///
/// The catalog keys launches by flight number, so the identifier is numeric
/// and orders the same way the catalog does. Clients see it as a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LaunchId(i64);

impl LaunchId {
    /// Creates a launch ID from a flight number.
    pub fn new(flight_number: i64) -> Self {
        Self(flight_number)
    }

    /// Returns the underlying flight number.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for LaunchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for LaunchId {
    fn from(flight_number: i64) -> Self {
        Self(flight_number)
    }
}

impl From<LaunchId> for i64 {
    fn from(id: LaunchId) -> Self {
        id.0
    }
}

/// Error returned when a client-supplied launch ID is not a flight number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid launch id: {0:?}")]
pub struct ParseLaunchIdError(pub String);

impl FromStr for LaunchId {
    type Err = ParseLaunchIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| ParseLaunchIdError(s.to_string()))
    }
}

/// Identifier of a user record owned by the user store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Creates a user ID from a storage key.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the storage key.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}
