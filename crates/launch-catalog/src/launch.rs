use common::LaunchId;
use serde::{Deserialize, Serialize};

/// Mission patch image size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PatchSize {
    Small,
    #[default]
    Large,
}

/// Mission flown by a launch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Mission {
    pub name: Option<String>,
    pub mission_patch_small: Option<String>,
    pub mission_patch_large: Option<String>,
}

impl Mission {
    /// Returns the patch URL for the requested size.
    pub fn mission_patch(&self, size: PatchSize) -> Option<&str> {
        match size {
            PatchSize::Small => self.mission_patch_small.as_deref(),
            PatchSize::Large => self.mission_patch_large.as_deref(),
        }
    }
}

/// Rocket used by a launch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rocket {
    pub id: String,
    pub name: Option<String>,
    pub rocket_type: Option<String>,
}

/// A launch as published by the catalog.
///
/// Whether the current user booked the launch is not part of the record;
/// it is derived per request from the user's trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Launch {
    pub id: LaunchId,
    pub site: Option<String>,
    pub mission: Mission,
    pub rocket: Rocket,
}
