//! Wire records of the SpaceX-v2-shaped catalog API.
//!
//! Every field is optional on the wire; missing values degrade to `None`
//! rather than failing the whole payload. Records without a flight number
//! have no usable id and are dropped.

use serde::Deserialize;

use crate::{Launch, LaunchId, Mission, Rocket};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LaunchDto {
    pub flight_number: Option<i64>,
    pub mission_name: Option<String>,
    pub launch_site: Option<LaunchSiteDto>,
    pub links: Option<LinksDto>,
    pub rocket: Option<RocketDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LaunchSiteDto {
    pub site_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinksDto {
    pub mission_patch: Option<String>,
    pub mission_patch_small: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RocketDto {
    pub rocket_id: Option<String>,
    pub rocket_name: Option<String>,
    pub rocket_type: Option<String>,
}

impl LaunchDto {
    /// Converts the record, or returns `None` when it has no flight number.
    pub fn into_launch(self) -> Option<Launch> {
        let id = LaunchId::new(self.flight_number?);
        let links = self.links.unwrap_or_default();
        let rocket = self.rocket.unwrap_or_default();
        Some(Launch {
            id,
            site: self.launch_site.and_then(|site| site.site_name),
            mission: Mission {
                name: self.mission_name,
                mission_patch_small: links.mission_patch_small,
                mission_patch_large: links.mission_patch,
            },
            rocket: Rocket {
                id: rocket.rocket_id.unwrap_or_default(),
                name: rocket.rocket_name,
                rocket_type: rocket.rocket_type,
            },
        })
    }
}

/// Decodes a catalog response body into launches.
pub fn parse_launches(body: &[u8]) -> serde_json::Result<Vec<Launch>> {
    let records: Vec<LaunchDto> = serde_json::from_slice(body)?;
    let total = records.len();
    let launches: Vec<Launch> = records
        .into_iter()
        .filter_map(LaunchDto::into_launch)
        .collect();
    if launches.len() < total {
        tracing::warn!(
            dropped = total - launches.len(),
            "skipped catalog records without a flight number"
        );
    }
    Ok(launches)
}
