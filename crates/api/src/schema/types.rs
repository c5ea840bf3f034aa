//! GraphQL object types.

use async_graphql::{Context, Enum, ID, Object, Result, SimpleObject};
use domain::{DataSources, LaunchConnection, TripUpdateResponse};
use launch_catalog::{Launch, Mission, PatchSize, Rocket};
use user_store::User;

use crate::error::graphql_error;

/// Size of a mission patch image.
#[derive(Enum, Copy, Clone, Debug, Default, PartialEq, Eq)]
#[graphql(name = "PatchSize")]
pub enum PatchSizeArg {
    Small,
    #[default]
    Large,
}

impl From<PatchSizeArg> for PatchSize {
    fn from(size: PatchSizeArg) -> Self {
        match size {
            PatchSizeArg::Small => PatchSize::Small,
            PatchSizeArg::Large => PatchSize::Large,
        }
    }
}

pub struct LaunchNode(pub Launch);

#[Object(name = "Launch")]
impl LaunchNode {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn site(&self) -> Option<&str> {
        self.0.site.as_deref()
    }

    async fn mission(&self) -> MissionNode {
        MissionNode(self.0.mission.clone())
    }

    async fn rocket(&self) -> RocketNode {
        RocketNode(self.0.rocket.clone())
    }

    /// Whether the signed-in user holds a trip on this launch.
    async fn is_booked(&self, ctx: &Context<'_>) -> Result<bool> {
        let sources = ctx.data::<DataSources>()?;
        sources
            .user_api
            .is_booked_on_launch(self.0.id)
            .await
            .map_err(graphql_error)
    }
}

pub struct MissionNode(Mission);

#[Object(name = "Mission")]
impl MissionNode {
    async fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    async fn mission_patch(&self, size: Option<PatchSizeArg>) -> Option<&str> {
        self.0.mission_patch(size.unwrap_or_default().into())
    }
}

pub struct RocketNode(Rocket);

#[Object(name = "Rocket")]
impl RocketNode {
    async fn id(&self) -> ID {
        ID(self.0.id.clone())
    }

    async fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    #[graphql(name = "type")]
    async fn rocket_type(&self) -> Option<&str> {
        self.0.rocket_type.as_deref()
    }
}

pub struct UserNode(pub User);

#[Object(name = "User")]
impl UserNode {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn username(&self) -> &str {
        &self.0.username
    }

    /// Booked launches, read from the store at query time.
    async fn trips(&self, ctx: &Context<'_>) -> Result<Vec<LaunchNode>> {
        let sources = ctx.data::<DataSources>()?;
        let ids = sources
            .user_api
            .launch_ids_for_current_user()
            .await
            .map_err(graphql_error)?;
        let launches = sources
            .launch_api
            .get_launches_by_ids(&ids)
            .await
            .map_err(graphql_error)?;
        Ok(launches.into_iter().map(LaunchNode).collect())
    }
}

/// A page of launches.
#[derive(SimpleObject)]
#[graphql(name = "LaunchConnection")]
pub struct LaunchConnectionNode {
    pub cursor: String,
    pub has_more: bool,
    pub launches: Vec<LaunchNode>,
}

impl From<LaunchConnection> for LaunchConnectionNode {
    fn from(page: LaunchConnection) -> Self {
        Self {
            cursor: page.cursor,
            has_more: page.has_more,
            launches: page.items.into_iter().map(LaunchNode).collect(),
        }
    }
}

#[derive(SimpleObject)]
#[graphql(name = "TripUpdateResponse")]
pub struct TripUpdateResponseNode {
    pub success: bool,
    pub message: Option<String>,
    pub launches: Vec<LaunchNode>,
}

impl From<TripUpdateResponse> for TripUpdateResponseNode {
    fn from(response: TripUpdateResponse) -> Self {
        Self {
            success: response.success,
            message: response.message,
            launches: response.launches.into_iter().map(LaunchNode).collect(),
        }
    }
}
