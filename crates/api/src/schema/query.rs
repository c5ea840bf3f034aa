use std::sync::Arc;

use async_graphql::{Context, ID, Object, Result};
use domain::{DataSources, PaginationInput, RequestContext};
use launch_catalog::LaunchId;

use super::types::{LaunchConnectionNode, LaunchNode, UserNode};
use crate::error::graphql_error;

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Lists launches in ascending id order, `pageSize` at a time.
    async fn launches(
        &self,
        ctx: &Context<'_>,
        page_size: Option<i32>,
        after: Option<String>,
    ) -> Result<LaunchConnectionNode> {
        let sources = ctx.data::<DataSources>()?;
        let page = sources
            .launch_api
            .launches_page(&PaginationInput::new(page_size, after))
            .await
            .map_err(graphql_error)?;
        Ok(page.into())
    }

    async fn launch(&self, ctx: &Context<'_>, id: ID) -> Result<Option<LaunchNode>> {
        let Ok(id) = id.parse::<LaunchId>() else {
            return Ok(None);
        };
        let sources = ctx.data::<DataSources>()?;
        let launch = sources
            .launch_api
            .get_launch_by_id(id)
            .await
            .map_err(graphql_error)?;
        Ok(launch.map(LaunchNode))
    }

    /// The signed-in user, or null for anonymous requests.
    async fn me(&self, ctx: &Context<'_>) -> Result<Option<UserNode>> {
        let context = ctx.data::<Arc<RequestContext>>()?;
        Ok(context.user().cloned().map(UserNode))
    }
}
