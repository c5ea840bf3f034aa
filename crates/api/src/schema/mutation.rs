use async_graphql::{Context, ID, Object, Result};
use domain::DataSources;

use super::types::TripUpdateResponseNode;
use crate::error::graphql_error;

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Books every listed launch for the signed-in user.
    ///
    /// Null entries are ignored.
    async fn book_trips(
        &self,
        ctx: &Context<'_>,
        launch_ids: Vec<Option<ID>>,
    ) -> Result<TripUpdateResponseNode> {
        let sources = ctx.data::<DataSources>()?;
        let launch_ids: Vec<String> = launch_ids.into_iter().flatten().map(|id| id.0).collect();
        let response = sources
            .booking()
            .book_trips(&launch_ids)
            .await
            .map_err(graphql_error)?;
        Ok(response.into())
    }

    async fn cancel_trip(&self, ctx: &Context<'_>, launch_id: ID) -> Result<TripUpdateResponseNode> {
        let sources = ctx.data::<DataSources>()?;
        let response = sources
            .booking()
            .cancel_trip(&launch_id)
            .await
            .map_err(graphql_error)?;
        Ok(response.into())
    }

    /// Returns the credential to send in the `Authorization` header, or null
    /// when `email` is not a valid address.
    ///
    /// The credential is the base64 encoded email. It identifies the caller
    /// but is trivially forgeable, so it must not guard anything sensitive.
    async fn login(&self, ctx: &Context<'_>, email: Option<String>) -> Result<Option<String>> {
        let sources = ctx.data::<DataSources>()?;
        sources
            .user_api
            .login(email.as_deref())
            .await
            .map_err(graphql_error)
    }
}
