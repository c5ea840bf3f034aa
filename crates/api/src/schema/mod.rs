//! The GraphQL schema.
//!
//! Resolvers never hold state of their own. Everything request specific
//! (the [`RequestContext`](domain::RequestContext) and the request's
//! [`DataSources`](domain::DataSources)) is attached to each
//! `async_graphql::Request` as request data by the HTTP handler.

mod mutation;
mod query;
pub mod types;

use async_graphql::{EmptySubscription, Schema};

pub use mutation::MutationRoot;
pub use query::QueryRoot;

pub type GatewaySchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Builds the schema. It holds no data and can be shared across requests.
pub fn build_schema() -> GatewaySchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription).finish()
}
