//! GraphQL endpoint.
//!
//! Every POST builds a new request scope through the [`Gateway`]: the
//! credential is resolved, the user looked up, and fresh data sources
//! created. The scope is attached to that one `async_graphql::Request` and
//! dropped with it.

use async_graphql::http::GraphiQLSource;
use async_graphql::{Request, Response};
use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, header};
use axum::response::Html;
use domain::{Gateway, RequestScope};

use crate::error::ApiError;
use crate::schema::GatewaySchema;

/// Shared handler state. Holds no per-request data.
#[derive(Clone)]
pub struct AppState {
    pub schema: GatewaySchema,
    pub gateway: Gateway,
}

/// POST /graphql
#[tracing::instrument(skip_all, fields(request_id = tracing::field::Empty))]
pub async fn execute(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<Request>,
) -> Result<Json<Response>, ApiError> {
    let credential = authorization(&headers);
    let RequestScope {
        context,
        data_sources,
    } = state.gateway.begin_request(credential).await?;
    tracing::Span::current().record(
        "request_id",
        tracing::field::display(data_sources.request_id()),
    );
    tracing::debug!(operation = ?request.operation_name, "executing graphql request");

    let request = request.data(context).data(data_sources);
    Ok(Json(state.schema.execute(request).await))
}

/// GET /graphql serves the GraphiQL explorer.
pub async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

// Non UTF-8 header values are treated like a missing header.
fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
}
