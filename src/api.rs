//! HTTP surface: a single GraphQL endpoint plus an interactive explorer.
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Router,
    extract::State,
    response::{Html, IntoResponse},
    routing::get,
};
use tower_http::cors::CorsLayer;

use crate::AppSchema;

async fn graphql_handler(State(schema): State<AppSchema>, req: GraphQLRequest) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

/// Router serving POST /graphql for operations and GET /graphql for GraphiQL.
/// CORS stays wide open; this is an admin tool meant to be reachable from
/// arbitrary frontends.
pub fn create_router(schema: AppSchema) -> Router {
    Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler))
        .layer(CorsLayer::permissive())
        .with_state(schema)
}
