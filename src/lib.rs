//! Crate entrypoint wiring together configuration, DB, and the GraphQL schema.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod schema;

use async_graphql::{EmptySubscription, Schema};

use schema::mutation::MutationRoot;
use schema::query::QueryRoot;

/// Executable GraphQL schema shared across requests.
pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;
