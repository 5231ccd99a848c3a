pub mod mutation;
pub mod query;
pub mod types;

use async_graphql::{EmptySubscription, Schema};

use crate::AppSchema;
use crate::db::Db;
use mutation::MutationRoot;
use query::QueryRoot;

/// Build the executable schema with the database pool as context data.
pub fn build_schema(db: Db) -> AppSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(db)
        .finish()
}
