//! GraphQL API definitions.

pub mod admin;
pub mod cluster;
pub mod import;
mod mutation;
pub mod project;
mod query;
pub mod scalar;
pub mod sector;
pub mod stats;
mod subscription;

pub use self::{
    cluster::Cluster, mutation::Mutation, project::Project, query::Query,
    stats::Stats, subscription::Subscription,
};

/// GraphQL schema.
pub type Schema = juniper::RootNode<'static, Query, Mutation, Subscription>;

/// Creates a new [`Schema`].
#[must_use]
pub fn schema() -> Schema {
    Schema::new(Query, Mutation, Subscription)
}
