//! # wisp-graphql
//!
//! [async-graphql](https://github.com/async-graphql/async-graphql) execution
//! exposed as a wisp service.
//!
//! Mounting a [`GraphQLService`] on a path answers:
//!
//! - `GET /path?query=...&variables=...&operationName=...` through `find`
//! - `POST /path` with one query object or an array of them through `create`
//!
//! Every other service method is disabled and answers 405. The service
//! publishes no events.
//!
//! ## Features
//!
//! - **Batching** - an array body runs every query concurrently and answers
//!   with the results in request order
//! - **Per-query context** - a [`ContextBuilder`] runs once for each query
//! - **Dynamic options** - options may be resolved by a function on every call
//! - **Formatting hooks** - rewrite errors, requests and responses
//! - **GraphiQL** - [`graphiql`] serves the IDE on any route
//!
//! ## Quick Start
//!
//! ```rust
//! use wisp::Application;
//! use wisp_graphql::{prelude::*, GraphQLOptions, GraphQLService};
//!
//! struct Query;
//!
//! #[Object]
//! impl Query {
//!     async fn hello(&self) -> &str {
//!         "Hello, world!"
//!     }
//! }
//!
//! let schema = Schema::build(Query, EmptyMutation, EmptySubscription).finish();
//!
//! let mut app = Application::new();
//! app.use_service("/graphql", GraphQLService::new(GraphQLOptions::new(schema)));
//! assert!(app.has_service("graphql"));
//! ```
//!
//! ## Accessing Context in Resolvers
//!
//! ```ignore
//! use async_graphql::{Context, Object, Result};
//!
//! struct Query;
//!
//! #[Object]
//! impl Query {
//!     async fn me(&self, ctx: &Context<'_>) -> Result<User> {
//!         // inserted by a ContextBuilder from the call's headers
//!         let user = ctx.data::<User>()?;
//!         Ok(user.clone())
//!     }
//! }
//! ```

mod context_builder;
mod graphiql;
mod graphql_service;
mod options;
mod query;

#[cfg(test)]
mod test_support;

pub use context_builder::{ContextBuilder, ContextFn, DefaultContextBuilder, SharedContext};
pub use graphiql::{graphiql, graphiql_with, GraphiQLHandler, GraphiQLOptions};
pub use graphql_service::{graphql_service, GraphQLService, GraphQLServiceBuilder};
pub use options::{
    FormatErrorFn, FormatParamsFn, FormatResponseFn, GraphQLOptions, OptionsError,
    OptionsFunction, OptionsSource,
};
pub use query::{run_queries, FailureMode, GraphQLData, GraphQLQuery, VariablesInput};

pub use async_graphql;

/// Prelude module with common imports
pub mod prelude {
    pub use crate::{
        ContextBuilder, DefaultContextBuilder, FailureMode, GraphQLOptions, GraphQLService,
    };
    pub use async_graphql::{
        Context, EmptyMutation, EmptySubscription, Enum, InputObject, Interface, Object, Schema,
        SimpleObject, Union,
    };
}
