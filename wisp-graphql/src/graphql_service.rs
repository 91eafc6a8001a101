use std::fmt;
use std::sync::Arc;

use async_graphql::{BatchResponse, Executor};
use async_trait::async_trait;
use serde_json::Value;
use wisp::{HookContext, HookMap, Params, Service, ServiceError, ServiceHandle, ServiceMethod, ServiceResult};

use crate::options::{resolve_options, OptionsError, OptionsSource};
use crate::query::{run_queries, FailureMode, GraphQLData, GraphQLQuery};

struct Inner<E: Executor> {
    options: OptionsSource<E>,
    failure_mode: FailureMode,
}

/// GraphQL execution exposed as a service.
///
/// Only `find` (query-string transport) and `create` (JSON body transport)
/// are supported. Once mounted, the remaining methods are disabled on the
/// host and answer 405.
pub struct GraphQLService<E: Executor> {
    inner: Arc<Inner<E>>,
}

impl<E: Executor> Clone for GraphQLService<E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<E: Executor> fmt::Debug for GraphQLService<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = match self.inner.options {
            OptionsSource::Static(_) => "Static",
            OptionsSource::Dynamic(_) => "Dynamic",
        };
        f.debug_struct("GraphQLService")
            .field("options", &options)
            .field("failure_mode", &self.inner.failure_mode)
            .finish()
    }
}

/// Collects constructor arguments for a [`GraphQLService`].
pub struct GraphQLServiceBuilder<E: Executor> {
    options: Vec<OptionsSource<E>>,
    failure_mode: FailureMode,
}

impl<E: Executor> GraphQLServiceBuilder<E> {
    /// Supply the options. Exactly one call is expected.
    pub fn options(mut self, options: impl Into<OptionsSource<E>>) -> Self {
        self.options.push(options.into());
        self
    }

    /// How per-query failures are reported. Defaults to [`FailureMode::Embed`].
    pub fn failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    /// Create the service.
    ///
    /// Fails with [`OptionsError::Missing`] when no options were supplied and
    /// with [`OptionsError::ArgumentCount`] when more than one was.
    pub fn build(mut self) -> Result<GraphQLService<E>, OptionsError> {
        if self.options.len() > 1 {
            return Err(OptionsError::ArgumentCount(self.options.len()));
        }
        let options = self.options.pop().ok_or(OptionsError::Missing)?;

        Ok(GraphQLService {
            inner: Arc::new(Inner {
                options,
                failure_mode: self.failure_mode,
            }),
        })
    }
}

impl<E: Executor> GraphQLService<E> {
    /// Start building a service.
    pub fn builder() -> GraphQLServiceBuilder<E> {
        GraphQLServiceBuilder {
            options: Vec::new(),
            failure_mode: FailureMode::default(),
        }
    }

    /// Create a new GraphQL service in [`FailureMode::Embed`].
    pub fn new(options: impl Into<OptionsSource<E>>) -> Self {
        Self {
            inner: Arc::new(Inner {
                options: options.into(),
                failure_mode: FailureMode::default(),
            }),
        }
    }

    pub fn failure_mode(&self) -> FailureMode {
        self.inner.failure_mode
    }

    /// Execute a single query or a batch.
    ///
    /// This method:
    /// 1. Resolves the options (calling the options function, if any)
    /// 2. Builds a context for every query
    /// 3. Executes the queries concurrently against the schema
    /// 4. Returns one response, or one per query in input order
    pub async fn query(&self, data: GraphQLData, params: &Params) -> Result<BatchResponse, ServiceError> {
        let options = resolve_options(&self.inner.options, self).await?;
        run_queries(&options, data, params, self.inner.failure_mode).await
    }
}

/// Build a service from optional options; `None` is a configuration error.
pub fn graphql_service<E: Executor>(
    options: Option<OptionsSource<E>>,
) -> Result<GraphQLService<E>, OptionsError> {
    let builder = GraphQLService::builder();
    match options {
        Some(options) => builder.options(options).build(),
        None => builder.build(),
    }
}

fn set_status(ctx: &mut HookContext) {
    ctx.status_code = Some(200);
}

fn body_missing(ctx: &mut HookContext) {
    if ctx.data.is_none() {
        ctx.error = Some(ServiceError::graphql("POST body missing."));
    }
}

#[async_trait]
impl<E: Executor> Service for GraphQLService<E> {
    async fn find(&self, params: Params) -> ServiceResult {
        let has_query = matches!(params.query.get("query"), Some(Value::String(q)) if !q.is_empty());
        if !has_query {
            return Err(ServiceError::BadRequest("GET query missing.".to_string()));
        }

        let query: GraphQLQuery = serde_json::from_value(Value::Object(params.query.clone()))
            .map_err(|e| ServiceError::BadRequest(format!("Invalid GraphQL request: {}", e)))?;

        let response = self.query(GraphQLData::Single(query), &params).await?;
        Ok(serde_json::to_value(response)?)
    }

    async fn create(&self, data: Value, params: Params) -> ServiceResult {
        if data.is_null() {
            return Err(ServiceError::BadRequest("POST body missing.".to_string()));
        }

        let data: GraphQLData = serde_json::from_value(data)
            .map_err(|e| ServiceError::BadRequest(format!("Invalid GraphQL request: {}", e)))?;

        let response = self.query(data, &params).await?;
        Ok(serde_json::to_value(response)?)
    }

    fn setup(&self, handle: &mut ServiceHandle) {
        handle
            .publish(|_| None)
            .hooks(
                HookMap::new()
                    .after(ServiceMethod::Find, set_status)
                    .after(ServiceMethod::Create, set_status)
                    .error(ServiceMethod::Create, body_missing),
            );

        for method in [
            ServiceMethod::Get,
            ServiceMethod::Update,
            ServiceMethod::Patch,
            ServiceMethod::Remove,
        ] {
            handle.disable(method);
        }
    }
}
