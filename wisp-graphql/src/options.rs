use std::future::Future;
use std::sync::Arc;

use async_graphql::{Executor, Request, Response, ServerError};
use async_trait::async_trait;
use wisp::ServiceError;

use crate::context_builder::{ContextBuilder, DefaultContextBuilder};
use crate::graphql_service::GraphQLService;

pub type FormatErrorFn = Arc<dyn Fn(ServerError) -> ServerError + Send + Sync>;
pub type FormatParamsFn = Arc<dyn Fn(Request) -> async_graphql::Result<Request> + Send + Sync>;
pub type FormatResponseFn = Arc<dyn Fn(Response) -> Response + Send + Sync>;

/// Everything needed to execute queries against a schema.
pub struct GraphQLOptions<E: Executor> {
    pub schema: E,
    pub context: Arc<dyn ContextBuilder>,
    /// Applied to every error of every response.
    pub format_error: FormatErrorFn,
    /// Rewrites the merged request right before execution.
    pub format_params: Option<FormatParamsFn>,
    /// Rewrites each response after errors are formatted.
    pub format_response: Option<FormatResponseFn>,
}

impl<E: Executor> GraphQLOptions<E> {
    /// Options for `schema` with an empty context and errors passed through
    /// unchanged.
    pub fn new(schema: E) -> Self {
        Self {
            schema,
            context: Arc::new(DefaultContextBuilder),
            format_error: Arc::new(|err: ServerError| err),
            format_params: None,
            format_response: None,
        }
    }

    /// Replace the context builder. It runs once for every query.
    pub fn with_context(mut self, context: impl ContextBuilder) -> Self {
        self.context = Arc::new(context);
        self
    }

    /// Set the formatter applied to every error of every response.
    pub fn with_format_error<F>(mut self, f: F) -> Self
    where
        F: Fn(ServerError) -> ServerError + Send + Sync + 'static,
    {
        self.format_error = Arc::new(f);
        self
    }

    /// Set a hook that rewrites (or rejects) each request before execution.
    pub fn with_format_params<F>(mut self, f: F) -> Self
    where
        F: Fn(Request) -> async_graphql::Result<Request> + Send + Sync + 'static,
    {
        self.format_params = Some(Arc::new(f));
        self
    }

    /// Set a hook that rewrites each response after its errors are formatted.
    pub fn with_format_response<F>(mut self, f: F) -> Self
    where
        F: Fn(Response) -> Response + Send + Sync + 'static,
    {
        self.format_response = Some(Arc::new(f));
        self
    }
}

/// Produces options on demand, given the service they are resolved for.
#[async_trait]
pub trait OptionsFunction<E: Executor>: Send + Sync + 'static {
    async fn resolve(&self, service: &GraphQLService<E>) -> Result<GraphQLOptions<E>, ServiceError>;
}

#[async_trait]
impl<E, F, Fut> OptionsFunction<E> for F
where
    E: Executor,
    F: Fn(GraphQLService<E>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<GraphQLOptions<E>, ServiceError>> + Send + 'static,
{
    async fn resolve(&self, service: &GraphQLService<E>) -> Result<GraphQLOptions<E>, ServiceError> {
        (self)(service.clone()).await
    }
}

/// Static options, or a function resolving them for every call.
pub enum OptionsSource<E: Executor> {
    Static(Arc<GraphQLOptions<E>>),
    Dynamic(Arc<dyn OptionsFunction<E>>),
}

impl<E: Executor> OptionsSource<E> {
    /// Resolve the options by calling `f` with the service on every call.
    pub fn from_fn<F, Fut>(f: F) -> Self
    where
        F: Fn(GraphQLService<E>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<GraphQLOptions<E>, ServiceError>> + Send + 'static,
    {
        OptionsSource::Dynamic(Arc::new(f))
    }
}

impl<E: Executor> Clone for OptionsSource<E> {
    fn clone(&self) -> Self {
        match self {
            OptionsSource::Static(options) => OptionsSource::Static(options.clone()),
            OptionsSource::Dynamic(f) => OptionsSource::Dynamic(f.clone()),
        }
    }
}

impl<E: Executor> From<GraphQLOptions<E>> for OptionsSource<E> {
    fn from(options: GraphQLOptions<E>) -> Self {
        OptionsSource::Static(Arc::new(options))
    }
}

/// Construction-time failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionsError {
    #[error("GraphQL service requires options.")]
    Missing,

    #[error("GraphQL service expects exactly one argument, got {0}")]
    ArgumentCount(usize),
}

pub(crate) async fn resolve_options<E: Executor>(
    source: &OptionsSource<E>,
    service: &GraphQLService<E>,
) -> Result<Arc<GraphQLOptions<E>>, ServiceError> {
    match source {
        OptionsSource::Static(options) => Ok(options.clone()),
        OptionsSource::Dynamic(f) => {
            tracing::trace!("resolving graphql options");
            f.resolve(service).await.map(Arc::new)
        }
    }
}
