use async_graphql::Data;
use async_trait::async_trait;
use wisp::Params;

/// Builds the GraphQL context for one query.
///
/// The builder runs once per query, so every item of a batch gets its own
/// `Data`. Values a builder hands out are therefore never shared between
/// the items of a batch.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use wisp::Params;
/// use wisp_graphql::{async_graphql::{Data, Result}, ContextBuilder};
///
/// struct Caller(Option<String>);
///
/// struct AuthContext;
///
/// #[async_trait]
/// impl ContextBuilder for AuthContext {
///     async fn build(&self, params: &Params) -> Result<Data> {
///         let mut data = Data::default();
///         data.insert(Caller(params.header("authorization").map(str::to_string)));
///         Ok(data)
///     }
/// }
/// ```
#[async_trait]
pub trait ContextBuilder: Send + Sync + 'static {
    /// Build the context for a query carried by a call with `params`.
    ///
    /// An error here fails the query, not the whole batch, unless the
    /// service runs with `FailureMode::Propagate`.
    async fn build(&self, params: &Params) -> async_graphql::Result<Data>;
}

/// Empty context.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultContextBuilder;

#[async_trait]
impl ContextBuilder for DefaultContextBuilder {
    async fn build(&self, _params: &Params) -> async_graphql::Result<Data> {
        Ok(Data::default())
    }
}

/// One value shared by every query, cloned into each query's context.
#[derive(Clone, Debug)]
pub struct SharedContext<T>(pub T);

#[async_trait]
impl<T> ContextBuilder for SharedContext<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn build(&self, _params: &Params) -> async_graphql::Result<Data> {
        let mut data = Data::default();
        data.insert(self.0.clone());
        Ok(data)
    }
}

/// Context factory closure.
pub struct ContextFn<F>(pub F);

#[async_trait]
impl<F> ContextBuilder for ContextFn<F>
where
    F: Fn(&Params) -> async_graphql::Result<Data> + Send + Sync + 'static,
{
    async fn build(&self, params: &Params) -> async_graphql::Result<Data> {
        (self.0)(params)
    }
}
