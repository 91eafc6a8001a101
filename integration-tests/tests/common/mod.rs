#![allow(dead_code)]

use std::future::Future;
use std::time::Duration;

use async_graphql::{Context, EmptySubscription, Object, Result, Schema};
use wisp::{Application, HttpAdapter};
use wisp_axum::AxumAdapter;

pub type TestSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// The caller as seen by resolvers, taken from the `authorization` header.
#[derive(Clone)]
pub struct Caller(pub Option<String>);

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn test_string(&self) -> &str {
        "it works"
    }

    async fn test_argument(&self, echo: String) -> String {
        format!("hello {}", echo)
    }

    async fn caller(&self, ctx: &Context<'_>) -> Option<String> {
        ctx.data_opt::<Caller>().and_then(|caller| caller.0.clone())
    }

    async fn test_error(&self) -> Result<String> {
        Err("secret".into())
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn test_mutation(&self, echo: String) -> String {
        format!("not really a mutation, but who cares: {}", echo)
    }
}

pub fn schema() -> TestSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription).finish()
}

/// Serve `app` on `port` and run `client` against it.
pub async fn with_server<F, Fut>(app: Application, port: u16, client: F)
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = ()>,
{
    let local = tokio::task::LocalSet::new();

    // Spawn server in background
    local.spawn_local(async move {
        let _ = app.listen(AxumAdapter::new(), port, "127.0.0.1").await;
    });

    local
        .run_until(async move {
            // Give the server time to start
            tokio::time::sleep(Duration::from_millis(500)).await;
            client(format!("http://127.0.0.1:{}", port)).await;
        })
        .await;
}
