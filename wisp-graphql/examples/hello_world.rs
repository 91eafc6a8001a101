use tracing_subscriber::EnvFilter;
use wisp::{config::ServerConfig, Application, HttpAdapter, HttpMethod};
use wisp_axum::AxumAdapter;
use wisp_graphql::{graphiql, prelude::*, GraphiQLOptions};

struct Query;

#[Object]
impl Query {
    /// Simple hello world query
    async fn hello(&self) -> &str {
        "Hello, world!"
    }

    async fn greet(&self, name: String) -> String {
        format!("Hello, {}!", name)
    }

    async fn user(&self, id: i32) -> User {
        User {
            id,
            name: format!("User {}", id),
            email: format!("user{}@example.com", id),
        }
    }
}

#[derive(SimpleObject, Clone)]
struct User {
    id: i32,
    name: String,
    email: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServerConfig::from_env()?;
    let schema = Schema::build(Query, EmptyMutation, EmptySubscription).finish();

    let mut app = Application::new();
    app.use_service(
        &config.graphql_path,
        GraphQLService::new(GraphQLOptions::new(schema)),
    );

    if config.graphiql_enabled {
        app.use_handler(
            &config.graphiql_path,
            HttpMethod::GET,
            graphiql(GraphiQLOptions::new(config.graphql_path.clone()).title("hello world")),
        );
        tracing::info!(
            "GraphiQL: http://{}:{}{}",
            config.host,
            config.port,
            config.graphiql_path
        );
    }

    app.listen(AxumAdapter::new(), config.port, &config.host).await
}
