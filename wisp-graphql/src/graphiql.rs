use async_graphql::http::GraphiQLSource;
use async_trait::async_trait;
use wisp::{HttpRequest, HttpResponse, RouteHandler};

/// What the GraphiQL page points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphiQLOptions {
    pub endpoint_url: String,
    pub subscriptions_endpoint: Option<String>,
    pub title: Option<String>,
}

impl GraphiQLOptions {
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            subscriptions_endpoint: None,
            title: None,
        }
    }

    pub fn subscriptions_endpoint(mut self, url: impl Into<String>) -> Self {
        self.subscriptions_endpoint = Some(url.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    fn render(&self) -> String {
        let mut source = GraphiQLSource::build().endpoint(&self.endpoint_url);
        if let Some(url) = &self.subscriptions_endpoint {
            source = source.subscription_endpoint(url);
        }
        if let Some(title) = &self.title {
            source = source.title(title);
        }
        source.finish()
    }
}

enum Source {
    Fixed(GraphiQLOptions),
    PerRequest(Box<dyn Fn(&HttpRequest) -> GraphiQLOptions + Send + Sync>),
}

/// Route handler serving the GraphiQL IDE.
pub struct GraphiQLHandler {
    source: Source,
}

#[async_trait]
impl RouteHandler for GraphiQLHandler {
    async fn handle(&self, req: HttpRequest) -> HttpResponse {
        let page = match &self.source {
            Source::Fixed(options) => options.render(),
            Source::PerRequest(f) => f(&req).render(),
        };
        HttpResponse::html(page)
    }
}

/// Serve GraphiQL with fixed options.
pub fn graphiql(options: GraphiQLOptions) -> GraphiQLHandler {
    GraphiQLHandler {
        source: Source::Fixed(options),
    }
}

/// Serve GraphiQL with options computed from each request.
pub fn graphiql_with<F>(f: F) -> GraphiQLHandler
where
    F: Fn(&HttpRequest) -> GraphiQLOptions + Send + Sync + 'static,
{
    GraphiQLHandler {
        source: Source::PerRequest(Box::new(f)),
    }
}
