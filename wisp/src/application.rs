use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::{Map, Value};
use tokio::sync::broadcast;

use crate::adapter::{HttpAdapter, RouteHandler};
use crate::errors::ServiceError;
use crate::hooks::{HookContext, Hooks, Publisher, ServiceEvent, ServiceHandle};
use crate::http_helpers::{HttpMethod, HttpRequest, HttpResponse, IntoResponse};
use crate::service::{Id, Params, Service, ServiceMethod, ServiceResult};

const EVENT_CAPACITY: usize = 64;

struct ServiceEntry {
    service: Arc<dyn Service>,
    hooks: Hooks,
    publisher: Publisher,
    disabled: FxHashSet<ServiceMethod>,
}

/// Registry of mounted services and plain route handlers.
///
/// HTTP calls are mapped onto service methods REST-style:
///
/// | request            | method   |
/// |--------------------|----------|
/// | `GET /path`        | `find`   |
/// | `POST /path`       | `create` |
/// | `GET /path/{id}`   | `get`    |
/// | `PUT /path/{id}`   | `update` |
/// | `PATCH /path/{id}` | `patch`  |
/// | `DELETE /path/{id}`| `remove` |
pub struct Application {
    services: FxHashMap<String, ServiceEntry>,
    handlers: Vec<(String, HttpMethod, Arc<dyn RouteHandler>)>,
    events: broadcast::Sender<ServiceEvent>,
}

fn normalize(path: &str) -> String {
    path.trim_matches('/').to_string()
}

impl Application {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            services: FxHashMap::default(),
            handlers: Vec::new(),
            events,
        }
    }

    /// Mount `service` on `path` and run its `setup`.
    pub fn use_service<S: Service>(&mut self, path: &str, service: S) -> &mut Self {
        let path = normalize(path);
        let mut handle = ServiceHandle::new(&path);
        service.setup(&mut handle);

        tracing::info!(path = %path, "mounting service");

        self.services.insert(
            path,
            ServiceEntry {
                service: Arc::new(service),
                hooks: handle.hooks,
                publisher: handle.publisher,
                disabled: handle.disabled,
            },
        );
        self
    }

    /// Register a plain handler, e.g. the GraphiQL page.
    pub fn use_handler<H: RouteHandler + 'static>(
        &mut self,
        path: &str,
        method: HttpMethod,
        handler: H,
    ) -> &mut Self {
        let path = format!("/{}", normalize(path));
        tracing::info!(path = %path, %method, "mounting handler");
        self.handlers.push((path, method, Arc::new(handler)));
        self
    }

    pub fn has_service(&self, path: &str) -> bool {
        self.services.contains_key(&normalize(path))
    }

    /// Receive every event published by mounted services.
    pub fn subscribe(&self) -> broadcast::Receiver<ServiceEvent> {
        self.events.subscribe()
    }

    /// Every `(path, method)` pair a server has to route to this application.
    pub fn routes(&self) -> Vec<(String, HttpMethod)> {
        let mut routes: Vec<(String, HttpMethod)> = self
            .handlers
            .iter()
            .map(|(path, method, _)| (path.clone(), *method))
            .collect();

        let mut paths: Vec<&String> = self.services.keys().collect();
        paths.sort();
        for path in paths {
            let base = format!("/{}", path);
            let item = format!("{}/{{id}}", base);
            routes.push((base.clone(), HttpMethod::GET));
            routes.push((base, HttpMethod::POST));
            routes.push((item.clone(), HttpMethod::GET));
            routes.push((item.clone(), HttpMethod::PUT));
            routes.push((item.clone(), HttpMethod::PATCH));
            routes.push((item, HttpMethod::DELETE));
        }

        routes
    }

    /// Call a service method through the hook pipeline.
    ///
    /// The returned context carries either `result` or `error`, plus the
    /// status the call should be answered with.
    pub async fn call(
        &self,
        path: &str,
        method: ServiceMethod,
        id: Option<Id>,
        data: Option<Value>,
        params: Params,
    ) -> HookContext {
        let path = normalize(path);
        let mut ctx = HookContext::new(&path, method, params);
        ctx.id = id;
        ctx.data = data;

        let Some(entry) = self.services.get(&path) else {
            ctx.error = Some(ServiceError::NotFound(format!("Page not found: /{}", path)));
            return ctx;
        };

        if entry.disabled.contains(&method) {
            ctx.error = Some(ServiceError::MethodNotAllowed(format!(
                "Method `{}` is not supported by this endpoint.",
                method
            )));
            return ctx;
        }

        tracing::debug!(path = %path, %method, "service call");

        match invoke(entry.service.as_ref(), &ctx).await {
            Ok(result) => {
                ctx.result = Some(result);
                entry.hooks.run_after(&mut ctx);
                self.publish(entry, &ctx);
            }
            Err(err) => {
                ctx.error = Some(err);
                entry.hooks.run_error(&mut ctx);
            }
        }

        ctx
    }

    fn publish(&self, entry: &ServiceEntry, ctx: &HookContext) {
        let (Some(event), Some(data)) = (ctx.method.event_name(), ctx.result.as_ref()) else {
            return;
        };

        let mut event = ServiceEvent {
            path: ctx.path.clone(),
            event,
            channel: String::new(),
            data: data.clone(),
        };

        if let Some(channel) = (entry.publisher)(&event) {
            event.channel = channel;
            // no subscribers is not an error
            let _ = self.events.send(event);
        }
    }

    /// Answer an HTTP request: plain handlers first, then REST dispatch onto
    /// the mounted services.
    pub async fn handle(&self, req: HttpRequest) -> HttpResponse {
        let method = HttpMethod::from_string(&req.method);

        if let Some((_, _, handler)) = self
            .handlers
            .iter()
            .find(|(path, m, _)| *path == req.path && Some(*m) == method)
        {
            return handler.handle(req).await;
        }

        let Some((path, id)) = self.resolve(&req.path) else {
            let err = ServiceError::NotFound(format!("Page not found: {}", req.path));
            return render_error(&err);
        };

        let service_method = match (method, id.is_some()) {
            (Some(HttpMethod::GET), false) => ServiceMethod::Find,
            (Some(HttpMethod::POST), false) => ServiceMethod::Create,
            (Some(HttpMethod::GET), true) => ServiceMethod::Get,
            (Some(HttpMethod::PUT), true) => ServiceMethod::Update,
            (Some(HttpMethod::PATCH), true) => ServiceMethod::Patch,
            (Some(HttpMethod::DELETE), true) => ServiceMethod::Remove,
            _ => {
                let err = ServiceError::MethodNotAllowed(format!(
                    "Method `{}` is not supported by this endpoint.",
                    req.method
                ));
                return render_error(&err);
            }
        };

        let query: Map<String, Value> = req
            .query_params
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();

        let params = Params {
            provider: Some("rest".to_string()),
            query,
            headers: req.headers,
        };

        let ctx = self
            .call(&path, service_method, id, req.body.into_data(), params)
            .await;

        let status = ctx.status();
        match ctx.into_result() {
            Ok(result) => (status, result).to_response(),
            Err(err) => render_error(&err),
        }
    }

    fn resolve(&self, request_path: &str) -> Option<(String, Option<Id>)> {
        let path = normalize(request_path);
        if self.services.contains_key(&path) {
            return Some((path, None));
        }

        let (base, id) = path.rsplit_once('/')?;
        self.services
            .contains_key(base)
            .then(|| (base.to_string(), Some(id.to_string())))
    }

    /// Register every route on `adapter` and serve until the server stops.
    pub async fn listen<A: HttpAdapter>(self, mut adapter: A, port: u16, hostname: &str) -> Result<()> {
        let routes = self.routes();
        let dispatcher: Arc<dyn RouteHandler> = Arc::new(Dispatcher(Arc::new(self)));

        for (path, method) in routes {
            adapter.add_route(&path, method, dispatcher.clone());
        }

        adapter.listen(port, hostname).await
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

async fn invoke(service: &dyn Service, ctx: &HookContext) -> ServiceResult {
    let params = ctx.params.clone();
    let data = ctx.data.clone().unwrap_or(Value::Null);

    let id = || {
        ctx.id.clone().ok_or_else(|| {
            ServiceError::BadRequest(format!("Method {} requires an id", ctx.method))
        })
    };

    match ctx.method {
        ServiceMethod::Find => service.find(params).await,
        ServiceMethod::Get => service.get(id()?, params).await,
        ServiceMethod::Create => service.create(data, params).await,
        ServiceMethod::Update => service.update(id()?, data, params).await,
        ServiceMethod::Patch => service.patch(id()?, data, params).await,
        ServiceMethod::Remove => service.remove(id()?, params).await,
    }
}

fn render_error(err: &ServiceError) -> HttpResponse {
    (err.code(), err.to_json()).to_response()
}

/// Routes every registered path back into the shared application.
struct Dispatcher(Arc<Application>);

#[async_trait]
impl RouteHandler for Dispatcher {
    async fn handle(&self, req: HttpRequest) -> HttpResponse {
        self.0.handle(req).await
    }
}
