use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::Value;

use crate::errors::ServiceError;
use crate::service::{Id, Params, ServiceMethod};

/// State of one service call as seen by hooks.
#[derive(Debug, Clone)]
pub struct HookContext {
    pub path: String,
    pub method: ServiceMethod,
    pub id: Option<Id>,
    /// Payload of `create`/`update`/`patch`; `None` when the call carried
    /// no body.
    pub data: Option<Value>,
    pub params: Params,
    pub result: Option<Value>,
    pub error: Option<ServiceError>,
    /// Status to answer with; falls back to the method default when unset.
    pub status_code: Option<u16>,
}

impl HookContext {
    pub fn new(path: &str, method: ServiceMethod, params: Params) -> Self {
        Self {
            path: path.to_string(),
            method,
            id: None,
            data: None,
            params,
            result: None,
            error: None,
            status_code: None,
        }
    }

    pub fn status(&self) -> u16 {
        match &self.error {
            Some(err) => err.code(),
            None => self.status_code.unwrap_or(self.method.default_status()),
        }
    }

    pub fn into_result(self) -> Result<Value, ServiceError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

pub type HookFn = Arc<dyn Fn(&mut HookContext) + Send + Sync>;

/// Hook registrations, keyed by the method they run for.
#[derive(Default, Clone)]
pub struct HookMap {
    after: Vec<(ServiceMethod, HookFn)>,
    error: Vec<(ServiceMethod, HookFn)>,
}

impl HookMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `hook` after `method` succeeds.
    pub fn after<F>(mut self, method: ServiceMethod, hook: F) -> Self
    where
        F: Fn(&mut HookContext) + Send + Sync + 'static,
    {
        self.after.push((method, Arc::new(hook)));
        self
    }

    /// Run `hook` when `method` fails. The hook may replace `ctx.error`.
    pub fn error<F>(mut self, method: ServiceMethod, hook: F) -> Self
    where
        F: Fn(&mut HookContext) + Send + Sync + 'static,
    {
        self.error.push((method, Arc::new(hook)));
        self
    }
}

#[derive(Default, Clone)]
pub struct Hooks {
    after: FxHashMap<ServiceMethod, Vec<HookFn>>,
    error: FxHashMap<ServiceMethod, Vec<HookFn>>,
}

impl Hooks {
    pub fn register(&mut self, map: HookMap) {
        for (method, hook) in map.after {
            self.after.entry(method).or_default().push(hook);
        }
        for (method, hook) in map.error {
            self.error.entry(method).or_default().push(hook);
        }
    }

    pub fn run_after(&self, ctx: &mut HookContext) {
        if let Some(hooks) = self.after.get(&ctx.method) {
            for hook in hooks {
                hook(ctx);
            }
        }
    }

    pub fn run_error(&self, ctx: &mut HookContext) {
        if let Some(hooks) = self.error.get(&ctx.method) {
            for hook in hooks {
                hook(ctx);
            }
        }
    }
}

/// An event emitted after a successful mutating call.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceEvent {
    pub path: String,
    pub event: &'static str,
    pub channel: String,
    pub data: Value,
}

/// Picks the channel an event is published to; `None` drops the event.
pub type Publisher = Arc<dyn Fn(&ServiceEvent) -> Option<String> + Send + Sync>;

/// Registration handle a service receives in
/// [`Service::setup`](crate::Service::setup).
pub struct ServiceHandle {
    path: String,
    pub(crate) hooks: Hooks,
    pub(crate) publisher: Publisher,
    pub(crate) disabled: FxHashSet<ServiceMethod>,
}

impl ServiceHandle {
    pub(crate) fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            hooks: Hooks::default(),
            publisher: Arc::new(|_| Some("all".to_string())),
            disabled: FxHashSet::default(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn hooks(&mut self, map: HookMap) -> &mut Self {
        self.hooks.register(map);
        self
    }

    pub fn publish<F>(&mut self, publisher: F) -> &mut Self
    where
        F: Fn(&ServiceEvent) -> Option<String> + Send + Sync + 'static,
    {
        self.publisher = Arc::new(publisher);
        self
    }

    /// Stop routing `method` to the service; the host answers 405 instead.
    pub fn disable(&mut self, method: ServiceMethod) -> &mut Self {
        tracing::debug!(path = %self.path, %method, "disabling service method");
        self.disabled.insert(method);
        self
    }

    pub fn is_disabled(&self, method: ServiceMethod) -> bool {
        self.disabled.contains(&method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hooks_run_only_for_their_method() {
        let mut hooks = Hooks::default();
        hooks.register(
            HookMap::new()
                .after(ServiceMethod::Create, |ctx| ctx.status_code = Some(200))
                .error(ServiceMethod::Create, |ctx| {
                    ctx.error = Some(ServiceError::graphql("replaced"))
                }),
        );

        let mut ctx = HookContext::new("graphql", ServiceMethod::Create, Params::new());
        ctx.result = Some(json!({}));
        hooks.run_after(&mut ctx);
        assert_eq!(ctx.status(), 200);

        let mut ctx = HookContext::new("graphql", ServiceMethod::Find, Params::new());
        hooks.run_after(&mut ctx);
        assert_eq!(ctx.status_code, None);

        let mut ctx = HookContext::new("graphql", ServiceMethod::Create, Params::new());
        ctx.error = Some(ServiceError::BadRequest("x".into()));
        hooks.run_error(&mut ctx);
        assert_eq!(ctx.error, Some(ServiceError::graphql("replaced")));
    }

    #[test]
    fn test_hooks_run_in_registration_order() {
        let mut hooks = Hooks::default();
        hooks.register(HookMap::new().after(ServiceMethod::Find, |ctx| {
            ctx.result = Some(json!(1))
        }));
        hooks.register(HookMap::new().after(ServiceMethod::Find, |ctx| {
            ctx.result = Some(json!(2))
        }));

        let mut ctx = HookContext::new("numbers", ServiceMethod::Find, Params::new());
        hooks.run_after(&mut ctx);
        assert_eq!(ctx.result, Some(json!(2)));
    }

    #[test]
    fn test_status_prefers_error_code() {
        let mut ctx = HookContext::new("x", ServiceMethod::Create, Params::new());
        assert_eq!(ctx.status(), 201);

        ctx.status_code = Some(200);
        assert_eq!(ctx.status(), 200);

        ctx.error = Some(ServiceError::BadRequest("no".into()));
        assert_eq!(ctx.status(), 400);
    }

    #[test]
    fn test_handle_disable() {
        let mut handle = ServiceHandle::new("graphql");
        handle.disable(ServiceMethod::Get);

        assert!(handle.is_disabled(ServiceMethod::Get));
        assert!(!handle.is_disabled(ServiceMethod::Find));
    }
}
