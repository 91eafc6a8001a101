use std::fmt;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::errors::ServiceError;
use crate::hooks::ServiceHandle;

pub type Id = String;

pub type ServiceResult = Result<Value, ServiceError>;

/// The CRUD-shaped methods a service can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceMethod {
    Find,
    Get,
    Create,
    Update,
    Patch,
    Remove,
}

impl ServiceMethod {
    pub const ALL: [ServiceMethod; 6] = [
        ServiceMethod::Find,
        ServiceMethod::Get,
        ServiceMethod::Create,
        ServiceMethod::Update,
        ServiceMethod::Patch,
        ServiceMethod::Remove,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceMethod::Find => "find",
            ServiceMethod::Get => "get",
            ServiceMethod::Create => "create",
            ServiceMethod::Update => "update",
            ServiceMethod::Patch => "patch",
            ServiceMethod::Remove => "remove",
        }
    }

    /// Status the host answers with when no hook overrides it.
    pub fn default_status(&self) -> u16 {
        match self {
            ServiceMethod::Create => 201,
            _ => 200,
        }
    }

    /// Name of the event published after a successful call, if the method
    /// mutates anything.
    pub fn event_name(&self) -> Option<&'static str> {
        match self {
            ServiceMethod::Create => Some("created"),
            ServiceMethod::Update => Some("updated"),
            ServiceMethod::Patch => Some("patched"),
            ServiceMethod::Remove => Some("removed"),
            ServiceMethod::Find | ServiceMethod::Get => None,
        }
    }
}

impl fmt::Display for ServiceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-call parameters handed to every service method.
#[derive(Debug, Clone, Default)]
pub struct Params {
    /// Transport the call came in on (`Some("rest")` for HTTP), `None` for
    /// internal calls.
    pub provider: Option<String>,
    /// Query-string values for external calls, arbitrary filters otherwise.
    pub query: Map<String, Value>,
    pub headers: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.query.insert(key.to_string(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

fn not_implemented(method: ServiceMethod) -> ServiceError {
    ServiceError::MethodNotAllowed(format!("Method {} is not implemented", method))
}

/// A service mounted on a path of the [`Application`](crate::Application).
///
/// Every method defaults to `MethodNotAllowed`, so a service only implements
/// what it supports.
#[async_trait]
pub trait Service: Send + Sync + 'static {
    async fn find(&self, _params: Params) -> ServiceResult {
        Err(not_implemented(ServiceMethod::Find))
    }

    async fn get(&self, _id: Id, _params: Params) -> ServiceResult {
        Err(not_implemented(ServiceMethod::Get))
    }

    async fn create(&self, _data: Value, _params: Params) -> ServiceResult {
        Err(not_implemented(ServiceMethod::Create))
    }

    async fn update(&self, _id: Id, _data: Value, _params: Params) -> ServiceResult {
        Err(not_implemented(ServiceMethod::Update))
    }

    async fn patch(&self, _id: Id, _data: Value, _params: Params) -> ServiceResult {
        Err(not_implemented(ServiceMethod::Patch))
    }

    async fn remove(&self, _id: Id, _params: Params) -> ServiceResult {
        Err(not_implemented(ServiceMethod::Remove))
    }

    /// Called once when the service is mounted on `handle.path()`.
    fn setup(&self, _handle: &mut ServiceHandle) {}
}
