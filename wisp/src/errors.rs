use serde_json::{json, Map, Value};

/// Errors a service method (or a hook) can raise.
///
/// Every variant maps to an HTTP status through [`ServiceError::code`] and
/// renders to the JSON error shape clients see through
/// [`ServiceError::to_json`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    MethodNotAllowed(String),

    #[error("{0}")]
    GeneralError(String),

    /// A GraphQL-shaped failure raised outside of query execution.
    #[error("{message}")]
    GraphQL {
        message: String,
        data: Option<Value>,
    },
}

impl ServiceError {
    pub fn graphql(message: impl Into<String>) -> Self {
        ServiceError::GraphQL {
            message: message.into(),
            data: None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "BadRequest",
            ServiceError::NotFound(_) => "NotFound",
            ServiceError::MethodNotAllowed(_) => "MethodNotAllowed",
            ServiceError::GeneralError(_) => "GeneralError",
            ServiceError::GraphQL { .. } => "GraphQLError",
        }
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad-request",
            ServiceError::NotFound(_) => "not-found",
            ServiceError::MethodNotAllowed(_) => "method-not-allowed",
            ServiceError::GeneralError(_) => "general-error",
            ServiceError::GraphQL { .. } => "graphql-error",
        }
    }

    /// HTTP status for this error.
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::NotFound(_) => 404,
            ServiceError::MethodNotAllowed(_) => 405,
            ServiceError::GeneralError(_) | ServiceError::GraphQL { .. } => 500,
        }
    }

    pub fn to_json(&self) -> Value {
        let mut body = Map::new();
        body.insert("name".to_string(), json!(self.name()));
        body.insert("message".to_string(), json!(self.to_string()));
        body.insert("code".to_string(), json!(self.code()));
        body.insert("className".to_string(), json!(self.class_name()));

        if let ServiceError::GraphQL {
            data: Some(data), ..
        } = self
        {
            body.insert("data".to_string(), data.clone());
        }

        Value::Object(body)
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::GeneralError(err.to_string())
    }
}
