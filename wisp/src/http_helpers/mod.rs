#[path = "body.enum.rs"]
mod body;
pub use self::body::Body;

#[path = "http_response.struct.rs"]
mod http_response;
pub use self::http_response::HttpResponse;

#[path = "http_request.struct.rs"]
mod http_request;
pub use self::http_request::{parse_query_string, HttpRequest};

#[path = "http_method.enum.rs"]
mod http_method;
pub use self::http_method::HttpMethod;

#[path = "into_response.rs"]
mod into_response;
pub use self::into_response::IntoResponse;
