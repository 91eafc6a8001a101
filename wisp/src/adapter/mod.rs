mod http_adapter;
pub use self::http_adapter::HttpAdapter;

mod route_adapter;
pub use self::route_adapter::RouteAdapter;

mod route_handler;
pub use self::route_handler::RouteHandler;
