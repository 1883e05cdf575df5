//! HTTP adapter for flow endpoints.

mod handlers;
mod routes;

pub use handlers::FlowHandlers;
pub use routes::flow_routes;
