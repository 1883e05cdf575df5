//! HTTP adapter for profile endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{ProfileResponse, UpdateProfileRequest};
pub use handlers::ProfileHandlers;
pub use routes::profile_routes;
