//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` port:
//!
//! - `jwks` - ID tokens signed by the managed identity provider
//! - `mock` - Fixed tokens for tests and local development

mod jwks;
mod mock;

pub use jwks::{JwksConfig, JwksSessionValidator, DEFAULT_JWKS_URL};
pub use mock::MockSessionValidator;
