//! Profile application handlers.

mod get_or_create_profile;
mod update_profile;

pub use get_or_create_profile::GetOrCreateProfileHandler;
pub use update_profile::{UpdateProfileCommand, UpdateProfileHandler};
