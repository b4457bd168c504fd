//! Error types shared across the HTTP layer and configuration loading.

pub mod auth_error;
pub mod config_error;

pub use auth_error::{AuthError, AuthResult};
pub use config_error::{ConfigError, ConfigResult};
