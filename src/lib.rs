pub mod config;
pub mod core;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod prompts;
pub mod routes;
pub mod state;

// Re-export commonly used items for convenience
pub use config::ServerConfig;
pub use self::core::*;
pub use errors::auth_error::{AuthError, AuthResult};
pub use errors::config_error::{ConfigError, ConfigResult};
pub use prompts::Prompts;
pub use routes::create_app;
pub use state::AppState;
