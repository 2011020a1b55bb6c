//! # SchoolHub Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`cors`]: Allowed browser origins
//! - [`database`]: Connection string and pool size
//! - [`jwt`]: Token signing secret and lifetime
//! - [`server`]: Listen address
//!
//! # Example
//!
//! ```ignore
//! use schoolhub_config::{CorsConfig, DatabaseConfig, JwtConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod database;
pub mod jwt;
pub mod server;

pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use jwt::JwtConfig;
pub use server::ServerConfig;

/// Reads an environment variable and parses it, falling back to `default`
/// when the variable is unset or malformed.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
