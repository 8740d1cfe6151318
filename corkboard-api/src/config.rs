/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct. There are no built-in fallbacks for
/// secrets: startup fails when `JWT_SECRET` is missing or too short.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `JWT_SECRET`: Secret key for JWT signing (required, >= 32 chars)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: "*")
/// - `PRODUCTION`: "true" enables HSTS and strict CORS (default: false)
/// - `UPLOAD_DIR`: Directory attachment files are written to (default: ./uploads)
/// - `ADMIN_EMAIL` / `ADMIN_PASSWORD`: Optional initial admin account
/// - `RUST_LOG`: Log level (default: info)
///
/// # Example
///
/// ```no_run
/// use corkboard_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}:{}", config.api.host, config.api.port);
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// Attachment upload configuration
    pub uploads: UploadConfig,

    /// Optional initial admin account, provisioned at startup
    pub admin_bootstrap: Option<AdminBootstrap>,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins ("*" means permissive, for development)
    pub cors_origins: Vec<String>,

    /// Whether the server runs in production mode (HSTS, strict CORS)
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for JWT signing
    ///
    /// IMPORTANT: This must be kept secret and should be at least 32 bytes.
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,
}

/// Attachment upload configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Directory uploaded files are written to
    pub dir: String,
}

/// Initial admin account provisioned at startup when no admin exists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminBootstrap {
    /// Admin email address
    pub email: String,

    /// Admin password (hashed before storage)
    pub password: String,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing
    /// - Environment variables have invalid values
    /// - `JWT_SECRET` is shorter than 32 characters
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let production = env::var("PRODUCTION")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string());

        let admin_bootstrap = match (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) => Some(AdminBootstrap { email, password }),
            _ => None,
        };

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
                production,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig { secret: jwt_secret },
            uploads: UploadConfig { dir: upload_dir },
            admin_bootstrap,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                cors_origins: vec!["*".to_string()],
                production: false,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/test".to_string(),
                max_connections: 10,
            },
            jwt: JwtConfig {
                secret: "test-secret-key-at-least-32-bytes-long".to_string(),
            },
            uploads: UploadConfig {
                dir: "./uploads".to_string(),
            },
            admin_bootstrap: None,
        }
    }

    #[test]
    fn test_bind_address() {
        let config = test_config();
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_config_clone() {
        let config = test_config();
        let cloned = config.clone();
        assert_eq!(config.jwt.secret, cloned.jwt.secret);
        assert!(cloned.admin_bootstrap.is_none());
    }
}
