use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    /// Re-enables `DELETE /api/v1/files/{file_id}`; off by default
    pub file_deletion_enabled: bool,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Local filesystem storage for uploaded payloads
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory holding the binary payloads, created on startup if missing
    pub upload_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Configuration for the HTML frontend that proxies to the API
#[derive(Debug, Clone)]
pub struct FrontendConfig {
    pub host: String,
    pub port: u16,
    /// Base URL of the API including the `/api/v1` prefix
    pub backend_url: String,
    pub backend_timeout: Duration,
    /// Show delete buttons; mirrors the API's `FILE_DELETION_ENABLED`
    pub deletion_enabled: bool,
}

fn parse_bool(name: &str, value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(format!("{} must be a boolean", name)),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let file_deletion_enabled = match env::var("FILE_DELETION_ENABLED") {
            Ok(value) => parse_bool("FILE_DELETION_ENABLED", &value)?,
            Err(_) => false,
        };

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            file_deletion_enabled,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    // Default values for database connection pool (conservative defaults for small-medium apps)
    const DEFAULT_URL: &'static str = "sqlite://gmail_upload.db";
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").unwrap_or_else(|_| Self::DEFAULT_URL.to_string());

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl StorageConfig {
    const DEFAULT_UPLOAD_DIR: &'static str = "uploads";

    pub fn from_env() -> Result<Self, String> {
        let upload_dir = env::var("UPLOAD_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| Self::DEFAULT_UPLOAD_DIR.to_string());

        Ok(Self {
            upload_dir: PathBuf::from(upload_dir),
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        let title =
            env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Gmail File Upload API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "1.0.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION").unwrap_or_else(|_| {
            "Backend API for Gmail-based file upload and storage system".to_string()
        });

        Ok(Self {
            title,
            version,
            description,
        })
    }
}

impl FrontendConfig {
    const DEFAULT_BACKEND_URL: &'static str = "http://backend-service:8000/api/v1";
    const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 30;

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("FRONTEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("FRONTEND_PORT")
            .unwrap_or_else(|_| "5001".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid FRONTEND_PORT: {}", e))?;

        let backend_url = env::var("BACKEND_URL")
            .unwrap_or_else(|_| Self::DEFAULT_BACKEND_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let backend_timeout_secs = env::var("BACKEND_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_BACKEND_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "BACKEND_TIMEOUT_SECS must be a valid number".to_string())?;

        let deletion_enabled = match env::var("FILE_DELETION_ENABLED") {
            Ok(value) => parse_bool("FILE_DELETION_ENABLED", &value)?,
            Err(_) => false,
        };

        Ok(Self {
            host,
            port,
            backend_url,
            backend_timeout: Duration::from_secs(backend_timeout_secs),
            deletion_enabled,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("X", "true"), Ok(true));
        assert_eq!(parse_bool("X", " On "), Ok(true));
        assert_eq!(parse_bool("X", "0"), Ok(false));
        assert_eq!(parse_bool("X", ""), Ok(false));
        assert!(parse_bool("X", "maybe").is_err());
    }

    #[test]
    fn test_server_address() {
        let app = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 8000,
            cors_allowed_origins: vec!["*".to_string()],
            file_deletion_enabled: false,
        };
        assert_eq!(app.server_address(), "127.0.0.1:8000");
    }
}
