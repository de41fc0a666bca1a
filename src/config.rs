use std::env;
use secrecy::SecretString;

const DEFAULT_JWT_SECRET: &str = "dev_secret_key_change_in_production";

const DEFAULT_ALLOWED_ORIGINS: &[&str] = &["http://localhost:5173"];

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub marathons_collection: String,
    pub applications_collection: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub jwt_secret: SecretString,
    pub jwt_expiration_hours: i64,
    pub app_env: String,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "marathon-bold".to_string()),
            marathons_collection: env::var("MARATHONS_COLLECTION")
                .unwrap_or_else(|_| "marathons".to_string()),
            applications_collection: env::var("APPLICATIONS_COLLECTION")
                .unwrap_or_else(|_| "applications".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            jwt_secret: SecretString::from(
                env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_JWT_SECRET.to_string()),
            ),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(5),
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            cors_allowed_origins: allowed_origins(env::var("CORS_ALLOWED_ORIGINS").ok().as_deref()),
        }
    }

    /// Cookies are only marked secure and cross-site in production.
    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    /// Validate that production-critical configuration is set
    /// Panics if required secrets are using default values
    pub fn validate_for_production(&self) {
        use secrecy::ExposeSecret;

        let jwt_secret = self.jwt_secret.expose_secret();

        if jwt_secret == DEFAULT_JWT_SECRET {
            panic!(
                "FATAL: JWT_SECRET is using default value! \
                 Set JWT_SECRET environment variable to a secure random string."
            );
        }

        if jwt_secret.len() < 32 {
            panic!(
                "FATAL: JWT_SECRET is too short ({}). Must be at least 32 characters for security.",
                jwt_secret.len()
            );
        }

        if self.cors_allowed_origins.is_empty() {
            panic!("FATAL: CORS_ALLOWED_ORIGINS is empty. The front-end could not reach the API.");
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "marathon-test".to_string(),
            marathons_collection: "marathons".to_string(),
            applications_collection: "applications".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 5000,
            jwt_secret: SecretString::from("test_jwt_secret_key".to_string()),
            jwt_expiration_hours: 5,
            app_env: "test".to_string(),
            cors_allowed_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}

/// Origins from `CORS_ALLOWED_ORIGINS`, or the local front-end dev server.
fn allowed_origins(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(raw) => parse_origins(raw),
        None => DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| origin.trim_end_matches('/').to_string())
        .collect()
}
