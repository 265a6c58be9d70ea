use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub storage: StorageConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub bind: String,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub require_auth: bool,
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_minutes: i64,
    pub cors_origins: Vec<String>,
}

/// Microsoft Graph app credentials. The file store is disabled while any of them is empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    pub tenant_id: String,
    pub client_id: String,
    #[serde(skip_serializing)]
    pub client_secret: String,
    pub token_refresh_margin_secs: u64,
}

impl StorageConfig {
    pub fn is_configured(&self) -> bool {
        !self.tenant_id.is_empty() && !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub extreme_diff_pct: f64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_RUN_MIGRATIONS") {
            self.database.run_migrations = v.parse().unwrap_or(self.database.run_migrations);
        }

        // API overrides
        if let Ok(v) = env::var("API_PORT").or_else(|_| env::var("PORT")) {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        if let Ok(v) = env::var("API_BIND") {
            self.api.bind = v;
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_REQUIRE_AUTH") {
            self.security.require_auth = v.parse().unwrap_or(self.security.require_auth);
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_MINUTES") {
            self.security.jwt_expiry_minutes = v.parse().unwrap_or(self.security.jwt_expiry_minutes);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Storage overrides
        if let Ok(v) = env::var("GRAPH_TENANT_ID") {
            self.storage.tenant_id = v;
        }
        if let Ok(v) = env::var("GRAPH_CLIENT_ID") {
            self.storage.client_id = v;
        }
        if let Ok(v) = env::var("GRAPH_CLIENT_SECRET") {
            self.storage.client_secret = v;
        }
        if let Ok(v) = env::var("GRAPH_TOKEN_REFRESH_MARGIN_SECS") {
            self.storage.token_refresh_margin_secs =
                v.parse().unwrap_or(self.storage.token_refresh_margin_secs);
        }

        // Analysis overrides
        if let Ok(v) = env::var("ANALYSIS_EXTREME_DIFF_PCT") {
            self.analysis.extreme_diff_pct = v.parse().unwrap_or(self.analysis.extreme_diff_pct);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout: 30,
                run_migrations: true,
            },
            api: ApiConfig {
                port: 8000,
                bind: "127.0.0.1".to_string(),
                enable_request_logging: true,
            },
            security: SecurityConfig {
                require_auth: false,
                jwt_secret: "dev-secret-change-me".to_string(),
                jwt_expiry_minutes: 60 * 24,
                cors_origins: vec!["http://localhost:5173".to_string(), "http://localhost:3000".to_string()],
            },
            storage: StorageConfig {
                token_refresh_margin_secs: 300,
                ..Default::default()
            },
            analysis: AnalysisConfig { extreme_diff_pct: 100.0 },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout: 10,
                run_migrations: true,
            },
            api: ApiConfig {
                port: 8000,
                bind: "0.0.0.0".to_string(),
                enable_request_logging: true,
            },
            security: SecurityConfig {
                require_auth: true,
                jwt_secret: String::new(),
                jwt_expiry_minutes: 60 * 8,
                cors_origins: vec!["https://staging.revosport.be".to_string()],
            },
            storage: StorageConfig {
                token_refresh_margin_secs: 300,
                ..Default::default()
            },
            analysis: AnalysisConfig { extreme_diff_pct: 100.0 },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout: 5,
                run_migrations: false,
            },
            api: ApiConfig {
                port: 8000,
                bind: "0.0.0.0".to_string(),
                enable_request_logging: false,
            },
            security: SecurityConfig {
                require_auth: true,
                jwt_secret: String::new(),
                jwt_expiry_minutes: 60,
                cors_origins: vec!["https://app.revosport.be".to_string()],
            },
            storage: StorageConfig {
                token_refresh_margin_secs: 300,
                ..Default::default()
            },
            analysis: AnalysisConfig { extreme_diff_pct: 100.0 },
        }
    }

    pub fn analysis_options(&self) -> crate::analysis::AnalysisOptions {
        crate::analysis::AnalysisOptions {
            extreme_diff_pct: self.analysis.extreme_diff_pct,
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(!config.security.require_auth);
        assert!(config.database.run_migrations);
        assert!(!config.storage.is_configured());
        assert_eq!(config.storage.token_refresh_margin_secs, 300);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.security.require_auth);
        assert!(config.security.jwt_secret.is_empty());
        assert!(!config.database.run_migrations);
        assert_eq!(config.analysis.extreme_diff_pct, 100.0);
    }

    #[test]
    fn storage_needs_all_credentials() {
        let mut storage = StorageConfig {
            tenant_id: "t".into(),
            client_id: "c".into(),
            ..Default::default()
        };
        assert!(!storage.is_configured());
        storage.client_secret = "s".into();
        assert!(storage.is_configured());
    }

    #[test]
    fn secrets_are_not_serialized() {
        let mut config = AppConfig::development();
        config.storage.client_secret = "hidden".into();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("hidden"));
        assert!(!json.contains("dev-secret-change-me"));
    }
}
