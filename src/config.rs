use serde::Deserialize;

/// Store connection parameters, resolved once at startup and carried in
/// [`crate::state::AppState`]. Defaults match the docker-compose setup
/// (database host `db`, superuser credentials).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://postgres:postgres@db:5432/postgres".into());
        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        Self {
            database_url,
            max_connections,
        }
    }
}
