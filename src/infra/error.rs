use thiserror::Error;

/// Failures while bringing the process up or serving traffic.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("listener error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no database url configured (set `database.url` or AGORA__DATABASE__URL)")]
    MissingDatabaseUrl,
    #[error("failed to open postgres pool: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("failed to apply migrations: {0}")]
    Migrate(#[source] sqlx::Error),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
}

impl InfraError {
    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry(message.into())
    }
}
