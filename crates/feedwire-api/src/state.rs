use std::sync::Arc;

use feedwire_db::Database;
use feedwire_push::PushGateway;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Arc<Database>,
    /// Shared secret expected in `x-api-key` on feed writes.
    pub api_key: String,
    pub push: Box<dyn PushGateway>,
}

impl AppStateInner {
    /// Runs a blocking storage call off the async runtime.
    pub async fn run_db<F, T>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.clone();
        let value = tokio::task::spawn_blocking(move || f(db.as_ref())).await??;
        Ok(value)
    }
}

/// Server-assigned record timestamp, epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
