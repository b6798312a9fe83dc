use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use feedwire_db::{Collection, Database};

/// Pause between the end of one sweep and the start of the next.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Maximum age (ms) a record of `collection` may reach before it is swept.
pub fn threshold_ms(collection: Collection) -> i64 {
    match collection {
        Collection::AlphaUsers | Collection::PushTokens => 30 * DAY_MS,
        Collection::Feed(_) => 10 * DAY_MS,
    }
}

#[derive(Debug, Default)]
pub struct SweepReport {
    pub deleted: Vec<(Collection, usize)>,
    pub failed: Vec<Collection>,
}

impl SweepReport {
    pub fn total_deleted(&self) -> usize {
        self.deleted.iter().map(|(_, n)| n).sum()
    }
}

/// Deletes every record older than its collection's threshold as of `now`
/// (epoch ms). A failing collection is logged and skipped.
pub fn sweep(db: &Database, now: i64) -> SweepReport {
    let mut report = SweepReport::default();

    for collection in Collection::ALL {
        let cutoff = now - threshold_ms(collection);
        match db.delete_created_before(collection, cutoff) {
            Ok(count) => report.deleted.push((collection, count)),
            Err(e) => {
                error!("Retention: failed to sweep {}: {}", collection, e);
                report.failed.push(collection);
            }
        }
    }

    report
}

/// Background task: sweeps immediately, then once per [`SWEEP_INTERVAL`]
/// after each sweep finishes, until `shutdown` is cancelled.
pub async fn run_retention_loop(db: Arc<Database>, shutdown: CancellationToken) {
    info!("Retention sweeper started ({}h interval)", SWEEP_INTERVAL.as_secs() / 3600);

    loop {
        let now = chrono::Utc::now().timestamp_millis();
        let sweep_db = db.clone();

        match tokio::task::spawn_blocking(move || sweep(&sweep_db, now)).await {
            Ok(report) => {
                for (collection, count) in report.deleted.iter().filter(|(_, n)| *n > 0) {
                    info!("Retention: removed {} stale rows from {}", count, collection);
                }
                if report.failed.is_empty() {
                    info!("Retention sweep complete: {} rows removed", report.total_deleted());
                } else {
                    warn!(
                        "Retention sweep finished with {} failed collections",
                        report.failed.len()
                    );
                }
            }
            Err(e) => {
                error!("Retention sweep task failed: {}", e);
            }
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(SWEEP_INTERVAL) => {}
        }
    }

    info!("Retention sweeper stopped");
}
