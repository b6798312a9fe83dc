use anyhow::Result;
use feedwire_types::models::FeedKind;
use rusqlite::Connection;
use tracing::info;

use crate::models::Collection;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);"
    )?;

    let version: i64 = conn
        .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE alpha_users (
                id              TEXT PRIMARY KEY,
                address         TEXT NOT NULL,
                inviter         TEXT NOT NULL,
                hash            TEXT NOT NULL,
                num_invites     INTEGER NOT NULL DEFAULT 0,
                creation_time   INTEGER NOT NULL
            );

            CREATE INDEX idx_alpha_users_address ON alpha_users(address);
            CREATE INDEX idx_alpha_users_created ON alpha_users(creation_time);

            CREATE TABLE push_tokens (
                id              TEXT PRIMARY KEY,
                push_token      TEXT NOT NULL,
                creation_time   INTEGER NOT NULL
            );

            CREATE INDEX idx_push_tokens_created ON push_tokens(creation_time);
            ",
        )?;

        for kind in FeedKind::ALL {
            let table = Collection::Feed(kind).table();
            conn.execute_batch(&format!(
                "
                CREATE TABLE {table} (
                    id              TEXT PRIMARY KEY,
                    heading         TEXT NOT NULL,
                    description     TEXT NOT NULL,
                    img             TEXT NOT NULL,
                    links           TEXT NOT NULL DEFAULT '[]',
                    endpoint        TEXT NOT NULL,
                    creation_time   INTEGER NOT NULL
                );

                CREATE INDEX idx_{table}_created ON {table}(creation_time);
                "
            ))?;
        }

        conn.execute("INSERT INTO schema_version (version) VALUES (1)", [])?;
    }

    info!("Database migrations complete");
    Ok(())
}
