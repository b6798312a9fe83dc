use crate::Database;
use crate::models::{AlphaUserRow, Collection, PostRow, PushTokenRow};
use anyhow::Result;
use feedwire_types::models::{FeedKind, Link};
use rusqlite::Connection;
use tracing::warn;

impl Database {
    pub fn ping(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
    }

    // -- Alpha users --

    /// Credits `inviter` with one invite (if a member with that address
    /// exists) and stores the new member with zero invites.
    ///
    /// Returns whether an inviter was credited. The credit is a single
    /// `UPDATE ... + 1`, so concurrent signups never lose an increment.
    pub fn create_alpha_user(
        &self,
        id: &str,
        address: &str,
        inviter: &str,
        hash: &str,
        creation_time: i64,
    ) -> Result<bool> {
        self.with_conn_mut(|tx| {
            // Credit before inserting so a self-referencing signup is never
            // counted. Only the oldest member with that address is credited.
            let credited = if inviter.is_empty() {
                false
            } else {
                tx.execute(
                    "UPDATE alpha_users SET num_invites = num_invites + 1
                     WHERE id = (
                         SELECT id FROM alpha_users WHERE address = ?1
                         ORDER BY creation_time, rowid LIMIT 1
                     )",
                    [inviter],
                )? > 0
            };

            tx.execute(
                "INSERT INTO alpha_users (id, address, inviter, hash, num_invites, creation_time)
                 VALUES (?1, ?2, ?3, ?4, 0, ?5)",
                rusqlite::params![id, address, inviter, hash, creation_time],
            )?;

            Ok(credited)
        })
    }

    pub fn list_alpha_users(&self) -> Result<Vec<AlphaUserRow>> {
        self.with_conn(query_alpha_users)
    }

    // -- Push tokens --

    pub fn insert_push_token(&self, id: &str, push_token: &str, creation_time: i64) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO push_tokens (id, push_token, creation_time) VALUES (?1, ?2, ?3)",
                rusqlite::params![id, push_token, creation_time],
            )?;
            Ok(())
        })
    }

    pub fn list_push_tokens(&self) -> Result<Vec<PushTokenRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, push_token, creation_time FROM push_tokens ORDER BY creation_time, rowid",
            )?;

            let rows = stmt
                .query_map([], |row| {
                    Ok(PushTokenRow {
                        id: row.get(0)?,
                        push_token: row.get(1)?,
                        creation_time: row.get(2)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Every distinct registered token, in first-registration order.
    pub fn distinct_push_tokens(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT push_token FROM push_tokens
                 GROUP BY push_token
                 ORDER BY MIN(rowid)",
            )?;

            let tokens = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(tokens)
        })
    }

    // -- Feed posts --

    pub fn insert_post(&self, kind: FeedKind, post: &PostRow) -> Result<()> {
        let links = serde_json::to_string(&post.links)?;
        let table = Collection::Feed(kind).table();

        self.with_conn_mut(|conn| {
            conn.execute(
                &format!(
                    "INSERT INTO {table} (id, heading, description, img, links, endpoint, creation_time)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
                ),
                rusqlite::params![
                    post.id,
                    post.heading,
                    post.description,
                    post.img,
                    links,
                    post.endpoint,
                    post.creation_time,
                ],
            )?;
            Ok(())
        })
    }

    pub fn list_posts(&self, kind: FeedKind) -> Result<Vec<PostRow>> {
        self.with_conn(|conn| query_posts(conn, kind))
    }

    // -- Retention --

    /// Deletes every row of `collection` created strictly before `cutoff`
    /// (epoch ms). Returns the number of rows removed.
    pub fn delete_created_before(&self, collection: Collection, cutoff: i64) -> Result<usize> {
        let table = collection.table();
        self.with_conn_mut(|conn| {
            let deleted = conn.execute(
                &format!("DELETE FROM {table} WHERE creation_time < ?1"),
                [cutoff],
            )?;
            Ok(deleted)
        })
    }

    pub fn count(&self, collection: Collection) -> Result<usize> {
        let table = collection.table();
        self.with_conn(|conn| {
            let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })?;
            Ok(n as usize)
        })
    }
}

fn query_alpha_users(conn: &Connection) -> Result<Vec<AlphaUserRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, address, inviter, hash, num_invites, creation_time
         FROM alpha_users
         ORDER BY creation_time, rowid",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(AlphaUserRow {
                id: row.get(0)?,
                address: row.get(1)?,
                inviter: row.get(2)?,
                hash: row.get(3)?,
                num_invites: row.get(4)?,
                creation_time: row.get(5)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_posts(conn: &Connection, kind: FeedKind) -> Result<Vec<PostRow>> {
    let table = Collection::Feed(kind).table();
    let mut stmt = conn.prepare(&format!(
        "SELECT id, heading, description, img, links, endpoint, creation_time
         FROM {table}
         ORDER BY creation_time, rowid"
    ))?;

    let rows = stmt
        .query_map([], |row| {
            let id: String = row.get(0)?;
            let links_json: String = row.get(4)?;
            let links = serde_json::from_str::<Vec<Link>>(&links_json).unwrap_or_else(|e| {
                warn!("Corrupt links on {} post '{}': {}", kind.endpoint(), id, e);
                Vec::new()
            });

            Ok(PostRow {
                id,
                heading: row.get(1)?,
                description: row.get(2)?,
                img: row.get(3)?,
                links,
                endpoint: row.get(5)?,
                creation_time: row.get(6)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn member(db: &Database, address: &str) -> AlphaUserRow {
        db.list_alpha_users()
            .unwrap()
            .into_iter()
            .find(|u| u.address == address)
            .unwrap()
    }

    fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    fn post(heading: &str, creation_time: i64) -> PostRow {
        PostRow {
            id: new_id(),
            heading: heading.into(),
            description: "d".into(),
            img: "".into(),
            links: vec![Link { name: "site".into(), url: "https://example.com".into() }],
            endpoint: "/news".into(),
            creation_time,
        }
    }

    #[test]
    fn signup_credits_existing_inviter() {
        let db = Database::open_in_memory().unwrap();

        assert!(!db.create_alpha_user(&new_id(), "A", "", "h1", 1).unwrap());
        assert!(db.create_alpha_user(&new_id(), "B", "A", "h2", 2).unwrap());

        let a = member(&db, "A");
        let b = member(&db, "B");
        assert_eq!(a.num_invites, 1);
        assert_eq!(b.num_invites, 0);
        assert_eq!(b.inviter, "A");
    }

    #[test]
    fn signup_with_unknown_inviter_still_stores_user() {
        let db = Database::open_in_memory().unwrap();

        assert!(!db.create_alpha_user(&new_id(), "B", "nobody", "h", 1).unwrap());
        assert_eq!(db.list_alpha_users().unwrap().len(), 1);
    }

    #[test]
    fn self_invite_is_not_counted() {
        let db = Database::open_in_memory().unwrap();

        db.create_alpha_user(&new_id(), "A", "A", "h", 1).unwrap();
        assert_eq!(member(&db, "A").num_invites, 0);
    }

    #[test]
    fn duplicate_addresses_credit_only_the_oldest() {
        let db = Database::open_in_memory().unwrap();

        db.create_alpha_user(&new_id(), "A", "", "first", 1).unwrap();
        db.create_alpha_user(&new_id(), "A", "", "second", 2).unwrap();
        db.create_alpha_user(&new_id(), "C", "A", "h", 3).unwrap();

        let counts: Vec<(String, i64)> = db
            .list_alpha_users()
            .unwrap()
            .into_iter()
            .filter(|u| u.address == "A")
            .map(|u| (u.hash, u.num_invites))
            .collect();
        assert_eq!(counts, vec![("first".into(), 1), ("second".into(), 0)]);
    }

    #[test]
    fn distinct_tokens_collapse_duplicates() {
        let db = Database::open_in_memory().unwrap();

        db.insert_push_token(&new_id(), "ExponentPushToken[a]", 1).unwrap();
        db.insert_push_token(&new_id(), "ExponentPushToken[b]", 2).unwrap();
        db.insert_push_token(&new_id(), "ExponentPushToken[a]", 3).unwrap();

        assert_eq!(db.list_push_tokens().unwrap().len(), 3);
        assert_eq!(
            db.distinct_push_tokens().unwrap(),
            vec!["ExponentPushToken[a]".to_string(), "ExponentPushToken[b]".to_string()]
        );
    }

    #[test]
    fn posts_are_isolated_per_feed() {
        let db = Database::open_in_memory().unwrap();

        db.insert_post(FeedKind::News, &post("n1", 10)).unwrap();
        db.insert_post(FeedKind::News, &post("n2", 20)).unwrap();

        let news = db.list_posts(FeedKind::News).unwrap();
        assert_eq!(news.len(), 2);
        assert_eq!(news[0].heading, "n1");
        assert_eq!(news[0].links[0].url, "https://example.com");
        assert!(db.list_posts(FeedKind::Degen).unwrap().is_empty());
    }

    #[test]
    fn delete_is_strictly_before_cutoff() {
        let db = Database::open_in_memory().unwrap();

        db.insert_push_token(&new_id(), "t-old", 99).unwrap();
        db.insert_push_token(&new_id(), "t-edge", 100).unwrap();
        db.insert_push_token(&new_id(), "t-new", 101).unwrap();

        assert_eq!(db.delete_created_before(Collection::PushTokens, 100).unwrap(), 1);
        assert_eq!(db.delete_created_before(Collection::PushTokens, 100).unwrap(), 0);
        assert_eq!(db.count(Collection::PushTokens).unwrap(), 2);
    }
}
