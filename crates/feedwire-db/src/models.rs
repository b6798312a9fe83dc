//! Database row types — these map directly to SQLite rows.
//! Distinct from feedwire-types API models to keep the DB layer independent.

use std::fmt;

use feedwire_types::models::{FeedKind, Link};

/// One of the six independently stored record collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    AlphaUsers,
    PushTokens,
    Feed(FeedKind),
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Collection::AlphaUsers,
        Collection::PushTokens,
        Collection::Feed(FeedKind::Uniswap),
        Collection::Feed(FeedKind::Binance),
        Collection::Feed(FeedKind::News),
        Collection::Feed(FeedKind::Degen),
    ];

    pub fn table(self) -> &'static str {
        match self {
            Collection::AlphaUsers => "alpha_users",
            Collection::PushTokens => "push_tokens",
            Collection::Feed(FeedKind::Uniswap) => "uniswap_posts",
            Collection::Feed(FeedKind::Binance) => "binance_posts",
            Collection::Feed(FeedKind::News) => "news_posts",
            Collection::Feed(FeedKind::Degen) => "degen_posts",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

pub struct AlphaUserRow {
    pub id: String,
    pub address: String,
    pub inviter: String,
    pub hash: String,
    pub num_invites: i64,
    pub creation_time: i64,
}

pub struct PushTokenRow {
    pub id: String,
    pub push_token: String,
    pub creation_time: i64,
}

pub struct PostRow {
    pub id: String,
    pub heading: String,
    pub description: String,
    pub img: String,
    pub links: Vec<Link>,
    pub endpoint: String,
    pub creation_time: i64,
}
