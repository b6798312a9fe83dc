use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// The four content feeds. Each has its own route and its own collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedKind {
    Uniswap,
    Binance,
    News,
    Degen,
}

impl FeedKind {
    pub const ALL: [FeedKind; 4] = [
        FeedKind::Uniswap,
        FeedKind::Binance,
        FeedKind::News,
        FeedKind::Degen,
    ];

    /// Route path, also stamped onto every stored post as `endpoint`.
    pub fn endpoint(self) -> &'static str {
        match self {
            FeedKind::Uniswap => "/uniswap",
            FeedKind::Binance => "/binance",
            FeedKind::News => "/news",
            FeedKind::Degen => "/degen",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlphaUserProfile {
    pub address: String,
    pub inviter: String,
    pub hash: String,
    pub num_invites: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlphaUser {
    pub id: Uuid,
    pub user: AlphaUserProfile,
    /// Epoch milliseconds, assigned by the server.
    pub creation_time: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushToken {
    pub id: Uuid,
    pub push_token: String,
    pub creation_time: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPost {
    pub id: Uuid,
    pub heading: String,
    pub description: String,
    pub img: String,
    pub links: Vec<Link>,
    pub creation_time: i64,
    pub endpoint: String,
}

/// Treats an explicit JSON `null` the same as an absent field.
pub fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// `null` list fields deserialize as empty, like absent ones.
pub fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_distinct_route_paths() {
        let endpoints: Vec<&str> = FeedKind::ALL.iter().map(|k| k.endpoint()).collect();
        assert_eq!(endpoints, vec!["/uniswap", "/binance", "/news", "/degen"]);
    }

    #[test]
    fn link_accepts_null_and_missing_fields() {
        let link: Link = serde_json::from_str(r#"{"name": null}"#).unwrap();
        assert_eq!(link.name, "");
        assert_eq!(link.url, "");
    }

    #[test]
    fn alpha_user_serializes_nested_camel_case() {
        let user = AlphaUser {
            id: Uuid::nil(),
            user: AlphaUserProfile {
                address: "0xabc".into(),
                inviter: "".into(),
                hash: "h1".into(),
                num_invites: 2,
            },
            creation_time: 1_700_000_000_000,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["user"]["numInvites"], 2);
        assert_eq!(json["creationTime"], 1_700_000_000_000i64);
    }
}
