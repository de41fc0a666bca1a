use mongodb::bson::{oid::ObjectId, Bson, DateTime, Document};
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::domain::strip_reserved;

/// Keys owned by the server; client payloads may never set them directly.
pub const MARATHON_RESERVED_FIELDS: &[&str] =
    &["_id", "creatorEmail", "title", "createdAt", "totalRegCount"];

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marathon {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub creator_email: String,
    pub title: String,
    /// Older documents may lack `createdAt` or store it as a string.
    #[serde(default = "unknown_creation", deserialize_with = "lenient_created_at")]
    pub created_at: DateTime,
    #[serde(default)]
    pub total_reg_count: i64,
    /// Descriptive fields (location, dates, distance, image...) kept as-is.
    #[serde(flatten)]
    pub details: Document,
}

fn unknown_creation() -> DateTime {
    DateTime::from_millis(0)
}

fn lenient_created_at<'de, D>(deserializer: D) -> Result<DateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let created_at = match Bson::deserialize(deserializer)? {
        Bson::DateTime(created_at) => created_at,
        Bson::String(raw) => DateTime::parse_rfc3339_str(&raw).unwrap_or_else(|_| {
            log::warn!("Unparseable marathon createdAt '{}'", raw);
            unknown_creation()
        }),
        Bson::Int64(millis) => DateTime::from_millis(millis),
        _ => unknown_creation(),
    };
    Ok(created_at)
}

impl Marathon {
    pub fn new(creator_email: &str, title: &str, mut details: Document) -> Self {
        strip_reserved(&mut details, MARATHON_RESERVED_FIELDS);

        Marathon {
            id: ObjectId::new(),
            creator_email: creator_email.to_string(),
            title: title.to_string(),
            created_at: DateTime::now(),
            total_reg_count: 0,
            details,
        }
    }
}
