use mongodb::bson::{oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

use crate::{errors::AppResult, models::domain::strip_reserved};

pub const APPLICATION_RESERVED_FIELDS: &[&str] = &["_id", "email", "marathonId", "marathonTitle"];

/// A user's registration for a marathon.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub email: String,
    /// Hex id of the marathon, stored as a string.
    pub marathon_id: String,
    #[serde(default)]
    pub marathon_title: String,
    #[serde(flatten)]
    pub details: Document,
}

impl Application {
    pub fn new(
        email: &str,
        marathon_id: &str,
        marathon_title: &str,
        mut details: Document,
    ) -> Self {
        strip_reserved(&mut details, APPLICATION_RESERVED_FIELDS);

        Application {
            id: ObjectId::new(),
            email: email.to_string(),
            marathon_id: marathon_id.to_string(),
            marathon_title: marathon_title.to_string(),
            details,
        }
    }

    pub fn marathon_object_id(&self) -> AppResult<ObjectId> {
        Ok(ObjectId::parse_str(&self.marathon_id)?)
    }
}
