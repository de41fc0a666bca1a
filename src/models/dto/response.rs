use mongodb::bson::{Bson, Document};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    models::domain::{Application, Marathon},
    repositories::UpdateOutcome,
};

fn document_to_json(document: Document) -> Map<String, Value> {
    match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarathonDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub creator_email: String,
    pub title: String,
    pub created_at: String,
    pub total_reg_count: i64,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl From<Marathon> for MarathonDto {
    fn from(marathon: Marathon) -> Self {
        MarathonDto {
            id: marathon.id.to_hex(),
            created_at: marathon
                .created_at
                .try_to_rfc3339_string()
                .unwrap_or_default(),
            creator_email: marathon.creator_email,
            title: marathon.title,
            total_reg_count: marathon.total_reg_count,
            details: document_to_json(marathon.details),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub marathon_id: String,
    pub marathon_title: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl From<Application> for ApplicationDto {
    fn from(application: Application) -> Self {
        ApplicationDto {
            id: application.id.to_hex(),
            email: application.email,
            marathon_id: application.marathon_id,
            marathon_title: application.marathon_title,
            details: document_to_json(application.details),
        }
    }
}

pub fn to_dtos<T, D: From<T>>(items: Vec<T>) -> Vec<D> {
    items.into_iter().map(D::from).collect()
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        SuccessResponse { success: true }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResponse {
    pub acknowledged: bool,
    pub inserted_id: String,
}

impl InsertResponse {
    pub fn new(inserted_id: String) -> Self {
        InsertResponse {
            acknowledged: true,
            inserted_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<String>,
}

impl From<UpdateOutcome> for UpdateResponse {
    fn from(outcome: UpdateOutcome) -> Self {
        UpdateResponse {
            acknowledged: true,
            matched_count: outcome.matched_count,
            modified_count: outcome.modified_count,
            upserted_id: outcome.upserted_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteResponse {
    pub fn new(deleted_count: u64) -> Self {
        DeleteResponse {
            acknowledged: true,
            deleted_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct RegisteredResponse {
    pub registered: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntriesCount {
    pub marathons: u64,
    pub applications: u64,
}
