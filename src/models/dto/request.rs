use mongodb::bson::{self, Document};
use serde::Deserialize;
use serde_json::{Map, Value};
use validator::Validate;

use crate::{
    auth::Claimant,
    errors::{AppError, AppResult},
};

pub const DEFAULT_PAGE_SIZE: i64 = 6;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Free-form JSON fields carried alongside the named ones in a request body.
pub type ExtraFields = Map<String, Value>;

pub fn fields_to_document(fields: ExtraFields) -> AppResult<Document> {
    Ok(bson::to_document(&fields)?)
}

/// Body of `POST /jwt`: whatever the front-end knows about the signed-in user.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(flatten)]
    pub profile: ExtraFields,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn direction(self) -> i32 {
        match self {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MarathonListQuery {
    pub sort: Option<SortOrder>,

    pub page: Option<u64>,

    #[validate(range(min = 1, max = 100))]
    pub size: Option<i64>,
}

impl MarathonListQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(0)
    }

    pub fn size(&self) -> i64 {
        self.size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    /// Documents to skip before the requested page. Must fit the driver's
    /// signed 64-bit skip.
    pub fn skip(&self) -> AppResult<u64> {
        self.page()
            .checked_mul(self.size() as u64)
            .filter(|skip| *skip <= i64::MAX as u64)
            .ok_or_else(|| {
                AppError::ValidationError(format!("page {} is out of range", self.page()))
            })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSearchQuery {
    pub email: String,
    pub search: Option<String>,
}

/// Query of the owner-only delete endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerDeleteQuery {
    pub id: String,
    pub creator_email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailBody {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationCheckRequest {
    pub email: String,
    pub marathon_id: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewMarathonRequest {
    #[validate(email(message = "Invalid email format"))]
    pub creator_email: String,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[serde(flatten)]
    pub details: ExtraFields,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApplyData {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1))]
    pub marathon_id: String,

    #[serde(default)]
    pub marathon_title: String,

    #[serde(flatten)]
    pub details: ExtraFields,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    #[validate(nested)]
    pub apply_data: ApplyData,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerVerify {
    pub id: String,
    pub creator_email: String,
}

/// Partial update: `ownerVerify` names the target, every other field is `$set`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub owner_verify: OwnerVerify,

    #[serde(flatten)]
    pub fields: ExtraFields,
}

// Where each guarded request carries the email it claims to act for.

impl Claimant for EmailQuery {
    fn claimant_email(&self) -> &str {
        &self.email
    }
}

impl Claimant for ApplicationSearchQuery {
    fn claimant_email(&self) -> &str {
        &self.email
    }
}

impl Claimant for OwnerDeleteQuery {
    fn claimant_email(&self) -> &str {
        &self.creator_email
    }
}

impl Claimant for EmailBody {
    fn claimant_email(&self) -> &str {
        &self.email
    }
}

impl Claimant for RegistrationCheckRequest {
    fn claimant_email(&self) -> &str {
        &self.email
    }
}

impl Claimant for NewMarathonRequest {
    fn claimant_email(&self) -> &str {
        &self.creator_email
    }
}

impl Claimant for ApplyRequest {
    fn claimant_email(&self) -> &str {
        &self.apply_data.email
    }
}

impl Claimant for UpdateRequest {
    fn claimant_email(&self) -> &str {
        &self.owner_verify.creator_email
    }
}
