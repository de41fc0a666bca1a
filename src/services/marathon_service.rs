use std::sync::Arc;

use mongodb::bson::oid::ObjectId;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{strip_reserved, Marathon},
        dto::request::{fields_to_document, MarathonListQuery, NewMarathonRequest, UpdateRequest},
    },
    repositories::{MarathonQuery, MarathonRepository, UpdateOutcome},
};

/// Number of marathons on the landing page.
pub const FEATURED_LIMIT: i64 = 6;

/// Fields a marathon update may never touch. The owner may still edit
/// `creatorEmail`, `title` and descriptive fields.
const IMMUTABLE_ON_UPDATE: &[&str] = &["_id", "totalRegCount"];

pub struct MarathonService {
    repository: Arc<dyn MarathonRepository>,
}

impl MarathonService {
    pub fn new(repository: Arc<dyn MarathonRepository>) -> Self {
        Self { repository }
    }

    pub async fn featured(&self) -> AppResult<Vec<Marathon>> {
        self.repository.find(MarathonQuery::first(FEATURED_LIMIT)).await
    }

    pub async fn list_all(&self) -> AppResult<Vec<Marathon>> {
        self.repository.find(MarathonQuery::all()).await
    }

    pub async fn list_page(&self, params: &MarathonListQuery) -> AppResult<Vec<Marathon>> {
        params.validate()?;

        let query = MarathonQuery {
            creator_email: None,
            sort: params.sort,
            skip: params.skip()?,
            limit: Some(params.size()),
        };
        self.repository.find(query).await
    }

    pub async fn total_count(&self) -> AppResult<u64> {
        self.repository.count(None).await
    }

    pub async fn get(&self, id: &str) -> AppResult<Marathon> {
        let oid = ObjectId::parse_str(id)?;
        self.repository
            .find_by_id(oid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Marathon with id '{}' not found", id)))
    }

    pub async fn list_created_by(&self, email: &str) -> AppResult<Vec<Marathon>> {
        self.repository.find(MarathonQuery::created_by(email)).await
    }

    pub async fn create(&self, request: NewMarathonRequest) -> AppResult<Marathon> {
        request.validate()?;

        let details = fields_to_document(request.details)?;
        let marathon = Marathon::new(&request.creator_email, &request.title, details);
        let marathon = self.repository.create(marathon).await?;

        log::info!(
            "Marathon '{}' ({}) created by {}",
            marathon.title,
            marathon.id,
            marathon.creator_email
        );
        Ok(marathon)
    }

    pub async fn update(&self, request: UpdateRequest) -> AppResult<UpdateOutcome> {
        let oid = ObjectId::parse_str(&request.owner_verify.id)?;

        let mut fields = fields_to_document(request.fields)?;
        strip_reserved(&mut fields, IMMUTABLE_ON_UPDATE);
        if fields.is_empty() {
            return Err(AppError::ValidationError(
                "Update contains no editable fields".to_string(),
            ));
        }

        let outcome = self.repository.update_fields(oid, fields).await?;
        if outcome.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Marathon with id '{}' not found",
                oid
            )));
        }
        Ok(outcome)
    }

    pub async fn delete(&self, id: &str) -> AppResult<u64> {
        let oid = ObjectId::parse_str(id)?;
        let deleted = self.repository.delete(oid).await?;
        if deleted == 0 {
            return Err(AppError::NotFound(format!(
                "Marathon with id '{}' not found",
                id
            )));
        }

        log::info!("Marathon {} deleted", id);
        Ok(deleted)
    }
}
