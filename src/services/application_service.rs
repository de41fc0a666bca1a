use std::sync::Arc;

use mongodb::bson::oid::ObjectId;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{strip_reserved, Application},
        dto::{
            request::{fields_to_document, ApplyRequest, UpdateRequest},
            response::EntriesCount,
        },
    },
    repositories::{ApplicationRepository, MarathonRepository, UpdateOutcome},
    services::search::title_pattern,
};

/// Registrations and the per-marathon `totalRegCount` they drive.
pub struct ApplicationService {
    applications: Arc<dyn ApplicationRepository>,
    marathons: Arc<dyn MarathonRepository>,
}

impl ApplicationService {
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        marathons: Arc<dyn MarathonRepository>,
    ) -> Self {
        Self {
            applications,
            marathons,
        }
    }

    pub async fn list_for(&self, email: &str, search: Option<&str>) -> AppResult<Vec<Application>> {
        let pattern = search.and_then(title_pattern);
        self.applications.find_by_email(email, pattern).await
    }

    pub async fn is_registered(&self, email: &str, marathon_id: &str) -> AppResult<bool> {
        let application = self
            .applications
            .find_by_email_and_marathon(email, marathon_id)
            .await?;
        Ok(application.is_some())
    }

    /// Registers for a marathon. The counter moves first so a missing
    /// marathon leaves nothing behind; a failed insert rolls the counter back.
    pub async fn apply(&self, request: ApplyRequest) -> AppResult<Application> {
        request.validate()?;
        let data = request.apply_data;
        let marathon_id = ObjectId::parse_str(&data.marathon_id)?;

        if self.is_registered(&data.email, &data.marathon_id).await? {
            return Err(AppError::AlreadyExists(format!(
                "'{}' already applied to marathon '{}'",
                data.email, data.marathon_id
            )));
        }

        let details = fields_to_document(data.details)?;
        let application = Application::new(
            &data.email,
            &data.marathon_id,
            &data.marathon_title,
            details,
        );

        self.marathons
            .adjust_registrations(marathon_id, 1)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Marathon with id '{}' not found", marathon_id))
            })?;

        match self.applications.create(application).await {
            Ok(application) => {
                log::info!(
                    "{} applied to marathon {}",
                    application.email,
                    application.marathon_id
                );
                Ok(application)
            }
            Err(err) => {
                if let Err(rollback) = self.marathons.adjust_registrations(marathon_id, -1).await {
                    log::error!(
                        "Failed to roll back registration count of marathon {}: {}",
                        marathon_id,
                        rollback
                    );
                }
                Err(err)
            }
        }
    }

    /// `$set`s the remaining body fields. Upserts when the id is unknown.
    pub async fn update(&self, request: UpdateRequest) -> AppResult<UpdateOutcome> {
        let oid = ObjectId::parse_str(&request.owner_verify.id)?;

        let mut fields = fields_to_document(request.fields)?;
        strip_reserved(&mut fields, &["_id"]);
        if fields.is_empty() {
            return Err(AppError::ValidationError(
                "Update contains no editable fields".to_string(),
            ));
        }

        self.applications.update_fields(oid, fields, true).await
    }

    /// Deletes an application and releases its slot on the marathon.
    pub async fn withdraw(&self, id: &str) -> AppResult<Application> {
        let oid = ObjectId::parse_str(id)?;
        let application = self
            .applications
            .delete(oid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Application with id '{}' not found", id)))?;

        match application.marathon_object_id() {
            Ok(marathon_id) => {
                if self.marathons.adjust_registrations(marathon_id, -1).await?.is_none() {
                    log::warn!(
                        "Application {} removed but marathon {} had no registration to release",
                        id,
                        marathon_id
                    );
                }
            }
            Err(_) => log::warn!(
                "Application {} referenced malformed marathon id '{}'",
                id,
                application.marathon_id
            ),
        }

        Ok(application)
    }

    pub async fn entries_count(&self, email: &str) -> AppResult<EntriesCount> {
        let marathons = self.marathons.count(Some(email.to_string())).await?;
        let applications = self.applications.count_by_email(email).await?;
        Ok(EntriesCount {
            marathons,
            applications,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{
            domain::Marathon,
            dto::request::{ApplyData, OwnerVerify},
        },
        repositories::{MockApplicationRepository, MockMarathonRepository},
        test_utils::fixtures::{test_application, test_marathon},
    };
    use mockall::predicate::eq;
    use mongodb::bson::doc;
    use serde_json::{json, Map};

    fn apply_request(marathon_id: &str) -> ApplyRequest {
        ApplyRequest {
            apply_data: ApplyData {
                email: "runner@example.com".to_string(),
                marathon_id: marathon_id.to_string(),
                marathon_title: "City Run".to_string(),
                details: Map::new(),
            },
        }
    }

    fn marathon() -> Marathon {
        test_marathon("owner@example.com", "City Run")
    }

    fn service_without_marathons(applications: MockApplicationRepository) -> ApplicationService {
        ApplicationService::new(Arc::new(applications), Arc::new(MockMarathonRepository::new()))
    }

    #[tokio::test]
    async fn test_search_is_sanitised_before_reaching_repository() {
        let mut applications = MockApplicationRepository::new();
        applications
            .expect_find_by_email()
            .withf(|email, pattern| {
                email == "runner@example.com" && pattern.as_deref() == Some("50k")
            })
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let service = service_without_marathons(applications);
        service
            .list_for("runner@example.com", Some("(5.0k)"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_apply_increments_then_inserts() {
        let marathon = marathon();
        let marathon_id = marathon.id;

        let mut marathons = MockMarathonRepository::new();
        marathons
            .expect_adjust_registrations()
            .with(eq(marathon_id), eq(1))
            .times(1)
            .returning(move |_, _| {
                let mut updated = marathon.clone();
                updated.total_reg_count = 1;
                Ok(Some(updated))
            });

        let mut applications = MockApplicationRepository::new();
        applications
            .expect_find_by_email_and_marathon()
            .returning(|_, _| Ok(None));
        applications.expect_create().times(1).returning(|a| Ok(a));

        let service = ApplicationService::new(Arc::new(applications), Arc::new(marathons));
        let application = service.apply(apply_request(&marathon_id.to_hex())).await.unwrap();

        assert_eq!(application.marathon_id, marathon_id.to_hex());
    }

    #[tokio::test]
    async fn test_apply_to_missing_marathon_inserts_nothing() {
        let mut marathons = MockMarathonRepository::new();
        marathons
            .expect_adjust_registrations()
            .returning(|_, _| Ok(None));

        let mut applications = MockApplicationRepository::new();
        applications
            .expect_find_by_email_and_marathon()
            .returning(|_, _| Ok(None));
        applications.expect_create().never();

        let service = ApplicationService::new(Arc::new(applications), Arc::new(marathons));
        let result = service.apply(apply_request(&ObjectId::new().to_hex())).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_failed_insert_rolls_counter_back() {
        let marathon = marathon();
        let marathon_id = marathon.id;

        let mut marathons = MockMarathonRepository::new();
        marathons
            .expect_adjust_registrations()
            .with(eq(marathon_id), eq(1))
            .times(1)
            .returning(move |_, _| Ok(Some(marathon.clone())));
        marathons
            .expect_adjust_registrations()
            .with(eq(marathon_id), eq(-1))
            .times(1)
            .returning(|_, _| Ok(None));

        let mut applications = MockApplicationRepository::new();
        applications
            .expect_find_by_email_and_marathon()
            .returning(|_, _| Ok(None));
        applications
            .expect_create()
            .returning(|_| Err(AppError::DatabaseError("insert failed".to_string())));

        let service = ApplicationService::new(Arc::new(applications), Arc::new(marathons));
        let result = service.apply(apply_request(&marathon_id.to_hex())).await;

        assert!(matches!(result, Err(AppError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_duplicate_apply_is_rejected() {
        let marathon_id = ObjectId::new().to_hex();
        let existing = Application::new("runner@example.com", &marathon_id, "City Run", doc! {});

        let mut applications = MockApplicationRepository::new();
        applications
            .expect_find_by_email_and_marathon()
            .returning(move |_, _| Ok(Some(existing.clone())));

        let mut marathons = MockMarathonRepository::new();
        marathons.expect_adjust_registrations().never();

        let service = ApplicationService::new(Arc::new(applications), Arc::new(marathons));
        let result = service.apply(apply_request(&marathon_id)).await;

        assert!(matches!(result, Err(AppError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_withdraw_decrements_counter() {
        let marathon = marathon();
        let marathon_id = marathon.id;
        let application = test_application("runner@example.com", &marathon);
        let application_id = application.id;

        let mut applications = MockApplicationRepository::new();
        applications
            .expect_delete()
            .with(eq(application_id))
            .returning(move |_| Ok(Some(application.clone())));

        let mut marathons = MockMarathonRepository::new();
        marathons
            .expect_adjust_registrations()
            .with(eq(marathon_id), eq(-1))
            .times(1)
            .returning(move |_, _| Ok(Some(marathon.clone())));

        let service = ApplicationService::new(Arc::new(applications), Arc::new(marathons));
        let removed = service.withdraw(&application_id.to_hex()).await.unwrap();

        assert_eq!(removed.id, application_id);
    }

    #[tokio::test]
    async fn test_withdraw_missing_application_is_not_found() {
        let mut applications = MockApplicationRepository::new();
        applications.expect_delete().returning(|_| Ok(None));

        let mut marathons = MockMarathonRepository::new();
        marathons.expect_adjust_registrations().never();

        let service = ApplicationService::new(Arc::new(applications), Arc::new(marathons));
        let result = service.withdraw(&ObjectId::new().to_hex()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_upserts() {
        let id = ObjectId::new();
        let mut applications = MockApplicationRepository::new();
        applications
            .expect_update_fields()
            .with(eq(id), eq(doc! { "phone": "017" }), eq(true))
            .returning(|_, _, _| {
                Ok(UpdateOutcome {
                    matched_count: 1,
                    modified_count: 1,
                    upserted_id: None,
                })
            });

        let mut fields = Map::new();
        fields.insert("phone".to_string(), json!("017"));

        let service = service_without_marathons(applications);
        let outcome = service
            .update(UpdateRequest {
                owner_verify: OwnerVerify {
                    id: id.to_hex(),
                    creator_email: "runner@example.com".to_string(),
                },
                fields,
            })
            .await
            .unwrap();

        assert_eq!(outcome.modified_count, 1);
    }

    #[tokio::test]
    async fn test_entries_count_sums_both_collections() {
        let mut marathons = MockMarathonRepository::new();
        marathons
            .expect_count()
            .with(eq(Some("a@x.com".to_string())))
            .returning(|_| Ok(2));

        let mut applications = MockApplicationRepository::new();
        applications.expect_count_by_email().returning(|_| Ok(3));

        let service = ApplicationService::new(Arc::new(applications), Arc::new(marathons));
        let count = service.entries_count("a@x.com").await.unwrap();

        assert_eq!(
            count,
            EntriesCount {
                marathons: 2,
                applications: 3
            }
        );
    }
}
