#![allow(dead_code)]

use std::sync::Arc;

use actix_web::cookie::Cookie;
use async_trait::async_trait;
use mongodb::bson::{self, doc, oid::ObjectId, Bson, Document};
use regex::RegexBuilder;
use secrecy::SecretString;
use serde_json::Map;
use tokio::sync::RwLock;

use marathon_server::{
    app_state::AppState,
    auth::TOKEN_COOKIE,
    config::Config,
    errors::{AppError, AppResult},
    models::{
        domain::{Application, Marathon},
        dto::request::SignInRequest,
    },
    repositories::{ApplicationRepository, MarathonQuery, MarathonRepository, UpdateOutcome},
};

fn apply_set<T>(item: &T, fields: &Document) -> AppResult<(T, bool)>
where
    T: serde::Serialize + serde::de::DeserializeOwned,
{
    let mut document = bson::to_document(item)?;
    let before = document.clone();
    for (key, value) in fields {
        document.insert(key.clone(), value.clone());
    }
    let changed = document != before;
    Ok((bson::from_document(document)?, changed))
}

/// Keeps marathons in insertion order, which stands in for natural order.
#[derive(Default)]
pub struct InMemoryMarathonRepository {
    pub marathons: RwLock<Vec<Marathon>>,
}

impl InMemoryMarathonRepository {
    pub async fn get(&self, id: ObjectId) -> Option<Marathon> {
        self.marathons.read().await.iter().find(|m| m.id == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.marathons.read().await.len()
    }
}

#[async_trait]
impl MarathonRepository for InMemoryMarathonRepository {
    async fn find(&self, query: MarathonQuery) -> AppResult<Vec<Marathon>> {
        let marathons = self.marathons.read().await;
        let mut items: Vec<_> = marathons
            .iter()
            .filter(|m| {
                query
                    .creator_email
                    .as_ref()
                    .map(|email| &m.creator_email == email)
                    .unwrap_or(true)
            })
            .cloned()
            .collect();

        if let Some(sort) = query.sort {
            items.sort_by(|a, b| {
                if sort.direction() > 0 {
                    a.created_at.cmp(&b.created_at)
                } else {
                    b.created_at.cmp(&a.created_at)
                }
            });
        }

        let limit = query.limit.map(|l| l.max(0) as usize).unwrap_or(usize::MAX);
        Ok(items
            .into_iter()
            .skip(query.skip as usize)
            .take(limit)
            .collect())
    }

    async fn count(&self, creator_email: Option<String>) -> AppResult<u64> {
        let marathons = self.marathons.read().await;
        Ok(marathons
            .iter()
            .filter(|m| {
                creator_email
                    .as_ref()
                    .map(|email| &m.creator_email == email)
                    .unwrap_or(true)
            })
            .count() as u64)
    }

    async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<Marathon>> {
        Ok(self.get(id).await)
    }

    async fn create(&self, marathon: Marathon) -> AppResult<Marathon> {
        let mut marathons = self.marathons.write().await;
        if marathons.iter().any(|m| m.id == marathon.id) {
            return Err(AppError::AlreadyExists(format!(
                "Marathon with id '{}' already exists",
                marathon.id
            )));
        }
        marathons.push(marathon.clone());
        Ok(marathon)
    }

    async fn update_fields(&self, id: ObjectId, fields: Document) -> AppResult<UpdateOutcome> {
        let mut marathons = self.marathons.write().await;
        let Some(slot) = marathons.iter_mut().find(|m| m.id == id) else {
            return Ok(UpdateOutcome::default());
        };

        let (updated, changed) = apply_set(&*slot, &fields)?;
        *slot = updated;
        Ok(UpdateOutcome {
            matched_count: 1,
            modified_count: changed as u64,
            upserted_id: None,
        })
    }

    async fn delete(&self, id: ObjectId) -> AppResult<u64> {
        let mut marathons = self.marathons.write().await;
        let before = marathons.len();
        marathons.retain(|m| m.id != id);
        Ok((before - marathons.len()) as u64)
    }

    async fn adjust_registrations(&self, id: ObjectId, delta: i32) -> AppResult<Option<Marathon>> {
        let mut marathons = self.marathons.write().await;
        let Some(marathon) = marathons.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };
        if delta < 0 && marathon.total_reg_count < i64::from(-delta) {
            return Ok(None);
        }
        marathon.total_reg_count += i64::from(delta);
        Ok(Some(marathon.clone()))
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryApplicationRepository {
    pub applications: RwLock<Vec<Application>>,
}

impl InMemoryApplicationRepository {
    pub async fn len(&self) -> usize {
        self.applications.read().await.len()
    }

    pub async fn get(&self, id: ObjectId) -> Option<Application> {
        self.applications.read().await.iter().find(|a| a.id == id).cloned()
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryApplicationRepository {
    async fn find_by_email(
        &self,
        email: &str,
        title_pattern: Option<String>,
    ) -> AppResult<Vec<Application>> {
        let title_regex = title_pattern
            .map(|pattern| {
                RegexBuilder::new(&pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| AppError::DatabaseError(e.to_string()))
            })
            .transpose()?;

        let applications = self.applications.read().await;
        Ok(applications
            .iter()
            .filter(|a| a.email == email)
            .filter(|a| {
                title_regex
                    .as_ref()
                    .map(|re| re.is_match(&a.marathon_title))
                    .unwrap_or(true)
            })
            .cloned()
            .collect())
    }

    async fn find_by_email_and_marathon(
        &self,
        email: &str,
        marathon_id: &str,
    ) -> AppResult<Option<Application>> {
        let applications = self.applications.read().await;
        Ok(applications
            .iter()
            .find(|a| a.email == email && a.marathon_id == marathon_id)
            .cloned())
    }

    async fn count_by_email(&self, email: &str) -> AppResult<u64> {
        let applications = self.applications.read().await;
        Ok(applications.iter().filter(|a| a.email == email).count() as u64)
    }

    async fn create(&self, application: Application) -> AppResult<Application> {
        let mut applications = self.applications.write().await;
        if applications
            .iter()
            .any(|a| a.email == application.email && a.marathon_id == application.marathon_id)
        {
            return Err(AppError::AlreadyExists(format!(
                "'{}' already applied to '{}'",
                application.email, application.marathon_id
            )));
        }
        applications.push(application.clone());
        Ok(application)
    }

    async fn update_fields(
        &self,
        id: ObjectId,
        fields: Document,
        upsert: bool,
    ) -> AppResult<UpdateOutcome> {
        let mut applications = self.applications.write().await;
        if let Some(slot) = applications.iter_mut().find(|a| a.id == id) {
            let (updated, changed) = apply_set(&*slot, &fields)?;
            *slot = updated;
            return Ok(UpdateOutcome {
                matched_count: 1,
                modified_count: changed as u64,
                upserted_id: None,
            });
        }

        if !upsert {
            return Ok(UpdateOutcome::default());
        }

        let mut document = doc! { "_id": id };
        document.extend(fields);
        let application: Application = bson::from_document(document)?;
        applications.push(application);
        Ok(UpdateOutcome {
            matched_count: 0,
            modified_count: 0,
            upserted_id: Some(id.to_hex()),
        })
    }

    async fn delete(&self, id: ObjectId) -> AppResult<Option<Application>> {
        let mut applications = self.applications.write().await;
        let position = applications.iter().position(|a| a.id == id);
        Ok(position.map(|index| applications.remove(index)))
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

pub fn test_config() -> Config {
    Config {
        mongo_conn_string: "mongodb://localhost:27017".to_string(),
        mongo_db_name: "marathon-test".to_string(),
        marathons_collection: "marathons".to_string(),
        applications_collection: "applications".to_string(),
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 5000,
        jwt_secret: SecretString::from("integration_test_secret".to_string()),
        jwt_expiration_hours: 5,
        app_env: "test".to_string(),
        cors_allowed_origins: vec!["http://localhost:5173".to_string()],
    }
}

pub struct TestContext {
    pub state: AppState,
    pub marathons: Arc<InMemoryMarathonRepository>,
    pub applications: Arc<InMemoryApplicationRepository>,
}

impl TestContext {
    pub fn new() -> Self {
        let marathons = Arc::new(InMemoryMarathonRepository::default());
        let applications = Arc::new(InMemoryApplicationRepository::default());
        let state = AppState::with_repositories(
            test_config(),
            marathons.clone(),
            applications.clone(),
            None,
        );
        Self {
            state,
            marathons,
            applications,
        }
    }

    pub async fn seed_marathon(&self, marathon: Marathon) -> Marathon {
        self.marathons
            .create(marathon)
            .await
            .expect("seeding a marathon should succeed")
    }

    /// Cookie equivalent to the one `POST /jwt` would issue for `email`.
    pub fn session_cookie(&self, email: &str) -> Cookie<'static> {
        let token = self
            .state
            .jwt_service
            .create_token(SignInRequest {
                email: email.to_string(),
                profile: Map::new(),
            })
            .expect("token creation should succeed");
        Cookie::new(TOKEN_COOKIE, token)
    }
}

/// Builds the full route table over the context's in-memory state.
#[macro_export]
macro_rules! init_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($ctx.state.clone()))
                .configure(marathon_server::routes::configure),
        )
        .await
    };
}

pub fn marathon(owner: &str, title: &str) -> Marathon {
    Marathon::new(owner, title, doc! { "location": "Dhaka", "distance": Bson::from("21k") })
}
