use std::sync::Arc;

use crate::{
    auth::{CookiePolicy, JwtService},
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        ApplicationRepository, MarathonRepository, MongoApplicationRepository,
        MongoMarathonRepository,
    },
    services::{application_service::ApplicationService, marathon_service::MarathonService},
};

#[derive(Clone)]
pub struct AppState {
    pub marathon_service: Arc<MarathonService>,
    pub application_service: Arc<ApplicationService>,
    pub jwt_service: Arc<JwtService>,
    pub cookie_policy: CookiePolicy,
    pub config: Arc<Config>,
    /// `None` when the repositories are not backed by MongoDB (tests).
    pub db: Option<Database>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let marathon_repository = Arc::new(MongoMarathonRepository::new(
            &db,
            &config.marathons_collection,
        ));
        marathon_repository.ensure_indexes().await?;

        let application_repository = Arc::new(MongoApplicationRepository::new(
            &db,
            &config.applications_collection,
        ));
        application_repository.ensure_indexes().await?;

        Ok(Self::with_repositories(
            config,
            marathon_repository,
            application_repository,
            Some(db),
        ))
    }

    pub fn with_repositories(
        config: Config,
        marathon_repository: Arc<dyn MarathonRepository>,
        application_repository: Arc<dyn ApplicationRepository>,
        db: Option<Database>,
    ) -> Self {
        let marathon_service = Arc::new(MarathonService::new(marathon_repository.clone()));
        let application_service = Arc::new(ApplicationService::new(
            application_repository,
            marathon_repository,
        ));
        let jwt_service = Arc::new(JwtService::new(
            &config.jwt_secret,
            config.jwt_expiration_hours,
        ));
        let cookie_policy = CookiePolicy::for_environment(config.is_production());

        Self {
            marathon_service,
            application_service,
            jwt_service,
            cookie_policy,
            config: Arc::new(config),
            db,
        }
    }
}
