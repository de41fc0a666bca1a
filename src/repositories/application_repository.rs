use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::Database, errors::AppResult, models::domain::Application, repositories::UpdateOutcome,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Applications made by `email`. `title_pattern` is a regex already safe
    /// to hand to the database; it is matched case-insensitively.
    async fn find_by_email(
        &self,
        email: &str,
        title_pattern: Option<String>,
    ) -> AppResult<Vec<Application>>;
    async fn find_by_email_and_marathon(
        &self,
        email: &str,
        marathon_id: &str,
    ) -> AppResult<Option<Application>>;
    async fn count_by_email(&self, email: &str) -> AppResult<u64>;
    async fn create(&self, application: Application) -> AppResult<Application>;
    async fn update_fields(
        &self,
        id: ObjectId,
        fields: Document,
        upsert: bool,
    ) -> AppResult<UpdateOutcome>;
    /// Removes the application and hands back what was removed.
    async fn delete(&self, id: ObjectId) -> AppResult<Option<Application>>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoApplicationRepository {
    collection: Collection<Application>,
}

impl MongoApplicationRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        let collection = db.get_collection(collection_name);
        Self { collection }
    }
}

fn email_filter(email: &str, title_pattern: Option<&str>) -> Document {
    let mut filter = doc! { "email": email };
    if let Some(pattern) = title_pattern {
        filter.insert("marathonTitle", doc! { "$regex": pattern, "$options": "i" });
    }
    filter
}

#[async_trait]
impl ApplicationRepository for MongoApplicationRepository {
    async fn find_by_email(
        &self,
        email: &str,
        title_pattern: Option<String>,
    ) -> AppResult<Vec<Application>> {
        let applications = self
            .collection
            .find(email_filter(email, title_pattern.as_deref()))
            .await?
            .try_collect()
            .await?;
        Ok(applications)
    }

    async fn find_by_email_and_marathon(
        &self,
        email: &str,
        marathon_id: &str,
    ) -> AppResult<Option<Application>> {
        let application = self
            .collection
            .find_one(doc! {
                "email": email,
                "marathonId": marathon_id
            })
            .await?;
        Ok(application)
    }

    async fn count_by_email(&self, email: &str) -> AppResult<u64> {
        let count = self
            .collection
            .count_documents(doc! { "email": email })
            .await?;
        Ok(count)
    }

    async fn create(&self, application: Application) -> AppResult<Application> {
        self.collection.insert_one(&application).await?;
        Ok(application)
    }

    async fn update_fields(
        &self,
        id: ObjectId,
        fields: Document,
        upsert: bool,
    ) -> AppResult<UpdateOutcome> {
        let result = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$set": fields })
            .upsert(upsert)
            .await?;
        Ok(result.into())
    }

    async fn delete(&self, id: ObjectId) -> AppResult<Option<Application>> {
        let application = self
            .collection
            .find_one_and_delete(doc! { "_id": id })
            .await?;
        Ok(application)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for applications collection");

        let email_marathon_index = IndexModel::builder()
            .keys(doc! { "email": 1, "marathonId": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("email_marathon_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(email_marathon_index).await?;

        log::info!("Successfully created indexes for applications collection");
        Ok(())
    }
}
