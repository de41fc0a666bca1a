use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::{IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::AppResult,
    models::{domain::Marathon, dto::request::SortOrder},
    repositories::UpdateOutcome,
};

/// Filter, order and window for a marathon listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarathonQuery {
    pub creator_email: Option<String>,
    pub sort: Option<SortOrder>,
    pub skip: u64,
    pub limit: Option<i64>,
}

impl MarathonQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn first(limit: i64) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn created_by(email: &str) -> Self {
        Self {
            creator_email: Some(email.to_string()),
            ..Self::default()
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarathonRepository: Send + Sync {
    async fn find(&self, query: MarathonQuery) -> AppResult<Vec<Marathon>>;
    async fn count(&self, creator_email: Option<String>) -> AppResult<u64>;
    async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<Marathon>>;
    async fn create(&self, marathon: Marathon) -> AppResult<Marathon>;
    async fn update_fields(&self, id: ObjectId, fields: Document) -> AppResult<UpdateOutcome>;
    async fn delete(&self, id: ObjectId) -> AppResult<u64>;
    /// Atomically adds `delta` to `totalRegCount`, never going below zero.
    /// Returns the updated marathon, or `None` if nothing matched.
    async fn adjust_registrations(&self, id: ObjectId, delta: i32) -> AppResult<Option<Marathon>>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoMarathonRepository {
    collection: Collection<Marathon>,
}

impl MongoMarathonRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        let collection = db.get_collection(collection_name);
        Self { collection }
    }
}

fn creator_filter(creator_email: Option<&str>) -> Document {
    match creator_email {
        Some(email) => doc! { "creatorEmail": email },
        None => doc! {},
    }
}

#[async_trait]
impl MarathonRepository for MongoMarathonRepository {
    async fn find(&self, query: MarathonQuery) -> AppResult<Vec<Marathon>> {
        let filter = creator_filter(query.creator_email.as_deref());

        let mut find = self.collection.find(filter).skip(query.skip);
        if let Some(sort) = query.sort {
            find = find.sort(doc! { "createdAt": sort.direction() });
        }
        if let Some(limit) = query.limit {
            find = find.limit(limit);
        }

        let marathons: Vec<Marathon> = find.await?.try_collect().await?;
        Ok(marathons)
    }

    async fn count(&self, creator_email: Option<String>) -> AppResult<u64> {
        let count = self
            .collection
            .count_documents(creator_filter(creator_email.as_deref()))
            .await?;
        Ok(count)
    }

    async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<Marathon>> {
        let marathon = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(marathon)
    }

    async fn create(&self, marathon: Marathon) -> AppResult<Marathon> {
        self.collection.insert_one(&marathon).await?;
        Ok(marathon)
    }

    async fn update_fields(&self, id: ObjectId, fields: Document) -> AppResult<UpdateOutcome> {
        let result = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$set": fields })
            .await?;
        Ok(result.into())
    }

    async fn delete(&self, id: ObjectId) -> AppResult<u64> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count)
    }

    async fn adjust_registrations(&self, id: ObjectId, delta: i32) -> AppResult<Option<Marathon>> {
        let mut filter = doc! { "_id": id };
        if delta < 0 {
            filter.insert("totalRegCount", doc! { "$gte": -delta });
        }

        let marathon = self
            .collection
            .find_one_and_update(filter, doc! { "$inc": { "totalRegCount": delta } })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(marathon)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for marathons collection");

        let creator_index = IndexModel::builder()
            .keys(doc! { "creatorEmail": 1 })
            .options(
                IndexOptions::builder()
                    .name("creator_email".to_string())
                    .build(),
            )
            .build();

        let created_at_index = IndexModel::builder()
            .keys(doc! { "createdAt": -1 })
            .options(
                IndexOptions::builder()
                    .name("created_at".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(creator_index).await?;
        self.collection.create_index(created_at_index).await?;

        log::info!("Successfully created indexes for marathons collection");
        Ok(())
    }
}
