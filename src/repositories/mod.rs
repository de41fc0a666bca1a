pub mod application_repository;
pub mod marathon_repository;

pub use application_repository::{ApplicationRepository, MongoApplicationRepository};
pub use marathon_repository::{MarathonQuery, MarathonRepository, MongoMarathonRepository};

#[cfg(test)]
pub use application_repository::MockApplicationRepository;
#[cfg(test)]
pub use marathon_repository::MockMarathonRepository;

use mongodb::{bson::Bson, results::UpdateResult};

/// Result of a `$set` update, shaped like the driver's `UpdateResult`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<String>,
}

impl From<UpdateResult> for UpdateOutcome {
    fn from(result: UpdateResult) -> Self {
        let upserted_id = result.upserted_id.map(|id| match id {
            Bson::ObjectId(oid) => oid.to_hex(),
            other => other.to_string(),
        });

        UpdateOutcome {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_id,
        }
    }
}
