use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

use super::domain::{
    ActivityLogEntry, AdoptionRequest, AdoptionRequestId, AdoptionStatus, AnimalId, AnimalRecord,
    AnimalStatus, UserId,
};

/// Storage abstraction for the adoption workflow.
///
/// `create` and `commit_transition` carry the activity-log entry and (for
/// transitions) the synchronized animal status so an adapter can apply all
/// writes in one critical section or database transaction. The workflow never
/// issues the three writes separately. Both mutating calls also revalidate
/// inside that critical section: the service's checks run on a snapshot, so
/// the store is the arbiter under contention.
pub trait AdoptionRepository: Send + Sync {
    /// Insert a new request. Must fail with [`RepositoryError::Conflict`]
    /// when the id is taken or another non-terminal request exists for the
    /// same animal, both checked inside the store's critical section.
    fn create(
        &self,
        request: AdoptionRequest,
        entry: ActivityLogEntry,
    ) -> Result<AdoptionRequest, RepositoryError>;

    fn fetch(&self, id: AdoptionRequestId) -> Result<Option<AdoptionRequest>, RepositoryError>;

    fn list(&self) -> Result<Vec<AdoptionRequest>, RepositoryError>;

    fn animal(&self, id: AnimalId) -> Result<Option<AnimalRecord>, RepositoryError>;

    /// The one non-terminal request for an animal, if any. Application logic
    /// keeps this at most one; the store is not expected to enforce it.
    fn open_request_for_animal(
        &self,
        animal_id: AnimalId,
    ) -> Result<Option<AdoptionRequest>, RepositoryError>;

    /// Apply a transition as a compare-and-swap: the write only lands if the
    /// stored status still equals `expected_from`; otherwise the store
    /// returns [`RepositoryError::Conflict`] and a concurrent writer won.
    fn commit_transition(
        &self,
        request: AdoptionRequest,
        expected_from: AdoptionStatus,
        animal_status: Option<AnimalStatus>,
        entry: ActivityLogEntry,
    ) -> Result<(), RepositoryError>;

    fn activity(&self) -> Result<Vec<ActivityLogEntry>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Sanitized representation of a request for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct AdoptionRequestView {
    pub id: AdoptionRequestId,
    pub animal_id: AnimalId,
    pub adopter_id: UserId,
    pub status: &'static str,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_by: Option<UserId>,
    pub updated_at: DateTime<Utc>,
}

impl AdoptionRequest {
    pub fn view(&self) -> AdoptionRequestView {
        AdoptionRequestView {
            id: self.id,
            animal_id: self.animal_id,
            adopter_id: self.adopter_id,
            status: self.status.label(),
            submitted_at: self.submitted_at,
            interview_at: self.interview_at,
            comments: self.comments.clone(),
            processed_by: self.processed_by,
            updated_at: self.updated_at,
        }
    }
}
