use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{
    ActivityLogEntry, AdoptionRequest, AdoptionRequestId, AdoptionStatus, AnimalId, AnimalStatus,
    ProcessDecision, UserId,
};
use super::repository::{AdoptionRepository, RepositoryError};

/// Service enforcing the adoption-request state machine and its side effects.
///
/// All mutations against `Adoption_Requests` flow through [`submit`] and
/// [`process`]; there is no other write path.
///
/// [`submit`]: AdoptionWorkflowService::submit
/// [`process`]: AdoptionWorkflowService::process
pub struct AdoptionWorkflowService<R> {
    repository: Arc<R>,
    sequence: AtomicU64,
}

impl<R> AdoptionWorkflowService<R>
where
    R: AdoptionRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            sequence: AtomicU64::new(1),
        }
    }

    fn next_request_id(&self) -> AdoptionRequestId {
        AdoptionRequestId(self.sequence.fetch_add(1, Ordering::Relaxed))
    }

    /// Create a new pending request for an available animal.
    pub fn submit(
        &self,
        animal_id: AnimalId,
        adopter_id: UserId,
    ) -> Result<AdoptionRequest, AdoptionWorkflowError> {
        let animal = self
            .repository
            .animal(animal_id)?
            .ok_or(AdoptionWorkflowError::AnimalNotFound)?;

        if animal.status != AnimalStatus::Available {
            return Err(ValidationError::AnimalNotAvailable {
                status: animal.status,
            }
            .into());
        }

        if self.repository.open_request_for_animal(animal_id)?.is_some() {
            return Err(ValidationError::DuplicateOpenRequest.into());
        }

        let now = Utc::now();
        let request = AdoptionRequest {
            id: self.next_request_id(),
            animal_id,
            adopter_id,
            status: AdoptionStatus::Pending,
            submitted_at: now,
            interview_at: None,
            comments: None,
            processed_by: None,
            updated_at: now,
        };

        let entry = ActivityLogEntry::submitted(&request);
        // the store revalidates open-request uniqueness under its own lock;
        // a concurrent submit for the same animal loses here
        let stored = match self.repository.create(request, entry) {
            Ok(stored) => stored,
            Err(RepositoryError::Conflict) => {
                return Err(ValidationError::DuplicateOpenRequest.into())
            }
            Err(other) => return Err(other.into()),
        };
        info!(
            request_id = stored.id.0,
            animal_id = stored.animal_id.0,
            "adoption request submitted"
        );
        Ok(stored)
    }

    /// Apply a staff decision, moving the request along the transition table
    /// and synchronizing the linked animal's status.
    ///
    /// The request write, the animal write, and the activity-log append are
    /// committed through one repository call, so a failure leaves either
    /// everything or nothing applied. The commit is conditional on the status
    /// the transition was validated against, so of two concurrent writers
    /// only one lands; the loser gets `InvalidTransition`.
    pub fn process(
        &self,
        id: AdoptionRequestId,
        decision: ProcessDecision,
    ) -> Result<AdoptionRequest, AdoptionWorkflowError> {
        let mut request = self
            .repository
            .fetch(id)?
            .ok_or(AdoptionWorkflowError::RequestNotFound)?;

        let from = request.status;
        if !from.can_transition_to(decision.status) {
            warn!(
                request_id = id.0,
                from = %from,
                to = %decision.status,
                "rejected illegal adoption transition"
            );
            return Err(AdoptionWorkflowError::InvalidTransition {
                from,
                to: decision.status,
            });
        }

        if decision.status == AdoptionStatus::InterviewScheduled && decision.interview_at.is_none()
        {
            return Err(ValidationError::MissingInterviewDate.into());
        }

        request.status = decision.status;
        if decision.status == AdoptionStatus::InterviewScheduled {
            request.interview_at = decision.interview_at;
        }
        if decision.comments.is_some() {
            request.comments = decision.comments;
        }
        request.processed_by = Some(decision.processed_by);
        request.updated_at = Utc::now();

        let animal_status = Self::synchronized_animal_status(decision.status);
        let entry = ActivityLogEntry::transition(&request, from, decision.processed_by);
        // compare-and-swap on the status read above: if a concurrent writer
        // moved the request in the meantime, the store rejects this commit
        match self
            .repository
            .commit_transition(request.clone(), from, animal_status, entry)
        {
            Ok(()) => {}
            Err(RepositoryError::Conflict) => {
                let current = self
                    .repository
                    .fetch(id)?
                    .map(|stored| stored.status)
                    .unwrap_or(from);
                warn!(
                    request_id = id.0,
                    from = %current,
                    to = %decision.status,
                    "adoption transition lost a write race"
                );
                return Err(AdoptionWorkflowError::InvalidTransition {
                    from: current,
                    to: decision.status,
                });
            }
            Err(other) => return Err(other.into()),
        }

        info!(
            request_id = request.id.0,
            from = %from,
            to = %request.status,
            "adoption request transitioned"
        );
        Ok(request)
    }

    /// Convenience wrapper equivalent to processing with target `Cancelled`.
    pub fn cancel(
        &self,
        id: AdoptionRequestId,
        staff_id: UserId,
        comments: Option<String>,
    ) -> Result<AdoptionRequest, AdoptionWorkflowError> {
        self.process(
            id,
            ProcessDecision {
                status: AdoptionStatus::Cancelled,
                comments,
                interview_at: None,
                processed_by: staff_id,
            },
        )
    }

    pub fn get(&self, id: AdoptionRequestId) -> Result<AdoptionRequest, AdoptionWorkflowError> {
        self.repository
            .fetch(id)?
            .ok_or(AdoptionWorkflowError::RequestNotFound)
    }

    pub fn list(&self) -> Result<Vec<AdoptionRequest>, AdoptionWorkflowError> {
        Ok(self.repository.list()?)
    }

    /// Animal-status side effect per transition target.
    ///
    /// Approval holds the animal, completion marks it adopted, cancellation
    /// (only legal from `Approved`) releases the hold. Rejection and interview
    /// scheduling never touch the animal because it was never held.
    fn synchronized_animal_status(target: AdoptionStatus) -> Option<AnimalStatus> {
        match target {
            AdoptionStatus::Approved => Some(AnimalStatus::Reserved),
            AdoptionStatus::Completed => Some(AnimalStatus::Adopted),
            AdoptionStatus::Cancelled => Some(AnimalStatus::Available),
            AdoptionStatus::Pending
            | AdoptionStatus::InterviewScheduled
            | AdoptionStatus::Rejected => None,
        }
    }
}

/// Input problems detected before any write happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("animal is not available for adoption (current status: {status})")]
    AnimalNotAvailable { status: AnimalStatus },
    #[error("animal already has an open adoption request")]
    DuplicateOpenRequest,
    #[error("an interview date is required to schedule an interview")]
    MissingInterviewDate,
}

/// Error raised by the adoption workflow service.
#[derive(Debug, thiserror::Error)]
pub enum AdoptionWorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("cannot move request from {from} to {to}")]
    InvalidTransition {
        from: AdoptionStatus,
        to: AdoptionStatus,
    },
    #[error("adoption request not found")]
    RequestNotFound,
    #[error("animal not found")]
    AnimalNotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
