//! Adoption-request lifecycle: a fixed transition table, animal-status
//! synchronization, and an append-only activity log, all applied through a
//! single service facade.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ActivityAction, ActivityLogEntry, AdoptionRequest, AdoptionRequestId, AdoptionStatus,
    AnimalId, AnimalRecord, AnimalStatus, ProcessDecision, UserId,
};
pub use repository::{AdoptionRepository, AdoptionRequestView, RepositoryError};
pub use router::{adoption_router, Actor, ActorRole, CancelPayload, ProcessPayload, SubmitPayload};
pub use service::{AdoptionWorkflowError, AdoptionWorkflowService, ValidationError};
