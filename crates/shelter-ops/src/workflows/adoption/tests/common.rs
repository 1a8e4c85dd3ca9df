use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::workflows::adoption::domain::{
    ActivityLogEntry, AdoptionRequest, AdoptionRequestId, AdoptionStatus, AnimalId, AnimalRecord,
    AnimalStatus, ProcessDecision, UserId,
};
use crate::workflows::adoption::repository::{AdoptionRepository, RepositoryError};
use crate::workflows::adoption::service::AdoptionWorkflowService;

#[derive(Default)]
pub(super) struct MemoryRepository {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    animals: HashMap<AnimalId, AnimalRecord>,
    requests: BTreeMap<AdoptionRequestId, AdoptionRequest>,
    activity: Vec<ActivityLogEntry>,
}

impl MemoryRepository {
    pub(super) fn with_animals(animals: Vec<AnimalRecord>) -> Self {
        let repository = Self::default();
        {
            let mut inner = repository.inner.lock().expect("repository mutex poisoned");
            for animal in animals {
                inner.animals.insert(animal.id, animal);
            }
        }
        repository
    }

    pub(super) fn animal_status(&self, id: AnimalId) -> Option<AnimalStatus> {
        let inner = self.inner.lock().expect("repository mutex poisoned");
        inner.animals.get(&id).map(|animal| animal.status)
    }

    pub(super) fn stored(&self, id: AdoptionRequestId) -> Option<AdoptionRequest> {
        let inner = self.inner.lock().expect("repository mutex poisoned");
        inner.requests.get(&id).cloned()
    }

    pub(super) fn activity_entries(&self) -> Vec<ActivityLogEntry> {
        let inner = self.inner.lock().expect("repository mutex poisoned");
        inner.activity.clone()
    }
}

impl AdoptionRepository for MemoryRepository {
    fn create(
        &self,
        request: AdoptionRequest,
        entry: ActivityLogEntry,
    ) -> Result<AdoptionRequest, RepositoryError> {
        let mut inner = self.inner.lock().expect("repository mutex poisoned");
        let duplicate = inner.requests.contains_key(&request.id)
            || inner
                .requests
                .values()
                .any(|existing| {
                    existing.animal_id == request.animal_id && !existing.status.is_terminal()
                });
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        inner.requests.insert(request.id, request.clone());
        inner.activity.push(entry);
        Ok(request)
    }

    fn fetch(&self, id: AdoptionRequestId) -> Result<Option<AdoptionRequest>, RepositoryError> {
        let inner = self.inner.lock().expect("repository mutex poisoned");
        Ok(inner.requests.get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<AdoptionRequest>, RepositoryError> {
        let inner = self.inner.lock().expect("repository mutex poisoned");
        Ok(inner.requests.values().cloned().collect())
    }

    fn animal(&self, id: AnimalId) -> Result<Option<AnimalRecord>, RepositoryError> {
        let inner = self.inner.lock().expect("repository mutex poisoned");
        Ok(inner.animals.get(&id).cloned())
    }

    fn open_request_for_animal(
        &self,
        animal_id: AnimalId,
    ) -> Result<Option<AdoptionRequest>, RepositoryError> {
        let inner = self.inner.lock().expect("repository mutex poisoned");
        Ok(inner
            .requests
            .values()
            .find(|request| request.animal_id == animal_id && !request.status.is_terminal())
            .cloned())
    }

    fn commit_transition(
        &self,
        request: AdoptionRequest,
        expected_from: AdoptionStatus,
        animal_status: Option<AnimalStatus>,
        entry: ActivityLogEntry,
    ) -> Result<(), RepositoryError> {
        let mut inner = self.inner.lock().expect("repository mutex poisoned");
        let stored = inner
            .requests
            .get(&request.id)
            .ok_or(RepositoryError::NotFound)?;
        if stored.status != expected_from {
            return Err(RepositoryError::Conflict);
        }
        if let Some(status) = animal_status {
            let animal = inner
                .animals
                .get_mut(&request.animal_id)
                .ok_or(RepositoryError::NotFound)?;
            animal.status = status;
        }
        inner.requests.insert(request.id, request);
        inner.activity.push(entry);
        Ok(())
    }

    fn activity(&self) -> Result<Vec<ActivityLogEntry>, RepositoryError> {
        let inner = self.inner.lock().expect("repository mutex poisoned");
        Ok(inner.activity.clone())
    }
}

/// Repository that fails every call, for surfacing persistence errors.
pub(super) struct UnavailableRepository;

impl AdoptionRepository for UnavailableRepository {
    fn create(
        &self,
        _request: AdoptionRequest,
        _entry: ActivityLogEntry,
    ) -> Result<AdoptionRequest, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn fetch(&self, _id: AdoptionRequestId) -> Result<Option<AdoptionRequest>, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn list(&self) -> Result<Vec<AdoptionRequest>, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn animal(&self, _id: AnimalId) -> Result<Option<AnimalRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn open_request_for_animal(
        &self,
        _animal_id: AnimalId,
    ) -> Result<Option<AdoptionRequest>, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn commit_transition(
        &self,
        _request: AdoptionRequest,
        _expected_from: AdoptionStatus,
        _animal_status: Option<AnimalStatus>,
        _entry: ActivityLogEntry,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn activity(&self) -> Result<Vec<ActivityLogEntry>, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }
}

pub(super) fn shelter_animals() -> Vec<AnimalRecord> {
    vec![
        AnimalRecord {
            id: AnimalId(5),
            name: "Biscuit".to_string(),
            species: "dog".to_string(),
            status: AnimalStatus::Available,
        },
        AnimalRecord {
            id: AnimalId(6),
            name: "Clover".to_string(),
            species: "cat".to_string(),
            status: AnimalStatus::InTreatment,
        },
        AnimalRecord {
            id: AnimalId(7),
            name: "Maple".to_string(),
            species: "dog".to_string(),
            status: AnimalStatus::Available,
        },
    ]
}

pub(super) fn build_service() -> (
    Arc<AdoptionWorkflowService<MemoryRepository>>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::with_animals(shelter_animals()));
    let service = Arc::new(AdoptionWorkflowService::new(repository.clone()));
    (service, repository)
}

pub(super) fn adopter() -> UserId {
    UserId(9)
}

pub(super) fn staff() -> UserId {
    UserId(42)
}

pub(super) fn interview_slot() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 10)
        .expect("valid date")
        .and_hms_opt(10, 0, 0)
        .expect("valid time")
}

pub(super) fn decision(status: AdoptionStatus) -> ProcessDecision {
    ProcessDecision {
        status,
        comments: None,
        interview_at: None,
        processed_by: staff(),
    }
}

pub(super) fn schedule_interview() -> ProcessDecision {
    ProcessDecision {
        status: AdoptionStatus::InterviewScheduled,
        comments: Some("meet and greet booked".to_string()),
        interview_at: Some(interview_slot()),
        processed_by: staff(),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body is readable");
    serde_json::from_slice(&bytes).expect("body is JSON")
}
