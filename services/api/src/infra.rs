use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use shelter_ops::workflows::adoption::{
    ActivityLogEntry, AdoptionRepository, AdoptionRequest, AdoptionRequestId, AdoptionStatus,
    AnimalId, AnimalRecord, AnimalStatus, RepositoryError,
};
use shelter_ops::workflows::inventory::InventoryItem;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) inventory: Arc<Vec<InventoryItem>>,
    pub(crate) expiry_window_days: u32,
}

/// Single-process store backing the service: animals, adoption requests, and
/// the activity log live behind one mutex so every commit is atomic.
#[derive(Default)]
pub(crate) struct InMemoryShelterStore {
    inner: Mutex<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    animals: HashMap<AnimalId, AnimalRecord>,
    requests: BTreeMap<AdoptionRequestId, AdoptionRequest>,
    activity: Vec<ActivityLogEntry>,
}

impl InMemoryShelterStore {
    pub(crate) fn with_animals(animals: Vec<AnimalRecord>) -> Self {
        let store = Self::default();
        {
            let mut inner = store.inner.lock().expect("store mutex poisoned");
            for animal in animals {
                inner.animals.insert(animal.id, animal);
            }
        }
        store
    }

    pub(crate) fn seeded() -> Self {
        Self::with_animals(seed_animals())
    }

    #[cfg(test)]
    pub(crate) fn animal_status(&self, id: AnimalId) -> Option<AnimalStatus> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        inner.animals.get(&id).map(|animal| animal.status)
    }
}

impl AdoptionRepository for InMemoryShelterStore {
    fn create(
        &self,
        request: AdoptionRequest,
        entry: ActivityLogEntry,
    ) -> Result<AdoptionRequest, RepositoryError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        let duplicate = inner.requests.contains_key(&request.id)
            || inner.requests.values().any(|existing| {
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
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.requests.get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<AdoptionRequest>, RepositoryError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.requests.values().cloned().collect())
    }

    fn animal(&self, id: AnimalId) -> Result<Option<AnimalRecord>, RepositoryError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.animals.get(&id).cloned())
    }

    fn open_request_for_animal(
        &self,
        animal_id: AnimalId,
    ) -> Result<Option<AdoptionRequest>, RepositoryError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
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
        let mut inner = self.inner.lock().expect("store mutex poisoned");
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
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.activity.clone())
    }
}

pub(crate) fn seed_animals() -> Vec<AnimalRecord> {
    let animals = [
        (1, "Biscuit", "dog", AnimalStatus::Available),
        (2, "Clover", "cat", AnimalStatus::Available),
        (3, "Maple", "dog", AnimalStatus::InTreatment),
        (4, "Pepper", "cat", AnimalStatus::Quarantine),
        (5, "Waffles", "rabbit", AnimalStatus::Available),
    ];
    animals
        .into_iter()
        .map(|(id, name, species, status)| AnimalRecord {
            id: AnimalId(id),
            name: name.to_string(),
            species: species.to_string(),
            status,
        })
        .collect()
}

pub(crate) fn seed_inventory() -> Vec<InventoryItem> {
    let items = [
        ("KIB-01", "Dry kibble 12kg", 4, 10, None),
        ("LIT-02", "Cat litter 10L", 18, 8, None),
        ("MED-10", "Dewormer", 30, 5, Some("2025-09-15")),
        ("MED-11", "Antibiotic ointment", 2, 6, Some("2025-07-01")),
        ("TOW-04", "Towels", 0, 12, None),
    ];
    items
        .into_iter()
        .map(|(sku, name, on_hand, reorder_level, expires_on)| InventoryItem {
            sku: sku.to_string(),
            name: name.to_string(),
            on_hand,
            reorder_level,
            expires_on: expires_on.map(|raw| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("seed dates are well formed")
            }),
        })
        .collect()
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
