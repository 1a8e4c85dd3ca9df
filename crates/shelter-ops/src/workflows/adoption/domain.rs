use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper for adoption requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdoptionRequestId(pub u64);

/// Identifier wrapper for shelter animals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimalId(pub u64);

/// Identifier wrapper for user accounts (adopters and staff alike).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

/// Lifecycle status of an adoption request.
///
/// The legal transitions form a fixed table; [`AdoptionStatus::allowed_next`]
/// is the single source of truth for it. Terminal statuses admit nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdoptionStatus {
    Pending,
    InterviewScheduled,
    Approved,
    Rejected,
    Completed,
    Cancelled,
}

impl AdoptionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AdoptionStatus::Pending => "pending",
            AdoptionStatus::InterviewScheduled => "interview_scheduled",
            AdoptionStatus::Approved => "approved",
            AdoptionStatus::Rejected => "rejected",
            AdoptionStatus::Completed => "completed",
            AdoptionStatus::Cancelled => "cancelled",
        }
    }

    /// The transition table: which statuses a request in `self` may move to.
    pub const fn allowed_next(self) -> &'static [AdoptionStatus] {
        match self {
            AdoptionStatus::Pending => &[
                AdoptionStatus::InterviewScheduled,
                AdoptionStatus::Approved,
                AdoptionStatus::Rejected,
            ],
            AdoptionStatus::InterviewScheduled => {
                &[AdoptionStatus::Approved, AdoptionStatus::Rejected]
            }
            AdoptionStatus::Approved => &[AdoptionStatus::Completed, AdoptionStatus::Cancelled],
            AdoptionStatus::Rejected | AdoptionStatus::Completed | AdoptionStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(self, next: AdoptionStatus) -> bool {
        self.allowed_next().contains(&next)
    }

    pub const fn is_terminal(self) -> bool {
        self.allowed_next().is_empty()
    }
}

impl fmt::Display for AdoptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status of an animal in the shelter's care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimalStatus {
    Available,
    Reserved,
    Adopted,
    InTreatment,
    Quarantine,
    Deceased,
    Reclaimed,
}

impl AnimalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AnimalStatus::Available => "available",
            AnimalStatus::Reserved => "reserved",
            AnimalStatus::Adopted => "adopted",
            AnimalStatus::InTreatment => "in_treatment",
            AnimalStatus::Quarantine => "quarantine",
            AnimalStatus::Deceased => "deceased",
            AnimalStatus::Reclaimed => "reclaimed",
        }
    }
}

impl fmt::Display for AnimalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One adopter's interest in one animal, tracked from submission to a
/// terminal status. Rows are never deleted; cancellation is a status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdoptionRequest {
    pub id: AdoptionRequestId,
    pub animal_id: AnimalId,
    pub adopter_id: UserId,
    pub status: AdoptionStatus,
    pub submitted_at: DateTime<Utc>,
    /// Set when (and only when) the request is moved to `InterviewScheduled`.
    pub interview_at: Option<NaiveDateTime>,
    pub comments: Option<String>,
    pub processed_by: Option<UserId>,
    pub updated_at: DateTime<Utc>,
}

/// Shelter animal snapshot as the workflow needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalRecord {
    pub id: AnimalId,
    pub name: String,
    pub species: String,
    pub status: AnimalStatus,
}

/// Staff decision applied to a pending request through the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessDecision {
    pub status: AdoptionStatus,
    pub comments: Option<String>,
    pub interview_at: Option<NaiveDateTime>,
    pub processed_by: UserId,
}

/// Kind of event recorded in the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ActivityAction {
    RequestSubmitted,
    StatusChanged {
        from: AdoptionStatus,
        to: AdoptionStatus,
    },
}

impl ActivityAction {
    pub const fn label(self) -> &'static str {
        match self {
            ActivityAction::RequestSubmitted => "adoption_request_submitted",
            ActivityAction::StatusChanged { .. } => "adoption_status_changed",
        }
    }
}

/// Append-only audit record written once per state-changing operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    pub actor: UserId,
    pub action: ActivityAction,
    pub description: String,
    pub recorded_at: DateTime<Utc>,
}

impl ActivityLogEntry {
    pub fn submitted(request: &AdoptionRequest) -> Self {
        Self {
            actor: request.adopter_id,
            action: ActivityAction::RequestSubmitted,
            description: format!(
                "adoption request #{} submitted for animal #{}",
                request.id.0, request.animal_id.0
            ),
            recorded_at: request.submitted_at,
        }
    }

    pub fn transition(request: &AdoptionRequest, from: AdoptionStatus, actor: UserId) -> Self {
        Self {
            actor,
            action: ActivityAction::StatusChanged {
                from,
                to: request.status,
            },
            description: format!(
                "adoption request #{} moved from {} to {}",
                request.id.0, from, request.status
            ),
            recorded_at: request.updated_at,
        }
    }
}
