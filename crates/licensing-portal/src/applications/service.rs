use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::domain::{
    Application, ApplicationId, ApplicationStatus, ReviewNotes, Section, SectionKind,
    SectionRecord,
};
use super::lifecycle::{self, CompletenessReport, LifecycleError};
use super::locks::ApplicationLocks;
use super::rules::ValidationFailure;
use super::sections::validate_section;
use super::store::{ApplicationFilter, ApplicationStore, StoreError};

/// Service composing section validation, the lifecycle state machine, and the store.
///
/// Every mutation of an existing application runs under that application's lock so a
/// submit can never observe stale section data and concurrent transitions cannot race.
pub struct ApplicationService<S> {
    store: Arc<S>,
    locks: ApplicationLocks,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static SECTION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

fn next_section_id(kind: SectionKind) -> String {
    let id = SECTION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{}-{id:06}", kind.slug())
}

/// Reviewer decision payload: a target status plus who made the call and why.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDecision {
    pub status: String,
    pub reviewer: String,
    #[serde(default)]
    pub note: Option<String>,
}

/// Parses a caller-supplied status literal.
pub fn parse_status(field: &str, raw: &str) -> Result<ApplicationStatus, ValidationFailure> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationFailure::new(field, "Status is required"));
    }
    trimmed
        .parse()
        .map_err(|_| ValidationFailure::new(field, format!("Unknown application status: {trimmed}")))
}

impl<S> ApplicationService<S>
where
    S: ApplicationStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            locks: ApplicationLocks::default(),
        }
    }

    /// Open a new draft application for a user and license type.
    pub fn create_application(
        &self,
        user_id: &str,
        license_type_id: &str,
    ) -> Result<Application, ApplicationServiceError> {
        let user_id = non_blank("userId", "User id", user_id)?;
        let license_type_id = non_blank("licenseTypeId", "License type id", license_type_id)?;

        let application = Application::draft(
            next_application_id(),
            user_id.to_string(),
            license_type_id.to_string(),
            Utc::now(),
        );
        let stored = self.store.insert_application(application)?;
        info!(
            application_id = %stored.id,
            user_id = %stored.user_id,
            license_type_id = %stored.license_type_id,
            "created draft application"
        );
        Ok(stored)
    }

    /// Validate and upsert one section. Allowed in any lifecycle state so applicants can
    /// still correct a section while it is under review.
    pub fn save_section<T: Section>(
        &self,
        application_id: &ApplicationId,
        payload: T,
    ) -> Result<T, ApplicationServiceError> {
        self.locks.with_lock(application_id, || {
            let application = self.require_application(application_id)?;

            let mut record = payload.into_record();
            if let Err(failure) = validate_section(&record) {
                warn!(
                    application_id = %application_id,
                    section = %T::KIND,
                    field = %failure.field,
                    "rejected section payload"
                );
                return Err(ApplicationServiceError::from(failure));
            }

            let existing = self.store.fetch_section(application_id, T::KIND)?;
            let now = Utc::now();
            stamp_envelope(&mut record, &application, existing.as_ref(), now);

            let stored = self.store.save_section(record)?;
            info!(
                application_id = %application_id,
                section = %T::KIND,
                replaced = existing.is_some(),
                "saved application section"
            );
            T::from_record(stored).ok_or_else(|| section_mismatch(T::KIND))
        })
    }

    /// Move a complete draft to `submitted` and stamp the submission date.
    pub fn submit_application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Application, ApplicationServiceError> {
        self.locks.with_lock(application_id, || {
            let application = self.require_application(application_id)?;
            if application.status != ApplicationStatus::Draft {
                warn!(
                    application_id = %application_id,
                    status = %application.status,
                    "submit rejected for non-draft application"
                );
                return Err(ApplicationServiceError::InvalidState(format!(
                    "Application must be in draft status to submit (current status: {})",
                    application.status
                )));
            }
            self.transition(application, ApplicationStatus::Submitted, None)
        })
    }

    /// Apply a status change requested by a reviewer or administrator.
    pub fn update_status(
        &self,
        application_id: &ApplicationId,
        new_status: &str,
    ) -> Result<Application, ApplicationServiceError> {
        let target = parse_status("status", new_status)?;
        self.locks.with_lock(application_id, || {
            let application = self.require_application(application_id)?;
            self.transition(application, target, None)
        })
    }

    /// Apply a reviewer decision and keep it as the application's review notes.
    pub fn record_review(
        &self,
        application_id: &ApplicationId,
        decision: ReviewDecision,
    ) -> Result<Application, ApplicationServiceError> {
        let target = parse_status("status", &decision.status)?;
        let reviewer = non_blank("reviewer", "Reviewer", &decision.reviewer)?.to_string();
        let note = decision
            .note
            .map(|note| note.trim().to_string())
            .filter(|note| !note.is_empty());

        self.locks.with_lock(application_id, || {
            let application = self.require_application(application_id)?;
            self.transition(application, target, Some((reviewer, note)))
        })
    }

    pub fn application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Application, ApplicationServiceError> {
        self.require_application(application_id)
    }

    /// Fetch a section; `None` when it has not been saved yet.
    pub fn section<T: Section>(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Option<T>, ApplicationServiceError> {
        self.require_exists(application_id)?;
        match self.store.fetch_section(application_id, T::KIND)? {
            Some(record) => T::from_record(record)
                .map(Some)
                .ok_or_else(|| section_mismatch(T::KIND)),
            None => Ok(None),
        }
    }

    pub fn completeness(
        &self,
        application_id: &ApplicationId,
    ) -> Result<CompletenessReport, ApplicationServiceError> {
        self.require_exists(application_id)?;
        Ok(self.gather_sections(application_id)?)
    }

    /// Admin listing, newest first.
    pub fn list_applications(
        &self,
        filter: &ApplicationFilter,
    ) -> Result<Vec<Application>, ApplicationServiceError> {
        let mut applications = self.store.list(filter)?;
        applications.sort_by(|left, right| {
            right
                .created_at
                .cmp(&left.created_at)
                .then_with(|| right.id.cmp(&left.id))
        });
        Ok(applications)
    }

    fn transition(
        &self,
        mut application: Application,
        target: ApplicationStatus,
        review: Option<(String, Option<String>)>,
    ) -> Result<Application, ApplicationServiceError> {
        let from = application.status;
        let completeness = if target == ApplicationStatus::Submitted {
            self.gather_sections(&application.id)?
        } else {
            CompletenessReport {
                present: Vec::new(),
                missing: Vec::new(),
            }
        };

        let now = Utc::now();
        if let Err(error) = lifecycle::apply(&mut application, target, &completeness, now) {
            warn!(
                application_id = %application.id,
                from = %from,
                to = %target,
                %error,
                "status transition rejected"
            );
            return Err(error.into());
        }

        if let Some((reviewer, note)) = review {
            application.review_notes = Some(ReviewNotes {
                date: now,
                reviewer,
                note,
                status: target,
            });
        }

        let stored = self.store.update_application(application)?;
        info!(
            application_id = %stored.id,
            from = %from,
            to = %stored.status,
            "application status changed"
        );
        Ok(stored)
    }

    fn gather_sections(&self, application_id: &ApplicationId) -> Result<CompletenessReport, StoreError> {
        let report = CompletenessReport::gather(|kind| {
            self.store
                .fetch_section(application_id, kind)
                .map(|record| record.is_some())
        })?;
        debug!(
            application_id = %application_id,
            missing = report.missing.len(),
            "gathered application sections"
        );
        Ok(report)
    }

    fn require_application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Application, ApplicationServiceError> {
        self.store
            .fetch_application(application_id)?
            .ok_or_else(|| ApplicationServiceError::not_found(application_id))
    }

    fn require_exists(&self, application_id: &ApplicationId) -> Result<(), ApplicationServiceError> {
        if self.store.exists(application_id)? {
            Ok(())
        } else {
            Err(ApplicationServiceError::not_found(application_id))
        }
    }
}

fn non_blank<'a>(field: &str, label: &str, value: &'a str) -> Result<&'a str, ValidationFailure> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationFailure::new(field, format!("{label} is required")))
    } else {
        Ok(trimmed)
    }
}

fn section_mismatch(kind: SectionKind) -> ApplicationServiceError {
    StoreError::Corrupted(format!("store returned a different section than {kind}")).into()
}

fn stamp_envelope(
    record: &mut SectionRecord,
    application: &Application,
    existing: Option<&SectionRecord>,
    now: DateTime<Utc>,
) {
    let kind = record.kind();
    let previous = existing.map(SectionRecord::envelope);
    let envelope = record.envelope_mut();
    envelope.id = previous
        .map(|previous| previous.id.clone())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| next_section_id(kind));
    envelope.application_id = application.id.clone();
    envelope.user_id = application.user_id.clone();
    envelope.created_at = previous.and_then(|previous| previous.created_at).or(Some(now));
    envelope.updated_at = Some(now);

    if let SectionRecord::Documents(documents) = record {
        for document in &mut documents.documents {
            document.upload_date.get_or_insert(now);
        }
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("{0}")]
    InvalidState(String),
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApplicationServiceError {
    fn not_found(application_id: &ApplicationId) -> Self {
        Self::NotFound {
            entity: "Application",
            id: application_id.to_string(),
        }
    }

    /// Machine-readable tag exposed to API clients.
    pub fn code(&self) -> &'static str {
        match self {
            ApplicationServiceError::NotFound { .. } => "NOT_FOUND",
            ApplicationServiceError::InvalidState(_) => "INVALID_STATE",
            ApplicationServiceError::Validation(_) => "VALIDATION_ERROR",
            ApplicationServiceError::Store(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<LifecycleError> for ApplicationServiceError {
    fn from(error: LifecycleError) -> Self {
        match error {
            LifecycleError::InvalidTransition { .. } => Self::InvalidState(error.to_string()),
            LifecycleError::Incomplete { missing } => {
                Self::Validation(ValidationFailure::new(missing.field(), error.to_string()))
            }
        }
    }
}
