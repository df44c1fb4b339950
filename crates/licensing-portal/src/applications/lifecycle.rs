//! Application lifecycle state machine.
//!
//! draft → submitted → under_review → approved | rejected, with draft → cancelled and
//! submitted → rejected as the early exits. Moving to `submitted` additionally requires
//! all five sections to be on file.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{Application, ApplicationStatus, SectionKind};

/// Allowed next states for each lifecycle state.
pub const fn allowed_transitions(from: ApplicationStatus) -> &'static [ApplicationStatus] {
    match from {
        ApplicationStatus::Draft => &[ApplicationStatus::Submitted, ApplicationStatus::Cancelled],
        ApplicationStatus::Submitted => {
            &[ApplicationStatus::UnderReview, ApplicationStatus::Rejected]
        }
        ApplicationStatus::UnderReview => {
            &[ApplicationStatus::Approved, ApplicationStatus::Rejected]
        }
        ApplicationStatus::Approved | ApplicationStatus::Rejected | ApplicationStatus::Cancelled => {
            &[]
        }
    }
}

pub fn can_transition(from: ApplicationStatus, to: ApplicationStatus) -> bool {
    allowed_transitions(from).contains(&to)
}

/// Which sections are on file for an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletenessReport {
    pub present: Vec<SectionKind>,
    pub missing: Vec<SectionKind>,
}

impl CompletenessReport {
    /// Builds the report by asking `is_present` about each section in completeness order.
    pub fn gather<E>(mut is_present: impl FnMut(SectionKind) -> Result<bool, E>) -> Result<Self, E> {
        let mut present = Vec::new();
        let mut missing = Vec::new();
        for kind in SectionKind::ALL {
            if is_present(kind)? {
                present.push(kind);
            } else {
                missing.push(kind);
            }
        }
        Ok(Self { present, missing })
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn first_missing(&self) -> Option<SectionKind> {
        self.missing.first().copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
    #[error("Application is incomplete: {} section is missing", .missing.label())]
    Incomplete { missing: SectionKind },
}

/// Checks a transition against the table and, for `submitted`, the completeness report.
pub fn transition(
    from: ApplicationStatus,
    to: ApplicationStatus,
    completeness: &CompletenessReport,
) -> Result<ApplicationStatus, LifecycleError> {
    if !can_transition(from, to) {
        return Err(LifecycleError::InvalidTransition { from, to });
    }
    if to == ApplicationStatus::Submitted {
        if let Some(missing) = completeness.first_missing() {
            return Err(LifecycleError::Incomplete { missing });
        }
    }
    Ok(to)
}

/// Moves `application` to `to`. On error the application is left untouched.
pub fn apply(
    application: &mut Application,
    to: ApplicationStatus,
    completeness: &CompletenessReport,
    now: DateTime<Utc>,
) -> Result<(), LifecycleError> {
    let next = transition(application.status, to, completeness)?;
    application.status = next;
    if next == ApplicationStatus::Submitted {
        application.submission_date = Some(now);
    }
    application.updated_at = now;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applications::domain::ApplicationId;

    fn complete() -> CompletenessReport {
        CompletenessReport {
            present: SectionKind::ALL.to_vec(),
            missing: Vec::new(),
        }
    }

    fn application(status: ApplicationStatus) -> Application {
        let mut application = Application::draft(
            ApplicationId::from("app-lifecycle"),
            "user-1".to_string(),
            "PE".to_string(),
            Utc::now(),
        );
        application.status = status;
        application
    }

    const LEGAL: [(ApplicationStatus, ApplicationStatus); 6] = [
        (ApplicationStatus::Draft, ApplicationStatus::Submitted),
        (ApplicationStatus::Draft, ApplicationStatus::Cancelled),
        (ApplicationStatus::Submitted, ApplicationStatus::UnderReview),
        (ApplicationStatus::Submitted, ApplicationStatus::Rejected),
        (ApplicationStatus::UnderReview, ApplicationStatus::Approved),
        (ApplicationStatus::UnderReview, ApplicationStatus::Rejected),
    ];

    #[test]
    fn every_state_pair_follows_the_table() {
        for from in ApplicationStatus::ALL {
            for to in ApplicationStatus::ALL {
                let mut app = application(from);
                let outcome = apply(&mut app, to, &complete(), Utc::now());
                if LEGAL.contains(&(from, to)) {
                    assert_eq!(outcome, Ok(()), "{from} -> {to} should be allowed");
                    assert_eq!(app.status, to);
                } else {
                    assert_eq!(
                        outcome,
                        Err(LifecycleError::InvalidTransition { from, to }),
                        "{from} -> {to} should be rejected"
                    );
                    assert_eq!(app.status, from);
                }
            }
        }
    }

    #[test]
    fn terminal_states_have_no_exits() {
        for status in ApplicationStatus::ALL {
            assert_eq!(allowed_transitions(status).is_empty(), status.is_terminal());
        }
    }

    #[test]
    fn submission_requires_every_section() {
        let report = CompletenessReport::gather::<()>(|kind| {
            Ok(kind != SectionKind::WorkExperience && kind != SectionKind::Documents)
        })
        .expect("gather succeeds");
        assert_eq!(report.first_missing(), Some(SectionKind::WorkExperience));

        let mut app = application(ApplicationStatus::Draft);
        let error = apply(&mut app, ApplicationStatus::Submitted, &report, Utc::now())
            .expect_err("incomplete");
        assert_eq!(
            error.to_string(),
            "Application is incomplete: work experience section is missing"
        );
        assert_eq!(app.status, ApplicationStatus::Draft);
        assert!(app.submission_date.is_none());
    }

    #[test]
    fn completeness_does_not_gate_other_transitions() {
        let empty = CompletenessReport::gather::<()>(|_| Ok(false)).expect("gather succeeds");
        let mut app = application(ApplicationStatus::Draft);
        apply(&mut app, ApplicationStatus::Cancelled, &empty, Utc::now()).expect("cancel");
        assert_eq!(app.status, ApplicationStatus::Cancelled);
    }

    #[test]
    fn submission_stamps_the_submission_date() {
        let now = Utc::now();
        let mut app = application(ApplicationStatus::Draft);
        apply(&mut app, ApplicationStatus::Submitted, &complete(), now).expect("submit");
        assert_eq!(app.submission_date, Some(now));
        assert_eq!(app.updated_at, now);
    }

    #[test]
    fn invalid_transition_names_both_states() {
        let error = transition(
            ApplicationStatus::Approved,
            ApplicationStatus::Draft,
            &complete(),
        )
        .expect_err("approved is terminal");
        assert_eq!(
            error.to_string(),
            "Invalid status transition from approved to draft"
        );
    }
}
