//! License application intake: per-section validation, completeness gating, and the
//! review lifecycle.

pub mod domain;
pub mod lifecycle;
mod locks;
pub mod router;
pub mod rules;
pub mod sections;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    Address, Application, ApplicationDocument, ApplicationId, ApplicationStatus, Documents,
    DocumentReviewStatus, Education, EducationEntry, Experience, Payment, PaymentStatus,
    PersonalInfo, RecordEnvelope, Reference, References, ReviewNotes, Section, SectionKind,
    SectionRecord, Supervisor, WorkExperience,
};
pub use lifecycle::{CompletenessReport, LifecycleError};
pub use router::application_router;
pub use rules::ValidationFailure;
pub use service::{ApplicationService, ApplicationServiceError, ReviewDecision};
pub use store::{ApplicationFilter, ApplicationStore, StoreError};
