use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for license applications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl ApplicationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ApplicationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Lifecycle state of an application. Serialized as the literal status strings
/// exchanged with callers (`"draft"`, `"under_review"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Draft,
    Submitted,
    UnderReview,
    Approved,
    Rejected,
    Cancelled,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::Draft,
        ApplicationStatus::Submitted,
        ApplicationStatus::UnderReview,
        ApplicationStatus::Approved,
        ApplicationStatus::Rejected,
        ApplicationStatus::Cancelled,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "draft",
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Cancelled => "cancelled",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Approved | ApplicationStatus::Rejected | ApplicationStatus::Cancelled
        )
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown application status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.label() == value)
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

/// Top-level license request record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    pub user_id: String,
    pub license_type_id: String,
    pub status: ApplicationStatus,
    pub submission_date: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub payment: Option<Payment>,
    pub review_notes: Option<ReviewNotes>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    pub fn draft(
        id: ApplicationId,
        user_id: String,
        license_type_id: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            license_type_id,
            status: ApplicationStatus::Draft,
            submission_date: None,
            expiry_date: None,
            payment: None,
            review_notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub amount: f64,
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub payment_method: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

/// Most recent reviewer decision attached to the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewNotes {
    pub date: DateTime<Utc>,
    pub reviewer: String,
    pub note: Option<String>,
    pub status: ApplicationStatus,
}

/// Fields shared by every section record. Payloads may omit all of them; the
/// service fills them in when the section is stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordEnvelope {
    pub id: String,
    pub application_id: ApplicationId,
    pub user_id: String,
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(flatten)]
    pub envelope: RecordEnvelope,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    #[serde(alias = "ssn")]
    pub national_id: Option<String>,
    pub address: Option<Address>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(flatten)]
    pub envelope: RecordEnvelope,
    #[serde(default)]
    pub education_entries: Vec<EducationEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub major: Option<String>,
    pub graduation_date: Option<String>,
    pub gpa: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    #[serde(flatten)]
    pub envelope: RecordEnvelope,
    #[serde(default)]
    pub experiences: Vec<Experience>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub employer: Option<String>,
    pub position: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default)]
    pub current: bool,
    pub responsibilities: Option<String>,
    pub supervisor: Option<Supervisor>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supervisor {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct References {
    #[serde(flatten)]
    pub envelope: RecordEnvelope,
    #[serde(default)]
    pub references: Vec<Reference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    pub name: Option<String>,
    pub relationship: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub years_known: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Documents {
    #[serde(flatten)]
    pub envelope: RecordEnvelope,
    #[serde(default)]
    pub documents: Vec<ApplicationDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDocument {
    #[serde(rename = "type")]
    pub document_type: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
    pub upload_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: DocumentReviewStatus,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentReviewStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// The five section types an application collects, in completeness order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    PersonalInfo,
    Education,
    WorkExperience,
    References,
    Documents,
}

impl SectionKind {
    pub const ALL: [SectionKind; 5] = [
        SectionKind::PersonalInfo,
        SectionKind::Education,
        SectionKind::WorkExperience,
        SectionKind::References,
        SectionKind::Documents,
    ];

    /// Human readable name used in error messages.
    pub const fn label(self) -> &'static str {
        match self {
            SectionKind::PersonalInfo => "personal information",
            SectionKind::Education => "education",
            SectionKind::WorkExperience => "work experience",
            SectionKind::References => "references",
            SectionKind::Documents => "documents",
        }
    }

    /// Path segment used by the HTTP routes.
    pub const fn slug(self) -> &'static str {
        match self {
            SectionKind::PersonalInfo => "personal-info",
            SectionKind::Education => "education",
            SectionKind::WorkExperience => "work-experience",
            SectionKind::References => "references",
            SectionKind::Documents => "documents",
        }
    }

    /// Root of the field paths reported by validation failures.
    pub const fn field(self) -> &'static str {
        match self {
            SectionKind::PersonalInfo => "personalInfo",
            SectionKind::Education => "education",
            SectionKind::WorkExperience => "workExperience",
            SectionKind::References => "references",
            SectionKind::Documents => "documents",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Any one of the five section records, as exchanged with the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionRecord {
    PersonalInfo(PersonalInfo),
    Education(Education),
    WorkExperience(WorkExperience),
    References(References),
    Documents(Documents),
}

impl SectionRecord {
    pub fn kind(&self) -> SectionKind {
        match self {
            SectionRecord::PersonalInfo(_) => SectionKind::PersonalInfo,
            SectionRecord::Education(_) => SectionKind::Education,
            SectionRecord::WorkExperience(_) => SectionKind::WorkExperience,
            SectionRecord::References(_) => SectionKind::References,
            SectionRecord::Documents(_) => SectionKind::Documents,
        }
    }

    pub fn envelope(&self) -> &RecordEnvelope {
        match self {
            SectionRecord::PersonalInfo(section) => &section.envelope,
            SectionRecord::Education(section) => &section.envelope,
            SectionRecord::WorkExperience(section) => &section.envelope,
            SectionRecord::References(section) => &section.envelope,
            SectionRecord::Documents(section) => &section.envelope,
        }
    }

    pub fn envelope_mut(&mut self) -> &mut RecordEnvelope {
        match self {
            SectionRecord::PersonalInfo(section) => &mut section.envelope,
            SectionRecord::Education(section) => &mut section.envelope,
            SectionRecord::WorkExperience(section) => &mut section.envelope,
            SectionRecord::References(section) => &mut section.envelope,
            SectionRecord::Documents(section) => &mut section.envelope,
        }
    }

    pub fn application_id(&self) -> &ApplicationId {
        &self.envelope().application_id
    }
}

/// Typed access to a section stored as a [`SectionRecord`].
pub trait Section: Clone + Send + Sync + Sized + 'static {
    const KIND: SectionKind;

    fn envelope(&self) -> &RecordEnvelope;
    fn into_record(self) -> SectionRecord;
    fn from_record(record: SectionRecord) -> Option<Self>;
}

macro_rules! impl_section {
    ($ty:ident) => {
        impl Section for $ty {
            const KIND: SectionKind = SectionKind::$ty;

            fn envelope(&self) -> &RecordEnvelope {
                &self.envelope
            }

            fn into_record(self) -> SectionRecord {
                SectionRecord::$ty(self)
            }

            fn from_record(record: SectionRecord) -> Option<Self> {
                match record {
                    SectionRecord::$ty(section) => Some(section),
                    _ => None,
                }
            }
        }
    };
}

impl_section!(PersonalInfo);
impl_section!(Education);
impl_section!(WorkExperience);
impl_section!(References);
impl_section!(Documents);
