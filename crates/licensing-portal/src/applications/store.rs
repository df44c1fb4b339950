use super::domain::{Application, ApplicationId, ApplicationStatus, SectionKind, SectionRecord};

/// Storage abstraction so the service module can be exercised in isolation.
///
/// Sections are upserted: at most one record per (application id, section kind).
pub trait ApplicationStore: Send + Sync {
    fn insert_application(&self, application: Application) -> Result<Application, StoreError>;
    fn update_application(&self, application: Application) -> Result<Application, StoreError>;
    fn fetch_application(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError>;
    fn exists(&self, id: &ApplicationId) -> Result<bool, StoreError>;
    fn fetch_section(
        &self,
        id: &ApplicationId,
        kind: SectionKind,
    ) -> Result<Option<SectionRecord>, StoreError>;
    fn save_section(&self, record: SectionRecord) -> Result<SectionRecord, StoreError>;
    fn list(&self, filter: &ApplicationFilter) -> Result<Vec<Application>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("stored record is inconsistent: {0}")]
    Corrupted(String),
}

/// Admin listing filter; every populated field must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationFilter {
    pub status: Option<ApplicationStatus>,
    pub user_id: Option<String>,
    pub license_type_id: Option<String>,
}

impl ApplicationFilter {
    pub fn matches(&self, application: &Application) -> bool {
        self.status.map_or(true, |status| application.status == status)
            && self
                .user_id
                .as_deref()
                .map_or(true, |user_id| application.user_id == user_id)
            && self
                .license_type_id
                .as_deref()
                .map_or(true, |license_type_id| {
                    application.license_type_id == license_type_id
                })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn empty_filter_matches_everything() {
        let application = Application::draft(
            ApplicationId::from("app-1"),
            "user-1".to_string(),
            "PE".to_string(),
            Utc::now(),
        );
        assert!(ApplicationFilter::default().matches(&application));
    }

    #[test]
    fn populated_fields_must_all_match() {
        let application = Application::draft(
            ApplicationId::from("app-1"),
            "user-1".to_string(),
            "PE".to_string(),
            Utc::now(),
        );
        let filter = ApplicationFilter {
            status: Some(ApplicationStatus::Draft),
            user_id: Some("user-1".to_string()),
            license_type_id: Some("EIT".to_string()),
        };
        assert!(!filter.matches(&application));

        let filter = ApplicationFilter {
            license_type_id: Some("PE".to_string()),
            ..filter
        };
        assert!(filter.matches(&application));
    }
}
