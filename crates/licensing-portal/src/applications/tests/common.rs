use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::applications::domain::{
    Address, Application, ApplicationDocument, ApplicationId, Documents, Education,
    EducationEntry, Experience, PersonalInfo, Reference, References, SectionKind, SectionRecord,
    Supervisor, WorkExperience,
};
use crate::applications::store::{ApplicationFilter, ApplicationStore, StoreError};
use crate::applications::{application_router, ApplicationService};

pub(super) fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

pub(super) fn personal_info() -> PersonalInfo {
    PersonalInfo {
        first_name: text("Dana"),
        last_name: text("O'Neil"),
        email: text("dana.oneil@example.com"),
        phone: text("(573) 555-0142"),
        date_of_birth: text("1988-04-17"),
        national_id: text("123-45-6789"),
        address: Some(Address {
            street: text("101 Capitol Ave"),
            city: text("Jefferson City"),
            state: text("MO"),
            zip_code: text("65101"),
            country: text("USA"),
        }),
        ..PersonalInfo::default()
    }
}

pub(super) fn education() -> Education {
    Education {
        education_entries: vec![EducationEntry {
            institution: text("University of Missouri"),
            degree: text("Bachelor of Science"),
            major: text("Civil Engineering"),
            graduation_date: text("2010-05-15"),
            gpa: Some(3.6),
        }],
        ..Education::default()
    }
}

pub(super) fn work_experience() -> WorkExperience {
    WorkExperience {
        experiences: vec![Experience {
            employer: text("Show-Me Structures, Inc."),
            position: text("Project Engineer"),
            start_date: text("2010-07-01"),
            end_date: None,
            current: true,
            responsibilities: text("Bridge inspection and load rating"),
            supervisor: Some(Supervisor {
                name: text("Lee Park"),
                phone: text("573-555-0199"),
                email: text("lee.park@example.com"),
            }),
        }],
        ..WorkExperience::default()
    }
}

pub(super) fn references() -> References {
    References {
        references: vec![Reference {
            name: text("Morgan Hale"),
            relationship: text("Former supervisor"),
            company: text("Hale & Sons"),
            phone: text("314-555-0110"),
            email: text("morgan@example.com"),
            years_known: Some(6),
        }],
        ..References::default()
    }
}

pub(super) fn documents() -> Documents {
    Documents {
        documents: vec![ApplicationDocument {
            document_type: text("transcript"),
            name: text("transcript_2010.pdf"),
            url: text("https://files.example.com/uploads/transcript.pdf"),
            ..ApplicationDocument::default()
        }],
        ..Documents::default()
    }
}

pub(super) fn build_service() -> (ApplicationService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = ApplicationService::new(store.clone());
    (service, store)
}

/// Creates a draft and saves every section for it.
pub(super) fn complete_application(service: &ApplicationService<MemoryStore>) -> Application {
    let application = service
        .create_application("user-42", "professional-engineer")
        .expect("draft created");
    let id = &application.id;
    service
        .save_section(id, personal_info())
        .expect("personal info saved");
    service.save_section(id, education()).expect("education saved");
    service
        .save_section(id, work_experience())
        .expect("work experience saved");
    service
        .save_section(id, references())
        .expect("references saved");
    service.save_section(id, documents()).expect("documents saved");
    application
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    pub(super) applications: Arc<Mutex<HashMap<ApplicationId, Application>>>,
    pub(super) sections: Arc<Mutex<HashMap<(ApplicationId, SectionKind), SectionRecord>>>,
}

impl MemoryStore {
    pub(super) fn section_count(&self) -> usize {
        self.sections.lock().expect("section mutex poisoned").len()
    }
}

impl ApplicationStore for MemoryStore {
    fn insert_application(&self, application: Application) -> Result<Application, StoreError> {
        let mut guard = self.applications.lock().expect("store mutex poisoned");
        if guard.contains_key(&application.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn update_application(&self, application: Application) -> Result<Application, StoreError> {
        let mut guard = self.applications.lock().expect("store mutex poisoned");
        match guard.get_mut(&application.id) {
            Some(slot) => {
                *slot = application.clone();
                Ok(application)
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn fetch_application(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        let guard = self.applications.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn exists(&self, id: &ApplicationId) -> Result<bool, StoreError> {
        let guard = self.applications.lock().expect("store mutex poisoned");
        Ok(guard.contains_key(id))
    }

    fn fetch_section(
        &self,
        id: &ApplicationId,
        kind: SectionKind,
    ) -> Result<Option<SectionRecord>, StoreError> {
        let guard = self.sections.lock().expect("section mutex poisoned");
        Ok(guard.get(&(id.clone(), kind)).cloned())
    }

    fn save_section(&self, record: SectionRecord) -> Result<SectionRecord, StoreError> {
        let mut guard = self.sections.lock().expect("section mutex poisoned");
        guard.insert(
            (record.application_id().clone(), record.kind()),
            record.clone(),
        );
        Ok(record)
    }

    fn list(&self, filter: &ApplicationFilter) -> Result<Vec<Application>, StoreError> {
        let guard = self.applications.lock().expect("store mutex poisoned");
        Ok(guard
            .values()
            .filter(|application| filter.matches(application))
            .cloned()
            .collect())
    }
}

pub(super) struct UnavailableStore;

impl ApplicationStore for UnavailableStore {
    fn insert_application(&self, _application: Application) -> Result<Application, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn update_application(&self, _application: Application) -> Result<Application, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn fetch_application(&self, _id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn exists(&self, _id: &ApplicationId) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn fetch_section(
        &self,
        _id: &ApplicationId,
        _kind: SectionKind,
    ) -> Result<Option<SectionRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn save_section(&self, _record: SectionRecord) -> Result<SectionRecord, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _filter: &ApplicationFilter) -> Result<Vec<Application>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(service: ApplicationService<MemoryStore>) -> axum::Router {
    application_router(Arc::new(service))
}
