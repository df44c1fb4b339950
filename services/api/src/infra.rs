use licensing_portal::applications::{
    Application, ApplicationFilter, ApplicationId, ApplicationStore, SectionKind, SectionRecord,
    StoreError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

type SectionKey = (ApplicationId, SectionKind);

/// Process-local store backing the service binary and the CLI demo.
#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationStore {
    applications: Arc<Mutex<HashMap<ApplicationId, Application>>>,
    sections: Arc<Mutex<HashMap<SectionKey, SectionRecord>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex
        .lock()
        .map_err(|_| StoreError::Unavailable("in-memory store mutex poisoned".to_string()))
}

impl ApplicationStore for InMemoryApplicationStore {
    fn insert_application(&self, application: Application) -> Result<Application, StoreError> {
        let mut guard = lock(&self.applications)?;
        if guard.contains_key(&application.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn update_application(&self, application: Application) -> Result<Application, StoreError> {
        let mut guard = lock(&self.applications)?;
        match guard.get_mut(&application.id) {
            Some(slot) => {
                *slot = application.clone();
                Ok(application)
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn fetch_application(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        Ok(lock(&self.applications)?.get(id).cloned())
    }

    fn exists(&self, id: &ApplicationId) -> Result<bool, StoreError> {
        Ok(lock(&self.applications)?.contains_key(id))
    }

    fn fetch_section(
        &self,
        id: &ApplicationId,
        kind: SectionKind,
    ) -> Result<Option<SectionRecord>, StoreError> {
        Ok(lock(&self.sections)?.get(&(id.clone(), kind)).cloned())
    }

    fn save_section(&self, record: SectionRecord) -> Result<SectionRecord, StoreError> {
        let key = (record.application_id().clone(), record.kind());
        lock(&self.sections)?.insert(key, record.clone());
        Ok(record)
    }

    fn list(&self, filter: &ApplicationFilter) -> Result<Vec<Application>, StoreError> {
        Ok(lock(&self.applications)?
            .values()
            .filter(|application| filter.matches(application))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use licensing_portal::applications::{Education, Section};

    fn draft(id: &str) -> Application {
        Application::draft(
            ApplicationId::from(id),
            "user-1".to_string(),
            "architect".to_string(),
            Utc::now(),
        )
    }

    #[test]
    fn insert_rejects_duplicate_ids() {
        let store = InMemoryApplicationStore::default();
        store.insert_application(draft("app-1")).expect("first insert");
        assert!(matches!(
            store.insert_application(draft("app-1")),
            Err(StoreError::Conflict)
        ));
    }

    #[test]
    fn update_requires_an_existing_application() {
        let store = InMemoryApplicationStore::default();
        assert!(matches!(
            store.update_application(draft("app-2")),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn sections_are_keyed_by_application_and_kind() {
        let store = InMemoryApplicationStore::default();
        let id = ApplicationId::from("app-3");
        let mut education = Education::default();
        education.envelope.application_id = id.clone();

        store
            .save_section(education.clone().into_record())
            .expect("first save");
        store
            .save_section(education.into_record())
            .expect("second save");

        assert!(store
            .fetch_section(&id, SectionKind::Education)
            .expect("fetch")
            .is_some());
        assert!(store
            .fetch_section(&id, SectionKind::Documents)
            .expect("fetch")
            .is_none());
        assert_eq!(store.sections.lock().expect("lock").len(), 1);
    }
}
