use std::sync::Mutex;

use async_trait::async_trait;

use super::{
    error::{Action, RequestFailed},
    filter,
    gateway::CrudGateway,
    resource::Resource,
};
use crate::models::{query::ListQuery, EntityId};

/// In-process gateway for the offline sample mode.
///
/// This is the only place a client ever assigns identities (`max(id) + 1`);
/// it must not be used once a backend is present. New records go first so
/// the list reads newest-first.
pub struct MemoryGateway<R> {
    records: Mutex<Vec<R>>,
}

impl<R: Resource> MemoryGateway<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    pub fn snapshot(&self) -> Vec<R> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<R>> {
        // Every mutation is a single step, so a poisoned Vec is still whole.
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn not_found(action: Action, id: EntityId) -> RequestFailed {
        RequestFailed::new(R::LABEL, action, format!("{} {} not found", R::LABEL, id))
    }
}

impl<R: Resource> Default for MemoryGateway<R> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl<R: Resource> CrudGateway<R> for MemoryGateway<R> {
    async fn list(&self, query: &ListQuery) -> Result<Vec<R>, RequestFailed> {
        let records = self.lock();
        let visible: Vec<R> = filter::apply(&records, query).into_iter().cloned().collect();
        Ok(filter::page(visible, query))
    }

    async fn fetch(&self, id: EntityId) -> Result<R, RequestFailed> {
        self.lock()
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or_else(|| Self::not_found(Action::Fetch, id))
    }

    async fn create(&self, draft: &R::Draft) -> Result<R, RequestFailed> {
        let mut records = self.lock();
        let id = records.iter().map(|r| r.id()).max().unwrap_or(0) + 1;
        let record = R::from_draft(id, draft.clone());
        records.insert(0, record.clone());
        Ok(record)
    }

    async fn update(&self, id: EntityId, draft: &R::Draft) -> Result<R, RequestFailed> {
        let mut records = self.lock();
        let slot = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| Self::not_found(Action::Update, id))?;
        *slot = R::from_draft(id, draft.clone());
        Ok(slot.clone())
    }

    async fn delete(&self, id: EntityId) -> Result<(), RequestFailed> {
        let mut records = self.lock();
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Err(Self::not_found(Action::Delete, id));
        }
        Ok(())
    }
}
