use std::sync::Arc;

use async_trait::async_trait;

use super::{error::RequestFailed, resource::Resource};
use crate::models::{query::ListQuery, EntityId};

/// The four REST operations for one resource, plus the single-record fetch
/// used to open an edit form.
///
/// Implementations never retry and never interpret a failure beyond
/// reporting it.
#[async_trait]
pub trait CrudGateway<R: Resource>: Send + Sync {
    async fn list(&self, query: &ListQuery) -> Result<Vec<R>, RequestFailed>;

    async fn fetch(&self, id: EntityId) -> Result<R, RequestFailed>;

    async fn create(&self, draft: &R::Draft) -> Result<R, RequestFailed>;

    /// Full-record replace.
    async fn update(&self, id: EntityId, draft: &R::Draft) -> Result<R, RequestFailed>;

    /// Hard delete.
    async fn delete(&self, id: EntityId) -> Result<(), RequestFailed>;
}

#[async_trait]
impl<R: Resource, G: CrudGateway<R> + ?Sized> CrudGateway<R> for Box<G> {
    async fn list(&self, query: &ListQuery) -> Result<Vec<R>, RequestFailed> {
        (**self).list(query).await
    }

    async fn fetch(&self, id: EntityId) -> Result<R, RequestFailed> {
        (**self).fetch(id).await
    }

    async fn create(&self, draft: &R::Draft) -> Result<R, RequestFailed> {
        (**self).create(draft).await
    }

    async fn update(&self, id: EntityId, draft: &R::Draft) -> Result<R, RequestFailed> {
        (**self).update(id, draft).await
    }

    async fn delete(&self, id: EntityId) -> Result<(), RequestFailed> {
        (**self).delete(id).await
    }
}

#[async_trait]
impl<R: Resource, G: CrudGateway<R> + ?Sized> CrudGateway<R> for Arc<G> {
    async fn list(&self, query: &ListQuery) -> Result<Vec<R>, RequestFailed> {
        (**self).list(query).await
    }

    async fn fetch(&self, id: EntityId) -> Result<R, RequestFailed> {
        (**self).fetch(id).await
    }

    async fn create(&self, draft: &R::Draft) -> Result<R, RequestFailed> {
        (**self).create(draft).await
    }

    async fn update(&self, id: EntityId, draft: &R::Draft) -> Result<R, RequestFailed> {
        (**self).update(id, draft).await
    }

    async fn delete(&self, id: EntityId) -> Result<(), RequestFailed> {
        (**self).delete(id).await
    }
}
