use std::marker::PhantomData;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::{
    error::{Action, RequestFailed},
    gateway::CrudGateway,
    resource::Resource,
};
use crate::models::{
    auth::LoginResponse,
    query::ListQuery,
    stats::{DashboardStats, DonationStats, Report},
    EntityId,
};

/// Connection to the REST API rooted at `base_url` (e.g. `http://localhost:5000/api`).
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn gateway<R: Resource>(&self) -> HttpGateway<R> {
        HttpGateway {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            _resource: PhantomData,
        }
    }

    /// `POST /login`. A rejected login comes back as `RequestFailed` carrying
    /// the server's message.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, RequestFailed> {
        let req = self
            .client
            .post(format!("{}/login", self.base_url))
            .json(&json!({ "username": username, "password": password }));
        send_json(req, "user", Action::Login).await
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, RequestFailed> {
        let req = self.client.get(format!("{}/dashboard/stats", self.base_url));
        send_json(req, "dashboard statistics", Action::Fetch).await
    }

    pub async fn donation_stats(&self) -> Result<DonationStats, RequestFailed> {
        let req = self.client.get(format!("{}/donations/stats", self.base_url));
        send_json(req, "donation statistics", Action::Fetch).await
    }

    pub async fn report(&self) -> Result<Report, RequestFailed> {
        let req = self.client.get(format!("{}/reports", self.base_url));
        send_json(req, "reports", Action::Fetch).await
    }
}

/// Backend-backed gateway: filters travel as query parameters and the server
/// does the filtering.
pub struct HttpGateway<R> {
    client: Client,
    base_url: String,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> HttpGateway<R> {
    fn collection_url(&self) -> String {
        format!("{}/{}", self.base_url, R::PATH)
    }

    fn item_url(&self, id: EntityId) -> String {
        format!("{}/{}/{}", self.base_url, R::PATH, id)
    }
}

#[async_trait]
impl<R: Resource> CrudGateway<R> for HttpGateway<R> {
    async fn list(&self, query: &ListQuery) -> Result<Vec<R>, RequestFailed> {
        let req = self.client.get(self.collection_url()).query(&query.to_params());
        send_json(req, R::PATH, Action::List).await
    }

    async fn fetch(&self, id: EntityId) -> Result<R, RequestFailed> {
        let req = self.client.get(self.item_url(id));
        send_json(req, R::LABEL, Action::Fetch).await
    }

    async fn create(&self, draft: &R::Draft) -> Result<R, RequestFailed> {
        let req = self.client.post(self.collection_url()).json(draft);
        send_json(req, R::LABEL, Action::Create).await
    }

    async fn update(&self, id: EntityId, draft: &R::Draft) -> Result<R, RequestFailed> {
        let req = self.client.put(self.item_url(id)).json(draft);
        send_json(req, R::LABEL, Action::Update).await
    }

    async fn delete(&self, id: EntityId) -> Result<(), RequestFailed> {
        let req = self.client.delete(self.item_url(id));
        send(req, R::LABEL, Action::Delete).await.map(|_| ())
    }
}

async fn send(req: RequestBuilder, entity: &'static str, action: Action) -> Result<Response, RequestFailed> {
    let resp = req
        .send()
        .await
        .map_err(|e| RequestFailed::new(entity, action, e.to_string()))?;

    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    // Prefer the server's own message; fall back to the status line.
    let reason = resp
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| {
            body.get("error")
                .or_else(|| body.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| status.to_string());
    Err(RequestFailed::new(entity, action, reason))
}

async fn send_json<T: DeserializeOwned>(
    req: RequestBuilder,
    entity: &'static str,
    action: Action,
) -> Result<T, RequestFailed> {
    send(req, entity, action)
        .await?
        .json::<T>()
        .await
        .map_err(|e| RequestFailed::new(entity, action, format!("invalid response: {e}")))
}
