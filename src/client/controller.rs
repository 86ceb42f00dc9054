use tokio::time::Duration;
use tracing::{debug, error, info};

use super::{
    debounce::{Debounce, DEFAULT_SEARCH_DEBOUNCE},
    error::{ClientError, RequestFailed},
    filter,
    form::FormBuffer,
    gateway::CrudGateway,
    notify::{Notifications, DEFAULT_TOAST_TTL},
    resource::Resource,
};
use crate::models::{query::ListQuery, validation::humanize, EntityId};

/// Where search and filters are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Load everything once, filter in memory on every change.
    Local,
    /// Forward search and filters to the gateway; the visible list is
    /// whatever the gateway returned.
    Remote,
}

/// What the list shows while a load is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPolicy {
    KeepVisible,
    ClearWhileLoading,
}

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub filter_mode: FilterMode,
    pub load_policy: LoadPolicy,
    pub search_debounce: Duration,
    pub toast_ttl: Duration,
}

impl ControllerOptions {
    pub fn remote() -> Self {
        Self {
            filter_mode: FilterMode::Remote,
            load_policy: LoadPolicy::KeepVisible,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            toast_ttl: DEFAULT_TOAST_TTL,
        }
    }

    pub fn local() -> Self {
        Self {
            filter_mode: FilterMode::Local,
            ..Self::remote()
        }
    }
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self::remote()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialog {
    Closed,
    Create,
    Edit(EntityId),
}

/// Create/update lifecycle: `Idle -> Submitting -> Succeeded | Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Delete lifecycle. The target id is the only state carried between the
/// request and its confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteState {
    Idle,
    ConfirmPending(EntityId),
    Submitting(EntityId),
    Succeeded,
    Failed,
}

/// Identifies one `load()` invocation. Only the most recently issued ticket
/// may write its response into the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    seq: u64,
    query: ListQuery,
}

impl LoadTicket {
    pub fn query(&self) -> &ListQuery {
        &self.query
    }
}

/// What the table body should render.
#[derive(Debug, PartialEq)]
pub enum ListView<'a, R> {
    Loading,
    /// Replaces the table body so a failed load never looks like "no records".
    Failed(&'a str),
    Empty,
    Rows(Vec<&'a R>),
}

/// One list page: the committed collection, its loading/error state, the
/// filter inputs, the create/edit form and the delete confirmation.
///
/// The collection is only ever written by `finish_load`, so mutations are
/// reflected by a full reload rather than a local patch.
pub struct ResourceListController<R: Resource, G: CrudGateway<R>> {
    gateway: G,
    options: ControllerOptions,
    items: Vec<R>,
    loading: bool,
    error: Option<String>,
    query: ListQuery,
    form: FormBuffer,
    dialog: Dialog,
    submit: SubmitState,
    delete: DeleteState,
    issued: u64,
    search_debounce: Debounce,
    notifications: Notifications,
}

impl<R: Resource, G: CrudGateway<R>> ResourceListController<R, G> {
    pub fn new(gateway: G, options: ControllerOptions) -> Self {
        Self {
            gateway,
            search_debounce: Debounce::new(options.search_debounce),
            notifications: Notifications::new(options.toast_ttl),
            options,
            items: Vec::new(),
            loading: false,
            error: None,
            query: ListQuery::default(),
            form: R::form_defaults(),
            dialog: Dialog::Closed,
            submit: SubmitState::Idle,
            delete: DeleteState::Idle,
            issued: 0,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn form(&self) -> &FormBuffer {
        &self.form
    }

    pub fn dialog(&self) -> Dialog {
        self.dialog
    }

    pub fn submit_state(&self) -> SubmitState {
        self.submit
    }

    pub fn delete_state(&self) -> DeleteState {
        self.delete
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    /// The filtered view of the committed collection. Recomputed on every
    /// call; the collection itself is never touched.
    pub fn visible(&self) -> Vec<&R> {
        match self.options.filter_mode {
            FilterMode::Local => filter::page(filter::apply(&self.items, &self.query), &self.query),
            FilterMode::Remote => self.items.iter().collect(),
        }
    }

    pub fn view(&self) -> ListView<'_, R> {
        if let Some(err) = self.error.as_deref() {
            return ListView::Failed(err);
        }
        if self.loading && self.items.is_empty() {
            return ListView::Loading;
        }
        let rows = self.visible();
        if rows.is_empty() {
            ListView::Empty
        } else {
            ListView::Rows(rows)
        }
    }

    fn gateway_query(&self) -> ListQuery {
        match self.options.filter_mode {
            FilterMode::Local => ListQuery::default(),
            FilterMode::Remote => self.query.clone(),
        }
    }

    /// Marks a load as in flight and issues the ticket its response must
    /// present to `finish_load`.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        self.loading = true;
        if self.options.load_policy == LoadPolicy::ClearWhileLoading {
            self.items.clear();
        }
        LoadTicket {
            seq: self.issued,
            query: self.gateway_query(),
        }
    }

    /// Applies a list response. Responses to superseded tickets are dropped
    /// and `false` is returned. A failure keeps the last known collection.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<Vec<R>, RequestFailed>) -> bool {
        if ticket.seq != self.issued {
            debug!(
                "Discarding stale {} response (#{} superseded by #{})",
                R::PATH,
                ticket.seq,
                self.issued
            );
            return false;
        }

        self.loading = false;
        match result {
            Ok(items) => {
                debug!("Loaded {} {}", items.len(), R::PATH);
                self.items = items;
                self.error = None;
            }
            Err(e) => {
                error!("{}", e);
                self.notifications.error(e.to_string());
                self.error = Some(e.to_string());
            }
        }
        true
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        let ticket = self.begin_load();
        let result = self.gateway.list(ticket.query()).await;
        let outcome = result.as_ref().map(|_| ()).map_err(Clone::clone);
        self.finish_load(ticket, result);
        outcome.map_err(ClientError::from)
    }

    /// Updates the search term. In remote mode the reload is debounced; call
    /// `flush_search` to wait for it.
    pub fn set_search(&mut self, term: &str) {
        self.query.set_search(term);
        if self.options.filter_mode == FilterMode::Remote {
            self.search_debounce.schedule();
        }
    }

    pub fn search_pending(&self) -> bool {
        self.search_debounce.is_pending()
    }

    /// Waits for the search input to go quiet, then reloads once.
    pub async fn flush_search(&mut self) -> Result<(), ClientError> {
        if self.search_debounce.settled().await {
            self.load().await?;
        }
        Ok(())
    }

    /// Sets or clears (empty / "all") one categorical filter. Remote mode
    /// reloads immediately.
    pub async fn set_filter(&mut self, key: &str, value: &str) -> Result<(), ClientError> {
        self.query.set_filter(key, value);
        if self.options.filter_mode == FilterMode::Remote {
            self.load().await?;
        }
        Ok(())
    }

    pub fn set_paging(&mut self, page: Option<u32>, limit: Option<u32>) {
        self.query.page = page;
        self.query.limit = limit;
    }

    /// Replaces search, filters and paging at once without reloading. A
    /// pending debounced search is dropped; the next `load` uses `query`.
    pub fn set_query(&mut self, query: ListQuery) {
        self.query = query;
        self.search_debounce.cancel();
    }

    pub fn open_create(&mut self) {
        self.form = R::form_defaults();
        self.dialog = Dialog::Create;
        self.submit = SubmitState::Idle;
    }

    /// Opens the edit form on a copy of `record`.
    pub fn begin_edit(&mut self, record: &R) {
        self.form.load_from(&record.to_form());
        self.dialog = Dialog::Edit(record.id());
        self.submit = SubmitState::Idle;
    }

    /// Fetches the current server copy before opening the edit form.
    pub async fn open_edit(&mut self, id: EntityId) -> Result<(), ClientError> {
        match self.gateway.fetch(id).await {
            Ok(record) => {
                self.begin_edit(&record);
                Ok(())
            }
            Err(e) => {
                error!("{}", e);
                self.notifications.error(e.to_string());
                Err(e.into())
            }
        }
    }

    pub fn set_field(&mut self, field: &str, value: impl Into<String>) {
        self.form.set(field, value);
    }

    pub fn cancel(&mut self) {
        self.dialog = Dialog::Closed;
        self.form.reset();
        self.submit = SubmitState::Idle;
    }

    /// Validates the form and sends it. On success the dialog closes, the
    /// form is cleared and the list reloaded; on failure everything stays as
    /// it was so the user can correct and retry.
    pub async fn submit(&mut self) -> Result<R, ClientError> {
        let target = self.dialog;
        if target == Dialog::Closed {
            return Err(ClientError::InvalidState("No form is open"));
        }

        let draft = match R::parse_form(&self.form) {
            Ok(draft) => draft,
            Err(e) => {
                debug!("Rejected {} form: {}", R::LABEL, e);
                self.notifications.error(e.to_string());
                return Err(e.into());
            }
        };

        self.submit = SubmitState::Submitting;
        let result = match target {
            Dialog::Edit(id) => self.gateway.update(id, &draft).await,
            _ => self.gateway.create(&draft).await,
        };

        match result {
            Ok(record) => {
                self.submit = SubmitState::Succeeded;
                self.dialog = Dialog::Closed;
                self.form.reset();
                let verb = if matches!(target, Dialog::Edit(_)) { "updated" } else { "added" };
                info!("{} {} {}", R::LABEL, record.id(), verb);
                // A failed refresh is reported by load itself.
                let _ = self.load().await;
                self.notifications
                    .success(format!("{} successfully {verb}", humanize(R::LABEL)));
                Ok(record)
            }
            Err(e) => {
                self.submit = SubmitState::Failed;
                error!("{}", e);
                self.notifications.error(e.to_string());
                Err(e.into())
            }
        }
    }

    pub fn request_delete(&mut self, id: EntityId) {
        self.delete = DeleteState::ConfirmPending(id);
    }

    pub fn cancel_delete(&mut self) {
        self.delete = DeleteState::Idle;
    }

    /// Second step of a delete: acts on the id captured by `request_delete`.
    pub async fn confirm_delete(&mut self) -> Result<(), ClientError> {
        let id = match self.delete {
            DeleteState::ConfirmPending(id) => id,
            _ => return Err(ClientError::InvalidState("No delete awaiting confirmation")),
        };

        self.delete = DeleteState::Submitting(id);
        match self.gateway.delete(id).await {
            Ok(()) => {
                self.delete = DeleteState::Succeeded;
                info!("{} {} deleted", R::LABEL, id);
                let _ = self.load().await;
                self.notifications
                    .success(format!("{} successfully deleted", humanize(R::LABEL)));
                Ok(())
            }
            Err(e) => {
                self.delete = DeleteState::Failed;
                error!("{}", e);
                self.notifications.error(e.to_string());
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::client::{error::Action, memory::MemoryGateway, notify::ToastKind, sample};
    use crate::models::{
        donation::Donation,
        member::Member,
        orphan::{AdoptionStatus, Gender, Orphan, OrphanDraft},
    };

    /// Wraps a memory gateway, counting calls and failing on demand.
    struct ProbeGateway<R> {
        inner: MemoryGateway<R>,
        fail: AtomicBool,
        lists: AtomicUsize,
        writes: AtomicUsize,
        queries: Mutex<Vec<ListQuery>>,
    }

    impl<R: Resource> ProbeGateway<R> {
        fn new(records: Vec<R>) -> Self {
            Self {
                inner: MemoryGateway::new(records),
                fail: AtomicBool::new(false),
                lists: AtomicUsize::new(0),
                writes: AtomicUsize::new(0),
                queries: Mutex::new(Vec::new()),
            }
        }

        fn fail_with(&self, fail: bool) {
            self.fail.store(fail, Ordering::SeqCst);
        }

        fn check(&self, action: Action) -> Result<(), RequestFailed> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(RequestFailed::new(R::LABEL, action, "connection refused"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl<R: Resource> CrudGateway<R> for ProbeGateway<R> {
        async fn list(&self, query: &ListQuery) -> Result<Vec<R>, RequestFailed> {
            self.lists.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(query.clone());
            self.check(Action::List)?;
            self.inner.list(query).await
        }

        async fn fetch(&self, id: EntityId) -> Result<R, RequestFailed> {
            self.check(Action::Fetch)?;
            self.inner.fetch(id).await
        }

        async fn create(&self, draft: &R::Draft) -> Result<R, RequestFailed> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.check(Action::Create)?;
            self.inner.create(draft).await
        }

        async fn update(&self, id: EntityId, draft: &R::Draft) -> Result<R, RequestFailed> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.check(Action::Update)?;
            self.inner.update(id, draft).await
        }

        async fn delete(&self, id: EntityId) -> Result<(), RequestFailed> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.check(Action::Delete)?;
            self.inner.delete(id).await
        }
    }

    fn orphan(id: EntityId, name: &str) -> Orphan {
        Orphan::from_draft(
            id,
            OrphanDraft {
                name: name.to_string(),
                age: 8,
                gender: Gender::Female,
                date_joined: None,
                medical_condition: None,
                education_level: None,
                background: None,
                photo_url: None,
                status: Some(AdoptionStatus::Active),
                is_adopted: None,
            },
        )
    }

    fn fill_member(ctrl: &mut ResourceListController<Member, ProbeGateway<Member>>) {
        ctrl.set_field("name", "Lena Fischer");
        ctrl.set_field("role", "Nurse");
        ctrl.set_field("phone", "555-0199");
        ctrl.set_field("email", "lena@example.org");
    }

    #[tokio::test]
    async fn test_load_replaces_collection_and_clears_flags() {
        let mut ctrl = ResourceListController::new(
            ProbeGateway::new(sample::members()),
            ControllerOptions::local(),
        );
        assert_eq!(ctrl.view(), ListView::Empty);
        ctrl.load().await.unwrap();
        assert!(!ctrl.is_loading());
        assert_eq!(ctrl.error(), None);
        assert_eq!(ctrl.items().len(), sample::members().len());
    }

    #[tokio::test]
    async fn test_failed_load_keeps_last_collection_and_reports_once() {
        let mut ctrl = ResourceListController::new(
            ProbeGateway::new(sample::members()),
            ControllerOptions::local(),
        );
        ctrl.load().await.unwrap();
        let before = ctrl.items().to_vec();

        ctrl.gateway().fail_with(true);
        assert!(ctrl.load().await.is_err());
        assert!(!ctrl.is_loading());
        assert_eq!(ctrl.items(), &before[..]);
        assert!(matches!(ctrl.view(), ListView::Failed(_)));
        let errors = ctrl
            .notifications_mut()
            .drain()
            .into_iter()
            .filter(|t| t.kind == ToastKind::Error)
            .count();
        assert_eq!(errors, 1);

        ctrl.gateway().fail_with(false);
        ctrl.load().await.unwrap();
        assert!(matches!(ctrl.view(), ListView::Rows(_)));
    }

    #[tokio::test]
    async fn test_keep_visible_while_loading() {
        let mut ctrl = ResourceListController::new(
            ProbeGateway::new(sample::members()),
            ControllerOptions::local(),
        );
        ctrl.load().await.unwrap();
        let ticket = ctrl.begin_load();
        assert!(ctrl.is_loading());
        assert_eq!(ctrl.items().len(), sample::members().len());
        assert!(matches!(ctrl.view(), ListView::Rows(_)));
        ctrl.finish_load(ticket, Ok(Vec::new()));
        assert_eq!(ctrl.view(), ListView::Empty);
    }

    #[tokio::test]
    async fn test_clear_while_loading_policy() {
        let options = ControllerOptions {
            load_policy: LoadPolicy::ClearWhileLoading,
            ..ControllerOptions::local()
        };
        let mut ctrl = ResourceListController::new(ProbeGateway::new(sample::members()), options);
        ctrl.load().await.unwrap();
        let _ticket = ctrl.begin_load();
        assert!(ctrl.items().is_empty());
        assert_eq!(ctrl.view(), ListView::Loading);
    }

    #[tokio::test]
    async fn test_stale_load_response_is_discarded() {
        let mut ctrl = ResourceListController::new(
            ProbeGateway::new(Vec::<Orphan>::new()),
            ControllerOptions::remote(),
        );
        let first = ctrl.begin_load();
        let second = ctrl.begin_load();

        assert!(ctrl.finish_load(second, Ok(vec![orphan(1, "Sarah Johnson")])));
        assert!(!ctrl.finish_load(first, Ok(vec![orphan(2, "Michael Lee")])));

        let names: Vec<&str> = ctrl.items().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Sarah Johnson"]);
        assert!(!ctrl.is_loading());
    }

    #[tokio::test]
    async fn test_stale_failure_does_not_flag_error() {
        let mut ctrl = ResourceListController::new(
            ProbeGateway::new(Vec::<Orphan>::new()),
            ControllerOptions::remote(),
        );
        let first = ctrl.begin_load();
        let second = ctrl.begin_load();
        ctrl.finish_load(second, Ok(vec![orphan(1, "Sarah Johnson")]));
        ctrl.finish_load(first, Err(RequestFailed::new("orphans", Action::List, "timeout")));
        assert_eq!(ctrl.error(), None);
        assert_eq!(ctrl.items().len(), 1);
    }

    #[tokio::test]
    async fn test_rapid_local_searches_show_latest_term() {
        let records = vec![orphan(1, "Sarah Johnson"), orphan(2, "Michael Lee")];
        let mut ctrl = ResourceListController::new(ProbeGateway::new(records), ControllerOptions::local());
        ctrl.load().await.unwrap();

        ctrl.set_search("Sa");
        ctrl.set_search("Sar");
        let names: Vec<&str> = ctrl.visible().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Sarah Johnson"]);
        assert_eq!(ctrl.items().len(), 2);
        assert_eq!(ctrl.gateway().lists.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_remote_searches_are_debounced_into_one_load() {
        let records = vec![orphan(1, "Sarah Johnson"), orphan(2, "Michael Lee")];
        let mut ctrl = ResourceListController::new(ProbeGateway::new(records), ControllerOptions::remote());
        ctrl.load().await.unwrap();

        ctrl.set_search("Sa");
        tokio::time::advance(Duration::from_millis(200)).await;
        ctrl.set_search("Sar");
        assert!(ctrl.search_pending());
        ctrl.flush_search().await.unwrap();

        assert_eq!(ctrl.gateway().lists.load(Ordering::SeqCst), 2);
        let last = ctrl.gateway().queries.lock().unwrap().last().cloned().unwrap();
        assert_eq!(last.search_term(), Some("Sar"));
        let names: Vec<&str> = ctrl.visible().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Sarah Johnson"]);
    }

    #[tokio::test]
    async fn test_remote_filter_reloads_immediately() {
        let mut ctrl = ResourceListController::new(
            ProbeGateway::new(sample::donations()),
            ControllerOptions::remote(),
        );
        ctrl.set_filter("type", "supplies").await.unwrap();
        assert_eq!(ctrl.gateway().lists.load(Ordering::SeqCst), 1);
        assert!(ctrl
            .visible()
            .iter()
            .all(|d| d.donation_type.as_str() == "supplies"));

        ctrl.set_filter("type", "all").await.unwrap();
        assert_eq!(ctrl.items().len(), sample::donations().len());
    }

    #[tokio::test]
    async fn test_set_query_then_one_remote_load() {
        let mut ctrl = ResourceListController::new(
            ProbeGateway::new(sample::orphans()),
            ControllerOptions::remote(),
        );
        let mut query = ListQuery::default();
        query.set_search("a");
        query.set_filter("status", "active");
        query.set_filter("gender", "Female");
        ctrl.set_search("stale");
        ctrl.set_query(query.clone());
        assert!(!ctrl.search_pending());
        assert_eq!(ctrl.gateway().lists.load(Ordering::SeqCst), 0);

        ctrl.load().await.unwrap();
        assert_eq!(ctrl.gateway().lists.load(Ordering::SeqCst), 1);
        let sent = ctrl.gateway().queries.lock().unwrap().last().cloned().unwrap();
        assert_eq!(sent, query);
        assert!(ctrl
            .items()
            .iter()
            .all(|o| o.status.as_str() == "active" && o.gender.to_string() == "Female"));
    }

    #[tokio::test]
    async fn test_create_adds_exactly_one_record_and_clears_form() {
        let mut ctrl = ResourceListController::new(
            ProbeGateway::new(sample::members()),
            ControllerOptions::local(),
        );
        ctrl.load().await.unwrap();
        let before = ctrl.items().len();

        ctrl.open_create();
        fill_member(&mut ctrl);
        let created = ctrl.submit().await.unwrap();

        assert_eq!(ctrl.items().len(), before + 1);
        assert_eq!(ctrl.items().iter().filter(|m| m.id == created.id).count(), 1);
        assert!(ctrl.form().is_pristine());
        assert_eq!(ctrl.dialog(), Dialog::Closed);
        assert_eq!(ctrl.submit_state(), SubmitState::Succeeded);
        assert_eq!(ctrl.notifications().last().unwrap().kind, ToastKind::Success);
        assert_eq!(
            ctrl.notifications().last().unwrap().message,
            "Member successfully added"
        );
    }

    #[tokio::test]
    async fn test_failed_create_keeps_form_and_collection() {
        let mut ctrl = ResourceListController::new(
            ProbeGateway::new(sample::members()),
            ControllerOptions::local(),
        );
        ctrl.load().await.unwrap();
        let before = ctrl.items().to_vec();

        ctrl.open_create();
        fill_member(&mut ctrl);
        ctrl.gateway().fail_with(true);
        assert!(matches!(ctrl.submit().await, Err(ClientError::Request(_))));

        assert_eq!(ctrl.items(), &before[..]);
        assert_eq!(ctrl.form().get("name"), "Lena Fischer");
        assert_eq!(ctrl.dialog(), Dialog::Create);
        assert_eq!(ctrl.submit_state(), SubmitState::Failed);

        // retry once the backend is back
        ctrl.gateway().fail_with(false);
        ctrl.submit().await.unwrap();
        assert_eq!(ctrl.items().len(), before.len() + 1);
    }

    #[tokio::test]
    async fn test_validation_failure_issues_no_request() {
        let mut ctrl = ResourceListController::new(
            ProbeGateway::new(sample::donations()),
            ControllerOptions::local(),
        );
        ctrl.open_create();
        ctrl.set_field("donor_name", "John Smith");
        ctrl.set_field("type", "money");
        let err = ctrl.submit().await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(ref v) if v.field == "amount"));

        ctrl.set_field("type", "supplies");
        let err = ctrl.submit().await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(ref v) if v.field == "items"));

        assert_eq!(ctrl.gateway().writes.load(Ordering::SeqCst), 0);
        assert_eq!(ctrl.submit_state(), SubmitState::Idle);
        assert_eq!(ctrl.dialog(), Dialog::Create);
    }

    #[tokio::test]
    async fn test_money_donation_round_trip() {
        let mut ctrl = ResourceListController::new(
            ProbeGateway::new(Vec::<Donation>::new()),
            ControllerOptions::local(),
        );
        ctrl.open_create();
        ctrl.set_field("donor_name", "John Smith");
        ctrl.set_field("type", "money");
        ctrl.set_field("amount", "500");
        ctrl.set_field("donation_date", "2023-12-01");
        ctrl.submit().await.unwrap();

        let saved = &ctrl.items()[0];
        assert_eq!(saved.donor_name, "John Smith");
        assert_eq!(saved.amount, 500.0);
    }

    #[tokio::test]
    async fn test_edit_replaces_record() {
        let mut ctrl = ResourceListController::new(
            ProbeGateway::new(sample::members()),
            ControllerOptions::local(),
        );
        ctrl.load().await.unwrap();
        let target = ctrl.items()[1].clone();

        ctrl.open_edit(target.id).await.unwrap();
        assert_eq!(ctrl.dialog(), Dialog::Edit(target.id));
        assert_eq!(ctrl.form().get("name"), target.name);
        ctrl.set_field("role", "Head Caretaker");
        ctrl.submit().await.unwrap();

        let updated = ctrl.items().iter().find(|m| m.id == target.id).unwrap();
        assert_eq!(updated.role, "Head Caretaker");
        assert_eq!(updated.name, target.name);
        assert_eq!(ctrl.items().len(), sample::members().len());
    }

    #[tokio::test]
    async fn test_open_edit_for_missing_record_reports_failure() {
        let mut ctrl = ResourceListController::new(
            ProbeGateway::new(sample::members()),
            ControllerOptions::local(),
        );
        assert!(matches!(ctrl.open_edit(404).await, Err(ClientError::Request(_))));
        assert_eq!(ctrl.dialog(), Dialog::Closed);
        assert_eq!(ctrl.notifications().last().unwrap().kind, ToastKind::Error);
    }

    #[tokio::test]
    async fn test_cancel_discards_draft() {
        let mut ctrl = ResourceListController::new(
            ProbeGateway::new(sample::members()),
            ControllerOptions::local(),
        );
        ctrl.open_create();
        fill_member(&mut ctrl);
        ctrl.cancel();
        assert!(ctrl.form().is_pristine());
        assert_eq!(ctrl.dialog(), Dialog::Closed);
        assert!(matches!(ctrl.submit().await, Err(ClientError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation_and_removes_only_target() {
        let mut ctrl = ResourceListController::new(
            ProbeGateway::new(sample::members()),
            ControllerOptions::local(),
        );
        ctrl.load().await.unwrap();
        let ids: Vec<EntityId> = ctrl.items().iter().map(|m| m.id).collect();
        let target = ids[2];

        assert!(matches!(ctrl.confirm_delete().await, Err(ClientError::InvalidState(_))));

        ctrl.request_delete(target);
        assert_eq!(ctrl.delete_state(), DeleteState::ConfirmPending(target));
        ctrl.cancel_delete();
        assert_eq!(ctrl.delete_state(), DeleteState::Idle);
        assert_eq!(ctrl.gateway().writes.load(Ordering::SeqCst), 0);

        ctrl.request_delete(target);
        ctrl.confirm_delete().await.unwrap();
        assert_eq!(ctrl.delete_state(), DeleteState::Succeeded);

        let remaining: Vec<EntityId> = ctrl.items().iter().map(|m| m.id).collect();
        let expected: Vec<EntityId> = ids.into_iter().filter(|id| *id != target).collect();
        assert_eq!(remaining, expected);
    }

    #[tokio::test]
    async fn test_failed_delete_leaves_collection() {
        let mut ctrl = ResourceListController::new(
            ProbeGateway::new(sample::members()),
            ControllerOptions::local(),
        );
        ctrl.load().await.unwrap();
        let before = ctrl.items().to_vec();

        ctrl.gateway().fail_with(true);
        ctrl.request_delete(before[0].id);
        assert!(ctrl.confirm_delete().await.is_err());
        assert_eq!(ctrl.delete_state(), DeleteState::Failed);
        assert_eq!(ctrl.items(), &before[..]);
    }

    #[tokio::test]
    async fn test_works_behind_a_boxed_gateway() {
        let gateway: Box<dyn CrudGateway<Member>> = Box::new(MemoryGateway::new(sample::members()));
        let mut ctrl = ResourceListController::new(gateway, ControllerOptions::local());
        ctrl.load().await.unwrap();
        ctrl.set_search("teach");
        assert_eq!(ctrl.visible().len(), 1);
    }
}
