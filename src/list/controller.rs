use crate::app_config::AppConfig;
use crate::domain::{Editable, Resource};
use crate::form::{FormDialog, ValidationError};
use crate::list::confirm::Confirm;
use crate::list::filter::{Filter, StatusFilter};
use crate::list::flash::{Flash, FlashKind};
use crate::list::row::{OpId, Row, SyncState};
use crate::remote::{Fetch, PageRequest, Persist, RemoteError, Source};
use crate::session::{Session, SessionError};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{RwLock, watch};
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub page_size: u32,
    /// How long a success or error message stays visible.
    pub message_ttl: Duration,
}

impl ListOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        ListOptions {
            page_size: config.api().page_size(),
            message_ttl: config.ui().message_ttl(),
        }
    }
}

impl Default for ListOptions {
    fn default() -> Self {
        ListOptions {
            page_size: 5,
            message_ttl: Duration::from_millis(2500),
        }
    }
}

/// Everything a list page renders.
#[derive(Debug, Clone, PartialEq)]
pub struct ListView<R> {
    /// Rows passing the current filter, in display order.
    pub rows: Vec<Row<R>>,
    /// Number of rows before filtering.
    pub total: usize,
    pub loading: bool,
    pub filter: Filter,
    pub message: Option<Flash>,
    pub dialog: Option<FormDialog<R>>,
}

impl<R: Resource> ListView<R> {
    /// Text shown instead of the table when nothing is visible.
    pub fn empty_text(&self) -> Option<String> {
        if self.loading || !self.rows.is_empty() {
            return None;
        }
        Some(format!("No {} found.", R::SCHEMA.plural))
    }
}

/// Outcome of a delete request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    Deleted,
    Declined,
    /// No record with that identifier is listed; nothing happened.
    NotFound,
}

#[derive(Debug)]
struct ListState<R> {
    rows: Vec<Row<R>>,
    loading: bool,
    loaded: bool,
    filter: Filter,
    dialog: Option<FormDialog<R>>,
    flash: Option<Flash>,
    last_op: OpId,
    in_flight: HashSet<OpId>,
    creates: HashSet<OpId>,
    last_flash: u64,
}

impl<R: Resource> ListState<R> {
    fn new() -> Self {
        ListState {
            rows: Vec::new(),
            loading: true,
            loaded: false,
            filter: Filter::default(),
            dialog: None,
            flash: None,
            last_op: 0,
            in_flight: HashSet::new(),
            creates: HashSet::new(),
            last_flash: 0,
        }
    }

    fn next_op(&mut self) -> OpId {
        self.last_op += 1;
        self.in_flight.insert(self.last_op);
        self.last_op
    }

    fn next_create(&mut self) -> OpId {
        let op = self.next_op();
        self.creates.insert(op);
        op
    }

    fn finish(&mut self, op: OpId) {
        self.in_flight.remove(&op);
        self.creates.remove(&op);
    }

    /// The row is a placeholder the backend has not stored yet.
    fn awaiting_create(&self, id: &str) -> bool {
        self.rows.iter().any(|row| match row.sync {
            SyncState::Pending(op) => row.record.id() == id && self.creates.contains(&op),
            SyncState::Confirmed => false,
        })
    }

    // A write that already answered leaves nothing to wait for
    fn settled(&self, sync: SyncState) -> SyncState {
        match sync {
            SyncState::Pending(op) if self.in_flight.contains(&op) => sync,
            _ => SyncState::Confirmed,
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.record.id() == id)
    }

    fn find(&self, id: &str) -> Option<&R> {
        self.rows.iter().map(|row| &row.record).find(|record| record.id() == id)
    }

    fn owned_position(&self, op: OpId, id: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.is_owned_by(op) && row.record.id() == id)
    }

    /// Local identifier for a record the backend has not assigned one to yet.
    fn placeholder_id(&self) -> String {
        let base = format!("{}{}", R::SCHEMA.id_prefix, Utc::now().timestamp_millis());
        if self.position(&base).is_none() {
            return base;
        }

        (1..)
            .map(|n| format!("{}-{}", base, n))
            .find(|candidate| self.position(candidate).is_none())
            .unwrap_or(base)
    }

    /// Marks the row written by `op` as confirmed, adopting the stored record when there is one.
    fn confirm(&mut self, op: OpId, id: &str, stored: Option<R>) -> bool {
        let Some(index) = self.owned_position(op, id) else {
            return false;
        };

        match stored {
            Some(record) => {
                let stored_id = record.id().to_string();
                self.rows[index] = Row::confirmed(record);
                // A reload may already have brought in the stored record
                let mut position = 0;
                self.rows.retain(|row| {
                    let keep = position == index || row.record.id() != stored_id;
                    position += 1;
                    keep
                });
            }
            None => self.rows[index].sync = SyncState::Confirmed,
        }
        true
    }

    /// Confirms a successful create. When a reload replaced the placeholder, the stored record is
    /// listed unless the reload already brought it in.
    fn complete_create(&mut self, op: OpId, placeholder: &str, stored: Option<R>) -> bool {
        if self.owned_position(op, placeholder).is_some() {
            return self.confirm(op, placeholder, stored);
        }

        if let Some(record) = stored {
            if self.position(record.id()).is_none() {
                self.rows.insert(0, Row::confirmed(record));
            }
        }
        false
    }

    /// Drops the placeholder of a failed create.
    fn discard(&mut self, op: OpId, id: &str) -> bool {
        match self.owned_position(op, id) {
            Some(index) => {
                self.rows.remove(index);
                true
            }
            None => false,
        }
    }

    /// Rolls back a failed update unless a later write took over the row.
    fn restore(&mut self, op: OpId, id: &str, previous: Row<R>) -> bool {
        match self.owned_position(op, id) {
            Some(index) => {
                let sync = self.settled(previous.sync);
                self.rows[index] = Row { sync, ..previous };
                true
            }
            None => false,
        }
    }

    /// Puts back the row of a failed delete at its former position.
    fn reinsert(&mut self, index: usize, row: Row<R>) -> bool {
        if self.position(row.record.id()).is_some() {
            return false;
        }

        let index = index.min(self.rows.len());
        let sync = self.settled(row.sync);
        self.rows.insert(index, Row { sync, ..row });
        true
    }

    fn visible(&self) -> Vec<&Row<R>> {
        self.rows.iter().filter(|row| self.filter.matches(&row.record)).collect()
    }
}

/// Keeps the listed records of one resource in sync with its backend.
///
/// Writes are applied to the list before the backend answers and marked pending. A success
/// confirms the row; a failure reverts it. Only the operation that last touched a row may
/// reconcile it, so a late answer never overwrites a newer local change.
///
/// The state lock is never held while a request is in flight.
pub struct ListController<R, S> {
    source: Arc<S>,
    session: Session,
    options: ListOptions,
    state: Arc<RwLock<ListState<R>>>,
    notifier: Arc<watch::Sender<u64>>,
}

impl<R, S> Clone for ListController<R, S> {
    fn clone(&self) -> Self {
        ListController {
            source: Arc::clone(&self.source),
            session: self.session.clone(),
            options: self.options,
            state: Arc::clone(&self.state),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

impl<R: Resource, S: Fetch<R>> ListController<R, S> {
    pub fn new(source: Arc<S>, session: Session, options: ListOptions) -> Self {
        let (notifier, _) = watch::channel(0);

        ListController {
            source,
            session,
            options,
            state: Arc::new(RwLock::new(ListState::new())),
            notifier: Arc::new(notifier),
        }
    }

    /// Receives a new version after every state change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notifier.subscribe()
    }

    async fn read<T>(&self, f: impl FnOnce(&ListState<R>) -> T) -> T {
        let guard = self.state.read().await;
        f(&guard)
    }

    async fn mutate<T>(&self, f: impl FnOnce(&mut ListState<R>) -> T) -> T {
        let result = {
            let mut guard = self.state.write().await;
            f(&mut guard)
        };
        self.notifier.send_modify(|version| *version += 1);
        result
    }

    /// Replaces the list with the first page of the backend. Failures keep the current rows.
    #[instrument(skip(self), fields(resource = R::SCHEMA.path))]
    pub async fn load(&self) {
        self.mutate(|state| state.loading = true).await;
        let token = self.session.token().await;

        info!("📋 Loading {}...", R::SCHEMA.plural);
        let result = Fetch::<R>::list(self.source.as_ref(), token.as_deref(), PageRequest::first(self.options.page_size)).await;

        match result {
            Ok(records) => {
                let count = records.len();
                self.mutate(|state| {
                    state.rows = records.into_iter().map(Row::confirmed).collect();
                    state.loading = false;
                    state.loaded = true;
                })
                .await;
                info!("📋 Loading {}... OK, {} loaded", R::SCHEMA.plural, count);
            }
            Err(e) => {
                self.mutate(|state| {
                    state.loading = false;
                    state.loaded = true;
                })
                .await;
                warn!("⚠️ Loading {}... failed, {}", R::SCHEMA.plural, e);
            }
        }
    }

    /// Loads unless a load already ran.
    pub async fn ensure_loaded(&self) {
        if !self.read(|state| state.loaded).await {
            self.load().await;
        }
    }

    pub async fn view(&self) -> ListView<R> {
        self.read(|state| ListView {
            rows: state.visible().into_iter().cloned().collect(),
            total: state.rows.len(),
            loading: state.loading,
            filter: state.filter.clone(),
            message: state.flash.clone(),
            dialog: state.dialog.clone(),
        })
        .await
    }

    pub async fn rows(&self) -> Vec<Row<R>> {
        self.read(|state| state.rows.clone()).await
    }

    pub async fn records(&self) -> Vec<R> {
        self.read(|state| state.rows.iter().map(|row| row.record.clone()).collect()).await
    }

    /// Records passing the current filter, in display order.
    pub async fn visible(&self) -> Vec<R> {
        self.read(|state| state.visible().into_iter().map(|row| row.record.clone()).collect())
            .await
    }

    pub async fn is_loading(&self) -> bool {
        self.read(|state| state.loading).await
    }

    pub async fn message(&self) -> Option<Flash> {
        self.read(|state| state.flash.clone()).await
    }

    pub async fn filter(&self) -> Filter {
        self.read(|state| state.filter.clone()).await
    }

    pub async fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.mutate(|state| state.filter.query = query).await;
    }

    pub async fn set_status_filter(&self, status: StatusFilter) {
        self.mutate(|state| state.filter.status = status).await;
    }

    /// Shows `text` until the message TTL passes or another message replaces it.
    async fn flash(&self, kind: FlashKind, text: String) {
        let serial = self
            .mutate(|state| {
                state.last_flash += 1;
                state.flash = Some(Flash {
                    kind,
                    text,
                    serial: state.last_flash,
                });
                state.last_flash
            })
            .await;

        let state = Arc::clone(&self.state);
        let notifier = Arc::clone(&self.notifier);
        let ttl = self.options.message_ttl;
        tokio::spawn(async move {
            sleep(ttl).await;
            let mut guard = state.write().await;
            if guard.flash.as_ref().is_some_and(|flash| flash.serial == serial) {
                guard.flash = None;
                drop(guard);
                notifier.send_modify(|version| *version += 1);
            }
        });
    }
}

impl<R: Editable, S: Source<R>> ListController<R, S> {
    async fn write_token(&self) -> Result<String, ListError> {
        match self.session.bearer().await {
            Ok(token) => Ok(token),
            Err(e) => {
                warn!(resource = R::SCHEMA.path, "🔒 Blocked change to {}: {}", R::SCHEMA.plural, e);
                self.flash(FlashKind::Error, format!("Sign in to change {}.", R::SCHEMA.plural)).await;
                Err(ListError::SignInRequired(e))
            }
        }
    }

    // Placeholders have no backend id to address yet
    async fn refuse_unsaved(&self, id: &str) -> Result<(), ListError> {
        if !self.read(|state| state.awaiting_create(id)).await {
            return Ok(());
        }

        warn!(resource = R::SCHEMA.path, "⚠️ {} {} is still being created", R::SCHEMA.label, id);
        self.flash(FlashKind::Error, format!("Wait until the {} is saved.", R::SCHEMA.noun())).await;
        Err(ListError::Unsaved {
            resource: R::SCHEMA.noun(),
            id: id.to_string(),
        })
    }

    pub async fn open_create(&self) {
        self.mutate(|state| state.dialog = Some(FormDialog::new(None))).await;
    }

    pub async fn open_edit(&self, id: &str) -> Result<(), ListError> {
        self.refuse_unsaved(id).await?;
        self.mutate(|state| {
            let record = state.find(id).cloned().ok_or_else(|| ListError::not_found::<R>(id))?;
            state.dialog = Some(FormDialog::new(Some(record)));
            Ok(())
        })
        .await
    }

    pub async fn set_field(&self, field: &str, value: impl Into<String>) -> Result<(), ListError> {
        let value = value.into();
        self.mutate(|state| {
            let dialog = state.dialog.as_mut().ok_or(ListError::NoDialog)?;
            dialog.set(field, value);
            Ok(())
        })
        .await
    }

    pub async fn dialog(&self) -> Option<FormDialog<R>> {
        self.read(|state| state.dialog.clone()).await
    }

    pub async fn cancel_dialog(&self) {
        self.mutate(|state| state.dialog = None).await;
    }

    /// Validates the open form and hands the payload to [`Self::create`] or [`Self::update`].
    ///
    /// The form stays open when the input is invalid or nobody is signed in. Validation and
    /// closing happen under one lock, so only the validated form is closed.
    #[instrument(skip(self), fields(resource = R::SCHEMA.path))]
    pub async fn submit_dialog(&self) -> Result<(), ListError> {
        if self.read(|state| state.dialog.is_none()).await {
            return Err(ListError::NoDialog);
        }

        let token = self.write_token().await?;
        let (editing, payload) = self
            .mutate(|state| {
                let dialog = state.dialog.as_mut().ok_or(ListError::NoDialog)?;
                let payload = dialog.submit()?;
                let editing = dialog.initial().map(|record| record.id().to_string());
                state.dialog = None;
                Ok::<_, ListError>((editing, payload))
            })
            .await?;

        match editing {
            Some(id) => self.update_with(&token, &id, payload).await,
            None => self.create_with(&token, payload).await,
        }
    }

    #[instrument(skip_all, fields(resource = R::SCHEMA.path))]
    pub async fn create(&self, payload: R::Payload) -> Result<(), ListError> {
        let token = self.write_token().await?;
        self.create_with(&token, payload).await
    }

    async fn create_with(&self, token: &str, payload: R::Payload) -> Result<(), ListError> {
        let (op, placeholder) = self
            .mutate(|state| {
                let op = state.next_create();
                let id = state.placeholder_id();
                state.rows.insert(0, Row::pending(R::from_payload(id.clone(), payload.clone()), op));
                (op, id)
            })
            .await;

        info!(op, "➕ Creating {} {}...", R::SCHEMA.noun(), placeholder);
        match Persist::<R>::create(self.source.as_ref(), token, &payload).await {
            Ok(stored) => {
                let confirmed = self
                    .mutate(|state| {
                        state.finish(op);
                        state.complete_create(op, &placeholder, stored)
                    })
                    .await;
                if !confirmed {
                    warn!(op, "⚠️ Placeholder {} was replaced by a reload, listing the stored {}", placeholder, R::SCHEMA.noun());
                }
                info!(op, "➕ Creating {} {}... OK", R::SCHEMA.noun(), placeholder);
                self.flash(FlashKind::Success, format!("{} created.", R::SCHEMA.label)).await;
                Ok(())
            }
            Err(e) => {
                self.mutate(|state| {
                    state.finish(op);
                    state.discard(op, &placeholder)
                })
                .await;
                warn!(op, "⚠️ Creating {} {}... failed, {}", R::SCHEMA.noun(), placeholder, e);
                self.flash(FlashKind::Error, format!("Could not create {}: {}", R::SCHEMA.noun(), e)).await;
                Err(ListError::Remote(e))
            }
        }
    }

    #[instrument(skip(self, payload), fields(resource = R::SCHEMA.path))]
    pub async fn update(&self, id: &str, payload: R::Payload) -> Result<(), ListError> {
        let token = self.write_token().await?;
        self.update_with(&token, id, payload).await
    }

    async fn update_with(&self, token: &str, id: &str, payload: R::Payload) -> Result<(), ListError> {
        self.refuse_unsaved(id).await?;
        let applied = self
            .mutate(|state| {
                let index = state.position(id)?;
                let op = state.next_op();
                let row = &mut state.rows[index];
                let previous = row.clone();
                row.record.apply(&payload);
                row.sync = SyncState::Pending(op);
                Some((op, previous))
            })
            .await;

        let Some((op, previous)) = applied else {
            warn!("⚠️ Cannot update unknown {} '{}'", R::SCHEMA.noun(), id);
            return Err(ListError::not_found::<R>(id));
        };

        info!(op, "✏️ Updating {} {}...", R::SCHEMA.noun(), id);
        match Persist::<R>::update(self.source.as_ref(), token, id, &payload).await {
            Ok(stored) => {
                let confirmed = self
                    .mutate(|state| {
                        state.finish(op);
                        state.confirm(op, id, stored)
                    })
                    .await;
                if !confirmed {
                    debug!(op, "✏️ {} {} was changed again, leaving it pending", R::SCHEMA.label, id);
                }
                info!(op, "✏️ Updating {} {}... OK", R::SCHEMA.noun(), id);
                self.flash(FlashKind::Success, format!("{} updated.", R::SCHEMA.label)).await;
                Ok(())
            }
            Err(e) => {
                let restored = self
                    .mutate(|state| {
                        state.finish(op);
                        state.restore(op, id, previous)
                    })
                    .await;
                if !restored {
                    debug!(op, "✏️ {} {} was changed again, not reverting", R::SCHEMA.label, id);
                }
                warn!(op, "⚠️ Updating {} {}... failed, {}", R::SCHEMA.noun(), id, e);
                self.flash(FlashKind::Error, format!("Could not update {}: {}", R::SCHEMA.noun(), e)).await;
                Err(ListError::Remote(e))
            }
        }
    }

    /// Deletes after `confirm` approves a prompt naming the record.
    #[instrument(skip(self, confirm), fields(resource = R::SCHEMA.path))]
    pub async fn delete(&self, id: &str, confirm: &impl Confirm) -> Result<Deletion, ListError> {
        let Some(record) = self.read(|state| state.find(id).cloned()).await else {
            debug!("🗑️ No {} '{}' to delete", R::SCHEMA.noun(), id);
            return Ok(Deletion::NotFound);
        };
        self.refuse_unsaved(id).await?;

        let prompt = format!("Delete {} {}?", R::SCHEMA.noun(), record.describe());
        if !confirm.confirm(&prompt) {
            debug!("🗑️ Deleting {} {}... declined", R::SCHEMA.noun(), id);
            return Ok(Deletion::Declined);
        }

        let token = self.write_token().await?;
        let removed = self
            .mutate(|state| {
                let index = state.position(id)?;
                Some((index, state.rows.remove(index)))
            })
            .await;
        let Some((index, row)) = removed else {
            return Ok(Deletion::NotFound);
        };

        info!("🗑️ Deleting {} {}...", R::SCHEMA.noun(), id);
        match Persist::<R>::delete(self.source.as_ref(), &token, id).await {
            Ok(()) => {
                info!("🗑️ Deleting {} {}... OK", R::SCHEMA.noun(), id);
                self.flash(FlashKind::Success, format!("{} deleted.", R::SCHEMA.label)).await;
                Ok(Deletion::Deleted)
            }
            Err(e) => {
                self.mutate(|state| state.reinsert(index, row)).await;
                warn!("⚠️ Deleting {} {}... failed, {}", R::SCHEMA.noun(), id, e);
                self.flash(FlashKind::Error, format!("Could not delete {}: {}", R::SCHEMA.noun(), e)).await;
                Err(ListError::Remote(e))
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum ListError {
    #[error("{0}")]
    Invalid(#[from] ValidationError),
    #[error("sign in required: {0}")]
    SignInRequired(SessionError),
    #[error("no {resource} with id '{id}'")]
    NotFound { resource: String, id: String },
    #[error("the {resource} '{id}' is still being created")]
    Unsaved { resource: String, id: String },
    #[error("no form is open")]
    NoDialog,
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl ListError {
    fn not_found<R: Resource>(id: &str) -> Self {
        ListError::NotFound {
            resource: R::SCHEMA.noun(),
            id: id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_config::AppConfigBuilder;
    use crate::domain::{Aviary, AviaryPayload, Person, Reading};
    use crate::remote::{FixtureSource, RemoteClient};
    use crate::session::Credentials;
    use mockito::{Matcher, Mock, ServerGuard};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;
    use test_log::test;

    const DELAY: Duration = Duration::from_millis(100);

    async fn signed_in() -> Session {
        let session = Session::new();
        session.sign_in(Credentials::bearer("token")).await.unwrap();
        session
    }

    async fn fixture_controller<R: Resource>(delay: Duration, session: Session) -> ListController<R, FixtureSource> {
        let controller = ListController::new(Arc::new(FixtureSource::seeded(delay)), session, ListOptions::default());
        controller.load().await;
        controller
    }

    async fn mock_list(server: &mut ServerGuard, status: usize) -> Mock {
        server
            .mock("GET", "/aviarios")
            .match_query(Matcher::Any)
            .with_status(status)
            .with_body(include_str!("../../tests/resources/aviaries_page.json"))
            .create_async()
            .await
    }

    fn remote_controller(server: &ServerGuard, session: Session) -> ListController<Aviary, RemoteClient> {
        let client = RemoteClient::new(&AppConfigBuilder::new().management_url(server.url()).build()).unwrap();
        ListController::new(Arc::new(client), session, ListOptions::default())
    }

    fn ids<R: Resource>(records: &[R]) -> Vec<&str> {
        records.iter().map(|record| record.id()).collect()
    }

    fn new_aviary() -> AviaryPayload {
        AviaryPayload {
            nome: "Aviário Novo".to_string(),
            capacidade_maxima: 800.0,
            localizacao: "Setor Oeste".to_string(),
            ativo: true,
        }
    }

    fn renamed(nome: &str) -> AviaryPayload {
        AviaryPayload {
            nome: nome.to_string(),
            capacidade_maxima: 5000.0,
            localizacao: "Setor Norte".to_string(),
            ativo: true,
        }
    }

    #[test(tokio::test)]
    async fn starts_loading_and_lists_the_first_page() {
        let controller = ListController::<Aviary, _>::new(
            Arc::new(FixtureSource::seeded(Duration::ZERO)),
            Session::new(),
            ListOptions::default(),
        );
        assert!(controller.is_loading().await);

        controller.load().await;

        assert!(!controller.is_loading().await);
        assert_eq!(ids(&controller.records().await), vec!["A1", "A2", "A3"]);
    }

    #[test(tokio::test)]
    async fn reads_do_not_require_a_session() {
        let mut server = mockito::Server::new_async().await;
        let list = server
            .mock("GET", "/aviarios")
            .match_query(Matcher::Any)
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body(include_str!("../../tests/resources/aviaries_page.json"))
            .create_async()
            .await;
        let controller = remote_controller(&server, Session::new());

        controller.load().await;

        list.assert_async().await;
        assert_eq!(controller.records().await.len(), 3);
    }

    #[test(tokio::test)]
    async fn a_failed_load_keeps_the_current_rows() {
        let mut server = mockito::Server::new_async().await;
        let list = mock_list(&mut server, 200).await;
        let controller = remote_controller(&server, signed_in().await);
        controller.load().await;
        list.remove_async().await;
        let _failing = mock_list(&mut server, 503).await;

        controller.load().await;

        assert!(!controller.is_loading().await);
        assert_eq!(ids(&controller.records().await), vec!["A1", "A2", "A3"]);
        assert_eq!(controller.message().await, None);
    }

    #[test(tokio::test)]
    async fn filters_on_query_and_status() {
        let controller = fixture_controller::<Aviary>(Duration::ZERO, Session::new()).await;

        controller.set_query("norte").await;
        controller.set_status_filter(StatusFilter::Active).await;

        assert_eq!(ids(&controller.visible().await), vec!["A1"]);
        let view = controller.view().await;
        assert_eq!(view.total, 3);
        assert_eq!(view.empty_text(), None);
    }

    #[test(tokio::test)]
    async fn an_empty_result_explains_itself() {
        let controller = fixture_controller::<Aviary>(Duration::ZERO, Session::new()).await;

        controller.set_query("nothing like this").await;

        assert_eq!(controller.view().await.empty_text(), Some("No aviaries found.".to_string()));
    }

    #[test(tokio::test)]
    async fn resources_without_status_ignore_the_status_filter() {
        let controller = fixture_controller::<Person>(Duration::ZERO, Session::new()).await;

        controller.set_status_filter(StatusFilter::Inactive).await;

        assert_eq!(controller.visible().await.len(), 3);
    }

    #[test(tokio::test)]
    async fn read_only_resources_can_be_listed() {
        let controller = fixture_controller::<Reading>(Duration::ZERO, Session::new()).await;

        assert_eq!(ids(&controller.records().await), vec!["R1", "R2", "R3"]);
    }

    #[test(tokio::test)]
    async fn subscribers_see_every_change() {
        let controller = fixture_controller::<Aviary>(Duration::ZERO, Session::new()).await;
        let mut changes = controller.subscribe();
        let _ = changes.borrow_and_update();

        controller.set_query("sul").await;

        assert!(changes.has_changed().unwrap());
    }

    #[test(tokio::test)]
    async fn create_prepends_the_stored_record() {
        let controller = fixture_controller::<Aviary>(Duration::ZERO, signed_in().await).await;

        controller.create(new_aviary()).await.unwrap();

        let rows = controller.rows().await;
        assert_eq!(rows.iter().map(|row| row.record.id()).collect::<Vec<_>>(), vec!["A100", "A1", "A2", "A3"]);
        assert!(rows.iter().all(|row| !row.is_pending()));
        let message = controller.message().await.unwrap();
        assert_eq!(message.kind, FlashKind::Success);
        assert_eq!(message.text, "Aviary created.");
    }

    #[tokio::test(start_paused = true)]
    async fn create_shows_a_pending_row_while_in_flight() {
        let controller = fixture_controller::<Aviary>(DELAY, signed_in().await).await;

        let (result, in_flight) = tokio::join!(controller.create(new_aviary()), async {
            sleep(DELAY / 10).await;
            controller.rows().await
        });

        result.unwrap();
        assert_eq!(in_flight.len(), 4);
        assert!(in_flight[0].is_pending());
        assert!(in_flight[0].record.id.starts_with('A'));
        assert_eq!(in_flight[0].record.nome, "Aviário Novo");
        assert!(!controller.rows().await[0].is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn deleting_a_row_still_being_created_is_refused() {
        let controller = fixture_controller::<Aviary>(DELAY, signed_in().await).await;

        let (created, deleted) = tokio::join!(controller.create(new_aviary()), async {
            sleep(DELAY / 10).await;
            let placeholder = controller.rows().await[0].record.id.clone();
            controller.delete(&placeholder, &|_: &str| true).await
        });

        created.unwrap();
        assert!(matches!(deleted, Err(ListError::Unsaved { .. })));
        let rows = controller.rows().await;
        assert_eq!(rows.iter().map(|row| row.record.id()).collect::<Vec<_>>(), vec!["A100", "A1", "A2", "A3"]);
        assert!(rows.iter().all(|row| !row.is_pending()));
    }

    #[tokio::test(start_paused = true)]
    async fn editing_a_row_still_being_created_is_refused() {
        let controller = fixture_controller::<Aviary>(DELAY, signed_in().await).await;

        let (created, (opened, updated, message)) = tokio::join!(controller.create(new_aviary()), async {
            sleep(DELAY / 10).await;
            let placeholder = controller.rows().await[0].record.id.clone();
            let opened = controller.open_edit(&placeholder).await;
            let updated = controller.update(&placeholder, renamed("Renomeado")).await;
            (opened, updated, controller.message().await)
        });

        created.unwrap();
        assert!(matches!(opened, Err(ListError::Unsaved { .. })));
        assert!(matches!(updated, Err(ListError::Unsaved { .. })));
        assert_eq!(message.map(|m| m.text), Some("Wait until the aviary is saved.".to_string()));
        assert_eq!(controller.dialog().await, None);
        let rows = controller.rows().await;
        assert_eq!(rows[0].record, Aviary::from_payload("A100".to_string(), new_aviary()));
        assert!(rows.iter().all(|row| !row.is_pending()));
    }

    #[tokio::test(start_paused = true)]
    async fn a_form_opened_during_a_write_stays_open() {
        let controller = fixture_controller::<Aviary>(DELAY, signed_in().await).await;
        controller.open_create().await;
        controller.set_field("nome", "Aviário Novo").await.unwrap();
        controller.set_field("capacidadeMaxima", "800").await.unwrap();
        controller.set_field("localizacao", "Setor Oeste").await.unwrap();

        let (submitted, ()) = tokio::join!(controller.submit_dialog(), async {
            sleep(DELAY / 10).await;
            controller.open_edit("A1").await.unwrap();
        });

        submitted.unwrap();
        assert_eq!(controller.dialog().await.map(|d| d.title()), Some("Edit Aviary".to_string()));
        assert_eq!(controller.records().await[0].id, "A100");
    }

    #[test(tokio::test)]
    async fn a_failed_create_removes_the_placeholder() {
        let mut server = mockito::Server::new_async().await;
        let _list = mock_list(&mut server, 200).await;
        let _create = server.mock("POST", "/aviarios").with_status(500).create_async().await;
        let controller = remote_controller(&server, signed_in().await);
        controller.load().await;

        let result = controller.create(new_aviary()).await;

        assert!(matches!(result, Err(ListError::Remote(_))));
        assert_eq!(ids(&controller.records().await), vec!["A1", "A2", "A3"]);
        let message = controller.message().await.unwrap();
        assert!(message.is_error());
        assert!(message.text.starts_with("Could not create aviary"));
    }

    #[test(tokio::test)]
    async fn create_keeps_the_placeholder_when_the_backend_returns_no_record() {
        let mut server = mockito::Server::new_async().await;
        let _list = mock_list(&mut server, 200).await;
        let _create = server.mock("POST", "/aviarios").with_status(201).create_async().await;
        let controller = remote_controller(&server, signed_in().await);
        controller.load().await;

        controller.create(new_aviary()).await.unwrap();

        let rows = controller.rows().await;
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].sync, SyncState::Confirmed);
        assert_eq!(rows[0].record.nome, "Aviário Novo");
    }

    #[test(tokio::test)]
    async fn update_replaces_the_record() {
        let controller = fixture_controller::<Aviary>(Duration::ZERO, signed_in().await).await;

        controller.update("A1", renamed("Aviário Principal")).await.unwrap();

        let rows = controller.rows().await;
        assert_eq!(rows[0].record.nome, "Aviário Principal");
        assert_eq!(rows[0].sync, SyncState::Confirmed);
        assert_eq!(controller.message().await.map(|m| m.text), Some("Aviary updated.".to_string()));
    }

    #[test(tokio::test)]
    async fn a_failed_update_restores_the_previous_record() {
        let mut server = mockito::Server::new_async().await;
        let _list = mock_list(&mut server, 200).await;
        let _update = server
            .mock("PUT", "/aviarios/A1")
            .with_status(500)
            .with_body("database unavailable")
            .create_async()
            .await;
        let controller = remote_controller(&server, signed_in().await);
        controller.load().await;
        let before = controller.records().await;

        let result = controller.update("A1", renamed("Aviário Principal")).await;

        assert!(matches!(result, Err(ListError::Remote(_))));
        assert_eq!(controller.records().await, before);
        assert_eq!(
            controller.message().await.map(|m| m.text),
            Some("Could not update aviary: database unavailable".to_string())
        );
    }

    #[test(tokio::test)]
    async fn updating_an_unknown_record_fails() {
        let controller = fixture_controller::<Aviary>(Duration::ZERO, signed_in().await).await;

        let result = controller.update("A9", renamed("Fantasma")).await;

        assert!(matches!(result, Err(ListError::NotFound { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_updates_reconcile_independently() {
        let controller = fixture_controller::<Aviary>(DELAY, signed_in().await).await;
        let mut other = renamed("Aviário Experimental II");
        other.localizacao = "Setor Leste".to_string();

        let (first, second) = tokio::join!(
            controller.update("A1", renamed("Aviário Principal")),
            controller.update("A2", other)
        );

        first.unwrap();
        second.unwrap();
        let rows = controller.rows().await;
        assert_eq!(rows[0].record.nome, "Aviário Principal");
        assert_eq!(rows[1].record.nome, "Aviário Experimental II");
        assert!(rows.iter().all(|row| !row.is_pending()));
    }

    #[test(tokio::test)]
    async fn a_declined_delete_changes_nothing() {
        let controller = fixture_controller::<Aviary>(Duration::ZERO, signed_in().await).await;
        let before = controller.view().await;
        let prompts = Mutex::new(Vec::new());

        let outcome = controller
            .delete("A3", &|prompt: &str| {
                prompts.lock().unwrap().push(prompt.to_string());
                false
            })
            .await
            .unwrap();

        assert_eq!(outcome, Deletion::Declined);
        assert_eq!(prompts.into_inner().unwrap(), vec![r#"Delete aviary "Aviário Antigo" (A3)?"#.to_string()]);
        assert_eq!(controller.view().await, before);
    }

    #[test(tokio::test)]
    async fn delete_removes_the_record() {
        let controller = fixture_controller::<Aviary>(Duration::ZERO, signed_in().await).await;

        let outcome = controller.delete("A2", &|_: &str| true).await.unwrap();

        assert_eq!(outcome, Deletion::Deleted);
        assert_eq!(ids(&controller.records().await), vec!["A1", "A3"]);
        assert_eq!(controller.message().await.map(|m| m.text), Some("Aviary deleted.".to_string()));
    }

    #[test(tokio::test)]
    async fn a_failed_delete_puts_the_record_back_in_place() {
        let mut server = mockito::Server::new_async().await;
        let _list = mock_list(&mut server, 200).await;
        let _delete = server.mock("DELETE", "/aviarios/A2").with_status(500).create_async().await;
        let controller = remote_controller(&server, signed_in().await);
        controller.load().await;

        let result = controller.delete("A2", &|_: &str| true).await;

        assert!(matches!(result, Err(ListError::Remote(_))));
        assert_eq!(ids(&controller.records().await), vec!["A1", "A2", "A3"]);
        assert!(controller.message().await.is_some_and(|m| m.is_error()));
    }

    #[test(tokio::test)]
    async fn deleting_an_unknown_record_is_a_no_op() {
        let controller = fixture_controller::<Aviary>(Duration::ZERO, signed_in().await).await;

        let outcome = controller.delete("A9", &|_: &str| true).await.unwrap();

        assert_eq!(outcome, Deletion::NotFound);
        assert_eq!(controller.records().await.len(), 3);
    }

    #[test(tokio::test)]
    async fn writes_without_a_session_never_reach_the_backend() {
        let mut server = mockito::Server::new_async().await;
        let _list = mock_list(&mut server, 200).await;
        let create = server.mock("POST", "/aviarios").expect(0).create_async().await;
        let controller = remote_controller(&server, Session::new());
        controller.load().await;

        let result = controller.create(new_aviary()).await;

        create.assert_async().await;
        assert!(matches!(result, Err(ListError::SignInRequired(SessionError::NotSignedIn))));
        assert_eq!(controller.records().await.len(), 3);
        let message = controller.message().await.unwrap();
        assert!(message.is_error());
        assert_eq!(message.text, "Sign in to change aviaries.");
    }

    #[tokio::test(start_paused = true)]
    async fn messages_expire() {
        let controller = fixture_controller::<Aviary>(Duration::ZERO, signed_in().await).await;
        controller.create(new_aviary()).await.unwrap();
        assert!(controller.message().await.is_some());

        sleep(ListOptions::default().message_ttl + Duration::from_millis(10)).await;

        assert_eq!(controller.message().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn an_older_timer_leaves_a_newer_message_alone() {
        let controller = fixture_controller::<Aviary>(Duration::ZERO, signed_in().await).await;
        let ttl = ListOptions::default().message_ttl;
        controller.create(new_aviary()).await.unwrap();

        sleep(ttl / 2).await;
        controller.delete("A3", &|_: &str| true).await.unwrap();
        sleep(ttl / 2 + Duration::from_millis(10)).await;

        assert_eq!(controller.message().await.map(|m| m.text), Some("Aviary deleted.".to_string()));

        sleep(ttl).await;
        assert_eq!(controller.message().await, None);
    }

    #[test(tokio::test)]
    async fn submitting_the_create_form() {
        let controller = fixture_controller::<Aviary>(Duration::ZERO, signed_in().await).await;

        controller.open_create().await;
        assert_eq!(controller.dialog().await.map(|d| d.title()), Some("Create Aviary".to_string()));
        controller.set_field("nome", "Aviário Novo").await.unwrap();
        controller.set_field("capacidadeMaxima", "800").await.unwrap();
        controller.set_field("localizacao", "Setor Oeste").await.unwrap();
        controller.submit_dialog().await.unwrap();

        assert_eq!(controller.dialog().await, None);
        assert_eq!(controller.records().await[0], Aviary::from_payload("A100".to_string(), new_aviary()));
    }

    #[test(tokio::test)]
    async fn submitting_the_edit_form_updates_the_record() {
        let controller = fixture_controller::<Aviary>(Duration::ZERO, signed_in().await).await;

        controller.open_edit("A1").await.unwrap();
        controller.set_field("nome", "Aviário Principal").await.unwrap();
        controller.submit_dialog().await.unwrap();

        let records = controller.records().await;
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].nome, "Aviário Principal");
        assert_eq!(records[0].localizacao, "Setor Norte");
    }

    #[test(tokio::test)]
    async fn invalid_input_keeps_the_form_open() {
        let controller = fixture_controller::<Aviary>(Duration::ZERO, signed_in().await).await;
        controller.open_create().await;
        controller.set_field("nome", "Aviário Novo").await.unwrap();
        controller.set_field("capacidadeMaxima", "0").await.unwrap();

        let result = controller.submit_dialog().await;

        assert!(matches!(result, Err(ListError::Invalid(_))));
        let dialog = controller.dialog().await.unwrap();
        assert_eq!(dialog.error(), Some("Capacity must be a positive number."));
        assert_eq!(controller.records().await.len(), 3);
    }

    #[test(tokio::test)]
    async fn the_form_stays_open_without_a_session() {
        let controller = fixture_controller::<Aviary>(Duration::ZERO, Session::new()).await;
        controller.open_edit("A1").await.unwrap();

        let result = controller.submit_dialog().await;

        assert!(matches!(result, Err(ListError::SignInRequired(_))));
        let dialog = controller.dialog().await.unwrap();
        assert_eq!(dialog.error(), None);
        assert_eq!(dialog.initial().map(|record| record.id.as_str()), Some("A1"));
    }

    #[test(tokio::test)]
    async fn submitting_without_a_form_fails() {
        let controller = fixture_controller::<Aviary>(Duration::ZERO, Session::new()).await;

        assert!(matches!(controller.submit_dialog().await, Err(ListError::NoDialog)));
    }

    #[test(tokio::test)]
    async fn editing_an_unknown_record_fails() {
        let controller = fixture_controller::<Aviary>(Duration::ZERO, signed_in().await).await;

        assert!(matches!(controller.open_edit("A9").await, Err(ListError::NotFound { .. })));
        assert!(matches!(controller.set_field("nome", "x").await, Err(ListError::NoDialog)));
    }

    fn loaded_state() -> ListState<Aviary> {
        let mut state = ListState::new();
        state.rows = crate::remote::fixtures::aviaries().into_iter().map(Row::confirmed).collect();
        state
    }

    #[test]
    fn a_superseded_update_is_not_reverted() {
        let mut state = loaded_state();
        let original = state.find("A1").cloned().unwrap();
        let first = state.next_op();
        state.rows[0].sync = SyncState::Pending(first);
        state.rows[0].record.apply(&renamed("Primeiro"));
        let second = state.next_op();
        state.rows[0].sync = SyncState::Pending(second);
        state.rows[0].record.apply(&renamed("Segundo"));

        assert!(!state.restore(first, "A1", Row::confirmed(original)));
        assert_eq!(state.rows[0].record.nome, "Segundo");
        assert!(state.confirm(second, "A1", None));
        assert_eq!(state.rows[0].sync, SyncState::Confirmed);
    }

    #[test]
    fn confirming_drops_duplicates_of_the_stored_record() {
        let mut state = loaded_state();
        let op = state.next_op();
        state.rows.insert(0, Row::pending(Aviary::from_payload("A123".to_string(), new_aviary()), op));
        state.rows.push(Row::confirmed(Aviary::from_payload("A100".to_string(), new_aviary())));

        assert!(state.confirm(op, "A123", Some(Aviary::from_payload("A100".to_string(), new_aviary()))));

        let ids = state.rows.iter().map(|row| row.record.id()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["A100", "A1", "A2", "A3"]);
    }

    #[test]
    fn placeholder_ids_are_unique() {
        let mut state = loaded_state();
        let first = state.placeholder_id();
        state.rows.insert(0, Row::pending(Aviary::from_payload(first.clone(), new_aviary()), 1));

        let second = state.placeholder_id();

        assert!(first.starts_with('A'));
        assert_ne!(first, second);
    }

    #[test]
    fn reinsert_clamps_the_index() {
        let mut state = loaded_state();
        let removed = state.rows.remove(2);
        state.rows.truncate(1);

        assert!(state.reinsert(2, removed));
        assert_eq!(state.rows.iter().map(|row| row.record.id()).collect::<Vec<_>>(), vec!["A1", "A3"]);
    }

    #[test]
    fn a_failed_update_keeps_the_row_of_a_pending_create() {
        let mut state = loaded_state();
        let create = state.next_create();
        state.rows.insert(0, Row::pending(Aviary::from_payload("A123".to_string(), new_aviary()), create));
        let previous = state.rows[0].clone();
        let update = state.next_op();
        state.rows[0].sync = SyncState::Pending(update);
        state.rows[0].record.apply(&renamed("Renomeado"));

        state.finish(update);
        assert!(state.restore(update, "A123", previous));
        assert_eq!(state.rows[0].sync, SyncState::Pending(create));
        assert_eq!(state.rows[0].record.nome, "Aviário Novo");

        state.finish(create);
        assert!(state.complete_create(create, "A123", Some(Aviary::from_payload("A100".to_string(), new_aviary()))));
        assert_eq!(state.rows[0].record.id, "A100");
        assert_eq!(state.rows[0].sync, SyncState::Confirmed);
    }

    #[test]
    fn a_create_answered_after_a_reload_lists_the_stored_record() {
        let mut state = loaded_state();
        let op = state.next_create();
        state.rows.insert(0, Row::pending(Aviary::from_payload("A123".to_string(), new_aviary()), op));
        state.rows = crate::remote::fixtures::aviaries().into_iter().map(Row::confirmed).collect();

        state.finish(op);
        assert!(!state.complete_create(op, "A123", Some(Aviary::from_payload("A100".to_string(), new_aviary()))));

        let ids = state.rows.iter().map(|row| row.record.id()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["A100", "A1", "A2", "A3"]);
        assert!(state.rows.iter().all(|row| !row.is_pending()));
    }

    #[test]
    fn a_reload_that_already_lists_the_created_record_is_left_alone() {
        let mut state = loaded_state();
        let op = state.next_create();
        let stored = Aviary::from_payload("A100".to_string(), new_aviary());
        state.rows = vec![Row::confirmed(stored.clone())];

        state.finish(op);
        assert!(!state.complete_create(op, "A123", Some(stored)));
        assert_eq!(state.rows.len(), 1);
    }
}
