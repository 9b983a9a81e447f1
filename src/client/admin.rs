//! Generic admin list/edit state machine
//!
//! `load` fills `items`; `begin_edit` selects a document; `submit` creates
//! or updates depending on whether an edit is in progress, then reloads;
//! `remove` deletes, then reloads. Failures land in `notification`.

use super::state::LoadState;
use super::{ApiClient, ClientError, ListQuery};
use crate::core::entity::{Content, Document};
use uuid::Uuid;

pub struct AdminCollection<T: Content> {
    pub items: Vec<Document<T>>,
    pub query: ListQuery,
    pub page: u64,
    pub pages: u64,
    /// Document currently being edited
    pub editing: Option<Uuid>,
    pub state: LoadState,
    /// Last user-visible message
    pub notification: Option<String>,
}

impl<T: Content> AdminCollection<T> {
    pub fn new(query: ListQuery) -> Self {
        Self {
            items: Vec::new(),
            query,
            page: 1,
            pages: 1,
            editing: None,
            state: LoadState::Idle,
            notification: None,
        }
    }

    /// Loads the full list on every `load`
    pub fn unpaginated() -> Self {
        Self::new(ListQuery::default())
    }

    /// Loads `limit` documents per page, starting at page 1
    pub fn paginated(limit: u64) -> Self {
        Self::new(ListQuery::paged(1, limit))
    }

    pub async fn load(&mut self, client: &ApiClient) {
        self.state = LoadState::Loading;

        match client.list_page::<T>(&self.query).await {
            Ok(page) => {
                self.page = page.page;
                self.pages = page.pages;
                self.items = page.items;
                self.state = LoadState::Loaded;
            }
            Err(err) => self.fail(err),
        }
    }

    /// Start editing `id`; returns the document to prefill the form with
    pub fn begin_edit(&mut self, id: &Uuid) -> Option<&Document<T>> {
        let document = self.items.iter().find(|d| d.id == *id)?;
        self.editing = Some(*id);
        Some(document)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Create, or update the document being edited; returns whether it succeeded
    pub async fn submit(&mut self, client: &ApiClient, form: &T) -> bool {
        let result = match self.editing {
            Some(id) => client.replace(&id, form).await.map(|_| "updated"),
            None => client.create(form).await.map(|_| "created"),
        };

        match result {
            Ok(action) => {
                self.editing = None;
                self.notification = Some(format!(
                    "{} {}",
                    capitalize(T::resource_name_singular()),
                    action
                ));
                self.load(client).await;
                true
            }
            Err(err) => {
                self.fail(err);
                false
            }
        }
    }

    /// Delete `id`, then reload; returns whether it succeeded
    pub async fn remove(&mut self, client: &ApiClient, id: &Uuid) -> bool {
        match client.delete::<T>(id).await {
            Ok(()) => {
                if self.editing == Some(*id) {
                    self.editing = None;
                }
                self.notification = Some(format!(
                    "{} deleted",
                    capitalize(T::resource_name_singular())
                ));
                self.load(client).await;
                true
            }
            Err(err) => {
                self.fail(err);
                false
            }
        }
    }

    /// Clear the current notification
    pub fn dismiss(&mut self) {
        self.notification = None;
    }

    fn fail(&mut self, err: ClientError) {
        tracing::warn!(entity = T::resource_name(), error = %err, "Admin request failed");
        self.state = LoadState::failed(&err);
        self.notification = Some(err.to_string());
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
