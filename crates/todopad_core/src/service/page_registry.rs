//! User page registry service.
//!
//! # Responsibility
//! - Own the ordered list of user pages and mirror it to the store.
//! - Add, rename and remove pages; removal also drops the user's tasks.
//! - Notify subscribers after local mutations and external store writes.
//!
//! # Invariants
//! - Page names are unique; derived page paths are unique.
//! - A failed operation leaves both memory and store untouched.
//! - `remove_page` writes the page list before deleting task data; a failed
//!   delete leaves orphaned tasks, never a listed page without tasks.
//! - Built-in pages win over persisted pages with the same name or path.

use crate::config::RegistryConfig;
use crate::model::storage_key::{generate_storage_key, StorageKeyError};
use crate::model::user_page::{UserPage, UserPageValidationError};
use crate::store::{read_json_array, write_json, JsonArrayRead, KvStore, StoreError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Callback invoked with the current page list after every change.
pub type ChangeListener = Box<dyn FnMut(&[UserPage])>;

/// Handle returned by [`UserPageRegistry::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Debug)]
pub enum RegistryError {
    /// Name or icon fails page rules.
    InvalidInput(String),
    /// No page with this name.
    NotFound(String),
    /// Another page already uses this name or derived path.
    Conflict(String),
    /// Store read or write failed.
    Store(StoreError),
}

impl RegistryError {
    /// Stable code used in diagnostics.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Store(_) => "store_failed",
        }
    }
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(details) => write!(f, "invalid page input: {details}"),
            Self::NotFound(name) => write!(f, "page not found: `{name}`"),
            Self::Conflict(name) => write!(f, "page already exists: `{name}`"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for RegistryError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<UserPageValidationError> for RegistryError {
    fn from(value: UserPageValidationError) -> Self {
        Self::InvalidInput(value.to_string())
    }
}

impl From<StorageKeyError> for RegistryError {
    fn from(value: StorageKeyError) -> Self {
        Self::InvalidInput(value.to_string())
    }
}

/// Ordered page list backed by a key-value store.
pub struct UserPageRegistry<S: KvStore> {
    store: S,
    config: RegistryConfig,
    pages: Vec<UserPage>,
    listeners: Vec<(SubscriptionId, ChangeListener)>,
    next_subscription: u64,
}

impl<S: KvStore> UserPageRegistry<S> {
    /// Loads the registry: built-in pages first, then persisted pages whose
    /// name and path are not taken yet.
    ///
    /// Unreadable persisted JSON is logged and ignored.
    ///
    /// # Errors
    /// - `RegistryError::Store` when the store itself fails.
    pub fn open(store: S, config: RegistryConfig) -> RegistryResult<Self> {
        let defaults = config.default_pages.clone();
        let persisted = load_persisted(&store, &config.registry_key)?.unwrap_or_default();
        let pages = append_unique(defaults, persisted);
        info!(
            "event=registry_open module=registry status=ok key={} pages={}",
            config.registry_key,
            pages.len()
        );
        Ok(Self {
            store,
            config,
            pages,
            listeners: Vec::new(),
            next_subscription: 0,
        })
    }

    pub fn pages(&self) -> &[UserPage] {
        &self.pages
    }

    pub fn find_page(&self, name: &str) -> Option<&UserPage> {
        let name = name.trim();
        self.pages.iter().find(|page| page.name == name)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Registers a change callback; it runs after every successful mutation
    /// and every external refresh, in subscription order.
    pub fn subscribe(&mut self, listener: impl FnMut(&[UserPage]) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns whether `id` was subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(candidate, _)| *candidate != id);
        self.listeners.len() != before
    }

    /// Appends a page for `name` with the configured default icon.
    pub fn add_page_with_default_icon(&mut self, name: &str) -> RegistryResult<UserPage> {
        let icon = self.config.default_icon.clone();
        self.add_page(name, &icon)
    }

    /// Appends a page for `name`, deriving its path.
    ///
    /// # Errors
    /// - `InvalidInput` for a blank or overlong name or a multi-glyph icon.
    /// - `Conflict` when the name or derived path is taken.
    pub fn add_page(&mut self, name: &str, icon: &str) -> RegistryResult<UserPage> {
        let result = self.try_add_page(name, icon);
        match &result {
            Ok(page) => info!(
                "event=page_add module=registry status=ok name={} path={}",
                page.name, page.path
            ),
            Err(err) => log_rejection("page_add", name, err),
        }
        result
    }

    /// Renames `old_name` to `new_name`, keeping position and icon.
    ///
    /// Task data stays under the old storage key.
    ///
    /// # Errors
    /// - `NotFound` when `old_name` is not registered.
    /// - `InvalidInput` when `new_name` breaks page rules.
    /// - `Conflict` when another page owns the new name or derived path.
    pub fn rename_page(&mut self, old_name: &str, new_name: &str) -> RegistryResult<UserPage> {
        let result = self.try_rename_page(old_name, new_name);
        match &result {
            Ok(page) => info!(
                "event=page_rename module=registry status=ok from={} to={} path={}",
                old_name.trim(),
                page.name,
                page.path
            ),
            Err(err) => log_rejection("page_rename", old_name, err),
        }
        result
    }

    /// Removes the page and deletes its user's task collection.
    ///
    /// A failed task delete is logged; the page stays removed.
    ///
    /// # Errors
    /// - `NotFound` when `name` is not registered.
    pub fn remove_page(&mut self, name: &str) -> RegistryResult<UserPage> {
        let result = self.try_remove_page(name);
        match &result {
            Ok(page) => info!(
                "event=page_remove module=registry status=ok name={} path={}",
                page.name, page.path
            ),
            Err(err) => log_rejection("page_remove", name, err),
        }
        result
    }

    /// Picks up writes made by other store contexts.
    ///
    /// When the store reports an external change, the persisted list fully
    /// replaces the in-memory one and subscribers are notified. A missing or
    /// unreadable list keeps the current pages.
    ///
    /// Returns whether the pages were refreshed.
    pub fn sync_external(&mut self) -> RegistryResult<bool> {
        if !self.store.take_external_change()? {
            return Ok(false);
        }
        let Some(persisted) = load_persisted(&self.store, &self.config.registry_key)? else {
            warn!(
                "event=registry_sync module=registry status=skipped reason=no_persisted_list key={}",
                self.config.registry_key
            );
            return Ok(false);
        };

        self.pages = append_unique(Vec::new(), persisted);
        info!(
            "event=registry_sync module=registry status=ok pages={}",
            self.pages.len()
        );
        self.notify();
        Ok(true)
    }

    fn try_add_page(&mut self, name: &str, icon: &str) -> RegistryResult<UserPage> {
        let page = UserPage::new(name, icon)?;
        if self
            .pages
            .iter()
            .any(|existing| existing.name == page.name || existing.path == page.path)
        {
            return Err(RegistryError::Conflict(page.name));
        }

        let mut next = self.pages.clone();
        next.push(page.clone());
        self.commit(next)?;
        Ok(page)
    }

    fn try_rename_page(&mut self, old_name: &str, new_name: &str) -> RegistryResult<UserPage> {
        let index = self.position(old_name)?;
        let current = &self.pages[index];
        let renamed = UserPage::new(new_name, &current.icon)?;

        if renamed.name != current.name {
            let taken = self.pages.iter().enumerate().any(|(other, page)| {
                other != index && (page.name == renamed.name || page.path == renamed.path)
            });
            if taken {
                return Err(RegistryError::Conflict(renamed.name));
            }
        }

        let mut next = self.pages.clone();
        next[index] = renamed.clone();
        self.commit(next)?;
        Ok(renamed)
    }

    fn try_remove_page(&mut self, name: &str) -> RegistryResult<UserPage> {
        let index = self.position(name)?;
        let key = generate_storage_key(&self.pages[index].name)?;

        let mut next = self.pages.clone();
        let removed = next.remove(index);
        self.commit(next)?;

        match self.store.delete(key.as_str()) {
            Ok(()) => info!(
                "event=tasks_delete module=registry status=ok key={}",
                key.as_str()
            ),
            Err(err) => error!(
                "event=tasks_delete module=registry status=error error_code=orphaned_tasks key={} error={err}",
                key.as_str()
            ),
        }
        Ok(removed)
    }

    fn position(&self, name: &str) -> RegistryResult<usize> {
        let name = name.trim();
        self.pages
            .iter()
            .position(|page| page.name == name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// Persists `next`, then adopts it and notifies subscribers.
    fn commit(&mut self, next: Vec<UserPage>) -> RegistryResult<()> {
        write_json(&self.store, &self.config.registry_key, &next)?;
        self.pages = next;
        self.notify();
        Ok(())
    }

    fn notify(&mut self) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.pages);
        }
    }
}

/// Reads the persisted page list, skipping invalid entries.
///
/// Returns `None` when nothing is stored or the stored JSON is corrupt.
fn load_persisted(store: &impl KvStore, key: &str) -> RegistryResult<Option<Vec<UserPage>>> {
    match read_json_array(store, key)? {
        JsonArrayRead::Missing => Ok(None),
        JsonArrayRead::Corrupt(reason) => {
            warn!(
                "event=registry_load module=registry status=recovered error_code=storage_corrupt key={key} error={reason}"
            );
            Ok(None)
        }
        JsonArrayRead::Items(items) => {
            let total = items.len();
            let pages: Vec<UserPage> = items
                .iter()
                .filter_map(|item| UserPage::from_json(item).ok())
                .collect();
            if pages.len() != total {
                warn!(
                    "event=registry_load module=registry status=recovered error_code=invalid_entries key={key} skipped={}",
                    total - pages.len()
                );
            }
            Ok(Some(pages))
        }
    }
}

/// Appends each candidate whose name and path are both unused.
fn append_unique(mut pages: Vec<UserPage>, candidates: Vec<UserPage>) -> Vec<UserPage> {
    for candidate in candidates {
        let taken = pages
            .iter()
            .any(|page| page.name == candidate.name || page.path == candidate.path);
        if !taken {
            pages.push(candidate);
        }
    }
    pages
}

fn log_rejection(event: &str, name: &str, err: &RegistryError) {
    let name = name.trim();
    match err {
        RegistryError::Store(_) => error!(
            "event={event} module=registry status=error error_code={} name={name} error={err}",
            err.code()
        ),
        _ => warn!(
            "event={event} module=registry status=rejected error_code={} name={name} error={err}",
            err.code()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::append_unique;
    use crate::model::user_page::UserPage;

    fn page(name: &str) -> UserPage {
        UserPage::new(name, "📝").unwrap()
    }

    #[test]
    fn append_unique_keeps_first_owner_of_name_or_path() {
        let merged = append_unique(
            vec![page("TestUser")],
            vec![page("testuser"), page("Tanaka"), page("Tanaka")],
        );
        let names: Vec<&str> = merged.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["TestUser", "Tanaka"]);
    }
}
