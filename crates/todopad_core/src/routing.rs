//! Route table derived from the page registry.
//!
//! # Responsibility
//! - Map each registered page path to the page it renders.
//! - Redirect unknown paths to the home route.
//!
//! # Invariants
//! - The table is rebuilt from scratch on every registry change.

use crate::model::user_page::UserPage;
use crate::service::page_registry::{SubscriptionId, UserPageRegistry};
use crate::store::KvStore;
use std::cell::RefCell;
use std::rc::Rc;

pub const HOME_PATH: &str = "/";

/// One routed user page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRoute {
    pub path: String,
    pub page_name: String,
    pub icon: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMatch<'a> {
    Home,
    Page(&'a PageRoute),
    /// Unknown path; navigate to the contained path instead.
    Redirect(&'static str),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<PageRoute>,
}

impl RouteTable {
    pub fn from_pages(pages: &[UserPage]) -> Self {
        Self {
            routes: pages
                .iter()
                .map(|page| PageRoute {
                    path: page.path.clone(),
                    page_name: page.name.clone(),
                    icon: page.icon.clone(),
                })
                .collect(),
        }
    }

    /// Builds a table from `registry` and keeps it current through a
    /// registry subscription.
    ///
    /// Pass the returned id to [`UserPageRegistry::unsubscribe`] to stop
    /// updates; the table then keeps its last contents.
    pub fn bind<S: KvStore>(
        registry: &mut UserPageRegistry<S>,
    ) -> (Rc<RefCell<RouteTable>>, SubscriptionId) {
        let table = Rc::new(RefCell::new(Self::from_pages(registry.pages())));
        let target = Rc::clone(&table);
        let subscription = registry.subscribe(move |pages| {
            *target.borrow_mut() = RouteTable::from_pages(pages);
        });
        (table, subscription)
    }

    /// Routes in registry order.
    pub fn routes(&self) -> &[PageRoute] {
        &self.routes
    }

    pub fn resolve(&self, path: &str) -> RouteMatch<'_> {
        if path == HOME_PATH {
            return RouteMatch::Home;
        }
        self.routes
            .iter()
            .find(|route| route.path == path)
            .map_or(RouteMatch::Redirect(HOME_PATH), RouteMatch::Page)
    }
}
