//! Capabilities the coordinator consumes from the routing engine and the
//! surrounding document.

mod events;
pub mod memory;

pub use events::{
    NavigationCancel, NavigationEnd, NavigationEvent, NavigationFailed, NavigationStart,
    NavigationTrigger, RestoredState,
};

use crate::history::ScrollPosition;
use bon::Builder;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::broadcast;

#[cfg(test)]
use mockall::automock;

pub type NavigationId = u64;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("no route matches the url '{0}'")]
    NoMatch(String),
    #[error("navigation {id} to '{url}' was cancelled: {reason}")]
    Cancelled {
        id: NavigationId,
        url: String,
        reason: String,
    },
    #[error("navigation {0} was superseded by a newer navigation")]
    Superseded(NavigationId),
    #[error("too many redirects while resolving '{0}'")]
    RedirectLimit(String),
}

/// Extras passed along with a navigate-by-url request.
#[derive(Builder, Debug, Clone, Default, PartialEq)]
pub struct NavigationOptions {
    pub state: Option<Value>,
    #[builder(default)]
    pub replace_url: bool,
    #[builder(default)]
    pub skip_location_change: bool,
}

impl NavigationOptions {
    pub fn with_state(state: Value) -> Self {
        NavigationOptions::builder().state(state).build()
    }

    /// Options for replaying an entry that is already in the log.
    pub fn traversal(state: Value) -> Self {
        NavigationOptions::builder()
            .state(state)
            .replace_url(true)
            .build()
    }
}

/// The navigation the engine is currently working on.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationContext {
    pub id: NavigationId,
    pub url: String,
    pub state: Option<Value>,
}

#[cfg_attr(test, automock)]
pub trait RoutingEngine {
    /// A fresh receiver of every navigation lifecycle event emitted from now on.
    fn subscribe(&self) -> broadcast::Receiver<NavigationEvent>;

    /// Resolves once the navigation has settled.
    async fn navigate_by_url(
        &self,
        url: &str,
        options: NavigationOptions,
    ) -> Result<NavigationId, NavigationError>;

    fn current_navigation(&self) -> Option<NavigationContext>;

    /// The currently active url.
    fn url(&self) -> String;
}

#[cfg_attr(test, automock)]
pub trait TitleService {
    fn title(&self) -> String;
}

#[cfg_attr(test, automock)]
pub trait ViewportScroller {
    fn scroll_position(&self) -> ScrollPosition;
    fn scroll_to_position(&self, position: ScrollPosition);
}
