//! Client-side navigation history kept on top of a routing engine.
//!
//! [`NavigationCoordinator`] records every navigation the engine performs as a
//! [`HistoryEntry`], replays entries on back/forward traversal and restores the
//! scroll position each entry was left at.

pub mod config;
pub mod coordinator;
pub mod engine;
pub mod history;

pub use config::{CoordinatorConfig, ScrollRestoration};
pub use coordinator::NavigationCoordinator;
pub use engine::{NavigationError, RoutingEngine, TitleService, ViewportScroller};
pub use history::{HistoryEntry, HistoryStore, ScrollPosition};
