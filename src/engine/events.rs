use crate::engine::NavigationId;
use crate::history::ScrollPosition;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationTrigger {
    Imperative,
    Popstate,
    Hashchange,
}

/// State handed back by the platform when the user traverses to an earlier
/// document state, e.g. with the browser's back button.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoredState {
    pub navigation_id: NavigationId,
    pub state: Option<Value>,
}

impl RestoredState {
    pub fn new(navigation_id: NavigationId) -> Self {
        RestoredState {
            navigation_id,
            state: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavigationStart {
    pub id: NavigationId,
    pub url: String,
    pub trigger: NavigationTrigger,
    pub restored_state: Option<RestoredState>,
    /// State the caller passed with the navigation request, if any.
    pub state: Option<Value>,
    /// Viewport offset at the moment the navigation started, for engines that
    /// can see the viewport.
    pub scroll_position: Option<ScrollPosition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavigationEnd {
    pub id: NavigationId,
    pub url: String,
    pub url_after_redirects: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavigationCancel {
    pub id: NavigationId,
    pub url: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavigationFailed {
    pub id: NavigationId,
    pub url: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NavigationEvent {
    Start(NavigationStart),
    End(NavigationEnd),
    Cancel(NavigationCancel),
    Error(NavigationFailed),
}

impl NavigationEvent {
    pub fn id(&self) -> NavigationId {
        match self {
            NavigationEvent::Start(start) => start.id,
            NavigationEvent::End(end) => end.id,
            NavigationEvent::Cancel(cancel) => cancel.id,
            NavigationEvent::Error(failed) => failed.id,
        }
    }
}
