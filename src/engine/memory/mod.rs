//! In-process routing engine.
//!
//! Navigations settle after one scheduler yield, so two navigations polled
//! concurrently overlap and the newer one supersedes the older one.

mod document;
mod route;

pub use document::{MemoryTitle, MemoryViewport};
pub use route::Route;

use crate::engine::{
    NavigationCancel, NavigationContext, NavigationEnd, NavigationError, NavigationEvent,
    NavigationFailed, NavigationId, NavigationOptions, NavigationStart, NavigationTrigger,
    RestoredState, RoutingEngine, ViewportScroller,
};
use log::debug;
use std::cell::RefCell;
use std::rc::Rc;
use tokio::sync::broadcast;

const MAX_REDIRECTS: usize = 10;
const EVENT_CAPACITY: usize = 64;

struct RouterState {
    routes: Vec<Route>,
    url: String,
    last_navigation_id: NavigationId,
    pending: Option<NavigationContext>,
    location: Vec<String>,
}

#[derive(Clone)]
pub struct MemoryRouter {
    state: Rc<RefCell<RouterState>>,
    events: broadcast::Sender<NavigationEvent>,
    title: MemoryTitle,
    viewport: MemoryViewport,
}

impl MemoryRouter {
    /// Start events carry a snapshot of `viewport`, taken before the
    /// navigation does any work.
    pub fn new(routes: Vec<Route>, title: MemoryTitle, viewport: MemoryViewport) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        MemoryRouter {
            state: Rc::new(RefCell::new(RouterState {
                routes,
                url: "/".to_string(),
                last_navigation_id: 0,
                pending: None,
                location: vec![],
            })),
            events,
            title,
            viewport,
        }
    }

    /// Urls of the platform's own session history, as the location bar saw them.
    pub fn location_history(&self) -> Vec<String> {
        self.state.borrow().location.clone()
    }

    /// Simulates the user traversing the platform history (back button, history
    /// drop-down). Only the start event is emitted; the listener is expected to
    /// drive the actual navigation.
    pub fn pop_state(&self, restored_state: RestoredState, url: &str) -> NavigationId {
        let id = self.next_navigation_id();
        self.emit(NavigationEvent::Start(NavigationStart {
            id,
            url: route::normalize(url),
            trigger: NavigationTrigger::Popstate,
            state: restored_state.state.clone(),
            restored_state: Some(restored_state),
            scroll_position: Some(self.viewport.scroll_position()),
        }));
        id
    }

    fn next_navigation_id(&self) -> NavigationId {
        let mut state = self.state.borrow_mut();
        state.last_navigation_id += 1;
        state.last_navigation_id
    }

    fn emit(&self, event: NavigationEvent) {
        debug!("Emitting navigation event {:?}", event);
        // Nobody listening is not an error for the router.
        let _ = self.events.send(event);
    }

    fn begin(&self, url: &str, options: &NavigationOptions) -> NavigationId {
        let id = self.next_navigation_id();
        self.state.borrow_mut().pending = Some(NavigationContext {
            id,
            url: url.to_string(),
            state: options.state.clone(),
        });
        self.emit(NavigationEvent::Start(NavigationStart {
            id,
            url: url.to_string(),
            trigger: NavigationTrigger::Imperative,
            restored_state: None,
            state: options.state.clone(),
            scroll_position: Some(self.viewport.scroll_position()),
        }));
        id
    }

    fn settle(
        &self,
        id: NavigationId,
        url: &str,
        options: &NavigationOptions,
    ) -> Result<NavigationId, NavigationError> {
        let mut state = self.state.borrow_mut();
        if state.pending.as_ref().map(|pending| pending.id) != Some(id) {
            self.emit(NavigationEvent::Cancel(NavigationCancel {
                id,
                url: url.to_string(),
                reason: "superseded by a newer navigation".to_string(),
            }));
            return Err(NavigationError::Superseded(id));
        }
        state.pending = None;

        let (resolved_url, route) = match resolve(&state.routes, url) {
            Ok(resolved) => resolved,
            Err(e) => {
                self.emit(NavigationEvent::Error(NavigationFailed {
                    id,
                    url: url.to_string(),
                    error: e.to_string(),
                }));
                return Err(e);
            }
        };

        if !route.can_activate {
            let reason = format!("route '{}' refused activation", route.path);
            self.emit(NavigationEvent::Cancel(NavigationCancel {
                id,
                url: url.to_string(),
                reason: reason.clone(),
            }));
            return Err(NavigationError::Cancelled {
                id,
                url: url.to_string(),
                reason,
            });
        }

        state.url = resolved_url.clone();
        if !options.skip_location_change {
            if options.replace_url {
                state.location.pop();
            }
            state.location.push(resolved_url.clone());
        }
        drop(state);

        self.title.set_title(route.title);
        self.emit(NavigationEvent::End(NavigationEnd {
            id,
            url: url.to_string(),
            url_after_redirects: resolved_url,
        }));
        Ok(id)
    }
}

fn resolve(routes: &[Route], url: &str) -> Result<(String, Route), NavigationError> {
    let mut current = url.to_string();
    for _ in 0..=MAX_REDIRECTS {
        let route = routes
            .iter()
            .find(|route| route.matches(&current))
            .ok_or_else(|| NavigationError::NoMatch(current.clone()))?;
        match &route.redirect_to {
            Some(target) => current = route::normalize(target),
            None => return Ok((current, route.clone())),
        }
    }
    Err(NavigationError::RedirectLimit(url.to_string()))
}

impl RoutingEngine for MemoryRouter {
    fn subscribe(&self) -> broadcast::Receiver<NavigationEvent> {
        self.events.subscribe()
    }

    async fn navigate_by_url(
        &self,
        url: &str,
        options: NavigationOptions,
    ) -> Result<NavigationId, NavigationError> {
        let url = route::normalize(url);
        let id = self.begin(&url, &options);
        tokio::task::yield_now().await;
        self.settle(id, &url, &options)
    }

    fn current_navigation(&self) -> Option<NavigationContext> {
        self.state.borrow().pending.clone()
    }

    fn url(&self) -> String {
        self.state.borrow().url.clone()
    }
}
