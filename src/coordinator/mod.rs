//! History bookkeeping on top of a routing engine.
//!
//! Every navigation start observed on the engine's event stream is either a
//! replay of an entry already in the log (the platform restored an earlier
//! state) or a new navigation, which is appended once the engine reports it
//! has ended. Navigations the coordinator issues itself (traversals,
//! `push_state`, `replace_state`) mark the cycle as in flight first, so the
//! events they cause are not recorded a second time.

mod phase;

pub use phase::{classify, Classification, Phase, Programmatic};

use crate::config::{CoordinatorConfig, ScrollRestoration};
use crate::engine::{
    NavigationCancel, NavigationEnd, NavigationError, NavigationEvent, NavigationFailed,
    NavigationId, NavigationOptions, NavigationStart, RoutingEngine, TitleService,
    ViewportScroller,
};
use crate::history::{HistoryEntry, HistoryStore, ScrollPosition};
use log::{debug, error, info, warn};
use serde_json::Value;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

pub struct NavigationCoordinator<E, T, V> {
    engine: E,
    title: T,
    viewport: V,
    config: CoordinatorConfig,
    events: broadcast::Receiver<NavigationEvent>,
    store: HistoryStore,
    phase: Phase,
    deferred: Option<NavigationStart>,
}

impl<E, T, V> NavigationCoordinator<E, T, V>
where
    E: RoutingEngine,
    T: TitleService,
    V: ViewportScroller,
{
    pub fn new(engine: E, title: T, viewport: V, config: CoordinatorConfig) -> Self {
        let events = engine.subscribe();
        NavigationCoordinator {
            engine,
            title,
            viewport,
            config,
            events,
            store: HistoryStore::new(),
            phase: Phase::Idle,
            deferred: None,
        }
    }

    pub fn history(&self) -> Vec<String> {
        self.store.urls()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        self.store.entries()
    }

    pub fn current_entry(&self) -> Option<&HistoryEntry> {
        self.store.current()
    }

    pub fn current_index(&self) -> usize {
        self.store.current_index()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// The url the engine considers active.
    pub fn active_url(&self) -> String {
        self.engine.url()
    }

    pub fn can_go_back(&self) -> bool {
        self.store.current_index() > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.store.current_index() + 1 < self.store.len()
    }

    pub fn previous_url(&self) -> String {
        self.store
            .current_index()
            .checked_sub(1)
            .and_then(|index| self.store.get(index))
            .map(|entry| entry.url.clone())
            .unwrap_or_else(|| self.config.base_href.clone())
    }

    pub fn next_url(&self) -> String {
        self.store
            .get(self.store.current_index() + 1)
            .map(|entry| entry.url.clone())
            .unwrap_or_else(|| self.config.base_href.clone())
    }

    pub async fn back(&mut self) -> Result<(), NavigationError> {
        self.go(-1).await
    }

    pub async fn forward(&mut self) -> Result<(), NavigationError> {
        self.go(1).await
    }

    /// Moves `delta` entries through the log. A target outside the log is
    /// silently ignored, like the platform's own history does.
    pub async fn go(&mut self, delta: isize) -> Result<(), NavigationError> {
        self.process_pending_events().await;
        let current = self.store.current_index();
        let target = match current.checked_add_signed(delta) {
            Some(target) if target < self.store.len() => target,
            _ => {
                debug!(
                    "Ignoring traversal by {} from index {}, the log has {} entries",
                    delta,
                    current,
                    self.store.len()
                );
                return Ok(());
            }
        };
        self.capture_scroll_position();
        self.replay(target).await
    }

    pub async fn push_state<S, U>(
        &mut self,
        state: Value,
        title: S,
        url: U,
    ) -> Result<(), NavigationError>
    where
        S: Into<String>,
        U: Into<String>,
    {
        self.navigate_programmatically(Programmatic::Push, state, title.into(), url.into())
            .await
    }

    pub async fn replace_state<S, U>(
        &mut self,
        state: Value,
        title: S,
        url: U,
    ) -> Result<(), NavigationError>
    where
        S: Into<String>,
        U: Into<String>,
    {
        self.navigate_programmatically(Programmatic::Replace, state, title.into(), url.into())
            .await
    }

    /// Classifies every navigation event observed since the last call.
    ///
    /// Callers that navigate through the engine directly must call this to get
    /// those navigations recorded; the public operations call it themselves.
    pub async fn process_pending_events(&mut self) {
        self.recover_abandoned_cycle();
        loop {
            let event = match self.deferred.take() {
                Some(start) => NavigationEvent::Start(start),
                None => match self.try_next_event() {
                    Some(event) => event,
                    None => break,
                },
            };
            self.handle_event(event).await;
        }
    }

    async fn navigate_programmatically(
        &mut self,
        kind: Programmatic,
        state: Value,
        title: String,
        url: String,
    ) -> Result<(), NavigationError> {
        self.process_pending_events().await;
        self.capture_scroll_position();
        self.phase = Phase::ProgrammaticInFlight(kind);

        let options = NavigationOptions::builder()
            .state(state.clone())
            .replace_url(kind == Programmatic::Replace)
            .build();
        let result = self.navigate_and_drain(&url, options).await;
        match &result {
            Ok(_) => {
                let scroll_position = self.viewport.scroll_position();
                match kind {
                    Programmatic::Push => self.append(state, title, url, scroll_position),
                    Programmatic::Replace => {
                        self.replace_current(state, title, url, scroll_position)
                    }
                }
            }
            Err(e) => warn!("{:?} of '{}' failed, history unchanged: {}", kind, url, e),
        }

        self.phase = Phase::Idle;
        result.map(|_| ())
    }

    /// Navigates to the entry at `target` and makes it current once the engine
    /// has settled on it.
    async fn replay(&mut self, target: usize) -> Result<(), NavigationError> {
        let Some(entry) = self.store.get(target).cloned() else {
            return Ok(());
        };
        self.phase = Phase::ReplayInFlight { target };

        let result = self
            .navigate_and_drain(&entry.url, NavigationOptions::traversal(entry.state.clone()))
            .await;
        match &result {
            Ok(_) => {
                self.move_to(target);
                self.restore_scroll_position(entry.scroll_position);
                info!(
                    "Replayed history entry {} ({}) at index {}",
                    entry.id, entry.url, target
                );
            }
            Err(e) => warn!(
                "Replaying history entry {} ({}) failed: {}",
                entry.id, entry.url, e
            ),
        }

        self.phase = Phase::Idle;
        result.map(|_| ())
    }

    async fn navigate_and_drain(
        &mut self,
        url: &str,
        options: NavigationOptions,
    ) -> Result<NavigationId, NavigationError> {
        let result = self.engine.navigate_by_url(url, options).await;
        self.drain_in_flight_events();
        result
    }

    /// Consumes the events caused by the navigation the coordinator is driving.
    fn drain_in_flight_events(&mut self) {
        while let Some(event) = self.try_next_event() {
            match event {
                NavigationEvent::Start(start) if start.restored_state.is_some() => {
                    debug!(
                        "Deferring restoration request {} received while {:?}",
                        start.id, self.phase
                    );
                    self.deferred = Some(start);
                }
                event => debug!(
                    "Not recording event of navigation {} while {:?}",
                    event.id(),
                    self.phase
                ),
            }
        }
    }

    fn try_next_event(&mut self) -> Option<NavigationEvent> {
        loop {
            match self.events.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!("Missed {} navigation events, the event buffer overflowed", skipped)
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    async fn handle_event(&mut self, event: NavigationEvent) {
        match event {
            NavigationEvent::Start(start) => self.on_navigation_start(start).await,
            NavigationEvent::End(end) => self.on_navigation_end(end),
            NavigationEvent::Cancel(NavigationCancel { id, reason, .. }) => {
                self.on_navigation_abandoned(id, &reason)
            }
            NavigationEvent::Error(NavigationFailed { id, error, .. }) => {
                self.on_navigation_abandoned(id, &error)
            }
        }
    }

    async fn on_navigation_start(&mut self, start: NavigationStart) {
        // Events are handled late, the live viewport may already show the next page.
        let position = start
            .scroll_position
            .unwrap_or_else(|| self.viewport.scroll_position());
        self.store_scroll_position(position);

        match classify(&start, &self.store) {
            Classification::Restored { index } => {
                debug!("Navigation {} restores history index {}", start.id, index);
                // The platform has already moved to the restored entry.
                self.move_to(index);
                if let Err(e) = self.replay(index).await {
                    debug!(
                        "Restoration {} stays on index {} although the replay failed: {}",
                        start.id, index, e
                    );
                }
            }
            Classification::Unresolved { navigation_id } => {
                warn!(
                    "Navigation {} restores unknown history entry {}, leaving the log untouched",
                    start.id, navigation_id
                );
                self.phase = Phase::Idle;
            }
            Classification::New => {
                let state = start.state.or_else(|| {
                    self.engine
                        .current_navigation()
                        .filter(|navigation| navigation.id == start.id)
                        .and_then(|navigation| navigation.state)
                });
                debug!("Observing new navigation {} to {}", start.id, start.url);
                self.phase = Phase::Observing {
                    navigation_id: start.id,
                    state,
                };
            }
        }
    }

    fn on_navigation_end(&mut self, end: NavigationEnd) {
        let state = match &mut self.phase {
            Phase::Observing {
                navigation_id,
                state,
            } if *navigation_id == end.id => state.take(),
            _ => {
                debug!("Ignoring end of navigation {}, it is not observed", end.id);
                return;
            }
        };
        let title = self.title.title();
        let scroll_position = self.viewport.scroll_position();
        self.append(
            state.unwrap_or_default(),
            title,
            end.url_after_redirects,
            scroll_position,
        );
        self.phase = Phase::Idle;
    }

    fn on_navigation_abandoned(&mut self, id: NavigationId, reason: &str) {
        match self.phase {
            Phase::Observing { navigation_id, .. } if navigation_id == id => {
                info!("Navigation {} did not complete ({}), nothing recorded", id, reason);
                self.phase = Phase::Idle;
            }
            _ => debug!("Ignoring abandoned navigation {}: {}", id, reason),
        }
    }

    fn append(&mut self, state: Value, title: String, url: String, scroll_position: ScrollPosition) {
        let entry = HistoryEntry::builder()
            .id(self.store.next_id())
            .state(state)
            .title(title)
            .url(url)
            .scroll_position(scroll_position)
            .build();
        info!("Appending history entry {} ({})", entry.id, entry.url);
        self.store.append(entry);
    }

    fn replace_current(
        &mut self,
        state: Value,
        title: String,
        url: String,
        scroll_position: ScrollPosition,
    ) {
        let index = self.store.current_index();
        let Some(id) = self.store.get(index).map(|entry| entry.id) else {
            // The very first entry is replaceable even before anything was recorded.
            self.append(state, title, url, scroll_position);
            return;
        };
        let entry = HistoryEntry::builder()
            .id(id)
            .state(state)
            .title(title)
            .url(url)
            .scroll_position(scroll_position)
            .build();
        info!("Replacing history entry {} at index {} with {}", id, index, entry.url);
        if let Err(e) = self.store.replace_at(index, entry) {
            error!("Could not replace the current history entry: {}", e);
        }
    }

    fn move_to(&mut self, index: usize) {
        if let Err(e) = self.store.set_current_index(index) {
            error!("Could not move the history cursor: {}", e);
        }
    }

    /// Stores the viewport offset on the entry that is about to be left.
    fn capture_scroll_position(&mut self) {
        let position = self.viewport.scroll_position();
        self.store_scroll_position(position);
    }

    fn store_scroll_position(&mut self, position: ScrollPosition) {
        if self.store.is_empty() {
            return;
        }
        let index = self.store.current_index();
        if let Err(e) = self.store.set_scroll_position(index, position) {
            error!("Could not capture the scroll position: {}", e);
        }
    }

    fn restore_scroll_position(&self, position: ScrollPosition) {
        if self.config.scroll_restoration == ScrollRestoration::Enabled {
            self.viewport.scroll_to_position(position);
        }
    }

    /// `&mut self` rules out a concurrently running operation, so an in-flight
    /// phase seen here belongs to a future that was dropped before it settled.
    fn recover_abandoned_cycle(&mut self) {
        if self.phase.is_in_flight() {
            warn!("Resetting abandoned navigation cycle {:?}", self.phase);
            self.phase = Phase::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::memory::{MemoryRouter, MemoryTitle, MemoryViewport, Route};
    use crate::engine::{
        MockRoutingEngine, MockTitleService, MockViewportScroller, NavigationContext,
        NavigationTrigger, RestoredState,
    };
    use futures::FutureExt;
    use mockall::predicate::{always, eq};
    use proptest::prelude::*;
    use serde_json::json;

    type MemoryCoordinator = NavigationCoordinator<MemoryRouter, MemoryTitle, MemoryViewport>;

    fn routes() -> Vec<Route> {
        vec![
            Route::builder().path("").title("Home").build(),
            Route::builder().path("dashboard").title("Dashboard").build(),
            Route::builder().path("heroes").title("My Heroes").build(),
            Route::builder().path("heroes/:id").title("Hero Detail").build(),
            Route::builder().path("old-heroes").redirect_to("/heroes").build(),
            Route::builder().path("admin").title("Admin").can_activate(false).build(),
        ]
    }

    fn coordinator_with(config: CoordinatorConfig) -> (MemoryCoordinator, MemoryRouter, MemoryViewport) {
        let title = MemoryTitle::new("Tour of Heroes");
        let viewport = MemoryViewport::new();
        let router = MemoryRouter::new(routes(), title.clone(), viewport.clone());
        let coordinator =
            NavigationCoordinator::new(router.clone(), title, viewport.clone(), config);
        (coordinator, router, viewport)
    }

    fn coordinator() -> (MemoryCoordinator, MemoryRouter, MemoryViewport) {
        coordinator_with(CoordinatorConfig::default())
    }

    fn entry(id: u64, url: &str) -> HistoryEntry {
        HistoryEntry::builder().id(id).title("").url(url).build()
    }

    fn ids(coordinator: &MemoryCoordinator) -> Vec<u64> {
        coordinator.entries().iter().map(|e| e.id).collect()
    }

    #[tokio::test]
    async fn test_push_back_forward_and_go() {
        let (mut sut, router, _) = coordinator();

        sut.push_state(json!({}), "Home", "/").await.unwrap();
        assert_eq!(vec!["/"], sut.history());
        assert_eq!(0, sut.current_index());

        sut.push_state(json!({}), "List", "/heroes").await.unwrap();
        assert_eq!(vec!["/", "/heroes"], sut.history());
        assert_eq!(1, sut.current_index());

        sut.back().await.unwrap();
        assert_eq!("/", router.url());
        assert_eq!(0, sut.current_index());

        sut.forward().await.unwrap();
        assert_eq!("/heroes", router.url());
        assert_eq!(1, sut.current_index());

        sut.go(-1).await.unwrap();
        assert_eq!("/", sut.active_url());
        assert_eq!(0, sut.current_index());

        sut.go(5).await.unwrap();
        assert_eq!("/", router.url());
        assert_eq!(0, sut.current_index());

        sut.process_pending_events().await;
        assert_eq!(vec!["/", "/heroes"], sut.history());
        assert_eq!(&Phase::Idle, sut.phase());
    }

    #[tokio::test]
    async fn test_replace_state_overwrites_current_entry_only() {
        let (mut sut, router, _) = coordinator();
        sut.push_state(json!({}), "Home", "/").await.unwrap();
        sut.push_state(json!({}), "List", "/heroes").await.unwrap();
        sut.back().await.unwrap();

        sut.replace_state(json!({"hero": 11}), "Detail", "/heroes/11")
            .await
            .unwrap();

        assert_eq!(vec!["/heroes/11", "/heroes"], sut.history());
        assert_eq!(0, sut.current_index());
        let replaced = sut.current_entry().unwrap();
        assert_eq!(1, replaced.id);
        assert_eq!("Detail", replaced.title);
        assert_eq!(json!({"hero": 11}), replaced.state);
        assert_eq!("/heroes/11", router.url());
    }

    #[tokio::test]
    async fn test_replace_state_on_empty_log_records_the_first_entry() {
        let (mut sut, _, _) = coordinator();
        sut.replace_state(json!(null), "Dashboard", "/dashboard")
            .await
            .unwrap();
        assert_eq!(vec!["/dashboard"], sut.history());
        assert_eq!(vec![1], ids(&sut));
    }

    #[tokio::test]
    async fn test_ids_stay_monotonic_across_replace() {
        let (mut sut, _, _) = coordinator();
        sut.push_state(json!({}), "Home", "/").await.unwrap();
        sut.push_state(json!({}), "List", "/heroes").await.unwrap();
        sut.replace_state(json!({}), "Detail", "/heroes/12").await.unwrap();
        sut.push_state(json!({}), "Dashboard", "/dashboard").await.unwrap();
        assert_eq!(vec![1, 2, 3], ids(&sut));
    }

    #[tokio::test]
    async fn test_scroll_position_is_restored_on_traversal() {
        let (mut sut, _, viewport) = coordinator();
        sut.push_state(json!({}), "Home", "/").await.unwrap();
        viewport.scroll_to_position(ScrollPosition::new(0.0, 120.0));
        sut.push_state(json!({}), "List", "/heroes").await.unwrap();
        viewport.scroll_to_position(ScrollPosition::new(4.0, 40.0));

        sut.back().await.unwrap();
        assert_eq!(ScrollPosition::new(0.0, 120.0), viewport.scroll_position());

        viewport.scroll_to_position(ScrollPosition::new(0.0, 75.5));
        sut.forward().await.unwrap();
        assert_eq!(ScrollPosition::new(4.0, 40.0), viewport.scroll_position());

        sut.go(-1).await.unwrap();
        assert_eq!(ScrollPosition::new(0.0, 75.5), viewport.scroll_position());
    }

    #[tokio::test]
    async fn test_scroll_position_is_not_restored_when_disabled() {
        let config = CoordinatorConfig::builder()
            .scroll_restoration(ScrollRestoration::Disabled)
            .build();
        let (mut sut, _, viewport) = coordinator_with(config);
        sut.push_state(json!({}), "Home", "/").await.unwrap();
        viewport.scroll_to_position(ScrollPosition::new(0.0, 120.0));
        sut.push_state(json!({}), "List", "/heroes").await.unwrap();
        viewport.scroll_to_position(ScrollPosition::new(0.0, 10.0));

        sut.back().await.unwrap();

        assert_eq!(ScrollPosition::new(0.0, 10.0), viewport.scroll_position());
        assert_eq!(
            ScrollPosition::new(0.0, 120.0),
            sut.entries()[0].scroll_position
        );
    }

    #[tokio::test]
    async fn test_previous_and_next_url_fall_back_to_base_href() {
        let config = CoordinatorConfig::builder().base_href("/app/").build();
        let (mut sut, _, _) = coordinator_with(config);
        assert_eq!("/app/", sut.previous_url());
        assert_eq!("/app/", sut.next_url());

        sut.push_state(json!({}), "Home", "/").await.unwrap();
        sut.push_state(json!({}), "List", "/heroes").await.unwrap();
        assert_eq!("/", sut.previous_url());
        assert_eq!("/app/", sut.next_url());
        assert!(sut.can_go_back());
        assert!(!sut.can_go_forward());

        sut.back().await.unwrap();
        assert_eq!("/app/", sut.previous_url());
        assert_eq!("/heroes", sut.next_url());
    }

    #[tokio::test]
    async fn test_failed_push_state_records_nothing() {
        let (mut sut, router, _) = coordinator();
        sut.push_state(json!({}), "Home", "/").await.unwrap();

        let result = sut.push_state(json!({}), "Villains", "/villains").await;

        assert_eq!(Err(NavigationError::NoMatch("/villains".to_string())), result);
        assert_eq!(vec!["/"], sut.history());
        assert_eq!(&Phase::Idle, sut.phase());

        sut.push_state(json!({}), "List", "/heroes").await.unwrap();
        assert_eq!(vec!["/", "/heroes"], sut.history());
        assert_eq!("/heroes", router.url());
    }

    #[tokio::test]
    async fn test_failed_traversal_keeps_the_current_index() {
        let (mut sut, _, _) = coordinator();
        sut.store.append(entry(1, "/admin"));
        sut.store.append(entry(2, "/heroes"));

        let result = sut.back().await;

        assert!(matches!(result, Err(NavigationError::Cancelled { .. })));
        assert_eq!(1, sut.current_index());
        assert_eq!(&Phase::Idle, sut.phase());
    }

    #[tokio::test]
    async fn test_organic_navigation_is_appended_once_it_ends() {
        let (mut sut, router, viewport) = coordinator();
        viewport.scroll_to_position(ScrollPosition::new(0.0, 8.0));

        router
            .navigate_by_url("/heroes", NavigationOptions::with_state(json!({"from": "link"})))
            .await
            .unwrap();
        sut.process_pending_events().await;

        assert_eq!(vec!["/heroes"], sut.history());
        let recorded = sut.current_entry().unwrap();
        assert_eq!("My Heroes", recorded.title);
        assert_eq!(json!({"from": "link"}), recorded.state);
        assert_eq!(ScrollPosition::new(0.0, 8.0), recorded.scroll_position);
        assert_eq!(&Phase::Idle, sut.phase());
    }

    #[tokio::test]
    async fn test_organic_navigation_records_the_redirect_target() {
        let (mut sut, router, _) = coordinator();
        router
            .navigate_by_url("/old-heroes", NavigationOptions::default())
            .await
            .unwrap();
        sut.process_pending_events().await;
        assert_eq!(vec!["/heroes"], sut.history());
    }

    #[tokio::test]
    async fn test_cancelled_organic_navigation_records_nothing() {
        let (mut sut, router, _) = coordinator();
        let result = router
            .navigate_by_url("/admin", NavigationOptions::default())
            .await;
        assert!(result.is_err());

        sut.process_pending_events().await;

        assert!(sut.history().is_empty());
        assert_eq!(&Phase::Idle, sut.phase());
    }

    #[tokio::test]
    async fn test_operations_record_organic_navigations_first() {
        let (mut sut, router, _) = coordinator();
        router
            .navigate_by_url("/dashboard", NavigationOptions::default())
            .await
            .unwrap();

        sut.push_state(json!({}), "List", "/heroes").await.unwrap();

        assert_eq!(vec!["/dashboard", "/heroes"], sut.history());
    }

    #[tokio::test]
    async fn test_restoration_replays_the_stored_entry() {
        let (mut sut, router, viewport) = coordinator();
        sut.push_state(json!({"page": 1}), "Home", "/").await.unwrap();
        viewport.scroll_to_position(ScrollPosition::new(0.0, 300.0));
        sut.push_state(json!({}), "List", "/heroes").await.unwrap();
        viewport.scroll_to_position(ScrollPosition::new(0.0, 20.0));
        sut.push_state(json!({}), "Dashboard", "/dashboard").await.unwrap();

        router.pop_state(RestoredState::new(1), "/");
        sut.process_pending_events().await;

        assert_eq!(0, sut.current_index());
        assert_eq!("/", router.url());
        assert_eq!(ScrollPosition::new(0.0, 300.0), viewport.scroll_position());
        assert_eq!(vec!["/", "/heroes", "/dashboard"], sut.history());
        assert_eq!(
            ScrollPosition::new(0.0, 20.0),
            sut.entries()[2].scroll_position
        );
    }

    #[tokio::test]
    async fn test_unresolvable_restoration_is_ignored() {
        let (mut sut, router, _) = coordinator();

        router.pop_state(RestoredState::new(42), "/heroes");
        sut.process_pending_events().await;

        assert!(sut.history().is_empty());
        assert!(router.location_history().is_empty());
        assert_eq!("/", router.url());
        assert_eq!(&Phase::Idle, sut.phase());
    }

    #[tokio::test]
    async fn test_abandoned_operation_does_not_lock_out_the_coordinator() {
        let (mut sut, router, _) = coordinator();

        assert!(sut
            .push_state(json!({}), "Home", "/")
            .now_or_never()
            .is_none());
        assert_eq!(
            &Phase::ProgrammaticInFlight(Programmatic::Push),
            sut.phase()
        );

        sut.push_state(json!({}), "List", "/heroes").await.unwrap();

        assert_eq!(vec!["/heroes"], sut.history());
        assert_eq!(&Phase::Idle, sut.phase());
        assert_eq!("/heroes", router.url());
    }

    #[tokio::test]
    async fn test_organic_navigation_captures_the_offset_it_started_from() {
        let (mut sut, router, viewport) = coordinator();
        sut.push_state(json!({}), "List", "/heroes").await.unwrap();
        viewport.scroll_to_position(ScrollPosition::new(0.0, 100.0));
        router
            .navigate_by_url("/dashboard", NavigationOptions::default())
            .await
            .unwrap();
        viewport.scroll_to_position(ScrollPosition::new(0.0, 50.0));

        sut.back().await.unwrap();

        assert_eq!(vec!["/heroes", "/dashboard"], sut.history());
        assert_eq!(
            ScrollPosition::new(0.0, 100.0),
            sut.entries()[0].scroll_position
        );
        assert_eq!(
            ScrollPosition::new(0.0, 50.0),
            sut.entries()[1].scroll_position
        );
        assert_eq!(ScrollPosition::new(0.0, 100.0), viewport.scroll_position());
    }

    #[tokio::test]
    async fn test_failed_restoration_stays_on_the_restored_entry() {
        let (mut sut, router, _) = coordinator();
        sut.store.append(entry(1, "/admin"));
        sut.store.append(entry(2, "/heroes"));

        router.pop_state(RestoredState::new(1), "/admin");
        sut.process_pending_events().await;

        assert_eq!(&Phase::Idle, sut.phase());
        assert_eq!(vec!["/admin", "/heroes"], sut.history());
        assert_eq!(vec![1, 2], ids(&sut));
        assert_eq!(0, sut.current_index());
        assert_eq!("/", sut.active_url());
        assert!(router.location_history().is_empty());
    }

    fn memory_mock_engine() -> (MockRoutingEngine, broadcast::Sender<NavigationEvent>) {
        let (tx, _) = broadcast::channel(16);
        let mut engine = MockRoutingEngine::new();
        let subscriber = tx.clone();
        engine
            .expect_subscribe()
            .times(1)
            .returning(move || subscriber.subscribe());
        (engine, tx)
    }

    #[tokio::test]
    async fn test_out_of_range_traversal_issues_no_navigation() {
        let (mut engine, _tx) = memory_mock_engine();
        engine.expect_navigate_by_url().never();
        let mut viewport = MockViewportScroller::new();
        viewport.expect_scroll_position().never();
        viewport.expect_scroll_to_position().never();
        let mut sut = NavigationCoordinator::new(
            engine,
            MockTitleService::new(),
            viewport,
            CoordinatorConfig::default(),
        );
        sut.store.append(entry(1, "/"));
        sut.store.append(entry(2, "/heroes"));

        sut.forward().await.unwrap();
        sut.go(-2).await.unwrap();
        sut.go(isize::MAX).await.unwrap();

        assert_eq!(1, sut.current_index());
        assert_eq!(vec!["/", "/heroes"], sut.history());
    }

    #[tokio::test]
    async fn test_new_navigation_uses_title_and_viewport_services() {
        let (mut engine, tx) = memory_mock_engine();
        engine
            .expect_current_navigation()
            .returning(|| None);
        let mut title = MockTitleService::new();
        title
            .expect_title()
            .times(1)
            .returning(|| "Hero Detail".to_string());
        let mut viewport = MockViewportScroller::new();
        viewport
            .expect_scroll_position()
            .returning(|| ScrollPosition::new(0.0, 64.0));
        viewport.expect_scroll_to_position().never();
        let mut sut =
            NavigationCoordinator::new(engine, title, viewport, CoordinatorConfig::default());

        tx.send(NavigationEvent::Start(NavigationStart {
            id: 3,
            url: "/heroes/13".to_string(),
            trigger: NavigationTrigger::Imperative,
            restored_state: None,
            state: None,
            scroll_position: None,
        }))
        .unwrap();
        tx.send(NavigationEvent::End(NavigationEnd {
            id: 2,
            url: "/dashboard".to_string(),
            url_after_redirects: "/dashboard".to_string(),
        }))
        .unwrap();
        tx.send(NavigationEvent::End(NavigationEnd {
            id: 3,
            url: "/heroes/13".to_string(),
            url_after_redirects: "/heroes/13".to_string(),
        }))
        .unwrap();
        sut.process_pending_events().await;

        assert_eq!(vec!["/heroes/13"], sut.history());
        let recorded = sut.current_entry().unwrap();
        assert_eq!("Hero Detail", recorded.title);
        assert_eq!(Value::Null, recorded.state);
        assert_eq!(ScrollPosition::new(0.0, 64.0), recorded.scroll_position);
    }

    #[tokio::test]
    async fn test_new_navigation_state_falls_back_to_the_pending_context() {
        let (mut engine, tx) = memory_mock_engine();
        engine.expect_current_navigation().times(1).returning(|| {
            Some(NavigationContext {
                id: 5,
                url: "/heroes/15".to_string(),
                state: Some(json!({"hero": 15})),
            })
        });
        let mut title = MockTitleService::new();
        title.expect_title().returning(|| "Hero Detail".to_string());
        let mut sut = NavigationCoordinator::new(
            engine,
            title,
            MemoryViewport::new(),
            CoordinatorConfig::default(),
        );

        tx.send(NavigationEvent::Start(NavigationStart {
            id: 5,
            url: "/heroes/15".to_string(),
            trigger: NavigationTrigger::Imperative,
            restored_state: None,
            state: None,
            scroll_position: Some(ScrollPosition::new(0.0, 12.0)),
        }))
        .unwrap();
        sut.process_pending_events().await;
        assert_eq!(
            &Phase::Observing {
                navigation_id: 5,
                state: Some(json!({"hero": 15}))
            },
            sut.phase()
        );

        tx.send(NavigationEvent::End(NavigationEnd {
            id: 5,
            url: "/heroes/15".to_string(),
            url_after_redirects: "/heroes/15".to_string(),
        }))
        .unwrap();
        sut.process_pending_events().await;

        assert_eq!(vec!["/heroes/15"], sut.history());
        assert_eq!(json!({"hero": 15}), sut.current_entry().unwrap().state);
    }

    #[tokio::test]
    async fn test_restoration_during_push_is_deferred_to_the_next_cycle() {
        let (mut engine, tx) = memory_mock_engine();
        let mut calls = 0;
        engine
            .expect_navigate_by_url()
            .with(always(), always())
            .times(2)
            .returning(move |_, _| {
                calls += 1;
                if calls == 1 {
                    tx.send(NavigationEvent::Start(NavigationStart {
                        id: 10,
                        url: "/".to_string(),
                        trigger: NavigationTrigger::Popstate,
                        restored_state: Some(RestoredState::new(1)),
                        state: None,
                        scroll_position: None,
                    }))
                    .unwrap();
                }
                Ok(9 + calls)
            });
        let viewport = MemoryViewport::new();
        let mut sut = NavigationCoordinator::new(
            engine,
            MockTitleService::new(),
            viewport,
            CoordinatorConfig::default(),
        );
        sut.store.append(entry(1, "/"));
        sut.store.append(entry(2, "/heroes"));

        sut.push_state(json!({}), "Dashboard", "/dashboard").await.unwrap();
        assert_eq!(2, sut.current_index());
        assert!(sut.deferred.is_some());

        sut.process_pending_events().await;
        assert_eq!(0, sut.current_index());
        assert_eq!(vec!["/", "/heroes", "/dashboard"], sut.history());
        assert!(sut.deferred.is_none());
    }

    #[tokio::test]
    async fn test_rejected_push_clears_the_in_flight_phase() {
        let (mut engine, _tx) = memory_mock_engine();
        engine
            .expect_navigate_by_url()
            .with(eq("/heroes"), always())
            .times(1)
            .returning(|url, _| {
                Err(NavigationError::Cancelled {
                    id: 1,
                    url: url.to_string(),
                    reason: "guard".to_string(),
                })
            });
        let mut sut = NavigationCoordinator::new(
            engine,
            MockTitleService::new(),
            MemoryViewport::new(),
            CoordinatorConfig::default(),
        );

        let result = sut.push_state(json!({}), "List", "/heroes").await;

        assert!(result.is_err());
        assert!(sut.history().is_empty());
        assert_eq!(&Phase::Idle, sut.phase());
    }

    #[derive(Debug, Clone)]
    enum Operation {
        Push(&'static str),
        Replace(&'static str),
        Go(isize),
    }

    fn arb_url() -> impl Strategy<Value = &'static str> {
        prop::sample::select(vec!["/", "/dashboard", "/heroes", "/heroes/11", "/heroes/12"])
    }

    fn arb_operation() -> impl Strategy<Value = Operation> {
        prop_oneof![
            arb_url().prop_map(Operation::Push),
            arb_url().prop_map(Operation::Replace),
            (-3isize..=3).prop_map(Operation::Go),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn push_state_records_urls_in_call_order(urls in prop::collection::vec(arb_url(), 1..12)) {
            tokio_test::block_on(async {
                let (mut sut, _, _) = coordinator();
                for (i, url) in urls.iter().enumerate() {
                    sut.push_state(json!({}), "", *url).await.unwrap();
                    assert_eq!(i, sut.current_index());
                    assert_eq!(i + 1, sut.history().len());
                }
                assert_eq!(urls, sut.history());
            });
        }

        #[test]
        fn operations_keep_log_invariants(operations in prop::collection::vec(arb_operation(), 1..24)) {
            tokio_test::block_on(async {
                let (mut sut, router, _) = coordinator();
                for operation in operations {
                    let len = sut.history().len();
                    let index = sut.current_index();
                    let max_id = ids(&sut).into_iter().max().unwrap_or(0);
                    match operation {
                        Operation::Push(url) => {
                            sut.push_state(json!({}), "", url).await.unwrap();
                            assert_eq!(len + 1, sut.history().len());
                            assert!(sut.current_entry().unwrap().id > max_id);
                        }
                        Operation::Replace(url) if len > 0 => {
                            sut.replace_state(json!({}), "", url).await.unwrap();
                            assert_eq!(len, sut.history().len());
                            assert_eq!(index, sut.current_index());
                            assert_eq!(url, sut.current_entry().unwrap().url);
                        }
                        Operation::Replace(_) => {}
                        Operation::Go(delta) => {
                            let url_before = router.url();
                            sut.go(delta).await.unwrap();
                            match index.checked_add_signed(delta) {
                                Some(target) if target < len => {
                                    assert_eq!(target, sut.current_index());
                                    assert_eq!(sut.entries()[target].url, router.url());
                                }
                                _ => {
                                    assert_eq!(index, sut.current_index());
                                    assert_eq!(url_before, router.url());
                                }
                            }
                            assert_eq!(len, sut.history().len());
                        }
                    }
                    let ids = ids(&sut);
                    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
                    assert!(sut.history().is_empty() || sut.current_index() < sut.history().len());
                }
            });
        }
    }
}
