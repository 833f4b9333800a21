use crate::engine::{TitleService, ViewportScroller};
use crate::history::ScrollPosition;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Shared document title. Clones observe the same title.
#[derive(Clone, Default)]
pub struct MemoryTitle {
    title: Rc<RefCell<String>>,
}

impl MemoryTitle {
    pub fn new<T: Into<String>>(title: T) -> Self {
        MemoryTitle {
            title: Rc::new(RefCell::new(title.into())),
        }
    }

    pub fn set_title<T: Into<String>>(&self, title: T) {
        self.title.replace(title.into());
    }
}

impl TitleService for MemoryTitle {
    fn title(&self) -> String {
        self.title.borrow().clone()
    }
}

/// Shared viewport offset. Clones observe the same position.
#[derive(Clone, Default)]
pub struct MemoryViewport {
    position: Rc<Cell<ScrollPosition>>,
}

impl MemoryViewport {
    pub fn new() -> Self {
        MemoryViewport::default()
    }

    /// Moves the viewport by the given offsets, never past the top-left corner.
    pub fn scroll_by(&self, dx: f64, dy: f64) {
        let current = self.position.get();
        self.position.set(ScrollPosition::new(
            (current.x + dx).max(0.0),
            (current.y + dy).max(0.0),
        ));
    }
}

impl ViewportScroller for MemoryViewport {
    fn scroll_position(&self) -> ScrollPosition {
        self.position.get()
    }

    fn scroll_to_position(&self, position: ScrollPosition) {
        self.position.set(position);
    }
}
