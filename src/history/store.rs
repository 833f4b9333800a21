use crate::history::{Error, HistoryEntry, ScrollPosition};

/// Ordered log of navigation entries plus the position the user is currently at.
///
/// The store knows nothing about routing. It only guarantees that
/// `current_index` points at an existing entry whenever the log is non-empty.
#[derive(Debug, Default)]
pub struct HistoryStore {
    entries: Vec<HistoryEntry>,
    current_index: usize,
}

impl HistoryStore {
    pub fn new() -> Self {
        HistoryStore {
            entries: vec![],
            current_index: 0,
        }
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
        self.current_index = self.entries.len() - 1;
    }

    /// Overwrites the entry at `index` in place. The current index is left alone.
    pub fn replace_at(&mut self, index: usize, entry: HistoryEntry) -> Result<(), Error> {
        let len = self.entries.len();
        let slot = self
            .entries
            .get_mut(index)
            .ok_or(Error::OutOfRange { index, len })?;
        *slot = entry;
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.current_index)
    }

    pub fn next_id(&self) -> u64 {
        self.entries
            .iter()
            .map(|entry| entry.id)
            .max()
            .map_or(1, |id| id + 1)
    }

    /// First entry matching `predicate`, together with its position.
    pub fn find<P>(&self, mut predicate: P) -> Option<(usize, &HistoryEntry)>
    where
        P: FnMut(&HistoryEntry) -> bool,
    {
        self.entries
            .iter()
            .enumerate()
            .find(|(_, entry)| predicate(*entry))
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn set_current_index(&mut self, index: usize) -> Result<(), Error> {
        if index >= self.entries.len() {
            return Err(Error::OutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        self.current_index = index;
        Ok(())
    }

    pub fn set_scroll_position(
        &mut self,
        index: usize,
        position: ScrollPosition,
    ) -> Result<(), Error> {
        let len = self.entries.len();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(Error::OutOfRange { index, len })?;
        entry.scroll_position = position;
        Ok(())
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn urls(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.url.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
