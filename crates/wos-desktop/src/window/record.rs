//! Window table
//!
//! Windows live in a slot arena indexed by id. Slots freed by eviction
//! are reused, so the table never grows past the peak number of open
//! windows.

use std::collections::HashMap;

use super::{Window, WindowHooks};

/// A window together with the callbacks of the app that owns it
#[derive(Debug)]
pub(crate) struct WindowRecord {
    pub window: Window,
    pub hooks: WindowHooks,
}

#[derive(Debug, Default)]
pub(crate) struct WindowTable {
    slots: Vec<Option<WindowRecord>>,
    free: Vec<usize>,
    index: HashMap<String, usize>,
}

impl WindowTable {
    pub fn insert(&mut self, record: WindowRecord) {
        let id = record.window.id.clone();
        if let Some(slot) = self.free.pop() {
            self.slots[slot] = Some(record);
            self.index.insert(id, slot);
        } else {
            self.slots.push(Some(record));
            self.index.insert(id, self.slots.len() - 1);
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<WindowRecord> {
        let slot = self.index.remove(id)?;
        self.free.push(slot);
        self.slots[slot].take()
    }

    pub fn get(&self, id: &str) -> Option<&WindowRecord> {
        let slot = *self.index.get(id)?;
        self.slots[slot].as_ref()
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut WindowRecord> {
        let slot = *self.index.get(id)?;
        self.slots[slot].as_mut()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WindowRecord> {
        self.slots.iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut WindowRecord> {
        self.slots.iter_mut().flatten()
    }

    /// Windows in the order they were opened
    pub fn in_open_order(&self) -> Vec<&Window> {
        let mut windows: Vec<&Window> = self.iter().map(|r| &r.window).collect();
        windows.sort_by_key(|w| w.open_seq);
        windows
    }
}
