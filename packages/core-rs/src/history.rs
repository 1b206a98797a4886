use crate::types::ScanHistoryItem;
use std::collections::VecDeque;

// Most recent first. Prepend only, never persisted.
#[derive(Debug, Default)]
pub struct SessionHistory {
    items: VecDeque<ScanHistoryItem>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, item: ScanHistoryItem) {
        self.items.push_front(item);
    }

    pub fn all(&self) -> Vec<ScanHistoryItem> {
        self.items.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScanHistoryItem> {
        self.items.iter()
    }

    pub fn latest(&self) -> Option<&ScanHistoryItem> {
        self.items.front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
