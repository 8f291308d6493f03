use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, PoisonError, RwLock};

use crate::content::ContentItem;

/// Default number of calendar days kept.
pub const DEFAULT_MEMO_CAPACITY: usize = 100;

/// Per-day memo of selected items.
///
/// Keys are calendar-day strings (`YYYY-MM-DD`), so a key can never alias
/// another day. Bounded; the oldest inserted day is evicted first.
#[derive(Debug)]
pub struct DayMemo {
    capacity: usize,
    inner: RwLock<MemoInner>,
}

#[derive(Debug, Default)]
struct MemoInner {
    order: VecDeque<String>,
    entries: HashMap<String, Arc<ContentItem>>,
}

impl DayMemo {
    pub fn new(capacity: usize) -> Self {
        DayMemo {
            capacity: capacity.max(1),
            inner: RwLock::new(MemoInner::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, key: &str) -> Option<Arc<ContentItem>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.entries.get(key).cloned()
    }

    /// Insert unless present; returns whichever value ends up stored.
    pub fn insert(&self, key: String, item: Arc<ContentItem>) -> Arc<ContentItem> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = inner.entries.get(&key) {
            return Arc::clone(existing);
        }

        while inner.order.len() >= self.capacity {
            match inner.order.pop_front() {
                Some(oldest) => {
                    inner.entries.remove(&oldest);
                }
                None => break,
            }
        }

        inner.order.push_back(key.clone());
        inner.entries.insert(key, Arc::clone(&item));
        item
    }

    pub fn contains(&self, key: &str) -> bool {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.order.clear();
        inner.entries.clear();
    }
}

impl Default for DayMemo {
    fn default() -> Self {
        Self::new(DEFAULT_MEMO_CAPACITY)
    }
}
