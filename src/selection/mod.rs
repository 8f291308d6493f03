//! Deterministic verse-of-the-day selection.
//!
//! The free functions are pure: the same calendar day and the same list
//! always give the same item. `DailySelector` adds the per-day memo and a
//! clock for "today".

pub mod diagnostics;
pub mod formatting;
pub mod memo;
pub mod seed;

use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate};
use tracing::debug;

use crate::content::{ContentItem, ContentLibrary};
pub use diagnostics::{analyze_distribution, preview_from, DailyPreview, DistributionReport};
pub use formatting::{format_for_copy, get_reference};
pub use memo::{DayMemo, DEFAULT_MEMO_CAPACITY};
pub use seed::DateSeed;

/// Item for a calendar day. Falls back to the embedded item on an empty list.
pub fn select_for_date(date: NaiveDate, items: &[ContentItem]) -> ContentItem {
    pick(DateSeed::from_date(date), items)
}

/// Same algorithm keyed by a raw day ordinal (1-based) and year.
pub fn select_for_day_of_year(day_of_year: u32, year: i32, items: &[ContentItem]) -> ContentItem {
    pick(DateSeed::from_day_of_year(day_of_year, year), items)
}

fn pick(seed: DateSeed, items: &[ContentItem]) -> ContentItem {
    match seed.index(items.len()) {
        Some(index) => items[index].clone(),
        None => ContentItem::fallback(),
    }
}

/// Source of "today".
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always the same day. Useful for previews and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

pub struct DailySelector<C = LocalClock> {
    library: ContentLibrary,
    memo: DayMemo,
    clock: C,
}

impl DailySelector<LocalClock> {
    pub fn new(library: ContentLibrary) -> Self {
        Self::with_clock(library, LocalClock, DEFAULT_MEMO_CAPACITY)
    }
}

impl<C> DailySelector<C>
where
    C: Clock,
{
    pub fn with_clock(library: ContentLibrary, clock: C, memo_capacity: usize) -> Self {
        Self {
            library,
            memo: DayMemo::new(memo_capacity),
            clock,
        }
    }

    /// Memoized item for `date`, or for today when `date` is `None`.
    ///
    /// Repeated calls for the same day return the same shared value.
    pub fn get_daily_item(&self, date: Option<NaiveDate>) -> Arc<ContentItem> {
        let date = date.unwrap_or_else(|| self.clock.today());
        let key = date.format("%Y-%m-%d").to_string();

        if let Some(hit) = self.memo.get(&key) {
            return hit;
        }

        let item = select_for_date(date, self.library.items());
        debug!(day = %key, item_id = item.id, category = %item.category, "daily item selected");
        self.memo.insert(key, Arc::new(item))
    }

    pub fn select_for_date(&self, date: NaiveDate) -> ContentItem {
        select_for_date(date, self.library.items())
    }

    pub fn select_for_day_of_year(&self, day_of_year: u32, year: i32) -> ContentItem {
        select_for_day_of_year(day_of_year, year, self.library.items())
    }

    /// The next `days` mappings, today first.
    pub fn preview_next(&self, days: usize) -> Vec<DailyPreview> {
        preview_from(self.clock.today(), days, self.library.items())
    }

    /// Distribution over the first `days` ordinals of the current year.
    pub fn analyze_distribution(&self, days: u32) -> DistributionReport {
        analyze_distribution(self.clock.today().year(), days, self.library.items())
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn library(&self) -> &ContentLibrary {
        &self.library
    }

    pub fn memo(&self) -> &DayMemo {
        &self.memo
    }
}
