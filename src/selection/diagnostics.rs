use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::content::ContentItem;
use crate::selection::{select_for_date, select_for_day_of_year};

/// One upcoming day and the item it will show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPreview {
    pub date: NaiveDate,
    pub item: ContentItem,
}

/// Spread of selections over a simulated range of days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionReport {
    pub year: i32,
    pub days_simulated: u32,
    pub total_items: usize,
    pub distinct_items: usize,
    /// `distinct_items / total_items`, 0.0 for an empty list.
    pub coverage: f64,
    /// Days that repeated an item already shown earlier in the range.
    pub duplicates: u32,
    pub category_histogram: BTreeMap<String, u32>,
}

/// `days` consecutive mappings starting at `start` (inclusive).
pub fn preview_from(start: NaiveDate, days: usize, items: &[ContentItem]) -> Vec<DailyPreview> {
    start
        .iter_days()
        .take(days)
        .map(|date| DailyPreview {
            date,
            item: select_for_date(date, items),
        })
        .collect()
}

/// Simulate day ordinals `1..=days` of `year`.
pub fn analyze_distribution(year: i32, days: u32, items: &[ContentItem]) -> DistributionReport {
    let mut seen = BTreeSet::new();
    let mut category_histogram = BTreeMap::new();

    for ordinal in 1..=days {
        let item = select_for_day_of_year(ordinal, year, items);
        seen.insert(item.id);
        *category_histogram.entry(item.category).or_insert(0) += 1;
    }

    let distinct_items = seen.len();
    let coverage = if items.is_empty() {
        0.0
    } else {
        distinct_items as f64 / items.len() as f64
    };

    DistributionReport {
        year,
        days_simulated: days,
        total_items: items.len(),
        distinct_items,
        coverage,
        duplicates: days.saturating_sub(distinct_items as u32),
        category_histogram,
    }
}
