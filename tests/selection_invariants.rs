use chrono::{Datelike, NaiveDate};
use daily_verse_core::content::{ContentItem, FALLBACK_ITEM_ID};
use daily_verse_core::selection::{format_for_copy, get_reference, select_for_date, DateSeed};

fn items(n: u32) -> Vec<ContentItem> {
    (1..=n)
        .map(|id| ContentItem {
            id,
            text: format!("verse {id}"),
            collection_name: "Amsal".to_string(),
            major_division: 3,
            minor_division: id,
            category: if id % 2 == 0 { "wisdom" } else { "faith" }.to_string(),
        })
        .collect()
}

#[test]
fn invariant_same_day_same_item() {
    let list = items(31);
    let built = NaiveDate::from_ymd_opt(2026, 7, 4).unwrap();
    let parsed: NaiveDate = "2026-07-04".parse().unwrap();

    assert_eq!(select_for_date(built, &list), select_for_date(parsed, &list));
}

#[test]
fn invariant_empty_list_returns_fallback_every_day() {
    let start = NaiveDate::from_ymd_opt(2023, 12, 25).unwrap();
    for date in start.iter_days().take(400) {
        let selected = select_for_date(date, &[]);
        assert_eq!(selected.id, FALLBACK_ITEM_ID);
        assert_eq!(selected, ContentItem::fallback());
    }
}

#[test]
fn invariant_index_in_range() {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    for len in 1..=13usize {
        for date in start.iter_days().take(366) {
            let index = DateSeed::from_date(date).index(len).unwrap();
            assert!(index < len, "{date}: index {index} out of range for {len}");
        }
    }
}

#[test]
fn invariant_selected_item_comes_from_list() {
    let list = items(17);
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    for date in start.iter_days().take(365) {
        let selected = select_for_date(date, &list);
        assert!(list.contains(&selected));
        assert_eq!(date.year(), 2025);
    }
}

#[test]
fn invariant_single_item_list_always_selected() {
    let list = items(1);
    let start = NaiveDate::from_ymd_opt(1999, 12, 30).unwrap();
    for date in start.iter_days().take(10) {
        assert_eq!(select_for_date(date, &list).id, 1);
    }
}

#[test]
fn reference_formatting() {
    let item = ContentItem {
        id: 7,
        text: "Karena begitu besar kasih Allah".to_string(),
        collection_name: "Yohanes".to_string(),
        major_division: 3,
        minor_division: 16,
        category: "love".to_string(),
    };

    assert_eq!(get_reference(&item), "Yohanes 3:16");
    assert_eq!(
        format_for_copy(&item),
        "\"Karena begitu besar kasih Allah\"\n\n\u{2014} Yohanes 3:16"
    );
}

#[test]
fn reference_without_collection_is_empty() {
    let mut item = ContentItem::fallback();
    item.collection_name.clear();
    assert_eq!(get_reference(&item), "");
}

#[test]
fn fallback_item_reference() {
    assert_eq!(get_reference(&ContentItem::fallback()), "Yohanes 3:16");
}
