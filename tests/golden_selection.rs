use chrono::NaiveDate;
use daily_verse_core::content::ContentItem;
use daily_verse_core::selection::{select_for_date, select_for_day_of_year, DateSeed};

fn item(id: u32, text: &str) -> ContentItem {
    ContentItem {
        id,
        text: text.to_string(),
        collection_name: "Mazmur".to_string(),
        major_division: 23,
        minor_division: id,
        category: "peace".to_string(),
    }
}

fn abc() -> Vec<ContentItem> {
    vec![item(1, "A"), item(2, "B"), item(3, "C")]
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn golden_end_to_end_leap_year_march_first() {
    let date = day(2024, 3, 1);
    let seed = DateSeed::from_date(date);

    assert_eq!(seed.year, 2024);
    assert_eq!(seed.day_of_year, 61);
    assert_eq!(seed.seed, 2_024_061);
    assert_eq!(seed.mixed, 62_761_096);
    assert_eq!(seed.scrambled, 1_937_683_015);
    assert_eq!(seed.index(3), Some(1));

    let items = abc();
    let first = select_for_date(date, &items);
    assert_eq!(first.text, "B");

    for _ in 0..10 {
        assert_eq!(select_for_date(date, &items), first);
    }
}

#[test]
fn golden_indices_for_fixed_dates() {
    let cases = [
        (day(2024, 1, 1), 3, 2),
        (day(2024, 12, 31), 3, 1),
        (day(2023, 3, 1), 3, 0),
        (day(2000, 2, 29), 3, 1),
        (day(2024, 12, 31), 5, 4),
        (day(2025, 10, 16), 7, 1),
    ];

    for (date, len, expected) in cases {
        assert_eq!(
            DateSeed::from_date(date).index(len),
            Some(expected),
            "index for {date} over {len} items"
        );
    }
}

#[test]
fn golden_day_of_year_matches_date_path() {
    let items = abc();
    assert_eq!(
        select_for_day_of_year(61, 2024, &items),
        select_for_date(day(2024, 3, 1), &items)
    );
    // Ordinal 61 is March 2nd outside leap years
    assert_eq!(
        select_for_day_of_year(61, 2023, &items),
        select_for_date(day(2023, 3, 2), &items)
    );
}
