//! Property tests for payer file selection

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use regex::Regex;
use std::collections::BTreeSet;

use edi_ingestion::find_files_to_process;

const PATTERN: &str = r"^277-AETNA60054-(\d{8})(\d{8})-(\d{3})\.277$";

fn target_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, 21).unwrap()
}

fn file_name(day_offset: i64, time: u32, sequence: u32) -> String {
    let date = target_date() + Duration::days(day_offset);
    format!("277-AETNA60054-{}{:08}-{:03}.277", date.format("%Y%m%d"), time, sequence)
}

fn listing_strategy() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set(
        (-2i64..=2, 0u32..24_000_000, 0u32..1000).prop_map(|(d, t, s)| file_name(d, t, s)),
        0..30,
    )
}

proptest! {
    #[test]
    fn prop_selects_exactly_the_target_day_in_order(names in listing_strategy()) {
        let pattern = Regex::new(PATTERN).unwrap();
        let target_token = target_date().format("%Y%m%d").to_string();
        let listing: Vec<String> = names.iter().cloned().collect();

        let selected = find_files_to_process(&listing, &pattern, target_date(), 1);

        let expected: Vec<String> = names
            .iter()
            .filter(|name| name[15..23] == target_token)
            .cloned()
            .collect();
        prop_assert_eq!(selected, expected);
    }

    #[test]
    fn prop_listing_order_does_not_matter(names in listing_strategy()) {
        let pattern = Regex::new(PATTERN).unwrap();
        let forward: Vec<String> = names.iter().cloned().collect();
        let reversed: Vec<String> = names.iter().rev().cloned().collect();

        prop_assert_eq!(
            find_files_to_process(&forward, &pattern, target_date(), 1),
            find_files_to_process(&reversed, &pattern, target_date(), 1)
        );
    }

    #[test]
    fn prop_non_matching_names_are_ignored(suffix in "[a-z]{1,4}", names in listing_strategy()) {
        let pattern = Regex::new(PATTERN).unwrap();
        let listing: Vec<String> = names.iter().map(|name| format!("{}{}", name, suffix)).collect();

        prop_assert!(find_files_to_process(&listing, &pattern, target_date(), 1).is_empty());
    }
}
