//! File selection
//!
//! Payer file names embed their generation date in a capture group, e.g.
//! `277-AETNA60054-2024102113050000-001.277` with
//! `^277-AETNA60054-(\d{8})(\d{8})-(\d{3})\.277$` and the date in group 1.
//! Same-day files can be sequential deltas, so selection preserves arrival
//! order.

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

const DATE_FORMAT: &str = "%Y%m%d";

/// Returns the date embedded in `name`, if the name matches the pattern
///
/// The capture at `date_index` must start with an eight digit `YYYYMMDD`
/// date; any trailing digits are ignored.
pub fn embedded_date<'n>(name: &'n str, pattern: &Regex, date_index: usize) -> Option<(NaiveDate, &'n str)> {
    let captures = pattern.captures(name)?;
    let token = captures.get(date_index)?.as_str();
    let date = NaiveDate::parse_from_str(token.get(..8)?, DATE_FORMAT).ok()?;
    Some((date, token))
}

/// Selects the files dated `target_date`, oldest first
///
/// Names that do not match `pattern`, or whose date group is not a valid
/// date, are ignored. Results are sorted by the full date token, then by
/// name.
pub fn find_files_to_process(
    files: &[String],
    pattern: &Regex,
    target_date: NaiveDate,
    date_index: usize,
) -> Vec<String> {
    let mut selected: Vec<(&str, &str)> = files
        .iter()
        .filter_map(|name| {
            let (date, token) = embedded_date(name, pattern, date_index)?;
            (date == target_date).then_some((token, name.as_str()))
        })
        .collect();

    selected.sort_unstable();

    debug!(
        listed = files.len(),
        selected = selected.len(),
        target_date = %target_date,
        "Filtered file listing"
    );
    selected.into_iter().map(|(_, name)| name.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATTERN: &str = r"^277-AETNA60054-(\d{8})(\d{8})-(\d{3})\.277$";

    fn pattern() -> Regex {
        Regex::new(PATTERN).unwrap()
    }

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, DATE_FORMAT).unwrap()
    }

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_selects_target_date_only() {
        let files = names(&[
            "277-AETNA60054-2024102113050000-002.277",
            "277-AETNA60054-2024102009000000-001.277",
            "277-AETNA60054-2024102108000000-001.277",
            "277-AETNA60054-2024102108000000-001.277ebr",
        ]);

        let selected = find_files_to_process(&files, &pattern(), date("20241021"), 1);

        assert_eq!(
            selected,
            names(&[
                "277-AETNA60054-2024102108000000-001.277",
                "277-AETNA60054-2024102113050000-002.277",
            ])
        );
    }

    #[test]
    fn test_no_matches() {
        let files = names(&["README.txt", "277-AETNA60054-2024102108000000-001.277"]);
        assert!(find_files_to_process(&files, &pattern(), date("20240101"), 1).is_empty());
    }

    #[test]
    fn test_invalid_date_token_is_ignored() {
        let files = names(&["277-AETNA60054-2024139908000000-001.277"]);
        assert_eq!(embedded_date(&files[0], &pattern(), 1), None);
        assert!(find_files_to_process(&files, &pattern(), date("20241021"), 1).is_empty());
    }

    #[test]
    fn test_missing_capture_group_is_ignored() {
        let files = names(&["277-AETNA60054-2024102108000000-001.277"]);
        assert!(find_files_to_process(&files, &pattern(), date("20241021"), 7).is_empty());
    }

    #[test]
    fn test_longer_date_token_sorts_by_full_token() {
        let pattern = Regex::new(r"^X-(\d{14})\.277$").unwrap();
        let files = names(&["X-20241021235959.277", "X-20241021000001.277"]);

        let selected = find_files_to_process(&files, &pattern, date("20241021"), 1);
        assert_eq!(selected, names(&["X-20241021000001.277", "X-20241021235959.277"]));
    }
}
