use std::cmp::Ordering;

use crate::models::WeekEntry;

/// ISO `YYYY-MM-DD` strings sort chronologically as plain strings.
pub fn compare_weeks(a: &WeekEntry, b: &WeekEntry) -> Ordering {
    a.week_start.cmp(&b.week_start)
}

pub fn sort_entries(entries: &mut [WeekEntry]) {
    entries.sort_by(compare_weeks);
}

pub fn sorted(entries: &[WeekEntry]) -> Vec<WeekEntry> {
    let mut copy = entries.to_vec();
    sort_entries(&mut copy);
    copy
}

pub fn is_sorted(entries: &[WeekEntry]) -> bool {
    entries
        .windows(2)
        .all(|pair| compare_weeks(&pair[0], &pair[1]) != Ordering::Greater)
}
