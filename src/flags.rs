use crate::models::{AutoFlags, NumericField, WeekEntry};

pub const LOW_SLEEP_MAX: f64 = 4.0;
pub const SLEEP_STREAK_THRESHOLD: u32 = 2;
pub const CONTACT_STREAK_THRESHOLD: u32 = 2;
pub const NO_INCOME_STREAK_THRESHOLD: u32 = 8;

/// Run lengths of consecutive failing weeks, threaded through one derivation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreakState {
    pub sleep: u32,
    pub contacts: u32,
    pub no_income: u32,
}

impl StreakState {
    /// Fold one week into the counters and report the flags for that week.
    pub fn advance(self, entry: &WeekEntry) -> (StreakState, AutoFlags) {
        let next = StreakState {
            sleep: run(
                self.sleep,
                entry.value_or_zero(NumericField::SleepScore) <= LOW_SLEEP_MAX,
            ),
            contacts: run(
                self.contacts,
                entry.value_or_zero(NumericField::RealContactsPerWeek) <= 0.0,
            ),
            no_income: run(
                self.no_income,
                entry.value_or_zero(NumericField::IncomeJpy) <= 0.0,
            ),
        };
        (next, next.flags())
    }

    pub fn flags(&self) -> AutoFlags {
        AutoFlags {
            sleep: self.sleep >= SLEEP_STREAK_THRESHOLD,
            contacts: self.contacts >= CONTACT_STREAK_THRESHOLD,
            no_income: self.no_income >= NO_INCOME_STREAK_THRESHOLD,
        }
    }
}

fn run(current: u32, failing: bool) -> u32 {
    if failing {
        current.saturating_add(1)
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(entries: &[WeekEntry]) -> Vec<AutoFlags> {
        entries
            .iter()
            .scan(StreakState::default(), |state, entry| {
                let (next, flags) = state.advance(entry);
                *state = next;
                Some(flags)
            })
            .collect()
    }

    fn week(day: u32, sleep: Option<f64>, contacts: Option<f64>, income: Option<f64>) -> WeekEntry {
        WeekEntry {
            sleep_score: sleep,
            real_contacts_per_week: contacts,
            income_jpy: income,
            ..WeekEntry::empty(format!("2026-01-{day:02}"))
        }
    }

    fn healthy(day: u32) -> WeekEntry {
        week(day, Some(8.0), Some(2.0), Some(300000.0))
    }

    #[test]
    fn second_low_sleep_week_is_flagged() {
        let entries = vec![
            week(5, Some(4.0), Some(2.0), Some(1.0)),
            week(12, Some(3.0), Some(2.0), Some(1.0)),
            week(19, Some(2.0), Some(2.0), Some(1.0)),
        ];
        let flags = detect(&entries);
        assert!(!flags[0].sleep);
        assert!(flags[1].sleep);
        assert!(flags[2].sleep);
    }

    #[test]
    fn recovery_week_resets_the_sleep_streak() {
        let entries = vec![
            week(5, Some(3.0), Some(2.0), Some(1.0)),
            week(12, Some(4.5), Some(2.0), Some(1.0)),
            week(19, Some(3.0), Some(2.0), Some(1.0)),
        ];
        assert!(detect(&entries).iter().all(|f| !f.sleep));
    }

    #[test]
    fn missing_contacts_count_as_zero() {
        let entries = vec![week(5, Some(8.0), None, Some(1.0)), week(12, Some(8.0), Some(0.0), Some(1.0))];
        let flags = detect(&entries);
        assert!(!flags[0].contacts);
        assert!(flags[1].contacts);
    }

    #[test]
    fn no_income_flag_needs_eight_weeks() {
        let entries: Vec<WeekEntry> = (1..=8)
            .map(|i| WeekEntry {
                income_jpy: if i % 2 == 0 { Some(0.0) } else { None },
                ..healthy(i)
            })
            .collect();
        let flags = detect(&entries);
        assert!(flags[..7].iter().all(|f| !f.no_income));
        assert!(flags[7].no_income);
    }

    #[test]
    fn counters_are_independent() {
        let (state, flags) = StreakState {
            sleep: 1,
            contacts: 1,
            no_income: 7,
        }
        .advance(&week(5, Some(2.0), Some(1.0), Some(0.0)));
        assert_eq!(
            state,
            StreakState {
                sleep: 2,
                contacts: 0,
                no_income: 8
            }
        );
        assert!(flags.sleep && !flags.contacts && flags.no_income);
    }

    #[test]
    fn detection_is_repeatable() {
        let entries = vec![
            week(5, None, None, None),
            week(12, None, None, None),
            healthy(19),
        ];
        assert_eq!(detect(&entries), detect(&entries));
        assert!(!detect(&entries)[2].any());
    }
}
