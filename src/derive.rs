use crate::flags::StreakState;
use crate::models::{AutoFlags, DerivedWeek, Grade, ScorecardSummary, WeekEntry};
use crate::ordering;
use crate::scoring;

/// Score, grade and flag every week in chronological order.
///
/// Streak counters start from zero on every call, so the output depends only
/// on `entries`. Any edit to an earlier week requires a full re-run.
pub fn derive(entries: &[WeekEntry]) -> Vec<DerivedWeek> {
    ordering::sorted(entries)
        .into_iter()
        .scan(StreakState::default(), |state, entry| {
            let (next, auto_flags) = state.advance(&entry);
            *state = next;
            Some(derive_week(entry, auto_flags))
        })
        .collect()
}

fn derive_week(entry: WeekEntry, auto_flags: AutoFlags) -> DerivedWeek {
    let total_score = scoring::total_score(&entry);
    let overall_red_flag = entry.manual_red_flag || entry.payment_red_flag || auto_flags.any();
    let grade = if overall_red_flag {
        Grade::C
    } else {
        scoring::base_grade(total_score)
    };

    DerivedWeek {
        entry,
        total_score,
        grade,
        auto_flags,
        overall_red_flag,
        emoji_label: emoji_label(grade, overall_red_flag),
    }
}

pub fn emoji_label(grade: Grade, red_flag: bool) -> String {
    let marker = match (red_flag, grade) {
        (true, _) => "🚩",
        (false, Grade::A) => "🟢",
        (false, Grade::B) => "🟡",
        (false, Grade::C) => "🔴",
    };
    format!("{marker} {grade}")
}

pub fn summarize(weeks: &[DerivedWeek]) -> ScorecardSummary {
    let count_grade = |grade: Grade| weeks.iter().filter(|w| w.grade == grade).count();
    let total: u32 = weeks.iter().map(|w| u32::from(w.total_score)).sum();

    ScorecardSummary {
        week_count: weeks.len(),
        avg_score: if weeks.is_empty() {
            0.0
        } else {
            total as f64 / weeks.len() as f64
        },
        grade_a: count_grade(Grade::A),
        grade_b: count_grade(Grade::B),
        grade_c: count_grade(Grade::C),
        flagged_weeks: weeks.iter().filter(|w| w.overall_red_flag).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn top_tier(week_start: &str) -> WeekEntry {
        WeekEntry {
            deep_work_h: Some(15.0),
            play_h: Some(8.0),
            real_contacts_per_week: Some(2.0),
            sleep_score: Some(8.0),
            alcohol_deviation_per_week: Some(0.0),
            avg_steps_per_day: Some(9000.0),
            emergency_fund_months: Some(12.0),
            pipeline_actions_per_week: Some(3.0),
            income_jpy: Some(400000.0),
            ..WeekEntry::empty(week_start)
        }
    }

    fn eight_weeks() -> Vec<WeekEntry> {
        [
            "2026-01-05",
            "2026-01-12",
            "2026-01-19",
            "2026-01-26",
            "2026-02-02",
            "2026-02-09",
            "2026-02-16",
            "2026-02-23",
        ]
        .iter()
        .map(|week| top_tier(week))
        .collect()
    }

    #[test]
    fn eighth_week_without_income_is_forced_to_c() {
        let entries: Vec<WeekEntry> = eight_weeks()
            .into_iter()
            .map(|entry| WeekEntry {
                income_jpy: Some(0.0),
                ..entry
            })
            .collect();

        let derived = derive(&entries);
        for week in &derived[..7] {
            assert!(!week.auto_flags.no_income);
            assert_eq!(week.grade, Grade::A);
            assert_eq!(week.emoji_label, "🟢 A");
        }
        let last = &derived[7];
        assert!(last.auto_flags.no_income);
        assert!(last.overall_red_flag);
        assert_eq!(last.total_score, 16);
        assert_eq!(last.grade, Grade::C);
        assert_eq!(last.emoji_label, "🚩 C");
    }

    #[test]
    fn manual_and_payment_flags_force_c() {
        let entries = vec![
            WeekEntry {
                manual_red_flag: true,
                ..top_tier("2026-01-05")
            },
            WeekEntry {
                payment_red_flag: true,
                ..top_tier("2026-01-12")
            },
            top_tier("2026-01-19"),
        ];
        let derived = derive(&entries);
        assert_eq!(derived[0].grade, Grade::C);
        assert_eq!(derived[1].grade, Grade::C);
        assert_eq!(derived[1].flag_reasons(), vec!["payment"]);
        assert_eq!(derived[2].grade, Grade::A);
        assert!(!derived[2].auto_flags.any());
    }

    #[test]
    fn unflagged_grades_follow_score_bands() {
        let b_week = WeekEntry {
            deep_work_h: Some(6.0),
            play_h: Some(2.0),
            emergency_fund_months: Some(6.0),
            pipeline_actions_per_week: Some(1.0),
            ..top_tier("2026-01-05")
        };
        let derived = derive(&[b_week]);
        assert_eq!(derived[0].total_score, 12);
        assert_eq!(derived[0].grade, Grade::B);
        assert_eq!(derived[0].emoji_label, "🟡 B");
    }

    #[test]
    fn empty_week_is_graded_c_without_flags() {
        let derived = derive(&[WeekEntry::empty("2026-01-05")]);
        assert_eq!(derived[0].total_score, 2);
        assert_eq!(derived[0].grade, Grade::C);
        assert!(!derived[0].overall_red_flag);
        assert_eq!(derived[0].emoji_label, "🔴 C");
    }

    #[test]
    fn derivation_is_ordered_and_repeatable() {
        let mut entries = eight_weeks();
        entries.reverse();
        let first = derive(&entries);
        let second = derive(&entries);
        assert_eq!(first, second);
        assert_eq!(first, derive(&ordering::sorted(&entries)));
        assert_eq!(first[0].entry.week_start, "2026-01-05");
    }

    #[test]
    fn summary_counts_grades_and_flags() {
        let entries = vec![
            top_tier("2026-01-05"),
            WeekEntry {
                manual_red_flag: true,
                ..top_tier("2026-01-12")
            },
        ];
        let summary = summarize(&derive(&entries));
        assert_eq!(summary.week_count, 2);
        assert_eq!(summary.grade_a, 1);
        assert_eq!(summary.grade_c, 1);
        assert_eq!(summary.flagged_weeks, 1);
        assert!((summary.avg_score - 16.0).abs() < 0.001);
    }
}
