use std::fmt::Write;

use crate::derive;
use crate::models::DerivedWeek;
use crate::scoring;

pub fn build_report(weeks: &[DerivedWeek]) -> String {
    let summary = derive::summarize(weeks);
    let mut output = String::new();

    let _ = writeln!(output, "# Weekly Scorecard Report");
    match (weeks.first(), weeks.last()) {
        (Some(first), Some(last)) => {
            let _ = writeln!(
                output,
                "Covering {} weeks from {} to {}",
                summary.week_count, first.entry.week_start, last.entry.week_start
            );
        }
        _ => {
            let _ = writeln!(output, "No weeks recorded.");
        }
    }
    let _ = writeln!(output);
    let _ = writeln!(output, "## Grade Mix");
    let _ = writeln!(
        output,
        "- A: {} / B: {} / C: {} (average score {:.1} of {})",
        summary.grade_a,
        summary.grade_b,
        summary.grade_c,
        summary.avg_score,
        scoring::MAX_TOTAL_SCORE
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Red Flags");
    let flagged: Vec<&DerivedWeek> = weeks.iter().filter(|w| w.overall_red_flag).collect();
    if flagged.is_empty() {
        let _ = writeln!(output, "No red flags raised.");
    } else {
        for week in flagged {
            let _ = writeln!(
                output,
                "- {} {}: {}",
                week.entry.week_start,
                week.emoji_label,
                week.flag_reasons().join(", ")
            );
        }
    }

    if let Some(latest) = weeks.last() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Latest Week ({})", latest.entry.week_start);
        let _ = writeln!(
            output,
            "Score {} of {}, {}",
            latest.total_score,
            scoring::MAX_TOTAL_SCORE,
            latest.emoji_label
        );
        for (field, points) in scoring::score_breakdown(&latest.entry) {
            let value = field
                .get(&latest.entry)
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(output, "- {}: {} ({} pts)", field.key(), value, points);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Notes");
    let noted: Vec<&DerivedWeek> = weeks
        .iter()
        .rev()
        .filter(|w| !w.entry.notes.trim().is_empty())
        .take(5)
        .collect();
    if noted.is_empty() {
        let _ = writeln!(output, "No notes recorded.");
    } else {
        for week in noted {
            let _ = writeln!(output, "- {}: {}", week.entry.week_start, week.entry.notes);
        }
    }

    output
}

/// Fixed-width table for the terminal, newest weeks last.
pub fn build_table(weeks: &[DerivedWeek]) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "{:<12} {:>5} {:<6} {}",
        "week", "score", "grade", "flags"
    );
    for week in weeks {
        let reasons = week.flag_reasons();
        let _ = writeln!(
            output,
            "{:<12} {:>5} {:<6} {}",
            week.entry.week_start,
            week.total_score,
            week.emoji_label,
            if reasons.is_empty() {
                "-".to_string()
            } else {
                reasons.join(", ")
            }
        );
    }
    output
}
