use std::io::Write;

use serde::Serialize;

use crate::models::{DerivedWeek, WeekEntry};
use crate::ordering;

/// The persisted/exported document: a JSON array of week entries.
pub fn entries_to_json(entries: &[WeekEntry]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&ordering::sorted(entries))?)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CsvRow<'a> {
    week_start: &'a str,
    deep_work_h: Option<f64>,
    play_h: Option<f64>,
    real_contacts_per_week: Option<f64>,
    sleep_score: Option<f64>,
    alcohol_deviation_per_week: Option<f64>,
    avg_steps_per_day: Option<f64>,
    emergency_fund_months: Option<f64>,
    pipeline_actions_per_week: Option<f64>,
    #[serde(rename = "incomeJPY")]
    income_jpy: Option<f64>,
    manual_red_flag: bool,
    payment_red_flag: bool,
    total_score: u8,
    grade: String,
    sleep_flag: bool,
    contacts_flag: bool,
    no_income_flag: bool,
    overall_red_flag: bool,
    emoji_label: &'a str,
    notes: &'a str,
}

impl<'a> From<&'a DerivedWeek> for CsvRow<'a> {
    fn from(week: &'a DerivedWeek) -> Self {
        let entry = &week.entry;
        CsvRow {
            week_start: &entry.week_start,
            deep_work_h: entry.deep_work_h,
            play_h: entry.play_h,
            real_contacts_per_week: entry.real_contacts_per_week,
            sleep_score: entry.sleep_score,
            alcohol_deviation_per_week: entry.alcohol_deviation_per_week,
            avg_steps_per_day: entry.avg_steps_per_day,
            emergency_fund_months: entry.emergency_fund_months,
            pipeline_actions_per_week: entry.pipeline_actions_per_week,
            income_jpy: entry.income_jpy,
            manual_red_flag: entry.manual_red_flag,
            payment_red_flag: entry.payment_red_flag,
            total_score: week.total_score,
            grade: week.grade.to_string(),
            sleep_flag: week.auto_flags.sleep,
            contacts_flag: week.auto_flags.contacts,
            no_income_flag: week.auto_flags.no_income,
            overall_red_flag: week.overall_red_flag,
            emoji_label: &week.emoji_label,
            notes: &entry.notes,
        }
    }
}

pub fn write_derived_csv<W: Write>(writer: W, weeks: &[DerivedWeek]) -> anyhow::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for week in weeks {
        csv_writer.serialize(CsvRow::from(week))?;
    }
    csv_writer.flush()?;
    Ok(())
}
