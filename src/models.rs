use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// One user-editable record per calendar week, in its persisted shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekEntry {
    pub week_start: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deep_work_h: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub play_h: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_contacts_per_week: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alcohol_deviation_per_week: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_steps_per_day: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_fund_months: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline_actions_per_week: Option<f64>,
    #[serde(rename = "incomeJPY", skip_serializing_if = "Option::is_none")]
    pub income_jpy: Option<f64>,
    pub manual_red_flag: bool,
    pub payment_red_flag: bool,
    pub notes: String,
}

impl WeekEntry {
    pub fn empty(week_start: impl Into<String>) -> Self {
        Self {
            week_start: week_start.into(),
            ..Self::default()
        }
    }

    /// Absent values count as zero for scoring and streaks.
    pub fn value_or_zero(&self, field: NumericField) -> f64 {
        field.get(self).unwrap_or(0.0)
    }

    pub fn week_start_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.week_start, "%Y-%m-%d").ok()
    }
}

/// The nine numeric fields of a [`WeekEntry`], keyed by their JSON names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    DeepWorkH,
    PlayH,
    RealContactsPerWeek,
    SleepScore,
    AlcoholDeviationPerWeek,
    AvgStepsPerDay,
    EmergencyFundMonths,
    PipelineActionsPerWeek,
    IncomeJpy,
}

impl NumericField {
    pub const ALL: [NumericField; 9] = [
        NumericField::DeepWorkH,
        NumericField::PlayH,
        NumericField::RealContactsPerWeek,
        NumericField::SleepScore,
        NumericField::AlcoholDeviationPerWeek,
        NumericField::AvgStepsPerDay,
        NumericField::EmergencyFundMonths,
        NumericField::PipelineActionsPerWeek,
        NumericField::IncomeJpy,
    ];

    pub fn key(self) -> &'static str {
        match self {
            NumericField::DeepWorkH => "deepWorkH",
            NumericField::PlayH => "playH",
            NumericField::RealContactsPerWeek => "realContactsPerWeek",
            NumericField::SleepScore => "sleepScore",
            NumericField::AlcoholDeviationPerWeek => "alcoholDeviationPerWeek",
            NumericField::AvgStepsPerDay => "avgStepsPerDay",
            NumericField::EmergencyFundMonths => "emergencyFundMonths",
            NumericField::PipelineActionsPerWeek => "pipelineActionsPerWeek",
            NumericField::IncomeJpy => "incomeJPY",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    pub fn get(self, entry: &WeekEntry) -> Option<f64> {
        match self {
            NumericField::DeepWorkH => entry.deep_work_h,
            NumericField::PlayH => entry.play_h,
            NumericField::RealContactsPerWeek => entry.real_contacts_per_week,
            NumericField::SleepScore => entry.sleep_score,
            NumericField::AlcoholDeviationPerWeek => entry.alcohol_deviation_per_week,
            NumericField::AvgStepsPerDay => entry.avg_steps_per_day,
            NumericField::EmergencyFundMonths => entry.emergency_fund_months,
            NumericField::PipelineActionsPerWeek => entry.pipeline_actions_per_week,
            NumericField::IncomeJpy => entry.income_jpy,
        }
    }

    pub fn slot(self, entry: &mut WeekEntry) -> &mut Option<f64> {
        match self {
            NumericField::DeepWorkH => &mut entry.deep_work_h,
            NumericField::PlayH => &mut entry.play_h,
            NumericField::RealContactsPerWeek => &mut entry.real_contacts_per_week,
            NumericField::SleepScore => &mut entry.sleep_score,
            NumericField::AlcoholDeviationPerWeek => &mut entry.alcohol_deviation_per_week,
            NumericField::AvgStepsPerDay => &mut entry.avg_steps_per_day,
            NumericField::EmergencyFundMonths => &mut entry.emergency_fund_months,
            NumericField::PipelineActionsPerWeek => &mut entry.pipeline_actions_per_week,
            NumericField::IncomeJpy => &mut entry.income_jpy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    A,
    B,
    C,
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
        };
        f.write_str(letter)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoFlags {
    pub sleep: bool,
    pub contacts: bool,
    pub no_income: bool,
}

impl AutoFlags {
    pub fn any(&self) -> bool {
        self.sleep || self.contacts || self.no_income
    }
}

/// A [`WeekEntry`] enriched with its computed score, grade and flags.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedWeek {
    pub entry: WeekEntry,
    pub total_score: u8,
    pub grade: Grade,
    pub auto_flags: AutoFlags,
    pub overall_red_flag: bool,
    pub emoji_label: String,
}

impl DerivedWeek {
    /// Human-readable reasons behind `overall_red_flag`.
    pub fn flag_reasons(&self) -> Vec<&'static str> {
        let mut reasons = Vec::new();
        if self.entry.manual_red_flag {
            reasons.push("manual");
        }
        if self.entry.payment_red_flag {
            reasons.push("payment");
        }
        if self.auto_flags.sleep {
            reasons.push("low sleep streak");
        }
        if self.auto_flags.contacts {
            reasons.push("no contacts streak");
        }
        if self.auto_flags.no_income {
            reasons.push("no income streak");
        }
        reasons
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScorecardSummary {
    pub week_count: usize,
    pub avg_score: f64,
    pub grade_a: usize,
    pub grade_b: usize,
    pub grade_c: usize,
    pub flagged_weeks: usize,
}
