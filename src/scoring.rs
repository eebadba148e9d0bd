use crate::models::{Grade, NumericField, WeekEntry};

pub const MAX_TOTAL_SCORE: u8 = 16;
pub const GRADE_A_MIN: u8 = 13;
pub const GRADE_B_MIN: u8 = 8;

pub fn score_deep_work(hours: f64) -> u8 {
    tiered(hours, 12.0, 6.0)
}

pub fn score_play(hours: f64) -> u8 {
    tiered(hours, 6.0, 2.0)
}

pub fn score_real_contacts(contacts: f64) -> u8 {
    tiered(contacts, 1.0, 0.5)
}

pub fn score_sleep(score: f64) -> u8 {
    tiered(score, 7.0, 5.0)
}

/// Exact matches only: zero deviations scores 2, exactly one scores 1.
pub fn score_alcohol_deviation(events: f64) -> u8 {
    if events == 0.0 {
        2
    } else if events == 1.0 {
        1
    } else {
        0
    }
}

pub fn score_steps(steps_per_day: f64) -> u8 {
    tiered(steps_per_day, 7000.0, 4000.0)
}

pub fn score_emergency_fund(months: f64) -> u8 {
    tiered(months, 12.0, 6.0)
}

pub fn score_pipeline(actions: f64) -> u8 {
    tiered(actions, 2.0, 1.0)
}

fn tiered(value: f64, full: f64, partial: f64) -> u8 {
    if value >= full {
        2
    } else if value >= partial {
        1
    } else {
        0
    }
}

/// The eight scored fields with their rule. Income is not scored.
pub const SCORED_FIELDS: [(NumericField, fn(f64) -> u8); 8] = [
    (NumericField::DeepWorkH, score_deep_work),
    (NumericField::PlayH, score_play),
    (NumericField::RealContactsPerWeek, score_real_contacts),
    (NumericField::SleepScore, score_sleep),
    (NumericField::AlcoholDeviationPerWeek, score_alcohol_deviation),
    (NumericField::AvgStepsPerDay, score_steps),
    (NumericField::EmergencyFundMonths, score_emergency_fund),
    (NumericField::PipelineActionsPerWeek, score_pipeline),
];

pub fn score_breakdown(entry: &WeekEntry) -> Vec<(NumericField, u8)> {
    SCORED_FIELDS
        .iter()
        .map(|(field, rule)| (*field, rule(entry.value_or_zero(*field))))
        .collect()
}

pub fn total_score(entry: &WeekEntry) -> u8 {
    score_breakdown(entry).iter().map(|(_, points)| points).sum()
}

pub fn base_grade(total: u8) -> Grade {
    match total {
        t if t >= GRADE_A_MIN => Grade::A,
        t if t >= GRADE_B_MIN => Grade::B,
        _ => Grade::C,
    }
}
