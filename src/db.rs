use std::str::FromStr;

use anyhow::Context;
use chrono::{Duration, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};

use crate::models::WeekEntry;
use crate::ordering;
use crate::scorecard;

pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("invalid database url {database_url}"))?
        .create_if_missing(true);

    // one writer keeps whole-document saves serialized
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .context("failed to open the scorecard database")?;
    Ok(pool)
}

pub async fn init_db(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Raw stored document for `key`, if one was ever saved.
pub async fn load(pool: &SqlitePool, key: &str) -> anyhow::Result<Option<String>> {
    let row = sqlx::query("SELECT value FROM scorecard_store WHERE key = ?1")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| row.get::<String, _>("value")))
}

/// Replace the stored document with the full, sorted collection.
pub async fn save(pool: &SqlitePool, key: &str, entries: &[WeekEntry]) -> anyhow::Result<()> {
    let document = serde_json::to_string(&ordering::sorted(entries))?;

    let mut tx = pool.begin().await?;
    sqlx::query(
        r#"
        INSERT INTO scorecard_store (key, value, updated_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT (key) DO UPDATE
        SET value = excluded.value, updated_at = excluded.updated_at
        "#,
    )
    .bind(key)
    .bind(&document)
    .bind(Utc::now().to_rfc3339())
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    tracing::debug!(key, weeks = entries.len(), "scorecard saved");
    Ok(())
}

pub fn seed_entries(today: NaiveDate) -> Vec<WeekEntry> {
    let current = scorecard::week_start_for(today);
    let week = |weeks_ago: i64| scorecard::week_label(current - Duration::weeks(weeks_ago));

    vec![
        WeekEntry {
            deep_work_h: Some(14.0),
            play_h: Some(5.0),
            real_contacts_per_week: Some(2.0),
            sleep_score: Some(7.5),
            alcohol_deviation_per_week: Some(0.0),
            avg_steps_per_day: Some(8200.0),
            emergency_fund_months: Some(9.0),
            pipeline_actions_per_week: Some(3.0),
            income_jpy: Some(320000.0),
            notes: "Shipped the client proposal".to_string(),
            ..WeekEntry::empty(week(3))
        },
        WeekEntry {
            deep_work_h: Some(9.0),
            play_h: Some(2.5),
            real_contacts_per_week: Some(1.0),
            sleep_score: Some(4.0),
            alcohol_deviation_per_week: Some(1.0),
            avg_steps_per_day: Some(5100.0),
            emergency_fund_months: Some(9.0),
            pipeline_actions_per_week: Some(1.0),
            income_jpy: Some(0.0),
            notes: "Travel, short nights".to_string(),
            ..WeekEntry::empty(week(2))
        },
        WeekEntry {
            deep_work_h: Some(7.0),
            play_h: Some(1.0),
            real_contacts_per_week: Some(0.0),
            sleep_score: Some(3.5),
            alcohol_deviation_per_week: Some(2.0),
            avg_steps_per_day: Some(3800.0),
            emergency_fund_months: Some(8.5),
            pipeline_actions_per_week: Some(0.0),
            income_jpy: Some(0.0),
            payment_red_flag: true,
            notes: "Invoice overdue".to_string(),
            ..WeekEntry::empty(week(1))
        },
        WeekEntry {
            deep_work_h: Some(12.0),
            play_h: Some(6.0),
            real_contacts_per_week: Some(1.0),
            sleep_score: Some(7.0),
            alcohol_deviation_per_week: Some(0.0),
            avg_steps_per_day: Some(7000.0),
            emergency_fund_months: Some(8.5),
            pipeline_actions_per_week: Some(2.0),
            income_jpy: Some(180000.0),
            ..WeekEntry::empty(week(0))
        },
    ]
}

pub async fn seed(pool: &SqlitePool, key: &str, today: NaiveDate) -> anyhow::Result<usize> {
    let entries = seed_entries(today);
    save(pool, key, &entries).await?;
    Ok(entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize;

    async fn memory_pool() -> SqlitePool {
        let pool = connect("sqlite::memory:").await.unwrap();
        init_db(&pool).await.unwrap();
        pool
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 4).unwrap()
    }

    #[tokio::test]
    async fn missing_key_loads_nothing() {
        let pool = memory_pool().await;
        assert_eq!(load(&pool, "weekly-scorecard").await.unwrap(), None);
    }

    #[tokio::test]
    async fn saved_document_round_trips_through_sanitize() {
        let pool = memory_pool().await;
        let mut entries = seed_entries(today());
        entries.reverse();
        save(&pool, "weekly-scorecard", &entries).await.unwrap();

        let stored = load(&pool, "weekly-scorecard").await.unwrap().unwrap();
        let restored = sanitize::parse_document(&stored).unwrap();
        assert_eq!(restored, ordering::sorted(&entries));
    }

    #[tokio::test]
    async fn saving_again_replaces_the_document() {
        let pool = memory_pool().await;
        seed(&pool, "weekly-scorecard", today()).await.unwrap();
        save(&pool, "weekly-scorecard", &[WeekEntry::empty("2026-02-02")])
            .await
            .unwrap();

        let stored = load(&pool, "weekly-scorecard").await.unwrap().unwrap();
        let restored = sanitize::parse_document(&stored).unwrap();
        assert_eq!(restored, vec![WeekEntry::empty("2026-02-02")]);
    }

    #[test]
    fn seed_weeks_end_at_the_current_week() {
        let entries = seed_entries(today());
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].week_start, "2026-01-12");
        assert_eq!(entries[3].week_start, "2026-02-02");
        assert!(ordering::is_sorted(&entries));
    }
}
