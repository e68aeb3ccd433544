//! Integration tests for the aggregation queries.

use chrono::{Duration, Utc};
use serde_json::json;
use sqlx::PgPool;

use fieldwatch_db::models::detection::NewDetection;
use fieldwatch_db::repositories::{AnalysisRepo, DetectionRepo};

async fn seed(pool: &PgPool, farmer: &str, device: Option<i64>, days_ago: i64, detections: serde_json::Value) {
    DetectionRepo::append(
        pool,
        &NewDetection {
            recorded_at: Utc::now() - Duration::days(days_ago),
            farmer_id: farmer.to_string(),
            device_id: device,
            detections,
            image_ref: None,
        },
    )
    .await
    .unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_store_aggregates_to_zero(pool: PgPool) {
    assert_eq!(AnalysisRepo::count_records(&pool, None, None).await.unwrap(), 0);
    assert!(AnalysisRepo::per_insect_totals(&pool, None, None)
        .await
        .unwrap()
        .is_empty());
    assert!(AnalysisRepo::top_insect(&pool, None, None).await.unwrap().is_none());
    assert!(AnalysisRepo::daily_insect_counts(&pool, "farmer_001", Utc::now() - Duration::days(7))
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn per_insect_totals_sum_across_records(pool: PgPool) {
    seed(&pool, "farmer_001", Some(1), 0, json!({"aphids": 3, "thrips": 2})).await;
    seed(&pool, "farmer_001", Some(1), 0, json!({"aphids": 4})).await;
    seed(&pool, "farmer_002", Some(2), 0, json!({"aphids": 100})).await;

    let totals = AnalysisRepo::per_insect_totals(&pool, Some("farmer_001"), None)
        .await
        .unwrap();

    // Ordered by label.
    assert_eq!(totals.len(), 2);
    assert_eq!(totals[0].insect, "aphids");
    assert_eq!(totals[0].total, 7);
    assert_eq!(totals[1].insect, "thrips");
    assert_eq!(totals[1].total, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn device_filter_scopes_totals(pool: PgPool) {
    seed(&pool, "farmer_001", Some(1), 0, json!({"aphids": 3})).await;
    seed(&pool, "farmer_001", Some(2), 0, json!({"aphids": 5})).await;

    let totals = AnalysisRepo::per_insect_totals(&pool, None, Some(2)).await.unwrap();
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].total, 5);

    assert_eq!(
        AnalysisRepo::count_records(&pool, None, Some(2)).await.unwrap(),
        1
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn top_insect_prefers_highest_total_then_label(pool: PgPool) {
    seed(&pool, "farmer_001", None, 0, json!({"thrips": 5, "aphids": 5, "beetle": 1})).await;

    let top = AnalysisRepo::top_insect(&pool, Some("farmer_001"), None)
        .await
        .unwrap()
        .expect("records exist");
    // Tie between aphids and thrips breaks to the lexicographically first.
    assert_eq!(top.insect, "aphids");
    assert_eq!(top.total, 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn daily_counts_bucket_by_calendar_date(pool: PgPool) {
    seed(&pool, "farmer_001", None, 2, json!({"aphids": 3})).await;
    seed(&pool, "farmer_001", None, 2, json!({"aphids": 1})).await;
    seed(&pool, "farmer_001", None, 0, json!({"thrips": 2})).await;
    // Outside the window.
    seed(&pool, "farmer_001", None, 30, json!({"aphids": 50})).await;

    let rows = AnalysisRepo::daily_insect_counts(
        &pool,
        "farmer_001",
        Utc::now() - Duration::days(6),
    )
    .await
    .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].insect, "aphids");
    assert_eq!(rows[0].total, 4, "same-day rows accumulate");
    assert_eq!(rows[1].insect, "thrips");
    assert_eq!(rows[1].total, 2);
    assert!(rows[0].day < rows[1].day);
}
