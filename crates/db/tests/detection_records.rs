//! Integration tests for the append-only record store.

use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;

use fieldwatch_db::models::detection::NewDetection;
use fieldwatch_db::repositories::DetectionRepo;

fn new_record(farmer_id: &str, device_id: Option<i64>, detections: serde_json::Value) -> NewDetection {
    NewDetection {
        recorded_at: Utc::now(),
        farmer_id: farmer_id.to_string(),
        device_id,
        detections,
        image_ref: None,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn append_returns_the_stored_row(pool: PgPool) {
    let record = DetectionRepo::append(
        &pool,
        &new_record("farmer_001", Some(7), json!({"aphids": 3, "thrips": 2})),
    )
    .await
    .unwrap();

    assert_eq!(record.farmer_id, "farmer_001");
    assert_eq!(record.device_id, Some(7));
    assert_eq!(record.detections, json!({"aphids": 3, "thrips": 2}));
    assert!(record.image_ref.is_none());

    let map = record.detection_map();
    assert_eq!(map.get("aphids"), Some(&3));
    assert_eq!(map.get("thrips"), Some(&2));

    let found = DetectionRepo::find_by_id(&pool, record.id)
        .await
        .unwrap()
        .expect("record should resolve by id");
    assert_eq!(found.detections, record.detections);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn records_without_a_device_are_allowed(pool: PgPool) {
    // Manual/admin-linked uploads carry no device attribution.
    let record = DetectionRepo::append(&pool, &new_record("farmer_001", None, json!({"beetle": 1})))
        .await
        .unwrap();
    assert_eq!(record.device_id, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn orphaned_tenant_references_are_accepted(pool: PgPool) {
    // No farmers row exists for this tenant; the store is permissive.
    let record = DetectionRepo::append(&pool, &new_record("ghost_tenant", None, json!({})))
        .await
        .unwrap();
    assert_eq!(record.farmer_id, "ghost_tenant");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_tenant_and_device(pool: PgPool) {
    DetectionRepo::append(&pool, &new_record("farmer_001", Some(1), json!({"aphids": 1})))
        .await
        .unwrap();
    DetectionRepo::append(&pool, &new_record("farmer_001", Some(2), json!({"aphids": 2})))
        .await
        .unwrap();
    DetectionRepo::append(&pool, &new_record("farmer_002", Some(3), json!({"aphids": 4})))
        .await
        .unwrap();

    let all = DetectionRepo::list(&pool, None, None, 50, 0).await.unwrap();
    assert_eq!(all.len(), 3);

    let by_farmer = DetectionRepo::list(&pool, Some("farmer_001"), None, 50, 0)
        .await
        .unwrap();
    assert_eq!(by_farmer.len(), 2);

    let by_device = DetectionRepo::list(&pool, None, Some(3), 50, 0).await.unwrap();
    assert_eq!(by_device.len(), 1);
    assert_eq!(by_device[0].farmer_id, "farmer_002");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_is_newest_first_and_paginated(pool: PgPool) {
    for i in 0..5 {
        DetectionRepo::append(&pool, &new_record("farmer_001", None, json!({"aphids": i + 1})))
            .await
            .unwrap();
    }

    let first_page = DetectionRepo::list(&pool, Some("farmer_001"), None, 2, 0)
        .await
        .unwrap();
    assert_eq!(first_page.len(), 2);
    // Same-timestamp rows fall back to id order, so the newest insert leads.
    assert!(first_page[0].id > first_page[1].id);

    let second_page = DetectionRepo::list(&pool, Some("farmer_001"), None, 2, 2)
        .await
        .unwrap();
    assert_eq!(second_page.len(), 2);
    assert!(second_page[0].id < first_page[1].id);
}
