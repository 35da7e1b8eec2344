#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Integration tests for the `RecordStore` implementation of `SqliteStore`.

use std::time::Duration;

use zonesync_app::adapters::SqliteStore;
use zonesync_core::error::CoreError;
use zonesync_core::traits::RecordStore;
use zonesync_core::types::{NewRecord, NewZone, RecordChanges, Zone};
use zonesync_provider::{DnsRecordType, ProviderConfig, SnapshotRecord, ZoneSnapshot};

// ===== Helpers =====

async fn create_test_store() -> (SqliteStore, tempfile::TempDir) {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let db_path = tmp.path().join("test.db");
    let store = SqliteStore::new(&db_path)
        .await
        .expect("failed to create SqliteStore");
    (store, tmp)
}

fn bind_config(apikey: &str) -> ProviderConfig {
    ProviderConfig::new("Bind")
        .with_apikey(apikey)
        .with_option("bindip", "192.168.1.100")
}

fn new_zone(name: &str, config: ProviderConfig) -> NewZone {
    NewZone {
        client_id: 7,
        domain_name: name.to_string(),
        provider_config: config,
        remote_zone_id: None,
    }
}

fn new_record(zone: &Zone, host: &str, value: &str) -> NewRecord {
    NewRecord {
        zone_id: zone.id,
        remote_record_id: None,
        record_type: DnsRecordType::A,
        host: host.to_string(),
        value: value.to_string(),
        ttl: 3600,
        priority: None,
    }
}

async fn seed_zone(store: &SqliteStore, name: &str) -> Zone {
    store
        .upsert_zone(&new_zone(name, bind_config("user:pass")))
        .await
        .unwrap()
}

// ===== Schema =====

#[tokio::test]
async fn new_creates_parent_directories() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("nested").join("dir").join("zones.db");

    let store = SqliteStore::new(&db_path).await.unwrap();
    assert!(db_path.exists());
    assert!(store.list_zones().await.unwrap().is_empty());
}

#[tokio::test]
async fn data_survives_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("zones.db");

    {
        let store = SqliteStore::new(&db_path).await.unwrap();
        let zone = seed_zone(&store, "example.com").await;
        store
            .insert_record(&new_record(&zone, "www", "10.0.0.1"))
            .await
            .unwrap();
    }

    let store = SqliteStore::new(&db_path).await.unwrap();
    let zone = store.find_zone_by_name("example.com").await.unwrap().unwrap();
    assert_eq!(store.list_records(zone.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn uninstall_drops_tables_and_install_recreates_them() {
    let (store, _tmp) = create_test_store().await;
    seed_zone(&store, "example.com").await;

    store.uninstall().await.unwrap();
    let err = store.list_zones().await.unwrap_err();
    assert!(matches!(err, CoreError::StorageError(_)));

    store.install().await.unwrap();
    assert!(store.list_zones().await.unwrap().is_empty());
}

#[tokio::test]
async fn install_is_idempotent() {
    let (store, _tmp) = create_test_store().await;
    seed_zone(&store, "example.com").await;

    store.install().await.unwrap();
    assert_eq!(store.list_zones().await.unwrap().len(), 1);
}

#[tokio::test]
async fn from_connection_leaves_schema_to_install() {
    let tmp = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", tmp.path().join("conn.db").display());
    let db = sea_orm::Database::connect(&url).await.unwrap();

    let store = SqliteStore::from_connection(db);
    assert!(store.list_zones().await.is_err());

    store.install().await.unwrap();
    seed_zone(&store, "example.com").await;
    assert_eq!(store.list_zones().await.unwrap().len(), 1);
}

// ===== Zones =====

#[tokio::test]
async fn zone_fields_round_trip() {
    let (store, _tmp) = create_test_store().await;
    let mut input = new_zone("example.com", bind_config("user:pass"));
    input.remote_zone_id = Some("zone-1".to_string());

    let zone = store.upsert_zone(&input).await.unwrap();
    assert!(zone.id > 0);
    assert_eq!(zone.client_id, 7);
    assert_eq!(zone.provider_id(), "Bind");
    assert_eq!(zone.remote_zone_id.as_deref(), Some("zone-1"));
    assert_eq!(zone.snapshot, None);
    assert_eq!(zone.created_at, zone.updated_at);

    let found = store.find_zone_by_name("example.com").await.unwrap().unwrap();
    assert_eq!(found, zone);
    assert_eq!(found.provider_config.option("bindip"), Some("192.168.1.100"));
}

#[tokio::test]
async fn upsert_keeps_one_row_per_domain() {
    let (store, _tmp) = create_test_store().await;
    let first = seed_zone(&store, "example.com").await;

    tokio::time::sleep(Duration::from_millis(5)).await;
    let mut again = new_zone("example.com", bind_config("other:secret"));
    again.client_id = 99;
    again.remote_zone_id = Some("zone-2".to_string());
    let second = store.upsert_zone(&again).await.unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.client_id, first.client_id);
    assert_eq!(second.created_at, first.created_at);
    assert!(second.updated_at > first.updated_at);
    assert_eq!(second.provider_config.apikey.as_deref(), Some("other:secret"));
    assert_eq!(second.remote_zone_id.as_deref(), Some("zone-2"));
    assert_eq!(store.list_zones().await.unwrap().len(), 1);
}

#[tokio::test]
async fn list_zones_orders_by_id() {
    let (store, _tmp) = create_test_store().await;
    seed_zone(&store, "c.com").await;
    seed_zone(&store, "a.com").await;
    seed_zone(&store, "b.com").await;

    let names: Vec<_> = store
        .list_zones()
        .await
        .unwrap()
        .into_iter()
        .map(|z| z.domain_name)
        .collect();
    assert_eq!(names, vec!["c.com", "a.com", "b.com"]);
}

#[tokio::test]
async fn find_unknown_zone_is_none() {
    let (store, _tmp) = create_test_store().await;
    assert!(store.find_zone_by_name("missing.com").await.unwrap().is_none());
}

#[tokio::test]
async fn snapshot_update_is_stored_and_advances_updated_at() {
    let (store, _tmp) = create_test_store().await;
    let zone = seed_zone(&store, "example.com").await;
    let snapshot = ZoneSnapshot {
        name: "example.com".to_string(),
        remote_id: Some("zone-9".to_string()),
        records: vec![SnapshotRecord {
            host: "@".to_string(),
            record_type: DnsRecordType::Mx,
            ttl: 600,
            values: vec!["mail.example.com".to_string()],
            priority: Some(10),
            remote_id: Some("rec-1".to_string()),
        }],
    };

    tokio::time::sleep(Duration::from_millis(5)).await;
    let updated = store
        .update_zone_snapshot(zone.id, &snapshot, Some("zone-9".to_string()))
        .await
        .unwrap();
    assert!(updated);

    let stored = store.find_zone_by_name("example.com").await.unwrap().unwrap();
    assert_eq!(stored.snapshot, Some(snapshot.clone()));
    assert_eq!(stored.remote_zone_id.as_deref(), Some("zone-9"));
    assert_eq!(stored.provider_config, zone.provider_config);
    assert!(stored.updated_at > zone.updated_at);

    assert!(!store
        .update_zone_snapshot(zone.id + 100, &snapshot, None)
        .await
        .unwrap());
}

#[tokio::test]
async fn upsert_keeps_snapshot() {
    let (store, _tmp) = create_test_store().await;
    let zone = seed_zone(&store, "example.com").await;
    let snapshot = ZoneSnapshot {
        name: "example.com".to_string(),
        remote_id: None,
        records: Vec::new(),
    };
    store
        .update_zone_snapshot(zone.id, &snapshot, None)
        .await
        .unwrap();

    let again = seed_zone(&store, "example.com").await;
    assert_eq!(again.snapshot, Some(snapshot));
}

#[tokio::test]
async fn delete_zone_cascades_to_its_records_only() {
    let (store, _tmp) = create_test_store().await;
    let doomed = seed_zone(&store, "doomed.com").await;
    let kept = seed_zone(&store, "kept.com").await;
    for value in ["10.0.0.1", "10.0.0.2", "10.0.0.3"] {
        store
            .insert_record(&new_record(&doomed, "www", value))
            .await
            .unwrap();
    }
    let survivor = store
        .insert_record(&new_record(&kept, "www", "10.0.0.9"))
        .await
        .unwrap();

    assert!(store.delete_zone("doomed.com").await.unwrap());
    assert!(store.find_zone_by_name("doomed.com").await.unwrap().is_none());
    assert!(store.list_records(doomed.id).await.unwrap().is_empty());
    assert_eq!(store.list_records(kept.id).await.unwrap(), vec![survivor]);

    assert!(!store.delete_zone("doomed.com").await.unwrap());
}

// ===== Records =====

#[tokio::test]
async fn record_fields_round_trip() {
    let (store, _tmp) = create_test_store().await;
    let zone = seed_zone(&store, "example.com").await;

    let record = store
        .insert_record(&NewRecord {
            zone_id: zone.id,
            remote_record_id: Some("rec-1".to_string()),
            record_type: DnsRecordType::Mx,
            host: "@".to_string(),
            value: "mail.example.com".to_string(),
            ttl: 600,
            priority: Some(10),
        })
        .await
        .unwrap();

    let found = store.find_record(zone.id, record.id).await.unwrap().unwrap();
    assert_eq!(found, record);
    assert_eq!(found.zone_id, zone.id);
    assert_eq!(found.record_type, DnsRecordType::Mx);
    assert_eq!(found.priority, Some(10));
    assert_eq!(found.remote_record_id.as_deref(), Some("rec-1"));
}

#[tokio::test]
async fn find_record_is_scoped_to_zone() {
    let (store, _tmp) = create_test_store().await;
    let a = seed_zone(&store, "a.com").await;
    let b = seed_zone(&store, "b.com").await;
    let record = store
        .insert_record(&new_record(&a, "www", "10.0.0.1"))
        .await
        .unwrap();

    assert!(store.find_record(b.id, record.id).await.unwrap().is_none());
    assert!(!store.delete_record(b.id, record.id).await.unwrap());
    assert!(store.find_record(a.id, record.id).await.unwrap().is_some());
}

#[tokio::test]
async fn insert_record_requires_existing_zone() {
    let (store, _tmp) = create_test_store().await;
    let zone = seed_zone(&store, "example.com").await;
    let mut orphan = new_record(&zone, "www", "10.0.0.1");
    orphan.zone_id = zone.id + 100;

    let err = store.insert_record(&orphan).await.unwrap_err();
    assert!(matches!(err, CoreError::StorageError(_)));
}

#[tokio::test]
async fn update_record_applies_changes() {
    let (store, _tmp) = create_test_store().await;
    let zone = seed_zone(&store, "example.com").await;
    let record = store
        .insert_record(&new_record(&zone, "www", "10.0.0.1"))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(5)).await;
    let changes = RecordChanges {
        record_type: DnsRecordType::Aaaa,
        host: "api".to_string(),
        value: "2001:db8::1".to_string(),
        ttl: 120,
        priority: None,
    };
    assert!(store.update_record(zone.id, record.id, &changes).await.unwrap());

    let stored = store.find_record(zone.id, record.id).await.unwrap().unwrap();
    assert_eq!(stored.record_type, DnsRecordType::Aaaa);
    assert_eq!(stored.host, "api");
    assert_eq!(stored.value, "2001:db8::1");
    assert_eq!(stored.ttl, 120);
    assert_eq!(stored.created_at, record.created_at);
    assert!(stored.updated_at > record.updated_at);

    assert!(!store
        .update_record(zone.id, record.id + 100, &changes)
        .await
        .unwrap());
}

#[tokio::test]
async fn delete_record_removes_one_row() {
    let (store, _tmp) = create_test_store().await;
    let zone = seed_zone(&store, "example.com").await;
    let first = store
        .insert_record(&new_record(&zone, "www", "10.0.0.1"))
        .await
        .unwrap();
    let second = store
        .insert_record(&new_record(&zone, "www", "10.0.0.2"))
        .await
        .unwrap();

    assert!(store.delete_record(zone.id, first.id).await.unwrap());
    assert!(!store.delete_record(zone.id, first.id).await.unwrap());
    assert_eq!(store.list_records(zone.id).await.unwrap(), vec![second]);
}

// ===== Remote id helpers =====

#[tokio::test]
async fn find_record_remote_id_returns_lowest_id_match() {
    let (store, _tmp) = create_test_store().await;
    let zone = seed_zone(&store, "example.com").await;
    let mut first = new_record(&zone, "www", "10.0.0.1");
    first.remote_record_id = Some("rec-1".to_string());
    let mut second = new_record(&zone, "www", "10.0.0.2");
    second.remote_record_id = Some("rec-2".to_string());
    store.insert_record(&first).await.unwrap();
    store.insert_record(&second).await.unwrap();

    let found = store
        .find_record_remote_id("example.com", DnsRecordType::A, "www")
        .await
        .unwrap();
    assert_eq!(found.as_deref(), Some("rec-1"));

    assert!(store
        .find_record_remote_id("example.com", DnsRecordType::Aaaa, "www")
        .await
        .unwrap()
        .is_none());
    assert!(store
        .find_record_remote_id("missing.com", DnsRecordType::A, "www")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn save_record_remote_id_matches_type_host_and_value() {
    let (store, _tmp) = create_test_store().await;
    let zone = seed_zone(&store, "example.com").await;
    let target = store
        .insert_record(&new_record(&zone, "www", "10.0.0.1"))
        .await
        .unwrap();
    let other = store
        .insert_record(&new_record(&zone, "www", "10.0.0.2"))
        .await
        .unwrap();

    let updated = store
        .save_record_remote_id("example.com", "rec-7", DnsRecordType::A, "www", "10.0.0.1")
        .await
        .unwrap();
    assert_eq!(updated, 1);

    let target = store.find_record(zone.id, target.id).await.unwrap().unwrap();
    let other = store.find_record(zone.id, other.id).await.unwrap().unwrap();
    assert_eq!(target.remote_record_id.as_deref(), Some("rec-7"));
    assert_eq!(other.remote_record_id, None);

    let none = store
        .save_record_remote_id("missing.com", "rec-8", DnsRecordType::A, "www", "10.0.0.1")
        .await
        .unwrap();
    assert_eq!(none, 0);
}
