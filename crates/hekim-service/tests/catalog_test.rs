mod common;

use chrono::Duration;
use common::Harness;
use hekim_cache::keys;
use hekim_core::ephemeral::EphemeralStore;
use uuid::Uuid;

async fn add_province(h: &Harness, name: &str) {
    h.db
        .query("CREATE type::record('province', $id) SET name = $name")
        .bind(("id", Uuid::new_v4().to_string()))
        .bind(("name", name.to_string()))
        .await
        .unwrap()
        .check()
        .unwrap();
}

fn names(provinces: &[hekim_core::models::reference::Province]) -> Vec<&str> {
    provinces.iter().map(|p| p.name.as_str()).collect()
}

#[tokio::test]
async fn provinces_are_served_from_cache_until_invalidated() {
    let h = Harness::new().await;

    let first = h.catalog.provinces().await.unwrap();
    assert_eq!(names(&first), ["Ankara", "İstanbul"]);

    // A write behind the cache's back stays invisible within the TTL.
    add_province(&h, "Bursa").await;
    let cached = h.catalog.provinces().await.unwrap();
    assert_eq!(names(&cached), ["Ankara", "İstanbul"]);

    h.catalog.invalidate().await.unwrap();
    let fresh = h.catalog.provinces().await.unwrap();
    assert_eq!(names(&fresh), ["Ankara", "Bursa", "İstanbul"]);
}

#[tokio::test]
async fn expired_entries_are_reloaded() {
    let h = Harness::new().await;
    h.catalog.provinces().await.unwrap();
    add_province(&h, "Bursa").await;

    h.clock.advance(Duration::hours(1) + Duration::seconds(1));
    let fresh = h.catalog.provinces().await.unwrap();
    assert_eq!(fresh.len(), 3);
}

#[tokio::test]
async fn invalidation_clears_parameterised_lists() {
    let h = Harness::new().await;
    let (province_id, _) = h.istanbul().await;
    let (group, _, _) = h.doctor_titles().await;
    h.catalog.polyclinic_types().await.unwrap();

    let stats = h.catalog.stats().await.unwrap();
    assert_eq!(stats.district_lists, 1);
    assert_eq!(stats.job_title_lists, 1);
    assert!(stats.entries.iter().all(|e| e.exists));

    // provinces, job_groups, polyclinic_types plus one list of each kind
    assert_eq!(h.catalog.invalidate().await.unwrap(), 5);
    assert!(
        h.store
            .get(&keys::districts(province_id))
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        h.store
            .get(&keys::job_titles(group.id))
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn catalog_survives_a_cache_outage() {
    let h = Harness::new().await;
    h.store.set_unavailable(true);

    let provinces = h.catalog.provinces().await.unwrap();
    assert_eq!(provinces.len(), 2);
    let (province_id, _) = h.istanbul().await;
    let districts = h.catalog.districts(province_id).await.unwrap();
    assert_eq!(districts.len(), 2);
    assert_eq!(districts[0].name, "Beşiktaş");
}

#[tokio::test]
async fn unknown_parent_yields_an_empty_list() {
    let h = Harness::new().await;
    assert!(h.catalog.districts(Uuid::new_v4()).await.unwrap().is_empty());
    assert!(h.catalog.job_titles(Uuid::new_v4()).await.unwrap().is_empty());
}
