use warehouse::{Error, warehouse::MapError};

use super::helpers::*;

#[tokio::test]
async fn test_delete_map_returns_old_name() {
    let warehouse = test_warehouse().await;
    let created = create_map(&warehouse, "Galpão A", 3).await;

    let deleted = warehouse.delete_map(created.map_id).await.unwrap();
    assert_eq!(deleted.map_id, created.map_id);
    assert_eq!(deleted.name, "Galpão A");

    assert!(warehouse.list_maps().await.unwrap().is_empty());
    let err = warehouse.get_map(created.map_id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_delete_map_removes_whole_subtree() {
    let warehouse = test_warehouse().await;
    let doomed = create_map(&warehouse, "Galpão A", 2).await;
    let kept = create_map(&warehouse, "Galpão B", 1).await;

    let shelves = add_shelves(&warehouse, doomed.runners[0].runner_id, "A", 2).await;
    add_shelves(&warehouse, doomed.runners[1].runner_id, "B", 1).await;
    warehouse
        .create_location(shelves[0].shelf_id, "A-1-01", Some(99))
        .await
        .unwrap();
    let kept_shelves = add_shelves(&warehouse, kept.runners[0].runner_id, "K", 1).await;
    warehouse
        .create_location(kept_shelves[0].shelf_id, "K-1-01", None)
        .await
        .unwrap();

    warehouse.delete_map(doomed.map_id).await.unwrap();

    let stats = warehouse.stats().await.unwrap();
    assert_eq!(stats.maps, 1);
    assert_eq!(stats.aisles, 1);
    assert_eq!(stats.shelves, 1);
    assert_eq!(stats.locations, 1);

    // The surviving map is untouched
    let list = warehouse.list_maps().await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].map_id, kept.map_id);
    assert_eq!(list[0].total_occupied_shelves, 1);

    // Location codes of the deleted subtree are free again
    let shelf = add_shelves(&warehouse, kept.runners[0].runner_id, "N", 1).await;
    warehouse
        .create_location(shelf[0].shelf_id, "A-1-01", None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_missing_map() {
    let warehouse = test_warehouse().await;

    let err = warehouse.delete_map(4242).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Map(MapError::MapNotFound { map_id: 4242 })
    ));
}

#[tokio::test]
async fn test_delete_twice() {
    let warehouse = test_warehouse().await;
    let created = create_map(&warehouse, "Galpão A", 1).await;

    warehouse.delete_map(created.map_id).await.unwrap();
    let err = warehouse.delete_map(created.map_id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_delete_by_raw_id() {
    let warehouse = test_warehouse().await;
    let created = create_map(&warehouse, "Galpão A", 1).await;

    let err = warehouse.delete_map_by_raw_id("abc").await.unwrap_err();
    assert!(matches!(err, Error::Map(MapError::InvalidMapId { .. })));
    let err = warehouse.delete_map_by_raw_id("").await.unwrap_err();
    assert!(err.is_validation_error());

    let deleted = warehouse
        .delete_map_by_raw_id(&created.map_id.to_string())
        .await
        .unwrap();
    assert_eq!(deleted.name, "Galpão A");
}

#[tokio::test]
async fn test_name_is_reusable_after_delete() {
    let warehouse = test_warehouse().await;
    let first = create_map(&warehouse, "Galpão A", 1).await;
    warehouse.delete_map(first.map_id).await.unwrap();

    let second = warehouse.create_map("Galpão A", 2).await.unwrap();
    assert_ne!(second.map_id, first.map_id);
    assert_eq!(second.number_runners, 2);
}
