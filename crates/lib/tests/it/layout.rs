use warehouse::{
    Error,
    warehouse::{LocationStatus, MapError},
};

use super::helpers::*;

#[tokio::test]
async fn test_create_shelf() {
    let warehouse = test_warehouse().await;
    let map = create_map(&warehouse, "Galpão A", 1).await;
    let aisle_id = map.runners[0].runner_id;

    let shelf = warehouse
        .create_shelf(aisle_id, " P-01 ", Some(40))
        .await
        .unwrap();
    assert_eq!(shelf.runner_id, aisle_id);
    assert_eq!(shelf.code, "P-01");
    assert_eq!(shelf.capacity, Some(40));

    let open = warehouse.create_shelf(aisle_id, "P-02", None).await.unwrap();
    assert_eq!(open.capacity, None);

    let shelves = warehouse.shelves(aisle_id).await.unwrap();
    assert_eq!(shelves, vec![shelf, open]);
}

#[tokio::test]
async fn test_create_shelf_validation() {
    let warehouse = test_warehouse().await;
    let map = create_map(&warehouse, "Galpão A", 1).await;
    let aisle_id = map.runners[0].runner_id;

    let err = warehouse.create_shelf(aisle_id, "", None).await.unwrap_err();
    assert!(matches!(err, Error::Map(MapError::InvalidCode { .. })));

    let err = warehouse
        .create_shelf(aisle_id, "P-01", Some(-1))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Map(MapError::InvalidCapacity { capacity: -1 })));

    let err = warehouse
        .create_shelf(aisle_id + 1000, "P-01", None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Map(MapError::AisleNotFound { .. })));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_locations_start_empty() {
    let warehouse = test_warehouse().await;
    let map = create_map(&warehouse, "Galpão A", 1).await;
    let shelf = &add_shelves(&warehouse, map.runners[0].runner_id, "P", 1).await[0];

    let tagged = warehouse
        .create_location(shelf.shelf_id, "P-1-01", Some(7))
        .await
        .unwrap();
    assert_eq!(tagged.shelf_id, shelf.shelf_id);
    assert_eq!(tagged.code, "P-1-01");
    assert_eq!(tagged.tag_id, Some(7));
    assert_eq!(tagged.status, LocationStatus::Empty);

    let untagged = warehouse
        .create_location(shelf.shelf_id, "P-1-02", None)
        .await
        .unwrap();
    assert_eq!(untagged.tag_id, None);

    let locations = warehouse.locations(shelf.shelf_id).await.unwrap();
    assert_eq!(locations, vec![tagged, untagged]);
}

#[tokio::test]
async fn test_location_codes_are_unique() {
    let warehouse = test_warehouse().await;
    let map = create_map(&warehouse, "Galpão A", 2).await;
    let first = &add_shelves(&warehouse, map.runners[0].runner_id, "P", 1).await[0];
    let second = &add_shelves(&warehouse, map.runners[1].runner_id, "Q", 1).await[0];

    warehouse
        .create_location(first.shelf_id, "L-01", None)
        .await
        .unwrap();
    let err = warehouse
        .create_location(second.shelf_id, "L-01", None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Map(MapError::DuplicateLocationCode { .. })
    ));
    assert!(err.is_conflict());
}

#[tokio::test]
async fn test_location_on_missing_shelf() {
    let warehouse = test_warehouse().await;

    let err = warehouse
        .create_location(999, "L-01", None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Map(MapError::ShelfNotFound { shelf_id: 999 })));
}

#[tokio::test]
async fn test_set_location_status() {
    let warehouse = test_warehouse().await;
    let map = create_map(&warehouse, "Galpão A", 1).await;
    let shelf = &add_shelves(&warehouse, map.runners[0].runner_id, "P", 1).await[0];
    let location = warehouse
        .create_location(shelf.shelf_id, "L-01", None)
        .await
        .unwrap();

    warehouse
        .set_location_status(location.location_id, LocationStatus::Occupied)
        .await
        .unwrap();
    let stored = warehouse.locations(shelf.shelf_id).await.unwrap();
    assert_eq!(stored[0].status, LocationStatus::Occupied);

    let err = warehouse
        .set_location_status(location.location_id + 1, LocationStatus::Blocked)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Map(MapError::LocationNotFound { .. })));
}

#[tokio::test]
async fn test_stats() {
    let warehouse = test_warehouse().await;
    assert_eq!(warehouse.stats().await.unwrap(), Default::default());

    let map = create_map(&warehouse, "Galpão A", 3).await;
    let shelves = add_shelves(&warehouse, map.runners[2].runner_id, "P", 2).await;
    warehouse
        .create_location(shelves[1].shelf_id, "L-01", None)
        .await
        .unwrap();

    let stats = warehouse.stats().await.unwrap();
    assert_eq!(stats.maps, 1);
    assert_eq!(stats.aisles, 3);
    assert_eq!(stats.shelves, 2);
    assert_eq!(stats.locations, 1);
}

#[tokio::test]
async fn test_aisles_of_missing_map() {
    let warehouse = test_warehouse().await;
    let err = warehouse.aisles(31337).await.unwrap_err();
    assert!(err.is_not_found());
}
