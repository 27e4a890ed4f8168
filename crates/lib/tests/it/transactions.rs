use warehouse::{
    Error,
    warehouse::{MapError, storage},
};

use super::helpers::*;

#[tokio::test]
async fn test_failed_work_rolls_back_inserts() {
    let warehouse = test_warehouse().await;

    let err = warehouse
        .backend()
        .in_transaction(|tx| {
            Box::pin(async move {
                let map_id = storage::insert_map(tx, "Rascunho").await?;
                storage::insert_aisles(tx, map_id, 3).await?;
                Err::<(), _>(MapError::MissingName.into())
            })
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Map(MapError::MissingName)));

    let stats = warehouse.stats().await.unwrap();
    assert_eq!(stats.maps, 0);
    assert_eq!(stats.aisles, 0);

    // The name was never committed
    let created = create_map(&warehouse, "Rascunho", 2).await;
    assert_eq!(created.runners.len(), 2);
}

#[tokio::test]
async fn test_failed_work_rolls_back_deletes() {
    let warehouse = test_warehouse().await;
    let created = create_map(&warehouse, "Galpão A", 2).await;
    add_shelves(&warehouse, created.runners[0].runner_id, "A", 3).await;
    let map_id = created.map_id;

    let err = warehouse
        .backend()
        .in_transaction(move |tx| {
            Box::pin(async move {
                storage::delete_shelves_of_map(tx, map_id).await?;
                storage::delete_aisles_of_map(tx, map_id).await?;
                Err::<(), _>(MapError::MapNotFound { map_id }.into())
            })
        })
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let stats = warehouse.stats().await.unwrap();
    assert_eq!(stats.maps, 1);
    assert_eq!(stats.aisles, 2);
    assert_eq!(stats.shelves, 3);
    let detail = warehouse.get_map(map_id).await.unwrap();
    assert_eq!(detail.total_occupied_shelves, 3);
}

#[tokio::test]
async fn test_delete_tree_of_vanished_map() {
    let warehouse = test_warehouse().await;
    let kept = create_map(&warehouse, "Galpão A", 1).await;
    add_shelves(&warehouse, kept.runners[0].runner_id, "K", 1).await;
    let kept_id = kept.map_id;
    let missing = kept_id + 1000;

    // The second delete finds no map row, so the first is undone too
    let err = warehouse
        .backend()
        .in_transaction(move |tx| {
            Box::pin(async move {
                let removed = storage::delete_map_tree(tx, kept_id).await?;
                assert_eq!(removed, (1, 1));
                storage::delete_map_tree(tx, missing).await
            })
        })
        .await
        .unwrap_err();
    match err {
        Error::Map(MapError::MapNotFound { map_id }) => assert_eq!(map_id, missing),
        other => panic!("unexpected error: {other:?}"),
    }

    let stats = warehouse.stats().await.unwrap();
    assert_eq!(stats.maps, 1);
    assert_eq!(stats.aisles, 1);
    assert_eq!(stats.shelves, 1);
}

#[tokio::test]
async fn test_delete_map_row_reports_missing_rows() {
    let warehouse = test_warehouse().await;

    let removed = warehouse
        .backend()
        .in_transaction(|tx| Box::pin(storage::delete_map_row(tx, 4242)))
        .await
        .unwrap();
    assert_eq!(removed, 0);
}
