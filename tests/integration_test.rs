use floor_sync::catalog::StaticCatalog;
use floor_sync::clients::Capabilities;
use floor_sync::error::RepositoryError;
use floor_sync::lifecycle::{FloorSystem, SystemConfig};
use floor_sync::model::{
    ClientInfo, CustomerOrder, ItemDraft, ItemEdit, ItemStatus, KitchenStatus, NewOrder, OrderFilter, OrderStatus,
    PaymentDetails, PaymentMethod, PaymentStatus, TableCreate, TableId, TableStatus, TableUpdate,
};
use std::sync::Arc;

fn catalog() -> StaticCatalog {
    StaticCatalog::new()
        .with_product("taco", "Taco", 8000, 3000)
        .with_product("horchata", "Horchata", 4000, 1000)
}

fn start(catalog: &StaticCatalog) -> FloorSystem {
    FloorSystem::new(SystemConfig::default(), Arc::new(catalog.clone()))
}

async fn table(system: &FloorSystem, name: &str) -> TableId {
    system
        .staff
        .create_table(TableCreate {
            name: name.into(),
            capacity: 4,
        })
        .await
        .expect("Failed to create table")
        .table
        .id
}

/// Dine-in order from creation to a served table.
#[tokio::test]
async fn test_dine_in_table_follows_kitchen() {
    let system = start(&catalog());
    let t1 = table(&system, "T1").await;

    let order = system
        .staff
        .create_order(NewOrder::dine_in(t1, 2, vec![ItemDraft::new("taco", 2)]))
        .await
        .expect("Failed to create order");
    assert_eq!(order.total(), 16000);
    assert_eq!(order.profit(), 10000);
    assert_eq!(order.kitchen_status, KitchenStatus::NotSent);

    let view = system.staff.table(t1).await.unwrap();
    assert_eq!(view.table.linked_order, Some(order.id));
    assert_eq!(view.table.covers, 2);
    assert_eq!(view.status, TableStatus::OccupiedAwaiting);

    let sent = system.staff.send_to_kitchen(order.id).await.unwrap();
    assert_eq!(sent.kitchen_status, KitchenStatus::Received);
    assert!(sent.timestamps.sent_to_kitchen_at.is_some());
    assert!(sent.items().iter().all(|item| item.status == ItemStatus::Sent));
    assert_eq!(system.staff.table(t1).await.unwrap().status, TableStatus::OccupiedAwaiting);

    let ready = system
        .kitchen
        .advance(order.id, KitchenStatus::Received, KitchenStatus::Ready)
        .await
        .unwrap();
    assert!(ready.timestamps.ready_at.is_some());
    let served = system.kitchen.advance_next(&ready).await.unwrap();
    assert_eq!(served.kitchen_status, KitchenStatus::Served);
    assert!(served.timestamps.served_at.is_some());

    assert_eq!(system.staff.table(t1).await.unwrap().status, TableStatus::OccupiedServed);

    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_skipping_a_kitchen_step_changes_nothing() {
    let system = start(&catalog());
    let order = system
        .staff
        .create_order(NewOrder::takeaway(vec![ItemDraft::new("taco", 1)]))
        .await
        .unwrap();

    let err = system
        .kitchen
        .advance(order.id, KitchenStatus::NotSent, KitchenStatus::Ready)
        .await
        .unwrap_err();
    match err {
        RepositoryError::InvalidTransition(e) => {
            assert_eq!(e.dimension, "kitchen_status");
            assert_eq!(e.from, "not_sent");
            assert_eq!(e.to, "ready");
        }
        other => panic!("expected invalid transition, got {other:?}"),
    }

    let stored = system.staff.order(order.id).await.unwrap();
    assert_eq!(stored, order);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_settled_order_frees_table_and_stays_readable() {
    let system = start(&catalog());
    let t1 = table(&system, "T1").await;
    let order = system
        .staff
        .create_order(NewOrder::dine_in(t1, 3, vec![ItemDraft::new("taco", 1)]))
        .await
        .unwrap();
    system.staff.send_to_kitchen(order.id).await.unwrap();

    let finalized = system.staff.finalize_order(order.id).await.unwrap();
    assert_eq!(finalized.status, OrderStatus::Finalized);
    // Finalized but unpaid still holds the table
    assert_eq!(system.staff.table(t1).await.unwrap().table.linked_order, Some(order.id));

    let paid = system
        .staff
        .mark_paid(order.id, PaymentDetails::new(PaymentMethod::Cash).with_receipt("receipts/1.png"))
        .await
        .unwrap();
    assert_eq!(paid.payment_status, PaymentStatus::Paid);
    assert_eq!(paid.payment_method, Some(PaymentMethod::Cash));

    let view = system.staff.unlink_table(t1).await.unwrap();
    assert_eq!(view.status, TableStatus::Free);
    assert_eq!(view.table.covers, 0);
    assert_eq!(view.table.linked_order, None);

    let history = system.staff.order(order.id).await.unwrap();
    assert_eq!(history, paid);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_kitchen_advance_has_one_winner() {
    let system = start(&catalog());
    let order = system
        .staff
        .create_order(NewOrder::takeaway(vec![ItemDraft::new("taco", 1)]))
        .await
        .unwrap();
    system.staff.send_to_kitchen(order.id).await.unwrap();

    // A cloned client would keep shutdown waiting
    let (a, b) = tokio::join!(
        system.kitchen.advance(order.id, KitchenStatus::Received, KitchenStatus::Ready),
        system.kitchen.advance(order.id, KitchenStatus::Received, KitchenStatus::Ready),
    );

    let results = [a, b];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    let loser = results.into_iter().find_map(Result::err).expect("one call must fail");
    assert!(matches!(loser, RepositoryError::InvalidTransition(ref e) if e.from == "ready"));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_price_change_does_not_touch_existing_items() {
    let catalog = catalog();
    let system = start(&catalog);
    let order = system
        .staff
        .create_order(NewOrder::takeaway(vec![ItemDraft::new("taco", 1)]))
        .await
        .unwrap();

    catalog.upsert("taco", "Taco", 9500, 3000);

    let reread = system.staff.order(order.id).await.unwrap();
    assert_eq!(reread.items()[0].snapshot().unit_price(), 8000);
    assert_eq!(reread.total(), 8000);

    let extended = system
        .staff
        .add_items(order.id, vec![ItemDraft::new("taco", 1)])
        .await
        .unwrap();
    assert_eq!(extended.items()[1].snapshot().unit_price(), 9500);
    assert_eq!(extended.total(), 17500);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_item_edits_and_cancellation_keep_totals() {
    let system = start(&catalog());
    let order = system
        .staff
        .create_order(NewOrder::takeaway(vec![
            ItemDraft::new("taco", 2),
            ItemDraft::new("horchata", 1),
        ]))
        .await
        .unwrap();
    let taco = order.items()[0].id;
    let horchata = order.items()[1].id;

    let edited = system
        .staff
        .edit_item(
            order.id,
            taco,
            ItemEdit {
                quantity: Some(3),
                comment: Some(Some("extra salsa".into())),
                ..ItemEdit::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.total(), 28000);

    let cancelled = system.staff.cancel_item(order.id, horchata).await.unwrap();
    assert_eq!(cancelled.item(horchata).map(|i| i.status), Some(ItemStatus::Cancelled));
    assert_eq!(cancelled.total(), 24000);

    system.staff.send_to_kitchen(order.id).await.unwrap();
    let err = system
        .staff
        .edit_item(
            order.id,
            taco,
            ItemEdit {
                quantity: Some(1),
                ..ItemEdit::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Validation(_)));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_referential_conflicts() {
    let system = start(&catalog());
    let t1 = table(&system, "T1").await;
    let t2 = table(&system, "T2").await;
    let order = system
        .staff
        .create_order(NewOrder::dine_in(t1, 2, vec![ItemDraft::new("taco", 1)]))
        .await
        .unwrap();

    // A table holds one order at a time
    let second = system
        .staff
        .create_order(NewOrder::dine_in(t1, 1, vec![ItemDraft::new("taco", 1)]))
        .await;
    assert!(matches!(second, Err(RepositoryError::ReferentialConflict(_))));

    // An order sits at one table at a time
    let relink = system.staff.link_order_to_table(t2, order.id).await;
    assert!(matches!(relink, Err(RepositoryError::ReferentialConflict(_))));

    // Nothing referenced can be deleted
    assert!(matches!(
        system.staff.delete_table(t1).await,
        Err(RepositoryError::ReferentialConflict(_))
    ));
    assert!(matches!(
        system.staff.delete_order(order.id).await,
        Err(RepositoryError::ReferentialConflict(_))
    ));

    system.staff.unlink_table(t1).await.unwrap();
    system.staff.delete_order(order.id).await.unwrap();
    system.staff.delete_table(t1).await.unwrap();
    assert!(matches!(
        system.staff.table(t1).await,
        Err(RepositoryError::NotFound(_))
    ));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_tables_page_by_name() {
    let system = start(&catalog());
    for name in ["T3", "T1", "T2"] {
        table(&system, name).await;
    }
    let t3 = system.staff.tables(1, Some(3)).await.unwrap()[2].table.id;
    system
        .staff
        .update_table(
            t3,
            TableUpdate {
                capacity: Some(8),
                ..TableUpdate::default()
            },
        )
        .await
        .unwrap();

    let first = system.staff.tables(1, Some(2)).await.unwrap();
    let names: Vec<_> = first.iter().map(|view| view.table.name.as_str()).collect();
    assert_eq!(names, ["T1", "T2"]);

    let second = system.staff.tables(2, Some(2)).await.unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].table.capacity, 8);
    assert!(second.iter().all(|view| view.status == TableStatus::Free));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_customer_order_waits_for_validation() {
    let system = start(&catalog());
    let order = system
        .customer
        .submit(CustomerOrder {
            client_info: ClientInfo {
                name: "Ana".into(),
                phone: "555-0101".into(),
                address: None,
            },
            items: vec![ItemDraft::new("horchata", 2)],
            receipt_url: Some("receipts/transfer.png".into()),
        })
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::PendingValidation);
    assert_eq!(order.table_id, None);

    let pending = system
        .staff
        .list_orders(OrderFilter::Status(OrderStatus::PendingValidation))
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);

    assert!(matches!(
        system.staff.send_to_kitchen(order.id).await,
        Err(RepositoryError::Validation(_))
    ));
    // The kitchen cannot pick it up either, nor see it
    assert!(matches!(
        system
            .kitchen
            .advance(order.id, KitchenStatus::NotSent, KitchenStatus::Received)
            .await,
        Err(RepositoryError::Validation(_))
    ));
    assert!(system.kitchen.queue().await.unwrap().is_empty());
    assert!(matches!(
        system.kitchen.order(order.id).await,
        Err(RepositoryError::PermissionDenied(_))
    ));
    let untouched = system.staff.order(order.id).await.unwrap();
    assert_eq!(untouched.kitchen_status, KitchenStatus::NotSent);
    assert!(untouched.items().iter().all(|item| item.status == ItemStatus::Pending));

    let validated = system.staff.validate_order(order.id).await.unwrap();
    assert_eq!(validated.status, OrderStatus::InProgress);
    system.staff.send_to_kitchen(order.id).await.unwrap();

    let queue = system.kitchen.queue().await.unwrap();
    assert_eq!(queue.iter().map(|o| o.id).collect::<Vec<_>>(), vec![order.id]);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_payment_reversal_is_explicit() {
    let system = start(&catalog());
    let order = system
        .staff
        .create_order(NewOrder::takeaway(vec![ItemDraft::new("taco", 1)]))
        .await
        .unwrap();

    let settled = system
        .staff
        .settle_order(order.id, PaymentDetails::new(PaymentMethod::Transfer))
        .await
        .unwrap();
    assert_eq!(settled.status, OrderStatus::Finalized);
    assert_eq!(settled.payment_status, PaymentStatus::Paid);

    // Paying twice is not a transition
    assert!(matches!(
        system
            .staff
            .mark_paid(order.id, PaymentDetails::new(PaymentMethod::Cash))
            .await,
        Err(RepositoryError::InvalidTransition(_))
    ));

    let reversed = system.staff.reverse_payment(order.id, "card charged twice").await.unwrap();
    assert_eq!(reversed.payment_status, PaymentStatus::Unpaid);
    assert_eq!(reversed.status, OrderStatus::Finalized);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_read_only_staff_cannot_write() {
    let system = start(&catalog());
    let viewer = system.staff.with_capabilities(Capabilities::READ_ONLY);

    let err = viewer
        .create_order(NewOrder::takeaway(vec![ItemDraft::new("taco", 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::PermissionDenied(_)));
    assert!(viewer.list_orders(OrderFilter::All).await.unwrap().is_empty());

    drop(viewer);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_unknown_product_is_rejected() {
    let system = start(&catalog());
    let err = system
        .staff
        .create_order(NewOrder::takeaway(vec![ItemDraft::new("pozole", 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Catalog(_)));
    assert!(system.staff.list_orders(OrderFilter::All).await.unwrap().is_empty());

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_kitchen_reads_only_its_board() {
    let system = start(&catalog());
    let order = system
        .staff
        .create_order(NewOrder::takeaway(vec![ItemDraft::new("taco", 1)]))
        .await
        .unwrap();

    // Receiving straight from the kitchen sends the pending lines too
    let received = system
        .kitchen
        .advance(order.id, KitchenStatus::NotSent, KitchenStatus::Received)
        .await
        .unwrap();
    assert!(received.items().iter().all(|item| item.status == ItemStatus::Sent));
    assert_eq!(system.kitchen.order(order.id).await.unwrap(), received);

    let mut current = received;
    while current.kitchen_status != KitchenStatus::Delivered {
        current = system.kitchen.advance_next(&current).await.unwrap();
    }
    assert!(matches!(
        system.kitchen.order(order.id).await,
        Err(RepositoryError::PermissionDenied(_))
    ));
    assert!(system.kitchen.queue().await.unwrap().is_empty());
    assert_eq!(system.staff.order(order.id).await.unwrap(), current);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_unlinking_detaches_open_order() {
    let system = start(&catalog());
    let t1 = table(&system, "T1").await;
    let first = system
        .staff
        .create_order(NewOrder::dine_in(t1, 2, vec![ItemDraft::new("taco", 1)]))
        .await
        .unwrap();
    assert_eq!(first.table_id, Some(t1));

    system.staff.unlink_table(t1).await.unwrap();
    let detached = system.staff.order(first.id).await.unwrap();
    assert_eq!(detached.table_id, None);
    assert_eq!(detached.table_name, None);

    let second = system
        .staff
        .create_order(NewOrder::dine_in(t1, 4, vec![ItemDraft::new("taco", 2)]))
        .await
        .unwrap();
    assert_eq!(system.staff.order(second.id).await.unwrap().table_id, Some(t1));

    // Only one order names the table
    let seated: Vec<_> = system
        .staff
        .list_orders(OrderFilter::All)
        .await
        .unwrap()
        .into_iter()
        .filter(|order| order.table_id == Some(t1))
        .map(|order| order.id)
        .collect();
    assert_eq!(seated, vec![second.id]);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_reads_join_table_name_and_kitchen_time() {
    let system = start(&catalog());
    let t1 = table(&system, "T1").await;
    let order = system
        .staff
        .create_order(NewOrder::dine_in(t1, 2, vec![ItemDraft::new("taco", 1)]))
        .await
        .unwrap();
    assert_eq!(order.table_name.as_deref(), Some("T1"));

    system
        .staff
        .update_table(
            t1,
            TableUpdate {
                name: Some("Patio 1".into()),
                ..TableUpdate::default()
            },
        )
        .await
        .unwrap();
    let renamed = system.staff.order(order.id).await.unwrap();
    assert_eq!(renamed.table_name.as_deref(), Some("Patio 1"));

    let view = system.staff.table(t1).await.unwrap();
    assert_eq!(view.kitchen.and_then(|k| k.sent_to_kitchen_at), None);

    let sent = system.staff.send_to_kitchen(order.id).await.unwrap();
    let view = system.staff.table(t1).await.unwrap();
    let kitchen = view.kitchen.expect("linked order has a kitchen summary");
    assert_eq!(kitchen.sent_to_kitchen_at, sent.timestamps.sent_to_kitchen_at);
    assert!(kitchen.sent_to_kitchen_at.is_some());

    system.shutdown().await.unwrap();
}
