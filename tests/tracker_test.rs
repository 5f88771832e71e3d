use floor_sync::catalog::StaticCatalog;
use floor_sync::clients::{CartLine, CustomerClient};
use floor_sync::counter::NotificationCounts;
use floor_sync::error::RepositoryError;
use floor_sync::lifecycle::{FloorSystem, NotificationConfig, SystemConfig};
use floor_sync::model::{
    ClientInfo, CustomerOrder, ItemDraft, KitchenStatus, OrderId, OrderStatus, ProductSnapshot, TableCreate,
};
use floor_sync::notify::{LocalFeed, NotificationHub, Topic};
use floor_sync::repository::mock::MockRepository;
use floor_sync::tracker::{TrackerHandle, TrackerView};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(2);

fn system() -> FloorSystem {
    let catalog = StaticCatalog::new().with_product("horchata", "Horchata", 4000, 1000);
    FloorSystem::new(SystemConfig::default(), Arc::new(catalog))
}

fn ana() -> ClientInfo {
    ClientInfo {
        name: "Ana".into(),
        phone: "555-0101".into(),
        address: None,
    }
}

fn status_is(status: OrderStatus) -> impl FnMut(&TrackerView) -> bool {
    move |view| view.order().is_some_and(|order| order.status == status)
}

#[tokio::test]
async fn test_unvalidated_order_stays_pending() {
    let system = system();
    let order = system
        .customer
        .submit(CustomerOrder {
            client_info: ana(),
            items: vec![ItemDraft::new("horchata", 1)],
            receipt_url: None,
        })
        .await
        .unwrap();

    let mut tracker = system.track(order.id);
    let view = timeout(WAIT, tracker.wait_for(status_is(OrderStatus::PendingValidation)))
        .await
        .expect("tracker never loaded");
    assert!(view.is_some());

    // Unrelated commits re-read the order; it is still pending and nothing failed
    for name in ["T1", "T2"] {
        system
            .staff
            .create_table(TableCreate {
                name: name.into(),
                capacity: 2,
            })
            .await
            .unwrap();
    }
    tokio::time::sleep(Duration::from_millis(50)).await;

    match tracker.view() {
        TrackerView::Tracking(order) => assert_eq!(order.status, OrderStatus::PendingValidation),
        other => panic!("expected a pending order, got {other:?}"),
    }

    drop(tracker);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_tracker_follows_staff_updates() {
    let system = system();
    let order = system
        .customer
        .submit(CustomerOrder {
            client_info: ana(),
            items: vec![ItemDraft::new("horchata", 2)],
            receipt_url: None,
        })
        .await
        .unwrap();
    let mut tracker = system.track(order.id);
    timeout(WAIT, tracker.wait_for(status_is(OrderStatus::PendingValidation)))
        .await
        .unwrap();

    system.staff.validate_order(order.id).await.unwrap();
    system.staff.send_to_kitchen(order.id).await.unwrap();

    let view = timeout(
        WAIT,
        tracker.wait_for(|view| {
            view.order()
                .is_some_and(|order| order.kitchen_status == KitchenStatus::Received)
        }),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(view.order().map(|o| o.status), Some(OrderStatus::InProgress));

    tracker.stop();
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_duplicate_signals_leave_view_unchanged() {
    let system = system();
    let order = system
        .customer
        .submit(CustomerOrder {
            client_info: ana(),
            items: vec![ItemDraft::new("horchata", 1)],
            receipt_url: None,
        })
        .await
        .unwrap();
    let mut tracker = system.track(order.id);
    let loaded = timeout(WAIT, tracker.wait_for(status_is(OrderStatus::PendingValidation)))
        .await
        .unwrap()
        .unwrap();

    let mut rendered = tracker.watch();
    let _ = rendered.borrow_and_update();

    // Signals without a commit re-read the same order
    system.notifications.publish(Topic::OrdersChanged).unwrap();
    system.notifications.publish(Topic::OrdersChanged).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(!rendered.has_changed().unwrap());
    assert_eq!(tracker.view(), loaded);

    system.staff.validate_order(order.id).await.unwrap();
    timeout(WAIT, rendered.changed()).await.unwrap().unwrap();
    assert_eq!(
        rendered.borrow().order().map(|o| o.status),
        Some(OrderStatus::InProgress)
    );

    drop(tracker);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_unknown_order_is_terminal() {
    let system = system();
    let mut tracker = system.track(OrderId(404));

    let view = timeout(WAIT, tracker.wait_for(TrackerView::is_terminal))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(view, TrackerView::NotFound);

    drop(tracker);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_read_failure_shows_unavailable() {
    let mock = MockRepository::new();
    mock.expect_get_order(OrderId(1)).return_err(RepositoryError::Closed);

    let feed = LocalFeed::new(16);
    let (hub, notifications) = NotificationHub::new(Arc::new(feed), NotificationConfig::default());
    tokio::spawn(hub.run());

    let mut tracker = TrackerHandle::start(OrderId(1), CustomerClient::new(mock.client()), notifications);
    let view = timeout(WAIT, tracker.wait_for(|view| *view == TrackerView::Unavailable))
        .await
        .unwrap()
        .unwrap();
    assert!(!view.is_terminal());
    mock.verify();
}

#[tokio::test]
async fn test_not_found_from_repository_mock() {
    let mock = MockRepository::new();
    mock.expect_get_order(OrderId(9)).return_ok(None);

    let feed = LocalFeed::new(16);
    let (hub, notifications) = NotificationHub::new(Arc::new(feed), NotificationConfig::default());
    tokio::spawn(hub.run());

    let mut tracker = TrackerHandle::start(OrderId(9), CustomerClient::new(mock.client()), notifications);
    let view = timeout(WAIT, tracker.wait_for(TrackerView::is_terminal))
        .await
        .unwrap();
    assert_eq!(view, Some(TrackerView::NotFound));
    mock.verify();
}

#[tokio::test]
async fn test_checkout_tracks_and_new_order_forgets() {
    let system = system();
    let mut session = system.customer_session();
    let horchata = ProductSnapshot::capture("horchata", "Horchata", 4000, 1000);

    assert!(matches!(
        session.checkout(ana(), None).await,
        Err(RepositoryError::Validation(_))
    ));

    session.cart.add(CartLine::new(&horchata, 2));
    let order_id = session.checkout(ana(), None).await.unwrap();
    assert!(session.cart.is_empty());

    let tracker = session.tracker().expect("checkout starts tracking");
    assert_eq!(tracker.order_id(), order_id);
    timeout(WAIT, tracker.wait_for(status_is(OrderStatus::PendingValidation)))
        .await
        .unwrap();

    session.cart.add(CartLine::new(&horchata, 1));
    session.start_new_order();
    assert!(session.tracker().is_none());
    assert!(session.cart.is_empty());

    // The order itself is untouched
    let order = system.customer.order(order_id).await.unwrap();
    assert_eq!(order.status, OrderStatus::PendingValidation);

    drop(session);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_counter_tracks_staff_work() {
    let system = system();
    let mut counter = system.notification_counter();

    let order = system
        .customer
        .submit(CustomerOrder {
            client_info: ana(),
            items: vec![ItemDraft::new("horchata", 1)],
            receipt_url: None,
        })
        .await
        .unwrap();
    let counts = timeout(WAIT, counter.wait_for(|c| c.pending_validation == 1))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(counts.total(), 1);

    system.staff.validate_order(order.id).await.unwrap();
    system.staff.send_to_kitchen(order.id).await.unwrap();
    let counts = timeout(WAIT, counter.wait_for(|c| c.in_kitchen == 1))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(counts.pending_validation, 0);

    system
        .kitchen
        .advance(order.id, KitchenStatus::Received, KitchenStatus::Ready)
        .await
        .unwrap();
    let counts = timeout(WAIT, counter.wait_for(|c| c.ready_to_serve == 1))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        counts,
        NotificationCounts {
            pending_validation: 0,
            in_kitchen: 0,
            ready_to_serve: 1,
        }
    );

    drop(counter);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_counter_ignores_signals_without_changes() {
    let system = system();
    let mut counter = system.notification_counter();
    let order = system
        .customer
        .submit(CustomerOrder {
            client_info: ana(),
            items: vec![ItemDraft::new("horchata", 1)],
            receipt_url: None,
        })
        .await
        .unwrap();
    timeout(WAIT, counter.wait_for(|c| c.pending_validation == 1))
        .await
        .unwrap()
        .unwrap();

    let mut badge = counter.watch();
    let _ = badge.borrow_and_update();

    system.notifications.publish(Topic::OrdersChanged).unwrap();
    system.notifications.publish(Topic::OrdersChanged).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!badge.has_changed().unwrap());

    system.staff.validate_order(order.id).await.unwrap();
    timeout(WAIT, badge.changed()).await.unwrap().unwrap();
    assert_eq!(badge.borrow().pending_validation, 0);

    drop(counter);
    system.shutdown().await.unwrap();
}
