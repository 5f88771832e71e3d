use floor_sync::catalog::{Catalog, StaticCatalog};
use floor_sync::clients::CartLine;
use floor_sync::lifecycle::{setup_tracing, FloorSystem, SystemConfig};
use floor_sync::model::{ClientInfo, ItemDraft, KitchenStatus, NewOrder, PaymentDetails, PaymentMethod, TableCreate};
use floor_sync::tracker::TrackerView;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    setup_tracing();

    let config = SystemConfig::from_env()?;
    let catalog = StaticCatalog::new()
        .with_product("taco", "Taco", 8000, 3000)
        .with_product("horchata", "Horchata", 4000, 1000);
    let system = FloorSystem::new(config, Arc::new(catalog.clone()));

    // Dine-in service on one table
    let span = tracing::info_span!("dine_in");
    async {
        let table = system
            .staff
            .create_table(TableCreate {
                name: "T1".into(),
                capacity: 4,
            })
            .await?;

        let order = system
            .staff
            .create_order(NewOrder::dine_in(table.table.id, 2, vec![ItemDraft::new("taco", 2)]))
            .await?;
        info!(order_id = %order.id, total = order.total(), "Order placed");

        system.staff.send_to_kitchen(order.id).await?;
        info!(status = %system.staff.table(table.table.id).await?.status, "Table after send");

        let ready = system
            .kitchen
            .advance(order.id, KitchenStatus::Received, KitchenStatus::Ready)
            .await?;
        system.kitchen.advance_next(&ready).await?;
        info!(status = %system.staff.table(table.table.id).await?.status, "Table after serve");

        // A stale kitchen screen loses the race
        if let Err(e) = system
            .kitchen
            .advance(order.id, KitchenStatus::Received, KitchenStatus::Ready)
            .await
        {
            warn!(error = %e, notice = e.user_message(), "Stale write rejected");
        }

        system.staff.finalize_order(order.id).await?;
        system.staff.mark_paid(order.id, PaymentDetails::new(PaymentMethod::Card)).await?;
        info!(status = %system.staff.table(table.table.id).await?.status, "Table after payment");
        Ok::<_, Box<dyn Error>>(())
    }
    .instrument(span)
    .await?;

    // Customer self-service with live tracking
    let span = tracing::info_span!("self_service");
    async {
        let mut session = system.customer_session();
        let horchata = catalog.snapshot("horchata").await?;
        session.cart.add(CartLine::new(&horchata, 2));
        info!(total = session.cart.total(), "Cart ready");

        let order_id = session
            .checkout(
                ClientInfo {
                    name: "Ana".into(),
                    phone: "555-0101".into(),
                    address: None,
                },
                None,
            )
            .await?;

        if let Some(tracker) = session.tracker() {
            let view = tokio::time::timeout(
                Duration::from_secs(1),
                tracker.wait_for(|view| matches!(view, TrackerView::Tracking(_))),
            )
            .await?;
            if let Some(TrackerView::Tracking(order)) = view {
                info!(order_id = %order.id, status = %order.status, "Customer sees");
            }
        }

        system.staff.validate_order(order_id).await?;
        system
            .staff
            .settle_order(order_id, PaymentDetails::new(PaymentMethod::Cash))
            .await?;
        session.start_new_order();
        Ok::<_, Box<dyn Error>>(())
    }
    .instrument(span)
    .await?;

    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
