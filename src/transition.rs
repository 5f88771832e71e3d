//! Legal moves for the four status dimensions of an order.
//!
//! Every check is pure: it answers allow or reject and, when allowed, which
//! milestone the caller must stamp. Self-transitions are rejected everywhere so
//! that two writers racing to make the same move cannot both succeed.

use crate::error::InvalidTransitionError;
use crate::model::{ItemStatus, KitchenStatus, Milestone, OrderStatus, PaymentStatus};

/// `pending_validation -> in_progress -> finalized`, one step at a time.
///
/// Finalizing stamps the served milestone; [`crate::model::OrderTimestamps::stamp`]
/// leaves it alone if the kitchen already set it.
pub fn check_order_status(
    from: OrderStatus,
    to: OrderStatus,
) -> Result<Option<Milestone>, InvalidTransitionError> {
    if to.rank() != from.rank() + 1 {
        return Err(InvalidTransitionError::new("order_status", from, to));
    }
    Ok((to == OrderStatus::Finalized).then_some(Milestone::Served))
}

/// Strictly forward through the kitchen pipeline, no skips.
pub fn check_kitchen_status(
    from: KitchenStatus,
    to: KitchenStatus,
) -> Result<Option<Milestone>, InvalidTransitionError> {
    if from.next() != Some(to) {
        return Err(InvalidTransitionError::new("kitchen_status", from, to));
    }
    Ok(match to {
        KitchenStatus::Received => Some(Milestone::SentToKitchen),
        KitchenStatus::Ready => Some(Milestone::Ready),
        KitchenStatus::Served => Some(Milestone::Served),
        KitchenStatus::NotSent | KitchenStatus::Delivered => None,
    })
}

/// `pending -> sent`, `pending -> cancelled`, `sent -> cancelled`.
pub fn check_item_status(from: ItemStatus, to: ItemStatus) -> Result<(), InvalidTransitionError> {
    match (from, to) {
        (ItemStatus::Pending, ItemStatus::Sent)
        | (ItemStatus::Pending, ItemStatus::Cancelled)
        | (ItemStatus::Sent, ItemStatus::Cancelled) => Ok(()),
        _ => Err(InvalidTransitionError::new("item_status", from, to)),
    }
}

/// `unpaid -> paid` only. Reversal is a separate administrative action.
pub fn check_payment_status(from: PaymentStatus, to: PaymentStatus) -> Result<(), InvalidTransitionError> {
    match (from, to) {
        (PaymentStatus::Unpaid, PaymentStatus::Paid) => Ok(()),
        _ => Err(InvalidTransitionError::new("payment_status", from, to)),
    }
}

/// Compare-and-set guard: the caller's view of a field must match the store.
///
/// On mismatch the error carries the stored value, so the caller can tell it
/// lost a race.
pub fn check_expected<S>(
    dimension: &'static str,
    expected: S,
    stored: S,
    to: S,
) -> Result<(), InvalidTransitionError>
where
    S: PartialEq + ToString,
{
    if expected == stored {
        Ok(())
    } else {
        Err(InvalidTransitionError::new(dimension, stored, to))
    }
}
