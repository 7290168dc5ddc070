use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Order, OrderState, User},
    events::{EventProducers, OrderPlacedEvent, OrderStateChangedEvent},
    order_objects::OrderDetail,
    traits::OrderManagement,
    OrderFlowApiError,
};

/// `OrderFlowApi` is the primary API for moving orders out of the basket and through fulfilment.
pub struct OrderFlowApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }
}

impl<B> OrderFlowApi<B>
where B: OrderManagement
{
    /// Places the user's basket `order_id` for delivery to `contact_id`.
    ///
    /// Returns `false` when there is nothing to place: the order does not exist, is not the user's, or was already
    /// placed. On success an [`OrderPlacedEvent`] is published. The notification is fire-and-forget; it never delays
    /// or fails the placement.
    pub async fn place_order(&self, user: &User, order_id: i64, contact_id: i64) -> Result<bool, OrderFlowApiError> {
        let placed = self.db.place_order(user.id, order_id, contact_id).await?;
        if !placed {
            debug!("🔄️📦️ Order #{order_id} is not a basket of user #{}. Nothing was placed", user.id);
            return Ok(false);
        }
        info!("🔄️📦️ Order #{order_id} placed by user #{}", user.id);
        self.call_order_placed_hook(user, order_id).await;
        Ok(true)
    }

    async fn call_order_placed_hook(&self, user: &User, order_id: i64) {
        if self.producers.order_placed_producer.is_empty() {
            return;
        }
        let order = match self.db.fetch_order(order_id).await {
            Ok(Some(order)) => order,
            Ok(None) => {
                warn!("🔄️📦️ Order #{order_id} vanished straight after being placed. No notification sent");
                return;
            },
            Err(e) => {
                warn!("🔄️📦️ Could not load order #{order_id} for the placement notification. {e}");
                return;
            },
        };
        debug!("🔄️📦️ Notifying order placed hook subscribers");
        for emitter in &self.producers.order_placed_producer {
            emitter.publish_event(OrderPlacedEvent::new(user.clone(), order.clone()));
        }
    }

    /// The user's order history (placed orders only), newest first.
    pub async fn orders_for_user(&self, user_id: i64) -> Result<Vec<OrderDetail>, OrderFlowApiError> {
        self.db.fetch_orders_for_user(user_id).await
    }

    /// Placed orders that contain goods from the supplier's shop.
    pub async fn orders_for_supplier(&self, supplier_id: i64) -> Result<Vec<OrderDetail>, OrderFlowApiError> {
        self.db.fetch_orders_for_supplier(supplier_id).await
    }

    /// Moves a placed order through fulfilment on behalf of a supplier.
    ///
    /// Suppliers may only move orders into `confirmed`, `assembled`, `sent`, `delivered` or `canceled`. The buyer is
    /// notified through an [`OrderStateChangedEvent`].
    pub async fn update_order_state(
        &self,
        supplier_id: i64,
        order_id: i64,
        state: OrderState,
    ) -> Result<Order, OrderFlowApiError> {
        if !state.is_fulfilment_state() {
            return Err(OrderFlowApiError::ForbiddenStateTransition(state));
        }
        let order = self
            .db
            .update_order_state_for_supplier(supplier_id, order_id, state)
            .await?
            .ok_or(OrderFlowApiError::OrderNotFound(order_id))?;
        info!("🔄️🚚️ Order #{order_id} is now '{state}'");
        if !self.producers.order_state_changed_producer.is_empty() {
            match self.db.fetch_order_owner(order_id).await {
                Ok(Some(owner)) => {
                    for emitter in &self.producers.order_state_changed_producer {
                        emitter.publish_event(OrderStateChangedEvent::new(owner.clone(), order.clone()));
                    }
                },
                Ok(None) => warn!("🔄️🚚️ Order #{order_id} has no owner. No notification sent"),
                Err(e) => warn!("🔄️🚚️ Could not load the owner of order #{order_id}. {e}"),
            }
        }
        Ok(order)
    }
}
