use serde::{Deserialize, Serialize};

use crate::{
    db_types::{Order, OrderState, User},
    order_objects::OrderDetail,
};

/// A buyer turned their basket into an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlacedEvent {
    pub user: User,
    pub order: OrderDetail,
}

impl OrderPlacedEvent {
    pub fn new(user: User, order: OrderDetail) -> Self {
        Self { user, order }
    }
}

/// A supplier moved a placed order along. `user` is the buyer who owns the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStateChangedEvent {
    pub user: User,
    pub order: Order,
    pub new_state: OrderState,
}

impl OrderStateChangedEvent {
    pub fn new(user: User, order: Order) -> Self {
        let new_state = order.state;
        Self { user, order, new_state }
    }
}

/// A new account was created and needs its e-mail address confirmed with `token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRegisteredEvent {
    pub user: User,
    pub token: String,
}

/// A user asked to reset their password. `token` authorises the reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordResetRequestedEvent {
    pub user: User,
    pub token: String,
}
