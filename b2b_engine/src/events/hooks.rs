use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{
    EventHandler,
    EventProducer,
    Handler,
    OrderPlacedEvent,
    OrderStateChangedEvent,
    PasswordResetRequestedEvent,
    UserRegisteredEvent,
};

type BoxedHook = Pin<Box<dyn Future<Output = ()> + Send>>;

#[derive(Default, Clone)]
pub struct EventProducers {
    pub order_placed_producer: Vec<EventProducer<OrderPlacedEvent>>,
    pub order_state_changed_producer: Vec<EventProducer<OrderStateChangedEvent>>,
    pub user_registered_producer: Vec<EventProducer<UserRegisteredEvent>>,
    pub password_reset_producer: Vec<EventProducer<PasswordResetRequestedEvent>>,
}

pub struct EventHandlers {
    pub on_order_placed: Option<EventHandler<OrderPlacedEvent>>,
    pub on_order_state_changed: Option<EventHandler<OrderStateChangedEvent>>,
    pub on_user_registered: Option<EventHandler<UserRegisteredEvent>>,
    pub on_password_reset: Option<EventHandler<PasswordResetRequestedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_order_placed = hooks.on_order_placed.map(|f| EventHandler::new(buffer_size, f));
        let on_order_state_changed = hooks.on_order_state_changed.map(|f| EventHandler::new(buffer_size, f));
        let on_user_registered = hooks.on_user_registered.map(|f| EventHandler::new(buffer_size, f));
        let on_password_reset = hooks.on_password_reset.map(|f| EventHandler::new(buffer_size, f));
        Self { on_order_placed, on_order_state_changed, on_user_registered, on_password_reset }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_order_placed {
            result.order_placed_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_order_state_changed {
            result.order_state_changed_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_user_registered {
            result.user_registered_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_password_reset {
            result.password_reset_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_order_placed {
            tokio::spawn(handler.start_handler());
        }
        if let Some(handler) = self.on_order_state_changed {
            tokio::spawn(handler.start_handler());
        }
        if let Some(handler) = self.on_user_registered {
            tokio::spawn(handler.start_handler());
        }
        if let Some(handler) = self.on_password_reset {
            tokio::spawn(handler.start_handler());
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_order_placed: Option<Handler<OrderPlacedEvent>>,
    pub on_order_state_changed: Option<Handler<OrderStateChangedEvent>>,
    pub on_user_registered: Option<Handler<UserRegisteredEvent>>,
    pub on_password_reset: Option<Handler<PasswordResetRequestedEvent>>,
}

impl EventHooks {
    pub fn on_order_placed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(OrderPlacedEvent) -> BoxedHook) + Send + Sync + 'static {
        self.on_order_placed = Some(Arc::new(f));
        self
    }

    pub fn on_order_state_changed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(OrderStateChangedEvent) -> BoxedHook) + Send + Sync + 'static {
        self.on_order_state_changed = Some(Arc::new(f));
        self
    }

    pub fn on_user_registered<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(UserRegisteredEvent) -> BoxedHook) + Send + Sync + 'static {
        self.on_user_registered = Some(Arc::new(f));
        self
    }

    pub fn on_password_reset<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(PasswordResetRequestedEvent) -> BoxedHook) + Send + Sync + 'static {
        self.on_password_reset = Some(Arc::new(f));
        self
    }
}
