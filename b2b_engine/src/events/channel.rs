//! Simple stateless pub-sub event handler
//!
//! This module provides a simple hook system that allows components of the system to subscribe to engine events
//! (orders placed, accounts registered, ...) and react to them, typically by sending an e-mail. The event handler is
//! stateless, i.e. the handlers have no access to the internal state of the system. All that is received is the event
//! itself.
//!
//! Handlers can be async. Publishing never waits on them: if the channel is full or closed, the event is logged and
//! dropped.
use std::{
    future::Future,
    pin::Pin,
    sync::{atomic::AtomicI64, Arc},
};

use log::*;
use tokio::sync::mpsc;

pub type Handler<E> = Arc<dyn Fn(E) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

pub struct EventHandler<E: Send + Sync + 'static> {
    listener: mpsc::Receiver<E>,
    sender: mpsc::Sender<E>,
    handler: Handler<E>,
}

impl<E: Send + Sync + 'static> EventHandler<E> {
    pub fn new(buffer_size: usize, handler: Handler<E>) -> Self {
        let (sender, receiver) = mpsc::channel(buffer_size);
        Self { listener: receiver, sender, handler }
    }

    pub fn subscribe(&self) -> EventProducer<E> {
        EventProducer::new(self.sender.clone())
    }

    pub async fn start_handler(mut self) {
        debug!("📬️ Starting event handler");
        // drop the internal sender so that when the last subscriber is dropped, we can automatically shut down the
        // handler
        drop(self.sender);
        let jobs = Arc::new(AtomicI64::new(0));
        while let Some(ev) = self.listener.recv().await {
            trace!("📬️ Handling event");
            let handler = Arc::clone(&self.handler);
            jobs.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            let job = jobs.clone();
            tokio::spawn(async move {
                (handler)(ev).await;
                job.fetch_sub(1, std::sync::atomic::Ordering::Relaxed);
                trace!("📬️ Event handled");
            });
        }
        match tokio::spawn(async move {
            while jobs.load(std::sync::atomic::Ordering::SeqCst) > 0 {
                debug!("📬️ Waiting for jobs to complete");
                tokio::time::sleep(tokio::time::Duration::from_millis(1000)).await;
            }
        })
        .await
        {
            Ok(_) => {
                debug!("📬️ Event handler shutting down gracefully");
            },
            Err(e) => {
                warn!("📬️ Event handler shutdown process failed: {e}");
            },
        }
        debug!("📬️ Event handler has shut down");
    }
}

#[derive(Clone)]
pub struct EventProducer<E: Send + Sync> {
    sender: mpsc::Sender<E>,
}

impl<E: Send + Sync> EventProducer<E> {
    pub fn new(sender: mpsc::Sender<E>) -> Self {
        Self { sender }
    }

    /// Queues the event for the handler without waiting.
    pub fn publish_event(&self, event: E) {
        match self.sender.try_send(event) {
            Ok(()) => trace!("📬️ Event queued"),
            Err(mpsc::error::TrySendError::Full(_)) => warn!("📬️ Event channel is full. The event has been dropped"),
            Err(mpsc::error::TrySendError::Closed(_)) => error!("📬️ Event handler has shut down. Event dropped"),
        }
    }
}
