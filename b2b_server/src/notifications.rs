//! E-mail notifications.
//!
//! [`build_hooks`] wires the engine's events to an [`EmailNotifier`]. The hooks run on the event handler tasks, so a
//! slow or failing SMTP relay never holds up a request. Failures are logged and the message is dropped.
use std::sync::Arc;

use b2b_engine::events::{
    EventHooks,
    OrderPlacedEvent,
    OrderStateChangedEvent,
    PasswordResetRequestedEvent,
    UserRegisteredEvent,
};
use lettre::{
    message::header::ContentType,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport,
    AsyncTransport,
    Message,
    Tokio1Executor,
};
use log::*;
use thiserror::Error;

use crate::{config::EmailConfig, errors::ServerError};

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("Could not build the message: {0}")]
    MessageBuild(#[from] lettre::error::Error),
    #[error("Invalid e-mail address: {0}")]
    InvalidAddress(String),
}

pub struct EmailNotifier {
    /// `None` when no relay is configured. Messages are logged instead.
    mailer: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
}

impl EmailNotifier {
    pub fn new(config: &EmailConfig) -> Result<Self, ServerError> {
        let mailer = match &config.smtp_host {
            Some(host) => {
                let credentials =
                    Credentials::new(config.smtp_username.clone(), config.smtp_password.reveal().clone());
                let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                    .map_err(|e| ServerError::ConfigurationError(format!("Invalid SMTP relay {host}. {e}")))?
                    .port(config.smtp_port)
                    .credentials(credentials)
                    .build();
                Some(transport)
            },
            None => None,
        };
        Ok(Self { mailer, from: config.from.clone() })
    }

    /// A notifier that only writes messages to the log.
    pub fn log_only(from: &str) -> Self {
        Self { mailer: None, from: from.to_string() }
    }

    pub async fn send(&self, to: &str, subject: &str, body: String) -> Result<(), EmailError> {
        let Some(mailer) = &self.mailer else {
            info!("📬️ [not sent] To: {to}. Subject: {subject}. {body}");
            return Ok(());
        };
        let email = Message::builder()
            .from(self.from.parse().map_err(|_| EmailError::InvalidAddress(self.from.clone()))?)
            .to(to.parse().map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;
        mailer.send(email).await?;
        debug!("📬️ Sent \"{subject}\" to {to}");
        Ok(())
    }

    async fn deliver(&self, to: &str, subject: &str, body: String) {
        if let Err(e) = self.send(to, subject, body).await {
            warn!("📬️ Could not send \"{subject}\" to {to}. {e}");
        }
    }

    pub async fn order_placed(&self, ev: OrderPlacedEvent) {
        let body = format!(
            "Order #{} has been created. {} item(s), total {}.",
            ev.order.id,
            ev.order.ordered_items.len(),
            ev.order.total_sum
        );
        self.deliver(&ev.user.email, "Order status update", body).await;
    }

    pub async fn order_state_changed(&self, ev: OrderStateChangedEvent) {
        let body = format!("Order #{} is now {}.", ev.order.id, ev.new_state);
        self.deliver(&ev.user.email, "Order status update", body).await;
    }

    pub async fn user_registered(&self, ev: UserRegisteredEvent) {
        let body = format!("Your e-mail confirmation token is {}", ev.token);
        self.deliver(&ev.user.email, "Confirm your e-mail address", body).await;
    }

    pub async fn password_reset(&self, ev: PasswordResetRequestedEvent) {
        let body = format!("Your password reset token is {}", ev.token);
        self.deliver(&ev.user.email, "Password reset", body).await;
    }
}

pub fn build_hooks(notifier: EmailNotifier) -> EventHooks {
    let notifier = Arc::new(notifier);
    let mut hooks = EventHooks::default();
    let n = Arc::clone(&notifier);
    hooks.on_order_placed(move |ev| {
        let n = Arc::clone(&n);
        Box::pin(async move { n.order_placed(ev).await })
    });
    let n = Arc::clone(&notifier);
    hooks.on_order_state_changed(move |ev| {
        let n = Arc::clone(&n);
        Box::pin(async move { n.order_state_changed(ev).await })
    });
    let n = Arc::clone(&notifier);
    hooks.on_user_registered(move |ev| {
        let n = Arc::clone(&n);
        Box::pin(async move { n.user_registered(ev).await })
    });
    let n = notifier;
    hooks.on_password_reset(move |ev| {
        let n = Arc::clone(&n);
        Box::pin(async move { n.password_reset(ev).await })
    });
    hooks
}
