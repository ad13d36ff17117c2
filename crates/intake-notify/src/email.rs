//! SMTP email notification for new orders.

use async_trait::async_trait;
use intake_models::Order;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use crate::render::items_summary;
use crate::{Notifier, NotifyError, Result};

/// Notifier that emails the manager about each new order.
///
/// Status transitions are not emailed; the spreadsheet mirror covers those.
pub struct EmailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl EmailNotifier {
    /// Creates a notifier over SMTP with STARTTLS.
    pub fn new(
        host: &str,
        port: u16,
        user: &str,
        password: &str,
        to: &str,
    ) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| NotifyError::Smtp(e.to_string()))?
            .port(port)
            .credentials(Credentials::new(user.to_string(), password.to_string()))
            .build();

        let from = user
            .parse::<Mailbox>()
            .map_err(|e| NotifyError::Config(format!("bad sender address {user:?}: {e}")))?;
        let to = to
            .parse::<Mailbox>()
            .map_err(|e| NotifyError::Config(format!("bad recipient address {to:?}: {e}")))?;

        Ok(Self { transport, from, to })
    }

    fn body(order: &Order) -> String {
        let mut lines = vec![
            format!("New order #{}", order.id),
            String::new(),
            format!("Status: {}", order.status),
            format!("Total: {}", order.total_amount),
            String::new(),
            "Items:".to_string(),
        ];
        for item in &order.items {
            lines.push(format!(
                "- {}: {} x {} = {}",
                item.name, item.quantity, item.unit_price, item.line_amount
            ));
        }
        lines.push(String::new());
        lines.push(format!(
            "Delivery address: {}",
            order.delivery_address.as_deref().unwrap_or("-")
        ));
        lines.push(format!("Email: {}", order.contact_email.as_deref().unwrap_or("-")));
        lines.push(format!("Phone: {}", order.contact_phone.as_deref().unwrap_or("-")));
        lines.push(String::new());
        lines.push(format!("Created: {}", order.created_at.format("%Y-%m-%d %H:%M:%S")));
        lines.join("\n")
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn name(&self) -> &str {
        "email"
    }

    async fn order_created(&self, order: &Order) -> Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(format!("New order #{} ({})", order.id, items_summary(order)))
            .body(Self::body(order))
            .map_err(|e| NotifyError::Config(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotifyError::Smtp(e.to_string()))?;
        debug!(order_id = order.id, "Order notification email sent");
        Ok(())
    }

    async fn order_updated(&self, _order: &Order) -> Result<()> {
        Ok(())
    }
}
