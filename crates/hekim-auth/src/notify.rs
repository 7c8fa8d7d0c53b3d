//! Out-of-band delivery of reset codes.

use std::future::Future;

use hekim_core::error::HekimResult;
use tracing::info;

/// Delivers a one-time code to the owner of a phone number.
pub trait NotificationSender: Send + Sync {
    fn send_reset_code(
        &self,
        phone: &str,
        code: &str,
    ) -> impl Future<Output = HekimResult<()>> + Send;
}

/// Development sender: records the delivery in the log instead of sending
/// an SMS. The code itself is only emitted at `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotificationSender;

impl NotificationSender for LogNotificationSender {
    async fn send_reset_code(&self, phone: &str, code: &str) -> HekimResult<()> {
        info!(phone = %mask(phone), "Password reset code dispatched");
        tracing::debug!(phone, code, "Reset code contents");
        Ok(())
    }
}

/// Keep only the last four digits.
fn mask(phone: &str) -> String {
    let visible = phone.len().saturating_sub(4);
    phone
        .char_indices()
        .map(|(i, c)| if i < visible { '*' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_hides_all_but_last_four() {
        assert_eq!(mask("05551234567"), "*******4567");
        assert_eq!(mask("123"), "123");
    }
}
