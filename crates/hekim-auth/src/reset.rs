//! One-time code password reset.
//!
//! A code lives in the ephemeral store under `reset_code:{phone}` and moves
//! from issued to consumed (deleted after a successful reset) or expired
//! (dropped by the store's TTL). Issuing again overwrites the previous code.
//! The code is only ever handed to the [`NotificationSender`].

use std::time::Duration;

use hekim_core::ephemeral::EphemeralStore;
use hekim_core::error::{FieldViolation, HekimError, HekimResult, ResetFailure};
use hekim_core::repository::UserRepository;
use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::config::AuthConfig;
use crate::notify::NotificationSender;
use crate::password;

const KEY_PREFIX: &str = "reset_code:";

fn code_key(phone: &str) -> String {
    format!("{KEY_PREFIX}{phone}")
}

/// Uniform six-digit code, leading zeros kept.
fn generate_code() -> String {
    let n: u32 = rand::rng().random_range(0..1_000_000);
    format!("{n:06}")
}

/// Response to a reset request.
#[derive(Debug, Clone, Serialize)]
pub struct ResetIssued {
    pub expires_in: u64,
}

#[derive(Debug, Clone)]
pub struct ResetConfirmation {
    pub phone: String,
    pub code: String,
    pub new_password: String,
    pub confirm_password: String,
}

pub struct PasswordResetService<U: UserRepository, E: EphemeralStore, N: NotificationSender> {
    users: U,
    store: E,
    notifier: N,
    config: AuthConfig,
}

impl<U, E, N> PasswordResetService<U, E, N>
where
    U: UserRepository,
    E: EphemeralStore,
    N: NotificationSender,
{
    pub fn new(users: U, store: E, notifier: N, config: AuthConfig) -> Self {
        Self {
            users,
            store,
            notifier,
            config,
        }
    }

    pub async fn request(&self, phone: &str) -> HekimResult<ResetIssued> {
        if self.users.find_by_phone(phone).await?.is_none() {
            return Err(HekimError::PasswordReset(ResetFailure::UnknownRecipient));
        }

        let code = generate_code();
        let ttl = Duration::from_secs(self.config.reset_code_ttl_secs);
        self.store.set(&code_key(phone), code.clone(), ttl).await?;
        self.notifier.send_reset_code(phone, &code).await?;

        info!(ttl_secs = ttl.as_secs(), "Password reset code issued");
        Ok(ResetIssued {
            expires_in: ttl.as_secs(),
        })
    }

    pub async fn confirm(&self, input: ResetConfirmation) -> HekimResult<()> {
        let key = code_key(&input.phone);
        let stored = self
            .store
            .get(&key)
            .await?
            .ok_or(HekimError::PasswordReset(ResetFailure::CodeExpiredOrMissing))?;

        if stored != input.code {
            return Err(HekimError::PasswordReset(ResetFailure::CodeMismatch));
        }
        if input.new_password != input.confirm_password {
            return Err(HekimError::PasswordReset(ResetFailure::PasswordMismatch));
        }
        if input.new_password.chars().count() < self.config.min_password_length {
            return Err(HekimError::Validation(vec![FieldViolation::new(
                "new_password",
                format!(
                    "must be at least {} characters",
                    self.config.min_password_length
                ),
            )]));
        }

        // Spent before the password write: a failed write needs a new code.
        self.store.delete(&[key]).await?;

        let user = self
            .users
            .find_by_phone(&input.phone)
            .await?
            .ok_or(HekimError::PasswordReset(ResetFailure::UnknownRecipient))?;
        let hash = password::hash(input.new_password).await?;
        self.users.set_password_hash(user.id, hash).await?;

        info!(user_id = %user.id, "Password reset completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_six_digits() {
        for _ in 0..200 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn key_is_namespaced_by_phone() {
        assert_eq!(code_key("05551234567"), "reset_code:05551234567");
    }
}
