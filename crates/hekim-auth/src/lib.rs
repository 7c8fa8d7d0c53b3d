//! Hekim Auth: session tokens, the authorization gate, password hashing
//! and the one-time password-reset code flow.

pub mod config;
pub mod error;
pub mod gate;
pub mod notify;
pub mod password;
pub mod reset;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use gate::AuthGate;
pub use notify::{LogNotificationSender, NotificationSender};
pub use reset::{PasswordResetService, ResetConfirmation, ResetIssued};
pub use service::{AuthService, LoginInput, LoginOutput};
pub use token::{IssuedToken, SessionClaims, TokenService};
