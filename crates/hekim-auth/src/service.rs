//! Authentication service: credential login and token issuance.

use hekim_core::error::HekimResult;
use hekim_core::models::user::User;
use hekim_core::repository::UserRepository;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::AuthError;
use crate::password;
use crate::token::{IssuedToken, TokenService};

/// Input for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    /// Email address or phone number.
    pub identifier: String,
    pub password: String,
}

/// Successful login result.
#[derive(Debug, Serialize)]
pub struct LoginOutput {
    /// Signed session token.
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: u64,
    pub user: User,
}

/// Authentication service.
///
/// Generic over the user repository so that the auth layer has no
/// dependency on the database crate.
pub struct AuthService<U: UserRepository> {
    users: U,
    tokens: TokenService,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(users: U, tokens: TokenService) -> Self {
        Self { users, tokens }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Authenticate by email or phone plus password.
    ///
    /// Unknown identifier, inactive account and wrong password are all
    /// reported as the same `InvalidCredentials`.
    pub async fn login(&self, input: LoginInput) -> HekimResult<LoginOutput> {
        // 1. Look up user by email first, then phone.
        let user = match self.users.find_by_email(&input.identifier).await? {
            Some(user) => Some(user),
            None => self.users.find_by_phone(&input.identifier).await?,
        };
        let Some(user) = user else {
            debug!("Login rejected: unknown identifier");
            return Err(AuthError::InvalidCredentials.into());
        };

        // 2. Check account status.
        if !user.is_active {
            debug!(user_id = %user.id, "Login rejected: account inactive");
            return Err(AuthError::InvalidCredentials.into());
        }

        // 3. Verify password.
        if !password::verify(input.password, user.password_hash.clone()).await? {
            debug!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        // 4. Issue token.
        let issued = self.issue_for(&user)?;
        info!(user_id = %user.id, hospital_id = %user.hospital_id, "User logged in");

        Ok(LoginOutput {
            token: issued.token,
            expires_in: issued.expires_in,
            user,
        })
    }

    /// Issue a session token for an already-authenticated user.
    ///
    /// The email doubles as the token's username.
    pub fn issue_for(&self, user: &User) -> HekimResult<IssuedToken> {
        Ok(self
            .tokens
            .issue(user.id, user.hospital_id, user.role, &user.email)?)
    }
}
