//! Authentication configuration.

/// Configuration for token issuance, password policy and reset codes.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Shared HS256 secret used to sign and verify session tokens.
    pub jwt_secret: String,
    /// Session token lifetime in seconds (default: 86_400 = 24 hours).
    pub token_lifetime_secs: u64,
    /// JWT issuer (`iss` claim).
    pub jwt_issuer: String,
    /// Minimum password length for policy enforcement.
    pub min_password_length: usize,
    /// Lifetime of a password-reset code in seconds (default: 300).
    pub reset_code_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_lifetime_secs: 86_400,
            jwt_issuer: "hekim".into(),
            min_password_length: 6,
            reset_code_ttl_secs: 300,
        }
    }
}
