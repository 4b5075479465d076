//! Admin authorization gate.
//!
//! Two independent, composable checks at the transport boundary: a
//! configured long-lived token carried in the `x-admin-token` header, or
//! a per-call `password` field in the request body. Either grant
//! authorizes the request; the store layer below assumes callers are
//! already authorized. Deliberately a plain string comparison — this is
//! not a hardened credential scheme and should not be copied as one.

/// Header carrying the long-lived admin token.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Stateless admin authorization.
pub struct AdminGate {
    password: String,
    token: Option<String>,
}

impl AdminGate {
    pub fn new(password: impl Into<String>, token: Option<String>) -> Self {
        Self {
            password: password.into(),
            token,
        }
    }

    /// Check the two grants; either one suffices.
    pub fn authorize(&self, header_token: Option<&str>, password: Option<&str>) -> bool {
        let token_ok = match (&self.token, header_token) {
            (Some(expected), Some(given)) => !expected.is_empty() && expected == given,
            _ => false,
        };
        let password_ok = match password {
            Some(given) => !self.password.is_empty() && given == self.password,
            None => false,
        };
        token_ok || password_ok
    }
}
