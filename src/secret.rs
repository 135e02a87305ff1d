//! Shared-secret gate in front of the sensitive information.

/// Plain string compare against one configured secret. Not a security boundary.
#[derive(Clone)]
pub struct SecretGate {
    secret: String,
    sensitive_info: String,
}

impl SecretGate {
    pub fn new(secret: impl Into<String>, sensitive_info: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            sensitive_info: sensitive_info.into(),
        }
    }

    /// Returns the sensitive text when `token` equals the secret.
    pub fn check(&self, token: &str) -> Option<&str> {
        (token == self.secret).then_some(self.sensitive_info.as_str())
    }
}

// Keeps the secret out of `{:?}` output and therefore out of logs.
impl std::fmt::Debug for SecretGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretGate")
            .field("secret", &"<redacted>")
            .finish_non_exhaustive()
    }
}
