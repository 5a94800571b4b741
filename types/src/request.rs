//! The outbound verification request.

/// Form field carrying the service credential.
pub const FIELD_SECRET: &str = "secret";
/// Form field carrying the challenge token.
pub const FIELD_RESPONSE: &str = "response";
/// Form field carrying the end user's address. Sent only when known.
pub const FIELD_REMOTE_IP: &str = "remoteip";

/// A single verification call, built fresh for every token.
///
/// The token is not inspected locally: empty or malformed tokens are sent
/// as-is and judged by the remote service.
#[derive(Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    secret: String,
    token: String,
    caller_address: Option<String>,
}

impl VerificationRequest {
    pub fn new(
        secret: impl Into<String>,
        token: impl Into<String>,
        caller_address: Option<String>,
    ) -> Self {
        Self {
            secret: secret.into(),
            token: token.into(),
            caller_address: caller_address.filter(|addr| !addr.is_empty()),
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn caller_address(&self) -> Option<&str> {
        self.caller_address.as_deref()
    }

    /// The `application/x-www-form-urlencoded` fields for this request.
    ///
    /// `remoteip` is omitted entirely when no caller address was supplied.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            (FIELD_SECRET, self.secret.clone()),
            (FIELD_RESPONSE, self.token.clone()),
        ];
        if let Some(addr) = &self.caller_address {
            fields.push((FIELD_REMOTE_IP, addr.clone()));
        }
        fields
    }
}

// The secret and token never show up in logs or panic messages.
impl std::fmt::Debug for VerificationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationRequest")
            .field("secret", &"<redacted>")
            .field("token_len", &self.token.len())
            .field("caller_address", &self.caller_address)
            .finish()
    }
}
