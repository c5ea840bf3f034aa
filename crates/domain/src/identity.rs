//! Credential decoding and identity validation.
//!
//! A credential is the base64 encoding of the user's email address, sent in
//! the `Authorization` header. This is a placeholder scheme: anyone who
//! knows an email address can forge its token. It identifies callers, it
//! does not authenticate them.

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};

const BEARER_PREFIX: &str = "Bearer ";
const MAX_EMAIL_LEN: usize = 254;
const MAX_LOCAL_PART_LEN: usize = 64;

/// A validated, email-shaped identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    /// Validates `email` and wraps it.
    ///
    /// Returns `None` if the value is not email-shaped.
    pub fn parse(email: &str) -> Option<Self> {
        is_email(email).then(|| Self(email.to_string()))
    }

    /// Returns the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Encodes the identity as a credential token.
    pub fn to_token(&self) -> String {
        STANDARD.encode(self.0.as_bytes())
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Decodes request credentials into identities without touching any backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityResolver;

impl IdentityResolver {
    /// Resolves a raw `Authorization` header value.
    ///
    /// A missing header, undecodable value or non-email payload all resolve
    /// to `None`, the anonymous case.
    pub fn resolve(&self, credential: Option<&str>) -> Option<Identity> {
        let raw = credential?.trim();
        let token = raw.strip_prefix(BEARER_PREFIX).unwrap_or(raw).trim();
        if token.is_empty() {
            return None;
        }

        let bytes = STANDARD
            .decode(token)
            .or_else(|_| STANDARD_NO_PAD.decode(token))
            .ok()?;
        let decoded = String::from_utf8(bytes).ok()?;
        Identity::parse(&decoded)
    }
}

fn is_email(value: &str) -> bool {
    if value.is_empty() || value.len() > MAX_EMAIL_LEN {
        return false;
    }
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.len() > MAX_LOCAL_PART_LEN || domain.contains('@') {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let valid_labels = labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_alphanumeric() || c == '-')
    });
    let tld_ok = labels
        .last()
        .is_some_and(|tld| tld.chars().count() >= 2 && !tld.chars().all(|c| c.is_ascii_digit()));

    valid_labels && tld_ok
}
