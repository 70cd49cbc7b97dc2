use std::collections::BTreeSet;

use tracing::warn;

/// Proof that the caller passed an administrator check.
///
/// Reporter entry points take this by reference so the check cannot be skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    email: String,
}

impl AdminIdentity {
    /// Minted by [`AdminAuthorizer`] implementations once a credential has been verified.
    pub fn verified(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Verifies a caller-supplied credential against the identity provider.
pub trait AdminAuthorizer: Send + Sync {
    fn authorize(&self, credential: Option<&str>) -> Result<AdminIdentity, AccessError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("missing caller credential")]
    MissingCredential,
    #[error("access denied: administrator privileges required")]
    NotAdministrator,
}

/// Authorizer backed by a configured list of administrator e-mails.
#[derive(Debug, Clone, Default)]
pub struct AdminAllowList {
    emails: BTreeSet<String>,
}

impl AdminAllowList {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let emails = emails
            .into_iter()
            .map(|email| normalize_email(email.as_ref()))
            .filter(|email| !email.is_empty())
            .collect();
        Self { emails }
    }

    pub fn is_admin(&self, email: &str) -> bool {
        self.emails.contains(&normalize_email(email))
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

impl AdminAuthorizer for AdminAllowList {
    fn authorize(&self, credential: Option<&str>) -> Result<AdminIdentity, AccessError> {
        let email = credential
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(AccessError::MissingCredential)?;

        if self.is_admin(email) {
            Ok(AdminIdentity::verified(normalize_email(email)))
        } else {
            warn!(caller = %email, "rejected non-administrator connection request");
            Err(AccessError::NotAdministrator)
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}
