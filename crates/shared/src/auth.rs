//! Authentication types carried by bearer tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// JWT claims for access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID as issued by the identity provider).
    pub sub: String,
    /// Display name of the user's organization.
    #[serde(default)]
    pub company: String,
    /// Whether the user has the admin role.
    #[serde(default)]
    pub admin: bool,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(
        sub: impl Into<String>,
        company: impl Into<String>,
        admin: bool,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: sub.into(),
            company: company.into(),
            admin,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.sub
    }

    /// Returns true if the caller holds the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.admin
    }
}
