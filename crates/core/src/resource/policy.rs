//! Caller scoping and per-resource authorization.

use kassabok_shared::Claims;

use super::error::ResourceError;
use super::types::{Resource, ResourceFilter};

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// User subject.
    pub sub: String,
    /// Organization display name.
    pub company: String,
    /// Admin role.
    pub admin: bool,
}

impl From<&Claims> for Caller {
    fn from(claims: &Claims) -> Self {
        Self {
            sub: claims.sub.clone(),
            company: claims.company.clone(),
            admin: claims.admin,
        }
    }
}

/// Something a caller wants to do with a single resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Fetch it.
    Read,
    /// Overwrite its fields.
    Replace,
    /// Toggle the done flag.
    SetDone,
    /// Remove it.
    Delete,
}

impl Caller {
    /// Checks whether the caller may perform `action` on `resource`.
    ///
    /// Owners may read and replace their own resources. Toggling `done` and
    /// deleting are reserved for admins.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::Forbidden` when the action is not allowed.
    pub fn authorize(&self, action: Action, resource: &Resource) -> Result<(), ResourceError> {
        let allowed = self.admin
            || match action {
                Action::Read | Action::Replace => resource.author == self.sub,
                Action::SetDone | Action::Delete => false,
            };

        if allowed {
            Ok(())
        } else {
            Err(ResourceError::Forbidden(format!(
                "{action:?} on resource {} requires {}",
                resource.id,
                match action {
                    Action::Read | Action::Replace => "ownership or admin role",
                    Action::SetDone | Action::Delete => "admin role",
                }
            )))
        }
    }

    /// Restricts a list filter to what the caller may see.
    ///
    /// Non-admins only ever see their own resources, whatever author they
    /// asked for. Admins keep the requested author, if any.
    #[must_use]
    pub fn scope_filter(&self, mut filter: ResourceFilter) -> ResourceFilter {
        if !self.admin {
            filter.author = Some(self.sub.clone());
        }
        filter
    }
}
