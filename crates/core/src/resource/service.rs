//! Resource service implementation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use kassabok_shared::types::{Page, ResourceId};

use super::error::ResourceError;
use super::policy::{Action, Caller};
use super::repository::ResourceRepository;
use super::types::{Resource, ResourceListParams};
use super::validation::{DonePatch, ResourceDraft, ValidatedResource};
use crate::account::AccountCode;
use crate::cipher::DocumentCipher;
use crate::vat::compute_amount_including_vat;

/// Resource service: validation, derivation, authorization and persistence.
pub struct ResourceService<R: ResourceRepository> {
    repo: Arc<R>,
    cipher: Arc<DocumentCipher>,
}

impl<R: ResourceRepository> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            cipher: Arc::clone(&self.cipher),
        }
    }
}

impl<R: ResourceRepository> ResourceService<R> {
    /// Create a new resource service.
    #[must_use]
    pub fn new(repo: Arc<R>, cipher: Arc<DocumentCipher>) -> Self {
        Self { repo, cipher }
    }

    /// Validate and store a new resource owned by `caller`.
    ///
    /// Nothing is stored unless every field validates and the document
    /// reference encrypts.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::Validation` for bad input or a caller without
    /// an organization, or a cipher or repository error.
    pub async fn create(
        &self,
        caller: &Caller,
        draft: ResourceDraft,
    ) -> Result<Resource, ResourceError> {
        if caller.company.trim().is_empty() {
            return Err(ResourceError::validation(
                "caller has no organization (company claim) to record as authorName",
            ));
        }
        let input = draft.into_validated()?;
        let now = Utc::now();

        let resource = self.derive(
            input,
            ResourceId::new(),
            caller.sub.clone(),
            caller.company.clone(),
            now,
            now,
        )?;

        let stored = self.repo.insert(resource).await?;

        info!(
            resource_id = %stored.id,
            author = %stored.author,
            account = stored.account.number(),
            "Resource created"
        );

        Ok(stored)
    }

    /// Fetch one resource.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::NotFound` if it does not exist, then
    /// `ResourceError::Forbidden` if the caller is neither owner nor admin.
    pub async fn get(&self, caller: &Caller, id: ResourceId) -> Result<Resource, ResourceError> {
        let resource = self.load(id).await?;
        caller.authorize(Action::Read, &resource)?;
        Ok(resource)
    }

    /// List resources visible to the caller.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::Validation` for malformed query values.
    pub async fn list(
        &self,
        caller: &Caller,
        params: &ResourceListParams,
    ) -> Result<Page<Resource>, ResourceError> {
        let (filter, page) = params.parse()?;
        let filter = caller.scope_filter(filter);

        let total = self.repo.count(&filter).await?;
        let items = self.repo.list(&filter, page.offset(), page.limit).await?;

        debug!(
            caller = %caller.sub,
            admin = caller.admin,
            page = page.page,
            limit = page.limit,
            total,
            "Listed resources"
        );

        Ok(Page::new(items, page, total))
    }

    /// Set the done flag. Admins only.
    ///
    /// # Errors
    ///
    /// Validation of the flag comes first, then existence, then authorization.
    pub async fn set_done(
        &self,
        caller: &Caller,
        id: ResourceId,
        patch: &DonePatch,
    ) -> Result<(), ResourceError> {
        let done = patch.parse()?;
        let resource = self.load(id).await?;
        caller.authorize(Action::SetDone, &resource)?;

        if !self.repo.set_done(id, done, Utc::now()).await? {
            return Err(ResourceError::not_found(id));
        }

        info!(resource_id = %id, done, caller = %caller.sub, "Resource done flag updated");
        Ok(())
    }

    /// Overwrite a resource's fields, keeping its id, author and creation time.
    ///
    /// An omitted `done` keeps the stored flag.
    ///
    /// # Errors
    ///
    /// Validation comes first, then existence, then authorization.
    pub async fn replace(
        &self,
        caller: &Caller,
        id: ResourceId,
        draft: ResourceDraft,
    ) -> Result<(), ResourceError> {
        let keep_done = draft.done.is_none();
        let input = draft.into_validated()?;
        let existing = self.load(id).await?;
        caller.authorize(Action::Replace, &existing)?;

        let done = if keep_done { existing.done } else { input.done };
        let mut updated = self.derive(
            input,
            existing.id,
            existing.author,
            existing.author_name,
            existing.created_at,
            Utc::now(),
        )?;
        updated.done = done;

        if !self.repo.replace(updated).await? {
            return Err(ResourceError::not_found(id));
        }

        info!(resource_id = %id, caller = %caller.sub, "Resource replaced");
        Ok(())
    }

    /// Delete a resource. Admins only.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::NotFound` or `ResourceError::Forbidden`.
    pub async fn delete(&self, caller: &Caller, id: ResourceId) -> Result<(), ResourceError> {
        let resource = self.load(id).await?;
        caller.authorize(Action::Delete, &resource)?;

        if !self.repo.delete(id).await? {
            return Err(ResourceError::not_found(id));
        }

        info!(resource_id = %id, caller = %caller.sub, "Resource deleted");
        Ok(())
    }

    async fn load(&self, id: ResourceId) -> Result<Resource, ResourceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ResourceError::not_found(id))
    }

    /// Builds the stored form: account and gross amount derived, document sealed.
    fn derive(
        &self,
        input: ValidatedResource,
        id: ResourceId,
        author: String,
        author_name: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Resource, ResourceError> {
        let account =
            AccountCode::for_transaction(input.transaction_type, input.transaction_category);
        let amount_inc_vat = compute_amount_including_vat(input.amount_ex_vat, input.vat);
        let document_url = self.cipher.encrypt(&input.document_url)?;

        Ok(Resource {
            id,
            description: input.description,
            company: input.company,
            author,
            author_name,
            invoice_date: input.invoice_date,
            vat: input.vat,
            amount_ex_vat: input.amount_ex_vat,
            amount_inc_vat,
            transaction_type: input.transaction_type,
            transaction_category: input.transaction_category,
            account,
            done: input.done,
            document_url,
            created_at,
            updated_at,
        })
    }
}
