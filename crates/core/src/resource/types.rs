//! Resource domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use kassabok_shared::types::{PageRequest, ResourceId};

use super::error::ResourceError;
use super::validation::{parse_date, parse_done_flag};
use crate::account::{AccountCode, TransactionCategory, TransactionType};
use crate::vat::VatRate;

/// A persisted bookkeeping resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    /// Resource ID.
    pub id: ResourceId,
    /// Free-text description.
    pub description: String,
    /// Counterparty company.
    pub company: String,
    /// Subject of the user who created the resource.
    pub author: String,
    /// Organization name of the author.
    pub author_name: String,
    /// Invoice date.
    pub invoice_date: NaiveDate,
    /// VAT rate.
    pub vat: VatRate,
    /// Amount excluding VAT.
    pub amount_ex_vat: Decimal,
    /// Amount including VAT, rounded up to a whole unit.
    pub amount_inc_vat: i64,
    /// Transaction type.
    pub transaction_type: TransactionType,
    /// Transaction category.
    pub transaction_category: TransactionCategory,
    /// Ledger account.
    pub account: AccountCode,
    /// Whether the resource has been handled.
    pub done: bool,
    /// Encrypted document reference.
    pub document_url: String,
    /// Created at.
    pub created_at: DateTime<Utc>,
    /// Updated at.
    pub updated_at: DateTime<Utc>,
}

/// Conjunctive filter over resources. `None` fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceFilter {
    /// Exact author subject.
    pub author: Option<String>,
    /// Company, compared case-insensitively.
    pub company: Option<String>,
    /// Done flag.
    pub done: Option<bool>,
    /// Exact invoice date.
    pub invoice_date: Option<NaiveDate>,
    /// Exact transaction type.
    pub transaction_type: Option<TransactionType>,
}

impl ResourceFilter {
    /// Returns true if `resource` satisfies every present criterion.
    #[must_use]
    pub fn matches(&self, resource: &Resource) -> bool {
        self.author.as_ref().is_none_or(|a| *a == resource.author)
            && self
                .company
                .as_ref()
                .is_none_or(|c| c.to_lowercase() == resource.company.to_lowercase())
            && self.done.is_none_or(|d| d == resource.done)
            && self.invoice_date.is_none_or(|d| d == resource.invoice_date)
            && self
                .transaction_type
                .is_none_or(|t| t == resource.transaction_type)
    }
}

/// Raw list query parameters.
///
/// Everything arrives as text so malformed values surface as validation
/// errors rather than extractor rejections.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceListParams {
    /// Company filter.
    pub company: Option<String>,
    /// `true` or `false`.
    pub done: Option<String>,
    /// `YYYY-MM-DD`.
    pub invoice_date: Option<String>,
    /// Transaction type label.
    pub transaction_type: Option<String>,
    /// Author filter, honoured for admins only.
    pub author: Option<String>,
    /// Page number.
    pub page: Option<String>,
    /// Page size.
    pub limit: Option<String>,
}

impl ResourceListParams {
    /// Parses the parameters into a filter and a page request.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::Validation` for any malformed value.
    pub fn parse(&self) -> Result<(ResourceFilter, PageRequest), ResourceError> {
        let page = PageRequest::from_query(self.page.as_deref(), self.limit.as_deref())?;

        let done = self.done.as_deref().map(parse_done_flag).transpose()?;
        let invoice_date = self
            .invoice_date
            .as_deref()
            .map(|raw| parse_date("invoiceDate", raw))
            .transpose()?;
        let transaction_type = self
            .transaction_type
            .as_deref()
            .map(|raw| {
                raw.parse::<TransactionType>()
                    .map_err(|e| ResourceError::validation(e.to_string()))
            })
            .transpose()?;

        let filter = ResourceFilter {
            author: self.author.clone(),
            company: self.company.as_ref().map(|c| c.trim().to_string()),
            done,
            invoice_date,
            transaction_type,
        };

        Ok((filter, page))
    }
}

/// Parses a path id. Anything that is not a resource id cannot name one.
///
/// # Errors
///
/// Returns `ResourceError::NotFound` for malformed ids.
pub fn parse_resource_id(raw: &str) -> Result<ResourceId, ResourceError> {
    raw.parse().map_err(|_| ResourceError::not_found(raw))
}
