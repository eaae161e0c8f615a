//! Input validation and sanitization for resource writes.

use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use super::error::ResourceError;
use crate::account::{TransactionCategory, TransactionType};
use crate::vat::VatRate;

/// Largest accepted amount excluding VAT.
const MAX_AMOUNT_EX_VAT: i64 = 1_000_000_000_000_000;

/// Body of a create or full-update request, as sent by the client.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDraft {
    /// Invoice date, `YYYY-MM-DD` or an RFC 3339 timestamp.
    #[serde(alias = "invoiceDate")]
    pub date: Option<String>,
    /// Free-text description.
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    /// Counterparty company.
    #[validate(length(max = 200))]
    pub company: Option<String>,
    /// Transaction type label.
    pub transaction_type: Option<String>,
    /// Transaction category label.
    pub transaction_category: Option<String>,
    /// Amount excluding VAT.
    pub amount_ex_vat: Option<Decimal>,
    /// VAT rate as a fraction.
    pub vat: Option<Decimal>,
    /// Initial done flag.
    pub done: Option<DoneValue>,
    /// Plain document reference.
    #[validate(length(max = 2048))]
    pub document_url: Option<String>,
}

/// A `done` value as sent by clients: a boolean or its string spelling.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DoneValue {
    /// JSON boolean.
    Flag(bool),
    /// `"true"` or `"false"`.
    Text(String),
}

impl DoneValue {
    /// Interprets the value as a boolean.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::Validation` for strings other than `"true"` and `"false"`.
    pub fn parse(&self) -> Result<bool, ResourceError> {
        match self {
            Self::Flag(flag) => Ok(*flag),
            Self::Text(text) => parse_done_flag(text),
        }
    }
}

/// Body of a partial update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DonePatch {
    /// New done flag.
    pub done: Option<DoneValue>,
}

impl DonePatch {
    /// Returns the requested flag.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::Validation` if `done` is missing or malformed.
    pub fn parse(&self) -> Result<bool, ResourceError> {
        self.done
            .as_ref()
            .ok_or_else(|| ResourceError::validation("done is required"))?
            .parse()
    }
}

/// Fully parsed and sanitized resource input.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedResource {
    /// Sanitized description.
    pub description: String,
    /// Sanitized company.
    pub company: String,
    /// Invoice date.
    pub invoice_date: NaiveDate,
    /// VAT rate.
    pub vat: VatRate,
    /// Amount excluding VAT.
    pub amount_ex_vat: Decimal,
    /// Transaction type.
    pub transaction_type: TransactionType,
    /// Transaction category.
    pub transaction_category: TransactionCategory,
    /// Done flag.
    pub done: bool,
    /// Plain document reference, not yet encrypted.
    pub document_url: String,
}

impl ResourceDraft {
    /// Validates every field and produces typed, sanitized values.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::Validation` naming the first offending field.
    pub fn into_validated(self) -> Result<ValidatedResource, ResourceError> {
        self.validate()
            .map_err(|e| ResourceError::validation(e.to_string()))?;

        let invoice_date = parse_date("date", required("date", self.date.as_deref())?)?;
        let description = sanitize(
            "description",
            required("description", self.description.as_deref())?,
        )?;
        let company = sanitize("company", required("company", self.company.as_deref())?)?;

        let transaction_type = required("transactionType", self.transaction_type.as_deref())?
            .parse::<TransactionType>()
            .map_err(|e| ResourceError::validation(e.to_string()))?;

        let transaction_category = match self.transaction_category.as_deref().map(str::trim) {
            None | Some("") => TransactionCategory::default(),
            Some(raw) => raw
                .parse::<TransactionCategory>()
                .map_err(|e| ResourceError::validation(e.to_string()))?,
        };

        let document_url = required("documentUrl", self.document_url.as_deref())?
            .trim()
            .to_string();
        if document_url.is_empty() {
            return Err(ResourceError::validation("documentUrl must not be empty"));
        }

        let amount_ex_vat = self
            .amount_ex_vat
            .ok_or_else(|| ResourceError::validation("amountExVat is required"))?;
        if amount_ex_vat < Decimal::ZERO {
            return Err(ResourceError::validation("amountExVat must not be negative"));
        }
        if amount_ex_vat > Decimal::from(MAX_AMOUNT_EX_VAT) {
            return Err(ResourceError::validation("amountExVat is too large"));
        }

        let vat = self
            .vat
            .ok_or_else(|| ResourceError::validation("vat is required"))
            .and_then(|rate| {
                VatRate::try_from(rate).map_err(|e| ResourceError::validation(e.to_string()))
            })?;

        let done = self.done.as_ref().map(DoneValue::parse).transpose()?.unwrap_or(false);

        Ok(ValidatedResource {
            description,
            company,
            invoice_date,
            vat,
            amount_ex_vat,
            transaction_type,
            transaction_category,
            done,
            document_url,
        })
    }
}

fn required<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, ResourceError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ResourceError::validation(format!("{field} is required"))),
    }
}

/// Strips markup delimiters and surrounding whitespace.
fn sanitize(field: &str, value: &str) -> Result<String, ResourceError> {
    let cleaned: String = value.chars().filter(|c| !matches!(c, '<' | '>')).collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        return Err(ResourceError::validation(format!("{field} must not be empty")));
    }

    Ok(cleaned.to_string())
}

/// Parses `YYYY-MM-DD`, or an RFC 3339 timestamp reduced to its date.
pub(super) fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, ResourceError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| ResourceError::validation(format!("{field} must be a date (YYYY-MM-DD)")))
}

pub(super) fn parse_done_flag(raw: &str) -> Result<bool, ResourceError> {
    match raw.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ResourceError::validation("done must be true or false")),
    }
}
