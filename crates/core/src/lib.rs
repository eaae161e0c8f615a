//! Core business logic for Kassabok.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `vat` - VAT-inclusive amount calculation
//! - `account` - Transaction classification and account-code resolution
//! - `cipher` - Encryption of stored document references
//! - `resource` - Bookkeeping resources: validation, access policy, service, storage seam

pub mod account;
pub mod cipher;
pub mod resource;
pub mod vat;

pub use account::{AccountCode, TransactionCategory, TransactionType, resolve_account};
pub use cipher::{CipherError, DocumentCipher};
pub use vat::{VatRate, compute_amount_including_vat};
