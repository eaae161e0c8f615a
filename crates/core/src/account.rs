//! Transaction classification and account-code resolution.
//!
//! Every resource is booked against a fixed ledger account determined by its
//! transaction type and category. Only supplier invoices are split by
//! category; everything else lands on the sales account.

use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Kind of bookkeeping transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionType {
    /// Invoice received from a supplier.
    SupplierInvoice,
    /// Invoice sent to a customer.
    CustomerInvoice,
    /// Expense paid out of pocket.
    Expense,
}

/// Category of a transaction, used to pick the cost account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionCategory {
    /// Vehicle fuel.
    Fuel,
    /// Goods and materials.
    Material,
    /// Mobile phone.
    Mobile,
    /// Internet and data communication.
    Internet,
    /// Business insurance.
    Insurance,
    /// Anything not covered by a specific category.
    #[default]
    Other,
    /// Sales.
    Sales,
}

/// A label that names no known transaction type or category.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownLabel {
    /// What was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl TransactionType {
    /// Canonical wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SupplierInvoice => "supplier-invoice",
            Self::CustomerInvoice => "customer-invoice",
            Self::Expense => "expense",
        }
    }
}

impl FromStr for TransactionType {
    type Err = UnknownLabel;

    /// Case-insensitive; also accepts the Swedish labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "supplier-invoice" | "leverantörsfaktura" => Ok(Self::SupplierInvoice),
            "customer-invoice" | "kundfaktura" => Ok(Self::CustomerInvoice),
            "expense" | "utlägg" => Ok(Self::Expense),
            _ => Err(UnknownLabel {
                kind: "transactionType",
                value: s.to_string(),
            }),
        }
    }
}

impl TransactionCategory {
    /// Canonical wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fuel => "fuel",
            Self::Material => "material",
            Self::Mobile => "mobile",
            Self::Internet => "internet",
            Self::Insurance => "insurance",
            Self::Other => "other",
            Self::Sales => "sales",
        }
    }
}

impl FromStr for TransactionCategory {
    type Err = UnknownLabel;

    /// Case-insensitive; also accepts the Swedish labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fuel" | "bensin" => Ok(Self::Fuel),
            "material" => Ok(Self::Material),
            "mobile" | "mobil" => Ok(Self::Mobile),
            "internet" => Ok(Self::Internet),
            "insurance" | "försäkring" => Ok(Self::Insurance),
            "other" | "övrigt" => Ok(Self::Other),
            "sales" | "försäljning" => Ok(Self::Sales),
            _ => Err(UnknownLabel {
                kind: "transactionCategory",
                value: s.to_string(),
            }),
        }
    }
}

/// Ledger account a resource is booked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountCode {
    /// 5611 - fuel for company cars.
    Fuel,
    /// 4010 - purchased materials and goods.
    Materials,
    /// 6212 - mobile phone.
    MobilePhone,
    /// 6230 - data communication.
    DataCommunication,
    /// 6310 - business insurance.
    Insurance,
    /// 6991 - other deductible external costs.
    OtherExternalCosts,
    /// 3010 - sales.
    Sales,
}

/// An account number that is not one of the fixed codes.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown account number {0}")]
pub struct UnknownAccount(pub i32);

impl AccountCode {
    /// All account codes.
    pub const ALL: [Self; 7] = [
        Self::Fuel,
        Self::Materials,
        Self::MobilePhone,
        Self::DataCommunication,
        Self::Insurance,
        Self::OtherExternalCosts,
        Self::Sales,
    ];

    /// The ledger account number.
    #[must_use]
    pub const fn number(self) -> u16 {
        match self {
            Self::Fuel => 5611,
            Self::Materials => 4010,
            Self::MobilePhone => 6212,
            Self::DataCommunication => 6230,
            Self::Insurance => 6310,
            Self::OtherExternalCosts => 6991,
            Self::Sales => 3010,
        }
    }

    /// Resolves the account for an already-typed transaction.
    #[must_use]
    pub const fn for_transaction(
        transaction_type: TransactionType,
        category: TransactionCategory,
    ) -> Self {
        match transaction_type {
            TransactionType::SupplierInvoice => supplier_invoice_account(Some(category)),
            TransactionType::CustomerInvoice | TransactionType::Expense => Self::Sales,
        }
    }
}

impl TryFrom<i32> for AccountCode {
    type Error = UnknownAccount;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|code| i32::from(code.number()) == value)
            .ok_or(UnknownAccount(value))
    }
}

impl std::fmt::Display for AccountCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

const fn supplier_invoice_account(category: Option<TransactionCategory>) -> AccountCode {
    match category {
        Some(TransactionCategory::Fuel) => AccountCode::Fuel,
        Some(TransactionCategory::Material) => AccountCode::Materials,
        Some(TransactionCategory::Mobile) => AccountCode::MobilePhone,
        Some(TransactionCategory::Internet) => AccountCode::DataCommunication,
        Some(TransactionCategory::Insurance) => AccountCode::Insurance,
        _ => AccountCode::OtherExternalCosts,
    }
}

/// Resolves the account for raw, possibly missing labels.
///
/// Total over all inputs: unknown or missing types book to sales, and
/// supplier invoices with an unknown or missing category book to other
/// external costs.
#[must_use]
pub fn resolve_account(
    transaction_type: Option<&str>,
    transaction_category: Option<&str>,
) -> AccountCode {
    let transaction_type = transaction_type.and_then(|t| t.parse::<TransactionType>().ok());
    let category = transaction_category.and_then(|c| c.parse::<TransactionCategory>().ok());

    match transaction_type {
        Some(TransactionType::SupplierInvoice) => supplier_invoice_account(category),
        _ => AccountCode::Sales,
    }
}
