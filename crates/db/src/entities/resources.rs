//! `SeaORM` Entity for resources table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "resources")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub company: String,
    pub author: String,
    pub author_name: String,
    pub invoice_date: Date,
    #[sea_orm(column_type = "Decimal(Some((3, 2)))")]
    pub vat: Decimal,
    #[sea_orm(column_type = "Decimal(None)")]
    pub amount_ex_vat: Decimal,
    pub amount_inc_vat: i64,
    pub transaction_type: String,
    pub transaction_category: String,
    pub account: i32,
    pub done: bool,
    #[sea_orm(column_type = "Text")]
    pub document_url: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
