//! Resources table.
//!
//! Enumerated columns are guarded by CHECK constraints so the table never
//! holds a value the domain cannot parse back.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(RESOURCES_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS resources CASCADE;")
            .await?;
        Ok(())
    }
}

const RESOURCES_SQL: &str = r"
CREATE TABLE resources (
    id UUID PRIMARY KEY,
    description TEXT NOT NULL,
    company VARCHAR(200) NOT NULL,
    author VARCHAR(255) NOT NULL,
    author_name VARCHAR(255) NOT NULL,
    invoice_date DATE NOT NULL,
    vat NUMERIC(3, 2) NOT NULL,
    amount_ex_vat NUMERIC NOT NULL,
    amount_inc_vat BIGINT NOT NULL,
    transaction_type VARCHAR(32) NOT NULL,
    transaction_category VARCHAR(32) NOT NULL DEFAULT 'other',
    account INTEGER NOT NULL,
    done BOOLEAN NOT NULL DEFAULT FALSE,
    document_url TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_resources_vat CHECK (vat IN (0, 0.06, 0.12, 0.25)),
    CONSTRAINT chk_resources_amount CHECK (amount_ex_vat >= 0),
    CONSTRAINT chk_resources_type CHECK (
        transaction_type IN ('supplier-invoice', 'customer-invoice', 'expense')
    ),
    CONSTRAINT chk_resources_category CHECK (
        transaction_category IN ('fuel', 'material', 'mobile', 'internet', 'insurance', 'other', 'sales')
    ),
    CONSTRAINT chk_resources_account CHECK (
        account IN (5611, 4010, 6212, 6230, 6310, 6991, 3010)
    )
);

-- Listing order
CREATE INDEX idx_resources_listing ON resources(invoice_date DESC, created_at DESC);

-- Owner-scoped listings
CREATE INDEX idx_resources_author ON resources(author, invoice_date DESC);
";
