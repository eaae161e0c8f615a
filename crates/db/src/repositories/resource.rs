//! Resource repository for database operations.
//!
//! Implements resource CRUD operations using SeaORM.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set,
};
use tracing::debug;

use kassabok_core::resource::{
    Resource, ResourceError, ResourceFilter, ResourceRepository as ResourceRepoTrait,
};
use kassabok_core::{AccountCode, TransactionCategory, TransactionType, VatRate};
use kassabok_shared::types::ResourceId;

use crate::entities::resources;

/// PostgreSQL resource repository.
#[derive(Debug, Clone)]
pub struct PgResourceRepository {
    db: DatabaseConnection,
}

impl PgResourceRepository {
    /// Create a new resource repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn filtered(filter: &ResourceFilter) -> Select<resources::Entity> {
        let mut query = resources::Entity::find();

        if let Some(author) = &filter.author {
            query = query.filter(resources::Column::Author.eq(author.as_str()));
        }
        if let Some(company) = &filter.company {
            query = query.filter(
                Expr::expr(Func::lower(Expr::col(resources::Column::Company)))
                    .eq(company.to_lowercase()),
            );
        }
        if let Some(done) = filter.done {
            query = query.filter(resources::Column::Done.eq(done));
        }
        if let Some(date) = filter.invoice_date {
            query = query.filter(resources::Column::InvoiceDate.eq(date));
        }
        if let Some(transaction_type) = filter.transaction_type {
            query = query.filter(resources::Column::TransactionType.eq(transaction_type.as_str()));
        }

        query
    }
}

impl ResourceRepoTrait for PgResourceRepository {
    async fn insert(&self, resource: Resource) -> Result<Resource, ResourceError> {
        let model = to_active_model(resource)
            .insert(&self.db)
            .await
            .map_err(|e| ResourceError::repository(e.to_string()))?;

        to_domain(model)
    }

    async fn find_by_id(&self, id: ResourceId) -> Result<Option<Resource>, ResourceError> {
        let model = resources::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(|e| ResourceError::repository(e.to_string()))?;

        model.map(to_domain).transpose()
    }

    async fn count(&self, filter: &ResourceFilter) -> Result<u64, ResourceError> {
        Self::filtered(filter)
            .count(&self.db)
            .await
            .map_err(|e| ResourceError::repository(e.to_string()))
    }

    async fn list(
        &self,
        filter: &ResourceFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Resource>, ResourceError> {
        let models = Self::filtered(filter)
            .order_by_desc(resources::Column::InvoiceDate)
            .order_by_desc(resources::Column::CreatedAt)
            .order_by_desc(resources::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| ResourceError::repository(e.to_string()))?;

        debug!(rows = models.len(), offset, limit, "Fetched resource window");

        models.into_iter().map(to_domain).collect()
    }

    async fn set_done(
        &self,
        id: ResourceId,
        done: bool,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, ResourceError> {
        let result = resources::Entity::update_many()
            .col_expr(resources::Column::Done, Expr::value(done))
            .col_expr(resources::Column::UpdatedAt, Expr::value(updated_at))
            .filter(resources::Column::Id.eq(id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(|e| ResourceError::repository(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    async fn replace(&self, resource: Resource) -> Result<bool, ResourceError> {
        let id = resource.id.into_inner();
        let mut model = to_active_model(resource);
        model.id = sea_orm::ActiveValue::Unchanged(id);

        let result = resources::Entity::update_many()
            .set(model)
            .filter(resources::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| ResourceError::repository(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: ResourceId) -> Result<bool, ResourceError> {
        let result = resources::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(|e| ResourceError::repository(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}

fn to_active_model(resource: Resource) -> resources::ActiveModel {
    resources::ActiveModel {
        id: Set(resource.id.into_inner()),
        description: Set(resource.description),
        company: Set(resource.company),
        author: Set(resource.author),
        author_name: Set(resource.author_name),
        invoice_date: Set(resource.invoice_date),
        vat: Set(resource.vat.rate()),
        amount_ex_vat: Set(resource.amount_ex_vat),
        amount_inc_vat: Set(resource.amount_inc_vat),
        transaction_type: Set(resource.transaction_type.as_str().to_string()),
        transaction_category: Set(resource.transaction_category.as_str().to_string()),
        account: Set(i32::from(resource.account.number())),
        done: Set(resource.done),
        document_url: Set(resource.document_url),
        created_at: Set(resource.created_at.into()),
        updated_at: Set(resource.updated_at.into()),
    }
}

/// Convert a stored row to the domain type.
///
/// Rows are guarded by CHECK constraints; a value that still fails to parse
/// is reported as a repository error.
fn to_domain(model: resources::Model) -> Result<Resource, ResourceError> {
    let corrupt = |column: &str, value: &dyn std::fmt::Display| {
        ResourceError::repository(format!(
            "resource {} has invalid {column} '{value}'",
            model.id
        ))
    };

    let vat = VatRate::try_from(model.vat).map_err(|_| corrupt("vat", &model.vat))?;
    let transaction_type = model
        .transaction_type
        .parse::<TransactionType>()
        .map_err(|_| corrupt("transaction_type", &model.transaction_type))?;
    let transaction_category = model
        .transaction_category
        .parse::<TransactionCategory>()
        .map_err(|_| corrupt("transaction_category", &model.transaction_category))?;
    let account =
        AccountCode::try_from(model.account).map_err(|_| corrupt("account", &model.account))?;

    Ok(Resource {
        id: ResourceId::from_uuid(model.id),
        description: model.description,
        company: model.company,
        author: model.author,
        author_name: model.author_name,
        invoice_date: model.invoice_date,
        vat,
        amount_ex_vat: model.amount_ex_vat,
        amount_inc_vat: model.amount_inc_vat,
        transaction_type,
        transaction_category,
        account,
        done: model.done,
        document_url: model.document_url,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn resource() -> Resource {
        let now = Utc::now();
        Resource {
            id: ResourceId::new(),
            description: "Broadband".into(),
            company: "Bahnhof".into(),
            author: "alice".into(),
            author_name: "Acme AB".into(),
            invoice_date: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            vat: VatRate::TwentyFive,
            amount_ex_vat: dec!(399.20),
            amount_inc_vat: 499,
            transaction_type: TransactionType::SupplierInvoice,
            transaction_category: TransactionCategory::Internet,
            account: AccountCode::DataCommunication,
            done: false,
            document_url: "sealed".into(),
            created_at: now,
            updated_at: now,
        }
    }

    fn model_of(resource: &Resource) -> resources::Model {
        resources::Model {
            id: resource.id.into_inner(),
            description: resource.description.clone(),
            company: resource.company.clone(),
            author: resource.author.clone(),
            author_name: resource.author_name.clone(),
            invoice_date: resource.invoice_date,
            vat: dec!(0.25),
            amount_ex_vat: resource.amount_ex_vat,
            amount_inc_vat: resource.amount_inc_vat,
            transaction_type: "supplier-invoice".into(),
            transaction_category: "internet".into(),
            account: 6230,
            done: resource.done,
            document_url: resource.document_url.clone(),
            created_at: resource.created_at.into(),
            updated_at: resource.updated_at.into(),
        }
    }

    #[test]
    fn test_row_converts_to_domain() {
        let expected = resource();
        assert_eq!(to_domain(model_of(&expected)).unwrap(), expected);
    }

    #[test]
    fn test_corrupt_row_is_repository_error() {
        let mut model = model_of(&resource());
        model.account = 1930;
        assert!(matches!(to_domain(model), Err(ResourceError::Repository(_))));

        let mut model = model_of(&resource());
        model.transaction_category = "groceries".into();
        assert!(matches!(to_domain(model), Err(ResourceError::Repository(_))));
    }
}
