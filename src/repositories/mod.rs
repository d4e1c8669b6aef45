use crate::entities::{ProductActiveModel, ProductModel};
use crate::errors::ServiceError;
use async_trait::async_trait;
use metrics::{counter, histogram};
use sea_orm::DbErr;
use std::time::Instant;
use tracing::{debug, error};
use uuid::Uuid;

pub mod in_memory;
pub mod product_repository;

pub use in_memory::InMemoryProductRepository;
pub use product_repository::SeaOrmProductRepository;

/// Record store for products.
///
/// `save` inserts when the identifier is unset and updates otherwise. Lookups
/// report absence with `None`; only storage failures are errors.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Persists `product` and returns the stored row with its identifier populated
    async fn save(&self, product: ProductActiveModel) -> Result<ProductModel, ServiceError>;

    async fn find_all(&self) -> Result<Vec<ProductModel>, ServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ProductModel>, ServiceError>;

    /// Removes the row matching `product.id`. Callers confirm existence first.
    async fn delete(&self, product: ProductModel) -> Result<(), ServiceError>;
}

/// Records duration and failure metrics for a finished store call and lifts
/// the storage error into a `ServiceError`
pub(crate) fn record_operation<T>(
    operation: &'static str,
    started: Instant,
    result: Result<T, DbErr>,
) -> Result<T, ServiceError> {
    let elapsed = started.elapsed();
    counter!("products_db.operation.total", 1, "operation" => operation);
    histogram!("products_db.operation.duration", elapsed, "operation" => operation);

    match result {
        Ok(value) => {
            debug!(operation = %operation, duration = ?elapsed, "Database operation completed successfully");
            Ok(value)
        }
        Err(e) => {
            error!(operation = %operation, error = %e, "Database operation failed");
            counter!("products_db.operation.error", 1, "operation" => operation);
            Err(ServiceError::DatabaseError(e))
        }
    }
}
