use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, TryIntoModel};
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;
use uuid::Uuid;

use crate::entities::{Product, ProductActiveModel, ProductModel};
use crate::errors::ServiceError;

use super::{record_operation, ProductRepository};

/// Product store backed by a sea-orm connection pool
#[derive(Debug, Clone)]
pub struct SeaOrmProductRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmProductRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for SeaOrmProductRepository {
    #[instrument(skip(self, product))]
    async fn save(&self, product: ProductActiveModel) -> Result<ProductModel, ServiceError> {
        let started = Instant::now();
        let result = match product.save(&*self.db).await {
            Ok(saved) => saved.try_into_model(),
            Err(e) => Err(e),
        };
        record_operation("save", started, result)
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<ProductModel>, ServiceError> {
        let started = Instant::now();
        let result = Product::find().all(&*self.db).await;
        record_operation("find_all", started, result)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ProductModel>, ServiceError> {
        let started = Instant::now();
        let result = Product::find_by_id(id).one(&*self.db).await;
        record_operation("find_by_id", started, result)
    }

    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn delete(&self, product: ProductModel) -> Result<(), ServiceError> {
        let started = Instant::now();
        let result = product.delete(&*self.db).await.map(|_| ());
        record_operation("delete", started, result)
    }
}
