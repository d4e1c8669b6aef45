use async_trait::async_trait;
use dashmap::DashMap;
use sea_orm::{ActiveValue, DbErr};
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;
use uuid::Uuid;

use crate::entities::{ProductActiveModel, ProductModel};
use crate::errors::ServiceError;

use super::{record_operation, ProductRepository};

/// Process-local product store, used by tests and for running without a database
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<DashMap<Uuid, ProductModel>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    fn insert(&self, product: ProductActiveModel) -> Result<ProductModel, DbErr> {
        let model = ProductModel {
            id: Uuid::new_v4(),
            name: value_of(product.name)
                .ok_or_else(|| DbErr::Custom("product name is required".into()))?,
            value: value_of(product.value)
                .ok_or_else(|| DbErr::Custom("product value is required".into()))?,
        };
        self.products.insert(model.id, model.clone());
        Ok(model)
    }

    fn update(&self, id: Uuid, product: ProductActiveModel) -> Result<ProductModel, DbErr> {
        let mut entry = self
            .products
            .get_mut(&id)
            .ok_or(DbErr::RecordNotUpdated)?;

        if let Some(name) = value_of(product.name) {
            entry.name = name;
        }
        if let Some(value) = value_of(product.value) {
            entry.value = value;
        }
        Ok(entry.value().clone())
    }
}

fn value_of<V>(value: ActiveValue<V>) -> Option<V>
where
    V: Into<sea_orm::Value>,
{
    match value {
        ActiveValue::Set(v) | ActiveValue::Unchanged(v) => Some(v),
        ActiveValue::NotSet => None,
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    #[instrument(skip(self, product))]
    async fn save(&self, product: ProductActiveModel) -> Result<ProductModel, ServiceError> {
        let started = Instant::now();
        let result = match product.id.clone() {
            ActiveValue::Set(id) | ActiveValue::Unchanged(id) => self.update(id, product),
            ActiveValue::NotSet => self.insert(product),
        };
        record_operation("save", started, result)
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<ProductModel>, ServiceError> {
        let started = Instant::now();
        let all: Vec<ProductModel> = self
            .products
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        record_operation("find_all", started, Ok(all))
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ProductModel>, ServiceError> {
        let started = Instant::now();
        let found = self.products.get(&id).map(|entry| entry.value().clone());
        record_operation("find_by_id", started, Ok(found))
    }

    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn delete(&self, product: ProductModel) -> Result<(), ServiceError> {
        let started = Instant::now();
        let result = self
            .products
            .remove(&product.id)
            .map(|_| ())
            .ok_or_else(|| DbErr::RecordNotFound(format!("product {}", product.id)));
        record_operation("delete", started, result)
    }
}
