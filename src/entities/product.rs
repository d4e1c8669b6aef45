use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Product entity
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Primary key, assigned by the store on first save
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Product name
    pub name: String,

    /// Product value. Unbounded `numeric` on Postgres; SQLite stores it as `real`.
    #[sea_orm(column_type = "Decimal(None)")]
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub value: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;

        // Identifiers are minted exactly once, when the row is first written
        if insert {
            if let ActiveValue::NotSet = active_model.id {
                active_model.id = Set(Uuid::new_v4());
            }
        }

        Ok(active_model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseConnection, IntoActiveModel};

    #[tokio::test]
    async fn insert_assigns_identifier_when_missing() {
        let db = DatabaseConnection::Disconnected;
        let product = ActiveModel {
            name: Set("Widget".to_string()),
            value: Set(dec!(9.99)),
            ..Default::default()
        };

        let prepared = product.before_save(&db, true).await.unwrap();
        assert!(matches!(prepared.id, ActiveValue::Set(id) if !id.is_nil()));
    }

    #[tokio::test]
    async fn update_keeps_existing_identifier() {
        let db = DatabaseConnection::Disconnected;
        let id = Uuid::new_v4();
        let product = Model {
            id,
            name: "Widget".to_string(),
            value: dec!(9.99),
        }
        .into_active_model();

        let prepared = product.before_save(&db, false).await.unwrap();
        assert_eq!(prepared.id, ActiveValue::Unchanged(id));
    }

    #[test]
    fn value_serializes_as_exact_json_number() {
        let product = Model {
            id: Uuid::nil(),
            name: "Widget".to_string(),
            value: dec!(12345678901234.5678),
        };
        let json = serde_json::to_string(&product).unwrap();
        assert!(json.contains(r#""value":12345678901234.5678"#), "{json}");
    }

    #[test]
    fn table_definition_builds_for_every_backend() {
        use sea_orm::{DbBackend, Schema};

        for backend in [DbBackend::Sqlite, DbBackend::Postgres] {
            let stmt = Schema::new(backend).create_table_from_entity(Entity);
            let sql = backend.build(&stmt).to_string();
            assert!(sql.contains("products"), "{sql}");
        }
    }
}
