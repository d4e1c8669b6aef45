use crate::{
    dto::ProductInput,
    entities::{ProductActiveModel, ProductModel},
    errors::{ApiError, ErrorResponse},
    handlers::common::{created_response, success_response, text_response, ValidatedJson},
    links::{product_link, products_link, BaseUrl, Link, PRODUCTS_ROUTE},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::get,
    Router,
};
use rust_decimal::Decimal;
use sea_orm::IntoActiveModel;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

pub const PRODUCT_NOT_FOUND: &str = "Product not found.";
pub const PRODUCT_DELETED: &str = "Product deleted successfully";

/// Product as returned to clients, with navigation links
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductResource {
    pub id: Uuid,
    #[schema(example = "Widget")]
    pub name: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    #[schema(value_type = f64, example = 9.99)]
    pub value: Decimal,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl ProductResource {
    pub fn with_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }
}

impl From<ProductModel> for ProductResource {
    fn from(model: ProductModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            value: model.value,
            links: Vec::new(),
        }
    }
}

/// Creates the router for product endpoints
pub fn products_routes() -> Router<AppState> {
    Router::new()
        .route(PRODUCTS_ROUTE, get(list_products).post(create_product))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

fn product_not_found() -> Response {
    text_response(StatusCode::NOT_FOUND, PRODUCT_NOT_FOUND)
}

/// Create a new product
#[utoipa::path(
    post,
    path = "/products",
    request_body = ProductInput,
    responses(
        (status = 201, description = "Product created", body = ProductResource),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "Products"
)]
#[instrument(skip(state, input))]
pub async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<ProductInput>,
) -> Result<Response, ApiError> {
    let mut product = <ProductActiveModel as Default>::default();
    input.apply_to(&mut product);

    let saved = state.products.save(product).await?;
    info!(product_id = %saved.id, "Product created");

    Ok(created_response(ProductResource::from(saved)))
}

/// List every product, each with a link to itself
#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "All products", body = [ProductResource]),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "Products"
)]
#[instrument(skip(state, base))]
pub async fn list_products(
    State(state): State<AppState>,
    base: BaseUrl,
) -> Result<Response, ApiError> {
    let products: Vec<ProductResource> = state
        .products
        .find_all()
        .await?
        .into_iter()
        .map(|model| {
            let link = product_link(&base, model.id);
            ProductResource::from(model).with_link(link)
        })
        .collect();

    Ok(success_response(products))
}

/// Get a product by id, with a link back to the list
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = ProductResource),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Product not found", body = String, content_type = "text/plain")
    ),
    tag = "Products"
)]
#[instrument(skip(state, base))]
pub async fn get_product(
    State(state): State<AppState>,
    base: BaseUrl,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let Some(product) = state.products.find_by_id(id).await? else {
        return Ok(product_not_found());
    };

    Ok(success_response(
        ProductResource::from(product).with_link(products_link(&base)),
    ))
}

/// Replace the name and value of an existing product
#[utoipa::path(
    put,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = ProductInput,
    responses(
        (status = 200, description = "Product updated", body = ProductResource),
        (status = 400, description = "Invalid payload or malformed id", body = ErrorResponse),
        (status = 404, description = "Product not found", body = String, content_type = "text/plain")
    ),
    tag = "Products"
)]
#[instrument(skip(state, input))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(input): ValidatedJson<ProductInput>,
) -> Result<Response, ApiError> {
    let Some(existing) = state.products.find_by_id(id).await? else {
        return Ok(product_not_found());
    };

    let mut product = existing.into_active_model();
    input.apply_to(&mut product);

    let saved = state.products.save(product).await?;
    info!(product_id = %saved.id, "Product updated");

    Ok(success_response(ProductResource::from(saved)))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted", body = String, content_type = "text/plain"),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Product not found", body = String, content_type = "text/plain")
    ),
    tag = "Products"
)]
#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let Some(existing) = state.products.find_by_id(id).await? else {
        return Ok(product_not_found());
    };

    state.products.delete(existing).await?;
    info!(product_id = %id, "Product deleted");

    Ok(text_response(StatusCode::OK, PRODUCT_DELETED))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn widget() -> ProductModel {
        ProductModel {
            id: Uuid::nil(),
            name: "Widget".into(),
            value: dec!(9.99),
        }
    }

    #[test]
    fn resource_starts_without_links() {
        let resource = ProductResource::from(widget());
        assert!(resource.links.is_empty());

        let json = serde_json::to_value(&resource).unwrap();
        assert_eq!(json["value"].to_string(), "9.99");
        assert_eq!(json["links"], serde_json::json!([]));
    }

    #[test]
    fn value_keeps_all_significant_digits() {
        let model = ProductModel {
            value: dec!(12345678901234.5678),
            ..widget()
        };
        let body = serde_json::to_string(&ProductResource::from(model)).unwrap();
        assert!(body.contains(r#""value":12345678901234.5678"#), "{body}");

        let parsed: ProductResource = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed.value.to_string(), "12345678901234.5678");
    }

    #[test]
    fn with_link_appends() {
        let base = BaseUrl::new("http://localhost:8080");
        let resource = ProductResource::from(widget()).with_link(products_link(&base));
        assert_eq!(resource.links.len(), 1);
        assert_eq!(resource.links[0].rel, "products of list");
        assert_eq!(resource.links[0].href, "http://localhost:8080/products");
    }
}
