use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Products API",
        version = "1.0.0",
        description = r#"
# Products API

Create, read, update and delete products. Responses carry navigation links:
list items link to themselves and single items link back to the list.

Missing products are reported with `404` and the plain-text body `Product not found.`.
Validation failures return `400` with a JSON error body listing the offending fields.
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Products", description = "Product management endpoints")
    ),
    paths(
        crate::handlers::products::create_product,
        crate::handlers::products::list_products,
        crate::handlers::products::get_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,
    ),
    components(
        schemas(
            crate::handlers::products::ProductResource,
            crate::dto::ProductInput,
            crate::links::Link,
            crate::errors::ErrorResponse,
            crate::errors::FieldError
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url(OPENAPI_JSON_PATH, ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from(OPENAPI_JSON_PATH).try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_product_operations() {
        let doc = ApiDoc::openapi();

        let collection = doc.paths.paths.get("/products").unwrap();
        assert!(collection.get.is_some());
        assert!(collection.post.is_some());

        let item = doc.paths.paths.get("/products/{id}").unwrap();
        assert!(item.get.is_some());
        assert!(item.put.is_some());
        assert!(item.delete.is_some());

        let schemas = &doc.components.as_ref().unwrap().schemas;
        assert!(schemas.contains_key("ProductResource"));
        assert!(schemas.contains_key("ProductInput"));
    }
}
