//! Hypermedia navigation links attached to product responses.

use crate::AppState;
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use utoipa::ToSchema;
use uuid::Uuid;

pub const PRODUCTS_ROUTE: &str = "/products";

pub const REL_SELF: &str = "self";
pub const REL_PRODUCTS_OF_LIST: &str = "products of list";

const FORWARDED_PROTO: &str = "x-forwarded-proto";
const FALLBACK_HOST: &str = "localhost";

/// A `{rel, href}` pair pointing at a related resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Link {
    #[schema(example = "self")]
    pub rel: String,
    #[schema(example = "http://localhost:8080/products/8c4a3bb4-5a6f-4a25-9b2e-0d2a9b7f3c11")]
    pub href: String,
}

impl Link {
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
        }
    }
}

/// Link to the single-item endpoint of product `id`
pub fn product_link(base: &BaseUrl, id: Uuid) -> Link {
    Link::new(
        REL_SELF,
        format!("{}{}/{}", base.as_str(), PRODUCTS_ROUTE, id),
    )
}

/// Link back to the product list
pub fn products_link(base: &BaseUrl) -> Link {
    Link::new(
        REL_PRODUCTS_OF_LIST,
        format!("{}{}", base.as_str(), PRODUCTS_ROUTE),
    )
}

/// Scheme and authority that link hrefs are built on, without a trailing slash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    pub fn new(base: impl AsRef<str>) -> Self {
        BaseUrl(base.as_ref().trim_end_matches('/').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derives the base from forwarding and host headers
    pub fn from_parts(parts: &Parts) -> Self {
        let scheme = parts
            .headers
            .get(FORWARDED_PROTO)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("http");

        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .or_else(|| parts.uri.authority().map(|a| a.as_str()))
            .unwrap_or(FALLBACK_HOST);

        BaseUrl::new(format!("{}://{}", scheme, host))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for BaseUrl {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(match state.config.public_base_url.as_deref() {
            Some(configured) => BaseUrl::new(configured),
            None => BaseUrl::from_parts(parts),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(builder: axum::http::request::Builder) -> Parts {
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn builds_self_and_list_links() {
        let base = BaseUrl::new("https://api.example.com/");
        let id = Uuid::nil();

        assert_eq!(
            product_link(&base, id),
            Link::new(
                "self",
                "https://api.example.com/products/00000000-0000-0000-0000-000000000000"
            )
        );
        assert_eq!(
            products_link(&base),
            Link::new("products of list", "https://api.example.com/products")
        );
    }

    #[test]
    fn base_uses_host_header() {
        let parts = parts(Request::builder().uri("/products").header("host", "shop:8080"));
        assert_eq!(BaseUrl::from_parts(&parts).as_str(), "http://shop:8080");
    }

    #[test]
    fn base_honours_forwarded_proto() {
        let parts = parts(
            Request::builder()
                .uri("/products")
                .header("host", "shop.example.com")
                .header("x-forwarded-proto", "https, http"),
        );
        assert_eq!(
            BaseUrl::from_parts(&parts).as_str(),
            "https://shop.example.com"
        );
    }

    #[test]
    fn base_falls_back_to_localhost() {
        let parts = parts(Request::builder().uri("/products"));
        assert_eq!(BaseUrl::from_parts(&parts).as_str(), "http://localhost");
    }
}
