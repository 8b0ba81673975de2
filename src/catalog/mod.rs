//! Product catalog source
//!
//! The catalog is a static document shaped like:
//!
//! ```json
//! { "products": [ { "id": 1, "name": "...", "brand": "...", "category": "...", "image": "...", "description": "..." } ] }
//! ```
//!
//! It is fetched in full on every filter change. Nothing is cached here; the
//! controller keeps only the snapshot of the most recent successful load.

pub mod filter;

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use filter::FilterState;

/// Stable product identifier. Catalogs use either integers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Number(n) => write!(f, "{}", n),
            ProductId::Text(s) => f.write_str(s),
        }
    }
}

impl ProductId {
    /// Read an id back from a URL path segment or form value.
    /// Anything that parses as an integer is a numeric id.
    pub fn from_segment(s: &str) -> Self {
        match s.parse::<i64>() {
            Ok(n) => ProductId::Number(n),
            Err(_) => ProductId::Text(s.to_string()),
        }
    }
}

impl FromStr for ProductId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ProductId::from_segment(s))
    }
}

impl From<i64> for ProductId {
    fn from(n: i64) -> Self {
        ProductId::Number(n)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        ProductId::Text(s.to_string())
    }
}

/// A single catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    products: Vec<Product>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog: {0}")]
    Invalid(String),
}

/// Where the catalog document comes from
pub enum CatalogSource {
    Http { client: Client, url: String },
    File(PathBuf),
}

impl CatalogSource {
    pub fn http(url: impl Into<String>) -> Self {
        CatalogSource::Http {
            client: Client::new(),
            url: url.into(),
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        CatalogSource::File(path.into())
    }

    /// Fetch and parse the full product list
    pub async fn load(&self) -> Result<Vec<Product>, CatalogError> {
        let body = match self {
            CatalogSource::Http { client, url } => {
                let response = client.get(url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(CatalogError::Invalid(format!("HTTP {} from {}", status, url)));
                }
                response.text().await?
            }
            CatalogSource::File(path) => tokio::fs::read_to_string(path).await?,
        };

        let products = parse_catalog(&body)?;
        tracing::debug!("Loaded {} product(s) from {}", products.len(), self);
        Ok(products)
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::Http { url, .. } => f.write_str(url),
            CatalogSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Parse a catalog document, rejecting snapshots with duplicate ids
pub fn parse_catalog(body: &str) -> Result<Vec<Product>, CatalogError> {
    let document: CatalogDocument = serde_json::from_str(body)
        .map_err(|e| CatalogError::Invalid(format!("Failed to parse catalog: {}", e)))?;

    let mut seen = HashSet::new();
    if let Some(duplicate) = document.products.iter().find(|p| !seen.insert(p.id.clone())) {
        return Err(CatalogError::Invalid(format!(
            "Duplicate product id: {}",
            duplicate.id
        )));
    }

    Ok(document.products)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "products": [
            { "id": 1, "name": "Hydrating Cleanser", "brand": "CeraVe", "category": "cleanser", "image": "cleanser.png", "description": "Gentle daily cleanser" },
            { "id": "kit-2", "name": "Argan Hair Oil", "brand": "L'Oreal Paris", "category": "haircare", "image": "oil.png" }
        ]
    }"#;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_parse_catalog() {
        let products = parse_catalog(SAMPLE).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, ProductId::Number(1));
        assert_eq!(products[0].description.as_deref(), Some("Gentle daily cleanser"));
        assert_eq!(products[1].id, ProductId::Text("kit-2".to_string()));
        assert!(products[1].description.is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let body = r#"{ "products": [
            { "id": 7, "name": "A", "brand": "B", "category": "c", "image": "a.png" },
            { "id": 7, "name": "C", "brand": "D", "category": "c", "image": "c.png" }
        ] }"#;
        let err = parse_catalog(body).unwrap_err();
        assert!(matches!(err, CatalogError::Invalid(msg) if msg.contains("Duplicate")));
    }

    #[test]
    fn test_malformed_catalog() {
        assert!(parse_catalog("not json").is_err());
        assert!(parse_catalog(r#"{ "items": [] }"#).is_err());
    }

    #[test]
    fn test_product_id_from_path() {
        assert_eq!("42".parse::<ProductId>().unwrap(), ProductId::Number(42));
        assert_eq!(ProductId::from_segment("kit-2"), ProductId::from("kit-2"));
        assert_eq!(ProductId::Number(42).to_string(), "42");
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let source = CatalogSource::file(file.path());
        let products = source.load().await.unwrap();
        assert_eq!(products.len(), 2);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let source = CatalogSource::file("/nonexistent/products.json");
        assert!(matches!(source.load().await, Err(CatalogError::Io(_))));
    }

    #[tokio::test]
    async fn test_load_over_http() {
        let url = serve(Router::new().route("/products.json", get(|| async { SAMPLE }))).await;

        let source = CatalogSource::http(format!("{}/products.json", url));
        let products = source.load().await.unwrap();
        assert_eq!(products[1].name, "Argan Hair Oil");
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let url = serve(Router::new().route(
            "/products.json",
            get(|| async { (StatusCode::NOT_FOUND, "missing") }),
        ))
        .await;

        let source = CatalogSource::http(format!("{}/products.json", url));
        assert!(matches!(source.load().await, Err(CatalogError::Invalid(_))));
    }
}
