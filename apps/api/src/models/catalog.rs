use serde::{Deserialize, Serialize};

use crate::models::generation::ProductRef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
}

/// A store product as returned by the catalog search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

impl Product {
    pub fn has_image(&self, url: &str) -> bool {
        self.images.iter().any(|i| i.url == url)
    }

    pub fn to_ref(&self) -> ProductRef {
        ProductRef {
            id: self.id.clone(),
            title: self.title.clone(),
            price: self.price,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub products: Vec<Product>,
    #[serde(default)]
    pub has_more: bool,
}
