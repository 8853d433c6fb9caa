//! Product and image selection attached to a generation request.
//!
//! Every selected image remembers where it came from, so removing a product removes
//! exactly the images picked from it and nothing the merchant added by hand.

use reqwest::Url;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::catalog::Product;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "product_id", rename_all = "snake_case")]
pub enum ImageOrigin {
    Product(String),
    Manual,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedImage {
    pub url: String,
    pub origin: ImageOrigin,
}

#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub products: Vec<Product>,
    pub images: Vec<SelectedImage>,
}

impl Selection {
    pub fn image_urls(&self) -> Vec<String> {
        self.images.iter().map(|i| i.url.clone()).collect()
    }

    fn has_image(&self, url: &str) -> bool {
        self.images.iter().any(|i| i.url == url)
    }

    /// Finishes the image step for `product`: records the product and the chosen subset
    /// of its images. Returns `true` when this was the first product selected.
    pub fn add_product_images(
        &mut self,
        product: &Product,
        urls: &[String],
    ) -> Result<bool, AppError> {
        if let Some(foreign) = urls.iter().find(|u| !product.has_image(u)) {
            return Err(AppError::Validation(format!(
                "Image {foreign} does not belong to product '{}'",
                product.title
            )));
        }

        let first = self.products.is_empty();
        if !self.products.iter().any(|p| p.id == product.id) {
            self.products.push(product.clone());
        }
        for url in urls {
            if !self.has_image(url) {
                self.images.push(SelectedImage {
                    url: url.clone(),
                    origin: ImageOrigin::Product(product.id.clone()),
                });
            }
        }
        Ok(first)
    }

    pub fn add_manual_image(&mut self, url: &str) -> Result<(), AppError> {
        let url = url.trim();
        let parsed = Url::parse(url)
            .map_err(|_| AppError::Validation(format!("'{url}' is not a valid image URL")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::Validation(
                "Image URLs must start with http:// or https://".to_string(),
            ));
        }
        if !self.has_image(url) {
            self.images.push(SelectedImage {
                url: url.to_string(),
                origin: ImageOrigin::Manual,
            });
        }
        Ok(())
    }

    /// Removes the product and the images that were picked from it.
    pub fn remove_product(&mut self, product_id: &str) -> Result<Product, AppError> {
        let index = self
            .products
            .iter()
            .position(|p| p.id == product_id)
            .ok_or_else(|| AppError::NotFound(format!("Product {product_id} is not selected")))?;
        let product = self.products.remove(index);
        self.images
            .retain(|i| !matches!(&i.origin, ImageOrigin::Product(id) if id == product_id));
        Ok(product)
    }

    pub fn remove_image(&mut self, url: &str) -> Result<(), AppError> {
        let before = self.images.len();
        self.images.retain(|i| i.url != url);
        if self.images.len() == before {
            return Err(AppError::NotFound(format!("Image {url} is not selected")));
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.products.clear();
        self.images.clear();
    }
}
