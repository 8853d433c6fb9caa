//! `StudioBackend`: the upstream surface as a trait, so the workflow code can run
//! against the real HTTP endpoints or an in-memory fake without changes.
//!
//! `AppState` holds an `Arc<dyn StudioBackend>`, chosen at startup.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::models::brand_voice::{BrandVoiceRequest, GeneratedVoice};
use crate::models::catalog::ProductPage;
use crate::models::generation::GenerationRequest;
use crate::models::library::{
    AdLibraryItem, AdStatus, CrossPostReceipt, CrossPostRequest, SaveAdRequest,
};
use crate::models::platform::{AdAccount, Campaign};
use crate::models::variant::GenerationResult;
use crate::upstream::{UpstreamClient, UpstreamError};

#[async_trait]
pub trait StudioBackend: Send + Sync {
    /// `POST /generate`
    async fn generate(&self, request: &GenerationRequest)
        -> Result<GenerationResult, UpstreamError>;

    /// `POST /library`
    async fn save_ad(&self, request: &SaveAdRequest) -> Result<AdLibraryItem, UpstreamError>;

    /// `PATCH /library`
    async fn update_ad_status(
        &self,
        ad_id: &str,
        status: AdStatus,
    ) -> Result<AdLibraryItem, UpstreamError>;

    /// `GET /library?status=&shopId=`
    async fn list_ads(
        &self,
        shop_id: &str,
        status: Option<AdStatus>,
    ) -> Result<Vec<AdLibraryItem>, UpstreamError>;

    /// `GET /shopify/products?shop=&query=&limit=`
    async fn search_products(
        &self,
        shop: &str,
        query: &str,
        limit: u32,
    ) -> Result<ProductPage, UpstreamError>;

    /// `GET /facebook/ad-accounts`
    async fn ad_accounts(&self) -> Result<Vec<AdAccount>, UpstreamError>;

    /// `GET /facebook/campaigns?adAccountId=`
    async fn campaigns(&self, ad_account_id: &str) -> Result<Vec<Campaign>, UpstreamError>;

    /// `POST /facebook/create-ad`
    async fn create_external_ad(
        &self,
        request: &CrossPostRequest,
    ) -> Result<CrossPostReceipt, UpstreamError>;

    /// `POST /brand-voice/generate`
    async fn generate_brand_voice(
        &self,
        request: &BrandVoiceRequest,
    ) -> Result<GeneratedVoice, UpstreamError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusChange<'a> {
    ad_id: &'a str,
    status: AdStatus,
}

#[derive(Debug, Deserialize)]
struct AdList {
    ads: Vec<AdLibraryItem>,
}

/// `StudioBackend` over JSON-over-HTTP.
#[derive(Clone)]
pub struct HttpBackend {
    client: UpstreamClient,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            client: UpstreamClient::new(base_url, api_key, timeout),
        }
    }
}

#[async_trait]
impl StudioBackend for HttpBackend {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, UpstreamError> {
        self.client.send(Method::POST, "/generate", request).await
    }

    async fn save_ad(&self, request: &SaveAdRequest) -> Result<AdLibraryItem, UpstreamError> {
        self.client.send(Method::POST, "/library", request).await
    }

    async fn update_ad_status(
        &self,
        ad_id: &str,
        status: AdStatus,
    ) -> Result<AdLibraryItem, UpstreamError> {
        self.client
            .send(Method::PATCH, "/library", &StatusChange { ad_id, status })
            .await
    }

    async fn list_ads(
        &self,
        shop_id: &str,
        status: Option<AdStatus>,
    ) -> Result<Vec<AdLibraryItem>, UpstreamError> {
        let mut query = vec![("shopId", shop_id.to_string())];
        if let Some(status) = status {
            query.push(("status", status.as_str().to_string()));
        }
        let list: AdList = self.client.get("/library", &query).await?;
        Ok(list.ads)
    }

    async fn search_products(
        &self,
        shop: &str,
        query: &str,
        limit: u32,
    ) -> Result<ProductPage, UpstreamError> {
        self.client
            .get(
                "/shopify/products",
                &[
                    ("shop", shop.to_string()),
                    ("query", query.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await
    }

    async fn ad_accounts(&self) -> Result<Vec<AdAccount>, UpstreamError> {
        self.client.get("/facebook/ad-accounts", &[]).await
    }

    async fn campaigns(&self, ad_account_id: &str) -> Result<Vec<Campaign>, UpstreamError> {
        self.client
            .get(
                "/facebook/campaigns",
                &[("adAccountId", ad_account_id.to_string())],
            )
            .await
    }

    async fn create_external_ad(
        &self,
        request: &CrossPostRequest,
    ) -> Result<CrossPostReceipt, UpstreamError> {
        self.client
            .send(Method::POST, "/facebook/create-ad", request)
            .await
    }

    async fn generate_brand_voice(
        &self,
        request: &BrandVoiceRequest,
    ) -> Result<GeneratedVoice, UpstreamError> {
        self.client
            .send(Method::POST, "/brand-voice/generate", request)
            .await
    }
}
