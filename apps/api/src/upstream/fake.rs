//! In-memory `StudioBackend` for workflow tests. Records every call it receives.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::models::brand_voice::{BrandVoiceRequest, GeneratedVoice};
use crate::models::catalog::{Product, ProductImage, ProductPage};
use crate::models::generation::GenerationRequest;
use crate::models::library::{
    AdLibraryItem, AdMetrics, AdStatus, CrossPostReceipt, CrossPostRequest, SaveAdRequest,
};
use crate::models::platform::{AdAccount, Campaign};
use crate::models::variant::{GeneratedVariant, GenerationMetadata, GenerationResult};
use crate::upstream::{StudioBackend, UpstreamError};

pub fn sample_variant(n: u32) -> GeneratedVariant {
    let mut breakdown = BTreeMap::new();
    breakdown.insert("hook".to_string(), 0.8);
    breakdown.insert("clarity".to_string(), 0.7);
    GeneratedVariant {
        id: format!("variant-{n}"),
        variant_number: n,
        variant_type: if n % 2 == 0 { "emotional" } else { "benefit" }.to_string(),
        headline: format!("Headline {n}"),
        alternative_headlines: vec![format!("Alt headline {n}")],
        primary_text: format!("Primary text {n}"),
        description: Some(format!("Description {n}")),
        cta: "Shop Now".to_string(),
        cta_rationale: "Direct purchase intent".to_string(),
        hook_technique: "question".to_string(),
        tone: "friendly".to_string(),
        predicted_score: 6.0 + n as f64,
        score_breakdown: breakdown,
    }
}

pub fn sample_product(id: &str, image_count: usize) -> Product {
    Product {
        id: id.to_string(),
        title: format!("Product {id}"),
        description: Some(format!("The best {id} you will ever own")),
        price: Some(49.0),
        images: (0..image_count)
            .map(|i| ProductImage {
                url: format!("https://cdn.example.com/{id}/{i}.jpg"),
                alt: None,
            })
            .collect(),
    }
}

fn rejected(message: &str) -> UpstreamError {
    UpstreamError::Rejected {
        message: message.to_string(),
    }
}

pub struct FakeBackend {
    pub variants: Mutex<Vec<GeneratedVariant>>,
    pub products: Mutex<Vec<Product>>,
    pub generate_error: Mutex<Option<String>>,
    pub save_error: Mutex<Option<String>>,
    pub cross_post_error: Mutex<Option<String>>,
    pub voice_error: Mutex<Option<String>>,
    pub generate_delay: Mutex<Option<Duration>>,
    pub calls: Mutex<Vec<String>>,
    pub generation_requests: Mutex<Vec<GenerationRequest>>,
    pub saved: Mutex<Vec<SaveAdRequest>>,
    pub cross_posts: Mutex<Vec<CrossPostRequest>>,
    pub voice_requests: Mutex<Vec<BrandVoiceRequest>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            variants: Mutex::new((1..=3).map(sample_variant).collect()),
            products: Mutex::new(vec![sample_product("boots", 2)]),
            generate_error: Mutex::new(None),
            save_error: Mutex::new(None),
            cross_post_error: Mutex::new(None),
            voice_error: Mutex::new(None),
            generate_delay: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            generation_requests: Mutex::new(Vec::new()),
            saved: Mutex::new(Vec::new()),
            cross_posts: Mutex::new(Vec::new()),
            voice_requests: Mutex::new(Vec::new()),
        }
    }
}

impl FakeBackend {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn set(slot: &Mutex<Option<String>>, message: &str) {
        *slot.lock().unwrap() = Some(message.to_string());
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn item_from(request: &SaveAdRequest, id: String) -> AdLibraryItem {
        let now = Utc::now();
        AdLibraryItem {
            id,
            shop_id: request.shop_id.clone(),
            status: request.status,
            headline: request.headline.clone(),
            body: request.body.clone(),
            description: request.description.clone(),
            cta: request.cta.clone(),
            platform: request.platform,
            goal: request.goal,
            image_urls: request.image_urls.clone(),
            product: request.product.clone(),
            metrics: AdMetrics::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[async_trait]
impl StudioBackend for FakeBackend {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, UpstreamError> {
        self.record("generate");
        self.generation_requests.lock().unwrap().push(request.clone());
        let delay = *self.generate_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = self.generate_error.lock().unwrap().clone() {
            return Err(rejected(&message));
        }
        Ok(GenerationResult {
            variants: self.variants.lock().unwrap().clone(),
            metadata: GenerationMetadata {
                generation_time_ms: 3100,
                ai_cost: 0.02,
            },
        })
    }

    async fn save_ad(&self, request: &SaveAdRequest) -> Result<AdLibraryItem, UpstreamError> {
        self.record("save_ad");
        if let Some(message) = self.save_error.lock().unwrap().clone() {
            return Err(rejected(&message));
        }
        let mut saved = self.saved.lock().unwrap();
        saved.push(request.clone());
        Ok(Self::item_from(request, format!("ad-{}", saved.len())))
    }

    async fn update_ad_status(
        &self,
        ad_id: &str,
        status: AdStatus,
    ) -> Result<AdLibraryItem, UpstreamError> {
        self.record(format!("update_ad_status:{ad_id}:{}", status.as_str()));
        let saved = self.saved.lock().unwrap();
        let request = saved.first().ok_or_else(|| rejected("Ad not found"))?;
        let mut item = Self::item_from(request, ad_id.to_string());
        item.status = status;
        Ok(item)
    }

    async fn list_ads(
        &self,
        shop_id: &str,
        status: Option<AdStatus>,
    ) -> Result<Vec<AdLibraryItem>, UpstreamError> {
        match status {
            Some(status) => self.record(format!("list_ads:{shop_id}:{}", status.as_str())),
            None => self.record(format!("list_ads:{shop_id}")),
        }
        let saved = self.saved.lock().unwrap();
        Ok(saved
            .iter()
            .enumerate()
            .map(|(i, r)| Self::item_from(r, format!("ad-{}", i + 1)))
            .filter(|item| item.shop_id == shop_id)
            .filter(|item| status.map_or(true, |s| item.status == s))
            .collect())
    }

    async fn search_products(
        &self,
        shop: &str,
        query: &str,
        limit: u32,
    ) -> Result<ProductPage, UpstreamError> {
        self.record(format!("search:{query}"));
        let needle = query.to_lowercase();
        let products: Vec<Product> = self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| !shop.is_empty() && p.title.to_lowercase().contains(&needle))
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(ProductPage {
            products,
            has_more: false,
        })
    }

    async fn ad_accounts(&self) -> Result<Vec<AdAccount>, UpstreamError> {
        self.record("ad_accounts");
        Ok(vec![AdAccount {
            id: "act_1".to_string(),
            name: "Main account".to_string(),
            currency: Some("USD".to_string()),
            status: Some("active".to_string()),
        }])
    }

    async fn campaigns(&self, ad_account_id: &str) -> Result<Vec<Campaign>, UpstreamError> {
        self.record(format!("campaigns:{ad_account_id}"));
        Ok(vec![Campaign {
            id: "cmp_1".to_string(),
            name: "Spring sale".to_string(),
            objective: Some("OUTCOME_SALES".to_string()),
            status: Some("ACTIVE".to_string()),
        }])
    }

    async fn create_external_ad(
        &self,
        request: &CrossPostRequest,
    ) -> Result<CrossPostReceipt, UpstreamError> {
        self.record("create_external_ad");
        self.cross_posts.lock().unwrap().push(request.clone());
        if let Some(message) = self.cross_post_error.lock().unwrap().clone() {
            return Err(rejected(&message));
        }
        Ok(CrossPostReceipt {
            external_ad_id: format!("fb-{}", request.ad_id),
        })
    }

    async fn generate_brand_voice(
        &self,
        request: &BrandVoiceRequest,
    ) -> Result<GeneratedVoice, UpstreamError> {
        self.record("generate_brand_voice");
        self.voice_requests.lock().unwrap().push(request.clone());
        if let Some(message) = self.voice_error.lock().unwrap().clone() {
            return Err(rejected(&message));
        }
        Ok(GeneratedVoice {
            summary: format!("Warm and direct, drawn from {} samples", request.samples.len()),
            tone_attributes: vec!["warm".to_string(), "direct".to_string()],
        })
    }
}
