//! Product catalog search for the product picker.
//!
//! Searches are debounced per session; see `debounce::SearchDebouncer`.

pub mod debounce;
pub mod handlers;

use serde::Serialize;
use tracing::{debug, error};
use uuid::Uuid;

use crate::catalog::debounce::Debounced;
use crate::errors::AppError;
use crate::models::catalog::Product;
use crate::session::{Banner, SessionStore};
use crate::upstream::StudioBackend;

pub const DEFAULT_SEARCH_LIMIT: u32 = 20;
pub const MAX_SEARCH_LIMIT: u32 = 50;

pub fn clamp_limit(limit: Option<u32>) -> u32 {
    limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .clamp(1, MAX_SEARCH_LIMIT)
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    /// A newer search replaced this one. The picker keeps what it is showing.
    pub superseded: bool,
    pub products: Vec<Product>,
    pub has_more: bool,
}

impl SearchResults {
    fn superseded() -> Self {
        Self {
            superseded: true,
            products: Vec::new(),
            has_more: false,
        }
    }
}

pub async fn search(
    sessions: &SessionStore,
    backend: &dyn StudioBackend,
    session_id: Uuid,
    query: &str,
    limit: Option<u32>,
) -> Result<SearchResults, AppError> {
    let (shop_id, debouncer) = sessions
        .read(session_id, |s| (s.shop_id.clone(), s.search.clone()))
        .await?;
    let query = query.trim();
    let limit = clamp_limit(limit);

    let outcome = debouncer
        .run(|| backend.search_products(&shop_id, query, limit))
        .await;

    match outcome {
        Ok(Debounced::Fresh(page)) => {
            debug!(
                "Search '{}' for shop {} returned {} products",
                query,
                shop_id,
                page.products.len()
            );
            Ok(SearchResults {
                superseded: false,
                products: page.products,
                has_more: page.has_more,
            })
        }
        Ok(Debounced::Superseded) => Ok(SearchResults::superseded()),
        Err(err) => {
            error!(component = "catalog", "Product search failed: {err}");
            let message = err.user_message();
            sessions
                .update(session_id, |s| {
                    s.banner = Some(Banner::error(message.clone()));
                    Ok(())
                })
                .await?;
            Err(AppError::Upstream(message))
        }
    }
}
