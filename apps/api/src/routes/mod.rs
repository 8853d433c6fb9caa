pub mod health;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::state::AppState;
use crate::{brand_voice, catalog, generation, library, platforms, review, session};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Sessions
        .route(
            "/api/v1/sessions",
            post(session::handlers::handle_create_session),
        )
        .route(
            "/api/v1/sessions/:id",
            get(session::handlers::handle_get_session)
                .delete(session::handlers::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/banner",
            delete(session::handlers::handle_dismiss_banner),
        )
        // Form, picker, generation
        .route(
            "/api/v1/sessions/:id/form",
            put(generation::handlers::handle_update_form),
        )
        .route(
            "/api/v1/sessions/:id/dialog",
            post(generation::handlers::handle_dialog),
        )
        .route(
            "/api/v1/sessions/:id/products/search",
            get(catalog::handlers::handle_search_products),
        )
        .route(
            "/api/v1/sessions/:id/products",
            post(generation::handlers::handle_pick_product),
        )
        .route(
            "/api/v1/sessions/:id/products/images",
            post(generation::handlers::handle_complete_image_selection),
        )
        .route(
            "/api/v1/sessions/:id/products/:product_id",
            delete(generation::handlers::handle_remove_product),
        )
        .route(
            "/api/v1/sessions/:id/images",
            post(generation::handlers::handle_add_image)
                .delete(generation::handlers::handle_remove_image),
        )
        .route(
            "/api/v1/sessions/:id/selection",
            delete(generation::handlers::handle_clear_selection),
        )
        .route(
            "/api/v1/sessions/:id/generate",
            post(generation::handlers::handle_generate),
        )
        // Review
        .route(
            "/api/v1/sessions/:id/variants/:variant_id",
            patch(review::handlers::handle_edit_variant),
        )
        .route(
            "/api/v1/sessions/:id/variants/:variant_id/save",
            post(library::handlers::handle_save_variant),
        )
        .route(
            "/api/v1/sessions/:id/review",
            delete(review::handlers::handle_close_review),
        )
        .route(
            "/api/v1/sessions/:id/review/mode",
            put(review::handlers::handle_set_mode),
        )
        .route(
            "/api/v1/sessions/:id/review/compare/:variant_id",
            post(review::handlers::handle_select_for_compare),
        )
        .route(
            "/api/v1/sessions/:id/cross-post",
            put(platforms::handlers::handle_set_cross_post_target),
        )
        // Brand voice
        .route(
            "/api/v1/sessions/:id/brand-voice",
            get(brand_voice::handlers::handle_get_brand_voice),
        )
        .route(
            "/api/v1/sessions/:id/brand-voice/samples",
            post(brand_voice::handlers::handle_add_sample),
        )
        .route(
            "/api/v1/sessions/:id/brand-voice/samples/:sample_id",
            delete(brand_voice::handlers::handle_remove_sample),
        )
        .route(
            "/api/v1/sessions/:id/brand-voice/summary",
            put(brand_voice::handlers::handle_edit_summary),
        )
        .route(
            "/api/v1/sessions/:id/brand-voice/tuning",
            put(brand_voice::handlers::handle_set_tuning),
        )
        .route(
            "/api/v1/sessions/:id/brand-voice/regenerate",
            post(brand_voice::handlers::handle_regenerate),
        )
        // Library
        .route("/api/v1/library", get(library::handlers::handle_list_ads))
        .route(
            "/api/v1/library/:ad_id/status",
            patch(library::handlers::handle_change_status),
        )
        // Ad platforms
        .route(
            "/api/v1/platforms/ad-accounts",
            get(platforms::handlers::handle_ad_accounts),
        )
        .route(
            "/api/v1/platforms/campaigns",
            get(platforms::handlers::handle_campaigns),
        )
        .with_state(state)
}
