//! Ad generation: drives one `POST /generate` call for a session.
//!
//! Flow: validate form → mark pending → progress stages → upstream call →
//!       open the review (or banner + reset on failure).
//!
//! There is no retry. A failed run returns the merchant to the form.

use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::builder::build_request;
use crate::generation::progress::Stage;
use crate::review::Review;
use crate::session::{Banner, Dialog, PendingOp, SessionStore, SessionView};
use crate::upstream::{StudioBackend, UpstreamError};

pub const GENERATION_FALLBACK: &str = "Failed to generate ads";
pub const NO_VARIANTS: &str = "No variants were generated";

pub async fn run_generation(
    sessions: &SessionStore,
    backend: &dyn StudioBackend,
    session_id: Uuid,
) -> Result<SessionView, AppError> {
    let request = sessions
        .update(session_id, |session| {
            if session.pending.contains(PendingOp::Generation) {
                return Err(AppError::Conflict(
                    "Ad generation is already in progress".to_string(),
                ));
            }
            if session.review.is_some() {
                return Err(AppError::Conflict(
                    "Close the current review before generating again".to_string(),
                ));
            }

            let voice = session.brand_voice.voice_for_generation();
            let request = match build_request(&session.form, &session.selection, voice) {
                Ok(request) => request,
                Err(err) => {
                    if let AppError::Validation(message) = &err {
                        session.form.inline_error = Some(message.clone());
                    }
                    return Err(err);
                }
            };

            session.pending.begin(PendingOp::Generation)?;
            session.form.inline_error = None;
            session.banner = None;
            session.dialog = Dialog::Generating;
            session.progress.start();
            session.progress.advance(Stage::RetrievingBestPractices);
            Ok(request)
        })
        .await?;

    info!(
        "Generating {} ads for session {} ({} products, {} images)",
        request.platform.as_str(),
        session_id,
        request.products.len(),
        request.image_urls.len()
    );

    sessions
        .update(session_id, |session| {
            session.progress.advance(Stage::Generating);
            Ok(())
        })
        .await?;

    let outcome = backend
        .generate(&request)
        .await
        .and_then(|result| {
            if result.variants.is_empty() {
                Err(UpstreamError::Rejected {
                    message: NO_VARIANTS.to_string(),
                })
            } else {
                Ok(result)
            }
        });

    let (platform, goal) = (request.platform, request.goal);
    sessions
        .update(session_id, move |session| {
            session.pending.finish(PendingOp::Generation);
            match outcome {
                Ok(result) => {
                    session.progress.advance(Stage::Finalizing);
                    info!(
                        "Generated {} variants in {}ms",
                        result.variants.len(),
                        result.metadata.generation_time_ms
                    );
                    session.review = Some(Review::new(platform, goal, result));
                    session.progress.advance(Stage::Complete);
                    session.dialog = Dialog::Review;
                    Ok(session.view())
                }
                Err(err) => {
                    error!(component = "generation", "Ad generation failed: {err}");
                    let message = err.message_or(GENERATION_FALLBACK);
                    session.progress.fail(message.clone());
                    session.banner = Some(Banner::error(message.clone()));
                    session.dialog = Dialog::None;
                    Err(AppError::Upstream(message))
                }
            }
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::brand_voice::BrandVoice;
    use crate::models::brand_voice::GeneratedVoice;
    use crate::upstream::fake::FakeBackend;

    async fn session_with(store: &SessionStore, description: &str) -> Uuid {
        let id = store.create("shop-1", Duration::from_millis(500)).await.id;
        let description = description.to_string();
        store
            .update(id, |s| {
                s.form.description = description;
                Ok(())
            })
            .await
            .unwrap();
        id
    }

    #[tokio::test]
    async fn test_three_variants_open_review_with_overrides_equal_to_originals() {
        let store = SessionStore::default();
        let backend = FakeBackend::default();
        let id = session_with(&store, "Waterproof hiking boots").await;

        let view = run_generation(&store, &backend, id).await.unwrap();

        assert_eq!(view.dialog, Dialog::Review);
        assert_eq!(view.progress.percent, 100);
        assert!(view.pending.is_empty());
        let review = view.review.unwrap();
        assert_eq!(review.variants.len(), 3);
        assert_eq!(review.metadata.generation_time_ms, 3100);

        store
            .read(id, |s| {
                for variant in &s.review.as_ref().unwrap().variants {
                    assert_eq!(
                        variant.edited_headline.as_deref(),
                        Some(variant.original.headline.as_str())
                    );
                    assert_eq!(
                        variant.edited_primary_text.as_deref(),
                        Some(variant.original.primary_text.as_str())
                    );
                    assert_eq!(variant.edited_description, variant.original.description);
                }
            })
            .await
            .unwrap();

        let requests = backend.generation_requests.lock().unwrap();
        assert_eq!(requests[0].description, "Waterproof hiking boots");
    }

    #[tokio::test]
    async fn test_blank_description_makes_no_network_call() {
        let store = SessionStore::default();
        let backend = FakeBackend::default();
        let id = session_with(&store, "   ").await;

        let result = run_generation(&store, &backend, id).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(backend.calls().is_empty());

        let view = store.view(id).await.unwrap();
        assert_eq!(
            view.form.inline_error.as_deref(),
            Some("Please enter a product description")
        );
        assert_eq!(view.dialog, Dialog::None);
        assert!(view.pending.is_empty());
    }

    #[tokio::test]
    async fn test_failure_resets_progress_and_shows_server_message() {
        let store = SessionStore::default();
        let backend = FakeBackend::default();
        FakeBackend::set(&backend.generate_error, "Monthly generation quota reached");
        let id = session_with(&store, "Linen shirt").await;

        let result = run_generation(&store, &backend, id).await;
        assert!(
            matches!(result, Err(AppError::Upstream(ref m)) if m == "Monthly generation quota reached")
        );

        let view = store.view(id).await.unwrap();
        assert_eq!(view.progress.percent, 0);
        assert!(view.progress.stage.is_none());
        assert_eq!(view.dialog, Dialog::None);
        assert!(view.review.is_none());
        assert!(view.pending.is_empty());
        assert_eq!(
            view.banner.unwrap().message,
            "Monthly generation quota reached"
        );
    }

    #[tokio::test]
    async fn test_failure_without_message_uses_fallback() {
        let store = SessionStore::default();
        let backend = FakeBackend::default();
        FakeBackend::set(&backend.generate_error, "");
        let id = session_with(&store, "Linen shirt").await;

        let result = run_generation(&store, &backend, id).await;
        assert!(matches!(result, Err(AppError::Upstream(ref m)) if m == GENERATION_FALLBACK));
    }

    #[tokio::test]
    async fn test_empty_variant_list_is_a_failure() {
        let store = SessionStore::default();
        let backend = FakeBackend::default();
        backend.variants.lock().unwrap().clear();
        let id = session_with(&store, "Linen shirt").await;

        let result = run_generation(&store, &backend, id).await;
        assert!(matches!(result, Err(AppError::Upstream(ref m)) if m == NO_VARIANTS));
        assert!(store.view(id).await.unwrap().review.is_none());
    }

    #[tokio::test]
    async fn test_pending_generation_is_a_conflict() {
        let store = SessionStore::default();
        let backend = FakeBackend::default();
        let id = session_with(&store, "Linen shirt").await;
        store
            .update(id, |s| s.pending.begin(PendingOp::Generation))
            .await
            .unwrap();

        let result = run_generation(&store, &backend, id).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_generations_make_one_upstream_call() {
        let store = SessionStore::default();
        let backend = FakeBackend::default();
        *backend.generate_delay.lock().unwrap() = Some(Duration::from_secs(3));
        let id = session_with(&store, "Linen shirt").await;

        let (first, second) = tokio::join!(
            run_generation(&store, &backend, id),
            run_generation(&store, &backend, id)
        );

        let results = [first, second];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            results
                .iter()
                .filter(|r| matches!(r, Err(AppError::Conflict(_))))
                .count(),
            1
        );
        assert_eq!(backend.calls(), vec!["generate"]);
    }

    #[tokio::test]
    async fn test_open_review_blocks_new_generation() {
        let store = SessionStore::default();
        let backend = FakeBackend::default();
        let id = session_with(&store, "Linen shirt").await;
        run_generation(&store, &backend, id).await.unwrap();

        let result = run_generation(&store, &backend, id).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(backend.calls(), vec!["generate"]);
    }

    #[tokio::test]
    async fn test_brand_voice_is_attached_when_profile_exists() {
        let store = SessionStore::default();
        let backend = FakeBackend::default();
        let id = session_with(&store, "Linen shirt").await;
        store
            .update(id, |s| {
                let mut voice = BrandVoice::default();
                voice.apply_generated(GeneratedVoice {
                    summary: "Calm and confident".to_string(),
                    tone_attributes: Vec::new(),
                });
                s.brand_voice = voice;
                Ok(())
            })
            .await
            .unwrap();

        run_generation(&store, &backend, id).await.unwrap();
        let requests = backend.generation_requests.lock().unwrap();
        assert!(requests[0]
            .brand_voice
            .as_deref()
            .unwrap()
            .starts_with("Calm and confident"));
    }
}
