use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::{Session, SessionView};

struct Entry {
    session: Session,
    last_seen: Instant,
}

/// In-memory session registry.
///
/// Access goes through closures so a lock is never held across an upstream call.
/// Every access refreshes the session's idle clock; see [`SessionStore::evict_idle`].
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Entry>>>,
}

impl SessionStore {
    pub async fn create(&self, shop_id: &str, search_debounce: Duration) -> SessionView {
        let session = Session::new(shop_id, search_debounce);
        let view = session.view();
        self.inner.write().await.insert(
            session.id,
            Entry {
                session,
                last_seen: Instant::now(),
            },
        );
        info!("Created session {} for shop {}", view.id, shop_id);
        view
    }

    pub async fn read<R>(&self, id: Uuid, f: impl FnOnce(&Session) -> R) -> Result<R, AppError> {
        let mut sessions = self.inner.write().await;
        let entry = touch(&mut sessions, id)?;
        Ok(f(&entry.session))
    }

    /// Runs `f` against the session. Mutations stick even when `f` returns an error.
    pub async fn update<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session) -> Result<R, AppError>,
    ) -> Result<R, AppError> {
        let mut sessions = self.inner.write().await;
        let entry = touch(&mut sessions, id)?;
        f(&mut entry.session)
    }

    pub async fn view(&self, id: Uuid) -> Result<SessionView, AppError> {
        self.read(id, Session::view).await
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.inner
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    /// Drops sessions untouched for longer than `ttl`. Sessions with an operation
    /// in flight are kept so the pending call can still write its result back.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| {
            now.duration_since(entry.last_seen) <= ttl || !entry.session.pending.is_empty()
        });
        before - sessions.len()
    }

    /// Background task that runs [`SessionStore::evict_idle`] every `every`.
    pub fn spawn_sweeper(&self, ttl: Duration, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle(ttl).await;
                if evicted > 0 {
                    info!("Evicted {evicted} idle session(s)");
                }
            }
        })
    }
}

fn touch(sessions: &mut HashMap<Uuid, Entry>, id: Uuid) -> Result<&mut Entry, AppError> {
    let entry = sessions
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
    entry.last_seen = Instant::now();
    Ok(entry)
}
