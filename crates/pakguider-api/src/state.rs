//! Application state wiring the providers together.
//!
//! AppState holds the shared pipeline and the in-memory session store used
//! by both the CLI and the web server. Providers are built once at startup.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use pakguider_core::chat::pipeline::QueryPipeline;
use pakguider_core::chat::session::SessionManager;
use pakguider_core::search::client::DocumentSearchClient;
use pakguider_infra::config::AppConfig;
use pakguider_infra::llm::create_provider;
use pakguider_infra::probe::probe_providers;
use pakguider_infra::search::create_search_provider_or_placeholder;
use pakguider_types::error::SessionError;

/// Shared handle to one session. The mutex serializes turns within it.
pub type SessionHandle = Arc<Mutex<SessionManager>>;

/// Shortest pause between idle sweeps.
const MIN_SWEEP_PERIOD: Duration = Duration::from_millis(100);

struct StoredSession {
    handle: SessionHandle,
    last_seen: Instant,
}

/// Concurrent map of live web sessions.
///
/// A browser tab that goes away never ends its session, so entries carry
/// a last-seen time and idle ones are evicted by [`SessionStore::evict_idle`].
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<Uuid, StoredSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new session seeded with the greeting.
    pub fn create(&self) -> (Uuid, SessionHandle) {
        let manager = SessionManager::new();
        let id = manager.session().id;
        let handle = Arc::new(Mutex::new(manager));
        self.sessions.insert(
            id,
            StoredSession {
                handle: Arc::clone(&handle),
                last_seen: Instant::now(),
            },
        );
        (id, handle)
    }

    /// Look up a session and mark it as seen now.
    pub fn get(&self, id: &Uuid) -> Result<SessionHandle, SessionError> {
        let mut entry = self.sessions.get_mut(id).ok_or(SessionError::NotFound)?;
        entry.last_seen = Instant::now();
        Ok(Arc::clone(&entry.handle))
    }

    pub fn remove(&self, id: &Uuid) -> Result<SessionHandle, SessionError> {
        self.sessions
            .remove(id)
            .map(|(_, stored)| stored.handle)
            .ok_or(SessionError::NotFound)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop sessions not seen for at least `max_idle`. Returns how many went.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        self.evict_idle_at(Instant::now(), max_idle)
    }

    /// [`evict_idle`](Self::evict_idle) measured against `now`.
    pub fn evict_idle_at(&self, now: Instant, max_idle: Duration) -> usize {
        let mut evicted = 0;
        self.sessions.retain(|_, stored| {
            let keep = now.saturating_duration_since(stored.last_seen) < max_idle;
            if !keep {
                evicted += 1;
            }
            keep
        });
        evicted
    }

    /// Run [`evict_idle`](Self::evict_idle) periodically in the background.
    pub fn spawn_idle_sweeper(&self, max_idle: Duration) -> JoinHandle<()> {
        let store = self.clone();
        let period = (max_idle / 4).max(MIN_SWEEP_PERIOD);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle(max_idle);
                if evicted > 0 {
                    tracing::info!(evicted, remaining = store.len(), "Evicted idle sessions");
                }
            }
        })
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<QueryPipeline>,
    pub sessions: SessionStore,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Build providers from config and wire the pipeline.
    ///
    /// Missing search credentials do not fail here; each turn reports them.
    pub fn init(config: AppConfig) -> Self {
        let search = DocumentSearchClient::new(create_search_provider_or_placeholder(&config))
            .with_limit(config.settings.search.limit);
        let llm = create_provider(&config);
        let pipeline = QueryPipeline::new(search, llm, config.settings.chat.clone());

        tracing::debug!(
            search = pipeline.search_name(),
            llm = pipeline.llm_name(),
            model = %pipeline.settings().model,
            "Pipeline initialized"
        );

        Self::from_parts(pipeline, config)
    }

    pub fn from_parts(pipeline: QueryPipeline, config: AppConfig) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            sessions: SessionStore::new(),
            config: Arc::new(config),
        }
    }

    /// Probe both providers before the first turn.
    ///
    /// Failures are logged as warnings; with fail-fast enabled the first
    /// failure becomes an error.
    pub async fn verify_providers(&self) -> anyhow::Result<()> {
        let outcomes = probe_providers(&self.config).await;

        for outcome in &outcomes {
            match &outcome.error {
                None => tracing::info!(
                    provider = outcome.provider,
                    target = %outcome.target,
                    latency_ms = outcome.latency.as_millis() as u64,
                    "Provider reachable"
                ),
                Some(error) => {
                    if self.config.settings.fail_fast {
                        anyhow::bail!("{} probe failed: {error}", outcome.provider);
                    }
                    tracing::warn!(
                        provider = outcome.provider,
                        target = %outcome.target,
                        %error,
                        "Provider probe failed; continuing"
                    );
                }
            }
        }

        Ok(())
    }
}
