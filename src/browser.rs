use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use crate::infra::storage::MemoryStorage;
use crate::pages::availability::AvailabilityPage;
use crate::session::Session;

/// Everything the portal remembers about one browser between requests.
pub struct Browser {
    id: Uuid,
    storage: MemoryStorage,
    session: Arc<Session>,
    availability: Mutex<AvailabilityPage>,
    last_seen: Mutex<Instant>,
}

impl Browser {
    fn new(id: Uuid) -> Self {
        let storage = MemoryStorage::new();
        let session = Arc::new(Session::new(Arc::new(storage.clone())));
        session.init();
        Self {
            id,
            storage,
            session,
            availability: Mutex::new(AvailabilityPage::default()),
            last_seen: Mutex::new(Instant::now()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn storage(&self) -> &MemoryStorage {
        &self.storage
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Never hold the guard across an `.await`.
    pub fn availability(&self) -> MutexGuard<'_, AvailabilityPage> {
        self.availability
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Drops screen state, e.g. after sign-out.
    pub fn reset_pages(&self) {
        *self.availability() = AvailabilityPage::default();
    }

    pub fn touch(&self) {
        *self.last_seen.lock().unwrap_or_else(|p| p.into_inner()) = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_seen
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .elapsed()
    }
}

#[derive(Clone, Default)]
pub struct BrowserRegistry {
    browsers: Arc<DashMap<Uuid, Arc<Browser>>>,
}

impl BrowserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Known browser for `id`, or a fresh one. The flag is true when the
    /// browser was created and needs its cookie set.
    pub fn resolve(&self, id: Option<Uuid>) -> (Arc<Browser>, bool) {
        if let Some(existing) = id.and_then(|id| self.get(id)) {
            return (existing, false);
        }
        let id = Uuid::new_v4();
        let browser = Arc::new(Browser::new(id));
        self.browsers.insert(id, browser.clone());
        debug!(browser = %id, "new browser");
        (browser, true)
    }

    pub fn get(&self, id: Uuid) -> Option<Arc<Browser>> {
        self.browsers.get(&id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.browsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.browsers.is_empty()
    }

    /// Forgets browsers not seen for `max_idle`. Returns how many went.
    pub fn purge_idle(&self, max_idle: Duration) -> usize {
        let before = self.browsers.len();
        self.browsers
            .retain(|_, browser| browser.idle_for() < max_idle);
        before.saturating_sub(self.browsers.len())
    }
}
