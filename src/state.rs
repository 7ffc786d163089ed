use crate::errors::AppError;
use crate::highlight::Highlights;
use crate::models::{TrackerAction, TrackerSnapshot};
use crate::persistence::{hydrate, persist};
use crate::storage::KeyValueStore;
use crate::tracker::Tracker;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

pub struct Session {
    pub tracker: Tracker,
    pub ready: bool,
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn KeyValueStore>,
    pub session: Arc<Mutex<Session>>,
    pub highlights: Highlights,
}

impl AppState {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            session: Arc::new(Mutex::new(Session {
                tracker: Tracker::new(),
                ready: false,
            })),
            highlights: Highlights::default(),
        }
    }

    /// Loads saved state once. Later calls return false without touching the
    /// store. The session is ready afterwards whatever the read produced.
    pub async fn hydrate(&self) -> bool {
        let mut session = self.session.lock().await;
        if session.ready {
            return false;
        }
        session.tracker = hydrate(self.store.as_ref()).await;
        session.ready = true;
        info!("tracker hydrated");
        true
    }

    /// Applies one action. The write is awaited under the session lock so
    /// saves land in the order the actions were applied.
    pub async fn dispatch(&self, action: TrackerAction) -> Result<TrackerSnapshot, AppError> {
        let mut session = self.session.lock().await;
        if !session.ready {
            return Err(AppError::not_ready());
        }

        let before = session.tracker.state().clone();
        if session.tracker.apply(&action) {
            persist(self.store.as_ref(), &session.tracker).await;
            for cell in before.changed_cells(session.tracker.state()) {
                self.highlights.flash(cell).await;
            }
        } else {
            debug!("ignored {action:?}");
        }

        Ok(self.snapshot_of(&session).await)
    }

    pub async fn snapshot(&self) -> TrackerSnapshot {
        let session = self.session.lock().await;
        self.snapshot_of(&session).await
    }

    async fn snapshot_of(&self, session: &Session) -> TrackerSnapshot {
        TrackerSnapshot {
            ready: session.ready,
            data: session.tracker.state().clone(),
            order: session.tracker.order().clone(),
            highlighted: self.highlights.lit_cells().await,
        }
    }
}
