use crate::models::{NutrientOrder, TrackerState};
use crate::storage::{KeyValueStore, StoreError};
use crate::tracker::Tracker;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, error, warn};

pub const STATE_KEY: &str = "nutrientTrackerData";
pub const ORDER_KEY: &str = "nutrientTrackerOrder";

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("failed to serialize {key}: {source}")]
    Serialize {
        key: &'static str,
        source: serde_json::Error,
    },
    #[error("failed to write {key}: {source}")]
    Store {
        key: &'static str,
        source: StoreError,
    },
}

/// Builds a tracker from whatever the store holds. Each key falls back to
/// its default on its own when missing or unreadable.
pub async fn hydrate(store: &dyn KeyValueStore) -> Tracker {
    let state = read_entry::<TrackerState>(store, STATE_KEY)
        .await
        .unwrap_or_default();
    let order = read_entry::<NutrientOrder>(store, ORDER_KEY)
        .await
        .unwrap_or_default();
    Tracker::from_parts(state, order)
}

/// Best effort: failures are logged and dropped, never retried.
pub async fn persist(store: &dyn KeyValueStore, tracker: &Tracker) {
    let results = [
        write_entry(store, STATE_KEY, tracker.state()).await,
        write_entry(store, ORDER_KEY, tracker.order()).await,
    ];
    for result in results {
        if let Err(err) = result {
            error!("could not persist tracker: {err}");
        }
    }
}

async fn read_entry<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    match store.get(key).await {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("ignoring unreadable {key}: {err}");
                None
            }
        },
        Ok(None) => {
            debug!("no saved {key}, using defaults");
            None
        }
        Err(err) => {
            error!("failed to load {key}: {err}");
            None
        }
    }
}

async fn write_entry<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &'static str,
    value: &T,
) -> Result<(), PersistError> {
    let payload =
        serde_json::to_string(value).map_err(|source| PersistError::Serialize { key, source })?;
    store
        .set(key, &payload)
        .await
        .map_err(|source| PersistError::Store { key, source })
}
