//! Typed JSON persistence over a key-value store
//!
//! Callers decide how to degrade: the leaderboard and settings both treat
//! any error here as "nothing stored" and log it.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StorageError;
use crate::platform::KeyValueStore;

/// Read and decode the value under `key`. `Ok(None)` when the key is absent.
pub fn load_json<T, S>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(json) = store.get_item(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&json)
        .map(Some)
        .map_err(|source| StorageError::Parse {
            key: key.to_string(),
            source,
        })
}

/// Encode `value` and store it under `key`
pub fn save_json<T, S>(store: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let json = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set_item(key, &json)
}

/// Load `key`, falling back to `T::default()` on absence or any error
pub fn load_or_default<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    match load_json(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => {
            log::info!("Nothing stored under `{}`, using defaults", key);
            T::default()
        }
        Err(e) => {
            log::warn!("{} - using defaults", e);
            T::default()
        }
    }
}
