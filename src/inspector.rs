use crate::core::EventStore;
use crate::core::KeyReport;

/// Reads every key matching `pattern`, sorted by name.
///
/// Each key is first read as a string. When that read fails because the key holds a
/// different kind of value, the key is read again as a hash. Any other error, and any
/// error from the hash read, is returned.
pub async fn inspect<S>(store: &S, pattern: &str) -> Result<Vec<KeyReport>, S::Error>
where
    S: EventStore,
{
    let mut keys = store.keys(pattern).await?;
    keys.sort_unstable();

    let mut reports = Vec::with_capacity(keys.len());
    for key in keys {
        reports.push(inspect_key(store, key).await?);
    }
    Ok(reports)
}

pub async fn inspect_key<S>(store: &S, key: String) -> Result<KeyReport, S::Error>
where
    S: EventStore,
{
    match store.get(&key).await {
        Ok(value) => Ok(KeyReport::scalar(key, value)),
        Err(error) if S::is_type_mismatch(&error) => {
            tracing::trace!(%key, "scalar read hit a non-string key, reading as hash");
            let pairs = store.hash_get_all(&key).await?;
            Ok(KeyReport::hash(key, pairs))
        }
        Err(error) => Err(error),
    }
}
