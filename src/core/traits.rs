#![allow(async_fn_in_trait)]

/// The five primitive operations the load generator issues against a key-value store.
///
/// Implementations are expected to behave like Redis: `get` on a key holding a
/// non-string value fails with an error that [`EventStore::is_type_mismatch`]
/// recognises, while every other failure is reported as-is.
pub trait EventStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Prepends `value` to the list at `list_key`, returning the new list length.
    async fn push(&self, list_key: &str, value: &str) -> Result<u64, Self::Error>;

    async fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, Self::Error>;

    async fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Field/value pairs in the order the store returns them.
    async fn hash_get_all(&self, key: &str) -> Result<Vec<(String, String)>, Self::Error>;

    fn is_type_mismatch(error: &Self::Error) -> bool;
}
