use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use crate::core::EventStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    String(String),
    List(VecDeque<String>),
    Hash(Vec<(String, String)>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryStoreError {
    WrongType,
    Unavailable,
}

impl std::fmt::Display for MemoryStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WrongType => write!(f, "WRONGTYPE Operation against a key holding the wrong kind of value"),
            Self::Unavailable => write!(f, "store unavailable"),
        }
    }
}

impl std::error::Error for MemoryStoreError {}

/// Single-process stand-in for Redis with the same type errors and glob matching.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, Entry>>,
    get_calls: AtomicUsize,
    fail_after_writes: Mutex<Option<usize>>,
}

impl MemoryStore {
    pub fn insert(&self, key: &str, entry: Entry) { self.entries().insert(key.to_owned(), entry); }

    pub fn entry(&self, key: &str) -> Option<Entry> { self.entries().get(key).cloned() }

    pub fn len(&self) -> usize { self.entries().len() }

    /// Entries of a list from tail to head, i.e. in `push` order.
    pub fn list_in_push_order(&self, key: &str) -> Vec<String> {
        match self.entries().get(key) {
            Some(Entry::List(items)) => items.iter().rev().cloned().collect(),
            _ => Vec::new(),
        }
    }

    pub fn get_calls(&self) -> usize { self.get_calls.load(Ordering::SeqCst) }

    /// Fail every write once `writes` more writes have succeeded.
    pub fn fail_after_writes(&self, writes: usize) { *lock(&self.fail_after_writes) = Some(writes); }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, Entry>> { lock(&self.entries) }

    fn take_write_budget(&self) -> Result<(), MemoryStoreError> {
        let mut budget = lock(&self.fail_after_writes);
        match budget.as_mut() {
            None => Ok(()),
            Some(0) => Err(MemoryStoreError::Unavailable),
            Some(remaining) => {
                *remaining -= 1;
                Ok(())
            }
        }
    }
}

impl EventStore for MemoryStore {
    type Error = MemoryStoreError;

    async fn push(&self, list_key: &str, value: &str) -> Result<u64, Self::Error> {
        self.take_write_budget()?;
        let mut entries = self.entries();
        let entry = entries.entry(list_key.to_owned()).or_insert_with(|| Entry::List(VecDeque::new()));
        let Entry::List(items) = entry else {
            return Err(MemoryStoreError::WrongType);
        };
        items.push_front(value.to_owned());
        Ok(items.len() as u64)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.take_write_budget()?;
        self.entries().insert(key.to_owned(), Entry::String(value.to_owned()));
        Ok(())
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, Self::Error> {
        Ok(self.entries().keys().filter(|key| glob_match(pattern.as_bytes(), key.as_bytes())).cloned().collect())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        match self.entries().get(key) {
            None => Ok(None),
            Some(Entry::String(value)) => Ok(Some(value.clone())),
            Some(_) => Err(MemoryStoreError::WrongType),
        }
    }

    async fn hash_get_all(&self, key: &str) -> Result<Vec<(String, String)>, Self::Error> {
        match self.entries().get(key) {
            None => Ok(Vec::new()),
            Some(Entry::Hash(pairs)) => Ok(pairs.clone()),
            Some(_) => Err(MemoryStoreError::WrongType),
        }
    }

    fn is_type_mismatch(error: &Self::Error) -> bool { matches!(error, MemoryStoreError::WrongType) }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> { mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) }

/// Redis-style glob with `*` and `?`.
fn glob_match(pattern: &[u8], text: &[u8]) -> bool {
    match (pattern.split_first(), text.split_first()) {
        (None, None) => true,
        (Some((b'*', rest)), _) => glob_match(rest, text) || (!text.is_empty() && glob_match(pattern, &text[1..])),
        (Some((b'?', rest)), Some((_, text_rest))) => glob_match(rest, text_rest),
        (Some((p, rest)), Some((t, text_rest))) if p == t => glob_match(rest, text_rest),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::glob_match;

    #[test]
    fn glob_matches_prefix_wildcards() {
        assert!(glob_match(b"fnordmetric-blubber*", b"fnordmetric-blubber"));
        assert!(glob_match(b"fnordmetric-blubber*", b"fnordmetric-blubber-7"));
        assert!(!glob_match(b"fnordmetric-blubber*", b"fnordmetric-event-7"));
        assert!(glob_match(b"fnordmetric-event-?", b"fnordmetric-event-7"));
        assert!(!glob_match(b"fnordmetric-event-?", b"fnordmetric-event-17"));
        assert!(glob_match(b"*", b""));
    }
}
