use std::time::Duration;

use smallvec::SmallVec;

/// What the inspector found behind one matching key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InspectedValue {
    /// A missing key reads as `Scalar(None)`.
    Scalar(Option<String>),
    Hash(SmallVec<[(String, String); 8]>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyReport {
    pub key: String,
    pub value: InspectedValue,
}

impl KeyReport {
    pub fn scalar(key: impl Into<String>, value: Option<String>) -> Self {
        Self { key: key.into(), value: InspectedValue::Scalar(value) }
    }

    pub fn hash(key: impl Into<String>, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self { key: key.into(), value: InspectedValue::Hash(pairs.into_iter().collect()) }
    }

    /// Console lines for this key: `key -> value`, or `key -> field -> value` per hash pair.
    pub fn lines(&self) -> Vec<String> {
        match &self.value {
            InspectedValue::Scalar(value) => {
                vec![format!("{} -> {}", self.key, value.as_deref().unwrap_or_default())]
            }
            InspectedValue::Hash(pairs) => {
                pairs.iter().map(|(field, value)| format!("{} -> {field} -> {value}", self.key)).collect()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    pub events_written: usize,
    pub queue_len: u64,
    pub elapsed: Duration,
}

impl BatchStats {
    pub fn events_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.events_written as f64 / secs
    }
}
