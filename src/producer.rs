use std::time::Instant;

use crate::config::LoadConfig;
use crate::core::BatchStats;
use crate::core::EventStore;

pub fn event_key(prefix: &str, id: &str) -> String { format!("{prefix}{id}") }

/// The constant JSON body written under every event key, e.g. `{"_type":"foobar"}`.
pub fn event_payload(event_type: &str) -> String { serde_json::json!({ "_type": event_type }).to_string() }

/// Writes one batch: for every id in `0..batch_size`, push the id onto the queue and
/// store the payload under its event key. The first failing write ends the batch.
pub async fn produce_batch<S>(store: &S, config: &LoadConfig) -> Result<BatchStats, S::Error>
where
    S: EventStore,
{
    let payload = event_payload(&config.event_type);
    let started = Instant::now();
    let mut queue_len = 0;

    for i in 0..config.batch_size {
        let id = i.to_string();
        queue_len = store.push(&config.queue_key, &id).await?;
        store.set(&event_key(&config.event_key_prefix, &id), &payload).await?;
    }

    let stats = BatchStats { events_written: config.batch_size, queue_len, elapsed: started.elapsed() };
    tracing::debug!(
        queue = %config.queue_key,
        events = stats.events_written,
        queue_len = stats.queue_len,
        elapsed_ms = stats.elapsed.as_millis() as u64,
        "batch written"
    );
    Ok(stats)
}
