use std::sync::Arc;

use redis::ErrorKind;
use redis::RedisError;
use redis::RedisResult;
use redis::Value;
use redis::aio::MultiplexedConnection;

use crate::core::EventStore;

const WRONGTYPE: &str = "WRONGTYPE";

/// One Redis connection, opened once and shared by every call for the life of the store.
#[derive(Clone)]
pub struct RedisStore {
    redis_url: Arc<str>,
    conn: MultiplexedConnection,
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore").field("redis_url", &self.redis_url).finish()
    }
}

impl RedisStore {
    pub async fn connect(redis_url: impl Into<Arc<str>>) -> RedisResult<Self> {
        let redis_url = redis_url.into();
        let client = redis::Client::open(redis_url.as_ref())?;
        let conn = client.get_multiplexed_async_connection().await?;
        let store = Self { redis_url, conn };
        let _ = store.ping().await?;
        Ok(store)
    }

    pub fn redis_url(&self) -> &str { self.redis_url.as_ref() }

    pub async fn ping(&self) -> RedisResult<String> {
        let mut conn = self.conn.clone();
        redis::cmd("PING").query_async(&mut conn).await
    }

    /// Handle on the shared connection for commands outside [`EventStore`].
    pub fn connection(&self) -> MultiplexedConnection { self.conn.clone() }
}

impl EventStore for RedisStore {
    type Error = RedisError;

    async fn push(&self, list_key: &str, value: &str) -> Result<u64, Self::Error> {
        let mut conn = self.conn.clone();
        let len: u64 = redis::cmd("LPUSH").arg(list_key).arg(value).query_async(&mut conn).await?;
        Ok(len)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("SET").arg(key).arg(value).query_async(&mut conn).await?;
        Ok(())
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, Self::Error> {
        let mut conn = self.conn.clone();
        let reply: Value = redis::cmd("KEYS").arg(pattern).query_async(&mut conn).await?;
        match reply {
            Value::Nil => Ok(Vec::new()),
            Value::Array(items) | Value::Set(items) => items.into_iter().map(value_to_string).collect(),
            _ => Err(unexpected_return("expected array reply for KEYS")),
        }
    }

    async fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let mut conn = self.conn.clone();
        let reply: Value = redis::cmd("GET").arg(key).query_async(&mut conn).await?;
        match reply {
            Value::Nil => Ok(None),
            other => value_to_string(other).map(Some),
        }
    }

    async fn hash_get_all(&self, key: &str) -> Result<Vec<(String, String)>, Self::Error> {
        let mut conn = self.conn.clone();
        let reply: Value = redis::cmd("HGETALL").arg(key).query_async(&mut conn).await?;
        parse_hash_reply(reply)
    }

    fn is_type_mismatch(error: &Self::Error) -> bool { error.code() == Some(WRONGTYPE) }
}

fn parse_hash_reply(value: Value) -> RedisResult<Vec<(String, String)>> {
    match value {
        Value::Nil => Ok(Vec::new()),
        Value::Map(pairs) => pairs
            .into_iter()
            .map(|(field, value)| Ok((value_to_string(field)?, value_to_string(value)?)))
            .collect(),
        Value::Array(items) => {
            if items.len() % 2 != 0 {
                return Err(unexpected_return("expected even number of field/value items"));
            }

            let mut pairs = Vec::with_capacity(items.len() / 2);
            let mut iter = items.into_iter();
            while let (Some(field), Some(value)) = (iter.next(), iter.next()) {
                pairs.push((value_to_string(field)?, value_to_string(value)?));
            }
            Ok(pairs)
        }
        _ => Err(unexpected_return("expected map or array reply for HGETALL")),
    }
}

fn value_to_string(value: Value) -> RedisResult<String> {
    match value {
        Value::BulkString(bytes) => {
            String::from_utf8(bytes).map_err(|_| unexpected_return("expected utf-8 bulk string"))
        }
        Value::SimpleString(text) => Ok(text),
        Value::Int(value) => Ok(value.to_string()),
        Value::Nil => Err(unexpected_return("unexpected nil for string value")),
        _ => Err(unexpected_return("expected string-like value")),
    }
}

fn unexpected_return(message: &str) -> RedisError {
    RedisError::from((ErrorKind::ParseError, "redis reply parse error", message.to_owned()))
}
