#[cfg(test)]
pub(crate) mod memory;
pub mod redis;

pub use self::redis::RedisStore;
