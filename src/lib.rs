pub mod config;
pub mod core;
pub mod driver;
pub mod inspector;
pub mod producer;
pub mod store;

pub use config::LoadConfig;
pub use driver::Driver;
pub use driver::DriverError;
pub use store::RedisStore;
