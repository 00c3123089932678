pub mod traits;
pub mod types;

pub use traits::EventStore;
pub use types::BatchStats;
pub use types::InspectedValue;
pub use types::KeyReport;
