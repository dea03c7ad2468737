pub mod ids;
pub mod task;
pub mod column;
pub mod snapshot;
pub mod tags;

pub use ids::*;
pub use task::*;
pub use column::*;
pub use snapshot::*;
pub use tags::*;
