//! Task organization engine: hierarchical filtering, fractional manual
//! ordering, and kanban/timeline projections over immutable task snapshots.
//!
//! The engine consumes snapshots, column lists, and tag associations from an
//! external collaborator, derives views from them, and emits mutation
//! requests through the request outbox. It never persists anything itself.

pub mod error;
pub mod model;
pub mod ops;
pub mod sync;

pub use error::EngineError;
