//! Application layer - Use cases and orchestration.
//!
//! The build path (`IndexingService`) and the query path (`ChatService`)
//! wire the domain logic to the infrastructure adapters, depending on ports
//! where a backend is involved.

pub mod services;

pub use services::{ChatService, IndexingService, EMPTY_INDEX_REPLY};
