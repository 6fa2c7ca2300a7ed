// Adapters layer: concrete implementations for external systems (local storage, dataset publishing).

pub mod publisher;
pub mod storage;

pub use publisher::{DryRunPublisher, KaggleCliPublisher};
pub use storage::LocalStorage;
