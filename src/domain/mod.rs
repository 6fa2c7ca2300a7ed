// Domain layer: table model and ports (interfaces) for fetching, storage and publishing.

pub mod model;
pub mod ports;
