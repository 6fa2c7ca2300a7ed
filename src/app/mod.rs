// Application layer: wires configuration, credentials and adapters into a runnable engine.

pub mod startup;

pub use startup::{prepare_engine, prepare_engine_from_env, StatsEngine};
