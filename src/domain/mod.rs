// Domain layer - Typed records and pure value helpers
pub mod format;
pub mod lenient;
pub mod miner;
pub mod pv;
pub mod settings;
pub mod weather;
