// Application layer - Use cases and the seams they depend on
pub mod calculation;
pub mod config_store;
pub mod dashboard_service;
pub mod derivation;
pub mod sanitizer;
pub mod settings_service;
pub mod weather_provider;
pub mod weather_refresh;
