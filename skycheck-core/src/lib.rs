//! Core library for the `skycheck` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client behind the `WeatherProvider` trait
//! - City search state and its controller
//! - The persisted favorites list
//!
//! It is used by `skycheck-cli`, but can also be reused by other front ends.

pub mod app;
pub mod config;
pub mod error;
pub mod favorites;
pub mod forecast;
pub mod model;
pub mod provider;
pub mod search;
pub mod storage;

pub use app::WeatherApp;
pub use config::{Config, OpenWeatherConfig};
pub use error::ProviderError;
pub use favorites::Favorites;
pub use model::{ForecastEntry, WeatherReport, WeatherSnapshot};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use search::{SearchController, SearchState};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
