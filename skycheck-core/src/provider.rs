use crate::{
    Config, ProviderError,
    model::{ForecastEntry, WeatherSnapshot},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current conditions and forecasts. Units are always metric.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, city: &str) -> Result<WeatherSnapshot, ProviderError>;

    /// The raw 3-hourly forecast feed, oldest first.
    async fn forecast(&self, city: &str) -> Result<Vec<ForecastEntry>, ProviderError>;
}

/// Construct the OpenWeather provider from config.
///
/// `env_api_key` takes precedence over the key stored in the config file.
pub fn provider_from_config(
    config: &Config,
    env_api_key: Option<&str>,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.resolve_api_key(env_api_key)?;
    let provider = OpenWeatherProvider::builder(api_key)
        .base_url(config.base_url())
        .timeout(config.timeout())
        .build()?;

    Ok(Box::new(provider))
}
