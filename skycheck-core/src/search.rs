//! City search state and the controller that drives it.
//!
//! State only changes through [`SearchState::apply`], which consumes the old
//! state and an event and returns the next state. Each search carries a
//! [`RequestToken`]; a completion whose token is not the one currently loading
//! is stale and gets dropped, so an older response can never overwrite a newer
//! one.

use tracing::{debug, info, instrument, warn};

use crate::{
    ProviderError, WeatherProvider,
    forecast::daily_entries,
    model::{ForecastEntry, WeatherReport, WeatherSnapshot},
};

/// Monotonically increasing id of a search.
pub type RequestToken = u64;

pub type SearchOutcome = Result<WeatherReport, ProviderError>;

#[derive(Debug, Default)]
pub enum SearchState {
    #[default]
    Idle,
    Loading {
        city: String,
        token: RequestToken,
    },
    Success(WeatherReport),
    Failed {
        city: String,
        error: ProviderError,
    },
}

#[derive(Debug)]
pub enum SearchEvent {
    Started { city: String, token: RequestToken },
    Completed { token: RequestToken, outcome: SearchOutcome },
}

impl SearchState {
    /// Next state for `event`.
    pub fn apply(self, event: SearchEvent) -> SearchState {
        match (self, event) {
            (_, SearchEvent::Started { city, token }) => SearchState::Loading { city, token },
            (
                SearchState::Loading {
                    city,
                    token: current,
                },
                SearchEvent::Completed { token, outcome },
            ) if token == current => match outcome {
                Ok(report) => SearchState::Success(report),
                Err(error) => SearchState::Failed { city, error },
            },
            (state, SearchEvent::Completed { token, .. }) => {
                debug!(token, "Discarding stale search result");
                state
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SearchState::Loading { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SearchState::Failed { .. })
    }

    /// Current conditions of the last successful search, if that is what is shown.
    pub fn data(&self) -> Option<&WeatherSnapshot> {
        match self {
            SearchState::Success(report) => Some(&report.weather),
            _ => None,
        }
    }

    pub fn forecast(&self) -> &[ForecastEntry] {
        match self {
            SearchState::Success(report) => &report.forecast,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&ProviderError> {
        match self {
            SearchState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// A search that has been started but not completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSearch {
    pub token: RequestToken,
    pub city: String,
}

/// Fetch current conditions and the forecast concurrently.
///
/// Fails as soon as either request fails; succeeds only once both have.
#[instrument(skip(provider))]
pub async fn fetch_report(provider: &dyn WeatherProvider, city: &str) -> SearchOutcome {
    let (weather, samples) = tokio::try_join!(provider.current(city), provider.forecast(city))?;

    Ok(WeatherReport {
        weather,
        forecast: daily_entries(samples),
    })
}

/// Owns the input field, the search state, and the provider.
#[derive(Debug)]
pub struct SearchController {
    provider: Box<dyn WeatherProvider>,
    input: String,
    state: SearchState,
    last_token: RequestToken,
}

impl SearchController {
    pub fn new(provider: Box<dyn WeatherProvider>) -> Self {
        Self {
            provider,
            input: String::new(),
            state: SearchState::Idle,
            last_token: 0,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    fn transition(&mut self, event: SearchEvent) {
        let state = std::mem::take(&mut self.state);
        self.state = state.apply(event);
    }

    /// Move to Loading for `city` and hand out its token. Blank cities are
    /// ignored.
    pub fn begin(&mut self, city: &str) -> Option<PendingSearch> {
        if city.trim().is_empty() {
            return None;
        }

        self.last_token += 1;
        let pending = PendingSearch {
            token: self.last_token,
            city: city.to_string(),
        };
        info!(city, token = pending.token, "Searching");

        self.transition(SearchEvent::Started {
            city: pending.city.clone(),
            token: pending.token,
        });
        Some(pending)
    }

    /// Apply the outcome of a search started with [`begin`](Self::begin).
    pub fn finish(&mut self, token: RequestToken, outcome: SearchOutcome) {
        if let Err(err) = &outcome {
            warn!(token, kind = err.kind(), error = %err, "Search failed");
        }
        self.transition(SearchEvent::Completed { token, outcome });
    }

    /// Run a full search for `city`. Returns the token used, or `None` when
    /// `city` is blank and nothing happened.
    pub async fn search(&mut self, city: &str) -> Option<RequestToken> {
        let pending = self.begin(city)?;
        let outcome = fetch_report(self.provider.as_ref(), &pending.city).await;
        self.finish(pending.token, outcome);
        Some(pending.token)
    }

    /// Enter pressed in the input field: search for its text and clear it
    /// before the result arrives.
    pub async fn submit_from_input(&mut self) -> Option<RequestToken> {
        let city = std::mem::take(&mut self.input);
        self.search(&city).await
    }

    /// Show `city` in the input field and search for it.
    pub async fn select_favorite_city(&mut self, city: &str) -> Option<RequestToken> {
        self.input = city.to_string();
        self.search(city).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, Utc};
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    #[derive(Debug, Default)]
    struct Calls {
        current: AtomicUsize,
        forecast: AtomicUsize,
    }

    /// Knows a fixed set of cities; optionally fails the forecast call.
    #[derive(Debug, Default)]
    struct FakeProvider {
        calls: Arc<Calls>,
        forecast_down: bool,
    }

    fn snapshot(city: &str) -> WeatherSnapshot {
        WeatherSnapshot {
            name: city.to_string(),
            country: "FR".to_string(),
            temperature_c: 18.0,
            wind_speed_mps: 2.5,
            icon: "01d".to_string(),
            description: "clear sky".to_string(),
        }
    }

    fn samples(count: usize) -> Vec<ForecastEntry> {
        let start = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        (0..count)
            .map(|i| ForecastEntry {
                timestamp: start + Duration::hours(3 * i as i64),
                temperature_c: i as f64,
                icon: "01d".to_string(),
                description: "clear sky".to_string(),
            })
            .collect()
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn current(&self, city: &str) -> Result<WeatherSnapshot, ProviderError> {
            self.calls.current.fetch_add(1, Ordering::SeqCst);
            match city {
                "Paris" | "Lyon" => Ok(snapshot(city)),
                _ => Err(ProviderError::CityNotFound(city.to_string())),
            }
        }

        async fn forecast(&self, city: &str) -> Result<Vec<ForecastEntry>, ProviderError> {
            self.calls.forecast.fetch_add(1, Ordering::SeqCst);
            if self.forecast_down {
                return Err(ProviderError::Status {
                    status: 503,
                    body: "unavailable".into(),
                });
            }
            match city {
                "Paris" | "Lyon" => Ok(samples(40)),
                _ => Err(ProviderError::CityNotFound(city.to_string())),
            }
        }
    }

    fn controller() -> (SearchController, Arc<Calls>) {
        let provider = FakeProvider::default();
        let calls = provider.calls.clone();
        (SearchController::new(Box::new(provider)), calls)
    }

    fn report(city: &str) -> WeatherReport {
        WeatherReport {
            weather: snapshot(city),
            forecast: daily_entries(samples(40)),
        }
    }

    #[tokio::test]
    async fn successful_search_shows_weather_and_daily_forecast() {
        let (mut ctl, _) = controller();

        assert!(ctl.search("Paris").await.is_some());

        let state = ctl.state();
        assert!(!state.is_error());
        assert!(!state.is_loading());
        assert_eq!(state.data().map(|d| d.name.as_str()), Some("Paris"));
        assert_eq!(state.forecast().len(), 5);
    }

    #[tokio::test]
    async fn unknown_city_clears_data_and_flags_error() {
        let (mut ctl, _) = controller();
        ctl.search("Paris").await;

        ctl.search("Zzqx").await;

        let state = ctl.state();
        assert!(state.is_error());
        assert!(!state.is_loading());
        assert!(state.data().is_none());
        assert!(state.forecast().is_empty());
        assert!(state.error().is_some_and(ProviderError::is_not_found));
    }

    #[tokio::test]
    async fn forecast_failure_alone_fails_the_search() {
        let provider = FakeProvider {
            forecast_down: true,
            ..FakeProvider::default()
        };
        let mut ctl = SearchController::new(Box::new(provider));

        ctl.search("Paris").await;

        assert!(ctl.state().is_error());
        assert!(ctl.state().data().is_none());
        assert_eq!(ctl.state().error().map(ProviderError::kind), Some("status"));
    }

    #[tokio::test]
    async fn blank_search_is_a_no_op() {
        let (mut ctl, calls) = controller();

        assert_eq!(ctl.search("").await, None);
        assert_eq!(ctl.search("  \t").await, None);

        assert!(matches!(ctl.state(), SearchState::Idle));
        assert_eq!(calls.current.load(Ordering::SeqCst), 0);
        assert_eq!(calls.forecast.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn submit_clears_input_regardless_of_outcome() {
        let (mut ctl, _) = controller();

        ctl.set_input("Zzqx");
        ctl.submit_from_input().await;
        assert_eq!(ctl.input(), "");
        assert!(ctl.state().is_error());

        ctl.set_input("Lyon");
        ctl.submit_from_input().await;
        assert_eq!(ctl.input(), "");
        assert_eq!(ctl.state().data().map(|d| d.name.as_str()), Some("Lyon"));
    }

    #[tokio::test]
    async fn submit_searches_the_typed_city_once() {
        let (mut ctl, calls) = controller();
        ctl.set_input("Paris");

        let token = ctl.submit_from_input().await;

        assert!(token.is_some());
        assert_eq!(ctl.input(), "");
        assert_eq!(calls.current.load(Ordering::SeqCst), 1);
        assert_eq!(calls.forecast.load(Ordering::SeqCst), 1);
        assert_eq!(ctl.state().data().map(|d| d.name.as_str()), Some("Paris"));
    }

    #[tokio::test]
    async fn submit_with_blank_input_does_not_search() {
        let (mut ctl, calls) = controller();
        ctl.set_input("   ");

        assert_eq!(ctl.submit_from_input().await, None);
        assert_eq!(ctl.input(), "");
        assert_eq!(calls.current.load(Ordering::SeqCst), 0);
        assert!(matches!(ctl.state(), SearchState::Idle));
    }

    #[tokio::test]
    async fn selecting_a_favorite_sets_input_and_searches_once() {
        let (mut ctl, calls) = controller();

        ctl.select_favorite_city("Lyon").await;

        assert_eq!(ctl.input(), "Lyon");
        assert_eq!(calls.current.load(Ordering::SeqCst), 1);
        assert_eq!(calls.forecast.load(Ordering::SeqCst), 1);
        assert_eq!(ctl.state().data().map(|d| d.name.as_str()), Some("Lyon"));
    }

    #[test]
    fn tokens_increase_with_each_search() {
        let (mut ctl, _) = controller();
        let first = ctl.begin("Paris").unwrap();
        let second = ctl.begin("Lyon").unwrap();
        assert!(second.token > first.token);
    }

    #[test]
    fn stale_result_arriving_late_is_discarded() {
        let (mut ctl, _) = controller();
        let older = ctl.begin("Paris").unwrap();
        let newer = ctl.begin("Lyon").unwrap();

        ctl.finish(newer.token, Ok(report("Lyon")));
        ctl.finish(older.token, Ok(report("Paris")));

        assert_eq!(ctl.state().data().map(|d| d.name.as_str()), Some("Lyon"));
    }

    #[test]
    fn stale_result_arriving_early_does_not_end_loading() {
        let (mut ctl, _) = controller();
        let older = ctl.begin("Paris").unwrap();
        let newer = ctl.begin("Zzqx").unwrap();

        ctl.finish(older.token, Ok(report("Paris")));
        assert!(ctl.state().is_loading());

        ctl.finish(
            newer.token,
            Err(ProviderError::CityNotFound("Zzqx".into())),
        );
        assert!(ctl.state().is_error());
    }

    #[test]
    fn completion_without_a_search_is_ignored() {
        let state = SearchState::Idle.apply(SearchEvent::Completed {
            token: 7,
            outcome: Ok(report("Paris")),
        });
        assert!(matches!(state, SearchState::Idle));
    }

    #[test]
    fn new_search_replaces_previous_error() {
        let failed = SearchState::Failed {
            city: "Zzqx".into(),
            error: ProviderError::CityNotFound("Zzqx".into()),
        };

        let state = failed.apply(SearchEvent::Started {
            city: "Paris".into(),
            token: 2,
        });

        assert!(state.is_loading());
        assert!(!state.is_error());
    }
}
