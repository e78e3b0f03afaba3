use anyhow::Result;

use crate::{
    favorites::Favorites,
    search::{RequestToken, SearchController},
    storage::KeyValueStore,
};

/// The search controller and the favorites list, side by side.
///
/// Favorites never change as a result of a search; the only link is
/// [`select_favorite_city`](Self::select_favorite_city).
#[derive(Debug)]
pub struct WeatherApp<S> {
    pub search: SearchController,
    pub favorites: Favorites<S>,
}

impl<S: KeyValueStore> WeatherApp<S> {
    pub fn new(search: SearchController, store: S) -> Self {
        Self {
            search,
            favorites: Favorites::load(store),
        }
    }

    pub async fn select_favorite_city(&mut self, city: &str) -> Option<RequestToken> {
        self.search.select_favorite_city(city).await
    }

    /// Bookmark whatever is currently typed in the input field.
    pub fn add_input_to_favorites(&mut self) -> Result<bool> {
        let city = self.search.input().to_string();
        self.favorites.add(&city)
    }

    pub fn remove_favorite(&mut self, city: &str) -> Result<bool> {
        self.favorites.remove(city)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ProviderError, WeatherProvider,
        model::{ForecastEntry, WeatherSnapshot},
        storage::MemoryStore,
    };
    use async_trait::async_trait;

    #[derive(Debug)]
    struct Offline;

    #[async_trait]
    impl WeatherProvider for Offline {
        async fn current(&self, city: &str) -> Result<WeatherSnapshot, ProviderError> {
            Err(ProviderError::CityNotFound(city.to_string()))
        }

        async fn forecast(&self, city: &str) -> Result<Vec<ForecastEntry>, ProviderError> {
            Err(ProviderError::CityNotFound(city.to_string()))
        }
    }

    fn app() -> WeatherApp<MemoryStore> {
        WeatherApp::new(SearchController::new(Box::new(Offline)), MemoryStore::new())
    }

    #[test]
    fn adds_the_typed_city() {
        let mut app = app();
        app.search.set_input("Lyon");

        assert!(app.add_input_to_favorites().unwrap());
        assert!(!app.add_input_to_favorites().unwrap());
        assert_eq!(app.favorites.list(), ["Lyon"]);
    }

    #[test]
    fn empty_input_adds_nothing() {
        let mut app = app();
        assert!(!app.add_input_to_favorites().unwrap());
        assert!(app.favorites.is_empty());
    }

    #[tokio::test]
    async fn failed_search_leaves_favorites_alone() {
        let mut app = app();
        app.favorites.add("Atlantis").unwrap();

        app.select_favorite_city("Atlantis").await;

        assert!(app.search.state().is_error());
        assert_eq!(app.search.input(), "Atlantis");
        assert_eq!(app.favorites.list(), ["Atlantis"]);
    }

    #[test]
    fn remove_favorite_forwards_to_the_store() {
        let mut app = app();
        app.favorites.add("Nice").unwrap();

        assert!(app.remove_favorite("Nice").unwrap());
        assert!(app.favorites.is_empty());
    }
}
