//! Prompt-driven session: type a city and press Enter to search, bookmark it,
//! pick or drop favorites.

use inquire::{InquireError, Select, Text};
use skycheck_core::{KeyValueStore, WeatherApp};
use std::fmt;
use tracing::warn;

use crate::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    Search,
    AddFavorite,
    OpenFavorite,
    RemoveFavorite,
    Quit,
}

impl MenuItem {
    const ALL: [MenuItem; 5] = [
        MenuItem::Search,
        MenuItem::AddFavorite,
        MenuItem::OpenFavorite,
        MenuItem::RemoveFavorite,
        MenuItem::Quit,
    ];
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MenuItem::Search => "Search a city",
            MenuItem::AddFavorite => "Add to favorites",
            MenuItem::OpenFavorite => "Open a favorite",
            MenuItem::RemoveFavorite => "Remove a favorite",
            MenuItem::Quit => "Quit",
        })
    }
}

/// `Ok(None)` when the user backed out of a prompt with Esc or Ctrl-C.
fn answered<T>(result: Result<T, InquireError>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// City to offer when bookmarking: the typed text, else the city on screen.
fn bookmark_candidate<S: KeyValueStore>(app: &WeatherApp<S>) -> String {
    if !app.search.input().trim().is_empty() {
        return app.search.input().to_string();
    }

    app.search
        .state()
        .data()
        .map(|weather| weather.name.clone())
        .unwrap_or_default()
}

pub async fn run<S: KeyValueStore>(app: &mut WeatherApp<S>, verbose: bool) -> anyhow::Result<()> {
    println!("{}\n", render::favorites(app.favorites.list()));

    loop {
        let Some(choice) = answered(Select::new("What next?", MenuItem::ALL.to_vec()).prompt())?
        else {
            break;
        };

        match choice {
            MenuItem::Search => {
                let Some(text) = answered(
                    Text::new("City:")
                        .with_initial_value(app.search.input())
                        .prompt(),
                )?
                else {
                    continue;
                };

                app.search.set_input(text.trim());
                let city = app.search.input().to_string();
                if city.is_empty() {
                    continue;
                }

                println!("{}", render::loading(&city));
                app.search.submit_from_input().await;
                println!("{}", render::state(app.search.state(), verbose));
            }
            MenuItem::AddFavorite => {
                let candidate = bookmark_candidate(app);
                let Some(text) = answered(
                    Text::new("Add to favorites:")
                        .with_initial_value(&candidate)
                        .prompt(),
                )?
                else {
                    continue;
                };

                app.search.set_input(text.trim());
                match app.add_input_to_favorites() {
                    Ok(true) => println!("Added {}.", app.search.input()),
                    Ok(false) => println!("Nothing to add."),
                    Err(err) => {
                        warn!(error = %err, "Could not save favorites");
                        println!("Added for this session, but saving failed: {err:#}");
                    }
                }
            }
            MenuItem::OpenFavorite => {
                if app.favorites.is_empty() {
                    println!("{}", render::favorites(&[]));
                    continue;
                }

                let Some(city) =
                    answered(Select::new("Favorite:", app.favorites.list().to_vec()).prompt())?
                else {
                    continue;
                };

                println!("{}", render::loading(&city));
                app.select_favorite_city(&city).await;
                println!("{}", render::state(app.search.state(), verbose));
            }
            MenuItem::RemoveFavorite => {
                if app.favorites.is_empty() {
                    println!("{}", render::favorites(&[]));
                    continue;
                }

                let Some(city) =
                    answered(Select::new("Remove:", app.favorites.list().to_vec()).prompt())?
                else {
                    continue;
                };

                if let Err(err) = app.remove_favorite(&city) {
                    warn!(error = %err, "Could not save favorites");
                    println!("Removed for this session, but saving failed: {err:#}");
                } else {
                    println!("Removed {city}.");
                }
            }
            MenuItem::Quit => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_not_an_error() {
        let result: Result<String, InquireError> = Err(InquireError::OperationCanceled);
        assert!(answered(result).unwrap().is_none());

        let result: Result<String, InquireError> = Err(InquireError::OperationInterrupted);
        assert!(answered(result).unwrap().is_none());

        assert_eq!(answered(Ok(3)).unwrap(), Some(3));
    }

    #[test]
    fn menu_lists_every_action_once() {
        let labels: Vec<String> = MenuItem::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(labels.len(), 5);
        assert_eq!(labels.last().map(String::as_str), Some("Quit"));
    }
}
