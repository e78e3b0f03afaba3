use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use skycheck_core::{
    Config, Favorites, JsonFileStore, SearchController, WeatherApp, config::API_KEY_ENV,
    provider_from_config,
};

use crate::{interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycheck", version, about = "City weather lookup with favorites")]
pub struct Cli {
    /// Show debug logs and the cause of failed searches.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Without a subcommand an interactive session starts.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current weather and the 5-day forecast for a city.
    Show {
        /// City name, e.g. "Paris" or "New York".
        city: String,
    },

    /// Manage favorite cities.
    Fav {
        #[command(subcommand)]
        action: FavCommand,
    },

    /// Search and manage favorites from a prompt.
    Interactive,
}

#[derive(Debug, Subcommand)]
pub enum FavCommand {
    /// List favorite cities.
    List,
    /// Add a city to favorites.
    Add { city: String },
    /// Remove a city from favorites.
    Remove { city: String },
    /// Show the weather for a favorite city.
    Open { city: String },
}

fn env_api_key() -> Option<String> {
    std::env::var(API_KEY_ENV).ok()
}

fn open_store(config: &Config) -> anyhow::Result<JsonFileStore> {
    Ok(JsonFileStore::new(config.store_path()?))
}

fn open_app(config: &Config) -> anyhow::Result<WeatherApp<JsonFileStore>> {
    let provider = provider_from_config(config, env_api_key().as_deref())?;
    Ok(WeatherApp::new(
        SearchController::new(provider),
        open_store(config)?,
    ))
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command.unwrap_or(Command::Interactive) {
            Command::Configure => configure(config)?,
            Command::Show { city } => {
                let mut search = SearchController::new(provider_from_config(
                    &config,
                    env_api_key().as_deref(),
                )?);
                show(&mut search, &city, self.verbose).await?;
            }
            Command::Fav { action } => fav(&config, action, self.verbose).await?,
            Command::Interactive => {
                let mut app = open_app(&config)?;
                interactive::run(&mut app, self.verbose).await?;
            }
        }

        Ok(())
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Get one at https://home.openweathermap.org/api_keys")
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    config.set_api_key(api_key.trim().to_string());
    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn show(search: &mut SearchController, city: &str, verbose: bool) -> anyhow::Result<()> {
    if city.trim().is_empty() {
        bail!("City name must not be empty");
    }

    eprintln!("{}", render::loading(city));
    search.search(city).await;

    if search.state().is_error() {
        bail!(render::state(search.state(), verbose));
    }

    println!("{}", render::state(search.state(), verbose));
    Ok(())
}

async fn fav(config: &Config, action: FavCommand, verbose: bool) -> anyhow::Result<()> {
    match action {
        FavCommand::List => {
            let favorites = Favorites::load(open_store(config)?);
            println!("{}", render::favorites(favorites.list()));
        }
        FavCommand::Add { city } => {
            let mut favorites = Favorites::load(open_store(config)?);
            if favorites.add(&city)? {
                println!("Added {city} to favorites.");
            } else {
                println!("{city} is already a favorite.");
            }
        }
        FavCommand::Remove { city } => {
            let mut favorites = Favorites::load(open_store(config)?);
            if favorites.remove(&city)? {
                println!("Removed {city} from favorites.");
            } else {
                println!("{city} is not a favorite.");
            }
        }
        FavCommand::Open { city } => {
            let mut app = open_app(config)?;
            if !app.favorites.contains(&city) {
                bail!("{city} is not a favorite. Add it with `skycheck fav add`.");
            }
            eprintln!("{}", render::loading(&city));
            app.select_favorite_city(&city).await;

            if app.search.state().is_error() {
                bail!(render::state(app.search.state(), verbose));
            }
            println!("{}", render::state(app.search.state(), verbose));
        }
    }

    Ok(())
}
