//! Human-readable output.

use chrono::Local;
use skycheck_core::{SearchState, WeatherReport, WeatherSnapshot};

/// Whole degrees, halves rounded up (-0.5 shows as 0).
fn celsius(value: f64) -> String {
    format!("{}°C", (value + 0.5).floor() as i64)
}

fn title(weather: &WeatherSnapshot) -> String {
    if weather.country.is_empty() {
        weather.name.clone()
    } else {
        format!("{}, {}", weather.name, weather.country)
    }
}

pub fn report(report: &WeatherReport) -> String {
    let weather = &report.weather;
    let mut out = format!(
        "{}\n  {}  {}\n  Wind speed: {} m/s\n",
        title(weather),
        celsius(weather.temperature_c),
        weather.description,
        weather.wind_speed_mps,
    );

    if !report.forecast.is_empty() {
        out.push_str("\n  Forecast:\n");
        for entry in &report.forecast {
            let day = entry.timestamp.with_timezone(&Local).format("%a %d %b");
            out.push_str(&format!(
                "    {day}  {:>5}  {}\n",
                celsius(entry.temperature_c),
                entry.description
            ));
        }
    }

    out
}

pub fn loading(city: &str) -> String {
    format!("Loading weather for {city}...")
}

/// Render the search state. With `verbose`, failures include their cause.
pub fn state(state: &SearchState, verbose: bool) -> String {
    match state {
        SearchState::Idle => String::new(),
        SearchState::Loading { city, .. } => loading(city),
        SearchState::Success(r) => report(r),
        SearchState::Failed { city, error } => {
            if verbose {
                format!("{} ({city}): {error}", error.user_message())
            } else {
                format!("{} ({city})", error.user_message())
            }
        }
    }
}

pub fn favorites(cities: &[String]) -> String {
    if cities.is_empty() {
        return "No favorites yet.".to_string();
    }

    cities
        .iter()
        .enumerate()
        .map(|(i, city)| format!("{:>3}. {city}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}
