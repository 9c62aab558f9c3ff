//! Dashboard header feeds
//!
//! Location, weather and quote lookups are external collaborators. This
//! module defines their interfaces and the fail-closed wrappers the rest of
//! the crate calls: a collaborator failure is logged and replaced with a
//! fixed fallback, and never reaches the ledger code.

use log::warn;
use thiserror::Error;

/// City used when location detection fails
pub const FALLBACK_CITY: &str = "New York";

/// Temperature shown when weather is unavailable
pub const FALLBACK_TEMPERATURE: &str = "N/A";

/// Condition shown when weather is unavailable
pub const FALLBACK_CONDITION: &str = "Check Connection/City Name";

/// Quote shown when the quote service is unavailable
pub const FALLBACK_QUOTE: &str = "Keep going! Everything you need is already within you.";

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Feed unavailable: {0}")]
    Unavailable(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Parsing error: {0}")]
    Parsing(String),
}

/// Current conditions for a city, already formatted for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherReport {
    /// e.g. "21.5°C"
    pub temperature: String,
    /// e.g. "Partly cloudy"
    pub condition: String,
}

impl WeatherReport {
    pub fn unavailable() -> Self {
        Self {
            temperature: FALLBACK_TEMPERATURE.to_string(),
            condition: FALLBACK_CONDITION.to_string(),
        }
    }
}

/// A quote and its author
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

impl Quote {
    /// Render as `"text" - author`
    pub fn render(&self) -> String {
        format!("\"{}\" - {}", self.text, self.author)
    }
}

/// Detects the user's city
pub trait CityLocator {
    fn locate(&self) -> Result<String, FeedError>;
}

/// Looks up current weather for a city
pub trait WeatherSource {
    fn current(&self, city: &str) -> Result<WeatherReport, FeedError>;
}

/// Fetches a motivational quote
pub trait QuoteSource {
    fn random(&self) -> Result<Quote, FeedError>;
}

/// Detected city, or [`FALLBACK_CITY`]
pub fn city_or_fallback(locator: &dyn CityLocator) -> String {
    match locator.locate() {
        Ok(city) if !city.trim().is_empty() => city.trim().to_string(),
        Ok(_) => {
            warn!("Location lookup returned an empty city; using fallback");
            FALLBACK_CITY.to_string()
        }
        Err(e) => {
            warn!("Location lookup failed: {}", e);
            FALLBACK_CITY.to_string()
        }
    }
}

/// Weather for `city`, or the unavailable placeholders
pub fn weather_or_fallback(source: &dyn WeatherSource, city: &str) -> WeatherReport {
    source.current(city).unwrap_or_else(|e| {
        warn!("Weather lookup for {} failed: {}", city, e);
        WeatherReport::unavailable()
    })
}

/// Rendered quote, or [`FALLBACK_QUOTE`]
pub fn quote_or_fallback(source: &dyn QuoteSource) -> String {
    match source.random() {
        Ok(quote) => quote.render(),
        Err(e) => {
            warn!("Quote lookup failed: {}", e);
            FALLBACK_QUOTE.to_string()
        }
    }
}

/// Locator that reports the city configured in settings
#[derive(Debug, Clone, Default)]
pub struct ConfiguredCity {
    city: Option<String>,
}

impl ConfiguredCity {
    pub fn new(city: Option<String>) -> Self {
        Self { city }
    }
}

impl CityLocator for ConfiguredCity {
    fn locate(&self) -> Result<String, FeedError> {
        self.city
            .clone()
            .ok_or_else(|| FeedError::Unavailable("no home city configured".into()))
    }
}

/// Source used when no network-backed implementation is wired in
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

impl WeatherSource for Offline {
    fn current(&self, _city: &str) -> Result<WeatherReport, FeedError> {
        Err(FeedError::Unavailable("weather service not configured".into()))
    }
}

impl QuoteSource for Offline {
    fn random(&self) -> Result<Quote, FeedError> {
        Err(FeedError::Unavailable("quote service not configured".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sunny;

    impl WeatherSource for Sunny {
        fn current(&self, city: &str) -> Result<WeatherReport, FeedError> {
            Ok(WeatherReport {
                temperature: "21.5°C".into(),
                condition: format!("Sunny in {}", city),
            })
        }
    }

    struct Seneca;

    impl QuoteSource for Seneca {
        fn random(&self) -> Result<Quote, FeedError> {
            Ok(Quote {
                text: "Luck is what happens when preparation meets opportunity.".into(),
                author: "Seneca".into(),
            })
        }
    }

    #[test]
    fn test_city_fallback() {
        assert_eq!(city_or_fallback(&ConfiguredCity::default()), FALLBACK_CITY);
        assert_eq!(
            city_or_fallback(&ConfiguredCity::new(Some("   ".into()))),
            FALLBACK_CITY
        );
        assert_eq!(
            city_or_fallback(&ConfiguredCity::new(Some(" Oslo ".into()))),
            "Oslo"
        );
    }

    #[test]
    fn test_weather_fallback() {
        let report = weather_or_fallback(&Offline, "Oslo");
        assert_eq!(report.temperature, "N/A");
        assert_eq!(report.condition, "Check Connection/City Name");

        let report = weather_or_fallback(&Sunny, "Oslo");
        assert_eq!(report.condition, "Sunny in Oslo");
    }

    #[test]
    fn test_quote_fallback_and_render() {
        assert_eq!(quote_or_fallback(&Offline), FALLBACK_QUOTE);
        assert_eq!(
            quote_or_fallback(&Seneca),
            "\"Luck is what happens when preparation meets opportunity.\" - Seneca"
        );
    }
}
