//! Weather proxy for MyDash
//!
//! Looks up current conditions from the Google Weather API and reshapes them
//! for the dashboard weather card.

pub mod location;
pub mod provider;
pub mod types;

pub use location::{round_coordinate, weather_cache_key};
pub use provider::{transform, WeatherProvider};
pub use types::{Coordinates, WeatherResponse};
