//! Step tables turning raw weather readings into severity factors.

use crate::domain::{WeatherFactors, WeatherObservation};

// (inclusive upper bound, factor); the last entry is the open-ended tail
const RAINFALL_STEPS: &[(f64, f64)] = &[
    (10.0, 1.0),
    (25.0, 1.05),
    (50.0, 1.10),
    (100.0, 1.15),
    (200.0, 1.25),
    (f64::INFINITY, 1.35),
];

const WIND_STEPS: &[(f64, f64)] = &[
    (10.0, 1.0),
    (20.0, 1.03),
    (30.0, 1.08),
    (50.0, 1.15),
    (f64::INFINITY, 1.25),
];

const HUMIDITY_STEPS: &[(f64, f64)] = &[
    (60.0, 1.0),
    (80.0, 1.02),
    (90.0, 1.05),
    (f64::INFINITY, 1.08),
];

const COMFORT_TEMPERATURE: (f64, f64) = (15.0, 30.0);

fn step(table: &[(f64, f64)], value: f64) -> f64 {
    table
        .iter()
        .find(|(upper, _)| value <= *upper)
        .map(|(_, factor)| *factor)
        .unwrap_or(1.0)
}

/// Rainfall (mm) factor
pub fn rainfall_factor(rainfall: f64) -> f64 {
    step(RAINFALL_STEPS, rainfall)
}

/// Wind speed (km/h) factor
pub fn wind_factor(wind_speed: f64) -> f64 {
    step(WIND_STEPS, wind_speed)
}

/// Relative humidity (%) factor
pub fn humidity_factor(humidity: f64) -> f64 {
    step(HUMIDITY_STEPS, humidity)
}

/// Temperature (°C) factor: cold is worse than hot
pub fn temperature_factor(temperature: f64) -> f64 {
    if (COMFORT_TEMPERATURE.0..=COMFORT_TEMPERATURE.1).contains(&temperature) {
        1.0
    } else if temperature < COMFORT_TEMPERATURE.0 {
        1.05
    } else {
        1.03
    }
}

/// Derive all factors for an observation
pub fn weather_factors(weather: &WeatherObservation) -> WeatherFactors {
    WeatherFactors::from_components(
        rainfall_factor(weather.rainfall),
        wind_factor(weather.wind_speed),
        humidity_factor(weather.humidity),
        temperature_factor(weather.temperature),
    )
}
