//! Weather observations supplied by an external feed and the severity factors derived from them.

use serde::{Deserialize, Serialize};

use crate::ReliefError;

/// Coldest and hottest surface temperatures accepted as plausible readings (°C)
const TEMPERATURE_RANGE: (f64, f64) = (-90.0, 70.0);

/// Current weather at the affected region.
///
/// Observations always come from the caller. Nothing in this crate samples or
/// fabricates weather.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    /// Air temperature (°C)
    pub temperature: f64,
    /// Rainfall (mm)
    pub rainfall: f64,
    /// Relative humidity (%)
    pub humidity: f64,
    /// Wind speed (km/h)
    pub wind_speed: f64,
}

impl WeatherObservation {
    /// Create a new observation
    pub fn new(temperature: f64, rainfall: f64, humidity: f64, wind_speed: f64) -> Self {
        Self {
            temperature,
            rainfall,
            humidity,
            wind_speed,
        }
    }

    /// Reject non-finite or physically impossible readings
    pub fn validate(&self) -> Result<(), ReliefError> {
        let fields = [
            ("weather.temperature", self.temperature),
            ("weather.rainfall", self.rainfall),
            ("weather.humidity", self.humidity),
            ("weather.wind_speed", self.wind_speed),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ReliefError::invalid_input(field, "must be a finite number"));
            }
        }

        if self.temperature < TEMPERATURE_RANGE.0 || self.temperature > TEMPERATURE_RANGE.1 {
            return Err(ReliefError::invalid_input(
                "weather.temperature",
                format!(
                    "must be between {} and {} °C, got {}",
                    TEMPERATURE_RANGE.0, TEMPERATURE_RANGE.1, self.temperature
                ),
            ));
        }
        if self.rainfall < 0.0 {
            return Err(ReliefError::invalid_input(
                "weather.rainfall",
                format!("must be non-negative, got {}", self.rainfall),
            ));
        }
        if !(0.0..=100.0).contains(&self.humidity) {
            return Err(ReliefError::invalid_input(
                "weather.humidity",
                format!("must be within [0, 100], got {}", self.humidity),
            ));
        }
        if self.wind_speed < 0.0 {
            return Err(ReliefError::invalid_input(
                "weather.wind_speed",
                format!("must be non-negative, got {}", self.wind_speed),
            ));
        }
        Ok(())
    }
}

/// Dimensionless severity multipliers derived from a [`WeatherObservation`].
///
/// Every sub-factor is at least `1.0`; `weather_factor` is their geometric mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherFactors {
    /// Rainfall amplification
    pub rainfall_factor: f64,
    /// Wind amplification
    pub wind_factor: f64,
    /// Humidity amplification
    pub humidity_factor: f64,
    /// Temperature amplification
    pub temperature_factor: f64,
    /// Combined factor (4th root of the product of the four sub-factors)
    pub weather_factor: f64,
}

impl WeatherFactors {
    /// Combine four sub-factors
    pub fn from_components(
        rainfall_factor: f64,
        wind_factor: f64,
        humidity_factor: f64,
        temperature_factor: f64,
    ) -> Self {
        let product = rainfall_factor * wind_factor * humidity_factor * temperature_factor;
        Self {
            rainfall_factor,
            wind_factor,
            humidity_factor,
            temperature_factor,
            weather_factor: product.powf(0.25),
        }
    }

    /// Factors for calm weather (all `1.0`)
    pub fn neutral() -> Self {
        Self::from_components(1.0, 1.0, 1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_valid_observation() {
        let obs = WeatherObservation::new(28.5, 45.2, 78.3, 12.5);
        assert!(obs.validate().is_ok());
    }

    #[test]
    fn test_invalid_observations() {
        assert!(WeatherObservation::new(20.0, -1.0, 50.0, 5.0).validate().is_err());
        assert!(WeatherObservation::new(20.0, 1.0, 101.0, 5.0).validate().is_err());
        assert!(WeatherObservation::new(20.0, 1.0, 50.0, -5.0).validate().is_err());
        assert!(WeatherObservation::new(f64::NAN, 1.0, 50.0, 5.0).validate().is_err());
        assert!(WeatherObservation::new(150.0, 1.0, 50.0, 5.0).validate().is_err());
    }

    #[test]
    fn test_geometric_mean() {
        let factors = WeatherFactors::from_components(1.10, 1.03, 1.02, 1.0);
        assert_relative_eq!(
            factors.weather_factor,
            (1.10_f64 * 1.03 * 1.02).powf(0.25),
            epsilon = 1e-12
        );
        assert_relative_eq!(WeatherFactors::neutral().weather_factor, 1.0);
    }

    #[test]
    fn test_serde_field_names() {
        let json = r#"{"rainfall": 45.2, "wind_speed": 12.5, "humidity": 78.3, "temperature": 28.5}"#;
        let obs: WeatherObservation = serde_json::from_str(json).unwrap();
        assert_eq!(obs.wind_speed, 12.5);
    }
}
