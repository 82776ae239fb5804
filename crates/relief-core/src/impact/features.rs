//! Feature vector layout shared with the trained population model.

use ndarray::Array1;

use crate::domain::{DisasterCategory, WeatherFactors, WeatherObservation};
use crate::ml::{LabelEncoders, MlResult};

/// Number of model features
pub const FEATURE_COUNT: usize = 17;

/// Feature names in model order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "DistrictPopulation",
    "AffectedAreaPercent",
    "Temperature",
    "Rainfall",
    "Humidity",
    "WindSpeed",
    "RainfallFactor",
    "WindFactor",
    "HumidityFactor",
    "TemperatureFactor",
    "WeatherFactor",
    "DurationDays",
    "Month",
    "District_encoded",
    "EventType_encoded",
    "AltitudeZone_encoded",
    "ZoneType_encoded",
];

/// Everything needed to build one feature vector
#[derive(Debug, Clone, Copy)]
pub struct FeatureInputs<'a> {
    /// Canonical region name
    pub region: &'a str,
    /// Region population
    pub population: u64,
    /// Share of population in the footprint (0-100)
    pub affected_area_percent: f64,
    /// Raw weather
    pub weather: &'a WeatherObservation,
    /// Derived factors
    pub factors: &'a WeatherFactors,
    /// Category metadata
    pub category: &'a DisasterCategory,
    /// Event duration fed to the model
    pub duration_days: u32,
    /// Calendar month fed to the model
    pub month: u32,
}

/// Build the 17-entry feature vector, encoding the categorical columns
pub fn build_features(inputs: &FeatureInputs<'_>, encoders: &LabelEncoders) -> MlResult<Array1<f64>> {
    let district = encoders.district(inputs.region)?;
    let event_type = encoders.event_type(&inputs.category.model_label())?;
    let altitude_zone = encoders.altitude_zone(&inputs.category.altitude_zone)?;
    let zone_type = encoders.zone_type(&inputs.category.zone_type)?;

    Ok(Array1::from(vec![
        inputs.population as f64,
        inputs.affected_area_percent,
        inputs.weather.temperature,
        inputs.weather.rainfall,
        inputs.weather.humidity,
        inputs.weather.wind_speed,
        inputs.factors.rainfall_factor,
        inputs.factors.wind_factor,
        inputs.factors.humidity_factor,
        inputs.factors.temperature_factor,
        inputs.factors.weather_factor,
        f64::from(inputs.duration_days),
        f64::from(inputs.month),
        district as f64,
        event_type as f64,
        altitude_zone as f64,
        zone_type as f64,
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReferenceData;
    use crate::impact::weather::weather_factors;
    use crate::ml::MlError;
    use approx::assert_relative_eq;

    fn encoders() -> LabelEncoders {
        serde_json::from_str(
            r#"{
                "District": ["Almora", "Dehradun", "Nainital"],
                "EventType": ["Earthquake", "Flash Flood", "Flood"],
                "AltitudeZone": ["High Altitude", "Low Altitude", "Mid Altitude"],
                "ZoneType": ["Hilly", "Plains", "Valley"]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_feature_order() {
        let data = ReferenceData::builtin();
        let category = data.categories.get("flash_flood").unwrap();
        let weather = WeatherObservation::new(28.5, 45.2, 78.3, 12.5);
        let factors = weather_factors(&weather);
        let inputs = FeatureInputs {
            region: "Dehradun",
            population: 1_696_694,
            affected_area_percent: 15.0,
            weather: &weather,
            factors: &factors,
            category,
            duration_days: 1,
            month: 6,
        };

        let x = build_features(&inputs, &encoders()).unwrap();
        assert_eq!(x.len(), FEATURE_COUNT);
        assert_relative_eq!(x[0], 1_696_694.0);
        assert_relative_eq!(x[1], 15.0);
        assert_relative_eq!(x[5], 12.5);
        assert_relative_eq!(x[6], 1.10);
        assert_relative_eq!(x[11], 1.0);
        assert_relative_eq!(x[12], 6.0);
        assert_relative_eq!(x[13], 1.0); // Dehradun
        assert_relative_eq!(x[14], 1.0); // Flash Flood
        assert_relative_eq!(x[15], 2.0); // Mid Altitude
        assert_relative_eq!(x[16], 2.0); // Valley
    }

    #[test]
    fn test_unseen_region_is_error() {
        let data = ReferenceData::builtin();
        let category = data.categories.get("flood").unwrap();
        let weather = WeatherObservation::new(20.0, 0.0, 50.0, 0.0);
        let factors = weather_factors(&weather);
        let inputs = FeatureInputs {
            region: "Chamoli",
            population: 1,
            affected_area_percent: 1.0,
            weather: &weather,
            factors: &factors,
            category,
            duration_days: 1,
            month: 6,
        };
        assert!(matches!(
            build_features(&inputs, &encoders()),
            Err(MlError::UnseenLabel { .. })
        ));
    }
}
