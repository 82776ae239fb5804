//! End-to-end tests: reference CSVs, model directories, prediction,
//! estimation and allocation through the coordinator.

use std::fs;

use approx::assert_relative_eq;
use ndarray::ArrayView1;
use relief_core::domain::{CITY_TO_DISTRICT_FILE, DISTRICT_POPULATION_FILE, IMPACT_FACTORS_FILE};
use relief_core::ml::{LabelEncoders, StandardScaler, ENCODERS_FILE, SCALER_FILE};
use relief_core::prelude::*;
use relief_core::{
    IncidentAllocation, MlResult, ModelArtifacts, ReferenceData, RegressionModel, ResourceUsage, FEATURE_COUNT,
};
use serde_json::json;

const DISTRICTS: [&str; 13] = [
    "Almora",
    "Bageshwar",
    "Chamoli",
    "Champawat",
    "Dehradun",
    "Haridwar",
    "Nainital",
    "Pauri Garhwal",
    "Pithoragarh",
    "Rudraprayag",
    "Tehri Garhwal",
    "Udham Singh Nagar",
    "Uttarkashi",
];

/// Two stumps: one on district population, one on the combined weather factor.
///
/// `10_000 + (pop <= 1M ? 40_000 : 250_000) + (weather <= 1.0 ? 0 : 12_000)`
struct TwoStumps;

impl RegressionModel for TwoStumps {
    fn n_features(&self) -> usize {
        FEATURE_COUNT
    }

    fn predict(&self, features: ArrayView1<'_, f64>) -> MlResult<f64> {
        let population = if features[0] <= 1_000_000.0 { 40_000.0 } else { 250_000.0 };
        let weather = if features[10] <= 1.0 { 0.0 } else { 12_000.0 };
        Ok(10_000.0 + population + weather)
    }

    fn name(&self) -> &str {
        "two_stumps"
    }
}

fn model_artifacts() -> ModelArtifacts {
    let encoders: LabelEncoders = serde_json::from_value(json!({
        "District": DISTRICTS,
        "EventType": ["Avalanche", "Cloudburst", "Earthquake", "Flash Flood", "Flood", "Landslide"],
        "AltitudeZone": ["High Altitude", "Low Altitude", "Mid Altitude", "Very High Altitude"],
        "ZoneType": ["Alpine", "Hilly", "Plains", "Seismic", "Valley"]
    }))
    .unwrap();
    let scaler: StandardScaler =
        serde_json::from_value(json!({"mean": vec![0.0; FEATURE_COUNT], "scale": vec![1.0; FEATURE_COUNT]})).unwrap();
    ModelArtifacts::from_parts(TwoStumps, encoders, scaler, FEATURE_COUNT).unwrap()
}

fn coordinator_with_model() -> ReliefCoordinator {
    ReliefCoordinator::new(ReferenceData::builtin(), Some(model_artifacts()), PipelineConfig::default())
}

fn reference_weather() -> WeatherObservation {
    WeatherObservation::new(28.5, 45.2, 78.3, 12.5)
}

fn calm_weather() -> WeatherObservation {
    WeatherObservation::new(20.0, 5.0, 50.0, 5.0)
}

#[test]
fn reference_scenario_dehradun_flash_flood() {
    let coordinator = coordinator_with_model();
    assert!(coordinator.has_model());

    let result = coordinator
        .predict_impact(&ImpactRequest::new("Dehradun", "flash_flood", reference_weather()))
        .unwrap();

    assert_eq!(result.region, "Dehradun");
    assert_eq!(result.region_population, 1_696_694);
    assert_relative_eq!(result.affected_area_percent, 15.0);
    assert_eq!(result.base_affected, 254_504);
    assert_relative_eq!(result.weather_factors.rainfall_factor, 1.10);
    assert_relative_eq!(result.weather_factors.wind_factor, 1.03);
    assert_relative_eq!(result.weather_factors.humidity_factor, 1.02);
    assert_relative_eq!(result.weather_factors.temperature_factor, 1.0);
    assert_relative_eq!(result.weather_factors.weather_factor, 1.0368, epsilon = 1e-4);
    assert_eq!(result.predicted_affected, 272_000);
}

#[test]
fn alias_and_calm_weather() {
    let coordinator = coordinator_with_model();
    let result = coordinator
        .predict_impact(&ImpactRequest::new("Haldwani", "flood", calm_weather()))
        .unwrap();
    assert_eq!(result.region, "Nainital");
    assert_relative_eq!(result.weather_factors.weather_factor, 1.0);
    assert_eq!(result.predicted_affected, 50_000);
}

#[test]
fn input_errors_precede_model_errors() {
    let coordinator = ReliefCoordinator::builtin();
    let err = coordinator
        .predict_impact(&ImpactRequest::new("Gotham", "flood", calm_weather()))
        .unwrap_err();
    assert!(matches!(err, ReliefError::UnknownLocation(_)));

    let err = coordinator
        .predict_impact(&ImpactRequest::new("Dehradun", "flood", calm_weather()))
        .unwrap_err();
    assert!(matches!(err, ReliefError::ModelUnavailable(_)));
}

#[test]
fn full_analysis_with_shortage() {
    let coordinator = coordinator_with_model();
    let request = FullAnalysisRequest::new("Dehradun", "flash_flood", reference_weather())
        .with_duration_days(10)
        .with_pool(ResourceNeeds::new(1_000_000, 50, 100));

    let analysis = coordinator.full_analysis(&request).unwrap();
    assert_eq!(analysis.incident.name, "Dehradun Flash Flood");
    assert_eq!(analysis.incident.kind, Some(IncidentKind::Flood));
    assert_eq!(analysis.resources.affected_population, 272_000);
    assert_eq!(analysis.resources.duration_days, 10);

    let report = analysis.allocation.unwrap();
    assert_eq!(report.incidents.len(), 1);
    let incident: &IncidentAllocation = &report.incidents[0];
    let needs = analysis.incident.needs;
    for resource in TrackedResource::ALL {
        let usage: &ResourceUsage = report.usage(resource).unwrap();
        assert!(usage.allocated <= usage.available);
        assert!(incident.allocated(resource) <= needs.get(resource));
    }
    assert!(report.has_shortage());
    assert_eq!(incident.status, AllocationStatus::PartiallyAllocated);
    // a lone incident under shortage receives the whole pool, floored
    assert!((49..=50).contains(&incident.allocated(TrackedResource::RescueTeams)));
}

#[test]
fn full_analysis_without_pool_skips_allocation() {
    let coordinator = coordinator_with_model();
    let analysis = coordinator
        .full_analysis(&FullAnalysisRequest::new("Rishikesh", "landslide", calm_weather()))
        .unwrap();
    assert_eq!(analysis.impact.region, "Dehradun");
    assert!(analysis.allocation.is_none());
    assert_eq!(analysis.resources.duration_days, 7);
}

#[test]
fn csv_reference_data_and_alias_file() {
    let data = tempfile::tempdir().unwrap();
    fs::write(
        data.path().join(DISTRICT_POPULATION_FILE),
        "district,population\nDehradun,1696694\nChamoli,391605\n",
    )
    .unwrap();
    fs::write(
        data.path().join(IMPACT_FACTORS_FILE),
        "disaster_type,default_affected_area,altitude_zone,zone_type,description\n\
         flood,0.2,Low Altitude,Plains,River flooding\n",
    )
    .unwrap();
    fs::write(
        data.path().join(CITY_TO_DISTRICT_FILE),
        "city,district\nJoshimath,Chamoli\nAtlantis,Nowhere\n",
    )
    .unwrap();

    let platform = PlatformConfig {
        data_dir: Some(data.path().to_path_buf()),
        model_dir: data.path().join("no-models"),
        ..PlatformConfig::default()
    };
    let coordinator = ReliefCoordinator::from_platform_config(&platform).unwrap();

    assert_eq!(coordinator.reference().regions.len(), 2);
    assert_eq!(coordinator.resolve_location("joshimath").unwrap().name(), "Chamoli");
    assert_eq!(coordinator.resolve_location("Rishikesh").unwrap().name(), "Dehradun");
    assert!(coordinator.resolve_location("Haldwani").is_err());
    assert!(coordinator.resolve_location("Atlantis").is_err());

    let flood = coordinator.reference().categories.get("FLOOD").unwrap();
    assert_relative_eq!(flood.default_affected_area_percent, 20.0);
    assert_eq!(coordinator.status().disaster_types, vec!["flood".to_string()]);
}

#[test]
fn allocation_invariants_across_pools() {
    let coordinator = ReliefCoordinator::builtin();
    let incidents: Vec<Incident> = [
        ("Dehradun Flood", 50_000u64, "flood"),
        ("Chamoli Earthquake", 20_000, "earthquake"),
        ("Pithoragarh Landslide", 8_000, "landslide"),
    ]
    .iter()
    .map(|(name, people, kind)| {
        let needs = coordinator.estimate_resources(*people, kind, Some(7)).unwrap().tracked_needs();
        Incident::new(*name, *name, *people, needs)
    })
    .collect();

    let total_food: u64 = incidents.iter().map(|i| i.needs.food_packets).sum();
    for fraction in [0.0, 0.1, 0.5, 0.9, 1.0, 1.5] {
        let available = (total_food as f64 * fraction) as u64;
        let pool = ResourceNeeds::new(available, 100, 150);
        let report = coordinator.allocate(&pool, &incidents);

        for resource in TrackedResource::ALL {
            let granted: u64 = report.incidents.iter().map(|i| i.allocated(resource)).sum();
            assert!(granted <= pool.get(resource));
        }
        if available >= total_food {
            for inc in &report.incidents {
                let food = inc.allocation(TrackedResource::FoodPackets).unwrap();
                assert_eq!(food.allocated, food.requested);
            }
        }
    }

    let report = coordinator.allocate(&ResourceNeeds::new(0, 0, 0), &incidents);
    assert_eq!(report.incidents[0].name, "Dehradun Flood");
}

#[test]
fn model_dir_without_graph_disables_predictions() {
    let models = tempfile::tempdir().unwrap();
    let artifacts = model_artifacts();
    fs::write(
        models.path().join(ENCODERS_FILE),
        serde_json::to_string(artifacts.encoders()).unwrap(),
    )
    .unwrap();
    fs::write(
        models.path().join(SCALER_FILE),
        json!({"mean": vec![0.0; FEATURE_COUNT], "scale": vec![1.0; FEATURE_COUNT]}).to_string(),
    )
    .unwrap();

    let mut platform = PlatformConfig {
        model_dir: models.path().to_path_buf(),
        ..PlatformConfig::default()
    };
    let coordinator = ReliefCoordinator::from_platform_config(&platform).unwrap();
    assert!(!coordinator.has_model());
    let err = coordinator
        .predict_impact(&ImpactRequest::new("Dehradun", "flood", calm_weather()))
        .unwrap_err();
    assert!(matches!(err, ReliefError::ModelUnavailable(_)));

    platform.require_model = true;
    assert!(matches!(
        ReliefCoordinator::from_platform_config(&platform),
        Err(ReliefError::Inference(_))
    ));
}
