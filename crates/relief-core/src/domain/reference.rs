//! Reference tables loaded once at startup.
//!
//! Two sources are supported: the built-in Uttarakhand tables, and a data
//! directory of CSV files that replaces them. An optional city-to-district
//! CSV is merged over whichever alias set is active.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::disaster::{CategoryTable, DisasterCategory};
use super::region::RegionTable;
use crate::ReliefError;

/// District population table file name
pub const DISTRICT_POPULATION_FILE: &str = "district_population.csv";
/// Disaster category table file name
pub const IMPACT_FACTORS_FILE: &str = "disaster_impact_factors.csv";
/// Optional alias table file name
pub const CITY_TO_DISTRICT_FILE: &str = "city_to_district.csv";

const BUILTIN_DISTRICTS: &[(&str, u64)] = &[
    ("Dehradun", 1_696_694),
    ("Haridwar", 1_890_427),
    ("Nainital", 954_605),
    ("Almora", 621_927),
    ("Pithoragarh", 483_439),
    ("Chamoli", 391_605),
    ("Rudraprayag", 242_285),
    ("Tehri Garhwal", 618_931),
    ("Uttarkashi", 330_086),
    ("Bageshwar", 259_898),
    ("Champawat", 259_315),
    ("Udham Singh Nagar", 1_648_908),
    ("Pauri Garhwal", 687_271),
];

const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("Haldwani", "Nainital"),
    ("Nanital", "Nainital"),
    ("Rishikesh", "Dehradun"),
    ("Mussoorie", "Dehradun"),
];

// (key, default affected %, altitude zone, zone type, description)
const BUILTIN_CATEGORIES: &[(&str, f64, &str, &str, &str)] = &[
    (
        "flash_flood",
        15.0,
        "Mid Altitude",
        "Valley",
        "Sudden flooding of narrow river valleys after intense rainfall",
    ),
    (
        "flood",
        20.0,
        "Low Altitude",
        "Plains",
        "Riverine flooding of low-lying plains and settlements",
    ),
    (
        "landslide",
        5.0,
        "Mid Altitude",
        "Hilly",
        "Slope failure affecting hill roads and villages",
    ),
    (
        "earthquake",
        25.0,
        "High Altitude",
        "Seismic",
        "Ground shaking across high seismic-risk districts",
    ),
    (
        "cloudburst",
        10.0,
        "High Altitude",
        "Hilly",
        "Extreme localized rainfall over a small catchment",
    ),
    (
        "avalanche",
        3.0,
        "Very High Altitude",
        "Alpine",
        "Snow avalanche in glaciated high-altitude terrain",
    ),
];

#[derive(Debug, Deserialize)]
struct DistrictRow {
    district: String,
    population: i64,
}

#[derive(Debug, Deserialize)]
struct ImpactFactorRow {
    disaster_type: String,
    default_affected_area: f64,
    altitude_zone: String,
    zone_type: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CityRow {
    city: String,
    district: String,
}

/// Immutable region, alias and disaster category tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceData {
    /// Regions and aliases
    pub regions: RegionTable,
    /// Disaster categories
    pub categories: CategoryTable,
}

impl ReferenceData {
    /// Built-in Uttarakhand tables
    pub fn builtin() -> Self {
        let mut regions = RegionTable::new();
        for (name, population) in BUILTIN_DISTRICTS {
            regions.insert_region(*name, *population);
        }
        for (alias, district) in BUILTIN_ALIASES {
            // Built-in aliases only point at built-in districts.
            if let Err(e) = regions.insert_alias(*alias, *district) {
                warn!(error = %e, "Skipping built-in alias");
            }
        }

        let mut categories = CategoryTable::new();
        for (key, percent, altitude, zone, description) in BUILTIN_CATEGORIES {
            categories.insert(DisasterCategory {
                key: (*key).to_string(),
                default_affected_area_percent: *percent,
                altitude_zone: (*altitude).to_string(),
                zone_type: (*zone).to_string(),
                description: (*description).to_string(),
            });
        }

        Self { regions, categories }
    }

    /// Load tables from a data directory.
    ///
    /// `district_population.csv` and `disaster_impact_factors.csv` are required.
    /// `city_to_district.csv` is optional; built-in aliases for districts that
    /// exist in the loaded table are kept underneath it.
    #[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, ReliefError> {
        let dir = dir.as_ref();
        let mut regions = load_districts(&dir.join(DISTRICT_POPULATION_FILE))?;
        for (alias, district) in BUILTIN_ALIASES {
            if regions.get(district).is_some() {
                regions.insert_alias(*alias, *district)?;
            }
        }
        let categories = load_categories(&dir.join(IMPACT_FACTORS_FILE))?;

        let mut data = Self { regions, categories };
        let alias_path = dir.join(CITY_TO_DISTRICT_FILE);
        if alias_path.exists() {
            data.merge_alias_file(&alias_path);
        }

        info!(
            regions = data.regions.len(),
            aliases = data.regions.aliases().len(),
            categories = data.categories.len(),
            "Reference data loaded"
        );
        Ok(data)
    }

    /// Merge an optional city-to-district CSV over the current aliases.
    ///
    /// Returns the number of aliases merged. A malformed file is logged and
    /// ignored as a whole; rows pointing at unknown districts are skipped.
    pub fn merge_alias_file(&mut self, path: impl AsRef<Path>) -> usize {
        let path = path.as_ref();
        let rows: Vec<CityRow> = match read_rows(path) {
            Ok(rows) => rows,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "City map load failed, using existing aliases");
                return 0;
            }
        };

        let mut merged = 0;
        for row in rows {
            let city = row.city.trim();
            let district = row.district.trim();
            if city.is_empty() || district.is_empty() {
                continue;
            }
            match self.regions.insert_alias(city, district) {
                Ok(()) => merged += 1,
                Err(e) => warn!(error = %e, "Rejected alias"),
            }
        }
        info!(path = %path.display(), merged, "City map merged");
        merged
    }
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self::builtin()
    }
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ReliefError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| ReliefError::ReferenceData(format!("{}: {e}", path.display())))?;
    reader
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(|e| ReliefError::ReferenceData(format!("{}: {e}", path.display())))
}

fn load_districts(path: &Path) -> Result<RegionTable, ReliefError> {
    let rows: Vec<DistrictRow> = read_rows(path)?;
    let mut table = RegionTable::new();
    for row in rows {
        let name = row.district.trim();
        if name.is_empty() {
            return Err(ReliefError::ReferenceData(format!(
                "{}: empty district name",
                path.display()
            )));
        }
        let population = u64::try_from(row.population).map_err(|_| {
            ReliefError::ReferenceData(format!(
                "{}: negative population {} for {name}",
                path.display(),
                row.population
            ))
        })?;
        table.insert_region(name, population);
    }
    if table.is_empty() {
        return Err(ReliefError::ReferenceData(format!("{}: no districts", path.display())));
    }
    Ok(table)
}

fn load_categories(path: &Path) -> Result<CategoryTable, ReliefError> {
    let rows: Vec<ImpactFactorRow> = read_rows(path)?;
    let mut table = CategoryTable::new();
    for row in rows {
        // Stored as a fraction of the population.
        if !(0.0..=1.0).contains(&row.default_affected_area) {
            return Err(ReliefError::ReferenceData(format!(
                "{}: default_affected_area for {} must be a fraction in [0, 1], got {}",
                path.display(),
                row.disaster_type,
                row.default_affected_area
            )));
        }
        table.insert(DisasterCategory {
            key: row.disaster_type,
            default_affected_area_percent: row.default_affected_area * 100.0,
            altitude_zone: row.altitude_zone,
            zone_type: row.zone_type,
            description: row.description.unwrap_or_default(),
        });
    }
    if table.is_empty() {
        return Err(ReliefError::ReferenceData(format!("{}: no disaster types", path.display())));
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::fs;

    fn write_required(dir: &Path) {
        fs::write(
            dir.join(DISTRICT_POPULATION_FILE),
            "district,population\nDehradun,1696694\nNainital,954605\n",
        )
        .unwrap();
        fs::write(
            dir.join(IMPACT_FACTORS_FILE),
            "disaster_type,default_affected_area,altitude_zone,zone_type,description\n\
             Flood,0.2,Low Altitude,Plains,River flood\n\
             flash_flood,0.15,Mid Altitude,Valley,\n",
        )
        .unwrap();
    }

    #[test]
    fn test_builtin_tables() {
        let data = ReferenceData::builtin();
        assert_eq!(data.regions.len(), 13);
        assert_eq!(data.regions.get("Dehradun").unwrap().population(), 1_696_694);
        assert_eq!(data.regions.aliases().len(), 4);
        assert_eq!(data.categories.len(), 6);
        assert_relative_eq!(
            data.categories.get("flash_flood").unwrap().default_affected_area_percent,
            15.0
        );
    }

    #[test]
    fn test_from_dir_converts_fraction_to_percent() {
        let tmp = tempfile::tempdir().unwrap();
        write_required(tmp.path());

        let data = ReferenceData::from_dir(tmp.path()).unwrap();
        assert_eq!(data.regions.len(), 2);
        assert_relative_eq!(data.categories.get("flood").unwrap().default_affected_area_percent, 20.0);
        // Built-in aliases survive for districts that are present.
        assert_eq!(data.regions.aliases().len(), 4);
    }

    #[test]
    fn test_missing_required_file_fails() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(DISTRICT_POPULATION_FILE), "district,population\nDehradun,1\n").unwrap();
        assert!(matches!(
            ReferenceData::from_dir(tmp.path()),
            Err(ReliefError::ReferenceData(_))
        ));
    }

    #[test]
    fn test_negative_population_fails() {
        let tmp = tempfile::tempdir().unwrap();
        write_required(tmp.path());
        fs::write(tmp.path().join(DISTRICT_POPULATION_FILE), "district,population\nDehradun,-5\n").unwrap();
        assert!(ReferenceData::from_dir(tmp.path()).is_err());
    }

    #[test]
    fn test_city_map_merged_and_unknown_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        write_required(tmp.path());
        fs::write(
            tmp.path().join(CITY_TO_DISTRICT_FILE),
            "city,district\nRamnagar,Nainital\nAtlantis,Nowhere\nRishikesh,Nainital\n",
        )
        .unwrap();

        let data = ReferenceData::from_dir(tmp.path()).unwrap();
        let aliases = data.regions.aliases();
        assert!(aliases.iter().any(|a| a.name == "Ramnagar" && a.region == "Nainital"));
        assert!(!aliases.iter().any(|a| a.name == "Atlantis"));
        let rishikesh = aliases.iter().find(|a| a.name == "Rishikesh").unwrap();
        assert_eq!(rishikesh.region, "Nainital");
    }

    #[test]
    fn test_malformed_city_map_is_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("cities.csv");
        fs::write(&path, "town;region\nfoo;bar\n").unwrap();

        let mut data = ReferenceData::builtin();
        assert_eq!(data.merge_alias_file(&path), 0);
        assert_eq!(data.regions.aliases().len(), 4);
    }
}
