//! Disaster categories and the fixed set of disaster kinds the resource tables know about.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::incident::IncidentKind;

/// Disaster kinds with dedicated resource multipliers and deployment plans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisasterKind {
    /// Sudden flood following intense rainfall
    FlashFlood,
    /// Riverine flood
    Flood,
    /// Landslide or mudslide
    Landslide,
    /// Earthquake
    Earthquake,
    /// Extreme short-duration rainfall over a small area
    Cloudburst,
    /// Snow avalanche
    Avalanche,
}

impl DisasterKind {
    /// All kinds, in table order
    pub const ALL: [DisasterKind; 6] = [
        DisasterKind::FlashFlood,
        DisasterKind::Flood,
        DisasterKind::Landslide,
        DisasterKind::Earthquake,
        DisasterKind::Cloudburst,
        DisasterKind::Avalanche,
    ];

    /// Lower-case key used in requests and reference files
    pub fn key(&self) -> &'static str {
        match self {
            DisasterKind::FlashFlood => "flash_flood",
            DisasterKind::Flood => "flood",
            DisasterKind::Landslide => "landslide",
            DisasterKind::Earthquake => "earthquake",
            DisasterKind::Cloudburst => "cloudburst",
            DisasterKind::Avalanche => "avalanche",
        }
    }

    /// Name the population model was trained with
    pub fn display_name(&self) -> &'static str {
        match self {
            DisasterKind::FlashFlood => "Flash Flood",
            DisasterKind::Flood => "Flood",
            DisasterKind::Landslide => "Landslide",
            DisasterKind::Earthquake => "Earthquake",
            DisasterKind::Cloudburst => "Cloudburst",
            DisasterKind::Avalanche => "Avalanche",
        }
    }

    /// Allocation priority type for this kind, where one exists
    pub fn incident_kind(&self) -> Option<IncidentKind> {
        match self {
            DisasterKind::FlashFlood | DisasterKind::Flood => Some(IncidentKind::Flood),
            DisasterKind::Landslide => Some(IncidentKind::Landslide),
            DisasterKind::Earthquake => Some(IncidentKind::Earthquake),
            DisasterKind::Cloudburst | DisasterKind::Avalanche => None,
        }
    }

    /// Parse a request key (case-insensitive, surrounding whitespace ignored)
    pub fn parse(key: &str) -> Option<Self> {
        let key = normalize_category_key(key);
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

impl std::fmt::Display for DisasterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Canonical form of a category key: trimmed and lower-cased
pub fn normalize_category_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Title-case a category key for display (`"flash_flood"` -> `"Flash Flood"`)
pub fn title_case_key(key: &str) -> String {
    key.split(|c: char| c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Reference metadata for one disaster category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisasterCategory {
    /// Normalized key (`flash_flood`)
    pub key: String,
    /// Share of the region's population typically inside the footprint (0-100)
    pub default_affected_area_percent: f64,
    /// Altitude band the category was observed in
    pub altitude_zone: String,
    /// Terrain classification
    pub zone_type: String,
    /// Human-readable description
    pub description: String,
}

impl DisasterCategory {
    /// The fixed-table kind for this category, if it is one of the known six
    pub fn kind(&self) -> Option<DisasterKind> {
        DisasterKind::parse(&self.key)
    }

    /// Name used when encoding this category for the population model
    pub fn model_label(&self) -> String {
        match self.kind() {
            Some(kind) => kind.display_name().to_string(),
            None => title_case_key(&self.key),
        }
    }
}

/// Disaster categories keyed by normalized key
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryTable {
    categories: BTreeMap<String, DisasterCategory>,
}

impl CategoryTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a category; the key is normalized first
    pub fn insert(&mut self, mut category: DisasterCategory) {
        category.key = normalize_category_key(&category.key);
        self.categories.insert(category.key.clone(), category);
    }

    /// Case-insensitive lookup
    pub fn get(&self, key: &str) -> Option<&DisasterCategory> {
        self.categories.get(&normalize_category_key(key))
    }

    /// Iterate categories in key order
    pub fn iter(&self) -> impl Iterator<Item = &DisasterCategory> {
        self.categories.values()
    }

    /// Number of categories
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse() {
        assert_eq!(DisasterKind::parse("flash_flood"), Some(DisasterKind::FlashFlood));
        assert_eq!(DisasterKind::parse("  Earthquake "), Some(DisasterKind::Earthquake));
        assert_eq!(DisasterKind::parse("tsunami"), None);
    }

    #[test]
    fn test_incident_kind_mapping() {
        assert_eq!(DisasterKind::FlashFlood.incident_kind(), Some(IncidentKind::Flood));
        assert_eq!(DisasterKind::Earthquake.incident_kind(), Some(IncidentKind::Earthquake));
        assert_eq!(DisasterKind::Avalanche.incident_kind(), None);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case_key("flash_flood"), "Flash Flood");
        assert_eq!(title_case_key("forest fire"), "Forest Fire");
        assert_eq!(title_case_key("HEATWAVE"), "Heatwave");
    }

    #[test]
    fn test_model_label_falls_back_to_title_case() {
        let category = DisasterCategory {
            key: "glacial_outburst".into(),
            default_affected_area_percent: 4.0,
            altitude_zone: "High".into(),
            zone_type: "Alpine".into(),
            description: String::new(),
        };
        assert_eq!(category.model_label(), "Glacial Outburst");
        assert!(category.kind().is_none());
    }

    #[test]
    fn test_table_lookup_is_case_insensitive() {
        let mut table = CategoryTable::new();
        table.insert(DisasterCategory {
            key: "Flood".into(),
            default_affected_area_percent: 20.0,
            altitude_zone: "Low".into(),
            zone_type: "Riverine".into(),
            description: "River flood".into(),
        });
        assert!(table.get("FLOOD").is_some());
        assert_eq!(table.get("flood").unwrap().key, "flood");
    }
}
