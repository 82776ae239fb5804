//! Incidents competing for a shared relief pool.

use serde::{Deserialize, Serialize};

use super::population::Population;
use crate::ReliefError;

/// Disaster type as used for allocation priority.
///
/// Callers should pass this explicitly. Display-name inference is only a
/// fallback for incidents that arrive with a free-text label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncidentKind {
    /// Earthquake
    Earthquake,
    /// Fire
    Fire,
    /// Flood, including flash floods
    Flood,
    /// Landslide
    Landslide,
    /// Storm
    Storm,
}

impl IncidentKind {
    /// Label as shown in reports
    pub fn label(&self) -> &'static str {
        match self {
            IncidentKind::Earthquake => "Earthquake",
            IncidentKind::Fire => "Fire",
            IncidentKind::Flood => "Flood",
            IncidentKind::Landslide => "Landslide",
            IncidentKind::Storm => "Storm",
        }
    }
}

impl std::fmt::Display for IncidentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Resource types tracked by the allocator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedResource {
    /// Meal packets
    FoodPackets,
    /// Search and rescue teams
    RescueTeams,
    /// Medical staff
    MedicalStaff,
}

impl TrackedResource {
    /// All tracked resources in reporting order
    pub const ALL: [TrackedResource; 3] = [
        TrackedResource::FoodPackets,
        TrackedResource::RescueTeams,
        TrackedResource::MedicalStaff,
    ];

    /// Snake-case key
    pub fn key(&self) -> &'static str {
        match self {
            TrackedResource::FoodPackets => "food_packets",
            TrackedResource::RescueTeams => "rescue_teams",
            TrackedResource::MedicalStaff => "medical_staff",
        }
    }
}

impl std::fmt::Display for TrackedResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Quantities per tracked resource.
///
/// Used both for what an incident needs and for what the pool holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceNeeds {
    /// Meal packets
    pub food_packets: u64,
    /// Rescue teams
    pub rescue_teams: u64,
    /// Medical staff
    pub medical_staff: u64,
}

impl ResourceNeeds {
    /// Create a quantity set
    pub fn new(food_packets: u64, rescue_teams: u64, medical_staff: u64) -> Self {
        Self {
            food_packets,
            rescue_teams,
            medical_staff,
        }
    }

    /// Validate signed quantities from an external caller
    pub fn from_signed(prefix: &str, food_packets: i64, rescue_teams: i64, medical_staff: i64) -> Result<Self, ReliefError> {
        let check = |name: &str, value: i64| {
            u64::try_from(value).map_err(|_| {
                ReliefError::invalid_input(
                    format!("{prefix}.{name}"),
                    format!("must be non-negative, got {value}"),
                )
            })
        };
        Ok(Self {
            food_packets: check("food_packets", food_packets)?,
            rescue_teams: check("rescue_teams", rescue_teams)?,
            medical_staff: check("medical_staff", medical_staff)?,
        })
    }

    /// Quantity of one resource
    pub fn get(&self, resource: TrackedResource) -> u64 {
        match resource {
            TrackedResource::FoodPackets => self.food_packets,
            TrackedResource::RescueTeams => self.rescue_teams,
            TrackedResource::MedicalStaff => self.medical_staff,
        }
    }

    /// Set the quantity of one resource
    pub fn set(&mut self, resource: TrackedResource, value: u64) {
        match resource {
            TrackedResource::FoodPackets => self.food_packets = value,
            TrackedResource::RescueTeams => self.rescue_teams = value,
            TrackedResource::MedicalStaff => self.medical_staff = value,
        }
    }
}

/// Shared stock available for allocation
pub type AllocationPool = ResourceNeeds;

/// One disaster site requesting resources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    /// Display name, e.g. `"Dehradun Flash Flood"`
    pub name: String,
    /// Place name
    pub location: String,
    /// People affected
    pub affected_population: Population,
    /// Explicit disaster type, if the caller knows it
    #[serde(default)]
    pub kind: Option<IncidentKind>,
    /// Free-text disaster label used for inference when `kind` is absent
    #[serde(default)]
    pub disaster_label: Option<String>,
    /// Requested quantities
    pub needs: ResourceNeeds,
}

impl Incident {
    /// Create an incident whose type is inferred from its name
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        affected_population: impl Into<Population>,
        needs: ResourceNeeds,
    ) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            affected_population: affected_population.into(),
            kind: None,
            disaster_label: None,
            needs,
        }
    }

    /// Set the explicit disaster type
    pub fn with_kind(mut self, kind: IncidentKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set a free-text disaster label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.disaster_label = Some(label.into());
        self
    }

    /// Text used when inferring the disaster type: the label if any, else the name
    pub fn inference_text(&self) -> &str {
        self.disaster_label.as_deref().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_get_set() {
        let mut needs = ResourceNeeds::new(100, 5, 20);
        assert_eq!(needs.get(TrackedResource::RescueTeams), 5);
        needs.set(TrackedResource::RescueTeams, 7);
        assert_eq!(needs.rescue_teams, 7);
    }

    #[test]
    fn test_needs_reject_negative() {
        let err = ResourceNeeds::from_signed("pool", 10, -1, 0).unwrap_err();
        match err {
            ReliefError::InvalidInput { field, .. } => assert_eq!(field, "pool.rescue_teams"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_inference_text() {
        let incident = Incident::new("Haridwar Flood", "Haridwar", 10_000u64, ResourceNeeds::default());
        assert_eq!(incident.inference_text(), "Haridwar Flood");
        let labelled = incident.with_label("Earthquake");
        assert_eq!(labelled.inference_text(), "Earthquake");
    }

    #[test]
    fn test_deserialize_without_kind() {
        let json = r#"{
            "name": "Chamoli Landslide",
            "location": "Chamoli",
            "affected_population": 5000,
            "needs": {"food_packets": 100, "rescue_teams": 4, "medical_staff": 10}
        }"#;
        let incident: Incident = serde_json::from_str(json).unwrap();
        assert!(incident.kind.is_none());
        assert_eq!(incident.affected_population.get(), 5000);
    }
}
