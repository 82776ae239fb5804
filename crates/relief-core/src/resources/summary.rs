//! Deployment summary for a resource estimate.

use serde::{Deserialize, Serialize};

use super::estimator::ResourceRequirement;
use crate::domain::{group_thousands, title_case_key, DeploymentStrategy, DisasterKind};

/// Duration guidance shown with every estimate
pub const ESTIMATED_DURATION: &str = "7-14 days based on disaster severity";

/// Deployment-level summary of an estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSummary {
    /// People covered
    pub affected_population: u64,
    /// Normalized disaster key
    pub disaster_type: String,
    /// Number of resource categories
    pub resource_categories: usize,
    /// One `"<Category>: <instruction>"` line per category
    pub priority_resources: Vec<String>,
    /// Ordering hint
    pub deployment_strategy: DeploymentStrategy,
    /// Strategy as text
    pub deployment_strategy_text: String,
    /// Expected response duration
    pub estimated_duration: String,
    /// Notes for coordinating agencies
    pub coordination_notes: Vec<String>,
}

/// Strategy for a disaster kind
pub fn deployment_strategy(kind: Option<DisasterKind>) -> DeploymentStrategy {
    match kind {
        Some(DisasterKind::Earthquake | DisasterKind::FlashFlood) => {
            DeploymentStrategy::MedicalAndRescueFirst
        }
        Some(DisasterKind::Flood | DisasterKind::Landslide) => {
            DeploymentStrategy::ShelterAndRescueFirst
        }
        _ => DeploymentStrategy::Simultaneous,
    }
}

impl ResourceSummary {
    pub(crate) fn new(
        affected_population: u64,
        disaster_type: &str,
        kind: Option<DisasterKind>,
        requirements: &[ResourceRequirement],
    ) -> Self {
        let strategy = deployment_strategy(kind);
        let priority_resources = requirements
            .iter()
            .map(|r| format!("{}: {}", r.category.title(), r.priority.instruction()))
            .collect();
        let coordination_notes = vec![
            format!("Coordinate with {} response agencies", title_case_key(disaster_type)),
            format!(
                "Establish command center for {} affected people",
                group_thousands(affected_population)
            ),
            "Set up communication network for all deployed teams".to_string(),
            "Monitor weather conditions for resource adjustments".to_string(),
            "Establish supply chain for continuous resource flow".to_string(),
        ];

        Self {
            affected_population,
            disaster_type: disaster_type.to_string(),
            resource_categories: requirements.len(),
            priority_resources,
            deployment_strategy: strategy,
            deployment_strategy_text: strategy.describe().to_string(),
            estimated_duration: ESTIMATED_DURATION.to_string(),
            coordination_notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::ResourceEstimator;

    #[test]
    fn test_strategy_by_kind() {
        assert_eq!(
            deployment_strategy(Some(DisasterKind::Earthquake)),
            DeploymentStrategy::MedicalAndRescueFirst
        );
        assert_eq!(
            deployment_strategy(Some(DisasterKind::FlashFlood)),
            DeploymentStrategy::MedicalAndRescueFirst
        );
        assert_eq!(
            deployment_strategy(Some(DisasterKind::Landslide)),
            DeploymentStrategy::ShelterAndRescueFirst
        );
        assert_eq!(deployment_strategy(Some(DisasterKind::Avalanche)), DeploymentStrategy::Simultaneous);
        assert_eq!(deployment_strategy(None), DeploymentStrategy::Simultaneous);
    }

    #[test]
    fn test_summary_text() {
        let estimate = ResourceEstimator::new().estimate(254_504, "flash_flood", 7).unwrap();
        let summary = &estimate.summary;
        assert_eq!(summary.resource_categories, 6);
        assert_eq!(summary.priority_resources[0], "Food: Deploy within 2-4 hours");
        assert_eq!(summary.priority_resources[1], "Medical: Immediate deployment required");
        assert_eq!(summary.priority_resources[5], "Logistics: Deploy within 6-8 hours");
        assert_eq!(summary.coordination_notes[0], "Coordinate with Flash Flood response agencies");
        assert_eq!(summary.coordination_notes[1], "Establish command center for 254,504 affected people");
        assert_eq!(summary.estimated_duration, ESTIMATED_DURATION);
    }
}
