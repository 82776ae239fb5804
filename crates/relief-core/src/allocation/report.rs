//! Allocation results, wastage and efficiency reporting.

use serde::{Deserialize, Serialize};

use super::priority::{IncidentPriority, KindSource};
use crate::domain::{IncidentKind, TrackedResource};

/// Whether a request was met in full
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllocationStatus {
    /// Everything requested was allocated
    FullyAllocated,
    /// Less than requested was allocated
    PartiallyAllocated,
}

impl std::fmt::Display for AllocationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            AllocationStatus::FullyAllocated => "FULLY_ALLOCATED",
            AllocationStatus::PartiallyAllocated => "PARTIALLY_ALLOCATED",
        })
    }
}

/// `allocated / requested × 100`; a zero request counts as fully covered
pub fn coverage_percent(allocated: u64, requested: u64) -> f64 {
    if requested == 0 {
        100.0
    } else {
        allocated as f64 / requested as f64 * 100.0
    }
}

/// One incident's share of one resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceAllocation {
    /// Resource
    pub resource: TrackedResource,
    /// Quantity requested
    pub requested: u64,
    /// Quantity granted, never above `requested`
    pub allocated: u64,
    /// `allocated / requested × 100`
    pub coverage_percent: f64,
    /// Fully or partially allocated
    pub status: AllocationStatus,
}

impl ResourceAllocation {
    pub(crate) fn new(resource: TrackedResource, requested: u64, allocated: u64) -> Self {
        let status = if allocated >= requested {
            AllocationStatus::FullyAllocated
        } else {
            AllocationStatus::PartiallyAllocated
        };
        Self {
            resource,
            requested,
            allocated,
            coverage_percent: coverage_percent(allocated, requested),
            status,
        }
    }
}

/// Everything allocated to one incident
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentAllocation {
    /// Incident name
    pub name: String,
    /// Incident location
    pub location: String,
    /// People affected
    pub affected_population: u64,
    /// Priority score
    pub priority_score: u64,
    /// Disaster type used for the score
    pub disaster_type: IncidentKind,
    /// Explicit, inferred or fallback
    pub disaster_type_source: KindSource,
    /// Extra share granted for priority under shortage (percent, 0 without shortage)
    pub priority_bonus_percent: f64,
    /// Per-resource allocations in [`TrackedResource::ALL`] order
    pub allocations: Vec<ResourceAllocation>,
    /// Fully allocated only if every resource is
    pub status: AllocationStatus,
}

impl IncidentAllocation {
    pub(crate) fn new(
        name: String,
        location: String,
        affected_population: u64,
        priority: IncidentPriority,
        priority_bonus_percent: f64,
        allocations: Vec<ResourceAllocation>,
    ) -> Self {
        let status = if allocations
            .iter()
            .all(|a| a.status == AllocationStatus::FullyAllocated)
        {
            AllocationStatus::FullyAllocated
        } else {
            AllocationStatus::PartiallyAllocated
        };
        Self {
            name,
            location,
            affected_population,
            priority_score: priority.score,
            disaster_type: priority.kind,
            disaster_type_source: priority.source,
            priority_bonus_percent,
            allocations,
            status,
        }
    }

    /// Allocation for one resource
    pub fn allocation(&self, resource: TrackedResource) -> Option<&ResourceAllocation> {
        self.allocations.iter().find(|a| a.resource == resource)
    }

    /// Allocated quantity of one resource
    pub fn allocated(&self, resource: TrackedResource) -> u64 {
        self.allocation(resource).map_or(0, |a| a.allocated)
    }
}

/// Pool usage for one resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceUsage {
    /// Resource
    pub resource: TrackedResource,
    /// Pool quantity
    pub available: u64,
    /// Sum of requests
    pub requested: u64,
    /// Sum of allocations
    pub allocated: u64,
    /// `available - allocated`
    pub remaining: u64,
    /// Whether requests exceeded the pool
    pub shortage: bool,
    /// `allocated / available × 100`, 0 when nothing is available
    pub efficiency_percent: f64,
}

impl ResourceUsage {
    pub(crate) fn new(resource: TrackedResource, available: u64, requested: u64, allocated: u64) -> Self {
        let efficiency_percent = if available == 0 {
            0.0
        } else {
            allocated as f64 / available as f64 * 100.0
        };
        Self {
            resource,
            available,
            requested,
            allocated,
            remaining: available.saturating_sub(allocated),
            shortage: requested > available,
            efficiency_percent,
        }
    }
}

/// Result of one allocation batch
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AllocationReport {
    /// Incidents in descending priority order
    pub incidents: Vec<IncidentAllocation>,
    /// Wastage analysis per resource
    pub resources: Vec<ResourceUsage>,
}

impl AllocationReport {
    /// Whether any resource ran short
    pub fn has_shortage(&self) -> bool {
        self.resources.iter().any(|r| r.shortage)
    }

    /// Report for a named incident
    pub fn incident(&self, name: &str) -> Option<&IncidentAllocation> {
        self.incidents.iter().find(|i| i.name == name)
    }

    /// Usage for one resource
    pub fn usage(&self, resource: TrackedResource) -> Option<&ResourceUsage> {
        self.resources.iter().find(|r| r.resource == resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_coverage() {
        assert_relative_eq!(coverage_percent(0, 0), 100.0);
        assert_relative_eq!(coverage_percent(76, 100), 76.0);
        assert_relative_eq!(coverage_percent(5, 5), 100.0);
    }

    #[test]
    fn test_usage_efficiency() {
        let usage = ResourceUsage::new(TrackedResource::FoodPackets, 150, 200, 149);
        assert!(usage.shortage);
        assert_eq!(usage.remaining, 1);
        assert_relative_eq!(usage.efficiency_percent, 149.0 / 150.0 * 100.0);

        let empty = ResourceUsage::new(TrackedResource::RescueTeams, 0, 0, 0);
        assert!(!empty.shortage);
        assert_relative_eq!(empty.efficiency_percent, 0.0);
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&AllocationStatus::PartiallyAllocated).unwrap();
        assert_eq!(json, "\"PARTIALLY_ALLOCATED\"");
    }
}
