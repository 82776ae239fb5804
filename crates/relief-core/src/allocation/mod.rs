//! Scarce-resource allocation across concurrent incidents.

pub mod allocator;
pub mod priority;
pub mod report;

pub use allocator::{ResourceAllocator, PRIORITY_BONUS};
pub use priority::{
    IncidentPriority, KindSource, PriorityCalculator, FALLBACK_KIND, FALLBACK_WEIGHT,
    PRIORITY_WEIGHTS,
};
pub use report::{
    coverage_percent, AllocationReport, AllocationStatus, IncidentAllocation, ResourceAllocation,
    ResourceUsage,
};
