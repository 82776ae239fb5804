//! Standards-based resource requirement estimation.

pub mod estimator;
pub mod standards;
pub mod summary;

pub use estimator::{ResourceEstimate, ResourceEstimator, ResourceRequirement};
pub use standards::{base_amount, multiplier};
pub use summary::{deployment_strategy, ResourceSummary, ESTIMATED_DURATION};
