//! Domain module containing reference data, value objects and request entities.
//!
//! - **Reference data**: Immutable tables loaded once (regions, aliases, disaster categories)
//! - **Value objects**: Weather observations, resource amounts, populations
//! - **Request entities**: Incidents and allocation pools supplied per call

pub mod disaster;
pub mod incident;
pub mod population;
pub mod reference;
pub mod region;
pub mod resource;
pub mod weather;

pub use disaster::*;
pub use incident::*;
pub use population::*;
pub use reference::*;
pub use region::*;
pub use resource::*;
pub use weather::*;
