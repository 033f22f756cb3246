/// Residential cost allocation model.
pub mod allocation;
pub mod impact;
/// Economic constant tables.
pub mod params;
pub mod revenue;
pub mod summary;
/// Scenario trajectory generator.
pub mod trajectory;
pub mod types;

pub use allocation::{AllocationResult, allocate};
pub use impact::{ImpactResult, net_impact};
pub use params::ModelParams;
pub use revenue::{RevenueOffset, revenue_offset};
pub use summary::SummaryStats;
pub use trajectory::{ProjectionEngine, Trajectory, TrajectorySet};
pub use types::{DataCenterProfile, LoadOperation, MarketStructure, Scenario, UtilityProfile};
