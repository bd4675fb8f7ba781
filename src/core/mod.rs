//! Calculation engine.
//!
//! Every function here is pure and synchronous: inputs are validated values,
//! outputs are new values, and nothing performs I/O.

/// Lifecycle-stage routing and impact sums
pub mod aggregation;

/// Facility-to-product allocation by production volume
pub mod allocation;

/// PRN obligations, status and spend
pub mod epr;

/// Full product recalculation
pub mod lca;

/// Factor and snapshot collaborators
pub mod lookup;

/// Barrel aging and warehouse impacts
pub mod maturation;

/// Provenance-weighted data-quality score
pub mod quality;

/// Mass and volume normalization
pub mod units;
