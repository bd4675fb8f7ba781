//! Model module - Value types exchanged with the surrounding application.
//! Every type derives `Serialize`/`Deserialize` so callers can pass them as JSON or TOML.

pub mod facility;
pub mod lca;
pub mod material;
pub mod maturation;
pub mod prn;

pub use facility::{AllocationRequest, AllocationResult, FacilityEmissionsSnapshot};
pub use lca::{LcaResult, LifecycleStage, StageBreakdown};
pub use material::{
    ImpactFactors, ImpactTotals, MATURATION_MARKER, Material, MaterialCategory, MaterialMetadata,
    PER_BOTTLE_UNIT, PackagingCategory, ProvenanceTier, Quantity,
};
pub use maturation::{BarrelCondition, BarrelSpec, ClimateZone, EnergySource, MaturationProfile};
pub use prn::{PrnObligation, PrnStatus, PrnTarget};
