//! # MRP
//!
//! 物料需求計劃（MRP）引擎：依 BOM 層級逐層計算淨需求、批量、
//! 提前期偏移，並把計劃下達展開為子件毛需求。
//!
//! ```
//! use mrp::{BomEdge, BomGraph, MrpCalculator, Part, PartCatalog, PlanningHorizon, SeedRecord};
//!
//! let catalog = PartCatalog::from_parts(vec![
//!     Part::new(1, "成品", 1, 10),
//!     Part::new(2, "零件", 1, 25),
//! ])?;
//! let bom = BomGraph::from_edges(vec![BomEdge::new(1, 2, 2, 1)])?;
//! let calculator = MrpCalculator::new(catalog, bom, PlanningHorizon::new(3));
//!
//! let plan = calculator.calculate(&[SeedRecord::demand(1, 3, 15)])?;
//! assert_eq!(plan.record(1, 3)?.planned_order_receipt, 20);
//! assert_eq!(plan.record(2, 2)?.gross_requirement, 40);
//! # Ok::<(), mrp::MrpError>(())
//! ```

pub mod logging;

// Re-export 主要類型
pub use mrp_cache::{DirtyTracker, IncrementalCalculator};
pub use mrp_calc::{
    ExplosionPropagator, Ledger, MrpCalculator, MrpPlan, MrpWarning, NettingCalculator,
    PeggingCalculator, PeggingType, PlanState, WarningKind, WarningSeverity,
};
pub use mrp_core::{
    BomEdge, BomGraph, BucketingStrategy, MrpError, MrpRecord, Part, PartCatalog, PartId,
    PeggingRecord, Period, PeriodId, PlannedOrder, PlannedOrderType, PlanningConfig,
    PlanningHorizon, ProcurementType, Quantity, Result, SeedRecord,
};
