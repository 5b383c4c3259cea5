//! # MRP Core
//!
//! 核心資料模型與類型定義：物料主檔、計劃時段、BOM 圖、MRP 記錄

pub mod bom;
pub mod config;
pub mod horizon;
pub mod part;
pub mod plan;
pub mod record;

// Re-export 主要類型
pub use bom::{BomEdge, BomGraph};
pub use config::PlanningConfig;
pub use horizon::{BucketingStrategy, Period, PlanningHorizon};
pub use part::{Part, PartCatalog, ProcurementType};
pub use plan::{PeggingRecord, PlannedOrder, PlannedOrderType};
pub use record::{MrpRecord, SeedRecord};

/// 物料ID
pub type PartId = u32;

/// 時段ID（0 為期初基準時段）
pub type PeriodId = u32;

/// 數量（整數單位）
pub type Quantity = i64;

/// MRP 錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum MrpError {
    #[error("BOM 引用了不存在的物料: 父件 {parent_id} → 子件 {component_id}")]
    InvalidBomReference {
        parent_id: PartId,
        component_id: PartId,
    },

    #[error("BOM 層級不符合拓撲順序（可能有循環）: 父件 {parent_id} (層級 {parent_level}) → 子件 {component_id} (層級 {component_level})")]
    CyclicBom {
        parent_id: PartId,
        component_id: PartId,
        parent_level: u32,
        component_level: u32,
    },

    #[error("物料 {part_id} 的批量無效: {lot_size}")]
    InvalidLotSize { part_id: PartId, lot_size: Quantity },

    #[error("收斂失敗：已執行 {passes} 次計算仍有 {remaining_levels} 個層級未處理")]
    NonConvergence {
        passes: usize,
        remaining_levels: usize,
    },

    #[error("找不到時段資料: 物料 {part_id}, 時段 {period_id}")]
    MissingPeriodData { part_id: PartId, period_id: PeriodId },

    #[error("找不到物料: {0}")]
    UnknownPart(PartId),

    #[error("物料ID重複: {0}")]
    DuplicatePart(PartId),

    #[error("BOM 關係重複: {parent_id} → {component_id}")]
    DuplicateBomEdge {
        parent_id: PartId,
        component_id: PartId,
    },

    #[error("BOM 用量無效: {parent_id} → {component_id}, 用量 {multiplier}")]
    InvalidMultiplier {
        parent_id: PartId,
        component_id: PartId,
        multiplier: Quantity,
    },

    #[error("物料 {part_id} 的 {field} 不可為負數: {value}")]
    NegativeQuantity {
        part_id: PartId,
        field: &'static str,
        value: Quantity,
    },

    #[error("種子記錄重複: 物料 {part_id}, 時段 {period_id}")]
    DuplicateSeed { part_id: PartId, period_id: PeriodId },

    #[error("數量溢位: 物料 {part_id}, 時段 {period_id}")]
    QuantityOverflow { part_id: PartId, period_id: PeriodId },

    #[error("無效的計劃時段: {0}")]
    InvalidHorizon(String),

    #[error("JSON 處理錯誤: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MrpError>;
