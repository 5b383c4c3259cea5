//! # MRP Calculation Engine
//!
//! 核心 MRP 計算引擎：淨需求、批量、提前期偏移、BOM 展開與逐層計算

pub mod calculator;
pub mod explosion;
pub mod lead_time;
pub mod ledger;
pub mod lot_sizing;
pub mod netting;
pub mod pegging;
pub mod state;
pub mod validation;

// Re-export 主要類型
pub use calculator::MrpCalculator;
pub use explosion::ExplosionPropagator;
pub use ledger::Ledger;
pub use netting::{NettingCalculator, NettingOutcome};
pub use pegging::{PeggingCalculator, PeggingType};
pub use state::PlanState;

use mrp_core::{MrpRecord, PartId, PeggingRecord, PeriodId, PlannedOrder, Quantity};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// MRP 計算結果
#[derive(Debug, Clone, Serialize)]
pub struct MrpPlan {
    /// 計算批次ID
    pub run_id: uuid::Uuid,

    /// 完整的 MRP 帳冊
    pub ledger: Ledger,

    /// 計劃訂單
    pub planned_orders: Vec<PlannedOrder>,

    /// 需求追溯（子件 → 各父件的貢獻）
    pub pegging: BTreeMap<PartId, Vec<PeggingRecord>>,

    /// 警告信息
    pub warnings: Vec<MrpWarning>,

    /// 實際執行的計算次數
    pub passes: usize,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}

impl MrpPlan {
    /// 依物料ID、時段ID排序的所有記錄
    pub fn rows(&self) -> impl Iterator<Item = &MrpRecord> {
        self.ledger.rows()
    }

    /// 單一物料的所有時段記錄
    pub fn records_for(&self, part_id: PartId) -> mrp_core::Result<&[MrpRecord]> {
        self.ledger.part_rows(part_id)
    }

    /// 單筆記錄
    pub fn record(&self, part_id: PartId, period_id: PeriodId) -> mrp_core::Result<&MrpRecord> {
        self.ledger.record(part_id, period_id)
    }

    /// 某物料的需求追溯
    pub fn pegging_for(&self, part_id: PartId) -> &[PeggingRecord] {
        self.pegging.get(&part_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 某物料的毛需求依父件彙總
    pub fn pegging_by_parent(&self, part_id: PartId) -> BTreeMap<PartId, Quantity> {
        PeggingCalculator::by_parent(self.pegging_for(part_id))
    }

    /// 某物料的需求來源（直接父件或最終產品）
    pub fn demand_sources(&self, part_id: PartId, pegging_type: PeggingType) -> BTreeSet<PartId> {
        PeggingCalculator::sources(part_id, &self.pegging, pegging_type)
    }

    /// 某物料的計劃訂單
    pub fn orders_for(&self, part_id: PartId) -> impl Iterator<Item = &PlannedOrder> {
        self.planned_orders
            .iter()
            .filter(move |order| order.part_id == part_id)
    }

    /// 是否有指定嚴重度的警告
    pub fn has_warnings(&self, severity: WarningSeverity) -> bool {
        self.warnings.iter().any(|w| w.severity == severity)
    }

    /// 輸出為 JSON
    pub fn to_json(&self) -> mrp_core::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// MRP 警告
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MrpWarning {
    pub part_id: PartId,
    pub period_id: Option<PeriodId>,
    pub kind: WarningKind,
    pub message: String,
    pub severity: WarningSeverity,
}

impl MrpWarning {
    pub fn new(
        part_id: PartId,
        period_id: Option<PeriodId>,
        kind: WarningKind,
        message: String,
        severity: WarningSeverity,
    ) -> Self {
        Self {
            part_id,
            period_id,
            kind,
            message,
            severity,
        }
    }

    pub fn info(part_id: PartId, period_id: Option<PeriodId>, kind: WarningKind, message: String) -> Self {
        Self::new(part_id, period_id, kind, message, WarningSeverity::Info)
    }

    pub fn warning(part_id: PartId, period_id: Option<PeriodId>, kind: WarningKind, message: String) -> Self {
        Self::new(part_id, period_id, kind, message, WarningSeverity::Warning)
    }
}

/// 警告類別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WarningKind {
    /// 計劃訂單應在計劃時界之前下達
    PastDueRelease,
    /// 基準時段的需求或收貨不參與計算
    BaselineActivityIgnored,
    /// 子件的獨立需求被 BOM 展開覆蓋
    ComponentDemandIgnored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WarningSeverity {
    Info,
    Warning,
}
