//! MRP 記錄（每個物料 × 時段一筆）

use serde::{Deserialize, Serialize};

use crate::{MrpError, PartId, PeriodId, Quantity, Result};

/// MRP 記錄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MrpRecord {
    /// 物料ID
    pub part_id: PartId,

    /// 時段ID
    pub period_id: PeriodId,

    /// 毛需求
    pub gross_requirement: Quantity,

    /// 預計收貨（外部輸入）
    pub scheduled_receipt: Quantity,

    /// 預計庫存（期末）
    pub projected_inventory: Quantity,

    /// 淨需求
    pub net_requirement: Quantity,

    /// 計劃訂單收貨
    pub planned_order_receipt: Quantity,

    /// 計劃訂單下達
    pub planned_order_release: Quantity,
}

impl MrpRecord {
    /// 創建全零記錄
    pub fn new(part_id: PartId, period_id: PeriodId) -> Self {
        Self {
            part_id,
            period_id,
            ..Default::default()
        }
    }

    /// 清除計算欄位，只保留輸入（毛需求與預計收貨）
    pub fn reset_computed(&mut self) {
        self.projected_inventory = 0;
        self.net_requirement = 0;
        self.planned_order_receipt = 0;
        self.planned_order_release = 0;
    }
}

/// 外部輸入的種子記錄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedRecord {
    pub part_id: PartId,
    pub period_id: PeriodId,
    /// 獨立需求
    #[serde(default)]
    pub gross_requirement: Quantity,
    #[serde(default)]
    pub scheduled_receipt: Quantity,
}

impl SeedRecord {
    pub fn new(
        part_id: PartId,
        period_id: PeriodId,
        gross_requirement: Quantity,
        scheduled_receipt: Quantity,
    ) -> Self {
        Self {
            part_id,
            period_id,
            gross_requirement,
            scheduled_receipt,
        }
    }

    /// 只有獨立需求的種子記錄
    pub fn demand(part_id: PartId, period_id: PeriodId, quantity: Quantity) -> Self {
        Self::new(part_id, period_id, quantity, 0)
    }

    /// 只有預計收貨的種子記錄
    pub fn receipt(part_id: PartId, period_id: PeriodId, quantity: Quantity) -> Self {
        Self::new(part_id, period_id, 0, quantity)
    }

    /// 檢查數量不為負
    pub fn validate(&self) -> Result<()> {
        if self.gross_requirement < 0 {
            return Err(MrpError::NegativeQuantity {
                part_id: self.part_id,
                field: "gross_requirement",
                value: self.gross_requirement,
            });
        }
        if self.scheduled_receipt < 0 {
            return Err(MrpError::NegativeQuantity {
                part_id: self.part_id,
                field: "scheduled_receipt",
                value: self.scheduled_receipt,
            });
        }
        Ok(())
    }
}
