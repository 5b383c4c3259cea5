//! 計劃訂單與需求追溯模型

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{PartId, PeriodId, ProcurementType, Quantity};

/// 計劃訂單類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlannedOrderType {
    /// 採購
    Purchase,
    /// 生產
    Production,
}

impl From<ProcurementType> for PlannedOrderType {
    fn from(procurement_type: ProcurementType) -> Self {
        match procurement_type {
            ProcurementType::Buy => PlannedOrderType::Purchase,
            ProcurementType::Make => PlannedOrderType::Production,
        }
    }
}

/// 計劃訂單（MRP計算結果）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedOrder {
    /// 計劃訂單ID
    pub id: Uuid,

    /// 物料ID
    pub part_id: PartId,

    /// 計劃數量
    pub quantity: Quantity,

    /// 收貨時段
    pub receipt_period: PeriodId,

    /// 下達時段（None 表示已逾期，應在計劃時界之前下達）
    pub release_period: Option<PeriodId>,

    /// 訂單類型
    pub order_type: PlannedOrderType,
}

impl PlannedOrder {
    /// 創建新的計劃訂單，下達時段由提前期推算
    pub fn new(
        part_id: PartId,
        quantity: Quantity,
        receipt_period: PeriodId,
        lead_time: u32,
        order_type: PlannedOrderType,
    ) -> Self {
        let release_period = receipt_period
            .checked_sub(lead_time)
            .filter(|&period| period >= 1);

        Self {
            id: Uuid::new_v4(),
            part_id,
            quantity,
            receipt_period,
            release_period,
            order_type,
        }
    }

    /// 是否逾期（下達時段落在計劃時界之前）
    pub fn is_past_due(&self) -> bool {
        self.release_period.is_none()
    }

    /// 檢查是否為採購訂單
    pub fn is_purchase(&self) -> bool {
        self.order_type == PlannedOrderType::Purchase
    }

    /// 檢查是否為生產訂單
    pub fn is_production(&self) -> bool {
        self.order_type == PlannedOrderType::Production
    }
}

/// 需求追溯記錄：子件在某時段的毛需求中來自某父件的部分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeggingRecord {
    /// 父件ID
    pub parent_id: PartId,

    /// 時段ID
    pub period_id: PeriodId,

    /// 追溯數量（父件下達量 × 用量）
    pub quantity: Quantity,
}

impl PeggingRecord {
    pub fn new(parent_id: PartId, period_id: PeriodId, quantity: Quantity) -> Self {
        Self {
            parent_id,
            period_id,
            quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_planned_order() {
        let order = PlannedOrder::new(1, 90, 3, 2, PlannedOrderType::Production);

        assert_eq!(order.part_id, 1);
        assert_eq!(order.quantity, 90);
        assert_eq!(order.release_period, Some(1));
        assert!(!order.is_past_due());
        assert!(order.is_production());
        assert!(!order.is_purchase());
    }

    #[test]
    fn test_past_due_order() {
        // 時段 2 收貨、提前期 2：應在時段 0 下達，已逾期
        let order = PlannedOrder::new(1, 90, 2, 2, PlannedOrderType::Purchase);
        assert!(order.is_past_due());

        let order = PlannedOrder::new(1, 90, 1, 4, PlannedOrderType::Purchase);
        assert!(order.is_past_due());
    }

    #[test]
    fn test_order_type_from_procurement() {
        assert_eq!(
            PlannedOrderType::from(ProcurementType::Buy),
            PlannedOrderType::Purchase
        );
        assert_eq!(
            PlannedOrderType::from(ProcurementType::Make),
            PlannedOrderType::Production
        );
    }
}
