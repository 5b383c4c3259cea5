//! 計劃運行狀態：帳冊與附屬的追溯、逾期資料

use mrp_core::{PartId, PeggingRecord, PeriodId, Quantity, Result};
use std::collections::BTreeMap;

use crate::ledger::Ledger;
use crate::netting::NettingOutcome;

/// 計劃運行狀態
#[derive(Debug, Clone)]
pub struct PlanState {
    pub ledger: Ledger,

    /// 子件 → 毛需求的父件來源
    pub pegging: BTreeMap<PartId, Vec<PeggingRecord>>,

    /// 物料 → 逾期收貨（時段, 數量）
    pub past_due: BTreeMap<PartId, Vec<(PeriodId, Quantity)>>,
}

impl PlanState {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger,
            pegging: BTreeMap::new(),
            past_due: BTreeMap::new(),
        }
    }

    /// 寫入同一層級的淨需求計算結果（單一批次）
    pub fn apply_netting(&mut self, outcomes: Vec<NettingOutcome>) -> Result<()> {
        let mut batch = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            if outcome.past_due.is_empty() {
                self.past_due.remove(&outcome.part_id);
            } else {
                self.past_due.insert(outcome.part_id, outcome.past_due);
            }
            batch.push((outcome.part_id, outcome.records));
        }
        self.ledger.write_netted(batch)
    }

    /// 覆蓋子件的需求追溯
    pub fn set_pegging(&mut self, component_id: PartId, records: Vec<PeggingRecord>) {
        if records.is_empty() {
            self.pegging.remove(&component_id);
        } else {
            self.pegging.insert(component_id, records);
        }
    }
}
