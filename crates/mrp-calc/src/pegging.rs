//! 需求追溯

use mrp_core::{PartId, PeggingRecord, Quantity};
use std::collections::{BTreeMap, BTreeSet};

/// 追溯類型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeggingType {
    /// 單層追溯（直接父件）
    SingleLevel,
    /// 多層追溯（追溯到最終產品）
    MultiLevel,
}

/// 需求追溯計算器
pub struct PeggingCalculator;

impl PeggingCalculator {
    /// 依父件彙總追溯數量
    pub fn by_parent(records: &[PeggingRecord]) -> BTreeMap<PartId, Quantity> {
        let mut totals = BTreeMap::new();
        for record in records {
            *totals.entry(record.parent_id).or_insert(0) += record.quantity;
        }
        totals
    }

    /// 實際產生需求的來源物料
    ///
    /// 單層回傳貢獻毛需求的直接父件；多層沿追溯記錄往上，
    /// 回傳本身沒有被展開需求的最終產品。
    pub fn sources(
        part_id: PartId,
        pegging: &BTreeMap<PartId, Vec<PeggingRecord>>,
        pegging_type: PeggingType,
    ) -> BTreeSet<PartId> {
        let parents_of = |id: PartId| -> Vec<PartId> {
            pegging
                .get(&id)
                .map(|records| records.iter().map(|r| r.parent_id).collect())
                .unwrap_or_default()
        };

        match pegging_type {
            PeggingType::SingleLevel => parents_of(part_id).into_iter().collect(),
            PeggingType::MultiLevel => {
                let mut roots = BTreeSet::new();
                let mut visited = BTreeSet::new();
                let mut stack = parents_of(part_id);

                while let Some(id) = stack.pop() {
                    if !visited.insert(id) {
                        continue;
                    }
                    let parents = parents_of(id);
                    if parents.is_empty() {
                        roots.insert(id);
                    } else {
                        stack.extend(parents);
                    }
                }
                roots
            }
        }
    }
}
