//! 淨需求計算

use mrp_core::{MrpError, MrpRecord, Part, PartId, PeriodId, Quantity, Result};

use crate::lead_time::LeadTimeCalculator;
use crate::lot_sizing::LotSizingCalculator;

/// 單物料淨需求計算結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NettingOutcome {
    pub part_id: PartId,

    /// 重新計算後的所有時段記錄
    pub records: Vec<MrpRecord>,

    /// 無法在計劃時界內下達的收貨（時段, 數量）
    pub past_due: Vec<(PeriodId, Quantity)>,
}

/// 淨需求計算器
pub struct NettingCalculator;

impl NettingCalculator {
    /// 計算單一物料所有時段的淨需求、計劃收貨、計劃下達與預計庫存
    ///
    /// `records` 必須依時段排序且索引等於時段ID；只讀取毛需求與預計收貨，
    /// 其餘欄位全部重算。時段 0 為期初基準：預計庫存 = 期初庫存。
    pub fn calculate(part: &Part, records: &[MrpRecord]) -> Result<NettingOutcome> {
        if part.lot_size <= 0 {
            return Err(MrpError::InvalidLotSize {
                part_id: part.id,
                lot_size: part.lot_size,
            });
        }
        if records.is_empty() {
            return Err(MrpError::MissingPeriodData {
                part_id: part.id,
                period_id: 0,
            });
        }
        for (index, record) in records.iter().enumerate() {
            if record.part_id != part.id || record.period_id as usize != index {
                return Err(MrpError::MissingPeriodData {
                    part_id: part.id,
                    period_id: index as PeriodId,
                });
            }
        }

        let mut output = records.to_vec();
        output.iter_mut().for_each(MrpRecord::reset_computed);

        let mut available = part.initial_inventory;
        output[0].projected_inventory = available;

        for record in output.iter_mut().skip(1) {
            let (part_id, period_id) = (part.id, record.period_id);
            let overflow = move || MrpError::QuantityOverflow { part_id, period_id };

            // 可用量 = 前期庫存 + 預計收貨
            let supply = available
                .checked_add(record.scheduled_receipt)
                .ok_or_else(overflow)?;
            let net_requirement = record
                .gross_requirement
                .checked_sub(supply)
                .ok_or_else(overflow)?
                .max(0);
            let receipt = LotSizingCalculator::round_up(
                part.id,
                record.period_id,
                net_requirement,
                part.lot_size,
            )?;

            record.net_requirement = net_requirement;
            record.planned_order_receipt = receipt;
            record.projected_inventory = supply
                .checked_add(receipt)
                .and_then(|total| total.checked_sub(record.gross_requirement))
                .ok_or_else(overflow)?;

            available = record.projected_inventory;
        }

        let receipts: Vec<Quantity> = output.iter().map(|r| r.planned_order_receipt).collect();
        let releases = LeadTimeCalculator::offset_releases(&receipts, part.lead_time);
        for (record, release) in output.iter_mut().zip(releases) {
            record.planned_order_release = release;
        }

        Ok(NettingOutcome {
            part_id: part.id,
            past_due: LeadTimeCalculator::past_due_receipts(&receipts, part.lead_time),
            records: output,
        })
    }
}
