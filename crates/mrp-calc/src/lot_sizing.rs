//! 批量規則實現

use mrp_core::{MrpError, PartId, PeriodId, Quantity, Result};

/// 批量規則計算器
pub struct LotSizingCalculator;

impl LotSizingCalculator {
    /// 將淨需求向上取整到批量的倍數
    ///
    /// 淨需求為 0 時不下單；批量必須為正數。結果超出數量範圍時回報溢位。
    pub fn round_up(
        part_id: PartId,
        period_id: PeriodId,
        net_requirement: Quantity,
        lot_size: Quantity,
    ) -> Result<Quantity> {
        if lot_size <= 0 {
            return Err(MrpError::InvalidLotSize { part_id, lot_size });
        }
        if net_requirement <= 0 {
            return Ok(0);
        }

        let batches = (net_requirement - 1) / lot_size + 1;
        batches
            .checked_mul(lot_size)
            .ok_or(MrpError::QuantityOverflow { part_id, period_id })
    }
}
