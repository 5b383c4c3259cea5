//! 提前期偏移

use mrp_core::{PeriodId, Quantity};

/// 提前期計算器
pub struct LeadTimeCalculator;

impl LeadTimeCalculator {
    /// 下達時段 = 收貨時段 - 提前期；落在基準時段或之前時回傳 None
    pub fn release_period(receipt_period: PeriodId, lead_time: u32) -> Option<PeriodId> {
        receipt_period
            .checked_sub(lead_time)
            .filter(|&period| period >= 1)
    }

    /// 由計劃收貨推算計劃下達：release[t] = receipt[t + lead_time]
    ///
    /// 超出計劃時界的收貨視為 0；基準時段不下達。
    pub fn offset_releases(receipts: &[Quantity], lead_time: u32) -> Vec<Quantity> {
        let offset = lead_time as usize;
        (0..receipts.len())
            .map(|period| {
                if period == 0 {
                    return 0;
                }
                receipts.get(period + offset).copied().unwrap_or(0)
            })
            .collect()
    }

    /// 無法在計劃時界內下達的收貨（時段, 數量）
    pub fn past_due_receipts(receipts: &[Quantity], lead_time: u32) -> Vec<(PeriodId, Quantity)> {
        receipts
            .iter()
            .enumerate()
            .skip(1)
            .filter(|&(period, &quantity)| {
                quantity > 0 && Self::release_period(period as PeriodId, lead_time).is_none()
            })
            .map(|(period, &quantity)| (period as PeriodId, quantity))
            .collect()
    }
}
