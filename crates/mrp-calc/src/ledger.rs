//! MRP 帳冊：以 (物料, 時段) 為鍵的記錄集合

use mrp_core::{
    MrpError, MrpRecord, PartCatalog, PartId, PeriodId, PlanningHorizon, Quantity, Result,
    SeedRecord,
};
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

/// MRP 帳冊
///
/// 每個物料持有一個依時段索引的記錄陣列（索引即時段ID），
/// 每次寫入批次後版本號遞增。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    period_count: usize,
    rows: BTreeMap<PartId, Vec<MrpRecord>>,
    version: u64,
}

impl Ledger {
    /// 為目錄中每個物料 × 每個時段建立記錄，再套用種子資料
    ///
    /// 同一 (物料, 時段) 只能有一筆種子記錄。
    pub fn seed(
        catalog: &PartCatalog,
        horizon: &PlanningHorizon,
        seeds: &[SeedRecord],
    ) -> Result<Self> {
        let period_count = horizon.len();
        let rows = catalog
            .ids()
            .map(|part_id| {
                let records = (0..period_count as PeriodId)
                    .map(|period_id| MrpRecord::new(part_id, period_id))
                    .collect();
                (part_id, records)
            })
            .collect();

        let mut ledger = Self {
            period_count,
            rows,
            version: 0,
        };

        let mut seen = BTreeSet::new();
        for seed in seeds {
            seed.validate()?;
            if !seen.insert((seed.part_id, seed.period_id)) {
                return Err(MrpError::DuplicateSeed {
                    part_id: seed.part_id,
                    period_id: seed.period_id,
                });
            }
            if !catalog.contains(seed.part_id) {
                return Err(MrpError::UnknownPart(seed.part_id));
            }
            let record = ledger.record_mut(seed.part_id, seed.period_id)?;
            record.gross_requirement = seed.gross_requirement;
            record.scheduled_receipt = seed.scheduled_receipt;
        }

        Ok(ledger)
    }

    /// 從外部儲存載入完整記錄集（每個物料 × 時段都必須存在）
    pub fn from_records(
        catalog: &PartCatalog,
        horizon: &PlanningHorizon,
        records: impl IntoIterator<Item = MrpRecord>,
    ) -> Result<Self> {
        let period_count = horizon.len();
        let mut slots: BTreeMap<PartId, Vec<Option<MrpRecord>>> = catalog
            .ids()
            .map(|part_id| (part_id, vec![None; period_count]))
            .collect();

        for record in records {
            let slot = slots
                .get_mut(&record.part_id)
                .ok_or(MrpError::UnknownPart(record.part_id))?
                .get_mut(record.period_id as usize)
                .ok_or(MrpError::MissingPeriodData {
                    part_id: record.part_id,
                    period_id: record.period_id,
                })?;
            if slot.is_some() {
                return Err(MrpError::DuplicateSeed {
                    part_id: record.part_id,
                    period_id: record.period_id,
                });
            }
            *slot = Some(record);
        }

        let mut rows = BTreeMap::new();
        for (part_id, slot_list) in slots {
            let records = slot_list
                .into_iter()
                .enumerate()
                .map(|(period, slot)| {
                    slot.ok_or(MrpError::MissingPeriodData {
                        part_id,
                        period_id: period as PeriodId,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            rows.insert(part_id, records);
        }

        Ok(Self {
            period_count,
            rows,
            version: 0,
        })
    }

    /// 時段總數 (N+1)
    pub fn period_count(&self) -> usize {
        self.period_count
    }

    /// 寫入批次版本號
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn part_ids(&self) -> impl Iterator<Item = PartId> + '_ {
        self.rows.keys().copied()
    }

    /// 單一物料的記錄（依時段排序）
    pub fn part_rows(&self, part_id: PartId) -> Result<&[MrpRecord]> {
        self.rows
            .get(&part_id)
            .map(Vec::as_slice)
            .ok_or(MrpError::MissingPeriodData {
                part_id,
                period_id: 0,
            })
    }

    pub fn record(&self, part_id: PartId, period_id: PeriodId) -> Result<&MrpRecord> {
        self.part_rows(part_id)?
            .get(period_id as usize)
            .ok_or(MrpError::MissingPeriodData { part_id, period_id })
    }

    fn record_mut(&mut self, part_id: PartId, period_id: PeriodId) -> Result<&mut MrpRecord> {
        self.rows
            .get_mut(&part_id)
            .and_then(|records| records.get_mut(period_id as usize))
            .ok_or(MrpError::MissingPeriodData { part_id, period_id })
    }

    /// 依物料ID、時段ID排序的所有記錄
    pub fn rows(&self) -> impl Iterator<Item = &MrpRecord> {
        self.rows.values().flatten()
    }

    pub fn into_rows(self) -> Vec<MrpRecord> {
        self.rows.into_values().flatten().collect()
    }

    /// 寫入一批淨需求計算結果（整個物料的記錄被覆蓋）
    ///
    /// 先檢查整批資料，任何一筆不符時帳冊保持不變。
    pub fn write_netted(
        &mut self,
        batch: impl IntoIterator<Item = (PartId, Vec<MrpRecord>)>,
    ) -> Result<()> {
        let batch: Vec<(PartId, Vec<MrpRecord>)> = batch.into_iter().collect();
        for (part_id, records) in &batch {
            let existing = self.part_rows(*part_id)?;
            if records.len() != existing.len() {
                return Err(MrpError::MissingPeriodData {
                    part_id: *part_id,
                    period_id: records.len().min(existing.len()) as PeriodId,
                });
            }
        }

        for (part_id, records) in batch {
            if let Some(slot) = self.rows.get_mut(&part_id) {
                *slot = records;
            }
        }
        self.version += 1;
        Ok(())
    }

    /// 覆蓋物料的毛需求（BOM 展開結果）
    pub fn set_gross_requirements(&mut self, part_id: PartId, gross: &[Quantity]) -> Result<()> {
        let records = self.rows.get_mut(&part_id).ok_or(MrpError::MissingPeriodData {
            part_id,
            period_id: 0,
        })?;
        if gross.len() != records.len() {
            return Err(MrpError::MissingPeriodData {
                part_id,
                period_id: gross.len().min(records.len()) as PeriodId,
            });
        }
        for (record, &quantity) in records.iter_mut().zip(gross) {
            record.gross_requirement = quantity;
        }
        self.version += 1;
        Ok(())
    }

    /// 更新單筆輸入（增量計算用）
    pub fn set_inputs(
        &mut self,
        part_id: PartId,
        period_id: PeriodId,
        gross_requirement: Option<Quantity>,
        scheduled_receipt: Quantity,
    ) -> Result<()> {
        let record = self.record_mut(part_id, period_id)?;
        if let Some(gross) = gross_requirement {
            record.gross_requirement = gross;
        }
        record.scheduled_receipt = scheduled_receipt;
        self.version += 1;
        Ok(())
    }
}

impl Serialize for Ledger {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}
