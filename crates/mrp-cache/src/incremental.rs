//! 增量 MRP 計算

use mrp_calc::validation::PlanValidator;
use mrp_calc::{Ledger, MrpCalculator, MrpPlan, PlanState};
use mrp_core::{MrpError, PartId, PeriodId, Result, SeedRecord};
use std::collections::BTreeMap;

use crate::dirty_tracking::DirtyTracker;

/// 增量計算器
///
/// 保留上一次的計算狀態；種子資料變動後只重算變動物料與其下階物料，
/// 結果與用同一組種子資料完整重算一致。
pub struct IncrementalCalculator {
    calculator: MrpCalculator,
    state: PlanState,
    seeds: BTreeMap<(PartId, PeriodId), SeedRecord>,
    tracker: DirtyTracker,
    passes: usize,
}

impl IncrementalCalculator {
    /// 完整計算一次作為起點
    pub fn new(calculator: MrpCalculator, seeds: &[SeedRecord]) -> Result<Self> {
        PlanValidator::validate(calculator.catalog(), calculator.bom(), calculator.horizon(), seeds)?;

        let ledger = Ledger::seed(calculator.catalog(), calculator.horizon(), seeds)?;
        let mut state = PlanState::new(ledger);
        let passes = calculator.sweep(&mut state, None)?;

        let seeds = seeds
            .iter()
            .map(|seed| ((seed.part_id, seed.period_id), *seed))
            .collect();

        Ok(Self {
            calculator,
            state,
            seeds,
            tracker: DirtyTracker::new(),
            passes,
        })
    }

    /// 更新一筆種子資料（覆蓋同物料同時段的舊值）並標記物料為髒
    pub fn update_seed(&mut self, seed: SeedRecord) -> Result<()> {
        seed.validate()?;
        if !self.calculator.catalog().contains(seed.part_id) {
            return Err(MrpError::UnknownPart(seed.part_id));
        }
        if !self.calculator.horizon().contains(seed.period_id) {
            return Err(MrpError::MissingPeriodData {
                part_id: seed.part_id,
                period_id: seed.period_id,
            });
        }

        // 子件的毛需求由 BOM 展開決定，只更新預計收貨
        let gross = if self.calculator.bom().is_component(seed.part_id) {
            None
        } else {
            Some(seed.gross_requirement)
        };
        self.state
            .ledger
            .set_inputs(seed.part_id, seed.period_id, gross, seed.scheduled_receipt)?;

        self.seeds.insert((seed.part_id, seed.period_id), seed);
        self.tracker.mark_dirty(seed.part_id);
        tracing::debug!("物料 {} 時段 {} 輸入變動", seed.part_id, seed.period_id);
        Ok(())
    }

    pub fn is_dirty(&self, part_id: PartId) -> bool {
        self.tracker.is_dirty(part_id)
    }

    /// 重算髒物料及其下階物料，回傳計算次數
    ///
    /// 失敗時保留上一次的結果與髒標記。
    pub fn recalculate(&mut self) -> Result<usize> {
        if self.tracker.is_empty() {
            return Ok(0);
        }

        let dirty = self.tracker.take();
        let mut scope = self.calculator.bom().descendants(dirty.iter().copied());
        scope.extend(dirty.iter().copied());
        tracing::info!("增量計算：髒物料 {:?}，重算範圍 {} 個物料", dirty, scope.len());

        let mut next = self.state.clone();
        match self.calculator.sweep(&mut next, Some(&scope)) {
            Ok(passes) => {
                self.state = next;
                self.passes = passes;
                Ok(passes)
            }
            Err(err) => {
                self.tracker.restore(dirty);
                Err(err)
            }
        }
    }

    /// 目前的計算結果（尚有髒物料時先重算）
    pub fn plan(&mut self) -> Result<MrpPlan> {
        self.recalculate()?;
        let seeds = self.seeds();
        let warnings = PlanValidator::validate(
            self.calculator.catalog(),
            self.calculator.bom(),
            self.calculator.horizon(),
            &seeds,
        )?;
        self.calculator
            .build_plan(self.state.clone(), warnings, self.passes, None)
    }

    /// 目前的種子資料（依物料、時段排序）
    pub fn seeds(&self) -> Vec<SeedRecord> {
        self.seeds.values().copied().collect()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.state.ledger
    }

    pub fn calculator(&self) -> &MrpCalculator {
        &self.calculator
    }
}
