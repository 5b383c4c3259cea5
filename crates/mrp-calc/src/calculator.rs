//! MRP 主計算器：依 BOM 層級逐層計算淨需求並展開到下一層

use mrp_core::{
    BomGraph, MrpError, PartCatalog, PartId, PlannedOrder, PlanningConfig, PlanningHorizon,
    Result, SeedRecord,
};
use rayon::prelude::*;
use std::collections::{BTreeSet, VecDeque};

use crate::explosion::ExplosionPropagator;
use crate::ledger::Ledger;
use crate::netting::{NettingCalculator, NettingOutcome};
use crate::state::PlanState;
use crate::validation::PlanValidator;
use crate::{MrpPlan, MrpWarning, WarningKind};

/// MRP 計算器
pub struct MrpCalculator {
    /// 物料目錄
    catalog: PartCatalog,

    /// BOM 圖
    bom: BomGraph,

    /// 計劃時界
    horizon: PlanningHorizon,

    /// 運行配置
    config: PlanningConfig,
}

impl MrpCalculator {
    /// 創建新的 MRP 計算器
    pub fn new(catalog: PartCatalog, bom: BomGraph, horizon: PlanningHorizon) -> Self {
        Self {
            catalog,
            bom,
            horizon,
            config: PlanningConfig::default(),
        }
    }

    /// 建構器模式：設置運行配置
    pub fn with_config(mut self, config: PlanningConfig) -> Self {
        self.config = config;
        self
    }

    /// 主 MRP 計算入口
    pub fn calculate(&self, seeds: &[SeedRecord]) -> Result<MrpPlan> {
        tracing::info!(
            "開始 MRP 計算：物料 {} 筆，BOM 關係 {} 筆，時段 {} 個，種子記錄 {} 筆",
            self.catalog.len(),
            self.bom.edge_count(),
            self.horizon.len(),
            seeds.len()
        );
        let start_time = std::time::Instant::now();

        // Step 1: 結構檢查（帳冊建立之前）
        let warnings = PlanValidator::validate(&self.catalog, &self.bom, &self.horizon, seeds)?;

        // Step 2: 建立帳冊
        let ledger = Ledger::seed(&self.catalog, &self.horizon, seeds)?;
        let mut state = PlanState::new(ledger);

        // Step 3: 逐層計算
        let passes = self.sweep(&mut state, None)?;

        let plan = self.build_plan(state, warnings, passes, Some(start_time.elapsed().as_millis()))?;
        tracing::info!("MRP 計算完成，耗時 {:?}", start_time.elapsed());
        tracing::info!("計劃訂單數量: {}", plan.planned_orders.len());

        Ok(plan)
    }

    /// 以外部載入的完整帳冊計算（毛需求與預計收貨取自帳冊）
    pub fn calculate_ledger(&self, ledger: Ledger) -> Result<MrpPlan> {
        let start_time = std::time::Instant::now();

        let warnings =
            PlanValidator::validate_ledger(&self.catalog, &self.bom, &self.horizon, &ledger)?;

        let mut state = PlanState::new(ledger);
        let passes = self.sweep(&mut state, None)?;
        self.build_plan(state, warnings, passes, Some(start_time.elapsed().as_millis()))
    }

    /// 依層級遞增順序計算：每層先計算所有物料，再把計劃下達展開到子件
    ///
    /// `scope` 限制只重算指定物料（增量計算用），None 表示全部。
    /// 回傳實際執行的計算次數。
    pub fn sweep(&self, state: &mut PlanState, scope: Option<&BTreeSet<PartId>>) -> Result<usize> {
        let groups = self.bom.level_groups(&self.catalog);
        let limit = self.config.pass_limit(groups.len());

        let mut pending: VecDeque<(u32, Vec<PartId>)> = groups
            .into_iter()
            .filter_map(|(level, parts)| {
                let parts: Vec<PartId> = match scope {
                    Some(scope) => parts.into_iter().filter(|id| scope.contains(id)).collect(),
                    None => parts,
                };
                (!parts.is_empty()).then_some((level, parts))
            })
            .collect();

        let mut passes = 0;
        while let Some((level, parts)) = pending.pop_front() {
            if passes >= limit {
                return Err(MrpError::NonConvergence {
                    passes,
                    remaining_levels: pending.len() + 1,
                });
            }
            passes += 1;

            tracing::debug!("層級 {} 計算：物料 {:?}", level, parts);
            let outcomes = self.net_level(&state.ledger, &parts)?;

            // 同層級全部寫入後才展開
            state.apply_netting(outcomes)?;
            let affected =
                ExplosionPropagator::propagate(&parts, &self.bom, state, self.config.collect_pegging)?;
            tracing::debug!("層級 {} 展開到子件: {:?}", level, affected);
        }

        Ok(passes)
    }

    /// 計算同一層級所有物料（互不相依，可並行）
    fn net_level(&self, ledger: &Ledger, parts: &[PartId]) -> Result<Vec<NettingOutcome>> {
        let net_one = |part_id: &PartId| -> Result<NettingOutcome> {
            let part = self.catalog.get(*part_id)?;
            let outcome = NettingCalculator::calculate(part, ledger.part_rows(*part_id)?)?;
            tracing::debug!(
                "物料 {} ({}) 計劃收貨合計 {}",
                part.id,
                part.name,
                outcome
                    .records
                    .iter()
                    .map(|r| r.planned_order_receipt)
                    .sum::<mrp_core::Quantity>()
            );
            Ok(outcome)
        };

        if self.config.parallel {
            parts.par_iter().map(net_one).collect()
        } else {
            parts.iter().map(net_one).collect()
        }
    }

    /// 由運行狀態組裝計算結果
    pub fn build_plan(
        &self,
        state: PlanState,
        mut warnings: Vec<MrpWarning>,
        passes: usize,
        calculation_time_ms: Option<u128>,
    ) -> Result<MrpPlan> {
        for (&part_id, receipts) in &state.past_due {
            let part = self.catalog.get(part_id)?;
            for &(period_id, quantity) in receipts {
                tracing::warn!(
                    "物料 {} 時段 {} 的計劃收貨 {} 需在計劃時界之前下達（提前期 {}）",
                    part_id,
                    period_id,
                    quantity,
                    part.lead_time
                );
                warnings.push(MrpWarning::warning(
                    part_id,
                    Some(period_id),
                    WarningKind::PastDueRelease,
                    format!(
                        "計劃收貨 {} 需在時段 {} 之前 {} 個時段下達，已逾期",
                        quantity, period_id, part.lead_time
                    ),
                ));
            }
        }

        let mut planned_orders = Vec::new();
        for record in state.ledger.rows() {
            if record.period_id == 0 || record.planned_order_receipt == 0 {
                continue;
            }
            let part = self.catalog.get(record.part_id)?;
            planned_orders.push(PlannedOrder::new(
                part.id,
                record.planned_order_receipt,
                record.period_id,
                part.lead_time,
                part.procurement_type.into(),
            ));
        }

        Ok(MrpPlan {
            run_id: uuid::Uuid::new_v4(),
            ledger: state.ledger,
            planned_orders,
            pegging: state.pegging,
            warnings,
            passes,
            calculation_time_ms,
        })
    }

    /// 獲取物料目錄引用
    pub fn catalog(&self) -> &PartCatalog {
        &self.catalog
    }

    /// 獲取 BOM 圖引用
    pub fn bom(&self) -> &BomGraph {
        &self.bom
    }

    /// 獲取計劃時界引用
    pub fn horizon(&self) -> &PlanningHorizon {
        &self.horizon
    }

    pub fn config(&self) -> &PlanningConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrp_core::{BomEdge, Part};
    use rstest::rstest;

    /// A(1) → B(2) ×1, A → C(3) ×2, B → C ×1
    fn calculator() -> MrpCalculator {
        let catalog = PartCatalog::from_parts(vec![
            Part::new(1, "A", 2, 30).with_initial_inventory(20),
            Part::new(2, "B", 2, 50).with_initial_inventory(40),
            Part::new(3, "C", 2, 60).with_initial_inventory(50),
        ])
        .unwrap();
        let bom = BomGraph::from_edges(vec![
            BomEdge::new(1, 2, 1, 1),
            BomEdge::new(1, 3, 2, 2),
            BomEdge::new(2, 3, 1, 2),
        ])
        .unwrap();
        MrpCalculator::new(catalog, bom, PlanningHorizon::new(7))
    }

    fn seeds() -> Vec<SeedRecord> {
        vec![
            SeedRecord::demand(1, 1, 100),
            SeedRecord::new(1, 2, 50, 60),
            SeedRecord::demand(1, 3, 90),
            SeedRecord::demand(1, 4, 30),
            SeedRecord::demand(1, 5, 10),
            SeedRecord::demand(1, 6, 100),
            SeedRecord::demand(1, 7, 20),
            SeedRecord::receipt(2, 2, 50),
            SeedRecord::receipt(3, 5, 60),
            SeedRecord::receipt(3, 7, 60),
        ]
    }

    #[test]
    fn test_one_pass_per_level() {
        let plan = calculator().calculate(&seeds()).unwrap();
        assert_eq!(plan.passes, 3);
        assert_eq!(plan.rows().count(), 24);
    }

    #[test]
    fn test_component_gross_follows_parent_releases() {
        let plan = calculator().calculate(&seeds()).unwrap();

        for period in 0..=7 {
            let a = plan.record(1, period).unwrap();
            let b = plan.record(2, period).unwrap();
            let c = plan.record(3, period).unwrap();
            assert_eq!(b.gross_requirement, a.planned_order_release);
            assert_eq!(
                c.gross_requirement,
                2 * a.planned_order_release + b.planned_order_release
            );
        }
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn test_parallel_matches_sequential(#[case] collect_pegging: bool) {
        let sequential = calculator()
            .with_config(PlanningConfig::new().with_parallel(false).with_pegging(collect_pegging))
            .calculate(&seeds())
            .unwrap();
        let parallel = calculator()
            .with_config(PlanningConfig::new().with_parallel(true).with_pegging(collect_pegging))
            .calculate(&seeds())
            .unwrap();

        assert_eq!(sequential.ledger, parallel.ledger);
        assert_eq!(sequential.pegging, parallel.pegging);
    }

    #[test]
    fn test_pass_limit_reports_non_convergence() {
        let result = calculator()
            .with_config(PlanningConfig::new().with_max_passes(1))
            .calculate(&seeds());

        assert!(matches!(
            result,
            Err(MrpError::NonConvergence { passes: 1, remaining_levels: 2 })
        ));
    }

    #[test]
    fn test_planned_orders_match_receipts() {
        let plan = calculator().calculate(&seeds()).unwrap();

        let total_orders: i64 = plan.orders_for(1).map(|o| o.quantity).sum();
        let total_receipts: i64 = plan
            .records_for(1)
            .unwrap()
            .iter()
            .map(|r| r.planned_order_receipt)
            .sum();
        assert_eq!(total_orders, total_receipts);
        assert!(plan.orders_for(1).any(|o| o.is_past_due()));
    }

    #[test]
    fn test_calculate_ledger_period_mismatch() {
        let calc = calculator();
        let ledger = Ledger::seed(calc.catalog(), &PlanningHorizon::new(3), &[]).unwrap();

        assert!(matches!(
            calc.calculate_ledger(ledger),
            Err(MrpError::InvalidHorizon(_))
        ));
    }

    #[test]
    fn test_calculate_ledger_matches_seeded_run() {
        let calc = calculator();
        let ledger = Ledger::seed(calc.catalog(), calc.horizon(), &seeds()).unwrap();

        let from_ledger = calc.calculate_ledger(ledger).unwrap();
        let from_seeds = calc.calculate(&seeds()).unwrap();
        assert_eq!(from_ledger.ledger.into_rows(), from_seeds.ledger.into_rows());
    }

    #[test]
    fn test_calculate_ledger_checks_rows() {
        let calc = calculator();
        let mut records = Ledger::seed(calc.catalog(), calc.horizon(), &seeds())
            .unwrap()
            .into_rows();
        // B 時段 3 的獨立需求會被展開覆蓋
        records[11].gross_requirement = 40;
        let ledger = Ledger::from_records(calc.catalog(), calc.horizon(), records.clone()).unwrap();

        let plan = calc.calculate_ledger(ledger).unwrap();
        assert!(plan
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::ComponentDemandIgnored && w.part_id == 2));

        records[2].gross_requirement = -1;
        let ledger = Ledger::from_records(calc.catalog(), calc.horizon(), records).unwrap();
        assert!(matches!(
            calc.calculate_ledger(ledger),
            Err(MrpError::NegativeQuantity { part_id: 1, .. })
        ));
    }
}
