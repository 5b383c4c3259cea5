//! BOM 展開：父件計劃下達 → 子件毛需求

use mrp_core::{BomGraph, MrpError, PartId, PeggingRecord, PeriodId, Quantity, Result};
use std::collections::BTreeSet;

use crate::ledger::Ledger;
use crate::state::PlanState;

/// BOM 展開器
pub struct ExplosionPropagator;

impl ExplosionPropagator {
    /// 重新計算子件各時段毛需求 = Σ 父件計劃下達 × 用量
    ///
    /// 每次都從所有父件重新加總，不累加先前的值；超出數量範圍時回報溢位。
    pub fn gross_for(
        component_id: PartId,
        bom: &BomGraph,
        ledger: &Ledger,
    ) -> Result<(Vec<Quantity>, Vec<PeggingRecord>)> {
        let mut gross: Vec<Quantity> = vec![0; ledger.period_count()];
        let mut pegging = Vec::new();

        for edge in bom.parents_of(component_id) {
            let parent_rows = ledger.part_rows(edge.parent_id)?;
            for (period, record) in parent_rows.iter().enumerate() {
                let overflow = || MrpError::QuantityOverflow {
                    part_id: component_id,
                    period_id: period as PeriodId,
                };
                let contribution = record
                    .planned_order_release
                    .checked_mul(edge.multiplier)
                    .ok_or_else(overflow)?;
                if contribution == 0 {
                    continue;
                }
                gross[period] = gross[period]
                    .checked_add(contribution)
                    .ok_or_else(overflow)?;
                pegging.push(PeggingRecord::new(
                    edge.parent_id,
                    period as PeriodId,
                    contribution,
                ));
            }
        }

        pegging.sort_by_key(|p| (p.period_id, p.parent_id));
        Ok((gross, pegging))
    }

    /// 將一批父件的計劃下達展開到其子件
    ///
    /// 回傳毛需求被重新計算的子件。
    pub fn propagate(
        parents: &[PartId],
        bom: &BomGraph,
        state: &mut PlanState,
        collect_pegging: bool,
    ) -> Result<BTreeSet<PartId>> {
        let targets: BTreeSet<PartId> = parents
            .iter()
            .flat_map(|&parent_id| bom.children_of(parent_id).map(|edge| edge.component_id))
            .collect();

        for &component_id in &targets {
            let (gross, pegging) = Self::gross_for(component_id, bom, &state.ledger)?;
            state.ledger.set_gross_requirements(component_id, &gross)?;
            if collect_pegging {
                state.set_pegging(component_id, pegging);
            }

            tracing::debug!(
                "BOM 展開: 子件 {} 毛需求合計 {}",
                component_id,
                gross.iter().sum::<Quantity>()
            );
        }

        Ok(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrp_core::{BomEdge, MrpRecord, Part, PartCatalog, PlanningHorizon};

    fn setup() -> (BomGraph, PlanState) {
        let catalog = PartCatalog::from_parts(vec![
            Part::new(1, "A", 2, 30),
            Part::new(2, "B", 2, 50),
            Part::new(3, "C", 2, 60),
        ])
        .unwrap();
        let bom = BomGraph::from_edges(vec![
            BomEdge::new(1, 2, 1, 1),
            BomEdge::new(1, 3, 2, 2),
            BomEdge::new(2, 3, 1, 2),
        ])
        .unwrap();
        let ledger = Ledger::seed(&catalog, &PlanningHorizon::new(3), &[]).unwrap();
        (bom, PlanState::new(ledger))
    }

    fn with_releases(part_id: PartId, releases: &[Quantity]) -> Vec<MrpRecord> {
        releases
            .iter()
            .enumerate()
            .map(|(period, &release)| MrpRecord {
                planned_order_release: release,
                ..MrpRecord::new(part_id, period as PeriodId)
            })
            .collect()
    }

    #[test]
    fn test_multiple_parents_sum() {
        let (bom, mut state) = setup();
        state
            .ledger
            .write_netted(vec![
                (1, with_releases(1, &[0, 90, 0, 30])),
                (2, with_releases(2, &[0, 0, 50, 50])),
            ])
            .unwrap();

        let (gross, pegging) = ExplosionPropagator::gross_for(3, &bom, &state.ledger).unwrap();

        // C = 2 × A + 1 × B
        assert_eq!(gross, vec![0, 180, 50, 110]);
        assert_eq!(pegging.len(), 4);
        let period_3: Quantity = pegging
            .iter()
            .filter(|p| p.period_id == 3)
            .map(|p| p.quantity)
            .sum();
        assert_eq!(period_3, 110);
    }

    #[test]
    fn test_propagate_overwrites_previous_values() {
        let (bom, mut state) = setup();
        state.ledger.set_gross_requirements(2, &[7, 7, 7, 7]).unwrap();
        state
            .ledger
            .write_netted(vec![(1, with_releases(1, &[0, 30, 0, 0]))])
            .unwrap();

        let targets = ExplosionPropagator::propagate(&[1], &bom, &mut state, true).unwrap();
        assert_eq!(targets, BTreeSet::from([2, 3]));

        let gross_b: Vec<_> = state.ledger.part_rows(2).unwrap().iter().map(|r| r.gross_requirement).collect();
        assert_eq!(gross_b, vec![0, 30, 0, 0]);

        // 重複展開結果不變
        ExplosionPropagator::propagate(&[1], &bom, &mut state, true).unwrap();
        let again: Vec<_> = state.ledger.part_rows(2).unwrap().iter().map(|r| r.gross_requirement).collect();
        assert_eq!(again, gross_b);
        assert_eq!(state.pegging.get(&2).map(Vec::len), Some(1));
    }

    #[test]
    fn test_top_level_part_never_receives_demand() {
        let (bom, mut state) = setup();
        let targets = ExplosionPropagator::propagate(&[2, 3], &bom, &mut state, false).unwrap();

        assert_eq!(targets, BTreeSet::from([3]));
        assert!(!targets.contains(&1));
        assert!(state.pegging.is_empty());
    }

    #[test]
    fn test_contribution_overflow_reported() {
        let (bom, mut state) = setup();
        state
            .ledger
            .write_netted(vec![
                (1, with_releases(1, &[0, 0, Quantity::MAX / 2, 0])),
                (2, with_releases(2, &[0, 0, 2, 0])),
            ])
            .unwrap();

        // 2 × A = MAX - 1，再加上 B 的下達即溢位
        assert!(matches!(
            ExplosionPropagator::gross_for(3, &bom, &state.ledger),
            Err(MrpError::QuantityOverflow { part_id: 3, period_id: 2 })
        ));

        state
            .ledger
            .write_netted(vec![(1, with_releases(1, &[0, Quantity::MAX, 0, 0]))])
            .unwrap();
        assert!(matches!(
            ExplosionPropagator::propagate(&[1], &bom, &mut state, true),
            Err(MrpError::QuantityOverflow { period_id: 1, .. })
        ));
    }
}
