//! 計算前的結構檢查
//!
//! 所有結構性錯誤都在帳冊被修改之前回報，失敗的計算不會留下部分結果。

use mrp_core::{BomGraph, MrpError, PartCatalog, PlanningHorizon, Result, SeedRecord};
use std::collections::BTreeSet;

use crate::ledger::Ledger;
use crate::{MrpWarning, WarningKind};

/// 計劃輸入檢查器
pub struct PlanValidator;

impl PlanValidator {
    /// 檢查物料、BOM 與種子資料，回傳不阻斷計算的警告
    pub fn validate(
        catalog: &PartCatalog,
        bom: &BomGraph,
        horizon: &PlanningHorizon,
        seeds: &[SeedRecord],
    ) -> Result<Vec<MrpWarning>> {
        catalog.validate()?;
        bom.validate(catalog)?;

        let mut seen = BTreeSet::new();
        let mut warnings = Vec::new();
        for seed in seeds {
            if !seen.insert((seed.part_id, seed.period_id)) {
                return Err(MrpError::DuplicateSeed {
                    part_id: seed.part_id,
                    period_id: seed.period_id,
                });
            }
            Self::check_seed(catalog, bom, horizon, seed, &mut warnings)?;
        }

        Ok(warnings)
    }

    /// 檢查外部載入的帳冊：時段數、輸入欄位不為負，並產生與種子資料相同的警告
    pub fn validate_ledger(
        catalog: &PartCatalog,
        bom: &BomGraph,
        horizon: &PlanningHorizon,
        ledger: &Ledger,
    ) -> Result<Vec<MrpWarning>> {
        catalog.validate()?;
        bom.validate(catalog)?;
        if ledger.period_count() != horizon.len() {
            return Err(MrpError::InvalidHorizon(format!(
                "帳冊時段數 {} 與計劃時界 {} 不符",
                ledger.period_count(),
                horizon.len()
            )));
        }

        let mut warnings = Vec::new();
        for record in ledger.rows() {
            let seed = SeedRecord::new(
                record.part_id,
                record.period_id,
                record.gross_requirement,
                record.scheduled_receipt,
            );
            Self::check_seed(catalog, bom, horizon, &seed, &mut warnings)?;
        }

        Ok(warnings)
    }

    fn check_seed(
        catalog: &PartCatalog,
        bom: &BomGraph,
        horizon: &PlanningHorizon,
        seed: &SeedRecord,
        warnings: &mut Vec<MrpWarning>,
    ) -> Result<()> {
        seed.validate()?;
        if !catalog.contains(seed.part_id) {
            return Err(MrpError::UnknownPart(seed.part_id));
        }
        if !horizon.contains(seed.period_id) {
            return Err(MrpError::MissingPeriodData {
                part_id: seed.part_id,
                period_id: seed.period_id,
            });
        }

        if seed.period_id == 0 {
            if seed.gross_requirement != 0 || seed.scheduled_receipt != 0 {
                warnings.push(MrpWarning::info(
                    seed.part_id,
                    Some(0),
                    WarningKind::BaselineActivityIgnored,
                    format!(
                        "基準時段的毛需求 {} / 預計收貨 {} 不參與計算",
                        seed.gross_requirement, seed.scheduled_receipt
                    ),
                ));
            }
        } else if seed.gross_requirement != 0 && bom.is_component(seed.part_id) {
            warnings.push(MrpWarning::warning(
                seed.part_id,
                Some(seed.period_id),
                WarningKind::ComponentDemandIgnored,
                format!(
                    "子件的獨立需求 {} 將被 BOM 展開結果覆蓋",
                    seed.gross_requirement
                ),
            ));
        }
        Ok(())
    }
}
