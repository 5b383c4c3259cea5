//! 三層 BOM 的 MRP 計算示例
//!
//! A → B ×1, A → C ×2, B → C ×1；C 同時是第 1 層與第 2 層物料的子件。

use chrono::NaiveDate;
use mrp::{
    logging, BomEdge, BomGraph, BucketingStrategy, MrpCalculator, Part, PartCatalog,
    PlanningConfig, PlanningHorizon, SeedRecord, WarningSeverity,
};

fn main() -> anyhow::Result<()> {
    logging::init();
    println!("=== 三層 BOM MRP 計算示例 ===\n");

    let catalog = PartCatalog::from_parts(vec![
        Part::new(1, "A", 2, 30).with_initial_inventory(20),
        Part::new(2, "B", 2, 50).with_initial_inventory(40),
        Part::new(3, "C", 2, 60).with_initial_inventory(50),
    ])?;

    let bom = BomGraph::from_edges(vec![
        BomEdge::new(1, 2, 1, 1),
        BomEdge::new(1, 3, 2, 2),
        BomEdge::new(2, 3, 1, 2),
    ])?;

    let start = NaiveDate::from_ymd_opt(2025, 11, 3)
        .ok_or_else(|| anyhow::anyhow!("無效的起始日期"))?;
    let horizon = PlanningHorizon::new(7).with_calendar(start, BucketingStrategy::Weekly);

    let demand = [100, 50, 90, 30, 10, 100, 20];
    let mut seeds: Vec<SeedRecord> = demand
        .iter()
        .zip(1..)
        .map(|(&quantity, period)| SeedRecord::demand(1, period, quantity))
        .collect();
    seeds[1].scheduled_receipt = 60;
    seeds.push(SeedRecord::receipt(2, 2, 50));
    seeds.push(SeedRecord::receipt(3, 5, 60));
    seeds.push(SeedRecord::receipt(3, 7, 60));

    let config = PlanningConfig::from_json_str(r#"{ "parallel": true, "collect_pegging": true }"#)?;
    let calculator = MrpCalculator::new(catalog, bom, horizon).with_config(config);
    let plan = calculator.calculate(&seeds)?;

    for part in calculator.catalog().iter() {
        println!("\n物料 {} ({})  提前期 {}  批量 {}", part.id, part.name, part.lead_time, part.lot_size);
        println!("{:<8} | 毛需求 | 預計收貨 | 淨需求 | 計劃收貨 | 計劃下達 | 預計庫存", "時段");
        for record in plan.records_for(part.id)? {
            let name = calculator
                .horizon()
                .get(record.period_id)
                .map(|p| p.name.as_str())
                .unwrap_or("-");
            println!(
                "{:<8} | {:>6} | {:>8} | {:>6} | {:>8} | {:>8} | {:>8}",
                name,
                record.gross_requirement,
                record.scheduled_receipt,
                record.net_requirement,
                record.planned_order_receipt,
                record.planned_order_release,
                record.projected_inventory
            );
        }
    }

    println!("\n需求追溯 C:");
    for peg in plan.pegging_for(3) {
        println!("  - 時段 {} 來自物料 {}: {}", peg.period_id, peg.parent_id, peg.quantity);
    }

    if plan.has_warnings(WarningSeverity::Warning) {
        println!("\n警告:");
        for warning in &plan.warnings {
            println!("  - [{:?}] 物料 {}: {}", warning.kind, warning.part_id, warning.message);
        }
    }

    println!("\n計算次數: {}, 計劃訂單: {}", plan.passes, plan.planned_orders.len());
    Ok(())
}
