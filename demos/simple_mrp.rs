//! 簡單 MRP 計算示例：單一物料，無 BOM

use mrp::{logging, BomGraph, MrpCalculator, Part, PartCatalog, PlanningHorizon, SeedRecord};

fn main() -> anyhow::Result<()> {
    logging::init();
    println!("=== 簡單 MRP 計算示例 ===\n");

    // 提前期 1，批量 25，期初庫存 30
    let catalog = PartCatalog::from_parts(vec![
        Part::new(100, "BIKE-001", 1, 25).with_initial_inventory(30),
    ])?;

    let seeds = vec![
        SeedRecord::demand(100, 1, 20),
        SeedRecord::demand(100, 2, 40),
        SeedRecord::new(100, 3, 35, 25),
        SeedRecord::demand(100, 5, 60),
    ];

    let calculator = MrpCalculator::new(catalog, BomGraph::new(), PlanningHorizon::new(6));
    let plan = calculator.calculate(&seeds)?;

    println!("時段 | 毛需求 | 預計收貨 | 淨需求 | 計劃收貨 | 計劃下達 | 預計庫存");
    for record in plan.records_for(100)? {
        println!(
            "{:>4} | {:>6} | {:>8} | {:>6} | {:>8} | {:>8} | {:>8}",
            record.period_id,
            record.gross_requirement,
            record.scheduled_receipt,
            record.net_requirement,
            record.planned_order_receipt,
            record.planned_order_release,
            record.projected_inventory
        );
    }

    println!("\n計劃訂單:");
    for order in &plan.planned_orders {
        println!(
            "  - 數量: {}, 收貨時段: {}, 下達時段: {:?}",
            order.quantity, order.receipt_period, order.release_period
        );
    }

    Ok(())
}
