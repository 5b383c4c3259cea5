//! 增量 MRP 計算示例

use mrp::{
    logging, BomEdge, BomGraph, IncrementalCalculator, MrpCalculator, Part, PartCatalog,
    PlanningHorizon, SeedRecord,
};

fn main() -> anyhow::Result<()> {
    logging::init();
    println!("=== 增量 MRP 計算示例 ===\n");

    let catalog = PartCatalog::from_parts(vec![
        Part::new(10, "BIKE", 1, 10),
        Part::new(20, "FRAME", 2, 20).with_initial_inventory(15),
        Part::new(30, "WHEEL", 1, 50).with_initial_inventory(40),
        Part::new(40, "SPOKE", 1, 500),
    ])?;
    let bom = BomGraph::from_edges(vec![
        BomEdge::new(10, 20, 1, 1),
        BomEdge::new(10, 30, 2, 1),
        BomEdge::new(30, 40, 36, 2),
    ])?;

    let calculator = MrpCalculator::new(catalog, bom, PlanningHorizon::new(8));
    let mut incremental = IncrementalCalculator::new(
        calculator,
        &[SeedRecord::demand(10, 4, 30), SeedRecord::demand(10, 7, 25)],
    )?;
    print_releases(&mut incremental)?;

    // 只有輪框的預計收貨變動：只重算輪框與輻條
    incremental.update_seed(SeedRecord::receipt(30, 3, 50))?;
    let passes = incremental.recalculate()?;
    println!("\n更新 WHEEL 預計收貨後重算 {} 個層級", passes);
    print_releases(&mut incremental)?;

    // 成品需求變動：重算整棵 BOM
    incremental.update_seed(SeedRecord::demand(10, 6, 40))?;
    let passes = incremental.recalculate()?;
    println!("\n更新 BIKE 需求後重算 {} 個層級", passes);
    print_releases(&mut incremental)?;

    Ok(())
}

fn print_releases(incremental: &mut IncrementalCalculator) -> anyhow::Result<()> {
    let plan = incremental.plan()?;
    for part in incremental.calculator().catalog().iter() {
        let releases: Vec<_> = plan
            .records_for(part.id)?
            .iter()
            .map(|r| r.planned_order_release)
            .collect();
        println!("  {:<6} 計劃下達 {:?}", part.name, releases);
    }
    Ok(())
}
