// ==========================================
// 成品发运排程系统 - 演示入口
// ==========================================
// 用途: 跑一个代表性的单日场景, 输出 JSON 方案
// ==========================================

use chrono::NaiveDate;
use dispatch_aps::{
    logging, CostParameters, DispatchEngine, DispatchInput, DispatchTuning, InventoryRecord,
    Order, PredictionSet, Priority, ResourceCounts,
};

fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} - 决策支持系统", dispatch_aps::APP_NAME);
    tracing::info!("系统版本: {}", dispatch_aps::VERSION);
    tracing::info!("==================================================");

    let due = |y, m, d| NaiveDate::from_ymd_opt(y, m, d);
    let orders = vec![
        Order::new("ORD-001", "HR_COIL", "KOLKATA", 1000.0, Priority::High, due(2026, 3, 3)),
        Order::new("ORD-002", "CR_COIL", "PATNA", 800.0, Priority::Medium, due(2026, 3, 5)),
        Order::new("ORD-003", "PLATE", "RANCHI", 500.0, Priority::Low, None),
    ];

    let inventory = InventoryRecord::fold(&[
        InventoryRecord::new("HR_COIL", 5000.0),
        InventoryRecord::new("CR_COIL", 3000.0),
        InventoryRecord::new("PLATE", 1500.0),
    ]);

    let input = DispatchInput {
        orders,
        resources: ResourceCounts::new(1, 4),
        inventory,
        predictions: PredictionSet::default(),
        cost_params: CostParameters::default(),
        planning_datetime: NaiveDate::from_ymd_opt(2026, 3, 1)
            .and_then(|d| d.and_hms_opt(8, 0, 0)),
    };

    let engine = DispatchEngine::new(DispatchTuning::default());
    let plan = engine.plan_single_day(&input);

    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
