// ==========================================
// DispatchEngine 单日排程集成测试
// ==========================================
// 测试目标: 验证单日建模-求解-读解全链路
// 覆盖范围: 方式互斥、专列/汽车物理约束、空输入短路、兜底路由
// ==========================================

use chrono::NaiveDate;
use dispatch_aps::solver::{
    LpModel, LpSolution, SolveControl, SolveStatus, SolverEngine, SolverError,
};
use dispatch_aps::{
    CostParameters, DispatchEngine, DispatchInput, DispatchTuning, InventoryRecord, Order,
    PredictionSet, Priority, ResourceCounts, SolverStatus,
};
use std::collections::HashMap;

// ==========================================
// 测试辅助函数
// ==========================================

/// 创建测试用的排程时刻
fn planning_now() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

/// 创建测试用的订单
fn create_test_order(
    order_id: &str,
    destination: &str,
    quantity_t: f64,
    priority: Priority,
    due: Option<(i32, u32, u32)>,
) -> Order {
    Order::new(
        order_id,
        "HR_COIL",
        destination,
        quantity_t,
        priority,
        due.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
    )
}

/// 创建测试用的单日输入
fn create_test_input(orders: Vec<Order>, rakes: u32, trucks: u32) -> DispatchInput {
    DispatchInput {
        orders,
        resources: ResourceCounts::new(rakes, trucks),
        inventory: HashMap::new(),
        predictions: PredictionSet::default(),
        cost_params: CostParameters::default(),
        planning_datetime: Some(planning_now()),
    }
}

/// 总是失败的求解引擎 (验证兜底路由)
struct BrokenSolver;

impl SolverEngine for BrokenSolver {
    fn solve(&self, _: &LpModel, _: &SolveControl) -> Result<LpSolution, SolverError> {
        Err(SolverError::EngineFailure("模拟引擎崩溃".to_string()))
    }

    fn name(&self) -> &str {
        "BROKEN"
    }
}

// ==========================================
// 测试用例 1: 代表性三订单场景
// ==========================================

#[test]
fn test_three_orders_one_rake_four_trucks() {
    let orders = vec![
        create_test_order("ORD-001", "KOLKATA", 1000.0, Priority::High, Some((2026, 3, 3))),
        create_test_order("ORD-002", "PATNA", 800.0, Priority::Medium, Some((2026, 3, 5))),
        create_test_order("ORD-003", "RANCHI", 500.0, Priority::Low, None),
    ];
    let input = create_test_input(orders, 1, 4);
    let engine = DispatchEngine::new(DispatchTuning::default());

    let plan = engine.plan_single_day(&input);

    println!("✓ 单日排程完成");
    println!("  - 求解状态: {}", plan.solver_status);
    println!("  - 专列数: {}", plan.summary.total_rakes);
    println!("  - 总吨位: {}", plan.summary.total_tonnage);

    assert!(
        matches!(
            plan.solver_status,
            SolverStatus::Optimal | SolverStatus::Feasible | SolverStatus::GreedyFallback
        ),
        "状态应为求解成功或兜底"
    );
    assert!(plan.summary.total_rakes <= 1, "不得超过可用专列数");
    assert!(plan.summary.total_tonnage > 0.0, "应有发运吨位");

    // 物理不变量
    for rake in &plan.rakes {
        assert!(
            (58..=59).contains(&rake.wagons),
            "车皮数应在 [58, 59]: {}",
            rake.wagons
        );
        assert!(
            rake.tonnes <= rake.wagons as f64 * 63.0 + 1e-6,
            "专列吨位不得超过车皮总载重"
        );
        // 默认吞吐量 500 t/h, 60 分钟时段
        assert_eq!(
            rake.loading_slots,
            (rake.tonnes / 500.0).ceil() as u32,
            "装车时段数应按吞吐量向上取整"
        );
    }
    for truck in &plan.trucks {
        assert!(truck.tonnes <= 22.0 + 1e-6, "汽车吨位不得超过 22 吨");
    }

    // 三单皆大于公路总运力, 求解成功时全量走铁路
    if plan.solver_status != SolverStatus::GreedyFallback {
        assert!(
            (plan.summary.total_tonnage - 2300.0).abs() < 1e-3,
            "方式互斥下全部订单量均应落位"
        );
        assert!(plan.summary.rail_vs_road_ratio > 0.99);
    }
}

// ==========================================
// 测试用例 2: 无专列场景, 订单走公路
// ==========================================

#[test]
fn test_no_rakes_order_served_by_truck() {
    let orders = vec![create_test_order(
        "ORD-001",
        "PATNA",
        100.0,
        Priority::Medium,
        None,
    )];
    let input = create_test_input(orders, 0, 10);
    let engine = DispatchEngine::new(DispatchTuning::default());

    let plan = engine.plan_single_day(&input);

    println!("✓ 无专列场景: 状态 {}", plan.solver_status);

    assert_eq!(plan.summary.total_rakes, 0, "无可用专列");
    assert!(plan.summary.total_trucks >= 1, "订单应由汽车承运");
    assert!(plan.summary.total_tonnage > 0.0);
    for truck in &plan.trucks {
        assert!(truck.tonnes <= 22.0 + 1e-6);
    }
}

// ==========================================
// 测试用例 3: 空订单短路
// ==========================================

#[test]
fn test_empty_orders_short_circuit() {
    let input = create_test_input(vec![], 3, 5);
    let engine = DispatchEngine::new(DispatchTuning::default());

    let plan = engine.plan_single_day(&input);

    assert_eq!(plan.solver_status, SolverStatus::EmptyInput);
    assert_eq!(plan.summary.total_cost, 0.0);
    assert_eq!(plan.summary.total_tonnage, 0.0);
    assert_eq!(plan.summary.total_rakes, 0);
    assert_eq!(plan.summary.total_trucks, 0);
    assert!(plan.rakes.is_empty() && plan.trucks.is_empty());
}

// ==========================================
// 测试用例 4: 求解引擎崩溃路由到兜底
// ==========================================

#[test]
fn test_solver_crash_routes_to_fallback() {
    let orders = vec![
        create_test_order("ORD-001", "KOLKATA", 900.0, Priority::High, Some((2026, 3, 2))),
        create_test_order("ORD-002", "PATNA", 60.0, Priority::Low, None),
    ];
    let input = create_test_input(orders, 1, 2);
    let engine =
        DispatchEngine::with_solver(DispatchTuning::default(), Box::new(BrokenSolver));

    let plan = engine.plan_single_day(&input);

    println!("✓ 引擎崩溃后状态: {}", plan.solver_status);
    assert_eq!(
        plan.solver_status,
        SolverStatus::GreedyFallback,
        "引擎崩溃必须走兜底, 不得冒泡"
    );
    assert!(plan.summary.total_tonnage > 0.0, "兜底方案仍应发运");
}

// ==========================================
// 测试用例 5: 两侧运力皆为零, 订单全部未落位
// ==========================================

#[test]
fn test_no_resources_reports_unassigned() {
    let orders = vec![create_test_order(
        "ORD-001",
        "RANCHI",
        700.0,
        Priority::High,
        None,
    )];
    let input = create_test_input(orders, 0, 0);
    let engine = DispatchEngine::new(DispatchTuning::default());

    let plan = engine.plan_single_day(&input);

    // 方式互斥约束不可满足 -> 兜底 -> 未落位报告
    assert_eq!(plan.solver_status, SolverStatus::GreedyFallback);
    assert_eq!(plan.summary.total_tonnage, 0.0);
    assert_eq!(
        plan.unassigned_orders,
        vec!["ORD-001".to_string()],
        "运力耗尽的订单应报告为未落位"
    );
}

// ==========================================
// 测试用例 6: 安全库存约束导致不可行时兜底
// ==========================================

#[test]
fn test_safety_stock_infeasible_falls_back() {
    let tuning = DispatchTuning {
        safety_stock_pct: 0.5,
        ..DispatchTuning::default()
    };
    let orders = vec![create_test_order(
        "ORD-001",
        "PATNA",
        1000.0,
        Priority::High,
        None,
    )];
    let mut input = create_test_input(orders, 1, 4);
    // 在库 1200 吨 (两仓合计), 可发 600 吨 < 订单 1000 吨
    input.inventory = InventoryRecord::fold(&[
        InventoryRecord::new("HR_COIL", 700.0),
        InventoryRecord::new("HR_COIL", 500.0),
    ]);

    let engine = DispatchEngine::new(tuning);
    let plan = engine.plan_single_day(&input);

    assert_eq!(
        plan.solver_status,
        SolverStatus::GreedyFallback,
        "安全库存不可满足应走兜底"
    );
}

// ==========================================
// 测试用例 7: 退化解中的零吨位专列不出方案
// ==========================================

/// 返回固定退化解的求解引擎: 专列启用标志为 1 但吨位为 0
struct DegenerateSolver;

impl SolverEngine for DegenerateSolver {
    fn solve(&self, model: &LpModel, _: &SolveControl) -> Result<LpSolution, SolverError> {
        // 变量布局: 专列组先行 (启用, 车皮数, 吨位, 起始时段, 结束时段)
        let mut values = vec![0.0; model.num_variables()];
        values[0] = 1.0; // rake_0_assigned
        values[1] = 58.0; // rake_0_wagons
        Ok(LpSolution {
            status: SolveStatus::Optimal,
            objective_value: Some(0.0),
            values,
            solve_time_seconds: 0.0,
        })
    }

    fn name(&self) -> &str {
        "DEGENERATE"
    }
}

#[test]
fn test_zero_tonnage_rake_not_emitted() {
    let orders = vec![create_test_order(
        "ORD-001",
        "PATNA",
        600.0,
        Priority::Medium,
        None,
    )];
    let input = create_test_input(orders, 1, 0);
    let engine =
        DispatchEngine::with_solver(DispatchTuning::default(), Box::new(DegenerateSolver));

    let plan = engine.plan_single_day(&input);

    assert!(plan.rakes.is_empty(), "零吨位专列不得进入方案");
    assert_eq!(plan.summary.total_rakes, 0);
    assert_eq!(plan.summary.total_tonnage, 0.0);
}
