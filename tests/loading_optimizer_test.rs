// ==========================================
// LoadingOptimizer / TemplateSelector 装载集成测试
// ==========================================
// 测试目标: 验证车皮级装载优化与模板择优
// 覆盖范围: 仓位/车皮约束、尺寸适配、留装语义、全不可行报错
// ==========================================

use dispatch_aps::{
    DispatchError, LoadingOptimizer, Priority, Product, RakeTemplate, Slot, TemplateSelector,
};
use std::collections::HashMap;

// ==========================================
// 测试辅助函数
// ==========================================

fn create_test_slot(max_weight_t: f64) -> Slot {
    Slot {
        slot_id: "S".to_string(),
        max_weight_t,
        max_length_m: 12.0,
        max_width_m: 3.0,
        max_height_m: 3.0,
    }
}

fn create_test_template(template_id: &str, wagon_count: u32, slot_weight_t: f64) -> RakeTemplate {
    RakeTemplate {
        template_id: template_id.to_string(),
        wagon_type: "BOXN".to_string(),
        wagon_count,
        payload_limit_t: slot_weight_t * 2.0,
        slot_layout: vec![create_test_slot(slot_weight_t), create_test_slot(slot_weight_t)],
    }
}

fn create_test_product(product_id: &str, weight_t: f64, priority: Priority) -> Product {
    Product {
        product_id: product_id.to_string(),
        weight_t,
        length_m: Some(10.0),
        width_m: Some(2.0),
        height_m: Some(2.0),
        priority,
        destination: "KOLKATA".to_string(),
    }
}

/// 校验方案不突破任何仓位/车皮重量上限
fn assert_weight_limits(plan: &dispatch_aps::LoadingPlan, products: &[Product]) {
    let weight_of: HashMap<&str, f64> = products
        .iter()
        .map(|p| (p.product_id.as_str(), p.weight_t))
        .collect();

    let mut slot_load: HashMap<&str, f64> = HashMap::new();
    let mut wagon_load: HashMap<&str, f64> = HashMap::new();
    for a in &plan.assignments {
        let w = weight_of[a.product_id.as_str()];
        *slot_load.entry(a.slot_id.as_str()).or_insert(0.0) += w;
        *wagon_load.entry(a.wagon_id.as_str()).or_insert(0.0) += w;
    }

    for wagon in &plan.wagons {
        let loaded = wagon_load.get(wagon.wagon_id.as_str()).copied().unwrap_or(0.0);
        assert!(
            loaded <= wagon.payload_limit_t + 1e-6,
            "车皮 {} 超载: {} > {}",
            wagon.wagon_id,
            loaded,
            wagon.payload_limit_t
        );
        for slot in &wagon.slots {
            let loaded = slot_load.get(slot.slot_id.as_str()).copied().unwrap_or(0.0);
            assert!(
                loaded <= slot.max_weight_t + 1e-6,
                "仓位 {} 超载: {} > {}",
                slot.slot_id,
                loaded,
                slot.max_weight_t
            );
        }
    }
}

// ==========================================
// 测试用例 1: 全部成品可装时满装
// ==========================================

#[test]
fn test_all_products_loaded_when_they_fit() {
    // 2 车皮 x 2 仓位 x 30 吨
    let template = create_test_template("T1", 2, 30.0);
    let products = vec![
        create_test_product("P1", 25.0, Priority::High),
        create_test_product("P2", 20.0, Priority::Medium),
        create_test_product("P3", 15.0, Priority::Low),
    ];

    let plan = LoadingOptimizer::new()
        .optimize(&products, &template, true)
        .unwrap();

    println!("✓ 装载 {} 件, 利用率 {:.1}%", plan.assignments.len(), plan.utilization_pct);

    assert_eq!(plan.assignments.len(), 3, "可装成品应全部落位");
    assert!(plan.unassigned_products.is_empty());
    assert!((plan.total_loaded_t - 60.0).abs() < 1e-6);
    assert!(plan.utilization_pct >= 0.0 && plan.utilization_pct <= 100.0);
    assert!(plan.total_loaded_t <= template.total_payload_t() + 1e-6);
    assert_weight_limits(&plan, &products);
}

// ==========================================
// 测试用例 2: 仓位竞争时高优先重件优先
// ==========================================

#[test]
fn test_priority_wins_slot_contention() {
    // 单车皮单仓位, 两件都想装
    let template = RakeTemplate {
        template_id: "T1".to_string(),
        wagon_type: "BOXN".to_string(),
        wagon_count: 1,
        payload_limit_t: 30.0,
        slot_layout: vec![create_test_slot(30.0)],
    };
    let products = vec![
        create_test_product("P-LOW", 20.0, Priority::Low),
        create_test_product("P-HIGH", 20.0, Priority::High),
    ];

    let plan = LoadingOptimizer::new()
        .optimize(&products, &template, true)
        .unwrap();

    assert_eq!(plan.assignments.len(), 1);
    assert_eq!(plan.assignments[0].product_id, "P-HIGH", "同重量下高优先级应胜出");
    assert_eq!(plan.unassigned_products, vec!["P-LOW".to_string()]);
}

// ==========================================
// 测试用例 3: 超重成品留装 (允许留装)
// ==========================================

#[test]
fn test_overweight_product_left_unassigned() {
    let template = create_test_template("T1", 1, 30.0);
    let products = vec![
        create_test_product("P1", 25.0, Priority::Medium),
        // 超过任何仓位重量上限
        create_test_product("P-HEAVY", 45.0, Priority::High),
    ];

    let plan = LoadingOptimizer::new()
        .optimize(&products, &template, true)
        .unwrap();

    assert!(
        plan.unassigned_products.contains(&"P-HEAVY".to_string()),
        "超重成品应记入未落位列表"
    );
    assert!(
        plan.assignments.iter().all(|a| a.product_id != "P-HEAVY"),
        "未落位成品不得出现在落位明细中"
    );
    assert_weight_limits(&plan, &products);
}

// ==========================================
// 测试用例 4: 禁止留装且无法全装时报错
// ==========================================

#[test]
fn test_mandatory_full_load_infeasible_errors() {
    let template = create_test_template("T1", 1, 30.0);
    let products = vec![create_test_product("P-HEAVY", 45.0, Priority::High)];

    let result = LoadingOptimizer::new().optimize(&products, &template, false);

    match result {
        Err(DispatchError::LoadingInfeasible { template_id }) => {
            assert_eq!(template_id, "T1");
        }
        other => panic!("应返回 LoadingInfeasible, 实际: {:?}", other.map(|p| p.template_id)),
    }
}

// ==========================================
// 测试用例 5: 尺寸不适配的仓位不参与指派
// ==========================================

#[test]
fn test_dimension_mismatch_excluded() {
    let template = create_test_template("T1", 1, 30.0);
    let mut long_product = create_test_product("P-LONG", 10.0, Priority::High);
    long_product.length_m = Some(20.0); // 超过仓位长度上限 12m

    let plan = LoadingOptimizer::new()
        .optimize(&[long_product], &template, true)
        .unwrap();

    assert!(plan.assignments.is_empty(), "超长成品无可装仓位");
    assert_eq!(plan.unassigned_products, vec!["P-LONG".to_string()]);
    assert_eq!(plan.total_loaded_t, 0.0);
    assert_eq!(plan.utilization_pct, 0.0);
}

// ==========================================
// 测试用例 6: 模板择优取得分最高者
// ==========================================

#[test]
fn test_selector_picks_highest_scoring_template() {
    // 小模板只装得下 1 件, 大模板装得下全部
    let templates = vec![
        create_test_template("T-SMALL", 1, 30.0),
        create_test_template("T-BIG", 3, 30.0),
    ];
    let products = vec![
        create_test_product("P1", 25.0, Priority::High),
        create_test_product("P2", 25.0, Priority::Medium),
        create_test_product("P3", 25.0, Priority::Medium),
        create_test_product("P4", 25.0, Priority::Low),
        create_test_product("P5", 25.0, Priority::Low),
    ];

    let selection = TemplateSelector::new()
        .select(&products, &templates, true)
        .unwrap();

    println!("✓ 胜出模板: {} (得分 {:.1})", selection.template_id, selection.score);

    assert_eq!(selection.template_id, "T-BIG", "装载吨位高的模板应胜出");
    assert_eq!(selection.plan.assignments.len(), 5);
    assert!(selection.score > 0.0);
}

// ==========================================
// 测试用例 7: 不可行模板跳过, 可行模板胜出
// ==========================================

#[test]
fn test_selector_skips_infeasible_template() {
    let templates = vec![
        create_test_template("T-TINY", 1, 5.0),  // 仓位太小, 必装模式不可行
        create_test_template("T-OK", 1, 30.0),
    ];
    let products = vec![create_test_product("P1", 20.0, Priority::High)];

    let selection = TemplateSelector::new()
        .select(&products, &templates, false)
        .unwrap();

    assert_eq!(selection.template_id, "T-OK", "不可行模板应跳过而非终止择优");
}

// ==========================================
// 测试用例 8: 全部模板不可行时报错
// ==========================================

#[test]
fn test_selector_all_infeasible_errors() {
    let templates = vec![
        create_test_template("T1", 1, 5.0),
        create_test_template("T2", 2, 8.0),
    ];
    let products = vec![create_test_product("P-HEAVY", 40.0, Priority::High)];

    let result = TemplateSelector::new().select(&products, &templates, false);

    assert!(
        matches!(result, Err(DispatchError::NoFeasibleTemplate)),
        "全部模板不可行应返回 NoFeasibleTemplate"
    );
}
